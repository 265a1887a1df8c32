use assert_cmd::Command;

const ORACLE_ENV: [&str; 6] = [
    "VENDOR_RISK_PROVIDER",
    "VENDOR_RISK_API_KEY",
    "API_KEY",
    "VENDOR_RISK_ENDPOINT",
    "VENDOR_RISK_MODEL",
    "VENDOR_RISK_TIMEOUT",
];

/// The binary with oracle settings from the developer's shell removed.
pub fn cli() -> Command {
    let mut cmd = Command::cargo_bin("vendor-risk-cli").unwrap();
    for key in ORACLE_ENV {
        cmd.env_remove(key);
    }
    cmd.env("NO_COLOR", "1");
    cmd
}
