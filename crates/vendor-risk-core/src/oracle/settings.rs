use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use super::OracleError;

/// Connection settings for the text-generation oracle.
///
/// Values can come from a config file (deserialized into this struct) and are
/// then overlaid by environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleSettings {
    pub provider: String,
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub timeout_ms: Option<u64>,
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            api_key: None,
            endpoint: None,
            model: None,
            timeout_ms: None,
        }
    }
}

impl OracleSettings {
    pub const PROVIDER_ENV: &'static str = "VENDOR_RISK_PROVIDER";
    pub const API_KEY_ENV: &'static str = "VENDOR_RISK_API_KEY";
    pub const FALLBACK_API_KEY_ENV: &'static str = "API_KEY";
    pub const ENDPOINT_ENV: &'static str = "VENDOR_RISK_ENDPOINT";
    pub const MODEL_ENV: &'static str = "VENDOR_RISK_MODEL";
    pub const TIMEOUT_ENV: &'static str = "VENDOR_RISK_TIMEOUT";

    /// Load settings from environment variables on top of the defaults.
    ///
    /// * `VENDOR_RISK_PROVIDER`: `gemini` (default), `openai`, `anthropic` or `noop`.
    /// * `VENDOR_RISK_API_KEY` : credential; `API_KEY` is read when unset.
    /// * `VENDOR_RISK_ENDPOINT`: optional base URL override.
    /// * `VENDOR_RISK_MODEL`   : optional model override.
    /// * `VENDOR_RISK_TIMEOUT` : optional request timeout such as `30s` or `2m`.
    pub fn from_env() -> Result<Self, OracleError> {
        Self::default().overlay_env()
    }

    /// Apply environment variables over the current values.
    pub fn overlay_env(self) -> Result<Self, OracleError> {
        self.overlay_map(&std::env::vars().collect())
    }

    fn overlay_map(mut self, vars: &HashMap<String, String>) -> Result<Self, OracleError> {
        let lookup = |key: &str| {
            vars.get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(provider) = lookup(Self::PROVIDER_ENV) {
            self.provider = provider;
        }
        if let Some(key) = lookup(Self::API_KEY_ENV).or_else(|| lookup(Self::FALLBACK_API_KEY_ENV)) {
            self.api_key = Some(key);
        }
        if let Some(endpoint) = lookup(Self::ENDPOINT_ENV) {
            self.endpoint = Some(endpoint);
        }
        if let Some(model) = lookup(Self::MODEL_ENV) {
            self.model = Some(model);
        }
        if let Some(raw) = lookup(Self::TIMEOUT_ENV) {
            let timeout = humantime::parse_duration(&raw).map_err(|err| {
                OracleError::Configuration(format!(
                    "invalid {} value `{raw}`: {err}",
                    Self::TIMEOUT_ENV
                ))
            })?;
            let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
            self.timeout_ms = Some(millis.max(1));
        }
        Ok(self)
    }

    /// Credential, if one is configured and non-blank.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_to_gemini_without_credential() {
        let settings = OracleSettings::default().overlay_map(&vars(&[])).unwrap();
        assert_eq!(settings.provider, "gemini");
        assert!(settings.credential().is_none());
        assert!(settings.timeout().is_none());
    }

    #[test]
    fn prefers_prefixed_key_over_fallback() {
        let settings = OracleSettings::default()
            .overlay_map(&vars(&[
                (OracleSettings::API_KEY_ENV, "primary"),
                (OracleSettings::FALLBACK_API_KEY_ENV, "fallback"),
            ]))
            .unwrap();
        assert_eq!(settings.credential(), Some("primary"));

        let settings = OracleSettings::default()
            .overlay_map(&vars(&[(OracleSettings::FALLBACK_API_KEY_ENV, "fallback")]))
            .unwrap();
        assert_eq!(settings.credential(), Some("fallback"));
    }

    #[test]
    fn blank_values_are_ignored() {
        let base = OracleSettings {
            provider: "openai".into(),
            model: Some("from-file".into()),
            ..OracleSettings::default()
        };
        let settings = base
            .overlay_map(&vars(&[
                (OracleSettings::PROVIDER_ENV, "  "),
                (OracleSettings::MODEL_ENV, ""),
                (OracleSettings::API_KEY_ENV, " "),
            ]))
            .unwrap();
        assert_eq!(settings.provider, "openai");
        assert_eq!(settings.model.as_deref(), Some("from-file"));
        assert!(settings.credential().is_none());
    }

    #[test]
    fn parses_humantime_timeout() {
        let settings = OracleSettings::default()
            .overlay_map(&vars(&[(OracleSettings::TIMEOUT_ENV, "2m")]))
            .unwrap();
        assert_eq!(settings.timeout(), Some(Duration::from_secs(120)));
    }

    #[test]
    fn keeps_sub_second_timeout_precision() {
        let settings = OracleSettings::default()
            .overlay_map(&vars(&[(OracleSettings::TIMEOUT_ENV, "1500ms")]))
            .unwrap();
        assert_eq!(settings.timeout_ms, Some(1500));
        assert_eq!(settings.timeout(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn rejects_unparsable_timeout() {
        let err = OracleSettings::default()
            .overlay_map(&vars(&[(OracleSettings::TIMEOUT_ENV, "soon")]))
            .expect_err("timeout should not parse");
        assert!(matches!(err, OracleError::Configuration(_)));
        assert!(err.to_string().contains(OracleSettings::TIMEOUT_ENV));
    }

    #[test]
    fn blank_credential_is_not_a_credential() {
        let settings = OracleSettings {
            api_key: Some("   ".into()),
            ..OracleSettings::default()
        };
        assert!(settings.credential().is_none());
    }
}
