use super::ChecklistItemId;

const GRC_POLICY_NAMES: &str = "ISO 27001 certification, SOC attestations, a comprehensive Privacy Policy, an Information Security Policy";

/// Build the question sent to the oracle for one checklist item.
///
/// Each template names the exact labels the matching parser in
/// [`super::parsers`] recognizes.
pub fn prompt_for(id: ChecklistItemId, domain: &str) -> String {
    match id {
        ChecklistItemId::DomainPresence => format!(
            "Based on public information, does '{domain}' appear to be a legitimate, active company domain with an associated website and likely email system? Respond with only 'Yes' or 'No'."
        ),
        ChecklistItemId::Dmarc => format!(
            "What is the DMARC policy (p=) published for the domain '{domain}'? Consider its DNS records. Respond with 'reject', 'quarantine', 'none', or 'unknown'."
        ),
        ChecklistItemId::WebsiteSecurity => format!(
            "Briefly assess the general website security of 'https://{domain}'. Does it consistently use HTTPS? Are there obvious major security issues visible from a quick public check (mixed content, outdated ciphers, certificate errors, missing HSTS)? Respond with 'Secure', 'Moderately Secure', or 'Insecure', followed by a brief justification."
        ),
        ChecklistItemId::GrcPolicies => format!(
            "Does the website for '{domain}' visibly declare, or have dedicated and easily findable sections for, any of the following: {GRC_POLICY_NAMES}? List which of these four categories are clearly present and substantial. Respond with a comma-separated list of the items found (for example 'ISO 27001 certification, Privacy Policy') or 'None found'."
        ),
        ChecklistItemId::Breaches => format!(
            "Based on publicly available information, how many distinct major publicly reported cybersecurity or privacy breaches are associated with the company operating '{domain}' in the last 5-7 years? Respond with a number (0, 1, 2, 3, ...) and a brief summary of any that were found."
        ),
        ChecklistItemId::Litigation => format!(
            "Is there a significant public record of more than two major litigation cases (class-action lawsuits about business practices or data privacy, major contract disputes, regulatory fines) against the company operating '{domain}' in the last 5-7 years? Respond 'Yes' or 'No', and briefly state why if 'Yes'."
        ),
        ChecklistItemId::OnlineReviews => format!(
            "What is the general public sentiment in online comments, news articles, and reviews about the organization behind '{domain}'? Respond with 'Positive', 'Negative', 'Neutral', or 'Mixed', followed by a very brief summary."
        ),
        ChecklistItemId::YearsInBusiness => format!(
            "Approximately how many years has the company primarily associated with the domain '{domain}' been in business? Respond with a number (for example '15') or 'Unknown'."
        ),
        ChecklistItemId::Vulnerabilities => format!(
            "Based on a hypothetical, non-invasive online scan of the public-facing assets of '{domain}' (website, known services), would critical or high-severity vulnerabilities commonly be found (unpatched critical CVEs in exposed software, severe SSL/TLS misconfigurations, injection-prone URL patterns, exposed sensitive directories)? Respond 'None found', 'Minor issues found', or 'Serious/Critical vulnerabilities likely', with a brief explanation."
        ),
    }
}
