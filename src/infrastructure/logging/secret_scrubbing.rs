use regex::Regex;
use std::fmt;

/// Redacts GitHub credentials from text before it is logged or surfaced
#[derive(Clone)]
pub struct SecretScrubber {
    github_token_pattern: Regex,
    authorization_pattern: Regex,
    field_pattern: Regex,
}

impl SecretScrubber {
    pub fn new() -> Self {
        Self {
            // Classic and fine-grained tokens: ghp_, gho_, ghu_, ghs_, ghr_, github_pat_
            github_token_pattern: Regex::new(r"\b(?:gh[pousr]_[A-Za-z0-9]{20,}|github_pat_[A-Za-z0-9_]{20,})\b")
                .expect("valid token regex"),
            // Authorization header values: `token xyz`, `Bearer xyz`
            authorization_pattern: Regex::new(r"(?i)\b(token|bearer)\s+[A-Za-z0-9\-_\.]{8,}")
                .expect("valid authorization regex"),
            // Config-style fields: token: xyz, secret=xyz
            field_pattern: Regex::new(r#"(?i)["']?(token|secret)["']?\s*([:=])\s*["']?[^"'\s,}]+["']?"#)
                .expect("valid field regex"),
        }
    }

    pub fn scrub_message(&self, message: &str) -> String {
        let scrubbed = self
            .github_token_pattern
            .replace_all(message, "[TOKEN_REDACTED]");
        let scrubbed = self
            .authorization_pattern
            .replace_all(&scrubbed, "$1 [TOKEN_REDACTED]");
        self.field_pattern
            .replace_all(&scrubbed, "$1$2[REDACTED]")
            .into_owned()
    }
}

impl Default for SecretScrubber {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SecretScrubber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretScrubber").finish()
    }
}
