use serde::{Deserialize, Serialize};

/// Environment variable that takes precedence over `security.encryption_key`.
pub const ENCRYPTION_KEY_ENV: &str = "PORTTRACE_ENCRYPTION_KEY";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SecurityConfig {
    /// Base64-encoded 32-byte key used to seal switch credentials at rest.
    #[serde(default)]
    pub encryption_key: Option<String>,

    /// Where a generated key is kept when none is configured.
    #[serde(default = "default_key_file")]
    pub key_file: String,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            encryption_key: None,
            key_file: default_key_file(),
        }
    }
}

impl SecurityConfig {
    pub fn resolved_key(&self) -> Option<String> {
        std::env::var(ENCRYPTION_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.encryption_key.clone())
    }
}

fn default_key_file() -> String {
    "porttrace.key".to_string()
}
