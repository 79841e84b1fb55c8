use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Optional YAML card profile with generation defaults.
    pub profile_path: Option<PathBuf>,
    /// Directory for the filesystem storage backend. `None` keeps cached
    /// descriptions in memory for the lifetime of the process.
    pub storage_dir: Option<PathBuf>,
    /// Enables AI descriptions when set.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub ai_timeout_secs: u64,
    pub ai_max_concurrent: usize,
    /// Upper bound on card variants generated by one download request.
    pub max_cards: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("profile_path", &self.profile_path)
            .field("storage_dir", &self.storage_dir)
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("ai_timeout_secs", &self.ai_timeout_secs)
            .field("ai_max_concurrent", &self.ai_max_concurrent)
            .field("max_cards", &self.max_cards)
            .finish()
    }
}
