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
    pub log_level: String,
    pub sites_path: PathBuf,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Pause after each completed pair.
    pub pair_delay_ms: u64,
    /// Fetch prod and stage of a pair concurrently instead of one after the other.
    pub concurrent_sides: bool,
    pub spreadsheet_id: Option<String>,
    /// Google service-account key file used to mint Sheets tokens.
    pub service_account_path: Option<PathBuf>,
    /// Pre-minted bearer token, used when no service account is configured.
    pub sheets_access_token: Option<String>,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("sites_path", &self.sites_path)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("pair_delay_ms", &self.pair_delay_ms)
            .field("concurrent_sides", &self.concurrent_sides)
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("service_account_path", &self.service_account_path)
            .field(
                "sheets_access_token",
                &self.sheets_access_token.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "telegram_bot_token",
                &self.telegram_bot_token.as_ref().map(|_| "[redacted]"),
            )
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish()
    }
}
