pub mod app_config;
pub mod config;
pub mod sites;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use sites::{load_sites, SignalGroups, SiteVariant, SitesFile, UrlPair};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read sites file {path}: {source}")]
    SitesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse sites file: {0}")]
    SitesFileParse(#[from] serde_yaml::Error),

    #[error("sites validation failed: {0}")]
    Validation(String),

    #[error("site '{site}' has {prod} prod URLs but {stage} stage URLs; counts must match")]
    PairCountMismatch {
        site: String,
        prod: usize,
        stage: usize,
    },

    #[error("site '{0}' is not configured")]
    UnknownSite(String),
}
