use tracing::info;

use crate::import::DOWNLOAD_BATCH_SIZE;

/// Application configuration
/// In debug builds: loads from .env file
/// In release builds: loads from the process environment
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the SiteForge backend API
    pub backend_base_url: String,
    /// Base URL of the Graph drive API
    pub graph_base_url: String,
    /// Delegated access token for the drive. Token acquisition lives in the
    /// identity subsystem; this crate only consumes the result.
    pub graph_access_token: String,
    /// Operator stamped onto newly created projects
    pub operator: String,
    /// Batch size for photo download-handle resolution
    pub photo_batch_size: usize,
}

impl Config {
    /// Load configuration based on build mode
    pub fn load() -> Self {
        #[cfg(debug_assertions)]
        {
            if dotenvy::dotenv().is_ok() {
                info!("Config: Dev mode activated - loaded .env file");
            }
        }

        Self::from_env()
    }

    /// Load configuration from environment variables
    fn from_env() -> Self {
        let backend_base_url = std::env::var("SITEFORGE_API_URL")
            .unwrap_or_else(|_| "http://localhost:8000".to_string());

        let graph_base_url = std::env::var("SITEFORGE_GRAPH_URL")
            .unwrap_or_else(|_| "https://graph.microsoft.com/v1.0/me/drive".to_string());

        let graph_access_token = std::env::var("SITEFORGE_GRAPH_TOKEN").unwrap_or_default();

        let operator = std::env::var("SITEFORGE_OPERATOR").unwrap_or_default();

        let photo_batch_size = std::env::var("SITEFORGE_PHOTO_BATCH")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DOWNLOAD_BATCH_SIZE);

        info!("Config: backend at {}", backend_base_url);

        Self {
            backend_base_url,
            graph_base_url,
            graph_access_token,
            operator,
            photo_batch_size,
        }
    }
}
