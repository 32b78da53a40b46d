use std::path::PathBuf;
use tracing::warn;

use crate::state::DocumentPaths;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_LOG_FILTER: &str = "botkeeper=info,tower_http=info";

/// Process-level settings
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Directory holding the persisted documents
    pub data_dir: PathBuf,
    /// HTTP listen port
    pub port: u16,
    /// Bot-list document name, relative to `data_dir`
    pub bots_file: String,
    /// User-info document name, relative to `data_dir`
    pub user_info_file: String,
    /// tracing-subscriber filter directive
    pub log_filter: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            port: DEFAULT_PORT,
            bots_file: "bots.json".to_string(),
            user_info_file: "user_info.json".to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ServiceConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from any key lookup, falling back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!("Invalid PORT '{}', using {}", raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => defaults.port,
        };

        Self {
            data_dir: lookup("DATA_DIR")
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            port,
            bots_file: lookup("BOTS_FILE")
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.bots_file),
            user_info_file: lookup("USER_INFO_FILE")
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.user_info_file),
            log_filter: lookup("RUST_LOG")
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.log_filter),
        }
    }

    pub fn document_paths(&self) -> DocumentPaths {
        DocumentPaths {
            bots: self.bots_file.clone(),
            user_info: self.user_info_file.clone(),
        }
    }
}
