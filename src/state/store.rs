use std::sync::Arc;
use tracing::{error, info, warn};

use super::bot_registry::BotRegistry;
use super::documents::DocumentStore;
use super::user_info::UserInfo;
use crate::error::{AppError, Result};

const DEFAULT_BOTS_DOCUMENT: &str = "[]";
const DEFAULT_USER_INFO_DOCUMENT: &str = "{\n  \"points\": 0,\n  \"userId\": \"guest\"\n}";

/// Names of the two persisted documents
#[derive(Debug, Clone)]
pub struct DocumentPaths {
    pub bots: String,
    pub user_info: String,
}

impl Default for DocumentPaths {
    fn default() -> Self {
        Self {
            bots: "bots.json".to_string(),
            user_info: "user_info.json".to_string(),
        }
    }
}

/// In-memory bot list and user info, mirrored to disk after every mutation
pub struct StateStore {
    bots: BotRegistry,
    user_info: UserInfo,
    paths: DocumentPaths,
    documents: Arc<dyn DocumentStore>,
}

impl StateStore {
    /// Load both documents, creating or repairing them as needed.
    ///
    /// Fails only if a missing document cannot be created.
    pub async fn load(documents: Arc<dyn DocumentStore>, paths: DocumentPaths) -> Result<Self> {
        for (path, default) in [
            (&paths.bots, DEFAULT_BOTS_DOCUMENT),
            (&paths.user_info, DEFAULT_USER_INFO_DOCUMENT),
        ] {
            documents
                .ensure_exists(path, default)
                .await
                .map_err(|e| AppError::Startup {
                    path: path.clone(),
                    source: Box::new(e),
                })?;
        }

        let bots = match read_parsed(documents.as_ref(), &paths.bots, BotRegistry::from_json).await {
            Ok(bots) => bots,
            Err(e) => {
                error!("Could not load bot list: {}, resetting to empty list", e);
                heal(documents.as_ref(), &paths.bots, DEFAULT_BOTS_DOCUMENT).await;
                BotRegistry::new()
            }
        };

        let user_info =
            match read_parsed(documents.as_ref(), &paths.user_info, UserInfo::from_json).await {
                Ok(info) => info,
                Err(e) => {
                    error!("Could not load user info: {}, resetting to defaults", e);
                    heal(
                        documents.as_ref(),
                        &paths.user_info,
                        DEFAULT_USER_INFO_DOCUMENT,
                    )
                    .await;
                    UserInfo::default()
                }
            };

        info!(
            "State loaded: {} bots, {} points for user '{}'",
            bots.count(),
            user_info.points,
            user_info.user_id
        );

        Ok(Self {
            bots,
            user_info,
            paths,
            documents,
        })
    }

    pub fn bots(&self) -> &BotRegistry {
        &self.bots
    }

    pub fn bots_mut(&mut self) -> &mut BotRegistry {
        &mut self.bots
    }

    pub fn user_info(&self) -> &UserInfo {
        &self.user_info
    }

    pub fn user_info_mut(&mut self) -> &mut UserInfo {
        &mut self.user_info
    }

    /// Write the full bot list to disk
    pub async fn save_bots(&self) -> Result<()> {
        let content = self.bots.to_json()?;
        self.documents.write_document(&self.paths.bots, &content).await
    }

    /// Write the user info to disk
    pub async fn save_user_info(&self) -> Result<()> {
        let content = self.user_info.to_json()?;
        self.documents
            .write_document(&self.paths.user_info, &content)
            .await
    }
}

async fn read_parsed<T>(
    documents: &dyn DocumentStore,
    path: &str,
    parse: fn(&str) -> serde_json::Result<T>,
) -> Result<T> {
    let content = documents.read_document(path).await?;
    parse(&content).map_err(|e| AppError::DocumentParse {
        path: path.to_string(),
        source: e,
    })
}

/// Overwrite a corrupt document with its default content
async fn heal(documents: &dyn DocumentStore, path: &str, default: &str) {
    if let Err(e) = documents.write_document(path, default).await {
        warn!("Failed to reset '{}' to defaults: {}", path, e);
    }
}

/// Shared state store type
pub type SharedStateStore = Arc<tokio::sync::RwLock<StateStore>>;

pub fn create_shared_state_store(store: StateStore) -> SharedStateStore {
    Arc::new(tokio::sync::RwLock::new(store))
}
