pub mod bot_registry;
pub mod documents;
#[cfg(test)]
pub mod memory;
pub mod store;
pub mod user_info;

pub use bot_registry::{BotRecord, BotStatus, DEFAULT_USER_ID};
pub use documents::FsDocumentStore;
pub use store::{
    create_shared_state_store, DocumentPaths, SharedStateStore, StateStore,
};
pub use user_info::UserInfo;
