pub mod bot_manager;

pub use bot_manager::{
    create_shared_bot_manager, CreateBotRequest, SharedBotManager, BOT_CREATED_MESSAGE,
    BOT_VERIFIED_MESSAGE,
};
