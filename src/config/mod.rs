pub mod policy;
pub mod service;

pub use policy::BotPolicy;
pub use service::ServiceConfig;
