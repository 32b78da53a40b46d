//! HTTP API for bots and the user balance
//!
//! Exposes the bot manager over JSON endpoints with permissive CORS.

mod api;
mod server;

pub use server::start_web_server;
