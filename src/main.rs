use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// Bot registry and point balance service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding bots.json and user_info.json (overrides DATA_DIR)
    #[arg(long, short = 'd')]
    data_dir: Option<PathBuf>,

    /// Port to listen on (overrides PORT)
    #[arg(long, short = 'p')]
    port: Option<u16>,

    /// Log filter directives (overrides RUST_LOG)
    #[arg(long)]
    log: Option<String>,
}

mod config;
mod error;
mod logging;
mod managers;
mod state;
mod web;

use config::{BotPolicy, ServiceConfig};
use managers::create_shared_bot_manager;
use state::{create_shared_state_store, FsDocumentStore, StateStore};

impl Args {
    fn apply(self, mut config: ServiceConfig) -> ServiceConfig {
        if let Some(data_dir) = self.data_dir {
            config.data_dir = data_dir;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(log) = self.log {
            config.log_filter = log;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();
    let config = args.apply(ServiceConfig::from_env());

    logging::init_tracing(&config.log_filter);

    info!("Loading state from {}...", config.data_dir.display());
    let documents = Arc::new(FsDocumentStore::new(&config.data_dir));
    let store = match StateStore::load(documents, config.document_paths()).await {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to initialize state: {}", e);
            return Err(anyhow::anyhow!("Cannot start without writable state: {}", e));
        }
    };

    let bot_manager = create_shared_bot_manager(create_shared_state_store(store), BotPolicy::default());

    web::start_web_server(&config, bot_manager).await?;

    Ok(())
}
