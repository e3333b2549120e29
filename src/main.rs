//! Gastoweb main entry point

use gastoweb_api::start_server;
use gastoweb_config::{Config, ConfigError};
use gastoweb_core::ExpenseBook;
use gastoweb_store::{FileKeyValueStore, MemoryKeyValueStore, StoreRef};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tokio::sync::RwLock;

#[derive(Parser, Debug)]
#[command(name = "gastoweb")]
#[command(version = "0.1.0")]
#[command(about = "A lightweight web interface for logging transportation expenses", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Keep everything in memory; nothing is written to the data directory
    #[arg(long)]
    ephemeral: bool,

    /// Print the default configuration file and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    // A missing file means defaults; a broken one is fatal
    let (config, missing) = match Config::load(&args.config) {
        Ok(config) => (config, false),
        Err(ConfigError::FileNotFound { .. }) => (Config::default(), true),
        Err(e) => {
            eprintln!("{}", e.to_details());
            return Err(e.into());
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.logging.level.as_str()))
        .init();

    if missing {
        log::warn!("Config file {} not found, using defaults", args.config.display());
    } else {
        log::info!("Config loaded from {}", args.config.display());
    }

    let store: StoreRef = if args.ephemeral {
        log::info!("Ephemeral mode: expenses are kept in memory only");
        Arc::new(MemoryKeyValueStore::new())
    } else {
        log::info!("Data directory: {}", config.data.path.display());
        Arc::new(FileKeyValueStore::new(config.data.path.clone()))
    };

    let rt = Runtime::new()?;
    rt.block_on(async {
        let book = ExpenseBook::hydrate(store, &config).await;
        let book = Arc::new(RwLock::new(book));
        start_server(config, book).await
    })?;

    Ok(())
}
