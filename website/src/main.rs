mod config;
mod ctx;
mod error;
mod models;
mod run;
mod services;
mod web;

use clap::Parser;
use std::process;
use tracing::info;

use config::Config;

// Re-exports
pub use error::{Error, Result};

use crate::run::run;

/// Sign-in portal for the authentication service
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Port to listen on, overrides PORT
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();

    if dotenvy::dotenv().is_err() {
        info!("No .env file found, using existing environment variables instead.");
    }

    let mut config = match Config::build() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            process::exit(1);
        }
    };

    if let Some(port) = args.port {
        config.server.port = port;
    }

    if let Err(e) = run(config).await {
        eprintln!("Application error: {e}");
        process::exit(1);
    }
}
