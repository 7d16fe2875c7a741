//! Wordpool server binary
//!
//! Starts the HTTP game server.

use anyhow::Context;
use std::env;
use std::process;
use wordpool_server::{config::ServerConfig, start_server};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();

    let config = if args.len() > 2 && args[1] == "--config" {
        let config_path = &args[2];
        ServerConfig::from_file(config_path)
            .with_context(|| format!("loading config from {}", config_path))?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        eprintln!("Warning: No config file specified, using default configuration");
        eprintln!("Usage: wordpool-server --config <path-to-config.toml>");
        eprintln!();
        ServerConfig::default()
    };

    start_server(config).await.context("server failed")?;

    Ok(())
}

fn print_help() {
    println!("Wordpool Server - Word Puzzle Game");
    println!();
    println!("USAGE:");
    println!("    wordpool-server --config <path-to-config.toml>");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("EXAMPLE:");
    println!("    wordpool-server --config config/server.toml");
    println!();
    println!("CONFIGURATION:");
    println!("    The TOML config file may contain:");
    println!("    - bind_address: IP address to bind (default: '127.0.0.1')");
    println!("    - bind_port: Port number (default: 8080)");
    println!("    - database_path: SQLite file, or ':memory:' (default: 'wordpool.db')");
    println!("    - dictionary_path: JSON word list (default: 'data/words.json')");
    println!("    - leaderboard_cache_ttl_secs: Leaderboard cache lifetime (default: 60)");
    println!("    - log_level: Log filter, overridden by RUST_LOG (default: 'info')");
}
