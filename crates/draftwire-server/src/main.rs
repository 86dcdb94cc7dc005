//! Draftwire server CLI
//!
//! Starts the HTTP server for row submission and review decisions,
//! plus the background recovery scan.

use draftwire_server::{config::AppConfig, start_server, ServerError};
use std::env;
use std::process;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();

    let config = if args.len() > 2 && args[1] == "--config" {
        // Load from specified config file
        let config_path = &args[2];
        AppConfig::from_file(config_path)?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        eprintln!("Error: no config file specified");
        eprintln!("Usage: draftwire-server --config <path-to-config.toml>");
        process::exit(2);
    };

    // Start the server
    start_server(config).await?;

    Ok(())
}

fn print_help() {
    println!("Draftwire Server - URL-to-post drafting with human approval");
    println!();
    println!("USAGE:");
    println!("    draftwire-server --config <path-to-config.toml>");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("EXAMPLE:");
    println!("    draftwire-server --config config/draftwire.toml");
    println!();
    println!("CONFIGURATION:");
    println!("    The TOML config file should contain:");
    println!("    - bind_address: IP address to bind (e.g., '127.0.0.1')");
    println!("    - bind_port: Port number (e.g., 8080)");
    println!("    - webhook_secret: Shared secret for the approval webhook");
    println!("    - openai_api_key: OpenAI API key");
    println!("    - telegram_bot_token: Telegram bot token");
    println!("    - telegram_chat_ids: Chat ids that review drafts");
    println!("    - db_path: Optional SQLite database path");
    println!("    - [pipeline]: rate_limit_ms, scan_interval_minutes");
    println!();
}
