//! PinBridge CLI - command-line client for the PinBridge API.
//!
//! Set PINBRIDGE_API_URL (or API_URL); defaults to http://localhost:5000.

use anyhow::Context;
use clap::{Parser, Subcommand};
use pinbridge_api_client::{content_type_for, ApiClient, ALLOWED_EXTENSIONS};
use pinbridge_cli::{display_name, init_tracing};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "pinbridge", about = "PinBridge API CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload one file (jpg, jpeg, png or pdf) and print its gateway URL
    Upload {
        /// Path to the file to upload
        file: std::path::PathBuf,
    },
    /// Check the server is up
    Health,
    /// List the server's staging area
    Files,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let client = ApiClient::from_env().context("Failed to create API client")?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Upload { file } => {
            if content_type_for(&file).is_none() {
                anyhow::bail!(
                    "Unsupported file type: {} (allowed: {})",
                    file.display(),
                    ALLOWED_EXTENSIONS.join(", ")
                );
            }

            println!("Uploading {}...", display_name(&file));
            tracing::debug!(base_url = %client.base_url(), path = %file.display(), "Uploading");

            let response = client.upload_file(&file).await?;
            println!("{}", response.url);
        }
        Commands::Health => {
            let response = client.health().await?;
            print_json(&response)?;
        }
        Commands::Files => {
            let response = client.list_files().await?;
            print_json(&response)?;
        }
    }

    Ok(())
}
