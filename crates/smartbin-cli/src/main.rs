//! smartbin CLI: command-line client for the smartbin API.
//!
//! Set SMARTBIN_API_URL (or API_URL); defaults to http://localhost:4000.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use smartbin_cli::{batch, init_tracing, ApiClient};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "smartbin", about = "Smart bin API CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bin operations
    Bins {
        #[command(subcommand)]
        sub: BinCommands,
    },
    /// Upload a video to a bin
    Upload {
        /// Bin UUID
        bin_id: Uuid,
        /// Path to the video file
        file: PathBuf,
    },
    /// List the videos of a bin
    Assets {
        /// Bin UUID
        bin_id: Uuid,
    },
    /// Delete a video by ID
    DeleteAsset {
        /// Asset UUID
        asset_id: Uuid,
    },
    /// Download every video of a bin, one per second
    DownloadAll {
        /// Bin UUID
        bin_id: Uuid,
        /// Output directory
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Waste entry operations
    Waste {
        #[command(subcommand)]
        sub: WasteCommands,
    },
}

#[derive(Subcommand)]
enum BinCommands {
    /// Register a new bin
    Create {
        /// Bin name (1-60 characters, unique)
        name: String,
    },
    /// List all bins
    List,
}

#[derive(Subcommand)]
enum WasteCommands {
    /// List waste entries, newest first
    List,
    /// Record a waste image
    Upload {
        /// Path to the image
        file: PathBuf,
        /// Reported waste type
        #[arg(long = "type")]
        waste_type: String,
        /// Bin location
        #[arg(long)]
        location: String,
    },
    /// Set the category of an entry
    Categorize {
        /// Waste entry UUID
        id: Uuid,
        /// biodegradable, recyclable or miscellaneous
        category: String,
    },
    /// Delete an entry and its image
    Delete {
        /// Waste entry UUID
        id: Uuid,
        /// Expected storage id of the image
        #[arg(long)]
        storage_id: Option<String>,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let client = ApiClient::from_env().context("Failed to create API client")?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Bins { sub } => match sub {
            BinCommands::Create { name } => print_json(&client.create_bin(&name).await?)?,
            BinCommands::List => print_json(&client.list_bins().await?)?,
        },
        Commands::Upload { bin_id, file } => {
            print_json(&client.upload_video(bin_id, &file).await?)?;
        }
        Commands::Assets { bin_id } => print_json(&client.list_assets(bin_id).await?)?,
        Commands::DeleteAsset { asset_id } => {
            print_json(&client.delete_asset(asset_id).await?)?;
        }
        Commands::DownloadAll { bin_id, out } => {
            let listing = client.list_assets(bin_id).await?;
            if listing.assets.is_empty() {
                tracing::info!(bin_id = %bin_id, "No videos found for bin");
            }
            let urls: Vec<String> = listing
                .assets
                .into_iter()
                .map(|a| a.download_url)
                .collect();
            let schedule = batch::plan(&urls);
            tracing::info!(
                count = schedule.len(),
                span_ms = batch::schedule_span(&schedule).as_millis() as u64,
                "Starting batch download"
            );
            let report = batch::run(&client, bin_id, &schedule, &out).await?;
            print_json(&report)?;
        }
        Commands::Waste { sub } => match sub {
            WasteCommands::List => print_json(&client.list_waste().await?)?,
            WasteCommands::Upload {
                file,
                waste_type,
                location,
            } => print_json(&client.upload_waste(&file, &waste_type, &location).await?)?,
            WasteCommands::Categorize { id, category } => {
                print_json(&client.categorize_waste(id, &category).await?)?;
            }
            WasteCommands::Delete { id, storage_id } => {
                print_json(&client.delete_waste(id, storage_id.as_deref()).await?)?;
            }
        },
    }

    Ok(())
}
