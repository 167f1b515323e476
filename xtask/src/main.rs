// ABOUTME: xtask binary for build automation and provider catalog management
// ABOUTME: Provides a command to download and refresh the public oEmbed provider list

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_CATALOG_URL: &str = "https://oembed.com/providers.json";
const DEFAULT_OUTPUT: &str = "data/providers.json";

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation tasks for oembed-rs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the latest oEmbed provider catalog
    Catalog {
        /// Catalog URL to download
        #[arg(long, default_value = DEFAULT_CATALOG_URL)]
        url: String,

        /// Where to write the pretty-printed catalog
        #[arg(long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Catalog { url, output } => {
            println!("Downloading oEmbed provider catalog from {}...", url);
            download_catalog(&url, &output)?;
        }
    }

    Ok(())
}

fn download_catalog(url: &str, output_path: &Path) -> Result<()> {
    let client = reqwest::blocking::Client::new();
    let response = client
        .get(url)
        .send()
        .context("Failed to request provider catalog")?;

    if !response.status().is_success() {
        anyhow::bail!("Failed to download catalog: {}", response.status());
    }

    let catalog: serde_json::Value = response
        .json()
        .context("Failed to parse catalog response")?;
    let formatted = format_catalog(&catalog)?;

    if let Some(output_dir) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(output_dir).context("Failed to create output directory")?;
    }

    fs::write(output_path, formatted).context("Failed to write catalog file")?;

    println!(
        "Catalog with {} providers written to {:?}",
        catalog.as_array().map_or(0, Vec::len),
        output_path
    );
    Ok(())
}

/// Pretty-print the catalog after checking it is a list of named providers
fn format_catalog(catalog: &serde_json::Value) -> Result<String> {
    let providers = catalog
        .as_array()
        .context("Catalog is not a JSON array of providers")?;

    if let Some(index) = providers
        .iter()
        .position(|p| p.get("provider_name").and_then(|n| n.as_str()).is_none())
    {
        anyhow::bail!("Catalog entry {} has no provider_name", index);
    }

    serde_json::to_string_pretty(catalog).context("Failed to format catalog")
}
