// ABOUTME: CLI argument definitions for the oEmbed CLI application
// ABOUTME: Defines the command-line interface structure using clap derive macros

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "oembed")]
#[command(about = "Resolve URLs to oEmbed providers and fetch embed metadata", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Provider catalog file (providers.json format)
    #[arg(long, global = true, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable verbose output for debugging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show which provider handles a URL and the request that would be sent
    Resolve {
        /// Page URL to look up
        url: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Pretty print JSON output
        #[arg(long, requires = "json")]
        pretty: bool,
    },
    /// Fetch embed information for a URL
    Fetch {
        /// Page URL to embed
        url: String,

        /// Maximum embed width in pixels
        #[arg(long, value_name = "PIXELS", value_parser = clap::value_parser!(u32).range(1..))]
        max_width: Option<u32>,

        /// Maximum embed height in pixels
        #[arg(long, value_name = "PIXELS", value_parser = clap::value_parser!(u32).range(1..))]
        max_height: Option<u32>,

        /// Accept-Language header sent to the provider (e.g., en-US)
        #[arg(long, value_name = "LANG")]
        lang: Option<String>,

        /// Extra query parameter for the provider, may be repeated
        #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        params: Vec<(String, String)>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Pretty print JSON output
        #[arg(long, requires = "json")]
        pretty: bool,
    },
    /// List the providers in the catalog
    Providers {
        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Pretty print JSON output
        #[arg(long, requires = "json")]
        pretty: bool,
    },
    /// Normalize a saved oEmbed response (reads stdin without FILE)
    Normalize {
        /// File containing the provider's JSON response
        file: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Pretty print JSON output
        #[arg(long, requires = "json")]
        pretty: bool,
    },
}

/// Parse a `KEY=VALUE` pair. The value may itself contain `=`.
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;

    if key.trim().is_empty() {
        return Err(format!("missing parameter name in '{}'", s));
    }

    Ok((key.trim().to_string(), value.to_string()))
}
