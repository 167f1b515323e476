// ABOUTME: Main entry point for the oEmbed CLI application
// ABOUTME: Resolves URLs against a provider catalog and prints normalized embed metadata

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;

use oembed_cli::cli::{Cli, Commands};
use oembed_cli::cli_output::{should_use_color, CliOutput};
use oembed_cli::commands;
use oembed_cli::config::{Config, FetchOverrides};
use oembed_cli::constants::{exit, http};
use oembed_cli::output::formatter;
use oembed_sdk::{OembedClient, ReqwestTransport};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output = if cli.no_color {
        CliOutput::with_color(false)
    } else {
        CliOutput::new()
    };

    if let Err(error) = run(cli).await {
        output.report_error(&error);
        std::process::exit(exit::FAILURE);
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let Cli {
        catalog,
        no_color,
        command,
        ..
    } = cli;

    let config = Config::load()?;
    let use_color = should_use_color(no_color);

    match command {
        Commands::Resolve { url, json, pretty } => {
            let registry =
                commands::load_registry(&config.catalog_path(catalog)?, config.load_policy())?;
            let options = config.fetch_options(&url, FetchOverrides::default());

            match commands::resolve(&registry, &options) {
                Some(resolution) => {
                    let formatter = formatter(json, pretty, use_color);
                    println!("{}", formatter.format_resolution(&resolution)?);
                }
                None => println!("No provider found for {}", url),
            }
        }
        Commands::Fetch {
            url,
            max_width,
            max_height,
            lang,
            params,
            json,
            pretty,
        } => {
            let registry =
                commands::load_registry(&config.catalog_path(catalog)?, config.load_policy())?;
            let transport = ReqwestTransport::new(config.timeout(), http::USER_AGENT)?;
            let client = OembedClient::new(registry, Arc::new(transport));

            let options = config.fetch_options(
                &url,
                FetchOverrides {
                    max_width,
                    max_height,
                    accept_language: lang,
                    params,
                },
            );

            match commands::fetch(&client, &options).await? {
                Some(info) => {
                    let formatter = formatter(json, pretty, use_color);
                    println!("{}", formatter.format_info(&info)?);
                }
                None => println!("No provider found for {}", url),
            }
        }
        Commands::Providers { json, pretty } => {
            let registry =
                commands::load_registry(&config.catalog_path(catalog)?, config.load_policy())?;
            let providers = commands::provider_summaries(&registry);

            if providers.is_empty() && !json {
                println!("No providers found.");
            } else {
                let formatter = formatter(json, pretty, use_color);
                println!("{}", formatter.format_providers(&providers)?);
            }
        }
        Commands::Normalize { file, json, pretty } => {
            let info = commands::normalize_file(file.as_deref())?;
            let formatter = formatter(json, pretty, use_color);
            println!("{}", formatter.format_info(&info)?);
        }
    }

    Ok(())
}
