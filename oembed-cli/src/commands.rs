// ABOUTME: Command implementations shared by the binary and integration tests
// ABOUTME: Loads catalogs, resolves URLs, fetches embeds, and normalizes saved responses

use anyhow::{bail, Context, Result};
use oembed_sdk::constants::http::SUCCESS_STATUS;
use oembed_sdk::{FetchOptions, Info, LoadPolicy, OembedClient, Registry, Rule};
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Which provider handles a URL and the request that would be sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub provider_name: String,
    pub provider_url: String,
    pub scheme: String,
    pub endpoint_url: String,
    pub request_url: String,
}

impl Resolution {
    pub fn new(rule: &Rule, options: &FetchOptions) -> Self {
        Self {
            provider_name: rule.provider_name().to_string(),
            provider_url: rule.provider_url().to_string(),
            scheme: rule.scheme().to_string(),
            endpoint_url: rule.endpoint_url().to_string(),
            request_url: rule.request_url(options),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderSummary {
    pub name: String,
    pub url: String,
    pub rules: usize,
}

pub fn load_registry(path: &Path, policy: LoadPolicy) -> Result<Registry> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open provider catalog: {}", path.display()))?;

    let registry = Registry::load_with_policy(BufReader::new(file), policy)
        .with_context(|| format!("Failed to load provider catalog: {}", path.display()))?;

    log::debug!(
        "Loaded {} rules for {} providers from {}",
        registry.len(),
        registry.providers().len(),
        path.display()
    );
    Ok(registry)
}

pub fn resolve(registry: &Registry, options: &FetchOptions) -> Option<Resolution> {
    registry
        .resolve(&options.url)
        .map(|rule| Resolution::new(rule, options))
}

/// One entry per provider in catalog order, counting its compiled rules.
pub fn provider_summaries(registry: &Registry) -> Vec<ProviderSummary> {
    let mut summaries: Vec<ProviderSummary> = Vec::new();

    for rule in registry.rules() {
        match summaries
            .iter_mut()
            .find(|s| s.name == rule.provider_name())
        {
            Some(summary) => summary.rules += 1,
            None => summaries.push(ProviderSummary {
                name: rule.provider_name().to_string(),
                url: rule.provider_url().to_string(),
                rules: 1,
            }),
        }
    }

    summaries
}

/// Fetch embed information; a provider error status becomes an error.
pub async fn fetch(client: &OembedClient, options: &FetchOptions) -> Result<Option<Info>> {
    match client.fetch(options).await? {
        Some(info) if info.is_error() => {
            bail!("Provider responded with HTTP status {}", info.status)
        }
        other => Ok(other),
    }
}

/// Normalize a provider response that has already been downloaded.
pub fn normalize<R: Read>(reader: R) -> Result<Info> {
    Info::from_reader(SUCCESS_STATUS, reader).context("Failed to normalize oEmbed response")
}

/// Normalize the response stored in `path`, or read stdin when no path is given.
pub fn normalize_file(path: Option<&Path>) -> Result<Info> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open response file: {}", path.display()))?;
            normalize(BufReader::new(file))
        }
        None => normalize(std::io::stdin().lock()),
    }
}
