// ABOUTME: Provider registry compiling catalog endpoints into ordered matchable rules
// ABOUTME: Resolves target URLs to the first matching rule in catalog declaration order

use std::fmt;
use std::io::Read;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::catalog::{read_providers, Endpoint, Provider};
use crate::constants::endpoint;
use crate::error::OembedError;
use crate::pattern::SchemePattern;
use crate::Result;

/// What to do when a scheme in the catalog fails to compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// Abort the whole load on the first bad scheme
    #[default]
    Strict,
    /// Log and skip the offending rule
    Relaxed,
}

impl FromStr for LoadPolicy {
    type Err = OembedError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(LoadPolicy::Strict),
            "relaxed" => Ok(LoadPolicy::Relaxed),
            other => Err(OembedError::Configuration(format!(
                "Invalid load policy '{}'. Must be one of: strict, relaxed",
                other
            ))),
        }
    }
}

impl fmt::Display for LoadPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadPolicy::Strict => f.write_str("strict"),
            LoadPolicy::Relaxed => f.write_str("relaxed"),
        }
    }
}

/// One compiled scheme together with its endpoint and provider identity.
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: SchemePattern,
    endpoint_url: String,
    endpoint_complete: bool,
    provider_name: String,
    provider_url: String,
}

impl Rule {
    /// Build a rule for one scheme of a catalog endpoint.
    pub fn new(provider: &Provider, endpoint: &Endpoint, scheme: &str) -> Result<Self> {
        Ok(Self {
            pattern: SchemePattern::compile(scheme)?,
            endpoint_url: prepare_endpoint_url(&endpoint.url),
            endpoint_complete: false,
            provider_name: provider.name.clone(),
            provider_url: provider.url.clone(),
        })
    }

    /// Build a rule whose endpoint URL is already the complete request URL,
    /// for providers that answer the same document for every target.
    pub fn with_complete_endpoint(
        provider_name: impl Into<String>,
        provider_url: impl Into<String>,
        endpoint_url: impl Into<String>,
        scheme: &str,
    ) -> Result<Self> {
        Ok(Self {
            pattern: SchemePattern::compile(scheme)?,
            endpoint_url: endpoint_url.into(),
            endpoint_complete: true,
            provider_name: provider_name.into(),
            provider_url: provider_url.into(),
        })
    }

    /// Test a URL against this rule. Surrounding CR/LF is ignored.
    pub fn matches(&self, url: &str) -> bool {
        self.pattern.is_match(trim_line_endings(url))
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    pub fn is_endpoint_complete(&self) -> bool {
        self.endpoint_complete
    }

    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }

    pub fn provider_url(&self) -> &str {
        &self.provider_url
    }

    pub fn scheme(&self) -> &str {
        self.pattern.scheme()
    }

    pub fn pattern(&self) -> &SchemePattern {
        &self.pattern
    }
}

/// Turn a catalog endpoint URL into a template that only needs the encoded target appended.
pub fn prepare_endpoint_url(raw: &str) -> String {
    let mut url = raw
        .replace(endpoint::FORMAT_PLACEHOLDER, endpoint::FORMAT)
        .replace(endpoint::WILDCARD_ARTIFACT, "");

    if url.contains('?') {
        url.push_str(endpoint::QUERY_CONTINUE);
    } else {
        url.push_str(endpoint::QUERY_START);
    }

    url
}

fn trim_line_endings(url: &str) -> &str {
    url.trim_matches(|c| c == '\r' || c == '\n')
}

/// Ordered, read-only list of rules built from a provider catalog.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    rules: Vec<Rule>,
}

impl Registry {
    /// Load a catalog stream with the strict policy.
    pub fn load<R: Read>(reader: R) -> Result<Self> {
        Self::load_with_policy(reader, LoadPolicy::Strict)
    }

    pub fn load_with_policy<R: Read>(reader: R, policy: LoadPolicy) -> Result<Self> {
        let providers = read_providers(reader)?;
        Self::from_providers(&providers, policy)
    }

    /// Load catalog bytes with the strict policy.
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        Self::load(data)
    }

    /// Compile one rule per (endpoint, scheme) pair, preserving declaration order.
    pub fn from_providers(providers: &[Provider], policy: LoadPolicy) -> Result<Self> {
        let mut rules = Vec::new();
        let mut skipped = 0usize;

        for provider in providers {
            for endpoint in &provider.endpoints {
                for scheme in endpoint.effective_schemes(provider) {
                    match Rule::new(provider, endpoint, &scheme) {
                        Ok(rule) => rules.push(rule),
                        Err(error) if policy == LoadPolicy::Relaxed => {
                            warn!(
                                provider = %provider.name,
                                scheme = %scheme,
                                error = %error,
                                "Skipping provider scheme that failed to compile"
                            );
                            skipped += 1;
                        }
                        Err(error) => return Err(error),
                    }
                }
            }
        }

        debug!(
            providers = providers.len(),
            rules = rules.len(),
            skipped,
            policy = %policy,
            "Built oEmbed provider registry"
        );

        Ok(Self { rules })
    }

    /// First rule matching `url`, in catalog order.
    pub fn resolve(&self, url: &str) -> Option<&Rule> {
        let url = trim_line_endings(url);
        let rule = self.rules.iter().find(|rule| rule.pattern.is_match(url));

        match rule {
            Some(rule) => debug!(
                url = %url,
                provider = %rule.provider_name,
                scheme = %rule.scheme(),
                "Resolved oEmbed provider"
            ),
            None => debug!(url = %url, "No oEmbed provider matched"),
        }

        rule
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Distinct provider names in declaration order.
    pub fn providers(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for rule in &self.rules {
            if !names.contains(&rule.provider_name.as_str()) {
                names.push(&rule.provider_name);
            }
        }
        names
    }
}
