// ABOUTME: Provider catalog types deserialized from the oEmbed providers.json format
// ABOUTME: Parses a JSON array of providers and synthesizes default endpoint schemes

use serde::{Deserialize, Serialize};
use std::io::Read;

use crate::error::OembedError;
use crate::Result;

/// A named service exposing one or more oEmbed endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    #[serde(rename = "provider_name")]
    pub name: String,
    #[serde(rename = "provider_url")]
    pub url: String,
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

/// One endpoint URL template and the schemes it serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub url: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schemes: Vec<String>,
    /// Whether the provider advertises the endpoint via HTML discovery links
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub discovery: bool,
}

impl Provider {
    /// Fallback scheme for endpoints that declare none: the home URL plus `/*`.
    pub fn default_scheme(&self) -> String {
        format!("{}/*", self.url.trim_end_matches('/'))
    }
}

impl Endpoint {
    /// The endpoint's schemes, or the provider's default scheme when none are declared.
    pub fn effective_schemes(&self, provider: &Provider) -> Vec<String> {
        if self.schemes.is_empty() {
            vec![provider.default_scheme()]
        } else {
            self.schemes.clone()
        }
    }
}

/// Parse a catalog from raw bytes.
pub fn parse_providers(data: &[u8]) -> Result<Vec<Provider>> {
    serde_json::from_slice(data).map_err(|e| OembedError::CatalogParse(e.to_string()))
}

/// Parse a catalog from a byte stream.
pub fn read_providers<R: Read>(mut reader: R) -> Result<Vec<Provider>> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    parse_providers(&data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::sample_catalog;

    #[test]
    fn test_parse_sample_catalog() {
        let providers = parse_providers(sample_catalog().as_bytes()).unwrap();

        assert_eq!(providers.len(), 3);
        assert_eq!(providers[0].name, "VideoHub");
        assert_eq!(providers[0].url, "https://videohub.example");
        assert_eq!(providers[0].endpoints[0].schemes.len(), 2);
        assert!(providers[0].endpoints[0].discovery);
        assert!(providers[2].endpoints[0].schemes.is_empty());
    }

    #[test]
    fn test_default_scheme_strips_trailing_slash() {
        let provider = Provider {
            name: "P".to_string(),
            url: "https://p.com/".to_string(),
            endpoints: vec![],
        };
        assert_eq!(provider.default_scheme(), "https://p.com/*");

        let provider = Provider {
            url: "https://p.com".to_string(),
            ..provider
        };
        assert_eq!(provider.default_scheme(), "https://p.com/*");
    }

    #[test]
    fn test_effective_schemes() {
        let provider = Provider {
            name: "P".to_string(),
            url: "https://p.com/".to_string(),
            endpoints: vec![],
        };
        let bare = Endpoint {
            url: "https://p.com/oembed".to_string(),
            schemes: vec![],
            discovery: false,
        };
        assert_eq!(bare.effective_schemes(&provider), vec!["https://p.com/*"]);

        let declared = Endpoint {
            schemes: vec!["https://p.com/v/*".to_string()],
            ..bare
        };
        assert_eq!(declared.effective_schemes(&provider), vec!["https://p.com/v/*"]);
    }

    #[test]
    fn test_malformed_catalog() {
        let result = parse_providers(b"{\"provider_name\": \"not an array\"}");
        assert!(matches!(result, Err(OembedError::CatalogParse(_))));

        let result = parse_providers(b"[{\"provider_name\": ");
        assert!(matches!(result, Err(OembedError::CatalogParse(_))));
    }

    #[test]
    fn test_read_providers_from_stream() {
        let providers = read_providers(std::io::Cursor::new(sample_catalog())).unwrap();
        assert_eq!(providers[1].name, "PhotoShare");
    }
}
