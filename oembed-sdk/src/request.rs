// ABOUTME: Request options and endpoint URL construction for resolved provider rules
// ABOUTME: Percent-encodes the target URL and appends size and extra query parameters

use std::collections::BTreeMap;

use typed_builder::TypedBuilder;
use url::form_urlencoded;

use crate::registry::Rule;

/// Per-call options for fetching embed information.
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct FetchOptions {
    /// The page URL to embed
    #[builder(setter(into))]
    pub url: String,

    #[builder(default, setter(strip_option))]
    pub max_width: Option<u32>,

    #[builder(default, setter(strip_option))]
    pub max_height: Option<u32>,

    #[builder(default, setter(strip_option, into))]
    pub accept_language: Option<String>,

    /// Additional provider-specific query parameters
    #[builder(default)]
    pub extra_params: BTreeMap<String, String>,
}

impl FetchOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self::builder().url(url).build()
    }
}

fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

impl Rule {
    /// Endpoint URL for `target`, before size and extra parameters are added.
    pub fn compose_url(&self, target: &str) -> String {
        if self.is_endpoint_complete() {
            return self.endpoint_url().to_string();
        }

        format!("{}{}", self.endpoint_url(), encode(target))
    }

    /// Full request URL for the given options.
    pub fn request_url(&self, options: &FetchOptions) -> String {
        let mut url = self.compose_url(&options.url);

        if let Some(width) = options.max_width.filter(|w| *w > 0) {
            url.push_str(&format!("&maxwidth={}", width));
        }

        if let Some(height) = options.max_height.filter(|h| *h > 0) {
            url.push_str(&format!("&maxheight={}", height));
        }

        for (key, value) in &options.extra_params {
            url.push_str(&format!("&{}={}", encode(key), encode(value)));
        }

        url
    }
}
