// ABOUTME: Fetch orchestration combining request URL building, transport, and normalization
// ABOUTME: Issues one GET per call and attaches provider identity to successful responses

use http::header::{HeaderValue, ACCEPT_LANGUAGE};
use http::HeaderMap;
use tracing::{debug, instrument, warn};

use crate::constants;
use crate::error::OembedError;
use crate::info::Info;
use crate::registry::Rule;
use crate::request::FetchOptions;
use crate::transport::Transport;
use crate::Result;

/// Fetch and normalize embed information for `options.url` from the rule's endpoint.
///
/// Transport failures are returned as errors. A provider answering with any
/// status other than 200 yields `Ok` with only [`Info::status`] set.
#[instrument(
    skip(rule, options, transport),
    fields(provider = %rule.provider_name(), target = %options.url)
)]
pub async fn fetch<T>(rule: &Rule, options: &FetchOptions, transport: &T) -> Result<Info>
where
    T: Transport + ?Sized,
{
    let request_url = rule.request_url(options);
    let headers = request_headers(options)?;

    debug!(url = %request_url, "Requesting oEmbed endpoint");
    let response = transport.get(&request_url, headers).await?;
    let status = response.status;

    let mut info = Info::from_response(status, response.body).await?;

    if status != constants::http::SUCCESS_STATUS {
        warn!(status, "oEmbed endpoint returned an error status");
        return Ok(info);
    }

    info.finalize(&options.url, rule);
    Ok(info)
}

fn request_headers(options: &FetchOptions) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    if let Some(language) = options.accept_language.as_deref().filter(|l| !l.is_empty()) {
        let value = HeaderValue::from_str(language).map_err(|e| {
            OembedError::Configuration(format!("Invalid Accept-Language value: {}", e))
        })?;
        headers.insert(ACCEPT_LANGUAGE, value);
    }

    Ok(headers)
}
