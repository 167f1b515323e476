// ABOUTME: HTTP transport contract used by the fetch orchestrator plus a reqwest implementation
// ABOUTME: Returns status and a streamed body so callers can cap how much is read

use std::fmt;
use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::{self, Stream, StreamExt};
use http::HeaderMap;

use crate::constants;
use crate::error::OembedError;
use crate::Result;

/// Response body as a stream of byte chunks.
pub type BodyStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Status line and body of a completed HTTP exchange.
pub struct TransportResponse {
    pub status: u16,
    pub body: BodyStream,
}

impl TransportResponse {
    pub fn new(status: u16, body: BodyStream) -> Self {
        Self { status, body }
    }

    /// Response with the whole body available as one chunk.
    pub fn from_bytes(status: u16, body: impl Into<Bytes>) -> Self {
        let chunk: Result<Bytes> = Ok(body.into());
        Self::new(status, Box::pin(stream::iter(vec![chunk])))
    }
}

impl fmt::Debug for TransportResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Performs a GET request. Connection pooling, timeouts and cancellation are
/// the implementation's responsibility.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str, headers: HeaderMap) -> Result<TransportResponse>;
}

/// Default transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(constants::http::REQUEST_TIMEOUT, constants::http::USER_AGENT)
    }

    /// Wrap an already configured client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str, headers: HeaderMap) -> Result<TransportResponse> {
        let response = self.client.get(url).headers(headers).send().await?;
        let status = response.status().as_u16();
        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(OembedError::from));

        Ok(TransportResponse::new(status, Box::pin(body)))
    }
}

/// Read at most `limit` bytes from `body`; anything past the limit is dropped unread.
pub async fn read_body_capped(mut body: BodyStream, limit: usize) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();

    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        let remaining = limit - bytes.len();

        if chunk.len() >= remaining {
            bytes.extend_from_slice(&chunk[..remaining]);
            break;
        }

        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
