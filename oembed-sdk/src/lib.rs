// ABOUTME: oEmbed SDK resolving page URLs to provider endpoints and normalizing responses
// ABOUTME: Exposes the pattern compiler, provider registry, fetch pipeline, and client facade

use std::sync::Arc;

use tracing::debug;

pub mod builder;
pub mod catalog;
pub mod constants;
pub mod error;
pub mod fetch;
pub mod info;
pub mod pattern;
pub mod registry;
pub mod request;
pub mod transport;

mod test_helpers;

pub use builder::OembedClientConfig;
pub use catalog::{Endpoint, Provider};
pub use error::OembedError;
pub use fetch::fetch;
pub use info::Info;
pub use pattern::SchemePattern;
pub use registry::{LoadPolicy, Registry, Rule};
pub use request::FetchOptions;
pub use transport::{BodyStream, ReqwestTransport, Transport, TransportResponse};

pub type Result<T> = std::result::Result<T, OembedError>;

/// Registry plus transport, shareable across tasks.
#[derive(Clone)]
pub struct OembedClient {
    registry: Arc<Registry>,
    transport: Arc<dyn Transport>,
}

impl OembedClient {
    pub fn new(registry: Registry, transport: Arc<dyn Transport>) -> Self {
        Self {
            registry: Arc::new(registry),
            transport,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn resolve(&self, url: &str) -> Option<&Rule> {
        self.registry.resolve(url)
    }

    /// Resolve `options.url` and fetch its embed information.
    /// Returns `Ok(None)` when no provider handles the URL.
    pub async fn fetch(&self, options: &FetchOptions) -> Result<Option<Info>> {
        let Some(rule) = self.registry.resolve(&options.url) else {
            return Ok(None);
        };

        fetch::fetch(rule, options, self.transport.as_ref())
            .await
            .map(Some)
    }

    /// Like [`OembedClient::fetch`], then fills gaps in a successful result from `base`.
    pub async fn fetch_with_fallback(
        &self,
        options: &FetchOptions,
        base: &Info,
    ) -> Result<Option<Info>> {
        let mut info = match self.fetch(options).await? {
            Some(info) => info,
            None => return Ok(None),
        };

        if !info.is_error() {
            debug!(url = %options.url, "Merging fallback embed information");
            info.merge_with(base);
        }

        Ok(Some(info))
    }
}
