// ABOUTME: Builder pattern implementation for OembedClient configuration
// ABOUTME: Loads the provider catalog and wires up the default or a custom transport

use std::sync::Arc;
use std::time::Duration;

use typed_builder::TypedBuilder;

use crate::constants;
use crate::error::OembedError;
use crate::registry::{LoadPolicy, Registry};
use crate::transport::{ReqwestTransport, Transport};
use crate::OembedClient;

#[derive(TypedBuilder)]
#[builder(build_method(into = Result<OembedClient, OembedError>))]
pub struct OembedClientConfig {
    /// Raw provider catalog (a JSON array of providers)
    #[builder(setter(into))]
    pub catalog: Vec<u8>,

    #[builder(default)]
    pub load_policy: LoadPolicy,

    #[builder(default = constants::http::REQUEST_TIMEOUT)]
    pub timeout: Duration,

    #[builder(default = constants::http::USER_AGENT.to_string(), setter(into))]
    pub user_agent: String,

    /// Replaces the reqwest transport; `timeout` and `user_agent` are then unused
    #[builder(default, setter(strip_option))]
    pub transport: Option<Arc<dyn Transport>>,
}

impl From<OembedClientConfig> for Result<OembedClient, OembedError> {
    fn from(config: OembedClientConfig) -> Self {
        OembedClient::from_config(config)
    }
}

impl OembedClient {
    pub fn builder() -> OembedClientConfigBuilder<((), (), (), (), ())> {
        OembedClientConfig::builder()
    }

    pub fn from_config(config: OembedClientConfig) -> Result<Self, OembedError> {
        let registry = Registry::load_with_policy(config.catalog.as_slice(), config.load_policy)?;

        let transport: Arc<dyn Transport> = match config.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(config.timeout, &config.user_agent)?),
        };

        Ok(Self::new(registry, transport))
    }
}
