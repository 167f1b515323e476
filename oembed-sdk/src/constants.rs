// ABOUTME: Centralized constants for the oEmbed SDK
// ABOUTME: Contains body limits, endpoint query fragments, and HTTP defaults

/// Response body limits
pub mod limits {
    /// Maximum number of response body bytes read from a provider
    pub const MAX_BODY_BYTES: usize = 40_000;

    /// Upper bound for a single compiled scheme regex
    pub const PATTERN_SIZE_LIMIT: usize = 1 << 20;
}

/// Endpoint template handling
pub mod endpoint {
    /// Placeholder some providers put in their endpoint URL
    pub const FORMAT_PLACEHOLDER: &str = "{format}";

    /// Only JSON responses are requested
    pub const FORMAT: &str = "json";

    /// Wildcard artifact embedded directly in some endpoint URLs
    pub const WILDCARD_ARTIFACT: &str = "/*";

    /// Query suffix appended when the template has no query string yet
    pub const QUERY_START: &str = "?format=json&url=";

    /// Query suffix appended when the template already has a query string
    pub const QUERY_CONTINUE: &str = "&format=json&url=";
}

/// HTTP defaults for the bundled transport
pub mod http {
    use std::time::Duration;

    /// Default timeout for provider requests
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

    /// Default User-Agent header
    pub const USER_AGENT: &str = concat!("oembed-sdk/", env!("CARGO_PKG_VERSION"));

    /// The only status code treated as success
    pub const SUCCESS_STATUS: u16 = 200;
}
