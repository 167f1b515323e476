// ABOUTME: Custom error types for the oEmbed SDK with user-friendly messages
// ABOUTME: Separates catalog, pattern, transport, and response body failure modes

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OembedError {
    #[error("Invalid provider catalog: {0}")]
    CatalogParse(String),

    #[error("Invalid scheme pattern '{scheme}': {reason}")]
    PatternCompile { scheme: String, reason: String },

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Timeout: Request took too long to complete")]
    Timeout,

    #[error("Invalid oEmbed response body: {0}")]
    BodyParse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl OembedError {
    pub fn help_text(&self) -> Option<&'static str> {
        match self {
            OembedError::CatalogParse(_) => {
                Some("The catalog must be a JSON array of providers (see https://oembed.com/providers.json)")
            }
            OembedError::PatternCompile { .. } => {
                Some("Fix or remove the scheme, or load the catalog with the relaxed policy")
            }
            OembedError::Transport(_) => Some("Check your internet connection and try again"),
            OembedError::Timeout => Some("Try again or raise the request timeout"),
            OembedError::BodyParse(_) => {
                Some("The provider did not return a JSON oEmbed document")
            }
            _ => None,
        }
    }

    /// Whether a caller may reasonably try the same request again.
    /// The SDK itself never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self, OembedError::Transport(_) | OembedError::Timeout)
    }
}

impl From<reqwest::Error> for OembedError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            OembedError::Timeout
        } else if err.is_builder() {
            OembedError::Configuration(err.to_string())
        } else {
            OembedError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for OembedError {
    fn from(err: serde_json::Error) -> Self {
        OembedError::BodyParse(err.to_string())
    }
}
