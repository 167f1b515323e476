// ABOUTME: Centralized constants for the oEmbed CLI
// ABOUTME: Config file locations, display limits, and terminal environment names

/// Config file discovery
pub mod paths {
    /// Directory under the user config home
    pub const APP_DIR: &str = "oembed";

    /// File name inside the app directory
    pub const CONFIG_FILE: &str = "config.toml";

    /// Per-project config in the working directory
    pub const PROJECT_CONFIG_FILE: &str = "oembed.toml";
}

/// HTTP identity of the CLI
pub mod http {
    pub const USER_AGENT: &str = concat!("oembed-cli/", env!("CARGO_PKG_VERSION"));
}

/// UI and formatting constants
pub mod ui {
    /// Longest value shown in a table cell before truncation
    pub const MAX_CELL_CHARS: usize = 72;

    /// Embed HTML is usually long, so it gets a shorter preview
    pub const HTML_PREVIEW_CHARS: usize = 60;
}

/// Terminal environment
pub mod env {
    pub const NO_COLOR: &str = "NO_COLOR";
    pub const TERM: &str = "TERM";
    pub const DUMB_TERM: &str = "dumb";
}

pub mod exit {
    pub const FAILURE: i32 = 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(paths::APP_DIR, "oembed");
        assert!(paths::CONFIG_FILE.ends_with(".toml"));
        assert!(paths::PROJECT_CONFIG_FILE.ends_with(".toml"));
    }

    #[test]
    fn test_user_agent() {
        assert!(http::USER_AGENT.starts_with("oembed-cli/"));
        assert!(!http::USER_AGENT.ends_with('/'));
    }

    #[test]
    fn test_ui_limits() {
        assert!(ui::HTML_PREVIEW_CHARS < ui::MAX_CELL_CHARS);
        assert!(ui::HTML_PREVIEW_CHARS > 3);
    }
}
