// ABOUTME: This module handles output formatting for the oEmbed CLI
// ABOUTME: It provides key/value table formatting with color support and JSON output

use anyhow::Result;
use oembed_sdk::Info;
use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::commands::{ProviderSummary, Resolution};
use crate::constants::ui;

pub trait OutputFormat {
    fn format_info(&self, info: &Info) -> Result<String>;
    fn format_resolution(&self, resolution: &Resolution) -> Result<String>;
    fn format_providers(&self, providers: &[ProviderSummary]) -> Result<String>;
}

/// Pick the formatter for the `--json` / `--pretty` flags.
pub fn formatter(json: bool, pretty: bool, use_color: bool) -> Box<dyn OutputFormat> {
    if json {
        Box::new(JsonFormatter::new(pretty))
    } else {
        Box::new(TableFormatter::new(use_color))
    }
}

pub struct TableFormatter {
    use_color: bool,
}

impl TableFormatter {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    /// Shorten to `max_chars` characters, flattening line breaks.
    fn truncate(text: &str, max_chars: usize) -> String {
        let flat = text.replace(['\r', '\n'], " ");
        if flat.chars().count() <= max_chars {
            flat
        } else {
            let kept: String = flat.chars().take(max_chars - 3).collect();
            format!("{}...", kept)
        }
    }

    fn format_field(&self, name: &str) -> String {
        if self.use_color {
            name.bold().to_string()
        } else {
            name.to_string()
        }
    }

    fn format_kind(&self, kind: &str) -> String {
        if !self.use_color {
            return kind.to_string();
        }

        match kind {
            "video" => kind.magenta().to_string(),
            "photo" => kind.green().to_string(),
            "rich" => kind.cyan().to_string(),
            _ => kind.dimmed().to_string(),
        }
    }

    fn format_url(&self, url: &str) -> String {
        let url = Self::truncate(url, ui::MAX_CELL_CHARS);
        if self.use_color {
            url.blue().to_string()
        } else {
            url
        }
    }

    fn key_value_table(&self, rows: Vec<(&str, String)>) -> String {
        let rows: Vec<FieldRow> = rows
            .into_iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(field, value)| FieldRow {
                field: self.format_field(field),
                value,
            })
            .collect();

        let mut table = Table::new(rows);
        table.with(Style::psql());
        table.to_string()
    }
}

fn dimensions(width: u64, height: u64) -> String {
    if width == 0 && height == 0 {
        String::new()
    } else {
        format!("{}x{}", width, height)
    }
}

pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn render<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }
}

impl OutputFormat for JsonFormatter {
    fn format_info(&self, info: &Info) -> Result<String> {
        self.render(info)
    }

    fn format_resolution(&self, resolution: &Resolution) -> Result<String> {
        self.render(resolution)
    }

    fn format_providers(&self, providers: &[ProviderSummary]) -> Result<String> {
        self.render(providers)
    }
}

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct ProviderRow {
    #[tabled(rename = "Provider")]
    name: String,
    #[tabled(rename = "URL")]
    url: String,
    #[tabled(rename = "Rules")]
    rules: usize,
}

impl OutputFormat for TableFormatter {
    fn format_info(&self, info: &Info) -> Result<String> {
        let cache_age = if info.cache_age > 0 {
            format!("{}s", info.cache_age)
        } else {
            String::new()
        };

        Ok(self.key_value_table(vec![
            ("Type", self.format_kind(&info.kind)),
            ("Title", Self::truncate(&info.title, ui::MAX_CELL_CHARS)),
            ("URL", self.format_url(&info.url)),
            ("Provider", info.provider_name.clone()),
            ("Provider URL", self.format_url(&info.provider_url)),
            ("Author", info.author_name.clone()),
            ("Author URL", self.format_url(&info.author_url)),
            (
                "Description",
                Self::truncate(&info.description, ui::MAX_CELL_CHARS),
            ),
            ("Size", dimensions(info.width, info.height)),
            ("Thumbnail", self.format_url(&info.thumbnail_url)),
            (
                "Thumbnail size",
                dimensions(info.thumbnail_width, info.thumbnail_height),
            ),
            ("Cache age", cache_age),
            ("HTML", Self::truncate(&info.html, ui::HTML_PREVIEW_CHARS)),
        ]))
    }

    fn format_resolution(&self, resolution: &Resolution) -> Result<String> {
        Ok(self.key_value_table(vec![
            ("Provider", resolution.provider_name.clone()),
            ("Provider URL", self.format_url(&resolution.provider_url)),
            ("Scheme", resolution.scheme.clone()),
            ("Endpoint", self.format_url(&resolution.endpoint_url)),
            ("Request", resolution.request_url.clone()),
        ]))
    }

    fn format_providers(&self, providers: &[ProviderSummary]) -> Result<String> {
        let rows: Vec<ProviderRow> = providers
            .iter()
            .map(|provider| ProviderRow {
                name: provider.name.clone(),
                url: self.format_url(&provider.url),
                rules: provider.rules,
            })
            .collect();

        let mut table = Table::new(rows);
        table.with(Style::psql());
        Ok(table.to_string())
    }
}
