// ABOUTME: Normalized oEmbed record and tolerant decoding of provider JSON payloads
// ABOUTME: Coerces type-inconsistent fields per field and merges partial records with fallbacks

use std::fmt;
use std::io::Read;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::constants::{http, limits};
use crate::error::OembedError;
use crate::registry::Rule;
use crate::transport::{read_body_capped, BodyStream};
use crate::Result;

/// Embed information for one URL, normalized across providers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Info {
    /// HTTP status of a failed provider response; zero on success
    #[serde(skip_serializing_if = "is_zero_status")]
    pub status: u16,
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    pub provider_url: String,
    pub provider_name: String,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub author_name: String,
    pub author_url: String,
    pub html: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub cache_age: u64,
    #[serde(skip_serializing_if = "is_zero")]
    pub width: u64,
    #[serde(skip_serializing_if = "is_zero")]
    pub height: u64,
    #[serde(skip_serializing_if = "is_zero")]
    pub thumbnail_width: u64,
    #[serde(skip_serializing_if = "is_zero")]
    pub thumbnail_height: u64,
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}

fn is_zero_status(value: &u16) -> bool {
    *value == 0
}

/// One JSON field after tag inspection.
enum FieldValue<'a> {
    Missing,
    Text(&'a str),
    Integer(u64),
    Other,
}

impl<'a> FieldValue<'a> {
    fn of(fields: &'a Map<String, Value>, key: &str) -> Self {
        match fields.get(key) {
            None | Some(Value::Null) => FieldValue::Missing,
            Some(Value::String(text)) => FieldValue::Text(text),
            Some(Value::Number(number)) => match number.as_u64() {
                Some(n) => FieldValue::Integer(n),
                None => FieldValue::Other,
            },
            Some(_) => FieldValue::Other,
        }
    }

    fn into_string(self) -> Option<String> {
        match self {
            FieldValue::Text(text) => Some(text.to_string()),
            _ => None,
        }
    }

    /// Integers, or strings holding a non-negative integer.
    fn into_unsigned(self) -> u64 {
        match self {
            FieldValue::Integer(n) => n,
            FieldValue::Text(text) => text.trim().parse().unwrap_or_default(),
            _ => 0,
        }
    }
}

impl Info {
    pub fn new() -> Self {
        Self::default()
    }

    /// A record carrying only a failed response status.
    pub fn with_status(status: u16) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    /// True when this record came from a non-200 provider response.
    pub fn is_error(&self) -> bool {
        self.status != 0
    }

    /// Decode an oEmbed JSON document. Fields with unexpected types fall back to defaults.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let document: Value = serde_json::from_slice(data)?;
        let Value::Object(fields) = document else {
            return Err(OembedError::BodyParse(
                "expected a JSON object".to_string(),
            ));
        };

        let text = |key: &str| FieldValue::of(&fields, key).into_string().unwrap_or_default();
        let number = |key: &str| FieldValue::of(&fields, key).into_unsigned();

        let description = match FieldValue::of(&fields, "description") {
            FieldValue::Missing => FieldValue::of(&fields, "summary").into_string(),
            present => present.into_string(),
        };

        Ok(Self {
            status: 0,
            kind: text("type"),
            url: text("url"),
            provider_url: text("provider_url"),
            provider_name: text("provider_name"),
            title: text("title"),
            description: description.unwrap_or_default(),
            thumbnail_url: text("thumbnail_url"),
            author_name: text("author_name"),
            author_url: text("author_url"),
            html: text("html"),
            cache_age: number("cache_age"),
            width: number("width"),
            height: number("height"),
            thumbnail_width: number("thumbnail_width"),
            thumbnail_height: number("thumbnail_height"),
        })
    }

    /// Normalize a response read from a blocking reader. A status other than
    /// 200 short-circuits without touching the body.
    pub fn from_reader<R: Read>(status: u16, reader: R) -> Result<Self> {
        if status != http::SUCCESS_STATUS {
            return Ok(Self::with_status(status));
        }

        let mut data = Vec::new();
        reader
            .take(limits::MAX_BODY_BYTES as u64)
            .read_to_end(&mut data)?;

        Self::from_capped_body(&data)
    }

    /// Normalize a streamed response. A status other than 200 short-circuits
    /// without polling the body.
    pub async fn from_response(status: u16, body: BodyStream) -> Result<Self> {
        if status != http::SUCCESS_STATUS {
            return Ok(Self::with_status(status));
        }

        let data = read_body_capped(body, limits::MAX_BODY_BYTES).await?;
        Self::from_capped_body(&data)
    }

    fn from_capped_body(data: &[u8]) -> Result<Self> {
        if data.len() == limits::MAX_BODY_BYTES {
            debug!(limit = limits::MAX_BODY_BYTES, "oEmbed response body truncated");
        }
        Self::from_json(data)
    }

    /// Fill in the page URL and provider identity the provider left out.
    pub fn finalize(&mut self, target_url: &str, rule: &Rule) {
        if self.url.is_empty() {
            self.url = target_url.to_string();
        }
        if self.provider_url.is_empty() {
            self.provider_url = rule.provider_url().to_string();
        }
        if self.provider_name.is_empty() {
            self.provider_name = rule.provider_name().to_string();
        }
    }

    /// Copy empty string fields from `base`. The thumbnail URL and its
    /// dimensions are taken together or not at all.
    pub fn merge_with(&mut self, base: &Info) {
        fill(&mut self.kind, &base.kind);
        fill(&mut self.url, &base.url);
        fill(&mut self.provider_url, &base.provider_url);
        fill(&mut self.provider_name, &base.provider_name);
        fill(&mut self.title, &base.title);
        fill(&mut self.description, &base.description);
        fill(&mut self.author_name, &base.author_name);
        fill(&mut self.author_url, &base.author_url);
        fill(&mut self.html, &base.html);

        if self.thumbnail_url.is_empty() {
            self.thumbnail_url = base.thumbnail_url.clone();
            self.thumbnail_width = base.thumbnail_width;
            self.thumbnail_height = base.thumbnail_height;
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn fill(target: &mut String, base: &str) {
    if target.is_empty() {
        *target = base.to_string();
    }
}

impl fmt::Display for Info {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_json() {
            Ok(json) => f.write_str(&json),
            Err(e) => write!(f, "{}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use crate::test_helpers::{mock_inconsistent_response, mock_video_response, sample_catalog};
    use crate::transport::TransportResponse;
    use bytes::Bytes;
    use std::io::Cursor;
    use std::task::Poll;

    #[test]
    fn test_string_numbers_and_summary_alias() {
        let info = Info::from_reader(
            200,
            Cursor::new(r#"{"type":"video","width":"640","summary":"hi"}"#),
        )
        .unwrap();

        assert_eq!(
            info,
            Info {
                kind: "video".to_string(),
                width: 640,
                description: "hi".to_string(),
                ..Info::default()
            }
        );
    }

    #[test]
    fn test_description_takes_precedence_over_summary() {
        let info = Info::from_json(br#"{"description":"full","summary":"short"}"#).unwrap();
        assert_eq!(info.description, "full");

        let info = Info::from_json(br#"{"description":null,"summary":"short"}"#).unwrap();
        assert_eq!(info.description, "short");

        let info = Info::from_json(br#"{"description":7,"summary":"short"}"#).unwrap();
        assert_eq!(info.description, "");
    }

    #[test]
    fn test_video_response() {
        let body = mock_video_response().to_string();
        let info = Info::from_json(body.as_bytes()).unwrap();

        assert_eq!(info.kind, "video");
        assert_eq!(info.title, "Amazing Cats");
        assert_eq!(info.author_name, "Cat Lover");
        assert_eq!(info.width, 640);
        assert_eq!(info.height, 360);
        assert_eq!(info.thumbnail_width, 480);
        assert_eq!(info.thumbnail_height, 270);
        assert_eq!(info.cache_age, 3600);
        assert!(info.html.starts_with("<iframe"));
        assert!(info.url.is_empty());
    }

    #[test]
    fn test_inconsistent_types_default() {
        let body = mock_inconsistent_response().to_string();
        let info = Info::from_json(body.as_bytes()).unwrap();

        assert_eq!(info.kind, "rich");
        assert_eq!(info.title, "");
        assert_eq!(info.description, "Summary used as description");
        assert_eq!(info.width, 0);
        assert_eq!(info.height, 0);
        assert_eq!(info.thumbnail_width, 0);
        assert_eq!(info.thumbnail_height, 0);
        assert_eq!(info.cache_age, 86400);
        assert_eq!(info.provider_name, "Declared Name");
    }

    #[test]
    fn test_non_success_status_skips_body() {
        let info = Info::from_reader(404, Cursor::new(r#"{"type":"video","title":"x"}"#)).unwrap();
        assert_eq!(info, Info::with_status(404));
        assert!(info.is_error());

        let info = Info::from_reader(201, Cursor::new("not even json")).unwrap();
        assert_eq!(info.status, 201);
        assert!(info.kind.is_empty());
    }

    #[tokio::test]
    async fn test_non_success_status_never_polls_stream() {
        let body: BodyStream = Box::pin(futures_util::stream::poll_fn(
            |_| -> Poll<Option<Result<Bytes>>> { panic!("body must not be read for error statuses") },
        ));

        let info = Info::from_response(500, body).await.unwrap();
        assert_eq!(info, Info::with_status(500));
    }

    #[tokio::test]
    async fn test_from_response_success() {
        let response = TransportResponse::from_bytes(200, r#"{"type":"photo","height":"12"}"#);
        let info = Info::from_response(response.status, response.body).await.unwrap();

        assert_eq!(info.kind, "photo");
        assert_eq!(info.height, 12);
        assert_eq!(info.status, 0);
    }

    #[test]
    fn test_malformed_body_is_error() {
        let result = Info::from_reader(200, Cursor::new("<oembed></oembed>"));
        assert!(matches!(result, Err(OembedError::BodyParse(_))));

        let result = Info::from_json(b"[1, 2, 3]");
        assert!(matches!(result, Err(OembedError::BodyParse(_))));
    }

    #[test]
    fn test_body_read_is_capped() {
        let padding = " ".repeat(limits::MAX_BODY_BYTES);
        let body = format!("{}{{\"type\":\"video\"}}", padding);

        // The object starts past the cap, so only whitespace is parsed
        let result = Info::from_reader(200, Cursor::new(body));
        assert!(matches!(result, Err(OembedError::BodyParse(_))));
    }

    #[test]
    fn test_finalize_fills_missing_identity() {
        let registry = Registry::from_slice(sample_catalog().as_bytes()).unwrap();
        let rule = registry.resolve("https://videohub.example/v/1").unwrap();

        let mut info = Info::from_json(br#"{"type":"video"}"#).unwrap();
        info.finalize("https://videohub.example/v/1", rule);

        assert_eq!(info.url, "https://videohub.example/v/1");
        assert_eq!(info.provider_name, "VideoHub");
        assert_eq!(info.provider_url, "https://videohub.example");

        let mut info = Info::from_json(
            br#"{"url":"https://cdn.example/1","provider_name":"VH","provider_url":"https://vh"}"#,
        )
        .unwrap();
        info.finalize("https://videohub.example/v/1", rule);

        assert_eq!(info.url, "https://cdn.example/1");
        assert_eq!(info.provider_name, "VH");
        assert_eq!(info.provider_url, "https://vh");
    }

    #[test]
    fn test_merge_target_wins() {
        let mut empty = Info::default();
        empty.merge_with(&Info {
            title: "X".to_string(),
            ..Info::default()
        });
        assert_eq!(empty.title, "X");

        let mut set = Info {
            title: "Y".to_string(),
            ..Info::default()
        };
        set.merge_with(&Info {
            title: "X".to_string(),
            ..Info::default()
        });
        assert_eq!(set.title, "Y");
    }

    #[test]
    fn test_merge_thumbnail_group() {
        let base = Info {
            thumbnail_url: "https://base/thumb.jpg".to_string(),
            thumbnail_width: 100,
            thumbnail_height: 50,
            html: "<p>base</p>".to_string(),
            ..Info::default()
        };

        // Dimensions without a URL are replaced along with the URL
        let mut target = Info {
            thumbnail_width: 999,
            ..Info::default()
        };
        target.merge_with(&base);
        assert_eq!(target.thumbnail_url, "https://base/thumb.jpg");
        assert_eq!(target.thumbnail_width, 100);
        assert_eq!(target.thumbnail_height, 50);
        assert_eq!(target.html, "<p>base</p>");

        // A present URL keeps its own dimensions, even zero ones
        let mut target = Info {
            thumbnail_url: "https://own/thumb.jpg".to_string(),
            ..Info::default()
        };
        target.merge_with(&base);
        assert_eq!(target.thumbnail_url, "https://own/thumb.jpg");
        assert_eq!(target.thumbnail_width, 0);
        assert_eq!(target.thumbnail_height, 0);
    }

    #[test]
    fn test_serialization() {
        let info = Info {
            kind: "video".to_string(),
            width: 640,
            ..Info::default()
        };
        let value: serde_json::Value = serde_json::from_str(&info.to_string()).unwrap();

        assert_eq!(value["type"], "video");
        assert_eq!(value["width"], 640);
        assert_eq!(value["title"], "");
        assert!(value.get("height").is_none());
        assert!(value.get("status").is_none());

        let value: serde_json::Value =
            serde_json::from_str(&Info::with_status(404).to_json().unwrap()).unwrap();
        assert_eq!(value["status"], 404);
    }
}
