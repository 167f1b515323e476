// ABOUTME: Test helper utilities for provider catalogs and mocked oEmbed responses
// ABOUTME: Provides mockito-based helpers and fixtures shared by unit tests

#[cfg(test)]
use mockito::{Server, ServerGuard};
#[cfg(test)]
use serde_json::json;

#[cfg(test)]
pub async fn mock_provider_server() -> ServerGuard {
    Server::new_async().await
}

/// Three providers: declared schemes with discovery, a `{format}` template that
/// already has a query string, and an endpoint with no schemes plus a `/*` artifact.
#[cfg(test)]
pub fn sample_catalog() -> &'static str {
    r#"[
        {
            "provider_name": "VideoHub",
            "provider_url": "https://videohub.example",
            "endpoints": [
                {
                    "url": "https://videohub.example/oembed",
                    "schemes": [
                        "https://*.videohub.example/watch/*",
                        "https://videohub.example/v/*"
                    ],
                    "discovery": true
                }
            ]
        },
        {
            "provider_name": "PhotoShare",
            "provider_url": "https://photoshare.example/",
            "endpoints": [
                {
                    "url": "https://api.photoshare.example/oembed.{format}?key=demo",
                    "schemes": ["https://photoshare.example/p/*"]
                }
            ]
        },
        {
            "provider_name": "Orange",
            "provider_url": "https://orange.example/",
            "endpoints": [
                {
                    "url": "https://orange.example/oembed/*"
                }
            ]
        }
    ]"#
}

/// Catalog whose single endpoint lives on a mock server.
#[cfg(test)]
pub fn mock_catalog(server_url: &str) -> String {
    json!([
        {
            "provider_name": "MockTube",
            "provider_url": "https://mocktube.example/",
            "endpoints": [
                {
                    "url": format!("{}/oembed", server_url),
                    "schemes": ["https://mocktube.example/watch/*"]
                }
            ]
        }
    ])
    .to_string()
}

#[cfg(test)]
pub fn mock_video_response() -> serde_json::Value {
    json!({
        "version": "1.0",
        "type": "video",
        "title": "Amazing Cats",
        "author_name": "Cat Lover",
        "author_url": "https://mocktube.example/user/catlover",
        "width": 640,
        "height": "360",
        "thumbnail_url": "https://img.mocktube.example/cats.jpg",
        "thumbnail_width": 480,
        "thumbnail_height": 270,
        "cache_age": "3600",
        "html": "<iframe src=\"https://mocktube.example/embed/cats\"></iframe>"
    })
}

/// A payload in the shape of providers that ignore the declared field types.
#[cfg(test)]
pub fn mock_inconsistent_response() -> serde_json::Value {
    json!({
        "type": "rich",
        "title": 42,
        "summary": "Summary used as description",
        "width": null,
        "height": false,
        "thumbnail_width": "-5",
        "thumbnail_height": 12.5,
        "cache_age": " 86400 ",
        "provider_name": "Declared Name",
        "html": "<div></div>"
    })
}
