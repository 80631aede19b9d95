//! Canned Jikan responses routed by URL path.

use anime_fetch::{FetchError, RawResponse, Transport};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::Mutex;

pub(crate) struct RoutedTransport {
    routes: Vec<(String, u16, String)>,
    calls: Mutex<Vec<String>>,
}

impl RoutedTransport {
    pub(crate) fn new() -> Self {
        Self {
            routes: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer URLs containing `fragment` with `status` and `body`
    pub(crate) fn route(mut self, fragment: &str, status: u16, body: &str) -> Self {
        self.routes
            .push((fragment.to_string(), status, body.to_string()));
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for RoutedTransport {
    async fn get(&self, url: &str) -> Result<RawResponse, FetchError> {
        tokio::task::yield_now().await;
        self.calls.lock().unwrap().push(url.to_string());

        self.routes
            .iter()
            .find(|(fragment, _, _)| url.contains(fragment.as_str()))
            .map(|(_, status, body)| {
                RawResponse::new(StatusCode::from_u16(*status).unwrap(), body.clone())
            })
            .ok_or_else(|| FetchError::Network(format!("no route for {url}")))
    }
}

/// A `{ "data": [...] }` body with one TV entry per title
pub(crate) fn list_body(titles: &[&str]) -> String {
    let data: Vec<serde_json::Value> = titles
        .iter()
        .enumerate()
        .map(|(i, title)| {
            serde_json::json!({
                "mal_id": i + 1,
                "title": title,
                "type": "TV",
                "episodes": 12,
                "images": {"jpg": {"image_url": format!("https://cdn.example/{}.jpg", i + 1)}}
            })
        })
        .collect();
    serde_json::json!({ "data": data }).to_string()
}
