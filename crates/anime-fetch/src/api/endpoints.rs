//! URL construction for the Jikan endpoints the page uses.

use crate::error::FetchError;
use reqwest::Url;

/// Public Jikan v4 API
pub const JIKAN_BASE_URL: &str = "https://api.jikan.moe/v4";

/// Parse `url` and require an absolute http(s) URL
pub fn validate_url(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;

    match parsed.scheme() {
        "http" | "https" if parsed.has_host() => Ok(parsed),
        _ => Err(FetchError::InvalidUrl(format!(
            "{url}: expected an http(s) URL"
        ))),
    }
}

/// Builds endpoint URLs under a base such as `https://api.jikan.moe/v4`
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let base = validate_url(base_url)?;
        Ok(Self { base })
    }

    /// `/top/anime?limit=N`
    pub fn top_anime(&self, limit: u32) -> String {
        self.build(&["top", "anime"], &[("limit", limit.to_string())])
    }

    /// `/seasons/now?limit=N`
    pub fn season_now(&self, limit: u32) -> String {
        self.build(&["seasons", "now"], &[("limit", limit.to_string())])
    }

    /// `/seasons/upcoming?limit=N`
    pub fn season_upcoming(&self, limit: u32) -> String {
        self.build(&["seasons", "upcoming"], &[("limit", limit.to_string())])
    }

    /// `/anime?q=<query>&limit=N`, with the query form-encoded
    pub fn search(&self, query: &str, limit: u32) -> String {
        self.build(
            &["anime"],
            &[("q", query.to_string()), ("limit", limit.to_string())],
        )
    }

    fn build(&self, segments: &[&str], params: &[(&str, String)]) -> String {
        let mut url = self.base.clone();
        // http(s) URLs always have path segments
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
        url.into()
    }
}
