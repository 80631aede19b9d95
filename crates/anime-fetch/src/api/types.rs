//! Jikan API v4 response types.
//!
//! Only the fields the page renders are modelled; everything else in the
//! payload is ignored. Cached payloads keep the full response.

use serde::{Deserialize, Serialize};

/// `{ "data": [...] }` envelope returned by list and search endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnimeListResponse {
    #[serde(default)]
    pub data: Vec<AnimeRecord>,
}

/// One anime entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimeRecord {
    pub mal_id: u32,
    pub title: String,
    #[serde(default)]
    pub title_english: Option<String>,
    #[serde(rename = "type", default)]
    pub anime_type: Option<String>,
    #[serde(default)]
    pub episodes: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub images: AnimeImages,
}

impl AnimeRecord {
    /// JPG cover image, when the API provided one
    pub fn image_url(&self) -> Option<&str> {
        self.images.jpg.image_url.as_deref()
    }
}

/// Anime images
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnimeImages {
    #[serde(default)]
    pub jpg: ImageSet,
    #[serde(default)]
    pub webp: Option<ImageSet>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageSet {
    pub image_url: Option<String>,
    pub small_image_url: Option<String>,
    pub large_image_url: Option<String>,
}
