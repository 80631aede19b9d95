//! Plain-text rendering of the page regions.

use anime_fetch::AnimeRecord;
use std::fmt::Write;

/// Shorten `title` to `max_chars` characters followed by `...`.
///
/// Titles of at most `max_chars` characters are returned unchanged.
pub fn truncate_title(title: &str, max_chars: usize) -> String {
    match title.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &title[..cut]),
        None => title.to_string(),
    }
}

/// `Episodes: <n>` or `Episodes: N/A`
pub fn episodes_label(episodes: Option<u32>) -> String {
    match episodes {
        Some(count) if count > 0 => format!("Episodes: {}", count),
        _ => "Episodes: N/A".to_string(),
    }
}

/// Rotating hero display; the first slide starts active
#[derive(Debug, Clone)]
pub struct Carousel {
    slides: Vec<AnimeRecord>,
    active: usize,
}

impl Carousel {
    /// Keep the first `limit` records as slides
    pub fn new(mut slides: Vec<AnimeRecord>, limit: usize) -> Self {
        slides.truncate(limit);
        Self { slides, active: 0 }
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_slide(&self) -> Option<&AnimeRecord> {
        self.slides.get(self.active)
    }

    /// Move to the next slide, looping back to the first
    pub fn advance(&mut self) {
        if !self.slides.is_empty() {
            self.active = (self.active + 1) % self.slides.len();
        }
    }

    /// Move to the previous slide, looping to the last
    pub fn retreat(&mut self) {
        if !self.slides.is_empty() {
            self.active = (self.active + self.slides.len() - 1) % self.slides.len();
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::from("== Top Anime ==\n");
        for (index, anime) in self.slides.iter().enumerate() {
            let marker = if index == self.active { '>' } else { ' ' };
            let _ = writeln!(out, "{} {:>2}. {}", marker, index + 1, anime.title);
            if let Some(url) = anime.image_url() {
                let _ = writeln!(out, "       {}", url);
            }
        }
        out
    }

    /// One-line view of the active slide, used while autoplaying
    pub fn render_active(&self) -> String {
        match self.active_slide() {
            Some(anime) => format!("[{}/{}] {}", self.active + 1, self.len(), anime.title),
            None => String::new(),
        }
    }
}

/// Render a grid of category cards under a heading
pub fn render_cards(heading: &str, records: &[AnimeRecord]) -> String {
    let mut out = format!("== {} ==\n", heading);
    for anime in records {
        let kind = anime.anime_type.as_deref().unwrap_or("?");
        let _ = writeln!(out, "  [Active] [{}] {}", kind, anime.title);
        if let Some(url) = anime.image_url() {
            let _ = writeln!(out, "      {}", url);
        }
    }
    out
}

/// State of the search results dropdown
#[derive(Debug, Clone)]
pub enum Dropdown {
    /// Blank query; nothing shown
    Closed,
    Loading,
    Error(String),
    Results(Vec<AnimeRecord>),
}

impl Dropdown {
    pub fn is_open(&self) -> bool {
        !matches!(self, Dropdown::Closed)
    }

    pub fn render(&self, title_max_chars: usize) -> String {
        match self {
            Dropdown::Closed => String::new(),
            Dropdown::Loading => "Loading...\n".to_string(),
            Dropdown::Error(message) => format!("{}\n", message),
            Dropdown::Results(records) if records.is_empty() => "No results found\n".to_string(),
            Dropdown::Results(records) => {
                let mut out = String::new();
                for anime in records {
                    let _ = writeln!(out, "  {}", truncate_title(&anime.title, title_max_chars));
                    let _ = writeln!(out, "    {}", episodes_label(anime.episodes));
                }
                out
            }
        }
    }
}
