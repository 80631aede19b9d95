//! Terminal anime browser.
//!
//! Renders a home page (hero carousel plus trending, recently aired and
//! upcoming grids) from cached Jikan data, and a search dropdown fed by a
//! debounced input stream.

pub mod context;
pub mod page;
pub mod render;
pub mod search;
pub mod sections;

#[cfg(test)]
pub(crate) mod testing;

pub use context::AppContext;
pub use page::{render_home, HomeReport};
pub use render::{truncate_title, Carousel, Dropdown};
pub use search::SearchService;
pub use sections::{Section, SectionOutcome};
