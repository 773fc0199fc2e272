//! Wallpaper core: pure ingestion logic with no I/O.
mod bucket;
mod layout;
mod listing;
mod run_state;
mod source;

pub use bucket::{classify, is_placeholder, ResolutionBucket, Sensitivity, PLACEHOLDER_DIMENSIONS};
pub use layout::{CollectionLayout, STAGING_DIR};
pub use listing::{parse_listing, EmbeddedImage, ItemMedia, ListingError, ListingItem, ListingPage};
pub use run_state::{CollectionState, FetchMode, PageCursor, RunState, DEFAULT_PAGE_LIMIT};
pub use source::{extract_page, extract_sources, ImageSource};
