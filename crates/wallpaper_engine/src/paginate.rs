use engine_logging::engine_info;
use wallpaper_core::{extract_page, FetchMode, ImageSource, PageCursor};

use crate::{AccessToken, FetchError, ListingApi};

/// Result of consuming one page of a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionPage {
    pub collection: String,
    pub sources: Vec<ImageSource>,
    pub cursor: PageCursor,
}

/// Fetch exactly one page after `cursor` and flatten it into image sources.
///
/// The caller owns the run state; it applies `cursor` once the page is in hand.
pub async fn paginate(
    api: &dyn ListingApi,
    token: &AccessToken,
    collection: &str,
    mode: &FetchMode,
    cursor: &str,
) -> Result<CollectionPage, FetchError> {
    let page = api.fetch_page(token, collection, mode, cursor).await?;
    let sources = extract_page(&page);
    let cursor = PageCursor {
        last_id: page.last_id,
        item_count: page.raw_count,
        limit: api.page_limit(),
    };

    engine_info!(
        "Collection {}: {} items, {} sources, last page: {}",
        collection,
        cursor.item_count,
        sources.len(),
        cursor.is_last_page()
    );

    Ok(CollectionPage {
        collection: collection.to_string(),
        sources,
        cursor,
    })
}
