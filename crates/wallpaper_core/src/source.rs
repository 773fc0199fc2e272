use crate::{ItemMedia, ListingItem, ListingPage, Sensitivity};

/// A single downloadable image discovered in a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSource {
    /// Provider item id; used as the destination file name.
    pub name: String,
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub sensitive: bool,
}

impl ImageSource {
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.width.zip(self.height)
    }

    pub fn sensitivity(&self) -> Sensitivity {
        Sensitivity::from_flag(self.sensitive)
    }
}

/// Flatten one listing item into image sources.
///
/// Embedded previews fan out to one source per image, all sharing the item
/// name. A bare link yields exactly one source with unknown dimensions.
pub fn extract_sources(item: &ListingItem) -> Vec<ImageSource> {
    match &item.media {
        ItemMedia::Embedded { images } => images
            .iter()
            .map(|image| ImageSource {
                name: item.name.clone(),
                url: unescape_preview_url(&image.url),
                width: Some(image.width),
                height: Some(image.height),
                sensitive: item.sensitive,
            })
            .collect(),
        ItemMedia::External { url } => vec![ImageSource {
            name: item.name.clone(),
            url: url.clone(),
            width: None,
            height: None,
            sensitive: item.sensitive,
        }],
    }
}

pub fn extract_page(page: &ListingPage) -> Vec<ImageSource> {
    page.items.iter().flat_map(extract_sources).collect()
}

// Preview urls arrive HTML-escaped unless the request asked for raw json.
fn unescape_preview_url(url: &str) -> String {
    url.replace("&amp;", "&")
}
