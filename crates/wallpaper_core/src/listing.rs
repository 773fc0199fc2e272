//! Typed model of one provider listing page.
//!
//! The envelope must parse; each child is decoded on its own so a single
//! malformed child is dropped instead of failing the page.

use engine_logging::engine_debug;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    #[error("malformed listing envelope: {0}")]
    Envelope(#[from] serde_json::Error),
}

/// One page of a collection listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListingPage {
    /// Items that parsed into a usable shape, in provider order.
    pub items: Vec<ListingItem>,
    /// Number of children the provider returned, malformed ones included.
    pub raw_count: usize,
    /// Composite id (`<kind>_<id>`) of the last child that carried one.
    pub last_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingItem {
    pub kind: String,
    pub id: String,
    pub name: String,
    pub sensitive: bool,
    pub media: ItemMedia,
}

impl ListingItem {
    pub fn full_id(&self) -> String {
        format!("{}_{}", self.kind, self.id)
    }
}

/// The two item shapes a listing can carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemMedia {
    /// Preview images hosted by the provider, dimensions known up front.
    Embedded { images: Vec<EmbeddedImage> },
    /// A bare outbound link; dimensions unknown until decoded.
    External { url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedImage {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    data: EnvelopeData,
}

#[derive(Debug, Deserialize)]
struct EnvelopeData {
    #[serde(default)]
    children: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RawChild {
    kind: String,
    data: RawItem,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    id: String,
    name: Option<String>,
    url: Option<String>,
    thumbnail: Option<String>,
    preview: Option<RawPreview>,
}

#[derive(Debug, Deserialize)]
struct RawPreview {
    #[serde(default)]
    images: Vec<RawPreviewImage>,
}

#[derive(Debug, Deserialize)]
struct RawPreviewImage {
    source: RawImageSource,
}

#[derive(Debug, Deserialize)]
struct RawImageSource {
    url: String,
    width: u32,
    height: u32,
}

const SENSITIVE_THUMBNAIL: &str = "nsfw";

/// Parse a listing response body.
pub fn parse_listing(body: &[u8]) -> Result<ListingPage, ListingError> {
    let envelope: Envelope = serde_json::from_slice(body)?;
    let children = envelope.data.children;

    let mut page = ListingPage {
        items: Vec::with_capacity(children.len()),
        raw_count: children.len(),
        last_id: None,
    };

    for child in children {
        if let Some(id) = composite_id(&child) {
            page.last_id = Some(id);
        }
        match serde_json::from_value::<RawChild>(child) {
            Ok(raw) => match into_item(raw) {
                Some(item) => page.items.push(item),
                None => engine_debug!("Skipping listing child without media"),
            },
            Err(err) => engine_debug!("Skipping malformed listing child: {}", err),
        }
    }

    Ok(page)
}

fn composite_id(child: &Value) -> Option<String> {
    let kind = child.get("kind")?.as_str()?;
    let id = child.get("data")?.get("id")?.as_str()?;
    Some(format!("{kind}_{id}"))
}

fn into_item(raw: RawChild) -> Option<ListingItem> {
    let RawChild { kind, data } = raw;
    let sensitive = data.thumbnail.as_deref() == Some(SENSITIVE_THUMBNAIL);
    let images: Vec<EmbeddedImage> = data
        .preview
        .map(|preview| {
            preview
                .images
                .into_iter()
                .map(|image| EmbeddedImage {
                    url: image.source.url,
                    width: image.source.width,
                    height: image.source.height,
                })
                .collect()
        })
        .unwrap_or_default();

    let media = if !images.is_empty() {
        ItemMedia::Embedded { images }
    } else {
        ItemMedia::External {
            url: data.url.filter(|url| !url.is_empty())?,
        }
    };

    let name = data
        .name
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| format!("{kind}_{}", data.id));

    Some(ListingItem {
        kind,
        id: data.id,
        name,
        sensitive,
        media,
    })
}
