use pretty_assertions::assert_eq;
use serde_json::json;
use wallpaper_core::{extract_page, extract_sources, parse_listing, ImageSource, ItemMedia};

fn body(children: Vec<serde_json::Value>) -> Vec<u8> {
    serde_json::to_vec(&json!({ "kind": "Listing", "data": { "children": children } })).unwrap()
}

fn preview_child(id: &str, images: usize, thumbnail: &str) -> serde_json::Value {
    let images: Vec<_> = (0..images)
        .map(|i| {
            json!({ "source": {
                "url": format!("https://i.example.com/{id}-{i}.jpg?w=1&amp;s=abc"),
                "width": 1920,
                "height": 1080
            }})
        })
        .collect();
    json!({
        "kind": "t3",
        "data": {
            "id": id,
            "name": format!("t3_{id}"),
            "url": format!("https://i.example.com/{id}.jpg"),
            "thumbnail": thumbnail,
            "preview": { "images": images }
        }
    })
}

fn link_child(id: &str, thumbnail: &str) -> serde_json::Value {
    json!({
        "kind": "t3",
        "data": {
            "id": id,
            "name": format!("t3_{id}"),
            "url": format!("https://imgur.example.com/{id}.png"),
            "thumbnail": thumbnail
        }
    })
}

#[test]
fn embedded_previews_fan_out_sharing_the_item_name() {
    let page = parse_listing(&body(vec![preview_child("abc", 3, "default")])).unwrap();
    let sources = extract_sources(&page.items[0]);

    assert_eq!(sources.len(), 3);
    assert!(sources.iter().all(|s| s.name == "t3_abc"));
    assert!(sources.iter().all(|s| s.dimensions() == Some((1920, 1080))));
    assert_eq!(sources[1].url, "https://i.example.com/abc-1.jpg?w=1&s=abc");
}

#[test]
fn bare_link_yields_a_single_source_without_dimensions() {
    let page = parse_listing(&body(vec![link_child("xyz", "nsfw")])).unwrap();
    let sources = extract_sources(&page.items[0]);

    assert_eq!(
        sources,
        vec![ImageSource {
            name: "t3_xyz".to_string(),
            url: "https://imgur.example.com/xyz.png".to_string(),
            width: None,
            height: None,
            sensitive: true,
        }]
    );
}

#[test]
fn empty_preview_falls_back_to_link() {
    let mut child = preview_child("p0", 0, "self");
    child["data"]["preview"] = json!({ "images": [] });
    let page = parse_listing(&body(vec![child])).unwrap();
    assert!(matches!(page.items[0].media, ItemMedia::External { .. }));
    assert!(!page.items[0].sensitive);
}

#[test]
fn malformed_children_are_skipped_but_counted() {
    let children = vec![
        link_child("a1", "default"),
        json!({ "kind": "t3", "data": { "name": "t3_broken" } }),
        json!({ "kind": "t3", "data": { "id": "nolink" } }),
        link_child("a2", "default"),
    ];
    let page = parse_listing(&body(children)).unwrap();

    assert_eq!(page.raw_count, 4);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.last_id.as_deref(), Some("t3_a2"));
    assert_eq!(extract_page(&page).len(), 2);
}

#[test]
fn last_id_tracks_the_final_child_even_without_media() {
    let children = vec![
        link_child("first", "default"),
        json!({ "kind": "t3", "data": { "id": "tail" } }),
    ];
    let page = parse_listing(&body(children)).unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.last_id.as_deref(), Some("t3_tail"));
}

#[test]
fn missing_name_uses_the_composite_id() {
    let child = json!({
        "kind": "t3",
        "data": { "id": "nn", "url": "https://example.com/nn.jpg" }
    });
    let page = parse_listing(&body(vec![child])).unwrap();
    assert_eq!(page.items[0].name, "t3_nn");
    assert_eq!(page.items[0].full_id(), "t3_nn");
}

#[test]
fn broken_envelope_is_an_error() {
    assert!(parse_listing(b"<html>rate limited</html>").is_err());
    assert!(parse_listing(br#"{"error": 403}"#).is_err());
}

#[test]
fn empty_listing_has_no_cursor() {
    let page = parse_listing(&body(Vec::new())).unwrap();
    assert_eq!(page.raw_count, 0);
    assert!(page.last_id.is_none());
}
