//! Typed block data.
//!
//! Layout files carry block data as free-form JSON objects. Before the
//! layout walk each object is parsed into the [`BlockData`] variant for its
//! block type, leniently: missing keys take defaults, wrong-typed values are
//! stringified or dropped, and types with no built-in shape keep their raw
//! map in [`BlockData::Unknown`].
//!
//! This is also where avatar photos are decoded, so renderers never see an
//! encoded image.

use std::sync::Arc;

use serde_json::{Map, Value};

use super::{base_type, type_param};
use crate::image_loader::{self, LoadedImage};
use crate::model::profile::value_text;
use crate::model::ProjectEntry;
use crate::style::TextAlign;

/// Default avatar diameter, in millimetres.
pub const DEFAULT_AVATAR_MM: f64 = 42.0;

/// Block data, one variant per built-in block type.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockData {
    HeaderName {
        name: String,
        title: String,
    },
    ContactInfo {
        title: Option<String>,
        /// (field, value) pairs in input order, blank values removed.
        items: Vec<(String, String)>,
    },
    KeySkills {
        title: Option<String>,
        skills: Vec<String>,
    },
    Languages {
        title: Option<String>,
        languages: Vec<String>,
    },
    Projects {
        title: Option<String>,
        items: Vec<ProjectEntry>,
    },
    Education {
        title: Option<String>,
        /// One newline-joined string per entry.
        items: Vec<String>,
    },
    TextSection {
        /// Section key, e.g. "summary".
        key: String,
        title: Option<String>,
        paragraphs: Vec<String>,
    },
    Avatar {
        photo: Option<Arc<LoadedImage>>,
        max_d_mm: f64,
        align: TextAlign,
    },
    SocialLinks {
        title: Option<String>,
        /// (field, handle) pairs in input order.
        links: Vec<(String, String)>,
    },
    /// A block type with no built-in data shape.
    Unknown(Map<String, Value>),
}

impl BlockData {
    /// Parse the effective data object of a block of type `block_type`.
    pub fn from_value(block_type: &str, value: &Value) -> BlockData {
        let empty = Map::new();
        let map = value.as_object().unwrap_or(&empty);
        let title = opt_text(map, "title");

        match base_type(block_type) {
            "header_name" => BlockData::HeaderName {
                name: text(map, "name"),
                title: text(map, "title"),
            },
            "contact_info" => BlockData::ContactInfo {
                title,
                items: pairs(map.get("items")),
            },
            "key_skills" => BlockData::KeySkills {
                title,
                skills: strings(map.get("skills").or_else(|| map.get("items"))),
            },
            "languages" => BlockData::Languages {
                title,
                languages: strings(map.get("languages").or_else(|| map.get("items"))),
            },
            "projects" => BlockData::Projects {
                title,
                items: map
                    .get("items")
                    .and_then(Value::as_array)
                    .map(|items| {
                        items
                            .iter()
                            .map(ProjectEntry::from_value)
                            .filter(|p| !p.is_empty())
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            "education" => BlockData::Education {
                title,
                items: strings(map.get("items")),
            },
            "text_section" => {
                let key = opt_text(map, "section")
                    .or_else(|| opt_text(map, "key"))
                    .or_else(|| type_param(block_type).map(str::to_string))
                    .unwrap_or_else(|| "summary".to_string());
                let paragraphs = [key.as_str(), "lines", "text"]
                    .iter()
                    .map(|k| strings(map.get(*k)))
                    .find(|p| !p.is_empty())
                    .unwrap_or_default();
                BlockData::TextSection {
                    key,
                    title,
                    paragraphs,
                }
            }
            "avatar_circle" => BlockData::Avatar {
                photo: decode_photo(map),
                max_d_mm: map
                    .get("max_d_mm")
                    .and_then(Value::as_f64)
                    .filter(|d| *d > 0.0)
                    .unwrap_or(DEFAULT_AVATAR_MM),
                align: match opt_text(map, "align").as_deref() {
                    Some("left") => TextAlign::Left,
                    Some("right") => TextAlign::Right,
                    _ => TextAlign::Center,
                },
            },
            "social_links" => {
                // Either {items: {...}} or the contact-like keys directly.
                let links = match map.get("items") {
                    Some(items @ Value::Object(_)) => pairs(Some(items)),
                    _ => pairs(Some(value)),
                };
                BlockData::SocialLinks { title, links }
            }
            _ => BlockData::Unknown(map.clone()),
        }
    }
}

/// Decode the avatar photo. `photo_b64` wins over `photo_bytes`; a payload
/// that fails to decode leaves the block without a photo.
fn decode_photo(map: &Map<String, Value>) -> Option<Arc<LoadedImage>> {
    let bytes = match map.get("photo_b64").and_then(Value::as_str) {
        Some(b64) if !b64.trim().is_empty() => image_loader::decode_base64(b64),
        _ => Ok(raw_bytes(map.get("photo_bytes")?)?),
    };
    match bytes.and_then(|bytes| image_loader::load_circular(&bytes)) {
        Ok(image) => Some(Arc::new(image)),
        Err(e) => {
            log::warn!("avatar_circle: dropping photo: {}", e);
            None
        }
    }
}

/// `photo_bytes` as a JSON array of byte values.
fn raw_bytes(value: &Value) -> Option<Vec<u8>> {
    let items = value.as_array()?;
    if items.is_empty() {
        return None;
    }
    items
        .iter()
        .map(|v| v.as_u64().and_then(|b| u8::try_from(b).ok()))
        .collect()
}

fn text(map: &Map<String, Value>, key: &str) -> String {
    map.get(key)
        .map(|v| value_text(v).trim().to_string())
        .unwrap_or_default()
}

fn opt_text(map: &Map<String, Value>, key: &str) -> Option<String> {
    Some(text(map, key)).filter(|s| !s.is_empty())
}

/// A string or list of scalars as trimmed, non-blank strings.
fn strings(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter(|v| !matches!(v, Value::Array(_) | Value::Object(_)))
            .map(|v| value_text(v).trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}

/// An object as ordered (key, value) pairs with blank values removed.
fn pairs(value: Option<&Value>) -> Vec<(String, String)> {
    value
        .and_then(Value::as_object)
        .map(|obj| {
            obj.iter()
                .filter(|(_, v)| !matches!(v, Value::Array(_) | Value::Object(_)))
                .map(|(k, v)| (k.clone(), value_text(v).trim().to_string()))
                .filter(|(_, v)| !v.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use serde_json::json;

    #[test]
    fn missing_keys_take_defaults() {
        match BlockData::from_value("header_name", &json!({})) {
            BlockData::HeaderName { name, title } => {
                assert!(name.is_empty());
                assert!(title.is_empty());
            }
            other => panic!("{:?}", other),
        }
        match BlockData::from_value("key_skills", &Value::Null) {
            BlockData::KeySkills { skills, title } => {
                assert!(skills.is_empty());
                assert!(title.is_none());
            }
            other => panic!("{:?}", other),
        }
    }

    #[test]
    fn contact_items_keep_order_and_drop_blanks() {
        let data = BlockData::from_value(
            "contact_info",
            &json!({"items": {"phone": "1", "email": " ", "github": "me", "age": 30}}),
        );
        assert_eq!(
            data,
            BlockData::ContactInfo {
                title: None,
                items: vec![
                    ("phone".into(), "1".into()),
                    ("github".into(), "me".into()),
                    ("age".into(), "30".into())
                ],
            }
        );
    }

    #[test]
    fn projects_accept_triples() {
        let data = BlockData::from_value(
            "projects",
            &json!({"items": [["A", "d", "u"], ["", "", ""], {"name": "B"}]}),
        );
        match data {
            BlockData::Projects { items, .. } => {
                assert_eq!(items.len(), 2);
                assert_eq!(items[0].url, "u");
                assert_eq!(items[1].title, "B");
            }
            other => panic!("{:?}", other),
        }
    }

    #[test]
    fn text_section_key_from_identifier() {
        let data = BlockData::from_value("text_section:about", &json!({"about": "Hi there"}));
        assert_eq!(
            data,
            BlockData::TextSection {
                key: "about".into(),
                title: None,
                paragraphs: vec!["Hi there".into()],
            }
        );
    }

    #[test]
    fn text_section_content_lookup_order() {
        let data = BlockData::from_value(
            "text_section",
            &json!({"section": "objective", "lines": ["one", "", "two"], "text": "ignored"}),
        );
        match data {
            BlockData::TextSection { key, paragraphs, .. } => {
                assert_eq!(key, "objective");
                assert_eq!(paragraphs, vec!["one".to_string(), "two".to_string()]);
            }
            other => panic!("{:?}", other),
        }
        match BlockData::from_value("text_section", &json!({"text": "x"})) {
            BlockData::TextSection { key, paragraphs, .. } => {
                assert_eq!(key, "summary");
                assert_eq!(paragraphs, vec!["x".to_string()]);
            }
            other => panic!("{:?}", other),
        }
    }

    #[test]
    fn social_links_from_items_or_flat_keys() {
        let a = BlockData::from_value("social_links", &json!({"items": {"github": "me"}}));
        let b = BlockData::from_value("social_links", &json!({"github": "me", "title": "Links"}));
        match (a, b) {
            (BlockData::SocialLinks { links: la, .. }, BlockData::SocialLinks { links: lb, title }) => {
                assert_eq!(la, vec![("github".to_string(), "me".to_string())]);
                assert!(lb.contains(&("github".to_string(), "me".to_string())));
                assert_eq!(title.as_deref(), Some("Links"));
            }
            other => panic!("{:?}", other),
        }
    }

    fn png_b64() -> (Vec<u8>, String) {
        let img = image::RgbaImage::from_pixel(4, 4, image::Rgba([1, 2, 3, 255]));
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(encoder, img.as_raw(), 4, 4, image::ColorType::Rgba8)
            .unwrap();
        let b64 = base64::engine::general_purpose::STANDARD.encode(&buf);
        (buf, b64)
    }

    #[test]
    fn avatar_decodes_photo_once() {
        let (_, b64) = png_b64();
        match BlockData::from_value("avatar_circle", &json!({"photo_b64": b64})) {
            BlockData::Avatar { photo, max_d_mm, align } => {
                assert_eq!(photo.unwrap().width_px, 4);
                assert_eq!(max_d_mm, DEFAULT_AVATAR_MM);
                assert_eq!(align, TextAlign::Center);
            }
            other => panic!("{:?}", other),
        }
    }

    #[test]
    fn encoded_photo_wins_over_raw_bytes() {
        let (bytes, _) = png_b64();
        // Valid raw bytes, broken base64: the broken encoded form still wins.
        let data = BlockData::from_value(
            "avatar_circle",
            &json!({"photo_b64": "!!!", "photo_bytes": bytes, "max_d_mm": 30}),
        );
        match data {
            BlockData::Avatar { photo, max_d_mm, .. } => {
                assert!(photo.is_none());
                assert_eq!(max_d_mm, 30.0);
            }
            other => panic!("{:?}", other),
        }
    }

    #[test]
    fn raw_bytes_used_without_encoded_form() {
        let (bytes, _) = png_b64();
        match BlockData::from_value("avatar_circle", &json!({"photo_bytes": bytes, "align": "left"})) {
            BlockData::Avatar { photo, align, .. } => {
                assert!(photo.is_some());
                assert_eq!(align, TextAlign::Left);
            }
            other => panic!("{:?}", other),
        }
    }

    #[test]
    fn unknown_types_keep_raw_map() {
        let data = BlockData::from_value("timeline", &json!({"a": 1}));
        assert!(matches!(data, BlockData::Unknown(m) if m.contains_key("a")));
    }
}
