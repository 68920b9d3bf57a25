//! The slide-deck document model.
//!
//! Slides are stored and exchanged as loose JSON so fields the editor adds
//! survive a round trip. The typed structs here build the documents the
//! server itself creates: fresh decks and slides upgraded from the legacy
//! `blocks` layout.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::OnceLock;
use utoipa::ToSchema;

pub const DEFAULT_TITLE: &str = "Untitled deck";
pub const DEFAULT_BACKGROUND: &str = "#ffffff";
pub const DEFAULT_FONT_FAMILY: &str = "system-ui, Segoe UI, Roboto, sans-serif";
pub const DEFAULT_TEXT_COLOR: &str = "#111111";

/// The document clients see: `{id, title, slides, version}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Deck {
    pub id: String,
    pub title: String,
    #[schema(value_type = Vec<Object>)]
    pub slides: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub id: String,
    pub title: String,
    pub background: String,
    pub objects: Vec<SlideObject>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SlideObject {
    Text(TextObject),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextObject {
    pub id: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub rotation: i32,
    pub text: String,
    pub font_size: i32,
    pub font_family: String,
    pub color: String,
}

impl TextObject {
    fn new(text: impl Into<String>, x: i32, y: i32, width: i32, height: i32, font_size: i32) -> Self {
        Self {
            id: new_id(),
            x,
            y,
            width,
            height,
            rotation: 0,
            text: text.into(),
            font_size,
            font_family: DEFAULT_FONT_FAMILY.to_owned(),
            color: DEFAULT_TEXT_COLOR.to_owned(),
        }
    }
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// A fresh deck with one titled slide holding one editable text box.
/// `version` is left unset so the first save assigns it.
pub fn new_deck(id: Option<&str>) -> Deck {
    let slide = Slide {
        id: new_id(),
        title: "Slide 1".to_owned(),
        background: DEFAULT_BACKGROUND.to_owned(),
        objects: vec![SlideObject::Text(TextObject::new(
            "Double-click (or select) to edit",
            120,
            120,
            520,
            70,
            32,
        ))],
    };

    Deck {
        id: id.map_or_else(new_id, str::to_owned),
        title: DEFAULT_TITLE.to_owned(),
        slides: vec![slide_to_value(&slide)],
        version: None,
    }
}

fn slide_to_value(slide: &Slide) -> Value {
    // A struct of strings and integers always serializes.
    serde_json::to_value(slide).unwrap_or(Value::Null)
}

/// Removes anything shaped like an HTML tag, then trims.
pub fn strip_html(html: &str) -> String {
    static TAG: OnceLock<Regex> = OnceLock::new();
    let tag = TAG.get_or_init(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"));
    tag.replace_all(html, "").trim().to_owned()
}

/// Upgrades slides saved in the old `blocks` layout to `objects`, in place.
/// Slides that already have `objects` are untouched.
pub fn upgrade_legacy_slides(slides: &mut [Value]) {
    for slide in slides.iter_mut() {
        if let Value::Object(fields) = slide {
            if !fields.contains_key("objects") {
                upgrade_legacy_slide(fields);
            }
        }
    }
}

fn upgrade_legacy_slide(fields: &mut Map<String, Value>) {
    fields
        .entry("background")
        .or_insert_with(|| Value::String(DEFAULT_BACKGROUND.to_owned()));

    let objects: Vec<Value> = match fields.remove("blocks") {
        Some(Value::Array(blocks)) => blocks
            .iter()
            .filter(|block| block.get("type").and_then(Value::as_str) == Some("text"))
            .map(|block| {
                let html = block.get("html").and_then(Value::as_str).unwrap_or_default();
                let text = match strip_html(html) {
                    text if text.is_empty() => "Text".to_owned(),
                    text => text,
                };
                let object = SlideObject::Text(TextObject::new(text, 100, 100, 500, 80, 28));
                serde_json::to_value(object).unwrap_or(Value::Null)
            })
            .collect(),
        _ => Vec::new(),
    };

    fields.insert("objects".to_owned(), Value::Array(objects));
}
