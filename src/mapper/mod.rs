//! # Data Mapper
//!
//! Turns a [`Profile`] into the per-block override set the layout's blocks
//! are filled from. Pure and deterministic: the same profile always yields
//! the same entries in the same order.

mod literal;

use serde_json::{json, Map, Value};

use crate::model::{EducationEntry, Profile};

pub use literal::parse_list_literal;

/// Block identifier → `{"data": {...}}`, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverrideSet(Map<String, Value>);

impl OverrideSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, block_id: &str, data: Value) {
        self.0.insert(block_id.to_string(), json!({ "data": data }));
    }

    /// The `{"data": ...}` entry for a block identifier.
    pub fn get(&self, block_id: &str) -> Option<&Value> {
        self.0.get(block_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

/// Derive block overrides from a profile.
pub fn profile_to_overrides(profile: &Profile) -> OverrideSet {
    let mut overrides = OverrideSet::new();

    let header = &profile.header;
    if !header.name.trim().is_empty() || !header.title.trim().is_empty() {
        overrides.insert(
            "header_name",
            json!({ "name": header.name, "title": header.title }),
        );
    }

    let contact = profile.contact.as_map();
    if !contact.is_empty() {
        overrides.insert("contact_info", json!({ "items": contact }));
    }

    if !profile.skills.is_empty() {
        overrides.insert("key_skills", json!({ "skills": profile.skills }));
    }

    if !profile.languages.is_empty() {
        overrides.insert("languages", json!({ "languages": profile.languages }));
    }

    let projects: Vec<Value> = profile
        .projects
        .iter()
        .filter(|p| !p.is_empty())
        .map(|p| json!([p.title, p.description, p.url]))
        .collect();
    if !projects.is_empty() {
        overrides.insert("projects", json!({ "items": projects }));
    }

    let summary = coerce_summary(&profile.summary);
    if !summary.is_empty() {
        overrides.insert(
            "text_section:summary",
            json!({ "section": "summary", "text": summary }),
        );
    }

    // social_links reads the contact keys directly.
    if !contact.is_empty() {
        overrides.insert("social_links", Value::Object(contact.clone()));
    }

    if let Some(avatar) = profile.avatar_b64.as_deref().filter(|s| !s.trim().is_empty()) {
        overrides.insert(
            "avatar_circle",
            json!({ "photo_b64": avatar, "max_d_mm": crate::blocks::data::DEFAULT_AVATAR_MM }),
        );
    }

    let education = education_items(&profile.education);
    if !education.is_empty() {
        overrides.insert("education", json!({ "items": education }));
    }

    overrides
}

/// A summary typed into a form as `"['line one', 'line two']"` becomes
/// `"line one line two"`. Anything that does not parse is kept as typed.
pub fn coerce_summary(summary: &str) -> String {
    let trimmed = summary.trim();
    if trimmed.starts_with('[') && trimmed.ends_with(']') {
        if let Some(items) = parse_list_literal(trimmed) {
            return items.join(" ");
        }
    }
    trimmed.to_string()
}

/// One newline-joined string per education entry; blank entries dropped.
pub fn education_items(entries: &[EducationEntry]) -> Vec<String> {
    entries.iter().filter_map(education_item).collect()
}

fn education_item(entry: &EducationEntry) -> Option<String> {
    let range = format!("{} \u{2013} {}", entry.start.trim(), entry.end.trim());
    let range = range.trim_matches(|c| c == ' ' || c == '\u{2013}');
    let lines: Vec<&str> = [
        entry.title.trim(),
        entry.school.trim(),
        range,
        entry.details.trim(),
        entry.url.trim(),
    ]
    .into_iter()
    .filter(|s| !s.is_empty())
    .collect();
    (!lines.is_empty()).then(|| lines.join("\n"))
}
