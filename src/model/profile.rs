//! The user profile: structured personal data feeding the data mapper.
//!
//! Profiles arrive from form UIs and hand-edited JSON files, so every field
//! is forgiving: `null` reads as absent, list elements may be sequences or
//! objects, and scalars are stringified rather than rejected.

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A complete résumé profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, deserialize_with = "nullable")]
    pub header: Header,

    #[serde(default, deserialize_with = "nullable")]
    pub contact: Contact,

    /// Free text. A list of strings is joined with single spaces on input.
    #[serde(default, deserialize_with = "summary_text")]
    pub summary: String,

    #[serde(default, deserialize_with = "string_list")]
    pub skills: Vec<String>,

    #[serde(default, deserialize_with = "string_list")]
    pub languages: Vec<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub projects: Vec<ProjectEntry>,

    #[serde(default, deserialize_with = "nullable")]
    pub education: Vec<EducationEntry>,

    /// Base64-encoded headshot.
    #[serde(default, alias = "avatar", skip_serializing_if = "Option::is_none")]
    pub avatar_b64: Option<String>,
}

impl Profile {
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Header {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
}

/// Contact fields in their original order (email, phone, website, social
/// handles, location, and whatever else the form collected).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Contact(pub Map<String, Value>);

impl Contact {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Field/value pairs with a non-blank value.
    pub fn entries(&self) -> impl Iterator<Item = (&str, String)> + '_ {
        self.0.iter().filter_map(|(k, v)| {
            let text = value_text(v);
            let text = text.trim();
            if text.is_empty() {
                None
            } else {
                Some((k.as_str(), text.to_string()))
            }
        })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.0.get(key).map(value_text).filter(|s| !s.trim().is_empty())
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// A project as `(title, description, url)`.
///
/// Accepts `["title", "desc", "url"]`, `{"title"|"name", "desc"|"description", "url"}`,
/// or a bare string used as the title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectEntry {
    pub title: String,
    pub description: String,
    pub url: String,
}

impl ProjectEntry {
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.description.is_empty() && self.url.is_empty()
    }

    pub(crate) fn from_value(value: &Value) -> Self {
        match value {
            Value::Array(items) => {
                let field = |i: usize| items.get(i).map(value_text).unwrap_or_default();
                Self {
                    title: field(0).trim().to_string(),
                    description: field(1).trim().to_string(),
                    url: field(2).trim().to_string(),
                }
            }
            Value::Object(map) => Self {
                title: first_text(map, &["name", "title"]),
                description: first_text(map, &["desc", "description"]),
                url: first_text(map, &["url"]),
            },
            other => Self {
                title: value_text(other).trim().to_string(),
                ..Default::default()
            },
        }
    }
}

impl<'de> Deserialize<'de> for ProjectEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// An education row: title, school, start, end, details, url.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EducationEntry {
    pub title: String,
    pub school: String,
    pub start: String,
    pub end: String,
    pub details: String,
    pub url: String,
}

impl EducationEntry {
    pub(crate) fn from_value(value: &Value) -> Self {
        match value {
            Value::Array(items) => {
                let field = |i: usize| items.get(i).map(value_text).unwrap_or_default();
                Self {
                    title: field(0),
                    school: field(1),
                    start: field(2),
                    end: field(3),
                    details: field(4),
                    url: field(5),
                }
            }
            Value::Object(map) => Self {
                title: first_text(map, &["title", "program"]),
                school: first_text(map, &["school", "institution"]),
                start: first_text(map, &["start"]),
                end: first_text(map, &["end"]),
                details: first_text(map, &["details", "description"]),
                url: first_text(map, &["url"]),
            },
            Value::Null => Self::default(),
            other => Self {
                details: value_text(other),
                ..Default::default()
            },
        }
    }
}

impl<'de> Deserialize<'de> for EducationEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// Stringify a scalar JSON value. `null` becomes the empty string.
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// First non-blank value among `keys`, trimmed.
fn first_text(map: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|k| map.get(*k))
        .map(|v| value_text(v).trim().to_string())
        .find(|s| !s.is_empty())
        .unwrap_or_default()
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter(|v| !v.is_null())
            .map(value_text)
            .collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => vec![value_text(&other)],
    })
}

fn summary_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(value_text)
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" "),
        Some(other) => value_text(&other),
        None => String::new(),
    })
}
