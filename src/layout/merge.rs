//! Override merging.
//!
//! Overrides only ever fill gaps: a key the destination already has is never
//! replaced, nested objects are merged key by key, and arrays are treated as
//! opaque values (never concatenated or merged element-wise).

use serde_json::{Map, Value};

use crate::blocks::base_type;

/// Fill keys missing from `dst` with the values in `src`, recursing into
/// objects both sides have.
pub fn deep_merge(dst: &mut Map<String, Value>, src: &Map<String, Value>) {
    for (key, value) in src {
        if let (Some(Value::Object(d)), Value::Object(s)) = (dst.get_mut(key), value) {
            deep_merge(d, s);
        } else if !dst.contains_key(key) {
            dst.insert(key.clone(), value.clone());
        }
    }
}

/// Combine the layout's own overrides with the ones derived from the
/// profile. Entries written into the layout win.
pub fn merge_overrides(layout: &Map<String, Value>, derived: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = layout.clone();
    deep_merge(&mut merged, derived);
    merged
}

/// The data a block instance renders with: its inline data, with the
/// override for its id (or, failing that, its base type) filling the gaps.
pub fn effective_data(block_id: &str, inline: Option<&Value>, overrides: &Map<String, Value>) -> Value {
    let mut data = match inline {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    };
    let entry = overrides
        .get(block_id)
        .or_else(|| overrides.get(base_type(block_id)));
    if let Some(over) = entry.and_then(override_data) {
        deep_merge(&mut data, over);
    }
    Value::Object(data)
}

/// An override entry is `{"data": {...}}`; a bare object is accepted too.
fn override_data(entry: &Value) -> Option<&Map<String, Value>> {
    let map = entry.as_object()?;
    match map.get("data") {
        Some(Value::Object(data)) => Some(data),
        Some(_) => None,
        None => Some(map),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn fills_only_missing_keys() {
        let mut dst = obj(json!({"a": 1, "n": {"x": 1}}));
        deep_merge(&mut dst, &obj(json!({"a": 2, "b": 3, "n": {"x": 9, "y": 2}})));
        assert_eq!(Value::Object(dst), json!({"a": 1, "n": {"x": 1, "y": 2}, "b": 3}));
    }

    #[test]
    fn arrays_are_replaced_never_merged() {
        let mut dst = obj(json!({"items": ["a"]}));
        deep_merge(&mut dst, &obj(json!({"items": ["b", "c"]})));
        assert_eq!(Value::Object(dst), json!({"items": ["a"]}));
    }

    #[test]
    fn merging_twice_changes_nothing() {
        let src = obj(json!({"a": {"b": [1, 2]}, "c": "x"}));
        let mut once = obj(json!({"a": {"z": 1}}));
        deep_merge(&mut once, &src);
        let mut twice = once.clone();
        deep_merge(&mut twice, &src);
        assert_eq!(once, twice);
    }

    #[test]
    fn inline_data_wins() {
        let overrides = obj(json!({"projects": {"data": {"title": "Work", "items": [["A"]]}}}));
        let data = effective_data("projects", Some(&json!({"title": "Side projects"})), &overrides);
        assert_eq!(data, json!({"title": "Side projects", "items": [["A"]]}));
    }

    #[test]
    fn parametrized_id_falls_back_to_base_type() {
        let overrides = obj(json!({"text_section": {"data": {"text": "generic"}}}));
        assert_eq!(
            effective_data("text_section:about", None, &overrides),
            json!({"text": "generic"})
        );
        let overrides = obj(json!({
            "text_section": {"data": {"text": "generic"}},
            "text_section:about": {"data": {"text": "about"}}
        }));
        assert_eq!(
            effective_data("text_section:about", None, &overrides),
            json!({"text": "about"})
        );
    }

    #[test]
    fn bare_override_objects_accepted() {
        let overrides = obj(json!({"header_name": {"name": "Ada"}}));
        assert_eq!(effective_data("header_name", None, &overrides), json!({"name": "Ada"}));
    }

    #[test]
    fn layout_overrides_win_over_derived() {
        let layout = obj(json!({"avatar_circle": {"data": {"max_d_mm": 30}}}));
        let derived = obj(json!({"avatar_circle": {"data": {"photo_b64": "x", "max_d_mm": 42}}}));
        assert_eq!(
            Value::Object(merge_overrides(&layout, &derived)),
            json!({"avatar_circle": {"data": {"max_d_mm": 30, "photo_b64": "x"}}})
        );
    }
}
