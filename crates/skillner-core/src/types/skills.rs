//! Skill list normalization.
//!
//! Datasets carry the skills of an example as a native list, a JSON list
//! encoded in a string, or a `;`/`,` delimited string. Everything ends up
//! as a plain `Vec<String>` without blank entries. Nothing here fails: an
//! encoding that cannot be understood becomes a one-element list holding
//! the raw string.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Normalize a skills field of any supported encoding.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use skillner_core::types::parse_skill_list;
///
/// assert_eq!(parse_skill_list(&json!(["React", "AWS"])), vec!["React", "AWS"]);
/// assert_eq!(parse_skill_list(&json!("React; AWS")), vec!["React", "AWS"]);
/// ```
pub fn parse_skill_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .filter(|s| !s.trim().is_empty())
            .collect(),
        Value::String(s) => parse_skill_str(s),
        _ => Vec::new(),
    }
}

/// Normalize a skills string: JSON list, `;`-list, `,`-list or a single skill.
pub fn parse_skill_str(raw: &str) -> Vec<String> {
    let s = raw.trim();
    if s.is_empty() {
        return Vec::new();
    }

    if s.starts_with('[') {
        if let Ok(value @ Value::Array(_)) = serde_json::from_str::<Value>(s) {
            return parse_skill_list(&value);
        }
    }

    for delimiter in [';', ','] {
        if s.contains(delimiter) {
            return s
                .split(delimiter)
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect();
        }
    }

    vec![s.to_string()]
}

/// Serde adapter for a `skills` field in any supported encoding.
pub fn deserialize_skills<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(parse_skill_list(&value))
}
