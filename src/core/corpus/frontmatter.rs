//! Front matter parsing for content files.
//!
//! Front matter is normalized into a JSON object with lowercased keys, so
//! `linkTitle`, `LinkTitle` and `linktitle` all name the same parameter.
//! Typed fields are then read out of that object.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Number, Value};

/// Delimiter types for front matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontmatterFormat {
    /// YAML front matter delimited by `---`.
    Yaml,
    /// TOML front matter delimited by `+++`.
    Toml,
    /// JSON object at the start of the file.
    Json,
}

/// Split content into front matter and body.
///
/// Returns `None` when the file has no front matter.
pub fn split_frontmatter(content: &str) -> Option<(FrontmatterFormat, &str, &str)> {
    let content = content.trim_start_matches('\u{feff}').trim_start();

    if content.starts_with('{') {
        return split_json(content).map(|(fm, body)| (FrontmatterFormat::Json, fm, body));
    }

    let (format, delimiter) = if content.starts_with("---") {
        (FrontmatterFormat::Yaml, "---")
    } else if content.starts_with("+++") {
        (FrontmatterFormat::Toml, "+++")
    } else {
        return None;
    };

    // The closing delimiter must start a line
    let after_first = &content[delimiter.len()..];
    let closing = after_first.find(&format!("\n{delimiter}"))?;

    let frontmatter = after_first[..closing].trim();
    let body = &after_first[closing + 1 + delimiter.len()..];
    let body = body.trim_start_matches(['\r', '\n']);

    Some((format, frontmatter, body))
}

/// Find the end of a leading JSON object by brace matching.
fn split_json(content: &str) -> Option<(&str, &str)> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, c) in content.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    let end = idx + c.len_utf8();
                    return Some((&content[..end], content[end..].trim_start()));
                }
            }
            _ => {}
        }
    }

    None
}

/// Parse a front matter block into a lowercased JSON object.
pub fn parse_params(format: FrontmatterFormat, raw: &str) -> Result<Map<String, Value>, String> {
    let value = match format {
        FrontmatterFormat::Toml => {
            let table: toml::Table = toml::from_str(raw).map_err(|e| e.to_string())?;
            toml_to_json(toml::Value::Table(table))
        }
        FrontmatterFormat::Yaml => {
            if raw.trim().is_empty() {
                Value::Object(Map::new())
            } else {
                let yaml: serde_yaml::Value =
                    serde_yaml::from_str(raw).map_err(|e| e.to_string())?;
                yaml_to_json(yaml)?
            }
        }
        FrontmatterFormat::Json => serde_json::from_str(raw).map_err(|e| e.to_string())?,
    };

    match lowercase_keys(value) {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(format!("front matter must be a map, got {other}")),
    }
}

pub(crate) fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

pub(crate) fn yaml_to_json(value: serde_yaml::Value) -> Result<Value, String> {
    Ok(match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Number(u.into())
            } else {
                n.as_f64()
                    .and_then(Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(yaml_to_json)
                .collect::<Result<_, _>>()?,
        ),
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = Map::new();
            for (k, v) in mapping {
                let key = match k {
                    serde_yaml::Value::String(s) => s,
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported map key: {other:?}")),
                };
                map.insert(key, yaml_to_json(v)?);
            }
            Value::Object(map)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}

pub(crate) fn lowercase_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k.to_lowercase(), lowercase_keys(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(lowercase_keys).collect()),
        other => other,
    }
}

/// Typed view of the front matter fields the corpus cares about.
///
/// Fields are read leniently: a scalar where a string is expected is
/// stringified, a single string where a list is expected becomes a
/// one-element list, and a value of the wrong shape falls back to the
/// field default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrontMatter {
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub linktitle: Option<String>,

    #[serde(default, rename = "type", deserialize_with = "lenient::opt_string")]
    pub kind: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub date: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub publishdate: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub lastmod: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub expirydate: Option<String>,

    #[serde(default, deserialize_with = "lenient::boolean")]
    pub draft: bool,

    #[serde(default, deserialize_with = "lenient::boolean")]
    pub headless: bool,

    #[serde(default, deserialize_with = "lenient::string_list")]
    pub keywords: Vec<String>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub slug: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub url: Option<String>,

    #[serde(default, deserialize_with = "lenient::integer")]
    pub weight: i64,

    #[serde(default, rename = "iscjklanguage", deserialize_with = "lenient::opt_boolean")]
    pub is_cjk_language: Option<bool>,
}

impl FrontMatter {
    pub fn from_params(params: &Map<String, Value>) -> Result<Self, String> {
        serde_json::from_value(Value::Object(params.clone())).map_err(|e| e.to_string())
    }
}

/// Casting deserializers for loosely typed front matter values
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn scalar(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn truthy(value: &Value) -> Option<bool> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::String(s) => s.trim().to_ascii_lowercase().parse().ok(),
            Value::Number(n) => n.as_f64().map(|f| f != 0.0),
            _ => None,
        }
    }

    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(scalar(&value).unwrap_or_default())
    }

    pub fn opt_string<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(scalar(&value))
    }

    pub fn string_list<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<String>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match &value {
            Value::Array(items) => items.iter().filter_map(scalar).collect(),
            other => scalar(other).into_iter().collect(),
        })
    }

    pub fn boolean<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(truthy(&value).unwrap_or_default())
    }

    pub fn opt_boolean<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<bool>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(truthy(&value))
    }

    pub fn integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match &value {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
        .unwrap_or_default())
    }
}

/// Parse the date formats found in front matter.
///
/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD HH:MM:SS` and
/// `YYYY-MM-DD`. Dates without an offset are taken as UTC.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
