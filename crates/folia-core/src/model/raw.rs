//! Raw documents as delivered by a record source.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accept string, number or `{"$oid": ...}` ids.
fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_id(&value).unwrap_or_default())
}

fn optional_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_to_id))
}

fn id_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let values = Option::<Vec<Value>>::deserialize(deserializer)?;
    Ok(values
        .unwrap_or_default()
        .iter()
        .filter_map(value_to_id)
        .collect())
}

/// Stringify an id value.
pub fn value_to_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map.get("$oid").and_then(value_to_id),
        _ => None,
    }
}

fn text_of(value: &Option<Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Array(a)) if a.is_empty() => None,
        Some(other) => Some(other.to_string()),
    }
}

/// An entity or vocabulary document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDocument {
    #[serde(rename = "_id", deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub label: Option<Value>,
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(rename = "associatedUsers", default, deserialize_with = "id_list")]
    pub associated_users: Vec<String>,
    #[serde(rename = "creationUser", default, deserialize_with = "optional_id")]
    pub creation_user: Option<String>,
}

impl RawDocument {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            active: true,
            ..Self::default()
        }
    }

    /// First non-empty of `label`, `description`, `title`, `name`.
    pub fn display_label(&self) -> String {
        [&self.label, &self.description, &self.title, &self.name]
            .into_iter()
            .find_map(text_of)
            .unwrap_or_else(|| "Unknown Title".to_string())
    }

    /// The description, when it is a code starting with one of the prefixes.
    pub fn code_with_prefix(&self, prefixes: &[&str]) -> Option<String> {
        match &self.description {
            Some(Value::String(d)) if prefixes.iter().any(|p| d.starts_with(p)) => Some(d.clone()),
            _ => None,
        }
    }
}

/// A relation document: `entity1 --relationType--> entity2`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRelation {
    #[serde(rename = "_id", deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default, deserialize_with = "optional_id")]
    pub entity1: Option<String>,
    #[serde(default, deserialize_with = "optional_id")]
    pub entity2: Option<String>,
    #[serde(rename = "relationType", default, deserialize_with = "optional_id")]
    pub relation_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRelationType {
    #[serde(rename = "_id", deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawUser {
    #[serde(rename = "_id", deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
}
