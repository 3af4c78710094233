//! Materialized entity records.

use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

use super::facet::Facet;
use super::kind::EntityKind;
use super::position::StructuralPosition;
use super::transcription::Transcription;
use crate::dates::YearSpan;

/// Placeholder card value that does not count towards richness.
pub const NONE_PLACEHOLDER: &str = "<em>None</em>";

/// One public, searchable record.
///
/// The public JSON shape is `{<kind>_id, human_readable_id, <title key>,
/// projects, card, ...payload}`. Facets, spans, the structural position and
/// transcription variants are internal and never serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRecord {
    pub id: String,
    pub kind: EntityKind,
    pub human_readable_id: Option<String>,
    /// Composed display title. Deduplication keys on it.
    pub title: String,
    /// Value written under the kind's title key. Equal to `title` except for
    /// items, whose title key holds the shelf mark.
    pub label: String,
    pub projects: Vec<String>,
    pub card: Map<String, Value>,
    pub payload: Map<String, Value>,
    pub facets: BTreeMap<Facet, BTreeSet<String>>,
    pub position: Option<StructuralPosition>,
    /// Publication span, event span, physical-object span or lifespan.
    pub span: YearSpan,
    pub transcription: Option<Transcription>,
    /// Kinds of the entities mentioning an abstract character.
    pub mentioned_in: BTreeSet<String>,
}

impl EntityRecord {
    pub fn new(kind: EntityKind, id: impl Into<String>, title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            id: id.into(),
            kind,
            human_readable_id: None,
            label: title.clone(),
            title,
            projects: Vec::new(),
            card: Map::new(),
            payload: Map::new(),
            facets: BTreeMap::new(),
            position: None,
            span: YearSpan::default(),
            transcription: None,
            mentioned_in: BTreeSet::new(),
        }
    }

    /// Terms of a facet; empty when the record has none.
    pub fn facet(&self, facet: Facet) -> Option<&BTreeSet<String>> {
        self.facets.get(&facet)
    }

    /// Add lower-cased terms to a facet. Empty strings are skipped.
    pub fn add_terms<I, S>(&mut self, facet: Facet, terms: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entry = self.facets.entry(facet).or_default();
        for term in terms {
            let term = term.as_ref();
            if !term.is_empty() {
                entry.insert(term.to_lowercase());
            }
        }
    }

    /// Copy facets from a parent record.
    pub fn inherit_facets(&mut self, parent: &EntityRecord, facets: &[Facet]) {
        for facet in facets {
            if let Some(terms) = parent.facets.get(facet) {
                self.facets
                    .entry(*facet)
                    .or_default()
                    .extend(terms.iter().cloned());
            }
        }
    }

    /// Copy payload values from a parent record, `null` when it has none.
    pub fn inherit_payload(&mut self, parent: Option<&EntityRecord>, keys: &[&str]) {
        for key in keys {
            let value = parent
                .and_then(|p| p.payload.get(*key))
                .cloned()
                .unwrap_or(Value::Null);
            self.payload.insert((*key).to_string(), value);
        }
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.payload.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }

    /// Payload value as a string slice.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(Value::as_str)
    }

    /// Payload array of strings, skipping non-strings.
    pub fn get_strings(&self, key: &str) -> Vec<String> {
        match self.payload.get(key) {
            Some(Value::Array(values)) => values
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// `name` fields of a payload array of contributor objects.
    pub fn get_names(&self, key: &str) -> Vec<String> {
        match self.payload.get(key) {
            Some(Value::Array(values)) => values
                .iter()
                .filter_map(|v| v.get("name").and_then(Value::as_str).map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Whether a payload list is present and non-empty.
    pub fn has_entries(&self, key: &str) -> bool {
        matches!(self.payload.get(key), Some(Value::Array(values)) if !values.is_empty())
    }

    pub fn flag(&self, key: &str) -> bool {
        self.payload.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    /// The card title, falling back to the display title.
    pub fn card_title(&self) -> &str {
        self.card
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or(&self.title)
    }

    /// Count of populated card values. Lists count by length; empty values
    /// and the `None` placeholder count nothing.
    pub fn richness(&self) -> usize {
        self.card
            .values()
            .map(|value| match value {
                Value::Null | Value::Bool(false) => 0,
                Value::String(s) if s.is_empty() || s == NONE_PLACEHOLDER => 0,
                Value::Array(values) => values.len(),
                Value::Object(map) if map.is_empty() => 0,
                Value::Number(n) if n.as_f64() == Some(0.0) => 0,
                _ => 1,
            })
            .sum()
    }

    /// Value a public key resolves to, as seen by sorting and projection.
    pub fn public_value(&self, key: &str) -> Option<Value> {
        if key == self.kind.id_key() {
            return Some(Value::String(self.id.clone()));
        }
        match key {
            "human_readable_id" => Some(
                self.human_readable_id
                    .clone()
                    .map(Value::String)
                    .unwrap_or(Value::Null),
            ),
            "projects" => Some(Value::from(self.projects.clone())),
            "card" => Some(Value::Object(self.card.clone())),
            k if k == self.kind.title_key() => Some(Value::String(self.label.clone())),
            k => self.payload.get(k).cloned(),
        }
    }

    /// Public JSON object.
    pub fn to_json(&self) -> Map<String, Value> {
        let mut out = Map::new();
        out.insert(self.kind.id_key(), Value::String(self.id.clone()));
        out.insert(
            "human_readable_id".to_string(),
            self.human_readable_id
                .clone()
                .map(Value::String)
                .unwrap_or(Value::Null),
        );
        out.insert(
            self.kind.title_key().to_string(),
            Value::String(self.label.clone()),
        );
        out.insert("projects".to_string(), Value::from(self.projects.clone()));
        out.insert("card".to_string(), Value::Object(self.card.clone()));
        for (key, value) in &self.payload {
            out.insert(key.clone(), value.clone());
        }
        out
    }
}
