//! Detail cache
//!
//! Per-entity relationship lists and kind-specific extras served by the
//! detail endpoint. Ids that lost deduplication alias the winner's entry, so
//! later passes writing through a losing id land on the winner.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

use super::kind::EntityKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Outgoing,
    Incoming,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationGroup {
    Parent,
    Child,
    Personal,
    Mention,
    Other,
}

impl RelationGroup {
    pub fn is_structural(&self) -> bool {
        matches!(self, RelationGroup::Parent | RelationGroup::Child)
    }
}

/// Compact view of a related entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MinimalEntity {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub label: String,
    pub card: Map<String, Value>,
}

/// One edge in an entity's detail view.
///
/// Serialized with `target_*` keys when outgoing and `source_*` keys when
/// incoming.
#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    pub relation_type: String,
    pub direction: Direction,
    pub group: RelationGroup,
    pub related_id: String,
    pub related_type: String,
    pub related_label: String,
    pub related_card: Map<String, Value>,
}

impl Relationship {
    pub fn outgoing(relation_type: impl Into<String>, group: RelationGroup, target: MinimalEntity) -> Self {
        Self::from_entity(relation_type.into(), Direction::Outgoing, group, target)
    }

    pub fn incoming(relation_type: impl Into<String>, group: RelationGroup, source: MinimalEntity) -> Self {
        Self::from_entity(relation_type.into(), Direction::Incoming, group, source)
    }

    fn from_entity(
        relation_type: String,
        direction: Direction,
        group: RelationGroup,
        entity: MinimalEntity,
    ) -> Self {
        Self {
            relation_type,
            direction,
            group,
            related_id: entity.id,
            related_type: entity.kind,
            related_label: entity.label,
            related_card: entity.card,
        }
    }
}

impl Serialize for Relationship {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let prefix = match self.direction {
            Direction::Outgoing => "target",
            Direction::Incoming => "source",
        };
        let mut map = serializer.serialize_map(Some(7))?;
        map.serialize_entry("type", &self.relation_type)?;
        map.serialize_entry("direction", &self.direction)?;
        map.serialize_entry("group", &self.group)?;
        map.serialize_entry(&format!("{prefix}_id"), &self.related_id)?;
        map.serialize_entry(&format!("{prefix}_type"), &self.related_type)?;
        map.serialize_entry(&format!("{prefix}_label"), &self.related_label)?;
        map.serialize_entry(&format!("{prefix}_card"), &self.related_card)?;
        map.end()
    }
}

/// Detail view of one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailEntry {
    pub kind: EntityKind,
    /// Kind-specific scalar fields, e.g. `work_title`.
    pub fields: Map<String, Value>,
    pub relationships: Vec<Relationship>,
    /// Persons and institutions: English role to related entities.
    pub roles_with_entities: Option<BTreeMap<String, Vec<MinimalEntity>>>,
    /// Visual objects: group label to related entities.
    pub grouped_relationships: Option<BTreeMap<String, Vec<MinimalEntity>>>,
    pub projects: Vec<String>,
}

impl DetailEntry {
    pub fn new(kind: EntityKind, projects: Vec<String>) -> Self {
        Self {
            kind,
            fields: Map::new(),
            relationships: Vec::new(),
            roles_with_entities: None,
            grouped_relationships: None,
            projects,
        }
    }

    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn with_roles(mut self) -> Self {
        self.roles_with_entities = Some(BTreeMap::new());
        self
    }

    pub fn with_groups(mut self) -> Self {
        self.grouped_relationships = Some(BTreeMap::new());
        self
    }

    /// Append a relationship unless an equivalent one is already present.
    ///
    /// Parent/child edges are unique per related id within their group; all
    /// other edges are unique per (related id, type) within their group.
    pub fn add_relationship(&mut self, rel: Relationship) -> bool {
        let duplicate = self.relationships.iter().any(|existing| {
            existing.group == rel.group
                && existing.related_id == rel.related_id
                && (rel.group.is_structural() || existing.relation_type == rel.relation_type)
        });
        if !duplicate {
            self.relationships.push(rel);
        }
        !duplicate
    }

    /// Add an entity under a role. Entries without a role map are left alone.
    pub fn add_role(&mut self, role: &str, entity: MinimalEntity) {
        if let Some(roles) = self.roles_with_entities.as_mut() {
            roles.entry(role.to_string()).or_default().push(entity);
        }
    }

    /// Add an entity under a visual-object group.
    pub fn add_grouped(&mut self, label: &str, entity: MinimalEntity) {
        if let Some(groups) = self.grouped_relationships.as_mut() {
            groups.entry(label.to_string()).or_default().push(entity);
        }
    }
}

impl Serialize for DetailEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.serialize_entry("relationships", &self.relationships)?;
        if let Some(roles) = &self.roles_with_entities {
            map.serialize_entry("roles_with_entities", roles)?;
        }
        if let Some(groups) = &self.grouped_relationships {
            map.serialize_entry("grouped_relationships", groups)?;
        }
        map.serialize_entry("projects", &self.projects)?;
        map.end()
    }
}

/// All detail entries of a snapshot.
#[derive(Debug, Clone, Default)]
pub struct DetailCache {
    entries: HashMap<String, DetailEntry>,
    aliases: HashMap<String, String>,
}

impl DetailCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, entry: DetailEntry) {
        let id = id.into();
        self.aliases.remove(&id);
        self.entries.insert(id, entry);
    }

    /// Route a losing id to the winner's entry.
    pub fn alias(&mut self, id: impl Into<String>, winner: impl Into<String>) {
        let id = id.into();
        let winner = winner.into();
        if id != winner {
            self.entries.remove(&id);
            for target in self.aliases.values_mut() {
                if *target == id {
                    *target = winner.clone();
                }
            }
            self.aliases.insert(id, winner);
        }
    }

    fn resolve<'a>(&'a self, id: &'a str) -> &'a str {
        self.aliases.get(id).map(String::as_str).unwrap_or(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(self.resolve(id))
    }

    pub fn get(&self, id: &str) -> Option<&DetailEntry> {
        self.entries.get(self.resolve(id))
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut DetailEntry> {
        let key = self.resolve(id).to_string();
        self.entries.get_mut(&key)
    }

    /// Entry for an id, only when it belongs to the given kind.
    pub fn lookup(&self, kind: EntityKind, id: &str) -> Option<&DetailEntry> {
        self.get(id).filter(|entry| entry.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut DetailEntry)> {
        self.entries.iter_mut()
    }
}
