//! Global lookups shared by every pass: labels, kinds, projects and the
//! resolved triple list.

use std::collections::{BTreeSet, HashMap};
use tracing::debug;

use crate::model::{EntityKind, RawDocument};
use crate::source::RawDataset;
use crate::tables::translations::translate_label;
use crate::tables::vocabularies::UNKNOWN_PROJECT;

/// Relation name given to triples whose type cannot be resolved.
pub const UNKNOWN_RELATION: &str = "unknown_relation";

/// A relation with its type name resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triple {
    pub id: String,
    pub subject: String,
    pub relation: String,
    pub object: String,
}

impl Triple {
    pub fn new(subject: &str, relation: &str, object: &str) -> Self {
        Self {
            id: String::new(),
            subject: subject.to_string(),
            relation: relation.to_string(),
            object: object.to_string(),
        }
    }
}

/// Active documents and the lookups derived from them.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    labels: HashMap<String, String>,
    kinds: HashMap<String, EntityKind>,
    projects: HashMap<String, Vec<String>>,
    documents: HashMap<EntityKind, Vec<RawDocument>>,
    pub triples: Vec<Triple>,
}

impl Catalog {
    /// Keep active documents, translate labels, resolve projects and triples.
    pub fn build(dataset: RawDataset) -> Self {
        let usernames: HashMap<&str, &str> = dataset
            .users
            .iter()
            .map(|u| (u.id.as_str(), u.username.as_deref().unwrap_or(UNKNOWN_PROJECT)))
            .collect();

        let mut catalog = Catalog::default();
        let mut collections = dataset.collections;
        for kind in EntityKind::COLLECTIONS {
            let docs: Vec<RawDocument> = collections
                .remove(&kind)
                .unwrap_or_default()
                .into_iter()
                .filter(|d| d.active && !d.id.is_empty())
                .collect();
            for doc in &docs {
                catalog.kinds.insert(doc.id.clone(), kind);
                catalog
                    .labels
                    .insert(doc.id.clone(), translate_label(&doc.display_label()));
                if kind != EntityKind::Type {
                    catalog
                        .projects
                        .insert(doc.id.clone(), resolve_projects(doc, &usernames));
                }
            }
            catalog.documents.insert(kind, docs);
        }

        let relation_names: HashMap<&str, &str> = dataset
            .relation_types
            .iter()
            .filter(|t| t.active)
            .map(|t| (t.id.as_str(), t.name.as_deref().unwrap_or(UNKNOWN_RELATION)))
            .collect();

        let mut dropped = 0usize;
        for rel in dataset.relations.iter().filter(|r| r.active) {
            let (Some(subject), Some(object)) = (&rel.entity1, &rel.entity2) else {
                dropped += 1;
                continue;
            };
            let relation = rel
                .relation_type
                .as_deref()
                .and_then(|t| relation_names.get(t))
                .copied()
                .unwrap_or(UNKNOWN_RELATION);
            catalog.triples.push(Triple {
                id: rel.id.clone(),
                subject: subject.clone(),
                relation: relation.to_string(),
                object: object.clone(),
            });
        }
        if dropped > 0 {
            debug!(dropped, "Dropped relations with a missing endpoint");
        }
        catalog
    }

    pub fn documents(&self, kind: EntityKind) -> &[RawDocument] {
        self.documents
            .get(&kind)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn label(&self, id: &str) -> Option<&str> {
        self.labels.get(id).map(String::as_str)
    }

    /// Label of an id, or the fallback when the id is unknown.
    pub fn label_or(&self, id: &str, fallback: &str) -> String {
        self.label(id).unwrap_or(fallback).to_string()
    }

    pub fn kind(&self, id: &str) -> Option<EntityKind> {
        self.kinds.get(id).copied()
    }

    pub fn is_kind(&self, id: &str, kind: EntityKind) -> bool {
        self.kind(id) == Some(kind)
    }

    /// Reclassify an id, e.g. a manifestation found to be a volume.
    pub fn set_kind(&mut self, id: &str, kind: EntityKind) {
        if let Some(existing) = self.kinds.get_mut(id) {
            *existing = kind;
        }
    }

    /// Projects recorded for a document.
    pub fn projects(&self, id: &str) -> Option<&[String]> {
        self.projects.get(id).map(Vec::as_slice)
    }

    /// Projects of a document, `["Unknown Project"]` when it has none.
    pub fn projects_or_unknown(&self, id: &str) -> Vec<String> {
        self.projects(id)
            .map(<[String]>::to_vec)
            .unwrap_or_else(|| vec![UNKNOWN_PROJECT.to_string()])
    }

    /// Every distinct project name.
    pub fn all_projects(&self) -> BTreeSet<String> {
        self.projects.values().flatten().cloned().collect()
    }

    /// Test helper: register a document of a kind with a label and projects.
    pub fn register(&mut self, kind: EntityKind, doc: RawDocument, projects: &[&str]) {
        self.kinds.insert(doc.id.clone(), kind);
        self.labels.insert(doc.id.clone(), translate_label(&doc.display_label()));
        if kind != EntityKind::Type {
            let projects = if projects.is_empty() {
                vec![UNKNOWN_PROJECT.to_string()]
            } else {
                projects.iter().map(|p| p.to_string()).collect()
            };
            self.projects.insert(doc.id.clone(), projects);
        }
        self.documents.entry(kind).or_default().push(doc);
    }
}

fn resolve_projects(doc: &RawDocument, usernames: &HashMap<&str, &str>) -> Vec<String> {
    let lookup = |id: &str| usernames.get(id).copied().unwrap_or(UNKNOWN_PROJECT).to_string();
    if !doc.associated_users.is_empty() {
        let names: BTreeSet<String> = doc.associated_users.iter().map(|u| lookup(u)).collect();
        return names.into_iter().collect();
    }
    match &doc.creation_user {
        Some(user) => vec![lookup(user)],
        None => vec![UNKNOWN_PROJECT.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RawRelation, RawRelationType, RawUser};

    fn dataset() -> RawDataset {
        let mut data = RawDataset::new();
        let mut work = RawDocument::new("w1");
        work.associated_users = vec!["u2".into(), "u1".into(), "u2".into()];
        data.push_document(EntityKind::Work, work);
        let mut ty = RawDocument::new("t1");
        ty.label = Some("grc".into());
        data.push_document(EntityKind::Type, ty);
        let mut inactive = RawDocument::new("w2");
        inactive.active = false;
        data.push_document(EntityKind::Work, inactive);
        data.users = vec![
            RawUser { id: "u1".into(), username: Some("beta".into()) },
            RawUser { id: "u2".into(), username: Some("alpha".into()) },
        ];
        data.relation_types = vec![RawRelationType {
            id: "rt".into(),
            active: true,
            name: Some("work_has_classification".into()),
        }];
        data.relations = vec![
            RawRelation {
                id: "r1".into(),
                active: true,
                entity1: Some("w1".into()),
                entity2: Some("t1".into()),
                relation_type: Some("rt".into()),
            },
            RawRelation {
                id: "r2".into(),
                active: true,
                entity1: Some("w1".into()),
                entity2: None,
                relation_type: Some("rt".into()),
            },
            RawRelation {
                id: "r3".into(),
                active: true,
                entity1: Some("w1".into()),
                entity2: Some("t1".into()),
                relation_type: Some("missing".into()),
            },
        ];
        data
    }

    #[test]
    fn projects_are_sorted_unique_usernames() {
        let catalog = Catalog::build(dataset());
        assert_eq!(catalog.projects("w1"), Some(&["alpha".to_string(), "beta".to_string()][..]));
        assert_eq!(catalog.projects("t1"), None);
    }

    #[test]
    fn inactive_documents_are_skipped() {
        let catalog = Catalog::build(dataset());
        assert_eq!(catalog.kind("w2"), None);
        assert_eq!(catalog.documents(EntityKind::Work).len(), 1);
    }

    #[test]
    fn labels_pass_through_translation() {
        let catalog = Catalog::build(dataset());
        assert_eq!(catalog.label("t1"), Some("Ancient Greek"));
    }

    #[test]
    fn triples_resolve_names_and_drop_missing_endpoints() {
        let catalog = Catalog::build(dataset());
        let names: Vec<_> = catalog.triples.iter().map(|t| t.relation.as_str()).collect();
        assert_eq!(names, vec!["work_has_classification", UNKNOWN_RELATION]);
    }
}
