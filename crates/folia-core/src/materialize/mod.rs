//! Entity Materializers
//!
//! One materializer per kind turns raw documents plus the indexer's
//! projections into public [`EntityRecord`]s and detail-cache stubs.
//!
//! Every materializer follows the same steps:
//!
//! 1. **Filter** on the kind's defining attribute.
//! 2. **Project** parent records and indexer values into the record.
//! 3. **Compose** the display title.
//! 4. **Deduplicate** on (title, code) through a [`Deduplicator`]; the richer
//!    card wins and the losing id aliases the winner's detail entry.
//!
//! Kinds run in dependency order so parents are materialized before their
//! children read them (see [`materialize_all`]).

mod abstract_character;
mod event;
mod expression;
mod hypothesis;
mod institution;
mod item;
mod manifestation;
mod page;
mod person;
mod physical_object;
mod place;
mod visual_object;
mod work;

use serde_json::{json, Map, Value};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

use crate::catalog::Catalog;
use crate::index::{IndexContext, TextSlot};
use crate::model::{DetailCache, DetailEntry, EntityKind, EntityRecord, RawDocument};
use crate::tables::vocabularies::UNKNOWN_PROJECT;

/// Read-only inputs shared by every materializer.
#[derive(Clone, Copy)]
pub struct Lookups<'a> {
    pub catalog: &'a Catalog,
    pub index: &'a IndexContext,
}

/// How a contributor object is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContributorStyle {
    /// Work authors: `Unknown Author`/`Unknown Institution` fallbacks and no
    /// institution dates.
    Author,
    Full,
}

impl<'a> Lookups<'a> {
    pub fn new(catalog: &'a Catalog, index: &'a IndexContext) -> Self {
        Self { catalog, index }
    }

    pub fn label_or(&self, id: &str, fallback: &str) -> String {
        self.catalog.label_or(id, fallback)
    }

    /// Indexer scalar, then the raw label, then the fallback.
    pub fn text_or_label(&self, slot: TextSlot, id: &str, fallback: &str) -> String {
        self.index
            .text(slot, id)
            .map(str::to_string)
            .unwrap_or_else(|| self.label_or(id, fallback))
    }

    pub fn kind(&self, id: &str) -> Option<EntityKind> {
        self.catalog.kind(id)
    }

    pub fn code(&self, doc: &RawDocument, kind: EntityKind) -> Option<String> {
        doc.code_with_prefix(kind.code_prefixes())
    }

    pub fn projects(&self, id: &str) -> Vec<String> {
        self.catalog.projects_or_unknown(id)
    }

    /// Own projects, or the parent's when the document records none.
    pub fn projects_or_parent(&self, id: &str, parent: Option<&EntityRecord>) -> Vec<String> {
        match (self.catalog.projects(id), parent) {
            (Some(own), _) if !own.is_empty() => own.to_vec(),
            (_, Some(parent)) => parent.projects.clone(),
            _ => vec![UNKNOWN_PROJECT.to_string()],
        }
    }

    /// Own projects, or the parent's when the own list is only the unknown
    /// placeholder.
    pub fn projects_unless_unknown(&self, id: &str, parent: Option<&EntityRecord>) -> Vec<String> {
        let own = self.projects(id);
        match parent {
            Some(parent) if is_unknown_projects(&own) => parent.projects.clone(),
            _ => own,
        }
    }

    pub fn hypotheses(&self, id: &str) -> Value {
        serde_json::to_value(self.index.hypotheses(id)).unwrap_or_else(|_| json!([]))
    }

    pub fn person_name(&self, id: &str) -> Option<&str> {
        self.index.text(TextSlot::PersonName, id)
    }

    pub fn institution_name(&self, id: &str) -> Option<&str> {
        self.index.text(TextSlot::InstitutionName, id)
    }

    /// Contributor object for a person or an institution; `None` otherwise.
    pub fn contributor(&self, id: &str, style: ContributorStyle) -> Option<Value> {
        let text = |slot: TextSlot| {
            self.index
                .text(slot, id)
                .map(|v| Value::String(v.to_string()))
                .unwrap_or(Value::Null)
        };
        match self.kind(id)? {
            EntityKind::Person => {
                let fallback = match style {
                    ContributorStyle::Author => "Unknown Author",
                    ContributorStyle::Full => "Unknown",
                };
                let name = self
                    .person_name(id)
                    .map(str::to_string)
                    .unwrap_or_else(|| self.label_or(id, fallback));
                Some(json!({
                    "id": id,
                    "name": name,
                    "type": "person",
                    "birth_date": text(TextSlot::PersonBirthDate),
                    "birth_date_notes": text(TextSlot::PersonBirthDateNotes),
                    "death_date": text(TextSlot::PersonDeathDate),
                    "death_date_notes": text(TextSlot::PersonDeathDateNotes),
                }))
            }
            EntityKind::Institution => {
                let fallback = match style {
                    ContributorStyle::Author => "Unknown Institution",
                    ContributorStyle::Full => "Unknown",
                };
                let name = self
                    .institution_name(id)
                    .map(str::to_string)
                    .unwrap_or_else(|| self.label_or(id, fallback));
                Some(match style {
                    ContributorStyle::Author => json!({
                        "id": id,
                        "name": name,
                        "type": "institution",
                    }),
                    ContributorStyle::Full => json!({
                        "id": id,
                        "name": name,
                        "type": "institution",
                        "founding_date": text(TextSlot::InstitutionFoundingDate),
                        "dissolution_date": text(TextSlot::InstitutionDissolutionDate),
                    }),
                })
            }
            _ => None,
        }
    }

    /// Contributor objects sorted by name. Ids are taken as given.
    pub fn contributors<'i, I>(&self, ids: I, style: ContributorStyle) -> Vec<Value>
    where
        I: IntoIterator<Item = &'i String>,
    {
        let mut out: Vec<Value> = ids
            .into_iter()
            .filter_map(|id| self.contributor(id, style))
            .collect();
        out.sort_by(|a, b| contributor_name(a).cmp(contributor_name(b)));
        out
    }

    /// Sorted unique display names of persons or institutions.
    pub fn resolve_names(&self, ids: &[String]) -> Vec<String> {
        let names: BTreeSet<String> = ids
            .iter()
            .map(|id| {
                self.person_name(id)
                    .or_else(|| self.institution_name(id))
                    .map(str::to_string)
                    .unwrap_or_else(|| self.label_or(id, "Unknown"))
            })
            .collect();
        names.into_iter().collect()
    }
}

pub fn is_unknown_projects(projects: &[String]) -> bool {
    projects.len() == 1 && projects[0] == UNKNOWN_PROJECT
}

pub fn contributor_name(value: &Value) -> &str {
    value.get("name").and_then(Value::as_str).unwrap_or_default()
}

pub fn contributor_names(values: &[Value]) -> Vec<String> {
    values.iter().map(|v| contributor_name(v).to_string()).collect()
}

/// Unwrap a `json!` object literal.
pub fn json_map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Sorted unique copy of a list.
pub fn sorted_unique(values: &[String]) -> Vec<String> {
    values
        .iter()
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Records of one kind after deduplication.
///
/// Every offered id, winner or not, resolves to the record that currently
/// holds its dedup slot.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    records: Vec<EntityRecord>,
    index: HashMap<String, usize>,
}

impl RecordSet {
    pub fn get(&self, id: &str) -> Option<&EntityRecord> {
        self.index.get(id).map(|i| &self.records[*i])
    }

    pub fn records(&self) -> &[EntityRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<EntityRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Change to the detail cache, replayed in order when a batch is absorbed.
#[derive(Debug, Clone)]
enum DetailOp {
    Insert(String, DetailEntry),
    Alias(String, String),
}

/// Collapses records sharing a dedup key, keeping the richest.
#[derive(Debug)]
pub struct Deduplicator {
    kind: EntityKind,
    set: RecordSet,
    slots: HashMap<(String, Option<String>), usize>,
    ops: Vec<DetailOp>,
    replaced: usize,
    dropped: usize,
}

impl Deduplicator {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            set: RecordSet::default(),
            slots: HashMap::new(),
            ops: Vec::new(),
            replaced: 0,
            dropped: 0,
        }
    }

    /// Offer a record keyed on its title and code.
    pub fn offer(&mut self, record: EntityRecord, entry: DetailEntry) {
        let key = (record.title.clone(), record.human_readable_id.clone());
        self.offer_keyed(key, record, entry);
    }

    /// Offer a record under an explicit key.
    pub fn offer_keyed(&mut self, key: (String, Option<String>), record: EntityRecord, entry: DetailEntry) {
        let id = record.id.clone();
        match self.slots.get(&key).copied() {
            None => {
                let slot = self.set.records.len();
                self.slots.insert(key, slot);
                self.set.records.push(record);
                self.set.index.insert(id.clone(), slot);
                self.ops.push(DetailOp::Insert(id, entry));
            }
            Some(slot) => {
                let existing = &self.set.records[slot];
                let winner = existing.id.clone();
                if record.richness() > existing.richness() {
                    self.set.records[slot] = record;
                    self.set.index.insert(id.clone(), slot);
                    self.ops.push(DetailOp::Insert(id.clone(), entry));
                    self.ops.push(DetailOp::Alias(winner, id));
                    self.replaced += 1;
                } else {
                    self.set.index.insert(id.clone(), slot);
                    self.ops.push(DetailOp::Alias(id, winner));
                    self.dropped += 1;
                }
            }
        }
    }

    /// Detail entry for a kind that has no public records.
    pub fn detail_only(&mut self, id: &str, entry: DetailEntry) {
        self.ops.push(DetailOp::Insert(id.to_string(), entry));
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

/// All materialized records plus the detail cache.
#[derive(Debug, Default)]
pub struct Materialized {
    sets: HashMap<EntityKind, RecordSet>,
    pub details: DetailCache,
}

impl Materialized {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a finished batch.
    pub fn absorb(&mut self, batch: Deduplicator) {
        debug!(
            kind = %batch.kind,
            records = batch.set.len(),
            replaced = batch.replaced,
            merged = batch.dropped,
            "Materialized kind"
        );
        for op in batch.ops {
            match op {
                DetailOp::Insert(id, entry) => self.details.insert(id, entry),
                DetailOp::Alias(id, winner) => self.details.alias(id, winner),
            }
        }
        self.sets.insert(batch.kind, batch.set);
    }

    pub fn set(&self, kind: EntityKind) -> Option<&RecordSet> {
        self.sets.get(&kind)
    }

    pub fn records(&self, kind: EntityKind) -> &[EntityRecord] {
        self.sets
            .get(&kind)
            .map(RecordSet::records)
            .unwrap_or_default()
    }

    pub fn get(&self, kind: EntityKind, id: &str) -> Option<&EntityRecord> {
        self.sets.get(&kind).and_then(|s| s.get(id))
    }

    /// Move the record sets out, leaving the detail cache in place.
    pub fn take_sets(&mut self) -> HashMap<EntityKind, RecordSet> {
        std::mem::take(&mut self.sets)
    }

    pub fn record_count(&self) -> usize {
        self.sets.values().map(RecordSet::len).sum()
    }
}

/// Run every materializer in dependency order.
pub fn materialize_all(lookups: Lookups<'_>) -> Materialized {
    let mut out = Materialized::new();
    out.absorb(person::materialize(lookups));
    out.absorb(institution::materialize(lookups));
    out.absorb(event::materialize(lookups));
    out.absorb(place::materialize(lookups));
    out.absorb(abstract_character::materialize(lookups));
    out.absorb(hypothesis::materialize(lookups));
    out.absorb(work::materialize(lookups));
    let batch = expression::materialize(lookups, &out);
    out.absorb(batch);
    let (manifestations, volumes) = manifestation::materialize(lookups, &out);
    out.absorb(volumes);
    out.absorb(manifestations);
    let batch = item::materialize(lookups, &out);
    out.absorb(batch);
    let batch = visual_object::materialize(lookups, &out);
    out.absorb(batch);
    let batch = page::materialize(lookups, &out);
    out.absorb(batch);
    let batch = physical_object::materialize(lookups, &out);
    out.absorb(batch);
    out
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Small catalogs for materializer tests.

    use crate::catalog::{Catalog, Triple};
    use crate::model::{EntityKind, RawDocument};

    pub struct Fixture {
        pub catalog: Catalog,
    }

    impl Fixture {
        pub fn new() -> Self {
            Self {
                catalog: Catalog::default(),
            }
        }

        /// Register a document with a label and an optional code.
        pub fn doc(&mut self, kind: EntityKind, id: &str, label: &str, code: Option<&str>) -> &mut Self {
            let mut doc = RawDocument::new(id);
            doc.label = Some(serde_json::Value::String(label.to_string()));
            doc.description = code.map(|c| serde_json::Value::String(c.to_string()));
            self.catalog.register(kind, doc, &["alpha"]);
            self
        }

        /// A vocabulary value used as the object of an attribute relation.
        pub fn value(&mut self, id: &str, label: &str) -> &mut Self {
            self.doc(EntityKind::Type, id, label, None)
        }

        pub fn rel(&mut self, subject: &str, relation: &str, object: &str) -> &mut Self {
            self.catalog.triples.push(Triple::new(subject, relation, object));
            self
        }

        /// Attribute relation to a fresh vocabulary value.
        pub fn attr(&mut self, subject: &str, relation: &str, label: &str) -> &mut Self {
            let value_id = format!("{subject}:{relation}:{label}");
            self.value(&value_id, label);
            self.rel(subject, relation, &value_id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntityKind;

    fn record(id: &str, title: &str, card: Value) -> EntityRecord {
        let mut record = EntityRecord::new(EntityKind::Work, id, title);
        if let Value::Object(map) = card {
            record.card = map;
        }
        record
    }

    fn entry() -> DetailEntry {
        DetailEntry::new(EntityKind::Work, vec![])
    }

    #[test]
    fn richer_duplicate_replaces_the_earlier_record() {
        let mut dedup = Deduplicator::new(EntityKind::Work);
        dedup.offer(record("w1", "De Rerum Natura", json!({"title": "x"})), entry());
        dedup.offer(
            record("w2", "De Rerum Natura", json!({"title": "x", "authors": ["a", "b"]})),
            entry(),
        );
        let mut out = Materialized::new();
        out.absorb(dedup);
        assert_eq!(out.records(EntityKind::Work).len(), 1);
        assert_eq!(out.get(EntityKind::Work, "w1").map(|r| r.id.as_str()), Some("w2"));
        assert!(out.details.contains("w1"));
        assert_eq!(out.details.len(), 1);
    }

    #[test]
    fn equal_richness_keeps_the_first_record() {
        let mut dedup = Deduplicator::new(EntityKind::Work);
        dedup.offer(record("w1", "Canzoniere", json!({"title": "x"})), entry());
        dedup.offer(record("w2", "Canzoniere", json!({"title": "y"})), entry());
        let mut out = Materialized::new();
        out.absorb(dedup);
        assert_eq!(out.get(EntityKind::Work, "w2").map(|r| r.id.as_str()), Some("w1"));
    }

    #[test]
    fn alias_chains_follow_the_latest_winner() {
        let mut dedup = Deduplicator::new(EntityKind::Work);
        dedup.offer(record("w1", "T", json!({})), entry());
        dedup.offer(record("w2", "T", json!({"a": 1})), entry());
        dedup.offer(record("w3", "T", json!({"a": 1, "b": 1})), entry());
        let mut out = Materialized::new();
        out.absorb(dedup);
        assert_eq!(out.details.len(), 1);
        for id in ["w1", "w2", "w3"] {
            assert!(out.details.contains(id), "{id} should resolve");
        }
    }

    #[test]
    fn different_codes_do_not_collide() {
        let mut dedup = Deduplicator::new(EntityKind::Work);
        let mut a = record("w1", "T", json!({}));
        a.human_readable_id = Some("w_1".into());
        let mut b = record("w2", "T", json!({}));
        b.human_readable_id = Some("w_2".into());
        dedup.offer(a, entry());
        dedup.offer(b, entry());
        assert_eq!(dedup.len(), 2);
    }
}
