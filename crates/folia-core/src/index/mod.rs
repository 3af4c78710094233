//! Relation Indexer
//!
//! Turns the triple list into typed projections the materializers read:
//! scalar and list attributes, id links, parent pointers, places, role
//! buckets and hypothesis summaries.
//!
//! ## Two phases
//!
//! 1. **Index**: every triple is looked up in the handler [`registry`] and
//!    applied once, in triple order.
//! 2. **Resolve**: values whose source may appear after their first
//!    reference are fixed up: place names, volume rerouting, hypothesis
//!    creators and subjects, derived parent pointers.
//!
//! Phase 2 must not run before phase 1 has seen every triple. [`IndexContext::build`]
//! runs both in order; the phases are exposed separately for tests.

mod registry;
mod resolve;

pub use registry::{handlers_for, Handler, ValueTransform};

use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

use crate::catalog::Catalog;

/// Scalar label slots, keyed by the subject id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextSlot {
    WorkUniformTitle,
    ExpressionNumber,
    ManifestationShortTitle,
    ManifestationDate,
    ManifestationDateRange,
    ManifestationNumberOfVolumes,
    VolumeShortTitle,
    VolumeTitle,
    VolumeNumberOfVolumes,
    VolumeDate,
    VolumeDateRange,
    ItemShelfMark,
    PageName,
    VisualObjectName,
    VisualObjectTranscription,
    PersonName,
    PersonBirthDate,
    PersonBirthDateNotes,
    PersonDeathDate,
    PersonDeathDateNotes,
    PersonGender,
    InstitutionName,
    InstitutionFoundingDate,
    InstitutionDissolutionDate,
    PlaceName,
    EventName,
    EventDate,
    PhysicalObjectName,
    PhysicalObjectDescription,
    PhysicalObjectDate,
    AbstractCharacterName,
}

/// Label list slots, keyed by the subject id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListSlot {
    WorkClassification,
    ExpressionResponsibility,
    ExpressionLanguage,
    ExpressionType,
    ExpressionMedium,
    ItemPreservationStatus,
    ItemMaterial,
    ItemType,
    VisualObjectType,
    VisualObjectFunction,
    VisualObjectLanguage,
    VisualObjectInstrument,
    VisualObjectColour,
    VisualObjectTranscriptionQuality,
    PersonAlias,
    PhysicalObjectType,
    PhysicalObjectInsertionType,
    AbstractCharacterAlias,
}

/// Id list slots. Role slots are keyed by the entity the role is held on;
/// child slots are keyed by the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkSlot {
    WorkAuthors,
    WorkMentioning,
    WorkMentionedBy,
    WorkExpressions,
    ExpressionTranslators,
    ExpressionEditors,
    ExpressionScriptwriters,
    ExpressionCompositors,
    ExpressionReviewers,
    ExpressionOtherRoles,
    ExpressionManifestations,
    ManifestationVolumes,
    ManifestationItems,
    ManifestationPublishers,
    ManifestationEditors,
    ManifestationCorrectors,
    ManifestationSponsors,
    VolumePublishers,
    VolumeItems,
    ItemOwners,
    ItemPages,
    ItemPhysicalObjects,
    PageVisualObjects,
    PagePhysicalObjects,
    VisualObjectOwners,
    VisualObjectInscribers,
    VisualObjectSenders,
    VisualObjectRecipients,
    PersonCreatedHypotheses,
    AbstractCharacterMentioning,
    AbstractCharacterMentionedBy,
    HypothesisAbout,
}

/// Single id pointers, keyed by the contained entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParentSlot {
    ExpressionWork,
    ManifestationExpression,
    VolumeManifestation,
    ItemManifestation,
    ItemVolume,
    PageItem,
    PageManifestation,
    PageVolume,
    /// Physical object a page belongs to.
    PagePhysicalObjectParent,
    PhysicalObjectItem,
    PhysicalObjectPage,
    VisualObjectPage,
    VisualObjectItem,
    HypothesisCreator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceSlot {
    Manifestation,
    Volume,
    Institution,
    Event,
    PhysicalObject,
}

impl PlaceSlot {
    pub const ALL: [PlaceSlot; 5] = [
        PlaceSlot::Manifestation,
        PlaceSlot::Volume,
        PlaceSlot::Institution,
        PlaceSlot::Event,
        PlaceSlot::PhysicalObject,
    ];
}

/// A place reference as shown on cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceRef {
    pub place_id: String,
    pub place_name: String,
}

/// A hypothesis attached to an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HypothesisSummary {
    pub hypothesis_id: String,
    pub hypothesis_title: String,
    pub creator_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hypothesis_about: Option<String>,
}

/// Projections produced by the indexer.
#[derive(Debug, Clone, Default)]
pub struct IndexContext {
    texts: HashMap<TextSlot, HashMap<String, String>>,
    lists: HashMap<ListSlot, HashMap<String, Vec<String>>>,
    links: HashMap<LinkSlot, HashMap<String, Vec<String>>>,
    parents: HashMap<ParentSlot, HashMap<String, String>>,
    places: HashMap<PlaceSlot, HashMap<String, PlaceRef>>,
    sort_keys: HashMap<String, Option<i64>>,
    digital_pages: HashMap<String, Option<String>>,
    person_roles: HashMap<String, BTreeMap<String, Vec<String>>>,
    institution_roles: HashMap<String, BTreeMap<String, Vec<String>>>,
    hypotheses: HashMap<String, Vec<HypothesisSummary>>,
    volume_ids: HashSet<String>,
    applied: usize,
    ignored: usize,
}

impl IndexContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run both phases over the catalog's triples.
    pub fn build(catalog: &Catalog) -> Self {
        let mut ctx = Self::new();
        ctx.index(catalog);
        ctx.resolve(catalog);
        debug!(
            applied = ctx.applied,
            ignored = ctx.ignored,
            volumes = ctx.volume_ids.len(),
            "Indexed relations"
        );
        ctx
    }

    /// Phase 1: apply every triple through its handlers.
    pub fn index(&mut self, catalog: &Catalog) {
        for triple in &catalog.triples {
            let mut handled = false;
            for handler in handlers_for(&triple.relation) {
                handler.apply(self, catalog, &triple.subject, &triple.object);
                handled = true;
            }
            if handled {
                self.applied += 1;
            } else {
                self.ignored += 1;
            }
        }
    }

    /// Phase 2: fix up forward references. Call after [`index`](Self::index).
    pub fn resolve(&mut self, catalog: &Catalog) {
        resolve::run(self, catalog);
    }

    pub fn text(&self, slot: TextSlot, id: &str) -> Option<&str> {
        self.texts
            .get(&slot)
            .and_then(|m| m.get(id))
            .map(String::as_str)
    }

    pub fn has_text(&self, slot: TextSlot, id: &str) -> bool {
        self.text(slot, id).is_some()
    }

    /// Scalar value, empty when absent.
    pub fn text_or_empty(&self, slot: TextSlot, id: &str) -> String {
        self.text(slot, id).unwrap_or_default().to_string()
    }

    pub fn list(&self, slot: ListSlot, id: &str) -> &[String] {
        self.lists
            .get(&slot)
            .and_then(|m| m.get(id))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn links(&self, slot: LinkSlot, id: &str) -> &[String] {
        self.links
            .get(&slot)
            .and_then(|m| m.get(id))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn has_links(&self, slot: LinkSlot, id: &str) -> bool {
        !self.links(slot, id).is_empty()
    }

    pub fn parent(&self, slot: ParentSlot, id: &str) -> Option<&str> {
        self.parents
            .get(&slot)
            .and_then(|m| m.get(id))
            .map(String::as_str)
    }

    pub fn place(&self, slot: PlaceSlot, id: &str) -> Option<&PlaceRef> {
        self.places.get(&slot).and_then(|m| m.get(id))
    }

    /// Numeric page sort key; `None` when missing or not a number.
    pub fn sort_key(&self, page_id: &str) -> Option<i64> {
        self.sort_keys.get(page_id).copied().flatten()
    }

    /// Whether a page has a digital representation edge at all.
    pub fn is_digitized(&self, page_id: &str) -> bool {
        self.digital_pages.contains_key(page_id)
    }

    pub fn digital_page(&self, page_id: &str) -> Option<&str> {
        self.digital_pages
            .get(page_id)
            .and_then(|v| v.as_deref())
    }

    pub fn person_roles(&self, id: &str) -> Option<&BTreeMap<String, Vec<String>>> {
        self.person_roles.get(id)
    }

    pub fn institution_roles(&self, id: &str) -> Option<&BTreeMap<String, Vec<String>>> {
        self.institution_roles.get(id)
    }

    /// Ids held in one of a person's role buckets.
    pub fn person_role_members(&self, id: &str, role: &str) -> &[String] {
        self.person_roles
            .get(id)
            .and_then(|roles| roles.get(role))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Persons holding a role, each with the ids filed under it.
    pub fn persons_with_role<'s>(&'s self, role: &'s str) -> impl Iterator<Item = (&'s str, &'s [String])> + 's {
        self.person_roles.iter().filter_map(move |(person, roles)| {
            roles.get(role).map(|ids| (person.as_str(), ids.as_slice()))
        })
    }

    pub fn hypotheses(&self, id: &str) -> &[HypothesisSummary] {
        self.hypotheses
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_volume(&self, id: &str) -> bool {
        self.volume_ids.contains(id)
    }

    pub fn volume_ids(&self) -> impl Iterator<Item = &String> {
        self.volume_ids.iter()
    }

    pub(crate) fn set_text(&mut self, slot: TextSlot, id: &str, value: String) {
        self.texts
            .entry(slot)
            .or_default()
            .insert(id.to_string(), value);
    }

    pub(crate) fn take_text(&mut self, slot: TextSlot, id: &str) -> Option<String> {
        self.texts.get_mut(&slot).and_then(|m| m.remove(id))
    }

    pub(crate) fn push_list(&mut self, slot: ListSlot, id: &str, value: String) {
        self.lists
            .entry(slot)
            .or_default()
            .entry(id.to_string())
            .or_default()
            .push(value);
    }

    pub(crate) fn push_link(&mut self, slot: LinkSlot, id: &str, target: &str) {
        self.links
            .entry(slot)
            .or_default()
            .entry(id.to_string())
            .or_default()
            .push(target.to_string());
    }

    pub(crate) fn take_links(&mut self, slot: LinkSlot, id: &str) -> Vec<String> {
        self.links
            .get_mut(&slot)
            .and_then(|m| m.remove(id))
            .unwrap_or_default()
    }

    pub(crate) fn set_parent(&mut self, slot: ParentSlot, id: &str, parent: &str) {
        self.parents
            .entry(slot)
            .or_default()
            .insert(id.to_string(), parent.to_string());
    }

    pub(crate) fn parent_entries(&self, slot: ParentSlot) -> Vec<(String, String)> {
        self.parents
            .get(&slot)
            .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default()
    }

    pub(crate) fn set_place(&mut self, slot: PlaceSlot, id: &str, place: PlaceRef) {
        self.places
            .entry(slot)
            .or_default()
            .insert(id.to_string(), place);
    }

    pub(crate) fn take_place(&mut self, slot: PlaceSlot, id: &str) -> Option<PlaceRef> {
        self.places.get_mut(&slot).and_then(|m| m.remove(id))
    }

    pub(crate) fn places_mut(&mut self, slot: PlaceSlot) -> Option<&mut HashMap<String, PlaceRef>> {
        self.places.get_mut(&slot)
    }

    pub(crate) fn set_sort_key(&mut self, page_id: &str, key: Option<i64>) {
        self.sort_keys.insert(page_id.to_string(), key);
    }

    pub(crate) fn set_digital_page(&mut self, page_id: &str, value: Option<String>) {
        self.digital_pages.insert(page_id.to_string(), value);
    }

    pub(crate) fn add_person_role(&mut self, person: &str, role: &str, entity: &str) {
        self.person_roles
            .entry(person.to_string())
            .or_default()
            .entry(role.to_string())
            .or_default()
            .push(entity.to_string());
    }

    pub(crate) fn add_institution_role(&mut self, institution: &str, role: &str, entity: &str) {
        self.institution_roles
            .entry(institution.to_string())
            .or_default()
            .entry(role.to_string())
            .or_default()
            .push(entity.to_string());
    }

    pub(crate) fn push_hypothesis(&mut self, id: &str, summary: HypothesisSummary) {
        self.hypotheses
            .entry(id.to_string())
            .or_default()
            .push(summary);
    }

    pub(crate) fn hypotheses_mut(&mut self) -> impl Iterator<Item = &mut HypothesisSummary> {
        self.hypotheses.values_mut().flatten()
    }

    pub(crate) fn mark_volume(&mut self, id: &str) {
        self.volume_ids.insert(id.to_string());
    }
}
