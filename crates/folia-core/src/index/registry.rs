//! Relation handler registry
//!
//! Maps a relation name to the handlers applied to each of its triples. A
//! relation may have several handlers; a role relation, for instance, both
//! records the id on the subject and files the subject in the actor's role
//! bucket.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::{HypothesisSummary, IndexContext, LinkSlot, ListSlot, ParentSlot, PlaceRef, PlaceSlot, TextSlot};
use crate::catalog::Catalog;
use crate::model::EntityKind;
use crate::tables::translate_date_notes;
use crate::tables::vocabularies::{PHYSICAL_OBJECT_CREATOR, PHYSICAL_OBJECT_OWNER};

const HYPOTHESIS_SUFFIX: &str = "_has_hypothesis";

/// Post-processing applied to a scalar label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueTransform {
    Verbatim,
    /// Translate date qualifiers such as `not before`.
    DateNotes,
}

/// What one relation does to the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    /// Overwrite a scalar with the object's label.
    ScalarAttribute {
        slot: TextSlot,
        fallback: &'static str,
        transform: ValueTransform,
    },
    /// Append the object's label to a list.
    ListAttribute {
        slot: ListSlot,
        fallback: &'static str,
    },
    /// File the subject in the object's role bucket when the object is a
    /// person or an institution.
    RoleAttachment { role: &'static str },
    /// Link a child to its container. `children` is keyed by the container,
    /// `parent` by the child.
    HierarchicalLink {
        subject_is_child: bool,
        children: Option<LinkSlot>,
        parent: Option<ParentSlot>,
    },
    /// Append the object id to a list on the subject.
    GenericAssociation { slot: LinkSlot },
    PlaceReference { slot: PlaceSlot },
    /// Numeric page order taken from the object's label.
    PageSortKey,
    DigitalRepresentation,
    /// A person's membership in an institution, filed on both sides.
    Membership,
    /// Any `*_has_hypothesis` relation.
    HypothesisAttachment,
}

impl Handler {
    pub fn apply(&self, ctx: &mut IndexContext, catalog: &Catalog, subject: &str, object: &str) {
        match *self {
            Handler::ScalarAttribute {
                slot,
                fallback,
                transform,
            } => {
                let label = catalog.label_or(object, fallback);
                let value = match transform {
                    ValueTransform::Verbatim => label,
                    ValueTransform::DateNotes => translate_date_notes(&label),
                };
                ctx.set_text(slot, subject, value);
            }
            Handler::ListAttribute { slot, fallback } => {
                ctx.push_list(slot, subject, catalog.label_or(object, fallback));
            }
            Handler::RoleAttachment { role } => match catalog.kind(object) {
                Some(EntityKind::Person) => ctx.add_person_role(object, role, subject),
                Some(EntityKind::Institution) => ctx.add_institution_role(object, role, subject),
                _ => {}
            },
            Handler::HierarchicalLink {
                subject_is_child,
                children,
                parent,
            } => {
                let (child, container) = if subject_is_child {
                    (subject, object)
                } else {
                    (object, subject)
                };
                if let Some(slot) = children {
                    ctx.push_link(slot, container, child);
                }
                if let Some(slot) = parent {
                    ctx.set_parent(slot, child, container);
                    if slot == ParentSlot::VolumeManifestation {
                        ctx.mark_volume(child);
                    }
                }
            }
            Handler::GenericAssociation { slot } => ctx.push_link(slot, subject, object),
            Handler::PlaceReference { slot } => {
                let place = PlaceRef {
                    place_id: object.to_string(),
                    place_name: catalog.label_or(object, "Unknown Place"),
                };
                ctx.set_place(slot, subject, place);
            }
            Handler::PageSortKey => {
                let key = catalog.label(object).unwrap_or("0").trim().parse::<i64>().ok();
                ctx.set_sort_key(subject, key);
            }
            Handler::DigitalRepresentation => {
                ctx.set_digital_page(subject, catalog.label(object).map(str::to_string));
            }
            Handler::Membership => {
                ctx.add_person_role(subject, "Member of", object);
                ctx.add_institution_role(object, "Membro", subject);
            }
            Handler::HypothesisAttachment => {
                let summary = HypothesisSummary {
                    hypothesis_id: object.to_string(),
                    hypothesis_title: catalog.label_or(object, "Unknown Hypothesis"),
                    creator_name: "Unknown Creator".to_string(),
                    hypothesis_about: None,
                };
                ctx.push_hypothesis(subject, summary);
            }
        }
    }
}

fn text(slot: TextSlot, fallback: &'static str) -> Handler {
    Handler::ScalarAttribute {
        slot,
        fallback,
        transform: ValueTransform::Verbatim,
    }
}

fn date_notes(slot: TextSlot, fallback: &'static str) -> Handler {
    Handler::ScalarAttribute {
        slot,
        fallback,
        transform: ValueTransform::DateNotes,
    }
}

fn list(slot: ListSlot, fallback: &'static str) -> Handler {
    Handler::ListAttribute { slot, fallback }
}

fn assoc(slot: LinkSlot) -> Handler {
    Handler::GenericAssociation { slot }
}

fn role(role: &'static str) -> Handler {
    Handler::RoleAttachment { role }
}

fn place(slot: PlaceSlot) -> Handler {
    Handler::PlaceReference { slot }
}

/// Subject is contained in the object.
fn child_of(children: Option<LinkSlot>, parent: Option<ParentSlot>) -> Handler {
    Handler::HierarchicalLink {
        subject_is_child: true,
        children,
        parent,
    }
}

/// Subject contains the object.
fn contains(children: Option<LinkSlot>, parent: Option<ParentSlot>) -> Handler {
    Handler::HierarchicalLink {
        subject_is_child: false,
        children,
        parent,
    }
}

fn table() -> Vec<(&'static str, Vec<Handler>)> {
    use LinkSlot as L;
    use ListSlot as S;
    use ParentSlot as P;
    use TextSlot as T;

    vec![
        // works
        ("work_has_uniform_title", vec![text(T::WorkUniformTitle, "Unknown Title")]),
        ("work_has_classification", vec![list(S::WorkClassification, "Unknown Classification")]),
        ("work_authored_by", vec![assoc(L::WorkAuthors), role("Autore dell’opera")]),
        ("work_is_mentioning", vec![assoc(L::WorkMentioning)]),
        ("work_is_mentioned_by", vec![assoc(L::WorkMentionedBy)]),
        // expressions
        (
            "is_expression_of_work",
            vec![child_of(Some(L::WorkExpressions), Some(P::ExpressionWork))],
        ),
        ("expression_has_translator", vec![assoc(L::ExpressionTranslators), role("Traduttore")]),
        ("expression_has_editor", vec![assoc(L::ExpressionEditors), role("Curatore")]),
        ("expression_has_scriptwriter", vec![assoc(L::ExpressionScriptwriters), role("Sceneggiatore")]),
        ("expression_has_compositor", vec![assoc(L::ExpressionCompositors), role("Compositore")]),
        ("expression_has_reviewer", vec![assoc(L::ExpressionReviewers), role("Recensore")]),
        (
            "expression_has_other_secondary_role",
            vec![assoc(L::ExpressionOtherRoles), role("Altro ruolo secondario")],
        ),
        ("expression_has_responsibility_statement", vec![list(S::ExpressionResponsibility, "Unknown")]),
        ("expression_has_language", vec![list(S::ExpressionLanguage, "Unknown")]),
        ("expression_has_type", vec![list(S::ExpressionType, "Unknown Type")]),
        ("expression_has_medium", vec![list(S::ExpressionMedium, "Unknown Medium")]),
        ("expression_has_number", vec![text(T::ExpressionNumber, "")]),
        // manifestations
        (
            "is_manifestation_of_expression",
            vec![child_of(Some(L::ExpressionManifestations), Some(P::ManifestationExpression))],
        ),
        (
            "manifestation_has_volume",
            vec![contains(Some(L::ManifestationVolumes), Some(P::VolumeManifestation))],
        ),
        ("manifestation_published_in_place", vec![place(PlaceSlot::Manifestation)]),
        ("manifestation_has_publication_date", vec![date_notes(T::ManifestationDate, "Unknown Date")]),
        (
            "manifestation_has_publication_date_range",
            vec![text(T::ManifestationDateRange, "Unknown Date Range")],
        ),
        ("manifestation_has_number_of_volumes", vec![text(T::ManifestationNumberOfVolumes, "Unknown")]),
        ("manifestation_has_short_title", vec![text(T::ManifestationShortTitle, "Unknown Short Title")]),
        ("manifestation_published_by", vec![assoc(L::ManifestationPublishers), role("Editore")]),
        ("manifestation_edited_by", vec![assoc(L::ManifestationEditors), role("Curatore")]),
        ("manifestation_corrected_by", vec![assoc(L::ManifestationCorrectors), role("Correttore")]),
        ("manifestation_sponsored_by", vec![assoc(L::ManifestationSponsors), role("Finanziatore")]),
        // volumes
        ("manifestation_volume_has_short_title", vec![text(T::VolumeShortTitle, "Unknown Short Title")]),
        ("manifestation_volume_has_volume_title", vec![text(T::VolumeTitle, "Unknown Volume Title")]),
        ("manifestation_volume_has_number_of_volumes", vec![text(T::VolumeNumberOfVolumes, "Unknown")]),
        ("manifestation_volume_has_publication_date", vec![date_notes(T::VolumeDate, "Unknown Date")]),
        (
            "manifestation_volume_has_publication_date_range",
            vec![text(T::VolumeDateRange, "Unknown Date Range")],
        ),
        ("manifestation_volume_published_in_place", vec![place(PlaceSlot::Volume)]),
        ("manifestation_volume_published_by", vec![assoc(L::VolumePublishers), role("Editore")]),
        ("manifestation_volume_edited_by", vec![assoc(L::ManifestationEditors), role("Curatore")]),
        ("manifestation_volume_corrected_by", vec![assoc(L::ManifestationCorrectors), role("Correttore")]),
        ("manifestation_volume_sponsored_by", vec![assoc(L::ManifestationSponsors), role("Finanziatore")]),
        // items
        (
            "is_item_of_manifestation",
            vec![child_of(Some(L::ManifestationItems), Some(P::ItemManifestation))],
        ),
        (
            "item_has_manifestation_volume",
            vec![child_of(Some(L::VolumeItems), Some(P::ItemVolume))],
        ),
        ("item_has_shelf_mark", vec![text(T::ItemShelfMark, "Unknown Shelf Mark")]),
        ("item_has_preservation_status", vec![list(S::ItemPreservationStatus, "Unknown Status")]),
        ("item_has_material", vec![list(S::ItemMaterial, "Unknown Material")]),
        ("item_has_type", vec![list(S::ItemType, "Unknown Type")]),
        ("item_has_page", vec![contains(Some(L::ItemPages), Some(P::PageItem))]),
        (
            "item_contains_physical_object",
            vec![contains(Some(L::ItemPhysicalObjects), Some(P::PhysicalObjectItem))],
        ),
        ("item_owned_by", vec![assoc(L::ItemOwners), role("Owner of item")]),
        // pages
        ("page_has_name", vec![text(T::PageName, "Unknown Page Name")]),
        ("page_sorting", vec![Handler::PageSortKey]),
        ("page_from_manifestation", vec![child_of(None, Some(P::PageManifestation))]),
        ("page_from_manifestation_volume", vec![child_of(None, Some(P::PageVolume))]),
        (
            "page_contains_visual_object",
            vec![contains(Some(L::PageVisualObjects), Some(P::VisualObjectPage))],
        ),
        (
            "page_contains_physical_object",
            vec![contains(Some(L::PagePhysicalObjects), Some(P::PhysicalObjectPage))],
        ),
        (
            "page_contains_physical_object_page",
            vec![
                contains(Some(L::PagePhysicalObjects), Some(P::PhysicalObjectPage)),
                child_of(None, Some(P::PagePhysicalObjectParent)),
            ],
        ),
        ("page_has_digital_representation", vec![Handler::DigitalRepresentation]),
        // visual objects
        ("visual_object_has_name", vec![text(T::VisualObjectName, "Unknown VO Name")]),
        ("visual_object_has_transcription", vec![text(T::VisualObjectTranscription, "")]),
        ("visual_object_has_type", vec![list(S::VisualObjectType, "Unknown Type")]),
        ("visual_object_has_function", vec![list(S::VisualObjectFunction, "Unknown Function")]),
        ("visual_object_has_language", vec![list(S::VisualObjectLanguage, "Unknown Language")]),
        ("visual_object_has_instrument", vec![list(S::VisualObjectInstrument, "Unknown Instrument")]),
        ("visual_object_has_colour", vec![list(S::VisualObjectColour, "Unknown Colour")]),
        (
            "visual_object_has_transcription_quality",
            vec![list(S::VisualObjectTranscriptionQuality, "Unknown Quality")],
        ),
        ("visual_object_owned_by", vec![assoc(L::VisualObjectOwners), role("Possessore precedente")]),
        (
            "visual_object_owned_by_person",
            vec![assoc(L::VisualObjectOwners), role("Possessore precedente")],
        ),
        (
            "visual_object_owned_by_institution",
            vec![assoc(L::VisualObjectOwners), role("Possessore precedente")],
        ),
        ("visual_object_inscribed_by", vec![assoc(L::VisualObjectInscribers), role("Annotatore")]),
        (
            "visual_object_inscribed_by_person",
            vec![assoc(L::VisualObjectInscribers), role("Annotatore")],
        ),
        ("visual_object_sent_by", vec![assoc(L::VisualObjectSenders), role("Dedicatore")]),
        ("visual_object_sent_by_person", vec![assoc(L::VisualObjectSenders), role("Dedicatore")]),
        ("visual_object_received_by", vec![assoc(L::VisualObjectRecipients), role("Dedicatario")]),
        (
            "visual_object_received_by_person",
            vec![assoc(L::VisualObjectRecipients), role("Dedicatario")],
        ),
        // persons
        ("person_has_name", vec![text(T::PersonName, "Unknown Name")]),
        ("person_has_alias", vec![list(S::PersonAlias, "Unknown Alias")]),
        ("person_has_birth_date", vec![text(T::PersonBirthDate, "")]),
        ("person_has_birth_date_notes", vec![date_notes(T::PersonBirthDateNotes, "")]),
        ("person_has_death_date", vec![text(T::PersonDeathDate, "")]),
        ("person_has_death_date_notes", vec![date_notes(T::PersonDeathDateNotes, "")]),
        ("person_has_gender", vec![text(T::PersonGender, "")]),
        ("person_member_of_institution", vec![Handler::Membership]),
        // institutions, places, events
        ("institution_has_name", vec![text(T::InstitutionName, "Unknown Institution")]),
        ("institution_has_founding_date", vec![text(T::InstitutionFoundingDate, "")]),
        ("institution_has_dissolution_date", vec![text(T::InstitutionDissolutionDate, "")]),
        ("institution_located_at_place", vec![place(PlaceSlot::Institution)]),
        ("place_has_name", vec![text(T::PlaceName, "Unknown Place")]),
        ("event_has_name", vec![text(T::EventName, "Unknown Event")]),
        ("event_has_date", vec![text(T::EventDate, "Unknown Date")]),
        ("event_occurred_at_place", vec![place(PlaceSlot::Event)]),
        // physical objects
        ("physical_object_has_name", vec![text(T::PhysicalObjectName, "Unknown Physical Object Name")]),
        ("physical_object_has_description", vec![text(T::PhysicalObjectDescription, "")]),
        ("physical_object_has_type", vec![list(S::PhysicalObjectType, "Unknown Type")]),
        ("physical_object_located_at_place", vec![place(PlaceSlot::PhysicalObject)]),
        ("physical_object_has_date", vec![text(T::PhysicalObjectDate, "Unknown Date")]),
        ("physical_object_has_insertion_type", vec![list(S::PhysicalObjectInsertionType, "Unknown Type")]),
        ("physical_object_created_by", vec![role(PHYSICAL_OBJECT_CREATOR)]),
        ("physical_object_owned_by", vec![role(PHYSICAL_OBJECT_OWNER)]),
        // abstract characters
        ("abstract_character_has_name", vec![text(T::AbstractCharacterName, "Unknown AC Name")]),
        ("abstract_character_has_alias", vec![list(S::AbstractCharacterAlias, "Unknown Alias")]),
        ("abstract_character_is_mentioning", vec![assoc(L::AbstractCharacterMentioning)]),
        ("abstract_character_is_mentioned_by", vec![assoc(L::AbstractCharacterMentionedBy)]),
        // hypotheses
        (
            "hypothesis_created_by_person",
            vec![child_of(Some(L::PersonCreatedHypotheses), Some(P::HypothesisCreator))],
        ),
        ("is_hypothesis_about", vec![assoc(L::HypothesisAbout)]),
    ]
}

static REGISTRY: Lazy<HashMap<&'static str, Vec<Handler>>> = Lazy::new(|| table().into_iter().collect());

static HYPOTHESIS: [Handler; 1] = [Handler::HypothesisAttachment];

/// Handlers for a relation name; empty for names nobody handles.
pub fn handlers_for(relation: &str) -> impl Iterator<Item = &'static Handler> {
    let registered = REGISTRY.get(relation).map(Vec::as_slice).unwrap_or_default();
    let hypothesis: &'static [Handler] = if relation.ends_with(HYPOTHESIS_SUFFIX) {
        &HYPOTHESIS
    } else {
        &[]
    };
    registered.iter().chain(hypothesis.iter())
}
