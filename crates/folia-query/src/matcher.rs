//! Per-rule matching
//!
//! A chainable rule is evaluated against one record at a time. Most fields
//! test the record's normalized facet terms; role groups, digitalization and
//! mention kinds read precomputed payload values; transcription and
//! proximity rules search the visual-object text variants.

use std::collections::BTreeSet;

use folia_core::model::{normalize_query, TextVariant};
use folia_core::tables::vocabularies::{
    DIGITALIZATION_SENTINEL, EMPTY_SENTINEL, PHYSICAL_OBJECT_CREATOR, PHYSICAL_OBJECT_OWNER,
};
use folia_core::{EntityKind, EntityRecord, Facet};

use crate::request::{
    FilterField, FilterRule, Operator, ProximityLogic, ProximityOperator, ProximityQuery,
};

const TOKEN_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?'];

/// Role group name to the payload list that must be non-empty.
const EXPRESSION_ROLE_KEYS: &[(&str, &str)] = &[
    ("Traduttore", "translators"),
    ("Curatore", "expression_editors"),
    ("Sceneggiatore", "scriptwriters"),
    ("Compositore", "compositors"),
    ("Recensore", "reviewers"),
    ("Altro ruolo secondario", "other_secondary_roles"),
];

const MANIFESTATION_ROLE_KEYS: &[(&str, &str)] = &[
    ("Editore", "publisher"),
    ("Curatore", "editor"),
    ("Correttore", "corrector"),
    ("Finanziatore", "sponsor"),
];

const VISUAL_OBJECT_ROLE_KEYS: &[(&str, &str)] = &[
    ("Possessore precedente", "visual_object_owners"),
    ("Annotatore", "visual_object_inscribers"),
    ("Dedicatore", "visual_object_senders"),
    ("Dedicatario", "visual_object_recipients"),
];

const PHYSICAL_OBJECT_ROLE_KEYS: &[(&str, &str)] = &[
    (PHYSICAL_OBJECT_OWNER, "owners"),
    (PHYSICAL_OBJECT_CREATOR, "creators"),
];

/// Facet a categorical field is matched against.
pub fn facet_for(field: FilterField) -> Option<Facet> {
    let facet = match field {
        FilterField::Author => Facet::AuthorSearchTerms,
        FilterField::Classification => Facet::Classifications,
        FilterField::WorkTitle => Facet::WorkTitle,
        FilterField::TypeOfExpression => Facet::TypeOfExpression,
        FilterField::Language => Facet::Language,
        FilterField::RoleOfPersonOrInstitution => Facet::RoleOfPersonOrInstitution,
        FilterField::Translator => Facet::Translators,
        FilterField::ExpressionEditor => Facet::ExpressionEditors,
        FilterField::Scriptwriter => Facet::Scriptwriters,
        FilterField::Compositor => Facet::Compositors,
        FilterField::Reviewer => Facet::Reviewers,
        FilterField::OtherSecondaryRole => Facet::OtherSecondaryRoles,
        FilterField::Place => Facet::PublicationPlace,
        FilterField::Publisher => Facet::Publisher,
        FilterField::Editor => Facet::Editor,
        FilterField::Corrector => Facet::Corrector,
        FilterField::Sponsor => Facet::Sponsor,
        FilterField::PreservationStatus => Facet::PreservationStatus,
        FilterField::Owner => Facet::Owner,
        FilterField::Material => Facet::Material,
        FilterField::TypeOfItem => Facet::TypeOfItem,
        FilterField::VisualObjectOwner => Facet::VisualObjectOwners,
        FilterField::VisualObjectInscriber => Facet::VisualObjectInscribers,
        FilterField::VisualObjectSender => Facet::VisualObjectSenders,
        FilterField::VisualObjectRecipient => Facet::VisualObjectRecipients,
        FilterField::TypeOfVisualObject => Facet::TypeOfVisualObject,
        FilterField::VisualObjectFunction => Facet::VisualObjectFunction,
        FilterField::VisualObjectLanguage => Facet::VisualObjectLanguage,
        FilterField::VisualObjectInstrument => Facet::VisualObjectInstrument,
        FilterField::VisualObjectColour => Facet::VisualObjectColour,
        FilterField::TypeOfPhysicalObject => Facet::TypeOfPhysicalObject,
        FilterField::PhysicalObjectPlace => Facet::PhysicalObjectPlace,
        FilterField::PersonName => Facet::PersonName,
        FilterField::PersonRole | FilterField::InstitutionRole => Facet::Roles,
        FilterField::PersonGender => Facet::Gender,
        FilterField::InstitutionName => Facet::InstitutionName,
        FilterField::InstitutionPlace => Facet::InstitutionPlace,
        FilterField::EventName => Facet::EventName,
        FilterField::PersonOrInstitution => Facet::AllPeopleAndInstitutions,
        FilterField::AbstractCharacterName => Facet::AcName,
        _ => return None,
    };
    Some(facet)
}

/// Whether one record satisfies one chainable rule.
pub fn rule_matches(rule: &FilterRule, record: &EntityRecord) -> bool {
    match rule.field {
        FilterField::VisualObjectTranscription => {
            record.kind == EntityKind::VisualObject && text_matches(rule, record)
        }
        FilterField::ProximityTextSearch => {
            record.kind == EntityKind::VisualObject
                && rule
                    .proximity_query
                    .as_ref()
                    .map_or(true, |query| proximity_matches(query, record))
        }
        FilterField::SearchForRolesInExpression => {
            role_group_matches(rule, record, EXPRESSION_ROLE_KEYS)
        }
        FilterField::SearchForRolesInManifestation => {
            role_group_matches(rule, record, MANIFESTATION_ROLE_KEYS)
        }
        FilterField::RolesRelatedToVisualObject => {
            role_group_matches(rule, record, VISUAL_OBJECT_ROLE_KEYS)
        }
        FilterField::RolesRelatedToPhysicalObject => {
            role_group_matches(rule, record, PHYSICAL_OBJECT_ROLE_KEYS)
        }
        FilterField::Digitalization => {
            rule.values().iter().any(|v| v == DIGITALIZATION_SENTINEL)
                && record.flag("has_digital_representation")
        }
        FilterField::AbstractCharacterMentionedIn => rule
            .values()
            .iter()
            .any(|kind| record.mentioned_in.contains(kind)),
        FilterField::Owner if record.kind == EntityKind::VisualObject => {
            values_match(rule, record.facet(Facet::ItemOwner))
        }
        field => values_match(rule, facet_for(field).and_then(|f| record.facet(f))),
    }
}

fn role_group_matches(rule: &FilterRule, record: &EntityRecord, table: &[(&str, &str)]) -> bool {
    rule.values().iter().any(|role| {
        table
            .iter()
            .find(|(name, _)| *name == role.as_str())
            .is_some_and(|(_, key)| record.has_entries(key))
    })
}

/// Any requested value matches the facet terms. Terms are lower-cased.
fn values_match(rule: &FilterRule, terms: Option<&BTreeSet<String>>) -> bool {
    let empty = BTreeSet::new();
    let terms = terms.unwrap_or(&empty);
    rule.values().iter().any(|value| {
        if value == EMPTY_SENTINEL {
            return terms.is_empty();
        }
        let value = value.to_lowercase();
        match rule.op() {
            Operator::Contains => terms.iter().any(|term| term.contains(&value)),
            _ => terms.contains(&value),
        }
    })
}

fn variant<'a>(
    record: &'a EntityRecord,
    case_sensitive: bool,
    diacritics_sensitive: bool,
) -> Option<&'a TextVariant> {
    record
        .transcription
        .as_ref()
        .map(|t| t.variant(case_sensitive, diacritics_sensitive))
}

/// Free-text search over the transcription. An empty query matches.
pub fn text_matches(rule: &FilterRule, record: &EntityRecord) -> bool {
    let query = rule.first_value().unwrap_or_default();
    if query.is_empty() {
        return true;
    }
    let fallback = TextVariant::default();
    let text = variant(record, rule.case_sensitive, rule.diacritics_sensitive).unwrap_or(&fallback);
    let query = normalize_query(query, rule.case_sensitive, rule.diacritics_sensitive);

    match rule.op() {
        Operator::Phrase => text.text.contains(&query),
        Operator::AllWords => query.split_whitespace().all(|w| text.words.contains(w)),
        Operator::AnyWord => query.split_whitespace().any(|w| text.words.contains(w)),
        Operator::Equals | Operator::Contains => false,
    }
}

fn term_positions(term: &str, tokens: &[String], exact: bool) -> Vec<usize> {
    tokens
        .iter()
        .enumerate()
        .filter(|(_, token)| {
            if exact {
                token.as_str() == term
            } else {
                token.trim_end_matches(TOKEN_PUNCTUATION).contains(term)
            }
        })
        .map(|(i, _)| i)
        .collect()
}

fn within(
    operator: Option<ProximityOperator>,
    primary: usize,
    other: usize,
    distance: usize,
) -> bool {
    match operator {
        Some(ProximityOperator::Near) => primary != other && primary.abs_diff(other) <= distance,
        Some(ProximityOperator::Before) => other < primary && primary - other <= distance,
        Some(ProximityOperator::After) => other > primary && other - primary <= distance,
        None => false,
    }
}

/// Ordered-term proximity search over transcription tokens.
///
/// The first term is the anchor. Each further term must occur at the
/// declared position relative to some anchor occurrence; a third term's
/// result is folded into the second's with the third term's logic.
pub fn proximity_matches(query: &ProximityQuery, record: &EntityRecord) -> bool {
    if query.terms.is_empty() {
        return true;
    }
    let Some(text) = variant(record, query.case_sensitive, query.diacritics_sensitive) else {
        return false;
    };
    if text.tokens.is_empty() {
        return false;
    }

    let positions: Vec<Vec<usize>> = query
        .terms
        .iter()
        .map(|term| {
            let term =
                normalize_query(&term.text, query.case_sensitive, query.diacritics_sensitive);
            term_positions(&term, &text.tokens, query.exact_match)
        })
        .collect();

    let Some((anchors, others)) = positions.split_first() else {
        return false;
    };
    if anchors.is_empty() {
        return false;
    }
    if others.is_empty() {
        return true;
    }

    anchors.iter().any(|&anchor| {
        let satisfied: Vec<bool> = others
            .iter()
            .zip(&query.terms[1..])
            .map(|(found, term)| {
                found
                    .iter()
                    .any(|&pos| within(term.proximity, anchor, pos, query.distance))
            })
            .collect();

        let mut result = satisfied[0];
        if let (Some(third), Some(term)) = (satisfied.get(1), query.terms.get(2)) {
            result = match term.logic {
                Some(ProximityLogic::And) => result && *third,
                Some(ProximityLogic::Or) => result || *third,
                Some(ProximityLogic::Not) => result && !*third,
                None => result,
            };
        }
        result
    })
}
