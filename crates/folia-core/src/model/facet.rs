//! Normalized search facets.
//!
//! Each facet is a set of lower-cased terms attached to a record at
//! materialization time. Facets are internal: they drive rule matching and
//! are never serialized with the public record.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    AuthorSearchTerms,
    Classifications,
    WorkTitle,
    TypeOfExpression,
    Language,
    Translators,
    ExpressionEditors,
    Scriptwriters,
    Compositors,
    Reviewers,
    OtherSecondaryRoles,
    RoleOfPersonOrInstitution,
    PublicationPlace,
    Publisher,
    Editor,
    Corrector,
    Sponsor,
    PreservationStatus,
    Owner,
    Material,
    TypeOfItem,
    VisualObjectOwners,
    VisualObjectInscribers,
    VisualObjectSenders,
    VisualObjectRecipients,
    TypeOfVisualObject,
    VisualObjectFunction,
    VisualObjectLanguage,
    VisualObjectInstrument,
    VisualObjectColour,
    TranscriptionQuality,
    TypeOfPhysicalObject,
    PhysicalObjectPlace,
    Creators,
    Owners,
    InsertionType,
    PersonName,
    Roles,
    Gender,
    InstitutionName,
    InstitutionPlace,
    EventName,
    AllPeopleAndInstitutions,
    ItemOwner,
    AcName,
}

impl Facet {
    /// Facets a visual object or physical object inherits from its item.
    pub const VISUAL_OBJECT_ROLES: [Facet; 4] = [
        Facet::VisualObjectOwners,
        Facet::VisualObjectInscribers,
        Facet::VisualObjectSenders,
        Facet::VisualObjectRecipients,
    ];

    /// Expression contributor facets, in display order.
    pub const EXPRESSION_ROLES: [Facet; 6] = [
        Facet::Translators,
        Facet::ExpressionEditors,
        Facet::Scriptwriters,
        Facet::Compositors,
        Facet::Reviewers,
        Facet::OtherSecondaryRoles,
    ];

    /// Manifestation contributor facets.
    pub const MANIFESTATION_ROLES: [Facet; 4] = [
        Facet::Publisher,
        Facet::Editor,
        Facet::Corrector,
        Facet::Sponsor,
    ];
}
