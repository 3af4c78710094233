//! Entity kinds and their naming conventions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::text::title_case;

/// Every collection the snapshot knows about.
///
/// `Type` covers vocabulary documents (classifications, languages, ...);
/// they only contribute labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Work,
    Expression,
    Manifestation,
    ManifestationVolume,
    Item,
    Page,
    VisualObject,
    PhysicalObject,
    Person,
    Institution,
    Event,
    Place,
    AbstractCharacter,
    Hypothesis,
    Type,
}

impl EntityKind {
    /// Kinds loaded from their own source collection, in load order.
    pub const COLLECTIONS: [EntityKind; 14] = [
        EntityKind::Work,
        EntityKind::Expression,
        EntityKind::Manifestation,
        EntityKind::Item,
        EntityKind::Person,
        EntityKind::VisualObject,
        EntityKind::Institution,
        EntityKind::Event,
        EntityKind::Place,
        EntityKind::Page,
        EntityKind::PhysicalObject,
        EntityKind::AbstractCharacter,
        EntityKind::Hypothesis,
        EntityKind::Type,
    ];

    /// Kinds that can be searched.
    pub const SEARCHABLE: [EntityKind; 11] = [
        EntityKind::Work,
        EntityKind::Expression,
        EntityKind::Manifestation,
        EntityKind::Item,
        EntityKind::Page,
        EntityKind::Person,
        EntityKind::VisualObject,
        EntityKind::PhysicalObject,
        EntityKind::Institution,
        EntityKind::Event,
        EntityKind::AbstractCharacter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Work => "work",
            EntityKind::Expression => "expression",
            EntityKind::Manifestation => "manifestation",
            EntityKind::ManifestationVolume => "manifestation_volume",
            EntityKind::Item => "item",
            EntityKind::Page => "page",
            EntityKind::VisualObject => "visual_object",
            EntityKind::PhysicalObject => "physical_object",
            EntityKind::Person => "person",
            EntityKind::Institution => "institution",
            EntityKind::Event => "event",
            EntityKind::Place => "place",
            EntityKind::AbstractCharacter => "abstract_character",
            EntityKind::Hypothesis => "hypothesis",
            EntityKind::Type => "type",
        }
    }

    /// Source collection name.
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::Work => "works",
            EntityKind::Expression => "expressions",
            EntityKind::Manifestation => "manifestations",
            EntityKind::ManifestationVolume => "manifestations",
            EntityKind::Item => "items",
            EntityKind::Page => "pages",
            EntityKind::VisualObject => "visual_objects",
            EntityKind::PhysicalObject => "physical_objects",
            EntityKind::Person => "persons",
            EntityKind::Institution => "institutions",
            EntityKind::Event => "events",
            EntityKind::Place => "places",
            EntityKind::AbstractCharacter => "abstract_characters",
            EntityKind::Hypothesis => "hypotheses",
            EntityKind::Type => "types",
        }
    }

    /// Key of the id field in public records, e.g. `work_id`.
    pub fn id_key(&self) -> String {
        format!("{}_id", self.as_str())
    }

    /// Key of the display title in public records.
    pub fn title_key(&self) -> &'static str {
        match self {
            EntityKind::Work => "work_title",
            EntityKind::Expression => "expression_title",
            EntityKind::Manifestation => "manifestation_title",
            EntityKind::ManifestationVolume => "manifestation_volume_title",
            EntityKind::Item => "item_label",
            EntityKind::Page => "page_title",
            EntityKind::VisualObject => "visual_object_name",
            EntityKind::PhysicalObject => "physical_object_name",
            EntityKind::Person => "person_name",
            EntityKind::Institution => "institution_name",
            EntityKind::Event => "event_name",
            EntityKind::Place => "place_name",
            EntityKind::AbstractCharacter => "ac_name",
            EntityKind::Hypothesis => "hypothesis_title",
            EntityKind::Type => "label",
        }
    }

    /// Prefixes a human-readable code must start with.
    pub fn code_prefixes(&self) -> &'static [&'static str] {
        match self {
            EntityKind::Work => &["w_"],
            EntityKind::Expression => &["ex_"],
            EntityKind::Manifestation => &["m_"],
            EntityKind::ManifestationVolume => &["m_vol_"],
            EntityKind::Item => &["i_"],
            EntityKind::Page => &["PAG_"],
            EntityKind::VisualObject => &["VO_"],
            EntityKind::PhysicalObject => &["PO_"],
            EntityKind::Person => &["p_"],
            EntityKind::Institution => &["inst_"],
            EntityKind::Event => &["e_"],
            EntityKind::Place => &["loc_"],
            EntityKind::AbstractCharacter => &["ac_"],
            EntityKind::Hypothesis | EntityKind::Type => &[],
        }
    }

    /// Human title such as `Visual Object`, used in not-found messages.
    pub fn display_name(&self) -> String {
        title_case(&self.as_str().replace('_', " "))
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s {
            "work" => EntityKind::Work,
            "expression" => EntityKind::Expression,
            "manifestation" => EntityKind::Manifestation,
            "manifestation_volume" => EntityKind::ManifestationVolume,
            "item" => EntityKind::Item,
            "page" => EntityKind::Page,
            "visual_object" => EntityKind::VisualObject,
            "physical_object" => EntityKind::PhysicalObject,
            "person" => EntityKind::Person,
            "institution" => EntityKind::Institution,
            "event" => EntityKind::Event,
            "place" => EntityKind::Place,
            "abstract_character" => EntityKind::AbstractCharacter,
            "hypothesis" => EntityKind::Hypothesis,
            "type" => EntityKind::Type,
            other => return Err(format!("unknown entity kind: {other}")),
        };
        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for kind in EntityKind::COLLECTIONS {
            assert_eq!(kind.as_str().parse::<EntityKind>(), Ok(kind));
        }
        assert!("volume".parse::<EntityKind>().is_err());
    }

    #[test]
    fn display_names_are_title_cased() {
        assert_eq!(EntityKind::VisualObject.display_name(), "Visual Object");
        assert_eq!(EntityKind::ManifestationVolume.id_key(), "manifestation_volume_id");
    }
}
