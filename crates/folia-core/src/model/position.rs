//! Structural positions derived from human-readable code prefixes.
//!
//! Pages, visual objects and physical objects nest at several depths. The
//! code prefix says which; it is decoded once when the record is built.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PagePosition {
    /// `PAG_`: a page of an item.
    InItem,
    /// `PAG_PO_` or `PAG_PO_PAG_`: a page of a physical object.
    InPhysicalObject,
    /// `PAG_PO_PAG_PO`: a page of a physical object found on another
    /// physical object's page.
    InNestedPhysicalObject,
    /// `PAG_M_` and `PAG_M_VOL_`: a page described at manifestation level.
    InManifestation,
    Uncoded,
}

impl PagePosition {
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some(c) if c.starts_with("PAG_PO_PAG_PO") => PagePosition::InNestedPhysicalObject,
            Some(c) if c.starts_with("PAG_PO_") => PagePosition::InPhysicalObject,
            Some(c) if c.starts_with("PAG_M_") => PagePosition::InManifestation,
            Some(c) if c.starts_with("PAG_") => PagePosition::InItem,
            _ => PagePosition::Uncoded,
        }
    }

    /// Pages whose defining parent is a physical object.
    pub fn is_in_physical_object(&self) -> bool {
        matches!(
            self,
            PagePosition::InPhysicalObject | PagePosition::InNestedPhysicalObject
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualObjectPosition {
    /// `VO_PAG_`
    OnPage,
    /// `VO_PAG_PO_`
    OnPhysicalObjectPage,
    /// `VO_PAG_M_` and `VO_PAG_M_VOL_`
    OnManifestationPage,
    Other,
}

impl VisualObjectPosition {
    pub fn from_code(code: &str) -> Self {
        if code.starts_with("VO_PAG_PO_") {
            VisualObjectPosition::OnPhysicalObjectPage
        } else if code.starts_with("VO_PAG_M_") {
            VisualObjectPosition::OnManifestationPage
        } else if code.starts_with("VO_PAG_") {
            VisualObjectPosition::OnPage
        } else {
            VisualObjectPosition::Other
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhysicalObjectPosition {
    /// `PO_`: inserted in an item.
    InItem,
    /// `PO_PAG_`: found on a page.
    OnPage,
    /// `PO_PAG_PO_`: found on a page of another physical object.
    OnNestedPage,
    /// `PO_IND_`: not attached to any item.
    Independent,
    Uncoded,
}

impl PhysicalObjectPosition {
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some(c) if c.starts_with("PO_PAG_PO_") => PhysicalObjectPosition::OnNestedPage,
            Some(c) if c.starts_with("PO_PAG_") => PhysicalObjectPosition::OnPage,
            Some(c) if c.starts_with("PO_IND_") => PhysicalObjectPosition::Independent,
            Some(c) if c.starts_with("PO_") => PhysicalObjectPosition::InItem,
            _ => PhysicalObjectPosition::Uncoded,
        }
    }
}

/// Position of a record in the structural hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "position", rename_all = "snake_case")]
pub enum StructuralPosition {
    Page(PagePosition),
    VisualObject(VisualObjectPosition),
    PhysicalObject(PhysicalObjectPosition),
}
