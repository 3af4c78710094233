//! Validated query types
//!
//! Requests arrive as JSON. Deserialization checks shapes and enum values;
//! [`SearchQuery::validate`] and [`GraphSearchQuery::validate`] check the
//! cross-field rules the transport enforces before a query runs.

use folia_core::{EntityKind, Era};
use serde::{Deserialize, Serialize};

use crate::error::{QueryError, QueryResult};

pub const DEFAULT_LIMIT: usize = 500;
pub const MAX_LIMIT: usize = 10_000;
pub const DEFAULT_DISTANCE: usize = 5;

/// Operator trailing a rule. `Gte`/`Lte` mark the bounds of date rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Logic {
    And,
    Or,
    Not,
    Gte,
    Lte,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    #[default]
    Equals,
    Contains,
    AllWords,
    Phrase,
    AnyWord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProximityLogic {
    And,
    Or,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProximityOperator {
    Near,
    Before,
    After,
}

/// Every field a rule can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    Author,
    Classification,
    TypeOfExpression,
    Language,
    RoleOfPersonOrInstitution,
    Place,
    PublicationDate,
    Publisher,
    Editor,
    Corrector,
    Sponsor,
    PreservationStatus,
    Owner,
    Material,
    TypeOfItem,
    VisualObjectOwner,
    VisualObjectInscriber,
    VisualObjectSender,
    VisualObjectRecipient,
    WorkTitle,
    PersonName,
    PersonRole,
    PersonGender,
    PersonBirthDate,
    PersonDeathDate,
    VisualObjectTranscription,
    ProximityTextSearch,
    InstitutionName,
    InstitutionPlace,
    InstitutionRole,
    EventName,
    EventDate,
    Translator,
    ExpressionEditor,
    Scriptwriter,
    Compositor,
    Reviewer,
    OtherSecondaryRole,
    SearchForRolesInExpression,
    SearchForRolesInManifestation,
    RolesRelatedToVisualObject,
    PersonOrInstitution,
    TypeOfVisualObject,
    TypeOfPhysicalObject,
    RolesRelatedToPhysicalObject,
    Digitalization,
    VisualObjectFunction,
    VisualObjectLanguage,
    VisualObjectInstrument,
    VisualObjectColour,
    PhysicalObjectPlace,
    PhysicalObjectDate,
    AbstractCharacterName,
    AbstractCharacterMentionedIn,
}

impl FilterField {
    pub fn is_date(&self) -> bool {
        matches!(
            self,
            FilterField::PublicationDate
                | FilterField::PersonBirthDate
                | FilterField::PersonDeathDate
                | FilterField::PhysicalObjectDate
                | FilterField::EventDate
        )
    }
}

/// Sort key override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderBy {
    WorkTitle,
    ExpressionTitle,
    ManifestationTitle,
    ItemLabel,
    PageTitle,
    Project,
    PersonName,
    VisualObjectName,
    PhysicalObjectName,
    InstitutionName,
    EventName,
    AcName,
}

impl OrderBy {
    /// Public record key the override sorts on.
    pub fn key(&self) -> &'static str {
        match self {
            OrderBy::WorkTitle => "work_title",
            OrderBy::ExpressionTitle => "expression_title",
            OrderBy::ManifestationTitle => "manifestation_title",
            OrderBy::ItemLabel => "item_label",
            OrderBy::PageTitle => "page_title",
            OrderBy::Project => "project",
            OrderBy::PersonName => "person_name",
            OrderBy::VisualObjectName => "visual_object_name",
            OrderBy::PhysicalObjectName => "physical_object_name",
            OrderBy::InstitutionName => "institution_name",
            OrderBy::EventName => "event_name",
            OrderBy::AcName => "ac_name",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProximityTerm {
    pub text: String,
    #[serde(default)]
    pub logic: Option<ProximityLogic>,
    #[serde(default)]
    pub proximity: Option<ProximityOperator>,
}

impl ProximityTerm {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            logic: None,
            proximity: None,
        }
    }

    pub fn with_proximity(mut self, proximity: ProximityOperator) -> Self {
        self.proximity = Some(proximity);
        self
    }

    pub fn with_logic(mut self, logic: ProximityLogic) -> Self {
        self.logic = Some(logic);
        self
    }
}

fn default_distance() -> usize {
    DEFAULT_DISTANCE
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProximityQuery {
    pub terms: Vec<ProximityTerm>,
    #[serde(default = "default_distance")]
    pub distance: usize,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default)]
    pub diacritics_sensitive: bool,
    #[serde(default)]
    pub exact_match: bool,
}

impl ProximityQuery {
    pub fn new(terms: Vec<ProximityTerm>) -> Self {
        Self {
            terms,
            distance: DEFAULT_DISTANCE,
            case_sensitive: false,
            diacritics_sensitive: false,
            exact_match: false,
        }
    }

    pub fn validate(&self) -> QueryResult<()> {
        if self.terms.is_empty() || self.terms.len() > 3 {
            return Err(QueryError::validation("a proximity query takes one to three terms"));
        }
        if self.distance < 1 {
            return Err(QueryError::validation("proximity distance must be at least 1"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRule {
    pub field: FilterField,
    pub logic: Logic,
    #[serde(default)]
    pub values: Option<Vec<String>>,
    #[serde(default)]
    pub op: Option<Operator>,
    #[serde(default)]
    pub era: Option<Era>,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default)]
    pub diacritics_sensitive: bool,
    #[serde(default)]
    pub proximity_query: Option<ProximityQuery>,
}

impl FilterRule {
    pub fn new<I, S>(field: FilterField, logic: Logic, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field,
            logic,
            values: Some(values.into_iter().map(Into::into).collect()),
            op: None,
            era: None,
            case_sensitive: false,
            diacritics_sensitive: false,
            proximity_query: None,
        }
    }

    pub fn proximity(logic: Logic, query: ProximityQuery) -> Self {
        Self {
            field: FilterField::ProximityTextSearch,
            logic,
            values: None,
            op: None,
            era: None,
            case_sensitive: false,
            diacritics_sensitive: false,
            proximity_query: Some(query),
        }
    }

    pub fn with_op(mut self, op: Operator) -> Self {
        self.op = Some(op);
        self
    }

    pub fn with_era(mut self, era: Era) -> Self {
        self.era = Some(era);
        self
    }

    pub fn op(&self) -> Operator {
        self.op.unwrap_or_default()
    }

    pub fn values(&self) -> &[String] {
        self.values.as_deref().unwrap_or_default()
    }

    /// First value, used by date bounds and text search.
    pub fn first_value(&self) -> Option<&str> {
        self.values().first().map(String::as_str)
    }

    pub fn validate(&self) -> QueryResult<()> {
        if self.field == FilterField::ProximityTextSearch {
            let Some(query) = &self.proximity_query else {
                return Err(QueryError::validation(
                    "a 'proximity_query' must be provided for proximity text search",
                ));
            };
            if self.values.is_some() {
                return Err(QueryError::validation("proximity text search takes no 'values'"));
            }
            return query.validate();
        }
        if self.proximity_query.is_some() {
            return Err(QueryError::validation(
                "'proximity_query' is only allowed for proximity text search",
            ));
        }
        if self.values.is_none() {
            return Err(QueryError::validation(
                "'values' must be provided for non-proximity search fields",
            ));
        }
        Ok(())
    }
}

fn default_entity() -> EntityKind {
    EntityKind::Work
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub projects: Option<Vec<String>>,
    #[serde(default = "default_entity")]
    pub entity: EntityKind,
    pub rules: Vec<FilterRule>,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
    #[serde(default)]
    pub order_by: Option<OrderBy>,
    #[serde(default)]
    pub fields: Option<Vec<String>>,
    /// Accepted for compatibility; results always use the full shape.
    #[serde(default)]
    pub summary: bool,
}

impl SearchQuery {
    pub fn new(entity: EntityKind) -> Self {
        Self {
            projects: None,
            entity,
            rules: Vec::new(),
            limit: DEFAULT_LIMIT,
            offset: 0,
            order_by: None,
            fields: None,
            summary: false,
        }
    }

    pub fn rule(mut self, rule: FilterRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn validate(&self) -> QueryResult<()> {
        if !EntityKind::SEARCHABLE.contains(&self.entity) {
            return Err(QueryError::validation(format!(
                "'{}' is not a searchable entity",
                self.entity
            )));
        }
        if self.limit < 1 || self.limit > MAX_LIMIT {
            return Err(QueryError::validation(format!(
                "limit must be between 1 and {MAX_LIMIT}"
            )));
        }
        self.rules.iter().try_for_each(FilterRule::validate)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphType {
    #[default]
    General,
    Mentions,
    PersonAuthorshipOwnership,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralGraphFilter {
    pub entity_types: Vec<String>,
    pub relationships: Vec<String>,
}

/// Mention directions are `Mentioning` and `Mentioned by`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionsGraphFilter {
    pub entity_types: Vec<String>,
    pub mention_directions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonAuthorshipOwnershipFilter {
    #[serde(default)]
    pub person_names: Option<Vec<String>>,
    pub entity_types: Vec<String>,
    pub relationships: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSearchQuery {
    #[serde(default)]
    pub projects: Option<Vec<String>>,
    #[serde(default)]
    pub graph_type: GraphType,
    #[serde(default)]
    pub general_filters: Option<GeneralGraphFilter>,
    #[serde(default)]
    pub mentions_filters: Option<MentionsGraphFilter>,
    #[serde(default)]
    pub person_authorship_ownership_filters: Option<PersonAuthorshipOwnershipFilter>,
}

impl GraphSearchQuery {
    pub fn validate(&self) -> QueryResult<()> {
        let present = match self.graph_type {
            GraphType::General => self.general_filters.is_some(),
            GraphType::Mentions => self.mentions_filters.is_some(),
            GraphType::PersonAuthorshipOwnership => self.person_authorship_ownership_filters.is_some(),
        };
        if present {
            return Ok(());
        }
        let block = match self.graph_type {
            GraphType::General => "general_filters",
            GraphType::Mentions => "mentions_filters",
            GraphType::PersonAuthorshipOwnership => "person_authorship_ownership_filters",
        };
        Err(QueryError::validation(format!(
            "{block} must be provided for this graph_type"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    fn parse(value: serde_json::Value) -> SearchQuery {
        serde_json::from_value(value).expect("valid search query")
    }

    #[test]
    fn defaults_apply() {
        let query = parse(json!({"rules": []}));
        assert_eq!(query.entity, EntityKind::Work);
        assert_eq!(query.limit, DEFAULT_LIMIT);
        assert_eq!(query.offset, 0);
        assert!(query.validate().is_ok());
    }

    #[test_case(0; "zero")]
    #[test_case(10_001; "too large")]
    fn limit_out_of_range_is_rejected(limit: usize) {
        let query = parse(json!({"rules": [], "limit": limit}));
        assert!(matches!(query.validate(), Err(QueryError::Validation(_))));
    }

    #[test]
    fn non_searchable_entity_is_rejected() {
        let query = parse(json!({"rules": [], "entity": "hypothesis"}));
        assert!(query.validate().is_err());
    }

    #[test]
    fn proximity_rules_need_a_query_and_no_values() {
        let missing = parse(json!({"rules": [
            {"field": "proximity_text_search", "logic": "and"}
        ]}));
        assert!(missing.validate().is_err());

        let with_values = parse(json!({"rules": [{
            "field": "proximity_text_search", "logic": "and", "values": ["x"],
            "proximity_query": {"terms": [{"text": "x"}]}
        }]}));
        assert!(with_values.validate().is_err());

        let ok = parse(json!({"rules": [{
            "field": "proximity_text_search", "logic": "and",
            "proximity_query": {"terms": [{"text": "x"}]}
        }]}));
        assert!(ok.validate().is_ok());
        assert_eq!(
            ok.rules[0].proximity_query.as_ref().map(|q| q.distance),
            Some(DEFAULT_DISTANCE)
        );
    }

    #[test]
    fn other_rules_need_values() {
        let query = parse(json!({"rules": [{"field": "author", "logic": "and"}]}));
        assert!(query.validate().is_err());
    }

    #[test]
    fn too_many_proximity_terms_are_rejected() {
        let terms = (0..4).map(|i| ProximityTerm::new(format!("t{i}"))).collect();
        let rule = FilterRule::proximity(Logic::And, ProximityQuery::new(terms));
        assert!(rule.validate().is_err());
    }

    #[test]
    fn graph_queries_need_their_filter_block() {
        let query: GraphSearchQuery =
            serde_json::from_value(json!({"graph_type": "mentions"})).expect("shape");
        assert!(query.validate().is_err());
        let query: GraphSearchQuery = serde_json::from_value(json!({
            "graph_type": "mentions",
            "mentions_filters": {"entity_types": ["work"], "mention_directions": ["Mentioning"]}
        }))
        .expect("shape");
        assert!(query.validate().is_ok());
    }
}
