//! Filter Vocabulary Builder
//!
//! Walks the materialized records once and collects, per project, the option
//! lists offered by the search form. Values are drawn from the same facet
//! containers the query engine matches against, title-cased for display.
//! Project names are kept verbatim and only listed under `__ALL__`.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

use crate::materialize::Materialized;
use crate::model::{EntityKind, EntityRecord, Facet};
use crate::tables::vocabularies::{ALL_PROJECTS, DIGITALIZATION_SENTINEL, STATIC_FILTERS, UNKNOWN_PROJECT};
use crate::text::title_case;

/// Sentinel option for online publication places.
pub const WEB_PLACE: &str = "Web";

/// Prefixes of internal codes that must never appear as options.
const ID_PREFIXES: [&str; 2] = ["p_", "inst_"];

/// Lists that pin the web sentinel first.
const PLACE_KEYS: [&str; 2] = ["places", "physical_object_places"];

/// Where a filter list takes its values from.
#[derive(Debug, Clone, Copy)]
enum Feed {
    Facet(Facet),
    /// `name` of each contributor object in a payload list.
    Names(&'static str),
}

use Feed::{Facet as F, Names};

/// Filter lists fed by each kind.
fn feeds(kind: EntityKind) -> &'static [(&'static str, Feed)] {
    match kind {
        EntityKind::Work => &[
            ("classifications", F(Facet::Classifications)),
            ("authors", F(Facet::AuthorSearchTerms)),
            ("work_titles", F(Facet::WorkTitle)),
        ],
        EntityKind::Expression => &[
            ("types_of_expression", F(Facet::TypeOfExpression)),
            ("languages", F(Facet::Language)),
            ("roles_of_person_or_institution", F(Facet::RoleOfPersonOrInstitution)),
            ("all_people_and_institutions", F(Facet::AllPeopleAndInstitutions)),
        ],
        EntityKind::Manifestation => &[
            ("places", F(Facet::PublicationPlace)),
            ("all_people_and_institutions", F(Facet::AllPeopleAndInstitutions)),
        ],
        EntityKind::Item => &[
            ("preservation_statuses", F(Facet::PreservationStatus)),
            ("owners", F(Facet::Owner)),
            ("materials", F(Facet::Material)),
            ("types_of_item", F(Facet::TypeOfItem)),
            ("types_of_visual_object", F(Facet::TypeOfVisualObject)),
            ("types_of_physical_object", F(Facet::TypeOfPhysicalObject)),
            ("all_people_and_institutions", F(Facet::AllPeopleAndInstitutions)),
        ],
        EntityKind::VisualObject => &[
            ("types_of_visual_object", F(Facet::TypeOfVisualObject)),
            ("visual_object_functions", F(Facet::VisualObjectFunction)),
            ("visual_object_languages", F(Facet::VisualObjectLanguage)),
            ("visual_object_instruments", F(Facet::VisualObjectInstrument)),
            ("visual_object_colours", F(Facet::VisualObjectColour)),
            ("work_titles", F(Facet::WorkTitle)),
            ("authors", Names("authors")),
            ("classifications", F(Facet::Classifications)),
            ("types_of_expression", F(Facet::TypeOfExpression)),
            ("languages", F(Facet::Language)),
            ("places", F(Facet::PublicationPlace)),
            ("all_people_and_institutions", F(Facet::AllPeopleAndInstitutions)),
            ("owners", F(Facet::ItemOwner)),
        ],
        EntityKind::Person => &[
            ("all_people", F(Facet::PersonName)),
            ("all_people_and_institutions", F(Facet::PersonName)),
        ],
        EntityKind::Institution => &[
            ("institution_names", F(Facet::InstitutionName)),
            ("institution_places", F(Facet::InstitutionPlace)),
            ("all_people_and_institutions", F(Facet::InstitutionName)),
        ],
        EntityKind::Event => &[("event_names", F(Facet::EventName))],
        EntityKind::PhysicalObject => &[
            ("types_of_physical_object", F(Facet::TypeOfPhysicalObject)),
            ("physical_object_places", F(Facet::PhysicalObjectPlace)),
            ("owners", F(Facet::Owner)),
            ("work_titles", F(Facet::WorkTitle)),
            ("authors", Names("authors")),
            ("classifications", F(Facet::Classifications)),
            ("types_of_expression", F(Facet::TypeOfExpression)),
            ("languages", F(Facet::Language)),
            ("places", F(Facet::PublicationPlace)),
            ("all_people_and_institutions", F(Facet::AllPeopleAndInstitutions)),
            ("all_people_and_institutions", F(Facet::Owner)),
            ("all_people_and_institutions", F(Facet::VisualObjectOwners)),
            ("all_people_and_institutions", F(Facet::VisualObjectInscribers)),
            ("all_people_and_institutions", F(Facet::VisualObjectSenders)),
            ("all_people_and_institutions", F(Facet::VisualObjectRecipients)),
        ],
        EntityKind::AbstractCharacter => &[("abstract_character_names", F(Facet::AcName))],
        _ => &[],
    }
}

fn is_internal_id(value: &str) -> bool {
    ID_PREFIXES.iter().any(|prefix| value.starts_with(prefix))
}

/// Filter option lists for one project.
pub type FilterBucket = BTreeMap<String, Vec<String>>;

/// Filter option lists keyed by project, plus the `__ALL__` aggregate.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct FilterOptions {
    projects: BTreeMap<String, FilterBucket>,
}

impl FilterOptions {
    /// Options of one project; `__ALL__` gives the aggregate.
    pub fn for_project(&self, project: &str) -> Option<&FilterBucket> {
        self.projects.get(project)
    }

    pub fn project_names(&self) -> impl Iterator<Item = &str> {
        self.projects.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

#[derive(Default)]
struct Accumulator {
    buckets: HashMap<String, HashMap<&'static str, BTreeSet<String>>>,
}

impl Accumulator {
    fn add<I, S>(&mut self, projects: &[String], key: &'static str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let values: BTreeSet<String> = values
            .into_iter()
            .map(|v| v.as_ref().to_string())
            .filter(|v| !v.is_empty() && !is_internal_id(v))
            .map(|v| if key == "projects" { v } else { title_case(&v) })
            .collect();
        if values.is_empty() {
            return;
        }
        let unknown = [UNKNOWN_PROJECT.to_string()];
        let projects = if projects.is_empty() { &unknown[..] } else { projects };
        for project in projects.iter().map(String::as_str).chain([ALL_PROJECTS]) {
            self.buckets
                .entry(project.to_string())
                .or_default()
                .entry(key)
                .or_default()
                .extend(values.iter().cloned());
        }
    }

    fn record(&mut self, record: &EntityRecord) {
        for (key, feed) in feeds(record.kind) {
            match feed {
                Feed::Facet(facet) => {
                    if let Some(terms) = record.facet(*facet) {
                        self.add(&record.projects, key, terms);
                    }
                }
                Feed::Names(payload_key) => self.add(&record.projects, key, record.get_names(payload_key)),
            }
        }
        if record.kind == EntityKind::Item && record.flag("has_digital_representation") {
            self.add(&record.projects, "digitalization", [DIGITALIZATION_SENTINEL]);
        }
    }

    fn finish(self) -> FilterOptions {
        let mut projects = BTreeMap::new();
        for (project, mut lists) in self.buckets {
            for (key, values) in STATIC_FILTERS {
                lists.entry(key).or_default().extend(values.iter().map(|v| v.to_string()));
            }
            let bucket: FilterBucket = lists
                .into_iter()
                .map(|(key, values)| (key.to_string(), sort_options(key, values)))
                .collect();
            projects.insert(project, bucket);
        }
        FilterOptions { projects }
    }
}

/// Case-insensitive order; place lists lead with the web sentinel.
fn sort_options(key: &str, values: BTreeSet<String>) -> Vec<String> {
    let pin_web = PLACE_KEYS.contains(&key) && values.contains(WEB_PLACE);
    let mut sorted: Vec<String> = values
        .into_iter()
        .filter(|v| !(pin_web && v == WEB_PLACE))
        .collect();
    sorted.sort_by_key(|v| v.to_lowercase());
    if pin_web {
        sorted.insert(0, WEB_PLACE.to_string());
    }
    sorted
}

/// Build the per-project filter vocabulary.
pub fn build_filter_options(out: &Materialized, all_projects: &BTreeSet<String>) -> FilterOptions {
    let mut acc = Accumulator::default();
    acc.add(&[ALL_PROJECTS.to_string()], "projects", all_projects);
    for kind in EntityKind::SEARCHABLE {
        for record in out.records(kind) {
            acc.record(record);
        }
    }
    let options = acc.finish();
    debug!(projects = options.len(), "Built filter options");
    options
}
