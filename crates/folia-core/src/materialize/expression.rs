use serde_json::{json, Value};

use super::{contributor_names, json_map, sorted_unique, ContributorStyle, Deduplicator, Lookups, Materialized};
use crate::index::{LinkSlot, ListSlot, ParentSlot, TextSlot};
use crate::model::{DetailEntry, EntityKind, EntityRecord, Facet};
use crate::tables::normalize_language;

/// Contributor roles on an expression: index slot, payload key, facet.
pub(super) const ROLES: [(LinkSlot, &str, Facet); 6] = [
    (LinkSlot::ExpressionTranslators, "translators", Facet::Translators),
    (LinkSlot::ExpressionEditors, "expression_editors", Facet::ExpressionEditors),
    (LinkSlot::ExpressionScriptwriters, "scriptwriters", Facet::Scriptwriters),
    (LinkSlot::ExpressionCompositors, "compositors", Facet::Compositors),
    (LinkSlot::ExpressionReviewers, "reviewers", Facet::Reviewers),
    (LinkSlot::ExpressionOtherRoles, "other_secondary_roles", Facet::OtherSecondaryRoles),
];

pub(super) fn materialize(lookups: Lookups<'_>, out: &Materialized) -> Deduplicator {
    let index = lookups.index;
    let mut dedup = Deduplicator::new(EntityKind::Expression);

    for doc in lookups.catalog.documents(EntityKind::Expression) {
        let id = doc.id.as_str();
        let Some(work_id) = index.parent(ParentSlot::ExpressionWork, id) else {
            continue;
        };
        let Some(work_title) = index.text(TextSlot::WorkUniformTitle, work_id) else {
            continue;
        };

        let types = sorted_unique(index.list(ListSlot::ExpressionType, id));
        let type_text = types.join(", ");
        let number = index.text(TextSlot::ExpressionNumber, id).unwrap_or_default();
        let parts: Vec<&str> = [work_title, type_text.as_str(), number]
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect();
        let title = if parts.is_empty() {
            lookups.label_or(id, "Unknown Expression")
        } else {
            parts.join(" - ")
        };

        let work = out.get(EntityKind::Work, work_id);
        let authors = work.and_then(|w| w.get("authors").cloned()).unwrap_or_else(|| json!([]));

        let mut record = EntityRecord::new(EntityKind::Expression, id, title.clone());
        record.human_readable_id = lookups.code(doc, EntityKind::Expression);
        record.projects = lookups.projects_or_parent(id, work);

        let mut role_lists: Vec<(&str, Vec<Value>)> = Vec::with_capacity(ROLES.len());
        let mut all_contributors: Vec<Value> = Vec::new();
        for (slot, key, facet) in ROLES {
            let contributors = lookups.contributors(index.links(slot, id), ContributorStyle::Full);
            record.add_terms(facet, contributor_names(&contributors));
            all_contributors.extend(contributors.iter().cloned());
            role_lists.push((key, contributors));
        }
        let mut secondary_authors = all_contributors;
        secondary_authors.sort_by(|a, b| super::contributor_name(a).cmp(super::contributor_name(b)));
        record.add_terms(Facet::AllPeopleAndInstitutions, contributor_names(&secondary_authors));
        if let Some(work) = work {
            record.add_terms(Facet::AllPeopleAndInstitutions, work.get_names("authors"));
            record.inherit_facets(
                work,
                &[Facet::Classifications, Facet::AuthorSearchTerms, Facet::WorkTitle],
            );
        }

        let languages: Vec<String> = sorted_unique(index.list(ListSlot::ExpressionLanguage, id))
            .iter()
            .map(|l| normalize_language(l))
            .collect();
        let responsibilities = sorted_unique(index.list(ListSlot::ExpressionResponsibility, id));
        record.add_terms(Facet::TypeOfExpression, &types);
        record.add_terms(Facet::Language, &languages);
        record.add_terms(Facet::RoleOfPersonOrInstitution, &responsibilities);

        record.card = json_map(json!({
            "title": title,
            "primary_authors": authors,
            "secondary_authors": secondary_authors,
            "responsibility": responsibilities.join(", "),
            "language": languages.join(", "),
            "projects": record.projects,
        }));
        record.set("work_id", work_id);
        record.set("work_title", work_title);
        record.set("authors", authors);
        record.set("type_of_expression", types);
        record.set("language", languages);
        record.set("medium", sorted_unique(index.list(ListSlot::ExpressionMedium, id)));
        record.set("role_of_person_or_institution", responsibilities);
        record.set("hypotheses", lookups.hypotheses(id));
        record.inherit_payload(work, &["classifications", "author_search_terms"]);
        if work.is_none() {
            record.set("classifications", json!([]));
            record.set("author_search_terms", json!([]));
        }
        for (key, contributors) in role_lists {
            record.set(key, contributors);
        }
        record.set("secondary_authors", secondary_authors);

        let entry = DetailEntry::new(EntityKind::Expression, record.projects.clone())
            .with_field("expression_title", title);
        dedup.offer(record, entry);
    }
    dedup
}
