use serde_json::{json, Value};
use std::collections::BTreeSet;

use super::{contributor_names, json_map, sorted_unique, ContributorStyle, Deduplicator, Lookups};
use crate::index::{LinkSlot, ListSlot, TextSlot};
use crate::model::{DetailEntry, EntityKind, EntityRecord, Facet, NONE_PLACEHOLDER};

pub(super) fn materialize(lookups: Lookups<'_>) -> Deduplicator {
    let index = lookups.index;
    let mut dedup = Deduplicator::new(EntityKind::Work);

    for doc in lookups.catalog.documents(EntityKind::Work) {
        let id = doc.id.as_str();
        let Some(title) = index.text(TextSlot::WorkUniformTitle, id) else {
            continue;
        };

        let expressions: Vec<Value> = sorted_unique(index.links(LinkSlot::WorkExpressions, id))
            .into_iter()
            .map(|expression| {
                let label = lookups.label_or(&expression, "Unknown Expression");
                json!({"expression_id": expression, "expression_title": label})
            })
            .collect();

        let author_ids = sorted_unique(index.links(LinkSlot::WorkAuthors, id));
        let authors = lookups.contributors(&author_ids, ContributorStyle::Author);
        let mut search_terms: BTreeSet<String> = contributor_names(&authors).into_iter().collect();
        for author in index.links(LinkSlot::WorkAuthors, id) {
            if lookups.kind(author) == Some(EntityKind::Person) {
                search_terms.extend(index.list(ListSlot::PersonAlias, author).iter().cloned());
            }
        }

        let classifications = sorted_unique(index.list(ListSlot::WorkClassification, id));
        let projects = lookups.projects(id);

        let mut record = EntityRecord::new(EntityKind::Work, id, title);
        record.human_readable_id = lookups.code(doc, EntityKind::Work);
        record.projects = projects.clone();
        let classification_text = if classifications.is_empty() {
            NONE_PLACEHOLDER.to_string()
        } else {
            classifications.join(", ")
        };
        record.card = json_map(json!({
            "title": title,
            "authors": authors,
            "classifications": classification_text,
            "projects": projects,
        }));
        record.add_terms(Facet::Classifications, &classifications);
        record.add_terms(Facet::AuthorSearchTerms, &search_terms);
        record.add_terms(Facet::WorkTitle, [title]);
        record.set("expressions", expressions);
        record.set("authors", authors);
        record.set("classifications", classifications);
        record.set("hypotheses", lookups.hypotheses(id));
        record.set(
            "author_search_terms",
            search_terms.into_iter().collect::<Vec<_>>(),
        );

        let entry = DetailEntry::new(EntityKind::Work, record.projects.clone()).with_field("work_title", title);
        dedup.offer(record, entry);
    }
    dedup
}
