//! Search execution
//!
//! Rules are applied in two stages. Date rules relevant to the target kind
//! form a plain conjunction applied first. The remaining rules are chained:
//! each rule's logic operator joins it to the rule that follows it, so for
//! rules `R0 AND, R1 OR, R2` the result is `(R0 ∩ R1) ∪ R2`.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use tracing::debug;

use folia_core::{EntityKind, EntityRecord, Snapshot};

use crate::dates::{is_date_rule, DateFilter};
use crate::error::QueryResult;
use crate::matcher::rule_matches;
use crate::projection::project;
use crate::request::{FilterRule, Logic, SearchQuery};

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResponse {
    /// Matches before pagination.
    pub count: usize,
    pub results: Vec<Map<String, Value>>,
}

/// Run a search against a published snapshot.
pub fn run_search(snapshot: &Snapshot, query: &SearchQuery) -> QueryResult<SearchResponse> {
    query.validate()?;

    let population: Vec<&EntityRecord> = snapshot
        .records(query.entity)
        .iter()
        .filter(|record| match &query.projects {
            Some(projects) if !projects.is_empty() => {
                record.projects.iter().any(|p| projects.contains(p))
            }
            _ => true,
        })
        .collect();

    if query.rules.is_empty() {
        debug!(entity = %query.entity, count = population.len(), "Search without rules");
        return Ok(paginate(population, query));
    }

    let dated: Vec<&EntityRecord> = match DateFilter::for_kind(query.entity, &query.rules) {
        Some(filter) => population.into_iter().filter(|r| filter.passes(r)).collect(),
        None => population,
    };

    let chainable: Vec<&FilterRule> = query.rules.iter().filter(|r| !is_date_rule(r)).collect();
    let mut matches: Vec<&EntityRecord> = if chainable.is_empty() {
        dated
    } else {
        let selected = fold_rules(&dated, &chainable);
        dated
            .into_iter()
            .enumerate()
            .filter(|(i, _)| selected.contains(i))
            .map(|(_, r)| r)
            .collect()
    };

    let key = query
        .order_by
        .map(|o| o.key())
        .unwrap_or_else(|| query.entity.title_key());
    sort_records(&mut matches, query.entity, key);

    debug!(
        entity = %query.entity,
        rules = query.rules.len(),
        count = matches.len(),
        "Search complete"
    );
    Ok(paginate(matches, query))
}

/// Positions in `records` selected by the chained rules.
///
/// Logic is read from the earlier rule of each adjacent pair; the final
/// rule's own logic is never used. `gte`/`lte` leave the running set alone.
pub fn fold_rules(records: &[&EntityRecord], rules: &[&FilterRule]) -> BTreeSet<usize> {
    let matching = |rule: &FilterRule| -> BTreeSet<usize> {
        records
            .iter()
            .enumerate()
            .filter(|(_, record)| rule_matches(rule, record))
            .map(|(i, _)| i)
            .collect()
    };

    let Some((first, rest)) = rules.split_first() else {
        return (0..records.len()).collect();
    };
    let mut current = matching(*first);
    let mut previous = *first;
    for rule in rest {
        let next = matching(*rule);
        match previous.logic {
            Logic::And => current.retain(|i| next.contains(i)),
            Logic::Or => current.extend(next),
            Logic::Not => current.retain(|i| !next.contains(i)),
            Logic::Gte | Logic::Lte => {}
        }
        previous = *rule;
    }
    current
}

/// Sort value of a record. Items sort by their composite card title.
fn sort_value(record: &EntityRecord, kind: EntityKind, key: &str) -> Option<String> {
    if kind == EntityKind::Item {
        return match record.card.get("title") {
            Some(Value::String(title)) => Some(title.clone()),
            _ => None,
        };
    }
    match record.public_value(key)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Stable sort, missing values last.
fn sort_records(records: &mut [&EntityRecord], kind: EntityKind, key: &str) {
    records.sort_by_cached_key(|record| {
        let value = sort_value(record, kind, key);
        (value.is_none(), value)
    });
}

fn paginate(records: Vec<&EntityRecord>, query: &SearchQuery) -> SearchResponse {
    let count = records.len();
    let results = records
        .into_iter()
        .skip(query.offset)
        .take(query.limit)
        .map(|record| project(record, query.fields.as_deref()))
        .collect();
    SearchResponse { count, results }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{FilterField, Operator};
    use folia_core::{Facet, Materialized};

    fn work(id: &str, title: &str, author: &str) -> EntityRecord {
        let mut record = EntityRecord::new(EntityKind::Work, id, title);
        record.add_terms(Facet::AuthorSearchTerms, [author]);
        record
    }

    fn author(name: &str, logic: Logic) -> FilterRule {
        FilterRule::new(FilterField::Author, logic, [name])
    }

    #[test]
    fn logic_trails_the_earlier_rule() {
        let records = [
            work("a", "A", "alpha"),
            work("b", "B", "alpha"),
            work("c", "C", "gamma"),
            work("d", "D", "delta"),
        ];
        let refs: Vec<&EntityRecord> = records.iter().collect();
        let r0 = author("alpha", Logic::And);
        let r1 = author("gamma", Logic::Or);
        let r2 = author("delta", Logic::And);
        let selected = fold_rules(&refs, &[&r0, &r1, &r2]);
        assert_eq!(selected.into_iter().collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn not_removes_the_following_matches() {
        let records = [work("a", "A", "alpha"), work("b", "B", "beta")];
        let refs: Vec<&EntityRecord> = records.iter().collect();
        let everyone = author("a", Logic::Not).with_op(Operator::Contains);
        let beta = author("beta", Logic::And);
        let selected = fold_rules(&refs, &[&everyone, &beta]);
        assert_eq!(selected.into_iter().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn missing_sort_values_go_last() {
        let mut with = EntityRecord::new(EntityKind::Item, "i1", "Ald. 3");
        with.card.insert("title".into(), Value::String("B".into()));
        let without = EntityRecord::new(EntityKind::Item, "i2", "Ald. 4");
        let mut first = EntityRecord::new(EntityKind::Item, "i3", "Ald. 5");
        first.card.insert("title".into(), Value::String("A".into()));

        let mut records = vec![&without, &with, &first];
        sort_records(&mut records, EntityKind::Item, "item_label");
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["i3", "i1", "i2"]);
    }

    #[test]
    fn empty_snapshot_returns_nothing() {
        let snapshot = Snapshot::new(Materialized::new(), Default::default(), Default::default());
        let query = SearchQuery::new(EntityKind::Work).rule(author("alpha", Logic::And));
        let response = run_search(&snapshot, &query).expect("valid query");
        assert_eq!(response, SearchResponse::default());
    }
}
