//! Detail lookup by entity name and id.

use folia_core::{DetailEntry, EntityKind, Snapshot};

use crate::error::{QueryError, QueryResult};

/// Resolve the entity name used in detail paths. Vocabulary `type`
/// documents have no detail view.
pub fn detail_kind(entity: &str) -> QueryResult<EntityKind> {
    match entity.parse::<EntityKind>() {
        Ok(EntityKind::Type) | Err(_) => Err(QueryError::NotFound(format!(
            "Entity type '{entity}' not found"
        ))),
        Ok(kind) => Ok(kind),
    }
}

/// Detail entry of one entity. Ids merged away during deduplication
/// resolve to the surviving entry.
pub fn lookup_detail<'a>(snapshot: &'a Snapshot, entity: &str, id: &str) -> QueryResult<&'a DetailEntry> {
    let kind = detail_kind(entity)?;
    Ok(snapshot.detail(kind, id)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("work", true)]
    #[test_case("manifestation_volume", true)]
    #[test_case("hypothesis", true)]
    #[test_case("type", false)]
    #[test_case("graph", false)]
    fn detail_kinds(entity: &str, known: bool) {
        assert_eq!(detail_kind(entity).is_ok(), known);
    }

    #[test]
    fn misses_name_the_entity() {
        let snapshot = Snapshot::empty();
        let err = lookup_detail(&snapshot, "graph", "x").unwrap_err();
        assert_eq!(err, QueryError::NotFound("Entity type 'graph' not found".into()));

        let err = lookup_detail(&snapshot, "physical_object", "po1").unwrap_err();
        assert_eq!(err.to_string(), "Physical Object with ID 'po1' not found");
    }
}
