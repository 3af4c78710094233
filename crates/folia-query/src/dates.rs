//! Date rules
//!
//! Date rules are pulled out of the rule chain and applied first, as a plain
//! conjunction. Which date fields count, and how a record's span is compared
//! with the requested bounds, depends on the target kind.

use folia_core::dates::parse_year_bound;
use folia_core::{EntityKind, EntityRecord};

use crate::request::{FilterField, FilterRule, Logic};

/// How a record span is compared with the search bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateTest {
    /// Publication or event span overlaps the bounds.
    Overlap { honor_era: bool },
    /// Physical-object span lies inside the bounds.
    Containment,
    /// Birth after the lower bound and death before the upper bound.
    Lifespan,
}

/// Date fields a kind evaluates, and the comparison it uses.
pub fn date_test(kind: EntityKind) -> (&'static [FilterField], DateTest) {
    match kind {
        EntityKind::Person => (
            &[FilterField::PersonBirthDate, FilterField::PersonDeathDate],
            DateTest::Lifespan,
        ),
        EntityKind::PhysicalObject => (&[FilterField::PhysicalObjectDate], DateTest::Containment),
        EntityKind::Event => (&[FilterField::EventDate], DateTest::Overlap { honor_era: true }),
        _ => (&[FilterField::PublicationDate], DateTest::Overlap { honor_era: false }),
    }
}

/// Resolved search bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateBounds {
    pub from: Option<i64>,
    pub to: Option<i64>,
}

fn bound(rule: Option<&FilterRule>, is_start: bool, honor_era: bool) -> Option<i64> {
    let rule = rule?;
    let year = parse_year_bound(rule.first_value()?, is_start)?;
    match rule.era {
        Some(era) if honor_era => era.apply(year),
        _ => Some(year),
    }
}

fn with_logic<'r>(rules: &[&'r FilterRule], logic: Logic) -> Option<&'r FilterRule> {
    rules.iter().find(|r| r.logic == logic).copied()
}

/// The kind's date rules together with their comparison.
#[derive(Debug, Clone)]
pub struct DateFilter {
    test: DateTest,
    bounds: DateBounds,
}

impl DateFilter {
    /// `None` when the query carries no date rule relevant to `kind`.
    pub fn for_kind(kind: EntityKind, rules: &[FilterRule]) -> Option<Self> {
        let (fields, test) = date_test(kind);
        let relevant: Vec<&FilterRule> =
            rules.iter().filter(|r| fields.contains(&r.field)).collect();
        if relevant.is_empty() {
            return None;
        }

        let bounds = match test {
            DateTest::Lifespan => {
                let from = relevant
                    .iter()
                    .find(|r| r.field == FilterField::PersonBirthDate && r.logic == Logic::Gte);
                let to = relevant
                    .iter()
                    .find(|r| r.field == FilterField::PersonDeathDate && r.logic == Logic::Lte);
                DateBounds {
                    from: bound(from.copied(), true, true),
                    to: bound(to.copied(), false, true),
                }
            }
            DateTest::Overlap { honor_era } => DateBounds {
                from: bound(with_logic(&relevant, Logic::Gte), true, honor_era),
                to: bound(with_logic(&relevant, Logic::Lte), false, honor_era),
            },
            DateTest::Containment => DateBounds {
                from: bound(with_logic(&relevant, Logic::Gte), true, false),
                to: bound(with_logic(&relevant, Logic::Lte), false, false),
            },
        };
        Some(Self { test, bounds })
    }

    pub fn bounds(&self) -> DateBounds {
        self.bounds
    }

    /// Whether a record passes. Records without a start year never do.
    pub fn passes(&self, record: &EntityRecord) -> bool {
        let DateBounds { from, to } = self.bounds;
        match self.test {
            DateTest::Lifespan => {
                let (Some(birth), Some(death)) = (record.span.start, record.span.end) else {
                    return false;
                };
                from.map_or(true, |f| birth >= f) && to.map_or(true, |t| death <= t)
            }
            DateTest::Overlap { .. } => {
                let Some(start) = record.span.start else {
                    return false;
                };
                let end = record.span.end_or_start().unwrap_or(start);
                to.map_or(true, |t| start <= t) && from.map_or(true, |f| end >= f)
            }
            DateTest::Containment => {
                let Some(start) = record.span.start else {
                    return false;
                };
                let end = record.span.end_or_start().unwrap_or(start);
                from.map_or(true, |f| start >= f) && to.map_or(true, |t| end <= t)
            }
        }
    }
}

/// Whether a rule is a date rule for any kind.
pub fn is_date_rule(rule: &FilterRule) -> bool {
    rule.field.is_date()
}
