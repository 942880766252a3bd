//! Evaluation of a [`ListQuery`] plan over JSON records.
//!
//! Records use the wire representation (camelCase keys, nested `location`).
//! Missing and null values never satisfy a condition and sort before every
//! present value, in both directions' natural order.

use std::cmp::Ordering;

use serde_json::Value;

use super::filter::{Condition, FilterOp, FilterValue, Scalar};
use super::params::{ListQuery, SortDirection, SortKey};
use super::schema::{FieldDef, FieldKind};

/// Follow a dotted path through nested objects.
pub fn lookup<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(record, |current, segment| current.get(segment))
        .filter(|v| !v.is_null())
}

/// Read a JSON value as a scalar of the field's kind.
fn scalar_of(field: &FieldDef, value: &Value) -> Option<Scalar> {
    match field.kind {
        FieldKind::Id | FieldKind::Int => value.as_i64().map(Scalar::Int),
        FieldKind::Float => value.as_f64().map(Scalar::Float),
        FieldKind::Bool => value.as_bool().map(Scalar::Bool),
        FieldKind::Text | FieldKind::TextList => value.as_str().map(|s| Scalar::Text(s.into())),
        FieldKind::Timestamp => value
            .as_str()
            .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
            .map(|ts| Scalar::Timestamp(ts.with_timezone(&chrono::Utc))),
    }
}

fn satisfies(candidate: &Scalar, op: FilterOp, value: &FilterValue) -> bool {
    match value {
        FilterValue::One(expected) => candidate
            .compare(expected)
            .is_some_and(|ordering| op.accepts(ordering)),
        FilterValue::Many(set) => set
            .iter()
            .any(|expected| candidate.compare(expected) == Some(Ordering::Equal)),
    }
}

impl Condition {
    /// Whether `record` satisfies this condition.
    ///
    /// List fields match when any element satisfies the condition.
    pub fn matches(&self, record: &Value) -> bool {
        let Some(value) = lookup(record, self.field.name) else {
            return false;
        };

        match (self.field.kind, value) {
            (FieldKind::TextList, Value::Array(items)) => items
                .iter()
                .filter_map(|item| scalar_of(self.field, item))
                .any(|item| satisfies(&item, self.op, &self.value)),
            _ => scalar_of(self.field, value)
                .is_some_and(|candidate| satisfies(&candidate, self.op, &self.value)),
        }
    }
}

impl ListQuery {
    /// Whether `record` satisfies every condition.
    pub fn matches(&self, record: &Value) -> bool {
        self.conditions.iter().all(|c| c.matches(record))
    }
}

fn compare_key(key: &SortKey, a: &Value, b: &Value) -> Ordering {
    let a = lookup(a, key.field.name).and_then(|v| scalar_of(key.field, v));
    let b = lookup(b, key.field.name).and_then(|v| scalar_of(key.field, v));
    let ordering = match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a.compare(&b).unwrap_or(Ordering::Equal),
    };
    match key.direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// Order two records by `sort`, keys applied left to right.
pub fn compare_records(sort: &[SortKey], a: &Value, b: &Value) -> Ordering {
    sort.iter()
        .map(|key| compare_key(key, a, b))
        .find(|o| *o != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}
