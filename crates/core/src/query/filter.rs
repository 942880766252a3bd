//! Filter conditions and typed filter values.

use std::cmp::Ordering;

use chrono::{NaiveDate, TimeZone, Utc};

use super::schema::{FieldDef, FieldKind};
use crate::error::CoreError;
use crate::types::Timestamp;

/// Comparison applied by a filter condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
}

impl FilterOp {
    /// Parse the bracket suffix of a filter key (`averageCost[gte]`).
    ///
    /// Only whole suffixes are recognised; `gte` inside a field name or
    /// value is never treated as an operator.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "gt" => Some(FilterOp::Gt),
            "gte" => Some(FilterOp::Gte),
            "lt" => Some(FilterOp::Lt),
            "lte" => Some(FilterOp::Lte),
            "in" => Some(FilterOp::In),
            _ => None,
        }
    }

    /// Whether `ordering` (record value compared to filter value) satisfies
    /// this operator. `In` is handled by the caller per element.
    pub fn accepts(self, ordering: Ordering) -> bool {
        match self {
            FilterOp::Eq | FilterOp::In => ordering == Ordering::Equal,
            FilterOp::Gt => ordering == Ordering::Greater,
            FilterOp::Gte => ordering != Ordering::Less,
            FilterOp::Lt => ordering == Ordering::Less,
            FilterOp::Lte => ordering != Ordering::Greater,
        }
    }

    fn supported_by(self, kind: FieldKind) -> bool {
        match kind {
            FieldKind::TextList | FieldKind::Bool => matches!(self, FilterOp::Eq | FilterOp::In),
            _ => true,
        }
    }
}

/// A single typed filter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    Timestamp(Timestamp),
}

impl Scalar {
    /// Parse a raw query-string value according to the field's kind.
    pub fn parse(field: &FieldDef, raw: &str) -> Result<Self, CoreError> {
        let invalid = || {
            CoreError::InvalidQuery(format!(
                "Invalid value '{raw}' for field '{}'",
                field.name
            ))
        };
        let trimmed = raw.trim();
        match field.kind {
            FieldKind::Id | FieldKind::Int => {
                trimmed.parse::<i64>().map(Scalar::Int).map_err(|_| invalid())
            }
            FieldKind::Float => match trimmed.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(Scalar::Float(v)),
                _ => Err(invalid()),
            },
            FieldKind::Bool => match trimmed {
                "true" => Ok(Scalar::Bool(true)),
                "false" => Ok(Scalar::Bool(false)),
                _ => Err(invalid()),
            },
            FieldKind::Timestamp => parse_timestamp(trimmed)
                .map(Scalar::Timestamp)
                .ok_or_else(invalid),
            FieldKind::Text | FieldKind::TextList => Ok(Scalar::Text(raw.to_string())),
        }
    }

    /// Order two scalars of the same variant. Mixed variants are unordered.
    pub fn compare(&self, other: &Scalar) -> Option<Ordering> {
        match (self, other) {
            (Scalar::Int(a), Scalar::Int(b)) => Some(a.cmp(b)),
            (Scalar::Float(a), Scalar::Float(b)) => a.partial_cmp(b),
            (Scalar::Text(a), Scalar::Text(b)) => Some(a.as_bytes().cmp(b.as_bytes())),
            (Scalar::Bool(a), Scalar::Bool(b)) => Some(a.cmp(b)),
            (Scalar::Timestamp(a), Scalar::Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

/// Accept RFC 3339 timestamps or plain `YYYY-MM-DD` dates (midnight UTC).
fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    if let Ok(ts) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    Utc.from_local_datetime(&date.and_hms_opt(0, 0, 0)?).single()
}

/// Right-hand side of a condition.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    One(Scalar),
    /// Candidate set for [`FilterOp::In`].
    Many(Vec<Scalar>),
}

/// `field op value`, e.g. `averageCost >= 10000`.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: &'static FieldDef,
    pub op: FilterOp,
    pub value: FilterValue,
}

impl Condition {
    /// Build a condition from a raw query-string value.
    ///
    /// `in` values are comma-separated; every other operator takes a single
    /// value.
    pub fn parse(field: &'static FieldDef, op: FilterOp, raw: &str) -> Result<Self, CoreError> {
        if !op.supported_by(field.kind) {
            return Err(CoreError::InvalidQuery(format!(
                "Operator '{op:?}' is not supported on field '{}'",
                field.name
            )));
        }

        let value = if op == FilterOp::In {
            let values = raw
                .split(',')
                .filter(|v| !v.trim().is_empty())
                .map(|v| Scalar::parse(field, v))
                .collect::<Result<Vec<_>, _>>()?;
            if values.is_empty() {
                return Err(CoreError::InvalidQuery(format!(
                    "Empty 'in' list for field '{}'",
                    field.name
                )));
            }
            FilterValue::Many(values)
        } else {
            FilterValue::One(Scalar::parse(field, raw)?)
        };

        Ok(Self { field, op, value })
    }

    /// Equality condition on an already-typed value.
    pub fn eq(field: &'static FieldDef, value: Scalar) -> Self {
        Self {
            field,
            op: FilterOp::Eq,
            value: FilterValue::One(value),
        }
    }
}
