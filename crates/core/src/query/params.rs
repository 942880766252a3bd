//! Parsing of raw query-string pairs into a [`ListQuery`].

use std::str::FromStr;

use super::filter::{Condition, FilterOp};
use super::pagination::Pagination;
use super::schema::{CollectionSchema, FieldDef, FieldKind, CREATED_AT_FIELD};
use crate::error::CoreError;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 25;
pub const MAX_LIMIT: u64 = 100;

/// Query parameters that control the result shape rather than filter it.
pub const RESERVED_PARAMS: &[&str] = &["select", "sort", "page", "limit"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: &'static FieldDef,
    pub direction: SortDirection,
}

/// Order applied to list queries that carry no `sort` parameter.
///
/// Configured per deployment; both orders sort on the creation timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DefaultOrder {
    #[default]
    OldestFirst,
    NewestFirst,
}

impl DefaultOrder {
    fn direction(self) -> SortDirection {
        match self {
            DefaultOrder::OldestFirst => SortDirection::Asc,
            DefaultOrder::NewestFirst => SortDirection::Desc,
        }
    }
}

impl FromStr for DefaultOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "oldest" | "asc" => Ok(DefaultOrder::OldestFirst),
            "newest" | "desc" => Ok(DefaultOrder::NewestFirst),
            other => Err(format!(
                "Unknown default order '{other}'. Expected 'oldest' or 'newest'"
            )),
        }
    }
}

/// A fully-specified read against one collection.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    /// Conditions, all of which must hold.
    pub conditions: Vec<Condition>,
    /// Fields to return (the id is always included). `None` returns all.
    pub select: Option<Vec<String>>,
    /// Sort keys in priority order. Always ends with the id as a tiebreaker.
    pub sort: Vec<SortKey>,
    pub page: u64,
    pub limit: u64,
}

impl ListQuery {
    /// Parse raw `key=value` pairs against `schema`.
    ///
    /// `select`, `sort`, `page` and `limit` shape the result; every other key
    /// is a filter of the form `field=value` or `field[op]=value`.
    pub fn parse(
        schema: &'static CollectionSchema,
        pairs: &[(String, String)],
        default_order: DefaultOrder,
    ) -> Result<Self, CoreError> {
        let mut conditions = Vec::new();
        let mut select = None;
        let mut sort_param = None;
        let mut page = DEFAULT_PAGE;
        let mut limit = DEFAULT_LIMIT;

        for (key, value) in pairs {
            match key.as_str() {
                "select" => select = parse_select(value),
                "sort" => sort_param = Some(value.as_str()),
                "page" => page = parse_positive(value).unwrap_or(DEFAULT_PAGE),
                "limit" => {
                    limit = parse_positive(value)
                        .unwrap_or(DEFAULT_LIMIT)
                        .min(MAX_LIMIT)
                }
                _ => {
                    let (name, op) = split_filter_key(key)?;
                    let field = lookup(schema, name)?;
                    conditions.push(Condition::parse(field, op, value)?);
                }
            }
        }

        let sort = match sort_param {
            Some(raw) => parse_sort(schema, raw)?,
            None => Vec::new(),
        };

        Ok(Self {
            conditions,
            select,
            sort: finish_sort(schema, sort, default_order),
            page,
            limit,
        })
    }

    /// Add a condition that the caller, not the client, imposes (e.g. the
    /// parent id of a nested route).
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Number of matching records skipped before this page.
    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Pagination links for this page given the number of matching records.
    pub fn pagination(&self, total: u64) -> Pagination {
        Pagination::compute(self.page, self.limit, total)
    }
}

fn lookup(schema: &CollectionSchema, name: &str) -> Result<&'static FieldDef, CoreError> {
    schema.field(name).ok_or_else(|| {
        CoreError::InvalidQuery(format!(
            "Unknown field '{name}' for {}",
            schema.entity.to_lowercase()
        ))
    })
}

/// Split `field[op]` into its field name and operator.
fn split_filter_key(key: &str) -> Result<(&str, FilterOp), CoreError> {
    let Some(open) = key.find('[') else {
        if key.contains(']') || key.is_empty() {
            return Err(CoreError::InvalidQuery(format!("Malformed filter key '{key}'")));
        }
        return Ok((key, FilterOp::Eq));
    };

    let name = &key[..open];
    let suffix = key[open + 1..]
        .strip_suffix(']')
        .filter(|s| !s.contains(['[', ']']));

    match (name.is_empty(), suffix) {
        (false, Some(suffix)) => FilterOp::from_suffix(suffix)
            .map(|op| (name, op))
            .ok_or_else(|| {
                CoreError::InvalidQuery(format!(
                    "Unsupported filter operator '{suffix}' on field '{name}'"
                ))
            }),
        _ => Err(CoreError::InvalidQuery(format!("Malformed filter key '{key}'"))),
    }
}

fn parse_select(raw: &str) -> Option<Vec<String>> {
    let fields: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect();
    if fields.is_empty() {
        None
    } else {
        Some(fields)
    }
}

fn parse_sort(schema: &CollectionSchema, raw: &str) -> Result<Vec<SortKey>, CoreError> {
    let mut keys: Vec<SortKey> = Vec::new();
    for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let (name, direction) = match token.strip_prefix('-') {
            Some(name) => (name, SortDirection::Desc),
            None => (token, SortDirection::Asc),
        };
        let field = lookup(schema, name)?;
        if field.kind == FieldKind::TextList {
            return Err(CoreError::InvalidQuery(format!(
                "Cannot sort by list field '{name}'"
            )));
        }
        // The first mention of a field decides its direction.
        if !keys.iter().any(|k| k.field == field) {
            keys.push(SortKey { field, direction });
        }
    }
    Ok(keys)
}

fn finish_sort(
    schema: &'static CollectionSchema,
    mut sort: Vec<SortKey>,
    default_order: DefaultOrder,
) -> Vec<SortKey> {
    if sort.is_empty() {
        if let Some(created_at) = schema.field(CREATED_AT_FIELD) {
            sort.push(SortKey {
                field: created_at,
                direction: default_order.direction(),
            });
        }
    }

    let id = schema.id_field();
    if !sort.iter().any(|k| k.field == id) {
        let direction = sort
            .first()
            .map(|k| k.direction)
            .unwrap_or(SortDirection::Asc);
        sort.push(SortKey { field: id, direction });
    }
    sort
}

/// Positive integer, or `None` for anything else (missing, zero, negative,
/// non-numeric).
fn parse_positive(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|v| *v > 0)
}
