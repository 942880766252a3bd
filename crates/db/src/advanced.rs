//! Generic list executor ("advanced results").
//!
//! Runs a parsed [`ListQuery`] against any collection: filter, count, sort,
//! page, optionally expand one reference field, then project. Every list
//! endpoint answers with the same [`ListResponse`] envelope.

use std::collections::HashMap;

use devcamper_core::query::{project, Collection, ListQuery, Pagination};
use devcamper_core::types::DbId;
use serde::Serialize;
use serde_json::Value;

use crate::error::StoreError;
use crate::store::ListStore;

/// Success envelope for list endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse {
    pub success: bool,
    /// Records on this page, not the total.
    pub count: usize,
    pub pagination: Pagination,
    pub data: Vec<Value>,
}

/// Replace a reference field with a summary of the record it points at.
#[derive(Debug, Clone, Copy)]
pub struct Populate {
    /// Wire name of the reference field on the listed records.
    pub field: &'static str,
    /// Collection the reference points into.
    pub collection: Collection,
    /// Fields of the referenced record to embed (its id is always kept).
    pub select: &'static [&'static str],
}

/// Courses and reviews embed their bootcamp's name and description.
pub const BOOTCAMP_SUMMARY: Populate = Populate {
    field: "bootcamp",
    collection: Collection::Bootcamps,
    select: &["name", "description"],
};

/// Run `query` over `collection`.
///
/// `count` is the size of the returned page; pagination links are derived
/// from the full match count.
pub async fn advanced_results<S>(
    store: &S,
    collection: Collection,
    query: &ListQuery,
    populate: Option<&Populate>,
) -> Result<ListResponse, StoreError>
where
    S: ListStore + ?Sized,
{
    let page = store.find_page(collection, query).await?;
    let mut rows = page.rows;

    if let Some(populate) = populate {
        if selects(query, populate.field) {
            expand(store, &mut rows, populate).await?;
        }
    }

    let data: Vec<Value> = rows
        .into_iter()
        .map(|row| project(row, query.select.as_deref()))
        .collect();

    tracing::debug!(
        collection = collection.entity(),
        total = page.total,
        returned = data.len(),
        "List query executed",
    );

    Ok(ListResponse {
        success: true,
        count: data.len(),
        pagination: query.pagination(page.total),
        data,
    })
}

fn selects(query: &ListQuery, field: &str) -> bool {
    query
        .select
        .as_ref()
        .is_none_or(|fields| fields.iter().any(|f| f == field))
}

/// Expand `populate.field` in every row with one batched lookup.
///
/// References to records that no longer exist become `null`.
pub async fn expand<S>(
    store: &S,
    rows: &mut [Value],
    populate: &Populate,
) -> Result<(), StoreError>
where
    S: ListStore + ?Sized,
{
    let mut ids: Vec<DbId> = rows
        .iter()
        .filter_map(|row| row.get(populate.field).and_then(Value::as_i64))
        .collect();
    if ids.is_empty() {
        return Ok(());
    }
    ids.sort_unstable();
    ids.dedup();

    let select: Vec<String> = populate.select.iter().map(|f| f.to_string()).collect();
    let summaries: HashMap<DbId, Value> = store
        .find_by_ids(populate.collection, &ids)
        .await?
        .into_iter()
        .filter_map(|record| {
            let id = record.get("id").and_then(Value::as_i64)?;
            Some((id, project(record, Some(&select))))
        })
        .collect();

    for row in rows.iter_mut() {
        let Some(id) = row.get(populate.field).and_then(Value::as_i64) else {
            continue;
        };
        if let Value::Object(map) = row {
            let summary = summaries.get(&id).cloned().unwrap_or(Value::Null);
            map.insert(populate.field.to_string(), summary);
        }
    }
    Ok(())
}
