//! Aggregate maintainer.
//!
//! After every write to a course or review, the owning bootcamp's derived
//! statistic is recomputed from the current set of children and written
//! back with a targeted update. Callers invoke this explicitly after the
//! child write has committed.

use devcamper_core::aggregate::{Reducer, StatField};
use devcamper_core::query::{Collection, FieldDef};
use devcamper_core::types::DbId;

use crate::error::StoreError;
use crate::store::AggregateStore;

/// How one statistic on a parent is derived from its children.
#[derive(Debug, Clone, Copy)]
pub struct StatSpec {
    pub parent: Collection,
    pub child: Collection,
    /// Wire name of the child field referencing the parent.
    pub parent_ref: &'static str,
    /// Wire name of the child field being reduced.
    pub source: &'static str,
    pub stat: StatField,
    pub reducer: Reducer,
}

/// `Bootcamp.averageCost`: mean course tuition, rounded up to a multiple of 10.
pub const AVERAGE_COST: StatSpec = StatSpec {
    parent: Collection::Bootcamps,
    child: Collection::Courses,
    parent_ref: "bootcamp",
    source: "tuition",
    stat: StatField::AverageCost,
    reducer: Reducer::MeanCeilTen,
};

/// `Bootcamp.averageRating`: mean review rating.
pub const AVERAGE_RATING: StatSpec = StatSpec {
    parent: Collection::Bootcamps,
    child: Collection::Reviews,
    parent_ref: "bootcamp",
    source: "rating",
    stat: StatField::AverageRating,
    reducer: Reducer::Mean,
};

/// Wire name of the owner reference carried by every child record.
const OWNER_REF: &str = "user";

fn child_field(spec: &StatSpec, name: &str) -> Result<&'static FieldDef, StoreError> {
    spec.child.schema().field(name).ok_or_else(|| {
        StoreError::Internal(format!(
            "{} has no field '{name}'",
            spec.child.entity()
        ))
    })
}

/// Recompute `spec.stat` for `parent_id` and persist it.
///
/// With no children left the statistic is cleared. Returns the value
/// written.
pub async fn recompute_parent_stat<S>(
    store: &S,
    parent_id: DbId,
    spec: &StatSpec,
) -> Result<Option<f64>, StoreError>
where
    S: AggregateStore + ?Sized,
{
    let parent_ref = child_field(spec, spec.parent_ref)?;
    let source = child_field(spec, spec.source)?;

    let values = store
        .child_values(spec.child, parent_ref, source, parent_id)
        .await?;
    let value = spec.reducer.reduce(&values);

    let found = store
        .write_stat(spec.parent, parent_id, spec.stat, value)
        .await?;
    if !found {
        tracing::debug!(
            parent_id,
            stat = spec.stat.wire_name(),
            "Parent gone before statistic could be written",
        );
    }
    Ok(value)
}

/// Run [`recompute_parent_stat`], logging and swallowing any failure.
///
/// The child write has already succeeded; a failed recompute must not turn
/// it into an error response.
pub async fn refresh_parent_stat<S>(store: &S, parent_id: DbId, spec: &StatSpec)
where
    S: AggregateStore + ?Sized,
{
    match recompute_parent_stat(store, parent_id, spec).await {
        Ok(value) => tracing::debug!(
            parent_id,
            stat = spec.stat.wire_name(),
            ?value,
            "Derived statistic recomputed",
        ),
        Err(e) => tracing::warn!(
            parent_id,
            stat = spec.stat.wire_name(),
            error = %e,
            "Failed to recompute derived statistic",
        ),
    }
}

/// Parents whose statistic depends on children owned by `user_id`.
///
/// Collected before a user is deleted, so the affected parents can be
/// refreshed once the user's children are gone.
pub async fn parents_touched_by_user<S>(
    store: &S,
    user_id: DbId,
    spec: &StatSpec,
) -> Result<Vec<DbId>, StoreError>
where
    S: AggregateStore + ?Sized,
{
    let parent_ref = child_field(spec, spec.parent_ref)?;
    let owner_ref = child_field(spec, OWNER_REF)?;
    store
        .parents_referenced_by(spec.child, parent_ref, owner_ref, user_id)
        .await
}
