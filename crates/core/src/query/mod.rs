//! Query-string driven list queries ("advanced results").
//!
//! A raw list of `key=value` pairs is parsed against a [`CollectionSchema`]
//! into a store-agnostic [`ListQuery`]: filter conditions, projection, sort
//! order and pagination window. Stores translate the plan into their own
//! query language; [`eval`] evaluates it directly over JSON records.

pub mod eval;
pub mod filter;
pub mod pagination;
pub mod params;
pub mod projection;
pub mod schema;

pub use filter::{Condition, FilterOp, FilterValue, Scalar};
pub use pagination::{PageRef, Pagination};
pub use params::{DefaultOrder, ListQuery, SortDirection, SortKey};
pub use projection::project;
pub use schema::{Collection, CollectionSchema, FieldDef, FieldKind};
