//! Storage ports.
//!
//! Handlers and the list/aggregate services talk to storage only through
//! these traits. [`PgStore`] is the production adapter; [`MemoryStore`]
//! keeps everything in process and backs the test suites.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use devcamper_core::aggregate::StatField;
use devcamper_core::query::{Collection, FieldDef, ListQuery};
use devcamper_core::types::DbId;
use serde_json::Value;

use crate::error::StoreError;
use crate::models::bootcamp::{Bootcamp, CreateBootcamp, UpdateBootcamp};
use crate::models::course::{Course, CreateCourse, UpdateCourse};
use crate::models::review::{CreateReview, Review, UpdateReview};
use crate::models::session::{CreateSession, UserSession};
use crate::models::user::{CreateUser, ResetToken, UpdateUser, User};

/// One page of a list query plus the unpaged match count.
#[derive(Debug, Clone, Default)]
pub struct PageRows {
    /// Records matching the filter, ignoring `page`/`limit`.
    pub total: u64,
    /// Wire-shaped records for the requested page, in sort order.
    pub rows: Vec<Value>,
}

#[async_trait]
pub trait BootcampStore: Send + Sync {
    async fn create_bootcamp(&self, input: &CreateBootcamp) -> Result<Bootcamp, StoreError>;

    async fn find_bootcamp(&self, id: DbId) -> Result<Option<Bootcamp>, StoreError>;

    /// Number of bootcamps owned by `user_id`.
    async fn count_bootcamps_by_owner(&self, user_id: DbId) -> Result<u64, StoreError>;

    /// Apply the non-`None` fields of `input`. `None` when the row is gone.
    async fn update_bootcamp(
        &self,
        id: DbId,
        input: &UpdateBootcamp,
    ) -> Result<Option<Bootcamp>, StoreError>;

    /// Delete a bootcamp together with its courses and reviews.
    async fn delete_bootcamp(&self, id: DbId) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait CourseStore: Send + Sync {
    async fn create_course(&self, input: &CreateCourse) -> Result<Course, StoreError>;

    async fn find_course(&self, id: DbId) -> Result<Option<Course>, StoreError>;

    async fn update_course(
        &self,
        id: DbId,
        input: &UpdateCourse,
    ) -> Result<Option<Course>, StoreError>;

    /// Delete a course, returning the removed row.
    async fn delete_course(&self, id: DbId) -> Result<Option<Course>, StoreError>;
}

#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn create_review(&self, input: &CreateReview) -> Result<Review, StoreError>;

    async fn find_review(&self, id: DbId) -> Result<Option<Review>, StoreError>;

    async fn update_review(
        &self,
        id: DbId,
        input: &UpdateReview,
    ) -> Result<Option<Review>, StoreError>;

    /// Delete a review, returning the removed row.
    async fn delete_review(&self, id: DbId) -> Result<Option<Review>, StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, input: &CreateUser) -> Result<User, StoreError>;

    async fn find_user(&self, id: DbId) -> Result<Option<User>, StoreError>;

    /// Exact (case-sensitive) email match.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Find the user holding an unexpired reset token with this hash.
    async fn find_user_by_reset_token(&self, token_hash: &str)
        -> Result<Option<User>, StoreError>;

    async fn update_user(&self, id: DbId, input: &UpdateUser) -> Result<Option<User>, StoreError>;

    /// Replace the password hash and clear any pending reset token.
    async fn set_password(&self, id: DbId, password_hash: &str) -> Result<bool, StoreError>;

    /// Store or clear the pending reset token.
    async fn set_reset_token(
        &self,
        id: DbId,
        token: Option<&ResetToken>,
    ) -> Result<bool, StoreError>;

    /// Delete a user and everything they own.
    async fn delete_user(&self, id: DbId) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create_session(&self, input: &CreateSession) -> Result<UserSession, StoreError>;

    /// Only returns sessions that are not revoked and not expired.
    async fn find_active_session(&self, token_hash: &str)
        -> Result<Option<UserSession>, StoreError>;

    /// Revoke one session. Returns `true` if it was active.
    async fn revoke_session(&self, token_hash: &str) -> Result<bool, StoreError>;

    /// Revoke every active session of a user, returning how many.
    async fn revoke_all_sessions(&self, user_id: DbId) -> Result<u64, StoreError>;
}

/// Generic, schema-driven reads used by the list executor.
#[async_trait]
pub trait ListStore: Send + Sync {
    /// Filter, sort and page `collection` according to `query`.
    ///
    /// `rows` are full records; projection happens in the caller.
    async fn find_page(&self, collection: Collection, query: &ListQuery)
        -> Result<PageRows, StoreError>;

    /// Fetch the records with the given ids, in no particular order.
    async fn find_by_ids(&self, collection: Collection, ids: &[DbId])
        -> Result<Vec<Value>, StoreError>;
}

/// Reads and writes behind the aggregate maintainer.
///
/// Field arguments come from the collection schemas, so adapters can trust
/// their column names.
#[async_trait]
pub trait AggregateStore: Send + Sync {
    /// `source` of every `child` record whose `parent_ref` is `parent_id`.
    async fn child_values(
        &self,
        child: Collection,
        parent_ref: &'static FieldDef,
        source: &'static FieldDef,
        parent_id: DbId,
    ) -> Result<Vec<f64>, StoreError>;

    /// Distinct `parent_ref` values of the `child` records whose
    /// `owner_ref` is `owner_id`.
    async fn parents_referenced_by(
        &self,
        child: Collection,
        parent_ref: &'static FieldDef,
        owner_ref: &'static FieldDef,
        owner_id: DbId,
    ) -> Result<Vec<DbId>, StoreError>;

    /// Write one derived statistic; `None` clears it. Returns `false` when
    /// the parent no longer exists.
    async fn write_stat(
        &self,
        parent: Collection,
        parent_id: DbId,
        stat: StatField,
        value: Option<f64>,
    ) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait StoreHealth: Send + Sync {
    /// Round-trip to the backing store.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Everything the API needs, as one object-safe trait.
pub trait Store:
    BootcampStore
    + CourseStore
    + ReviewStore
    + UserStore
    + SessionStore
    + ListStore
    + AggregateStore
    + StoreHealth
{
}

impl<T> Store for T where
    T: BootcampStore
        + CourseStore
        + ReviewStore
        + UserStore
        + SessionStore
        + ListStore
        + AggregateStore
        + StoreHealth
{
}
