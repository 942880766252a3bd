//! PostgreSQL adapter for the storage ports.

use async_trait::async_trait;
use devcamper_core::aggregate::StatField;
use devcamper_core::query::{Collection, FieldDef, ListQuery};
use devcamper_core::types::DbId;
use serde::Serialize;
use serde_json::Value;

use super::{
    AggregateStore, BootcampStore, CourseStore, ListStore, PageRows, ReviewStore, SessionStore,
    StoreHealth, UserStore,
};
use crate::error::StoreError;
use crate::models::bootcamp::{Bootcamp, CreateBootcamp, UpdateBootcamp};
use crate::models::course::{Course, CreateCourse, UpdateCourse};
use crate::models::review::{CreateReview, Review, UpdateReview};
use crate::models::session::{CreateSession, UserSession};
use crate::models::user::{CreateUser, ResetToken, UpdateUser, User, UserResponse};
use crate::repositories::bootcamp_repo::{self, BootcampRepo};
use crate::repositories::course_repo::{self, CourseRepo};
use crate::repositories::list_repo::ListRepo;
use crate::repositories::review_repo::{self, ReviewRepo};
use crate::repositories::session_repo::SessionRepo;
use crate::repositories::stat_repo::StatRepo;
use crate::repositories::user_repo::{self, UserRepo};
use crate::DbPool;

/// Store backed by a PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

fn to_values<T: Serialize>(rows: &[T]) -> Result<Vec<Value>, StoreError> {
    rows.iter()
        .map(|row| serde_json::to_value(row).map_err(StoreError::from))
        .collect()
}

fn user_values(users: &[User]) -> Result<Vec<Value>, StoreError> {
    let safe: Vec<UserResponse> = users.iter().map(UserResponse::from).collect();
    to_values(&safe)
}

#[async_trait]
impl BootcampStore for PgStore {
    async fn create_bootcamp(&self, input: &CreateBootcamp) -> Result<Bootcamp, StoreError> {
        Ok(BootcampRepo::create(&self.pool, input).await?)
    }

    async fn find_bootcamp(&self, id: DbId) -> Result<Option<Bootcamp>, StoreError> {
        Ok(BootcampRepo::find_by_id(&self.pool, id).await?)
    }

    async fn count_bootcamps_by_owner(&self, user_id: DbId) -> Result<u64, StoreError> {
        let count = BootcampRepo::count_by_owner(&self.pool, user_id).await?;
        Ok(count.max(0) as u64)
    }

    async fn update_bootcamp(
        &self,
        id: DbId,
        input: &UpdateBootcamp,
    ) -> Result<Option<Bootcamp>, StoreError> {
        Ok(BootcampRepo::update(&self.pool, id, input).await?)
    }

    async fn delete_bootcamp(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(BootcampRepo::delete(&self.pool, id).await?)
    }
}

#[async_trait]
impl CourseStore for PgStore {
    async fn create_course(&self, input: &CreateCourse) -> Result<Course, StoreError> {
        Ok(CourseRepo::create(&self.pool, input).await?)
    }

    async fn find_course(&self, id: DbId) -> Result<Option<Course>, StoreError> {
        Ok(CourseRepo::find_by_id(&self.pool, id).await?)
    }

    async fn update_course(
        &self,
        id: DbId,
        input: &UpdateCourse,
    ) -> Result<Option<Course>, StoreError> {
        Ok(CourseRepo::update(&self.pool, id, input).await?)
    }

    async fn delete_course(&self, id: DbId) -> Result<Option<Course>, StoreError> {
        Ok(CourseRepo::delete(&self.pool, id).await?)
    }
}

#[async_trait]
impl ReviewStore for PgStore {
    async fn create_review(&self, input: &CreateReview) -> Result<Review, StoreError> {
        Ok(ReviewRepo::create(&self.pool, input).await?)
    }

    async fn find_review(&self, id: DbId) -> Result<Option<Review>, StoreError> {
        Ok(ReviewRepo::find_by_id(&self.pool, id).await?)
    }

    async fn update_review(
        &self,
        id: DbId,
        input: &UpdateReview,
    ) -> Result<Option<Review>, StoreError> {
        Ok(ReviewRepo::update(&self.pool, id, input).await?)
    }

    async fn delete_review(&self, id: DbId) -> Result<Option<Review>, StoreError> {
        Ok(ReviewRepo::delete(&self.pool, id).await?)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, input: &CreateUser) -> Result<User, StoreError> {
        Ok(UserRepo::create(&self.pool, input).await?)
    }

    async fn find_user(&self, id: DbId) -> Result<Option<User>, StoreError> {
        Ok(UserRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(UserRepo::find_by_email(&self.pool, email).await?)
    }

    async fn find_user_by_reset_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<User>, StoreError> {
        Ok(UserRepo::find_by_reset_token(&self.pool, token_hash).await?)
    }

    async fn update_user(&self, id: DbId, input: &UpdateUser) -> Result<Option<User>, StoreError> {
        Ok(UserRepo::update(&self.pool, id, input).await?)
    }

    async fn set_password(&self, id: DbId, password_hash: &str) -> Result<bool, StoreError> {
        Ok(UserRepo::update_password(&self.pool, id, password_hash).await?)
    }

    async fn set_reset_token(
        &self,
        id: DbId,
        token: Option<&ResetToken>,
    ) -> Result<bool, StoreError> {
        Ok(UserRepo::set_reset_token(&self.pool, id, token).await?)
    }

    async fn delete_user(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(UserRepo::delete(&self.pool, id).await?)
    }
}

#[async_trait]
impl SessionStore for PgStore {
    async fn create_session(&self, input: &CreateSession) -> Result<UserSession, StoreError> {
        Ok(SessionRepo::create(&self.pool, input).await?)
    }

    async fn find_active_session(
        &self,
        token_hash: &str,
    ) -> Result<Option<UserSession>, StoreError> {
        Ok(SessionRepo::find_active_by_token_hash(&self.pool, token_hash).await?)
    }

    async fn revoke_session(&self, token_hash: &str) -> Result<bool, StoreError> {
        Ok(SessionRepo::revoke_by_token_hash(&self.pool, token_hash).await?)
    }

    async fn revoke_all_sessions(&self, user_id: DbId) -> Result<u64, StoreError> {
        Ok(SessionRepo::revoke_all_for_user(&self.pool, user_id).await?)
    }
}

#[async_trait]
impl ListStore for PgStore {
    async fn find_page(
        &self,
        collection: Collection,
        query: &ListQuery,
    ) -> Result<PageRows, StoreError> {
        let pool = &self.pool;
        let total = ListRepo::count(pool, collection, &query.conditions).await?;
        let rows = match collection {
            Collection::Bootcamps => to_values(
                &ListRepo::fetch_page::<Bootcamp>(pool, collection, bootcamp_repo::COLUMNS, query)
                    .await?,
            )?,
            Collection::Courses => to_values(
                &ListRepo::fetch_page::<Course>(pool, collection, course_repo::COLUMNS, query)
                    .await?,
            )?,
            Collection::Reviews => to_values(
                &ListRepo::fetch_page::<Review>(pool, collection, review_repo::COLUMNS, query)
                    .await?,
            )?,
            Collection::Users => user_values(
                &ListRepo::fetch_page::<User>(pool, collection, user_repo::COLUMNS, query).await?,
            )?,
        };
        Ok(PageRows {
            total: total.max(0) as u64,
            rows,
        })
    }

    async fn find_by_ids(
        &self,
        collection: Collection,
        ids: &[DbId],
    ) -> Result<Vec<Value>, StoreError> {
        let pool = &self.pool;
        match collection {
            Collection::Bootcamps => to_values(
                &ListRepo::fetch_by_ids::<Bootcamp>(pool, collection, bootcamp_repo::COLUMNS, ids)
                    .await?,
            ),
            Collection::Courses => to_values(
                &ListRepo::fetch_by_ids::<Course>(pool, collection, course_repo::COLUMNS, ids)
                    .await?,
            ),
            Collection::Reviews => to_values(
                &ListRepo::fetch_by_ids::<Review>(pool, collection, review_repo::COLUMNS, ids)
                    .await?,
            ),
            Collection::Users => user_values(
                &ListRepo::fetch_by_ids::<User>(pool, collection, user_repo::COLUMNS, ids).await?,
            ),
        }
    }
}

#[async_trait]
impl AggregateStore for PgStore {
    async fn child_values(
        &self,
        child: Collection,
        parent_ref: &'static FieldDef,
        source: &'static FieldDef,
        parent_id: DbId,
    ) -> Result<Vec<f64>, StoreError> {
        Ok(StatRepo::child_values(
            &self.pool,
            child.schema().table,
            parent_ref.column,
            source.column,
            parent_id,
        )
        .await?)
    }

    async fn parents_referenced_by(
        &self,
        child: Collection,
        parent_ref: &'static FieldDef,
        owner_ref: &'static FieldDef,
        owner_id: DbId,
    ) -> Result<Vec<DbId>, StoreError> {
        Ok(StatRepo::parents_referenced_by(
            &self.pool,
            child.schema().table,
            parent_ref.column,
            owner_ref.column,
            owner_id,
        )
        .await?)
    }

    async fn write_stat(
        &self,
        parent: Collection,
        parent_id: DbId,
        stat: StatField,
        value: Option<f64>,
    ) -> Result<bool, StoreError> {
        Ok(StatRepo::write(&self.pool, parent.schema().table, stat.column(), parent_id, value)
            .await?)
    }
}

#[async_trait]
impl StoreHealth for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(crate::health_check(&self.pool).await?)
    }
}
