//! In-process adapter for the storage ports.
//!
//! Mirrors the PostgreSQL schema's behavior: the same unique constraints
//! (reported under the same names), cascading deletes and list semantics.
//! List queries run over the wire-shaped JSON of each record, using the
//! evaluator in `devcamper_core::query`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use devcamper_core::aggregate::StatField;
use devcamper_core::query::eval::{compare_records, lookup};
use devcamper_core::query::{Collection, FieldDef, ListQuery};
use devcamper_core::types::DbId;
use devcamper_core::validation::DEFAULT_PHOTO;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{
    AggregateStore, BootcampStore, CourseStore, ListStore, PageRows, ReviewStore, SessionStore,
    StoreHealth, UserStore,
};
use crate::error::{StoreError, UQ_BOOTCAMP_NAME, UQ_REVIEW_PER_USER, UQ_USER_EMAIL};
use crate::models::bootcamp::{Bootcamp, CreateBootcamp, UpdateBootcamp};
use crate::models::course::{Course, CreateCourse, UpdateCourse};
use crate::models::review::{CreateReview, Review, UpdateReview};
use crate::models::session::{CreateSession, UserSession};
use crate::models::user::{CreateUser, ResetToken, UpdateUser, User, UserResponse};

#[derive(Debug, Default)]
struct Tables {
    last_id: DbId,
    users: BTreeMap<DbId, User>,
    sessions: Vec<UserSession>,
    bootcamps: BTreeMap<DbId, Bootcamp>,
    courses: BTreeMap<DbId, Course>,
    reviews: BTreeMap<DbId, Review>,
}

impl Tables {
    /// Ids are unique across all tables, like a shared sequence.
    fn next_id(&mut self) -> DbId {
        self.last_id += 1;
        self.last_id
    }

    fn records(&self, collection: Collection) -> Result<Vec<Value>, StoreError> {
        match collection {
            Collection::Bootcamps => to_values(self.bootcamps.values()),
            Collection::Courses => to_values(self.courses.values()),
            Collection::Reviews => to_values(self.reviews.values()),
            Collection::Users => to_values(self.users.values().map(UserResponse::from)),
        }
    }

    fn remove_bootcamp(&mut self, id: DbId) -> bool {
        if self.bootcamps.remove(&id).is_none() {
            return false;
        }
        self.courses.retain(|_, c| c.bootcamp_id != id);
        self.reviews.retain(|_, r| r.bootcamp_id != id);
        true
    }

    fn email_taken(&self, email: &str, except: Option<DbId>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }

    fn require_bootcamp(&self, id: DbId) -> Result<(), StoreError> {
        if self.bootcamps.contains_key(&id) {
            Ok(())
        } else {
            Err(StoreError::Internal(format!(
                "bootcamp {id} does not exist"
            )))
        }
    }
}

fn to_values<T: Serialize>(rows: impl IntoIterator<Item = T>) -> Result<Vec<Value>, StoreError> {
    rows.into_iter()
        .map(|row| serde_json::to_value(row).map_err(StoreError::from))
        .collect()
}

fn duplicate(constraint: &str) -> StoreError {
    StoreError::Duplicate(constraint.to_string())
}

/// Store that keeps every table in memory behind an async lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BootcampStore for MemoryStore {
    async fn create_bootcamp(&self, input: &CreateBootcamp) -> Result<Bootcamp, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.bootcamps.values().any(|b| b.name == input.name) {
            return Err(duplicate(UQ_BOOTCAMP_NAME));
        }
        let id = tables.next_id();
        let bootcamp = Bootcamp {
            id,
            name: input.name.clone(),
            slug: input.slug.clone(),
            description: input.description.clone(),
            website: input.website.clone(),
            phone: input.phone.clone(),
            email: input.email.clone(),
            address: input.address.clone(),
            location: input.location.clone(),
            careers: input.careers.clone(),
            average_rating: None,
            average_cost: None,
            photo: DEFAULT_PHOTO.to_string(),
            housing: input.housing,
            job_assistance: input.job_assistance,
            job_guarantee: input.job_guarantee,
            accept_gi: input.accept_gi,
            user_id: input.user_id,
            created_at: Utc::now(),
        };
        tables.bootcamps.insert(id, bootcamp.clone());
        Ok(bootcamp)
    }

    async fn find_bootcamp(&self, id: DbId) -> Result<Option<Bootcamp>, StoreError> {
        Ok(self.tables.read().await.bootcamps.get(&id).cloned())
    }

    async fn count_bootcamps_by_owner(&self, user_id: DbId) -> Result<u64, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .bootcamps
            .values()
            .filter(|b| b.user_id == user_id)
            .count() as u64)
    }

    async fn update_bootcamp(
        &self,
        id: DbId,
        input: &UpdateBootcamp,
    ) -> Result<Option<Bootcamp>, StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(name) = &input.name {
            if tables
                .bootcamps
                .values()
                .any(|b| &b.name == name && b.id != id)
            {
                return Err(duplicate(UQ_BOOTCAMP_NAME));
            }
        }
        let Some(bootcamp) = tables.bootcamps.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(v) = &input.name {
            bootcamp.name = v.clone();
        }
        if let Some(v) = &input.slug {
            bootcamp.slug = v.clone();
        }
        if let Some(v) = &input.description {
            bootcamp.description = v.clone();
        }
        if let Some(v) = &input.website {
            bootcamp.website = Some(v.clone());
        }
        if let Some(v) = &input.phone {
            bootcamp.phone = Some(v.clone());
        }
        if let Some(v) = &input.email {
            bootcamp.email = Some(v.clone());
        }
        if let Some(v) = &input.address {
            bootcamp.address = v.clone();
        }
        if let Some(v) = &input.location {
            bootcamp.location = v.clone();
        }
        if let Some(v) = &input.careers {
            bootcamp.careers = v.clone();
        }
        if let Some(v) = input.housing {
            bootcamp.housing = v;
        }
        if let Some(v) = input.job_assistance {
            bootcamp.job_assistance = v;
        }
        if let Some(v) = input.job_guarantee {
            bootcamp.job_guarantee = v;
        }
        if let Some(v) = input.accept_gi {
            bootcamp.accept_gi = v;
        }
        Ok(Some(bootcamp.clone()))
    }

    async fn delete_bootcamp(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(self.tables.write().await.remove_bootcamp(id))
    }
}

#[async_trait]
impl CourseStore for MemoryStore {
    async fn create_course(&self, input: &CreateCourse) -> Result<Course, StoreError> {
        let mut tables = self.tables.write().await;
        tables.require_bootcamp(input.bootcamp_id)?;
        let id = tables.next_id();
        let course = Course {
            id,
            title: input.title.clone(),
            description: input.description.clone(),
            weeks: input.weeks.clone(),
            tuition: input.tuition,
            minimum_skill: input.minimum_skill.clone(),
            scholarship_available: input.scholarship_available,
            bootcamp_id: input.bootcamp_id,
            user_id: input.user_id,
            created_at: Utc::now(),
        };
        tables.courses.insert(id, course.clone());
        Ok(course)
    }

    async fn find_course(&self, id: DbId) -> Result<Option<Course>, StoreError> {
        Ok(self.tables.read().await.courses.get(&id).cloned())
    }

    async fn update_course(
        &self,
        id: DbId,
        input: &UpdateCourse,
    ) -> Result<Option<Course>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(course) = tables.courses.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(v) = &input.title {
            course.title = v.clone();
        }
        if let Some(v) = &input.description {
            course.description = v.clone();
        }
        if let Some(v) = &input.weeks {
            course.weeks = v.clone();
        }
        if let Some(v) = input.tuition {
            course.tuition = v;
        }
        if let Some(v) = &input.minimum_skill {
            course.minimum_skill = v.clone();
        }
        if let Some(v) = input.scholarship_available {
            course.scholarship_available = v;
        }
        Ok(Some(course.clone()))
    }

    async fn delete_course(&self, id: DbId) -> Result<Option<Course>, StoreError> {
        Ok(self.tables.write().await.courses.remove(&id))
    }
}

#[async_trait]
impl ReviewStore for MemoryStore {
    async fn create_review(&self, input: &CreateReview) -> Result<Review, StoreError> {
        let mut tables = self.tables.write().await;
        tables.require_bootcamp(input.bootcamp_id)?;
        if tables
            .reviews
            .values()
            .any(|r| r.bootcamp_id == input.bootcamp_id && r.user_id == input.user_id)
        {
            return Err(duplicate(UQ_REVIEW_PER_USER));
        }
        let id = tables.next_id();
        let review = Review {
            id,
            title: input.title.clone(),
            text: input.text.clone(),
            rating: input.rating,
            bootcamp_id: input.bootcamp_id,
            user_id: input.user_id,
            created_at: Utc::now(),
        };
        tables.reviews.insert(id, review.clone());
        Ok(review)
    }

    async fn find_review(&self, id: DbId) -> Result<Option<Review>, StoreError> {
        Ok(self.tables.read().await.reviews.get(&id).cloned())
    }

    async fn update_review(
        &self,
        id: DbId,
        input: &UpdateReview,
    ) -> Result<Option<Review>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(review) = tables.reviews.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(v) = &input.title {
            review.title = v.clone();
        }
        if let Some(v) = &input.text {
            review.text = v.clone();
        }
        if let Some(v) = input.rating {
            review.rating = v;
        }
        Ok(Some(review.clone()))
    }

    async fn delete_review(&self, id: DbId) -> Result<Option<Review>, StoreError> {
        Ok(self.tables.write().await.reviews.remove(&id))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, input: &CreateUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.email_taken(&input.email, None) {
            return Err(duplicate(UQ_USER_EMAIL));
        }
        let id = tables.next_id();
        let user = User {
            id,
            name: input.name.clone(),
            email: input.email.clone(),
            role: input.role.clone(),
            password_hash: input.password_hash.clone(),
            reset_password_token: None,
            reset_password_expire: None,
            created_at: Utc::now(),
        };
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: DbId) -> Result<Option<User>, StoreError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_reset_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<User>, StoreError> {
        let now = Utc::now();
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| {
                u.reset_password_token.as_deref() == Some(token_hash)
                    && u.reset_password_expire.is_some_and(|expire| expire > now)
            })
            .cloned())
    }

    async fn update_user(&self, id: DbId, input: &UpdateUser) -> Result<Option<User>, StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(email) = &input.email {
            if tables.email_taken(email, Some(id)) {
                return Err(duplicate(UQ_USER_EMAIL));
            }
        }
        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(v) = &input.name {
            user.name = v.clone();
        }
        if let Some(v) = &input.email {
            user.email = v.clone();
        }
        if let Some(v) = &input.role {
            user.role = v.clone();
        }
        Ok(Some(user.clone()))
    }

    async fn set_password(&self, id: DbId, password_hash: &str) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(false);
        };
        user.password_hash = password_hash.to_string();
        user.reset_password_token = None;
        user.reset_password_expire = None;
        Ok(true)
    }

    async fn set_reset_token(
        &self,
        id: DbId,
        token: Option<&ResetToken>,
    ) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(false);
        };
        user.reset_password_token = token.map(|t| t.token_hash.clone());
        user.reset_password_expire = token.map(|t| t.expires_at);
        Ok(true)
    }

    async fn delete_user(&self, id: DbId) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }
        let owned: Vec<DbId> = tables
            .bootcamps
            .values()
            .filter(|b| b.user_id == id)
            .map(|b| b.id)
            .collect();
        for bootcamp_id in owned {
            tables.remove_bootcamp(bootcamp_id);
        }
        tables.courses.retain(|_, c| c.user_id != id);
        tables.reviews.retain(|_, r| r.user_id != id);
        tables.sessions.retain(|s| s.user_id != id);
        Ok(true)
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn create_session(&self, input: &CreateSession) -> Result<UserSession, StoreError> {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        let session = UserSession {
            id,
            user_id: input.user_id,
            token_hash: input.token_hash.clone(),
            expires_at: input.expires_at,
            is_revoked: false,
            created_at: Utc::now(),
        };
        tables.sessions.push(session.clone());
        Ok(session)
    }

    async fn find_active_session(
        &self,
        token_hash: &str,
    ) -> Result<Option<UserSession>, StoreError> {
        let now = Utc::now();
        let tables = self.tables.read().await;
        Ok(tables
            .sessions
            .iter()
            .find(|s| s.token_hash == token_hash && !s.is_revoked && s.expires_at > now)
            .cloned())
    }

    async fn revoke_session(&self, token_hash: &str) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let mut revoked = false;
        for session in tables
            .sessions
            .iter_mut()
            .filter(|s| s.token_hash == token_hash && !s.is_revoked)
        {
            session.is_revoked = true;
            revoked = true;
        }
        Ok(revoked)
    }

    async fn revoke_all_sessions(&self, user_id: DbId) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        let mut count = 0;
        for session in tables
            .sessions
            .iter_mut()
            .filter(|s| s.user_id == user_id && !s.is_revoked)
        {
            session.is_revoked = true;
            count += 1;
        }
        Ok(count)
    }
}

#[async_trait]
impl ListStore for MemoryStore {
    async fn find_page(
        &self,
        collection: Collection,
        query: &ListQuery,
    ) -> Result<PageRows, StoreError> {
        let mut matching: Vec<Value> = self
            .tables
            .read()
            .await
            .records(collection)?
            .into_iter()
            .filter(|record| query.matches(record))
            .collect();
        matching.sort_by(|a, b| compare_records(&query.sort, a, b));

        let total = matching.len() as u64;
        let skip = usize::try_from(query.skip()).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);
        let rows = matching.into_iter().skip(skip).take(limit).collect();
        Ok(PageRows { total, rows })
    }

    async fn find_by_ids(
        &self,
        collection: Collection,
        ids: &[DbId],
    ) -> Result<Vec<Value>, StoreError> {
        let records = self.tables.read().await.records(collection)?;
        Ok(records
            .into_iter()
            .filter(|r| r.get("id").and_then(Value::as_i64).is_some_and(|id| ids.contains(&id)))
            .collect())
    }
}

fn reference_of(record: &Value, field: &FieldDef) -> Option<DbId> {
    lookup(record, field.name).and_then(Value::as_i64)
}

#[async_trait]
impl AggregateStore for MemoryStore {
    async fn child_values(
        &self,
        child: Collection,
        parent_ref: &'static FieldDef,
        source: &'static FieldDef,
        parent_id: DbId,
    ) -> Result<Vec<f64>, StoreError> {
        let records = self.tables.read().await.records(child)?;
        Ok(records
            .iter()
            .filter(|r| reference_of(r, parent_ref) == Some(parent_id))
            .filter_map(|r| lookup(r, source.name).and_then(Value::as_f64))
            .collect())
    }

    async fn parents_referenced_by(
        &self,
        child: Collection,
        parent_ref: &'static FieldDef,
        owner_ref: &'static FieldDef,
        owner_id: DbId,
    ) -> Result<Vec<DbId>, StoreError> {
        let records = self.tables.read().await.records(child)?;
        let mut parents: Vec<DbId> = records
            .iter()
            .filter(|r| reference_of(r, owner_ref) == Some(owner_id))
            .filter_map(|r| reference_of(r, parent_ref))
            .collect();
        parents.sort_unstable();
        parents.dedup();
        Ok(parents)
    }

    async fn write_stat(
        &self,
        parent: Collection,
        parent_id: DbId,
        stat: StatField,
        value: Option<f64>,
    ) -> Result<bool, StoreError> {
        if parent != Collection::Bootcamps {
            return Err(StoreError::Internal(format!(
                "{} records carry no derived statistics",
                parent.entity()
            )));
        }
        let mut tables = self.tables.write().await;
        let Some(bootcamp) = tables.bootcamps.get_mut(&parent_id) else {
            return Ok(false);
        };
        match stat {
            StatField::AverageCost => bootcamp.average_cost = value,
            StatField::AverageRating => bootcamp.average_rating = value,
        }
        Ok(true)
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
