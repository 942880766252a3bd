//! Behavior of the in-memory adapter that the API tests rely on.

mod common;

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use devcamper_db::error::{UQ_BOOTCAMP_NAME, UQ_REVIEW_PER_USER, UQ_USER_EMAIL};
use devcamper_db::models::bootcamp::UpdateBootcamp;
use devcamper_db::models::session::CreateSession;
use devcamper_db::models::user::ResetToken;
use devcamper_db::store::{
    BootcampStore, CourseStore, MemoryStore, ReviewStore, SessionStore, UserStore,
};
use devcamper_db::StoreError;

use common::*;

#[tokio::test]
async fn bootcamp_names_are_unique() {
    let store = MemoryStore::new();
    let owner = seed_user(&store, "owner@example.com", "publisher").await;
    seed_bootcamp(&store, "Devworks", owner.id, &["UI/UX"]).await;

    let err = store
        .create_bootcamp(&new_bootcamp("Devworks", owner.id, &["UI/UX"], "Boston"))
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::Duplicate(c) if c == UQ_BOOTCAMP_NAME);
}

#[tokio::test]
async fn renaming_onto_another_bootcamp_is_a_duplicate() {
    let store = MemoryStore::new();
    let owner = seed_user(&store, "owner@example.com", "admin").await;
    seed_bootcamp(&store, "Devworks", owner.id, &["UI/UX"]).await;
    let other = seed_bootcamp(&store, "ModernTech", owner.id, &["Business"]).await;

    let update = UpdateBootcamp {
        name: Some("Devworks".into()),
        ..Default::default()
    };
    let err = store.update_bootcamp(other.id, &update).await.unwrap_err();
    assert_matches!(err, StoreError::Duplicate(_));
}

#[tokio::test]
async fn new_bootcamps_start_without_statistics() {
    let store = MemoryStore::new();
    let owner = seed_user(&store, "owner@example.com", "publisher").await;
    let bootcamp = seed_bootcamp(&store, "Devworks", owner.id, &["UI/UX"]).await;

    assert_eq!(bootcamp.average_cost, None);
    assert_eq!(bootcamp.average_rating, None);
    assert_eq!(bootcamp.photo, "no-photo.jpg");
    assert_eq!(bootcamp.slug, "devworks");
}

#[tokio::test]
async fn deleting_a_bootcamp_cascades_to_children() {
    let store = MemoryStore::new();
    let owner = seed_user(&store, "owner@example.com", "publisher").await;
    let reviewer = seed_user(&store, "reviewer@example.com", "user").await;
    let bootcamp = seed_bootcamp(&store, "Devworks", owner.id, &["UI/UX"]).await;
    let course = seed_course(&store, bootcamp.id, owner.id, 1000.0).await;
    let review = seed_review(&store, bootcamp.id, reviewer.id, 8).await;

    assert!(store.delete_bootcamp(bootcamp.id).await.unwrap());
    assert!(store.find_course(course.id).await.unwrap().is_none());
    assert!(store.find_review(review.id).await.unwrap().is_none());
    assert!(!store.delete_bootcamp(bootcamp.id).await.unwrap());
}

#[tokio::test]
async fn one_review_per_user_per_bootcamp() {
    let store = MemoryStore::new();
    let owner = seed_user(&store, "owner@example.com", "publisher").await;
    let reviewer = seed_user(&store, "reviewer@example.com", "user").await;
    let bootcamp = seed_bootcamp(&store, "Devworks", owner.id, &["UI/UX"]).await;
    seed_review(&store, bootcamp.id, reviewer.id, 8).await;

    let err = store
        .create_review(&devcamper_db::models::review::CreateReview {
            title: "Again".into(),
            text: "Second opinion".into(),
            rating: 3,
            bootcamp_id: bootcamp.id,
            user_id: reviewer.id,
        })
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::Duplicate(c) if c == UQ_REVIEW_PER_USER);
}

#[tokio::test]
async fn emails_are_unique() {
    let store = MemoryStore::new();
    seed_user(&store, "jane@example.com", "user").await;
    let err = store
        .create_user(&devcamper_db::models::user::CreateUser {
            name: "Other Jane".into(),
            email: "jane@example.com".into(),
            role: "user".into(),
            password_hash: "x".into(),
        })
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::Duplicate(c) if c == UQ_USER_EMAIL);
}

#[tokio::test]
async fn deleting_a_user_removes_everything_they_own() {
    let store = MemoryStore::new();
    let owner = seed_user(&store, "owner@example.com", "publisher").await;
    let reviewer = seed_user(&store, "reviewer@example.com", "user").await;
    let theirs = seed_bootcamp(&store, "Devworks", owner.id, &["UI/UX"]).await;
    let other_owner = seed_user(&store, "other@example.com", "publisher").await;
    let other = seed_bootcamp(&store, "ModernTech", other_owner.id, &["Business"]).await;
    let review = seed_review(&store, other.id, owner.id, 9).await;
    seed_review(&store, theirs.id, reviewer.id, 4).await;

    assert!(store.delete_user(owner.id).await.unwrap());
    assert!(store.find_bootcamp(theirs.id).await.unwrap().is_none());
    assert!(store.find_review(review.id).await.unwrap().is_none());
    assert!(store.find_bootcamp(other.id).await.unwrap().is_some());
}

#[tokio::test]
async fn sessions_revoke_individually_and_in_bulk() {
    let store = MemoryStore::new();
    let user = seed_user(&store, "jane@example.com", "user").await;
    let expires_at = Utc::now() + Duration::hours(1);
    for hash in ["a", "b", "c"] {
        store
            .create_session(&CreateSession {
                user_id: user.id,
                token_hash: hash.into(),
                expires_at,
            })
            .await
            .unwrap();
    }

    assert!(store.revoke_session("a").await.unwrap());
    assert!(!store.revoke_session("a").await.unwrap());
    assert!(store.find_active_session("a").await.unwrap().is_none());
    assert!(store.find_active_session("b").await.unwrap().is_some());

    assert_eq!(store.revoke_all_sessions(user.id).await.unwrap(), 2);
    assert!(store.find_active_session("c").await.unwrap().is_none());
}

#[tokio::test]
async fn expired_sessions_are_not_active() {
    let store = MemoryStore::new();
    let user = seed_user(&store, "jane@example.com", "user").await;
    store
        .create_session(&CreateSession {
            user_id: user.id,
            token_hash: "old".into(),
            expires_at: Utc::now() - Duration::minutes(1),
        })
        .await
        .unwrap();
    assert!(store.find_active_session("old").await.unwrap().is_none());
}

#[tokio::test]
async fn reset_tokens_expire_and_clear_on_password_change() {
    let store = MemoryStore::new();
    let user = seed_user(&store, "jane@example.com", "user").await;

    let stale = ResetToken {
        token_hash: "stale".into(),
        expires_at: Utc::now() - Duration::minutes(1),
    };
    store.set_reset_token(user.id, Some(&stale)).await.unwrap();
    assert!(store.find_user_by_reset_token("stale").await.unwrap().is_none());

    let fresh = ResetToken {
        token_hash: "fresh".into(),
        expires_at: Utc::now() + Duration::minutes(10),
    };
    store.set_reset_token(user.id, Some(&fresh)).await.unwrap();
    let found = store.find_user_by_reset_token("fresh").await.unwrap();
    assert_eq!(found.map(|u| u.id), Some(user.id));

    assert!(store.set_password(user.id, "new-hash").await.unwrap());
    assert!(store.find_user_by_reset_token("fresh").await.unwrap().is_none());
}
