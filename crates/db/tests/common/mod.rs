//! Seeding helpers shared by the store test suites.

#![allow(dead_code)]

use devcamper_core::query::{Collection, DefaultOrder, ListQuery};
use devcamper_core::types::DbId;
use devcamper_db::models::bootcamp::{Bootcamp, CreateBootcamp, Location};
use devcamper_db::models::course::{Course, CreateCourse};
use devcamper_db::models::review::{CreateReview, Review};
use devcamper_db::models::user::{CreateUser, User};
use devcamper_db::store::Store;

pub async fn seed_user<S: Store + ?Sized>(store: &S, email: &str, role: &str) -> User {
    store
        .create_user(&CreateUser {
            name: email.split('@').next().unwrap_or("user").to_string(),
            email: email.to_string(),
            role: role.to_string(),
            password_hash: "not-a-real-hash".to_string(),
        })
        .await
        .expect("seed user")
}

pub fn new_bootcamp(name: &str, user_id: DbId, careers: &[&str], city: &str) -> CreateBootcamp {
    CreateBootcamp {
        name: name.to_string(),
        slug: devcamper_core::naming::generate_slug(name),
        description: format!("{name} description"),
        website: None,
        phone: None,
        email: None,
        address: format!("1 Main St, {city}"),
        location: Location {
            city: Some(city.to_string()),
            ..Default::default()
        },
        careers: careers.iter().map(|c| c.to_string()).collect(),
        housing: false,
        job_assistance: false,
        job_guarantee: false,
        accept_gi: false,
        user_id,
    }
}

pub async fn seed_bootcamp<S: Store + ?Sized>(
    store: &S,
    name: &str,
    user_id: DbId,
    careers: &[&str],
) -> Bootcamp {
    store
        .create_bootcamp(&new_bootcamp(name, user_id, careers, "Boston"))
        .await
        .expect("seed bootcamp")
}

pub async fn seed_course<S: Store + ?Sized>(
    store: &S,
    bootcamp_id: DbId,
    user_id: DbId,
    tuition: f64,
) -> Course {
    store
        .create_course(&CreateCourse {
            title: format!("Course costing {tuition}"),
            description: "A course".to_string(),
            weeks: "8".to_string(),
            tuition,
            minimum_skill: "beginner".to_string(),
            scholarship_available: false,
            bootcamp_id,
            user_id,
        })
        .await
        .expect("seed course")
}

pub async fn seed_review<S: Store + ?Sized>(
    store: &S,
    bootcamp_id: DbId,
    user_id: DbId,
    rating: i32,
) -> Review {
    store
        .create_review(&CreateReview {
            title: format!("Rated {rating}"),
            text: "Review text".to_string(),
            rating,
            bootcamp_id,
            user_id,
        })
        .await
        .expect("seed review")
}

/// Parse raw query pairs the way the list endpoints do.
pub fn list_query(collection: Collection, raw: &[(&str, &str)]) -> ListQuery {
    let pairs: Vec<(String, String)> = raw
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    ListQuery::parse(collection.schema(), &pairs, DefaultOrder::OldestFirst)
        .expect("valid list query")
}
