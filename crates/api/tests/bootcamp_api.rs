//! HTTP-level integration tests for `/bootcamps`, `/courses` and `/reviews`
//! listing, ownership rules and identifier handling.

mod common;

use axum::http::StatusCode;
use common::{body_json, bootcamp_body, build_test_app, course_body};
use serde_json::{json, Value};

fn names(json: &Value) -> Vec<String> {
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["name"].as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Creation and ownership
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_requires_publisher_or_admin() {
    let app = build_test_app();

    let response = app.post_json("/api/v1/bootcamps", bootcamp_body("Devworks")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let user = app.register("user@example.com", "user").await;
    let response = app
        .post_json_auth("/api/v1/bootcamps", &user, bootcamp_body("Devworks"))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn create_assigns_owner_slug_and_defaults() {
    let app = build_test_app();
    let publisher = app.register("pub@example.com", "publisher").await;

    let response = app
        .post_json_auth("/api/v1/bootcamps", &publisher, bootcamp_body("Devworks Bootcamp"))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["slug"], "devworks-bootcamp");
    assert_eq!(data["photo"], "no-photo.jpg");
    assert!(data["averageCost"].is_null());
    assert!(data["averageRating"].is_null());
    assert!(data["user"].is_i64());
}

#[tokio::test]
async fn client_cannot_write_derived_statistics() {
    let app = build_test_app();
    let publisher = app.register("pub@example.com", "publisher").await;

    let mut body = bootcamp_body("Devworks");
    body["averageCost"] = json!(5);
    body["averageRating"] = json!(9);
    let response = app.post_json_auth("/api/v1/bootcamps", &publisher, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["data"]["averageCost"].is_null());
    assert!(json["data"]["averageRating"].is_null());
}

#[tokio::test]
async fn publisher_may_own_only_one_bootcamp_but_admin_many() {
    let app = build_test_app();
    let publisher = app.register("pub@example.com", "publisher").await;
    app.create_bootcamp(&publisher, "First Camp").await;

    let response = app
        .post_json_auth("/api/v1/bootcamps", &publisher, bootcamp_body("Second Camp"))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "LIMIT_REACHED");
    assert!(json["error"].as_str().unwrap().contains("already published"));

    let admin = app.admin_token("admin@example.com").await;
    app.create_bootcamp(&admin, "Admin Camp One").await;
    app.create_bootcamp(&admin, "Admin Camp Two").await;
}

#[tokio::test]
async fn duplicate_name_is_a_400() {
    let app = build_test_app();
    let admin = app.admin_token("admin@example.com").await;
    app.create_bootcamp(&admin, "Devworks").await;

    let response = app
        .post_json_auth("/api/v1/bootcamps", &admin, bootcamp_body("Devworks"))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_bootcamp_lists_all_violations() {
    let app = build_test_app();
    let publisher = app.register("pub@example.com", "publisher").await;

    let response = app
        .post_json_auth(
            "/api/v1/bootcamps",
            &publisher,
            json!({ "website": "ftp://nope", "careers": ["Basket Weaving"] }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let message = body_json(response).await["error"].as_str().unwrap().to_string();
    for expected in [
        "Please add a name",
        "Please add a description",
        "Please add an address",
        "valid URL",
    ] {
        assert!(message.contains(expected), "missing '{expected}' in '{message}'");
    }
}

#[tokio::test]
async fn only_owner_or_admin_may_update_and_delete() {
    let app = build_test_app();
    let owner = app.register("owner@example.com", "publisher").await;
    let other = app.register("other@example.com", "publisher").await;
    let admin = app.admin_token("admin@example.com").await;
    let id = app.create_bootcamp(&owner, "Devworks").await;
    let uri = format!("/api/v1/bootcamps/{id}");

    let response = app
        .put_json_auth(&uri, &other, json!({ "description": "hijacked" }))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(app.delete_auth(&uri, &other).await.status(), StatusCode::FORBIDDEN);

    let response = app
        .put_json_auth(&uri, &owner, json!({ "name": "Devworks Reloaded" }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Devworks Reloaded");
    assert_eq!(json["data"]["slug"], "devworks-reloaded");
    assert_eq!(json["data"]["description"], "Devworks teaches full stack development");

    assert_eq!(app.delete_auth(&uri, &admin).await.status(), StatusCode::OK);
    assert_eq!(app.get(&uri).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_a_bootcamp_removes_its_courses() {
    let app = build_test_app();
    let owner = app.register("owner@example.com", "publisher").await;
    let id = app.create_bootcamp(&owner, "Devworks").await;
    let course_id = app.create_course(&owner, id, 1000.0).await;

    app.delete_auth(&format!("/api/v1/bootcamps/{id}"), &owner).await;

    let response = app.get(&format!("/api/v1/courses/{course_id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn malformed_id_is_404_resource_not_found() {
    let app = build_test_app();
    let response = app.get("/api/v1/bootcamps/5d713995b721c3bb38c1f5d0").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Resource not found");
}

#[tokio::test]
async fn missing_id_names_the_entity() {
    let app = build_test_app();
    let response = app.get("/api/v1/bootcamps/999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["error"],
        "Bootcamp not found with id of 999"
    );
}

// ---------------------------------------------------------------------------
// Advanced results
// ---------------------------------------------------------------------------

#[tokio::test]
async fn select_sort_and_page_over_five_records() {
    let app = build_test_app();
    let admin = app.admin_token("admin@example.com").await;
    for name in ["Bravo", "Echo", "Alpha", "Delta", "Charlie"] {
        app.create_bootcamp(&admin, name).await;
    }

    let response = app
        .get("/api/v1/bootcamps?select=name,description&sort=-name&page=2&limit=2")
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    assert_eq!(json["success"], true);
    assert_eq!(json["count"], 2);
    assert_eq!(names(&json), vec!["Charlie", "Bravo"]);
    for record in json["data"].as_array().unwrap() {
        let mut keys: Vec<&str> = record.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["description", "id", "name"]);
    }
    assert_eq!(json["pagination"]["next"], json!({ "page": 3, "limit": 2 }));
    assert_eq!(json["pagination"]["prev"], json!({ "page": 1, "limit": 2 }));
}

#[tokio::test]
async fn defaults_return_everything_oldest_first_without_links() {
    let app = build_test_app();
    let admin = app.admin_token("admin@example.com").await;
    for name in ["Bravo", "Alpha", "Charlie"] {
        app.create_bootcamp(&admin, name).await;
    }

    let json = body_json(app.get("/api/v1/bootcamps?page=abc&limit=xyz").await).await;
    assert_eq!(json["count"], 3);
    assert_eq!(names(&json), vec!["Bravo", "Alpha", "Charlie"]);
    assert_eq!(json["pagination"], json!({}));
}

#[tokio::test]
async fn gte_filter_on_average_cost() {
    let app = build_test_app();
    let admin = app.admin_token("admin@example.com").await;
    let pricey = app.create_bootcamp(&admin, "Pricey").await;
    let cheap = app.create_bootcamp(&admin, "Cheap").await;
    app.create_bootcamp(&admin, "Unpriced").await;
    app.create_course(&admin, pricey, 12000.0).await;
    app.create_course(&admin, cheap, 5000.0).await;

    let json = body_json(app.get("/api/v1/bootcamps?averageCost%5Bgte%5D=8000").await).await;
    assert_eq!(names(&json), vec!["Pricey"]);

    let json = body_json(app.get("/api/v1/bootcamps?averageCost%5Blt%5D=8000").await).await;
    assert_eq!(names(&json), vec!["Cheap"]);
}

#[tokio::test]
async fn in_filter_on_careers() {
    let app = build_test_app();
    let admin = app.admin_token("admin@example.com").await;
    for (name, careers) in [
        ("Web Camp", json!(["Web Development"])),
        ("Data Camp", json!(["Data Science", "Business"])),
        ("Biz Camp", json!(["Business"])),
    ] {
        let mut body = bootcamp_body(name);
        body["careers"] = careers;
        let response = app.post_json_auth("/api/v1/bootcamps", &admin, body).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let json = body_json(
        app.get("/api/v1/bootcamps?careers%5Bin%5D=Business,Web%20Development&sort=name")
            .await,
    )
    .await;
    assert_eq!(names(&json), vec!["Biz Camp", "Data Camp", "Web Camp"]);

    let json = body_json(app.get("/api/v1/bootcamps?careers=Data%20Science").await).await;
    assert_eq!(names(&json), vec!["Data Camp"]);
}

#[tokio::test]
async fn unknown_filter_field_is_a_400() {
    let app = build_test_app();
    let response = app.get("/api/v1/bootcamps?colour=red").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["success"], false);

    let response = app.get("/api/v1/bootcamps?averageCost%5Bgte%5D=cheap").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn courses_embed_bootcamp_summary() {
    let app = build_test_app();
    let admin = app.admin_token("admin@example.com").await;
    let id = app.create_bootcamp(&admin, "Devworks").await;
    let course_id = app.create_course(&admin, id, 1000.0).await;

    let json = body_json(app.get("/api/v1/courses").await).await;
    assert_eq!(json["count"], 1);
    let bootcamp = &json["data"][0]["bootcamp"];
    assert_eq!(bootcamp["id"], id);
    assert_eq!(bootcamp["name"], "Devworks");
    assert!(bootcamp["description"].is_string());
    assert!(bootcamp.get("careers").is_none());

    let json = body_json(app.get(&format!("/api/v1/courses/{course_id}")).await).await;
    assert_eq!(json["data"]["bootcamp"]["name"], "Devworks");
}

#[tokio::test]
async fn scoped_course_list_only_shows_that_bootcamp() {
    let app = build_test_app();
    let admin = app.admin_token("admin@example.com").await;
    let first = app.create_bootcamp(&admin, "First").await;
    let second = app.create_bootcamp(&admin, "Second").await;
    app.create_course(&admin, first, 100.0).await;
    app.create_course(&admin, first, 200.0).await;
    app.create_course(&admin, second, 300.0).await;

    let json = body_json(app.get(&format!("/api/v1/bootcamps/{first}/courses")).await).await;
    assert_eq!(json["count"], 2);
    for course in json["data"].as_array().unwrap() {
        assert_eq!(course["bootcamp"], first);
    }

    let response = app.get("/api/v1/bootcamps/999/courses").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn course_requires_bootcamp_owner() {
    let app = build_test_app();
    let owner = app.register("owner@example.com", "publisher").await;
    let other = app.register("other@example.com", "publisher").await;
    let id = app.create_bootcamp(&owner, "Devworks").await;

    let response = app
        .post_json_auth(
            &format!("/api/v1/bootcamps/{id}/courses"),
            &other,
            course_body("Intruder", 100.0),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn users_list_is_admin_only_and_hides_credentials() {
    let app = build_test_app();
    let user = app.register("user@example.com", "user").await;
    let admin = app.admin_token("admin@example.com").await;

    assert_eq!(
        app.get_auth("/api/v1/users", &user).await.status(),
        StatusCode::FORBIDDEN
    );

    let json = body_json(app.get_auth("/api/v1/users?sort=email", &admin).await).await;
    assert_eq!(json["count"], 2);
    assert_eq!(json["data"][0]["email"], "admin@example.com");
    for record in json["data"].as_array().unwrap() {
        assert!(record.get("passwordHash").is_none());
        assert!(record.get("resetPasswordToken").is_none());
    }

    let response = app.get_auth("/api/v1/users?password=x", &admin).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
