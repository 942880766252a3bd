//! Route definitions for the `/bootcamps` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::{bootcamps, courses, reviews};
use crate::state::AppState;

/// Routes mounted at `/bootcamps`.
///
/// ```text
/// GET, POST          /               -> list_bootcamps, create_bootcamp
/// GET, PUT, DELETE   /{id}           -> get_bootcamp, update_bootcamp, delete_bootcamp
/// GET, POST          /{id}/courses   -> list_bootcamp_courses, create_course
/// GET, POST          /{id}/reviews   -> list_bootcamp_reviews, create_review
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(bootcamps::list_bootcamps).post(bootcamps::create_bootcamp),
        )
        .route(
            "/{id}",
            get(bootcamps::get_bootcamp)
                .put(bootcamps::update_bootcamp)
                .delete(bootcamps::delete_bootcamp),
        )
        .route(
            "/{id}/courses",
            get(courses::list_bootcamp_courses).post(courses::create_course),
        )
        .route(
            "/{id}/reviews",
            get(reviews::list_bootcamp_reviews).post(reviews::create_review),
        )
}
