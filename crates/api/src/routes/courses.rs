//! Route definitions for the `/courses` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::courses;
use crate::state::AppState;

/// Routes mounted at `/courses`.
///
/// ```text
/// GET                /       -> list_courses
/// GET, PUT, DELETE   /{id}   -> get_course, update_course, delete_course
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(courses::list_courses))
        .route(
            "/{id}",
            get(courses::get_course)
                .put(courses::update_course)
                .delete(courses::delete_course),
        )
}
