//! Route definitions for the `/auth` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /register               -> register
/// POST /login                  -> login
/// GET  /logout                 -> logout (requires auth)
/// GET  /logoutall              -> logout_all (requires auth)
/// GET  /me                     -> me (requires auth)
/// PUT  /updatedetails          -> update_details (requires auth)
/// PUT  /updatepassword         -> update_password (requires auth)
/// POST /forgotpassword         -> forgot_password
/// PUT  /resetpassword/{token}  -> reset_password
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/logoutall", get(auth::logout_all))
        .route("/me", get(auth::me))
        .route("/updatedetails", put(auth::update_details))
        .route("/updatepassword", put(auth::update_password))
        .route("/forgotpassword", post(auth::forgot_password))
        .route("/resetpassword/{token}", put(auth::reset_password))
}
