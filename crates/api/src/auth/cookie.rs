//! The `token` cookie carrying the access token for browser clients.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use ::cookie::time::Duration;

/// Name of the cookie carrying the access token.
pub const TOKEN_COOKIE: &str = "token";

/// Value written on logout; never accepted as a token.
const CLEARED_VALUE: &str = "none";

/// Seconds a cleared cookie lingers before the browser drops it.
const CLEARED_MAX_AGE_SECS: i64 = 10;

/// Build the `HttpOnly` token cookie. Every variant goes through here so
/// login and logout always agree on path and flags.
pub fn token_cookie(value: &str, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, value.to_owned()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::seconds(max_age_secs))
        .build()
}

/// The cookie set on logout, overwriting any live token.
pub fn cleared_token_cookie(secure: bool) -> Cookie<'static> {
    token_cookie(CLEARED_VALUE, CLEARED_MAX_AGE_SECS, secure)
}

/// The token carried by the request's cookies, if any.
pub fn token_from_jar(jar: &CookieJar) -> Option<String> {
    jar.get(TOKEN_COOKIE)
        .map(|c| c.value_trimmed())
        .filter(|v| !v.is_empty() && *v != CLEARED_VALUE)
        .map(str::to_owned)
}
