//! Cookie-backed session and flash handling.
//!
//! The session holds only the signed user id. Flash messages ride in a
//! second signed cookie and are cleared on first read.

use axum_extra::extract::cookie::{Cookie, SignedCookieJar};

use chirp_db::models::UserRow;

use crate::error::WebError;
use crate::state::WebState;

const SESSION_COOKIE: &str = "session_user";
const FLASH_COOKIE: &str = "flash";

/// Resolve the logged-in user from the session cookie, if any.
/// A stale cookie pointing at a missing user resolves to anonymous.
pub fn current_user(state: &WebState, jar: &SignedCookieJar) -> Result<Option<UserRow>, WebError> {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Ok(None);
    };
    let Ok(user_id) = cookie.value().parse::<i64>() else {
        return Ok(None);
    };
    Ok(state.db.user_by_id(user_id)?)
}

pub fn log_in(jar: SignedCookieJar, user_id: i64) -> SignedCookieJar {
    jar.add(Cookie::build((SESSION_COOKIE, user_id.to_string())).path("/"))
}

pub fn log_out(jar: SignedCookieJar) -> SignedCookieJar {
    jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/"))
}

/// Queue a flash message for the next rendered page.
pub fn flash(jar: SignedCookieJar, message: &str) -> SignedCookieJar {
    jar.add(Cookie::build((FLASH_COOKIE, message.to_string())).path("/"))
}

/// Take the pending flash messages, clearing them from the jar.
pub fn take_flash(jar: SignedCookieJar) -> (SignedCookieJar, Vec<String>) {
    match jar.get(FLASH_COOKIE) {
        Some(cookie) => {
            let messages = vec![cookie.value().to_string()];
            (jar.remove(Cookie::build((FLASH_COOKIE, "")).path("/")), messages)
        }
        None => (jar, Vec::new()),
    }
}
