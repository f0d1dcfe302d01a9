use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::SignedCookieJar;

use crate::error::WebError;
use crate::session;
use crate::state::WebState;

pub async fn follow_user(
    State(state): State<WebState>,
    Path(username): Path<String>,
    jar: SignedCookieJar,
) -> Result<Response, WebError> {
    let Some(user) = session::current_user(&state, &jar)? else {
        return Ok(Redirect::to("/login").into_response());
    };
    let whom_id = state.db.user_id(&username)?.ok_or(WebError::NotFound)?;

    state.db.follow(user.user_id, whom_id)?;

    let jar = session::flash(jar, &format!("You are now following \"{username}\""));
    Ok((jar, Redirect::to(&format!("/{username}"))).into_response())
}

pub async fn unfollow_user(
    State(state): State<WebState>,
    Path(username): Path<String>,
    jar: SignedCookieJar,
) -> Result<Response, WebError> {
    let Some(user) = session::current_user(&state, &jar)? else {
        return Ok(Redirect::to("/login").into_response());
    };
    let whom_id = state.db.user_id(&username)?.ok_or(WebError::NotFound)?;

    state.db.unfollow(user.user_id, whom_id)?;

    let jar = session::flash(jar, &format!("You are no longer following \"{username}\""));
    Ok((jar, Redirect::to(&format!("/{username}"))).into_response())
}
