use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::SignedCookieJar;
use minijinja::context;

use crate::error::WebError;
use crate::session;
use crate::state::{PER_PAGE, WebState};
use crate::templates::render;

/// Personal timeline: the user's own messages plus everyone they follow.
pub async fn timeline(
    State(state): State<WebState>,
    jar: SignedCookieJar,
) -> Result<Response, WebError> {
    let Some(user) = session::current_user(&state, &jar)? else {
        return Ok(Redirect::to("/public").into_response());
    };

    let messages = state.db.timeline_messages(user.user_id, PER_PAGE)?;
    let (jar, flashes) = session::take_flash(jar);

    let html = render(
        &state,
        "timeline.html",
        context! {
            mode => "personal",
            user => user,
            messages => messages,
            flashes => flashes,
        },
    )?;
    Ok((jar, html).into_response())
}

pub async fn public_timeline(
    State(state): State<WebState>,
    jar: SignedCookieJar,
) -> Result<Response, WebError> {
    let user = session::current_user(&state, &jar)?;
    let messages = state.db.recent_messages(PER_PAGE)?;
    let (jar, flashes) = session::take_flash(jar);

    let html = render(
        &state,
        "timeline.html",
        context! {
            mode => "public",
            user => user,
            messages => messages,
            flashes => flashes,
        },
    )?;
    Ok((jar, html).into_response())
}

pub async fn user_timeline(
    State(state): State<WebState>,
    Path(username): Path<String>,
    jar: SignedCookieJar,
) -> Result<Response, WebError> {
    let profile = state.db.user_by_name(&username)?.ok_or(WebError::NotFound)?;

    let user = session::current_user(&state, &jar)?;
    let followed = match &user {
        Some(u) => state.db.is_following(u.user_id, profile.user_id)?,
        None => false,
    };

    let messages = state.db.user_messages(profile.user_id, PER_PAGE)?;
    let (jar, flashes) = session::take_flash(jar);

    let html = render(
        &state,
        "timeline.html",
        context! {
            mode => "user",
            user => user,
            profile => profile,
            followed => followed,
            messages => messages,
            flashes => flashes,
        },
    )?;
    Ok((jar, html).into_response())
}
