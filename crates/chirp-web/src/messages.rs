use axum::Form;
use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::SignedCookieJar;
use serde::Deserialize;

use crate::error::WebError;
use crate::session;
use crate::state::WebState;

#[derive(Debug, Deserialize)]
pub struct MessageForm {
    #[serde(default)]
    pub text: String,
}

pub async fn add_message(
    State(state): State<WebState>,
    jar: SignedCookieJar,
    Form(form): Form<MessageForm>,
) -> Result<Response, WebError> {
    let Some(user) = session::current_user(&state, &jar)? else {
        return Ok(Redirect::to("/login").into_response());
    };

    let mut jar = jar;
    if !form.text.is_empty() {
        state
            .db
            .insert_message(user.user_id, &form.text, chrono::Utc::now().timestamp())?;
        jar = session::flash(jar, "Your message was recorded");
    }

    Ok((jar, Redirect::to("/")).into_response())
}
