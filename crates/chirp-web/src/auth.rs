use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::Form;
use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::SignedCookieJar;
use minijinja::context;
use serde::Deserialize;

use crate::error::WebError;
use crate::session;
use crate::state::WebState;
use crate::templates::render;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password2: String,
}

pub async fn login_form(
    State(state): State<WebState>,
    jar: SignedCookieJar,
) -> Result<Response, WebError> {
    if session::current_user(&state, &jar)?.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    let (jar, flashes) = session::take_flash(jar);
    let html = render(&state, "login.html", context! { flashes => flashes })?;
    Ok((jar, html).into_response())
}

pub async fn login(
    State(state): State<WebState>,
    jar: SignedCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, WebError> {
    let Some(user) = state.db.user_by_name(&form.username)? else {
        return login_error(&state, jar, &form, "Invalid username");
    };

    let valid = PasswordHash::new(&user.pw_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(form.password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false);
    if !valid {
        return login_error(&state, jar, &form, "Invalid password");
    }

    let jar = session::flash(session::log_in(jar, user.user_id), "You were logged in");
    Ok((jar, Redirect::to("/")).into_response())
}

fn login_error(
    state: &WebState,
    jar: SignedCookieJar,
    form: &LoginForm,
    error: &str,
) -> Result<Response, WebError> {
    let html = render(
        state,
        "login.html",
        context! {
            error => error,
            username => form.username,
            flashes => Vec::<String>::new(),
        },
    )?;
    Ok((jar, html).into_response())
}

pub async fn register_form(
    State(state): State<WebState>,
    jar: SignedCookieJar,
) -> Result<Response, WebError> {
    if session::current_user(&state, &jar)?.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    let (jar, flashes) = session::take_flash(jar);
    let html = render(&state, "register.html", context! { flashes => flashes })?;
    Ok((jar, html).into_response())
}

pub async fn register(
    State(state): State<WebState>,
    jar: SignedCookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<Response, WebError> {
    // First failing rule wins; each maps to its own user-visible message.
    let error = if form.username.is_empty() {
        Some("You have to enter a username")
    } else if form.email.is_empty() || !form.email.contains('@') {
        Some("You have to enter a valid email address")
    } else if form.password.is_empty() {
        Some("You have to enter a password")
    } else if form.password != form.password2 {
        Some("The two passwords do not match")
    } else if state.db.user_id(&form.username)?.is_some() {
        Some("The username is already taken")
    } else {
        None
    };

    if let Some(error) = error {
        let html = render(
            &state,
            "register.html",
            context! {
                error => error,
                username => form.username,
                email => form.email,
                flashes => Vec::<String>::new(),
            },
        )?;
        return Ok(html.into_response());
    }

    // Hash password with Argon2id
    let salt = SaltString::generate(&mut OsRng);
    let pw_hash = Argon2::default()
        .hash_password(form.password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("password hash failed: {e}"))?
        .to_string();

    state.db.create_user(&form.username, &form.email, &pw_hash)?;

    let jar = session::flash(jar, "You were successfully registered and can login now");
    Ok((jar, Redirect::to("/login")).into_response())
}

pub async fn logout(jar: SignedCookieJar) -> impl IntoResponse {
    let jar = session::flash(session::log_out(jar), "You were logged out");
    (jar, Redirect::to("/public"))
}
