//! Server-side HTML templating.
//!
//! Templates are compiled into the binary and rendered with `minijinja`.

use axum::response::Html;
use chrono::DateTime;
use md5::{Digest, Md5};
use minijinja::{Environment, Value};

use crate::error::WebError;
use crate::state::WebState;

pub fn environment() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();

    env.add_filter("datetimeformat", format_datetime);
    env.add_function("gravatar", gravatar_url);

    env.add_template("layout.html", include_str!("../templates/layout.html"))?;
    env.add_template("timeline.html", include_str!("../templates/timeline.html"))?;
    env.add_template("login.html", include_str!("../templates/login.html"))?;
    env.add_template("register.html", include_str!("../templates/register.html"))?;

    Ok(env)
}

pub fn render(state: &WebState, name: &str, ctx: Value) -> Result<Html<String>, WebError> {
    let tmpl = state.templates.get_template(name)?;
    Ok(Html(tmpl.render(ctx)?))
}

/// Format a Unix timestamp the way the timeline displays dates.
fn format_datetime(ts: i64) -> String {
    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d @ %H:%M").to_string())
        .unwrap_or_else(|| ts.to_string())
}

/// Gravatar image URL for an email address.
fn gravatar_url(email: String, size: u32) -> String {
    let digest = Md5::digest(email.trim().to_lowercase().as_bytes());
    format!(
        "https://www.gravatar.com/avatar/{}?d=identicon&s={}",
        hex::encode(digest),
        size
    )
}
