use std::sync::Arc;

use anyhow::Result;
use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use minijinja::Environment;

use chirp_db::Database;

use crate::templates;

/// Messages shown per timeline page.
pub const PER_PAGE: i64 = 30;

#[derive(Clone)]
pub struct WebState {
    pub db: Arc<Database>,
    pub templates: Arc<Environment<'static>>,
    key: Key,
}

impl WebState {
    /// `session_secret` signs the session and flash cookies; it must be
    /// at least 32 bytes.
    pub fn new(db: Arc<Database>, session_secret: &str) -> Result<Self> {
        Ok(Self {
            db,
            templates: Arc::new(templates::environment()?),
            key: Key::derive_from(session_secret.as_bytes()),
        })
    }
}

impl FromRef<WebState> for Key {
    fn from_ref(state: &WebState) -> Key {
        state.key.clone()
    }
}
