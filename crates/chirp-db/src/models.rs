//! Database row types mapping directly to SQLite rows.
//! Serializable so the web layer can hand them straight to templates.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct UserRow {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub pw_hash: String,
}

/// A message joined with its author, as produced by the timeline queries.
#[derive(Debug, Clone, Serialize)]
pub struct MessageRow {
    pub text: String,
    pub pub_date: i64,
    pub username: String,
    pub email: String,
}
