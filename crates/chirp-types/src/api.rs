use serde::{Deserialize, Serialize};

// -- Requests --

/// Registration body. Missing fields deserialize to empty strings so the
/// validation chain produces the harness-visible message for each one.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub pwd: String,
}

#[derive(Debug, Deserialize)]
pub struct PostMessageRequest {
    #[serde(default)]
    pub content: String,
}

/// Exactly one of `follow` / `unfollow` must be present.
#[derive(Debug, Deserialize)]
pub struct FollowRequest {
    pub follow: Option<String>,
    pub unfollow: Option<String>,
}

// -- Responses --

/// Wire shape of a message; field names are fixed by the test harness.
#[derive(Debug, Serialize)]
pub struct SimMessage {
    pub content: String,
    pub pub_date: i64,
    pub user: String,
}

#[derive(Debug, Serialize)]
pub struct LatestResponse {
    pub latest: i64,
}

#[derive(Debug, Serialize)]
pub struct FollowsResponse {
    pub follows: Vec<String>,
}
