use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::sim;
use crate::state::ApiState;

/// Build the simulator API router.
///
/// - `GET /latest` -- highest command id processed so far
/// - `POST /register` -- create a user
/// - `GET /msgs` -- recent messages across all users
/// - `GET|POST /msgs/{username}` -- one user's messages / post as that user
/// - `GET|POST /fllws/{username}` -- follow list / follow & unfollow
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/latest", get(sim::latest))
        .route("/register", post(sim::register))
        .route("/msgs", get(sim::messages))
        .route("/msgs/{username}", get(sim::messages_per_user).post(sim::post_message))
        .route("/fllws/{username}", get(sim::follows).post(sim::update_follows))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
