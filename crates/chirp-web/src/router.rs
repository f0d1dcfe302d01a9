use axum::Router;
use axum::routing::{get, post};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::WebState;
use crate::{auth, messages, social, timeline};

/// Build the web UI router.
///
/// Static routes take precedence over the `/{username}` capture, so
/// `/public`, `/login` etc. are never shadowed by a user timeline.
pub fn build_router(state: WebState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(timeline::timeline))
        .route("/public", get(timeline::public_timeline))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/register", get(auth::register_form).post(auth::register))
        .route("/logout", get(auth::logout))
        .route("/add_message", post(messages::add_message))
        .route("/{username}", get(timeline::user_timeline))
        .route("/{username}/follow", get(social::follow_user))
        .route("/{username}/unfollow", get(social::unfollow_user))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
