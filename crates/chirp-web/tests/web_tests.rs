//! Integration tests for the web UI, driven via `tower::ServiceExt`
//! with a manual cookie jar to carry the signed session across requests.

use std::collections::HashMap;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use tower::ServiceExt;

use chirp_db::Database;
use chirp_web::router::build_router;
use chirp_web::state::WebState;

type CookieJar = HashMap<String, String>;

fn test_router() -> Router {
    let db = Arc::new(Database::open_in_memory().unwrap());
    let state = WebState::new(db, "test-session-secret-of-at-least-32-bytes").unwrap();
    build_router(state, "static")
}

fn get_request(uri: &str, jar: &CookieJar) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if !jar.is_empty() {
        builder = builder.header(header::COOKIE, cookie_header(jar));
    }
    builder.body(Body::empty()).unwrap()
}

fn form_request(uri: &str, body: &str, jar: &CookieJar) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if !jar.is_empty() {
        builder = builder.header(header::COOKIE, cookie_header(jar));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn cookie_header(jar: &CookieJar) -> String {
    jar.iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("; ")
}

fn collect_cookies(response: &Response<Body>, jar: &mut CookieJar) {
    for value in response.headers().get_all(header::SET_COOKIE) {
        let raw = value.to_str().unwrap();
        let pair = raw.split(';').next().unwrap();
        let (name, value) = pair.split_once('=').unwrap();
        if value.is_empty() {
            jar.remove(name);
        } else {
            jar.insert(name.to_string(), value.to_string());
        }
    }
}

async fn send(router: &Router, req: Request<Body>, jar: &mut CookieJar) -> (StatusCode, String) {
    let response = router.clone().oneshot(req).await.unwrap();
    let status = response.status();
    collect_cookies(&response, jar);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn register(router: &Router, jar: &mut CookieJar, username: &str) {
    let body = format!(
        "username={username}&email={username}%40example.com&password=secret&password2=secret"
    );
    let (status, _) = send(router, form_request("/register", &body, jar), jar).await;
    assert!(status.is_redirection(), "registration should redirect to /login");
}

async fn log_in(router: &Router, jar: &mut CookieJar, username: &str) {
    let body = format!("username={username}&password=secret");
    let (status, _) = send(router, form_request("/login", &body, jar), jar).await;
    assert!(status.is_redirection(), "login should redirect to /");
    assert!(jar.contains_key("session_user"), "login should set the session cookie");
}

#[tokio::test]
async fn public_timeline_renders() {
    let router = test_router();
    let mut jar = CookieJar::new();

    let (status, body) = send(&router, get_request("/public", &jar), &mut jar).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Public Timeline"));
    assert!(body.contains("There's no message so far."));
}

#[tokio::test]
async fn anonymous_timeline_redirects_to_public() {
    let router = test_router();
    let jar = CookieJar::new();

    let response = router
        .clone()
        .oneshot(get_request("/", &jar))
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(response.headers()[header::LOCATION], "/public");
}

#[tokio::test]
async fn register_login_post_flow() {
    let router = test_router();
    let mut jar = CookieJar::new();

    register(&router, &mut jar, "alice").await;

    // Registration flashes on the login page
    let (status, body) = send(&router, get_request("/login", &jar), &mut jar).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("You were successfully registered and can login now"));

    log_in(&router, &mut jar, "alice").await;

    let (status, body) = send(&router, get_request("/", &jar), &mut jar).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("You were logged in"));
    assert!(body.contains("What's on your mind alice?"));

    let (status, _) = send(
        &router,
        form_request("/add_message", "text=Hello+world", &jar),
        &mut jar,
    )
    .await;
    assert!(status.is_redirection());

    let (_, body) = send(&router, get_request("/", &jar), &mut jar).await;
    assert!(body.contains("Your message was recorded"));
    assert!(body.contains("Hello world"));

    // Also visible on the public timeline
    let (_, body) = send(&router, get_request("/public", &jar), &mut jar).await;
    assert!(body.contains("Hello world"));
}

#[tokio::test]
async fn register_validation_messages() {
    let router = test_router();
    let mut jar = CookieJar::new();

    let cases = [
        ("username=&email=a%40a.a&password=x&password2=x", "You have to enter a username"),
        ("username=a&email=broken&password=x&password2=x", "You have to enter a valid email address"),
        ("username=a&email=a%40a.a&password=&password2=", "You have to enter a password"),
        ("username=a&email=a%40a.a&password=x&password2=y", "The two passwords do not match"),
    ];
    for (body, expected) in cases {
        let (status, page) = send(&router, form_request("/register", body, &jar), &mut jar).await;
        assert_eq!(status, StatusCode::OK);
        assert!(page.contains(expected), "expected {expected:?} in page");
    }

    register(&router, &mut jar, "alice").await;
    let (_, page) = send(
        &router,
        form_request(
            "/register",
            "username=alice&email=a%40a.a&password=x&password2=x",
            &jar,
        ),
        &mut jar,
    )
    .await;
    assert!(page.contains("The username is already taken"));
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let router = test_router();
    let mut jar = CookieJar::new();

    let (status, page) = send(
        &router,
        form_request("/login", "username=ghost&password=x", &jar),
        &mut jar,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("Invalid username"));

    register(&router, &mut jar, "alice").await;
    let (_, page) = send(
        &router,
        form_request("/login", "username=alice&password=wrong", &jar),
        &mut jar,
    )
    .await;
    assert!(page.contains("Invalid password"));
    assert!(!jar.contains_key("session_user"));
}

#[tokio::test]
async fn unknown_user_timeline_is_404() {
    let router = test_router();
    let mut jar = CookieJar::new();

    let (status, _) = send(&router, get_request("/ghost", &jar), &mut jar).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn add_message_requires_login() {
    let router = test_router();
    let jar = CookieJar::new();

    let response = router
        .clone()
        .oneshot(form_request("/add_message", "text=sneaky", &jar))
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(response.headers()[header::LOCATION], "/login");
}

#[tokio::test]
async fn follow_and_unfollow_from_user_timeline() {
    let router = test_router();
    let mut jar = CookieJar::new();

    register(&router, &mut jar, "bob").await;
    register(&router, &mut jar, "alice").await;
    log_in(&router, &mut jar, "alice").await;

    let (status, page) = send(&router, get_request("/bob", &jar), &mut jar).await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("You are not yet following this user."));

    let (status, _) = send(&router, get_request("/bob/follow", &jar), &mut jar).await;
    assert!(status.is_redirection());

    let (_, page) = send(&router, get_request("/bob", &jar), &mut jar).await;
    assert!(page.contains("You are now following &quot;bob&quot;"));
    assert!(page.contains("You are currently following this user."));

    let (status, _) = send(&router, get_request("/bob/unfollow", &jar), &mut jar).await;
    assert!(status.is_redirection());

    let (_, page) = send(&router, get_request("/bob", &jar), &mut jar).await;
    assert!(page.contains("You are not yet following this user."));
}

#[tokio::test]
async fn own_timeline_shows_followed_users_messages() {
    let router = test_router();

    let mut bob_jar = CookieJar::new();
    register(&router, &mut bob_jar, "bob").await;
    log_in(&router, &mut bob_jar, "bob").await;
    send(
        &router,
        form_request("/add_message", "text=bob+speaks", &bob_jar),
        &mut bob_jar,
    )
    .await;

    let mut alice_jar = CookieJar::new();
    register(&router, &mut alice_jar, "alice").await;
    log_in(&router, &mut alice_jar, "alice").await;

    // Not followed yet: bob's message stays off alice's timeline
    let (_, page) = send(&router, get_request("/", &alice_jar), &mut alice_jar).await;
    assert!(!page.contains("bob speaks"));

    send(&router, get_request("/bob/follow", &alice_jar), &mut alice_jar).await;

    let (_, page) = send(&router, get_request("/", &alice_jar), &mut alice_jar).await;
    assert!(page.contains("bob speaks"));
}

#[tokio::test]
async fn logout_clears_the_session() {
    let router = test_router();
    let mut jar = CookieJar::new();

    register(&router, &mut jar, "alice").await;
    log_in(&router, &mut jar, "alice").await;

    let (status, _) = send(&router, get_request("/logout", &jar), &mut jar).await;
    assert!(status.is_redirection());
    assert!(!jar.contains_key("session_user"));

    let (_, page) = send(&router, get_request("/public", &jar), &mut jar).await;
    assert!(page.contains("You were logged out"));
    assert!(page.contains("sign in"));
}
