use std::future::IntoFuture;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use chirp_api::state::ApiStateInner;
use chirp_web::state::WebState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chirp=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let db_path = std::env::var("CHIRP_DB_PATH").unwrap_or_else(|_| "chirp.db".into());
    let host = std::env::var("CHIRP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let web_port: u16 = std::env::var("CHIRP_WEB_PORT")
        .unwrap_or_else(|_| "5000".into())
        .parse()?;
    let sim_port: u16 = std::env::var("CHIRP_SIM_PORT")
        .unwrap_or_else(|_| "5001".into())
        .parse()?;
    let static_dir = std::env::var("CHIRP_STATIC_DIR").unwrap_or_else(|_| "static".into());
    // Must be at least 32 bytes; signs the session and flash cookies.
    let session_secret = std::env::var("CHIRP_SESSION_SECRET")
        .unwrap_or_else(|_| "dev-session-secret-change-me-0123456789abcdef".into());
    // user:password pair the simulator harness authenticates with
    let sim_credential = std::env::var("CHIRP_SIM_CREDENTIAL")
        .unwrap_or_else(|_| "simulator:super_safe!".into());

    // Init database
    let db = Arc::new(chirp_db::Database::open(&PathBuf::from(&db_path))?);

    // Routers; the web UI and the simulator API listen separately because
    // both surfaces expose POST /register with different content types.
    let web = chirp_web::router::build_router(WebState::new(db.clone(), &session_secret)?, &static_dir);
    let sim = chirp_api::router::build_router(ApiStateInner::new(db, &sim_credential));

    let web_addr: SocketAddr = format!("{host}:{web_port}").parse()?;
    let sim_addr: SocketAddr = format!("{host}:{sim_port}").parse()?;

    let web_listener = tokio::net::TcpListener::bind(web_addr).await?;
    let sim_listener = tokio::net::TcpListener::bind(sim_addr).await?;
    info!("Web UI listening on {web_addr}");
    info!("Simulator API listening on {sim_addr}");

    tokio::try_join!(
        axum::serve(web_listener, web).into_future(),
        axum::serve(sim_listener, sim).into_future(),
    )?;

    Ok(())
}
