use std::sync::Arc;
use std::sync::atomic::AtomicI64;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;

use chirp_db::Database;

pub type ApiState = Arc<ApiStateInner>;

pub struct ApiStateInner {
    pub db: Arc<Database>,
    /// Highest `latest` query parameter seen across simulator calls.
    /// Reset only by process restart.
    pub latest: AtomicI64,
    /// Exact `Authorization` header value the simulator must present.
    pub auth_header: String,
}

impl ApiStateInner {
    /// `credential` is the simulator's `user:password` pair from config.
    pub fn new(db: Arc<Database>, credential: &str) -> ApiState {
        Arc::new(Self {
            db,
            latest: AtomicI64::new(-1),
            auth_header: format!("Basic {}", B64.encode(credential)),
        })
    }
}
