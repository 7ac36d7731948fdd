//! Session middleware configuration.
//!
//! Sessions are kept in a bounded moka cache; idle sessions are evicted and a
//! restart forgets every session and cart.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tower_sessions::cookie::time::OffsetDateTime;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store::{self, SessionStore};
use tower_sessions::{Expiry, SessionManagerLayer};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "dd_session";

/// Session expiry time in seconds (1 day, matching the cart idle timeout).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Upper bound on live sessions; least recently used ones go first.
const MAX_SESSIONS: u64 = 100_000;

/// In-memory session store that forgets idle sessions.
#[derive(Clone)]
pub struct MokaSessionStore {
    records: Cache<Id, Record>,
}

impl MokaSessionStore {
    /// Store holding at most `max_sessions`, each dropped after `idle` unused.
    #[must_use]
    pub fn new(max_sessions: u64, idle: Duration) -> Self {
        let records = Cache::builder()
            .max_capacity(max_sessions)
            .time_to_idle(idle)
            .build();

        Self { records }
    }
}

impl fmt::Debug for MokaSessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MokaSessionStore")
            .field("sessions", &self.records.entry_count())
            .finish()
    }
}

#[async_trait]
impl SessionStore for MokaSessionStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        while self.records.contains_key(&record.id) {
            record.id = Id::default();
        }
        self.records.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.records.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        let now = OffsetDateTime::now_utc();
        Ok(self
            .records
            .get(session_id)
            .await
            .filter(|record| record.expiry_date > now))
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        self.records.invalidate(session_id).await;
        Ok(())
    }
}

/// Create the session layer with a bounded in-memory store.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MokaSessionStore> {
    let idle = Duration::from_secs(SESSION_EXPIRY_SECONDS.unsigned_abs());

    SessionManagerLayer::new(MokaSessionStore::new(MAX_SESSIONS, idle))
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
