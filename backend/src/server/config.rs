//! Everything `create_server` needs, gathered by `main`.

use std::net::SocketAddr;

use collab_backend::inbound::http::session_config::SessionSettings;
use collab_backend::outbound::persistence::DbPool;

/// Where users and projects live for the lifetime of the process.
pub enum Store {
    /// Process-local maps; contents vanish on exit.
    Memory,
    /// PostgreSQL through the shared connection pool.
    Postgres(DbPool),
}

/// Listener, cookie and store choices for one server instance.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) store: Store,
}

impl ServerConfig {
    /// Serve on `bind_addr` with the in-memory store.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        Self {
            session,
            bind_addr,
            store: Store::Memory,
        }
    }

    /// Switch persistence to PostgreSQL.
    #[must_use]
    pub fn with_db_pool(self, pool: DbPool) -> Self {
        Self {
            store: Store::Postgres(pool),
            ..self
        }
    }
}
