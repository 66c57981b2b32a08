//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use civic_backend::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) public_base_url: String,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a server configuration bound to `bind_addr`.
    ///
    /// `public_base_url` prefixes every `Link` and `Location` header.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, public_base_url: impl Into<String>) -> Self {
        Self {
            bind_addr,
            public_base_url: public_base_url.into(),
            db_pool: None,
        }
    }

    /// Attach a database connection pool.
    ///
    /// When provided, the server uses the PostgreSQL repositories and the
    /// readiness probe pings the pool; otherwise the memory store is used.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn new_config_uses_the_memory_store() {
        let addr: SocketAddr = "127.0.0.1:8080".parse().expect("addr");
        let config = ServerConfig::new(addr, "http://localhost:8080");

        assert_eq!(config.bind_addr(), addr);
        assert_eq!(config.public_base_url, "http://localhost:8080");
        assert!(config.db_pool.is_none());
    }
}
