//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `CIVIC_*` environment variables and config
//! files, in that order of precedence.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Runtime configuration for the HTTP server and the record store.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CIVIC")]
pub struct AppSettings {
    /// Interface to bind.
    pub host: Option<IpAddr>,
    /// TCP port to bind.
    #[ortho_config(default = 8080)]
    pub port: u16,
    /// Absolute base URL used when building `Link` and `Location` headers.
    pub public_base_url: Option<String>,
    /// PostgreSQL connection string. The memory store is used when absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
}

impl AppSettings {
    /// Socket address the server binds to.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host.unwrap_or(DEFAULT_HOST), self.port)
    }

    /// Configured public base URL, falling back to `http://localhost:<port>`.
    pub fn public_base_url(&self) -> String {
        self.public_base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/').to_owned())
            .unwrap_or_else(|| format!("http://localhost:{}", self.port))
    }

    /// Database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing and fallbacks.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 5] = [
        "CIVIC_HOST",
        "CIVIC_PORT",
        "CIVIC_PUBLIC_BASE_URL",
        "CIVIC_DATABASE_URL",
        "CIVIC_DB_MAX_CONNECTIONS",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("civic-backend")])
            .expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), "127.0.0.1:8080".parse().expect("addr"));
        assert_eq!(settings.public_base_url(), "http://localhost:8080");
        assert!(settings.database_url().is_none());
        assert_eq!(settings.db_max_connections, 10);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("CIVIC_HOST", Some("0.0.0.0".to_owned())),
            ("CIVIC_PORT", Some("9090".to_owned())),
            (
                "CIVIC_PUBLIC_BASE_URL",
                Some("https://issues.example.org/".to_owned()),
            ),
            (
                "CIVIC_DATABASE_URL",
                Some("postgres://civic@db/civic".to_owned()),
            ),
            ("CIVIC_DB_MAX_CONNECTIONS", Some("4".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), "0.0.0.0:9090".parse().expect("addr"));
        assert_eq!(settings.public_base_url(), "https://issues.example.org");
        assert_eq!(settings.database_url(), Some("postgres://civic@db/civic"));
        assert_eq!(settings.db_max_connections, 4);
    }

    #[rstest]
    fn default_base_url_follows_the_port() {
        let _guard = lock_env([
            ("CIVIC_PORT", Some("3000".to_owned())),
            ("CIVIC_PUBLIC_BASE_URL", None),
        ]);

        assert_eq!(load_from_empty_args().public_base_url(), "http://localhost:3000");
    }

    #[rstest]
    fn blank_database_url_selects_the_memory_store() {
        let _guard = lock_env([("CIVIC_DATABASE_URL", Some("  ".to_owned()))]);

        assert!(load_from_empty_args().database_url().is_none());
    }
}
