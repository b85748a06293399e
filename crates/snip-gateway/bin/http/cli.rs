use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::time::Duration;

pub const LISTEN_ADDR_ENV: &str = "SNIP_LISTEN_ADDR";
pub const BASE_URL_ENV: &str = "SNIP_BASE_URL";
pub const STORAGE_BACKEND_ENV: &str = "SNIP_STORAGE_BACKEND";
pub const REDIS_URL_ENV: &str = "SNIP_REDIS_URL";
pub const KEY_PREFIX_ENV: &str = "SNIP_KEY_PREFIX";
pub const TTL_SECS_ENV: &str = "SNIP_TTL_SECS";
pub const STORE_TIMEOUT_MS_ENV: &str = "SNIP_STORE_TIMEOUT_MS";
pub const MAX_ATTEMPTS_ENV: &str = "SNIP_MAX_ATTEMPTS";
pub const CORS_ORIGINS_ENV: &str = "SNIP_CORS_ORIGINS";
pub const LOG_FORMAT_ENV: &str = "SNIP_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";
pub const DEFAULT_TTL_SECS: &str = "10800";
pub const DEFAULT_STORE_TIMEOUT_MS: &str = "2000";
pub const DEFAULT_MAX_ATTEMPTS: &str = "3";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "redis")]
    Redis,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Redis => write!(f, "redis"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "snip-gateway")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Public base of generated short URLs; defaults to `http://localhost:<port>`.
    #[arg(long, env = BASE_URL_ENV)]
    pub base_url: Option<String>,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::Redis
    )]
    pub storage: StorageBackendArg,

    /// May carry a password and database index, e.g. `redis://:secret@host:6379/2`.
    #[arg(long, env = REDIS_URL_ENV, default_value = DEFAULT_REDIS_URL)]
    pub redis_url: String,

    #[arg(long, env = KEY_PREFIX_ENV, default_value = "")]
    pub key_prefix: String,

    #[arg(
        long,
        env = TTL_SECS_ENV,
        default_value = DEFAULT_TTL_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub ttl_secs: u64,

    #[arg(long, env = STORE_TIMEOUT_MS_ENV, default_value = DEFAULT_STORE_TIMEOUT_MS)]
    pub store_timeout_ms: u64,

    #[arg(long, env = MAX_ATTEMPTS_ENV, default_value = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,

    #[arg(
        long,
        env = CORS_ORIGINS_ENV,
        value_delimiter = ',',
        default_value = snip_gateway::app::DEFAULT_CORS_ORIGIN
    )]
    pub cors_origins: Vec<String>,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormatArg::Text)]
    pub log_format: LogFormatArg,
}

impl CLI {
    pub fn base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}", self.listen_addr.port()))
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_is_well_formed() {
        CLI::command().debug_assert();
    }

    #[test]
    fn explicit_flags() {
        let cli = CLI::try_parse_from([
            "snip-gateway",
            "--listen-addr",
            "127.0.0.1:9000",
            "--storage",
            "in-memory",
            "--ttl-secs",
            "60",
            "--cors-origins",
            "http://a.test,http://b.test",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.storage, StorageBackendArg::InMemory);
        assert_eq!(cli.ttl(), Duration::from_secs(60));
        assert_eq!(cli.cors_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(cli.log_format, LogFormatArg::Json);
    }

    #[test]
    fn zero_ttl_is_rejected() {
        let err = CLI::try_parse_from(["snip-gateway", "--ttl-secs", "0"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);

        let cli = CLI::try_parse_from(["snip-gateway", "--ttl-secs", "1"]).unwrap();
        assert_eq!(cli.ttl(), Duration::from_secs(1));
    }

    #[test]
    fn base_url_falls_back_to_listen_port() {
        let cli = CLI::try_parse_from([
            "snip-gateway",
            "--listen-addr",
            "127.0.0.1:9000",
            "--base-url",
            "https://s.example.com",
        ])
        .unwrap();
        assert_eq!(cli.base_url(), "https://s.example.com");

        let cli = CLI {
            base_url: None,
            ..cli
        };
        assert_eq!(cli.base_url(), "http://localhost:9000");
    }
}
