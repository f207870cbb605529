//! Server configuration, parsed from the command line and environment.

use std::time::Duration;

use banner_core::origin::DEFAULT_PRIVILEGED_ORIGINS;
use banner_core::PrivilegedOrigins;
use clap::{Parser, ValueEnum};

use crate::network::NetworkConfig;
use crate::origin::DEFAULT_ROUTE_PROBE;

/// Where the caller origin for the privileged check comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OriginMode {
    /// Address of this host's outbound interface.
    Local,
    /// Remote address of each HTTP caller.
    Peer,
    /// A fixed configured value (`--static-origin`).
    Static,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Banner server configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "bannerd", version, about = "Active banner selection service")]
pub struct ServerConfig {
    /// Bind address.
    #[arg(long, env = "BANNER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Listen port. 0 picks a free port.
    #[arg(long, env = "BANNER_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Origins that may preview banners outside their display window. Repeatable.
    #[arg(
        long = "privileged-origin",
        env = "BANNER_PRIVILEGED_ORIGINS",
        value_delimiter = ',',
        default_values_t = DEFAULT_PRIVILEGED_ORIGINS.map(String::from)
    )]
    pub privileged_origins: Vec<String>,

    /// How the caller origin is determined.
    #[arg(long, env = "BANNER_ORIGIN_MODE", value_enum, default_value_t = OriginMode::Local)]
    pub origin_mode: OriginMode,

    /// Origin reported in `static` mode.
    #[arg(long, env = "BANNER_STATIC_ORIGIN", required_if_eq("origin_mode", "static"))]
    pub static_origin: Option<String>,

    /// Routing probe used in `local` mode to find the outbound interface.
    #[arg(long, env = "BANNER_ROUTE_PROBE", default_value = DEFAULT_ROUTE_PROBE)]
    pub route_probe: String,

    /// Per-request timeout in seconds.
    #[arg(long, env = "BANNER_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Allowed CORS origins. Repeatable; `*` allows any.
    #[arg(
        long = "cors-origin",
        env = "BANNER_CORS_ORIGINS",
        value_delimiter = ',',
        default_value = "*"
    )]
    pub cors_origins: Vec<String>,

    /// Log output format.
    #[arg(long, env = "BANNER_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Serve Prometheus metrics on this port when set.
    #[arg(long, env = "BANNER_METRICS_PORT")]
    pub metrics_port: Option<u16>,
}

impl ServerConfig {
    #[must_use]
    pub fn privileged_origins(&self) -> PrivilegedOrigins {
        PrivilegedOrigins::new(&self.privileged_origins)
    }

    #[must_use]
    pub fn network_config(&self) -> NetworkConfig {
        NetworkConfig {
            host: self.host.clone(),
            port: self.port,
            cors_origins: self.cors_origins.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            ..NetworkConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<ServerConfig, clap::Error> {
        ServerConfig::try_parse_from(std::iter::once("bannerd").chain(args.iter().copied()))
    }

    #[test]
    fn defaults() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.origin_mode, OriginMode::Local);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.cors_origins, vec!["*"]);
        assert!(config.metrics_port.is_none());
        assert_eq!(config.privileged_origins(), PrivilegedOrigins::default());
    }

    #[test]
    fn privileged_origins_are_repeatable() {
        let config = parse(&[
            "--privileged-origin",
            "192.168.0.5",
            "--privileged-origin",
            "192.168.0.6",
        ])
        .unwrap();
        let set = config.privileged_origins();
        assert_eq!(set.len(), 2);
        assert!(set.contains("192.168.0.6"));
        assert!(!set.contains("10.0.0.1"));
    }

    #[test]
    fn static_mode_requires_origin() {
        assert!(parse(&["--origin-mode", "static"]).is_err());
        let config = parse(&["--origin-mode", "static", "--static-origin", "10.0.0.1"]).unwrap();
        assert_eq!(config.static_origin.as_deref(), Some("10.0.0.1"));
    }

    #[test]
    fn network_config_carries_transport_settings() {
        let config = parse(&["--port", "0", "--request-timeout-secs", "5"]).unwrap();
        let network = config.network_config();
        assert_eq!(network.port, 0);
        assert_eq!(network.request_timeout, Duration::from_secs(5));
    }
}
