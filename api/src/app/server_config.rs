use std::net::{IpAddr, SocketAddr};

use ai_llm_service::{
    ConfigError,
    error_handler::env_or,
};

pub const DEFAULT_API_HOST: &str = "127.0.0.1";
pub const DEFAULT_API_PORT: u16 = 7860;

/// Bind address of the HTTP server (`API_HOST`, `API_PORT`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
}

impl ServerConfig {
    /// # Errors
    /// `ConfigError::InvalidFormat` for a host that is not an IP address,
    /// `ConfigError::InvalidNumber` for a bad port.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::parse(
            &env_or("API_HOST", DEFAULT_API_HOST),
            &env_or("API_PORT", &DEFAULT_API_PORT.to_string()),
        )
    }

    fn parse(host: &str, port: &str) -> Result<Self, ConfigError> {
        let ip: IpAddr = host.trim().parse().map_err(|_| ConfigError::InvalidFormat {
            var: "API_HOST",
            reason: "expected an IP address",
        })?;
        let port: u16 = port.trim().parse().map_err(|_| ConfigError::InvalidNumber {
            var: "API_PORT",
            reason: "expected u16",
        })?;
        Ok(Self {
            addr: SocketAddr::new(ip, port),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_host_and_port() {
        let cfg = ServerConfig::parse("0.0.0.0", "8080").unwrap();
        assert_eq!(cfg.addr.to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn rejects_hostnames_and_bad_ports() {
        assert!(matches!(
            ServerConfig::parse("localhost", "7860"),
            Err(ConfigError::InvalidFormat { var: "API_HOST", .. })
        ));
        assert!(matches!(
            ServerConfig::parse("127.0.0.1", "70000"),
            Err(ConfigError::InvalidNumber { var: "API_PORT", .. })
        ));
    }
}
