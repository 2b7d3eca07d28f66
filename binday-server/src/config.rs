//! Startup configuration read from the environment.

use std::env;

use anyhow::{Context, Result};

const HOST_ENV: &str = "HOST";
const PORT_ENV: &str = "PORT";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ServerConfig {
    pub(crate) host: String,
    pub(crate) port: u16,
}

impl ServerConfig {
    pub(crate) fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_owned());
        let port = match lookup(PORT_ENV) {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("{PORT_ENV} must be a port number, got {raw:?}"))?,
            None => DEFAULT_PORT,
        };
        Ok(Self { host, port })
    }

    pub(crate) fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ServerConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_bind_all_interfaces() {
        let config = config_from(&[]).expect("config");
        assert_eq!(config.bind_addr(), "0.0.0.0:8000");
    }

    #[test]
    fn host_and_port_are_overridable() {
        let config = config_from(&[("HOST", "127.0.0.1"), ("PORT", "3000")]).expect("config");
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn invalid_port_is_reported() {
        let err = config_from(&[("PORT", "eighty")]).expect_err("invalid port");
        assert!(err.to_string().contains("PORT must be a port number"));
    }
}
