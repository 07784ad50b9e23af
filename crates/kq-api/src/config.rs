//! API server configuration.

use std::time::Duration;

use serde::Deserialize;

/// Top-level API server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Listen address (e.g., "0.0.0.0").
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Per-call control-plane timeout in seconds.
    #[serde(default = "default_cluster_timeout_secs")]
    pub cluster_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cluster_timeout_secs() -> u64 {
    10
}

impl ApiConfig {
    /// Load config from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(port) = std::env::var("PORT")
            && let Ok(port) = port.parse()
        {
            config.port = port;
        }
        if let Ok(secs) = std::env::var("CLUSTER_TIMEOUT_SECS")
            && let Ok(secs) = secs.parse()
        {
            config.cluster_timeout_secs = secs;
        }
        config
    }

    pub fn cluster_timeout(&self) -> Duration {
        Duration::from_secs(self.cluster_timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cluster_timeout_secs: default_cluster_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8000);
        assert_eq!(config.cluster_timeout(), Duration::from_secs(10));
    }
}
