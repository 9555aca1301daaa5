use crate::error::AppError;
use config::builder::{ConfigBuilder, DefaultState};
use config::{Config as Cfg, File};
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let builder = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"));

        Self::from_builder(builder)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, AppError> {
        Ok(builder.build()?.try_deserialize()?)
    }

    /// Socket address the HTTP listener binds to.
    pub fn bind_address(&self) -> Result<SocketAddr, AppError> {
        let ip: IpAddr = self.host.parse().map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!("Invalid host '{}': {}", self.host, e))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bind_to_local_port_5000() {
        let config = Config::from_builder(Cfg::builder()).unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 5000);
        assert_eq!(
            config.bind_address().unwrap(),
            "127.0.0.1:5000".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn overrides_replace_defaults() {
        let builder = Cfg::builder()
            .set_override("host", "0.0.0.0")
            .unwrap()
            .set_override("port", 8081)
            .unwrap();
        let config = Config::from_builder(builder).unwrap();

        assert_eq!(config.port, 8081);
        assert_eq!(config.bind_address().unwrap().to_string(), "0.0.0.0:8081");
    }

    #[test]
    fn invalid_host_is_a_config_error() {
        let config = Config {
            host: "not an ip".to_string(),
            port: 5000,
        };

        assert!(matches!(
            config.bind_address(),
            Err(AppError::ConfigError(_))
        ));
    }
}
