use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Connection settings for the external cache, in either of the two
/// deployment shapes: a full URL, or discrete host/port/password values.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(untagged)]
pub enum CacheConfig {
    Url {
        url: String,
    },
    HostPort {
        host: String,
        #[serde(default = "default_cache_port")]
        port: u16,
        #[serde(default)]
        password: Option<String>,
    },
}

fn default_cache_port() -> u16 {
    6379
}

impl CacheConfig {
    pub fn redis_url(&self) -> String {
        match self {
            CacheConfig::Url { url } => url.clone(),
            CacheConfig::HostPort {
                host,
                port,
                password,
            } => match password {
                Some(password) => format!("redis://:{password}@{host}:{port}/"),
                None => format!("redis://{host}:{port}/"),
            },
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CoinGeckoProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub coingecko: Option<CoinGeckoProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            coingecko: Some(CoinGeckoProviderConfig {
                base_url: "https://api.coingecko.com".to_string(),
            }),
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cache: Option<CacheConfig>,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

impl AppConfig {
    /// Loads the config file if one exists, falls back to defaults, then
    /// applies environment overrides.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        let config = if config_path.exists() {
            Self::load_from_path(&config_path)?
        } else {
            debug!("No config file at {}, using defaults", config_path.display());
            Self::default()
        };
        Ok(config.apply_env())
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "coinboard", "coinboard")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Environment overrides, applied once at startup. Request handling
    /// never consults the environment.
    pub fn apply_env(mut self) -> Self {
        if let Ok(port) = std::env::var("PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!("Ignoring unparsable PORT value: {port}"),
            }
        }
        if let Ok(url) = std::env::var("REDIS_URL") {
            self.cache = Some(CacheConfig::Url { url });
        } else if let Ok(host) = std::env::var("REDIS_HOST") {
            let port = std::env::var("REDIS_PORT")
                .ok()
                .and_then(|port| port.parse().ok())
                .unwrap_or_else(default_cache_port);
            let password = std::env::var("REDIS_PASSWORD").ok();
            self.cache = Some(CacheConfig::HostPort {
                host,
                port,
                password,
            });
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
server:
  host: "127.0.0.1"
  port: 8080
cache:
  url: "redis://cache.internal:6379"
providers:
  coingecko:
    base_url: "http://example.com/gecko"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        match config.cache.as_ref().unwrap() {
            CacheConfig::Url { url } => assert_eq!(url, "redis://cache.internal:6379"),
            other => panic!("Expected a url cache config, got {other:?}"),
        }
        assert_eq!(
            config.providers.coingecko.unwrap().base_url,
            "http://example.com/gecko"
        );
    }

    #[test]
    fn test_host_port_cache_config() {
        let yaml_str = r#"
cache:
  host: "cache.internal"
  port: 6380
  password: "hunter2"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).unwrap();
        let cache = config.cache.unwrap();
        match &cache {
            CacheConfig::HostPort {
                host,
                port,
                password,
            } => {
                assert_eq!(host, "cache.internal");
                assert_eq!(*port, 6380);
                assert_eq!(password.as_deref(), Some("hunter2"));
            }
            other => panic!("Expected a host/port cache config, got {other:?}"),
        }
        assert_eq!(cache.redis_url(), "redis://:hunter2@cache.internal:6380/");
    }

    #[test]
    fn test_host_only_cache_config_gets_default_port() {
        let yaml_str = r#"
cache:
  host: "localhost"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).unwrap();
        assert_eq!(
            config.cache.unwrap().redis_url(),
            "redis://localhost:6379/"
        );
    }

    #[test]
    fn test_load_from_path() {
        let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        fs::write(
            config_file.path(),
            r#"
server:
  port: 9000
cache:
  url: "redis://localhost:6379"
"#,
        )
        .expect("Failed to write config file");

        let config = AppConfig::load_from_path(config_file.path()).unwrap();
        assert_eq!(config.server.port, 9000);
        assert!(config.cache.is_some());
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let result = AppConfig::load_from_path("/nonexistent/config.yaml");
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5000);
        assert!(config.cache.is_none());
        assert_eq!(
            config.providers.coingecko.unwrap().base_url,
            "https://api.coingecko.com"
        );
    }
}
