use address_cache::{CacheConfig, KeyScheme, WritePolicy};
use figment::providers::{Format, Yaml};
use figment::Figment;
use getset::{CopyGetters, Getters};
use log::LevelFilter;
use serde::{Deserialize, Deserializer};
use serde_inline_default::serde_inline_default;
use std::fmt::Display;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable naming the configuration file
pub const CONFIG_PATH_ENV: &str = "ADDRESS_CACHE_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

#[serde_inline_default]
#[derive(Debug, Clone, Deserialize, Getters, CopyGetters)]
pub struct Config {
    #[serde_inline_default(PathBuf::from("cache"))]
    #[getset(get = "pub")]
    cache_dir: PathBuf,
    #[serde_inline_default(PathBuf::from("html"))]
    #[getset(get = "pub")]
    html_dir: PathBuf,
    #[serde_inline_default(PathBuf::from("logs"))]
    #[getset(get = "pub")]
    log_dir: PathBuf,
    #[serde_inline_default(String::from("app.log"))]
    #[getset(get = "pub")]
    log_file: String,
    #[serde_inline_default(IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    #[getset(get_copy = "pub")]
    address: IpAddr,
    #[serde_inline_default(8080)]
    #[getset(get_copy = "pub")]
    port: u16,
    #[serde_inline_default(LevelFilter::Info)]
    #[serde(deserialize_with = "parse")]
    #[getset(get_copy = "pub")]
    log_level: LevelFilter,
    #[serde_inline_default(WritePolicy::default())]
    #[serde(deserialize_with = "parse")]
    #[getset(get_copy = "pub")]
    write_policy: WritePolicy,
    #[serde_inline_default(KeyScheme::default())]
    #[serde(deserialize_with = "parse")]
    #[getset(get_copy = "pub")]
    key_scheme: KeyScheme,
}

impl Config {
    /// Read the YAML configuration file at `path`
    pub fn load(path: &Path) -> Result<Self, figment::Error> {
        if !path.is_file() {
            return Err(figment::Error::from(format!(
                "configuration file {} not found",
                path.display()
            )));
        }
        Figment::new().merge(Yaml::file(path)).extract()
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_dir.join(&self.log_file)
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            policy: self.write_policy,
            key_scheme: self.key_scheme,
        }
    }
}

/// Deserialize any value that parses from a string
fn parse<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let value = String::deserialize(deserializer)?;
    value.parse().map_err(|e: T::Err| {
        serde::de::Error::custom(format!("invalid value '{}': {}", value, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempdir::TempDir;

    fn write_config(dir: &TempDir, yaml: &str) -> PathBuf {
        let path = dir.path().join("config.yaml");
        fs::write(&path, yaml).unwrap();
        path
    }

    #[test]
    fn test_load_full_config() {
        let dir = TempDir::new("config").unwrap();
        let path = write_config(
            &dir,
            "cache_dir: /var/cache/addresses\n\
             html_dir: templates\n\
             log_dir: /var/log/addresses\n\
             log_file: server.log\n\
             address: 127.0.0.1\n\
             port: 9000\n\
             log_level: debug\n\
             write_policy: serialized\n\
             key_scheme: legacy\n",
        );

        let config = Config::load(&path).unwrap();

        assert_eq!(config.cache_dir(), Path::new("/var/cache/addresses"));
        assert_eq!(config.html_dir(), Path::new("templates"));
        assert_eq!(config.log_path(), Path::new("/var/log/addresses/server.log"));
        assert_eq!(config.address(), IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(config.port(), 9000);
        assert_eq!(config.log_level(), LevelFilter::Debug);
        assert_eq!(
            config.cache_config(),
            CacheConfig {
                policy: WritePolicy::Serialized,
                key_scheme: KeyScheme::Legacy,
            }
        );
    }

    #[test]
    fn test_defaults_fill_missing_keys() {
        let dir = TempDir::new("config").unwrap();
        let path = write_config(&dir, "cache_dir: data\n");

        let config = Config::load(&path).unwrap();

        assert_eq!(config.cache_dir(), Path::new("data"));
        assert_eq!(config.html_dir(), Path::new("html"));
        assert_eq!(config.log_path(), Path::new("logs/app.log"));
        assert_eq!(config.port(), 8080);
        assert_eq!(config.log_level(), LevelFilter::Info);
        assert_eq!(config.cache_config(), CacheConfig::default());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = TempDir::new("config").unwrap();
        assert!(Config::load(&dir.path().join("absent.yaml")).is_err());
    }

    #[test]
    fn test_unknown_policy_is_an_error() {
        let dir = TempDir::new("config").unwrap();
        let path = write_config(&dir, "write_policy: eventually\n");
        assert!(Config::load(&path).is_err());
    }
}
