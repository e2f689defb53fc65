use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub debug: bool,
    pub database_url: String,
    pub server_addr: String,
    pub api_prefix: String,
    pub log_dir: String,

    // Asset folders derived from APP_FOLDER
    pub static_folder: PathBuf,
    pub media_folder: PathBuf,

    // Readiness probe
    pub ready_interval: Duration,
    pub ready_timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let app_folder = PathBuf::from(lookup("APP_FOLDER").unwrap_or_default());

        let ready_interval_ms: u64 = lookup("READY_INTERVAL_MS")
            .unwrap_or_else(|| "1000".to_string()) // default 1s between probes
            .parse()
            .context("READY_INTERVAL_MS must be a number of milliseconds")?;

        let ready_timeout = lookup("READY_TIMEOUT_SECS")
            .map(|v| v.parse::<u64>())
            .transpose()
            .context("READY_TIMEOUT_SECS must be a number of seconds")?
            .map(Duration::from_secs);

        Ok(Self {
            debug: parse_flag(lookup("DEBUG").as_deref(), true),
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| "sqlite::memory:".to_string()),
            server_addr: lookup("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:5000".to_string()),
            api_prefix: lookup("API_PREFIX").unwrap_or_else(|| "/api/v1".to_string()),
            log_dir: lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
            static_folder: app_folder.join("static"),
            media_folder: app_folder.join("media"),
            ready_interval: Duration::from_millis(ready_interval_ms),
            ready_timeout,
        })
    }
}

fn parse_flag(value: Option<&str>, default: bool) -> bool {
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        None => default,
        Some(v) if v.is_empty() => default,
        Some(v) => matches!(v.as_str(), "1" | "true" | "yes" | "on"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();

        assert!(config.debug);
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.server_addr, "0.0.0.0:5000");
        assert_eq!(config.api_prefix, "/api/v1");
        assert_eq!(config.ready_interval, Duration::from_secs(1));
        assert_eq!(config.ready_timeout, None);
    }

    #[test]
    fn app_folder_drives_static_and_media_paths() {
        let config = config_from(&[("APP_FOLDER", "/srv/app")]).unwrap();

        assert_eq!(config.static_folder, PathBuf::from("/srv/app/static"));
        assert_eq!(config.media_folder, PathBuf::from("/srv/app/media"));
    }

    #[test]
    fn debug_flag_accepts_common_spellings() {
        assert!(!config_from(&[("DEBUG", "false")]).unwrap().debug);
        assert!(!config_from(&[("DEBUG", "0")]).unwrap().debug);
        assert!(config_from(&[("DEBUG", "True")]).unwrap().debug);
        assert!(config_from(&[("DEBUG", "")]).unwrap().debug);
    }

    #[test]
    fn ready_settings_are_parsed() {
        let config = config_from(&[
            ("READY_INTERVAL_MS", "250"),
            ("READY_TIMEOUT_SECS", "30"),
        ])
        .unwrap();

        assert_eq!(config.ready_interval, Duration::from_millis(250));
        assert_eq!(config.ready_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn malformed_interval_is_an_error() {
        let err = config_from(&[("READY_INTERVAL_MS", "soon")]).unwrap_err();
        assert!(err.to_string().contains("READY_INTERVAL_MS"));
    }
}
