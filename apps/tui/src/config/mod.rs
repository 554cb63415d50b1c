use color_eyre::eyre::{eyre, Result};
use dotenv::dotenv;
use std::env;
use std::time::Duration;

use crate::domain::Coordinates;
use crate::map::{MapIconConfig, MapViewport};

pub const DEFAULT_API_URL: &str = "http://localhost:3333";

/// Settings of the terminal client, read once at startup.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub request_timeout: Duration,
    pub viewport: MapViewport,
    pub icon: MapIconConfig,
    pub debug: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            request_timeout: Duration::from_secs(30),
            viewport: MapViewport::default(),
            icon: MapIconConfig::default(),
            debug: false,
        }
    }
}

/// Initializes the client configuration from `.env` and the environment
pub fn init_app_config() -> Result<ClientConfig> {
    dotenv().ok();
    from_lookup(|key| env::var(key).ok())
}

fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<ClientConfig> {
    let defaults = ClientConfig::default();

    let api_url = lookup("API_URL")
        .map_or(defaults.api_url, |url| url.trim_end_matches('/').to_owned());

    let request_timeout = parse_var(&lookup, "REQUEST_TIMEOUT_SECS")?
        .map_or(defaults.request_timeout, Duration::from_secs);

    let lat = parse_var(&lookup, "MAP_CENTER_LAT")?.unwrap_or(defaults.viewport.center.lat);
    let lng = parse_var(&lookup, "MAP_CENTER_LNG")?.unwrap_or(defaults.viewport.center.lng);
    let zoom = parse_var(&lookup, "MAP_ZOOM")?.unwrap_or(defaults.viewport.zoom);

    let debug = lookup("DEBUG").is_some_and(|v| matches!(v.as_str(), "1" | "true"));

    Ok(ClientConfig {
        api_url,
        request_timeout,
        viewport: MapViewport::new(Coordinates::new(lat, lng), zoom),
        icon: defaults.icon,
        debug,
    })
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| eyre!("Invalid {key}={raw}: {e}"))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() -> Result<()> {
        let config = from_lookup(lookup_from(&[]))?;
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.viewport, MapViewport::default());
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(!config.debug);
        Ok(())
    }

    #[test]
    fn environment_overrides_defaults() -> Result<()> {
        let config = from_lookup(lookup_from(&[
            ("API_URL", "http://api.example:8080/"),
            ("MAP_CENTER_LAT", "-23.5"),
            ("MAP_CENTER_LNG", "-46.6"),
            ("MAP_ZOOM", "12"),
            ("REQUEST_TIMEOUT_SECS", "5"),
            ("DEBUG", "1"),
        ]))?;

        assert_eq!(config.api_url, "http://api.example:8080");
        assert_eq!(config.viewport.center, Coordinates::new(-23.5, -46.6));
        assert_eq!(config.viewport.zoom, 12);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert!(config.debug);
        Ok(())
    }

    #[test]
    fn invalid_number_is_reported() {
        let err = from_lookup(lookup_from(&[("MAP_ZOOM", "far")])).expect_err("invalid zoom");
        assert!(err.to_string().contains("MAP_ZOOM"));
    }
}
