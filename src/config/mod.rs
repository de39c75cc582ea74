//! Configuration module for Persona Vault.
//!
//! Loads configuration from environment variables.

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use url::Url;

/// Default upstream catalog API base.
pub const DEFAULT_CATALOG_API_URL: &str = "https://sapi.aichattings.com/vapi/";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub host: IpAddr,
    pub port: u16,

    /// Directory served to the browser client.
    pub static_dir: PathBuf,

    /// Upstream catalog base URL, always ending in `/` so endpoint
    /// paths can be joined onto it.
    pub catalog_api_url: Url,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every variable has a default; values that are set but do not parse
    /// are reported as errors.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT is not a valid port: {raw}"))?,
            None => 5000,
        };

        let host = match lookup("HOST") {
            Some(raw) => raw
                .trim()
                .parse::<IpAddr>()
                .with_context(|| format!("HOST is not a valid address: {raw}"))?,
            None => IpAddr::from([0, 0, 0, 0]),
        };

        let raw_url = lookup("CATALOG_API_URL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CATALOG_API_URL.to_string());
        let catalog_api_url = parse_base_url(raw_url.trim())?;

        let static_dir = lookup("STATIC_DIR")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("public"));

        Ok(Self {
            host,
            port,
            static_dir,
            catalog_api_url,
        })
    }
}

/// Parse a base URL, appending the trailing slash `Url::join` needs to keep
/// the last path segment.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw).with_context(|| format!("Invalid CATALOG_API_URL: {raw}"))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.port, 5000);
        assert_eq!(config.host, IpAddr::from([0, 0, 0, 0]));
        assert_eq!(config.static_dir, PathBuf::from("public"));
        assert_eq!(config.catalog_api_url.as_str(), DEFAULT_CATALOG_API_URL);
    }

    #[test]
    fn test_port_override() {
        let config = load(&[("PORT", "8080")]).unwrap();
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_invalid_port_is_error() {
        assert!(load(&[("PORT", "eighty")]).is_err());
        assert!(load(&[("PORT", "70000")]).is_err());
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let config = load(&[("CATALOG_API_URL", "http://localhost:9000/vapi")]).unwrap();
        assert_eq!(config.catalog_api_url.as_str(), "http://localhost:9000/vapi/");
        assert_eq!(
            config.catalog_api_url.join("role/list").unwrap().as_str(),
            "http://localhost:9000/vapi/role/list"
        );
    }

    #[test]
    fn test_invalid_base_url_is_error() {
        assert!(load(&[("CATALOG_API_URL", "not a url")]).is_err());
    }
}
