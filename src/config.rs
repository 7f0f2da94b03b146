use std::path::PathBuf;

use crate::error::ConfigError;
use crate::models::catalog_record::PriceBasis;
use crate::services::destination_query::DEFAULT_POPULAR_LIMIT;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;
const CATALOG_PATH: &str = "data/destinations.json";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// When unset the bundled JSON catalog and an in-memory trip store are used.
    pub mongodb_uri: Option<String>,
    pub catalog_path: PathBuf,
    pub price_basis: PriceBasis,
    pub popular_limit: usize,
}

impl AppConfig {
    /// Read configuration from the process environment. Debug builds load
    /// `.env` first.
    pub fn from_env() -> Result<Self, ConfigError> {
        if cfg!(debug_assertions) {
            dotenv::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason,
        };

        let port = match value("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| invalid("PORT", e.to_string()))?,
            None => PORT,
        };

        let price_basis = match value("WAYFARER_PRICE_BASIS") {
            Some(raw) => raw
                .parse::<PriceBasis>()
                .map_err(|e| invalid("WAYFARER_PRICE_BASIS", e))?,
            None => PriceBasis::default(),
        };

        let popular_limit = match value("WAYFARER_POPULAR_LIMIT") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|e| invalid("WAYFARER_POPULAR_LIMIT", e.to_string()))?,
            None => DEFAULT_POPULAR_LIMIT,
        };

        Ok(Self {
            host: value("HOST").unwrap_or_else(|| HOST.to_string()),
            port,
            mongodb_uri: value("MONGODB_URI"),
            catalog_path: PathBuf::from(
                value("WAYFARER_CATALOG_PATH").unwrap_or_else(|| CATALOG_PATH.to_string()),
            ),
            price_basis,
            popular_limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.mongodb_uri, None);
        assert_eq!(config.catalog_path, PathBuf::from("data/destinations.json"));
        assert_eq!(config.price_basis, PriceBasis::Budget);
        assert_eq!(config.popular_limit, 8);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "9090"),
            ("MONGODB_URI", "mongodb://localhost:27017"),
            ("WAYFARER_PRICE_BASIS", "price"),
            ("WAYFARER_POPULAR_LIMIT", "3"),
            ("WAYFARER_CATALOG_PATH", "/srv/catalog.json"),
        ])
        .unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9090);
        assert_eq!(config.mongodb_uri.as_deref(), Some("mongodb://localhost:27017"));
        assert_eq!(config.price_basis, PriceBasis::Price);
        assert_eq!(config.popular_limit, 3);
        assert_eq!(config.catalog_path, PathBuf::from("/srv/catalog.json"));
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = config_from(&[("MONGODB_URI", "  "), ("PORT", "")]).unwrap();
        assert_eq!(config.mongodb_uri, None);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_invalid_values() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "PORT"));

        let err = config_from(&[("WAYFARER_PRICE_BASIS", "nightly")]).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "WAYFARER_PRICE_BASIS")
        );
    }
}
