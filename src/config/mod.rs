use std::env;
use std::time::Duration;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub api_base_uri: String,
    pub database_max_connections: u32,
    pub country_codes_url: String,
    pub country_codes_bootstrap: bool,
    pub bootstrap_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key))
    }

    /// Builds the configuration from any variable source. Only `DATABASE_URL`
    /// is required; malformed numbers fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, env::VarError>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        let or = |key: &str, default: &str| lookup(key).unwrap_or_else(|_| default.to_string());

        Ok(Config {
            database_url: lookup("DATABASE_URL")?,
            server_host: or("SERVER_HOST", "0.0.0.0"),
            server_port: or("SERVER_PORT", "3000").parse().unwrap_or(3000),
            api_base_uri: normalize_base_uri(&or("API_BASE_URI", "/api")),
            database_max_connections: or("DATABASE_MAX_CONNECTIONS", "10")
                .parse()
                .unwrap_or(10),
            country_codes_url: or(
                "COUNTRY_CODES_URL",
                "https://www.ixbt.com/mobile/country_code.html",
            ),
            country_codes_bootstrap: or("COUNTRY_CODES_BOOTSTRAP", "true")
                .parse()
                .unwrap_or(true),
            bootstrap_timeout_secs: or("BOOTSTRAP_TIMEOUT_SECS", "10").parse().unwrap_or(10),
        })
    }

    pub fn bootstrap_timeout(&self) -> Duration {
        Duration::from_secs(self.bootstrap_timeout_secs)
    }
}

/// `"/api/"` becomes `"/api"`, `"v1"` becomes `"/v1"`; the root becomes `""`.
fn normalize_base_uri(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Result<String, env::VarError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned().ok_or(env::VarError::NotPresent)
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let config = Config::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/db")]))
            .unwrap();

        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.api_base_uri, "/api");
        assert_eq!(config.database_max_connections, 10);
        assert!(config.country_codes_bootstrap);
        assert_eq!(config.bootstrap_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn database_url_is_required() {
        let err = Config::from_lookup(lookup(&[("SERVER_PORT", "8080")])).unwrap_err();
        assert_eq!(err, env::VarError::NotPresent);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db"),
            ("SERVER_PORT", "8080"),
            ("API_BASE_URI", "/v1"),
            ("COUNTRY_CODES_BOOTSTRAP", "false"),
            ("BOOTSTRAP_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();

        assert_eq!(config.server_port, 8080);
        assert_eq!(config.api_base_uri, "/v1");
        assert!(!config.country_codes_bootstrap);
        assert_eq!(config.bootstrap_timeout_secs, 3);
    }

    #[test]
    fn base_uri_is_normalized() {
        let base = |raw: &str| {
            Config::from_lookup(lookup(&[("DATABASE_URL", "postgres://db"), ("API_BASE_URI", raw)]))
                .unwrap()
                .api_base_uri
        };

        assert_eq!(base("/"), "");
        assert_eq!(base(""), "");
        assert_eq!(base("/api/"), "/api");
        assert_eq!(base("v1"), "/v1");
        assert_eq!(base("/api/v2"), "/api/v2");
    }

    #[test]
    fn malformed_numbers_fall_back() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db"),
            ("SERVER_PORT", "eighty"),
        ]))
        .unwrap();
        assert_eq!(config.server_port, 3000);
    }
}
