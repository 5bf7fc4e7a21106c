use lampe_core::confirm::Confirmations;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub mqtt_host: String,
    pub mqtt_username: Option<String>,
    pub mqtt_password: Option<String>,
    pub hass_url: String,
    pub hass_token: String,
    pub confirmations: Confirmations,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let mqtt_host =
            std::env::var("MQTT_HOST").unwrap_or_else(|_| "localhost:1883".to_string());
        let mqtt_username = std::env::var("MQTT_USERNAME").ok();
        let mqtt_password = std::env::var("MQTT_PASSWORD").ok();

        // HASSIO_TOKEN is injected by the Home Assistant supervisor when
        // running as an add-on; in that setup the API is reachable at a
        // fixed internal URL.
        let hassio_token = std::env::var("HASSIO_TOKEN").ok();
        let hass_token = std::env::var("HASS_TOKEN")
            .ok()
            .or_else(|| hassio_token.clone())
            .ok_or_else(|| ConfigError::MissingVar("HASS_TOKEN (or HASSIO_TOKEN)".to_string()))?;

        let hass_url = match std::env::var("HASS_URL") {
            Ok(url) => url,
            Err(_) if hassio_token.is_some() => "http://hassio/homeassistant/api".to_string(),
            Err(_) => return Err(ConfigError::MissingVar("HASS_URL".to_string())),
        };

        let enabled_str =
            std::env::var("ENABLE_CONFIRMATION").unwrap_or_else(|_| "false".to_string());
        let enabled = enabled_str.to_lowercase().parse::<bool>().map_err(|_| {
            ConfigError::InvalidValue(
                "ENABLE_CONFIRMATION".to_string(),
                format!("'{}' is not a boolean", enabled_str),
            )
        })?;

        let confirmations = Confirmations {
            enabled,
            success_phrase: std::env::var("CONFIRMATION_SUCCESS")
                .unwrap_or_else(|_| "Okay".to_string()),
            failure_phrase: std::env::var("CONFIRMATION_FAILURE")
                .unwrap_or_else(|_| "Fehler".to_string()),
        };

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            mqtt_host,
            mqtt_username,
            mqtt_password,
            hass_url,
            hass_token,
            confirmations,
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use tracing::Level;

    fn clear_env_vars() {
        unsafe {
            env::remove_var("MQTT_HOST");
            env::remove_var("MQTT_USERNAME");
            env::remove_var("MQTT_PASSWORD");
            env::remove_var("HASS_URL");
            env::remove_var("HASS_TOKEN");
            env::remove_var("HASSIO_TOKEN");
            env::remove_var("ENABLE_CONFIRMATION");
            env::remove_var("CONFIRMATION_SUCCESS");
            env::remove_var("CONFIRMATION_FAILURE");
            env::remove_var("RUST_LOG");
        }
    }

    fn set_minimal_env() {
        unsafe {
            env::set_var("HASS_URL", "http://hass.local:8123");
            env::set_var("HASS_TOKEN", "test-token");
        }
    }

    #[test]
    fn test_config_error_display() {
        let missing_var = ConfigError::MissingVar("TEST_VAR".to_string());
        assert_eq!(
            format!("{}", missing_var),
            "Missing environment variable: TEST_VAR"
        );

        let invalid_value =
            ConfigError::InvalidValue("TEST_VAR".to_string(), "bad_value".to_string());
        assert_eq!(
            format!("{}", invalid_value),
            "Invalid value for environment variable TEST_VAR: bad_value"
        );
    }

    #[test]
    #[serial]
    fn test_config_from_env_minimal() {
        clear_env_vars();
        set_minimal_env();

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.mqtt_host, "localhost:1883");
        assert_eq!(config.mqtt_username, None);
        assert_eq!(config.mqtt_password, None);
        assert_eq!(config.hass_url, "http://hass.local:8123");
        assert_eq!(config.hass_token, "test-token");
        assert!(!config.confirmations.enabled);
        assert_eq!(config.confirmations.success_phrase, "Okay");
        assert_eq!(config.confirmations.failure_phrase, "Fehler");
        assert_eq!(config.log_level, Level::INFO);
    }

    #[test]
    #[serial]
    fn test_config_from_env_custom_values() {
        clear_env_vars();
        unsafe {
            env::set_var("MQTT_HOST", "broker.local:1884");
            env::set_var("MQTT_USERNAME", "snips");
            env::set_var("MQTT_PASSWORD", "secret");
            env::set_var("HASS_URL", "https://home.example.org");
            env::set_var("HASS_TOKEN", "custom-token");
            env::set_var("ENABLE_CONFIRMATION", "true");
            env::set_var("CONFIRMATION_SUCCESS", "Erledigt");
            env::set_var("CONFIRMATION_FAILURE", "Hat nicht geklappt");
            env::set_var("RUST_LOG", "debug");
        }

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.mqtt_host, "broker.local:1884");
        assert_eq!(config.mqtt_username, Some("snips".to_string()));
        assert_eq!(config.mqtt_password, Some("secret".to_string()));
        assert_eq!(config.hass_url, "https://home.example.org");
        assert_eq!(config.hass_token, "custom-token");
        assert!(config.confirmations.enabled);
        assert_eq!(config.confirmations.success_phrase, "Erledigt");
        assert_eq!(config.confirmations.failure_phrase, "Hat nicht geklappt");
        assert_eq!(config.log_level, Level::DEBUG);
    }

    #[test]
    #[serial]
    fn test_config_hassio_fallback() {
        clear_env_vars();
        unsafe {
            env::set_var("HASSIO_TOKEN", "supervisor-token");
        }

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.hass_token, "supervisor-token");
        assert_eq!(config.hass_url, "http://hassio/homeassistant/api");
    }

    #[test]
    #[serial]
    fn test_config_explicit_token_wins_over_hassio() {
        clear_env_vars();
        unsafe {
            env::set_var("HASS_URL", "http://hass.local:8123");
            env::set_var("HASS_TOKEN", "explicit-token");
            env::set_var("HASSIO_TOKEN", "supervisor-token");
        }

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.hass_token, "explicit-token");
        assert_eq!(config.hass_url, "http://hass.local:8123");
    }

    #[test]
    #[serial]
    fn test_config_missing_token() {
        clear_env_vars();
        unsafe {
            env::set_var("HASS_URL", "http://hass.local:8123");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::MissingVar(msg) => assert!(msg.contains("HASS_TOKEN")),
            _ => panic!("Expected MissingVar for HASS_TOKEN"),
        }
    }

    #[test]
    #[serial]
    fn test_config_missing_url_without_hassio() {
        clear_env_vars();
        unsafe {
            env::set_var("HASS_TOKEN", "test-token");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::MissingVar(var) => assert_eq!(var, "HASS_URL"),
            _ => panic!("Expected MissingVar for HASS_URL"),
        }
    }

    #[test]
    #[serial]
    fn test_config_invalid_confirmation_flag() {
        clear_env_vars();
        set_minimal_env();
        unsafe {
            env::set_var("ENABLE_CONFIRMATION", "yes please");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "ENABLE_CONFIRMATION"),
            _ => panic!("Expected InvalidValue for ENABLE_CONFIRMATION"),
        }
    }

    #[test]
    #[serial]
    fn test_config_invalid_log_level() {
        clear_env_vars();
        set_minimal_env();
        unsafe {
            env::set_var("RUST_LOG", "not-a-level");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "RUST_LOG"),
            _ => panic!("Expected InvalidValue for RUST_LOG"),
        }
    }
}
