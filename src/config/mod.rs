use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// HS256 signing secret for admin session tokens. Empty means sessions
    /// cannot be minted; the gatekeeper fails closed with a 500.
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    /// Login attempts allowed per IP inside the sliding window.
    pub rate_limit_max_attempts: i64,
    /// Sliding window size for the gatekeeper rate check, in minutes.
    pub rate_limit_window_mins: i64,
    /// Retention for the login-attempt audit log, in hours. Rows older than
    /// this are removed by the cleanup procedure.
    pub attempt_retention_hours: i64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECT_TIMEOUT") {
            self.database.connect_timeout_secs = v.parse().unwrap_or(self.database.connect_timeout_secs);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("SECURITY_RATE_LIMIT_MAX_ATTEMPTS") {
            self.security.rate_limit_max_attempts = v.parse().unwrap_or(self.security.rate_limit_max_attempts);
        }
        if let Ok(v) = env::var("SECURITY_RATE_LIMIT_WINDOW_MINS") {
            self.security.rate_limit_window_mins = v.parse().unwrap_or(self.security.rate_limit_window_mins);
        }
        if let Ok(v) = env::var("SECURITY_ATTEMPT_RETENTION_HOURS") {
            self.security.attempt_retention_hours = v.parse().unwrap_or(self.security.attempt_retention_hours);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                max_connections: 10,
                connect_timeout_secs: 30,
            },
            security: SecurityConfig {
                jwt_secret: "dev-only-secret".to_string(),
                jwt_expiry_hours: 24,
                rate_limit_max_attempts: 5,
                rate_limit_window_mins: 60,
                attempt_retention_hours: 24,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                max_connections: 20,
                connect_timeout_secs: 10,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 12,
                rate_limit_max_attempts: 5,
                rate_limit_window_mins: 60,
                attempt_retention_hours: 24,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                max_connections: 50,
                connect_timeout_secs: 5,
            },
            security: SecurityConfig {
                // No development fallback; must come from SECURITY_JWT_SECRET
                jwt_secret: String::new(),
                jwt_expiry_hours: 4,
                rate_limit_max_attempts: 5,
                rate_limit_window_mins: 60,
                attempt_retention_hours: 24,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.security.rate_limit_max_attempts, 5);
        assert_eq!(config.security.rate_limit_window_mins, 60);
        assert_eq!(config.database.max_connections, 10);
    }

    #[test]
    fn test_retention_override_is_honored() {
        std::env::set_var("SECURITY_ATTEMPT_RETENTION_HOURS", "72");
        let config = AppConfig::development().with_env_overrides();
        std::env::remove_var("SECURITY_ATTEMPT_RETENTION_HOURS");

        assert_eq!(config.security.attempt_retention_hours, 72);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(config.security.jwt_secret.is_empty());
        assert_eq!(config.security.jwt_expiry_hours, 4);
        assert_eq!(config.database.max_connections, 50);
    }
}
