use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub backend: BackendConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

/// Connection details for the managed backend service (auth, relational
/// queries, blob storage). The anon key is sent on every request; the
/// service applies its row-level policies on top of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub url: String,
    pub anon_key: String,
    pub site_url: String,
    pub request_timeout_secs: u64,
    pub avatar_bucket: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
    pub search_limit: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    pub require_https: bool,
    pub cookie_secure: bool,
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
        // Backend overrides (the first three are effectively required in
        // any deployed environment)
        if let Ok(v) = env::var("BACKEND_URL") {
            self.backend.url = v;
        }
        if let Ok(v) = env::var("BACKEND_ANON_KEY") {
            self.backend.anon_key = v;
        }
        if let Ok(v) = env::var("SITE_URL") {
            self.backend.site_url = v;
        }
        if let Ok(v) = env::var("BACKEND_REQUEST_TIMEOUT_SECS") {
            self.backend.request_timeout_secs = v.parse().unwrap_or(self.backend.request_timeout_secs);
        }
        if let Ok(v) = env::var("BACKEND_AVATAR_BUCKET") {
            self.backend.avatar_bucket = v;
        }

        // API overrides
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }
        if let Ok(v) = env::var("API_SEARCH_LIMIT") {
            self.api.search_limit = v.parse().unwrap_or(self.api.search_limit);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = env::var("SECURITY_REQUIRE_HTTPS") {
            self.security.require_https = v.parse().unwrap_or(self.security.require_https);
        }
        if let Ok(v) = env::var("SECURITY_COOKIE_SECURE") {
            self.security.cookie_secure = v.parse().unwrap_or(self.security.cookie_secure);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            backend: BackendConfig {
                url: "http://localhost:54321".to_string(),
                anon_key: String::new(),
                site_url: "http://localhost:3000".to_string(),
                request_timeout_secs: 10,
                avatar_bucket: "avatars".to_string(),
            },
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
                search_limit: 20,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
                require_https: false,
                cookie_secure: false,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            backend: BackendConfig {
                url: String::new(),
                anon_key: String::new(),
                site_url: "https://staging.vivamedellin.com".to_string(),
                request_timeout_secs: 10,
                avatar_bucket: "avatars".to_string(),
            },
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 5 * 1024 * 1024, // 5MB
                search_limit: 20,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.vivamedellin.com".to_string()],
                require_https: true,
                cookie_secure: true,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            backend: BackendConfig {
                url: String::new(),
                anon_key: String::new(),
                site_url: "https://vivamedellin.com".to_string(),
                request_timeout_secs: 5,
                avatar_bucket: "avatars".to_string(),
            },
            api: ApiConfig {
                enable_request_logging: false,
                max_request_size_bytes: 2 * 1024 * 1024, // 2MB
                search_limit: 20,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://vivamedellin.com".to_string()],
                require_https: true,
                cookie_secure: true,
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
        assert!(!config.security.cookie_secure);
        assert_eq!(config.api.search_limit, 20);
        assert!(config.api.enable_request_logging);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(config.security.cookie_secure);
        assert!(config.security.require_https);
        assert!(!config.api.enable_request_logging);
    }
}
