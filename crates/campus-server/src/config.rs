//! Server configuration from environment variables.

use std::env;
use std::fmt::Display;
use std::str::FromStr;

use campus_auth::AuthConfig;
use campus_db::DbConfig;
use tracing::info;

/// Full server configuration, assembled from the environment with
/// logged fallbacks for everything that has a sane default.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub db: DbConfig,
    pub auth: AuthConfig,
}

impl ServerConfig {
    /// Load from the environment.
    ///
    /// The JWT key pair has no default — the server refuses to start
    /// without `CAMPUS_JWT_PRIVATE_KEY_PEM` / `CAMPUS_JWT_PUBLIC_KEY_PEM`.
    pub fn load() -> Self {
        let db_defaults = DbConfig::default();
        let auth_defaults = AuthConfig::default();

        Self {
            port: load_or("CAMPUS_PORT", 8080),
            db: DbConfig {
                url: load_or("CAMPUS_DB_URL", db_defaults.url),
                namespace: load_or("CAMPUS_DB_NAMESPACE", db_defaults.namespace),
                database: load_or("CAMPUS_DB_NAME", db_defaults.database),
                username: load_or("CAMPUS_DB_USER", db_defaults.username),
                password: load_or("CAMPUS_DB_PASS", db_defaults.password),
            },
            auth: AuthConfig {
                jwt_private_key_pem: require("CAMPUS_JWT_PRIVATE_KEY_PEM"),
                jwt_public_key_pem: require("CAMPUS_JWT_PUBLIC_KEY_PEM"),
                access_token_lifetime_secs: load_or(
                    "CAMPUS_ACCESS_TOKEN_TTL_SECS",
                    auth_defaults.access_token_lifetime_secs,
                ),
                refresh_token_lifetime_secs: load_or(
                    "CAMPUS_REFRESH_TOKEN_TTL_SECS",
                    auth_defaults.refresh_token_lifetime_secs,
                ),
                jwt_issuer: load_or("CAMPUS_JWT_ISSUER", auth_defaults.jwt_issuer),
                pepper: env::var("CAMPUS_PASSWORD_PEPPER").ok(),
                min_password_length: load_or(
                    "CAMPUS_MIN_PASSWORD_LENGTH",
                    auth_defaults.min_password_length,
                ),
            },
        }
    }
}

fn load_or<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|e| panic!("invalid {key} value {raw:?}: {e}")),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            default
        }
    }
}

fn require(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} must be set"))
}
