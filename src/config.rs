use std::{env, net::SocketAddr};

use actix_web::cookie::Key;

const DEFAULT_DATABASE_URL: &str = "sqlite://flora_hotel.db";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid BIND_ADDR {value:?}: {cause}")]
    BindAddr {
        value: String,
        cause: std::net::AddrParseError,
    },
    #[error("SESSION_SECRET must be at least 64 bytes, got {0}")]
    SessionSecret(usize),
    #[error("invalid SESSION_COOKIE_SECURE {0:?}, expected true or false")]
    CookieSecure(String),
}

/// Settings for the booking service, read from the environment (and `.env`).
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub session_key: Key,
    pub cookie_secure: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let bind = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind
            .parse()
            .map_err(|cause| ConfigError::BindAddr { value: bind, cause })?;

        let session_key = match lookup("SESSION_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) => Key::try_from(secret.as_bytes())
                .map_err(|_| ConfigError::SessionSecret(secret.len()))?,
            None => {
                log::warn!("SESSION_SECRET not set, sessions will not survive a restart");
                Key::generate()
            }
        };

        let cookie_secure = match lookup("SESSION_COOKIE_SECURE").as_deref() {
            None | Some("") | Some("false") | Some("0") => false,
            Some("true") | Some("1") => true,
            Some(other) => return Err(ConfigError::CookieSecure(other.to_string())),
        };

        Ok(Self {
            database_url,
            bind_addr,
            session_key,
            cookie_secure,
        })
    }
}
