use std::{env, path::PathBuf};

use common::error::PortalResult;

/// Default address the API binds to
const DEFAULT_HOST: &str = "127.0.0.1";
/// Default port the API listens on
const DEFAULT_PORT: u16 = 3001;
/// Default origin of the browser client allowed through CORS
const DEFAULT_CLIENT_ORIGIN: &str = "http://127.0.0.1:8080";
/// Default log4rs configuration file of the API server
const DEFAULT_LOG_CONFIG: &str = "users/users_api_server_log.yml";

/// Runtime configuration of the users API server, read from the environment
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    /// Host the server binds to (`PORTAL_API_HOST`)
    pub host: String,
    /// Port the server listens on (`PORTAL_API_PORT`)
    pub port: u16,
    /// Origin of the browser client allowed by CORS (`PORTAL_CLIENT_ORIGIN`)
    pub client_origin: String,
    /// Secret used to sign session tokens (`JWT_SECRET`)
    pub jwt_secret: String,
    /// Path to the log4rs configuration file (`PORTAL_LOG_CONFIG`)
    pub log_config: PathBuf,
}

impl ApiServerConfig {
    /// Read the configuration from the process environment
    /// # Errors
    /// This function will return an error if `JWT_SECRET` is missing or empty or the port is not a
    /// valid integer
    pub fn from_env() -> PortalResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration using `lookup` to fetch each variable by name
    /// # Errors
    /// This function will return an error if `JWT_SECRET` is missing or empty or the port is not a
    /// valid integer
    pub fn from_lookup<F>(lookup: F) -> PortalResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORTAL_API_PORT") {
            Some(port) => port.parse()?,
            None => DEFAULT_PORT,
        };
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|secret| !secret.is_empty())
            .ok_or("JWT_SECRET must be set to a non-empty value")?;
        Ok(Self {
            host: lookup("PORTAL_API_HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned()),
            port,
            client_origin: lookup("PORTAL_CLIENT_ORIGIN")
                .unwrap_or_else(|| DEFAULT_CLIENT_ORIGIN.to_owned()),
            jwt_secret,
            log_config: lookup("PORTAL_LOG_CONFIG")
                .map_or_else(|| PathBuf::from(DEFAULT_LOG_CONFIG), PathBuf::from),
        })
    }
}
