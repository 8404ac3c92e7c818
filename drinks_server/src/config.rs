use std::{env, path::PathBuf};

use log::*;

use crate::errors::ServerError;

const DEFAULT_DRINKS_HOST: &str = "127.0.0.1";
const DEFAULT_DRINKS_PORT: u16 = 8360;
const DEFAULT_DATABASE_URL: &str = "sqlite://drinks.db";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// If true (the default), the embedded database migrations are applied when the server starts.
    pub run_migrations: bool,
    pub auth: AuthConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_DRINKS_HOST.to_string(),
            port: DEFAULT_DRINKS_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            run_migrations: true,
            auth: AuthConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("DRINKS_HOST").ok().unwrap_or_else(|| DEFAULT_DRINKS_HOST.into());
        let port = env::var("DRINKS_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for DRINKS_PORT. {e} Using the default, {DEFAULT_DRINKS_PORT}, \
                         instead."
                    );
                    DEFAULT_DRINKS_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_DRINKS_PORT);
        let database_url = env::var("DRINKS_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ DRINKS_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.into()
        });
        let run_migrations = env::var("DRINKS_RUN_MIGRATIONS").map(|s| &s != "0" && &s != "false").unwrap_or(true);
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the authentication configuration from environment variables. {e}. The server will \
                 refuse to start until DRINKS_AUTH0_DOMAIN and DRINKS_API_AUDIENCE are set."
            );
            AuthConfig::default()
        });
        Self { host, port, database_url, run_migrations, auth }
    }
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------
/// Settings for verifying access tokens issued by the identity provider.
#[derive(Clone, Debug, Default)]
pub struct AuthConfig {
    /// The identity provider's domain, e.g. "my-tenant.us.auth0.com". Tokens must be issued by
    /// `https://{domain}/`, and signing keys are fetched from `https://{domain}/.well-known/jwks.json`.
    pub domain: String,
    /// The API identifier that tokens must carry in their `aud` claim.
    pub audience: String,
    /// If set, signing keys are read once from this JSON Web Key Set file instead of being fetched from the identity
    /// provider.
    pub jwks_path: Option<PathBuf>,
}

impl AuthConfig {
    pub fn try_from_env() -> Result<Self, ServerError> {
        let domain = env::var("DRINKS_AUTH0_DOMAIN")
            .map_err(|e| ServerError::ConfigurationError(format!("{e} [DRINKS_AUTH0_DOMAIN]")))?;
        let audience = env::var("DRINKS_API_AUDIENCE")
            .map_err(|e| ServerError::ConfigurationError(format!("{e} [DRINKS_API_AUDIENCE]")))?;
        let jwks_path = env::var("DRINKS_JWKS_PATH").ok().filter(|s| !s.is_empty()).map(PathBuf::from);
        let domain = domain.trim().trim_start_matches("https://").trim_end_matches('/').to_string();
        if domain.is_empty() {
            return Err(ServerError::ConfigurationError("DRINKS_AUTH0_DOMAIN is empty".into()));
        }
        Ok(Self { domain, audience, jwks_path })
    }

    pub fn issuer(&self) -> String {
        format!("https://{}/", self.domain)
    }

    pub fn jwks_url(&self) -> String {
        format!("https://{}/.well-known/jwks.json", self.domain)
    }
}
