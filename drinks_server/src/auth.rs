//! Bearer token verification.
//!
//! Access tokens are RS256 JWTs issued by an external identity provider. A token is accepted when
//! * it is signed by one of the keys the issuer publishes in its JSON Web Key Set, matched on the `kid` header,
//! * its `aud` and `iss` claims match the configured audience and issuer, and it has not expired, and
//! * it carries a `permissions` claim.
//!
//! Nothing is cached: the key set is consulted, and the token fully re-verified, on every request.
use std::{
    collections::BTreeSet,
    fmt::Display,
    future::{ready, Ready},
    time::Duration,
};

use actix_web::{
    dev::Payload,
    http::header::{HeaderMap, AUTHORIZATION},
    FromRequest,
    HttpMessage,
    HttpRequest,
};
use jsonwebtoken::{
    decode,
    decode_header,
    jwk::{Jwk, JwkSet},
    Algorithm,
    DecodingKey,
    Validation,
};
use log::*;
use serde::{Deserialize, Serialize};

use crate::{
    config::AuthConfig,
    errors::{AuthError, ServerError},
};

pub const SIGNING_ALGORITHM: Algorithm = Algorithm::RS256;
const KEY_SET_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

//----------------------------------------------   Permissions  --------------------------------------------------------
/// The permissions that guard the drinks catalog routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    GetDrinksDetail,
    PostDrinks,
    PatchDrinks,
    DeleteDrinks,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetDrinksDetail => "get:drinks-detail",
            Self::PostDrinks => "post:drinks",
            Self::PatchDrinks => "patch:drinks",
            Self::DeleteDrinks => "delete:drinks",
        }
    }
}

impl Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The verified permission set of the current request. It lives in the request extensions once the ACL middleware
/// has let the request through, and can be used as a handler argument.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantedPermissions(BTreeSet<String>);

impl GrantedPermissions {
    pub fn contains(&self, permission: Permission) -> bool {
        self.0.contains(permission.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for GrantedPermissions {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl Display for GrantedPermissions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.iter().collect::<Vec<_>>().join(", "))
    }
}

impl FromRequest for GrantedPermissions {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let permissions = req.extensions().get::<GrantedPermissions>().cloned().ok_or_else(|| {
            warn!("🔐️ No verified permissions found in request extensions. Is the route missing its ACL?");
            ServerError::Unspecified("No verified permissions found in request extensions".into())
        });
        ready(permissions)
    }
}

/// The subset of access token claims the server cares about. Standard claims are checked by the validator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: Option<String>,
    pub permissions: Option<Vec<String>>,
}

//----------------------------------------------   Key source  ---------------------------------------------------------
/// Where the issuer's signing keys come from.
#[derive(Debug, Clone)]
pub enum KeySource {
    /// Fetched from the issuer's JWKS endpoint on every verification.
    Remote { url: String, client: reqwest::Client },
    /// A fixed key set.
    Static(JwkSet),
}

impl KeySource {
    pub fn remote<S: Into<String>>(url: S) -> Result<Self, ServerError> {
        let client = reqwest::Client::builder()
            .timeout(KEY_SET_FETCH_TIMEOUT)
            .build()
            .map_err(|e| ServerError::InitializeError(format!("Could not create HTTP client. {e}")))?;
        Ok(Self::Remote { url: url.into(), client })
    }

    /// Finds the published key with the given key id.
    pub async fn find_key(&self, kid: &str) -> Result<Jwk, AuthError> {
        match self {
            Self::Static(keys) => find_in_set(keys, kid),
            Self::Remote { url, client } => {
                trace!("🔐️ Fetching signing keys from {url}");
                let keys = client
                    .get(url)
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                    .map_err(|e| AuthError::KeySetUnavailable(e.to_string()))?
                    .json::<JwkSet>()
                    .await
                    .map_err(|e| AuthError::KeySetUnavailable(e.to_string()))?;
                find_in_set(&keys, kid)
            },
        }
    }
}

fn find_in_set(keys: &JwkSet, kid: &str) -> Result<Jwk, AuthError> {
    keys.find(kid).cloned().ok_or_else(|| AuthError::InvalidKeyId(kid.to_string()))
}

//----------------------------------------------   Verifier  -----------------------------------------------------------
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    issuer: String,
    audience: String,
    keys: KeySource,
}

impl TokenVerifier {
    pub fn new<S1: Into<String>, S2: Into<String>>(issuer: S1, audience: S2, keys: KeySource) -> Self {
        Self { issuer: issuer.into(), audience: audience.into(), keys }
    }

    /// Builds a verifier from the server configuration. If a key set file is configured, it is loaded here, once.
    pub fn from_config(config: &AuthConfig) -> Result<Self, ServerError> {
        if config.domain.is_empty() {
            return Err(ServerError::ConfigurationError(
                "The identity provider domain is not set. Set DRINKS_AUTH0_DOMAIN.".into(),
            ));
        }
        let keys = match &config.jwks_path {
            Some(path) => {
                let data = std::fs::read_to_string(path)?;
                let keys = serde_json::from_str::<JwkSet>(&data).map_err(|e| {
                    ServerError::ConfigurationError(format!("{} is not a valid JWK set. {e}", path.display()))
                })?;
                info!("🔐️ Loaded {} signing keys from {}", keys.keys.len(), path.display());
                KeySource::Static(keys)
            },
            None => KeySource::remote(config.jwks_url())?,
        };
        Ok(Self::new(config.issuer(), config.audience.clone(), keys))
    }

    /// Extracts the bearer token from the request headers and verifies it.
    pub async fn verify_headers(&self, headers: &HeaderMap) -> Result<GrantedPermissions, AuthError> {
        let token = bearer_token(headers)?;
        self.verify(token).await
    }

    /// Verifies the signature and claims of `token` and returns the permissions it grants.
    pub async fn verify(&self, token: &str) -> Result<GrantedPermissions, AuthError> {
        let header = decode_header(token).map_err(|e| AuthError::MalformedToken(e.to_string()))?;
        let kid = header.kid.ok_or_else(|| AuthError::MalformedToken("The token header has no key id.".into()))?;
        let jwk = self.keys.find_key(&kid).await?;
        let key = DecodingKey::from_jwk(&jwk).map_err(|e| {
            warn!("🔐️ The issuer published key '{kid}' in a form that cannot be used. {e}");
            AuthError::InvalidKeyId(kid.clone())
        })?;
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.set_audience(&[self.audience.as_str()]);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "aud", "iss"]);
        let claims = decode::<AccessClaims>(token, &key, &validation)?.claims;
        let permissions = claims.permissions.ok_or(AuthError::MissingPermissionsClaim)?;
        let permissions = permissions.into_iter().collect::<GrantedPermissions>();
        debug!("🔐️ Token for {} verified. Permissions: {permissions}", claims.sub.as_deref().unwrap_or("<no subject>"));
        Ok(permissions)
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers.get(AUTHORIZATION).ok_or(AuthError::MissingToken)?;
    let value = header.to_str().map_err(|_| AuthError::MalformedHeader)?;
    match value.split(' ').collect::<Vec<_>>().as_slice() {
        ["Bearer", token] if !token.is_empty() => Ok(*token),
        _ => Err(AuthError::MalformedHeader),
    }
}
