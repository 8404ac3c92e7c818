use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use drinks_engine::DrinkApiError;
use log::debug;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("Resource not found. {0}")]
    NoRecordFound(String),
    #[error("Unprocessable. {0}")]
    Unprocessable(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationError(e) => e.status_code(),
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = match self {
            Self::AuthenticationError(e) => json!({
                "success": false,
                "error": status.as_u16(),
                "code": e.code(),
                "description": e.to_string(),
            }),
            _ => json!({ "success": false, "error": status.as_u16(), "message": self.to_string() }),
        };
        HttpResponse::build(status).insert_header(ContentType::json()).body(body.to_string())
    }
}

/// Reasons a request can fail token verification or permission checks.
///
/// Every variant maps to a fixed HTTP status and a short machine-readable code; the `Display` text is the human
/// readable description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Authorization header is expected.")]
    MissingToken,
    #[error("Authorization header must be of the form 'Bearer <token>'.")]
    MalformedHeader,
    #[error("Unable to parse authentication token. {0}")]
    MalformedToken(String),
    #[error("Unable to find the appropriate key. No key with id '{0}' is published by the issuer.")]
    InvalidKeyId(String),
    #[error("Unable to fetch the issuer's signing keys. {0}")]
    KeySetUnavailable(String),
    #[error("Token expired.")]
    TokenExpired,
    #[error("Incorrect claims. Please, check the audience and issuer. {0}")]
    InvalidClaims(String),
    #[error("Token signature could not be verified.")]
    InvalidSignature,
    #[error(
        "Permissions not included in JWT. The identity provider must be configured to add permissions to access tokens."
    )]
    MissingPermissionsClaim,
    #[error("Permission not found. '{0}' is required.")]
    PermissionDenied(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingToken | Self::MalformedHeader => StatusCode::BAD_REQUEST,
            Self::MalformedToken(_) |
            Self::InvalidKeyId(_) |
            Self::TokenExpired |
            Self::InvalidClaims(_) |
            Self::InvalidSignature |
            Self::MissingPermissionsClaim => StatusCode::UNAUTHORIZED,
            Self::KeySetUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::PermissionDenied(_) => StatusCode::FORBIDDEN,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingToken => "authorization_header_missing",
            Self::MalformedHeader | Self::MalformedToken(_) | Self::InvalidKeyId(_) => "invalid_header",
            Self::KeySetUnavailable(_) => "jwks_unavailable",
            Self::TokenExpired => "token_expired",
            Self::InvalidClaims(_) | Self::MissingPermissionsClaim => "invalid_claims",
            Self::InvalidSignature => "invalid_signature",
            Self::PermissionDenied(_) => "unauthorized",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match e.kind() {
            ErrorKind::ExpiredSignature => Self::TokenExpired,
            ErrorKind::InvalidAudience |
            ErrorKind::InvalidIssuer |
            ErrorKind::InvalidSubject |
            ErrorKind::ImmatureSignature |
            ErrorKind::MissingRequiredClaim(_) |
            ErrorKind::Json(_) => Self::InvalidClaims(e.to_string()),
            ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Utf8(_) => Self::MalformedToken(e.to_string()),
            _ => Self::InvalidSignature,
        }
    }
}

impl From<DrinkApiError> for ServerError {
    fn from(e: DrinkApiError) -> Self {
        debug!("💻️ Drink operation failed. {e}");
        match e {
            DrinkApiError::DrinkNotFound(_) => Self::NoRecordFound(e.to_string()),
            DrinkApiError::DatabaseError(_) |
            DrinkApiError::InvalidTitle(_) |
            DrinkApiError::InvalidRecipe(_) |
            DrinkApiError::CorruptRecipe { .. } => Self::Unprocessable(e.to_string()),
        }
    }
}
