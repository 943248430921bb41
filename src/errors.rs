use std::fmt::Display;

use http::StatusCode;
use serde::Deserialize;

use crate::types::Document;

/// Errors returned by [`PaymentClient`](crate::client::PaymentClient) operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The gateway answered with a status outside `200..=205`.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Timeout, connection refused, DNS or TLS failure. Never retried.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// A successful response carried a body that is not JSON.
    #[error("Response decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// The gateway error kind, if this is a gateway-reported failure.
    pub fn api_kind(&self) -> Option<ApiErrorKind> {
        match self {
            Error::Api(err) => Some(err.kind),
            _ => None,
        }
    }

    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Error::Api(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_bad_request(&self) -> bool {
        self.api_kind() == Some(ApiErrorKind::BadRequest)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.api_kind() == Some(ApiErrorKind::Unauthorized)
    }

    pub fn is_not_found(&self) -> bool {
        self.api_kind() == Some(ApiErrorKind::NotFound)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Transport(err) if err.is_timeout())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failure kinds reported by the gateway, keyed by HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// 400: validation failure, e.g. a malformed card number.
    BadRequest,
    /// 401: missing or invalid credentials.
    Unauthorized,
    /// 402: the authorization was declined.
    PaymentRequired,
    /// 403: the account may not use this resource.
    Forbidden,
    /// 404: the resource does not exist or was already deleted.
    NotFound,
    /// 409: duplicate merchant reference or customer id.
    Conflict,
    /// Any 5xx status.
    ServerError(u16),
    /// Any other status outside the success range.
    Other(u16),
}

impl ApiErrorKind {
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::BAD_REQUEST => ApiErrorKind::BadRequest,
            StatusCode::UNAUTHORIZED => ApiErrorKind::Unauthorized,
            StatusCode::PAYMENT_REQUIRED => ApiErrorKind::PaymentRequired,
            StatusCode::FORBIDDEN => ApiErrorKind::Forbidden,
            StatusCode::NOT_FOUND => ApiErrorKind::NotFound,
            StatusCode::CONFLICT => ApiErrorKind::Conflict,
            s if s.is_server_error() => ApiErrorKind::ServerError(s.as_u16()),
            s => ApiErrorKind::Other(s.as_u16()),
        }
    }
}

impl Display for ApiErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiErrorKind::BadRequest => write!(f, "bad request"),
            ApiErrorKind::Unauthorized => write!(f, "unauthorized"),
            ApiErrorKind::PaymentRequired => write!(f, "payment required"),
            ApiErrorKind::Forbidden => write!(f, "forbidden"),
            ApiErrorKind::NotFound => write!(f, "not found"),
            ApiErrorKind::Conflict => write!(f, "conflict"),
            ApiErrorKind::ServerError(code) => write!(f, "server error ({code})"),
            ApiErrorKind::Other(code) => write!(f, "unexpected status ({code})"),
        }
    }
}

/// A failure reported by the gateway, carrying the normalized response body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: StatusCode,
    pub kind: ApiErrorKind,
    pub body: Document,
}

/// The `error` envelope the gateway wraps failures in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Vec<String>,
    #[serde(default)]
    pub field_errors: Vec<FieldError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub error: String,
}

impl ApiError {
    pub fn from_response(status: StatusCode, body: Document) -> Self {
        ApiError {
            status,
            kind: ApiErrorKind::from_status(status),
            body,
        }
    }

    /// Parses the gateway's `error` envelope, if the body has one.
    pub fn gateway_error(&self) -> Option<GatewayError> {
        self.body
            .get("error")
            .and_then(|e| serde_json::from_value(e.clone()).ok())
    }

    /// Gateway error code, e.g. `"5068"`.
    pub fn code(&self) -> Option<String> {
        self.gateway_error().and_then(|e| e.code)
    }

    pub fn message(&self) -> Option<String> {
        self.gateway_error().and_then(|e| e.message)
    }

    pub fn field_errors(&self) -> Vec<FieldError> {
        self.gateway_error()
            .map(|e| e.field_errors)
            .unwrap_or_default()
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Gateway error: {} ({})", self.kind, self.status.as_u16())?;
        match self.gateway_error() {
            Some(GatewayError {
                code: Some(code),
                message: Some(message),
                ..
            }) => write!(f, ": {code} {message}"),
            Some(GatewayError {
                message: Some(message),
                ..
            }) => write!(f, ": {message}"),
            _ => Ok(()),
        }
    }
}

impl std::error::Error for ApiError {}
