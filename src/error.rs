//! Unified error types for region-nearby.
//!
//! Defines [`RegionNearbyError`] (the main crate error enum) and
//! [`ValidationError`] for config validation failures. Every variant maps
//! to an HTTP status through [`RegionNearbyError::status_code`], which the
//! forwarding endpoint uses when a request cannot be served.

use std::path::PathBuf;

use axum::http::StatusCode;

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub section: String,
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "  {}: {}: {}", self.section, self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " ({suggestion})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

fn format_errors(errors: &[ValidationError]) -> String {
    use std::fmt::Write;
    let mut buf = String::new();
    for (i, e) in errors.iter().enumerate() {
        if i > 0 {
            buf.push('\n');
        }
        // write! to String is infallible
        let _ = write!(buf, "{e}");
    }
    buf
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RegionNearbyError {
    #[error("Config file not found: {}", path.display())]
    ConfigFileNotFound { path: PathBuf },

    #[error("Config parse error in {path}:\n  {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Config validation failed:\n{}", format_errors(.errors))]
    ConfigValidation { errors: Vec<ValidationError> },

    #[error("Unsupported config format: '{0}'")]
    UnsupportedFormat(String),

    #[error("Invalid address: {0}")]
    AddressParse(#[from] std::net::AddrParseError),

    #[error("Invalid URI: {source}")]
    UriParse {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("HTTP request failed: {source}")]
    HttpRequest {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Upstream did not respond within {timeout_ms}ms")]
    UpstreamTimeout { timeout_ms: u64 },

    #[error("Request body exceeds the configured limit")]
    PayloadTooLarge,

    #[error("File already exists: {}", path.display())]
    FileExists { path: PathBuf },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Health check failed with status {0}")]
    HealthCheckFailed(StatusCode),

    #[error("Invalid AWS region: '{0}'")]
    InvalidAwsRegion(String),

    #[error("Invalid edge region: '{0}'")]
    InvalidEdgeRegion(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("No location available: pass latitude/longitude or configure an edge region")]
    NoLocation,

    #[error("Connection has no remote address; serve with connect info enabled")]
    MissingRemoteAddr,

    #[error("Remote host '{0}' cannot be encoded as a header value")]
    InvalidRemoteHost(String),
}

impl RegionNearbyError {
    /// HTTP status reported to a client whose request failed with this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidAwsRegion(_)
            | Self::InvalidEdgeRegion(_)
            | Self::InvalidCoordinates(_)
            | Self::NoLocation => StatusCode::BAD_REQUEST,
            Self::HttpRequest { .. } | Self::UriParse { .. } => StatusCode::BAD_GATEWAY,
            Self::UpstreamTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
