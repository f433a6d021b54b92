//! Centralized Error Handling Module
//!
//! Every failure carries a unique code so skipped providers and rejected
//! tool inputs are easy to grep for in the logs.
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - UPSTREAM_xxx: geolocation provider errors (always recovered locally)
//! - ECHO_xxx: echo-my-IP errors (always recovered locally)
//! - API_xxx: API errors
//! - TOOL_xxx: calculator input errors
//! - CFG_xxx: configuration errors

use std::fmt;

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging/monitoring
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Upstream Provider Errors
    // ============================================
    /// Provider connection failed
    UpstreamConnectionFailed,
    /// Provider did not answer within its budget
    UpstreamTimeout,
    /// Provider rate limited us (HTTP 429)
    UpstreamRateLimited,
    /// Provider answered with another non-2xx status
    UpstreamHttpError,
    /// Body was not a JSON object
    UpstreamInvalidResponse,
    /// JSON object had no `ip` / `query` / `ipAddress` field
    UpstreamMissingIp,
    /// JSON object carried an explicit `error` field
    UpstreamSemanticError,

    // ============================================
    // Echo Service Errors
    // ============================================
    /// Echo service unreachable, slow, or returned garbage
    EchoFailed,

    // ============================================
    // API Errors
    // ============================================
    /// Invalid request format
    ApiBadRequest,
    /// Rate limit exceeded
    ApiRateLimited,
    /// Internal server error
    ApiInternalError,

    // ============================================
    // Tool Errors
    // ============================================
    /// Calculator input out of range
    ToolInvalidInput,
    /// Unit or colour notation not recognised
    ToolUnsupportedUnit,

    // ============================================
    // Configuration Errors
    // ============================================
    /// Invalid configuration value
    ConfigInvalidValue,

    // ============================================
    // Generic Errors
    // ============================================
    Unknown,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UpstreamConnectionFailed => "UPSTREAM_CONNECTION_FAILED",
            Self::UpstreamTimeout => "UPSTREAM_TIMEOUT",
            Self::UpstreamRateLimited => "UPSTREAM_RATE_LIMITED",
            Self::UpstreamHttpError => "UPSTREAM_HTTP_ERROR",
            Self::UpstreamInvalidResponse => "UPSTREAM_INVALID_RESPONSE",
            Self::UpstreamMissingIp => "UPSTREAM_MISSING_IP",
            Self::UpstreamSemanticError => "UPSTREAM_SEMANTIC_ERROR",

            Self::EchoFailed => "ECHO_FAILED",

            Self::ApiBadRequest => "API_BAD_REQUEST",
            Self::ApiRateLimited => "API_RATE_LIMITED",
            Self::ApiInternalError => "API_INTERNAL_ERROR",

            Self::ToolInvalidInput => "TOOL_INVALID_INPUT",
            Self::ToolUnsupportedUnit => "TOOL_UNSUPPORTED_UNIT",

            Self::ConfigInvalidValue => "CFG_INVALID_VALUE",

            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// Get HTTP status code for API responses
    pub fn http_status(&self) -> u16 {
        match self {
            Self::ApiBadRequest
            | Self::ToolInvalidInput
            | Self::ToolUnsupportedUnit
            | Self::ConfigInvalidValue => 400,
            Self::ApiRateLimited | Self::UpstreamRateLimited => 429,
            _ => 500,
        }
    }

    /// Transient failures; a later request may well succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::UpstreamTimeout
                | Self::UpstreamRateLimited
                | Self::UpstreamConnectionFailed
                | Self::UpstreamHttpError
                | Self::EchoFailed
        )
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    pub fn upstream_rate_limited(label: &str) -> Self {
        Self::new(
            ErrorCode::UpstreamRateLimited,
            format!("{} rate limited (HTTP 429)", label),
        )
    }

    pub fn upstream_http(label: &str, status: u16) -> Self {
        Self::new(
            ErrorCode::UpstreamHttpError,
            format!("{} returned HTTP {}", label, status),
        )
    }

    pub fn upstream_invalid(label: &str, msg: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::UpstreamInvalidResponse,
            format!("{} returned an unreadable body: {}", label, msg),
        )
    }

    pub fn upstream_missing_ip(label: &str) -> Self {
        Self::new(
            ErrorCode::UpstreamMissingIp,
            format!("{} payload has no ip/query/ipAddress field", label),
        )
    }

    pub fn upstream_semantic(label: &str, detail: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::UpstreamSemanticError,
            format!("{} reported an error: {}", label, detail.into()),
        )
    }

    pub fn echo_failed(label: &str, msg: impl fmt::Display) -> Self {
        Self::new(ErrorCode::EchoFailed, format!("{}: {}", label, msg))
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiBadRequest, msg)
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ToolInvalidInput, msg)
    }

    pub fn unsupported_unit(unit: &str) -> Self {
        Self::new(
            ErrorCode::ToolUnsupportedUnit,
            format!("Unsupported unit or notation: {}", unit),
        )
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalidValue, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiInternalError, msg)
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        Self::new(ErrorCode::Unknown, err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::new(ErrorCode::UpstreamTimeout, "Request timeout")
        } else if err.is_connect() {
            Self::new(ErrorCode::UpstreamConnectionFailed, "Connection failed")
        } else if err.is_decode() {
            Self::with_source(ErrorCode::UpstreamInvalidResponse, "Body decode failed", err)
        } else {
            Self::new(ErrorCode::UpstreamConnectionFailed, err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorCode::UpstreamInvalidResponse, "JSON parse error", err)
    }
}
