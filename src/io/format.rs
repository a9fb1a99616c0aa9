//! Format definitions for CLI output.
//!
//! Provides a single JSON envelope for success and error responses so
//! scripts can branch on `status`/`code` without parsing text output.

use crate::error::{BuildError, LoadError, QueryError};
use crate::io::exit_code::ExitCode;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable tables (default)
    Text,
    /// JSON for tool integration
    Json,
}

impl OutputFormat {
    /// Create format from JSON flag.
    #[must_use]
    pub fn from_json_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }

    /// Check if format is JSON.
    #[must_use]
    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Standard JSON response format.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonResponse<T = serde_json::Value>
where
    T: Serialize,
{
    /// Status: "success" or "error"
    pub status: String,

    /// Result code (e.g., "OK", "UNRESOLVED", "PARSE_ERROR")
    pub code: String,

    /// Human-readable message
    pub message: String,

    /// Actual data payload (only for success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Error details and suggestions (only for errors)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetails>,

    /// Exit code for shell scripts
    pub exit_code: u8,

    /// Metadata (execution time, version, etc.)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

/// Error details for JSON responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Recovery suggestions
    pub suggestions: Vec<String>,
    /// Additional error context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
}

/// Response metadata.
#[derive(Debug, Serialize, Deserialize)]
pub struct ResponseMeta {
    /// Version of the tool
    pub version: String,
    /// Timestamp of the response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Execution time in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
}

impl ResponseMeta {
    /// Metadata stamped with the crate version and the current time.
    pub fn now(execution_time_ms: Option<u64>) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Some(format_utc_timestamp()),
            execution_time_ms,
        }
    }
}

impl<T> JsonResponse<T>
where
    T: Serialize,
{
    /// Create a success response with data.
    pub fn success(data: T) -> Self {
        Self {
            status: "success".to_string(),
            code: "OK".to_string(),
            message: "Operation completed successfully".to_string(),
            data: Some(data),
            error: None,
            exit_code: ExitCode::Success as u8,
            meta: None,
        }
    }

    /// Add metadata to the response.
    pub fn with_meta(mut self, meta: ResponseMeta) -> Self {
        self.meta = Some(meta);
        self
    }
}

impl JsonResponse<serde_json::Value> {
    /// Create a generic error response.
    pub fn error(code: ExitCode, message: &str, suggestions: Vec<&str>) -> Self {
        Self::failure(
            format!("{code:?}").to_uppercase(),
            message.to_string(),
            suggestions,
            code,
        )
    }

    /// Create an error response from a failed query.
    pub fn from_query_error(error: &QueryError) -> Self {
        let mut response = Self::failure(
            error.status_code().to_string(),
            error.to_string(),
            error.recovery_suggestions(),
            ExitCode::from_query_error(error),
        );
        if let QueryError::Unresolved { query } = error {
            if let Some(details) = response.error.as_mut() {
                details.context = Some(serde_json::json!({ "query": query }));
            }
        }
        response
    }

    /// Create an error response from a failed load.
    pub fn from_load_error(error: &LoadError) -> Self {
        Self::failure(
            error.status_code().to_string(),
            error.to_string(),
            error.recovery_suggestions(),
            ExitCode::from_load_error(error),
        )
    }

    /// Create an error response from a failed build.
    pub fn from_build_error(error: &BuildError) -> Self {
        Self::failure(
            error.status_code().to_string(),
            error.to_string(),
            Vec::new(),
            ExitCode::from_build_error(error),
        )
    }

    fn failure(code: String, message: String, suggestions: Vec<&str>, exit: ExitCode) -> Self {
        Self {
            status: "error".to_string(),
            code,
            message,
            data: None,
            error: Some(ErrorDetails {
                suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
                context: None,
            }),
            exit_code: exit as u8,
            meta: None,
        }
    }
}

/// Format current time as UTC timestamp string.
///
/// Returns a string in the format "YYYY-MM-DD HH:MM:SS UTC".
///
/// # Example
/// ```
/// use whiskyvec::io::format::format_utc_timestamp;
///
/// let timestamp = format_utc_timestamp();
/// assert!(timestamp.ends_with(" UTC"));
/// ```
pub fn format_utc_timestamp() -> String {
    let now = Utc::now();
    now.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}
