//! API Request/Response Types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::errors::AppError;
use crate::tools::{AmortizationRow, Course, Hsl, LoanSummary, Rgb, UnitCategory};

/// API Response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
    pub latency_ms: f64,
    pub timestamp: i64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T, latency_ms: f64) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            latency_ms,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(error: ApiError, latency_ms: f64) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            latency_ms,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// API Error
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn rate_limited(retry_after: u64) -> Self {
        Self {
            code: "RATE_LIMITED".to_string(),
            message: format!("Rate limit exceeded. Retry after {} seconds", retry_after),
            details: Some(format!("retry_after: {}", retry_after)),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
            details: None,
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let detail = err.code_str().to_string();
        let mut api_error = match err.code.http_status() {
            400 => Self::bad_request(err.message),
            _ => Self::internal(err.message),
        };
        api_error.details = Some(detail);
        api_error
    }
}

// ============================================
// Loan
// ============================================

#[derive(Debug, Deserialize)]
pub struct LoanRequest {
    pub principal: f64,
    /// Annual interest rate in percent
    pub annual_rate: f64,
    pub tenure_years: u32,
    #[serde(default)]
    pub include_schedule: bool,
}

#[derive(Debug, Serialize)]
pub struct LoanData {
    #[serde(flatten)]
    pub summary: LoanSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<AmortizationRow>>,
}

// ============================================
// Password
// ============================================

#[derive(Debug, Deserialize)]
pub struct PasswordStrengthRequest {
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordGenerateRequest {
    #[serde(default = "default_password_length")]
    pub length: usize,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    #[serde(default = "default_true")]
    pub uppercase: bool,
    #[serde(default = "default_true")]
    pub digits: bool,
    #[serde(default = "default_true")]
    pub symbols: bool,
}

fn default_password_length() -> usize {
    16
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct GeneratedPassword {
    pub password: String,
    pub length: usize,
    pub strength: String,
    pub score: u8,
}

// ============================================
// Unit Conversion
// ============================================

#[derive(Debug, Deserialize)]
pub struct UnitConversionRequest {
    pub category: UnitCategory,
    pub value: f64,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Serialize)]
pub struct UnitConversionData {
    pub category: UnitCategory,
    pub value: f64,
    pub from: String,
    pub to: String,
    pub result: f64,
}

// ============================================
// GPA
// ============================================

#[derive(Debug, Deserialize)]
pub struct GpaRequest {
    #[serde(default)]
    pub percentage: Option<f64>,
    #[serde(default)]
    pub courses: Option<Vec<Course>>,
}

#[derive(Debug, Serialize)]
pub struct GpaData {
    pub gpa: f64,
    pub percentage: f64,
    pub letter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_credits: Option<f64>,
}

// ============================================
// Color
// ============================================

#[derive(Debug, Deserialize)]
pub struct ColorRequest {
    #[serde(default)]
    pub hex: Option<String>,
    #[serde(default)]
    pub rgb: Option<Rgb>,
    #[serde(default)]
    pub hsl: Option<Hsl>,
}

#[derive(Debug, Serialize)]
pub struct ColorData {
    pub hex: String,
    pub rgb: Rgb,
    pub hsl: Hsl,
}

// ============================================
// Stats / Telemetry
// ============================================

#[derive(Debug, Serialize)]
pub struct StatsData {
    pub total_lookups: u64,
    pub fallback_lookups: u64,
    pub fallback_rate: f64,
    pub echo_replacements: u64,
    pub flagged_lookups: u64,
    pub provider_hits: HashMap<String, u64>,
    pub provider_skips: u64,
    pub avg_latency_ms: f64,
    pub uptime_seconds: u64,
    pub api_version: String,
}

// ============================================
// Health Check
// ============================================

#[derive(Debug, Serialize)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}
