//! API Request Handlers

use axum::{
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use super::middleware::{RateLimitConfig, RateLimiter};
use super::types::*;
use crate::core::pipeline::IdentityPipeline;
use crate::models::errors::AppError;
use crate::tools::{color, gpa, loan, password, units};

/// Shared application state
pub struct AppState {
    pub pipeline: Arc<IdentityPipeline>,
    pub rate_limiter: Arc<RateLimiter>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(pipeline: Arc<IdentityPipeline>, rate_limit: RateLimitConfig) -> Self {
        Self {
            pipeline,
            rate_limiter: Arc::new(RateLimiter::new(rate_limit)),
            start_time: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

type ToolResult<T> = Result<Json<ApiResponse<T>>, (StatusCode, Json<ApiResponse<()>>)>;

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Map a tool failure onto the error envelope
fn tool_error(err: AppError, start: Instant) -> (StatusCode, Json<ApiResponse<()>>) {
    let status = StatusCode::from_u16(err.code.http_status()).unwrap_or(StatusCode::BAD_REQUEST);
    (status, Json(ApiResponse::error(err.into(), elapsed_ms(start))))
}

fn bad_request(message: &str, start: Instant) -> (StatusCode, Json<ApiResponse<()>>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::error(ApiError::bad_request(message), elapsed_ms(start))),
    )
}

// ============================================
// Identity Lookup
// ============================================

/// `GET /api/my-ip`: bare `IdentityReport`, or `500 {"error": ...}`
pub async fn my_ip(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let result = state.pipeline.lookup_headers(&headers).await;

    match serde_json::to_value(&result.report) {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => {
            error!("❌ Failed to serialize identity report: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

// ============================================
// Health Check
// ============================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthData>> {
    let start = Instant::now();

    let data = HealthData {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
    };

    Json(ApiResponse::success(data, elapsed_ms(start)))
}

// ============================================
// Stats
// ============================================

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<ApiResponse<StatsData>> {
    let start = Instant::now();
    let stats = state.pipeline.telemetry().get_stats();
    let fallback_rate = stats.fallback_rate();

    let data = StatsData {
        total_lookups: stats.total_lookups,
        fallback_lookups: stats.fallback_lookups,
        fallback_rate,
        echo_replacements: stats.echo_replacements,
        flagged_lookups: stats.flagged_lookups,
        provider_hits: stats.provider_hits,
        provider_skips: stats.provider_skips,
        avg_latency_ms: stats.avg_latency_ms,
        uptime_seconds: state.uptime_seconds(),
        api_version: env!("CARGO_PKG_VERSION").to_string(),
    };

    info!(
        "📊 Lookup Stats: {} lookups, {:.1}% fallback, {} rate-limited clients tracked",
        data.total_lookups,
        fallback_rate * 100.0,
        state.rate_limiter.tracked_clients()
    );

    Json(ApiResponse::success(data, elapsed_ms(start)))
}

// ============================================
// Tools
// ============================================

pub async fn loan_calculator(Json(req): Json<LoanRequest>) -> ToolResult<LoanData> {
    let start = Instant::now();

    let summary = loan::summarize(req.principal, req.annual_rate, req.tenure_years)
        .map_err(|e| tool_error(e, start))?;

    let schedule = if req.include_schedule {
        Some(
            loan::amortization_schedule(req.principal, req.annual_rate, summary.months)
                .map_err(|e| tool_error(e, start))?,
        )
    } else {
        None
    };

    Ok(Json(ApiResponse::success(
        LoanData { summary, schedule },
        elapsed_ms(start),
    )))
}

pub async fn password_strength(
    Json(req): Json<PasswordStrengthRequest>,
) -> ToolResult<password::PasswordStrength> {
    let start = Instant::now();
    let strength = password::analyze(&req.password);
    Ok(Json(ApiResponse::success(strength, elapsed_ms(start))))
}

pub async fn password_generate(Json(req): Json<PasswordGenerateRequest>) -> ToolResult<GeneratedPassword> {
    let start = Instant::now();

    let options = password::GeneratorOptions {
        length: req.length,
        lowercase: req.lowercase,
        uppercase: req.uppercase,
        digits: req.digits,
        symbols: req.symbols,
    };

    let generated = {
        let mut rng = rand::thread_rng();
        password::generate(&options, &mut rng).map_err(|e| tool_error(e, start))?
    };
    let strength = password::analyze(&generated);

    Ok(Json(ApiResponse::success(
        GeneratedPassword {
            length: generated.chars().count(),
            password: generated,
            strength: strength.label,
            score: strength.score,
        },
        elapsed_ms(start),
    )))
}

pub async fn convert_unit(Json(req): Json<UnitConversionRequest>) -> ToolResult<UnitConversionData> {
    let start = Instant::now();

    let result = units::convert(req.category, req.value, &req.from, &req.to)
        .map_err(|e| tool_error(e, start))?;

    Ok(Json(ApiResponse::success(
        UnitConversionData {
            category: req.category,
            value: req.value,
            from: req.from,
            to: req.to,
            result,
        },
        elapsed_ms(start),
    )))
}

pub async fn gpa_calculator(Json(req): Json<GpaRequest>) -> ToolResult<GpaData> {
    let start = Instant::now();

    let data = match (req.percentage, req.courses) {
        (Some(percentage), None) => {
            let gpa = gpa::percentage_to_gpa(percentage).map_err(|e| tool_error(e, start))?;
            GpaData {
                gpa,
                percentage,
                letter: gpa::letter_grade(percentage).to_string(),
                total_credits: None,
            }
        }
        (None, Some(courses)) => {
            let gpa = gpa::weighted_gpa(&courses).map_err(|e| tool_error(e, start))?;
            let percentage = gpa::gpa_to_percentage(gpa).map_err(|e| tool_error(e, start))?;
            GpaData {
                gpa,
                percentage,
                letter: gpa::letter_grade(percentage).to_string(),
                total_credits: Some(courses.iter().map(|c| c.credits).sum()),
            }
        }
        _ => return Err(bad_request("Provide exactly one of `percentage` or `courses`", start)),
    };

    Ok(Json(ApiResponse::success(data, elapsed_ms(start))))
}

pub async fn color_converter(Json(req): Json<ColorRequest>) -> ToolResult<ColorData> {
    let start = Instant::now();

    let rgb = match (req.hex, req.rgb, req.hsl) {
        (Some(hex), None, None) => color::parse_hex(&hex).map_err(|e| tool_error(e, start))?,
        (None, Some(rgb), None) => rgb,
        (None, None, Some(hsl)) => color::hsl_to_rgb(hsl).map_err(|e| tool_error(e, start))?,
        _ => return Err(bad_request("Provide exactly one of `hex`, `rgb` or `hsl`", start)),
    };

    Ok(Json(ApiResponse::success(
        ColorData {
            hex: color::to_hex(rgb),
            rgb,
            hsl: color::rgb_to_hsl(rgb),
        },
        elapsed_ms(start),
    )))
}
