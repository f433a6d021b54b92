//! MyIP Toolkit Library
//!
//! Network-identity aggregator: works out who is calling (forwarding
//! headers, echo-service fallback), asks geolocation providers about that
//! address in a fixed order, normalizes whichever answer is usable and
//! derives heuristic risk flags:
//! - Proxy / private-range origin
//! - Known VPN autonomous systems
//! - Cloud hosting networks
//!
//! Also ships the small calculators served by the same API (loan EMI,
//! password strength, unit, GPA and color conversion).

pub mod api;
pub mod core;
pub mod models;
pub mod providers;
pub mod tools;
pub mod utils;

pub use crate::core::classifier::classify;
pub use crate::core::extractor::{extract_candidate, is_local_address};
pub use crate::core::normalizer::{normalize, RawProviderResponse};
pub use crate::core::pipeline::{IdentityPipeline, LookupResult};
pub use crate::models::config::{EchoServiceDescriptor, LookupConfig, ProviderDescriptor, ServerConfig};
pub use crate::models::errors::{AppError, AppResult, ErrorCode};
pub use crate::models::types::{
    AddressFamily, Connection, IdentityReport, Location, NormalizedIdentityRecord, RiskFlags,
};
pub use crate::providers::echo::EchoClient;
pub use crate::providers::geo::{AttemptStatus, ProviderAttempt, ResolveOutcome, ResolverPool};
pub use crate::utils::constants::LOOPBACK_FALLBACK;
pub use crate::utils::telemetry::{LookupEvent, TelemetryCollector, TelemetryStats};
