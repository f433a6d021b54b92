//! Utils Module - Helper Functions & Shared Utilities
//!
//! Static tables and lookup counters shared across the application.

pub mod constants;
pub mod telemetry;

pub use constants::*;
pub use telemetry::*;
