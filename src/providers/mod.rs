//! Providers Module - External Data Sources
//!
//! Geolocation providers queried by the resolver pool, and the echo
//! services used to discover a public address for local candidates.

pub mod echo;
pub mod geo;

pub use echo::*;
pub use geo::*;
