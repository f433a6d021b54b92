//! Core Module - Identity Lookup Pipeline
//!
//! Extractor → Resolver Pool → Normalizer → Classifier.

pub mod classifier;
pub mod extractor;
pub mod normalizer;
pub mod pipeline;

pub use classifier::*;
pub use extractor::*;
pub use normalizer::*;
pub use pipeline::*;
