//! Telemetry Module
//!
//! In-process counters for identity lookups, served by `GET /v1/stats` and
//! exported on shutdown. No addresses are stored, only counts.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::models::types::RiskFlags;

/// Aggregated statistics for reporting
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TelemetryStats {
    /// Lookups served
    pub total_lookups: u64,
    /// Lookups that ended with the fallback record
    pub fallback_lookups: u64,
    /// Local candidates replaced through an echo service
    pub echo_replacements: u64,
    /// Lookups with at least one risk flag set
    pub flagged_lookups: u64,
    /// Accepted responses per provider label
    pub provider_hits: HashMap<String, u64>,
    /// Provider attempts that were skipped
    pub provider_skips: u64,
    pub avg_latency_ms: f64,
    pub period_start: u64,
    pub period_end: u64,
}

impl TelemetryStats {
    /// Share of lookups that fell back to "Unknown"
    pub fn fallback_rate(&self) -> f64 {
        if self.total_lookups == 0 {
            0.0
        } else {
            self.fallback_lookups as f64 / self.total_lookups as f64
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// One finished lookup, as the collector sees it
#[derive(Debug, Clone)]
pub struct LookupEvent<'a> {
    /// Accepting provider, `None` for fallback
    pub provider: Option<&'a str>,
    pub skipped_attempts: u64,
    pub echo_replaced: bool,
    pub flags: RiskFlags,
    pub latency_ms: u64,
}

/// Main telemetry collector
pub struct TelemetryCollector {
    total_lookups: AtomicU64,
    fallback_lookups: AtomicU64,
    echo_replacements: AtomicU64,
    flagged_lookups: AtomicU64,
    provider_skips: AtomicU64,
    total_latency_ms: AtomicU64,
    provider_hits: RwLock<HashMap<String, u64>>,
    session_start: u64,
    export_dir: PathBuf,
}

impl TelemetryCollector {
    pub fn new() -> Self {
        Self::with_export_dir(PathBuf::from("./telemetry"))
    }

    pub fn with_export_dir(export_dir: PathBuf) -> Self {
        Self {
            total_lookups: AtomicU64::new(0),
            fallback_lookups: AtomicU64::new(0),
            echo_replacements: AtomicU64::new(0),
            flagged_lookups: AtomicU64::new(0),
            provider_skips: AtomicU64::new(0),
            total_latency_ms: AtomicU64::new(0),
            provider_hits: RwLock::new(HashMap::new()),
            session_start: current_timestamp(),
            export_dir,
        }
    }

    pub fn record_lookup(&self, event: LookupEvent<'_>) {
        self.total_lookups.fetch_add(1, Ordering::Relaxed);
        self.total_latency_ms.fetch_add(event.latency_ms, Ordering::Relaxed);
        self.provider_skips.fetch_add(event.skipped_attempts, Ordering::Relaxed);

        if event.echo_replaced {
            self.echo_replacements.fetch_add(1, Ordering::Relaxed);
        }
        if event.flags.any() {
            self.flagged_lookups.fetch_add(1, Ordering::Relaxed);
        }

        match event.provider {
            Some(label) => {
                if let Ok(mut hits) = self.provider_hits.write() {
                    *hits.entry(label.to_string()).or_insert(0) += 1;
                }
            }
            None => {
                self.fallback_lookups.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Get current statistics
    pub fn get_stats(&self) -> TelemetryStats {
        let total_lookups = self.total_lookups.load(Ordering::Relaxed);
        let total_latency = self.total_latency_ms.load(Ordering::Relaxed);

        let avg_latency = if total_lookups > 0 {
            total_latency as f64 / total_lookups as f64
        } else {
            0.0
        };

        let provider_hits = self
            .provider_hits
            .read()
            .map(|hits| hits.clone())
            .unwrap_or_default();

        TelemetryStats {
            total_lookups,
            fallback_lookups: self.fallback_lookups.load(Ordering::Relaxed),
            echo_replacements: self.echo_replacements.load(Ordering::Relaxed),
            flagged_lookups: self.flagged_lookups.load(Ordering::Relaxed),
            provider_hits,
            provider_skips: self.provider_skips.load(Ordering::Relaxed),
            avg_latency_ms: avg_latency,
            period_start: self.session_start,
            period_end: current_timestamp(),
        }
    }

    /// Export current stats to a JSON file
    pub fn export_stats_json(&self) -> Result<PathBuf, std::io::Error> {
        fs::create_dir_all(&self.export_dir)?;

        let stats = self.get_stats();
        let filename = format!("stats_{}.json", current_timestamp());
        let path = self.export_dir.join(filename);

        fs::write(&path, stats.to_json()?)?;

        Ok(path)
    }

    /// Reset counters (for new reporting period)
    #[allow(dead_code)]
    pub fn reset(&self) {
        self.total_lookups.store(0, Ordering::Relaxed);
        self.fallback_lookups.store(0, Ordering::Relaxed);
        self.echo_replacements.store(0, Ordering::Relaxed);
        self.flagged_lookups.store(0, Ordering::Relaxed);
        self.provider_skips.store(0, Ordering::Relaxed);
        self.total_latency_ms.store(0, Ordering::Relaxed);

        if let Ok(mut hits) = self.provider_hits.write() {
            hits.clear();
        }
    }
}

impl Default for TelemetryCollector {
    fn default() -> Self {
        Self::new()
    }
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
