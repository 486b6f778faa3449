//! Playback metrics collection and reporting.
//!
//! Uses an HDR histogram for start-request latency percentiles.

use crate::config::MetricsConfig;
use crate::playback_state::PlaybackState;
use hdrhistogram::Histogram;
use std::time::{Duration, Instant};

/// Counters kept by the playback controller
#[derive(Debug)]
pub struct PlaybackMetrics {
    /// Time from start request to confirmed playback (milliseconds);
    /// `None` when metrics are disabled
    start_latency_ms: Option<Histogram<u64>>,

    /// Entries into each state, indexed like [`PlaybackState::ALL`]
    entries: [u64; 4],

    /// Intros started while another intro or the reaction was playing
    interrupts: u64,

    /// Start requests refused by the surface
    rejections: u64,

    /// Start requests replaced before they settled
    superseded: u64,

    /// Start requests the surface dropped without answering
    abandoned: u64,

    created: Instant,
}

/// Snapshot of [`PlaybackMetrics`] for display
#[derive(Debug, Clone)]
pub struct MetricsSummary {
    pub start_p50_ms: f64,
    pub start_p99_ms: f64,
    pub idle_entries: u64,
    pub intro_entries: u64,
    pub reaction_entries: u64,
    pub interrupts: u64,
    pub rejections: u64,
    pub superseded: u64,
    pub abandoned: u64,
    pub uptime_secs: f64,
}

impl Default for PlaybackMetrics {
    fn default() -> Self {
        Self::new(&MetricsConfig::default())
    }
}

impl PlaybackMetrics {
    pub fn new(config: &MetricsConfig) -> Self {
        let start_latency_ms = if config.enabled {
            match Histogram::new_with_bounds(1, config.histogram_max_ms, config.histogram_precision)
            {
                Ok(histogram) => Some(histogram),
                Err(e) => {
                    tracing::warn!("Start latency histogram disabled: {}", e);
                    None
                }
            }
        } else {
            None
        };

        Self {
            start_latency_ms,
            entries: [0; 4],
            interrupts: 0,
            rejections: 0,
            superseded: 0,
            abandoned: 0,
            created: Instant::now(),
        }
    }

    /// Record a state change
    pub fn record_transition(&mut self, from: PlaybackState, to: PlaybackState) {
        if let Some(slot) = PlaybackState::ALL.iter().position(|s| *s == to) {
            self.entries[slot] += 1;
        }
        if to.is_intro() && from != PlaybackState::Idle {
            self.interrupts += 1;
        }
    }

    /// Record a confirmed start
    pub fn record_started(&mut self, latency: Duration) {
        if let Some(histogram) = self.start_latency_ms.as_mut() {
            let ms = (latency.as_millis() as u64).max(1);
            if let Err(e) = histogram.record(ms) {
                tracing::warn!("Failed to record start latency: {}", e);
            }
        }
    }

    pub fn record_rejection(&mut self) {
        self.rejections += 1;
    }

    pub fn record_superseded(&mut self) {
        self.superseded += 1;
    }

    pub fn record_abandoned(&mut self) {
        self.abandoned += 1;
    }

    pub fn entries(&self, state: PlaybackState) -> u64 {
        PlaybackState::ALL
            .iter()
            .position(|s| *s == state)
            .map(|slot| self.entries[slot])
            .unwrap_or(0)
    }

    pub fn rejections(&self) -> u64 {
        self.rejections
    }

    pub fn superseded(&self) -> u64 {
        self.superseded
    }

    pub fn interrupts(&self) -> u64 {
        self.interrupts
    }

    /// Get current metrics summary
    pub fn summary(&self) -> MetricsSummary {
        let (start_p50_ms, start_p99_ms) = match &self.start_latency_ms {
            Some(h) if !h.is_empty() => (
                h.value_at_quantile(0.5) as f64,
                h.value_at_quantile(0.99) as f64,
            ),
            _ => (0.0, 0.0),
        };

        MetricsSummary {
            start_p50_ms,
            start_p99_ms,
            idle_entries: self.entries(PlaybackState::Idle),
            intro_entries: self.entries(PlaybackState::IntroPrimary)
                + self.entries(PlaybackState::IntroSecondary),
            reaction_entries: self.entries(PlaybackState::Reaction),
            interrupts: self.interrupts,
            rejections: self.rejections,
            superseded: self.superseded,
            abandoned: self.abandoned,
            uptime_secs: self.created.elapsed().as_secs_f64(),
        }
    }
}

impl MetricsSummary {
    /// One-line form for logs
    pub fn line(&self) -> String {
        format!(
            "Playback Metrics: idle={}, intros={}, reactions={}, interrupts={}, rejected={}, superseded={}, start_p50={:.0}ms",
            self.idle_entries,
            self.intro_entries,
            self.reaction_entries,
            self.interrupts,
            self.rejections,
            self.superseded,
            self.start_p50_ms
        )
    }

    /// Render metrics as UI panel
    pub fn ui_panel(&self, ui: &mut egui::Ui) {
        ui.label("Start latency:");
        ui.indent("start_latency", |ui| {
            ui.monospace(format!("P50: {:.1}ms", self.start_p50_ms));
            ui.monospace(format!("P99: {:.1}ms", self.start_p99_ms));
        });

        ui.label("Transitions:");
        ui.indent("transitions", |ui| {
            ui.monospace(format!("Idle: {}", self.idle_entries));
            ui.monospace(format!("Intros: {}", self.intro_entries));
            ui.monospace(format!("Reactions: {}", self.reaction_entries));
            ui.monospace(format!("Interrupts: {}", self.interrupts));
        });

        ui.label("Start requests:");
        ui.indent("start_requests", |ui| {
            ui.monospace(format!("Rejected: {}", self.rejections));
            ui.monospace(format!("Superseded: {}", self.superseded));
            ui.monospace(format!("Abandoned: {}", self.abandoned));
        });

        ui.label(format!("Uptime: {:.1}s", self.uptime_secs));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_counts() {
        let mut metrics = PlaybackMetrics::default();

        metrics.record_transition(PlaybackState::Idle, PlaybackState::Reaction);
        metrics.record_transition(PlaybackState::Reaction, PlaybackState::IntroPrimary);
        metrics.record_transition(PlaybackState::IntroPrimary, PlaybackState::Idle);

        assert_eq!(metrics.entries(PlaybackState::Reaction), 1);
        assert_eq!(metrics.entries(PlaybackState::IntroPrimary), 1);
        assert_eq!(metrics.entries(PlaybackState::Idle), 1);
        assert_eq!(metrics.interrupts(), 1);
    }

    #[test]
    fn test_intro_from_idle_is_not_interrupt() {
        let mut metrics = PlaybackMetrics::default();
        metrics.record_transition(PlaybackState::Idle, PlaybackState::IntroSecondary);
        assert_eq!(metrics.interrupts(), 0);
    }

    #[test]
    fn test_start_latency_percentiles() {
        let mut metrics = PlaybackMetrics::default();
        for ms in [10, 20, 30, 40] {
            metrics.record_started(Duration::from_millis(ms));
        }

        let summary = metrics.summary();
        assert!(summary.start_p50_ms >= 19.0 && summary.start_p50_ms <= 21.0);
        assert!(summary.start_p99_ms >= 39.0);
    }

    #[test]
    fn test_disabled_metrics_skip_histogram() {
        let config = MetricsConfig {
            enabled: false,
            ..MetricsConfig::default()
        };
        let mut metrics = PlaybackMetrics::new(&config);
        metrics.record_started(Duration::from_millis(50));
        metrics.record_rejection();

        let summary = metrics.summary();
        assert_eq!(summary.start_p50_ms, 0.0);
        assert_eq!(summary.rejections, 1);
    }

    #[test]
    fn test_summary_line() {
        let mut metrics = PlaybackMetrics::default();
        metrics.record_superseded();
        let line = metrics.summary().line();
        assert!(line.contains("superseded=1"));
    }
}
