use std::collections::HashMap;
use std::time::Instant;

use crate::lighting::domain::lighting_reading::{LightingReading, MeasurementScope};

/// Observer for run-loop events.
///
/// Keeps the loop free of any particular output mechanism; the CLI logs
/// through the `log` facade while tests simply discard everything.
pub trait PipelineLogger {
    /// Called once per processed frame with its reading.
    fn reading(&mut self, frame_index: usize, reading: &LightingReading);

    /// Record how long a named stage took for one frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a point-in-time metric (e.g. brightness, whether a face was measured).
    fn metric(&mut self, name: &str, value: f64);

    fn info(&mut self, message: &str);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Logger that discards all events.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn reading(&mut self, _frame_index: usize, _reading: &LightingReading) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// CLI logger: throttled reading lines plus per-stage timing and metric
/// aggregates reported at the end of the run.
pub struct StdoutPipelineLogger {
    log_every: usize,
    timings: HashMap<String, Vec<f64>>,
    metrics: HashMap<String, Vec<f64>>,
    label_counts: HashMap<&'static str, usize>,
    start_time: Instant,
    frames: usize,
}

impl StdoutPipelineLogger {
    pub fn new(log_every: usize) -> Self {
        Self {
            log_every: log_every.max(1),
            timings: HashMap::new(),
            metrics: HashMap::new(),
            label_counts: HashMap::new(),
            start_time: Instant::now(),
            frames: 0,
        }
    }

    /// Returns the formatted summary, or `None` if nothing was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.frames == 0 && self.timings.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let frames = self.frames;
        let mut lines = vec![format!(
            "Run summary ({frames} frames, {:.1}s total):",
            elapsed_ms / 1000.0
        )];

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let durations = &self.timings[stage];
            let total_ms: f64 = durations.iter().sum();
            let avg_ms = average(durations);
            let pct = if elapsed_ms > 0.0 {
                total_ms / elapsed_ms * 100.0
            } else {
                0.0
            };
            lines.push(format!(
                "  {stage:12}: avg {avg_ms:6.1}ms  total {total_ms:7.0}ms  ({pct:4.1}%)"
            ));
        }

        let mut metric_names: Vec<_> = self.metrics.keys().collect();
        metric_names.sort();
        for name in metric_names {
            lines.push(format!("  {name}: avg {:.1}", average(&self.metrics[name])));
        }

        let mut labels: Vec<_> = self.label_counts.iter().collect();
        labels.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
        for (label, count) in labels {
            lines.push(format!("  {label}: {count} frames"));
        }

        if frames > 0 && elapsed_ms > 0.0 {
            let fps = frames as f64 / (elapsed_ms / 1000.0);
            lines.push(format!("  Throughput: {fps:.1} fps"));
        }

        Some(lines.join("\n"))
    }
}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new(30)
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn reading(&mut self, frame_index: usize, reading: &LightingReading) {
        self.frames += 1;
        *self.label_counts.entry(reading.label.as_str()).or_default() += 1;

        if frame_index % self.log_every == 0 {
            let scope = match reading.scope {
                MeasurementScope::Scene => "scene".to_string(),
                MeasurementScope::Face(f) => {
                    format!("face {}x{} at ({}, {})", f.width, f.height, f.x, f.y)
                }
            };
            log::info!(
                "Frame {frame_index}: {} (brightness {:.2}, std {:.2}, {scope})",
                reading.label,
                reading.brightness,
                reading.std_dev
            );
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics
            .entry(name.to_string())
            .or_default()
            .push(value);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lighting::domain::lighting_label::LightingLabel;
    use crate::shared::region::FaceRegion;

    fn reading(label: LightingLabel) -> LightingReading {
        LightingReading {
            label,
            brightness: 120.0,
            std_dev: 4.0,
            scope: MeasurementScope::Scene,
        }
    }

    #[test]
    fn test_null_logger_all_methods_are_noop() {
        let mut logger = NullPipelineLogger;
        logger.reading(0, &reading(LightingLabel::Dark));
        logger.timing("estimate", 5.0);
        logger.metric("brightness", 3.0);
        logger.info("hello");
        logger.summary();
    }

    #[test]
    fn test_timing_records_values() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.timing("estimate", 20.0);
        logger.timing("estimate", 30.0);
        logger.timing("render", 5.0);

        assert_eq!(logger.timings["estimate"], vec![20.0, 30.0]);
        assert_eq!(logger.timings["render"], vec![5.0]);
        assert!(!logger.timings.contains_key("display"));
    }

    #[test]
    fn test_metric_records_values() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.metric("brightness", 100.0);
        logger.metric("brightness", 110.0);
        assert!((average(&logger.metrics["brightness"]) - 105.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_readings_count_frames_and_labels() {
        let mut logger = StdoutPipelineLogger::new(10);
        for i in 0..5 {
            logger.reading(i, &reading(LightingLabel::Moderate));
        }
        let face = LightingReading {
            scope: MeasurementScope::Face(FaceRegion::new(1, 2, 30, 40)),
            ..reading(LightingLabel::WellLit)
        };
        logger.reading(5, &face);

        assert_eq!(logger.frames, 6);
        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("Run summary (6 frames"));
        assert!(summary.contains("Moderate: 5 frames"));
        assert!(summary.contains("Well Lit: 1 frames"));
        assert!(summary.find("Moderate").unwrap() < summary.find("Well Lit").unwrap());
    }

    #[test]
    fn test_summary_includes_timing_and_metrics() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.reading(0, &reading(LightingLabel::Dark));
        logger.timing("estimate", 20.0);
        logger.metric("face_readings", 1.0);
        logger.metric("face_readings", 0.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("estimate"));
        assert!(summary.contains("face_readings: avg 0.5"));
    }

    #[test]
    fn test_empty_summary_returns_none() {
        assert!(StdoutPipelineLogger::new(10).summary_string().is_none());
    }

    #[test]
    fn test_default_and_zero_throttle() {
        assert_eq!(StdoutPipelineLogger::default().log_every, 30);
        assert_eq!(StdoutPipelineLogger::new(0).log_every, 1);
    }
}
