//! Metrics for Gemini API calls.

use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram, Meter},
};
use std::sync::OnceLock;

static METRICS: OnceLock<ModelMetrics> = OnceLock::new();

/// Request, error and latency instruments, labelled by call and model.
#[derive(Clone)]
pub struct ModelMetrics {
    _meter: Meter,
    /// Total API requests
    pub requests: Counter<u64>,
    /// Failed API requests
    pub errors: Counter<u64>,
    /// API call duration in seconds
    pub duration: Histogram<f64>,
    /// Video status checks
    pub polls: Counter<u64>,
}

impl ModelMetrics {
    fn init() -> Self {
        let meter = global::meter("cinereel_models");

        Self {
            _meter: meter.clone(),
            requests: meter
                .u64_counter("gemini.requests")
                .with_description("Total Gemini API requests")
                .build(),
            errors: meter
                .u64_counter("gemini.errors")
                .with_description("Failed Gemini API requests")
                .build(),
            duration: meter
                .f64_histogram("gemini.duration")
                .with_unit("seconds")
                .with_description("Gemini API call duration")
                .build(),
            polls: meter
                .u64_counter("gemini.video.polls")
                .with_description("Video operation status checks")
                .build(),
        }
    }

    /// Get the global instance.
    pub fn get() -> &'static Self {
        METRICS.get_or_init(Self::init)
    }

    /// Record a successful call.
    pub fn record_request(&self, call: &str, model: &str, duration_secs: f64) {
        let labels = &[
            KeyValue::new("call", call.to_string()),
            KeyValue::new("model", model.to_string()),
        ];
        self.requests.add(1, labels);
        self.duration.record(duration_secs, labels);
    }

    /// Record a failed call.
    pub fn record_error(&self, call: &str, model: &str, error_type: &str) {
        let labels = &[
            KeyValue::new("call", call.to_string()),
            KeyValue::new("model", model.to_string()),
            KeyValue::new("error_type", error_type.to_string()),
        ];
        self.requests.add(1, &labels[..2]);
        self.errors.add(1, labels);
    }

    /// Record one status check of a video operation.
    pub fn record_poll(&self) {
        self.polls.add(1, &[]);
    }
}
