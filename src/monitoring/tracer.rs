/*!
 * Tracing Setup
 * Structured logging for the harness and for lock slow paths
 *
 * Features:
 * - EnvFilter driven levels (RUST_LOG)
 * - Optional JSON output for machine parsing
 * - Timed spans for benchmark rounds
 */

use std::time::{Duration, Instant};
use tracing::{debug, info, span, Level};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - WAITLOCK_TRACE_JSON: Enable JSON output (default: false)
///
/// Safe to call more than once; later calls leave the first subscriber in
/// place.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("WAITLOCK_TRACE_JSON")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_current_span(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .compact(),
            )
            .try_init()
    };

    if installed.is_ok() {
        info!(json = use_json, "Structured tracing initialized");
    }
}

/// Timed span for one benchmark round
///
/// Logs the elapsed time at info level when finished (or dropped).
pub struct RoundSpan {
    span: tracing::Span,
    start: Instant,
    label: &'static str,
    finished: bool,
}

impl RoundSpan {
    pub fn new(label: &'static str, threads: usize, iterations: u64) -> Self {
        let span = span!(
            Level::DEBUG,
            "round",
            label = label,
            threads = threads,
            iterations = iterations,
            elapsed_ms = tracing::field::Empty,
        );

        let _entered = span.enter();
        debug!(label = label, "round started");
        drop(_entered);

        Self {
            span,
            start: Instant::now(),
            label,
            finished: false,
        }
    }

    /// Stop the clock, log the result and return the elapsed time
    pub fn finish(mut self) -> Duration {
        self.report()
    }

    fn report(&mut self) -> Duration {
        let elapsed = self.start.elapsed();
        self.finished = true;
        self.span.record("elapsed_ms", elapsed.as_millis() as u64);

        let _entered = self.span.enter();
        info!(
            label = self.label,
            elapsed_ms = elapsed.as_millis() as u64,
            "Inc x with {}: {} ms",
            self.label,
            elapsed.as_millis()
        );
        elapsed
    }
}

impl Drop for RoundSpan {
    fn drop(&mut self) {
        if !self.finished {
            self.report();
        }
    }
}
