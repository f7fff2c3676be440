/*!
 * Monitoring
 * Structured tracing setup and timed spans for the benchmark harness
 */

mod tracer;

pub use tracer::{init_tracing, RoundSpan};
