//! Observability setup for taskscribe: the global tracing subscriber and its
//! optional OpenTelemetry bridge.

pub mod tracing_setup;
