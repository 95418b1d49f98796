// Intake service metrics for monitoring and observability
//
// This module contains the metrics for the intake service.
// It provides a pluggable exporter interface with StatsD and null backends.

pub mod metrics;
pub mod null;
pub mod statsd;
