//! Telemetry consumers.

use crate::types::{Metric, Value};

/// Receives every published telemetry value
pub trait TelemetrySink {
    fn publish(&mut self, metric: Metric, value: Value);
}

/// Records publishes in order
impl TelemetrySink for Vec<(Metric, Value)> {
    fn publish(&mut self, metric: Metric, value: Value) {
        self.push((metric, value));
    }
}

impl<S: TelemetrySink + ?Sized> TelemetrySink for &mut S {
    fn publish(&mut self, metric: Metric, value: Value) {
        (**self).publish(metric, value)
    }
}

/// Adapts a closure into a sink
pub struct FnSink<F>(pub F);

impl<F> TelemetrySink for FnSink<F>
where
    F: FnMut(Metric, Value),
{
    fn publish(&mut self, metric: Metric, value: Value) {
        (self.0)(metric, value)
    }
}

/// Writes every publish to the log at info level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl TelemetrySink for LogSink {
    fn publish(&mut self, metric: Metric, value: Value) {
        log::info!("{}: {}", metric, value);
    }
}
