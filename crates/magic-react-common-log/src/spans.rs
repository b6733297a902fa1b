//! Spans and timing for the scaffolding pipeline.

use std::future::Future;
use std::time::{Duration, Instant};

use tracing::{info_span, Instrument, Span};

/// Span for one pipeline stage (`validate`, `install`, `expand`, ...).
pub fn stage_span(stage: &'static str) -> Span {
    info_span!("stage", name = stage)
}

/// Span for the expansion of one layout.
pub fn layout_span(key: &str) -> Span {
    info_span!("layout", key = %key)
}

/// Span for one external tool invocation.
pub fn tool_span(tool: &'static str, program: &str) -> Span {
    info_span!("tool", name = tool, program = %program)
}

/// Run `future` inside `span`.
pub fn instrument_future<F: Future>(future: F, span: Span) -> impl Future<Output = F::Output> {
    future.instrument(span)
}

/// Timing utility for operations.
pub struct Timer {
    start: Instant,
    operation: &'static str,
}

impl Timer {
    /// Start a new timer.
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }

    /// Complete the timer and record duration.
    pub fn finish(self) -> Duration {
        let duration = self.start.elapsed();
        tracing::debug!(
            operation = %self.operation,
            duration_ms = %duration.as_millis(),
            "operation completed"
        );
        duration
    }
}

/// Macro for timing a block of code.
#[macro_export]
macro_rules! timed {
    ($name:expr, $body:expr) => {{
        let _timer = $crate::spans::Timer::start($name);
        let result = $body;
        _timer.finish();
        result
    }};
}
