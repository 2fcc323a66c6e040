//! Reporting sinks for block validation failures.
//!
//! Validation errors are always returned to the caller; a sink only decides
//! whether (and where) a human-readable line is emitted as well. In a
//! collective setting every process detects the same failure, so
//! [`RankGatedSink`] lets exactly one process speak.

use std::sync::Mutex;

use tiled_pmap::ProcessGroup;

use crate::BlockExprError;

pub(crate) use tiled_pmap::trace_enabled;

/// Receiver of validation failures.
pub trait DiagnosticSink {
    fn report(&self, error: &BlockExprError);
}

/// Writes to stderr only when `TILED_TRACE=1`. The default sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceSink;

impl DiagnosticSink for TraceSink {
    fn report(&self, error: &BlockExprError) {
        if trace_enabled() {
            eprintln!("tiled-expr: {error}");
        }
    }
}

/// Always writes to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrSink;

impl DiagnosticSink for StderrSink {
    fn report(&self, error: &BlockExprError) {
        eprintln!("tiled-expr: {error}");
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSink;

impl DiagnosticSink for SilentSink {
    fn report(&self, _error: &BlockExprError) {}
}

/// Forwards to `inner` only on the reporting rank of a process group.
#[derive(Debug, Clone)]
pub struct RankGatedSink<S> {
    group: ProcessGroup,
    reporting_rank: usize,
    inner: S,
}

impl<S: DiagnosticSink> RankGatedSink<S> {
    /// Report from rank 0 of `group`.
    pub fn new(group: ProcessGroup, inner: S) -> Self {
        Self::with_reporting_rank(group, 0, inner)
    }

    /// Report from `reporting_rank` of `group`.
    pub fn with_reporting_rank(group: ProcessGroup, reporting_rank: usize, inner: S) -> Self {
        Self {
            group,
            reporting_rank,
            inner,
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: DiagnosticSink> DiagnosticSink for RankGatedSink<S> {
    fn report(&self, error: &BlockExprError) {
        if self.group.rank() == self.reporting_rank {
            self.inner.report(error);
        }
    }
}

/// Keeps every reported message in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    messages: Mutex<Vec<String>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages reported so far, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, error: &BlockExprError) {
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(error.to_string());
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &S {
    fn report(&self, error: &BlockExprError) {
        (**self).report(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_error() -> BlockExprError {
        BlockExprError::RankMismatch {
            expected: 2,
            found: 3,
        }
    }

    #[test]
    fn test_collecting_sink() {
        let sink = CollectingSink::new();
        assert!(sink.is_empty());
        sink.report(&sample_error());
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.messages()[0], "rank mismatch: expected 2, found 3");
    }

    #[test]
    fn test_rank_gated_sink_reports_on_rank_zero_only() {
        let err = sample_error();
        let on_zero = RankGatedSink::new(ProcessGroup::new(0, 3).unwrap(), CollectingSink::new());
        let on_two = RankGatedSink::new(ProcessGroup::new(2, 3).unwrap(), CollectingSink::new());
        on_zero.report(&err);
        on_two.report(&err);
        assert_eq!(on_zero.inner().len(), 1);
        assert!(on_two.inner().is_empty());
    }

    #[test]
    fn test_rank_gated_sink_custom_rank() {
        let sink = RankGatedSink::with_reporting_rank(
            ProcessGroup::new(2, 3).unwrap(),
            2,
            CollectingSink::new(),
        );
        sink.report(&sample_error());
        assert_eq!(sink.inner().len(), 1);
    }

    #[test]
    fn test_silent_sink() {
        SilentSink.report(&sample_error());
    }

    #[test]
    fn test_reference_forwards() {
        fn report_through<S: DiagnosticSink>(sink: S, error: &BlockExprError) {
            sink.report(error);
        }
        let sink = CollectingSink::new();
        report_through(&sink, &sample_error());
        let as_dyn: &dyn DiagnosticSink = &sink;
        report_through(as_dyn, &sample_error());
        assert_eq!(sink.len(), 2);
    }
}
