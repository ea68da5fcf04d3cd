//! Logging facilities for expandable lists.
//!
//! Everything in this workspace is instrumented with the `tracing` crate. To
//! see logs, install a subscriber in your application:
//!
//! ```ignore
//! use tracing_subscriber::EnvFilter;
//!
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter(EnvFilter::new("expandable_list=debug"))
//!         .init();
//! }
//! ```
//!
//! Each subsystem logs under its own target (see [`targets`]) so that, for
//! example, only group bookkeeping can be enabled with
//! `RUST_LOG=expandable_list::groups=debug`.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Group insertion and removal.
    pub const GROUPS: &str = "expandable_list::groups";
    /// Expansion state transitions (taps and bulk passes).
    pub const EXPANSION: &str = "expandable_list::expansion";
    /// Host attach/detach, row creation and binding.
    pub const BINDING: &str = "expandable_list::binding";
    /// Background worker lifecycle.
    pub const WORKER: &str = "expandable_list::worker";
    /// Signal emission.
    pub const SIGNAL: &str = "expandable_list::signal";
    /// Owner-thread task queue.
    pub const TASK: &str = "expandable_list::task";
    /// Timing spans from [`PerfSpan`](super::PerfSpan).
    pub const PERF: &str = "expandable_list::perf";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Useful for tracking the duration of operations such as the bulk
/// expansion pass.
#[derive(Debug)]
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create and enter a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: targets::PERF, "perf", operation = name);
        Self {
            _span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perf_span() {
        let _span = PerfSpan::new("test_operation");
    }

    #[test]
    fn test_targets_share_prefix() {
        for target in [
            targets::GROUPS,
            targets::EXPANSION,
            targets::BINDING,
            targets::WORKER,
            targets::SIGNAL,
            targets::TASK,
            targets::PERF,
        ] {
            assert!(target.starts_with("expandable_list::"));
        }
    }
}
