//! Notification signals emitted by the adapter.

use expandable_list_core::Signal;

/// Signals emitted by an [`ExpandableListAdapter`](crate::ExpandableListAdapter).
///
/// The row signals mirror the notifications a recycling list view expects
/// and are only emitted while a host is attached. `expanded` and `collapsed`
/// are emitted for every tap regardless of attachment.
///
/// All positions are parent-level adapter positions.
pub struct AdapterSignals {
    // -------------------------------------------------------------------------
    // Row signals (attached only)
    // -------------------------------------------------------------------------
    /// Emitted when a single parent row must be rebound.
    pub item_changed: Signal<usize>,

    /// Emitted after a group has been inserted.
    pub item_inserted: Signal<usize>,

    /// Emitted after a group has been removed.
    pub item_removed: Signal<usize>,

    /// Emitted after a bulk expansion pass.
    /// Args: (first row, row count)
    pub item_range_changed: Signal<(usize, usize)>,

    /// Emitted when the view should smoothly scroll to a row.
    pub scroll_requested: Signal<usize>,

    // -------------------------------------------------------------------------
    // Expansion signals (always)
    // -------------------------------------------------------------------------
    /// Emitted when a tap expands a group.
    pub expanded: Signal<usize>,

    /// Emitted when a tap collapses a group.
    pub collapsed: Signal<usize>,
}

impl Default for AdapterSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl AdapterSignals {
    /// Creates a set of signals with no connections.
    pub fn new() -> Self {
        Self {
            item_changed: Signal::new(),
            item_inserted: Signal::new(),
            item_removed: Signal::new(),
            item_range_changed: Signal::new(),
            scroll_requested: Signal::new(),
            expanded: Signal::new(),
            collapsed: Signal::new(),
        }
    }

    /// Emits `expanded` or `collapsed` for `position`.
    pub(crate) fn emit_expansion(&self, position: usize, expanded: bool) {
        if expanded {
            self.expanded.emit(position);
        } else {
            self.collapsed.emit(position);
        }
    }
}

impl std::fmt::Debug for AdapterSignals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterSignals")
            .field("item_changed", &self.item_changed.connection_count())
            .field("item_inserted", &self.item_inserted.connection_count())
            .field("item_removed", &self.item_removed.connection_count())
            .field("item_range_changed", &self.item_range_changed.connection_count())
            .field("scroll_requested", &self.scroll_requested.connection_count())
            .field("expanded", &self.expanded.connection_count())
            .field("collapsed", &self.collapsed.connection_count())
            .finish()
    }
}

static_assertions::assert_impl_all!(AdapterSignals: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_emit_expansion_routes_by_flag() {
        let signals = AdapterSignals::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let expanded_log = log.clone();
        signals.expanded.connect(move |&row| expanded_log.lock().push(("expanded", row)));
        let collapsed_log = log.clone();
        signals.collapsed.connect(move |&row| collapsed_log.lock().push(("collapsed", row)));

        signals.emit_expansion(3, true);
        signals.emit_expansion(1, false);

        assert_eq!(*log.lock(), vec![("expanded", 3), ("collapsed", 1)]);
    }
}
