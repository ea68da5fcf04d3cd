//! Row holders.
//!
//! A holder pairs a row created by the delegate with the adapter position it
//! is currently bound to. The list view keeps holders alive and recycles
//! them. The adapter records positions on bind, offsets them when groups are
//! inserted or removed, and reads them back on click.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::adapter::ExpandableAdapter;
use crate::nested::NestedList;

const NO_POSITION: usize = usize::MAX;

fn load_position(position: &AtomicUsize) -> Option<usize> {
    match position.load(Ordering::Acquire) {
        NO_POSITION => None,
        position => Some(position),
    }
}

/// A parent row and its nested list region.
pub struct ParentHolder<A: ExpandableAdapter> {
    row: A::ParentRow,
    nested: Option<Arc<NestedList<A>>>,
    position: AtomicUsize,
    removed: AtomicBool,
}

impl<A: ExpandableAdapter> ParentHolder<A> {
    pub(crate) fn new(row: A::ParentRow, nested: Option<Arc<NestedList<A>>>) -> Arc<Self> {
        Arc::new(Self {
            row,
            nested,
            position: AtomicUsize::new(NO_POSITION),
            removed: AtomicBool::new(false),
        })
    }

    /// The row produced by the delegate.
    pub fn row(&self) -> &A::ParentRow {
        &self.row
    }

    /// The nested list found when the row was created, if any.
    pub fn nested_list(&self) -> Option<&Arc<NestedList<A>>> {
        self.nested.as_ref()
    }

    /// The position of the group this row shows.
    ///
    /// Follows inserts and removals made since the row was bound. `None` if
    /// the row was never bound or its group has been removed.
    pub fn adapter_position(&self) -> Option<usize> {
        if self.is_removed() {
            return None;
        }
        load_position(&self.position)
    }

    /// Returns `true` once the group this row was bound to has been removed.
    ///
    /// Cleared by the next bind.
    pub fn is_removed(&self) -> bool {
        self.removed.load(Ordering::Acquire)
    }

    /// The position last recorded for this row, removed or not.
    pub(crate) fn last_position(&self) -> Option<usize> {
        load_position(&self.position)
    }

    pub(crate) fn set_position(&self, position: usize) {
        self.position.store(position, Ordering::Release);
        self.removed.store(false, Ordering::Release);
    }

    fn offset_for_insert(&self, at: usize) {
        match self.adapter_position() {
            Some(position) if position >= at => self.set_position(position + 1),
            _ => {}
        }
    }

    fn offset_for_remove(&self, at: usize) {
        match self.adapter_position() {
            Some(position) if position == at => self.removed.store(true, Ordering::Release),
            Some(position) if position > at => self.set_position(position - 1),
            _ => {}
        }
    }
}

impl<A: ExpandableAdapter> std::fmt::Debug for ParentHolder<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParentHolder")
            .field("position", &self.last_position())
            .field("removed", &self.is_removed())
            .field("nested", &self.nested)
            .finish_non_exhaustive()
    }
}

/// Parent rows handed out by one adapter, tracked weakly.
///
/// A recycling view shifts rows on insert and remove notifications without
/// rebinding them, so the adapter shifts their recorded positions the same way.
pub(crate) struct ParentRows<A: ExpandableAdapter> {
    rows: Mutex<Vec<Weak<ParentHolder<A>>>>,
}

impl<A: ExpandableAdapter> ParentRows<A> {
    pub(crate) fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn track(&self, holder: &Arc<ParentHolder<A>>) {
        let mut rows = self.rows.lock();
        rows.retain(|row| row.strong_count() > 0);
        rows.push(Arc::downgrade(holder));
    }

    pub(crate) fn group_inserted(&self, at: usize) {
        self.for_each_live(|holder| holder.offset_for_insert(at));
    }

    pub(crate) fn group_removed(&self, at: usize) {
        self.for_each_live(|holder| holder.offset_for_remove(at));
    }

    pub(crate) fn live_count(&self) -> usize {
        self.rows.lock().iter().filter(|row| row.strong_count() > 0).count()
    }

    fn for_each_live(&self, f: impl Fn(&ParentHolder<A>)) {
        let mut rows = self.rows.lock();
        rows.retain(|row| match row.upgrade() {
            Some(holder) => {
                f(&holder);
                true
            }
            None => false,
        });
    }
}

/// A child row inside a nested list.
pub struct ChildHolder<A: ExpandableAdapter> {
    row: A::ChildRow,
    position: AtomicUsize,
}

impl<A: ExpandableAdapter> ChildHolder<A> {
    pub(crate) fn new(row: A::ChildRow) -> Arc<Self> {
        Arc::new(Self {
            row,
            position: AtomicUsize::new(NO_POSITION),
        })
    }

    /// The row produced by the delegate.
    pub fn row(&self) -> &A::ChildRow {
        &self.row
    }

    /// The position within the nested list this row was last bound to.
    pub fn adapter_position(&self) -> Option<usize> {
        load_position(&self.position)
    }

    pub(crate) fn set_position(&self, position: usize) {
        self.position.store(position, Ordering::Release);
    }
}

impl<A: ExpandableAdapter> std::fmt::Debug for ChildHolder<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChildHolder")
            .field("position", &self.adapter_position())
            .finish_non_exhaustive()
    }
}
