//! Nested child lists inside parent rows.
//!
//! A parent row exposes its direct child views through [`ParentRowView`].
//! One of them may be a [`NestedList`], the region that shows the group's
//! children. The adapter finds it once when the row is created and then
//! drives its visibility, layout and child adapter on every bind.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use expandable_list_core::logging::targets;
use parking_lot::Mutex;

use crate::adapter::ExpandableAdapter;
use crate::child_adapter::ChildListAdapter;
use crate::host::LinearLayout;

/// A direct child view of a parent row.
pub enum ViewNode<A: ExpandableAdapter> {
    /// The region that displays the group's children.
    NestedList(Arc<NestedList<A>>),
    /// Any other view (labels, icons, dividers).
    Other,
}

impl<A: ExpandableAdapter> Clone for ViewNode<A> {
    fn clone(&self) -> Self {
        match self {
            Self::NestedList(list) => Self::NestedList(Arc::clone(list)),
            Self::Other => Self::Other,
        }
    }
}

impl<A: ExpandableAdapter> std::fmt::Debug for ViewNode<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NestedList(list) => f.debug_tuple("NestedList").field(list).finish(),
            Self::Other => f.write_str("Other"),
        }
    }
}

/// The visual hierarchy of a parent row, one level deep.
pub trait ParentRowView<A: ExpandableAdapter> {
    /// Returns the row's direct child views in order.
    fn child_views(&self) -> Vec<ViewNode<A>>;
}

/// The nested list region of a parent row.
///
/// Starts hidden, with no layout and no adapter.
pub struct NestedList<A: ExpandableAdapter> {
    visible: AtomicBool,
    layout: Mutex<Option<LinearLayout>>,
    adapter: Mutex<Option<Arc<ChildListAdapter<A>>>>,
}

impl<A: ExpandableAdapter> Default for NestedList<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: ExpandableAdapter> NestedList<A> {
    /// Creates an empty, hidden nested list.
    pub fn new() -> Self {
        Self {
            visible: AtomicBool::new(false),
            layout: Mutex::new(None),
            adapter: Mutex::new(None),
        }
    }

    /// Returns `true` if the children are shown.
    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::Acquire)
    }

    /// Returns the installed layout.
    pub fn layout(&self) -> Option<LinearLayout> {
        *self.layout.lock()
    }

    /// Returns the child adapter installed by the most recent bind.
    pub fn adapter(&self) -> Option<Arc<ChildListAdapter<A>>> {
        self.adapter.lock().clone()
    }

    pub(crate) fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::Release);
    }

    pub(crate) fn set_layout(&self, layout: LinearLayout) {
        *self.layout.lock() = Some(layout);
    }

    pub(crate) fn set_adapter(&self, adapter: Arc<ChildListAdapter<A>>) {
        *self.adapter.lock() = Some(adapter);
    }
}

impl<A: ExpandableAdapter> std::fmt::Debug for NestedList<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NestedList")
            .field("visible", &self.is_visible())
            .field("layout", &self.layout())
            .field("has_adapter", &self.adapter.lock().is_some())
            .finish()
    }
}

/// Finds the first nested list among a row's direct child views.
///
/// Deeper descendants are not searched. Logs a warning when the row has no
/// nested list; such a row still binds but never shows children.
pub fn find_nested_list<A: ExpandableAdapter>(row: &A::ParentRow) -> Option<Arc<NestedList<A>>> {
    let found = row.child_views().into_iter().find_map(|node| match node {
        ViewNode::NestedList(list) => Some(list),
        ViewNode::Other => None,
    });

    if found.is_none() {
        tracing::warn!(
            target: targets::BINDING,
            "nested list for expanded items not found in parent row"
        );
    }

    found
}
