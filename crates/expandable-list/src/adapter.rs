//! List-view binding layer.
//!
//! [`ExpandableListAdapter`] sits between a recycling list view
//! ([`ListHost`]) and a concrete [`ExpandableAdapter`] that knows how to
//! create and populate rows. It owns the groups, resolves taps through the
//! expansion state machine and tells the host which rows to rebind.
//!
//! # Threading
//!
//! The thread that builds the adapter is its owner. Taps, binds, group edits
//! and attach/detach must happen there, and every host notification is
//! delivered there. Bulk expansion passes run on a dedicated worker thread;
//! their refresh is queued back to the owner and delivered by
//! [`process_pending`](ExpandableListAdapter::process_pending).
//!
//! Taps and group edits are ordered after every bulk pass requested before
//! them: while a pass is queued or running they wait for the worker first.
//!
//! Host notifications are always emitted after the group lock has been
//! released, so a host may call back into the adapter from a notification.

use std::sync::Arc;

use expandable_list_core::logging::targets;
use expandable_list_core::{ConnectionId, OwnerThread, PerfSpan, TaskQueue, Worker};
use parking_lot::Mutex;

use crate::child_adapter::ChildListAdapter;
use crate::config::{AdapterBuilder, AdapterConfig};
use crate::error::{AdapterError, Result};
use crate::expansion::{ExpansionPolicy, TapOutcome};
use crate::group::Group;
use crate::group_list::GroupList;
use crate::holder::{ParentHolder, ParentRows};
use crate::host::{LinearLayout, ListHost};
use crate::nested::{ParentRowView, find_nested_list};
use crate::signals::AdapterSignals;

/// Identifies a kind of row so hosts can recycle rows of the same shape.
pub type ViewType = usize;

/// The row-rendering side of an expandable list.
///
/// Implementors create and populate rows; the generic
/// [`ExpandableListAdapter`] decides when. The click callbacks are pure
/// notifications that run after the adapter has updated its own state.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use expandable_list::{ExpandableAdapter, NestedList, ParentRowView, ViewNode};
///
/// struct Row {
///     nested: Arc<NestedList<Labels>>,
/// }
///
/// impl ParentRowView<Labels> for Row {
///     fn child_views(&self) -> Vec<ViewNode<Labels>> {
///         vec![ViewNode::Other, ViewNode::NestedList(self.nested.clone())]
///     }
/// }
///
/// struct Labels;
///
/// impl ExpandableAdapter for Labels {
///     type Parent = String;
///     type Child = String;
///     type ParentRow = Row;
///     type ChildRow = parking_lot::Mutex<String>;
///
///     fn create_parent_row(&self, _view_type: usize) -> Row {
///         Row { nested: Arc::new(NestedList::new()) }
///     }
///
///     fn bind_parent_row(&self, _row: &Row, _parent: &String, _position: usize) {}
///
///     fn create_child_row(&self, _view_type: usize) -> parking_lot::Mutex<String> {
///         parking_lot::Mutex::new(String::new())
///     }
///
///     fn bind_child_row(
///         &self,
///         row: &parking_lot::Mutex<String>,
///         child: &String,
///         _parent: &String,
///         _position: usize,
///     ) {
///         *row.lock() = child.clone();
///     }
/// }
/// ```
pub trait ExpandableAdapter: Sized + Send + Sync + 'static {
    /// Parent payload type.
    type Parent: Send + Sync + 'static;
    /// Child payload type.
    type Child: Send + Sync + 'static;
    /// Row handle for parent rows.
    type ParentRow: ParentRowView<Self> + Send + Sync + 'static;
    /// Row handle for child rows.
    type ChildRow: Send + Sync + 'static;

    /// Creates an empty parent row.
    fn create_parent_row(&self, view_type: ViewType) -> Self::ParentRow;

    /// Populates a parent row for the group at `position`.
    fn bind_parent_row(&self, row: &Self::ParentRow, parent: &Self::Parent, position: usize);

    /// Creates an empty child row.
    fn create_child_row(&self, view_type: ViewType) -> Self::ChildRow;

    /// Populates a child row for the child at `position` within its group.
    fn bind_child_row(
        &self,
        row: &Self::ChildRow,
        child: &Self::Child,
        parent: &Self::Parent,
        position: usize,
    );

    /// Called after a tap on a parent row has been resolved.
    fn on_expandable_clicked(&self, _row: &Self::ParentRow, _parent: &Self::Parent) {}

    /// Called when a child row is tapped.
    fn on_expanded_clicked(
        &self,
        _parent_row: &Self::ParentRow,
        _child_row: &Self::ChildRow,
        _child: &Self::Child,
        _parent: &Self::Parent,
    ) {
    }

    /// Returns `true` to keep at most one group expanded after a tap.
    fn is_single_expansion(&self) -> bool {
        false
    }

    /// View type for the parent row at `position`.
    fn parent_view_type(&self, _parent: &Self::Parent, _position: usize) -> ViewType {
        0
    }

    /// View type for the child row at `position` within its group.
    fn child_view_type(&self, _child: &Self::Child, _position: usize) -> ViewType {
        0
    }
}

/// Signal connections routing notifications to an attached host.
struct HostBinding {
    item_changed: ConnectionId,
    item_inserted: ConnectionId,
    item_removed: ConnectionId,
    item_range_changed: ConnectionId,
    scroll_requested: ConnectionId,
}

impl HostBinding {
    fn connect(signals: &AdapterSignals, host: &Arc<dyn ListHost>) -> Self {
        let changed = Arc::clone(host);
        let inserted = Arc::clone(host);
        let removed = Arc::clone(host);
        let range = Arc::clone(host);
        let scroll = Arc::clone(host);

        Self {
            item_changed: signals
                .item_changed
                .connect(move |&position| changed.notify_item_changed(position)),
            item_inserted: signals
                .item_inserted
                .connect(move |&position| inserted.notify_item_inserted(position)),
            item_removed: signals
                .item_removed
                .connect(move |&position| removed.notify_item_removed(position)),
            item_range_changed: signals
                .item_range_changed
                .connect(move |&(start, count)| range.notify_item_range_changed(start, count)),
            scroll_requested: signals
                .scroll_requested
                .connect(move |&position| scroll.smooth_scroll_to_position(position)),
        }
    }

    fn disconnect(self, signals: &AdapterSignals) {
        signals.item_changed.disconnect(self.item_changed);
        signals.item_inserted.disconnect(self.item_inserted);
        signals.item_removed.disconnect(self.item_removed);
        signals.item_range_changed.disconnect(self.item_range_changed);
        signals.scroll_requested.disconnect(self.scroll_requested);
    }
}

/// A two-level expandable list adapter.
///
/// Owned by the thread that builds it; bulk passes run on a background
/// worker and report back through [`process_pending`](Self::process_pending).
pub struct ExpandableListAdapter<A: ExpandableAdapter> {
    delegate: Arc<A>,
    groups: Arc<Mutex<GroupList<A::Parent, A::Child>>>,
    signals: Arc<AdapterSignals>,
    binding: Mutex<Option<HostBinding>>,
    rows: ParentRows<A>,
    tasks: TaskQueue,
    worker: Worker<usize>,
    config: AdapterConfig,
    owner: OwnerThread,
}

impl<A: ExpandableAdapter> ExpandableListAdapter<A> {
    /// Creates an adapter with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Worker`] if the background thread cannot be spawned.
    pub fn new(delegate: A, groups: Vec<Group<A::Parent, A::Child>>) -> Result<Self> {
        Self::with_config(delegate, groups, AdapterConfig::default())
    }

    /// Creates an adapter with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Worker`] if the background thread cannot be spawned.
    pub fn with_config(
        delegate: A,
        groups: Vec<Group<A::Parent, A::Child>>,
        config: AdapterConfig,
    ) -> Result<Self> {
        let tasks = TaskQueue::new();
        let worker = Worker::with_config(config.worker.clone(), tasks.clone())?;

        tracing::debug!(
            target: targets::BINDING,
            groups = groups.len(),
            worker = worker.name(),
            "expandable list adapter created"
        );

        Ok(Self {
            delegate: Arc::new(delegate),
            groups: Arc::new(Mutex::new(GroupList::new(groups))),
            signals: Arc::new(AdapterSignals::new()),
            binding: Mutex::new(None),
            rows: ParentRows::new(),
            tasks,
            worker,
            config,
            owner: OwnerThread::capture(),
        })
    }

    /// Starts building an adapter around `delegate`.
    pub fn builder(delegate: A) -> AdapterBuilder<A> {
        AdapterBuilder::new(delegate)
    }

    // =========================================================================
    // Attachment
    // =========================================================================

    /// Attaches the adapter to a list view.
    ///
    /// Installs a vertical linear layout on the host and routes row
    /// notifications to it. Attaching while already attached detaches from
    /// the previous host first.
    pub fn attach(&self, host: Arc<dyn ListHost>) {
        self.owner.debug_ensure("ExpandableListAdapter::attach");
        self.detach();

        host.set_layout(LinearLayout::vertical());
        *self.binding.lock() = Some(HostBinding::connect(&self.signals, &host));
        self.groups.lock().set_attached(true);

        tracing::debug!(target: targets::BINDING, "attached to list view");
    }

    /// Detaches the adapter from its list view.
    ///
    /// Row notifications are dropped until the next [`attach`](Self::attach).
    pub fn detach(&self) {
        self.owner.debug_ensure("ExpandableListAdapter::detach");

        let Some(binding) = self.binding.lock().take() else {
            return;
        };
        binding.disconnect(&self.signals);
        self.groups.lock().set_attached(false);

        tracing::debug!(target: targets::BINDING, "detached from list view");
    }

    /// Returns `true` while a list view is attached.
    pub fn is_attached(&self) -> bool {
        self.groups.lock().state().is_attached()
    }

    // =========================================================================
    // Group editing
    // =========================================================================

    /// Inserts a group, appending when `position` is `None`.
    ///
    /// Returns the position the group was inserted at.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::PositionOutOfRange`] if `position` exceeds the
    /// group count. Nothing changes and nothing is emitted.
    /// Returns [`AdapterError::Worker`] if a pending bulk pass cannot be awaited.
    pub fn add_group(
        &self,
        group: Group<A::Parent, A::Child>,
        expanded: bool,
        position: Option<usize>,
    ) -> Result<usize> {
        self.owner.debug_ensure("ExpandableListAdapter::add_group");
        self.settle_bulk_passes()?;

        let (at, attached) = {
            let mut groups = self.groups.lock();
            match groups.insert(group, expanded, position) {
                Ok(at) => (at, groups.state().is_attached()),
                Err(err) => {
                    tracing::warn!(target: targets::GROUPS, error = %err, "group not added");
                    return Err(err);
                }
            }
        };
        self.rows.group_inserted(at);

        if attached {
            self.signals.item_inserted.emit(at);
        }
        tracing::debug!(target: targets::GROUPS, position = at, "group added");
        Ok(at)
    }

    /// Removes and returns the group at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::PositionOutOfRange`] if `position` is not a
    /// valid group position. Nothing changes and nothing is emitted.
    /// Returns [`AdapterError::Worker`] if a pending bulk pass cannot be awaited.
    pub fn remove_group(&self, position: usize) -> Result<Group<A::Parent, A::Child>> {
        self.owner.debug_ensure("ExpandableListAdapter::remove_group");
        self.settle_bulk_passes()?;

        let (group, attached) = {
            let mut groups = self.groups.lock();
            match groups.remove(position) {
                Ok(group) => (group, groups.state().is_attached()),
                Err(err) => {
                    tracing::warn!(target: targets::GROUPS, error = %err, "group not removed");
                    return Err(err);
                }
            }
        };
        self.rows.group_removed(position);

        if attached {
            self.signals.item_removed.emit(position);
        }
        tracing::debug!(target: targets::GROUPS, position, "group removed");
        Ok(group)
    }

    // =========================================================================
    // Expansion
    // =========================================================================

    /// Expands or collapses every group.
    ///
    /// The adapter-wide flag is recorded immediately. The per-group pass runs
    /// on the background worker; once it finishes, a single
    /// `item_range_changed(0, count)` is queued for the owner thread, with
    /// `count` read when the queue is drained. Passes run in request order,
    /// and taps or group edits made afterwards wait for them.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Worker`] if the pass could not be queued; the
    /// adapter-wide flag is restored in that case.
    pub fn set_expanded(&self, expanded: bool) -> Result<()> {
        self.owner.debug_ensure("ExpandableListAdapter::set_expanded");

        let previous = {
            let mut groups = self.groups.lock();
            let previous = groups.state().all_expanded();
            groups.set_all_expanded(expanded);
            previous
        };

        let pass_groups = Arc::clone(&self.groups);
        let refresh_groups = Arc::clone(&self.groups);
        let signals = Arc::clone(&self.signals);

        let queued = self.worker.send_with_callback(
            move || {
                let _span = PerfSpan::new("apply_expansion_state");
                let count = pass_groups.lock().apply_all(expanded);
                tracing::debug!(target: targets::EXPANSION, expanded, count, "bulk expansion pass finished");
                count
            },
            move |_| {
                let (count, attached) = {
                    let groups = refresh_groups.lock();
                    (groups.len(), groups.state().is_attached())
                };
                if attached {
                    signals.item_range_changed.emit((0, count));
                }
            },
        );

        if let Err(err) = queued {
            self.groups.lock().set_all_expanded(previous);
            tracing::warn!(target: targets::EXPANSION, error = %err, "bulk expansion pass not queued");
            return Err(err.into());
        }
        Ok(())
    }

    /// Runs refreshes queued by finished background passes.
    ///
    /// Returns the number of queued tasks that ran.
    pub fn process_pending(&self) -> usize {
        self.owner.debug_ensure("ExpandableListAdapter::process_pending");
        self.tasks.process_all()
    }

    /// Blocks until every bulk pass requested so far has run.
    ///
    /// Their refreshes are queued afterwards but not delivered; call
    /// [`process_pending`](Self::process_pending) for that.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Worker`] if the worker has stopped.
    pub fn wait_for_background(&self) -> Result<()> {
        self.worker.send_sync(|| 0)?;
        Ok(())
    }

    fn settle_bulk_passes(&self) -> Result<()> {
        let pending = self.worker.pending_tasks();
        if pending == 0 {
            return Ok(());
        }
        tracing::debug!(target: targets::EXPANSION, pending, "waiting for queued bulk passes");
        self.wait_for_background()
    }

    // =========================================================================
    // Rows
    // =========================================================================

    /// Creates a parent row and prepares its nested list.
    ///
    /// A row without a nested list is logged and returned as is; it binds
    /// normally but never shows children.
    pub fn create_parent_row(&self, view_type: ViewType) -> Arc<ParentHolder<A>> {
        self.owner.debug_ensure("ExpandableListAdapter::create_parent_row");

        let row = self.delegate.create_parent_row(view_type);
        let nested = find_nested_list::<A>(&row);
        if let Some(nested) = &nested {
            nested.set_layout(LinearLayout::new(self.config.expanding_direction));
        }

        let holder = ParentHolder::new(row, nested);
        self.rows.track(&holder);
        holder
    }

    /// Binds `holder` to the group at `position`.
    ///
    /// Shows or hides the nested list from the group's flag and installs a
    /// fresh [`ChildListAdapter`] on it before handing the row to the delegate.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::StaleIndex`] if `position` no longer exists.
    pub fn bind_parent_row(&self, holder: &Arc<ParentHolder<A>>, position: usize) -> Result<()> {
        self.owner.debug_ensure("ExpandableListAdapter::bind_parent_row");

        let (parent, children, expanded) = {
            let groups = self.groups.lock();
            let group = groups
                .get(position)
                .ok_or_else(|| AdapterError::stale(position, groups.len()))?;
            (group.payload_snapshot(), group.children_snapshot(), group.is_expanded())
        };

        holder.set_position(position);
        if let Some(nested) = holder.nested_list() {
            nested.set_visible(expanded);
            nested.set_adapter(Arc::new(ChildListAdapter::new(
                Arc::clone(&self.delegate),
                Arc::clone(&parent),
                children,
                Arc::downgrade(holder),
                position,
            )));
        }

        self.delegate.bind_parent_row(holder.row(), &parent, position);
        tracing::trace!(target: targets::BINDING, position, expanded, "bound parent row");
        Ok(())
    }

    /// Handles a tap on a parent row.
    ///
    /// Resolves the tap under the current policy, emits `expanded` or
    /// `collapsed` for each changed group and, while attached, an
    /// `item_changed` for each changed row plus a scroll request when the
    /// last row was tapped. The delegate's
    /// [`on_expandable_clicked`](ExpandableAdapter::on_expandable_clicked)
    /// runs last.
    ///
    /// # Errors
    ///
    /// - [`AdapterError::UnboundRow`] if the row was never bound.
    /// - [`AdapterError::StaleIndex`] if its group has been removed or its
    ///   position no longer exists.
    /// - [`AdapterError::Worker`] if a pending bulk pass cannot be awaited.
    pub fn click_parent_row(&self, holder: &ParentHolder<A>) -> Result<TapOutcome> {
        self.owner.debug_ensure("ExpandableListAdapter::click_parent_row");
        self.settle_bulk_passes()?;

        let position = holder.last_position().ok_or(AdapterError::UnboundRow)?;
        if holder.is_removed() {
            let err = AdapterError::stale(position, self.item_count());
            tracing::warn!(target: targets::EXPANSION, error = %err, "tap on removed group ignored");
            return Err(err);
        }
        let policy = self.expansion_policy();

        let (outcome, parent, attached) = {
            let mut groups = self.groups.lock();
            let parent = groups
                .get(position)
                .map(Group::payload_snapshot)
                .ok_or_else(|| AdapterError::stale(position, groups.len()));
            let parent = match parent {
                Ok(parent) => parent,
                Err(err) => {
                    tracing::warn!(target: targets::EXPANSION, error = %err, "tap ignored");
                    return Err(err);
                }
            };
            let outcome = groups.tap(policy, position)?;
            (outcome, parent, groups.state().is_attached())
        };

        for change in &outcome.changes {
            self.signals.emit_expansion(change.position, change.expanded);
        }
        if attached {
            for changed in outcome.changed_positions() {
                self.signals.item_changed.emit(changed);
            }
            if let Some(last) = outcome.scroll_to {
                self.signals.scroll_requested.emit(last);
            }
        }

        self.delegate.on_expandable_clicked(holder.row(), &parent);
        Ok(outcome)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Number of parent rows.
    pub fn item_count(&self) -> usize {
        self.groups.lock().len()
    }

    /// View type of the parent row at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::StaleIndex`] if `position` is out of range.
    pub fn item_view_type(&self, position: usize) -> Result<ViewType> {
        let parent = {
            let groups = self.groups.lock();
            groups
                .get(position)
                .map(Group::payload_snapshot)
                .ok_or_else(|| AdapterError::stale(position, groups.len()))?
        };
        Ok(self.delegate.parent_view_type(&parent, position))
    }

    /// Returns the expansion flag of the group at `position`.
    pub fn is_group_expanded(&self, position: usize) -> Option<bool> {
        self.groups.lock().get(position).map(Group::is_expanded)
    }

    /// Calls `f` with the group at `position`.
    ///
    /// The group lock is held while `f` runs; `f` must not call back into
    /// the adapter.
    pub fn with_group<R>(
        &self,
        position: usize,
        f: impl FnOnce(&Group<A::Parent, A::Child>) -> R,
    ) -> Option<R> {
        self.groups.lock().get(position).map(f)
    }

    /// Calls `f` with mutable access to the group at `position`.
    ///
    /// Nothing is emitted. Bound rows keep showing the old children until
    /// the host rebinds them, so follow up with an `item_changed` where that
    /// matters. The same locking rule as [`with_group`](Self::with_group)
    /// applies.
    pub fn with_group_mut<R>(
        &self,
        position: usize,
        f: impl FnOnce(&mut Group<A::Parent, A::Child>) -> R,
    ) -> Option<R> {
        self.owner.debug_ensure("ExpandableListAdapter::with_group_mut");
        self.groups.lock().get_mut(position).map(f)
    }

    /// Requests a rebind of the row at `position` while attached.
    pub fn notify_item_changed(&self, position: usize) {
        self.owner.debug_ensure("ExpandableListAdapter::notify_item_changed");
        if self.is_attached() {
            self.signals.item_changed.emit(position);
        }
    }

    /// Positions of all expanded groups.
    pub fn expanded_positions(&self) -> Vec<usize> {
        self.groups.lock().expanded_positions()
    }

    /// Whether the last bulk request expanded every group.
    pub fn all_expanded(&self) -> bool {
        self.groups.lock().state().all_expanded()
    }

    /// The group most recently tapped in single-expansion mode.
    pub fn last_expanded_position(&self) -> Option<usize> {
        self.groups.lock().state().last_expanded()
    }

    /// The policy derived from the delegate.
    pub fn expansion_policy(&self) -> ExpansionPolicy {
        if self.delegate.is_single_expansion() {
            ExpansionPolicy::Single
        } else {
            ExpansionPolicy::Multiple
        }
    }

    /// The adapter's notification signals.
    pub fn signals(&self) -> &AdapterSignals {
        &self.signals
    }

    /// The row-rendering delegate.
    pub fn delegate(&self) -> &A {
        &self.delegate
    }

    /// The configuration the adapter was built with.
    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }
}

impl<A: ExpandableAdapter> std::fmt::Debug for ExpandableListAdapter<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpandableListAdapter")
            .field("groups", &self.item_count())
            .field("attached", &self.is_attached())
            .field("parent_rows", &self.rows.live_count())
            .field("worker", &self.worker)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<A: ExpandableAdapter> Drop for ExpandableListAdapter<A> {
    fn drop(&mut self) {
        if let Some(binding) = self.binding.get_mut().take() {
            binding.disconnect(&self.signals);
        }
        self.worker.stop();
    }
}
