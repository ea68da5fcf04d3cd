//! Adapter configuration and builder.

use expandable_list_core::WorkerConfig;

use crate::adapter::{ExpandableAdapter, ExpandableListAdapter};
use crate::error::Result;
use crate::group::Group;
use crate::host::Orientation;

/// Configuration for an [`ExpandableListAdapter`].
#[derive(Debug, Clone, Default)]
pub struct AdapterConfig {
    /// Orientation of the layout installed on every nested child list.
    pub expanding_direction: Orientation,
    /// Settings for the background worker that runs bulk expansion passes.
    pub worker: WorkerConfig,
}

/// Builder for [`ExpandableListAdapter`].
///
/// # Example
///
/// ```ignore
/// let adapter = ExpandableListAdapter::builder(MyAdapter::default())
///     .groups(groups)
///     .expanding_direction(Orientation::Horizontal)
///     .worker_name("faq-expansion")
///     .build()?;
/// ```
pub struct AdapterBuilder<A: ExpandableAdapter> {
    delegate: A,
    groups: Vec<Group<A::Parent, A::Child>>,
    config: AdapterConfig,
}

impl<A: ExpandableAdapter> AdapterBuilder<A> {
    pub(crate) fn new(delegate: A) -> Self {
        Self {
            delegate,
            groups: Vec::new(),
            config: AdapterConfig::default(),
        }
    }

    /// Sets the initial groups, keeping their expansion flags.
    pub fn groups(mut self, groups: Vec<Group<A::Parent, A::Child>>) -> Self {
        self.groups = groups;
        self
    }

    /// Appends one initial group.
    pub fn group(mut self, group: Group<A::Parent, A::Child>) -> Self {
        self.groups.push(group);
        self
    }

    /// Sets the orientation of nested child lists.
    pub fn expanding_direction(mut self, direction: Orientation) -> Self {
        self.config.expanding_direction = direction;
        self
    }

    /// Sets the background worker's thread name.
    pub fn worker_name(mut self, name: impl Into<String>) -> Self {
        self.config.worker.name = name.into();
        self
    }

    /// Sets how many bulk passes may be queued at once.
    pub fn worker_queue_capacity(mut self, capacity: usize) -> Self {
        self.config.worker.queue_capacity = capacity;
        self
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: AdapterConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the adapter on the current thread, which becomes its owner.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Worker`](crate::AdapterError::Worker) if the
    /// background thread cannot be spawned.
    pub fn build(self) -> Result<ExpandableListAdapter<A>> {
        ExpandableListAdapter::with_config(self.delegate, self.groups, self.config)
    }
}

impl<A: ExpandableAdapter> std::fmt::Debug for AdapterBuilder<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterBuilder")
            .field("groups", &self.groups.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
