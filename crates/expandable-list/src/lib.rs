//! A generic two-level expandable list adapter for recycling list views.
//!
//! Parent rows reveal or hide a nested list of child rows when tapped. The
//! adapter keeps the groups and their expansion flags, decides which rows
//! need a refresh after each change, and reports that to the list view
//! through targeted notifications instead of full reloads.
//!
//! # Pieces
//!
//! - [`Group`]: a parent payload, its children and an expansion flag.
//! - [`GroupList`]: the ordered groups plus the adapter-wide
//!   [`ExpansionState`], kept consistent across inserts and removals.
//! - [`resolve_tap`]: the expansion state machine for
//!   [`ExpansionPolicy::Multiple`] and [`ExpansionPolicy::Single`].
//! - [`ExpandableAdapter`]: implemented by you to create and populate rows.
//! - [`ExpandableListAdapter`]: wires all of the above to a [`ListHost`].
//! - [`ChildListAdapter`]: the per-row adapter of a nested child list.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use expandable_list::{ExpandableListAdapter, Group};
//!
//! let adapter = ExpandableListAdapter::builder(FaqRows)
//!     .groups(vec![Group::new(question, vec![answer])])
//!     .build()?;
//!
//! adapter.attach(Arc::new(my_list_view));
//! adapter.set_expanded(false)?;
//!
//! // Later, on the UI thread:
//! adapter.process_pending();
//! ```
//!
//! # Logging
//!
//! Everything is instrumented with `tracing`; see
//! [`expandable_list_core::logging`] for the targets.

mod adapter;
mod child_adapter;
mod config;
mod error;
pub mod expansion;
mod group;
mod group_list;
mod holder;
mod host;
mod nested;
mod signals;

pub use adapter::{ExpandableAdapter, ExpandableListAdapter, ViewType};
pub use child_adapter::ChildListAdapter;
pub use config::{AdapterBuilder, AdapterConfig};
pub use error::{AdapterError, Result};
pub use expansion::{
    ExpansionChange, ExpansionPolicy, ExpansionState, TapOutcome, apply_all, resolve_tap,
};
pub use group::{ExpandingItems, Group};
pub use group_list::GroupList;
pub use holder::{ChildHolder, ParentHolder};
pub use host::{LinearLayout, ListHost, Orientation};
pub use nested::{NestedList, ParentRowView, ViewNode, find_nested_list};
pub use signals::AdapterSignals;

pub use expandable_list_core::{WorkerConfig, WorkerError};
