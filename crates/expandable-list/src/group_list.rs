//! Group list controller.
//!
//! `GroupList<P, C>` owns the ordered groups and the adapter-wide
//! [`ExpansionState`]. Every mutation that shifts positions reconciles the
//! position-based state in the same call, so `last_expanded` always names
//! the group it was recorded for.
//!
//! The list itself is not synchronized; the adapter keeps it behind a mutex
//! shared with its background worker.

use crate::error::{AdapterError, Result};
use crate::expansion::{self, ExpansionPolicy, ExpansionState, TapOutcome};
use crate::group::Group;

/// An ordered list of expandable groups plus their expansion bookkeeping.
///
/// # Example
///
/// ```
/// use expandable_list::{ExpansionPolicy, Group, GroupList};
///
/// let mut list = GroupList::new(vec![
///     Group::new("Fruit", vec!["Apple", "Pear"]),
///     Group::new("Veg", vec!["Leek"]),
/// ]);
///
/// list.insert(Group::new("Nuts", vec!["Pecan"]), true, Some(0)).unwrap();
/// assert_eq!(list.len(), 3);
/// assert!(list.get(0).unwrap().is_expanded());
///
/// list.tap(ExpansionPolicy::Multiple, 2).unwrap();
/// assert_eq!(list.expanded_positions(), vec![0, 2]);
/// ```
#[derive(Debug)]
pub struct GroupList<P, C> {
    groups: Vec<Group<P, C>>,
    state: ExpansionState,
}

impl<P, C> Default for GroupList<P, C> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<P, C> GroupList<P, C> {
    /// Creates a list from existing groups, keeping their flags.
    pub fn new(groups: Vec<Group<P, C>>) -> Self {
        Self {
            groups,
            state: ExpansionState::default(),
        }
    }

    /// Returns the number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` if there are no groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Returns the group at `position`.
    pub fn get(&self, position: usize) -> Option<&Group<P, C>> {
        self.groups.get(position)
    }

    /// Returns the group at `position` for modification.
    pub fn get_mut(&mut self, position: usize) -> Option<&mut Group<P, C>> {
        self.groups.get_mut(position)
    }

    /// Iterates over the groups in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Group<P, C>> {
        self.groups.iter()
    }

    /// Returns the positions of all expanded groups.
    pub fn expanded_positions(&self) -> Vec<usize> {
        self.groups
            .iter()
            .enumerate()
            .filter(|(_, group)| group.is_expanded())
            .map(|(position, _)| position)
            .collect()
    }

    /// Returns the adapter-wide expansion state.
    pub fn state(&self) -> &ExpansionState {
        &self.state
    }

    pub(crate) fn set_attached(&mut self, attached: bool) {
        self.state.attached = attached;
    }

    pub(crate) fn set_all_expanded(&mut self, expanded: bool) {
        self.state.all_expanded = expanded;
    }

    /// Inserts a group, returning the position it landed at.
    ///
    /// `None` appends. The group's flag is set to `expanded` before insertion.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::PositionOutOfRange`] if `position > len()`;
    /// the list is left unchanged.
    pub fn insert(
        &mut self,
        mut group: Group<P, C>,
        expanded: bool,
        position: Option<usize>,
    ) -> Result<usize> {
        let count = self.groups.len();
        let at = position.unwrap_or(count);
        if at > count {
            return Err(AdapterError::out_of_range(at, count));
        }

        group.set_expanded(expanded);
        self.groups.insert(at, group);
        self.state.on_group_inserted(at);
        Ok(at)
    }

    /// Removes and returns the group at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::PositionOutOfRange`] if `position >= len()`;
    /// the list is left unchanged.
    pub fn remove(&mut self, position: usize) -> Result<Group<P, C>> {
        let count = self.groups.len();
        if position >= count {
            return Err(AdapterError::out_of_range(position, count));
        }

        let group = self.groups.remove(position);
        self.state.on_group_removed(position);
        Ok(group)
    }

    /// Resolves a tap on the group at `position` under `policy`.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::StaleIndex`] if `position >= len()`.
    pub fn tap(&mut self, policy: ExpansionPolicy, position: usize) -> Result<TapOutcome> {
        expansion::resolve_tap(&mut self.groups, &mut self.state, policy, position)
    }

    /// Sets every group's flag to `expanded`, returning the number of groups.
    ///
    /// This is the bulk pass only; `all_expanded` is recorded separately when
    /// the request is made.
    pub fn apply_all(&mut self, expanded: bool) -> usize {
        expansion::apply_all(&mut self.groups, expanded)
    }
}

impl<'a, P, C> IntoIterator for &'a GroupList<P, C> {
    type Item = &'a Group<P, C>;
    type IntoIter = std::slice::Iter<'a, Group<P, C>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
