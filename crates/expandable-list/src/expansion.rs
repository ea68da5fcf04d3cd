//! Expansion state machine.
//!
//! Pure functions that decide, for a tap on a parent row, which groups flip
//! and which rows need a refresh. All adapter-wide flags live in one
//! [`ExpansionState`] record that is passed in by reference; nothing here
//! touches a list view.
//!
//! # Policies
//!
//! - [`ExpansionPolicy::Multiple`]: a tap toggles only the tapped group.
//! - [`ExpansionPolicy::Single`]: accordion mode. Expanding a group collapses
//!   the one expanded before it. After a bulk expand-all, the next tap
//!   collapses every group that is still open.

use expandable_list_core::logging::targets;

use crate::error::{AdapterError, Result};
use crate::group::Group;

/// How a tap on a parent row affects the other groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpansionPolicy {
    /// Any number of groups may be expanded at once.
    #[default]
    Multiple,
    /// At most one group stays expanded after a tap.
    Single,
}

/// Adapter-wide expansion bookkeeping.
///
/// `all_expanded` reflects the last bulk request and may disagree with the
/// individual group flags after later taps in [`ExpansionPolicy::Multiple`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExpansionState {
    pub(crate) all_expanded: bool,
    pub(crate) last_expanded: Option<usize>,
    pub(crate) attached: bool,
}

impl ExpansionState {
    /// Whether the last bulk request expanded every group.
    pub fn all_expanded(&self) -> bool {
        self.all_expanded
    }

    /// The group most recently tapped in single-expansion mode.
    pub fn last_expanded(&self) -> Option<usize> {
        self.last_expanded
    }

    /// Whether a list view is currently attached.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Shifts the tracked position after a group is inserted at `at`.
    pub(crate) fn on_group_inserted(&mut self, at: usize) {
        if let Some(last) = self.last_expanded.as_mut() {
            if *last >= at {
                *last += 1;
            }
        }
    }

    /// Drops or shifts the tracked position after the group at `at` is removed.
    pub(crate) fn on_group_removed(&mut self, at: usize) {
        self.last_expanded = match self.last_expanded {
            Some(last) if last == at => None,
            Some(last) if last > at => Some(last - 1),
            other => other,
        };
    }
}

/// One group whose expansion flag changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpansionChange {
    /// Position of the group.
    pub position: usize,
    /// The group's new flag.
    pub expanded: bool,
}

/// What a tap did, in the order rows should be refreshed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TapOutcome {
    /// Every group whose flag changed, the tapped group first.
    pub changes: Vec<ExpansionChange>,
    /// Set when the tapped group is the last one and should be scrolled into view.
    pub scroll_to: Option<usize>,
}

impl TapOutcome {
    /// Positions that need a single-row refresh.
    pub fn changed_positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.changes.iter().map(|change| change.position)
    }
}

/// Resolves a tap on the group at `position`.
///
/// # Errors
///
/// Returns [`AdapterError::StaleIndex`] if `position` is past the end of
/// `groups`. Neither the groups nor `state` are modified in that case.
pub fn resolve_tap<P, C>(
    groups: &mut [Group<P, C>],
    state: &mut ExpansionState,
    policy: ExpansionPolicy,
    position: usize,
) -> Result<TapOutcome> {
    if position >= groups.len() {
        return Err(AdapterError::stale(position, groups.len()));
    }

    let changes = match policy {
        ExpansionPolicy::Multiple => vec![toggle(groups, position)],
        ExpansionPolicy::Single => resolve_single(groups, state, position),
    };

    let scroll_to = (position + 1 == groups.len()).then_some(position);

    tracing::debug!(
        target: targets::EXPANSION,
        position,
        ?policy,
        changed = changes.len(),
        "resolved tap"
    );

    Ok(TapOutcome { changes, scroll_to })
}

fn resolve_single<P, C>(
    groups: &mut [Group<P, C>],
    state: &mut ExpansionState,
    position: usize,
) -> Vec<ExpansionChange> {
    let mut changes = vec![toggle(groups, position)];

    if state.all_expanded {
        state.all_expanded = false;
        for (index, group) in groups.iter_mut().enumerate() {
            if index != position && group.is_expanded() {
                group.set_expanded(false);
                changes.push(ExpansionChange {
                    position: index,
                    expanded: false,
                });
            }
        }
    } else if let Some(previous) = state.last_expanded.filter(|&last| last != position) {
        if let Some(group) = groups.get_mut(previous).filter(|group| group.is_expanded()) {
            group.set_expanded(false);
            changes.push(ExpansionChange {
                position: previous,
                expanded: false,
            });
        }
    }

    state.last_expanded = Some(position);
    changes
}

fn toggle<P, C>(groups: &mut [Group<P, C>], position: usize) -> ExpansionChange {
    ExpansionChange {
        position,
        expanded: groups[position].toggle(),
    }
}

/// Sets every group's flag to `expanded`, returning how many groups were visited.
pub fn apply_all<P, C>(groups: &mut [Group<P, C>], expanded: bool) -> usize {
    for group in groups.iter_mut() {
        group.set_expanded(expanded);
    }
    groups.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups(count: usize) -> Vec<Group<usize, ()>> {
        (0..count).map(|i| Group::new(i, Vec::new())).collect()
    }

    fn flags(groups: &[Group<usize, ()>]) -> Vec<bool> {
        groups.iter().map(Group::is_expanded).collect()
    }

    #[test]
    fn test_multiple_toggles_only_target() {
        let mut groups = groups(3);
        groups[2].set_expanded(true);
        let mut state = ExpansionState::default();

        let outcome = resolve_tap(&mut groups, &mut state, ExpansionPolicy::Multiple, 0).unwrap();

        assert_eq!(flags(&groups), vec![true, false, true]);
        assert_eq!(outcome.changed_positions().collect::<Vec<_>>(), vec![0]);
        assert_eq!(outcome.scroll_to, None);
        assert_eq!(state.last_expanded(), None);
    }

    #[test]
    fn test_multiple_double_tap_restores() {
        let mut groups = groups(2);
        let mut state = ExpansionState::default();

        resolve_tap(&mut groups, &mut state, ExpansionPolicy::Multiple, 1).unwrap();
        resolve_tap(&mut groups, &mut state, ExpansionPolicy::Multiple, 1).unwrap();

        assert_eq!(flags(&groups), vec![false, false]);
    }

    #[test]
    fn test_single_collapses_previous() {
        let mut groups = groups(3);
        let mut state = ExpansionState::default();

        resolve_tap(&mut groups, &mut state, ExpansionPolicy::Single, 2).unwrap();
        let outcome = resolve_tap(&mut groups, &mut state, ExpansionPolicy::Single, 0).unwrap();

        assert_eq!(flags(&groups), vec![true, false, false]);
        assert_eq!(
            outcome.changes,
            vec![
                ExpansionChange { position: 0, expanded: true },
                ExpansionChange { position: 2, expanded: false },
            ]
        );
        assert_eq!(state.last_expanded(), Some(0));
    }

    #[test]
    fn test_single_retap_collapses_target() {
        let mut groups = groups(2);
        let mut state = ExpansionState::default();

        resolve_tap(&mut groups, &mut state, ExpansionPolicy::Single, 0).unwrap();
        let outcome = resolve_tap(&mut groups, &mut state, ExpansionPolicy::Single, 0).unwrap();

        assert_eq!(flags(&groups), vec![false, false]);
        assert_eq!(outcome.changes.len(), 1);
        assert_eq!(state.last_expanded(), Some(0));
    }

    #[test]
    fn test_single_skips_previous_already_collapsed() {
        let mut groups = groups(3);
        let mut state = ExpansionState {
            last_expanded: Some(1),
            ..Default::default()
        };

        let outcome = resolve_tap(&mut groups, &mut state, ExpansionPolicy::Single, 0).unwrap();

        assert_eq!(outcome.changes.len(), 1);
        assert_eq!(state.last_expanded(), Some(0));
    }

    #[test]
    fn test_single_after_expand_all_collapses_everything() {
        let mut groups = groups(4);
        let mut state = ExpansionState::default();
        state.all_expanded = true;
        apply_all(&mut groups, true);

        let outcome = resolve_tap(&mut groups, &mut state, ExpansionPolicy::Single, 1).unwrap();

        assert_eq!(flags(&groups), vec![false; 4]);
        assert!(!state.all_expanded());
        assert_eq!(state.last_expanded(), Some(1));
        assert_eq!(outcome.changed_positions().collect::<Vec<_>>(), vec![1, 0, 2, 3]);
    }

    #[test]
    fn test_last_position_requests_scroll() {
        let mut groups = groups(3);
        let mut state = ExpansionState::default();

        let outcome = resolve_tap(&mut groups, &mut state, ExpansionPolicy::Multiple, 2).unwrap();
        assert_eq!(outcome.scroll_to, Some(2));
    }

    #[test]
    fn test_stale_position_is_rejected() {
        let mut groups = groups(2);
        let mut state = ExpansionState {
            last_expanded: Some(1),
            ..Default::default()
        };

        let err = resolve_tap(&mut groups, &mut state, ExpansionPolicy::Single, 2).unwrap_err();

        assert!(matches!(err, AdapterError::StaleIndex { position: 2, count: 2 }));
        assert_eq!(flags(&groups), vec![false, false]);
        assert_eq!(state.last_expanded(), Some(1));
    }

    #[test]
    fn test_reconcile_on_insert_and_remove() {
        let mut state = ExpansionState {
            last_expanded: Some(2),
            ..Default::default()
        };

        state.on_group_inserted(3);
        assert_eq!(state.last_expanded(), Some(2));
        state.on_group_inserted(0);
        assert_eq!(state.last_expanded(), Some(3));
        state.on_group_removed(1);
        assert_eq!(state.last_expanded(), Some(2));
        state.on_group_removed(2);
        assert_eq!(state.last_expanded(), None);
    }

    #[test]
    fn test_apply_all() {
        let mut groups = groups(5);
        assert_eq!(apply_all(&mut groups, true), 5);
        assert!(groups.iter().all(Group::is_expanded));
        apply_all(&mut groups, false);
        assert!(!groups.iter().any(Group::is_expanded));
    }
}
