//! Expandable group records.
//!
//! A [`Group`] is one parent row: a payload, the ordered children revealed
//! when it is expanded, and its expansion flag. Groups are identified by
//! their position in the owning [`GroupList`](crate::GroupList); they carry
//! no stable id.

use std::sync::Arc;

/// Trait for parent payloads that can produce their own children.
///
/// Implement this for payloads whose children are derived from the payload
/// itself, then build groups with [`Group::from_payload`].
///
/// # Example
///
/// ```
/// use expandable_list::{ExpandingItems, Group};
///
/// struct Question {
///     text: String,
///     answer: String,
/// }
///
/// impl ExpandingItems for Question {
///     type Item = String;
///
///     fn expanding_items(&self) -> Vec<String> {
///         vec![self.answer.clone()]
///     }
/// }
///
/// let group = Group::from_payload(Question {
///     text: "Why?".into(),
///     answer: "Because.".into(),
/// });
/// assert_eq!(group.children(), ["Because.".to_string()]);
/// ```
pub trait ExpandingItems {
    /// The child payload type.
    type Item;

    /// Returns the children to show when this group is expanded.
    fn expanding_items(&self) -> Vec<Self::Item>;
}

/// A parent-level entry holding a payload, its children and an expansion flag.
///
/// Payload and children are reference counted so a bound row can keep a
/// cheap snapshot of them. Editing children through
/// [`children_mut`](Self::children_mut) copies on write, leaving existing
/// snapshots untouched until the row is bound again.
#[derive(Debug)]
pub struct Group<P, C> {
    payload: Arc<P>,
    children: Arc<Vec<C>>,
    expanded: bool,
}

impl<P, C> Clone for Group<P, C> {
    fn clone(&self) -> Self {
        Self {
            payload: Arc::clone(&self.payload),
            children: Arc::clone(&self.children),
            expanded: self.expanded,
        }
    }
}

impl<P, C> Group<P, C> {
    /// Creates a collapsed group.
    pub fn new(payload: P, children: Vec<C>) -> Self {
        Self {
            payload: Arc::new(payload),
            children: Arc::new(children),
            expanded: false,
        }
    }

    /// Sets the initial expansion state.
    pub fn with_expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }

    /// Returns the parent payload.
    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// Returns the children in display order.
    pub fn children(&self) -> &[C] {
        &self.children
    }

    /// Returns the number of children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Returns `true` if the group's children are currently shown.
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Sets the expansion flag.
    pub fn set_expanded(&mut self, expanded: bool) {
        self.expanded = expanded;
    }

    /// Flips the expansion flag and returns the new value.
    pub fn toggle(&mut self) -> bool {
        self.expanded = !self.expanded;
        self.expanded
    }

    pub(crate) fn payload_snapshot(&self) -> Arc<P> {
        Arc::clone(&self.payload)
    }

    pub(crate) fn children_snapshot(&self) -> Arc<Vec<C>> {
        Arc::clone(&self.children)
    }
}

impl<P, C: Clone> Group<P, C> {
    /// Provides mutable access to the children.
    ///
    /// Rows bound before this call keep showing the old children until the
    /// list rebinds them.
    pub fn children_mut(&mut self) -> &mut Vec<C> {
        Arc::make_mut(&mut self.children)
    }
}

impl<P: ExpandingItems> Group<P, P::Item> {
    /// Creates a collapsed group whose children come from the payload.
    pub fn from_payload(payload: P) -> Self {
        let children = payload.expanding_items();
        Self::new(payload, children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_group_is_collapsed() {
        let group = Group::new("fruits", vec!["apple", "pear"]);
        assert!(!group.is_expanded());
        assert_eq!(*group.payload(), "fruits");
        assert_eq!(group.children(), ["apple", "pear"]);
        assert_eq!(group.child_count(), 2);
    }

    #[test]
    fn test_toggle() {
        let mut group = Group::new((), vec![1, 2, 3]).with_expanded(true);
        assert!(!group.toggle());
        assert!(group.toggle());
        assert!(group.is_expanded());
    }

    #[test]
    fn test_children_mut_leaves_snapshot_stale() {
        let mut group = Group::new("numbers", vec![1, 2]);
        let snapshot = group.children_snapshot();

        group.children_mut().push(3);

        assert_eq!(*snapshot, vec![1, 2]);
        assert_eq!(group.children(), [1, 2, 3]);
    }

    #[test]
    fn test_from_payload() {
        struct Countdown(u8);

        impl ExpandingItems for Countdown {
            type Item = u8;

            fn expanding_items(&self) -> Vec<u8> {
                (0..self.0).rev().collect()
            }
        }

        let group = Group::from_payload(Countdown(3));
        assert_eq!(group.children(), [2, 1, 0]);
        assert_eq!(group.payload().0, 3);
    }
}
