//! Child list sub-adapter.
//!
//! A fresh [`ChildListAdapter`] is installed on a parent row's nested list
//! every time that row is bound. It exposes exactly the children of the
//! group as they were at bind time; later edits to the group show up only
//! after the parent row is bound again.

use std::sync::{Arc, Weak};

use expandable_list_core::logging::targets;

use crate::adapter::{ExpandableAdapter, ViewType};
use crate::error::{AdapterError, Result};
use crate::holder::{ChildHolder, ParentHolder};

/// Adapter for the nested list of one bound parent row.
pub struct ChildListAdapter<A: ExpandableAdapter> {
    delegate: Arc<A>,
    parent: Arc<A::Parent>,
    children: Arc<Vec<A::Child>>,
    parent_holder: Weak<ParentHolder<A>>,
    parent_position: usize,
}

impl<A: ExpandableAdapter> ChildListAdapter<A> {
    pub(crate) fn new(
        delegate: Arc<A>,
        parent: Arc<A::Parent>,
        children: Arc<Vec<A::Child>>,
        parent_holder: Weak<ParentHolder<A>>,
        parent_position: usize,
    ) -> Self {
        Self {
            delegate,
            parent,
            children,
            parent_holder,
            parent_position,
        }
    }

    /// The owning group's payload.
    pub fn parent(&self) -> &A::Parent {
        &self.parent
    }

    /// The children captured when the parent row was bound.
    pub fn children(&self) -> &[A::Child] {
        &self.children
    }

    /// The parent row's position at bind time.
    pub fn parent_position(&self) -> usize {
        self.parent_position
    }

    /// Number of child rows.
    pub fn item_count(&self) -> usize {
        self.children.len()
    }

    /// View type of the child row at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::StaleIndex`] if `position` is past the last child.
    pub fn item_view_type(&self, position: usize) -> Result<ViewType> {
        let child = self.child(position)?;
        Ok(self.delegate.child_view_type(child, position))
    }

    /// Creates a child row through the delegate.
    pub fn create_row(&self, view_type: ViewType) -> Arc<ChildHolder<A>> {
        ChildHolder::new(self.delegate.create_child_row(view_type))
    }

    /// Binds `holder` to the child at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::StaleIndex`] if `position` is past the last child.
    pub fn bind_row(&self, holder: &ChildHolder<A>, position: usize) -> Result<()> {
        let child = self.child(position)?;
        holder.set_position(position);
        self.delegate
            .bind_child_row(holder.row(), child, &self.parent, position);
        tracing::trace!(
            target: targets::BINDING,
            parent = self.parent_position,
            position,
            "bound child row"
        );
        Ok(())
    }

    /// Forwards a click on `holder` to the delegate.
    ///
    /// # Errors
    ///
    /// - [`AdapterError::UnboundRow`] if the row was never bound.
    /// - [`AdapterError::StaleIndex`] if its position no longer exists.
    /// - [`AdapterError::ParentRowReleased`] if the parent row is gone.
    pub fn click_row(&self, holder: &ChildHolder<A>) -> Result<()> {
        let position = holder.adapter_position().ok_or(AdapterError::UnboundRow)?;
        let child = self.child(position)?;
        let parent_holder = self
            .parent_holder
            .upgrade()
            .ok_or(AdapterError::ParentRowReleased)?;

        self.delegate
            .on_expanded_clicked(parent_holder.row(), holder.row(), child, &self.parent);
        Ok(())
    }

    fn child(&self, position: usize) -> Result<&A::Child> {
        self.children
            .get(position)
            .ok_or_else(|| AdapterError::stale(position, self.children.len()))
    }
}

impl<A: ExpandableAdapter> std::fmt::Debug for ChildListAdapter<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChildListAdapter")
            .field("parent_position", &self.parent_position)
            .field("item_count", &self.item_count())
            .field("parent_row_alive", &(self.parent_holder.strong_count() > 0))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use super::*;
    use crate::nested::{ParentRowView, ViewNode};

    struct Header;

    impl ParentRowView<Sizes> for Header {
        fn child_views(&self) -> Vec<ViewNode<Sizes>> {
            Vec::new()
        }
    }

    #[derive(Default)]
    struct Sizes {
        clicked: Mutex<Vec<(u32, &'static str)>>,
    }

    impl ExpandableAdapter for Sizes {
        type Parent = &'static str;
        type Child = u32;
        type ParentRow = Header;
        type ChildRow = Mutex<u32>;

        fn create_parent_row(&self, _view_type: ViewType) -> Header {
            Header
        }

        fn bind_parent_row(&self, _row: &Header, _parent: &&'static str, _position: usize) {}

        fn create_child_row(&self, _view_type: ViewType) -> Mutex<u32> {
            Mutex::new(0)
        }

        fn bind_child_row(&self, row: &Mutex<u32>, child: &u32, _parent: &&'static str, _position: usize) {
            *row.lock() = *child;
        }

        fn on_expanded_clicked(
            &self,
            _parent_row: &Header,
            _child_row: &Mutex<u32>,
            child: &u32,
            parent: &&'static str,
        ) {
            self.clicked.lock().push((*child, *parent));
        }

        fn child_view_type(&self, child: &u32, _position: usize) -> ViewType {
            usize::from(*child >= 10)
        }
    }

    fn sub_adapter(parent_holder: &Arc<ParentHolder<Sizes>>) -> ChildListAdapter<Sizes> {
        ChildListAdapter::new(
            Arc::new(Sizes::default()),
            Arc::new("shoes"),
            Arc::new(vec![7, 42]),
            Arc::downgrade(parent_holder),
            3,
        )
    }

    #[test]
    fn test_view_types_come_from_delegate() {
        let parent = ParentHolder::new(Header, None);
        let children = sub_adapter(&parent);

        assert_eq!(children.item_count(), 2);
        assert_eq!(children.item_view_type(0).unwrap(), 0);
        assert_eq!(children.item_view_type(1).unwrap(), 1);
        assert!(matches!(
            children.item_view_type(2),
            Err(AdapterError::StaleIndex { position: 2, count: 2 })
        ));
    }

    #[test]
    fn test_click_reports_child_and_parent() {
        let parent = ParentHolder::new(Header, None);
        let children = sub_adapter(&parent);
        let row = children.create_row(0);

        assert!(matches!(children.click_row(&row), Err(AdapterError::UnboundRow)));

        children.bind_row(&row, 1).unwrap();
        assert_eq!(*row.row().lock(), 42);
        children.click_row(&row).unwrap();

        assert_eq!(*children.delegate.clicked.lock(), vec![(42, "shoes")]);
        assert_eq!(children.parent_position(), 3);
    }

    #[test]
    fn test_click_after_parent_row_dropped() {
        let parent = ParentHolder::new(Header, None);
        let children = sub_adapter(&parent);
        let row = children.create_row(0);
        children.bind_row(&row, 0).unwrap();

        drop(parent);

        assert!(matches!(children.click_row(&row), Err(AdapterError::ParentRowReleased)));
        assert!(children.delegate.clicked.lock().is_empty());
    }
}
