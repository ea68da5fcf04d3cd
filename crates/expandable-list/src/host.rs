//! The list view an adapter is attached to.
//!
//! The adapter never draws anything. It tells a [`ListHost`] which rows to
//! rebind and which layout to use, and leaves measuring and painting to it.

/// Direction in which a linear layout stacks its rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    /// Rows are laid out side by side.
    Horizontal,
    /// Rows are stacked top to bottom.
    #[default]
    Vertical,
}

/// A linear layout manager description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LinearLayout {
    /// Stacking direction.
    pub orientation: Orientation,
}

impl LinearLayout {
    /// Creates a layout with the given orientation.
    pub const fn new(orientation: Orientation) -> Self {
        Self { orientation }
    }

    /// Creates a vertical layout.
    pub const fn vertical() -> Self {
        Self::new(Orientation::Vertical)
    }
}

/// A recycling list view that displays the adapter's parent rows.
///
/// Every method is called on the adapter's owner thread, after any internal
/// lock has been released, so implementations may call back into the
/// adapter.
pub trait ListHost: Send + Sync {
    /// Installs the layout used for the parent rows.
    fn set_layout(&self, layout: LinearLayout);

    /// The row at `position` must be rebound.
    fn notify_item_changed(&self, position: usize);

    /// A row was inserted at `position`.
    fn notify_item_inserted(&self, position: usize);

    /// The row at `position` was removed.
    fn notify_item_removed(&self, position: usize);

    /// `count` rows starting at `start` must be rebound.
    fn notify_item_range_changed(&self, start: usize, count: usize);

    /// Smoothly scrolls until the row at `position` is visible.
    fn smooth_scroll_to_position(&self, position: usize);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_is_vertical() {
        assert_eq!(LinearLayout::default(), LinearLayout::vertical());
        assert_eq!(
            LinearLayout::new(Orientation::Horizontal).orientation,
            Orientation::Horizontal
        );
    }
}
