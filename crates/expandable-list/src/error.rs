//! Error types for the expandable list adapter.

use expandable_list_core::WorkerError;

/// Result type alias for adapter operations.
pub type Result<T> = std::result::Result<T, AdapterError>;

/// Errors that can occur while driving an expandable list.
///
/// None of these are fatal: every failing operation leaves the group list
/// and expansion state exactly as they were.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// An insert or remove position lies outside the group list.
    #[error("position {position} is out of range for {count} groups")]
    PositionOutOfRange { position: usize, count: usize },

    /// A row refers to a position that no longer exists, usually because the
    /// list shrank after the row was bound.
    #[error("stale index {position}: the list only holds {count} items")]
    StaleIndex { position: usize, count: usize },

    /// A row was clicked before it was ever bound to a position.
    #[error("row is not bound to an adapter position")]
    UnboundRow,

    /// A child row outlived the parent row it was created under.
    #[error("parent row was released before its child row was clicked")]
    ParentRowReleased,

    /// The background worker refused the bulk expansion pass.
    #[error(transparent)]
    Worker(#[from] WorkerError),
}

impl AdapterError {
    /// Create a position out-of-range error.
    pub fn out_of_range(position: usize, count: usize) -> Self {
        Self::PositionOutOfRange { position, count }
    }

    /// Create a stale index error.
    pub fn stale(position: usize, count: usize) -> Self {
        Self::StaleIndex { position, count }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            AdapterError::out_of_range(4, 3).to_string(),
            "position 4 is out of range for 3 groups"
        );
        assert_eq!(
            AdapterError::stale(2, 1).to_string(),
            "stale index 2: the list only holds 1 items"
        );
    }

    #[test]
    fn test_worker_error_is_transparent() {
        let err: AdapterError = WorkerError::Stopped {
            name: "bulk".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "worker 'bulk' has been stopped");
    }
}
