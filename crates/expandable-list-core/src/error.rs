//! Error types for the core systems.

/// Errors raised when handing work to a [`Worker`](crate::Worker).
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    /// The worker has been stopped and no longer accepts tasks.
    #[error("worker '{name}' has been stopped")]
    Stopped { name: String },

    /// The worker's task queue is at capacity.
    #[error("worker '{name}' task queue is full (capacity {capacity})")]
    QueueFull { name: String, capacity: usize },

    /// The worker thread could not be spawned.
    #[error("failed to spawn worker thread '{name}': {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl WorkerError {
    /// Returns the name of the worker that produced this error.
    pub fn worker_name(&self) -> &str {
        match self {
            Self::Stopped { name } | Self::QueueFull { name, .. } | Self::Spawn { name, .. } => {
                name
            }
        }
    }
}

/// A specialized Result type for core operations.
pub type Result<T> = std::result::Result<T, WorkerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WorkerError::QueueFull {
            name: "bulk".to_string(),
            capacity: 8,
        };
        assert_eq!(err.to_string(), "worker 'bulk' task queue is full (capacity 8)");
        assert_eq!(err.worker_name(), "bulk");
    }

    #[test]
    fn test_spawn_error_source() {
        use std::error::Error;

        let err = WorkerError::Spawn {
            name: "bulk".to_string(),
            source: std::io::Error::other("no threads left"),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("no threads left"));
    }
}
