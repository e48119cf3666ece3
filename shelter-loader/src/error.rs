use std::sync::Arc;

/// Failure delivered to every caller waiting on one batch window.
///
/// Cloneable so the same failure can be handed to each waiter.
#[derive(Debug, Clone)]
pub enum LoadError {
    /// The batch function itself failed.
    Batch {
        loader: &'static str,
        source: Arc<dyn std::error::Error + Send + Sync>,
    },
    /// The batch function returned a result not aligned with its keys.
    Misaligned {
        loader: &'static str,
        expected: usize,
        actual: usize,
    },
    /// The window completed without an entry for the requested key.
    Missing { loader: &'static str },
    /// The task running the bulk call panicked or was cancelled.
    Aborted { loader: &'static str },
}

impl LoadError {
    pub fn loader(&self) -> &'static str {
        match self {
            LoadError::Batch { loader, .. }
            | LoadError::Misaligned { loader, .. }
            | LoadError::Missing { loader }
            | LoadError::Aborted { loader } => loader,
        }
    }
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Batch { loader, source } => {
                write!(f, "batch load failed in '{loader}': {source}")
            }
            LoadError::Misaligned {
                loader,
                expected,
                actual,
            } => write!(
                f,
                "batch function of '{loader}' returned {actual} values for {expected} keys"
            ),
            LoadError::Missing { loader } => {
                write!(f, "batch window of '{loader}' completed without the requested key")
            }
            LoadError::Aborted { loader } => write!(f, "batch task of '{loader}' did not complete"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Batch { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}
