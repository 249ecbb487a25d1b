//! Engine error taxonomy.
//!
//! Interactions raise typed failures rather than ambiguous sentinels. Each
//! variant carries the logical field name and enough detail to report
//! expected-vs-observed without re-querying the page.

use crate::surface::SurfaceError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Every candidate locator timed out.
    #[error("Could not find {field}: all {candidates_tried} locator candidates timed out")]
    ElementNotFound { field: String, candidates_tried: usize },

    /// The interaction happened but the resulting state does not match intent.
    #[error("{field} verification failed: expected '{expected}', got '{actual}'")]
    Verification {
        field: String,
        expected: String,
        actual: String,
    },

    /// Shadow root or the control inside it is unreachable.
    #[error("Shadow access failed for {field}: {reason}")]
    ShadowAccess { field: String, reason: String },

    /// Could not reach or restore a frame/shadow scope.
    #[error("Context navigation failed: {0}")]
    ContextNavigation(String),

    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),
}

impl EngineError {
    /// The logical field this failure is about, when there is one.
    pub fn field(&self) -> Option<&str> {
        match self {
            EngineError::ElementNotFound { field, .. }
            | EngineError::Verification { field, .. }
            | EngineError::ShadowAccess { field, .. } => Some(field),
            EngineError::ContextNavigation(_) | EngineError::Surface(_) => None,
        }
    }
}
