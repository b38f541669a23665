//! Typed failures surfaced by the ranking engine.

/// Errors the engine reports to its caller.
///
/// Both variants describe bad input, so the caller can map them to a
/// client-error response. Nothing here is worth retrying.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RankError {
    /// Weight or direction specification is malformed.
    #[error("invalid parameters: {message}")]
    InvalidParameters { message: String },

    /// A task carries a priority/difficulty literal outside the known set.
    #[error("invalid {field} value: {value:?}")]
    InvalidCriterionValue { field: &'static str, value: String },
}

impl RankError {
    pub(crate) fn params(message: impl Into<String>) -> Self {
        Self::InvalidParameters {
            message: message.into(),
        }
    }

    pub(crate) fn criterion(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidCriterionValue {
            field,
            value: value.into(),
        }
    }
}
