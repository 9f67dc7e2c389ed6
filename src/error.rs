use thiserror::Error;

/// Errors raised by type discovery and static field extraction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReflectError {
    /// A required argument was missing or malformed
    #[error("{name} is invalid: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// A static field could not be read
    #[error("cannot read static field {owner}.{field}: {reason}")]
    UnreadableMember {
        owner: String,
        field: String,
        reason: String,
    },
}

impl ReflectError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReflectError>;
