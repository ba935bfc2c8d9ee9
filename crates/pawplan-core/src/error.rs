use std::fmt;

/// Machine-readable error codes for the embedding UI's error surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Unauthenticated,
    StoreUnavailable,
    ValidationFailed,
    PetNotFound,
    StaleTaskId,
    PartialCascade,
    SqlFailure,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Unauthenticated => "E1001",
            Self::StoreUnavailable => "E1002",
            Self::ValidationFailed => "E2001",
            Self::PetNotFound => "E2002",
            Self::StaleTaskId => "E2003",
            Self::PartialCascade => "E3001",
            Self::SqlFailure => "E5001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and UI toasts.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Unauthenticated => "Not signed in",
            Self::StoreUnavailable => "Store unavailable",
            Self::ValidationFailed => "Invalid input",
            Self::PetNotFound => "Pet not found",
            Self::StaleTaskId => "Task reference out of date",
            Self::PartialCascade => "Pet removed but some tasks remain",
            Self::SqlFailure => "Database operation failed",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced alongside the message.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::Unauthenticated => Some("Sign in and retry."),
            Self::StoreUnavailable => Some("Check the database path and permissions."),
            Self::ValidationFailed => Some("Correct the highlighted field and retry."),
            Self::PetNotFound => None,
            Self::StaleTaskId => Some("Reload the task list; the item was moved or removed."),
            Self::PartialCascade => Some("Retry the delete to clean up remaining tasks."),
            Self::SqlFailure => Some("Check disk space and write permissions."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
