use thiserror::Error;

/// Errors from shopping list mutations.
///
/// All variants are user-facing, non-fatal, and recoverable; the state
/// machine decides per variant whether the flow retries in place or is
/// abandoned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ListError {
    #[error("item name too short: {0} character(s) after trimming")]
    TooShort(usize),

    #[error("'{0}' is already on the list")]
    Duplicate(String),

    #[error("index {index} out of range, expected 1 to {size}")]
    OutOfRange { index: usize, size: usize },
}

/// Free-text input that should have been a list index but was not.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("not a number: '{0}'")]
pub struct NotANumber(pub String);

/// A callback payload or command name that did not decode.
///
/// Handled as a no-op at the dispatch boundary; never fatal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionParseError {
    #[error("unknown command: '{0}'")]
    UnknownCommand(String),

    #[error("unknown callback action: '{0}'")]
    UnknownAction(String),

    #[error("malformed index in callback payload: '{0}'")]
    BadIndex(String),
}

/// Hard gateway failures: the request never succeeded.
///
/// These propagate to the dispatch boundary, abort the flow, and reset the
/// session defensively. They never terminate the process.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("gateway rejected request: {0}")]
    Api(String),

    #[error("network error: {0}")]
    Network(String),
}

/// Outcome of an edit attempt that did not apply cleanly.
///
/// The first three variants are soft: the menu manager recovers by
/// sending a replacement message (or, for `NotModified`, treating the
/// render as already done). `Gateway` is hard and propagates.
#[derive(Debug, Error)]
pub enum EditError {
    #[error("message to edit not found")]
    NotFound,

    #[error("message content unchanged")]
    NotModified,

    #[error("message too old to edit")]
    TooOld,

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl EditError {
    /// Whether the edit-else-resend fallback may recover from this error.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, EditError::Gateway(_))
    }
}

/// Outcome of a delete attempt that did not apply.
///
/// Deletes are always best-effort; callers swallow both variants.
#[derive(Debug, Error)]
pub enum DeleteError {
    #[error("message not found")]
    NotFound,

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
