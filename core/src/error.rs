use thiserror::Error;

use crate::graph::UserId;

pub type Result<T> = std::result::Result<T, GraphError>;

/// Recoverable precondition failures. Every operation that returns one of
/// these has left the graph untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("both users must exist to connect '{from}' -> '{to}'")]
    MissingEndpoint { from: UserId, to: UserId },
    #[error("user '{0}' not found")]
    UserNotFound(UserId),
}
