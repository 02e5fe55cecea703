use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable cause.
        message: String,
    },

    /// Session-layer error.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

/// Session lifecycle errors
///
/// The store layer recovers almost everything locally: missing lookups come
/// back as `None`/empty, capacity hits come back as outcome values, and
/// malformed import envelopes are skipped. The variants below cover the
/// remaining cases where refusing eagerly beats corrupting a store.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session reached its terminal state (timer fired or `cleanup` ran)
    /// and can no longer be used. A terminated session must be re-created.
    #[error("Session terminated: {session_id}")]
    Terminated {
        /// Id of the cleaned session.
        session_id: String,
    },

    /// A category tag outside the closed set was passed where a known tag
    /// was required.
    #[error("Unknown category tag: {tag}")]
    UnknownCategory {
        /// The unrecognized tag.
        tag: String,
    },
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for session operations
pub type SessionResult<T> = Result<T, SessionError>;
