use cyarika_core::error::CoreError;

/// Errors raised while handling a gateway event. Handlers log them and keep
/// running.
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Discord error: {0}")]
    Discord(#[from] serenity::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Core(#[from] CoreError),

    /// A Hall mirror operation failed for a reason other than the Discord
    /// client (used by non-Discord mirrors).
    #[error("Mirror error: {0}")]
    Mirror(String),
}
