//! Error types for the mechanics engine.

use sk_core::CoreError;

/// Errors raised while building actors, actions, or rosters.
///
/// Running out of resources during combat is not an error: actions report
/// it through [`crate::action::ActionOutcome::Skipped`].
#[derive(Debug, thiserror::Error)]
pub enum MechError {
    /// A core data model error (attribute, modifier, or item).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A saving throw names a stat that is not an integer attribute.
    #[error("unknown saving throw stat: {0}")]
    UnknownStat(String),

    /// An actor id does not belong to the roster.
    #[error("actor #{0} not found")]
    ActorNotFound(usize),

    /// Actor construction data could not be parsed.
    #[error("invalid actor spec: {0}")]
    Spec(#[from] serde_json::Error),
}

/// Convenience result type for mechanics operations.
pub type MechResult<T> = Result<T, MechError>;
