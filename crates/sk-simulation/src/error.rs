use sk_mechanics::{MechError, Team};

/// Convenience result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;

/// Errors raised while setting up a combat.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A team has no members.
    #[error("team {0} has no members")]
    EmptyTeam(Team),

    /// An actor has no weapon and could never attack.
    #[error("actor has no weapon: {0}")]
    Unarmed(String),

    /// Building or looking up an actor failed.
    #[error(transparent)]
    Mech(#[from] MechError),
}
