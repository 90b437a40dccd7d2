//! Error types for the core data model.

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Configuration errors raised while building attributes, modifiers, or items.
///
/// These are construction-time failures: once an entity has been built
/// successfully, none of its operations can produce a `CoreError`.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The attribute key is not part of the attribute schema.
    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),

    /// The value supplied for an attribute has the wrong type.
    #[error("attribute '{key}' expects {expected}")]
    AttributeType {
        /// The attribute key that was written.
        key: String,
        /// Human-readable name of the expected value type.
        expected: &'static str,
    },

    /// A damage modifier was declared with an out-of-range value.
    #[error("invalid modifier: {0}")]
    InvalidModifier(String),

    /// A weapon was declared without any damage component.
    #[error("weapon '{0}' has no damage component")]
    MissingWeaponDamage(String),
}
