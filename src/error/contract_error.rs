//! Errors raised while building constraints, contracts and error trees.
//!
//! These are programmer errors and are reported as `Result` values from the
//! building operations. Validation failures are never reported this way; they
//! are accumulated in [`Errors`](crate::Errors).

/// Errors that can occur while building contracts or error trees.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContractError {
    /// An error record was given an empty or whitespace-only type.
    #[error("error type can't be blank")]
    BlankErrorType,

    /// A value assigned into an errors tree was not an errors tree, null, or
    /// an array of error objects each carrying a `type`.
    #[error("invalid errors assignment: {0}")]
    InvalidErrors(String),

    /// A property path contained an empty name.
    #[error("invalid property: {0}")]
    InvalidProperty(String),

    /// Including the contract would make it (transitively) include itself.
    #[error("contract can't include itself")]
    RecursiveInclude,

    /// The variadic arguments slot was configured twice.
    #[error("variadic arguments constraint is already set")]
    VariadicArgumentsAlreadySet,

    /// The variadic keywords slot was configured twice.
    #[error("variadic keywords constraint is already set")]
    VariadicKeywordsAlreadySet,

    /// The block slot of a parameters contract was configured twice.
    #[error("block constraint is already set")]
    BlockAlreadySet,

    /// A keyword name is not symbol-shaped.
    #[error("invalid keyword name '{0}'")]
    InvalidKeyword(String),

    /// A type with the same name is already registered.
    #[error("type '{0}' already registered")]
    DuplicateType(String),
}
