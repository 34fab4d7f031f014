//! Error types for the cmdparse crate.

use thiserror::Error;

/// Errors raised while assigning tokens and processing parameter values.
///
/// These never cross the public boundary directly: `Parser::run` renders
/// them to the error sink and folds them into the returned `Outcome`.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A token arrived with no matching flag and no parameter to absorb it
    #[error("invalid parameter '{0}'")]
    UnrecognizedParameter(String),

    /// A second value was offered to an already satisfied single-value parameter
    #[error("parameter '{name}' accepts only one value, '{token}' is invalid in this context")]
    TooManyArguments { name: String, token: String },

    /// Raw tokens could not be converted to the declared type
    #[error("failed to parse arguments for parameter '{name}': {source}")]
    ConversionFailure {
        name: String,
        #[source]
        source: ConversionError,
    },

    /// The semantic validator rejected a successfully converted value
    #[error("validation failed for parameter '{0}'")]
    ValidationFailure(String),

    /// A callback-style parameter failed while computing its value
    #[error("callback for parameter '{name}' failed: {detail}")]
    CallbackFailure { name: String, detail: String },

    /// A required parameter never appeared in the input
    #[error("the parameter '{0}' is required")]
    MissingRequiredParameter(String),
}

/// Errors produced while converting raw tokens into a typed value.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// A scalar parameter received zero or several tokens
    #[error("expected exactly one value, got {0}")]
    WrongArity(usize),

    /// A boolean parameter received a value; its flag alone toggles it
    #[error("a boolean parameter cannot have any arguments")]
    UnexpectedArguments,

    /// Text that does not parse as a number in the requested base
    #[error("invalid numeric text '{0}'")]
    InvalidNumber(String),

    /// A number that parses but does not fit the declared type
    #[error("numeric value '{0}' is out of range")]
    OutOfRange(String),
}

/// Signals returned by callback parameters.
#[derive(Debug, Error)]
pub enum CallbackError {
    /// Stop the run without treating it as an error. The built-in help
    /// callback returns this after printing the usage screen.
    #[error("run halted by parameter callback")]
    Halt,

    /// The callback failed to compute a value
    #[error("{0}")]
    Failed(String),
}

/// Errors returned by the typed retrieval API.
///
/// Both variants indicate a contract violation on the caller's side: the
/// parameter was never declared, or it was declared with a different type.
#[derive(Debug, Error)]
pub enum AccessError {
    /// No parameter with the given name is registered
    #[error("the parameter '{0}' could not be found")]
    NotFound(String),

    /// The stored value has a different type than the one requested
    #[error("invalid usage of the parameter '{0}': requested type does not match the declared type")]
    TypeMismatch(String),
}
