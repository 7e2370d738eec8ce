use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// A membership function or domain was built from malformed numbers
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("variable `{variable}` has no term named `{term}`")]
    UnknownTerm { variable: String, term: String },

    #[error("no variable named `{0}` is registered")]
    UnknownVariable(String),

    #[error("a variable named `{0}` is already registered")]
    DuplicateVariable(String),

    #[error("no input value was given for variable `{0}`")]
    MissingInput(String),

    #[error("input for variable `{variable}` is not a finite number: {value}")]
    InvalidInput { variable: String, value: f64 },

    /// Every rule fired with zero strength, so the output has no area to defuzzify
    #[error("no rule fired for output variable `{0}`")]
    NoRuleFired(String),

    #[error("invalid optimizer configuration: {0}")]
    OptimizerConfig(String),

    #[error("malformed candidate: {0}")]
    MalformedCandidate(String),
}
