use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrepError {
    #[error("Invalid values for variable {name}: {reason}")]
    InvalidValues { name: String, reason: String },

    #[error("Shape mismatch for variable {name}: expected {expected}, found {found}")]
    ShapeMismatch {
        name: String,
        expected: String,
        found: String,
    },

    #[error("Required variable {0} has no values")]
    MissingVariable(String),

    #[error("Unknown variable name: {0}")]
    UnknownVariable(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type PrepResult<T> = Result<T, PrepError>;
