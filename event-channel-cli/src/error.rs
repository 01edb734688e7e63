//! Scenario validation and execution errors

/// Result type for scenario operations
pub type Result<T> = std::result::Result<T, ScenarioError>;

/// Errors that can occur while validating or running a scenario
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScenarioError {
    #[error("Listener declared twice: {0}")]
    DuplicateListener(String),

    #[error("Unknown listener '{name}' referenced by {context}")]
    UnknownListener { name: String, context: String },

    #[error("Invalid occurrence {occurrence} for listener '{listener}' (occurrences start at 1)")]
    InvalidOccurrence { listener: String, occurrence: usize },

    #[error("Listener '{listener}' was not added {occurrence} time(s) before step {step}")]
    MissingRegistration {
        listener: String,
        occurrence: usize,
        step: usize,
    },
}
