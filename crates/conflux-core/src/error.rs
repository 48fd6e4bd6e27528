use thiserror::Error;

/// Core error types for Conflux domain operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid fingerprint: {0}")]
    InvalidFingerprint(String),

    #[error("Invalid {kind} name: {name:?}")]
    InvalidName { kind: String, name: String },

    #[error("Pipeline {pipeline:?} is defined by both {first} and {second}")]
    DuplicatePipeline {
        pipeline: String,
        first: String,
        second: String,
    },

    #[error("Environment {environment:?} is defined by both {first} and {second}")]
    DuplicateEnvironment {
        environment: String,
        first: String,
        second: String,
    },

    #[error("Environment {environment:?} references unknown pipeline {pipeline:?}")]
    UnknownPipeline {
        environment: String,
        pipeline: String,
    },

    #[error("Invalid rule pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Time parsing error: {0}")]
    TimeError(#[from] time::error::Parse),
}

impl CoreError {
    /// Create a new InvalidFingerprint error
    pub fn invalid_fingerprint(fingerprint: impl Into<String>) -> Self {
        Self::InvalidFingerprint(fingerprint.into())
    }

    /// Create a new InvalidName error
    pub fn invalid_name(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::InvalidName {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Create a new DuplicatePipeline error
    pub fn duplicate_pipeline(
        pipeline: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        Self::DuplicatePipeline {
            pipeline: pipeline.into(),
            first: first.into(),
            second: second.into(),
        }
    }

    /// Create a new DuplicateEnvironment error
    pub fn duplicate_environment(
        environment: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        Self::DuplicateEnvironment {
            environment: environment.into(),
            first: first.into(),
            second: second.into(),
        }
    }

    /// Create a new UnknownPipeline error
    pub fn unknown_pipeline(environment: impl Into<String>, pipeline: impl Into<String>) -> Self {
        Self::UnknownPipeline {
            environment: environment.into(),
            pipeline: pipeline.into(),
        }
    }

    /// Create a new InvalidPattern error
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Whether this error was produced by whole-document validation
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidName { .. }
                | Self::DuplicatePipeline { .. }
                | Self::DuplicateEnvironment { .. }
                | Self::UnknownPipeline { .. }
        )
    }
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
