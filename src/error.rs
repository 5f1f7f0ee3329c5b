use thiserror::Error;

use crate::pipeline::PipelineStage;

/// Unified error type for release-train operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Invalid input: {0}")]
    Input(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("File discovery failed: {0}")]
    Discovery(String),

    #[error("External command `{command}` failed: {status}")]
    ExternalTool { command: String, status: String },

    #[error("Unknown component '{name}' (known: {})", .available.join(", "))]
    NotFound {
        name: String,
        available: Vec<String>,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Precommit hook {name} failed: {source}")]
    Hook {
        name: String,
        #[source]
        source: Box<ReleaseError>,
    },

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{component} failed during {stage}: {source}")]
    Stage {
        component: String,
        stage: PipelineStage,
        #[source]
        source: Box<ReleaseError>,
    },
}

/// Convenience type alias for Results in release-train
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create an input error with context
    pub fn input(msg: impl Into<String>) -> Self {
        ReleaseError::Input(msg.into())
    }

    /// Create a validation error with context
    pub fn validation(msg: impl Into<String>) -> Self {
        ReleaseError::Validation(msg.into())
    }

    /// Create a discovery error with context
    pub fn discovery(msg: impl Into<String>) -> Self {
        ReleaseError::Discovery(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create an external tool error for a command that did not exit cleanly
    pub fn external_tool(command: impl Into<String>, status: impl Into<String>) -> Self {
        ReleaseError::ExternalTool {
            command: command.into(),
            status: status.into(),
        }
    }

    /// Attach the failing component and stage to an error
    pub fn in_stage(self, component: &str, stage: PipelineStage) -> Self {
        ReleaseError::Stage {
            component: component.to_string(),
            stage,
            source: Box::new(self),
        }
    }

    /// Attach the name of the precommit hook that produced an error
    pub fn in_hook(self, name: &str) -> Self {
        ReleaseError::Hook {
            name: name.to_string(),
            source: Box::new(self),
        }
    }

    /// The underlying error with any stage or hook context stripped
    pub fn root_cause(&self) -> &ReleaseError {
        match self {
            ReleaseError::Stage { source, .. } | ReleaseError::Hook { source, .. } => {
                source.root_cause()
            }
            other => other,
        }
    }
}

impl From<toml::de::Error> for ReleaseError {
    fn from(err: toml::de::Error) -> Self {
        ReleaseError::Config(err.to_string())
    }
}

impl From<glob::PatternError> for ReleaseError {
    fn from(err: glob::PatternError) -> Self {
        ReleaseError::Discovery(format!("invalid glob pattern: {}", err))
    }
}
