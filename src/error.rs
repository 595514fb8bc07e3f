//! Error types shared by the parser, lexers, tree and generators.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, BlueprintError>;

/// Errors raised while turning a draft into generated files
#[derive(Debug, Error)]
pub enum BlueprintError {
    /// The draft (or ledger) is not valid YAML
    #[error("Parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A context name could not be resolved to exactly one model
    #[error("The [{fqcn}] model class could not be found.")]
    ModelNotFound { fqcn: String },

    /// The draft file does not exist
    #[error("Draft file could not be found: {}", .0.display())]
    MissingDraft(PathBuf),

    /// `erase` ran before any build wrote a ledger
    #[error("Ledger file could not be found: {}", .0.display())]
    MissingLedger(PathBuf),

    /// File system failure
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file or draft overlay could not be applied
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The ledger could not be serialized
    #[error("Failed to write ledger: {0}")]
    Dump(serde_yaml::Error),

    /// No built-in or published stub carries this name
    #[error("Stub not found: {0}")]
    StubNotFound(String),
}

impl BlueprintError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BlueprintError::Io {
            path: path.into(),
            source,
        }
    }
}
