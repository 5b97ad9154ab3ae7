//! Error types for modorder.

use std::path::PathBuf;
use thiserror::Error;

/// modorder error type.
#[derive(Error, Debug)]
pub enum Error {
    /// The name carries none of the recognized kind prefixes
    #[error("`{name}` is not a recognized model definition file")]
    UnrecognizedFileKind { name: String },

    /// The source file does not parse
    #[error("failed to parse {}:{line}: {message}", .path.display())]
    SourceParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// IO error while reading a source file
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The grammar could not be loaded into the parser
    #[error("parser setup failed: {0}")]
    ParserSetup(String),

    /// Two different files resolve to the same entity
    #[error(
        "`{}` and `{}` both define entity `{entity}`",
        .first.display(),
        .second.display()
    )]
    DuplicateEntity {
        entity: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// The dependency graph is not acyclic
    #[error("cyclic dependency among {}", .unresolved.join(", "))]
    CyclicDependency {
        /// Every entity that could not be ordered, sorted
        unresolved: Vec<String>,
        /// Strongly connected components among the unresolved entities
        cycles: Vec<Vec<String>>,
    },
}

/// Result type alias for modorder operations.
pub type Result<T> = std::result::Result<T, Error>;
