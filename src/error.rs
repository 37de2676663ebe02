//! Error type shared by the decoder, the project graph and the mutator.

use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while loading, editing or writing a project.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// A location path did not resolve to any node.
    #[error("could not find {path}")]
    NotFound {
        /// The full requested location path.
        path: String,
    },
    /// A filesystem path handed to an add operation does not exist.
    #[error("no such file or directory: {}", path.display())]
    MissingFilesystemEntry {
        /// The missing path.
        path: PathBuf,
    },
    /// The folder a group is linked to is gone (or the group has no link).
    #[error("linked folder was not found: {path}")]
    StaleLink {
        /// The linked folder, or the group location when it carries no path.
        path: String,
    },
    /// A record is missing a mandatory field or holds the wrong value shape.
    #[error("malformed record {guid}: {reason}")]
    MalformedRecord {
        /// Identifier of the offending record.
        guid: String,
        /// What is wrong with it.
        reason: String,
    },
    /// A record's `isa` has no section in the output file.
    #[error("record {guid} has isa {isa} which has no output section")]
    UnknownSection {
        /// Identifier of the offending record.
        guid: String,
        /// The unsupported type name.
        isa: String,
    },
    /// The project's root group has no parent and cannot be removed.
    #[error("the root group cannot be removed")]
    RootRemoval,
    /// An exclude or search pattern is not a valid regular expression.
    #[error("invalid pattern {pattern}: {source}")]
    InvalidPattern {
        /// The pattern as given.
        pattern: String,
        /// The regex compile error.
        #[source]
        source: regex::Error,
    },
    /// The project text could not be decoded.
    #[error("line {line}: {message}")]
    Decode {
        /// 1-based line of the failure.
        line: usize,
        /// What the decoder expected.
        message: String,
    },
    /// Reading or writing through the filesystem port failed.
    #[error("{context}: {message}")]
    Io {
        /// The operation and path that failed.
        context: String,
        /// The underlying error text.
        message: String,
    },
}

/// Convenience alias for results carrying a [`ProjectError`].
pub type Result<T, E = ProjectError> = std::result::Result<T, E>;
