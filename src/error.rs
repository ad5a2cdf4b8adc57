//! Error types

use std::io;
use std::path::PathBuf;

/// Errors returned when exploring a namespace.
#[derive(Debug, thiserror::Error)]
pub enum ExploreError {
    /// The dotted root path does not resolve against the namespace.
    #[error("Invalid root object: '{path}' (no attribute '{segment}')")]
    InvalidRoot { path: String, segment: String },
}

/// A length or subscript call failed on a host-defined object.
///
/// The classifier absorbs these and falls back to the next rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("len() failed: {0}")]
    Length(String),

    #[error("index {index} out of range")]
    Index { index: usize },

    #[error("{0}")]
    Other(String),
}

/// Errors raised while loading a JSON snapshot into a namespace.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot root must be a JSON object")]
    RootNotObject,

    #[error("unknown tag `{0}`")]
    UnknownTag(String),

    #[error("invalid `{tag}` payload: {reason}")]
    InvalidPayload { tag: &'static str, reason: String },

    #[error("duplicate anchor `{0}`")]
    DuplicateAnchor(String),

    #[error("dangling reference to `{0}`")]
    DanglingRef(String),

    #[error("unsupported mapping key: {0}")]
    InvalidKey(String),
}
