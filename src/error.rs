//! Unified error type shared by the layout codec and the deploy compiler.
//!
//! Every variant carries the path or context needed to point the user at the
//! offending entry. Codec errors abort the whole load or save; partial graphs
//! are never returned.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::types::Language;

#[derive(Debug, Error)]
pub enum CompilerError {
    /// A project or block descriptor document is absent.
    #[error("descriptor not found at '{path}'")]
    MissingDescriptor { path: PathBuf },

    /// A block descriptor carries no source-language tag.
    #[error("no language set on block descriptor at '{path}'")]
    MissingLanguage { path: PathBuf, descriptor: String },

    /// A shared-file symlink's resolved target matches no known shared file.
    #[error("shared file was not found in shared file folder: '{path}'")]
    UnresolvedSharedFileLink { path: PathBuf },

    /// No deployment runtime mapping exists for a block's language.
    /// Non-fatal for the deploy compiler, which substitutes a placeholder shim.
    #[error("no deployment runtime mapping for language '{language}'")]
    UnsupportedRuntime { language: Language },

    /// A relationship references an unknown state or breaks a transition rule.
    #[error("invalid relationship '{id}': {message}")]
    InvalidRelationship { id: String, message: String },

    #[error("i/o failure at '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A descriptor document exists but does not parse.
    #[error("malformed descriptor at '{path}'")]
    Descriptor {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl CompilerError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CompilerError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn descriptor(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        CompilerError::Descriptor {
            path: path.into(),
            source,
        }
    }
}
