//! Error types for skin font management

use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by the font manager
///
/// None of these are fatal: callers log them and keep whatever fonts
/// are already loaded.
#[derive(Error, Debug)]
pub enum FontError {
    #[error("Couldn't read font document {path}: {source}")]
    DocumentRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Couldn't parse font document {path}: {source}")]
    DocumentParse {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },

    #[error("Font document {path} doesn't start with <fonts>, but rather <{found}>")]
    InvalidRoot { path: PathBuf, found: String },

    #[error("Font document has no <fontset> in <fonts>, but rather <{found}>")]
    LegacyDocument { found: String },

    #[error("No unicode <fontset> with name '{0}'")]
    FontSetNotFound(String),

    #[error("Couldn't load font file {path}: {source}")]
    Rasterizer {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Font handle is no longer valid")]
    InvalidHandle,
}

pub type FontResult<T> = Result<T, FontError>;
