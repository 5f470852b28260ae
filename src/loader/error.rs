//! Error types for loading library documents.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort loading one document.
///
/// Tables filled before the error are kept; a store whose load failed
/// should not be trusted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The document file does not exist or cannot be read.
    #[error("library document not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// The document is not well-formed XML or has no root element.
    #[error("bad XML structure: {0}")]
    BadXmlStructure(String),

    /// Wrong root element or a `format` outside the supported range.
    #[error("unsupported format: {0}")]
    UnsupportedFormatVersion(String),

    #[error("missing required attribute: {0}")]
    MissingRequiredAttribute(String),

    #[error("bad attribute value: {0}")]
    BadAttributeValue(String),

    #[error("duplicate define: {0}")]
    DuplicateDefine(String),

    #[error("duplicate platform type: {0}")]
    DuplicatePlatformType(String),

    #[error("platform type redefined: {0}")]
    PlatformTypeRedefined(String),

    /// Every unrecognized element name of the document, sorted.
    #[error("unknown element: {}", .0.join(", "))]
    UnknownElement(Vec<String>),
}

impl LoadError {
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    pub fn xml(message: impl Into<String>) -> Self {
        Self::BadXmlStructure(message.into())
    }

    pub fn unsupported(found: impl Into<String>) -> Self {
        Self::UnsupportedFormatVersion(found.into())
    }

    /// Create a missing attribute error.
    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingRequiredAttribute(name.into())
    }

    /// Create a bad attribute value error.
    pub fn bad_value(value: impl Into<String>) -> Self {
        Self::BadAttributeValue(value.into())
    }
}

pub type LoadResult<T = ()> = Result<T, LoadError>;
