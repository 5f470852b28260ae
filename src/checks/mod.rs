//! Lint passes that consume a loaded [`Library`](crate::library::Library).
//!
//! A pass reads a token list of one function body together with a
//! [`CallResolver`](crate::resolve::CallResolver) and returns its findings as
//! [`Diagnostic`]s.

mod invalid_free;

use std::sync::Arc;

use text_size::TextSize;

pub use invalid_free::check_invalid_free;

/// Severity level of a diagnostic, shared with `warn` entries.
pub use crate::library::WarnSeverity as Severity;

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// One finding of a lint pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Offset of the token the finding is reported at.
    pub offset: TextSize,
    pub severity: Severity,
    /// Check id (e.g., "invalidFree").
    pub code: Option<Arc<str>>,
    pub message: Arc<str>,
    /// The finding may be a false positive.
    pub inconclusive: bool,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(offset: TextSize, message: impl Into<Arc<str>>) -> Self {
        Self {
            offset,
            severity: Severity::Error,
            code: None,
            message: message.into(),
            inconclusive: false,
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(offset: TextSize, message: impl Into<Arc<str>>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(offset, message)
        }
    }

    /// Set the check id.
    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_inconclusive(mut self, inconclusive: bool) -> Self {
        self.inconclusive = inconclusive;
        self
    }
}

/// Check ids.
pub mod codes {
    pub const INVALID_FREE: &str = "invalidFree";
}

/// Settings shared by the lint passes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CheckSettings {
    /// Report inconclusive findings instead of discarding what made them
    /// uncertain.
    pub inconclusive: bool,
}
