//! Foundation types shared by every other module.
//!
//! - [`GroupId`] - Allocation group identifiers
//! - [`ArgNr`] - Argument positions as declared in library documents
//! - Name list splitting and qualified-name helpers
//! - Domain constants (format versions, qualifiers, indirection depth)
//!
//! This module has NO dependencies on other libmodel modules.

pub mod constants;
mod group;
mod names;

pub use group::{GroupId, ResourceKind};
pub use constants::STD_PREFIX;
pub use names::{join_qualified, split_names, strip_global_qualifier};

/// Argument position as written in a library document.
///
/// Position 0 is the return value context, positions from 1 are the call
/// arguments and [`ANY_ARG`] stands for every position not listed explicitly.
pub type ArgNr = i32;

/// Position key for `nr="any"` and `nr="variadic"` argument entries.
pub const ANY_ARG: ArgNr = -1;
