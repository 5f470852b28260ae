//! # libmodel
//!
//! Library configuration knowledge base for a C/C++ static analyzer:
//! loads declarative descriptions of functions, allocators, containers and
//! types, merges them into one store and answers call-site questions.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! checks    → Lint passes consuming the store (invalid free)
//!   ↓
//! resolve   → Call-site resolution: gate, qualified names, arity
//!   ↓
//! loader    → XML documents merged into the store, LoadError
//!   ↓
//! library   → The store: contracts, allocators, containers, types
//!   ↓
//! valid     → Value-range expressions
//!   ↓
//! token     → Logos lexer, token lists, token patterns
//!   ↓
//! base      → Constants, group ids, qualified-name helpers
//! ```

// ============================================================================
// MODULES (dependency order: base → token → valid → library → loader → resolve → checks)
// ============================================================================

/// Foundation types: group ids, argument numbers, constants
pub mod base;

/// Token model: lexer, token lists with links, patterns
pub mod token;

/// Value-range expressions for argument validation
pub mod valid;

/// The knowledge base and its name-based queries
pub mod library;

/// Document loading and merging
pub mod loader;

/// Call-site resolution and queries
pub mod resolve;

/// Lint passes built on the knowledge base
pub mod checks;

// Re-export commonly needed items
pub use library::Library;
pub use loader::{LoadError, LoadResult};
pub use resolve::{CallExpr, CallResolver, SymbolDatabase, SymbolMap};

// Re-export foundation types
pub use base::{ArgNr, GroupId, ResourceKind};
