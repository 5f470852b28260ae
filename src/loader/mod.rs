//! Loading and merging library documents into a [`Library`].
//!
//! A document is an XML tree rooted at `<def format="N">`. Each top-level
//! element is merged into the store in document order:
//!
//! ```text
//! memory / resource  -> alloc, dealloc, realloc tables (shared group id)
//! define             -> define set
//! function           -> function contracts
//! container          -> container descriptors (inherits by copy)
//! smart-pointer      -> smart pointer table
//! type-checks        -> type-check overrides
//! podtype            -> POD type table
//! platformtype       -> platform typedef tables
//! reflection, markup -> reflection and markup tables
//! entrypoint         -> entry point set
//! ```
//!
//! Unknown element names are collected over the whole document and
//! reported together as [`LoadError::UnknownElement`] after everything else
//! has been merged. The first other error stops the load.

mod container;
mod error;
mod function;
mod markup;
mod memory;
mod types;
mod xml;

use std::collections::BTreeSet;
use std::path::Path;

use tracing::debug;

pub use error::{LoadError, LoadResult};
pub use xml::{Element, parse_document};

use crate::base::constants::{DEFAULT_FORMAT, MAX_FORMAT, ROOT_ELEMENT};
use crate::library::Library;

impl Library {
    /// Load the document at `path`.
    ///
    /// A document already loaded under the same canonical path is skipped.
    /// The path is only recorded once its load succeeded.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> LoadResult {
        let path = path.as_ref();
        let canonical = path
            .canonicalize()
            .map_err(|_| LoadError::file_not_found(path))?;

        if self.files.contains(&canonical) {
            debug!(path = %canonical.display(), "library document already loaded");
            return Ok(());
        }

        let source =
            std::fs::read_to_string(&canonical).map_err(|_| LoadError::file_not_found(path))?;
        debug!(path = %canonical.display(), "loading library document");
        self.load_str(&source)?;
        self.files.insert(canonical);
        Ok(())
    }

    /// Load a document from its text.
    pub fn load_str(&mut self, source: &str) -> LoadResult {
        let root = parse_document(source)?;
        self.load_document(&root)
    }

    /// Merge an already parsed document.
    pub fn load_document(&mut self, root: &Element) -> LoadResult {
        if root.name != ROOT_ELEMENT {
            return Err(LoadError::unsupported(root.name.clone()));
        }
        let format = root
            .int_attr("format", DEFAULT_FORMAT)
            .map_err(|_| LoadError::unsupported(root.attr("format").unwrap_or_default()))?;
        if !(1..=MAX_FORMAT).contains(&format) {
            return Err(LoadError::unsupported(format.to_string()));
        }

        let mut loader = DocumentLoader::new(self);
        for node in &root.children {
            loader.load_node(node)?;
        }
        loader.finish()?;
        debug!(
            functions = self.functions.len(),
            containers = self.containers.len(),
            "library document merged"
        );
        Ok(())
    }
}

/// Merges one document into a library.
pub(crate) struct DocumentLoader<'a> {
    pub(crate) lib: &'a mut Library,
    unknown: BTreeSet<String>,
}

impl<'a> DocumentLoader<'a> {
    fn new(lib: &'a mut Library) -> Self {
        Self {
            lib,
            unknown: BTreeSet::new(),
        }
    }

    /// Record an element name nobody understood.
    pub(crate) fn unknown(&mut self, name: &str) {
        self.unknown.insert(name.to_string());
    }

    fn load_node(&mut self, node: &Element) -> LoadResult {
        match node.name.as_str() {
            "memory" | "resource" => self.load_memory(node),
            "define" => self.load_define(node),
            "function" => self.load_functions(node),
            "reflection" => self.load_reflection(node),
            "markup" => self.load_markup(node),
            "container" => self.load_container(node),
            "smart-pointer" => self.load_smart_pointer(node),
            "type-checks" => self.load_type_checks(node),
            "podtype" => self.load_podtype(node),
            "platformtype" => self.load_platform_type(node),
            "entrypoint" => self.load_entrypoint(node),
            other => {
                self.unknown(other);
                Ok(())
            }
        }
    }

    fn load_define(&mut self, node: &Element) -> LoadResult {
        let name = node.required_attr("name")?;
        let value = node.required_attr("value")?;
        if !self.lib.defines.insert(format!("{name} {value}")) {
            return Err(LoadError::DuplicateDefine(name.to_string()));
        }
        Ok(())
    }

    fn load_entrypoint(&mut self, node: &Element) -> LoadResult {
        let name = node.required_attr("name")?;
        self.lib.entrypoints.insert(name.to_string());
        Ok(())
    }

    fn finish(self) -> LoadResult {
        if self.unknown.is_empty() {
            return Ok(());
        }
        Err(LoadError::UnknownElement(self.unknown.into_iter().collect()))
    }
}
