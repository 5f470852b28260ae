//! The library knowledge base.
//!
//! [`Library`] holds every table a loaded document contributes. It is filled
//! by [`crate::loader`] and read by [`crate::resolve`]; after loading it is
//! never mutated by queries. Each analysis run may clone its own copy.
//!
//! Queries here are keyed by name or by type tokens. Call-site queries that
//! need callee resolution live on [`crate::resolve::CallResolver`].

mod alloc;
mod container;
mod function;
mod markup;
mod types;

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

pub use alloc::{AllocFunc, BufferSize};
pub use container::{Action, Container, ContainerFunction, RangeItemRecordMember, Yield};
pub use function::{
    ArgumentContract, CStandard, CppStandard, Direction, FunctionContract, IteratorInfo,
    MinSizeKind, MinSizeRule, NoReturn, NonOverlappingData, ReturnValue, UseRetVal, WarnInfo,
    WarnSeverity,
};
pub use markup::{CodeBlock, Exporter, Markup};
pub use types::{PlatformType, PodStdType, PodType, SmartPointer, TypeCheck};

use crate::base::{GroupId, ResourceKind, STD_PREFIX};
use crate::token::TokenList;

/// Which classification [`Library::detect_container`] may return.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DetectMode {
    ContainerOnly,
    IteratorOnly,
    Both,
}

/// Result of container detection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Detected<'a> {
    pub id: &'a str,
    pub container: &'a Container,
    pub is_iterator: bool,
}

/// In-memory knowledge base.
#[derive(Clone, Debug, Default)]
pub struct Library {
    pub(crate) functions: FxHashMap<String, FunctionContract>,
    pub(crate) alloc: BTreeMap<String, AllocFunc>,
    pub(crate) dealloc: BTreeMap<String, AllocFunc>,
    pub(crate) realloc: BTreeMap<String, AllocFunc>,
    /// Last minted group id.
    pub(crate) alloc_id: u32,
    pub(crate) containers: IndexMap<String, Container>,
    pub(crate) smart_pointers: FxHashMap<String, SmartPointer>,
    pub(crate) defines: BTreeSet<String>,
    pub(crate) pod_types: FxHashMap<String, PodType>,
    pub(crate) platform_types: BTreeMap<String, PlatformType>,
    pub(crate) platforms: BTreeMap<String, BTreeMap<String, PlatformType>>,
    pub(crate) type_checks: BTreeMap<(String, String), TypeCheck>,
    pub(crate) reflection: BTreeMap<String, i32>,
    pub(crate) markup: BTreeMap<String, Markup>,
    pub(crate) exporters: BTreeMap<String, Exporter>,
    pub(crate) entrypoints: FxHashSet<String>,
    pub(crate) files: BTreeSet<PathBuf>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint the next group id of `kind`, skipping ids of the other kind.
    pub(crate) fn next_group_id(&mut self, kind: ResourceKind) -> GroupId {
        loop {
            self.alloc_id += 1;
            if kind.owns(self.alloc_id) {
                if let Some(id) = GroupId::new(self.alloc_id) {
                    return id;
                }
            }
        }
    }

    /// Documents loaded so far, by canonical path.
    pub fn loaded_files(&self) -> impl Iterator<Item = &PathBuf> {
        self.files.iter()
    }

    // ---- functions ----

    pub fn functions(&self) -> &FxHashMap<String, FunctionContract> {
        &self.functions
    }

    pub fn function_by_name(&self, name: &str) -> Option<&FunctionContract> {
        self.functions.get(name)
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn is_use(&self, name: &str) -> bool {
        self.functions.get(name).is_some_and(|f| f.use_)
    }

    pub fn is_leak_ignore(&self, name: &str) -> bool {
        self.functions.get(name).is_some_and(|f| f.leak_ignore)
    }

    pub fn ignore_function(&self, name: &str) -> bool {
        self.functions.get(name).is_some_and(|f| f.ignore)
    }

    /// With `pure` set, asks for purity; otherwise for constness.
    pub fn is_function_const_name(&self, name: &str, pure: bool) -> bool {
        self.functions
            .get(name)
            .is_some_and(|f| if pure { f.is_pure } else { f.is_const })
    }

    /// All `warn` entries, keyed by function name.
    pub fn function_warnings(&self) -> impl Iterator<Item = (&str, &WarnInfo)> {
        self.functions
            .iter()
            .filter_map(|(name, f)| f.warn.as_ref().map(|w| (name.as_str(), w)))
    }

    // ---- allocation tables ----

    pub fn alloc_func_by_name(&self, name: &str) -> Option<&AllocFunc> {
        lookup_alloc(&self.alloc, name)
    }

    pub fn dealloc_func_by_name(&self, name: &str) -> Option<&AllocFunc> {
        lookup_alloc(&self.dealloc, name)
    }

    pub fn realloc_func_by_name(&self, name: &str) -> Option<&AllocFunc> {
        lookup_alloc(&self.realloc, name)
    }

    pub fn alloc_id_by_name(&self, name: &str) -> Option<GroupId> {
        self.alloc_func_by_name(name).map(|af| af.group_id)
    }

    pub fn dealloc_id_by_name(&self, name: &str) -> Option<GroupId> {
        self.dealloc_func_by_name(name).map(|af| af.group_id)
    }

    pub fn is_memory(id: GroupId) -> bool {
        id.is_memory()
    }

    pub fn is_resource(id: GroupId) -> bool {
        id.is_resource()
    }

    // ---- containers ----

    pub fn containers(&self) -> &IndexMap<String, Container> {
        &self.containers
    }

    pub fn container(&self, id: &str) -> Option<&Container> {
        self.containers.get(id)
    }

    pub fn detect_container(&self, tokens: &TokenList) -> Option<Detected<'_>> {
        self.detect(tokens, DetectMode::ContainerOnly, false)
    }

    pub fn detect_iterator(&self, tokens: &TokenList) -> Option<Detected<'_>> {
        self.detect(tokens, DetectMode::IteratorOnly, false)
    }

    pub fn detect_container_or_iterator(
        &self,
        tokens: &TokenList,
        without_std: bool,
    ) -> Option<Detected<'_>> {
        self.detect(tokens, DetectMode::Both, without_std)
    }

    /// Classify the type spelled by `tokens` from its first token.
    ///
    /// Containers are tried in load order and the first match wins. An
    /// iterator end pattern is tested before the container end pattern; a
    /// missing iterator end pattern matches any linked type.
    pub fn detect(
        &self,
        tokens: &TokenList,
        mode: DetectMode,
        without_std: bool,
    ) -> Option<Detected<'_>> {
        let first_linked = tokens
            .iter()
            .take_while(|t| t.var_id.is_none())
            .position(|t| t.link.is_some());

        for (id, container) in &self.containers {
            let Some(start) = &container.start else {
                continue;
            };
            let detected = |is_iterator| Detected {
                id,
                container,
                is_iterator,
            };

            if mode != DetectMode::IteratorOnly && container.end.is_none() {
                if start.matches_without_std(tokens, 0, without_std) {
                    trace!(container = %id, "detected container without end pattern");
                    return Some(detected(false));
                }
                continue;
            }

            let Some(close) = first_linked.and_then(|i| tokens.link(i)) else {
                continue;
            };
            if !start.matches_without_std(tokens, 0, without_std) {
                continue;
            }
            if mode != DetectMode::ContainerOnly
                && container
                    .it_end
                    .as_ref()
                    .is_none_or(|p| p.matches(tokens, close))
            {
                trace!(container = %id, "detected iterator");
                return Some(detected(true));
            }
            if mode != DetectMode::IteratorOnly
                && container
                    .end
                    .as_ref()
                    .is_some_and(|p| p.matches(tokens, close))
            {
                trace!(container = %id, "detected container");
                return Some(detected(false));
            }
        }
        None
    }

    // ---- smart pointers ----

    pub fn smart_pointers(&self) -> &FxHashMap<String, SmartPointer> {
        &self.smart_pointers
    }

    pub fn smart_pointer(&self, class_name: &str) -> Option<&SmartPointer> {
        self.smart_pointers.get(class_name)
    }

    /// Look up the smart pointer named by the qualified type at the start
    /// of `tokens`. With `without_std`, `std::` is prepended first.
    pub fn detect_smart_pointer(&self, tokens: &TokenList, without_std: bool) -> Option<&SmartPointer> {
        let mut name = String::new();
        if without_std {
            name.push_str(STD_PREFIX);
        }
        let mut i = usize::from(tokens.str_at(0) == "::");
        while tokens.get(i).is_some_and(|t| t.is_name()) && tokens.str_at(i + 1) == "::" {
            name.push_str(tokens.str_at(i));
            name.push_str("::");
            i += 2;
        }
        if tokens.get(i).is_some_and(|t| t.is_name()) {
            name.push_str(tokens.str_at(i));
        }
        self.smart_pointers.get(&name)
    }

    pub fn is_smart_pointer(&self, tokens: &TokenList) -> bool {
        self.detect_smart_pointer(tokens, false).is_some()
    }

    // ---- types ----

    pub fn podtype(&self, name: &str) -> Option<&PodType> {
        self.pod_types.get(name)
    }

    /// Typedef expansion of `name` on `platform`, falling back to the
    /// platform independent table.
    pub fn platform_type(&self, name: &str, platform: &str) -> Option<&PlatformType> {
        self.platforms
            .get(platform)
            .and_then(|types| types.get(name))
            .or_else(|| self.platform_types.get(name))
    }

    pub fn type_check(&self, check: &str, type_name: &str) -> TypeCheck {
        self.type_checks
            .get(&(check.to_string(), type_name.to_string()))
            .copied()
            .unwrap_or_default()
    }

    pub fn has_any_type_check(&self, type_name: &str) -> bool {
        self.type_checks.keys().any(|(_, t)| t == type_name)
    }

    // ---- misc ----

    /// Preprocessor defines, each as `"name value"`.
    pub fn defines(&self) -> &BTreeSet<String> {
        &self.defines
    }

    pub fn is_entrypoint(&self, name: &str) -> bool {
        name == "main" || self.entrypoints.contains(name)
    }

    pub fn is_reflection(&self, call: &str) -> bool {
        self.reflection.contains_key(call)
    }

    pub fn reflection_argument(&self, call: &str) -> Option<i32> {
        self.reflection.get(call).copied()
    }

    // ---- markup ----

    pub fn markup_extensions(&self) -> impl Iterator<Item = &str> {
        self.markup.keys().map(String::as_str)
    }

    /// Settings for the extension of `path`, matched case-insensitively.
    pub fn markup_for(&self, path: &str) -> Option<&Markup> {
        self.markup.get(&extension_lowercase(path))
    }

    pub fn is_markup_file(&self, path: &str) -> bool {
        self.markup_for(path).is_some()
    }

    pub fn report_errors(&self, path: &str) -> bool {
        self.markup_for(path).is_none_or(|m| m.report_errors)
    }

    pub fn process_markup_after_code(&self, path: &str) -> bool {
        self.markup_for(path).is_none_or(|m| m.process_after_code)
    }

    pub fn is_markup_keyword(&self, path: &str, keyword: &str) -> bool {
        self.markup_for(path).is_some_and(|m| m.keywords.contains(keyword))
    }

    pub fn is_importer(&self, path: &str, importer: &str) -> bool {
        self.markup_for(path).is_some_and(|m| m.importers.contains(importer))
    }

    pub fn is_executable_block(&self, path: &str, token: &str) -> bool {
        self.markup_for(path).is_some_and(|m| m.code_blocks.is_block(token))
    }

    pub fn block_start(&self, path: &str) -> Option<&str> {
        self.markup_for(path).map(|m| m.code_blocks.start.as_str())
    }

    pub fn block_end(&self, path: &str) -> Option<&str> {
        self.markup_for(path).map(|m| m.code_blocks.end.as_str())
    }

    pub fn block_start_offset(&self, path: &str) -> Option<i32> {
        self.markup_for(path).map(|m| m.code_blocks.offset)
    }

    pub fn is_exporter(&self, prefix: &str) -> bool {
        self.exporters.contains_key(prefix)
    }

    pub fn is_exported_prefix(&self, prefix: &str, token: &str) -> bool {
        self.exporters.get(prefix).is_some_and(|e| e.is_prefix(token))
    }

    pub fn is_exported_suffix(&self, prefix: &str, token: &str) -> bool {
        self.exporters.get(prefix).is_some_and(|e| e.is_suffix(token))
    }
}

/// Table lookup that retries without a leading `std::`.
pub(crate) fn lookup_alloc<'a>(table: &'a BTreeMap<String, AllocFunc>, name: &str) -> Option<&'a AllocFunc> {
    table.get(name).or_else(|| {
        name.strip_prefix(STD_PREFIX)
            .and_then(|unqualified| table.get(unqualified))
    })
}

fn extension_lowercase(path: &str) -> String {
    let file = path.rsplit(['/', '\\']).next().unwrap_or(path);
    match file.rfind('.') {
        Some(dot) => file[dot..].to_lowercase(),
        None => String::new(),
    }
}
