//! Per-extension markup language settings.

use std::collections::BTreeSet;

/// Exported symbol affixes for one exporter prefix.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Exporter {
    pub prefixes: BTreeSet<String>,
    pub suffixes: BTreeSet<String>,
}

impl Exporter {
    pub fn is_prefix(&self, prefix: &str) -> bool {
        self.prefixes.contains(prefix)
    }

    pub fn is_suffix(&self, suffix: &str) -> bool {
        self.suffixes.contains(suffix)
    }
}

/// Executable code blocks embedded in a markup file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeBlock {
    pub start: String,
    pub end: String,
    pub offset: i32,
    pub blocks: BTreeSet<String>,
}

impl CodeBlock {
    pub fn is_block(&self, name: &str) -> bool {
        self.blocks.contains(name)
    }
}

/// Settings of one markup file extension.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Markup {
    pub report_errors: bool,
    pub process_after_code: bool,
    pub keywords: BTreeSet<String>,
    pub importers: BTreeSet<String>,
    pub code_blocks: CodeBlock,
}
