//! Container descriptors.

use rustc_hash::FxHashMap;

use crate::token::TokenPattern;

/// What a container member function does to the container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Action {
    Resize,
    Clear,
    Push,
    Pop,
    Find,
    FindConst,
    Insert,
    Erase,
    Append,
    ChangeContent,
    ChangeInternal,
    Change,
    #[default]
    NoAction,
}

impl Action {
    /// Parse an `action` attribute value. Unknown names give `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "resize" => Action::Resize,
            "clear" => Action::Clear,
            "push" => Action::Push,
            "pop" => Action::Pop,
            "find" => Action::Find,
            "find-const" => Action::FindConst,
            "insert" => Action::Insert,
            "erase" => Action::Erase,
            "append" => Action::Append,
            "change-content" => Action::ChangeContent,
            "change-internal" => Action::ChangeInternal,
            "change" => Action::Change,
            _ => return None,
        })
    }
}

/// What a container member function returns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Yield {
    AtIndex,
    Item,
    Buffer,
    BufferNt,
    StartIterator,
    EndIterator,
    Iterator,
    Size,
    Empty,
    #[default]
    NoYield,
}

impl Yield {
    /// Parse a `yields` attribute value. Unknown names give `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "at_index" => Yield::AtIndex,
            "item" => Yield::Item,
            "buffer" => Yield::Buffer,
            "buffer-nt" => Yield::BufferNt,
            "start-iterator" => Yield::StartIterator,
            "end-iterator" => Yield::EndIterator,
            "iterator" => Yield::Iterator,
            "size" => Yield::Size,
            "empty" => Yield::Empty,
            _ => return None,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContainerFunction {
    pub action: Action,
    pub yield_: Yield,
    pub return_type: Option<String>,
}

/// A named member of the record produced by range-for iteration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RangeItemRecordMember {
    pub name: String,
    /// Template parameter carrying the member type, -1 when unknown.
    pub template_parameter: i32,
}

/// A modeled container type and its member functions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Container {
    /// Start pattern as written in the document.
    pub start_pattern: String,
    /// Compiled start pattern; gains a trailing `!!::` unless it ends in `<`.
    pub start: Option<TokenPattern>,
    pub end: Option<TokenPattern>,
    pub it_end: Option<TokenPattern>,
    pub functions: FxHashMap<String, ContainerFunction>,
    pub type_template_arg: i32,
    pub size_template_arg: i32,
    pub std_string_like: bool,
    pub std_associative_like: bool,
    pub unstable_erase: bool,
    pub unstable_insert: bool,
    pub op_less_allowed: bool,
    pub has_initializer_list_constructor: bool,
    pub view: bool,
    pub array_like_index_op: bool,
    pub range_item_record_type: Vec<RangeItemRecordMember>,
}

impl Default for Container {
    fn default() -> Self {
        Self {
            start_pattern: String::new(),
            start: None,
            end: None,
            it_end: None,
            functions: FxHashMap::default(),
            type_template_arg: -1,
            size_template_arg: -1,
            std_string_like: false,
            std_associative_like: false,
            unstable_erase: false,
            unstable_insert: false,
            op_less_allowed: true,
            has_initializer_list_constructor: false,
            view: false,
            array_like_index_op: false,
            range_item_record_type: Vec::new(),
        }
    }
}

impl Container {
    pub fn action_of(&self, member: &str) -> Action {
        self.functions
            .get(member)
            .map(|f| f.action)
            .unwrap_or_default()
    }

    pub fn yield_of(&self, member: &str) -> Yield {
        self.functions
            .get(member)
            .map(|f| f.yield_)
            .unwrap_or_default()
    }

    pub fn return_type_of(&self, member: &str) -> Option<&str> {
        self.functions
            .get(member)
            .and_then(|f| f.return_type.as_deref())
    }
}
