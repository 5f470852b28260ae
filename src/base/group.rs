//! Allocation group identifiers.

use std::fmt;

/// Identifier pairing allocation functions with their deallocation functions.
///
/// Memory groups and general resource groups are partitioned by parity so
/// the two categories can never share an id: memory groups are odd,
/// resource groups are even.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(u32);

impl GroupId {
    /// Wrap a raw id. Returns `None` for 0, which never names a group.
    pub fn new(raw: u32) -> Option<Self> {
        (raw != 0).then_some(Self(raw))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// The category this id was minted for.
    pub fn kind(self) -> ResourceKind {
        if self.0 % 2 == 1 {
            ResourceKind::Memory
        } else {
            ResourceKind::Resource
        }
    }

    pub fn is_memory(self) -> bool {
        self.kind() == ResourceKind::Memory
    }

    pub fn is_resource(self) -> bool {
        self.kind() == ResourceKind::Resource
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Category of an allocation block (`<memory>` or `<resource>`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Memory,
    Resource,
}

impl ResourceKind {
    /// Element name of the block declaring this category.
    pub fn element_name(self) -> &'static str {
        match self {
            ResourceKind::Memory => "memory",
            ResourceKind::Resource => "resource",
        }
    }

    pub fn from_element_name(name: &str) -> Option<Self> {
        match name {
            "memory" => Some(ResourceKind::Memory),
            "resource" => Some(ResourceKind::Resource),
            _ => None,
        }
    }

    /// Whether `raw` lies in this category's partition.
    pub fn owns(self, raw: u32) -> bool {
        raw != 0 && GroupId(raw).kind() == self
    }
}
