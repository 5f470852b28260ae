//! Allocation, deallocation and reallocation table entries.

use crate::base::{ArgNr, GroupId};

/// How the size of the allocated buffer follows from the arguments.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BufferSize {
    #[default]
    None,
    /// Size is argument `arg1`.
    Malloc,
    /// Size is `arg1 * arg2`.
    Calloc,
    /// Size is the string length of `arg1` plus one.
    Strdup,
}

/// One entry of the `alloc`, `dealloc` or `realloc` table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AllocFunc {
    pub group_id: GroupId,
    /// Argument receiving or releasing the resource; -1 means the return value.
    pub arg: ArgNr,
    pub no_fail: bool,
    pub init_data: bool,
    pub buffer_size: BufferSize,
    pub buffer_size_arg1: ArgNr,
    pub buffer_size_arg2: ArgNr,
    /// Argument being reallocated; only meaningful for `realloc` entries.
    pub realloc_arg: ArgNr,
}

impl AllocFunc {
    pub fn new(group_id: GroupId, arg: ArgNr) -> Self {
        Self {
            group_id,
            arg,
            no_fail: false,
            init_data: true,
            buffer_size: BufferSize::None,
            buffer_size_arg1: 1,
            buffer_size_arg2: 2,
            realloc_arg: -1,
        }
    }
}
