//! `<memory>` and `<resource>` blocks.

use tracing::debug;

use super::error::{LoadError, LoadResult};
use super::xml::Element;
use super::DocumentLoader;
use crate::base::constants::MAX_BUFFER_SIZE_ARG;
use crate::base::{ResourceKind, split_names};
use crate::library::{AllocFunc, BufferSize};

impl DocumentLoader<'_> {
    pub(crate) fn load_memory(&mut self, node: &Element) -> LoadResult {
        let kind = ResourceKind::from_element_name(&node.name).unwrap_or(ResourceKind::Memory);

        // A block whose dealloc names are already known joins that group.
        let existing = node
            .children
            .iter()
            .filter(|child| child.name == "dealloc")
            .flat_map(|child| split_names(child.text().unwrap_or_default()))
            .find_map(|name| self.lib.dealloc.get(&name).map(|af| af.group_id));
        let group_id = match existing {
            Some(id) => {
                debug!(group = %id, "allocation block joins existing group");
                id
            }
            None => self.lib.next_group_id(kind),
        };

        for child in &node.children {
            let names = split_names(child.text().unwrap_or_default());
            match child.name.as_str() {
                "alloc" | "realloc" => {
                    let mut entry = AllocFunc::new(group_id, child.int_attr("arg", -1)?);
                    entry.no_fail = child.bool_attr("no-fail", false);
                    entry.init_data = child.bool_attr("init", true);
                    if let Some(spec) = child.attr("buffer-size") {
                        let (kind, arg1, arg2) = parse_buffer_size(spec)?;
                        entry.buffer_size = kind;
                        entry.buffer_size_arg1 = arg1;
                        entry.buffer_size_arg2 = arg2;
                    }
                    let table = if child.name == "realloc" {
                        entry.realloc_arg = child.int_attr("realloc-arg", 1)?;
                        &mut self.lib.realloc
                    } else {
                        &mut self.lib.alloc
                    };
                    for name in names {
                        table.insert(name, entry);
                    }
                }
                "dealloc" => {
                    let entry = AllocFunc::new(group_id, child.int_attr("arg", 1)?);
                    for name in names {
                        self.lib.dealloc.insert(name, entry);
                    }
                }
                "use" => {
                    for name in names {
                        self.lib.functions.entry(name).or_default().use_ = true;
                    }
                }
                other => self.unknown(other),
            }
        }
        Ok(())
    }
}

/// Parse `malloc|calloc|strdup` with an optional `:a` or `:a,b` suffix.
fn parse_buffer_size(spec: &str) -> LoadResult<(BufferSize, i32, i32)> {
    let bad = || LoadError::bad_value(spec);
    let (kind, rest) = if let Some(rest) = spec.strip_prefix("malloc") {
        (BufferSize::Malloc, rest)
    } else if let Some(rest) = spec.strip_prefix("calloc") {
        (BufferSize::Calloc, rest)
    } else if let Some(rest) = spec.strip_prefix("strdup") {
        (BufferSize::Strdup, rest)
    } else {
        return Err(bad());
    };

    let (mut arg1, mut arg2) = (1, 2);
    if rest.is_empty() {
        return Ok((kind, arg1, arg2));
    }
    let args = rest.strip_prefix(':').ok_or_else(bad)?;
    let mut digits = args.chars();
    arg1 = digits.next().and_then(buffer_size_arg).ok_or_else(bad)?;
    if digits.next() == Some(',') {
        if let Some(second) = digits.next().and_then(buffer_size_arg) {
            arg2 = second;
        }
    }
    Ok((kind, arg1, arg2))
}

fn buffer_size_arg(c: char) -> Option<i32> {
    c.to_digit(10)
        .and_then(|d| i32::try_from(d).ok())
        .filter(|d| (1..=MAX_BUFFER_SIZE_ARG).contains(d))
}
