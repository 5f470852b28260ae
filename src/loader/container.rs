//! `<container>` and `<smart-pointer>` elements.

use super::error::{LoadError, LoadResult};
use super::xml::Element;
use super::DocumentLoader;
use crate::library::{Action, Container, RangeItemRecordMember, SmartPointer, Yield};
use crate::token::TokenPattern;

impl DocumentLoader<'_> {
    pub(crate) fn load_container(&mut self, node: &Element) -> LoadResult {
        let id = node.required_attr("id")?;

        // Inheritance copies the parent as loaded so far.
        let mut container = match node.attr("inherits") {
            Some(parent) => self
                .lib
                .containers
                .get(parent)
                .cloned()
                .ok_or_else(|| LoadError::bad_value(parent))?,
            None => self.lib.containers.get(id).cloned().unwrap_or_default(),
        };

        if let Some(start) = node.attr("startPattern") {
            container.start_pattern = start.to_string();
            let mut pattern = compile(start)?;
            if !start.ends_with('<') {
                pattern = pattern
                    .extended("!!::")
                    .map_err(|_| LoadError::bad_value(start))?;
            }
            container.start = Some(pattern);
        }
        // An empty end pattern clears an inherited one.
        if let Some(end) = node.attr("endPattern") {
            container.end = compile_non_empty(end)?;
        }
        if let Some(it_end) = node.attr("itEndPattern") {
            container.it_end = compile_non_empty(it_end)?;
        }
        if let Some(value) = node.attr("opLessAllowed") {
            container.op_less_allowed = value == "true";
        }
        if let Some(value) = node.attr("hasInitializerListConstructor") {
            container.has_initializer_list_constructor = value == "true";
        }
        if let Some(value) = node.attr("view") {
            container.view = value == "true";
        }

        for child in &node.children {
            match child.name.as_str() {
                "size" | "access" | "other" => {
                    self.load_container_functions(child, &mut container)?;
                    if child.name == "size" && child.has_attr("templateParameter") {
                        container.size_template_arg = child.int_attr("templateParameter", -1)?;
                    } else if child.name == "access" {
                        if let Some(index_op) = child.attr("indexOperator") {
                            container.array_like_index_op = index_op == "array-like";
                        }
                    }
                }
                "type" => {
                    if child.has_attr("templateParameter") {
                        container.type_template_arg = child.int_attr("templateParameter", -1)?;
                    }
                    if let Some(string) = child.attr("string") {
                        container.std_string_like = string == "std-like";
                    }
                    if let Some(associative) = child.attr("associative") {
                        container.std_associative_like = associative == "std-like";
                    }
                    if let Some(unstable) = child.attr("unstable") {
                        container.unstable_erase |= unstable.contains("erase");
                        container.unstable_insert |= unstable.contains("insert");
                    }
                }
                "rangeItemRecordType" => {
                    for member in &child.children {
                        container.range_item_record_type.push(RangeItemRecordMember {
                            name: member.attr("name").unwrap_or_default().to_string(),
                            template_parameter: member.int_attr("templateParameter", -1)?,
                        });
                    }
                }
                other => self.unknown(other),
            }
        }

        self.lib.containers.insert(id.to_string(), container);
        Ok(())
    }

    fn load_container_functions(&mut self, node: &Element, container: &mut Container) -> LoadResult {
        for function in &node.children {
            if function.name != "function" {
                self.unknown(&function.name);
                continue;
            }
            let name = function.required_attr("name")?;
            let action = match function.attr("action") {
                Some(action) => Action::from_name(action).ok_or_else(|| LoadError::bad_value(action))?,
                None => Action::NoAction,
            };
            let yield_ = match function.attr("yields") {
                Some(yields) => Yield::from_name(yields).ok_or_else(|| LoadError::bad_value(yields))?,
                None => Yield::NoYield,
            };

            let entry = container.functions.entry(name.to_string()).or_default();
            entry.action = action;
            entry.yield_ = yield_;
            if let Some(return_type) = function.attr("returnType") {
                entry.return_type = Some(return_type.to_string());
            }
        }
        Ok(())
    }

    pub(crate) fn load_smart_pointer(&mut self, node: &Element) -> LoadResult {
        let class_name = node.required_attr("class-name")?;
        let pointer = self
            .lib
            .smart_pointers
            .entry(class_name.to_string())
            .or_insert_with(SmartPointer::default);
        pointer.name = class_name.to_string();
        if node.children.iter().any(|child| child.name == "unique") {
            pointer.unique = true;
        }
        Ok(())
    }
}

fn compile(pattern: &str) -> LoadResult<TokenPattern> {
    TokenPattern::compile(pattern).map_err(|_| LoadError::bad_value(pattern))
}

fn compile_non_empty(pattern: &str) -> LoadResult<Option<TokenPattern>> {
    if pattern.trim().is_empty() {
        return Ok(None);
    }
    compile(pattern).map(Some)
}
