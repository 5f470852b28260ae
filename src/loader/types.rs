//! `<type-checks>`, `<podtype>` and `<platformtype>` elements.

use std::collections::BTreeSet;

use super::error::{LoadError, LoadResult};
use super::xml::Element;
use super::DocumentLoader;
use crate::base::split_names;
use crate::library::{PlatformType, PodStdType, PodType, TypeCheck};

impl DocumentLoader<'_> {
    pub(crate) fn load_type_checks(&mut self, node: &Element) -> LoadResult {
        for check in &node.children {
            for entry in &check.children {
                let Some(type_name) = entry.text() else {
                    continue;
                };
                if let Some(kind) = TypeCheck::from_element_name(&entry.name) {
                    self.lib
                        .type_checks
                        .insert((check.name.clone(), type_name.to_string()), kind);
                }
            }
        }
        Ok(())
    }

    pub(crate) fn load_podtype(&mut self, node: &Element) -> LoadResult {
        let names = node.required_attr("name")?;
        let size = match node.attr("size") {
            Some(size) => size.trim().parse().map_err(|_| LoadError::bad_value(size))?,
            None => 0,
        };
        let pod = PodType {
            size,
            sign: node.attr("sign").and_then(|s| s.chars().next()),
            std_type: node
                .attr("stdtype")
                .map(PodStdType::from_name)
                .unwrap_or_default(),
        };
        for name in split_names(names) {
            self.lib.pod_types.insert(name, pod);
        }
        Ok(())
    }

    pub(crate) fn load_platform_type(&mut self, node: &Element) -> LoadResult {
        let name = node.required_attr("name")?;
        let value = node.required_attr("value")?;

        let mut ty = PlatformType {
            type_name: value.to_string(),
            ..PlatformType::default()
        };
        let mut platforms = BTreeSet::new();
        for child in &node.children {
            match child.name.as_str() {
                "platform" => {
                    platforms.insert(child.required_attr("type")?.to_string());
                }
                "signed" => ty.signed = true,
                "unsigned" => ty.unsigned = true,
                "long" => ty.long = true,
                "pointer" => ty.pointer = true,
                "ptr_ptr" => ty.ptr_ptr = true,
                "const_ptr" => ty.const_ptr = true,
                other => self.unknown(other),
            }
        }

        if platforms.is_empty() {
            check_redefinition(self.lib.platform_type(name, ""), &ty, name)?;
            self.lib.platform_types.insert(name.to_string(), ty);
            return Ok(());
        }
        for platform in platforms {
            check_redefinition(self.lib.platform_type(name, &platform), &ty, name)?;
            self.lib
                .platforms
                .entry(platform)
                .or_default()
                .insert(name.to_string(), ty.clone());
        }
        Ok(())
    }
}

fn check_redefinition(existing: Option<&PlatformType>, ty: &PlatformType, name: &str) -> LoadResult {
    match existing {
        None => Ok(()),
        Some(existing) if existing == ty => Err(LoadError::DuplicatePlatformType(name.to_string())),
        Some(_) => Err(LoadError::PlatformTypeRedefined(name.to_string())),
    }
}
