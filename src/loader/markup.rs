//! `<reflection>` and `<markup>` elements.

use super::error::{LoadError, LoadResult};
use super::xml::Element;
use super::DocumentLoader;
use crate::library::Markup;

impl DocumentLoader<'_> {
    pub(crate) fn load_reflection(&mut self, node: &Element) -> LoadResult {
        for call in &node.children {
            if call.name != "call" {
                self.unknown(&call.name);
                continue;
            }
            let arg = call.required_attr("arg")?;
            let arg = arg.trim().parse().map_err(|_| LoadError::bad_value(arg))?;
            self.lib
                .reflection
                .insert(call.text().unwrap_or_default().to_string(), arg);
        }
        Ok(())
    }

    pub(crate) fn load_markup(&mut self, node: &Element) -> LoadResult {
        let extension = node.required_attr("ext")?.to_string();
        let mut markup = self.lib.markup.remove(&extension).unwrap_or_default();
        markup.report_errors = node.attr_is("reporterrors", "true");
        markup.process_after_code = node.attr_is("aftercode", "true");

        let result = self.fill_markup(node, &mut markup);
        self.lib.markup.insert(extension, markup);
        result
    }

    fn fill_markup(&mut self, node: &Element, markup: &mut Markup) -> LoadResult {
        for section in &node.children {
            match section.name.as_str() {
                "keywords" => {
                    for keyword in &section.children {
                        if keyword.name == "keyword" {
                            markup.keywords.insert(keyword.required_attr("name")?.to_string());
                        } else {
                            self.unknown(&keyword.name);
                        }
                    }
                }
                "exported" => {
                    for exporter in &section.children {
                        if exporter.name != "exporter" {
                            self.unknown(&exporter.name);
                            continue;
                        }
                        let prefix = exporter.required_attr("prefix")?;
                        let mut prefixes = Vec::new();
                        let mut suffixes = Vec::new();
                        for affix in &exporter.children {
                            let text = affix.text().unwrap_or_default().to_string();
                            match affix.name.as_str() {
                                "prefix" => prefixes.push(text),
                                "suffix" => suffixes.push(text),
                                other => self.unknown(other),
                            }
                        }
                        let entry = self.lib.exporters.entry(prefix.to_string()).or_default();
                        entry.prefixes.extend(prefixes);
                        entry.suffixes.extend(suffixes);
                    }
                }
                "imported" => {
                    for importer in &section.children {
                        if importer.name == "importer" {
                            markup
                                .importers
                                .insert(importer.text().unwrap_or_default().to_string());
                        } else {
                            self.unknown(&importer.name);
                        }
                    }
                }
                "codeblocks" => {
                    for block in &section.children {
                        match block.name.as_str() {
                            "block" => {
                                if let Some(name) = block.attr("name") {
                                    markup.code_blocks.blocks.insert(name.to_string());
                                }
                            }
                            "structure" => {
                                if let Some(start) = block.attr("start") {
                                    markup.code_blocks.start = start.to_string();
                                }
                                if let Some(end) = block.attr("end") {
                                    markup.code_blocks.end = end.to_string();
                                }
                                if block.has_attr("offset") {
                                    markup.code_blocks.offset = block.int_attr("offset", 0)?;
                                }
                            }
                            other => self.unknown(other),
                        }
                    }
                }
                other => self.unknown(other),
            }
        }
        Ok(())
    }
}
