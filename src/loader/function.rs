//! `<function>` elements and their argument contracts.

use tracing::debug;

use super::error::{LoadError, LoadResult};
use super::xml::Element;
use super::DocumentLoader;
use crate::base::constants::MAX_INDIRECTION;
use crate::base::{ANY_ARG, split_names};
use crate::library::{
    Action, CStandard, CppStandard, Direction, FunctionContract, MinSizeKind,
    MinSizeRule, NoReturn, NonOverlappingData, UseRetVal, WarnInfo, WarnSeverity, Yield,
};
use crate::valid::ValidExpr;

impl DocumentLoader<'_> {
    pub(crate) fn load_functions(&mut self, node: &Element) -> LoadResult {
        let names = node.required_attr("name")?;
        for name in split_names(names) {
            self.load_function(node, &name)?;
        }
        Ok(())
    }

    fn load_function(&mut self, node: &Element, name: &str) -> LoadResult {
        if self.lib.functions.contains_key(name) {
            debug!(function = name, "updating existing function contract");
        }
        let mut func = self.lib.functions.remove(name).unwrap_or_default();
        let result = self.fill_function(node, name, &mut func);
        self.lib.functions.insert(name.to_string(), func);
        result
    }

    fn fill_function(&mut self, node: &Element, name: &str, func: &mut FunctionContract) -> LoadResult {
        for child in &node.children {
            match child.name.as_str() {
                "noreturn" => {
                    func.noreturn = Some(match child.text().unwrap_or_default() {
                        "false" => NoReturn::False,
                        "maybe" => NoReturn::Maybe,
                        _ => NoReturn::True,
                    });
                }
                "pure" => func.is_pure = true,
                "const" => {
                    func.is_pure = true;
                    func.is_const = true;
                }
                "leak-ignore" => func.leak_ignore = true,
                "not-overlapping-data" => {
                    func.non_overlapping_data = Some(NonOverlappingData {
                        ptr1_arg: child.int_attr("ptr1-arg", -1)?,
                        ptr2_arg: child.int_attr("ptr2-arg", -1)?,
                        size_arg: child.int_attr("size-arg", -1)?,
                        strlen_arg: child.int_attr("strlen-arg", -1)?,
                        count_arg: child.int_attr("count-arg", -1)?,
                    });
                }
                "use-retval" => {
                    func.use_retval = if child.attr_is("type", "error-code") {
                        UseRetVal::ErrorCode
                    } else {
                        UseRetVal::Default
                    };
                }
                "returnValue" => {
                    if let Some(expr) = child.text() {
                        func.return_value.expr = Some(expr.to_string());
                    }
                    if let Some(ty) = child.attr("type") {
                        func.return_value.type_name = Some(ty.to_string());
                    }
                    if child.has_attr("container") {
                        func.return_value.container = Some(child.int_attr("container", -1)?);
                    }
                    if child.attr_is("unknownValues", "all") {
                        func.unknown_return_values = vec![i64::MIN, i64::MAX];
                    }
                }
                "arg" => self.load_arg(child, func)?,
                "ignorefunction" => func.ignore = true,
                "formatstr" => {
                    func.formatstr = true;
                    func.formatstr_scan = child.bool_attr("scan", false);
                    func.formatstr_secure = child.bool_attr("secure", false);
                }
                "warn" => func.warn = Some(load_warn(child, name)?),
                "container" => {
                    func.container_action = Action::NoAction;
                    func.container_yield = Yield::NoYield;
                    if let Some(action) = child.attr("action") {
                        func.container_action =
                            Action::from_name(action).ok_or_else(|| LoadError::bad_value(action))?;
                    }
                    if let Some(yields) = child.attr("yields") {
                        func.container_yield =
                            Yield::from_name(yields).ok_or_else(|| LoadError::bad_value(yields))?;
                    }
                    if let Some(ty) = child.attr("returnType") {
                        func.return_type = Some(ty.to_string());
                    }
                }
                other => self.unknown(other),
            }
        }
        Ok(())
    }

    fn load_arg(&mut self, node: &Element, func: &mut FunctionContract) -> LoadResult {
        let nr_text = node.required_attr("nr")?;
        let variadic = nr_text == "variadic";
        let nr = if variadic || nr_text == "any" {
            ANY_ARG
        } else {
            node.int_attr("nr", ANY_ARG)?
        };

        let ac = func.argument_checks.entry(nr).or_default();
        ac.optional = node.has_attr("default");
        ac.variadic = variadic;

        if let Some(direction) = node.attr("direction") {
            let direction = Direction::from_name(direction);
            if node.has_attr("indirect") {
                let level = indirect_level(node)?;
                ac.direction[level] = direction;
            } else {
                ac.direction = [direction; MAX_INDIRECTION];
            }
        }

        for child in &node.children {
            let indirect = u32::try_from(child.int_attr("indirect", 0)?)
                .map_err(|_| LoadError::bad_value(child.attr("indirect").unwrap_or_default()))?;
            match child.name.as_str() {
                "not-bool" => ac.not_bool = true,
                "not-null" => ac.not_null = true,
                "not-uninit" => ac.not_uninit = Some(indirect),
                "formatstr" => ac.formatstr = true,
                "strz" => ac.strz = true,
                "valid" => {
                    let text = child.text().unwrap_or_default();
                    let valid = ValidExpr::parse(text).ok_or_else(|| {
                        LoadError::bad_value(if text.is_empty() { "\"\"" } else { text })
                    })?;
                    ac.valid = Some(valid);
                }
                "minsize" => ac.minsizes.push(load_minsize(child)?),
                "iterator" => {
                    ac.iterator.it = true;
                    ac.iterator.first = child.attr_is("type", "first");
                    ac.iterator.last = child.attr_is("type", "last");
                    ac.iterator.container = child.int_attr("container", 0)?;
                }
                other => self.unknown(other),
            }
        }

        if ac.not_uninit == Some(0) && ac.not_null {
            ac.not_uninit = Some(1);
        }
        Ok(())
    }
}

fn indirect_level(node: &Element) -> LoadResult<usize> {
    let raw = node.int_attr("indirect", 0)?;
    usize::try_from(raw)
        .ok()
        .filter(|level| *level < MAX_INDIRECTION)
        .ok_or_else(|| LoadError::bad_value(raw.to_string()))
}

fn load_minsize(node: &Element) -> LoadResult<MinSizeRule> {
    let ty = node.required_attr("type")?;
    let single_digit = |attr: &str| -> LoadResult<i32> {
        let text = node.required_attr(attr)?;
        match text.as_bytes() {
            [d @ b'0'..=b'9'] => Ok(i32::from(*d - b'0')),
            _ => Err(LoadError::bad_value(text)),
        }
    };

    let kind = match ty {
        "strlen" => MinSizeKind::Strlen { arg: single_digit("arg")? },
        "argvalue" => MinSizeKind::ArgValue { arg: single_digit("arg")? },
        "sizeof" => MinSizeKind::SizeOf { arg: single_digit("arg")? },
        "mul" => MinSizeKind::Mul {
            arg: single_digit("arg")?,
            arg2: single_digit("arg2")?,
        },
        "value" => {
            let text = node.required_attr("value")?;
            let value: i64 = text.trim().parse().map_err(|_| LoadError::bad_value(text))?;
            if value <= 0 {
                return Err(LoadError::bad_value(text));
            }
            MinSizeKind::Value { value }
        }
        other => return Err(LoadError::bad_value(other)),
    };

    let mut rule = MinSizeRule::new(kind);
    rule.base_type = node.attr("baseType").map(str::to_string);
    Ok(rule)
}

fn load_warn(node: &Element, name: &str) -> LoadResult<WarnInfo> {
    let severity = node.required_attr("severity")?;
    let severity: WarnSeverity = severity
        .parse()
        .map_err(|_| LoadError::bad_value(severity))?;

    let c_standard = match node.attr("cstd") {
        Some(cstd) => cstd.parse().map_err(|_| LoadError::bad_value(cstd))?,
        None => CStandard::C89,
    };
    let cpp_standard = match node.attr("cppstd") {
        Some(cppstd) => cppstd.parse().map_err(|_| LoadError::bad_value(cppstd))?,
        None => CppStandard::Cpp03,
    };

    let message = match (node.attr("reason"), node.attr("alternatives")) {
        (Some(reason), Some(alternatives)) => recommendation(reason, name, &split_names(alternatives)),
        _ => node
            .text()
            .ok_or_else(|| LoadError::missing("\"reason\" and \"alternatives\" or some text."))?
            .to_string(),
    };

    Ok(WarnInfo {
        severity,
        c_standard,
        cpp_standard,
        message,
    })
}

/// `"<reason> function '<name>' called. It is recommended to use 'a', 'b' or 'c' instead."`
fn recommendation(reason: &str, name: &str, alternatives: &[String]) -> String {
    let mut message = format!("{reason} function '{name}' called. It is recommended to use ");
    let count = alternatives.len();
    for (i, alternative) in alternatives.iter().enumerate() {
        message.push('\'');
        message.push_str(alternative);
        message.push('\'');
        if i + 1 == count {
            message.push_str(" instead.");
        } else if i + 2 == count {
            message.push_str(" or ");
        } else {
            message.push_str(", ");
        }
    }
    message
}
