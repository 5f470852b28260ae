//! Function contracts and their argument contracts.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::container::{Action, Yield};
use crate::base::constants::MAX_INDIRECTION;
use crate::base::{ANY_ARG, ArgNr};
use crate::valid::ValidExpr;

/// Whether the return value of a call must be used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum UseRetVal {
    #[default]
    None,
    Default,
    ErrorCode,
}

/// Declared no-return behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NoReturn {
    False,
    True,
    Maybe,
}

/// Data flow direction of an argument at one indirection level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    In,
    Out,
    InOut,
    #[default]
    Unknown,
}

impl Direction {
    /// Abbreviations are accepted; `name` may be any prefix of `in`, `out`
    /// or `inout`, tried in that order.
    pub fn from_name(name: &str) -> Self {
        if "in".starts_with(name) {
            Direction::In
        } else if "out".starts_with(name) {
            Direction::Out
        } else if "inout".starts_with(name) {
            Direction::InOut
        } else {
            Direction::Unknown
        }
    }
}

/// How large a buffer argument must at least be.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MinSizeKind {
    /// String length of argument `arg`.
    Strlen { arg: ArgNr },
    /// Value of argument `arg`.
    ArgValue { arg: ArgNr },
    /// `sizeof` of argument `arg`.
    SizeOf { arg: ArgNr },
    /// Product of the values of `arg` and `arg2`.
    Mul { arg: ArgNr, arg2: ArgNr },
    /// A literal byte count.
    Value { value: i64 },
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MinSizeRule {
    pub kind: MinSizeKind,
    /// Element type used to scale the size.
    pub base_type: Option<String>,
}

impl MinSizeRule {
    pub fn new(kind: MinSizeKind) -> Self {
        Self {
            kind,
            base_type: None,
        }
    }
}

/// Iterator role of an argument.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct IteratorInfo {
    pub it: bool,
    pub first: bool,
    pub last: bool,
    /// Number of the argument this iterator belongs to.
    pub container: i32,
}

/// Checks attached to one argument position.
#[derive(Clone, Debug, PartialEq)]
pub struct ArgumentContract {
    pub optional: bool,
    pub variadic: bool,
    pub not_null: bool,
    pub not_bool: bool,
    /// Indirection depth up to which the argument must be initialized.
    pub not_uninit: Option<u32>,
    pub formatstr: bool,
    pub strz: bool,
    pub valid: Option<ValidExpr>,
    pub minsizes: Vec<MinSizeRule>,
    pub iterator: IteratorInfo,
    pub direction: [Direction; MAX_INDIRECTION],
}

impl Default for ArgumentContract {
    fn default() -> Self {
        Self {
            optional: false,
            variadic: false,
            not_null: false,
            not_bool: false,
            not_uninit: None,
            formatstr: false,
            strz: false,
            valid: None,
            minsizes: Vec::new(),
            iterator: IteratorInfo::default(),
            direction: [Direction::Unknown; MAX_INDIRECTION],
        }
    }
}

impl ArgumentContract {
    /// Direction at `indirect`, `Unknown` outside the tracked levels.
    pub fn direction_at(&self, indirect: i32) -> Direction {
        usize::try_from(indirect)
            .ok()
            .and_then(|i| self.direction.get(i).copied())
            .unwrap_or_default()
    }
}

/// Arguments a function requires not to overlap in memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NonOverlappingData {
    pub ptr1_arg: i32,
    pub ptr2_arg: i32,
    pub size_arg: i32,
    pub strlen_arg: i32,
    pub count_arg: i32,
}

/// Severity attached to a `warn` element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WarnSeverity {
    Error,
    Warning,
    Style,
    Performance,
    Portability,
    Information,
}

impl FromStr for WarnSeverity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "error" => WarnSeverity::Error,
            "warning" => WarnSeverity::Warning,
            "style" => WarnSeverity::Style,
            "performance" => WarnSeverity::Performance,
            "portability" => WarnSeverity::Portability,
            "information" => WarnSeverity::Information,
            _ => return Err(()),
        })
    }
}

impl fmt::Display for WarnSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WarnSeverity::Error => "error",
            WarnSeverity::Warning => "warning",
            WarnSeverity::Style => "style",
            WarnSeverity::Performance => "performance",
            WarnSeverity::Portability => "portability",
            WarnSeverity::Information => "information",
        };
        f.write_str(name)
    }
}

/// C language standard revisions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CStandard {
    C89,
    C99,
    C11,
    C17,
    C23,
}

impl FromStr for CStandard {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "c89" => CStandard::C89,
            "c99" => CStandard::C99,
            "c11" => CStandard::C11,
            "c17" | "c18" => CStandard::C17,
            "c23" => CStandard::C23,
            _ => return Err(()),
        })
    }
}

/// C++ language standard revisions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CppStandard {
    Cpp03,
    Cpp11,
    Cpp14,
    Cpp17,
    Cpp20,
    Cpp23,
    Cpp26,
}

impl FromStr for CppStandard {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "c++03" => CppStandard::Cpp03,
            "c++11" => CppStandard::Cpp11,
            "c++14" => CppStandard::Cpp14,
            "c++17" => CppStandard::Cpp17,
            "c++20" => CppStandard::Cpp20,
            "c++23" => CppStandard::Cpp23,
            "c++26" => CppStandard::Cpp26,
            _ => return Err(()),
        })
    }
}

/// A diagnostic the library asks to emit for every call of a function.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WarnInfo {
    pub severity: WarnSeverity,
    /// Standard from which the warning applies.
    pub c_standard: CStandard,
    pub cpp_standard: CppStandard,
    pub message: String,
}

/// Declared return value of a function.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ReturnValue {
    /// Expression describing the value, e.g. `arg1`.
    pub expr: Option<String>,
    pub type_name: Option<String>,
    /// Argument whose container the result belongs to.
    pub container: Option<i32>,
}

/// Everything a library document says about one function.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FunctionContract {
    pub argument_checks: BTreeMap<ArgNr, ArgumentContract>,
    pub use_: bool,
    pub leak_ignore: bool,
    pub is_const: bool,
    pub is_pure: bool,
    pub use_retval: UseRetVal,
    pub ignore: bool,
    pub formatstr: bool,
    pub formatstr_scan: bool,
    pub formatstr_secure: bool,
    pub noreturn: Option<NoReturn>,
    pub return_value: ReturnValue,
    pub unknown_return_values: Vec<i64>,
    pub warn: Option<WarnInfo>,
    pub non_overlapping_data: Option<NonOverlappingData>,
    pub container_action: Action,
    pub container_yield: Yield,
    /// Return type declared by a `container` child.
    pub return_type: Option<String>,
}

impl FunctionContract {
    /// Argument contract at `nr`, falling back to the `any` entry.
    pub fn arg(&self, nr: ArgNr) -> Option<&ArgumentContract> {
        self.argument_checks
            .get(&nr)
            .or_else(|| self.argument_checks.get(&ANY_ARG))
    }

    /// Highest explicitly declared argument number (0 when none).
    pub fn max_declared_arg(&self) -> ArgNr {
        self.argument_checks.keys().copied().max().unwrap_or(0).max(0)
    }

    /// Lowest argument number marked as optional.
    pub fn first_optional_arg(&self) -> Option<ArgNr> {
        self.argument_checks
            .iter()
            .filter(|(nr, ac)| **nr > 0 && ac.optional)
            .map(|(nr, _)| *nr)
            .min()
    }

    /// Whether any argument takes a format string or is variadic.
    pub fn has_open_arity(&self) -> bool {
        self.argument_checks
            .values()
            .any(|ac| ac.formatstr || ac.variadic)
    }

    /// Number of the format string argument.
    pub fn formatstr_arg(&self) -> Option<ArgNr> {
        self.argument_checks
            .iter()
            .find(|(_, ac)| ac.formatstr)
            .map(|(nr, _)| *nr)
    }

    pub fn has_minsize(&self) -> bool {
        self.argument_checks
            .values()
            .any(|ac| !ac.minsizes.is_empty())
    }
}
