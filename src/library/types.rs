//! Type tables: POD types, platform typedefs, type-check overrides and
//! smart pointers.

/// Standard type a POD typedef maps to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PodStdType {
    #[default]
    No,
    Bool,
    Char,
    Short,
    Int,
    Long,
    LongLong,
}

impl PodStdType {
    pub fn from_name(name: &str) -> Self {
        match name {
            "bool" => PodStdType::Bool,
            "char" => PodStdType::Char,
            "short" => PodStdType::Short,
            "int" => PodStdType::Int,
            "long" => PodStdType::Long,
            "long long" => PodStdType::LongLong,
            _ => PodStdType::No,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PodType {
    /// Size in bytes, 0 when unknown.
    pub size: u32,
    /// `'s'` or `'u'` when declared.
    pub sign: Option<char>,
    pub std_type: PodStdType,
}

/// Expansion of a platform dependent typedef.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PlatformType {
    pub type_name: String,
    pub signed: bool,
    pub unsigned: bool,
    pub long: bool,
    pub pointer: bool,
    pub ptr_ptr: bool,
    pub const_ptr: bool,
}

/// Override of a type-based check for one type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TypeCheck {
    #[default]
    Default,
    Check,
    Suppress,
    CheckFiniteLifetime,
}

impl TypeCheck {
    pub fn from_element_name(name: &str) -> Option<Self> {
        match name {
            "check" => Some(TypeCheck::Check),
            "suppress" => Some(TypeCheck::Suppress),
            "checkFiniteLifetime" => Some(TypeCheck::CheckFiniteLifetime),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SmartPointer {
    pub name: String,
    pub unique: bool,
}
