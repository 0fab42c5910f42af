use std::fmt;

use ecow::EcoString;
use tap::Pipe;

use super::{Func, Map, OxErr, OxResult, Value};

/// The kind of a [`Value`], for type errors and introspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Nil,
    Bool,
    Int,
    Str,
    List,
    Map,
    Func,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => "Nil",
            Self::Bool => "Bool",
            Self::Int => "Int",
            Self::Str => "Str",
            Self::List => "List",
            Self::Map => "Map",
            Self::Func => "Func",
        }
        .pipe(|it| write!(f, "{it}"))
    }
}

impl Value {
    #[must_use]
    pub const fn kind(&self) -> ValueType {
        match self {
            Self::Nil => ValueType::Nil,
            Self::Bool(_) => ValueType::Bool,
            Self::Int(_) => ValueType::Int,
            Self::Str(_) => ValueType::Str,
            Self::List(_) => ValueType::List,
            Self::Map(_) => ValueType::Map,
            Self::Func(_) => ValueType::Func,
        }
    }

    pub fn as_str(&self) -> OxResult<&EcoString> {
        match self {
            Self::Str(s) => Ok(s),
            _ => Err(self.type_err(ValueType::Str)),
        }
    }

    pub fn as_map(&self) -> OxResult<&Map> {
        match self {
            Self::Map(m) => Ok(m),
            _ => Err(self.type_err(ValueType::Map)),
        }
    }

    pub fn as_func(&self) -> OxResult<&Func> {
        match self {
            Self::Func(f) => Ok(f),
            _ => Err(self.type_err(ValueType::Func)),
        }
    }

    pub fn to_bool(&self) -> OxResult<bool> {
        match self {
            Self::Bool(b) => Ok(*b),
            Self::Nil => Ok(false),
            Self::Int(i) => Ok(*i != 0),
            _ => Err(self.type_err(ValueType::Bool)),
        }
    }

    fn type_err(&self, expected: ValueType) -> OxErr {
        OxErr::TypeErr {
            expected,
            found: self.kind(),
        }
    }
}
