// Static types known to the type checker

use std::fmt;

/// The closed set of types a binding can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Null,
    Int,
    Float,
    Str,
    Bool,
    Fn,
    Void,
}

impl Type {
    pub fn name(self) -> &'static str {
        match self {
            Type::Null => "Null",
            Type::Int => "Int",
            Type::Float => "Float",
            Type::Str => "Str",
            Type::Bool => "Bool",
            Type::Fn => "Fn",
            Type::Void => "Void",
        }
    }

    /// Numbers are typed by value: integral values are `Int`, the rest `Float`
    pub fn of_number(value: f64) -> Type {
        if value.fract() == 0.0 {
            Type::Int
        } else {
            Type::Float
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
