//! Fixed function table
//!
//! The closed set of elementary functions the engine understands, keyed by
//! [`Func`]. Each entry carries the printable name, the declared parameter
//! count, and the derivative rule applied during differentiation.

use crate::arena::Arena;
use crate::ast::NodeId;
use crate::differentiation as diff;
use crate::symbol::VarId;

/// Function identifiers, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Func {
    Ln,
    Log,
    Cos,
    Sin,
    Tan,
    Pow,
    Exp,
    Sinh,
    Cosh,
}

/// Derivative rule: `(arena, first operand, second operand, variable)` to
/// the derivative tree. Rules deep-copy whatever input subtrees they embed.
pub type DerivativeFn = fn(&mut Arena, NodeId, Option<NodeId>, VarId) -> NodeId;

/// One row of the function table.
pub struct FuncDef {
    pub name: &'static str,
    pub arity: usize,
    pub derivative: DerivativeFn,
}

static TABLE: [FuncDef; 9] = [
    FuncDef {
        name: "ln",
        arity: 1,
        derivative: diff::d_ln,
    },
    FuncDef {
        name: "log",
        arity: 2,
        derivative: diff::d_log,
    },
    FuncDef {
        name: "cos",
        arity: 1,
        derivative: diff::d_cos,
    },
    FuncDef {
        name: "sin",
        arity: 1,
        derivative: diff::d_sin,
    },
    FuncDef {
        name: "tan",
        arity: 1,
        derivative: diff::d_tan,
    },
    FuncDef {
        name: "pow",
        arity: 2,
        derivative: diff::d_pow,
    },
    FuncDef {
        name: "exp",
        arity: 1,
        derivative: diff::d_exp,
    },
    FuncDef {
        name: "sinh",
        arity: 1,
        derivative: diff::d_sinh,
    },
    FuncDef {
        name: "cosh",
        arity: 1,
        derivative: diff::d_cosh,
    },
];

impl Func {
    pub const ALL: [Func; 9] = [
        Func::Ln,
        Func::Log,
        Func::Cos,
        Func::Sin,
        Func::Tan,
        Func::Pow,
        Func::Exp,
        Func::Sinh,
        Func::Cosh,
    ];

    /// Table entry for this function.
    pub fn def(self) -> &'static FuncDef {
        &TABLE[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.def().name
    }

    pub fn arity(self) -> usize {
        self.def().arity
    }

    /// Classify an identifier; `None` means it is a variable name.
    pub fn from_name(name: &str) -> Option<Func> {
        Func::ALL.iter().copied().find(|f| f.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(Func::from_name("sin"), Some(Func::Sin));
        assert_eq!(Func::from_name("log"), Some(Func::Log));
        assert_eq!(Func::from_name("sinx"), None);
        assert_eq!(Func::from_name(""), None);
    }

    #[test]
    fn test_arity() {
        assert_eq!(Func::Ln.arity(), 1);
        assert_eq!(Func::Log.arity(), 2);
        assert_eq!(Func::Pow.arity(), 2);
        assert_eq!(Func::Cosh.arity(), 1);
    }

    #[test]
    fn test_table_names_match_variants() {
        for f in Func::ALL {
            assert_eq!(Func::from_name(f.name()), Some(f));
        }
    }
}
