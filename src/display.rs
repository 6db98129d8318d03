//! Infix printer
//!
//! Renders a tree with minimal parentheses: a child is parenthesized iff
//! its precedence is strictly lower than its parent's, or equal but on the
//! associatively wrong side (right of `-` or `/`, left of `^`). A
//! multiplicative chain led by `-1` prints as a unary minus on the rest,
//! unparenthesized only at the very start of the output. Negative integer
//! leaves are parenthesized except at the root.

use std::fmt;

use crate::arena::Arena;
use crate::ast::{NodeId, Op, Token};
use crate::symbol::Interner;

/// Borrowing `Display` adapter for a subtree.
pub struct ExprDisplay<'a> {
    arena: &'a Arena,
    interner: &'a Interner,
    root: NodeId,
}

impl<'a> ExprDisplay<'a> {
    pub fn new(arena: &'a Arena, interner: &'a Interner, root: NodeId) -> Self {
        ExprDisplay {
            arena,
            interner,
            root,
        }
    }
}

#[derive(Clone, Copy)]
enum Parent {
    None,
    Func,
    Operator { op: Op, is_left: bool },
}

impl fmt::Display for ExprDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut printed = 0usize;
        self.write_node(f, self.root, Parent::None, &mut printed)
    }
}

impl ExprDisplay<'_> {
    fn write_node(
        &self,
        f: &mut fmt::Formatter<'_>,
        id: NodeId,
        parent: Parent,
        printed: &mut usize,
    ) -> fmt::Result {
        let a = self.arena;
        let node = *a.node(id);
        let entered_at = *printed;

        match node.token {
            Token::Int(v) => {
                if v >= 0 || matches!(parent, Parent::None) {
                    write!(f, "{}", v)?;
                } else {
                    write!(f, "({})", v)?;
                }
            }

            Token::Var(var) => {
                write!(f, "{}", self.interner.name(var))?;
            }

            Token::Func(func) => {
                write!(f, "{}(", func.name())?;
                let arg = node.lhs.expect("function node missing argument");
                self.write_node(f, arg, Parent::Func, printed)?;
                if func.arity() == 2 {
                    write!(f, ",")?;
                    let second = node.rhs.expect("binary function missing second argument");
                    self.write_node(f, second, Parent::Func, printed)?;
                }
                write!(f, ")")?;
            }

            Token::Op(op) => {
                let lhs = node.lhs.expect("operator node missing left operand");
                let rhs = node.rhs.expect("operator node missing right operand");
                let neg = op == Op::Mul && a.token(lhs).is_int(-1);

                let mut needs_paren = match parent {
                    Parent::Operator {
                        op: parent_op,
                        is_left,
                    } => {
                        let pl = parent_op.precedence();
                        let ml = op.precedence();
                        pl > ml
                            || (pl == ml
                                && ((parent_op == Op::Sub && !is_left)
                                    || (parent_op == Op::Div && !is_left)
                                    || (parent_op == Op::Pow && is_left)))
                    }
                    _ => false,
                };
                let has_parent = !matches!(parent, Parent::None);
                needs_paren =
                    !(neg && entered_at == 0) && (needs_paren || (has_parent && neg));

                if needs_paren {
                    write!(f, "(")?;
                }
                if neg {
                    write!(f, "-")?;
                } else {
                    self.write_node(
                        f,
                        lhs,
                        Parent::Operator { op, is_left: true },
                        printed,
                    )?;
                    write!(f, "{}", op.symbol())?;
                }
                self.write_node(
                    f,
                    rhs,
                    Parent::Operator { op, is_left: false },
                    printed,
                )?;
                if needs_paren {
                    write!(f, ")")?;
                }
            }
        }

        *printed += 1;
        Ok(())
    }
}
