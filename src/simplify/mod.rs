//! Algebraic simplifier
//!
//! A fixed-point rewriting engine over expression trees. Each iteration
//! applies, in order: structural rotation, identity elimination, negation
//! normalization, top-level negation, special-function identities,
//! polynomial combining with common-factor extraction, and constant
//! folding; the loop exits when the root's structural hash repeats. A
//! final fold then factors coefficient gcds and restores subtraction and
//! quotient shapes for display.

mod engine;
mod finalfold;
mod fold;
mod identity;
mod neg;
mod poly;
mod rotate;
mod special;

pub use engine::Simplifier;

use crate::arena::Arena;
use crate::ast::NodeId;
use crate::error::DivideByZero;

/// Simplify a tree in place with a fresh [`Simplifier`].
///
/// The driver keeps one `Simplifier` per input line instead, so the
/// original expression and its derivatives share per-line state; this
/// helper is for one-shot use.
pub fn simplify(arena: &mut Arena, root: NodeId) -> Result<(), DivideByZero> {
    Simplifier::new().simplify_tree(arena, root)
}
