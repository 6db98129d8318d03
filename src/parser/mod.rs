//! Parser - converts an input line to an expression tree
//!
//! Pipeline: lex → insert implicit multiplication → precedence parse.
//! Variables are interned during lexing, in first-seen order, so the driver
//! can enumerate them afterwards even though the tree only stores ids.

mod implicit_mul;
mod lexer;
mod pratt;

use crate::arena::Arena;
use crate::ast::NodeId;
use crate::error::ParseError;
use crate::symbol::Interner;

/// Parse one input line into an expression tree.
///
/// Returns `Ok(None)` for a line with no tokens at all (blank, or nothing
/// but skipped characters). Allocation happens in `arena`; on error the
/// partially built nodes are left for the per-line arena drop to reclaim.
pub fn parse(
    arena: &mut Arena,
    interner: &mut Interner,
    input: &str,
) -> Result<Option<NodeId>, ParseError> {
    let tokens = lexer::lex(input, interner);
    if tokens.is_empty() {
        return Ok(None);
    }
    let tokens = implicit_mul::insert_implicit_mul(tokens);
    pratt::parse_expression(arena, &tokens).map(Some)
}
