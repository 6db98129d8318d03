//! Interactive symbolic differentiation engine
//!
//! Reads one expression per line, computes the partial derivative with
//! respect to every variable that appears, and prints one simplified
//! derivative per variable. The interesting part is not differentiation
//! (the rules are a table) but the algebraic simplifier: a fixed-point
//! rewriting engine that cancels structurally equal subtrees, folds
//! rational constants, merges like terms, extracts common factors, and
//! applies trigonometric, hyperbolic, exponential and logarithmic
//! identities, so that `d/dx x*sin(x)` comes out as `sin(x)+x*cos(x)`
//! rather than `(1*cos(x)+0*sin(x))+...`.
//!
//! # Pipeline
//!
//! lexer → parser → differentiator → simplifier → printer, with a per-line
//! driver that isolates each input line behind a fresh arena and variable
//! interner.
//!
//! # Example
//!
//! ```
//! let mut out = Vec::new();
//! symgrad::process_line("x^3", &mut out).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "x: 3*x^2\n");
//! ```

mod arena;
mod ast;
mod differentiation;
mod display;
mod error;
mod functions;
mod hash;
mod parser;
mod rational;
mod simplify;
mod symbol;

#[cfg(test)]
mod tests;

pub use arena::Arena;
pub use ast::{Node, NodeId, Op, Token};
pub use differentiation::derive;
pub use display::ExprDisplay;
pub use error::{DivideByZero, ParseError};
pub use functions::Func;
pub use parser::parse;
pub use rational::Rational;
pub use simplify::{simplify, Simplifier};
pub use symbol::{Interner, VarId};

use std::io::{self, Write};

/// Process one input line: parse, differentiate with respect to every
/// variable in first-seen order, and write the outputs (or a diagnostic)
/// to `out`.
///
/// All per-line state (arena, interner, divide-by-zero latch) lives and
/// dies inside this call; a failing line cannot affect the next one.
pub fn process_line<W: Write>(input: &str, out: &mut W) -> io::Result<()> {
    let mut arena = Arena::new();
    let mut interner = Interner::new();

    let root = match parser::parse(&mut arena, &mut interner, input) {
        Ok(Some(root)) => root,
        Ok(None) => return Ok(()),
        Err(e) => {
            writeln!(out, "{}", e)?;
            return Ok(());
        }
    };

    let mut sim = Simplifier::new();
    if sim.simplify_tree(&mut arena, root).is_err() {
        writeln!(out, "{}", DivideByZero)?;
        return Ok(());
    }

    let variables: Vec<(VarId, String)> = interner
        .iter()
        .map(|(id, name)| (id, name.to_owned()))
        .collect();

    let mut reported = false;
    for (var, name) in &variables {
        let d = derive(&mut arena, root, *var);
        match sim.simplify_tree(&mut arena, d) {
            Ok(()) => {
                writeln!(out, "{}: {}", name, ExprDisplay::new(&arena, &interner, d))?;
                arena.free_tree(d);
            }
            Err(DivideByZero) => {
                if !reported {
                    writeln!(out, "{}", DivideByZero)?;
                    reported = true;
                }
                arena.free_tree(d);
            }
        }
    }
    arena.free_tree(root);
    Ok(())
}
