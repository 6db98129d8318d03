//! Fixed-point simplification engine
//!
//! Runs the rewrite passes in a fixed order until the root's structural
//! hash repeats, then applies the final fold. Termination of the rewrite
//! system has not been proved, so the loop is also capped; if the cap is
//! hit the current tree is accepted as canonical.
//!
//! Set `SYMGRAD_TRACE=1` to log per-iteration root hashes to stderr.

use std::sync::OnceLock;

use rustc_hash::FxHashSet;

use crate::arena::Arena;
use crate::ast::NodeId;
use crate::error::DivideByZero;

use super::{finalfold, fold, identity, neg, poly, rotate, special};

/// Default iteration cap for the fixed-point loop.
const DEFAULT_MAX_ITERATIONS: usize = 64;

fn trace_enabled() -> bool {
    static TRACE: OnceLock<bool> = OnceLock::new();
    *TRACE.get_or_init(|| {
        std::env::var("SYMGRAD_TRACE")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    })
}

/// Per-line simplifier state.
///
/// One `Simplifier` serves a whole input line: the coefficient-rotation
/// memo (`extracted`) is shared by the original expression and every
/// derivative, and is dropped with the line. Each `simplify_tree` call
/// keeps its own seen-hash set.
pub struct Simplifier {
    max_iterations: usize,
    extracted: FxHashSet<u64>,
}

impl Default for Simplifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Simplifier {
    pub fn new() -> Self {
        Simplifier {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            extracted: FxHashSet::default(),
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    /// Simplify the subtree at `root` in place: the fixed-point loop, then
    /// the final fold. A divide-by-zero anywhere abandons the run and
    /// leaves the tree in its then-current (still structurally valid)
    /// state.
    pub fn simplify_tree(
        &mut self,
        arena: &mut Arena,
        root: NodeId,
    ) -> Result<(), DivideByZero> {
        self.fixed_point(arena, root)?;
        finalfold::run(arena, root, &mut self.extracted)
    }

    fn fixed_point(&mut self, arena: &mut Arena, root: NodeId) -> Result<(), DivideByZero> {
        let mut seen: FxHashSet<u64> = FxHashSet::default();

        for iteration in 0..self.max_iterations {
            rotate::run(arena, root);
            identity::run(arena, root);
            neg::run(arena, root);
            neg::top(arena, root);
            special::run(arena, root);
            poly::run(arena, root, self)?;
            fold::run(arena, root, &mut self.extracted)?;

            let h = arena.hash(root);
            if trace_enabled() {
                eprintln!(
                    "[symgrad] iteration {}: root hash {:016x}, {} live nodes",
                    iteration,
                    h,
                    arena.live()
                );
            }
            if !seen.insert(h) {
                return Ok(());
            }
        }

        if trace_enabled() {
            eprintln!(
                "[symgrad] iteration cap {} hit, accepting current tree",
                self.max_iterations
            );
        }
        Ok(())
    }
}
