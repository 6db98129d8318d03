//! Polynomial combining and common-factor extraction
//!
//! Flattens `+`-chains into monomials and works in stages: structural
//! simplification of each monomial (with power merging), coefficient
//! extraction, like-term grouping by shape hash, pairwise common-factor
//! extraction, and coefficient reattachment. Shape grouping relies on the
//! commutative structural hash: two monomials that differ only by factor
//! order and coefficient collapse into one.

use rustc_hash::FxHashMap;

use crate::arena::Arena;
use crate::ast::{Node, NodeId, Op, Token};
use crate::error::DivideByZero;
use crate::rational::Rational;

use super::engine::Simplifier;
use super::fold::extract_coefficient;
use super::{identity, neg, rotate};

pub(crate) fn run(
    a: &mut Arena,
    id: NodeId,
    sim: &mut Simplifier,
) -> Result<bool, DivideByZero> {
    polynomial(a, id, sim)
}

fn polynomial(a: &mut Arena, id: NodeId, sim: &mut Simplifier) -> Result<bool, DivideByZero> {
    let mut changed = false;

    // Stage I: simplify each monomial structurally.
    let terms = a.chain(id, Op::Add);
    for &p in &terms {
        if !a.is_const(p) {
            changed |= monomial_structure(a, p, sim)?;
        }
    }

    // Stage II: strip each monomial to coefficient * shape.
    let terms = a.chain(id, Op::Add);
    let mut coeffs: Vec<Rational> = Vec::with_capacity(terms.len());
    for &q in &terms {
        if a.is_const(q) {
            coeffs.push(Rational::int(1));
            continue;
        }
        let (swept, f) = extract_coefficient(a, q)?;
        changed |= swept;
        changed |= monomial_impl(a, q);
        coeffs.push(f);
    }

    // Stage III: group monomials by shape hash, summing coefficients into
    // the first of each group.
    let mut first_of: FxHashMap<u64, usize> = FxHashMap::default();
    for i in 0..terms.len() {
        let q = terms[i];
        if a.is_const(q) {
            continue;
        }
        let h = a.hash(q);
        if let Some(&first) = first_of.get(&h) {
            let extra = coeffs[i];
            coeffs[first] += extra;
            coeffs[i] = Rational::int(0);
            a.replace_int(q, 0);
            changed = true;
        } else {
            first_of.insert(h, i);
        }
    }

    // Stage IV: extract common factors between surviving pairs.
    for i in 0..terms.len() {
        if a.is_const(terms[i]) {
            continue;
        }
        for j in 0..i {
            if a.is_const(terms[j]) {
                continue;
            }
            changed |= merge_common(a, &terms, &mut coeffs, i, j, sim)?;
            if a.is_const(terms[i]) {
                break;
            }
        }
    }

    // Stage V: put the coefficients back at the head of each monomial.
    for (i, &q) in terms.iter().enumerate() {
        if a.is_const(q) {
            continue;
        }
        let c = coeffs[i].to_node(a);
        a.wrap_left(q, Op::Mul, c);
        changed |= monomial_final(a, q);
    }

    Ok(changed)
}

/// Recursive monomial cleanup; a nested `+`-chain recurses back into the
/// polynomial machinery.
fn monomial_structure(
    a: &mut Arena,
    id: NodeId,
    sim: &mut Simplifier,
) -> Result<bool, DivideByZero> {
    if a.token(id).is_op(Op::Add) {
        return polynomial(a, id, sim);
    }
    let node = *a.node(id);
    let mut changed = false;
    if let Some(l) = node.lhs {
        changed |= monomial_impl(a, l);
    }
    if let Some(r) = node.rhs {
        changed |= monomial_impl(a, r);
    }
    if let Some(l) = node.lhs {
        changed |= monomial_structure(a, l, sim)?;
    }
    if let Some(r) = node.rhs {
        changed |= monomial_structure(a, r, sim)?;
    }
    Ok(changed)
}

/// One round of in-monomial rewriting: merge powers over equal bases, then
/// the identity, negation and top-negation passes.
fn monomial_impl(a: &mut Arena, id: NodeId) -> bool {
    let mut changed = merge_power(a, id);
    changed |= rotate::run(a, id);
    changed |= identity::run(a, id);
    changed |= neg::run(a, id);
    changed |= neg::top(a, id);
    changed
}

/// Final monomial cleanup after coefficient reattachment.
fn monomial_final(a: &mut Arena, id: NodeId) -> bool {
    let mut changed = rotate::run(a, id);
    changed |= identity::run(a, id);
    changed |= neg::run(a, id);
    changed |= neg::top(a, id);
    changed
}

/// Group equal bases within the multiplicative chain at `id`:
/// `x*x → x^2`, `x*x^k → x^(k+1)`, `x^a*x^b → x^(a+b)`, with
/// `(y*z)^k → y^k*z^k` applied first so products under powers can group.
fn merge_power(a: &mut Arena, id: NodeId) -> bool {
    let mut bases: FxHashMap<u64, NodeId> = FxHashMap::default();
    merge_same(a, id, &mut bases)
}

fn merge_same(a: &mut Arena, id: NodeId, bases: &mut FxHashMap<u64, NodeId>) -> bool {
    let mut changed = false;

    // (y*z)^k → y^k * z^k
    if a.token(id).is_op(Op::Pow) {
        let l = a.lhs(id).expect("power missing base");
        if a.token(l).is_op(Op::Mul) {
            let k = a.rhs(id).expect("power missing exponent");
            let z = a.rhs(l).expect("product missing right factor");
            let k_dup = a.duplicate(k);
            a.set_token(id, Token::Op(Op::Mul));
            a.set_token(l, Token::Op(Op::Pow));
            a.set_rhs(l, Some(k_dup));
            let zk = a.pow(z, k);
            a.set_rhs(id, Some(zk));
            changed = true;
        }
    }

    if a.token(id).is_op(Op::Mul) {
        let l = a.lhs(id).expect("product missing left factor");
        let r = a.rhs(id).expect("product missing right factor");
        changed |= merge_same(a, l, bases);
        changed |= merge_same(a, r, bases);
        return changed;
    }
    if a.is_const(id) {
        return changed;
    }

    if a.token(id).is_op(Op::Pow) {
        let base = a.lhs(id).expect("power missing base");
        let h = a.hash(base);
        if let Some(&kept) = bases.get(&h) {
            // fold this exponent into the registered occurrence; this one
            // decays to base^0 and dies in the identity pass
            let b = a.rhs(id).expect("power missing exponent");
            let zero = a.int(0);
            a.set_rhs(id, Some(zero));
            if a.token(kept).is_op(Op::Pow) {
                let old = a.rhs(kept).expect("power missing exponent");
                let sum = a.add(old, b);
                a.set_rhs(kept, Some(sum));
            } else {
                let one = a.int(1);
                let exp = a.add(one, b);
                a.wrap_right(kept, Op::Pow, exp);
            }
            true
        } else {
            bases.insert(h, id);
            changed
        }
    } else {
        let h = a.hash(id);
        if let Some(&kept) = bases.get(&h) {
            a.replace_int(id, 1);
            if a.token(kept).is_op(Op::Pow) {
                let old = a.rhs(kept).expect("power missing exponent");
                let one = a.int(1);
                let sum = a.add(old, one);
                a.set_rhs(kept, Some(sum));
            } else {
                let two = a.int(2);
                a.wrap_right(kept, Op::Pow, two);
            }
            true
        } else {
            bases.insert(h, id);
            changed
        }
    }
}

/// Try to pull the common multiplicative factors out of the pair
/// `(terms[i], terms[j])`. On success `terms[i]` holds the recursively
/// simplified `F * (c_i*r_i + c_j*r_j)` and `terms[j]` becomes `0`.
fn merge_common(
    a: &mut Arena,
    terms: &[NodeId],
    coeffs: &mut [Rational],
    i: usize,
    j: usize,
    sim: &mut Simplifier,
) -> Result<bool, DivideByZero> {
    let di = terms[i];
    let dj = terms[j];

    let mut map_i: FxHashMap<u64, NodeId> = FxHashMap::default();
    for p in a.chain(di, Op::Mul) {
        map_i.insert(a.hash(p), p);
    }
    let mut map_j: FxHashMap<u64, NodeId> = FxHashMap::default();
    for p in a.chain(dj, Op::Mul) {
        map_j.insert(a.hash(p), p);
    }

    let mut common: Vec<(u64, NodeId, NodeId)> = map_i
        .iter()
        .filter_map(|(&h, &pi)| map_j.get(&h).map(|&pj| (h, pi, pj)))
        .collect();
    if common.is_empty() {
        return Ok(false);
    }
    common.sort_by_key(|&(h, _, _)| h);

    // Blank the common factors out, snapshot the residues, restore.
    let mut stash: Vec<(NodeId, Node)> = Vec::with_capacity(common.len() * 2);
    for &(_, pi, pj) in &common {
        stash.push((pi, *a.node(pi)));
        stash.push((pj, *a.node(pj)));
        a.set_node(pi, Node::leaf(Token::Int(1)));
        a.set_node(pj, Node::leaf(Token::Int(1)));
    }
    let ri = a.duplicate(di);
    let rj = a.duplicate(dj);
    for (p, saved) in stash {
        a.set_node(p, saved);
    }

    // F = product of the common factors, as a balanced tree.
    let factor_dups: Vec<NodeId> = common.iter().map(|&(_, pi, _)| a.duplicate(pi)).collect();
    let f = balanced_product(a, &factor_dups);

    let ci = coeffs[i].to_node(a);
    let cj = coeffs[j].to_node(a);
    let ti = a.mul(ci, ri);
    let tj = a.mul(cj, rj);
    let sum = a.add(ti, tj);
    let k = a.mul(f, sum);

    sim.simplify_tree(a, k)?;

    let old = *a.node(di);
    if let Some(l) = old.lhs {
        a.free_tree(l);
    }
    if let Some(r) = old.rhs {
        a.free_tree(r);
    }
    a.hoist(di, k);
    a.replace_int(dj, 0);
    coeffs[i] = Rational::int(1);
    coeffs[j] = Rational::int(1);
    Ok(true)
}

fn balanced_product(a: &mut Arena, parts: &[NodeId]) -> NodeId {
    debug_assert!(!parts.is_empty());
    if parts.len() == 1 {
        return parts[0];
    }
    let mid = parts.len() / 2;
    let l = balanced_product(a, &parts[..mid]);
    let r = balanced_product(a, &parts[mid..]);
    a.mul(l, r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::VarId;

    #[test]
    fn test_merge_power_squares() {
        // x*x → x^2 * 1-ish shape with exponent arithmetic pending
        let mut a = Arena::new();
        let x1 = a.var(VarId(0));
        let x2 = a.var(VarId(0));
        let m = a.mul(x1, x2);
        assert!(merge_power(&mut a, m));
        // first occurrence became x^2, second became 1
        let l = a.lhs(m).unwrap();
        let r = a.rhs(m).unwrap();
        assert!(a.token(l).is_op(Op::Pow));
        assert_eq!(a.token(a.rhs(l).unwrap()), Token::Int(2));
        assert_eq!(a.token(r), Token::Int(1));
    }

    #[test]
    fn test_merge_power_exponent_sum() {
        // x^2 * x^3 → x^(2+3) * x^0
        let mut a = Arena::new();
        let x1 = a.var(VarId(0));
        let two = a.int(2);
        let p1 = a.pow(x1, two);
        let x2 = a.var(VarId(0));
        let three = a.int(3);
        let p2 = a.pow(x2, three);
        let m = a.mul(p1, p2);
        assert!(merge_power(&mut a, m));
        let e = a.rhs(p1).unwrap();
        assert!(a.token(e).is_op(Op::Add));
        assert_eq!(a.token(a.rhs(p2).unwrap()), Token::Int(0));
    }

    #[test]
    fn test_power_of_product_distributes() {
        // (y*z)^2 → y^2 * z^2
        let mut a = Arena::new();
        let y = a.var(VarId(0));
        let z = a.var(VarId(1));
        let prod = a.mul(y, z);
        let two = a.int(2);
        let p = a.pow(prod, two);
        assert!(merge_power(&mut a, p));
        assert!(a.token(p).is_op(Op::Mul));
        let l = a.lhs(p).unwrap();
        let r = a.rhs(p).unwrap();
        assert!(a.token(l).is_op(Op::Pow));
        assert!(a.token(r).is_op(Op::Pow));
    }
}
