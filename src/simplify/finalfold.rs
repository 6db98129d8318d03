//! Final fold
//!
//! One extra pass after the fixed-point loop converges: factor the rational
//! gcd out of every polynomial's coefficients, merge powers that share an
//! exponent, move the remaining `-1` factors back into `-` nodes for
//! display, and re-run constant folding and identity elimination until the
//! cleanup stops producing new work.

use num_integer::Integer;
use num_traits::Zero;
use rustc_hash::FxHashMap;
use rustc_hash::FxHashSet;

use crate::arena::Arena;
use crate::ast::{NodeId, Op, Token};
use crate::error::DivideByZero;
use crate::functions::Func;
use crate::rational::Rational;

use super::fold::extract_coefficient;
use super::{fold, identity, neg, rotate};

const CLEANUP_CAP: usize = 64;

pub(crate) fn run(
    a: &mut Arena,
    id: NodeId,
    extracted: &mut FxHashSet<u64>,
) -> Result<(), DivideByZero> {
    gcd_poly(a, id)?;
    final_neg(a, id);
    neg::top(a, id);

    // The sign moves above can expose new foldable constants.
    for _ in 0..CLEANUP_CAP {
        let mut changed = fold::run(a, id, extracted)?;
        changed |= rotate::run(a, id);
        changed |= identity::run(a, id);
        if !changed {
            break;
        }
    }
    Ok(())
}

/// Factor the gcd of all monomial coefficients out of the `+`-chain at
/// `id` as a leading multiplier.
fn gcd_poly(a: &mut Arena, id: NodeId) -> Result<(), DivideByZero> {
    if a.token(id).is_int(0) {
        return Ok(());
    }

    let terms = a.chain(id, Op::Add);
    for &p in &terms {
        gcd_mono(a, p)?;
    }

    let terms = a.chain(id, Op::Add);
    let mut coeffs: Vec<Rational> = Vec::with_capacity(terms.len());
    for &q in &terms {
        coeffs.push(extract_coefficient(a, q)?.1);
        merge_shared_exponents(a, q);
    }

    let mut n0 = coeffs[0].numer();
    let mut d0 = coeffs[0].denom();
    for c in &coeffs {
        n0 = n0.gcd(&c.numer());
        d0 = d0.lcm(&c.denom());
    }
    let g = Rational::new(n0.abs(), d0.abs())?;
    if g.is_zero() {
        return Err(DivideByZero);
    }

    for (i, &q) in terms.iter().enumerate() {
        let f = coeffs[i].checked_div(g)?;
        let c = f.to_node(a);
        a.wrap_left(q, Op::Mul, c);
    }
    let g_node = g.to_node(a);
    a.wrap_left(id, Op::Mul, g_node);
    Ok(())
}

/// Descend through a monomial; nested `+`-chains get their own gcd pass.
fn gcd_mono(a: &mut Arena, id: NodeId) -> Result<(), DivideByZero> {
    if a.token(id).is_op(Op::Add) {
        return gcd_poly(a, id);
    }
    let node = *a.node(id);
    if let Some(l) = node.lhs {
        gcd_mono(a, l)?;
    }
    if let Some(r) = node.rhs {
        gcd_mono(a, r)?;
    }
    Ok(())
}

/// `y^x * z^x → (y*z)^x` within one multiplicative chain: powers sharing a
/// structurally equal exponent multiply their bases together; the emptied
/// power keeps a base of `1` for the identity pass to erase.
fn merge_shared_exponents(a: &mut Arena, id: NodeId) {
    let mut by_exponent: FxHashMap<u64, NodeId> = FxHashMap::default();
    merge_by_exponent(a, id, &mut by_exponent);
}

fn merge_by_exponent(a: &mut Arena, id: NodeId, by_exponent: &mut FxHashMap<u64, NodeId>) {
    let t = a.token(id);
    if t.is_op(Op::Mul) {
        let l = a.lhs(id).expect("product missing left factor");
        let r = a.rhs(id).expect("product missing right factor");
        merge_by_exponent(a, l, by_exponent);
        merge_by_exponent(a, r, by_exponent);
    } else if t.is_op(Op::Pow) {
        let e = a.rhs(id).expect("power missing exponent");
        let h = a.hash(e);
        if let Some(&kept) = by_exponent.get(&h) {
            let kept_base = a.lhs(kept).expect("power missing base");
            let this_base = a.lhs(id).expect("power missing base");
            let merged = a.mul(kept_base, this_base);
            a.set_lhs(kept, Some(merged));
            let one = a.int(1);
            a.set_lhs(id, Some(one));
        } else {
            by_exponent.insert(h, id);
        }
    }
}

/// Final negation cleanup: `a+(-1)*b → a-b` and friends, `x^((-1)*y) →
/// 1/x^y`, `exp((-1)*x) → 1/exp(x)`, with the odd/even function sign rules
/// applied once more.
fn final_neg(a: &mut Arena, id: NodeId) -> bool {
    let node = *a.node(id);
    let mut changed = false;
    if let Some(l) = node.lhs {
        changed |= final_neg(a, l);
    }
    if let Some(r) = node.rhs {
        changed |= final_neg(a, r);
    }

    match a.token(id) {
        Token::Op(Op::Pow) => {
            let r = a.rhs(id).expect("power missing exponent");
            let (odd, any) = flip_negatives(a, r);
            changed |= any;
            if odd {
                let one = a.int(1);
                a.wrap_left(id, Op::Div, one);
            }
        }
        Token::Op(Op::Add) => {
            let r = a.rhs(id).expect("sum missing right operand");
            let (neg_r, any_r) = flip_negatives(a, r);
            let l = a.lhs(id).expect("sum missing left operand");
            let (neg_l, any_l) = flip_negatives(a, l);
            changed |= any_r | any_l;
            if neg_l && neg_r {
                // (-1)*a + (-1)*b → (-1)*(a+b)
                let m1 = a.int(-1);
                a.wrap_left(id, Op::Mul, m1);
            } else if neg_l {
                // (-1)*a + b → b-a
                a.set_token(id, Token::Op(Op::Sub));
                let l = a.lhs(id).expect("left");
                let r = a.rhs(id).expect("right");
                a.set_lhs(id, Some(r));
                a.set_rhs(id, Some(l));
            } else if neg_r {
                // a + (-1)*b → a-b
                a.set_token(id, Token::Op(Op::Sub));
            }
        }
        Token::Op(Op::Sub) => {
            let r = a.rhs(id).expect("difference missing right operand");
            let (neg_r, any_r) = flip_negatives(a, r);
            let l = a.lhs(id).expect("difference missing left operand");
            let (neg_l, any_l) = flip_negatives(a, l);
            changed |= any_r | any_l;
            if neg_l && neg_r {
                // (-1)*a - (-1)*b → b-a
                let l = a.lhs(id).expect("left");
                let r = a.rhs(id).expect("right");
                a.set_lhs(id, Some(r));
                a.set_rhs(id, Some(l));
            } else if neg_l {
                // (-1)*a - b → (-1)*(a+b)
                a.set_token(id, Token::Op(Op::Add));
                let m1 = a.int(-1);
                a.wrap_left(id, Op::Mul, m1);
            } else if neg_r {
                // a - (-1)*b → a+b
                a.set_token(id, Token::Op(Op::Add));
            }
        }
        Token::Func(Func::Sin | Func::Tan | Func::Sinh) => {
            let arg = a.lhs(id).expect("function missing argument");
            let (odd, any) = flip_negatives(a, arg);
            changed |= any;
            if odd {
                let m1 = a.int(-1);
                a.wrap_left(id, Op::Mul, m1);
            }
        }
        Token::Func(Func::Cos | Func::Cosh) => {
            let arg = a.lhs(id).expect("function missing argument");
            let (_, any) = flip_negatives(a, arg);
            changed |= any;
        }
        Token::Func(Func::Exp) => {
            // exp((-1)*x) → 1/exp(x)
            let arg = a.lhs(id).expect("exp missing argument");
            let mut odd = false;
            for p in a.chain(arg, Op::Mul) {
                if a.token(p).is_int(-1) {
                    a.set_token(p, Token::Int(1));
                    odd = !odd;
                    changed = true;
                }
            }
            if odd {
                let one = a.int(1);
                a.wrap_left(id, Op::Div, one);
            }
        }
        _ => {}
    }
    changed
}

/// Flip all negative integer factors in the `*`-chain under `id`.
/// Returns (odd number of flips, any flips).
fn flip_negatives(a: &mut Arena, id: NodeId) -> (bool, bool) {
    let mut odd = false;
    let mut any = false;
    for p in a.chain(id, Op::Mul) {
        if let Token::Int(v) = a.token(p) {
            if v < 0 {
                a.set_token(p, Token::Int(v.wrapping_neg()));
                odd = !odd;
                any = true;
            }
        }
    }
    (odd, any)
}
