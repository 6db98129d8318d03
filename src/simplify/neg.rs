//! Negation normalization
//!
//! Moves signs into canonical positions: subtraction becomes addition of a
//! `-1` factor, negative integer factors cancel pairwise inside
//! multiplicative chains, constants distribute over sums, and division is
//! rewritten into negative powers. Odd functions pull a `-1` out of their
//! argument; even functions absorb it. The separate top-level step
//! collapses the `-1` factors of a product chain to at most one leading
//! `-1`.

use crate::arena::Arena;
use crate::ast::{NodeId, Op, Token};
use crate::functions::Func;

/// Flip all negative integer factors in the `*`-chain under `id` to their
/// absolute value. Returns (odd number of flips, any flips).
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

pub(crate) fn run(a: &mut Arena, id: NodeId) -> bool {
    let node = *a.node(id);
    let mut changed = false;
    if let Some(l) = node.lhs {
        changed |= run(a, l);
    }
    if let Some(r) = node.rhs {
        changed |= run(a, r);
    }

    match a.token(id) {
        Token::Op(Op::Sub) => {
            // a-b → a+(-1)*b, absorbing signs already present in b
            let r = a.rhs(id).expect("subtraction missing right operand");
            let (odd, any) = flip_negatives(a, r);
            changed |= any;
            a.set_token(id, Token::Op(Op::Add));
            if !odd {
                let m1 = a.int(-1);
                let old = a.rhs(id).expect("right operand");
                let wrapped = a.mul(m1, old);
                a.set_rhs(id, Some(wrapped));
            }
        }
        Token::Op(Op::Mul) => {
            let l = a.lhs(id).expect("left operand");
            let r = a.rhs(id).expect("right operand");
            if matches!(a.token(l), Token::Int(_)) && a.token(r).is_op(Op::Add) {
                distribute(a, id, l, r);
                changed = true;
            } else if matches!(a.token(r), Token::Int(_)) && a.token(l).is_op(Op::Add) {
                distribute(a, id, r, l);
                changed = true;
            }
        }
        Token::Op(Op::Div) => {
            // u/v → u * (each factor of v to the power -1)
            let r = a.rhs(id).expect("division missing denominator");
            let factors = a.chain(r, Op::Mul);
            a.set_token(id, Token::Op(Op::Mul));
            for p in factors {
                match a.token(p) {
                    Token::Op(Op::Pow) => {
                        let e = a.rhs(p).expect("power missing exponent");
                        let m1 = a.int(-1);
                        let ne = a.mul(m1, e);
                        a.set_rhs(p, Some(ne));
                    }
                    Token::Func(Func::Exp) => {
                        let arg = a.lhs(p).expect("exp missing argument");
                        let m1 = a.int(-1);
                        let na = a.mul(m1, arg);
                        a.set_lhs(p, Some(na));
                    }
                    _ => {
                        let m1 = a.int(-1);
                        a.wrap_right(p, Op::Pow, m1);
                    }
                }
            }
        }
        Token::Func(Func::Sin | Func::Tan | Func::Sinh) => {
            // odd function: pull the sign out
            let arg = a.lhs(id).expect("function missing argument");
            let (odd, any) = flip_negatives(a, arg);
            changed |= any;
            if odd {
                let m1 = a.int(-1);
                a.wrap_left(id, Op::Mul, m1);
            }
        }
        Token::Func(Func::Cos | Func::Cosh) => {
            // even function: absorb the sign
            let arg = a.lhs(id).expect("function missing argument");
            let (_, any) = flip_negatives(a, arg);
            changed |= any;
        }
        _ => {}
    }
    changed
}

/// `C*(a+b) → C*a + C*b` for an integer `C` (node shells reused).
fn distribute(a: &mut Arena, id: NodeId, c: NodeId, sum: NodeId) {
    let x = a.lhs(sum).expect("sum missing left");
    let y = a.rhs(sum).expect("sum missing right");
    let c2 = a.duplicate(c);
    let m1 = a.mul(c, x);
    let m2 = a.mul(c2, y);
    a.set_token(id, Token::Op(Op::Add));
    a.set_lhs(id, Some(m1));
    a.set_rhs(id, Some(m2));
    a.free(sum);
}

/// Top-level negation: in the `*`-chain of `id`, an even number of `-1`
/// factors cancels entirely; an odd number collapses to one leading `-1`.
pub(crate) fn top(a: &mut Arena, id: NodeId) -> bool {
    if !a.token(id).is_op(Op::Mul) {
        return false;
    }
    let parts = a.chain(id, Op::Mul);
    let mut odd = false;
    let mut first_neg = false;
    let mut changed = false;
    for (i, &p) in parts.iter().enumerate() {
        if a.token(p).is_int(-1) {
            if i == 0 {
                first_neg = true;
            } else {
                a.set_token(p, Token::Int(1));
                odd = !odd;
                changed = true;
            }
        }
    }
    if odd {
        if first_neg {
            a.set_token(parts[0], Token::Int(1));
        } else {
            let m1 = a.int(-1);
            a.wrap_left(id, Op::Mul, m1);
        }
    }
    changed
}
