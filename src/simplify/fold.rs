//! Constant folding
//!
//! Bottom-up evaluation of operators whose operands are both integer
//! literals. Quotients are reduced by their gcd but kept as quotient nodes
//! when inexact (`6/9 → 2/3`); a product of two integers is folded through
//! coefficient extraction, which also rotates the result to the head of
//! its multiplicative chain. This module owns coefficient extraction; the
//! polynomial pass reuses it.

use num_integer::Integer;
use num_traits::One;
use rustc_hash::FxHashSet;

use crate::arena::Arena;
use crate::ast::{NodeId, Op, Token};
use crate::error::DivideByZero;
use crate::rational::Rational;

pub(crate) fn run(
    a: &mut Arena,
    id: NodeId,
    extracted: &mut FxHashSet<u64>,
) -> Result<bool, DivideByZero> {
    let node = *a.node(id);
    let mut changed = false;
    if let Some(l) = node.lhs {
        changed |= run(a, l, extracted)?;
    }
    if let Some(r) = node.rhs {
        changed |= run(a, r, extracted)?;
    }

    let op = match a.token(id) {
        Token::Op(op) => op,
        _ => return Ok(changed),
    };
    let l = a.lhs(id).expect("operator missing left operand");
    let r = a.rhs(id).expect("operator missing right operand");
    let (x, y) = match (a.token(l), a.token(r)) {
        (Token::Int(x), Token::Int(y)) => (x, y),
        _ => return Ok(changed),
    };

    match op {
        Op::Add => {
            a.replace_int(id, x.wrapping_add(y));
            changed = true;
        }
        Op::Sub => {
            a.replace_int(id, x.wrapping_sub(y));
            changed = true;
        }
        Op::Mul => changed |= rotate_coefficient(a, id, extracted)?,
        Op::Div => {
            // reduce by the gcd, keep the quotient node
            if x != 0 && y != 0 {
                let g = x.gcd(&y);
                a.set_token(l, Token::Int(x / g));
                a.set_token(r, Token::Int(y / g));
            }
        }
        Op::Pow => {
            if y > 0 {
                a.replace_int(id, pow_wrapping(x, y));
            } else if y == 0 {
                a.replace_int(id, 1);
            } else {
                // a^(-k) → 1 / a^k
                a.replace_int(id, pow_wrapping(x, y.wrapping_neg()));
                let one = a.int(1);
                a.wrap_left(id, Op::Div, one);
            }
            changed = true;
        }
    }
    Ok(changed)
}

fn pow_wrapping(base: i64, exp: i64) -> i64 {
    base.wrapping_pow(exp as u32)
}

/// Fold every constant factor of the multiplicative chain at `id` into one
/// rational and put it at the head of the chain. The `extracted` set keeps
/// already-rotated chains from being rotated again.
fn rotate_coefficient(
    a: &mut Arena,
    id: NodeId,
    extracted: &mut FxHashSet<u64>,
) -> Result<bool, DivideByZero> {
    if extracted.contains(&a.hash(id)) {
        return Ok(false);
    }
    if matches!(a.token(id), Token::Int(_)) {
        return Ok(false);
    }
    let (_, f) = extract_coefficient(a, id)?;
    let c = f.to_node(a);
    a.wrap_left(id, Op::Mul, c);
    extracted.insert(a.hash(id));
    Ok(true)
}

/// Sweep the multiplicative chain at `id` for constant factors: integer
/// leaves, and whole subtrees free of variables, functions and powers.
/// Their product is accumulated into a rational and each is replaced by
/// `1`; the returned flag says whether anything was swept.
pub(crate) fn extract_coefficient(
    a: &mut Arena,
    id: NodeId,
) -> Result<(bool, Rational), DivideByZero> {
    let mut f = Rational::one();
    let mut changed = false;
    for p in a.chain(id, Op::Mul) {
        match a.token(p) {
            Token::Int(v) => {
                if v != 1 {
                    f *= Rational::int(v);
                    a.set_token(p, Token::Int(1));
                    changed = true;
                }
            }
            _ if a.is_const_scalar(p) => {
                let value = eval_const(a, p)?;
                f *= value;
                a.replace_int(p, 1);
                changed = true;
            }
            _ => {}
        }
    }
    Ok((changed, f))
}

/// Exact rational value of a `+ - * /` tree over integer literals.
fn eval_const(a: &Arena, id: NodeId) -> Result<Rational, DivideByZero> {
    match a.token(id) {
        Token::Int(v) => Ok(Rational::int(v)),
        Token::Op(op) => {
            let l = eval_const(a, a.lhs(id).expect("operator missing left operand"))?;
            let r = eval_const(a, a.rhs(id).expect("operator missing right operand"))?;
            match op {
                Op::Add => Ok(l + r),
                Op::Sub => Ok(l - r),
                Op::Mul => Ok(l * r),
                Op::Div => l.checked_div(r),
                Op::Pow => Ok(Rational::int(0)),
            }
        }
        _ => Ok(Rational::int(0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fold(a: &mut Arena, id: NodeId) -> Result<bool, DivideByZero> {
        let mut extracted = FxHashSet::default();
        run(a, id, &mut extracted)
    }

    #[test]
    fn test_fold_addition() {
        let mut a = Arena::new();
        let x = a.int(2);
        let y = a.int(3);
        let s = a.add(x, y);
        fold(&mut a, s).unwrap();
        assert_eq!(a.token(s), Token::Int(5));
        assert_eq!(a.live(), 1);
    }

    #[test]
    fn test_quotient_reduced_not_folded() {
        let mut a = Arena::new();
        let x = a.int(6);
        let y = a.int(9);
        let q = a.div(x, y);
        fold(&mut a, q).unwrap();
        assert!(a.token(q).is_op(Op::Div));
        assert_eq!(a.token(a.lhs(q).unwrap()), Token::Int(2));
        assert_eq!(a.token(a.rhs(q).unwrap()), Token::Int(3));
    }

    #[test]
    fn test_power_folding() {
        let mut a = Arena::new();
        let b = a.int(2);
        let e = a.int(10);
        let p = a.pow(b, e);
        fold(&mut a, p).unwrap();
        assert_eq!(a.token(p), Token::Int(1024));
    }

    #[test]
    fn test_negative_power_becomes_quotient() {
        let mut a = Arena::new();
        let b = a.int(2);
        let e = a.int(-3);
        let p = a.pow(b, e);
        fold(&mut a, p).unwrap();
        assert!(a.token(p).is_op(Op::Div));
        assert_eq!(a.token(a.lhs(p).unwrap()), Token::Int(1));
        assert_eq!(a.token(a.rhs(p).unwrap()), Token::Int(8));
    }

    #[test]
    fn test_product_rotates_coefficient() {
        let mut a = Arena::new();
        let x = a.int(2);
        let y = a.int(3);
        let m = a.mul(x, y);
        fold(&mut a, m).unwrap();
        // 2*3 → 6*(1*1); the identity pass cleans up the ones.
        assert!(a.token(m).is_op(Op::Mul));
        assert_eq!(a.token(a.lhs(m).unwrap()), Token::Int(6));
    }

    #[test]
    fn test_extract_coefficient_sweeps_constants() {
        let mut a = Arena::new();
        // 3 * x * (1+1)
        let three = a.int(3);
        let x = a.var(crate::symbol::VarId(0));
        let one1 = a.int(1);
        let one2 = a.int(1);
        let sum = a.add(one1, one2);
        let inner = a.mul(x, sum);
        let root = a.mul(three, inner);
        let (changed, f) = extract_coefficient(&mut a, root).unwrap();
        assert!(changed);
        assert_eq!(f, Rational::int(6));
        // both constant factors are now 1
        assert_eq!(a.token(a.lhs(root).unwrap()), Token::Int(1));
    }

    #[test]
    fn test_divide_by_zero_signal() {
        let mut a = Arena::new();
        // (1/0) as a constant subtree inside a product
        let one = a.int(1);
        let zero = a.int(0);
        let q = a.div(one, zero);
        let x = a.var(crate::symbol::VarId(0));
        let m = a.mul(q, x);
        assert_eq!(extract_coefficient(&mut a, m), Err(DivideByZero));
    }
}
