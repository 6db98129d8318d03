//! Identity elimination
//!
//! Bottom-up removal of `0`/`1` identities over the operators, plus the
//! function-specific constant cases (`ln(1)`, `cos(0)`, `exp(0)`, ...).

use crate::arena::Arena;
use crate::ast::{NodeId, Op, Token};
use crate::functions::Func;

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
        Token::Func(Func::Ln) => {
            let arg = a.lhs(id).expect("ln missing argument");
            if a.token(arg).is_int(1) {
                a.replace_int(id, 0);
                changed = true;
            }
        }
        Token::Func(Func::Exp | Func::Cos | Func::Cosh) => {
            let arg = a.lhs(id).expect("function missing argument");
            if a.token(arg).is_int(0) {
                a.replace_int(id, 1);
                changed = true;
            }
        }
        Token::Func(Func::Sin | Func::Tan | Func::Sinh) => {
            let arg = a.lhs(id).expect("function missing argument");
            if a.token(arg).is_int(0) {
                a.replace_int(id, 0);
                changed = true;
            }
        }
        Token::Func(Func::Pow) | Token::Op(Op::Pow) => changed |= power_identities(a, id),
        Token::Op(Op::Add) => {
            let l = a.lhs(id).expect("left");
            let r = a.rhs(id).expect("right");
            if a.token(l).is_int(0) {
                a.promote(id, r);
                changed = true;
            } else if a.token(r).is_int(0) {
                a.promote(id, l);
                changed = true;
            }
        }
        Token::Op(Op::Sub) => {
            let l = a.lhs(id).expect("left");
            let r = a.rhs(id).expect("right");
            if a.token(r).is_int(0) {
                a.promote(id, l);
                changed = true;
            } else if a.token(l).is_int(0) {
                // 0-x → (-1)*x
                a.set_token(l, Token::Int(-1));
                a.set_token(id, Token::Op(Op::Mul));
                changed = true;
            }
        }
        Token::Op(Op::Mul) => {
            let l = a.lhs(id).expect("left");
            let r = a.rhs(id).expect("right");
            if a.token(l).is_int(0) || a.token(r).is_int(0) {
                a.replace_int(id, 0);
                changed = true;
            } else if a.token(l).is_int(1) {
                a.promote(id, r);
                changed = true;
            } else if a.token(r).is_int(1) {
                a.promote(id, l);
                changed = true;
            }
        }
        Token::Op(Op::Div) => {
            let l = a.lhs(id).expect("left");
            let r = a.rhs(id).expect("right");
            if a.token(l).is_int(0) {
                a.replace_int(id, 0);
                changed = true;
            } else if a.token(r).is_int(1) {
                a.promote(id, l);
                changed = true;
            }
        }
        _ => {}
    }
    changed
}

/// `x^0 → 1`, `0^x → 0`, `1^x → 1`, `x^1 → x`, in that order, so `0^0`
/// resolves to 1.
fn power_identities(a: &mut Arena, id: NodeId) -> bool {
    let l = a.lhs(id).expect("power missing base");
    let r = a.rhs(id).expect("power missing exponent");
    if a.token(r).is_int(0) {
        a.replace_int(id, 1);
        true
    } else if a.token(l).is_int(0) {
        a.replace_int(id, 0);
        true
    } else if a.token(l).is_int(1) {
        a.replace_int(id, 1);
        true
    } else if a.token(r).is_int(1) {
        a.promote(id, l);
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::VarId;

    #[test]
    fn test_additive_identities() {
        let mut a = Arena::new();
        let x = a.var(VarId(0));
        let zero = a.int(0);
        let s = a.add(zero, x);
        assert!(run(&mut a, s));
        assert_eq!(a.token(s), Token::Var(VarId(0)));
        assert_eq!(a.live(), 1);
    }

    #[test]
    fn test_zero_minus_becomes_negation() {
        let mut a = Arena::new();
        let zero = a.int(0);
        let x = a.var(VarId(0));
        let s = a.sub(zero, x);
        assert!(run(&mut a, s));
        assert!(a.token(s).is_op(Op::Mul));
        assert_eq!(a.token(a.lhs(s).unwrap()), Token::Int(-1));
    }

    #[test]
    fn test_multiplicative_identities() {
        let mut a = Arena::new();
        let x = a.var(VarId(0));
        let zero = a.int(0);
        let m = a.mul(x, zero);
        assert!(run(&mut a, m));
        assert_eq!(a.token(m), Token::Int(0));

        let one = a.int(1);
        let y = a.var(VarId(0));
        let m = a.mul(one, y);
        assert!(run(&mut a, m));
        assert_eq!(a.token(m), Token::Var(VarId(0)));
    }

    #[test]
    fn test_power_identities() {
        let mut a = Arena::new();
        let x = a.var(VarId(0));
        let zero = a.int(0);
        let p = a.pow(x, zero);
        assert!(run(&mut a, p));
        assert_eq!(a.token(p), Token::Int(1));

        // 0^0 → 1: exponent rule wins
        let z1 = a.int(0);
        let z2 = a.int(0);
        let p = a.pow(z1, z2);
        assert!(run(&mut a, p));
        assert_eq!(a.token(p), Token::Int(1));
    }

    #[test]
    fn test_function_constants() {
        let mut a = Arena::new();
        let one = a.int(1);
        let ln = a.func1(Func::Ln, one);
        assert!(run(&mut a, ln));
        assert_eq!(a.token(ln), Token::Int(0));

        let zero = a.int(0);
        let c = a.func1(Func::Cos, zero);
        assert!(run(&mut a, c));
        assert_eq!(a.token(c), Token::Int(1));

        let zero = a.int(0);
        let s = a.func1(Func::Sinh, zero);
        assert!(run(&mut a, s));
        assert_eq!(a.token(s), Token::Int(0));
    }

    #[test]
    fn test_nested_cleanup() {
        // (x*1) + 0 → x in one pass (bottom-up)
        let mut a = Arena::new();
        let x = a.var(VarId(0));
        let one = a.int(1);
        let m = a.mul(x, one);
        let zero = a.int(0);
        let s = a.add(m, zero);
        assert!(run(&mut a, s));
        assert_eq!(a.token(s), Token::Var(VarId(0)));
        assert_eq!(a.live(), 1);
    }
}
