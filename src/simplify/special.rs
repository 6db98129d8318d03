//! Special-function identities
//!
//! Inverse collapsing of `exp`/`ln` through multiplicative chains,
//! `ln(a^b) → b*ln(a)`, the `sin/cos → tan` quotients, and the Pythagorean
//! identities over `sin`/`cos` and `sinh`/`cosh`. Identities that relate
//! two function applications fire only when the argument subtrees are
//! structurally equal (hash equality).

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
        Token::Func(Func::Exp) => changed |= collapse_exp(a, id),
        Token::Func(Func::Ln) => changed |= collapse_ln(a, id),
        Token::Op(Op::Div) => changed |= quotient_to_tan(a, id),
        Token::Op(Op::Add) => changed |= pythagorean_add(a, id),
        Token::Op(Op::Sub) => changed |= pythagorean_sub(a, id),
        _ => {}
    }
    changed
}

/// `exp(k * ln(u) * rest) → u ^ (k * rest)`: the first `ln` factor found in
/// the argument chain becomes the base of a power whose exponent is the
/// remaining chain.
fn collapse_exp(a: &mut Arena, id: NodeId) -> bool {
    let arg = a.lhs(id).expect("exp missing argument");
    for p in a.chain(arg, Op::Mul) {
        if a.token(p).is_func(Func::Ln) {
            let base = a.lhs(p).expect("ln missing argument");
            a.set_token(p, Token::Int(1));
            a.set_lhs(p, None);
            a.set_token(id, Token::Op(Op::Pow));
            a.set_rhs(id, Some(arg));
            a.set_lhs(id, Some(base));
            return true;
        }
    }
    false
}

/// `ln(exp(f) * rest) → ln(rest) + f`, and `ln(a^b) → b * ln(a)`.
fn collapse_ln(a: &mut Arena, id: NodeId) -> bool {
    let arg = a.lhs(id).expect("ln missing argument");
    for p in a.chain(arg, Op::Mul) {
        if a.token(p).is_func(Func::Exp) {
            let inner = a.lhs(p).expect("exp missing argument");
            a.set_token(p, Token::Int(1));
            a.set_lhs(p, None);
            let rest_ln = a.func1(Func::Ln, arg);
            a.set_token(id, Token::Op(Op::Add));
            a.set_lhs(id, Some(rest_ln));
            a.set_rhs(id, Some(inner));
            return true;
        }
    }
    if a.token(arg).is_pow() {
        // ln(a^b) → b * ln(a^1)
        let b = a.rhs(arg).expect("power missing exponent");
        let one = a.int(1);
        a.set_rhs(arg, Some(one));
        a.wrap_left(id, Op::Mul, b);
        return true;
    }
    false
}

/// `sin(x)/cos(x) → tan(x)` and `cos(x)/sin(x) → 1/tan(x)`.
fn quotient_to_tan(a: &mut Arena, id: NodeId) -> bool {
    let l = a.lhs(id).expect("quotient missing numerator");
    let r = a.rhs(id).expect("quotient missing denominator");

    if a.token(l).is_func(Func::Sin) && a.token(r).is_func(Func::Cos) {
        let la = a.lhs(l).expect("sin missing argument");
        let ra = a.lhs(r).expect("cos missing argument");
        if a.equal(la, ra) {
            a.free_tree(r);
            a.free(l);
            a.set_token(id, Token::Func(Func::Tan));
            a.set_lhs(id, Some(la));
            a.set_rhs(id, None);
            return true;
        }
    } else if a.token(l).is_func(Func::Cos) && a.token(r).is_func(Func::Sin) {
        let la = a.lhs(l).expect("cos missing argument");
        let ra = a.lhs(r).expect("sin missing argument");
        if a.equal(la, ra) {
            a.set_token(r, Token::Func(Func::Tan));
            a.free_tree(l);
            let one = a.int(1);
            a.set_lhs(id, Some(one));
            return true;
        }
    }
    false
}

/// The base of a squared term: `f` in `f(x)^2`, when the square's base is
/// an application of `f`.
fn square_base(a: &Arena, id: NodeId) -> Option<(NodeId, Func)> {
    if !a.is_square(id) {
        return None;
    }
    let base = a.lhs(id).expect("power missing base");
    match a.token(base) {
        Token::Func(f) => Some((base, f)),
        _ => None,
    }
}

/// `sin^2+cos^2 → 1` (either order), `sinh^2+1 → cosh^2`, `1+sinh^2 → cosh^2`.
fn pythagorean_add(a: &mut Arena, id: NodeId) -> bool {
    let l = a.lhs(id).expect("sum missing left");
    let r = a.rhs(id).expect("sum missing right");

    if let (Some((lb, lf)), Some((rb, rf))) = (square_base(a, l), square_base(a, r)) {
        let trig_pair = matches!(
            (lf, rf),
            (Func::Sin, Func::Cos) | (Func::Cos, Func::Sin)
        );
        if trig_pair {
            let la = a.lhs(lb).expect("function missing argument");
            let ra = a.lhs(rb).expect("function missing argument");
            if a.equal(la, ra) {
                a.replace_int(id, 1);
                return true;
            }
        }
    }

    if a.token(r).is_int(1) {
        if let Some((lb, Func::Sinh)) = square_base(a, l) {
            a.set_token(lb, Token::Func(Func::Cosh));
            a.promote(id, l);
            return true;
        }
    }
    if a.token(l).is_int(1) {
        if let Some((rb, Func::Sinh)) = square_base(a, r) {
            a.set_token(rb, Token::Func(Func::Cosh));
            a.promote(id, r);
            return true;
        }
    }
    false
}

/// `cosh^2-sinh^2 → 1`, `1-sin^2 → cos^2`, `1-cos^2 → sin^2`,
/// `cosh^2-1 → sinh^2`.
fn pythagorean_sub(a: &mut Arena, id: NodeId) -> bool {
    let l = a.lhs(id).expect("difference missing left");
    let r = a.rhs(id).expect("difference missing right");

    if let (Some((lb, Func::Cosh)), Some((rb, Func::Sinh))) =
        (square_base(a, l), square_base(a, r))
    {
        let la = a.lhs(lb).expect("cosh missing argument");
        let ra = a.lhs(rb).expect("sinh missing argument");
        if a.equal(la, ra) {
            a.replace_int(id, 1);
            return true;
        }
    }

    if a.token(l).is_int(1) {
        match square_base(a, r) {
            Some((rb, Func::Sin)) => {
                a.set_token(rb, Token::Func(Func::Cos));
                a.promote(id, r);
                return true;
            }
            Some((rb, Func::Cos)) => {
                a.set_token(rb, Token::Func(Func::Sin));
                a.promote(id, r);
                return true;
            }
            _ => {}
        }
    }
    if a.token(r).is_int(1) {
        if let Some((lb, Func::Cosh)) = square_base(a, l) {
            a.set_token(lb, Token::Func(Func::Sinh));
            a.promote(id, l);
            return true;
        }
    }
    false
}
