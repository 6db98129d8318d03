//! Structural rotation
//!
//! Pushes `-` and `/` toward a canonical position so later passes see flat
//! `+`/`*` chains: groupings are pulled leftward and nested subtractions or
//! divisions are re-associated. Also collapses nested powers, rewrites the
//! `pow` function as the `^` operator, and `log(a,b)` as `ln(b)/ln(a)`.
//! Applied bottom-up; every rule reuses the node shells it touches.

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
        Token::Op(Op::Add) => changed |= rotate_pair(a, id, Op::Add, Op::Sub),
        Token::Op(Op::Sub) => changed |= rotate_anti(a, id, Op::Add, Op::Sub),
        Token::Op(Op::Mul) => changed |= rotate_pair(a, id, Op::Mul, Op::Div),
        Token::Op(Op::Div) => changed |= rotate_anti(a, id, Op::Mul, Op::Div),
        Token::Op(Op::Pow) => changed |= rotate_pow(a, id),
        Token::Func(Func::Pow) => {
            a.set_token(id, Token::Op(Op::Pow));
            rotate_pow(a, id);
            changed = true;
        }
        Token::Func(Func::Log) => {
            // log(a,b) = ln(b)/ln(a)
            let base = a.lhs(id).expect("log missing base");
            let arg = a.rhs(id).expect("log missing argument");
            let ln_arg = a.func1(Func::Ln, arg);
            let ln_base = a.func1(Func::Ln, base);
            a.set_token(id, Token::Op(Op::Div));
            a.set_lhs(id, Some(ln_arg));
            a.set_rhs(id, Some(ln_base));
            changed = true;
        }
        _ => {}
    }
    changed
}

/// Rules for the group operator (`+` over `-`, `*` over `/`):
/// `(a-b)+(c-d) → (a+c)-(b+d)`, `x+(y-z) → (x+y)-z`, `(x-y)+z → (x+z)-y`.
fn rotate_pair(a: &mut Arena, id: NodeId, group: Op, anti: Op) -> bool {
    let l = a.lhs(id).expect("binary node missing left operand");
    let r = a.rhs(id).expect("binary node missing right operand");
    let l_anti = a.token(l).is_op(anti);
    let r_anti = a.token(r).is_op(anti);

    if l_anti && r_anti {
        // (a-b)+(c-d) → (a+c)-(b+d): swap the inner operands, relabel.
        let lr = a.rhs(l);
        let rl = a.lhs(r);
        a.set_rhs(l, rl);
        a.set_lhs(r, lr);
        a.set_token(id, Token::Op(anti));
        a.set_token(l, Token::Op(group));
        a.set_token(r, Token::Op(group));
        true
    } else if r_anti {
        // x+(y-z) → (x+y)-z
        let x = a.lhs(id).expect("left operand");
        let y = a.lhs(r).expect("inner left");
        let z = a.rhs(r).expect("inner right");
        a.set_token(r, Token::Op(group));
        a.set_lhs(r, Some(x));
        a.set_rhs(r, Some(y));
        a.set_token(id, Token::Op(anti));
        a.set_lhs(id, Some(r));
        a.set_rhs(id, Some(z));
        true
    } else if l_anti {
        // (x-y)+z → (x+z)-y
        let y = a.rhs(l).expect("inner right");
        let z = a.rhs(id).expect("right operand");
        let x = a.lhs(l).expect("inner left");
        a.set_token(l, Token::Op(group));
        a.set_lhs(l, Some(x));
        a.set_rhs(l, Some(z));
        a.set_token(id, Token::Op(anti));
        a.set_lhs(id, Some(l));
        a.set_rhs(id, Some(y));
        true
    } else {
        false
    }
}

/// Rules for the anti operator (`-`, `/`):
/// `(a-b)-(c-d) → (a+d)-(c+b)`, `x-(y-z) → (x+z)-y`, `(x-y)-z → x-(y+z)`.
fn rotate_anti(a: &mut Arena, id: NodeId, group: Op, anti: Op) -> bool {
    let l = a.lhs(id).expect("binary node missing left operand");
    let r = a.rhs(id).expect("binary node missing right operand");
    let l_anti = a.token(l).is_op(anti);
    let r_anti = a.token(r).is_op(anti);

    if l_anti && r_anti {
        // (a-b)-(c-d) → (a+d)-(c+b): swap the two right operands, relabel.
        let lr = a.rhs(l);
        let rr = a.rhs(r);
        a.set_rhs(l, rr);
        a.set_rhs(r, lr);
        a.set_token(l, Token::Op(group));
        a.set_token(r, Token::Op(group));
        true
    } else if r_anti {
        // x-(y-z) → (x+z)-y
        let x = a.lhs(id).expect("left operand");
        let y = a.lhs(r).expect("inner left");
        let z = a.rhs(r).expect("inner right");
        a.set_token(r, Token::Op(group));
        a.set_lhs(r, Some(x));
        a.set_rhs(r, Some(z));
        a.set_token(id, Token::Op(anti));
        a.set_lhs(id, Some(r));
        a.set_rhs(id, Some(y));
        true
    } else if l_anti {
        // (x-y)-z → x-(y+z)
        let x = a.lhs(l).expect("inner left");
        let y = a.rhs(l).expect("inner right");
        let z = a.rhs(id).expect("right operand");
        a.set_token(l, Token::Op(group));
        a.set_lhs(l, Some(y));
        a.set_rhs(l, Some(z));
        a.set_lhs(id, Some(x));
        a.set_rhs(id, Some(l));
        true
    } else {
        false
    }
}

/// `(x^a)^b → x^(a*b)`
fn rotate_pow(a: &mut Arena, id: NodeId) -> bool {
    let l = a.lhs(id).expect("power missing base");
    if !a.token(l).is_pow() {
        return false;
    }
    let x = a.lhs(l).expect("inner base");
    let inner_exp = a.rhs(l).expect("inner exponent");
    let b = a.rhs(id).expect("outer exponent");
    a.set_token(l, Token::Op(Op::Mul));
    a.set_lhs(l, Some(inner_exp));
    a.set_rhs(l, Some(b));
    a.set_lhs(id, Some(x));
    a.set_rhs(id, Some(l));
    true
}
