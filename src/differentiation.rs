//! Differentiation rules
//!
//! Compositional partial derivatives over the arena. Every rule builds a
//! fresh tree: input subtrees are deep-copied wherever they appear in the
//! result, so the derivative never aliases the original expression. The
//! output is deliberately naive (`1*cos(x)+0*sin(x)` and friends); the
//! simplifier is responsible for making it readable.

use crate::arena::Arena;
use crate::ast::{NodeId, Op, Token};
use crate::functions::Func;
use crate::symbol::VarId;

/// Partial derivative of the subtree at `id` with respect to `var`.
pub fn derive(a: &mut Arena, id: NodeId, var: VarId) -> NodeId {
    let node = *a.node(id);
    match node.token {
        Token::Int(_) => a.int(0),
        Token::Var(v) => {
            if v == var {
                a.int(1)
            } else {
                a.int(0)
            }
        }
        Token::Op(op) => {
            let l = node.lhs.expect("operator node missing left operand");
            let r = node.rhs.expect("operator node missing right operand");
            match op {
                // (u + v)' = u' + v'
                Op::Add => {
                    let dl = derive(a, l, var);
                    let dr = derive(a, r, var);
                    a.add(dl, dr)
                }
                // (u - v)' = u' - v'
                Op::Sub => {
                    let dl = derive(a, l, var);
                    let dr = derive(a, r, var);
                    a.sub(dl, dr)
                }
                Op::Mul => d_product(a, l, r, var),
                Op::Div => d_quotient(a, l, r, var),
                Op::Pow => d_pow(a, l, Some(r), var),
            }
        }
        Token::Func(f) => {
            let l = node.lhs.expect("function node missing argument");
            (f.def().derivative)(a, l, node.rhs, var)
        }
    }
}

// (u * v)' = u'*v + u*v'
fn d_product(a: &mut Arena, u: NodeId, v: NodeId, var: VarId) -> NodeId {
    let du = derive(a, u, var);
    let v1 = a.duplicate(v);
    let t1 = a.mul(du, v1);

    let u1 = a.duplicate(u);
    let dv = derive(a, v, var);
    let t2 = a.mul(u1, dv);

    a.add(t1, t2)
}

// (u / v)' = (u'*v - u*v') / v^2
fn d_quotient(a: &mut Arena, u: NodeId, v: NodeId, var: VarId) -> NodeId {
    let du = derive(a, u, var);
    let v1 = a.duplicate(v);
    let t1 = a.mul(du, v1);

    let u1 = a.duplicate(u);
    let dv = derive(a, v, var);
    let t2 = a.mul(u1, dv);

    let num = a.sub(t1, t2);
    let v2 = a.duplicate(v);
    let two = a.int(2);
    let den = a.pow(v2, two);
    a.div(num, den)
}

// ln(u)' = u'/u
pub(crate) fn d_ln(a: &mut Arena, u: NodeId, _v: Option<NodeId>, var: VarId) -> NodeId {
    let du = derive(a, u, var);
    let u1 = a.duplicate(u);
    a.div(du, u1)
}

// log(b, u) = ln(u)/ln(b), differentiated as a quotient.
pub(crate) fn d_log(a: &mut Arena, b: NodeId, u: Option<NodeId>, var: VarId) -> NodeId {
    let u = u.expect("log missing second argument");
    let u1 = a.duplicate(u);
    let f = a.func1(Func::Ln, u1);
    let b1 = a.duplicate(b);
    let g = a.func1(Func::Ln, b1);

    let result = d_quotient(a, f, g, var);
    a.free_tree(f);
    a.free_tree(g);
    result
}

// cos(u)' = 0 - u'*sin(u)
pub(crate) fn d_cos(a: &mut Arena, u: NodeId, _v: Option<NodeId>, var: VarId) -> NodeId {
    let du = derive(a, u, var);
    let u1 = a.duplicate(u);
    let s = a.func1(Func::Sin, u1);
    let prod = a.mul(du, s);
    let zero = a.int(0);
    a.sub(zero, prod)
}

// sin(u)' = u'*cos(u)
pub(crate) fn d_sin(a: &mut Arena, u: NodeId, _v: Option<NodeId>, var: VarId) -> NodeId {
    let du = derive(a, u, var);
    let u1 = a.duplicate(u);
    let c = a.func1(Func::Cos, u1);
    a.mul(du, c)
}

// tan(u)' = u'/cos(u)^2
pub(crate) fn d_tan(a: &mut Arena, u: NodeId, _v: Option<NodeId>, var: VarId) -> NodeId {
    let du = derive(a, u, var);
    let u1 = a.duplicate(u);
    let c = a.func1(Func::Cos, u1);
    let two = a.int(2);
    let c2 = a.pow(c, two);
    a.div(du, c2)
}

// u^v = exp(v*ln(u)); differentiate the exponential form. The simplifier
// restores the x^n shape afterwards when the exponent is constant.
pub(crate) fn d_pow(a: &mut Arena, u: NodeId, v: Option<NodeId>, var: VarId) -> NodeId {
    let v = v.expect("power missing exponent");
    let v1 = a.duplicate(v);
    let u1 = a.duplicate(u);
    let ln_u = a.func1(Func::Ln, u1);
    let g = a.mul(v1, ln_u);

    let dg = derive(a, g, var);
    let e = a.func1(Func::Exp, g);
    a.mul(dg, e)
}

// exp(u)' = u'*exp(u)
pub(crate) fn d_exp(a: &mut Arena, u: NodeId, _v: Option<NodeId>, var: VarId) -> NodeId {
    let du = derive(a, u, var);
    let u1 = a.duplicate(u);
    let e = a.func1(Func::Exp, u1);
    a.mul(du, e)
}

// sinh(u)' = u'*cosh(u)
pub(crate) fn d_sinh(a: &mut Arena, u: NodeId, _v: Option<NodeId>, var: VarId) -> NodeId {
    let du = derive(a, u, var);
    let u1 = a.duplicate(u);
    let c = a.func1(Func::Cosh, u1);
    a.mul(du, c)
}

// cosh(u)' = u'*sinh(u)
pub(crate) fn d_cosh(a: &mut Arena, u: NodeId, _v: Option<NodeId>, var: VarId) -> NodeId {
    let du = derive(a, u, var);
    let u1 = a.duplicate(u);
    let s = a.func1(Func::Sinh, u1);
    a.mul(du, s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Token;

    #[test]
    fn test_derive_int_is_zero() {
        let mut a = Arena::new();
        let n = a.int(42);
        let d = derive(&mut a, n, VarId(0));
        assert_eq!(a.token(d), Token::Int(0));
    }

    #[test]
    fn test_derive_variable() {
        let mut a = Arena::new();
        let x = a.var(VarId(0));
        let dx = derive(&mut a, x, VarId(0));
        let dy = derive(&mut a, x, VarId(1));
        assert_eq!(a.token(dx), Token::Int(1));
        assert_eq!(a.token(dy), Token::Int(0));
    }

    #[test]
    fn test_derive_sinh_builds_cosh() {
        let mut a = Arena::new();
        let x = a.var(VarId(0));
        let sh = a.func1(Func::Sinh, x);
        let d = derive(&mut a, sh, VarId(0));
        // 1 * cosh(x)
        assert!(a.token(d).is_op(Op::Mul));
        let rhs = a.rhs(d).unwrap();
        assert!(a.token(rhs).is_func(Func::Cosh));
    }

    #[test]
    fn test_derivative_shares_nothing_with_input() {
        let mut a = Arena::new();
        let x = a.var(VarId(0));
        let y = a.var(VarId(0));
        let m = a.mul(x, y);
        let before = a.tree_size(m);
        let d = derive(&mut a, m, VarId(0));
        // Original tree untouched, derivative fully separate.
        assert_eq!(a.tree_size(m), before);
        let mut stack = vec![d];
        while let Some(id) = stack.pop() {
            assert_ne!(id, m);
            assert_ne!(id, x);
            assert_ne!(id, y);
            if let Some(l) = a.lhs(id) {
                stack.push(l);
            }
            if let Some(r) = a.rhs(id) {
                stack.push(r);
            }
        }
    }

    #[test]
    fn test_derive_releases_temporaries() {
        let mut a = Arena::new();
        let x = a.var(VarId(0));
        let two = a.int(2);
        let lg = a.func2(Func::Log, two, x);
        let live_before = a.live();
        let d = derive(&mut a, lg, VarId(0));
        let d_size = a.tree_size(d);
        assert_eq!(a.live(), live_before + d_size);
        a.free_tree(d);
        assert_eq!(a.live(), live_before);
    }
}
