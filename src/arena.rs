//! Per-line node arena
//!
//! All expression nodes for one input line live in a single [`SlotMap`];
//! releasing a node returns its slot to the map's internal free list, so
//! rewriting passes recycle storage instead of growing it. The whole arena
//! is dropped at end of line. Nodes are owned by at most one parent; code
//! that needs a subtree twice duplicates it explicitly.

use slotmap::SlotMap;

use crate::ast::{Node, NodeId, Op, Token};
use crate::functions::Func;
use crate::symbol::VarId;

#[derive(Debug, Default)]
pub struct Arena {
    nodes: SlotMap<NodeId, Node>,
}

impl Arena {
    pub fn new() -> Self {
        Arena::default()
    }

    /// Number of live nodes; zero once every tree has been released.
    pub fn live(&self) -> usize {
        self.nodes.len()
    }

    // Allocation

    pub fn alloc(&mut self, node: Node) -> NodeId {
        self.nodes.insert(node)
    }

    pub fn leaf(&mut self, token: Token) -> NodeId {
        self.alloc(Node::leaf(token))
    }

    pub fn int(&mut self, v: i64) -> NodeId {
        self.leaf(Token::Int(v))
    }

    pub fn var(&mut self, id: VarId) -> NodeId {
        self.leaf(Token::Var(id))
    }

    pub fn op(&mut self, op: Op, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.alloc(Node {
            token: Token::Op(op),
            lhs: Some(lhs),
            rhs: Some(rhs),
        })
    }

    pub fn add(&mut self, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.op(Op::Add, lhs, rhs)
    }

    pub fn sub(&mut self, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.op(Op::Sub, lhs, rhs)
    }

    pub fn mul(&mut self, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.op(Op::Mul, lhs, rhs)
    }

    pub fn div(&mut self, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.op(Op::Div, lhs, rhs)
    }

    pub fn pow(&mut self, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.op(Op::Pow, lhs, rhs)
    }

    pub fn func1(&mut self, f: Func, arg: NodeId) -> NodeId {
        self.alloc(Node {
            token: Token::Func(f),
            lhs: Some(arg),
            rhs: None,
        })
    }

    pub fn func2(&mut self, f: Func, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.alloc(Node {
            token: Token::Func(f),
            lhs: Some(lhs),
            rhs: Some(rhs),
        })
    }

    // Accessors

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn token(&self, id: NodeId) -> Token {
        self.nodes[id].token
    }

    pub fn set_token(&mut self, id: NodeId, token: Token) {
        self.nodes[id].token = token;
    }

    pub fn lhs(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].lhs
    }

    pub fn rhs(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].rhs
    }

    pub fn set_lhs(&mut self, id: NodeId, child: Option<NodeId>) {
        self.nodes[id].lhs = child;
    }

    pub fn set_rhs(&mut self, id: NodeId, child: Option<NodeId>) {
        self.nodes[id].rhs = child;
    }

    /// Overwrite a node's content wholesale. The previous children are
    /// neither freed nor re-attached; the caller owns that bookkeeping.
    pub fn set_node(&mut self, id: NodeId, node: Node) {
        self.nodes[id] = node;
    }

    // Release and reuse

    /// Release a single node shell; its children (if any) are untouched.
    pub fn free(&mut self, id: NodeId) {
        self.nodes.remove(id);
    }

    /// Release a whole subtree.
    pub fn free_tree(&mut self, id: NodeId) {
        let node = self.nodes[id];
        if let Some(l) = node.lhs {
            self.free_tree(l);
        }
        if let Some(r) = node.rhs {
            self.free_tree(r);
        }
        self.nodes.remove(id);
    }

    /// Deep copy of a subtree; no nodes are shared with the original.
    pub fn duplicate(&mut self, id: NodeId) -> NodeId {
        let node = self.nodes[id];
        let lhs = node.lhs.map(|l| self.duplicate(l));
        let rhs = node.rhs.map(|r| self.duplicate(r));
        self.alloc(Node {
            token: node.token,
            lhs,
            rhs,
        })
    }

    /// Move `src`'s content into the `dst` slot and release the `src`
    /// shell. Rewrites use this to replace a node without disturbing the
    /// parent's child pointer.
    pub fn hoist(&mut self, dst: NodeId, src: NodeId) {
        debug_assert!(dst != src);
        let node = self.nodes.remove(src).expect("hoist source already freed");
        self.nodes[dst] = node;
    }

    /// Replace the subtree at `id` with the integer literal `v`, releasing
    /// the old children.
    pub fn replace_int(&mut self, id: NodeId, v: i64) {
        let node = self.nodes[id];
        if let Some(l) = node.lhs {
            self.free_tree(l);
        }
        if let Some(r) = node.rhs {
            self.free_tree(r);
        }
        self.nodes[id] = Node::leaf(Token::Int(v));
    }

    /// Keep one child of `id` in place of `id` itself, releasing the node
    /// shell, the kept child's shell, and the entire other subtree.
    pub fn promote(&mut self, id: NodeId, keep: NodeId) {
        let node = self.nodes[id];
        if let Some(l) = node.lhs {
            if l != keep {
                self.free_tree(l);
            }
        }
        if let Some(r) = node.rhs {
            if r != keep {
                self.free_tree(r);
            }
        }
        self.hoist(id, keep);
    }

    /// Push the current content of `id` down one level and make `id` a
    /// `lhs op pushed-down` node. Returns the id of the pushed-down copy.
    pub fn wrap_left(&mut self, id: NodeId, op: Op, lhs: NodeId) -> NodeId {
        let inner = self.alloc(self.nodes[id]);
        self.nodes[id] = Node {
            token: Token::Op(op),
            lhs: Some(lhs),
            rhs: Some(inner),
        };
        inner
    }

    /// Push the current content of `id` down one level and make `id` a
    /// `pushed-down op rhs` node. Returns the id of the pushed-down copy.
    pub fn wrap_right(&mut self, id: NodeId, op: Op, rhs: NodeId) -> NodeId {
        let inner = self.alloc(self.nodes[id]);
        self.nodes[id] = Node {
            token: Token::Op(op),
            lhs: Some(inner),
            rhs: Some(rhs),
        };
        inner
    }

    // Predicates

    /// Free of variables and functions.
    pub fn is_const(&self, id: NodeId) -> bool {
        let node = self.nodes[id];
        match node.token {
            Token::Int(_) => true,
            Token::Var(_) | Token::Func(_) => false,
            Token::Op(_) => {
                node.lhs.map_or(true, |l| self.is_const(l))
                    && node.rhs.map_or(true, |r| self.is_const(r))
            }
        }
    }

    /// Free of variables, functions *and* powers: a plain `+ - * /` tree
    /// over integer literals, evaluable as a rational.
    pub fn is_const_scalar(&self, id: NodeId) -> bool {
        let node = self.nodes[id];
        match node.token {
            Token::Int(_) => true,
            Token::Var(_) | Token::Func(_) | Token::Op(Op::Pow) => false,
            Token::Op(_) => {
                node.lhs.map_or(true, |l| self.is_const_scalar(l))
                    && node.rhs.map_or(true, |r| self.is_const_scalar(r))
            }
        }
    }

    /// A squared term: `b ^ 2`.
    pub fn is_square(&self, id: NodeId) -> bool {
        let node = self.nodes[id];
        node.token.is_pow()
            && node
                .rhs
                .map_or(false, |r| self.token(r).is_int(2))
    }

    // Chain flattening

    /// Flatten the associative chain of `op` below `id`, collecting the
    /// non-`op` operand nodes left to right. A node that is not an `op`
    /// node yields itself as the single element.
    pub fn chain(&self, id: NodeId, op: Op) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.chain_into(id, op, &mut out);
        out
    }

    fn chain_into(&self, id: NodeId, op: Op, out: &mut Vec<NodeId>) {
        let node = self.nodes[id];
        if node.token.is_op(op) {
            if let Some(l) = node.lhs {
                self.chain_into(l, op, out);
            }
            if let Some(r) = node.rhs {
                self.chain_into(r, op, out);
            }
        } else {
            out.push(id);
        }
    }

    /// Node count of a subtree.
    pub fn tree_size(&self, id: NodeId) -> usize {
        let node = self.nodes[id];
        1 + node.lhs.map_or(0, |l| self.tree_size(l)) + node.rhs.map_or(0, |r| self.tree_size(r))
    }
}
