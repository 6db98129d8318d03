//! Precedence-climbing parser
//!
//! Builds the expression tree from the lexeme stream. Associativity follows
//! the engine's conventions: `-` and `/` reduce eagerly (left), `^` climbs
//! right, and `+`/`*` group right, which is immaterial for hashing since
//! `+`/`*` chains hash as multisets.
//!
//! Unary minus exists only at the start of an operand group (line start,
//! after `(`, after `,`): the parser materializes an implicit `0` operand
//! there and lets the ordinary binary `-` do the work, so `-x` is `0 - x`
//! and `-x^2` is `0 - x^2`. A `-` anywhere else is a missing operand.

use crate::arena::Arena;
use crate::ast::{NodeId, Op};
use crate::error::ParseError;

use super::lexer::Lexeme;

pub(crate) fn parse_expression(
    arena: &mut Arena,
    tokens: &[Lexeme],
) -> Result<NodeId, ParseError> {
    let mut parser = Parser {
        arena,
        tokens,
        pos: 0,
        depth: 0,
    };
    let root = parser.parse_expr(0, true)?;
    match parser.current() {
        None => Ok(root),
        Some(Lexeme::RParen) => Err(ParseError::LonelyRParen),
        Some(Lexeme::Comma) => Err(ParseError::CommaOutsideParens),
        Some(_) => Err(ParseError::MissingOperand),
    }
}

struct Parser<'a, 't> {
    arena: &'a mut Arena,
    tokens: &'t [Lexeme],
    pos: usize,
    depth: usize,
}

impl<'a, 't> Parser<'a, 't> {
    fn current(&self) -> Option<&Lexeme> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn parse_expr(&mut self, min_bp: u8, group_start: bool) -> Result<NodeId, ParseError> {
        let mut left = self.parse_prefix(group_start)?;

        while let Some(&Lexeme::Op(op)) = self.current() {
            let bp = op.precedence();
            if bp < min_bp {
                break;
            }
            self.advance();

            // `-` and `/` must not re-absorb operators of their own
            // precedence on the right; everything else climbs at equal
            // precedence.
            let next_bp = match op {
                Op::Sub | Op::Div => bp + 1,
                Op::Add | Op::Mul | Op::Pow => bp,
            };
            let right = self.parse_expr(next_bp, false)?;
            left = self.arena.op(op, left, right);
        }

        Ok(left)
    }

    /// Parse a parenthesized or argument subexpression; a dangling end of
    /// input in here means an unclosed `(` rather than a missing operand.
    fn parse_group(&mut self) -> Result<NodeId, ParseError> {
        match self.parse_expr(0, true) {
            Err(ParseError::MissingOperand) if self.current().is_none() => {
                Err(ParseError::UnclosedLParen)
            }
            other => other,
        }
    }

    fn parse_prefix(&mut self, group_start: bool) -> Result<NodeId, ParseError> {
        let token = match self.current() {
            Some(t) => *t,
            None => return Err(ParseError::MissingOperand),
        };

        match token {
            Lexeme::Int(v) => {
                self.advance();
                Ok(self.arena.int(v))
            }

            Lexeme::Var(id) => {
                self.advance();
                Ok(self.arena.var(id))
            }

            Lexeme::Func(f) => {
                self.advance();
                self.parse_call(f)
            }

            Lexeme::LParen => {
                self.advance();
                self.depth += 1;
                if self.current().is_none() {
                    return Err(ParseError::UnclosedLParen);
                }
                let inner = self.parse_group()?;
                let result = match self.current() {
                    Some(Lexeme::RParen) => {
                        self.advance();
                        Ok(inner)
                    }
                    Some(Lexeme::Comma) => Err(ParseError::CommaOutsideFunction),
                    None => Err(ParseError::UnclosedLParen),
                    Some(_) => Err(ParseError::MissingOperand),
                };
                self.depth -= 1;
                result
            }

            // Implicit leading zero: the `-` itself is left in place and
            // parsed as a binary operator.
            Lexeme::Op(Op::Sub) if group_start => Ok(self.arena.int(0)),

            Lexeme::Op(_) => Err(ParseError::MissingOperand),

            Lexeme::RParen => {
                if self.depth == 0 {
                    Err(ParseError::LonelyRParen)
                } else {
                    Err(ParseError::MissingOperand)
                }
            }

            Lexeme::Comma => {
                if self.depth == 0 {
                    Err(ParseError::CommaOutsideParens)
                } else {
                    Err(ParseError::MissingOperand)
                }
            }
        }
    }

    fn parse_call(&mut self, f: crate::functions::Func) -> Result<NodeId, ParseError> {
        let def = f.def();

        match self.current() {
            Some(Lexeme::LParen) => self.advance(),
            _ => {
                return Err(ParseError::WrongArity {
                    name: def.name,
                    expected: def.arity,
                    found: 0,
                })
            }
        }
        self.depth += 1;

        if matches!(self.current(), Some(Lexeme::RParen)) {
            return Err(ParseError::WrongArity {
                name: def.name,
                expected: def.arity,
                found: 0,
            });
        }

        let first = self.parse_group()?;
        let mut found = 1;
        let mut second = None;

        if matches!(self.current(), Some(Lexeme::Comma)) {
            self.advance();
            second = Some(self.parse_group()?);
            found = 2;
            if matches!(self.current(), Some(Lexeme::Comma)) {
                return Err(ParseError::TooManyArguments);
            }
        }

        match self.current() {
            Some(Lexeme::RParen) => self.advance(),
            None => return Err(ParseError::UnclosedLParen),
            Some(_) => return Err(ParseError::MissingOperand),
        }
        self.depth -= 1;

        if found != def.arity {
            return Err(ParseError::WrongArity {
                name: def.name,
                expected: def.arity,
                found,
            });
        }

        Ok(match second {
            Some(s) => self.arena.func2(f, first, s),
            None => self.arena.func1(f, first),
        })
    }
}
