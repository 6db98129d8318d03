//! Error types for parsing and simplification
//!
//! Both failures are recoverable at line granularity: the driver prints the
//! diagnostic and moves on to the next input line. The diagnostic strings,
//! spacing included, are part of the external interface.

use std::fmt;

/// Errors raised while turning a token stream into an expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A binary operator without enough operands, or an empty operand group.
    MissingOperand,
    /// More than one `,` inside a single pair of parentheses.
    TooManyArguments,
    /// `,` at the top level, outside any parentheses.
    CommaOutsideParens,
    /// `)` with no matching `(`.
    LonelyRParen,
    /// `,` inside plain (non-function) parentheses.
    CommaOutsideFunction,
    /// `(` never closed before end of input.
    UnclosedLParen,
    /// A function applied to the wrong number of arguments.
    WrongArity {
        name: &'static str,
        expected: usize,
        found: usize,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MissingOperand => write!(f, "Syntax Error: missing operand."),
            ParseError::TooManyArguments => write!(f, "Syntax Error: Too many arguments."),
            ParseError::CommaOutsideParens => {
                write!(f, "Syntax Error: \",\"is not in a \"()\".")
            }
            ParseError::LonelyRParen => write!(f, "Syntax Error: \")\"is lonely."),
            ParseError::CommaOutsideFunction => {
                write!(f, "Syntax Error: \",\" is only for functions.")
            }
            ParseError::UnclosedLParen => {
                write!(f, "Syntax Error: expected \")\"for a lonely \"(\" qwq. ")
            }
            ParseError::WrongArity {
                name,
                expected,
                found,
            } => write!(
                f,
                "Syntax Error: Function {} expected {} Arguments, Found {} Arguments",
                name, expected, found
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// A rational constant acquired a zero denominator.
///
/// Raised while folding constants or extracting coefficients; the driver
/// latches it per line and prints the diagnostic at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DivideByZero;

impl fmt::Display for DivideByZero {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Runtime Error: Divided by 0")
    }
}

impl std::error::Error for DivideByZero {}
