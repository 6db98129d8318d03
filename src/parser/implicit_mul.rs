//! Implicit multiplication insertion
//!
//! Inserts `*` between adjacent operands so that `2x`, `2(x+1)` and
//! `(a)(b)` parse as products. A function name followed by `(` is a call,
//! not a product, and is left alone.

use crate::ast::Op;

use super::lexer::Lexeme;

/// True when a `*` belongs between `current` and `next`.
fn should_insert_mul(current: &Lexeme, next: &Lexeme) -> bool {
    let ends_operand = matches!(
        current,
        Lexeme::Int(_) | Lexeme::Var(_) | Lexeme::RParen
    );
    let starts_operand = matches!(
        next,
        Lexeme::Int(_) | Lexeme::Var(_) | Lexeme::Func(_) | Lexeme::LParen
    );
    ends_operand && starts_operand
}

/// Insert implicit multiplication operators between appropriate tokens.
pub(crate) fn insert_implicit_mul(tokens: Vec<Lexeme>) -> Vec<Lexeme> {
    if tokens.is_empty() {
        return tokens;
    }

    let needs_insertion = tokens
        .windows(2)
        .any(|w| should_insert_mul(&w[0], &w[1]));
    if !needs_insertion {
        return tokens;
    }

    let mut result = Vec::with_capacity(tokens.len() * 3 / 2);
    let mut it = tokens.into_iter().peekable();

    while let Some(current) = it.next() {
        let needs_mul = it
            .peek()
            .map_or(false, |next| should_insert_mul(&current, next));
        result.push(current);
        if needs_mul {
            result.push(Lexeme::Op(Op::Mul));
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::VarId;

    #[test]
    fn test_number_variable() {
        let tokens = vec![Lexeme::Int(2), Lexeme::Var(VarId(0))];
        let result = insert_implicit_mul(tokens);
        assert_eq!(result.len(), 3);
        assert_eq!(result[1], Lexeme::Op(Op::Mul));
    }

    #[test]
    fn test_number_paren() {
        let tokens = vec![Lexeme::Int(2), Lexeme::LParen];
        let result = insert_implicit_mul(tokens);
        assert_eq!(result.len(), 3);
        assert_eq!(result[1], Lexeme::Op(Op::Mul));
    }

    #[test]
    fn test_paren_paren() {
        let tokens = vec![Lexeme::RParen, Lexeme::LParen];
        let result = insert_implicit_mul(tokens);
        assert_eq!(result.len(), 3);
        assert_eq!(result[1], Lexeme::Op(Op::Mul));
    }

    #[test]
    fn test_function_call_untouched() {
        use crate::functions::Func;
        let tokens = vec![Lexeme::Func(Func::Sin), Lexeme::LParen];
        let result = insert_implicit_mul(tokens);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_number_function() {
        use crate::functions::Func;
        let tokens = vec![Lexeme::Int(2), Lexeme::Func(Func::Sin)];
        let result = insert_implicit_mul(tokens);
        assert_eq!(result.len(), 3);
        assert_eq!(result[1], Lexeme::Op(Op::Mul));
    }

    #[test]
    fn test_no_insertion_around_operators() {
        let tokens = vec![Lexeme::Var(VarId(0)), Lexeme::Op(Op::Add), Lexeme::Int(1)];
        let result = insert_implicit_mul(tokens);
        assert_eq!(result.len(), 3);
    }
}
