//! End-to-end tests: one input line in, exact output lines out.

use crate::process_line;

fn run_line(input: &str) -> String {
    let mut out = Vec::new();
    process_line(input, &mut out).expect("writing to a Vec cannot fail");
    String::from_utf8(out).expect("output is valid utf-8")
}

#[test]
fn test_product_of_variable_with_itself() {
    assert_eq!(run_line("x*x"), "x: 2*x\n");
}

#[test]
fn test_power_rule_restored_from_exponential_form() {
    assert_eq!(run_line("x^3"), "x: 3*x^2\n");
}

#[test]
fn test_exponential_is_its_own_derivative() {
    assert_eq!(run_line("exp(x)"), "x: exp(x)\n");
}

#[test]
fn test_quotient_of_variable_with_itself() {
    assert_eq!(run_line("x/x"), "x: 0\n");
}

#[test]
fn test_pythagorean_identity_collapses() {
    assert_eq!(run_line("sin(x)*sin(x) + cos(x)*cos(x)"), "x: 0\n");
}

#[test]
fn test_log_of_product_gives_reciprocals() {
    assert_eq!(run_line("ln(x*y)"), "x: 1/x\ny: 1/y\n");
}

#[test]
fn test_division_by_zero_literal() {
    assert_eq!(run_line("1/0"), "Runtime Error: Divided by 0\n");
}

#[test]
fn test_implicit_multiplication() {
    assert_eq!(run_line("2x"), "x: 2\n");
}

#[test]
fn test_maximal_munch_makes_sinx_a_variable() {
    assert_eq!(run_line("sinx"), "sinx: 1\n");
}

#[test]
fn test_derivative_of_identity() {
    assert_eq!(run_line("x"), "x: 1\n");
}

#[test]
fn test_variables_print_in_first_seen_order() {
    assert_eq!(run_line("y+x"), "y: 1\nx: 1\n");
}

#[test]
fn test_constant_line_produces_no_output() {
    assert_eq!(run_line("5"), "");
    assert_eq!(run_line("2*3+4"), "");
}

#[test]
fn test_blank_and_garbage_lines_are_silent() {
    assert_eq!(run_line(""), "");
    assert_eq!(run_line("   "), "");
    assert_eq!(run_line("@ # $"), "");
}

#[test]
fn test_sine_derivative() {
    assert_eq!(run_line("sin(x)"), "x: cos(x)\n");
}

#[test]
fn test_syntax_error_missing_operand() {
    assert_eq!(run_line("x+"), "Syntax Error: missing operand.\n");
    assert_eq!(run_line("x+*y"), "Syntax Error: missing operand.\n");
}

#[test]
fn test_syntax_error_lonely_rparen() {
    assert_eq!(run_line("x)"), "Syntax Error: \")\"is lonely.\n");
}

#[test]
fn test_syntax_error_unclosed_lparen() {
    assert_eq!(
        run_line("(x"),
        "Syntax Error: expected \")\"for a lonely \"(\" qwq. \n"
    );
}

#[test]
fn test_syntax_error_comma_outside_parens() {
    assert_eq!(run_line("x,y"), "Syntax Error: \",\"is not in a \"()\".\n");
}

#[test]
fn test_syntax_error_comma_in_plain_parens() {
    assert_eq!(
        run_line("(x,y)"),
        "Syntax Error: \",\" is only for functions.\n"
    );
}

#[test]
fn test_syntax_error_wrong_arity() {
    assert_eq!(
        run_line("sin(x,y)"),
        "Syntax Error: Function sin expected 1 Arguments, Found 2 Arguments\n"
    );
    assert_eq!(
        run_line("log(x)"),
        "Syntax Error: Function log expected 2 Arguments, Found 1 Arguments\n"
    );
}

#[test]
fn test_syntax_error_too_many_arguments() {
    assert_eq!(run_line("sin(x,y,z)"), "Syntax Error: Too many arguments.\n");
}

#[test]
fn test_error_line_produces_no_derivatives() {
    // the error is the only output even though variables were seen
    let out = run_line("x+y+");
    assert_eq!(out, "Syntax Error: missing operand.\n");
}

#[test]
fn test_lines_are_independent() {
    // a failing line must not affect the next one
    assert_eq!(run_line("x+"), "Syntax Error: missing operand.\n");
    assert_eq!(run_line("x"), "x: 1\n");
}
