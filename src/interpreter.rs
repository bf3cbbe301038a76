//! Tree-walking evaluation of parsed expressions.
use std::io;

use crate::ast::{BinaryOp, Expr, Node, UnaryOp};
use crate::error::{Error, Result};
use crate::value::Value;

/// Reduce an expression to a value, evaluating children before parents. Fails with
/// `Error::RuntimeError` when an operand's type violates its operator's contract; the error
/// names the operator token's span and propagates unmodified to the caller.
pub fn evaluate(expr: &Node<Expr>) -> Result<Value> {
    Ok(match &expr.inner {
        Expr::Literal(value) => value.clone(),
        Expr::Grouping(child) => evaluate(child)?,
        Expr::Unary(op, child) => {
            let operand = evaluate(child)?;
            match op.inner {
                UnaryOp::Not => Value::Bool(!operand.is_truthy()),
                UnaryOp::Neg => Value::Number(-number_operand(op, operand)?),
            }
        }
        Expr::Binary(op, lhs, rhs) => {
            // Both operands are always evaluated; there is no short-circuit.
            let l = evaluate(lhs)?;
            let r = evaluate(rhs)?;
            match op.inner {
                BinaryOp::Equal => Value::Bool(l == r),
                BinaryOp::NotEqual => Value::Bool(l != r),
                BinaryOp::Add => match (l, r) {
                    (Value::Number(l), Value::Number(r)) => Value::Number(l + r),
                    (Value::String(l), Value::String(r)) => Value::String(format!("{l}{r}")),
                    _ => {
                        return Error::runtime(
                            "Operands must be two numbers or two strings",
                            op.src,
                        )
                    }
                },
                BinaryOp::Sub => {
                    let (l, r) = number_operands(op, l, r)?;
                    Value::Number(l - r)
                }
                BinaryOp::Mul => {
                    let (l, r) = number_operands(op, l, r)?;
                    Value::Number(l * r)
                }
                BinaryOp::Div => {
                    // Division by zero is not trapped; it follows float semantics.
                    let (l, r) = number_operands(op, l, r)?;
                    Value::Number(l / r)
                }
                BinaryOp::Greater => {
                    let (l, r) = number_operands(op, l, r)?;
                    Value::Bool(l > r)
                }
                BinaryOp::GreaterEqual => {
                    let (l, r) = number_operands(op, l, r)?;
                    Value::Bool(l >= r)
                }
                BinaryOp::Less => {
                    let (l, r) = number_operands(op, l, r)?;
                    Value::Bool(l < r)
                }
                BinaryOp::LessEqual => {
                    let (l, r) = number_operands(op, l, r)?;
                    Value::Bool(l <= r)
                }
            }
        }
    })
}

fn number_operand(op: &Node<UnaryOp>, operand: Value) -> Result<f64> {
    match operand {
        Value::Number(n) => Ok(n),
        _ => Error::runtime("Operand must be a number.", op.src),
    }
}

fn number_operands(op: &Node<BinaryOp>, l: Value, r: Value) -> Result<(f64, f64)> {
    match (l, r) {
        (Value::Number(l), Value::Number(r)) => Ok((l, r)),
        _ => Error::runtime("Operands must be numbers", op.src),
    }
}

/// Evaluate an expression and write its rendered value, followed by a newline, to `out`.
///
/// This is the single recovery boundary: a runtime error is reported to stderr, highlighted in
/// `program`, and not propagated further. Either the value is written or only the error is
/// emitted, never both.
pub fn run(program: &str, expr: &Node<Expr>, out: &mut impl io::Write) -> io::Result<()> {
    match evaluate(expr) {
        Ok(value) => writeln!(out, "{value}"),
        Err(e) => {
            eprintln!("{}", e.highlight_in_line(program));
            Ok(())
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parser::parse;
    use crate::src::Src;

    /// Shortcut to create a Src.
    fn s(offset: usize, len: usize) -> Src {
        Src { offset, len }
    }

    /// Shortcut: parse and evaluate a program.
    fn eval(program: &str) -> Result<Value> {
        evaluate(&parse(program).unwrap())
    }

    #[test]
    fn literal_identity() -> Result<()> {
        assert_eq!(evaluate(&Expr::number(s(0, 3), 4.5))?, Value::Number(4.5));
        assert_eq!(evaluate(&Expr::nil(s(0, 3)))?, Value::Nil);
        Ok(())
    }

    #[test]
    fn grouping_is_transparent() -> Result<()> {
        let grouped = Expr::grouping(s(0, 5), Expr::number(s(1, 3), 4.5));
        assert_eq!(evaluate(&grouped)?, evaluate(&Expr::number(s(1, 3), 4.5))?);
        assert_eq!(eval("(1 + 2)")?, eval("1 + 2")?);
        Ok(())
    }

    #[test]
    fn negate_number() -> Result<()> {
        assert_eq!(eval("-5")?, Value::Number(-5.0));
        assert_eq!(eval("--5")?, Value::Number(5.0));
        Ok(())
    }

    #[test]
    fn negate_non_number() {
        assert_eq!(
            eval("-\"abc\"").unwrap_err(),
            Error::RuntimeError("Operand must be a number.".into(), s(0, 1))
        );
        assert_eq!(
            eval("-nil").unwrap_err(),
            Error::RuntimeError("Operand must be a number.".into(), s(0, 1))
        );
    }

    #[test]
    fn not_follows_truthiness() -> Result<()> {
        assert_eq!(eval("!nil")?, Value::Bool(true));
        assert_eq!(eval("!false")?, Value::Bool(true));
        assert_eq!(eval("!true")?, Value::Bool(false));
        // Zero and the empty string are truthy.
        assert_eq!(eval("!0")?, Value::Bool(false));
        assert_eq!(eval("!\"\"")?, Value::Bool(false));
        Ok(())
    }

    #[test]
    fn arithmetic() -> Result<()> {
        assert_eq!(eval("1 + 2")?, Value::Number(3.0));
        assert_eq!(eval("7 - 2.5")?, Value::Number(4.5));
        assert_eq!(eval("3 * 4")?, Value::Number(12.0));
        assert_eq!(eval("1 / 4")?, Value::Number(0.25));
        assert_eq!(eval("1 + 2 * 3")?, Value::Number(7.0));
        assert_eq!(eval("(1 + 2) * 3")?, Value::Number(9.0));
        Ok(())
    }

    #[test]
    fn division_by_zero_is_infinite() -> Result<()> {
        assert_eq!(eval("1 / 0")?, Value::Number(f64::INFINITY));
        assert_eq!(eval("-1 / 0")?, Value::Number(f64::NEG_INFINITY));
        Ok(())
    }

    #[test]
    fn comparisons() -> Result<()> {
        assert_eq!(eval("2 > 1")?, Value::Bool(true));
        assert_eq!(eval("2 >= 2")?, Value::Bool(true));
        assert_eq!(eval("1 < 1")?, Value::Bool(false));
        assert_eq!(eval("1 <= 1")?, Value::Bool(true));
        Ok(())
    }

    #[test]
    fn comparison_requires_numbers() {
        assert_eq!(
            eval("1 < \"a\"").unwrap_err(),
            Error::RuntimeError("Operands must be numbers".into(), s(2, 1))
        );
        assert_eq!(
            eval("\"a\" * 2").unwrap_err(),
            Error::RuntimeError("Operands must be numbers".into(), s(4, 1))
        );
    }

    #[test]
    fn concatenation() -> Result<()> {
        assert_eq!(eval("\"foo\" + \"bar\"")?, Value::String("foobar".into()));
        assert_eq!(eval("\"\" + \"\"")?, Value::String("".into()));
        Ok(())
    }

    #[test]
    fn mixed_addition_is_an_error() {
        assert_eq!(
            eval("1 + \"a\"").unwrap_err(),
            Error::RuntimeError(
                "Operands must be two numbers or two strings".into(),
                s(2, 1)
            )
        );
        assert_eq!(
            eval("\"a\" + 1").unwrap_err(),
            Error::RuntimeError(
                "Operands must be two numbers or two strings".into(),
                s(4, 1)
            )
        );
    }

    #[test]
    fn equality() -> Result<()> {
        assert_eq!(eval("nil == nil")?, Value::Bool(true));
        assert_eq!(eval("1 == \"1\"")?, Value::Bool(false));
        assert_eq!(eval("1 != 2")?, Value::Bool(true));
        assert_eq!(eval("\"a\" == \"a\"")?, Value::Bool(true));
        // Equality never type-checks its operands.
        assert_eq!(eval("nil == 1")?, Value::Bool(false));
        assert_eq!(eval("true != \"true\"")?, Value::Bool(true));
        Ok(())
    }

    #[test]
    fn error_from_subtree_propagates() {
        // The error is attributed to the operator that failed, deep in the tree.
        assert_eq!(
            eval("1 + (2 * nil)").unwrap_err(),
            Error::RuntimeError("Operands must be numbers".into(), s(7, 1))
        );
    }

    #[test]
    fn run_writes_result() {
        let program = "1 + 2";
        let expr = parse(program).unwrap();
        let mut out = Vec::new();
        run(program, &expr, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "3\n");
    }

    #[test]
    fn run_renders_nil_equality() {
        let program = "nil == nil";
        let expr = parse(program).unwrap();
        let mut out = Vec::new();
        run(program, &expr, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "true\n");
    }

    #[test]
    fn run_suppresses_runtime_errors() {
        let program = "\"a\" * 2";
        let expr = parse(program).unwrap();
        let mut out = Vec::new();
        // The error is reported to stderr; nothing is written to the output channel.
        run(program, &expr, &mut out).unwrap();
        assert!(out.is_empty());
    }
}
