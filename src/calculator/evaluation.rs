//! Strict left-to-right expression evaluation.
//!
//! Operators are applied in the order they were entered, with no
//! precedence: `2 + 3 × 4` is `(2 + 3) × 4 = 20`. This matches what the
//! calculator has always shown and is kept as observable behavior.

use super::format::{format_display, format_number, strip_separators};
use super::input::{Operator, to_arithmetic};

/// Why an expression could not be reduced to a number.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("result is not a finite number")]
    NonFinite,
    #[error("malformed expression: {0}")]
    Malformed(String),
}

/// A successfully evaluated expression.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    /// The expression as it was shown (display operators, separators).
    pub expression: String,
    /// The numeric value.
    pub value: f64,
    /// Formatted for display (with thousand separators).
    pub display_result: String,
    /// Formatted for the buffer and clipboard (raw number).
    pub clipboard_result: String,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Token {
    Number(f64),
    Op(Operator),
}

/// Evaluate a displayed expression such as `"1,200 × 3 - 4"`.
pub fn evaluate_expression(input: &str) -> Result<Evaluation, EvalError> {
    let expression = input.trim().to_string();
    let value = evaluate(&expression)?;

    Ok(Evaluation {
        display_result: format_display(value),
        clipboard_result: format_number(value),
        expression,
        value,
    })
}

/// Reduce an expression to a number, left to right.
pub fn evaluate(expression: &str) -> Result<f64, EvalError> {
    let normalized = to_arithmetic(&strip_separators(expression));
    let tokens = tokenize(&normalized)?;

    let mut result = 0.0;
    let mut pending = Operator::Add;
    let mut operand = 0.0;

    for token in tokens {
        match token {
            Token::Number(n) => operand = n,
            Token::Op(op) => {
                result = apply(pending, result, operand)?;
                pending = op;
            }
        }
    }
    result = apply(pending, result, operand)?;

    if result.is_finite() {
        Ok(result)
    } else {
        Err(EvalError::NonFinite)
    }
}

fn apply(op: Operator, lhs: f64, rhs: f64) -> Result<f64, EvalError> {
    let value = match op {
        Operator::Add => lhs + rhs,
        Operator::Subtract => lhs - rhs,
        Operator::Multiply => lhs * rhs,
        Operator::Divide | Operator::Remainder if rhs == 0.0 => {
            return Err(EvalError::DivisionByZero);
        }
        Operator::Divide => lhs / rhs,
        Operator::Remainder => lhs % rhs,
    };

    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvalError::NonFinite)
    }
}

/// Split an arithmetic expression into alternating numbers and operators.
///
/// A `-` where an operand is expected is the sign of that operand.
fn tokenize(expression: &str) -> Result<Vec<Token>, EvalError> {
    let mut tokens = Vec::new();
    let mut expect_operand = true;
    let mut chars = expression.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if c.is_ascii_digit() || c == '.' || (c == '-' && expect_operand) {
            if !expect_operand {
                return Err(EvalError::Malformed(format!(
                    "missing operator before {:?}",
                    c
                )));
            }

            let mut literal = String::new();
            literal.push(c);
            chars.next();
            while let Some(&d) = chars.peek() {
                if d.is_ascii_digit() || d == '.' {
                    literal.push(d);
                    chars.next();
                } else {
                    break;
                }
            }

            let number = literal
                .parse::<f64>()
                .map_err(|_| EvalError::Malformed(format!("invalid number {:?}", literal)))?;
            tokens.push(Token::Number(number));
            expect_operand = false;
            continue;
        }

        match Operator::from_symbol(c) {
            Some(op) if !expect_operand => {
                tokens.push(Token::Op(op));
                expect_operand = true;
                chars.next();
            }
            Some(_) => {
                return Err(EvalError::Malformed(format!("unexpected operator {:?}", c)));
            }
            None => {
                return Err(EvalError::Malformed(format!("unexpected character {:?}", c)));
            }
        }
    }

    if expect_operand {
        return Err(EvalError::Malformed("expression ends without an operand".into()));
    }

    Ok(tokens)
}
