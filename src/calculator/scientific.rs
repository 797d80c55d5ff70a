//! Unary scientific functions and constants.
//!
//! These act on the current display value directly and never touch the
//! pending expression.

use super::evaluation::EvalError;
use super::input::ScientificFn;

/// Apply a function to `value`. Trigonometric functions take degrees.
pub fn apply_scientific(func: ScientificFn, value: f64) -> Result<f64, EvalError> {
    let result = match func {
        ScientificFn::Sin => value.to_radians().sin(),
        ScientificFn::Cos => value.to_radians().cos(),
        ScientificFn::Tan => value.to_radians().tan(),
        ScientificFn::Ln => value.ln(),
        ScientificFn::Log => value.log10(),
        ScientificFn::Sqrt => value.sqrt(),
        ScientificFn::Square => value * value,
        ScientificFn::Pi => std::f64::consts::PI,
        ScientificFn::E => std::f64::consts::E,
    };

    if result.is_finite() {
        Ok(result)
    } else {
        Err(EvalError::NonFinite)
    }
}
