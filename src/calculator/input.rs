//! Input normalization for the calculator.
//!
//! Buttons and keyboard keys both end up as an [`Action`], which is the only
//! thing the engine consumes.

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

lazy_static! {
    /// A run of digits and decimal points typed in one go, e.g. `1234.5`.
    static ref NUMBER_RUN: Regex = Regex::new(r"^[0-9.]+$").unwrap();
}

/// A binary operator in the pending expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
}

impl Operator {
    /// Symbol shown in the pending expression (`×`, `÷`, ...).
    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '×',
            Self::Divide => '÷',
            Self::Remainder => '%',
        }
    }

    /// Plain ASCII symbol used by the evaluator.
    pub fn arithmetic(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
            Self::Divide => '/',
            Self::Remainder => '%',
        }
    }

    /// Parse either the display or the arithmetic symbol.
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Add),
            '-' | '−' => Some(Self::Subtract),
            '*' | '×' | 'x' => Some(Self::Multiply),
            '/' | '÷' => Some(Self::Divide),
            '%' => Some(Self::Remainder),
            _ => None,
        }
    }
}

/// Map display operators back to arithmetic operators in an expression.
pub fn to_arithmetic(expression: &str) -> String {
    expression
        .chars()
        .map(|c| match c {
            '×' => '*',
            '÷' => '/',
            '−' => '-',
            other => other,
        })
        .collect()
}

/// Unary functions and constants that rewrite the display in place.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScientificFn {
    Sin,
    Cos,
    Tan,
    Ln,
    Log,
    Sqrt,
    Square,
    Pi,
    E,
}

impl ScientificFn {
    pub fn label(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Ln => "ln",
            Self::Log => "log",
            Self::Sqrt => "√",
            Self::Square => "x²",
            Self::Pi => "π",
            Self::E => "e",
        }
    }

    /// Constants ignore the current display value.
    pub fn is_constant(self) -> bool {
        matches!(self, Self::Pi | Self::E)
    }
}

/// Operations on the memory register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemoryOp {
    Add,
    Subtract,
    Recall,
    Clear,
}

impl MemoryOp {
    pub fn label(self) -> &'static str {
        match self {
            Self::Add => "M+",
            Self::Subtract => "M-",
            Self::Recall => "MR",
            Self::Clear => "MC",
        }
    }
}

/// A single calculator input, from a button or a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Digit(char),
    Decimal,
    Operator(Operator),
    Equals,
    Clear,
    Backspace,
    Memory(MemoryOp),
    Scientific(ScientificFn),
    Undo,
    Redo,
}

impl Action {
    /// Map a physical key to an action.
    ///
    /// `key` uses the usual key names (`"7"`, `"Enter"`, `"Escape"`,
    /// `"Backspace"`). With `ctrl` held only `z` (undo) and `y` (redo) are
    /// recognized.
    pub fn from_key(key: &str, ctrl: bool) -> Option<Self> {
        if ctrl {
            return match key {
                "z" | "Z" => Some(Self::Undo),
                "y" | "Y" => Some(Self::Redo),
                _ => None,
            };
        }

        let mut chars = key.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_digit() {
                return Some(Self::Digit(c));
            }
            if c == '.' {
                return Some(Self::Decimal);
            }
            if matches!(c, '+' | '-' | '*' | '/' | '%') {
                return Operator::from_symbol(c).map(Self::Operator);
            }
        }

        match key {
            "Enter" | "=" => Some(Self::Equals),
            "Escape" | "c" | "C" => Some(Self::Clear),
            "Backspace" => Some(Self::Backspace),
            _ => None,
        }
    }

    /// Whether this action moves forward (and therefore invalidates redo).
    pub fn is_forward(self) -> bool {
        !matches!(self, Self::Undo | Self::Redo)
    }
}

/// Token that is neither a known key nor a button label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown calculator input: {0:?}")]
pub struct UnknownInput(pub String);

impl FromStr for Action {
    type Err = UnknownInput;

    /// Parse an on-screen button label.
    fn from_str(label: &str) -> Result<Self, Self::Err> {
        if let Some(action) = Self::from_key(label, false) {
            return Ok(action);
        }

        let action = match label.to_lowercase().as_str() {
            "×" | "x" => Self::Operator(Operator::Multiply),
            "÷" => Self::Operator(Operator::Divide),
            "−" => Self::Operator(Operator::Subtract),
            "enter" => Self::Equals,
            "esc" | "escape" | "clear" | "ac" => Self::Clear,
            "⌫" | "backspace" | "bs" | "del" => Self::Backspace,
            "sin" => Self::Scientific(ScientificFn::Sin),
            "cos" => Self::Scientific(ScientificFn::Cos),
            "tan" => Self::Scientific(ScientificFn::Tan),
            "ln" => Self::Scientific(ScientificFn::Ln),
            "log" => Self::Scientific(ScientificFn::Log),
            "√" | "sqrt" => Self::Scientific(ScientificFn::Sqrt),
            "x²" | "sq" | "sqr" => Self::Scientific(ScientificFn::Square),
            "π" | "pi" => Self::Scientific(ScientificFn::Pi),
            "e" => Self::Scientific(ScientificFn::E),
            "m+" => Self::Memory(MemoryOp::Add),
            "m-" => Self::Memory(MemoryOp::Subtract),
            "mr" => Self::Memory(MemoryOp::Recall),
            "mc" => Self::Memory(MemoryOp::Clear),
            "undo" | "ctrl+z" => Self::Undo,
            "redo" | "ctrl+y" => Self::Redo,
            _ => return Err(UnknownInput(label.to_string())),
        };

        Ok(action)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Digit(d) => write!(f, "{}", d),
            Self::Decimal => f.write_str("."),
            Self::Operator(op) => write!(f, "{}", op.symbol()),
            Self::Equals => f.write_str("="),
            Self::Clear => f.write_str("C"),
            Self::Backspace => f.write_str("⌫"),
            Self::Memory(op) => f.write_str(op.label()),
            Self::Scientific(func) => f.write_str(func.label()),
            Self::Undo => f.write_str("undo"),
            Self::Redo => f.write_str("redo"),
        }
    }
}

/// Split a line of typed input into actions.
///
/// Tokens are separated by whitespace. A run of digits such as `1234.5`
/// expands to one action per character, so `12 + 5 =` is five tokens but
/// six actions.
pub fn parse_tokens(line: &str) -> Result<Vec<Action>, UnknownInput> {
    let mut actions = Vec::new();

    for token in line.split_whitespace() {
        if NUMBER_RUN.is_match(token) {
            actions.extend(token.chars().map(|c| {
                if c == '.' {
                    Action::Decimal
                } else {
                    Action::Digit(c)
                }
            }));
        } else {
            actions.push(token.parse()?);
        }
    }

    Ok(actions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_mapping() {
        assert_eq!(Action::from_key("7", false), Some(Action::Digit('7')));
        assert_eq!(Action::from_key(".", false), Some(Action::Decimal));
        assert_eq!(
            Action::from_key("*", false),
            Some(Action::Operator(Operator::Multiply))
        );
        assert_eq!(
            Action::from_key("/", false),
            Some(Action::Operator(Operator::Divide))
        );
        assert_eq!(Action::from_key("Enter", false), Some(Action::Equals));
        assert_eq!(Action::from_key("=", false), Some(Action::Equals));
        assert_eq!(Action::from_key("Escape", false), Some(Action::Clear));
        assert_eq!(Action::from_key("c", false), Some(Action::Clear));
        assert_eq!(Action::from_key("Backspace", false), Some(Action::Backspace));
        assert_eq!(Action::from_key("q", false), None);
    }

    #[test]
    fn test_ctrl_shortcuts() {
        assert_eq!(Action::from_key("z", true), Some(Action::Undo));
        assert_eq!(Action::from_key("y", true), Some(Action::Redo));
        assert_eq!(Action::from_key("7", true), None);
    }

    #[test]
    fn test_display_operators() {
        assert_eq!(Operator::Multiply.symbol(), '×');
        assert_eq!(Operator::Divide.symbol(), '÷');
        assert_eq!(to_arithmetic("12 × 3 ÷ 4"), "12 * 3 / 4");
        assert_eq!(Operator::from_symbol('×'), Some(Operator::Multiply));
        assert_eq!(Operator::from_symbol('/'), Some(Operator::Divide));
    }

    #[test]
    fn test_button_labels() {
        assert_eq!(
            "√".parse::<Action>(),
            Ok(Action::Scientific(ScientificFn::Sqrt))
        );
        assert_eq!(
            "x²".parse::<Action>(),
            Ok(Action::Scientific(ScientificFn::Square))
        );
        assert_eq!("M+".parse::<Action>(), Ok(Action::Memory(MemoryOp::Add)));
        assert_eq!("mr".parse::<Action>(), Ok(Action::Memory(MemoryOp::Recall)));
        assert_eq!("ctrl+z".parse::<Action>(), Ok(Action::Undo));
        assert!("launch".parse::<Action>().is_err());
    }

    #[test]
    fn test_parse_tokens_expands_numbers() {
        let actions = parse_tokens("12 + 3.5 =").unwrap();
        assert_eq!(
            actions,
            vec![
                Action::Digit('1'),
                Action::Digit('2'),
                Action::Operator(Operator::Add),
                Action::Digit('3'),
                Action::Decimal,
                Action::Digit('5'),
                Action::Equals,
            ]
        );
    }

    #[test]
    fn test_parse_tokens_rejects_unknown() {
        assert_eq!(
            parse_tokens("2 plus 2"),
            Err(UnknownInput("plus".to_string()))
        );
    }

    #[test]
    fn test_labels_round_trip_through_display() {
        for label in ["sin", "√", "x²", "π", "M-", "MC", "÷", "×"] {
            let action: Action = label.parse().unwrap();
            assert_eq!(action.to_string(), label);
        }
    }
}
