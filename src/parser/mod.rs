// Call syntax for describing plots in text

pub mod call;
pub mod lexer;
pub mod value;

pub use call::{parse_call, parse_calls, CallExpr};
pub use value::option_value;

use crate::error::{PlotError, Result};
use crate::option::OptionValue;
use nom::{combinator::eof, sequence::terminated};

/// Parse a complete option value such as `[0, 10]` or `each("a", "b")`.
pub fn parse_value(input: &str) -> Result<OptionValue> {
    terminated(option_value, lexer::ws(eof))(input)
        .map(|(_, value)| value)
        .map_err(|_| PlotError::config(format!("invalid option value '{}'", input)))
}
