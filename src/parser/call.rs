// Plot call parser
//
//   name(positional, ..., key: value, ...) | name(...) | ...

use super::lexer::{identifier, ws};
use super::value::{key, option_value};
use crate::action::Preset;
use crate::error::{PlotError, Result};
use crate::option::{OptionMap, OptionValue};
use crate::plot;
use log::debug;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::char,
    combinator::{eof, map, opt},
    multi::separated_list0,
    sequence::{delimited, separated_pair, terminated},
    IResult,
};

/// One parsed call, before it is bound to a plot action.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub name: String,
    pub positional: Vec<OptionValue>,
    pub keywords: OptionMap,
}

enum Argument {
    Positional(OptionValue),
    Keyword(String, OptionValue),
}

fn argument(input: &str) -> IResult<&str, Argument> {
    alt((
        map(separated_pair(key, ws(char(':')), option_value), |(k, v)| {
            Argument::Keyword(k, v)
        }),
        map(option_value, Argument::Positional),
    ))(input)
}

/// Parse `name(args)`. The parentheses may be omitted for calls without
/// arguments.
pub fn call(input: &str) -> IResult<&str, CallExpr> {
    let (input, name) = ws(identifier)(input)?;
    let (input, args) = opt(delimited(
        ws(char('(')),
        terminated(separated_list0(ws(char(',')), argument), opt(ws(char(',')))),
        ws(char(')')),
    ))(input)?;

    let mut positional = Vec::new();
    let mut keywords = OptionMap::new();
    for arg in args.unwrap_or_default() {
        match arg {
            Argument::Positional(value) => positional.push(value),
            Argument::Keyword(key, value) => {
                keywords.insert(key, value);
            }
        }
    }

    Ok((
        input,
        CallExpr {
            name,
            positional,
            keywords,
        },
    ))
}

/// Parse a `|` separated chain of calls.
pub fn call_chain(input: &str) -> IResult<&str, Vec<CallExpr>> {
    let (input, calls) = separated_list0(ws(tag("|")), call)(input)?;
    let (input, _) = ws(eof)(input)?;
    Ok((input, calls))
}

impl CallExpr {
    /// Bind to the registered plot action and fix the arguments as its
    /// preset. Positional values take the action's positional names in
    /// order.
    pub fn preset(&self) -> Result<Preset> {
        let action = plot::lookup(&self.name).ok_or_else(|| {
            PlotError::config(format!(
                "unknown plot action '{}'; expected one of: {}",
                self.name,
                plot::NAMES.join(", ")
            ))
        })?;

        let names = action.positional();
        if self.positional.len() > names.len() {
            return Err(PlotError::config(format!(
                "{} takes at most {} positional arguments, got {}",
                self.name,
                names.len(),
                self.positional.len()
            )));
        }

        let mut style = OptionMap::new();
        for (name, value) in names.iter().zip(&self.positional) {
            if self.keywords.contains_key(*name) {
                return Err(PlotError::config(format!(
                    "{}: '{}' given both positionally and by keyword",
                    self.name, name
                )));
            }
            style.insert(name.to_string(), value.clone());
        }
        style.extend(self.keywords.clone());

        debug!("{}: preset {:?}", self.name, style);
        Ok(action.preset(style))
    }
}

fn syntax_error(input: &str, error: nom::Err<nom::error::Error<&str>>) -> PlotError {
    let at = match &error {
        nom::Err::Error(e) | nom::Err::Failure(e) => input.len() - e.input.len(),
        nom::Err::Incomplete(_) => input.len(),
    };
    PlotError::config(format!("invalid plot call '{}' at offset {}", input, at))
}

/// Parse a single call and bind it.
pub fn parse_call(input: &str) -> Result<Preset> {
    match terminated(call, ws(eof))(input) {
        Ok((_, expr)) => expr.preset(),
        Err(error) => Err(syntax_error(input, error)),
    }
}

/// Parse a call chain and bind every call, keeping order.
pub fn parse_calls(input: &str) -> Result<Vec<Preset>> {
    match call_chain(input) {
        Ok((_, exprs)) => exprs.iter().map(CallExpr::preset).collect(),
        Err(error) => Err(syntax_error(input, error)),
    }
}
