// Option value literals
//
//   null | true | false | 1.5 | "text" | [v, ...] | each(v, ...) | {key: v, ...}

use super::lexer::{identifier, number_literal, string_literal, ws};
use crate::option::{OptionMap, OptionValue};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, satisfy},
    combinator::{map, not, opt, value},
    multi::separated_list0,
    sequence::{delimited, separated_pair, terminated},
    IResult,
};

/// Keyword that is not the prefix of a longer identifier.
fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    terminated(tag(word), not(satisfy(|c: char| c.is_alphanumeric() || c == '_')))
}

/// Comma separated items with an optional trailing comma.
fn items(input: &str) -> IResult<&str, Vec<OptionValue>> {
    terminated(separated_list0(ws(char(',')), option_value), opt(ws(char(','))))(input)
}

fn list_literal(input: &str) -> IResult<&str, OptionValue> {
    map(delimited(ws(char('[')), items, ws(char(']'))), OptionValue::List)(input)
}

fn each_literal(input: &str) -> IResult<&str, OptionValue> {
    let (input, _) = ws(tag("each"))(input)?;
    map(delimited(ws(char('(')), items, ws(char(')'))), OptionValue::Each)(input)
}

/// A key is a bare identifier or a quoted string.
pub fn key(input: &str) -> IResult<&str, String> {
    ws(alt((identifier, string_literal)))(input)
}

/// `key: value` pairs separated by commas.
pub fn key_values(input: &str) -> IResult<&str, OptionMap> {
    map(
        terminated(
            separated_list0(ws(char(',')), separated_pair(key, ws(char(':')), option_value)),
            opt(ws(char(','))),
        ),
        |pairs| pairs.into_iter().collect(),
    )(input)
}

fn map_literal(input: &str) -> IResult<&str, OptionValue> {
    map(delimited(ws(char('{')), key_values, ws(char('}'))), OptionValue::Map)(input)
}

/// Parse one option value.
pub fn option_value(input: &str) -> IResult<&str, OptionValue> {
    alt((
        value(OptionValue::Null, ws(keyword("null"))),
        value(OptionValue::Bool(true), ws(keyword("true"))),
        value(OptionValue::Bool(false), ws(keyword("false"))),
        each_literal,
        list_literal,
        map_literal,
        map(ws(string_literal), OptionValue::Text),
        map(ws(number_literal), OptionValue::Number),
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::{each, list, options};

    fn parsed(input: &str) -> OptionValue {
        let (rest, value) = option_value(input).unwrap();
        assert_eq!(rest, "", "unconsumed input for {}", input);
        value
    }

    #[test]
    fn test_scalars() {
        assert_eq!(parsed("null"), OptionValue::Null);
        assert_eq!(parsed(" true "), OptionValue::Bool(true));
        assert_eq!(parsed("false"), OptionValue::Bool(false));
        assert_eq!(parsed("-0.5"), OptionValue::Number(-0.5));
        assert_eq!(parsed("\"red\""), OptionValue::from("red"));
    }

    #[test]
    fn test_keyword_prefix_is_not_a_keyword() {
        assert!(option_value("nullable").is_err());
        assert!(option_value("true1").is_err());
    }

    #[test]
    fn test_list_and_each() {
        assert_eq!(parsed("[0, 10]"), list([0.0, 10.0]));
        assert_eq!(parsed("[null, 3]"), OptionValue::List(vec![OptionValue::Null, 3.into()]));
        assert_eq!(parsed("each(\"y\", \"z\",)"), each(["y", "z"]));
        assert_eq!(parsed("[]"), OptionValue::List(vec![]));
    }

    #[test]
    fn test_nested_map() {
        let value = parsed("{fontsize: 10, \"font family\": \"serif\", pad: [1, 2]}");
        assert_eq!(
            value,
            OptionValue::Map(options([
                ("fontsize", 10.into()),
                ("font family", "serif".into()),
                ("pad", list([1.0, 2.0])),
            ]))
        );
    }
}
