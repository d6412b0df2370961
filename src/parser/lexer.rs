// Lexer primitives for the call syntax

use nom::{
    branch::alt,
    bytes::complete::{escaped_transform, is_not, tag},
    character::complete::{alpha1, alphanumeric1, char, multispace0},
    combinator::{map, opt, recognize, value},
    multi::many0_count,
    number::complete::double,
    sequence::{delimited, pair},
    IResult,
};

/// Wrap a parser so surrounding whitespace is consumed.
pub fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

/// Identifier: a letter or underscore followed by letters, digits or
/// underscores.
pub fn identifier(input: &str) -> IResult<&str, String> {
    map(
        recognize(pair(
            alt((alpha1, tag("_"))),
            many0_count(alt((alphanumeric1, tag("_")))),
        )),
        |s: &str| s.to_string(),
    )(input)
}

/// Double-quoted string with `\"`, `\\`, `\n` and `\t` escapes.
pub fn string_literal(input: &str) -> IResult<&str, String> {
    delimited(
        char('"'),
        map(
            opt(escaped_transform(
                is_not("\\\""),
                '\\',
                alt((
                    value("\\", tag("\\")),
                    value("\"", tag("\"")),
                    value("\n", tag("n")),
                    value("\t", tag("t")),
                )),
            )),
            Option::unwrap_or_default,
        ),
        char('"'),
    )(input)
}

pub fn number_literal(input: &str) -> IResult<&str, f64> {
    double(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier() {
        assert_eq!(identifier("fill_between("), Ok(("(", "fill_between".to_string())));
        assert_eq!(identifier("_x1 rest"), Ok((" rest", "_x1".to_string())));
        assert!(identifier("1abc").is_err());
    }

    #[test]
    fn test_string_literal() {
        assert_eq!(string_literal("\"temp\""), Ok(("", "temp".to_string())));
        assert_eq!(string_literal("\"\""), Ok(("", String::new())));
        assert_eq!(
            string_literal(r#""say \"hi\"\n""#),
            Ok(("", "say \"hi\"\n".to_string()))
        );
    }

    #[test]
    fn test_number_literal() {
        assert_eq!(number_literal("2.5)"), Ok((")", 2.5)));
        assert_eq!(number_literal("-3"), Ok(("", -3.0)));
        assert_eq!(number_literal("1e3"), Ok(("", 1000.0)));
    }

    #[test]
    fn test_ws() {
        let mut comma = ws(char(','));
        assert_eq!(comma("  ,  x"), Ok(("x", ',')));
    }
}
