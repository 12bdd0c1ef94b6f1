//! Skin sheet parsing.
//!
//! A skin sheet is a list of rules in a CSS-like syntax:
//!
//! ```text
//! /* buttons */
//! Button, ToggleButton {
//!     background: #2a3340;
//!     border: border(#8899aa, 1, dashed);
//!     padding: 2 6;
//!     font: "ui-small";
//! }
//!
//! Button:hover { background: #3a4656; }
//! ```
//!
//! Parsing only produces the raw rule structure; interpreting declarations
//! into typed styles happens in [`crate::sheet`].

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, multispace0, satisfy},
    combinator::{map, map_res, opt, recognize},
    multi::{many0, many1, separated_list0, separated_list1},
    number::complete::double,
    sequence::{delimited, pair, preceded, terminated, tuple},
};

use crate::color::RgbaColor;
use crate::error::SkinError;
use crate::states::VisualStates;

/// A single parsed value inside a declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Color(RgbaColor),
    Number(f64),
    Str(String),
    Ident(String),
    Call { name: String, args: Vec<Value> },
}

/// A rule selector: a control type name and an optional state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub type_name: String,
    pub state: VisualStates,
}

/// `property: value value ...;`
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub property: String,
    pub values: Vec<Value>,
}

/// A selector list with its declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub selectors: Vec<Selector>,
    pub declarations: Vec<Declaration>,
}

/// Parse a whole skin sheet into raw rules.
pub fn parse_rules(source: &str) -> Result<Vec<Rule>, SkinError> {
    let stripped = strip_comments(source);
    let (remaining, rules) =
        many0(parse_rule)(stripped.as_str()).map_err(|e| SkinError::InvalidSyntax(e.to_string()))?;

    if !remaining.trim().is_empty() {
        return Err(SkinError::InvalidSyntax(format!(
            "Unexpected tokens at end of skin sheet: {}",
            remaining.trim()
        )));
    }

    Ok(rules)
}

/// Remove `/* ... */` comments. An unterminated comment runs to the end.
fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => {
                rest = "";
                break;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Identifiers start with a letter or underscore, then letters, digits, `-`, `_`.
pub fn parse_ident(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c: char| c.is_alphabetic() || c == '_'),
        take_while(|c: char| c.is_alphanumeric() || c == '-' || c == '_'),
    ))(input)
}

fn parse_selector(input: &str) -> IResult<&str, Selector> {
    let (input, type_name) = parse_ident(input)?;
    let (input, state) = opt(preceded(
        char(':'),
        map_res(parse_ident, |name| {
            VisualStates::from_state_name(name).ok_or("unknown state")
        }),
    ))(input)?;

    Ok((
        input,
        Selector {
            type_name: type_name.to_string(),
            state: state.unwrap_or_default(),
        },
    ))
}

fn parse_selector_list(input: &str) -> IResult<&str, Vec<Selector>> {
    separated_list1(tuple((multispace0, char(','), multispace0)), parse_selector)(input)
}

fn parse_rule(input: &str) -> IResult<&str, Rule> {
    let (input, _) = multispace0(input)?;
    let (input, selectors) = parse_selector_list(input)?;
    let (input, _) = multispace0(input)?;
    let (input, declarations) = delimited(
        char('{'),
        many0(parse_declaration),
        preceded(multispace0, char('}')),
    )(input)?;

    Ok((
        input,
        Rule {
            selectors,
            declarations,
        },
    ))
}

fn parse_declaration(input: &str) -> IResult<&str, Declaration> {
    let (input, _) = multispace0(input)?;
    let (input, property) = parse_ident(input)?;
    let (input, _) = tuple((multispace0, char(':')))(input)?;
    let (input, values) = many1(preceded(multispace0, parse_value))(input)?;
    let (input, _) = preceded(multispace0, opt(char(';')))(input)?;

    Ok((
        input,
        Declaration {
            property: property.to_string(),
            values,
        },
    ))
}

/// Parse one value: a call, a hex color, a quoted string, an identifier or a number.
pub fn parse_value(input: &str) -> IResult<&str, Value> {
    alt((
        parse_call,
        map(parse_hex_color, Value::Color),
        map(parse_string, |s: &str| Value::Str(s.to_string())),
        map(parse_ident, |s: &str| Value::Ident(s.to_string())),
        map(double, Value::Number),
    ))(input)
}

fn parse_call(input: &str) -> IResult<&str, Value> {
    let (input, name) = parse_ident(input)?;
    let (input, args) = delimited(
        pair(char('('), multispace0),
        separated_list0(tuple((multispace0, char(','), multispace0)), parse_value),
        pair(multispace0, char(')')),
    )(input)?;

    Ok((
        input,
        Value::Call {
            name: name.to_string(),
            args,
        },
    ))
}

fn parse_hex_color(input: &str) -> IResult<&str, RgbaColor> {
    map_res(
        recognize(pair(char('#'), take_while1(|c: char| c.is_ascii_hexdigit()))),
        RgbaColor::parse,
    )(input)
}

fn parse_string(input: &str) -> IResult<&str, &str> {
    terminated(preceded(char('"'), take_while(|c: char| c != '"')), char('"'))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_rule() {
        let rules = parse_rules("Button { background: #fff; padding: 2 4; }").unwrap();
        assert_eq!(rules.len(), 1);
        let rule = &rules[0];
        assert_eq!(rule.selectors[0].type_name, "Button");
        assert_eq!(rule.selectors[0].state, VisualStates::empty());
        assert_eq!(rule.declarations.len(), 2);
        assert_eq!(
            rule.declarations[0].values,
            vec![Value::Color(RgbaColor::white())]
        );
        assert_eq!(
            rule.declarations[1].values,
            vec![Value::Number(2.0), Value::Number(4.0)]
        );
    }

    #[test]
    fn test_parse_state_and_selector_list() {
        let rules = parse_rules("Button:hover, Slider:pressed { background: red; }").unwrap();
        let selectors = &rules[0].selectors;
        assert_eq!(selectors.len(), 2);
        assert_eq!(selectors[0].state, VisualStates::HOVER);
        assert_eq!(selectors[1].type_name, "Slider");
        assert_eq!(selectors[1].state, VisualStates::PRESSED);
    }

    #[test]
    fn test_parse_call_values() {
        let rules =
            parse_rules(r#"Panel { background: nine-slice("panel", 4); border: border(#000, 2, dotted); }"#)
                .unwrap();
        let decls = &rules[0].declarations;
        assert_eq!(
            decls[0].values[0],
            Value::Call {
                name: "nine-slice".to_string(),
                args: vec![Value::Str("panel".to_string()), Value::Number(4.0)],
            }
        );
        match &decls[1].values[0] {
            Value::Call { name, args } => {
                assert_eq!(name, "border");
                assert_eq!(args.len(), 3);
                assert_eq!(args[2], Value::Ident("dotted".to_string()));
            }
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_comments_are_ignored() {
        let rules = parse_rules("/* a */ Label { /* b */ color: #000; } /* tail").unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].declarations[0].property, "color");
    }

    #[test]
    fn test_trailing_semicolon_optional() {
        let rules = parse_rules("Label { alpha: 0.5 }").unwrap();
        assert_eq!(rules[0].declarations[0].values, vec![Value::Number(0.5)]);
    }

    #[test]
    fn test_unknown_state_is_syntax_error() {
        assert!(matches!(
            parse_rules("Button:visited { color: red; }"),
            Err(SkinError::InvalidSyntax(_))
        ));
    }

    #[test]
    fn test_unbalanced_rule_is_syntax_error() {
        assert!(parse_rules("Button { color: red; ").is_err());
    }
}
