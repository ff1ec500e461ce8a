//! Built-in lexemes the grammar can reference by identifier.

use crate::token::SelectorToken;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::take_while,
    character::complete::{char, digit0, digit1, multispace1, satisfy},
    combinator::{map, opt, recognize},
    sequence::{delimited, pair},
};
use rust_decimal::Decimal;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lexeme {
    Whitespace,
    Name,
    Number,
    QuotedText,
}

impl Lexeme {
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        match identifier {
            "WHITESPACE" => Some(Lexeme::Whitespace),
            "NAME" => Some(Lexeme::Name),
            "NUMBER" => Some(Lexeme::Number),
            "QUOTED_TEXT" => Some(Lexeme::QuotedText),
            _ => None,
        }
    }

    pub fn identifier(&self) -> &'static str {
        match self {
            Lexeme::Whitespace => "WHITESPACE",
            Lexeme::Name => "NAME",
            Lexeme::Number => "NUMBER",
            Lexeme::QuotedText => "QUOTED_TEXT",
        }
    }

    /// Matches this lexeme at the start of `input`, returning the consumed byte
    /// length and the token it produces. An `Err` carries the reason a lexeme
    /// that did match is still invalid.
    pub fn matches(&self, input: &str) -> Result<Option<(usize, SelectorToken)>, String> {
        let parsed = match self {
            Lexeme::Whitespace => whitespace(input),
            Lexeme::Name => name(input),
            Lexeme::Number => return number(input),
            Lexeme::QuotedText => quoted_text(input),
        };
        Ok(parsed
            .ok()
            .map(|(rest, token)| (input.len() - rest.len(), token)))
    }
}

fn whitespace(input: &str) -> IResult<&str, SelectorToken> {
    map(multispace1, |text: &str| SelectorToken::Whitespace {
        text: text.to_string(),
    })
    .parse(input)
}

fn name(input: &str) -> IResult<&str, SelectorToken> {
    map(
        recognize(pair(
            satisfy(|c| c.is_alphabetic() || c == '_'),
            take_while(|c: char| c.is_alphanumeric() || c == '_' || c == '-'),
        )),
        |text: &str| SelectorToken::NodeName {
            name: text.to_string(),
        },
    )
    .parse(input)
}

fn quoted_text(input: &str) -> IResult<&str, SelectorToken> {
    let (rest, value) = alt((
        delimited(char('"'), take_while(|c: char| c != '"'), char('"')),
        delimited(char('\''), take_while(|c: char| c != '\''), char('\'')),
    ))
    .parse(input)?;
    let text = &input[..input.len() - rest.len()];
    Ok((
        rest,
        SelectorToken::QuotedText {
            value: value.to_string(),
            text: text.to_string(),
        },
    ))
}

/// `12`, `1.5`, `1.` and `.5`, as in XPath.
fn number(input: &str) -> Result<Option<(usize, SelectorToken)>, String> {
    let parsed: IResult<&str, &str> = alt((
        recognize(pair(digit1, opt(pair(char('.'), digit0)))),
        recognize(pair(char('.'), digit1)),
    ))
    .parse(input);
    let Ok((_, text)) = parsed else {
        return Ok(None);
    };
    let digits = text.strip_suffix('.').unwrap_or(text);
    let digits = match digits.strip_prefix('.') {
        Some(fraction) => format!("0.{}", fraction),
        None => digits.to_string(),
    };
    let value = Decimal::from_str(&digits)
        .map_err(|e| format!("Invalid number '{}': {}", text, e))?;
    Ok(Some((
        text.len(),
        SelectorToken::Number {
            value,
            text: text.to_string(),
        },
    )))
}
