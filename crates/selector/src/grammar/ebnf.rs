//! A `nom`-based parser for the EBNF notation the selector grammar is written in.

use crate::error::GrammarError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_until},
    character::complete::{alpha1, alphanumeric1, char, multispace1},
    combinator::{map, recognize, value},
    multi::{many0, many1, separated_list1},
    sequence::{delimited, pair, preceded, terminated},
};

/// The body of an EBNF rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Ebnf {
    Alternatives(Vec<Ebnf>),
    Concatenation(Vec<Ebnf>),
    Optional(Box<Ebnf>),
    Repeated(Box<Ebnf>),
    Terminal(String),
    Identifier(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleDefinition {
    pub name: String,
    pub body: Ebnf,
}

/// Parses a complete grammar document into its rule definitions, in source order.
pub fn parse_grammar(input: &str) -> Result<Vec<RuleDefinition>, GrammarError> {
    let result = terminated(many1(rule), skip).parse(input);
    match result {
        Ok(("", rules)) => Ok(rules),
        Ok((rest, _)) => Err(syntax_error(input, rest, "expected a rule definition")),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            Err(syntax_error(input, e.input, "malformed rule definition"))
        }
        Err(nom::Err::Incomplete(_)) => Err(GrammarError::Syntax {
            line: 1,
            message: "incomplete grammar".to_string(),
        }),
    }
}

fn syntax_error(input: &str, rest: &str, message: &str) -> GrammarError {
    let offset = input.len() - rest.len();
    let line = input[..offset].matches('\n').count() + 1;
    let snippet: String = rest.chars().take(20).collect();
    GrammarError::Syntax {
        line,
        message: format!("{} near '{}'", message, snippet.trim_end()),
    }
}

// --- Combinators & Helpers ---

fn comment(input: &str) -> IResult<&str, &str> {
    recognize((tag("(*"), take_until("*)"), tag("*)"))).parse(input)
}

/// Skips whitespace and comments.
fn skip(input: &str) -> IResult<&str, ()> {
    value((), many0(alt((multispace1, comment)))).parse(input)
}

fn token<'a, F, O>(inner: F) -> impl Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>
where
    F: Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>,
{
    preceded(skip, inner)
}

fn identifier(input: &str) -> IResult<&str, String> {
    map(
        recognize(pair(
            alt((alpha1, tag("_"))),
            many0(alt((alphanumeric1, tag("_")))),
        )),
        str::to_string,
    )
    .parse(input)
}

fn terminal(input: &str) -> IResult<&str, String> {
    map(
        alt((
            delimited(char('"'), take_until("\""), char('"')),
            delimited(char('\''), take_until("'"), char('\'')),
        )),
        str::to_string,
    )
    .parse(input)
}

// --- Grammar Parsers ---

fn rule(input: &str) -> IResult<&str, RuleDefinition> {
    map(
        (
            token(identifier),
            token(char('=')),
            alternatives,
            token(char(';')),
        ),
        |(name, _, body, _)| RuleDefinition { name, body },
    )
    .parse(input)
}

fn alternatives(input: &str) -> IResult<&str, Ebnf> {
    map(
        separated_list1(token(char('|')), concatenation),
        |mut items| {
            if items.len() == 1 {
                items.remove(0)
            } else {
                Ebnf::Alternatives(items)
            }
        },
    )
    .parse(input)
}

fn concatenation(input: &str) -> IResult<&str, Ebnf> {
    map(separated_list1(token(char(',')), primary), |mut items| {
        if items.len() == 1 {
            items.remove(0)
        } else {
            Ebnf::Concatenation(items)
        }
    })
    .parse(input)
}

fn primary(input: &str) -> IResult<&str, Ebnf> {
    token(alt((
        map(
            delimited(char('['), alternatives, token(char(']'))),
            |e| Ebnf::Optional(Box::new(e)),
        ),
        map(
            delimited(char('{'), alternatives, token(char('}'))),
            |e| Ebnf::Repeated(Box::new(e)),
        ),
        delimited(char('('), alternatives, token(char(')'))),
        map(terminal, Ebnf::Terminal),
        map(identifier, Ebnf::Identifier),
    )))
    .parse(input)
}
