//! Selector text to [`SelectorToken`] trees, driven by the embedded grammar.

use crate::error::SelectorError;
use crate::grammar::{self, EXPRESSION_RULE, PREDICATE_RULE};
use crate::token::SelectorToken;

/// Parses a full selector path such as `//item[@price > 10]/name`.
///
/// The result is always a [`SelectorToken::Expression`] whose text is the input.
pub fn parse_expression(input: &str) -> Result<SelectorToken, SelectorError> {
    grammar::grammar()?.parse(EXPRESSION_RULE, input)
}

/// Parses a bare predicate expression, without the surrounding brackets.
///
/// The result is always a [`SelectorToken::Predicate`].
pub fn parse_predicate(input: &str) -> Result<SelectorToken, SelectorError> {
    grammar::grammar()?.parse(PREDICATE_RULE, input)
}
