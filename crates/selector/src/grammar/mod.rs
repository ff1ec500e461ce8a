//! The embedded selector grammar and the PEG-style interpreter that runs it.
//!
//! `selector.ebnf` is parsed once per process. Each rule compiles into a
//! matcher tree; rules whose names bind to a [`Transform`] rewrite the
//! tokens they match, every other rule passes its tokens through. Matching is
//! ordered choice with backtracking, except that a failed `*_REQUIRED` rule
//! aborts the whole parse.

pub mod ebnf;
pub mod lexeme;
pub mod transform;

use crate::error::{GrammarError, SelectorError};
use crate::token::SelectorToken;
use ebnf::{Ebnf, RuleDefinition};
use itertools::Itertools;
use lexeme::Lexeme;
use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;
use transform::Transform;

const GRAMMAR_SOURCE: &str = include_str!("selector.ebnf");

const REQUIRED_SUFFIX: &str = "REQUIRED";

/// The entry rule for full selector paths.
pub const EXPRESSION_RULE: &str = "EXPRESSION";

/// The entry rule for standalone predicate expressions.
pub const PREDICATE_RULE: &str = "PREDICATE";

static GRAMMAR: LazyLock<Result<Grammar, GrammarError>> = LazyLock::new(|| {
    let grammar = Grammar::load(GRAMMAR_SOURCE);
    match &grammar {
        Ok(g) => log::debug!("Loaded selector grammar with {} rules", g.rules.len()),
        Err(e) => log::error!("Failed to load selector grammar: {}", e),
    }
    grammar
});

/// The process-wide selector grammar. A load failure is reported on every call.
pub fn grammar() -> Result<&'static Grammar, GrammarError> {
    GRAMMAR.as_ref().map_err(Clone::clone)
}

#[derive(Debug, Clone, PartialEq)]
enum Matcher {
    Sequence(Vec<Matcher>),
    Alternatives(Vec<Matcher>),
    Optional(Box<Matcher>),
    Repeat(Box<Matcher>),
    Rule(usize),
    Literal(String),
    Lexeme(Lexeme),
}

#[derive(Debug, Clone)]
struct CompiledRule {
    name: String,
    matcher: Matcher,
    transform: Option<Transform>,
    required: bool,
}

impl CompiledRule {
    /// The production named in "expected ..." messages.
    fn production(&self) -> &str {
        self.name
            .strip_suffix(REQUIRED_SUFFIX)
            .map(|n| n.trim_end_matches('_'))
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.name)
    }
}

/// A compiled grammar ready to parse input from one of its entry rules.
#[derive(Debug, Clone)]
pub struct Grammar {
    rules: Vec<CompiledRule>,
    index: HashMap<String, usize>,
}

impl Grammar {
    /// Parses and compiles EBNF source. Both entry rules must be present.
    pub fn load(source: &str) -> Result<Self, GrammarError> {
        let definitions = ebnf::parse_grammar(source)?;
        let mut index = HashMap::new();
        for (i, definition) in definitions.iter().enumerate() {
            if Lexeme::from_identifier(&definition.name).is_some()
                || index.insert(definition.name.clone(), i).is_some()
            {
                return Err(GrammarError::DuplicateRule(definition.name.clone()));
            }
        }
        for entry in [EXPRESSION_RULE, PREDICATE_RULE] {
            if !index.contains_key(entry) {
                return Err(GrammarError::MissingEntry(entry.to_string()));
            }
        }

        let rules = definitions
            .iter()
            .map(|definition| compile_rule(definition, &index))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules, index })
    }

    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.name.as_str())
    }

    /// Parses the whole of `input` starting from the named entry rule.
    pub fn parse(&self, entry: &str, input: &str) -> Result<SelectorToken, SelectorError> {
        let Some(&rule) = self.index.get(entry) else {
            return Err(GrammarError::MissingEntry(entry.to_string()).into());
        };
        let mut run = Matching::new(self, input);
        let matched = run.match_rule(rule, 0)?;
        match matched {
            Some((end, tokens)) if end == input.len() => {
                let mut tokens = tokens.into_iter();
                match (tokens.next(), tokens.next()) {
                    (Some(token), None) => Ok(token),
                    _ => Err(SelectorError::invalid_token(format!(
                        "Entry rule '{}' must produce exactly one token",
                        entry
                    ))),
                }
            }
            Some((end, _)) => {
                let position = run.furthest.max(end);
                let found: String = input[position..].chars().take(10).collect();
                Err(SelectorError::parse(
                    input,
                    position,
                    format!("Unexpected '{}'{}", found, run.expected_suffix(position)),
                ))
            }
            None => {
                let position = run.furthest;
                Err(SelectorError::parse(
                    input,
                    position,
                    format!("Invalid selector{}", run.expected_suffix(position)),
                ))
            }
        }
    }
}

fn compile_rule(
    definition: &RuleDefinition,
    index: &HashMap<String, usize>,
) -> Result<CompiledRule, GrammarError> {
    let transform = Transform::for_rule(&definition.name);
    let is_leaf = transform.is_some_and(|t| t.is_leaf());
    if is_leaf && !matches!(definition.body, Ebnf::Terminal(_)) {
        return Err(GrammarError::InvalidLeafRule(definition.name.clone()));
    }
    let matcher = compile_matcher(&definition.body, &definition.name, is_leaf, index)?;
    Ok(CompiledRule {
        name: definition.name.clone(),
        matcher,
        transform,
        required: definition.name.ends_with(REQUIRED_SUFFIX),
    })
}

fn compile_matcher(
    body: &Ebnf,
    rule: &str,
    is_leaf: bool,
    index: &HashMap<String, usize>,
) -> Result<Matcher, GrammarError> {
    let compile_all = |items: &[Ebnf]| {
        items
            .iter()
            .map(|item| compile_matcher(item, rule, is_leaf, index))
            .collect::<Result<Vec<_>, _>>()
    };
    Ok(match body {
        Ebnf::Alternatives(items) => Matcher::Alternatives(compile_all(items)?),
        Ebnf::Concatenation(items) => Matcher::Sequence(compile_all(items)?),
        Ebnf::Optional(inner) => Matcher::Optional(Box::new(compile_matcher(inner, rule, is_leaf, index)?)),
        Ebnf::Repeated(inner) => Matcher::Repeat(Box::new(compile_matcher(inner, rule, is_leaf, index)?)),
        Ebnf::Terminal(text) if is_leaf && !text.is_empty() => Matcher::Literal(text.clone()),
        Ebnf::Terminal(text) => {
            return Err(GrammarError::UnboundTerminal {
                rule: rule.to_string(),
                terminal: text.clone(),
            });
        }
        Ebnf::Identifier(name) => match (index.get(name), Lexeme::from_identifier(name)) {
            (Some(&i), _) => Matcher::Rule(i),
            (None, Some(lexeme)) => Matcher::Lexeme(lexeme),
            (None, None) => {
                return Err(GrammarError::UnknownIdentifier {
                    rule: rule.to_string(),
                    identifier: name.clone(),
                });
            }
        },
    })
}

type MatchResult = Result<Option<(usize, Vec<SelectorToken>)>, SelectorError>;

/// The state of one parse: the furthest position any matcher failed at and
/// what was expected there.
struct Matching<'g, 'i> {
    grammar: &'g Grammar,
    input: &'i str,
    furthest: usize,
    expected: BTreeSet<String>,
}

impl<'g, 'i> Matching<'g, 'i> {
    fn new(grammar: &'g Grammar, input: &'i str) -> Self {
        Self {
            grammar,
            input,
            furthest: 0,
            expected: BTreeSet::new(),
        }
    }

    fn fail(&mut self, position: usize, expected: String) {
        if position > self.furthest {
            self.furthest = position;
            self.expected.clear();
        }
        if position == self.furthest {
            self.expected.insert(expected);
        }
    }

    fn expected_suffix(&self, position: usize) -> String {
        if position != self.furthest || self.expected.is_empty() {
            return String::new();
        }
        format!(", expected one of: {}", self.expected.iter().join(", "))
    }

    fn match_rule(&mut self, index: usize, position: usize) -> MatchResult {
        let grammar = self.grammar;
        let rule = &grammar.rules[index];
        match self.match_matcher(&rule.matcher, position)? {
            Some((end, tokens)) => {
                let tokens = match &rule.transform {
                    Some(transform) => transform.apply(tokens, &self.input[position..end])?,
                    None => tokens,
                };
                Ok(Some((end, tokens)))
            }
            None if rule.required => Err(SelectorError::parse(
                self.input,
                position,
                format!("Expected {}", rule.production()),
            )),
            None => Ok(None),
        }
    }

    fn match_matcher(&mut self, matcher: &Matcher, position: usize) -> MatchResult {
        match matcher {
            Matcher::Sequence(items) => {
                let mut end = position;
                let mut tokens = Vec::new();
                for item in items {
                    match self.match_matcher(item, end)? {
                        Some((next, matched)) => {
                            end = next;
                            tokens.extend(matched);
                        }
                        None => return Ok(None),
                    }
                }
                Ok(Some((end, tokens)))
            }
            Matcher::Alternatives(items) => {
                for item in items {
                    if let Some(matched) = self.match_matcher(item, position)? {
                        return Ok(Some(matched));
                    }
                }
                Ok(None)
            }
            Matcher::Optional(inner) => Ok(Some(
                self.match_matcher(inner, position)?
                    .unwrap_or_else(|| (position, Vec::new())),
            )),
            Matcher::Repeat(inner) => {
                let mut end = position;
                let mut tokens = Vec::new();
                while let Some((next, matched)) = self.match_matcher(inner, end)? {
                    // A zero-width match would repeat forever.
                    if next == end {
                        break;
                    }
                    end = next;
                    tokens.extend(matched);
                }
                Ok(Some((end, tokens)))
            }
            Matcher::Rule(index) => self.match_rule(*index, position),
            Matcher::Literal(text) => {
                let matched = self
                    .input
                    .get(position..position + text.len())
                    .is_some_and(|candidate| candidate.eq_ignore_ascii_case(text));
                if matched {
                    Ok(Some((position + text.len(), Vec::new())))
                } else {
                    self.fail(position, format!("'{}'", text));
                    Ok(None)
                }
            }
            Matcher::Lexeme(lexeme) => {
                let rest = &self.input[position..];
                match lexeme.matches(rest) {
                    Ok(Some((length, token))) => Ok(Some((position + length, vec![token]))),
                    Ok(None) => {
                        if *lexeme != Lexeme::Whitespace {
                            self.fail(position, lexeme.identifier().to_string());
                        }
                        Ok(None)
                    }
                    Err(message) => Err(SelectorError::parse(self.input, position, message)),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_grammar_loads() {
        let grammar = grammar().unwrap();
        assert!(grammar.rule_names().any(|n| n == EXPRESSION_RULE));
        assert!(grammar.rule_names().any(|n| n == PREDICATE_RULE));
    }

    #[test]
    fn test_missing_entry_rule() {
        let err = Grammar::load("EXPRESSION = NAME;").unwrap_err();
        assert_eq!(err, GrammarError::MissingEntry("PREDICATE".to_string()));
    }

    #[test]
    fn test_duplicate_rule() {
        let err = Grammar::load("EXPRESSION = NAME; PREDICATE = NAME; EXPRESSION = NUMBER;")
            .unwrap_err();
        assert_eq!(err, GrammarError::DuplicateRule("EXPRESSION".to_string()));
    }

    #[test]
    fn test_builtin_lexeme_cannot_be_redefined() {
        let err = Grammar::load("EXPRESSION = NAME; PREDICATE = NAME; NAME = NUMBER;").unwrap_err();
        assert_eq!(err, GrammarError::DuplicateRule("NAME".to_string()));
    }

    #[test]
    fn test_unknown_identifier() {
        let err = Grammar::load("EXPRESSION = STEP; PREDICATE = NAME;").unwrap_err();
        assert_eq!(
            err,
            GrammarError::UnknownIdentifier {
                rule: "EXPRESSION".to_string(),
                identifier: "STEP".to_string(),
            }
        );
    }

    #[test]
    fn test_terminal_outside_symbol_rule() {
        let err = Grammar::load("EXPRESSION = \"x\", NAME; PREDICATE = NAME;").unwrap_err();
        assert!(matches!(err, GrammarError::UnboundTerminal { .. }));
    }

    #[test]
    fn test_symbol_rule_must_be_a_single_terminal() {
        let err = Grammar::load("EXPRESSION = NAME; PREDICATE = NAME; SLASH = \"/\", NAME;")
            .unwrap_err();
        assert_eq!(err, GrammarError::InvalidLeafRule("SLASH".to_string()));
    }

    #[test]
    fn test_required_rule_failure_aborts() {
        let grammar = Grammar::load(
            "EXPRESSION = SLASH, NAME_REQUIRED; PREDICATE = NAME; NAME_REQUIRED = NAME; SLASH = \"/\";",
        )
        .unwrap();
        let err = grammar.parse(EXPRESSION_RULE, "/1").unwrap_err();
        assert_eq!(
            err,
            SelectorError::Parse {
                input: "/1".to_string(),
                column: 2,
                message: "Expected NAME".to_string(),
            }
        );
    }

    #[test]
    fn test_unconsumed_input_reports_expected_terminals() {
        let grammar = grammar().unwrap();
        let err = grammar.parse(EXPRESSION_RULE, "a b").unwrap_err();
        match err {
            SelectorError::Parse { column, message, .. } => {
                assert_eq!(column, 3);
                assert!(message.contains("Unexpected 'b'"), "{}", message);
                assert!(message.contains("'/'"), "{}", message);
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
