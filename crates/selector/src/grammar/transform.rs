//! Rule transforms: how the tokens matched by a named rule become parse tree nodes.
//!
//! Grammar rules bind to a transform purely by name. Rules without a
//! transform pass their matched tokens through to the enclosing rule.

use crate::error::SelectorError;
use crate::precedence;
use crate::token::{Axis, SelectorToken, Symbol};
use nodepath_expr::BinaryOperator;

/// A leaf token built from the exact text a symbol rule matched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Leaf {
    Axis(Axis),
    Symbol(Symbol),
    Wildcard,
}

impl Leaf {
    fn token(self, text: &str) -> SelectorToken {
        let text = text.to_string();
        match self {
            Leaf::Axis(axis) => SelectorToken::Axis { axis, text },
            Leaf::Symbol(symbol) => SelectorToken::Symbol { symbol, text },
            Leaf::Wildcard => SelectorToken::Wildcard { text },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    Leaf(Leaf),
    Expression,
    Predicate,
    PredicateExpression,
    Attribute,
    AttributeName,
    Function,
    FunctionName,
    Group,
    Negative,
}

impl Transform {
    /// The transform bound to a grammar rule name, if any.
    pub fn for_rule(name: &str) -> Option<Self> {
        let operator = |op| Some(Transform::Leaf(Leaf::Symbol(Symbol::Operator(op))));
        let axis = |axis| Some(Transform::Leaf(Leaf::Axis(axis)));
        let symbol = |symbol| Some(Transform::Leaf(Leaf::Symbol(symbol)));
        match name {
            // Entry and structural rules
            "EXPRESSION" => Some(Transform::Expression),
            "PREDICATE" | "STEP_PREDICATE" => Some(Transform::Predicate),
            "PREDICATE_EXPRESSION" => Some(Transform::PredicateExpression),
            "ATTRIBUTE" => Some(Transform::Attribute),
            "ATTRIBUTE_NAME" => Some(Transform::AttributeName),
            "FUNCTION" => Some(Transform::Function),
            "FUNCTION_NAME" => Some(Transform::FunctionName),
            "GROUP" => Some(Transform::Group),
            "NEGATIVE" => Some(Transform::Negative),

            // Axes
            "ANCESTOR" => axis(Axis::Ancestor),
            "ANCESTOR_OR_SELF" => axis(Axis::AncestorOrSelf),
            "CHILD" => axis(Axis::Children),
            "DESCENDANT" => axis(Axis::Descendant),
            "DESCENDANT_OR_SELF" => axis(Axis::DescendantOrSelf),
            "FIRST_CHILD" => axis(Axis::FirstChild),
            "FOLLOWING" => axis(Axis::Following),
            "FOLLOWING_SIBLING" => axis(Axis::FollowingSibling),
            "LAST_CHILD" => axis(Axis::LastChild),
            "PARENT" | "PARENT_SHORTHAND" => axis(Axis::Parent),
            "PRECEDING" => axis(Axis::Preceding),
            "PRECEDING_SIBLING" => axis(Axis::PrecedingSibling),
            "SELF" | "SELF_SHORTHAND" => axis(Axis::SelfAxis),
            "WILDCARD" => Some(Transform::Leaf(Leaf::Wildcard)),

            // Punctuation
            "SLASH" => symbol(Symbol::Slash),
            "DOUBLE_SLASH" => symbol(Symbol::DoubleSlash),
            "BRACKET_OPEN" => symbol(Symbol::BracketOpen),
            "BRACKET_CLOSE" => symbol(Symbol::BracketClose),
            "PARENTHESIS_OPEN" => symbol(Symbol::ParenthesisOpen),
            "PARENTHESIS_CLOSE" => symbol(Symbol::ParenthesisClose),
            "COMMA" => symbol(Symbol::Comma),
            "AT" => symbol(Symbol::At),

            // Operators
            "OR" => operator(BinaryOperator::Or),
            "AND" => operator(BinaryOperator::And),
            "EQUALS" => operator(BinaryOperator::Equals),
            "NOT_EQUALS" => operator(BinaryOperator::NotEquals),
            "LESS_THAN" => operator(BinaryOperator::LessThan),
            "LESS_THAN_EQUALS" => operator(BinaryOperator::LessThanEquals),
            "GREATER_THAN" => operator(BinaryOperator::GreaterThan),
            "GREATER_THAN_EQUALS" => operator(BinaryOperator::GreaterThanEquals),
            "PLUS" => operator(BinaryOperator::Add),
            "MINUS" => operator(BinaryOperator::Subtract),
            "MULTIPLY" => operator(BinaryOperator::Multiply),
            "DIVIDE" => operator(BinaryOperator::Divide),
            "MODULO" => operator(BinaryOperator::Modulo),
            _ => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Transform::Leaf(_))
    }

    /// Rewrites the tokens a rule matched. `text` is the full source span of the match.
    pub fn apply(
        &self,
        tokens: Vec<SelectorToken>,
        text: &str,
    ) -> Result<Vec<SelectorToken>, SelectorError> {
        let text = text.to_string();
        let token = match self {
            Transform::Leaf(leaf) => leaf.token(&text),
            Transform::Expression => SelectorToken::Expression { tokens, text },
            Transform::Predicate => SelectorToken::Predicate {
                expression: Box::new(single_significant(tokens, &text)?),
                text,
            },
            Transform::PredicateExpression => precedence::fold(tokens)?,
            Transform::Attribute => {
                let name = tokens
                    .iter()
                    .find_map(|t| match t {
                        SelectorToken::AttributeName { name } => Some(name.clone()),
                        _ => None,
                    })
                    .ok_or_else(|| missing("attribute name", &text))?;
                SelectorToken::Attribute { name, text }
            }
            Transform::AttributeName => match single_significant(tokens, &text)? {
                SelectorToken::NodeName { name } => SelectorToken::AttributeName { name },
                other => return Err(unexpected("attribute name", &other)),
            },
            Transform::FunctionName => match single_significant(tokens, &text)? {
                SelectorToken::NodeName { name } => SelectorToken::FunctionName { name },
                other => return Err(unexpected("function name", &other)),
            },
            Transform::Function => {
                let mut significant = tokens.into_iter().filter(|t| !t.is_noise());
                let name = match significant.next() {
                    Some(SelectorToken::FunctionName { name }) => name,
                    Some(other) => return Err(unexpected("function name", &other)),
                    None => return Err(missing("function name", &text)),
                };
                SelectorToken::Function {
                    name,
                    parameters: significant.collect(),
                    text,
                }
            }
            Transform::Group => SelectorToken::Group {
                expression: Box::new(single_significant(tokens, &text)?),
                text,
            },
            Transform::Negative => {
                let value = tokens
                    .into_iter()
                    .filter(|t| !t.is_noise())
                    .last()
                    .filter(|t| t.operator().is_none())
                    .ok_or_else(|| missing("negated term", &text))?;
                SelectorToken::Negative {
                    value: Box::new(value),
                    text,
                }
            }
        };
        Ok(vec![token])
    }
}

fn single_significant(tokens: Vec<SelectorToken>, text: &str) -> Result<SelectorToken, SelectorError> {
    let mut significant = tokens.into_iter().filter(|t| !t.is_noise());
    match (significant.next(), significant.next()) {
        (Some(token), None) => Ok(token),
        (None, _) => Err(missing("expression", text)),
        (Some(_), Some(extra)) => Err(unexpected("end of expression", &extra)),
    }
}

fn missing(what: &str, text: &str) -> SelectorError {
    SelectorError::invalid_token(format!("Missing {} in '{}'", what, text))
}

fn unexpected(expected: &str, found: &SelectorToken) -> SelectorError {
    SelectorError::invalid_token(format!("Expected {}, found '{}'", expected, found))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_names_bind_transforms() {
        assert_eq!(
            Transform::for_rule("CHILD"),
            Some(Transform::Leaf(Leaf::Axis(Axis::Children)))
        );
        assert_eq!(
            Transform::for_rule("DIVIDE"),
            Some(Transform::Leaf(Leaf::Symbol(Symbol::Operator(
                BinaryOperator::Divide
            ))))
        );
        assert_eq!(Transform::for_rule("TERM"), None);
        assert_eq!(Transform::for_rule("TERM_REQUIRED"), None);
    }

    #[test]
    fn test_leaf_keeps_source_case() {
        let tokens = Transform::for_rule("ANCESTOR")
            .unwrap()
            .apply(Vec::new(), "Ancestor::")
            .unwrap();
        assert_eq!(
            tokens,
            vec![SelectorToken::Axis {
                axis: Axis::Ancestor,
                text: "Ancestor::".to_string(),
            }]
        );
    }

    #[test]
    fn test_function_collects_parameters() {
        let tokens = vec![
            SelectorToken::FunctionName {
                name: "concat".to_string(),
            },
            SelectorToken::Symbol {
                symbol: Symbol::ParenthesisOpen,
                text: "(".to_string(),
            },
            SelectorToken::QuotedText {
                value: "a".to_string(),
                text: "'a'".to_string(),
            },
            SelectorToken::Symbol {
                symbol: Symbol::Comma,
                text: ",".to_string(),
            },
            SelectorToken::Attribute {
                name: "b".to_string(),
                text: "@b".to_string(),
            },
            SelectorToken::Symbol {
                symbol: Symbol::ParenthesisClose,
                text: ")".to_string(),
            },
        ];
        let result = Transform::Function.apply(tokens, "concat('a',@b)").unwrap();
        match &result[..] {
            [SelectorToken::Function { name, parameters, text }] => {
                assert_eq!(name, "concat");
                assert_eq!(parameters.len(), 2);
                assert_eq!(text, "concat('a',@b)");
            }
            other => panic!("unexpected tokens {:?}", other),
        }
    }
}
