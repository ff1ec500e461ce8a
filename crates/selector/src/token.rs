//! The parse tree produced by the selector grammar.
//!
//! Every token remembers the exact source text it consumed, so rendering a
//! token tree with [`SelectorToken::text`] reproduces the input verbatim.

use nodepath_expr::BinaryOperator;
use rust_decimal::Decimal;
use std::fmt;

/// A direction of traversal relative to a context node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The root of the context node's tree.
    Absolute,
    Ancestor,
    AncestorOrSelf,
    Children,
    Descendant,
    DescendantOrSelf,
    FirstChild,
    Following,
    FollowingSibling,
    LastChild,
    Parent,
    Preceding,
    PrecedingSibling,
    SelfAxis,
}

impl Axis {
    /// The canonical keyword used when rendering a selector.
    pub fn keyword(&self) -> &'static str {
        match self {
            Axis::Absolute => "/",
            Axis::Ancestor => "ancestor::",
            Axis::AncestorOrSelf => "ancestor-or-self::",
            Axis::Children => "child::",
            Axis::Descendant => "descendant::",
            Axis::DescendantOrSelf => "descendant-or-self::",
            Axis::FirstChild => "first-child::",
            Axis::Following => "following::",
            Axis::FollowingSibling => "following-sibling::",
            Axis::LastChild => "last-child::",
            Axis::Parent => "parent::",
            Axis::Preceding => "preceding::",
            Axis::PrecedingSibling => "preceding-sibling::",
            Axis::SelfAxis => "self::",
        }
    }

    /// Axes where appending the same axis again adds nothing.
    pub fn is_idempotent(&self) -> bool {
        matches!(
            self,
            Axis::Ancestor
                | Axis::AncestorOrSelf
                | Axis::SelfAxis
                | Axis::Preceding
                | Axis::DescendantOrSelf
        )
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Slash,
    DoubleSlash,
    BracketOpen,
    BracketClose,
    ParenthesisOpen,
    ParenthesisClose,
    Comma,
    At,
    Operator(BinaryOperator),
}

/// A node of the selector parse tree.
///
/// Leaf variants hold an atomic value; parent variants hold their significant
/// children in named fields plus the full consumed text, punctuation and
/// whitespace included.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorToken {
    // --- Leaves ---
    Whitespace {
        text: String,
    },
    Symbol {
        symbol: Symbol,
        text: String,
    },
    Axis {
        axis: Axis,
        text: String,
    },
    Wildcard {
        text: String,
    },
    NodeName {
        name: String,
    },
    AttributeName {
        name: String,
    },
    FunctionName {
        name: String,
    },
    Number {
        value: Decimal,
        text: String,
    },
    QuotedText {
        value: String,
        text: String,
    },

    // --- Parents ---
    /// A full selector path, or the tokens of an entry rule.
    Expression {
        tokens: Vec<SelectorToken>,
        text: String,
    },
    /// A predicate, bracketed inside a step or standalone.
    Predicate {
        expression: Box<SelectorToken>,
        text: String,
    },
    Attribute {
        name: String,
        text: String,
    },
    Function {
        name: String,
        parameters: Vec<SelectorToken>,
        text: String,
    },
    Group {
        expression: Box<SelectorToken>,
        text: String,
    },
    Negative {
        value: Box<SelectorToken>,
        text: String,
    },
    Binary {
        operator: BinaryOperator,
        left: Box<SelectorToken>,
        right: Box<SelectorToken>,
        text: String,
    },
}

impl SelectorToken {
    /// The exact source text this token consumed.
    pub fn text(&self) -> &str {
        match self {
            SelectorToken::NodeName { name }
            | SelectorToken::AttributeName { name }
            | SelectorToken::FunctionName { name } => name,
            SelectorToken::Whitespace { text }
            | SelectorToken::Symbol { text, .. }
            | SelectorToken::Axis { text, .. }
            | SelectorToken::Wildcard { text }
            | SelectorToken::Number { text, .. }
            | SelectorToken::QuotedText { text, .. }
            | SelectorToken::Expression { text, .. }
            | SelectorToken::Predicate { text, .. }
            | SelectorToken::Attribute { text, .. }
            | SelectorToken::Function { text, .. }
            | SelectorToken::Group { text, .. }
            | SelectorToken::Negative { text, .. }
            | SelectorToken::Binary { text, .. } => text,
        }
    }

    /// Whitespace and punctuation that only matter for reproducing the source.
    pub fn is_noise(&self) -> bool {
        match self {
            SelectorToken::Whitespace { .. } => true,
            SelectorToken::Symbol { symbol, .. } => matches!(
                symbol,
                Symbol::BracketOpen
                    | Symbol::BracketClose
                    | Symbol::ParenthesisOpen
                    | Symbol::ParenthesisClose
                    | Symbol::Comma
                    | Symbol::At
            ),
            _ => false,
        }
    }

    pub fn is_whitespace(&self) -> bool {
        matches!(self, SelectorToken::Whitespace { .. })
    }

    /// The significant children of a parent token. Leaves have none.
    pub fn without_noise(&self) -> Vec<&SelectorToken> {
        match self {
            SelectorToken::Expression { tokens, .. } => {
                tokens.iter().filter(|t| !t.is_noise()).collect()
            }
            SelectorToken::Function { parameters, .. } => parameters.iter().collect(),
            SelectorToken::Predicate { expression, .. } | SelectorToken::Group { expression, .. } => {
                vec![expression.as_ref()]
            }
            SelectorToken::Negative { value, .. } => vec![value.as_ref()],
            SelectorToken::Binary { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            _ => Vec::new(),
        }
    }

    /// The operator carried by an operator symbol token.
    pub fn operator(&self) -> Option<BinaryOperator> {
        match self {
            SelectorToken::Symbol {
                symbol: Symbol::Operator(op),
                ..
            } => Some(*op),
            _ => None,
        }
    }
}

impl fmt::Display for SelectorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Concatenates the source text of a run of tokens.
pub(crate) fn joined_text(tokens: &[SelectorToken]) -> String {
    tokens.iter().map(SelectorToken::text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ws(text: &str) -> SelectorToken {
        SelectorToken::Whitespace {
            text: text.to_string(),
        }
    }

    #[test]
    fn test_without_noise_skips_whitespace_and_punctuation() {
        let name = SelectorToken::NodeName {
            name: "a".to_string(),
        };
        let tokens = vec![
            ws(" "),
            SelectorToken::Symbol {
                symbol: Symbol::Slash,
                text: "/".to_string(),
            },
            name.clone(),
            SelectorToken::Symbol {
                symbol: Symbol::BracketOpen,
                text: "[".to_string(),
            },
            ws(" "),
        ];
        let expression = SelectorToken::Expression {
            text: joined_text(&tokens),
            tokens,
        };
        assert_eq!(expression.text(), " /a[ ");
        let significant = expression.without_noise();
        assert_eq!(significant.len(), 2);
        assert_eq!(significant[1], &name);
    }

    #[test]
    fn test_leaves_have_no_children() {
        let number = SelectorToken::Number {
            value: Decimal::new(15, 1),
            text: "1.50".to_string(),
        };
        assert!(number.without_noise().is_empty());
        assert_eq!(number.to_string(), "1.50");
    }

    #[test]
    fn test_idempotent_axes() {
        assert!(Axis::Ancestor.is_idempotent());
        assert!(Axis::DescendantOrSelf.is_idempotent());
        assert!(!Axis::Children.is_idempotent());
        assert!(!Axis::Parent.is_idempotent());
    }
}
