//! Compiles selector text into [`Selector`] chains.

use crate::config::SelectorConfig;
use crate::error::SelectorError;
use crate::node::Node;
use crate::parser::{parse_expression, parse_predicate};
use crate::predicate::PredicateCompiler;
use crate::selector::Selector;
use crate::token::{SelectorToken, Symbol};
use nodepath_expr::{Expression, FunctionRegistry};
use std::marker::PhantomData;

type NameFactory<'c, N> = Box<dyn Fn(&str) -> Result<<N as Node>::Name, SelectorError> + 'c>;
type FunctionFilter<'c> = Box<dyn Fn(&str) -> bool + 'c>;

/// Turns selector text into selectors over one node type.
///
/// The name factory maps node names in the text to the host's name type and
/// may reject them. The function filter decides which function names a
/// predicate may call; `position()` is always allowed.
pub struct SelectorCompiler<'c, N: Node> {
    names: NameFactory<'c, N>,
    is_function: FunctionFilter<'c>,
    config: SelectorConfig,
    _node: PhantomData<fn() -> N>,
}

impl<'c, N: Node> SelectorCompiler<'c, N> {
    pub fn new(
        names: impl Fn(&str) -> Result<N::Name, SelectorError> + 'c,
        is_function: impl Fn(&str) -> bool + 'c,
    ) -> Self {
        Self {
            names: Box::new(names),
            is_function: Box::new(is_function),
            config: SelectorConfig::default(),
            _node: PhantomData,
        }
    }

    pub fn with_config(mut self, config: SelectorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Compiles a selector path. The result displays as exactly `text`.
    ///
    /// A bare node name or `*` without an axis means `child::`. A leading `/`
    /// starts from the root; `//` also descends through every level.
    pub fn compile(&self, text: &str) -> Result<Selector<N>, SelectorError> {
        let token = parse_expression(text)?;
        let SelectorToken::Expression { tokens, .. } = &token else {
            return Err(SelectorError::invalid_token(format!(
                "Expected a selector path, found '{}'",
                token
            )));
        };

        let mut selector = Selector::terminal();
        let mut expecting_axis = true;
        for (index, token) in tokens.iter().filter(|t| !t.is_whitespace()).enumerate() {
            let first = index == 0;
            match token {
                SelectorToken::Symbol {
                    symbol: Symbol::Slash,
                    ..
                } => {
                    if first {
                        selector = selector.append(Selector::absolute());
                    }
                    expecting_axis = true;
                }
                SelectorToken::Symbol {
                    symbol: Symbol::DoubleSlash,
                    ..
                } => {
                    if first {
                        selector = selector.append(Selector::absolute());
                    }
                    selector = selector.append(Selector::descendant_or_self());
                    expecting_axis = true;
                }
                SelectorToken::Axis { axis, .. } => {
                    selector = selector.append(Selector::axis(*axis));
                    expecting_axis = false;
                }
                SelectorToken::Wildcard { .. } => {
                    if expecting_axis {
                        selector = selector.append(Selector::children());
                    }
                    expecting_axis = false;
                }
                SelectorToken::NodeName { name } => {
                    if expecting_axis {
                        selector = selector.append(Selector::children());
                    }
                    selector = selector.append(Selector::named((self.names)(name)?));
                    expecting_axis = false;
                }
                SelectorToken::Predicate { expression, .. } => {
                    if expecting_axis {
                        selector = selector.append(Selector::children());
                    }
                    let predicate = expression.text();
                    let compiled = self.predicates(predicate).compile(expression)?;
                    selector = selector.append(Selector::expression(compiled, predicate));
                    expecting_axis = false;
                }
                other => {
                    return Err(SelectorError::invalid_token(format!(
                        "Unexpected '{}' in selector '{}'",
                        other, text
                    )));
                }
            }
        }

        log::debug!("Compiled selector '{}'", text);
        Ok(selector.with_text(text))
    }

    /// Compiles a bare predicate such as `@price > 10` into an expression.
    pub fn compile_predicate(&self, text: &str) -> Result<Expression, SelectorError> {
        let token = parse_predicate(text)?;
        self.predicates(text).compile(&token)
    }

    fn predicates<'p>(&'p self, predicate: &'p str) -> PredicateCompiler<'p> {
        PredicateCompiler::new(&*self.is_function, self.config.number_kind, predicate)
    }
}

/// Compiles `text` for hosts whose names convert from text, allowing every
/// function in `functions`.
pub fn compile<N>(text: &str, functions: &FunctionRegistry) -> Result<Selector<N>, SelectorError>
where
    N: Node,
    N::Name: for<'a> From<&'a str>,
{
    SelectorCompiler::<N>::new(|name| Ok(N::Name::from(name)), |name| functions.contains_function(name))
        .compile(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simple::tests::{names, sample_tree};
    use crate::simple::{SimpleNode, SimpleTree};
    use crate::token::Axis;
    use nodepath_expr::{BinaryOperator, NumberKind};

    fn compiled(text: &str) -> Selector<SimpleNode<'static>> {
        compile(text, &FunctionRegistry::default()).unwrap()
    }

    fn select(text: &str, tree: &SimpleTree, start: &str) -> Vec<String> {
        let functions = FunctionRegistry::default();
        let selector: Selector<SimpleNode> = compile(text, &functions).unwrap();
        let start = tree.find(start).unwrap();
        names(&selector.select_all(&start, &functions).unwrap())
    }

    #[test]
    fn test_round_trip_text() {
        for text in [
            "child::a",
            "a/b",
            "//item[@price >= 10]/name",
            " ../following-sibling::*[ 2 ] ",
            "/",
            "ANCESTOR-OR-SELF::node[contains(@id, 'x') or -@n = 1]",
            ".//b[position() = 1][@a]",
        ] {
            assert_eq!(compiled(text).to_string(), text);
        }
    }

    #[test]
    fn test_bare_names_mean_children() {
        let expected = Selector::children()
            .append(Selector::named("a".to_string()))
            .append(Selector::children())
            .append(Selector::named("b".to_string()));
        assert_eq!(compiled("a/b"), expected);
        assert_eq!(compiled("child::a/child::b"), expected);
        assert_eq!(compiled("*"), Selector::children());
    }

    #[test]
    fn test_leading_slashes() {
        assert_eq!(compiled("/"), Selector::absolute());
        assert_eq!(
            compiled("//a"),
            Selector::absolute()
                .append(Selector::descendant_or_self())
                .append(Selector::children())
                .append(Selector::named("a".to_string()))
        );
        assert_eq!(
            compiled("a//b"),
            Selector::children()
                .append(Selector::named("a".to_string()))
                .append(Selector::descendant_or_self())
                .append(Selector::children())
                .append(Selector::named("b".to_string()))
        );
    }

    #[test]
    fn test_predicate_steps() {
        let expected = Selector::children().append(Selector::expression(
            Expression::binary(
                BinaryOperator::Equals,
                Expression::attribute("id"),
                Expression::value("x"),
            ),
            "@id = 'x'",
        ));
        assert_eq!(compiled("*[@id = 'x']"), expected);
        assert_eq!(compiled("child::*[@id = 'x']"), expected);
    }

    #[test]
    fn test_idempotent_steps_collapse() {
        assert_eq!(compiled("ancestor::*/ancestor::*"), Selector::ancestor());
        assert_eq!(compiled("ancestor::*/ancestor::*").to_string(), "ancestor::*/ancestor::*");
        assert_eq!(compiled("./."), Selector::self_node());
    }

    #[test]
    fn test_axes_on_sample_tree() {
        let tree = SimpleTree::from_outline("root{a{b,c},d}").unwrap();
        assert_eq!(select("descendant::*", &tree, "root"), vec!["a", "b", "c", "d"]);
        assert_eq!(select("ancestor::*", &tree, "c"), vec!["root", "a"]);
        assert_eq!(select("ancestor-or-self::*", &tree, "c"), vec!["root", "a", "c"]);
        assert_eq!(select("following-sibling::*", &tree, "b"), vec!["c"]);
        assert_eq!(select("preceding-sibling::*", &tree, "c"), vec!["b"]);
        assert_eq!(select("parent::*", &tree, "b"), vec!["a"]);
        assert_eq!(select("..", &tree, "b"), vec!["a"]);
        assert_eq!(select("following::*", &tree, "b"), vec!["c", "d"]);
        assert_eq!(select("preceding::*", &tree, "d"), vec!["a", "b", "c"]);
        assert_eq!(select("first-child::*", &tree, "a"), vec!["b"]);
        assert_eq!(select("last-child::*", &tree, "a"), vec!["c"]);
        assert_eq!(select("self::b", &tree, "b"), vec!["b"]);
        assert_eq!(select("self::c", &tree, "b"), Vec::<String>::new());
        assert_eq!(select("/d", &tree, "b"), vec!["d"]);
        assert_eq!(select("//c", &tree, "d"), vec!["c"]);
    }

    #[test]
    fn test_positional_predicates() {
        let tree = SimpleTree::from_outline("root{x, y, z}").unwrap();
        assert_eq!(select("child::*[2]", &tree, "root"), vec!["y"]);
        assert_eq!(select("child::*[position()=3]", &tree, "root"), vec!["z"]);
        assert_eq!(select("*[position() > 1][1]", &tree, "root"), vec!["y"]);
    }

    #[test]
    fn test_numbers_with_bare_fraction_or_trailing_dot() {
        let tree = SimpleTree::from_outline("root{x, y, z}").unwrap();
        assert_eq!(select("child::*[2.]", &tree, "root"), vec!["y"]);
        assert_eq!(select("*[.5 < 1]", &tree, "root"), vec!["x", "y", "z"]);
        assert_eq!(compiled("*[.5 < 1]").to_string(), "*[.5 < 1]");
    }

    #[test]
    fn test_round_of_largest_decimal_selects() {
        let tree = SimpleTree::from_outline("root{a}").unwrap();
        assert_eq!(
            select("*[round(79228162514264337593543950335) > 0]", &tree, "root"),
            vec!["a"]
        );
        assert_eq!(select("*[round(2.5) = 3]", &tree, "root"), vec!["a"]);
    }

    #[test]
    fn test_attribute_predicates() {
        let tree = sample_tree();
        assert_eq!(select("a/*[@n > 2]", &tree, "root"), vec!["c"]);
        assert_eq!(select("*[@id = \"\"]", &tree, "a"), vec!["b", "c"]);
        assert_eq!(select("*[@id = \"x\"]", &tree, "a"), Vec::<String>::new());
        assert_eq!(select("d[@flag]", &tree, "root"), vec!["d"]);
        assert_eq!(select("*[@n mod 2 = 0]", &tree, "a"), vec!["b"]);
    }

    #[test]
    fn test_unknown_function_fails_compilation() {
        let err = compile::<SimpleNode>("a[foo()]", &FunctionRegistry::default()).unwrap_err();
        match &err {
            SelectorError::UnknownFunction { function, predicate } => {
                assert_eq!(function, "foo");
                assert_eq!(predicate, "foo()");
            }
            other => panic!("expected unknown function, got {:?}", other),
        }
        assert!(err.to_string().contains("foo"));
    }

    #[test]
    fn test_name_factory_can_reject() {
        let compiler = SelectorCompiler::<SimpleNode>::new(
            |name| {
                if name.starts_with('x') {
                    Err(SelectorError::InvalidName {
                        name: name.to_string(),
                        reason: "reserved".to_string(),
                    })
                } else {
                    Ok(name.to_string())
                }
            },
            |_| true,
        );
        assert!(compiler.compile("a/b").is_ok());
        assert!(matches!(
            compiler.compile("a/xb"),
            Err(SelectorError::InvalidName { .. })
        ));
    }

    #[test]
    fn test_parse_errors_propagate() {
        assert!(matches!(
            compile::<SimpleNode>("a[", &FunctionRegistry::default()),
            Err(SelectorError::Parse { .. })
        ));
        assert!(matches!(
            compile::<SimpleNode>("", &FunctionRegistry::default()),
            Err(SelectorError::Parse { column: 1, .. })
        ));
    }

    #[test]
    fn test_compile_predicate_uses_config() {
        let compiler = SelectorCompiler::<SimpleNode>::new(|name| Ok(name.to_string()), |_| true)
            .with_config(SelectorConfig::default().with_number_kind(NumberKind::Double));
        assert_eq!(compiler.config().number_kind, NumberKind::Double);
        assert_eq!(
            compiler.compile_predicate("0.5").unwrap(),
            Expression::value(0.5)
        );
    }

    #[test]
    fn test_axis_keywords_are_case_insensitive() {
        assert_eq!(compiled("CHILD::a"), compiled("child::a"));
        assert_eq!(
            compiled("Following-Sibling::*"),
            Selector::axis(Axis::FollowingSibling)
        );
    }
}
