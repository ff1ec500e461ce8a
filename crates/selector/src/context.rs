//! Bridges the selector engine to the caller and to the expression evaluator.

use crate::node::Node;
use nodepath_expr::{
    ExprError, Expression, ExpressionContext, ExpressionFunction, FunctionRegistry, NumberKind,
    Reference, Value, ValueKind,
};

/// The per-run state a selector reports to and consults while walking a tree.
///
/// A context is single-use: build a fresh one for every top-level selection.
pub trait NodeSelectorContext<N: Node> {
    /// Polled before every node is visited. Once true, the run stops.
    fn is_finished(&self) -> bool;

    /// A final filter applied to nodes that passed every step.
    fn test(&mut self, node: &N) -> bool;

    /// Receives each selected node.
    fn select(&mut self, node: &N);

    /// Evaluates a predicate for `node` at a 1-based `position`.
    fn evaluate(&self, expression: &Expression, node: &N, position: usize) -> Result<Value, ExprError>;

    fn convert(&self, value: Value, target: ValueKind) -> Result<Value, ExprError>;
}

type Finisher<'f> = Box<dyn Fn() -> bool + 'f>;
type Filter<'f, N> = Box<dyn FnMut(&N) -> bool + 'f>;
type Consumer<'f, N> = Box<dyn FnMut(&N) + 'f>;

/// A context assembled from caller closures and a function registry.
pub struct BasicNodeSelectorContext<'f, N: Node> {
    finisher: Finisher<'f>,
    filter: Filter<'f, N>,
    consumer: Consumer<'f, N>,
    functions: &'f FunctionRegistry,
    number_kind: NumberKind,
}

impl<'f, N: Node> BasicNodeSelectorContext<'f, N> {
    /// A context that never finishes early and accepts every node.
    pub fn new(functions: &'f FunctionRegistry, consumer: impl FnMut(&N) + 'f) -> Self {
        Self {
            finisher: Box::new(|| false),
            filter: Box::new(|_| true),
            consumer: Box::new(consumer),
            functions,
            number_kind: NumberKind::default(),
        }
    }

    pub fn with_finisher(mut self, finisher: impl Fn() -> bool + 'f) -> Self {
        self.finisher = Box::new(finisher);
        self
    }

    pub fn with_filter(mut self, filter: impl FnMut(&N) -> bool + 'f) -> Self {
        self.filter = Box::new(filter);
        self
    }

    pub fn with_number_kind(mut self, number_kind: NumberKind) -> Self {
        self.number_kind = number_kind;
        self
    }
}

impl<N: Node> NodeSelectorContext<N> for BasicNodeSelectorContext<'_, N> {
    fn is_finished(&self) -> bool {
        (self.finisher)()
    }

    fn test(&mut self, node: &N) -> bool {
        (self.filter)(node)
    }

    fn select(&mut self, node: &N) {
        (self.consumer)(node)
    }

    fn evaluate(&self, expression: &Expression, node: &N, position: usize) -> Result<Value, ExprError> {
        let ctx = NodeExpressionContext {
            node,
            position,
            functions: self.functions,
            number_kind: self.number_kind,
        };
        nodepath_expr::evaluate(expression, &ctx)
    }

    fn convert(&self, value: Value, target: ValueKind) -> Result<Value, ExprError> {
        nodepath_expr::convert(value, target, self.number_kind)
    }
}

/// Resolves expression references against one candidate node.
///
/// Attributes are found by a linear scan; a missing attribute resolves to the
/// empty text value, so `@missing = ""` holds.
pub struct NodeExpressionContext<'n, N: Node> {
    pub node: &'n N,
    pub position: usize,
    pub functions: &'n FunctionRegistry,
    pub number_kind: NumberKind,
}

impl<N: Node> ExpressionContext for NodeExpressionContext<'_, N> {
    fn reference(&self, reference: &Reference) -> Result<Value, ExprError> {
        match reference {
            Reference::Attribute(name) => Ok(match self.node.attribute(name) {
                Some(Value::Number(n)) => Value::Number(self.number_kind.convert(n)),
                Some(value) => value,
                None => Value::empty(),
            }),
            Reference::Position => Ok(Value::Number(self.number_kind.from_usize(self.position))),
        }
    }

    fn function(&self, name: &str) -> Option<ExpressionFunction> {
        self.functions.get(name)
    }

    fn number_kind(&self) -> NumberKind {
        self.number_kind
    }
}

/// A context whose every method panics, for tests that must prove a code path
/// never touches its context.
#[cfg(any(test, feature = "testing"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct FakeNodeSelectorContext;

#[cfg(any(test, feature = "testing"))]
impl<N: Node> NodeSelectorContext<N> for FakeNodeSelectorContext {
    fn is_finished(&self) -> bool {
        panic!("FakeNodeSelectorContext::is_finished called")
    }

    fn test(&mut self, _node: &N) -> bool {
        panic!("FakeNodeSelectorContext::test called")
    }

    fn select(&mut self, _node: &N) {
        panic!("FakeNodeSelectorContext::select called")
    }

    fn evaluate(&self, _expression: &Expression, _node: &N, _position: usize) -> Result<Value, ExprError> {
        panic!("FakeNodeSelectorContext::evaluate called")
    }

    fn convert(&self, _value: Value, _target: ValueKind) -> Result<Value, ExprError> {
        panic!("FakeNodeSelectorContext::convert called")
    }
}
