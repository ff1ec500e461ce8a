//! The compiled selector pipeline.
//!
//! A [`Selector`] is an immutable chain of [`Step`]s. Each step filters or
//! expands the node it receives and hands the survivors to its `next` step;
//! [`Step::Terminal`] reports whatever reaches it as selected.

use crate::context::{BasicNodeSelectorContext, NodeSelectorContext};
use crate::engine;
use crate::error::SelectorError;
use crate::node::Node;
use crate::token::Axis;
use nodepath_expr::{Expression, FunctionRegistry};
use std::cell::RefCell;
use std::fmt;

/// A compiled predicate and the source text it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub expression: Expression,
    pub text: String,
}

/// One link of a selector chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Step<N: Node> {
    /// Selects every node it receives.
    Terminal,
    /// Expands the node along an axis, in document order.
    Axis { axis: Axis, next: Box<Step<N>> },
    /// Keeps nodes whose name equals `name`.
    Named { name: N::Name, next: Box<Step<N>> },
    /// Keeps nodes for which the predicate holds at their position.
    Expression {
        predicate: Predicate,
        next: Box<Step<N>>,
    },
    /// Keeps nodes whose attribute's text form equals `value`.
    AttributeValue {
        name: String,
        value: String,
        next: Box<Step<N>>,
    },
}

impl<N: Node> Step<N> {
    fn next(&self) -> Option<&Step<N>> {
        match self {
            Step::Terminal => None,
            Step::Axis { next, .. }
            | Step::Named { next, .. }
            | Step::Expression { next, .. }
            | Step::AttributeValue { next, .. } => Some(next.as_ref()),
        }
    }

    /// The step immediately before `Terminal`, or `Terminal` for an empty chain.
    fn last(&self) -> &Step<N> {
        let mut step = self;
        while let Some(next) = step.next() {
            if matches!(next, Step::Terminal) {
                break;
            }
            step = next;
        }
        step
    }

    /// Rebuilds this chain with `tail` in place of its `Terminal`.
    fn then(self, tail: Step<N>) -> Step<N> {
        match self {
            Step::Terminal => tail,
            Step::Axis { axis, next } => Step::Axis {
                axis,
                next: Box::new(next.then(tail)),
            },
            Step::Named { name, next } => Step::Named {
                name,
                next: Box::new(next.then(tail)),
            },
            Step::Expression { predicate, next } => Step::Expression {
                predicate,
                next: Box::new(next.then(tail)),
            },
            Step::AttributeValue { name, value, next } => Step::AttributeValue {
                name,
                value,
                next: Box::new(next.then(tail)),
            },
        }
    }

    /// Canonical text of this step and its filters, up to the next axis step.
    pub(crate) fn location_text(&self) -> String {
        let mut text = String::new();
        // Writing into a String cannot fail.
        let _ = render(self, &mut text, true);
        text
    }

    /// The axis of a chain made of exactly one axis step.
    fn single_axis(&self) -> Option<Axis> {
        match self {
            Step::Axis { axis, next } if matches!(next.as_ref(), Step::Terminal) => Some(*axis),
            _ => None,
        }
    }
}

/// An immutable, reusable node selector.
///
/// Selectors are built by [`SelectorCompiler`](crate::SelectorCompiler) or by
/// chaining the constructors below with [`Selector::append`]. Equality is
/// structural and ignores the display text.
#[derive(Debug, Clone)]
pub struct Selector<N: Node> {
    step: Step<N>,
    text: Option<String>,
}

impl<N: Node> PartialEq for Selector<N> {
    fn eq(&self, other: &Self) -> bool {
        self.step == other.step
    }
}

impl<N: Node> Selector<N> {
    fn from_step(step: Step<N>) -> Self {
        Self { step, text: None }
    }

    /// The identity of [`append`](Self::append): selects the node it is given.
    pub fn terminal() -> Self {
        Self::from_step(Step::Terminal)
    }

    pub fn axis(axis: Axis) -> Self {
        Self::from_step(Step::Axis {
            axis,
            next: Box::new(Step::Terminal),
        })
    }

    /// Continues from the root of the node's tree.
    pub fn absolute() -> Self {
        Self::axis(Axis::Absolute)
    }

    pub fn ancestor() -> Self {
        Self::axis(Axis::Ancestor)
    }

    pub fn ancestor_or_self() -> Self {
        Self::axis(Axis::AncestorOrSelf)
    }

    pub fn children() -> Self {
        Self::axis(Axis::Children)
    }

    pub fn descendant() -> Self {
        Self::axis(Axis::Descendant)
    }

    pub fn descendant_or_self() -> Self {
        Self::axis(Axis::DescendantOrSelf)
    }

    pub fn first_child() -> Self {
        Self::axis(Axis::FirstChild)
    }

    pub fn following() -> Self {
        Self::axis(Axis::Following)
    }

    pub fn following_sibling() -> Self {
        Self::axis(Axis::FollowingSibling)
    }

    pub fn last_child() -> Self {
        Self::axis(Axis::LastChild)
    }

    pub fn parent() -> Self {
        Self::axis(Axis::Parent)
    }

    pub fn preceding() -> Self {
        Self::axis(Axis::Preceding)
    }

    pub fn preceding_sibling() -> Self {
        Self::axis(Axis::PrecedingSibling)
    }

    pub fn self_node() -> Self {
        Self::axis(Axis::SelfAxis)
    }

    pub fn named(name: N::Name) -> Self {
        Self::from_step(Step::Named {
            name,
            next: Box::new(Step::Terminal),
        })
    }

    /// A predicate filter. `text` is how the predicate renders between brackets.
    pub fn expression(expression: Expression, text: impl Into<String>) -> Self {
        Self::from_step(Step::Expression {
            predicate: Predicate {
                expression,
                text: text.into(),
            },
            next: Box::new(Step::Terminal),
        })
    }

    /// Keeps nodes whose `name` attribute renders as `value`. A missing
    /// attribute renders as the empty string.
    pub fn attribute_value_equals(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::from_step(Step::AttributeValue {
            name: name.into(),
            value: value.into(),
            next: Box::new(Step::Terminal),
        })
    }

    /// Forces the text this selector displays as.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Runs `other` on every node this selector selects.
    ///
    /// `terminal()` is the identity on both sides, and appending a single
    /// idempotent axis to a chain already ending in that axis returns the chain
    /// unchanged. Any other append drops a forced display text.
    pub fn append(self, other: Selector<N>) -> Selector<N> {
        if matches!(other.step, Step::Terminal) {
            return self;
        }
        if matches!(self.step, Step::Terminal) {
            return other;
        }
        if let (Some(last), Some(appended)) = (self.step.last().single_axis(), other.step.single_axis()) {
            if last == appended && last.is_idempotent() {
                return self;
            }
        }
        Selector::from_step(self.step.then(other.step))
    }

    pub fn step(&self) -> &Step<N> {
        &self.step
    }

    /// Selects from `node`, reporting matches through `context`.
    ///
    /// Contexts are single-use; pass a fresh one for every run.
    pub fn evaluate(
        &self,
        node: &N,
        context: &mut dyn NodeSelectorContext<N>,
    ) -> Result<(), SelectorError> {
        engine::run(&self.step, node, context)
    }

    /// Every node selected from `node`, in selection order.
    pub fn select_all(&self, node: &N, functions: &FunctionRegistry) -> Result<Vec<N>, SelectorError> {
        let mut selected = Vec::new();
        {
            let mut context = BasicNodeSelectorContext::new(functions, |n: &N| selected.push(n.clone()));
            self.evaluate(node, &mut context)?;
        }
        Ok(selected)
    }

    /// The first node selected from `node`. The walk stops as soon as it is found.
    pub fn first(&self, node: &N, functions: &FunctionRegistry) -> Result<Option<N>, SelectorError> {
        let found = RefCell::new(None);
        {
            let mut context = BasicNodeSelectorContext::new(functions, |n: &N| {
                *found.borrow_mut() = Some(n.clone());
            })
            .with_finisher(|| found.borrow().is_some());
            self.evaluate(node, &mut context)?;
        }
        Ok(found.into_inner())
    }
}

impl<N: Node> fmt::Display for Selector<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.text {
            Some(text) => f.write_str(text),
            None => render(&self.step, f, false),
        }
    }
}

/// Writes the canonical form of a chain. With `one_location` set, stops
/// before the second axis step.
fn render<N: Node>(mut step: &Step<N>, f: &mut impl fmt::Write, one_location: bool) -> fmt::Result {
    let mut separate = false;
    let mut seen_axis = false;
    loop {
        match step {
            Step::Terminal => return Ok(()),
            Step::Axis { .. } if one_location && seen_axis => return Ok(()),
            Step::Axis {
                axis: Axis::Absolute,
                next,
            } => {
                f.write_str("/")?;
                separate = false;
                seen_axis = true;
                step = next.as_ref();
            }
            Step::Axis { axis, next } => {
                if separate {
                    f.write_str("/")?;
                }
                f.write_str(axis.keyword())?;
                step = match next.as_ref() {
                    Step::Named { name, next } => {
                        write!(f, "{}", name)?;
                        next.as_ref()
                    }
                    other => {
                        f.write_str("*")?;
                        other
                    }
                };
                separate = true;
                seen_axis = true;
            }
            Step::Named { name, next } => {
                if separate {
                    f.write_str("/")?;
                }
                write!(f, "{}", name)?;
                separate = true;
                step = next.as_ref();
            }
            Step::Expression { predicate, next } => {
                write!(f, "[{}]", predicate.text)?;
                step = next.as_ref();
            }
            Step::AttributeValue { name, value, next } => {
                write!(f, "[@{}=\"{}\"]", name, value)?;
                step = next.as_ref();
            }
        }
    }
}
