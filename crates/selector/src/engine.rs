//! Runs a selector chain against a node.
//!
//! The walk is depth first and single threaded. Every axis expansion opens a
//! new position scope; each expression filter after it counts, from 1, the
//! nodes it evaluates within that scope.

use crate::axes;
use crate::context::NodeSelectorContext;
use crate::error::SelectorError;
use crate::node::Node;
use crate::selector::{Predicate, Step};
use nodepath_expr::{Value, ValueKind};

/// Per-filter position counters for one axis expansion.
#[derive(Debug, Default)]
struct Positions(Vec<usize>);

impl Positions {
    /// Counts one more evaluation in `slot` and returns its 1-based position.
    fn advance(&mut self, slot: usize) -> usize {
        if self.0.len() <= slot {
            self.0.resize(slot + 1, 0);
        }
        self.0[slot] += 1;
        self.0[slot]
    }
}

pub(crate) fn run<N: Node>(
    step: &Step<N>,
    node: &N,
    context: &mut dyn NodeSelectorContext<N>,
) -> Result<(), SelectorError> {
    apply(step, node, context, &mut Positions::default(), 0, step)
}

/// `location` is the axis step whose expansion produced `node`, used to
/// name the failing step in evaluation errors.
fn apply<N: Node>(
    step: &Step<N>,
    node: &N,
    context: &mut dyn NodeSelectorContext<N>,
    positions: &mut Positions,
    slot: usize,
    location: &Step<N>,
) -> Result<(), SelectorError> {
    if context.is_finished() {
        return Ok(());
    }
    match step {
        Step::Terminal => {
            if context.test(node) {
                log::trace!("Selected {:?}", node);
                context.select(node);
            }
            Ok(())
        }
        Step::Axis { axis, next } => {
            let mut scope = Positions::default();
            for candidate in axes::collect(*axis, node) {
                if context.is_finished() {
                    break;
                }
                apply(next, &candidate, context, &mut scope, 0, step)?;
            }
            Ok(())
        }
        Step::Named { name, next } => {
            if node.name() == *name {
                apply(next, node, context, positions, slot, location)
            } else {
                Ok(())
            }
        }
        Step::Expression { predicate, next } => {
            let position = positions.advance(slot);
            if predicate_holds(predicate, location, node, position, &*context)? {
                apply(next, node, context, positions, slot + 1, location)
            } else {
                Ok(())
            }
        }
        Step::AttributeValue { name, value, next } => {
            let actual = node
                .attribute(name)
                .map(|v| v.to_string())
                .unwrap_or_default();
            if actual == *value {
                apply(next, node, context, positions, slot, location)
            } else {
                Ok(())
            }
        }
    }
}

/// A boolean result decides directly; a number matches when it equals the
/// position; text is converted to a boolean.
fn predicate_holds<N: Node>(
    predicate: &Predicate,
    location: &Step<N>,
    node: &N,
    position: usize,
    context: &dyn NodeSelectorContext<N>,
) -> Result<bool, SelectorError> {
    let result = context
        .evaluate(&predicate.expression, node, position)
        .and_then(|value| match value {
            Value::Boolean(b) => Ok(b),
            Value::Number(n) => Ok(n.is_position(position)),
            text => context
                .convert(text, ValueKind::Boolean)
                .map(|v| v.as_bool().unwrap_or(false)),
        });
    match result {
        Ok(matched) => {
            log::trace!(
                "Predicate [{}] on {:?} at position {}: {}",
                predicate.text,
                node,
                position,
                matched
            );
            Ok(matched)
        }
        Err(source) => {
            log::warn!("Predicate [{}] failed on {:?}: {}", predicate.text, node, source);
            Err(SelectorError::Evaluation {
                selector: location.location_text(),
                source,
            })
        }
    }
}
