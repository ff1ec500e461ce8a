use crate::ast::Reference;
use crate::convert;
use crate::error::ExprError;
use crate::functions::ExpressionFunction;
use crate::number::NumberKind;
use crate::value::{Value, ValueKind};

/// Everything an expression needs from its surroundings while it is evaluated.
///
/// Implementations are cheap, short-lived adapters: a node selector builds one
/// for every candidate node so that references resolve against that node.
pub trait ExpressionContext {
    /// Resolves an attribute or position reference.
    fn reference(&self, reference: &Reference) -> Result<Value, ExprError>;

    /// Looks up a callable function by name.
    fn function(&self, name: &str) -> Option<ExpressionFunction>;

    /// The numeric representation used for numbers created during evaluation.
    fn number_kind(&self) -> NumberKind;

    fn convert(&self, value: Value, target: ValueKind) -> Result<Value, ExprError> {
        convert::convert(value, target, self.number_kind())
    }
}
