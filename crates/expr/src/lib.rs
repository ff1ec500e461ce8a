//! The expression side of node selectors.
//!
//! Selector predicates such as `[@price * 2 > 10]` compile into an [`Expression`]
//! tree. This crate owns that tree, the [`Value`]s it produces and the
//! [`evaluate`] function that runs it against an [`ExpressionContext`]. The
//! context supplies attribute references, the current position and the
//! function registry, so the same compiled expression can be reused for every
//! node a selector visits.
//!
//! # Example
//!
//! ```ignore
//! use nodepath_expr::{BinaryOperator, Expression, Value, evaluate};
//!
//! let expr = Expression::binary(
//!     BinaryOperator::Add,
//!     Expression::value(1),
//!     Expression::value(2),
//! );
//! let value = evaluate(&expr, &context)?;
//! ```

pub mod ast;
pub mod context;
pub mod convert;
pub mod engine;
pub mod error;
pub mod functions;
pub mod number;
pub mod operators;
pub mod value;

pub use ast::{BinaryOperator, Expression, Reference};
pub use context::ExpressionContext;
pub use convert::convert;
pub use engine::evaluate;
pub use error::ExprError;
pub use functions::{ExpressionFunction, FunctionRegistry};
pub use number::{Number, NumberKind};
pub use value::{Value, ValueKind};
