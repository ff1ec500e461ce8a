//! Defines the registry and built-in implementations for predicate functions.
use crate::context::ExpressionContext;
use crate::error::ExprError;
use crate::value::{Value, ValueKind};
use std::collections::HashMap;

/// The signature for a function callable from a predicate.
pub type ExpressionFunction =
    fn(ctx: &dyn ExpressionContext, args: Vec<Value>) -> Result<Value, ExprError>;

/// A registry to hold all functions available to predicates.
#[derive(Debug, Clone)]
pub struct FunctionRegistry {
    functions: HashMap<String, ExpressionFunction>,
}

impl FunctionRegistry {
    /// Creates a new, empty function registry.
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// Registers a function, replacing any earlier one with the same name.
    pub fn register(&mut self, name: &str, func: ExpressionFunction) {
        self.functions.insert(name.to_lowercase(), func);
    }

    /// Finds a function by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<ExpressionFunction> {
        self.functions.get(&name.to_lowercase()).copied()
    }

    /// True when `name` is callable. Used by selector compilers to reject
    /// predicates that reference unknown functions up front.
    pub fn contains_function(&self, name: &str) -> bool {
        self.functions.contains_key(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

fn expect_args(function: &str, args: &[Value], min: usize, max: usize) -> Result<(), ExprError> {
    if args.len() < min || args.len() > max {
        let expected = if min == max {
            format!("{}", min)
        } else if max == usize::MAX {
            format!("at least {}", min)
        } else {
            format!("{} to {}", min, max)
        };
        return Err(ExprError::function(
            function,
            format!("expected {} argument(s), got {}", expected, args.len()),
        ));
    }
    Ok(())
}

fn single(
    ctx: &dyn ExpressionContext,
    function: &str,
    args: Vec<Value>,
    target: ValueKind,
) -> Result<Value, ExprError> {
    expect_args(function, &args, 1, 1)?;
    let mut args = args.into_iter();
    match args.next() {
        Some(value) => ctx.convert(value, target),
        None => Err(ExprError::function(function, "missing argument")),
    }
}

fn text_args(
    ctx: &dyn ExpressionContext,
    args: Vec<Value>,
) -> Result<Vec<String>, ExprError> {
    args.into_iter()
        .map(|value| ctx.convert(value, ValueKind::Text).map(|v| v.to_string()))
        .collect()
}

fn text_pair(
    ctx: &dyn ExpressionContext,
    function: &str,
    args: Vec<Value>,
) -> Result<(String, String), ExprError> {
    expect_args(function, &args, 2, 2)?;
    let mut texts = text_args(ctx, args)?.into_iter();
    match (texts.next(), texts.next()) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(ExprError::function(function, "missing argument")),
    }
}

fn single_text(
    ctx: &dyn ExpressionContext,
    function: &str,
    args: Vec<Value>,
) -> Result<String, ExprError> {
    single(ctx, function, args, ValueKind::Text).map(|v| v.to_string())
}

fn single_number(
    ctx: &dyn ExpressionContext,
    function: &str,
    args: Vec<Value>,
) -> Result<crate::number::Number, ExprError> {
    match single(ctx, function, args, ValueKind::Number)? {
        Value::Number(n) => Ok(n),
        other => Err(ExprError::conversion(other.to_string(), "number")),
    }
}

// --- Built-in Function Implementations ---

fn func_boolean(ctx: &dyn ExpressionContext, args: Vec<Value>) -> Result<Value, ExprError> {
    single(ctx, "boolean", args, ValueKind::Boolean)
}

fn func_not(ctx: &dyn ExpressionContext, args: Vec<Value>) -> Result<Value, ExprError> {
    match single(ctx, "not", args, ValueKind::Boolean)? {
        Value::Boolean(b) => Ok(Value::Boolean(!b)),
        other => Err(ExprError::conversion(other.to_string(), "boolean")),
    }
}

fn func_true(_ctx: &dyn ExpressionContext, args: Vec<Value>) -> Result<Value, ExprError> {
    expect_args("true", &args, 0, 0)?;
    Ok(Value::Boolean(true))
}

fn func_false(_ctx: &dyn ExpressionContext, args: Vec<Value>) -> Result<Value, ExprError> {
    expect_args("false", &args, 0, 0)?;
    Ok(Value::Boolean(false))
}

fn func_number(ctx: &dyn ExpressionContext, args: Vec<Value>) -> Result<Value, ExprError> {
    single(ctx, "number", args, ValueKind::Number)
}

fn func_string(ctx: &dyn ExpressionContext, args: Vec<Value>) -> Result<Value, ExprError> {
    single(ctx, "string", args, ValueKind::Text)
}

fn func_concat(ctx: &dyn ExpressionContext, args: Vec<Value>) -> Result<Value, ExprError> {
    expect_args("concat", &args, 2, usize::MAX)?;
    Ok(Value::Text(text_args(ctx, args)?.concat()))
}

fn func_contains(ctx: &dyn ExpressionContext, args: Vec<Value>) -> Result<Value, ExprError> {
    let (haystack, needle) = text_pair(ctx, "contains", args)?;
    Ok(Value::Boolean(haystack.contains(&needle)))
}

fn func_starts_with(ctx: &dyn ExpressionContext, args: Vec<Value>) -> Result<Value, ExprError> {
    let (text, prefix) = text_pair(ctx, "starts-with", args)?;
    Ok(Value::Boolean(text.starts_with(&prefix)))
}

fn func_ends_with(ctx: &dyn ExpressionContext, args: Vec<Value>) -> Result<Value, ExprError> {
    let (text, suffix) = text_pair(ctx, "ends-with", args)?;
    Ok(Value::Boolean(text.ends_with(&suffix)))
}

fn func_string_length(ctx: &dyn ExpressionContext, args: Vec<Value>) -> Result<Value, ExprError> {
    let text = single_text(ctx, "string-length", args)?;
    Ok(Value::Number(
        ctx.number_kind().from_usize(text.chars().count()),
    ))
}

fn func_normalize_space(
    ctx: &dyn ExpressionContext,
    args: Vec<Value>,
) -> Result<Value, ExprError> {
    let text = single_text(ctx, "normalize-space", args)?;
    Ok(Value::Text(
        text.split_whitespace().collect::<Vec<_>>().join(" "),
    ))
}

fn func_lower_case(ctx: &dyn ExpressionContext, args: Vec<Value>) -> Result<Value, ExprError> {
    Ok(Value::Text(single_text(ctx, "lower-case", args)?.to_lowercase()))
}

fn func_upper_case(ctx: &dyn ExpressionContext, args: Vec<Value>) -> Result<Value, ExprError> {
    Ok(Value::Text(single_text(ctx, "upper-case", args)?.to_uppercase()))
}

fn func_floor(ctx: &dyn ExpressionContext, args: Vec<Value>) -> Result<Value, ExprError> {
    Ok(Value::Number(single_number(ctx, "floor", args)?.floor()))
}

fn func_ceiling(ctx: &dyn ExpressionContext, args: Vec<Value>) -> Result<Value, ExprError> {
    Ok(Value::Number(single_number(ctx, "ceiling", args)?.ceiling()))
}

fn func_round(ctx: &dyn ExpressionContext, args: Vec<Value>) -> Result<Value, ExprError> {
    Ok(Value::Number(single_number(ctx, "round", args)?.round()?))
}

impl Default for FunctionRegistry {
    /// Creates a new registry populated with all built-in functions.
    fn default() -> Self {
        let mut registry = Self::new();
        // Boolean
        registry.register("boolean", func_boolean);
        registry.register("not", func_not);
        registry.register("true", func_true);
        registry.register("false", func_false);
        // Conversion
        registry.register("number", func_number);
        registry.register("string", func_string);
        // Text
        registry.register("concat", func_concat);
        registry.register("contains", func_contains);
        registry.register("starts-with", func_starts_with);
        registry.register("ends-with", func_ends_with);
        registry.register("string-length", func_string_length);
        registry.register("normalize-space", func_normalize_space);
        registry.register("lower-case", func_lower_case);
        registry.register("upper-case", func_upper_case);
        // Numeric
        registry.register("floor", func_floor);
        registry.register("ceiling", func_ceiling);
        registry.register("round", func_round);
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Reference;
    use crate::number::{Number, NumberKind};

    struct EmptyContext;

    impl ExpressionContext for EmptyContext {
        fn reference(&self, reference: &Reference) -> Result<Value, ExprError> {
            Err(ExprError::UnknownReference(reference.to_string()))
        }

        fn function(&self, _name: &str) -> Option<ExpressionFunction> {
            None
        }

        fn number_kind(&self) -> NumberKind {
            NumberKind::Decimal
        }
    }

    fn call(name: &str, args: Vec<Value>) -> Result<Value, ExprError> {
        let registry = FunctionRegistry::default();
        let func = registry.get(name).expect("function is registered");
        func(&EmptyContext, args)
    }

    #[test]
    fn test_default_registry_contents() {
        let registry = FunctionRegistry::default();
        assert_eq!(registry.len(), 17);
        assert!(registry.contains_function("normalize-space"));
        assert!(registry.contains_function("Upper-Case"));
        assert!(!registry.contains_function("position"));
        assert!(!registry.contains_function("missing"));
    }

    #[test]
    fn test_func_concat() {
        assert_eq!(
            call("concat", vec![Value::from("a"), Value::from(1), Value::from(true)]),
            Ok(Value::from("a1true"))
        );
        assert!(matches!(
            call("concat", vec![Value::from("a")]),
            Err(ExprError::Function { .. })
        ));
    }

    #[test]
    fn test_text_predicates() {
        assert_eq!(
            call("contains", vec![Value::from("hello"), Value::from("ell")]),
            Ok(Value::from(true))
        );
        assert_eq!(
            call("starts-with", vec![Value::from("hello"), Value::from("he")]),
            Ok(Value::from(true))
        );
        assert_eq!(
            call("ends-with", vec![Value::from("hello"), Value::from("he")]),
            Ok(Value::from(false))
        );
    }

    #[test]
    fn test_func_normalize_space() {
        assert_eq!(
            call("normalize-space", vec![Value::from("  a   b \n c ")]),
            Ok(Value::from("a b c"))
        );
    }

    #[test]
    fn test_func_string_length_counts_chars() {
        assert_eq!(
            call("string-length", vec![Value::from("héllo")]),
            Ok(Value::Number(Number::from(5)))
        );
    }

    #[test]
    fn test_numeric_functions() {
        assert_eq!(
            call("floor", vec![Value::from(2.7)]),
            Ok(Value::from(2.0))
        );
        assert_eq!(
            call("ceiling", vec![Value::from("2.1")]),
            Ok(Value::Number(Number::from(3)))
        );
        assert_eq!(
            call("round", vec![Value::from(-1.5)]),
            Ok(Value::from(-1.0))
        );
    }

    #[test]
    fn test_boolean_functions() {
        assert_eq!(call("not", vec![Value::from("")]), Ok(Value::from(true)));
        assert_eq!(call("boolean", vec![Value::from(0)]), Ok(Value::from(false)));
        assert_eq!(call("true", vec![]), Ok(Value::from(true)));
        assert!(matches!(
            call("false", vec![Value::from(1)]),
            Err(ExprError::Function { .. })
        ));
    }
}
