use nodepath_expr::NumberKind;

/// Settings shared by selector compilation and evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectorConfig {
    /// How numeric literals, numeric attributes and positions are represented
    /// inside predicates.
    pub number_kind: NumberKind,
}

impl SelectorConfig {
    pub fn with_number_kind(mut self, number_kind: NumberKind) -> Self {
        self.number_kind = number_kind;
        self
    }
}
