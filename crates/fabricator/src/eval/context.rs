//! Evaluation context consumed by template helpers.

use std::collections::HashMap;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::eval::HelperError;
use crate::types::{Expr, Value};

/// The slice of the template engine's state that helpers consume.
///
/// The context owns:
/// - the random source shared by all selection helpers (seedable so a host
///   can make a template run reproducible)
/// - the field-variable scope used for name-based object lookup
/// - on-demand evaluation of deferred expressions
///
/// Field-definition rendering and variable scoping beyond a flat map belong
/// to the host engine, not this crate.
pub struct EvalContext {
    /// Random source for selection helpers.
    rng: StdRng,
    /// Field variables visible to `reference` lookups.
    field_vars: HashMap<String, Value>,
}

impl EvalContext {
    /// Create a context with an entropy-seeded random source.
    pub fn new() -> Self {
        Self { rng: StdRng::from_entropy(), field_vars: HashMap::new() }
    }

    /// Create a context with a fixed seed for reproducible runs.
    pub fn from_seed(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed), field_vars: HashMap::new() }
    }

    /// Replace the field-variable scope.
    pub fn with_field_vars(mut self, field_vars: HashMap<String, Value>) -> Self {
        self.field_vars = field_vars;
        self
    }

    /// Bind a field variable.
    pub fn set_field_var(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.field_vars.insert(name.into(), value.into());
    }

    /// Look up a field variable by name.
    pub fn field_var(&self, name: &str) -> Option<&Value> {
        self.field_vars.get(name)
    }

    /// The full field-variable scope.
    pub fn field_vars(&self) -> &HashMap<String, Value> {
        &self.field_vars
    }

    /// Mutable access to the random source.
    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Evaluate an expression to a concrete value.
    ///
    /// Literals are returned as-is and deferred expressions are rendered
    /// against this context. A bare `choice` construct has no value of its
    /// own and is a structural error here.
    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value, HelperError> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Deferred(deferred) => deferred.render(self),
            Expr::Choice(_) => Err(HelperError::ChoiceOutsideSelection),
        }
    }
}

impl Default for EvalContext {
    fn default() -> Self {
        Self::new()
    }
}
