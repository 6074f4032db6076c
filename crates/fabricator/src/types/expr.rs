//! Deferred expressions and choice constructs.
//!
//! Template helpers declared lazy receive their arguments as [`Expr`] values
//! instead of evaluated [`Value`]s. The variants make the original system's
//! "is this still lazy / is this a choice construct" questions an exhaustive
//! match rather than a reflection check.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::rc::Rc;

use crate::eval::{EvalContext, HelperError};
use crate::types::Value;

/// A template expression that may not have been evaluated yet.
///
/// Identity matters for laziness guarantees: an `Expr` is evaluated at most
/// once per selection path, and losing branches of `random_choice`/`if` are
/// never evaluated at all.
#[derive(Debug, Clone)]
pub enum Expr {
    /// An already-concrete value.
    Literal(Value),

    /// A computation evaluated against the context on demand.
    ///
    /// Re-evaluating the same deferred expression is not guaranteed to be
    /// idempotent; it may re-roll randomness.
    Deferred(Deferred),

    /// A `choice` construct, consumed by `random_choice` and `if`.
    Choice(Box<ChoiceArgs>),
}

impl Expr {
    /// Build a literal expression from anything convertible to a [`Value`].
    pub fn lit(value: impl Into<Value>) -> Expr {
        Expr::Literal(value.into())
    }

    /// Build a deferred expression from a closure.
    pub fn deferred(f: impl Fn(&mut EvalContext) -> Result<Value, HelperError> + 'static) -> Expr {
        Expr::Deferred(Deferred::new(f))
    }

    /// Build a `choice` construct.
    pub fn choice(pick: Expr, probability: Option<Expr>, when: Option<Expr>) -> Expr {
        Expr::Choice(Box::new(ChoiceArgs { pick, probability, when }))
    }

    /// A short name for this expression's shape, used in error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Expr::Literal(v) => v.type_name(),
            Expr::Deferred(_) => "deferred expression",
            Expr::Choice(_) => "choice",
        }
    }
}

/// A deferred computation, rendered against the evaluation context on demand.
#[derive(Clone)]
pub struct Deferred(Rc<dyn Fn(&mut EvalContext) -> Result<Value, HelperError>>);

impl Deferred {
    /// Wrap a closure as a deferred computation.
    pub fn new(f: impl Fn(&mut EvalContext) -> Result<Value, HelperError> + 'static) -> Self {
        Deferred(Rc::new(f))
    }

    /// Evaluate this computation to a concrete value.
    pub fn render(&self, ctx: &mut EvalContext) -> Result<Value, HelperError> {
        (self.0)(ctx)
    }
}

impl Debug for Deferred {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("Deferred(..)")
    }
}

/// The unevaluated arguments of a `choice` construct.
///
/// `pick` stays unevaluated until the enclosing selection picks it; this is
/// what lets `random_choice` and `if` evaluate only the winning branch.
#[derive(Debug, Clone)]
pub struct ChoiceArgs {
    /// The candidate value, never evaluated unless selected.
    pub pick: Expr,

    /// Weight expression for weighted mode (`random_choice`).
    pub probability: Option<Expr>,

    /// Condition expression for conditional mode (`if`).
    pub when: Option<Expr>,
}

/// A resolved `(selector, pick)` pair.
///
/// `selector` is absent only for the final, unconditional entry of an `if`
/// list.
#[derive(Debug, Clone)]
pub struct ChoiceEntry {
    /// How this entry competes for selection, if at all.
    pub selector: Option<Selector>,

    /// The candidate value, still unevaluated.
    pub pick: Expr,
}

/// The selection criterion carried by a [`ChoiceEntry`].
#[derive(Debug, Clone)]
pub enum Selector {
    /// An integer weight (weighted mode).
    Weight(i64),

    /// A condition, still unevaluated (conditional mode).
    When(Expr),
}
