//! Helper registry mapping template function names to implementations.
//!
//! Laziness is a declared capability, not ad-hoc behavior: each registered
//! helper states whether its arguments arrive pre-evaluated (`eager_args`)
//! or as deferred expressions. The dispatcher consumes that flag; helpers
//! themselves never need to know how they were registered.

use std::collections::BTreeMap;

use crate::eval::{EvalContext, HelperError};
use crate::helpers::{choice, dates, fakes, numbers, reference};
use crate::types::{Expr, Value};

/// Arguments of one helper invocation, positional and named.
///
/// Arguments are carried as expressions; whether they reach the helper
/// evaluated or deferred is decided by the helper's [`HelperDef`].
#[derive(Debug, Clone, Default)]
pub struct CallArgs {
    positional: Vec<Expr>,
    named: Vec<(String, Expr)>,
}

impl CallArgs {
    /// An empty argument list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a list of positional expressions.
    pub fn positional(exprs: Vec<Expr>) -> Self {
        Self { positional: exprs, named: Vec::new() }
    }

    /// Append a positional argument.
    pub fn arg(mut self, expr: Expr) -> Self {
        self.positional.push(expr);
        self
    }

    /// Append a named argument.
    pub fn named_arg(mut self, name: impl Into<String>, expr: Expr) -> Self {
        self.named.push((name.into(), expr));
        self
    }

    /// Look up a named argument.
    pub fn named(&self, name: &str) -> Option<&Expr> {
        self.named.iter().find(|(n, _)| n == name).map(|(_, e)| e)
    }

    /// Look up an argument by position, falling back to its name.
    pub fn at(&self, index: usize, name: &str) -> Option<&Expr> {
        self.positional.get(index).or_else(|| self.named(name))
    }

    /// Like [`CallArgs::at`], but a missing argument is a structural error.
    pub fn require(
        &self,
        helper: &'static str,
        index: usize,
        name: &'static str,
    ) -> Result<&Expr, HelperError> {
        self.at(index, name).ok_or(HelperError::MissingArgument { helper, name })
    }

    /// All positional arguments, in order.
    pub fn list(&self) -> &[Expr] {
        &self.positional
    }

    /// Evaluate every argument down to a literal.
    ///
    /// Used by the dispatcher for helpers registered with `eager_args`.
    fn evaluated(&self, ctx: &mut EvalContext) -> Result<CallArgs, HelperError> {
        let positional = self
            .positional
            .iter()
            .map(|e| Ok(Expr::Literal(ctx.evaluate(e)?)))
            .collect::<Result<Vec<_>, HelperError>>()?;
        let named = self
            .named
            .iter()
            .map(|(n, e)| Ok((n.clone(), Expr::Literal(ctx.evaluate(e)?))))
            .collect::<Result<Vec<_>, HelperError>>()?;
        Ok(CallArgs { positional, named })
    }
}

/// Signature shared by all registered helpers.
///
/// Helpers return an [`Expr`]: most produce a concrete `Literal`, while
/// `choice` produces the construct consumed by its enclosing selection.
pub type HelperFn = fn(&mut EvalContext, &CallArgs) -> Result<Expr, HelperError>;

/// One registered helper with its declared argument contract.
pub struct HelperDef {
    name: &'static str,
    eager_args: bool,
    run: HelperFn,
}

impl HelperDef {
    /// The name this helper is registered under.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the dispatcher evaluates arguments before invocation.
    pub fn eager_args(&self) -> bool {
        self.eager_args
    }
}

/// Registry of template helpers, keyed by their fixed names.
pub struct HelperRegistry {
    helpers: BTreeMap<&'static str, HelperDef>,
}

impl HelperRegistry {
    /// The standard helper set: `choice`, `random_choice`, `if`, `date`,
    /// `datetime`, `date_between`, `i18n_fake`, `random_number`,
    /// `reference`, and `int`.
    pub fn standard() -> Self {
        let mut registry = Self { helpers: BTreeMap::new() };
        // The three selection helpers receive deferred arguments.
        registry.register("choice", false, helper_choice);
        registry.register("random_choice", false, helper_random_choice);
        registry.register("if", false, helper_if);
        registry.register("date", true, helper_date);
        registry.register("datetime", true, helper_datetime);
        registry.register("date_between", true, helper_date_between);
        registry.register("i18n_fake", true, helper_i18n_fake);
        registry.register("random_number", true, helper_random_number);
        registry.register("reference", true, helper_reference);
        registry.register("int", true, helper_int);
        registry
    }

    fn register(&mut self, name: &'static str, eager_args: bool, run: HelperFn) {
        self.helpers.insert(name, HelperDef { name, eager_args, run });
    }

    /// Look up a helper definition by name.
    pub fn get(&self, name: &str) -> Option<&HelperDef> {
        self.helpers.get(name)
    }

    /// All registered helper names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.helpers.keys().copied()
    }

    /// Invoke a helper, returning its raw expression result.
    ///
    /// This is the entry point for nested calls: a `choice` invocation
    /// returns its construct here so the enclosing `random_choice`/`if`
    /// can resolve it lazily.
    pub fn eval_call(
        &self,
        name: &str,
        ctx: &mut EvalContext,
        args: &CallArgs,
    ) -> Result<Expr, HelperError> {
        let def = self
            .helpers
            .get(name)
            .ok_or_else(|| HelperError::UnknownHelper { name: name.to_string() })?;
        if def.eager_args {
            let evaluated = args.evaluated(ctx)?;
            (def.run)(ctx, &evaluated)
        } else {
            (def.run)(ctx, args)
        }
    }

    /// Invoke a helper as a field value, evaluating its result.
    ///
    /// A helper whose result is still a `choice` construct has no value of
    /// its own at the top level; that is a structural error.
    pub fn call(
        &self,
        name: &str,
        ctx: &mut EvalContext,
        args: &CallArgs,
    ) -> Result<Value, HelperError> {
        let result = self.eval_call(name, ctx, args)?;
        ctx.evaluate(&result)
    }
}

// ----------------------------------------------------------------------
// Registered wrappers
// ----------------------------------------------------------------------

fn helper_choice(_ctx: &mut EvalContext, args: &CallArgs) -> Result<Expr, HelperError> {
    let pick = args.require("choice", 0, "pick")?.clone();
    let probability = args.named("probability").cloned();
    let when = args.named("when").cloned();
    Ok(Expr::choice(pick, probability, when))
}

fn helper_random_choice(ctx: &mut EvalContext, args: &CallArgs) -> Result<Expr, HelperError> {
    choice::random_choice(ctx, args.list()).map(Expr::Literal)
}

fn helper_if(ctx: &mut EvalContext, args: &CallArgs) -> Result<Expr, HelperError> {
    choice::conditional(ctx, args.list()).map(Expr::Literal)
}

fn helper_date(ctx: &mut EvalContext, args: &CallArgs) -> Result<Expr, HelperError> {
    let year = ctx.evaluate(args.require("date", 0, "year")?)?;
    let month = ctx.evaluate(args.require("date", 1, "month")?)?;
    let day = ctx.evaluate(args.require("date", 2, "day")?)?;
    dates::date(&year, &month, &day).map(Expr::Literal)
}

fn helper_datetime(ctx: &mut EvalContext, args: &CallArgs) -> Result<Expr, HelperError> {
    let year = ctx.evaluate(args.require("datetime", 0, "year")?)?;
    let month = ctx.evaluate(args.require("datetime", 1, "month")?)?;
    let day = ctx.evaluate(args.require("datetime", 2, "day")?)?;
    let mut time = [Value::Number(0), Value::Number(0), Value::Number(0), Value::Number(0)];
    for (slot, name) in ["hour", "minute", "second", "microsecond"].iter().enumerate() {
        if let Some(expr) = args.at(3 + slot, name) {
            time[slot] = ctx.evaluate(expr)?;
        }
    }
    let [hour, minute, second, microsecond] = &time;
    dates::datetime(&year, &month, &day, hour, minute, second, microsecond).map(Expr::Literal)
}

fn helper_date_between(ctx: &mut EvalContext, args: &CallArgs) -> Result<Expr, HelperError> {
    let start = ctx.evaluate(args.require("date_between", 0, "start_date")?)?;
    let end = ctx.evaluate(args.require("date_between", 1, "end_date")?)?;
    dates::date_between(ctx, &start, &end).map(Expr::Literal)
}

fn helper_i18n_fake(ctx: &mut EvalContext, args: &CallArgs) -> Result<Expr, HelperError> {
    let locale = ctx.evaluate(args.require("i18n_fake", 0, "locale")?)?;
    let kind = ctx.evaluate(args.require("i18n_fake", 1, "fake")?)?;
    fakes::i18n_fake(ctx, &locale, &kind).map(Expr::Literal)
}

fn helper_random_number(ctx: &mut EvalContext, args: &CallArgs) -> Result<Expr, HelperError> {
    let min = ctx.evaluate(args.require("random_number", 0, "min")?)?;
    let max = ctx.evaluate(args.require("random_number", 1, "max")?)?;
    numbers::random_number(ctx, &min, &max).map(Expr::Literal)
}

fn helper_reference(ctx: &mut EvalContext, args: &CallArgs) -> Result<Expr, HelperError> {
    let target = ctx.evaluate(args.require("reference", 0, "x")?)?;
    reference::reference(ctx, &target).map(Expr::Literal)
}

fn helper_int(ctx: &mut EvalContext, args: &CallArgs) -> Result<Expr, HelperError> {
    let value = ctx.evaluate(args.require("int", 0, "value")?)?;
    numbers::int(&value).map(Expr::Literal)
}
