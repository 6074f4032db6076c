//! Weighted and conditional selection helpers.
//!
//! This is the core of the crate: `random_choice` and `if` pick exactly one
//! branch of a field definition and evaluate only that branch. Candidate
//! picks stay deferred until selection, so losing branches can never produce
//! side effects or consume randomness.

use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};

use crate::eval::{EvalContext, HelperError};
use crate::types::{ChoiceArgs, ChoiceEntry, Expr, Selector, Value};

/// Parse a weight expression into an integer weight.
///
/// For constructs like:
///
/// ```yaml
/// - choice:
///     probability: 60%
///     pick: Closed Won
/// ```
///
/// the trailing `%` is purely cosmetic: `"60%"`, `"60"` and `60` are the
/// same weight.
pub fn parse_weight(ctx: &mut EvalContext, raw: &Expr) -> Result<i64, HelperError> {
    let value = ctx.evaluate(raw)?;
    match &value {
        Value::Number(n) => Ok(*n),
        Value::String(s) => {
            let stripped = s.trim().trim_end_matches('%');
            stripped
                .parse::<i64>()
                .map_err(|_| HelperError::InvalidWeight { value: s.clone() })
        }
        other => Err(HelperError::InvalidWeight { value: other.to_string() }),
    }
}

/// Select one entry from a weighted set with a single draw.
///
/// The probability of entry `i` is `weight_i / sum(weights)`. Zero-weight
/// entries are legal and never selected. An empty set, an all-zero set, or a
/// negative weight is rejected by the underlying distribution and surfaces
/// as a data error.
///
/// Returns the winner unevaluated; the caller evaluates it, and only it.
pub fn weighted_choice<'a, T, R: Rng + ?Sized>(
    rng: &mut R,
    entries: &'a [(i64, T)],
) -> Result<&'a T, HelperError> {
    let dist = WeightedIndex::new(entries.iter().map(|(weight, _)| *weight))
        .map_err(|e| HelperError::WeightedSelection { reason: e.to_string() })?;
    let index = dist.sample(rng);
    Ok(&entries[index].1)
}

/// Resolve a `choice` construct into its `(selector, pick)` pair.
///
/// The probability, if present, is parsed through [`parse_weight`] here;
/// the when-condition passes through unevaluated (only `if` evaluates it),
/// and `pick` is never touched.
pub fn resolve_choice(
    ctx: &mut EvalContext,
    args: &ChoiceArgs,
) -> Result<ChoiceEntry, HelperError> {
    let selector = if let Some(probability) = &args.probability {
        Some(Selector::Weight(parse_weight(ctx, probability)?))
    } else {
        args.when.clone().map(Selector::When)
    };
    Ok(ChoiceEntry { selector, pick: args.pick.clone() })
}

/// The `random_choice` helper.
///
/// Two modes, detected from the first entry:
/// - a `choice` construct switches on weighted mode: every entry must then
///   be a `choice` carrying a probability, and one pick is selected by
///   weight;
/// - anything else is uniform mode: one entry of the flat list is selected
///   uniformly.
///
/// Exactly the winning entry is evaluated, once, after selection.
pub fn random_choice(ctx: &mut EvalContext, choices: &[Expr]) -> Result<Value, HelperError> {
    let Some(first) = choices.first() else {
        return Err(HelperError::EmptyChoices { helper: "random_choice" });
    };

    let selected = if matches!(first, Expr::Choice(_)) {
        let mut entries = Vec::with_capacity(choices.len());
        for expr in choices {
            let Expr::Choice(args) = expr else {
                return Err(HelperError::ExpectedChoice {
                    helper: "random_choice",
                    found: expr.describe(),
                });
            };
            let entry = resolve_choice(ctx, args)?;
            let Some(Selector::Weight(weight)) = entry.selector else {
                return Err(HelperError::MissingProbability);
            };
            entries.push((weight, entry.pick));
        }
        weighted_choice(ctx.rng_mut(), &entries)?.clone()
    } else {
        let index = ctx.rng_mut().gen_range(0..choices.len());
        choices[index].clone()
    };

    ctx.evaluate(&selected)
}

/// The `if` helper.
///
/// Resolves every entry's `(selector, pick)` pair eagerly (the picks stay
/// deferred), validates that only the final entry may omit its when-clause,
/// and selects the first entry whose condition is true, falling back to the
/// last entry's pick. Exactly the selected pick is evaluated.
///
/// Selection is deterministic: first-true-wins, last-as-default. Only the
/// value inside the winning branch may be random.
pub fn conditional(ctx: &mut EvalContext, choices: &[Expr]) -> Result<Value, HelperError> {
    if choices.is_empty() {
        return Err(HelperError::EmptyChoices { helper: "if" });
    }

    let mut entries = Vec::with_capacity(choices.len());
    for expr in choices {
        let Expr::Choice(args) = expr else {
            return Err(HelperError::ExpectedChoice { helper: "if", found: expr.describe() });
        };
        entries.push(resolve_choice(ctx, args)?);
    }

    let last = entries.len() - 1;
    if entries[..last].iter().any(|entry| entry.selector.is_none()) {
        return Err(HelperError::MissingWhen);
    }

    let mut winner: Option<&Expr> = None;
    for entry in &entries {
        let truthy = match &entry.selector {
            // Absent selector only ever occurs on the last entry, which is
            // the default; it never wins on its own condition.
            None => false,
            // A probability used in if-position coerces by truthiness.
            Some(Selector::Weight(weight)) => *weight != 0,
            Some(Selector::When(when)) => render_boolean(ctx, when)?,
        };
        if truthy {
            winner = Some(&entry.pick);
            break;
        }
    }

    let pick = winner.unwrap_or(&entries[last].pick).clone();
    ctx.evaluate(&pick)
}

/// Evaluate a condition expression and coerce the result to a boolean.
pub fn render_boolean(ctx: &mut EvalContext, expr: &Expr) -> Result<bool, HelperError> {
    let value = ctx.evaluate(expr)?;
    Ok(coerce_boolean(&value))
}

/// Interpret a rendered value as a boolean.
///
/// Strings go through literal-syntax parsing first (`"True"`, `"False"`,
/// `"None"`, numeric literals) and fall back to truthiness when they are
/// not valid literal syntax: `"hello"` is true, `""` is false.
pub fn coerce_boolean(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => *n != 0,
        Value::Float(f) => *f != 0.0,
        Value::String(s) => parse_boolean_literal(s).unwrap_or(!s.is_empty()),
        Value::Date(_) | Value::DateTime(_) | Value::Row(_) => true,
    }
}

fn parse_boolean_literal(s: &str) -> Option<bool> {
    let trimmed = s.trim();
    match trimmed {
        "" => Some(false),
        "True" | "true" => Some(true),
        "False" | "false" => Some(false),
        "None" | "null" => Some(false),
        _ => {
            if let Ok(n) = trimmed.parse::<i64>() {
                return Some(n != 0);
            }
            if let Ok(f) = trimmed.parse::<f64>() {
                return Some(f != 0.0);
            }
            None
        }
    }
}
