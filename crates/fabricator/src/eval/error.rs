//! Error types for template helper evaluation.

use thiserror::Error;

/// An error raised while evaluating a template helper.
///
/// Structural errors describe a malformed helper invocation; data errors
/// describe input values that cannot be interpreted. Both are fatal for the
/// enclosing field-render operation and propagate unchanged.
#[derive(Debug, Error)]
pub enum HelperError {
    // ------------------------------------------------------------------
    // Structural errors
    // ------------------------------------------------------------------
    /// A selection helper was invoked with no choices at all.
    #[error("no choices supplied to '{helper}'")]
    EmptyChoices { helper: &'static str },

    /// A non-final `if` entry is missing its when-clause.
    #[error("every choice except the last one must have a when-clause")]
    MissingWhen,

    /// A selection helper expected a `choice` construct.
    #[error("'{helper}' expected a choice entry, found {found}")]
    ExpectedChoice { helper: &'static str, found: &'static str },

    /// A weighted-mode entry carries no probability.
    #[error("choice entries inside a weighted 'random_choice' must carry a probability")]
    MissingProbability,

    /// A `choice` construct appeared outside `random_choice` or `if`.
    #[error("'choice' is only meaningful inside 'random_choice' or 'if'")]
    ChoiceOutsideSelection,

    /// No helper is registered under the requested name.
    #[error("unknown template helper '{name}'")]
    UnknownHelper { name: String },

    /// A required helper argument was not supplied.
    #[error("'{helper}' is missing its '{name}' argument")]
    MissingArgument { helper: &'static str, name: &'static str },

    // ------------------------------------------------------------------
    // Data errors
    // ------------------------------------------------------------------
    /// A weight expression did not evaluate to an integer.
    #[error("cannot interpret '{value}' as a probability weight")]
    InvalidWeight { value: String },

    /// The weighted sampler rejected the weight set (all zero or negative).
    #[error("weighted selection failed: {reason}")]
    WeightedSelection { reason: String },

    /// Date components out of calendar range (e.g. month 13).
    #[error("invalid date: year {year}, month {month}, day {day}")]
    InvalidDate { year: i64, month: i64, day: i64 },

    /// Time components out of range (e.g. hour 25).
    #[error("invalid time: {hour:02}:{minute:02}:{second:02}.{microsecond:06}")]
    InvalidTime { hour: i64, minute: i64, second: i64, microsecond: i64 },

    /// A free-text date bound could not be parsed.
    #[error("cannot parse '{value}' as a date")]
    UnparseableDate { value: String },

    /// A locale string could not be parsed.
    #[error("invalid locale '{locale}'")]
    InvalidLocale { locale: String },

    /// `i18n_fake` was asked for a generator that does not exist.
    #[error("unknown fake kind '{kind}'{}", format_suggestions(suggestions))]
    UnknownFakeKind { kind: String, suggestions: Vec<String> },

    /// `random_number` was called with min greater than max.
    #[error("empty random range: min {min} is greater than max {max}")]
    InvertedRange { min: i64, max: i64 },

    /// A value could not be converted to an integer.
    #[error("cannot convert '{value}' to an integer")]
    NotAnInteger { value: String },

    /// `reference` named a field variable that is not in scope.
    #[error("no field variable named '{name}'")]
    UnknownFieldVar { name: String },

    /// `reference` resolved to something without an identifier.
    #[error("cannot reference {value}: it has no id")]
    NotReferenceable { value: String },
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(", did you mean: {}?", suggestions.join(", "))
    }
}

/// Compute typo suggestions using Levenshtein distance.
///
/// Distance cutoff is 1 for names of three characters or fewer, 2 otherwise;
/// at most three suggestions, closest first.
pub fn compute_suggestions(name: &str, available: &[&str]) -> Vec<String> {
    let max_distance = if name.len() <= 3 { 1 } else { 2 };
    let mut suggestions: Vec<(usize, String)> = available
        .iter()
        .filter_map(|candidate| {
            let dist = strsim::levenshtein(name, candidate);
            if dist <= max_distance && dist > 0 {
                Some((dist, (*candidate).to_string()))
            } else {
                None
            }
        })
        .collect();

    suggestions.sort_by_key(|(dist, _)| *dist);
    suggestions.into_iter().take(3).map(|(_, s)| s).collect()
}
