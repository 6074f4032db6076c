//! Template helpers for declarative data generation.
//!
//! This crate implements the helper functions a data-generation template
//! engine dispatches while rendering field definitions: weighted random
//! selection (`random_choice` with `choice` entries), conditional branching
//! (`if`), date construction and parsing, locale-aware fake values, and
//! object references.
//!
//! The selection helpers are lazy: candidate picks arrive as deferred
//! expressions and exactly the winning branch is evaluated. Losing branches
//! never run, so they can neither produce side effects nor consume
//! randomness.
//!
//! # Example
//!
//! ```
//! use fabricator::{CallArgs, EvalContext, Expr, HelperRegistry, Value};
//!
//! let registry = HelperRegistry::standard();
//! let mut ctx = EvalContext::from_seed(7);
//!
//! // if:
//! //   - choice: { when: "False", pick: A }
//! //   - choice: { pick: B }
//! let args = CallArgs::positional(vec![
//!     Expr::choice(Expr::lit("A"), None, Some(Expr::lit("False"))),
//!     Expr::choice(Expr::lit("B"), None, None),
//! ]);
//! let value = registry.call("if", &mut ctx, &args).unwrap();
//! assert_eq!(value, Value::from("B"));
//! ```

pub mod eval;
pub mod helpers;
pub mod types;

pub use eval::{CallArgs, EvalContext, HelperDef, HelperError, HelperRegistry};
pub use types::{ChoiceArgs, ChoiceEntry, Deferred, Expr, ObjectRow, Selector, Value};

/// Creates a `HashMap<String, Value>` of field variables from key-value
/// pairs.
///
/// Values are automatically converted via `Into<Value>`, so you can pass
/// integers, strings, dates, or `ObjectRow` values directly.
///
/// # Example
///
/// ```
/// use fabricator::{ObjectRow, field_vars};
///
/// let account = ObjectRow::builder().object_type("Account".to_string()).id(1).build();
/// let vars = field_vars! { "account" => account, "count" => 3 };
/// assert_eq!(vars.len(), 2);
/// ```
#[macro_export]
macro_rules! field_vars {
    {} => {
        ::std::collections::HashMap::<String, $crate::Value>::new()
    };
    { $($key:expr => $value:expr),+ $(,)? } => {
        {
            let mut map = ::std::collections::HashMap::<String, $crate::Value>::new();
            $(
                map.insert($key.to_string(), ::std::convert::Into::<$crate::Value>::into($value));
            )+
            map
        }
    };
}
