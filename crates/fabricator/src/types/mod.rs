//! Core value and expression types shared by all template helpers.

mod expr;
mod row;
mod value;

pub use expr::{ChoiceArgs, ChoiceEntry, Deferred, Expr, Selector};
pub use row::ObjectRow;
pub use value::Value;
