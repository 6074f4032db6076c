//! Template helper implementations.
//!
//! Each submodule implements the helpers registered under fixed names in
//! [`crate::eval::HelperRegistry`]. The `choice` module is the core: lazy
//! weighted and conditional selection. The rest are leaf utilities.

pub mod choice;
pub mod dates;
pub mod fakes;
pub mod numbers;
pub mod reference;
