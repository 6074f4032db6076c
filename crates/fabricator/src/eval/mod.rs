//! Evaluation support for template helpers.
//!
//! This module provides the evaluation context that renders deferred
//! expressions, the error taxonomy shared by all helpers, and the registry
//! through which the host engine dispatches helper calls by name.

mod context;
mod error;
mod registry;

pub use context::EvalContext;
pub use error::{HelperError, compute_suggestions};
pub use registry::{CallArgs, HelperDef, HelperFn, HelperRegistry};
