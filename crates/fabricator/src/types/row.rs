use std::fmt::{Display, Formatter, Result as FmtResult};

use bon::Builder;
use serde::Serialize;

/// A generated object row that other fields can reference.
///
/// Rows carry the name of the object type they belong to and, once the host
/// engine has written them, a numeric identifier. Rows without an identifier
/// cannot be the target of a `reference` helper call.
///
/// # Example
///
/// ```
/// use fabricator::ObjectRow;
///
/// let account = ObjectRow::builder()
///     .object_type("Account".to_string())
///     .id(7)
///     .build();
///
/// assert_eq!(account.object_type(), "Account");
/// assert_eq!(account.id(), Some(7));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Builder)]
pub struct ObjectRow {
    /// Name of the object type this row belongs to.
    object_type: String,

    /// Identifier assigned by the host engine, if the row has been written.
    id: Option<u64>,
}

impl ObjectRow {
    /// Name of the object type this row belongs to.
    pub fn object_type(&self) -> &str {
        &self.object_type
    }

    /// The row's identifier, if it has one.
    pub fn id(&self) -> Option<u64> {
        self.id
    }

    /// Check whether this row carries an identifier.
    pub fn has_id(&self) -> bool {
        self.id.is_some()
    }
}

impl Display for ObjectRow {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self.id {
            Some(id) => write!(f, "{}({id})", self.object_type),
            None => write!(f, "{}(unsaved)", self.object_type),
        }
    }
}
