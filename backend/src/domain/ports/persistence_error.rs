//! Failure vocabulary shared by every repository port.

use crate::domain::validation::ValidationError;

use super::define_port_error;

define_port_error! {
    /// Errors surfaced by repository adapters.
    pub enum PersistenceError {
        /// No row exists for the requested key.
        NotFound { entity: String, id: String } => "{entity} {id} not found",
        /// A uniqueness rule rejected the write.
        Duplicate { constraint: String } => "unique constraint violated: {constraint}",
        /// The row references a parent that does not exist (or no longer
        /// does). `field` names the referencing column.
        MissingReference { field: String } => "referenced {field} does not exist",
        /// A patch failed field validation; nothing was written.
        Validation { reason: ValidationError } => "validation failed: {reason}",
        /// Storage-level failure unrelated to caller input.
        Query { message: String } => "persistence query failed: {message}",
    }
}
