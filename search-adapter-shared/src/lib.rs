//! # Search Adapter Shared
//!
//! Types shared between the adapter repository and the binary: the ORM-side
//! query criteria, document identifiers and the records handed back to
//! callers.

pub mod criteria;
pub mod errors;
pub mod id;
pub mod record;

pub use criteria::{Criteria, Predicate, SortClause, SortDirection, SCRIPT_SORT_KEY};
pub use errors::CriteriaError;
pub use id::DocumentId;
pub use record::{Record, ID_FIELD, SCORE_FIELD};
