//! Interface definitions for the search backend.
//!
//! The adapter only depends on two capability sets: administering the index
//! and operating on documents. Both are traits so that the concrete client
//! is injected and can be swapped for a mock in tests.

mod document_backend;
mod index_administration;

pub use document_backend::DocumentBackend;
pub use index_administration::IndexAdministration;
