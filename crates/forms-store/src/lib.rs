//! Storage collaborator interface for the forms submission engine.
//!
//! The engine never talks to a database directly; it consumes the
//! [`SubmissionStore`] trait for persistence, prior-submission lookups used
//! by duplicate prevention, and flat form-scoped option values. A reference
//! in-memory backend is provided for tests and embedded use.

mod error;
mod memory;
mod traits;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use traits::SubmissionStore;
