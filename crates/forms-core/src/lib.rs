//! Completion orchestrator and submission value store.
//!
//! Ties the element types, gates, and actions together into the submission
//! state machine: containers validate while collecting, gates decide whether
//! the submission may complete, the completed transition happens at most
//! once, and actions run after it. Suspension (fingerprint computation,
//! double opt-in) spans requests; the resumption entry points live here too.

pub mod keys;
pub mod orchestrator;
pub mod value_store;

pub use orchestrator::{AdvanceOutcome, CompleteError, CompletionOutcome, Orchestrator};
pub use value_store::ValueStore;
