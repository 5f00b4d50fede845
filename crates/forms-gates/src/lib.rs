//! Access-control and restriction gates.
//!
//! A gate is a named, independently configurable check evaluated before a
//! submission may complete: eligibility (membership, allow-list, time
//! window) and duplicate prevention (IP, cookie, device fingerprint). Gates
//! return outcomes as values; the completion orchestrator runs them in the
//! form's configured order and short-circuits on the first reject or
//! interrupt.

mod gate;
pub mod gates;
mod registry;

pub use gate::{AccessGate, GateContext, GateError};
pub use registry::{GateRegistry, default_registry};
