//! Gate registry.
//!
//! Holds the available gates; the order they run in comes from the form's
//! configuration, not from registration order.

use std::sync::OnceLock;

use crate::gate::AccessGate;
use crate::gates::{
    Challenge, CookieDedup, FingerprintDedup, IpDedup, Members, SelectedMembers, TimeWindow,
};

pub struct GateRegistry {
    gates: Vec<Box<dyn AccessGate>>,
}

impl GateRegistry {
    pub fn new() -> Self {
        Self { gates: Vec::new() }
    }

    /// Register a gate, replacing any previous registration of the same slug.
    pub fn register(&mut self, gate: Box<dyn AccessGate>) {
        self.gates.retain(|existing| existing.slug() != gate.slug());
        self.gates.push(gate);
    }

    pub fn get(&self, slug: &str) -> Option<&dyn AccessGate> {
        self.gates
            .iter()
            .find(|gate| gate.slug() == slug)
            .map(Box::as_ref)
    }

    pub fn slugs(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.gates.iter().map(|gate| gate.slug())
    }

    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }
}

impl Default for GateRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(Members));
        registry.register(Box::new(SelectedMembers));
        registry.register(Box::new(IpDedup));
        registry.register(Box::new(CookieDedup));
        registry.register(Box::new(FingerprintDedup));
        registry.register(Box::new(TimeWindow));
        registry.register(Box::new(Challenge));
        registry
    }
}

/// Shared registry with all built-in gates, built once.
pub fn default_registry() -> &'static GateRegistry {
    static REGISTRY: OnceLock<GateRegistry> = OnceLock::new();
    REGISTRY.get_or_init(GateRegistry::default)
}
