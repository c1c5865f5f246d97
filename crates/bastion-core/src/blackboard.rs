//! The per-run shared observation log.

use std::collections::BTreeMap;

use bastion_contracts::trace::Outputs;

/// Append-only store of each agent's observations for one run.
///
/// The coordinator creates a fresh blackboard per run and drops it when the
/// run ends. Agents only ever receive `&Blackboard` (read) in `act()` and
/// `&mut Blackboard` (append) in `observe()`; nothing can remove or rewrite a
/// stored record.
#[derive(Debug, Default)]
pub struct Blackboard {
    store: BTreeMap<String, Vec<Outputs>>,
}

impl Blackboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `data` to `agent`'s log, creating the log on first write.
    pub fn append_observation(&mut self, agent: &str, data: Outputs) {
        self.store.entry(agent.to_string()).or_default().push(data);
    }

    /// Every agent's observations, keyed by agent name.
    pub fn all_observations(&self) -> &BTreeMap<String, Vec<Outputs>> {
        &self.store
    }

    /// `agent`'s observations in append order; empty if it has written none.
    pub fn observations_for(&self, agent: &str) -> &[Outputs] {
        self.store.get(agent).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of observation records across all agents.
    pub fn len(&self) -> usize {
        self.store.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}
