use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use shared::domain::{ControlKind, NodeId};
use tracing::debug;

use crate::contract::{PropertySet, PropsPatch, WidgetContract, WidgetProps};

#[derive(Clone)]
struct RegistryEntry {
    contract: Arc<dyn WidgetContract>,
    label: String,
}

impl RegistryEntry {
    fn new(contract: Arc<dyn WidgetContract>) -> Self {
        let label = contract
            .get_props()
            .title()
            .unwrap_or_else(|| contract.kind().type_name().to_string());
        Self { contract, label }
    }
}

/// Directory of placed controls, keyed by node. Owned by an editor session
/// and shared by handle; there is at most one entry per node.
#[derive(Clone, Default)]
pub struct WidgetRegistry {
    entries: Arc<Mutex<HashMap<NodeId, RegistryEntry>>>,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores or replaces the contract for `node`.
    pub fn register(&self, node: NodeId, contract: Arc<dyn WidgetContract>) {
        let entry = RegistryEntry::new(contract);
        let replaced = self.lock().insert(node, entry).is_some();
        debug!(%node, replaced, "registry entry stored");
    }

    /// Replaces an existing entry. Returns `false`, storing nothing, when the
    /// node has already been removed.
    pub fn replace(&self, node: NodeId, contract: Arc<dyn WidgetContract>) -> bool {
        let replacement = RegistryEntry::new(contract);
        match self.lock().get_mut(&node) {
            Some(entry) => {
                *entry = replacement;
                debug!(%node, "registry entry replaced");
                true
            }
            None => false,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<NodeId, RegistryEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn contract(&self, node: NodeId) -> Option<Arc<dyn WidgetContract>> {
        self.lock().get(&node).map(|entry| entry.contract.clone())
    }

    /// Property panel read. A missing entry reads as an empty set.
    pub fn get_props(&self, node: NodeId) -> PropertySet {
        self.props(node)
            .map(|props| props.to_property_set())
            .unwrap_or_default()
    }

    /// Property panel write. A missing entry makes this a no-op.
    pub fn set_props(&self, node: NodeId, patch: &PropertySet) {
        let Some(contract) = self.contract(node) else {
            debug!(%node, "set_props on unregistered node ignored");
            return;
        };
        let patch = PropsPatch::from_property_set(contract.kind(), patch);
        contract.set_props(&patch);
    }

    pub fn props(&self, node: NodeId) -> Option<WidgetProps> {
        self.contract(node).map(|contract| contract.get_props())
    }

    pub fn apply(&self, node: NodeId, patch: &PropsPatch) {
        if let Some(contract) = self.contract(node) {
            contract.set_props(patch);
        }
    }

    /// Display label recorded at registration. Not part of the property set.
    pub fn label(&self, node: NodeId) -> Option<String> {
        self.lock().get(&node).map(|entry| entry.label.clone())
    }

    pub fn kind(&self, node: NodeId) -> Option<ControlKind> {
        self.contract(node).map(|contract| contract.kind())
    }

    pub fn remove(&self, node: NodeId) -> bool {
        self.lock().remove(&node).is_some()
    }

    pub fn nodes(&self) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = self.lock().keys().copied().collect();
        nodes.sort();
        nodes
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "tests/registry_tests.rs"]
mod tests;
