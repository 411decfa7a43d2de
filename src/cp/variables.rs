//! Variable space builder.
//!
//! One boolean per (registration × room × timeslot × eligible teacher).
//! Registrations whose subject has no eligible teacher contribute nothing;
//! diagnostics reports them separately.

use std::collections::HashMap;

use tracing::debug;

use super::model::VarId;
use crate::models::{DomainData, VariableKey};

/// The decision variables of one request, keyed by their full identity.
#[derive(Debug, Clone, Default)]
pub struct VariableSpace {
    keys: Vec<VariableKey>,
    index: HashMap<VariableKey, VarId>,
}

impl VariableSpace {
    /// Builds the variable space for a domain bundle.
    ///
    /// Iteration order: registrations, then rooms, then timeslots, then
    /// eligible teachers. A key seen twice (duplicate registration) is
    /// created once.
    pub fn build(data: &DomainData) -> Self {
        let index = data.index();
        let mut space = Self::default();

        for reg in &data.register_map {
            let teachers = index.eligible_teachers(&reg.subject_id);
            if teachers.is_empty() {
                debug!(
                    group = %reg.group_id,
                    subject = %reg.subject_id,
                    "no eligible teacher, skipping"
                );
                continue;
            }
            for room in &data.rooms {
                for &slot in &data.timeslots {
                    for &teacher in teachers {
                        space.insert(VariableKey::new(
                            reg.group_id.as_str(),
                            reg.subject_id.as_str(),
                            teacher,
                            room.id.as_str(),
                            slot,
                        ));
                    }
                }
            }
        }

        space
    }

    /// Adds a key, returning its handle. Existing keys keep their handle.
    pub fn insert(&mut self, key: VariableKey) -> VarId {
        if let Some(&id) = self.index.get(&key) {
            return id;
        }
        let id = VarId(self.keys.len());
        self.index.insert(key.clone(), id);
        self.keys.push(key);
        id
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Handle for a key.
    pub fn get(&self, key: &VariableKey) -> Option<VarId> {
        self.index.get(key).copied()
    }

    /// Key of a handle.
    pub fn key(&self, id: VarId) -> &VariableKey {
        &self.keys[id.0]
    }

    /// All handles, in creation order.
    pub fn ids(&self) -> impl Iterator<Item = VarId> + '_ {
        (0..self.keys.len()).map(VarId)
    }

    /// All (handle, key) pairs, in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (VarId, &VariableKey)> {
        self.keys.iter().enumerate().map(|(i, k)| (VarId(i), k))
    }
}
