use std::collections::{BTreeMap, BTreeSet};

use log::{debug, warn};
use rcbar_core::Validate;
use rcbar_rebar::{Modifier, ReinforcementGroup};
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::host::{GroupId, HostModel, PropertyValue};

/// One host call, in the order it was made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Transaction {
    Insert { id: GroupId, name: String },
    InsertRejected { name: String },
    InsertModifier { id: GroupId, kind: String },
    Commit,
    Delete { id: GroupId },
    Modify { id: GroupId },
    SetProperty { id: GroupId, key: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredGroup {
    group: ReinforcementGroup,
    properties: BTreeMap<String, PropertyValue>,
    committed: bool,
}

/// In-memory host with a journal of every call.
///
/// Inserts are rejected for groups that fail validation, and for names
/// registered with [`MemoryModel::reject_inserts_of`]; edits likewise for
/// [`MemoryModel::reject_edits_of`]. Modifiers can only be attached to
/// committed groups.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryModel {
    groups: SlotMap<GroupId, StoredGroup>,
    journal: Vec<Transaction>,
    commits: usize,
    rejected: BTreeSet<String>,
    frozen: BTreeSet<String>,
}

impl MemoryModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later insert of a group called `name` fail.
    pub fn reject_inserts_of(&mut self, name: impl Into<String>) {
        self.rejected.insert(name.into());
    }

    /// Make every later edit of a group called `name` fail.
    pub fn reject_edits_of(&mut self, name: impl Into<String>) {
        self.frozen.insert(name.into());
    }

    pub fn journal(&self) -> &[Transaction] {
        &self.journal
    }

    pub fn commit_count(&self) -> usize {
        self.commits
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn is_committed(&self, id: GroupId) -> bool {
        self.groups.get(id).is_some_and(|g| g.committed)
    }

    /// Ids of stored groups named `name`.
    pub fn named(&self, name: &str) -> Vec<GroupId> {
        self.groups
            .iter()
            .filter(|(_, g)| g.group.name == name)
            .map(|(id, _)| id)
            .collect()
    }
}

impl HostModel for MemoryModel {
    fn insert(&mut self, group: &ReinforcementGroup) -> Option<GroupId> {
        if self.rejected.contains(&group.name) {
            self.journal.push(Transaction::InsertRejected {
                name: group.name.clone(),
            });
            return None;
        }
        if let Err(e) = group.validate() {
            warn!("host rejected group {}: {e}", group.name);
            self.journal.push(Transaction::InsertRejected {
                name: group.name.clone(),
            });
            return None;
        }
        let mut stored = group.clone();
        stored.modifiers.clear();
        let id = self.groups.insert(StoredGroup {
            group: stored,
            properties: BTreeMap::new(),
            committed: false,
        });
        self.journal.push(Transaction::Insert {
            id,
            name: group.name.clone(),
        });
        Some(id)
    }

    fn insert_modifier(&mut self, id: GroupId, modifier: &Modifier) -> bool {
        let Some(stored) = self.groups.get_mut(id) else {
            return false;
        };
        if !stored.committed {
            warn!("modifier for uncommitted group {}", stored.group.name);
            return false;
        }
        if modifier.validate().is_err() {
            return false;
        }
        stored.group.modifiers.push(modifier.clone());
        self.journal.push(Transaction::InsertModifier {
            id,
            kind: modifier.kind_name().to_string(),
        });
        true
    }

    fn commit(&mut self) {
        for stored in self.groups.values_mut() {
            stored.committed = true;
        }
        self.commits += 1;
        self.journal.push(Transaction::Commit);
        debug!("commit #{}", self.commits);
    }

    fn delete(&mut self, id: GroupId) -> bool {
        let removed = self.groups.remove(id).is_some();
        if removed {
            self.journal.push(Transaction::Delete { id });
        }
        removed
    }

    fn modify(&mut self, id: GroupId, group: &ReinforcementGroup) -> bool {
        if self.frozen.contains(&group.name) || group.validate().is_err() {
            return false;
        }
        let Some(stored) = self.groups.get_mut(id) else {
            return false;
        };
        stored.group = group.clone();
        self.journal.push(Transaction::Modify { id });
        true
    }

    fn set_user_property(&mut self, id: GroupId, key: &str, value: PropertyValue) -> bool {
        let Some(stored) = self.groups.get_mut(id) else {
            return false;
        };
        stored.properties.insert(key.to_string(), value);
        self.journal.push(Transaction::SetProperty {
            id,
            key: key.to_string(),
        });
        true
    }

    fn get_user_property(&self, id: GroupId, key: &str) -> Option<PropertyValue> {
        self.groups.get(id)?.properties.get(key).cloned()
    }

    fn groups(&self) -> Vec<GroupId> {
        self.groups.keys().collect()
    }

    fn group(&self, id: GroupId) -> Option<&ReinforcementGroup> {
        self.groups.get(id).map(|g| &g.group)
    }
}
