use rcbar_core::ElementId;
use rcbar_rebar::{Modifier, ReinforcementGroup};
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct GroupId;
}

/// User property holding the id of the element that created a group.
pub const PARENT_ELEMENT: &str = "PARENT_ELEMENT_ID";

/// User property holding the name of the method that created a group.
pub const CREATING_METHOD: &str = "CREATING_METHOD";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl PropertyValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<ElementId> for PropertyValue {
    fn from(id: ElementId) -> Self {
        Self::Int(id.value() as i64)
    }
}

/// Transactional store of reinforcement groups.
///
/// Calls report failure through their return values; it is up to the caller
/// to decide what a failed insert means.
pub trait HostModel {
    fn insert(&mut self, group: &ReinforcementGroup) -> Option<GroupId>;

    /// Attach a modifier to an inserted and committed group.
    fn insert_modifier(&mut self, id: GroupId, modifier: &Modifier) -> bool;

    fn commit(&mut self);

    fn delete(&mut self, id: GroupId) -> bool;

    /// Replace the stored group, modifiers included.
    fn modify(&mut self, id: GroupId, group: &ReinforcementGroup) -> bool;

    fn set_user_property(&mut self, id: GroupId, key: &str, value: PropertyValue) -> bool;

    fn get_user_property(&self, id: GroupId, key: &str) -> Option<PropertyValue>;

    fn groups(&self) -> Vec<GroupId>;

    fn group(&self, id: GroupId) -> Option<&ReinforcementGroup>;

    /// Groups tagged with `element` as their parent.
    fn children_of(&self, element: ElementId) -> Vec<GroupId> {
        let tag = PropertyValue::from(element);
        self.groups()
            .into_iter()
            .filter(|&id| self.get_user_property(id, PARENT_ELEMENT).as_ref() == Some(&tag))
            .collect()
    }

    /// Group of `element` created by `method`, if any.
    fn find_method(&self, element: ElementId, method: &str) -> Option<GroupId> {
        self.children_of(element).into_iter().find(|&id| {
            self.get_user_property(id, CREATING_METHOD)
                .as_ref()
                .and_then(PropertyValue::as_text)
                == Some(method)
        })
    }
}
