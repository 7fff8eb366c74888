//! Class hierarchy and member-name inspection

use crate::class::Class;
use crate::value::Value;
use rustc_hash::FxHashSet;

/// The class of a value, if it is an instance
pub fn class_of(value: &Value) -> Option<Class> {
    value.as_instance().map(|instance| instance.constructor().clone())
}

/// `class` followed by each ancestor up to and including the root
pub fn class_hierarchy(class: &Class) -> Vec<Class> {
    class.ancestors().cloned().collect()
}

/// Check if `value` is an instance of `class` or one of its subclasses
pub fn is_instance_of(value: &Value, class: &Class) -> bool {
    value
        .as_instance()
        .is_some_and(|instance| instance.is_instance_of(class))
}

/// Check if `class` is `ancestor` or inherits from it
pub fn is_subclass_of(class: &Class, ancestor: &Class) -> bool {
    class.is_subclass_of(ancestor)
}

/// Every member name visible on `class`, nearest declaration first
pub fn member_names(class: &Class) -> Vec<String> {
    let mut seen = FxHashSet::default();
    let mut names = Vec::new();
    for layer in class.ancestors() {
        for name in layer.members().names() {
            if seen.insert(name.as_str()) {
                names.push(name.clone());
            }
        }
    }
    names
}

/// Members `class` declares that shadow a member of an ancestor
pub fn overridden_members(class: &Class) -> Vec<String> {
    let Some(parent) = class.parent() else {
        return Vec::new();
    };
    class
        .members()
        .names()
        .iter()
        .filter(|name| parent.has_member(name))
        .cloned()
        .collect()
}
