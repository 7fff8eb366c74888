//! Class construction from descriptions
//!
//! [`TypeBuilder`] turns a [`Description`] into a [`Class`] chained to a parent:
//!
//! 1. every member is checked in declaration order: arrays, records and
//!    instances are only allowed under `$static`, which accepts any value
//! 2. functions declaring `$super` first are wrapped so each call receives the
//!    parent's implementation of the same name (see [`crate::delegate`])
//! 3. the resulting values form the new class's member layer
//!
//! Any failure aborts the build before the class exists, so a partially built
//! class is never observable.

use crate::class::{Class, MemberLayer};
use crate::defaults::{ANONYMOUS_CLASS_NAME, STATIC_KEY};
use crate::delegate;
use crate::description::Description;
use crate::error::{ClassError, ClassResult};
use crate::signature;
use crate::value::Value;
use tracing::debug;

/// Builder for a class extending `parent`
#[derive(Debug, Clone)]
pub struct TypeBuilder<'p> {
    parent: &'p Class,
    deferred: bool,
}

impl<'p> TypeBuilder<'p> {
    /// Create a builder for a subclass of `parent`
    pub fn new(parent: &'p Class) -> Self {
        Self {
            parent,
            deferred: false,
        }
    }

    /// Mark the class so that construction does not run `initialize`
    pub fn deferred(mut self) -> Self {
        self.deferred = true;
        self
    }

    /// Build the class
    pub fn build(self, description: Description) -> ClassResult<Class> {
        let (name, declared) = description.into_parts();
        let name = name.unwrap_or_else(|| ANONYMOUS_CLASS_NAME.to_string());

        let mut members = MemberLayer::new();
        for (member, value) in declared {
            let value = self.prepare_member(&member, value)?;
            members.insert(member, value);
        }

        let member_count = members.len();
        let class = Class::from_parts(name, Some(self.parent.clone()), members, self.deferred);

        debug!(
            class = %class.name(),
            id = class.id().0,
            parent = %self.parent.name(),
            members = member_count,
            deferred = self.deferred,
            "defined class"
        );

        Ok(class)
    }

    fn prepare_member(&self, name: &str, value: Value) -> ClassResult<Value> {
        match value {
            _ if name == STATIC_KEY => Ok(value),
            value if value.is_object() => Err(ClassError::PropertyType {
                prop: name.to_string(),
            }),
            Value::Function(function) if signature::requests_delegate(&function) => {
                delegate::wrap(self.parent, name, function).map(Value::Function)
            }
            value => Ok(value),
        }
    }
}
