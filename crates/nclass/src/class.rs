//! Classes, member layers and instances
//!
//! A [`Class`] owns an immutable [`MemberLayer`] and a pointer to its parent.
//! Member lookup walks the parent chain root-ward until a definition is found,
//! which is how methods, field defaults and the `$static` block are inherited.
//! Every chain ends at the built-in root class, whose layer holds a no-op
//! `initialize` so classes without an initializer still construct cleanly.

use crate::defaults::{CONSTRUCTOR, INITIALIZE, ROOT_CLASS_NAME, STATIC_KEY};
use crate::error::{ClassError, ClassResult};
use crate::function::Function;
use crate::value::{Record, Value};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::trace;

/// Global counter for generating unique class IDs
static NEXT_CLASS_ID: AtomicU64 = AtomicU64::new(0);

/// Global counter for generating unique instance IDs
static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

static ROOT_CLASS: Lazy<Class> = Lazy::new(|| {
    let mut members = MemberLayer::new();
    members.insert(
        INITIALIZE.to_string(),
        Value::Function(Function::native(|_| Ok(Value::Undefined)).named(INITIALIZE)),
    );
    Class::from_parts(ROOT_CLASS_NAME.to_string(), None, members, false)
});

/// Unique identifier for a class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub u64);

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassId({})", self.0)
    }
}

/// Named member slots declared by one class
#[derive(Debug, Clone, Default)]
pub struct MemberLayer {
    slots: FxHashMap<String, Value>,
    order: Vec<String>,
}

impl MemberLayer {
    /// Create an empty layer
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a member; a repeated name replaces the earlier value in place
    pub fn insert(&mut self, name: String, value: Value) {
        if self.slots.insert(name.clone(), value).is_none() {
            self.order.push(name);
        }
    }

    /// Get a member declared on this layer
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.slots.get(name)
    }

    /// Check whether this layer declares `name`
    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// Member names in declaration order
    pub fn names(&self) -> &[String] {
        &self.order
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the layer declares nothing
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

struct ClassInner {
    id: ClassId,
    name: String,
    parent: Option<Class>,
    members: MemberLayer,
    deferred: bool,
}

/// A constructible class
///
/// Cloning is cheap and yields a handle to the same class.
#[derive(Clone)]
pub struct Class(Arc<ClassInner>);

impl Class {
    pub(crate) fn from_parts(
        name: String,
        parent: Option<Class>,
        members: MemberLayer,
        deferred: bool,
    ) -> Self {
        Class(Arc::new(ClassInner {
            id: ClassId(NEXT_CLASS_ID.fetch_add(1, Ordering::Relaxed)),
            name,
            parent,
            members,
            deferred,
        }))
    }

    /// The built-in empty root class
    pub fn root() -> Class {
        ROOT_CLASS.clone()
    }

    /// Class ID
    pub fn id(&self) -> ClassId {
        self.0.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Parent class (None only for the root)
    pub fn parent(&self) -> Option<&Class> {
        self.0.parent.as_ref()
    }

    /// Check if this is the built-in root class
    pub fn is_root(&self) -> bool {
        self.0.parent.is_none()
    }

    /// Whether construction skips `initialize`
    pub fn is_deferred(&self) -> bool {
        self.0.deferred
    }

    /// Members declared by this class itself
    pub fn members(&self) -> &MemberLayer {
        &self.0.members
    }

    /// Member declared by this class itself
    pub fn own_member(&self, name: &str) -> Option<&Value> {
        self.0.members.get(name)
    }

    /// Resolve `name` through this class and its ancestors
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.ancestors()
            .find_map(|class| class.own_member(name).cloned())
    }

    /// Check if `name` resolves anywhere in the chain
    pub fn has_member(&self, name: &str) -> bool {
        self.ancestors().any(|class| class.0.members.contains(name))
    }

    /// The shared `$static` block visible to this class, when it holds a record
    pub fn static_state(&self) -> Option<Record> {
        match self.lookup(STATIC_KEY) {
            Some(Value::Record(record)) => Some(record),
            _ => None,
        }
    }

    /// Iterate this class followed by each ancestor up to the root
    pub fn ancestors(&self) -> impl Iterator<Item = &Class> {
        std::iter::successors(Some(self), |class| class.parent())
    }

    /// Check if this class is `other` or inherits from it
    pub fn is_subclass_of(&self, other: &Class) -> bool {
        self.ancestors().any(|class| class == other)
    }

    /// Construct an instance, running `initialize` unless the class is deferred
    pub fn construct(&self, args: &[Value]) -> ClassResult<Instance> {
        let instance = Instance::allocate(self.clone());
        if self.is_deferred() {
            trace!(class = %self.name(), instance = instance.id(), "initializer deferred");
            return Ok(instance);
        }
        if let Some(Value::Function(init)) = self.lookup(INITIALIZE) {
            trace!(class = %self.name(), instance = instance.id(), "running initializer");
            init.call(&Value::Instance(instance.clone()), args)?;
        }
        Ok(instance)
    }

    /// Allocate an instance without running `initialize`
    ///
    /// The returned handle must have [`Uninitialized::run_initializer`] called
    /// before its members are used meaningfully.
    pub fn build_uninitialized(&self) -> Uninitialized {
        Uninitialized {
            instance: Instance::allocate(self.clone()),
        }
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Class) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Class {}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class {}#{}", self.0.name, self.0.id.0)
    }
}

struct InstanceInner {
    id: u64,
    class: Class,
    fields: RwLock<FxHashMap<String, Value>>,
}

/// An object created from a [`Class`]
///
/// Cloning yields another handle to the same object.
#[derive(Clone)]
pub struct Instance(Arc<InstanceInner>);

impl Instance {
    fn allocate(class: Class) -> Self {
        Instance(Arc::new(InstanceInner {
            id: NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed),
            class,
            fields: RwLock::new(FxHashMap::default()),
        }))
    }

    /// Unique instance ID
    pub fn id(&self) -> u64 {
        self.0.id
    }

    /// The class this instance was constructed from
    pub fn constructor(&self) -> &Class {
        &self.0.class
    }

    /// Read a member: own field first, then the class chain
    ///
    /// An unshadowed `constructor` resolves to [`Instance::constructor`].
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.0.fields.read().get(name) {
            return Some(value.clone());
        }
        self.0.class.lookup(name).or_else(|| {
            (name == CONSTRUCTOR).then(|| Value::Class(self.0.class.clone()))
        })
    }

    /// Write an own field, shadowing any inherited member of that name
    pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.fields.write().insert(name.into(), value.into());
    }

    /// Check whether the instance holds its own field `name`
    pub fn has_own(&self, name: &str) -> bool {
        self.0.fields.read().contains_key(name)
    }

    /// Names of own fields, sorted
    pub fn own_field_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.0.fields.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Invoke member `name` with this instance as receiver
    pub fn call(&self, name: &str, args: &[Value]) -> ClassResult<Value> {
        match self.get(name) {
            Some(Value::Function(function)) => {
                function.call(&Value::Instance(self.clone()), args)
            }
            _ => Err(ClassError::NotAFunction {
                name: name.to_string(),
            }),
        }
    }

    /// Invoke the `initialize` member explicitly
    pub fn run_initializer(&self, args: &[Value]) -> ClassResult<Value> {
        self.call(INITIALIZE, args)
    }

    /// Check whether this instance's class is `class` or inherits from it
    pub fn is_instance_of(&self, class: &Class) -> bool {
        self.0.class.is_subclass_of(class)
    }

    /// The shared `$static` block reachable from this instance, when it holds a record
    pub fn static_state(&self) -> Option<Record> {
        match self.get(STATIC_KEY) {
            Some(Value::Record(record)) => Some(record),
            _ => None,
        }
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Instance {}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} instance#{}", self.0.class.name(), self.0.id)
    }
}

/// An instance whose initializer has not run yet
#[derive(Debug, Clone)]
pub struct Uninitialized {
    instance: Instance,
}

impl Uninitialized {
    /// The pending instance
    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    /// Run `initialize` with `args` and return the instance
    ///
    /// Calling this again re-runs the initializer on the same instance.
    pub fn run_initializer(&self, args: &[Value]) -> ClassResult<Instance> {
        self.instance.run_initializer(args)?;
        Ok(self.instance.clone())
    }

    /// Take the instance without running the initializer
    pub fn into_instance(self) -> Instance {
        self.instance
    }
}
