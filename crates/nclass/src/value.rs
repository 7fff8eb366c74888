//! Dynamic values stored in member layers, instance fields and static state
//!
//! Primitives are held inline. Arrays and records are reference-shared: cloning a
//! [`Value::Array`] or [`Value::Record`] aliases the same storage, so writes through
//! one handle are visible through every other. This is what lets a `$static` block
//! be shared by all instances of a class lineage.
//!
//! Equality comes in two flavours:
//! - `==` compares primitives by value and arrays/records element by element
//! - [`Value::same`] compares primitives by value and everything else by identity
//!
//! Arrays and records may contain themselves. Deep comparison treats a pair it is
//! already comparing as equal, and `Debug` prints a revisited container as
//! `[Circular]`.

use crate::class::{Class, Instance};
use crate::function::Function;
use indexmap::IndexMap;
use parking_lot::RwLock;
use rustc_hash::{FxBuildHasher, FxHashSet};
use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

type RecordMap = IndexMap<String, Value, FxBuildHasher>;

thread_local! {
    /// Containers currently being compared or printed on this thread
    static VISITING: RefCell<FxHashSet<(usize, usize)>> = RefCell::new(FxHashSet::default());
}

/// Marks a container pair as being visited until dropped
struct VisitGuard((usize, usize));

impl VisitGuard {
    /// Returns `None` when `key` is already being visited further up the stack
    fn enter(key: (usize, usize)) -> Option<Self> {
        VISITING
            .with(|visiting| visiting.borrow_mut().insert(key))
            .then_some(VisitGuard(key))
    }
}

impl Drop for VisitGuard {
    fn drop(&mut self) {
        VISITING.with(|visiting| {
            visiting.borrow_mut().remove(&self.0);
        });
    }
}

fn addr<T>(ptr: &Arc<T>) -> usize {
    Arc::as_ptr(ptr) as *const () as usize
}

/// A dynamically typed value
#[derive(Clone, Default)]
pub enum Value {
    /// Absent value (missing argument, unset slot)
    #[default]
    Undefined,
    /// Explicit null
    Null,
    /// Boolean
    Bool(bool),
    /// IEEE 754 double
    Number(f64),
    /// Immutable string
    Str(Arc<str>),
    /// Shared, growable sequence
    Array(Array),
    /// Shared string-keyed mapping
    Record(Record),
    /// Callable
    Function(Function),
    /// Constructible class
    Class(Class),
    /// Class instance
    Instance(Instance),
}

impl Value {
    /// Name of this value's kind, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Record(_) => "record",
            Value::Function(_) => "function",
            Value::Class(_) => "class",
            Value::Instance(_) => "instance",
        }
    }

    /// Whether this value is a non-callable object (array, record or instance)
    pub fn is_object(&self) -> bool {
        matches!(
            self,
            Value::Array(_) | Value::Record(_) | Value::Instance(_)
        )
    }

    /// Check if this value is undefined
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Extract boolean value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extract number value
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extract string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    /// Extract array handle
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Extract record handle
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Extract function handle
    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Extract class handle
    pub fn as_class(&self) -> Option<&Class> {
        match self {
            Value::Class(c) => Some(c),
            _ => None,
        }
    }

    /// Extract instance handle
    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Value::Instance(i) => Some(i),
            _ => None,
        }
    }

    /// Identity comparison (`assertSame`)
    pub fn same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a.ptr_eq(b),
            (Value::Record(a), Value::Record(b)) => a.ptr_eq(b),
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Class(a), Value::Class(b)) => a == b,
            (Value::Instance(a), Value::Instance(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a == b,
            _ => self.same(other),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Array(a) => fmt::Debug::fmt(a, f),
            Value::Record(r) => fmt::Debug::fmt(r, f),
            Value::Function(func) => fmt::Debug::fmt(func, f),
            Value::Class(c) => fmt::Debug::fmt(c, f),
            Value::Instance(i) => fmt::Debug::fmt(i, f),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{}", s),
            other => fmt::Debug::fmt(other, f),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<Vec<Value>> for Value {
    fn from(elements: Vec<Value>) -> Self {
        Value::Array(Array::from(elements))
    }
}

impl From<Array> for Value {
    fn from(a: Array) -> Self {
        Value::Array(a)
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Value::Record(r)
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Value::Function(f)
    }
}

impl From<Class> for Value {
    fn from(c: Class) -> Self {
        Value::Class(c)
    }
}

impl From<Instance> for Value {
    fn from(i: Instance) -> Self {
        Value::Instance(i)
    }
}

/// Reference-shared array
#[derive(Clone, Default)]
pub struct Array(Arc<RwLock<Vec<Value>>>);

impl Array {
    /// Create an empty array
    pub fn new() -> Self {
        Self::default()
    }

    /// Get array length
    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    /// Check if array is empty
    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    /// Get element at index
    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.read().get(index).cloned()
    }

    /// Set element at index, padding with `undefined` when writing past the end
    pub fn set(&self, index: usize, value: Value) {
        let mut elements = self.0.write();
        if index >= elements.len() {
            elements.resize(index + 1, Value::Undefined);
        }
        elements[index] = value;
    }

    /// Append an element
    pub fn push(&self, value: Value) {
        self.0.write().push(value);
    }

    /// Remove and return the last element
    pub fn pop(&self) -> Option<Value> {
        self.0.write().pop()
    }

    /// Snapshot of the current elements
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.read().clone()
    }

    /// Check whether two handles alias the same storage
    pub fn ptr_eq(&self, other: &Array) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<Vec<Value>> for Array {
    fn from(elements: Vec<Value>) -> Self {
        Array(Arc::new(RwLock::new(elements)))
    }
}

impl FromIterator<Value> for Array {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Array::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl PartialEq for Array {
    fn eq(&self, other: &Array) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        let Some(_guard) = VisitGuard::enter((addr(&self.0), addr(&other.0))) else {
            return true;
        };
        let lhs = self.to_vec();
        let rhs = other.to_vec();
        lhs == rhs
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(_guard) = VisitGuard::enter((addr(&self.0), 0)) else {
            return write!(f, "[Circular]");
        };
        f.debug_list().entries(self.to_vec()).finish()
    }
}

/// Reference-shared string-keyed mapping
///
/// Entries keep the order their keys were first inserted in. Overwriting a key
/// keeps its position.
#[derive(Clone, Default)]
pub struct Record(Arc<RwLock<RecordMap>>);

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, consuming and returning the record
    pub fn with(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Get the value stored under `key`
    pub fn get(&self, key: &str) -> Option<Value> {
        self.0.read().get(key).cloned()
    }

    /// Store a value, returning the previous one
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.write().insert(key.into(), value.into())
    }

    /// Remove an entry, keeping the order of the rest
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.0.write().shift_remove(key)
    }

    /// Check whether `key` is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.read().contains_key(key)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    /// Check if the record has no entries
    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    /// Keys in insertion order
    pub fn keys(&self) -> Vec<String> {
        self.0.read().keys().cloned().collect()
    }

    /// Entries in insertion order
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.0
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Check whether two handles alias the same storage
    pub fn ptr_eq(&self, other: &Record) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let map: RecordMap = iter.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Record(Arc::new(RwLock::new(map)))
    }
}

/// Same keys mapped to equal values, regardless of insertion order
impl PartialEq for Record {
    fn eq(&self, other: &Record) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        let Some(_guard) = VisitGuard::enter((addr(&self.0), addr(&other.0))) else {
            return true;
        };
        let rhs = other.0.read().clone();
        let lhs = self.entries();
        lhs.len() == rhs.len()
            && lhs
                .iter()
                .all(|(key, value)| rhs.get(key).is_some_and(|theirs| value == theirs))
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(_guard) = VisitGuard::enter((addr(&self.0), 0)) else {
            return write!(f, "[Circular]");
        };
        f.debug_map().entries(self.entries()).finish()
    }
}
