//! Class descriptions
//!
//! A [`Description`] lists the members a new class declares: field defaults,
//! methods, overrides, and optionally the shared `$static` block. Declaring the
//! same name twice keeps the first position and the last value.
//!
//! ```ignore
//! let shape = Description::new()
//!     .named("Shape")
//!     .with_static(Record::new().with("count", 0))
//!     .field("sides", 0)
//!     .initializer(&["sides"], |cx| {
//!         cx.instance()?.set("sides", cx.arg(0));
//!         Ok(Value::Undefined)
//!     })
//!     .method("describe", |_| Ok(Value::from("shape")));
//! ```

use crate::defaults::{INITIALIZE, STATIC_KEY};
use crate::error::{ClassError, ClassResult};
use crate::function::{Function, Invocation};
use crate::value::{Record, Value};

/// Members to declare on a new class
#[derive(Debug, Clone, Default)]
pub struct Description {
    name: Option<String>,
    members: Vec<(String, Value)>,
}

impl Description {
    /// Create an empty description
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert a record of members, in the order the record declares them
    pub fn from_record(record: &Record) -> Self {
        let mut description = Self::new();
        for (name, value) in record.entries() {
            description.insert(name, value);
        }
        description
    }

    /// Set the display name of the class
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Declare any member
    pub fn member(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Declare a field default
    pub fn field(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.member(name, value)
    }

    /// Declare a method that takes no named parameters
    pub fn method<F>(self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> ClassResult<Value> + Send + Sync + 'static,
    {
        let name = name.into();
        let function = Function::native(body).named(name.clone());
        self.member(name, function)
    }

    /// Declare a method with named parameters
    pub fn method_with<F>(self, name: impl Into<String>, params: &[&str], body: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> ClassResult<Value> + Send + Sync + 'static,
    {
        let name = name.into();
        let function = Function::new(params, body).named(name.clone());
        self.member(name, function)
    }

    /// Declare an override of an inherited method
    ///
    /// The body receives the parent implementation as argument 0; the caller's
    /// arguments follow from index 1.
    pub fn override_method<F>(self, name: impl Into<String>, params: &[&str], body: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> ClassResult<Value> + Send + Sync + 'static,
    {
        let name = name.into();
        let function = Function::override_of(params, body).named(name.clone());
        self.member(name, function)
    }

    /// Declare `initialize`
    pub fn initializer<F>(self, params: &[&str], body: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> ClassResult<Value> + Send + Sync + 'static,
    {
        self.method_with(INITIALIZE, params, body)
    }

    /// Declare `initialize` as an override of the parent's initializer
    pub fn override_initializer<F>(self, params: &[&str], body: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> ClassResult<Value> + Send + Sync + 'static,
    {
        self.override_method(INITIALIZE, params, body)
    }

    /// Declare the shared `$static` block
    pub fn with_static(self, state: Record) -> Self {
        self.member(STATIC_KEY, state)
    }

    /// Insert a member in place
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.members.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = value,
            None => self.members.push((name, value)),
        }
    }

    /// Display name, if set
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Member value by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.members
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    /// Member names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|(name, _)| name.as_str())
    }

    /// Number of declared members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if nothing is declared
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub(crate) fn into_parts(self) -> (Option<String>, Vec<(String, Value)>) {
        (self.name, self.members)
    }
}

impl From<Record> for Description {
    fn from(record: Record) -> Self {
        Description::from_record(&record)
    }
}

impl TryFrom<Value> for Description {
    type Error = ClassError;

    fn try_from(value: Value) -> ClassResult<Self> {
        match value {
            Value::Record(record) => Ok(Description::from_record(&record)),
            other => Err(ClassError::InvalidArgumentType {
                index: 0,
                expected: "record",
                actual: other.type_name(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature;

    #[test]
    fn test_last_write_wins_first_position_kept() {
        let desc = Description::new()
            .field("a", 1)
            .field("b", 2)
            .field("a", 3);

        assert_eq!(desc.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(desc.get("a"), Some(&Value::from(3)));
        assert_eq!(desc.len(), 2);
    }

    #[test]
    fn test_override_method_is_marked() {
        let desc = Description::new()
            .method("plain", |_| Ok(Value::Null))
            .override_method("say", &["x"], |cx| cx.call_super(&[]));

        let plain = desc.get("plain").and_then(Value::as_function).unwrap();
        let over = desc.get("say").and_then(Value::as_function).unwrap();
        assert!(!signature::requests_delegate(plain));
        assert!(signature::requests_delegate(over));
        assert_eq!(over.name(), Some("say"));
    }

    #[test]
    fn test_static_and_initializer_keys() {
        let desc = Description::new()
            .with_static(Record::new())
            .initializer(&[], |_| Ok(Value::Undefined));

        assert!(desc.get("$static").is_some());
        assert!(desc.get("initialize").is_some());
    }

    #[test]
    fn test_from_record_keeps_declaration_order() {
        let record = Record::new().with("zeta", 1).with("alpha", 2).with("$static", Record::new());
        let desc = Description::from(record);
        assert_eq!(desc.names().collect::<Vec<_>>(), vec!["zeta", "alpha", "$static"]);
    }

    #[test]
    fn test_try_from_non_record() {
        let err = Description::try_from(Value::from(5)).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidArgument);
    }
}
