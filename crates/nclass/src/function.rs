//! Callables with declared parameter lists
//!
//! A [`Function`] pairs a native body with the parameter names it was declared
//! with. The names carry no runtime meaning except one: a leading `$super`
//! marks the function as an override that expects its parent's implementation
//! injected as argument 0 (see [`crate::delegate`]).

use crate::class::Instance;
use crate::defaults::SUPER_PARAM;
use crate::error::{ClassError, ClassResult};
use crate::signature;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Native function body
pub type NativeFn = dyn Fn(&Invocation<'_>) -> ClassResult<Value> + Send + Sync;

/// Receiver and arguments of a single call
pub struct Invocation<'a> {
    this: &'a Value,
    args: &'a [Value],
}

impl<'a> Invocation<'a> {
    /// Create a call context
    pub fn new(this: &'a Value, args: &'a [Value]) -> Self {
        Self { this, args }
    }

    /// The receiver
    pub fn this(&self) -> &'a Value {
        self.this
    }

    /// The receiver as an instance
    pub fn instance(&self) -> ClassResult<&'a Instance> {
        self.this.as_instance().ok_or(ClassError::NotAnInstance)
    }

    /// All supplied arguments
    pub fn args(&self) -> &'a [Value] {
        self.args
    }

    /// Argument at `index`, or `undefined` when it was not supplied
    pub fn arg(&self, index: usize) -> Value {
        self.args.get(index).cloned().unwrap_or_default()
    }

    /// The injected superclass delegate (argument 0 of an override)
    pub fn delegate(&self) -> ClassResult<&'a Function> {
        self.args
            .first()
            .and_then(Value::as_function)
            .ok_or_else(|| ClassError::NotAFunction {
                name: SUPER_PARAM.to_string(),
            })
    }

    /// Invoke the superclass implementation with `args`
    pub fn call_super(&self, args: &[Value]) -> ClassResult<Value> {
        self.delegate()?.invoke(args)
    }
}

struct FunctionInner {
    name: Option<String>,
    params: Vec<String>,
    body: Box<NativeFn>,
}

/// Reference-counted callable
#[derive(Clone)]
pub struct Function(Arc<FunctionInner>);

impl Function {
    /// Create a function with declared parameter names
    pub fn new<F>(params: &[&str], body: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> ClassResult<Value> + Send + Sync + 'static,
    {
        Self::from_parts(None, params.iter().map(|p| p.to_string()).collect(), body)
    }

    /// Create a function that declares no parameters
    pub fn native<F>(body: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> ClassResult<Value> + Send + Sync + 'static,
    {
        Self::from_parts(None, Vec::new(), body)
    }

    /// Create an override: `$super` is declared as the first parameter,
    /// followed by `params`
    pub fn override_of<F>(params: &[&str], body: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> ClassResult<Value> + Send + Sync + 'static,
    {
        let declared = std::iter::once(SUPER_PARAM)
            .chain(params.iter().copied())
            .map(str::to_string)
            .collect();
        Self::from_parts(None, declared, body)
    }

    /// Create a function whose parameters are read from textual source such as
    /// `function ($super, a, b)` or `(a, b) =>`
    pub fn from_signature<F>(source: &str, body: F) -> ClassResult<Self>
    where
        F: Fn(&Invocation<'_>) -> ClassResult<Value> + Send + Sync + 'static,
    {
        let params = signature::parse_parameter_names(source)?;
        Ok(Self::from_parts(None, params, body))
    }

    pub(crate) fn from_parts<F>(name: Option<String>, params: Vec<String>, body: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> ClassResult<Value> + Send + Sync + 'static,
    {
        Function(Arc::new(FunctionInner {
            name,
            params,
            body: Box::new(body),
        }))
    }

    /// Attach a display name
    pub fn named(self, name: impl Into<String>) -> Self {
        match Arc::try_unwrap(self.0) {
            Ok(mut inner) => {
                inner.name = Some(name.into());
                Function(Arc::new(inner))
            }
            Err(shared) => {
                let inner = Arc::clone(&shared);
                Self::from_parts(Some(name.into()), shared.params.clone(), move |cx| {
                    (inner.body)(cx)
                })
            }
        }
    }

    /// Display name, if any
    pub fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    /// Declared parameter names
    pub fn params(&self) -> &[String] {
        &self.0.params
    }

    /// Number of declared parameters
    pub fn arity(&self) -> usize {
        self.0.params.len()
    }

    /// Call with an explicit receiver
    pub fn call(&self, this: &Value, args: &[Value]) -> ClassResult<Value> {
        (self.0.body)(&Invocation::new(this, args))
    }

    /// Call with an `undefined` receiver
    pub fn invoke(&self, args: &[Value]) -> ClassResult<Value> {
        self.call(&Value::Undefined, args)
    }

    /// Check whether two handles refer to the same function
    pub fn ptr_eq(&self, other: &Function) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "function {}({})",
            self.name().unwrap_or(""),
            self.0.params.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_function_call() {
        let add = Function::new(&["a", "b"], |cx| {
            let a = cx.arg(0).as_number().unwrap_or(0.0);
            let b = cx.arg(1).as_number().unwrap_or(0.0);
            Ok(Value::from(a + b))
        });

        assert_eq!(add.arity(), 2);
        assert_eq!(add.invoke(&[Value::from(1), Value::from(10)]), Ok(Value::from(11)));
    }

    #[test]
    fn test_missing_argument_is_undefined() {
        let echo = Function::new(&["x"], |cx| Ok(cx.arg(0)));
        assert!(echo.invoke(&[]).unwrap().is_undefined());
    }

    #[test]
    fn test_override_declares_super_first() {
        let f = Function::override_of(&["a"], |_| Ok(Value::Undefined));
        assert_eq!(f.params(), ["$super".to_string(), "a".to_string()]);
    }

    #[test]
    fn test_call_super_without_delegate() {
        let f = Function::native(|cx| cx.call_super(&[]));
        assert_eq!(
            f.invoke(&[Value::from(1)]),
            Err(ClassError::NotAFunction {
                name: "$super".to_string()
            })
        );
    }

    #[test]
    fn test_instance_receiver_required() {
        let f = Function::native(|cx| cx.instance().map(|_| Value::Null));
        assert_eq!(f.invoke(&[]), Err(ClassError::NotAnInstance));
    }

    #[test]
    fn test_named_keeps_params_when_shared() {
        let f = Function::new(&["a"], |cx| Ok(cx.arg(0)));
        let alias = f.clone();
        let named = alias.named("echo");
        assert_eq!(named.name(), Some("echo"));
        assert_eq!(named.params(), f.params());
        assert_eq!(named.invoke(&[Value::from(5)]), Ok(Value::from(5)));
        assert_eq!(format!("{:?}", named), "function echo(a)");
    }
}
