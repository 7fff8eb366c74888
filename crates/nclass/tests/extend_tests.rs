//! Integration tests for subclassing and superclass delegation
//!
//! Tests cover:
//! - Instance-of across a three-level chain
//! - Overrides that append to their parent's result
//! - Skip-level overrides resolving to the inherited implementation
//! - Overridden initializers
//! - `$static` inherited by subclasses
//! - Dangling delegates

use nclass::{define_root, define_sub, Class, ClassError, Description, ErrorKind, Record, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Delegate to the parent and append `tag` to the array it returns
fn append_tag(tag: &'static str) -> impl Fn(&nclass::Invocation<'_>) -> nclass::ClassResult<Value> {
    move |cx| {
        let res = cx.call_super(&[])?;
        if let Some(list) = res.as_array() {
            list.push(Value::from(tag));
        }
        Ok(res)
    }
}

struct Chain {
    a: Class,
    b: Class,
    c: Class,
}

fn chain() -> Chain {
    let a = define_root(
        Description::new()
            .named("ClassA")
            .with_static(Record::new().with("x", Value::Null))
            .initializer(&["arg1"], |cx| {
                cx.instance()?.set("arg1", cx.arg(0));
                Ok(Value::Undefined)
            })
            .method("say", |_| Ok(Value::from("ClassA")))
            .method("overrideABC", |_| Ok(Value::from(vec![Value::from("ClassA")])))
            .method("overrideAC", |_| Ok(Value::from(vec![Value::from("ClassA")]))),
    )
    .unwrap();

    let b = define_sub(
        &a,
        Description::new()
            .named("ClassB")
            .override_initializer(&["arg1", "arg2"], |cx| {
                cx.call_super(&[cx.arg(1)])?;
                cx.instance()?.set("arg2", cx.arg(2));
                Ok(Value::Undefined)
            })
            .method("say", |_| Ok(Value::from("ClassB")))
            .override_method("overrideABC", &[], append_tag("ClassB")),
    )
    .unwrap();

    let c = define_sub(
        &b,
        Description::new()
            .named("ClassC")
            .override_method("overrideABC", &[], append_tag("ClassC"))
            .override_method("overrideAC", &[], append_tag("ClassC")),
    )
    .unwrap();

    Chain { a, b, c }
}

fn strings(values: &[&str]) -> Value {
    Value::from(values.iter().map(|s| Value::from(*s)).collect::<Vec<_>>())
}

#[test]
fn test_instance_of() {
    let Chain { a, b, c } = chain();
    let ia = a.construct(&[]).unwrap();
    let ib = b.construct(&[]).unwrap();
    let ic = c.construct(&[]).unwrap();

    assert!(ia.is_instance_of(&a));
    assert!(!ia.is_instance_of(&b));
    assert!(!ia.is_instance_of(&c));

    assert!(ib.is_instance_of(&a));
    assert!(ib.is_instance_of(&b));
    assert!(!ib.is_instance_of(&c));

    assert!(ic.is_instance_of(&a));
    assert!(ic.is_instance_of(&b));
    assert!(ic.is_instance_of(&c));
}

#[test]
fn test_method() {
    let Chain { b, .. } = chain();
    let ib = b.construct(&[]).unwrap();
    assert_eq!(ib.call("say", &[]).unwrap(), Value::from("ClassB"));
}

#[test]
fn test_override_method() {
    let Chain { b, c, .. } = chain();
    let ib = b.construct(&[]).unwrap();
    let ic = c.construct(&[]).unwrap();

    assert_eq!(
        ib.call("overrideABC", &[]).unwrap(),
        strings(&["ClassA", "ClassB"])
    );
    assert_eq!(
        ic.call("overrideABC", &[]).unwrap(),
        strings(&["ClassA", "ClassB", "ClassC"])
    );
}

#[test]
fn test_override_method_skip_b() {
    let Chain { b, c, .. } = chain();
    let ib = b.construct(&[]).unwrap();
    let ic = c.construct(&[]).unwrap();

    assert_eq!(ib.call("overrideAC", &[]).unwrap(), strings(&["ClassA"]));
    assert_eq!(
        ic.call("overrideAC", &[]).unwrap(),
        strings(&["ClassA", "ClassC"])
    );
}

#[test]
fn test_delegate_runs_each_level_once_in_order() {
    let log = Arc::new(parking_lot::Mutex::new(Vec::<&'static str>::new()));

    let record = |tag: &'static str, delegate: bool| {
        let log = Arc::clone(&log);
        move |cx: &nclass::Invocation<'_>| -> nclass::ClassResult<Value> {
            if delegate {
                cx.call_super(&[])?;
            }
            log.lock().push(tag);
            Ok(Value::Undefined)
        }
    };

    let a = define_root(Description::new().method("m", record("A", false))).unwrap();
    let b = define_sub(&a, Description::new().override_method("m", &[], record("B", true))).unwrap();
    let c = define_sub(&b, Description::new().override_method("m", &[], record("C", true))).unwrap();

    c.construct(&[]).unwrap().call("m", &[]).unwrap();
    assert_eq!(*log.lock(), vec!["A", "B", "C"]);
}

#[test]
fn test_skip_level_invokes_root_body_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let a = define_root(Description::new().method("m", move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Value::Undefined)
    }))
    .unwrap();
    let b = define_sub(&a, Description::new().field("unrelated", 1)).unwrap();
    let c = define_sub(&b, Description::new().override_method("m", &[], |cx| cx.call_super(&[]))).unwrap();

    c.construct(&[]).unwrap().call("m", &[]).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_override_initialize() {
    let Chain { b, c, .. } = chain();
    let arg1 = Value::from(vec![Value::from(10), Value::from(20), Value::from(30)]);
    let arg2 = Value::from(100);

    let ib = b.construct(&[arg1.clone(), arg2.clone()]).unwrap();
    let ic = c.construct(&[arg1.clone(), arg2.clone()]).unwrap();

    assert!(ib.get("arg1").unwrap().same(&arg1));
    assert!(ib.get("arg2").unwrap().same(&arg2));
    assert!(ic.get("arg1").unwrap().same(&arg1));
    assert!(ic.get("arg2").unwrap().same(&arg2));
}

#[test]
fn test_initializer_scenario() {
    let Chain { b, .. } = chain();
    let ib = b.construct(&[Value::from(10), Value::from(20)]).unwrap();
    assert_eq!(ib.get("arg1"), Some(Value::from(10)));
    assert_eq!(ib.get("arg2"), Some(Value::from(20)));
}

#[test]
fn test_static_property() {
    let Chain { a, b, c } = chain();
    let b1 = b.construct(&[]).unwrap();
    let b2 = b.construct(&[]).unwrap();
    let c1 = c.construct(&[]).unwrap();

    let x = nclass::Array::new();
    b1.static_state().unwrap().set("x", x.clone());

    let s1 = b1.static_state().unwrap();
    assert!(s1.ptr_eq(&b2.static_state().unwrap()));
    assert!(s1.ptr_eq(&c1.static_state().unwrap()));
    assert!(s1.ptr_eq(&a.static_state().unwrap()));
    assert!(b2.static_state().unwrap().get("x").unwrap().same(&Value::from(x)));
}

#[test]
fn test_redefined_static_is_separate() {
    let Chain { a, .. } = chain();
    let own = define_sub(&a, Description::new().with_static(Record::new().with("x", 1))).unwrap();

    let mine = own.construct(&[]).unwrap().static_state().unwrap();
    let base = a.construct(&[]).unwrap().static_state().unwrap();
    assert!(!mine.ptr_eq(&base));
    assert_eq!(mine.get("x"), Some(Value::from(1)));
}

#[test]
fn test_override_error() {
    let a = define_root(Description::new()).unwrap();
    let err = define_sub(
        &a,
        Description::new().override_method("say", &[], |_| Ok(Value::Undefined)),
    )
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Override);
    assert_eq!(
        err,
        ClassError::Override {
            func: "say".to_string()
        }
    );
}

#[test]
fn test_delegate_is_bound_to_receiver() {
    let a = define_root(Description::new().method("whoami", |cx| Ok(cx.this().clone()))).unwrap();
    let b = define_sub(&a, Description::new().override_method("whoami", &[], |cx| cx.call_super(&[]))).unwrap();

    let ib = b.construct(&[]).unwrap();
    let me = ib.call("whoami", &[]).unwrap();
    assert_eq!(me.as_instance(), Some(&ib));
}

#[test]
fn test_constructor_back_reference() {
    let Chain { c, .. } = chain();
    let ic = c.construct(&[]).unwrap();
    assert_eq!(ic.constructor(), &c);
    assert_eq!(ic.constructor().name(), "ClassC");
    assert_eq!(ic.get("constructor"), Some(Value::from(c.clone())));
}
