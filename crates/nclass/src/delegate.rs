//! Superclass delegate injection
//!
//! An override declares `$super` as its first parameter. [`wrap`] resolves the
//! parent's implementation of the same member once, when the class is being
//! built, and returns a function that on every call synthesizes a delegate bound
//! to the current receiver and passes it as argument 0.
//!
//! Capturing the implementation at build time matters for chains where several
//! levels override the same name: resolving `name` on the receiver at call time
//! would find the most-derived override again and recurse forever.

use crate::class::Class;
use crate::error::{ClassError, ClassResult};
use crate::function::Function;
use crate::value::Value;
use tracing::trace;

/// Wrap `overriding` so calls receive a delegate to `super_owner`'s `member`
///
/// Fails with [`ClassError::Override`] when `member` does not resolve to a
/// function on `super_owner`.
pub fn wrap(super_owner: &Class, member: &str, overriding: Function) -> ClassResult<Function> {
    let inherited = match super_owner.lookup(member) {
        Some(Value::Function(function)) => function,
        _ => {
            return Err(ClassError::Override {
                func: member.to_string(),
            })
        }
    };

    trace!(
        member,
        parent = %super_owner.name(),
        "wrapping override with superclass delegate"
    );

    // The delegate slot is injected, so callers see one parameter fewer.
    let params = overriding.params().iter().skip(1).cloned().collect();

    Ok(Function::from_parts(
        Some(member.to_string()),
        params,
        move |cx| {
            let delegate = bind(&inherited, cx.this().clone());
            let mut args = Vec::with_capacity(cx.args().len() + 1);
            args.push(Value::Function(delegate));
            args.extend_from_slice(cx.args());
            overriding.call(cx.this(), &args)
        },
    ))
}

/// A function that calls `target` with `receiver`, whatever it is invoked on
fn bind(target: &Function, receiver: Value) -> Function {
    let target = target.clone();
    Function::from_parts(
        target.name().map(str::to_string),
        target.params().to_vec(),
        move |cx| target.call(&receiver, cx.args()),
    )
}
