//! Public entry points for defining classes
//!
//! The typed functions take their operands directly. The [`dynamic`] module
//! offers the same operations over an argument list, checking arity and
//! operand kinds the way a scripting host would call them.

use crate::builder::TypeBuilder;
use crate::class::{Class, Uninitialized};
use crate::description::Description;
use crate::error::ClassResult;

/// Define a class extending the built-in root
pub fn define_root(description: Description) -> ClassResult<Class> {
    TypeBuilder::new(&Class::root()).build(description)
}

/// Define a class extending `parent`
pub fn define_sub(parent: &Class, description: Description) -> ClassResult<Class> {
    TypeBuilder::new(parent).build(description)
}

/// Define a deferred class extending `parent` and allocate one instance of it
///
/// `initialize` does not run; call [`Uninitialized::run_initializer`].
pub fn instantiate_deferred(parent: &Class, description: Description) -> ClassResult<Uninitialized> {
    let class = TypeBuilder::new(parent).deferred().build(description)?;
    Ok(class.build_uninitialized())
}

/// Argument-list entry points
pub mod dynamic {
    use crate::class::{Class, Uninitialized};
    use crate::description::Description;
    use crate::error::{ClassError, ClassResult};
    use crate::value::Value;

    /// `defineRoot(description)`: accepts exactly one argument
    pub fn define_root(args: &[Value]) -> ClassResult<Class> {
        expect_arity(args, &[1])?;
        super::define_root(description_at(args, 0)?)
    }

    /// `defineSub(parent, description)`: accepts exactly two arguments
    pub fn define_sub(args: &[Value]) -> ClassResult<Class> {
        expect_arity(args, &[2])?;
        super::define_sub(&class_at(args, 0)?, description_at(args, 1)?)
    }

    /// `create(description)` or `create(parent, description)`
    pub fn create(args: &[Value]) -> ClassResult<Class> {
        let (parent, description) = parent_and_description(args)?;
        super::define_sub(&parent, description)
    }

    /// `instance(description)` or `instance(parent, description)`
    pub fn instantiate_deferred(args: &[Value]) -> ClassResult<Uninitialized> {
        let (parent, description) = parent_and_description(args)?;
        super::instantiate_deferred(&parent, description)
    }

    fn parent_and_description(args: &[Value]) -> ClassResult<(Class, Description)> {
        expect_arity(args, &[1, 2])?;
        if args.len() == 1 {
            Ok((Class::root(), description_at(args, 0)?))
        } else {
            Ok((class_at(args, 0)?, description_at(args, 1)?))
        }
    }

    fn expect_arity(args: &[Value], accepted: &[usize]) -> ClassResult<()> {
        if accepted.contains(&args.len()) {
            Ok(())
        } else {
            Err(ClassError::InvalidArgument {
                expected: accepted.to_vec(),
                actual: args.len(),
            })
        }
    }

    fn class_at(args: &[Value], index: usize) -> ClassResult<Class> {
        match &args[index] {
            Value::Class(class) => Ok(class.clone()),
            other => Err(ClassError::InvalidArgumentType {
                index,
                expected: "class",
                actual: other.type_name(),
            }),
        }
    }

    fn description_at(args: &[Value], index: usize) -> ClassResult<Description> {
        match &args[index] {
            Value::Record(record) => Ok(Description::from_record(record)),
            other => Err(ClassError::InvalidArgumentType {
                index,
                expected: "record",
                actual: other.type_name(),
            }),
        }
    }
}
