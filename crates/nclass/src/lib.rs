//! nClass: a minimal class-definition engine
//!
//! This crate builds classes at runtime from flat descriptions:
//! - Single-parent inheritance through chained member layers
//! - Explicit superclass delegation for overrides (`$super`)
//! - A shared `$static` block visible to every instance of a lineage
//! - Two-phase construction with a deferred initializer
//!
//! ```ignore
//! use nclass::{define_root, define_sub, Description, Value};
//!
//! let animal = define_root(
//!     Description::new()
//!         .named("Animal")
//!         .method("speak", |_| Ok(Value::from(vec![Value::from("...")]))),
//! )?;
//! let dog = define_sub(
//!     &animal,
//!     Description::new()
//!         .named("Dog")
//!         .override_method("speak", &[], |cx| {
//!             let said = cx.call_super(&[])?;
//!             if let Some(list) = said.as_array() {
//!                 list.push(Value::from("woof"));
//!             }
//!             Ok(said)
//!         }),
//! )?;
//! let rex = dog.construct(&[])?;
//! rex.call("speak", &[])?; // ["...", "woof"]
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod builder;
pub mod class;
pub mod defaults;
pub mod delegate;
pub mod description;
pub mod error;
pub mod facade;
pub mod function;
pub mod introspection;
pub mod signature;
pub mod value;

pub use builder::TypeBuilder;
pub use class::{Class, ClassId, Instance, MemberLayer, Uninitialized};
pub use description::Description;
pub use error::{ClassError, ClassResult, ErrorKind};
pub use facade::{define_root, define_sub, dynamic, instantiate_deferred};
pub use function::{Function, Invocation, NativeFn};
pub use introspection::{
    class_hierarchy, class_of, is_instance_of, is_subclass_of, member_names, overridden_members,
};
pub use value::{Array, Record, Value};
