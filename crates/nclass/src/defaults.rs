//! Reserved identifiers shared by descriptions, builders and instances.

/// Member key holding the shared static-state mapping.
pub const STATIC_KEY: &str = "$static";

/// Member invoked automatically when an instance is constructed.
pub const INITIALIZE: &str = "initialize";

/// Instance member resolving to the instance's class when nothing shadows it.
pub const CONSTRUCTOR: &str = "constructor";

/// First declared parameter name that marks a method as an override with delegate.
pub const SUPER_PARAM: &str = "$super";

/// Display name of the built-in empty root class.
pub const ROOT_CLASS_NAME: &str = "Object";

/// Display name used for classes defined without a name.
pub const ANONYMOUS_CLASS_NAME: &str = "anonymous";
