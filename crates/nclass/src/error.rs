//! Class definition and invocation errors

use thiserror::Error;

/// Errors raised while defining classes or invoking their members
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClassError {
    /// A description member holds a mapping, array or instance outside `$static`
    #[error("{prop} is not a primitive type")]
    PropertyType {
        /// Name of the offending member
        prop: String,
    },

    /// An override requested a delegate for a name the parent does not define
    #[error("{func} is not a function in super class")]
    Override {
        /// Name of the overriding member
        func: String,
    },

    /// A facade entry point received an unsupported number of arguments
    #[error("arguments count was expecting {}, {actual} was actually", join_counts(.expected))]
    InvalidArgument {
        /// Every accepted argument count
        expected: Vec<usize>,
        /// Number of arguments actually supplied
        actual: usize,
    },

    /// A facade entry point received a value of the wrong kind
    #[error("argument {index} must be {expected}, got {actual}")]
    InvalidArgumentType {
        /// Zero-based argument position
        index: usize,
        /// Expected value kind
        expected: &'static str,
        /// Kind of the supplied value
        actual: &'static str,
    },

    /// A textual signature has no parameter list
    #[error("cannot read parameter list from signature: {signature}")]
    InvalidSignature {
        /// Signature source that failed to parse
        signature: String,
    },

    /// Invoked a member that is not callable
    #[error("{name} is not a function")]
    NotAFunction {
        /// Member name
        name: String,
    },

    /// A method body required an instance receiver
    #[error("receiver is not an instance")]
    NotAnInstance,

    /// Error raised from inside a method body
    #[error("{message}")]
    Raised {
        /// Message supplied by the method body
        message: String,
    },
}

/// Coarse classification of a [`ClassError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`ClassError::PropertyType`]
    PropertyType,
    /// See [`ClassError::Override`]
    Override,
    /// See [`ClassError::InvalidArgument`] and [`ClassError::InvalidArgumentType`]
    InvalidArgument,
    /// Signature inspection failures
    Signature,
    /// Failures while invoking members
    Invocation,
}

impl ClassError {
    /// Create an error raised by user code
    pub fn raised(message: impl Into<String>) -> Self {
        ClassError::Raised {
            message: message.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClassError::PropertyType { .. } => ErrorKind::PropertyType,
            ClassError::Override { .. } => ErrorKind::Override,
            ClassError::InvalidArgument { .. } | ClassError::InvalidArgumentType { .. } => {
                ErrorKind::InvalidArgument
            }
            ClassError::InvalidSignature { .. } => ErrorKind::Signature,
            ClassError::NotAFunction { .. }
            | ClassError::NotAnInstance
            | ClassError::Raised { .. } => ErrorKind::Invocation,
        }
    }
}

fn join_counts(counts: &[usize]) -> String {
    counts
        .iter()
        .map(|count| count.to_string())
        .collect::<Vec<_>>()
        .join(" or ")
}

/// Result alias used throughout the crate
pub type ClassResult<T> = Result<T, ClassError>;
