//! Signature inspection
//!
//! Reads the declared formal-parameter names of a callable. Only the first name
//! matters to the class builder, which compares it against `$super` to decide
//! whether a member is an override that needs its parent implementation injected.
//!
//! Functions built in Rust carry their parameter list as metadata. Functions
//! declared from textual source go through [`parse_parameter_names`], which
//! strips comments and whitespace from the first parenthesised list:
//!
//! ```text
//! function ($super, a /* first */, b)  ->  ["$super", "a", "b"]
//! function named()                     ->  []
//! ($super, x) => ...                   ->  ["$super", "x"]
//! ```

use crate::defaults::SUPER_PARAM;
use crate::error::{ClassError, ClassResult};
use crate::function::Function;
use once_cell::sync::Lazy;
use regex::Regex;

static COMMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)//[^\r\n]*|/\*.*?\*/").expect("comment pattern is valid")
});

static PARAMETER_LIST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\s(]*(?:function\b[^(]*)?\(([^)]*)\)").expect("parameter list pattern is valid")
});

/// Declared parameter names of `function`, in order
pub fn parameter_names(function: &Function) -> &[String] {
    function.params()
}

/// Whether `function` declares `$super` as its first parameter
pub fn requests_delegate(function: &Function) -> bool {
    parameter_names(function)
        .first()
        .is_some_and(|first| first == SUPER_PARAM)
}

/// Parse the parameter names out of textual function source
pub fn parse_parameter_names(source: &str) -> ClassResult<Vec<String>> {
    let stripped = COMMENT.replace_all(source, "");
    let list = PARAMETER_LIST
        .captures(&stripped)
        .and_then(|caps| caps.get(1))
        .ok_or_else(|| ClassError::InvalidSignature {
            signature: source.to_string(),
        })?;

    let names: Vec<String> = list
        .as_str()
        .split(',')
        .map(|param| {
            let name = param.split('=').next().unwrap_or("");
            name.chars().filter(|c| !c.is_whitespace()).collect::<String>()
        })
        .collect();

    if names.len() == 1 && names[0].is_empty() {
        return Ok(Vec::new());
    }
    Ok(names)
}
