//! Line splitting and value resolution.
//!
//! Every meaningful line is one `key<delimiter>value` pair: `=` for
//! assignments, `:` for directives. The value goes through the full
//! pipeline before anyone sees it: variable substitution first, then the
//! whole-value math pass, then embedded-expression resolution. Substitution
//! runs first so `($x+1)` expands `$x` before evaluation.

use crate::embed;
use crate::env::Environment;
use crate::error::{ScriptDiagnostic, ScriptError, ScriptResult};

/// A split line: the command or variable name, and its resolved value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub key: String,
    pub value: String,
}

/// Split `line` at the first `delimiter` and resolve the value.
///
/// Fails with `InvalidLine` when the delimiter is missing or the value is
/// empty after left-trim.
pub fn split_line(
    env: &Environment,
    line: &str,
    delimiter: char,
) -> ScriptResult<Directive> {
    let Some((key, value)) = line.split_once(delimiter) else {
        return Err(ScriptDiagnostic::new(ScriptError::InvalidLine)
            .with_detail(format!("no '{delimiter}' in '{line}'")));
    };

    let value = value.trim_start_matches(' ');
    if value.is_empty() {
        return Err(ScriptDiagnostic::new(ScriptError::InvalidLine)
            .with_detail(format!("empty value in '{line}'")));
    }

    let value = env.substitute(value);
    let value = embed::resolve_math(&value);
    let value = embed::resolve_embedded(&value);

    Ok(Directive {
        key: key.trim().to_string(),
        value,
    })
}
