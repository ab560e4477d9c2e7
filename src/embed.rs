//! Embedded-expression resolution inside textual values.
//!
//! Values may carry parenthesized arithmetic anywhere in otherwise ordinary
//! text: `x=(1+2) and y=(3*4)` becomes `x=3 and y=12`. A backslash before an
//! opening parenthesis keeps it literal. Spans that do not evaluate as
//! arithmetic are left exactly as written.

use crate::math;

/// Evaluate an entire value as arithmetic. Any math failure, including
/// "this is not arithmetic at all", returns the input unchanged.
pub fn resolve_math(text: &str) -> String {
    match math::eval(text) {
        Ok(value) => math::format_number(value),
        Err(_) => text.to_string(),
    }
}

/// Replace every embedded `(...)` arithmetic span with its formatted result.
pub fn resolve_embedded(text: &str) -> String {
    resolve_from(text, 0)
}

fn resolve_from(text: &str, from: usize) -> String {
    let Some(offset) = text[from..].find('(') else {
        return text.to_string();
    };
    let start = from + offset;

    // An escaped parenthesis is literal: drop the backslash and stop
    // scanning for this pass.
    if start > 0 && text.as_bytes()[start - 1] == b'\\' {
        let mut out = String::with_capacity(text.len() - 1);
        out.push_str(&text[..start - 1]);
        out.push_str(&text[start..]);
        return out;
    }

    let Some(end) = matching_close(text, start) else {
        // No matching close paren anywhere; leave the value as written.
        return text.to_string();
    };

    match math::eval(&text[start + 1..end]) {
        Ok(value) => {
            let mut out = String::with_capacity(text.len());
            out.push_str(&text[..start]);
            out.push_str(&math::format_number(value));
            out.push_str(&text[end + 1..]);
            // The splice may expose further spans; rescan from the start.
            resolve_from(&out, 0)
        }
        // Not arithmetic: keep the span and keep scanning after it.
        Err(_) => resolve_from(text, end + 1),
    }
}

/// Index of the `)` matching the `(` at `open`, counting nesting.
fn matching_close(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, ch) in text[open..].char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_spans() {
        assert_eq!(
            resolve_embedded("x=(1+2) and y=(3*4)"),
            "x=3 and y=12"
        );
    }

    #[test]
    fn no_parentheses_is_unchanged() {
        assert_eq!(resolve_embedded("plain text"), "plain text");
    }

    #[test]
    fn nested_span() {
        assert_eq!(resolve_embedded("v=((1+2)*3)"), "v=9");
    }

    #[test]
    fn escaped_paren_is_literal() {
        assert_eq!(resolve_embedded("keep \\(1+2) here"), "keep (1+2) here");
    }

    #[test]
    fn non_math_span_is_untouched() {
        assert_eq!(resolve_embedded("say (hello) now"), "say (hello) now");
    }

    #[test]
    fn non_math_then_math() {
        assert_eq!(resolve_embedded("(hello) (2+2)"), "(hello) 4");
    }

    #[test]
    fn unmatched_open_is_unchanged() {
        assert_eq!(resolve_embedded("broken (1+2"), "broken (1+2");
    }

    #[test]
    fn plain_number_span_is_untouched() {
        // "(42)"'s inner text has no operator, so the span stays as written.
        assert_eq!(resolve_embedded("n=(42)"), "n=(42)");
    }

    #[test]
    fn whole_value_math() {
        assert_eq!(resolve_math("1+2"), "3");
        assert_eq!(resolve_math("42"), "42");
        assert_eq!(resolve_math("0 < 3"), "0 < 3");
        assert_eq!(resolve_math("some words"), "some words");
    }
}
