//! Error kinds and diagnostic formatting.
//!
//! A failing line aborts the whole run: the error is wrapped once, at the
//! file-processing level, with the source filename, 1-based line number and
//! the raw line text. There is no partial recovery.

use std::fmt;
use std::path::{Path, PathBuf};

/// The distinct failure kinds the interpreter can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptError {
    /// A line with no key/value delimiter, or an empty value after trim.
    InvalidLine,
    /// An opening parenthesis with no matching close.
    UnbalancedParentheses,
    /// A function name not in the builtin table.
    UnknownFunction,
    /// A malformed expression.
    SyntaxError,
    /// Leftover characters after a complete expression parse.
    TrailingInput,
    /// An expression with no tokens at all.
    EmptyExpression,
    /// No binary operator was consumed. A control signal, not a user-facing
    /// error: callers keep the original text instead of surfacing it.
    NotAMathExpression,
    /// An ordering comparison on a non-numeric operand.
    NotANumber,
    /// The script file could not be read.
    FileOpenFailure,
    /// A condition with a missing operand.
    InvalidIfStatement,
}

impl ScriptError {
    pub fn message(self) -> &'static str {
        match self {
            Self::InvalidLine => "invalid line",
            Self::UnbalancedParentheses => "unbalanced parentheses",
            Self::UnknownFunction => "unknown function",
            Self::SyntaxError => "syntax error",
            Self::TrailingInput => "trailing input after expression",
            Self::EmptyExpression => "no expression present",
            Self::NotAMathExpression => "not a math expression",
            Self::NotANumber => "not a number",
            Self::FileOpenFailure => "failed to open script",
            Self::InvalidIfStatement => "invalid condition",
        }
    }
}

/// Where in a script an error was detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineContext {
    pub file: PathBuf,
    /// 1-based line number.
    pub line: usize,
    /// The raw line text, as read from the file.
    pub text: String,
}

/// A script error with optional detail and source context.
#[derive(Debug, Clone)]
pub struct ScriptDiagnostic {
    pub error: ScriptError,
    pub detail: Option<String>,
    pub context: Option<LineContext>,
}

impl ScriptDiagnostic {
    pub fn new(error: ScriptError) -> Self {
        Self {
            error,
            detail: None,
            context: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Attach source context unless the diagnostic already carries some.
    /// Errors from a nested `include` keep the inner file's context.
    pub fn at_line(mut self, file: &Path, line: usize, text: &str) -> Self {
        if self.context.is_none() {
            self.context = Some(LineContext {
                file: file.to_path_buf(),
                line,
                text: text.to_string(),
            });
        }
        self
    }
}

impl fmt::Display for ScriptDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error: {}", self.error.message())?;

        if let Some(ref detail) = self.detail {
            write!(f, ": {detail}")?;
        }

        if let Some(ref ctx) = self.context {
            write!(f, "\n  at {}, line {}", ctx.file.display(), ctx.line)?;
            write!(f, "\n  | {}", ctx.text)?;
        }

        Ok(())
    }
}

impl std::error::Error for ScriptDiagnostic {}

/// Convenience alias.
pub type ScriptResult<T> = Result<T, ScriptDiagnostic>;
