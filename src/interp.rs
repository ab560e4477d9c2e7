//! The streaming control-flow interpreter.
//!
//! A script is interpreted one line at a time with no syntax tree: block
//! structure is implied entirely by indentation, and the only persistent
//! state between lines is a small cursor (skip threshold + loop anchor).
//! `while` re-executes its body by jumping the line index back to the
//! recorded anchor, the lone deviation from forward streaming.
//!
//! Anything that is not an assignment or one of the builtin directives
//! (`if`, `while`, `include`) is handed to the host callback, which may
//! mutate the shared variable environment.

use std::fs;
use std::path::{Path, PathBuf};

use crate::env::Environment;
use crate::error::{ScriptDiagnostic, ScriptError, ScriptResult};
use crate::parser;

/// Host-supplied command handler: `(command, value, source_file,
/// indentation, environment)`.
pub type HostCallback<'a> = dyn FnMut(&str, &str, &Path, usize, &mut Environment) + 'a;

/// Control-flow outcome of one interpreted line.
enum Flow {
    Continue,
    /// A false `if`: skip all deeper-indented lines.
    SkipBody,
    /// A true `while`: anchor here and run the body.
    EnterLoop,
    /// A false `while`: skip the body and drop any anchor.
    LeaveLoop,
}

/// A relational operator for `if`/`while` conditions.
struct Relation {
    sign: &'static str,
    test: fn(&str, &str) -> ScriptResult<bool>,
}

/// Scanned in this order by substring search, not tokenized. `>` matches
/// before `>=` ever can, and `<` before `<=`.
const RELATIONS: [Relation; 6] = [
    Relation { sign: "==", test: |l, r| Ok(l == r) },
    Relation { sign: "!=", test: |l, r| Ok(l != r) },
    Relation { sign: ">", test: |l, r| Ok(numeric_operand(l)? > numeric_operand(r)?) },
    Relation { sign: "<", test: |l, r| Ok(numeric_operand(l)? < numeric_operand(r)?) },
    Relation { sign: "<=", test: |l, r| Ok(numeric_operand(l)? <= numeric_operand(r)?) },
    Relation { sign: ">=", test: |l, r| Ok(numeric_operand(l)? >= numeric_operand(r)?) },
];

/// Evaluate an `if`/`while` condition. The first relation found anywhere in
/// the text splits it; `==`/`!=` compare trimmed strings, the ordering
/// relations compare numbers. No relation present means false.
pub fn eval_condition(condition: &str) -> ScriptResult<bool> {
    for relation in &RELATIONS {
        if let Some(pos) = condition.find(relation.sign) {
            let left = condition[..pos].trim();
            let right = condition[pos + relation.sign.len()..].trim();
            return (relation.test)(left, right);
        }
    }
    Ok(false)
}

fn numeric_operand(text: &str) -> ScriptResult<f64> {
    if text.is_empty() {
        return Err(ScriptDiagnostic::new(ScriptError::InvalidIfStatement)
            .with_detail("missing comparison operand"));
    }
    text.parse().map_err(|_| {
        ScriptDiagnostic::new(ScriptError::NotANumber)
            .with_detail(format!("'{text}' in comparison"))
    })
}

/// Line index and indentation of an active `while` header.
#[derive(Debug, Clone, Copy)]
struct LoopAnchor {
    line: usize,
    indentation: usize,
}

/// An interpreter context. One environment is shared across the whole run,
/// nested includes included; cursor state is per file.
#[derive(Debug, Default)]
pub struct Interpreter {
    env: Environment,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_env(env: Environment) -> Self {
        Self { env }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    /// Interpret a script file to completion.
    pub fn run(&mut self, path: &Path, host: &mut HostCallback<'_>) -> ScriptResult<()> {
        let source = fs::read_to_string(path).map_err(|err| {
            ScriptDiagnostic::new(ScriptError::FileOpenFailure)
                .with_detail(format!("{}: {err}", path.display()))
        })?;
        self.run_source(&source, path, host)
    }

    /// Interpret `source` as the contents of `path`. Errors pick up the
    /// file, 1-based line number and raw line text on the way out.
    pub fn run_source(
        &mut self,
        source: &str,
        path: &Path,
        host: &mut HostCallback<'_>,
    ) -> ScriptResult<()> {
        let lines: Vec<&str> = source.lines().collect();
        let mut skip_to: Option<usize> = None;
        let mut anchor: Option<LoopAnchor> = None;

        let mut index = 0;
        loop {
            if index >= lines.len() {
                // EOF re-enters an active loop the same way a dedented
                // line does.
                match anchor {
                    Some(back) if back.line != index => {
                        index = back.line;
                        continue;
                    }
                    _ => break,
                }
            }

            let raw = lines[index];
            let indentation = raw.len() - raw.trim_start_matches(' ').len();

            if skip_to.is_some_and(|limit| indentation > limit) {
                index += 1;
                continue;
            }

            let line = &raw[indentation..];
            if line.is_empty() || line.starts_with('#') {
                index += 1;
                continue;
            }

            skip_to = None;

            if let Some(back) = anchor {
                if indentation <= back.indentation && index != back.line {
                    index = back.line;
                    continue;
                }
            }

            let flow = self
                .interpret_line(line, path, indentation, host)
                .map_err(|err| err.at_line(path, index + 1, raw))?;

            match flow {
                Flow::Continue => {}
                Flow::SkipBody => skip_to = Some(indentation),
                Flow::EnterLoop => {
                    anchor = Some(LoopAnchor {
                        line: index,
                        indentation,
                    });
                }
                Flow::LeaveLoop => {
                    skip_to = Some(indentation);
                    anchor = None;
                }
            }
            index += 1;
        }

        Ok(())
    }

    fn interpret_line(
        &mut self,
        line: &str,
        file: &Path,
        indentation: usize,
        host: &mut HostCallback<'_>,
    ) -> ScriptResult<Flow> {
        if line.starts_with('$') {
            let assignment = parser::split_line(&self.env, line, '=')?;
            self.env.set(assignment.key, assignment.value);
            return Ok(Flow::Continue);
        }

        let directive = parser::split_line(&self.env, line, ':')?;
        self.dispatch(&directive.key, &directive.value, file, indentation, host)
    }

    fn dispatch(
        &mut self,
        command: &str,
        value: &str,
        file: &Path,
        indentation: usize,
        host: &mut HostCallback<'_>,
    ) -> ScriptResult<Flow> {
        match command {
            "if" => Ok(if eval_condition(value)? {
                Flow::Continue
            } else {
                Flow::SkipBody
            }),
            "while" => Ok(if eval_condition(value)? {
                Flow::EnterLoop
            } else {
                Flow::LeaveLoop
            }),
            "include" => {
                let target = resolve_include(value, file);
                self.run(&target, host)?;
                Ok(Flow::Continue)
            }
            _ => {
                host(command, value, file, indentation, &mut self.env);
                Ok(Flow::Continue)
            }
        }
    }
}

/// Resolve an include target against the directory of the including file.
/// Absolute paths pass through unchanged.
fn resolve_include(target: &str, parent: &Path) -> PathBuf {
    let target = Path::new(target);
    if target.is_absolute() {
        return target.to_path_buf();
    }
    match parent.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(target),
        _ => target.to_path_buf(),
    }
}
