//! Arithmetic expression evaluator.
//!
//! A small tokenizer plus recursive descent over a fixed operator table:
//! each precedence level recurses into the next tighter one, so every level
//! is left-associative and the table order `+ - * / % ^` (loosest first) is
//! the whole precedence story. Note that this makes `^` left-associative,
//! unlike the usual right-associative convention: `2^3^2` is `(2^3)^2`.
//!
//! Whether a string is arithmetic at all is itself an answer: an input that
//! parses but never consumes an operator yields [`MathError::NotMath`],
//! which callers treat as "leave the text alone" rather than as a failure.

use std::fmt;

use crate::error::{ScriptDiagnostic, ScriptError};

/// A binary operator. Table order is evaluation order, loosest level first.
struct BinaryOp {
    sign: char,
    apply: fn(f64, f64) -> f64,
}

const OPERATORS: [BinaryOp; 6] = [
    BinaryOp { sign: '+', apply: |a, b| a + b },
    BinaryOp { sign: '-', apply: |a, b| a - b },
    BinaryOp { sign: '*', apply: |a, b| a * b },
    BinaryOp { sign: '/', apply: |a, b| a / b },
    BinaryOp { sign: '%', apply: |a, b| a % b },
    BinaryOp { sign: '^', apply: f64::powf },
];

/// A builtin unary function, matched case-insensitively (tokens are
/// upper-cased during lexing).
struct MathFunction {
    name: &'static str,
    apply: fn(f64) -> f64,
}

const FUNCTIONS: [MathFunction; 21] = [
    MathFunction { name: "SIN", apply: f64::sin },
    MathFunction { name: "COS", apply: f64::cos },
    MathFunction { name: "TAN", apply: f64::tan },
    MathFunction { name: "ASIN", apply: f64::asin },
    MathFunction { name: "ACOS", apply: f64::acos },
    MathFunction { name: "ATAN", apply: f64::atan },
    MathFunction { name: "SINH", apply: f64::sinh },
    MathFunction { name: "COSH", apply: f64::cosh },
    MathFunction { name: "TANH", apply: f64::tanh },
    MathFunction { name: "ASINH", apply: f64::asinh },
    MathFunction { name: "ACOSH", apply: f64::acosh },
    MathFunction { name: "ATANH", apply: f64::atanh },
    MathFunction { name: "LN", apply: f64::ln },
    MathFunction { name: "LOG", apply: f64::log10 },
    MathFunction { name: "EXP", apply: f64::exp },
    MathFunction { name: "SQRT", apply: f64::sqrt },
    MathFunction { name: "SQR", apply: |a| a * a },
    MathFunction { name: "ROUND", apply: f64::round },
    MathFunction { name: "FLOOR", apply: f64::floor },
    MathFunction { name: "CEIL", apply: f64::ceil },
    MathFunction { name: "ABS", apply: f64::abs },
];

/// Evaluation failures. `NotMath` is a control signal: the input lexed and
/// parsed but contained no operator, so it is ordinary text, not arithmetic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MathError {
    EmptyExpression,
    /// Characters remained after a complete parse.
    TrailingInput(String),
    /// The offending token text.
    Syntax(String),
    UnbalancedParentheses,
    UnknownFunction(String),
    NotMath,
}

impl fmt::Display for MathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyExpression => write!(f, "no expression present"),
            Self::TrailingInput(rest) => write!(f, "trailing input after expression: '{rest}'"),
            Self::Syntax(token) => write!(f, "syntax error near '{token}'"),
            Self::UnbalancedParentheses => write!(f, "unbalanced parentheses"),
            Self::UnknownFunction(name) => write!(f, "unknown function '{name}'"),
            Self::NotMath => write!(f, "not a math expression"),
        }
    }
}

impl std::error::Error for MathError {}

impl From<MathError> for ScriptDiagnostic {
    fn from(err: MathError) -> Self {
        let kind = match err {
            MathError::EmptyExpression => ScriptError::EmptyExpression,
            MathError::TrailingInput(_) => ScriptError::TrailingInput,
            MathError::Syntax(_) => ScriptError::SyntaxError,
            MathError::UnbalancedParentheses => ScriptError::UnbalancedParentheses,
            MathError::UnknownFunction(_) => ScriptError::UnknownFunction,
            MathError::NotMath => ScriptError::NotAMathExpression,
        };
        ScriptDiagnostic::new(kind).with_detail(err.to_string())
    }
}

/// Evaluate a standalone arithmetic expression.
pub fn eval(expression: &str) -> Result<f64, MathError> {
    let mut cursor = Cursor::new(expression);
    cursor.next_token();
    if cursor.token == Token::End {
        return Err(MathError::EmptyExpression);
    }

    let result = cursor.eval_level(0)?;

    if let Token::Function(name) = &cursor.token {
        return Err(MathError::Syntax(name.clone()));
    }
    let rest = cursor.rest();
    if !rest.is_empty() {
        return Err(MathError::TrailingInput(rest));
    }
    if !cursor.saw_operator {
        return Err(MathError::NotMath);
    }

    Ok(result)
}

/// Render a numeric result the way script values carry it: six decimals,
/// then trailing zeros and a trailing dot stripped (`4.0` -> `4`,
/// `4.50` -> `4.5`).
pub fn format_number(value: f64) -> String {
    let rendered = format!("{value:.6}");
    if rendered.contains('.') {
        let rendered = rendered.trim_end_matches('0');
        let rendered = rendered.trim_end_matches('.');
        rendered.to_string()
    } else {
        rendered
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    /// A single operator character or parenthesis.
    Delimiter(char),
    Number(String),
    /// Upper-cased candidate function name.
    Function(String),
    End,
}

/// Tokenizer and parser state over an immutable character buffer.
/// Holds the single current token; the grammar advances it as it consumes.
struct Cursor {
    chars: Vec<char>,
    pos: usize,
    token: Token,
    /// Whether any delimiter token was ever consumed. An expression where
    /// this never happens is not arithmetic at all.
    saw_operator: bool,
}

fn is_delimiter(ch: char) -> bool {
    ch == '(' || ch == ')' || OPERATORS.iter().any(|op| op.sign == ch)
}

fn lookup_function(name: &str) -> Result<fn(f64) -> f64, MathError> {
    FUNCTIONS
        .iter()
        .find(|func| func.name == name)
        .map(|func| func.apply)
        .ok_or_else(|| MathError::UnknownFunction(name.to_string()))
}

impl Cursor {
    fn new(expression: &str) -> Self {
        Self {
            chars: expression.chars().collect(),
            pos: 0,
            token: Token::End,
            saw_operator: false,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    /// Unconsumed source after the current token, used for the top-level
    /// trailing-input check.
    fn rest(&self) -> String {
        self.chars[self.pos..].iter().collect()
    }

    fn next_token(&mut self) {
        self.skip_whitespace();
        let Some(ch) = self.peek() else {
            self.token = Token::End;
            return;
        };

        if is_delimiter(ch) {
            self.pos += 1;
            self.saw_operator = true;
            self.token = Token::Delimiter(ch);
        } else if ch.is_ascii_alphabetic() {
            // Collect everything up to the next delimiter, skipping any
            // interior whitespace, upper-cased for the function table.
            let mut name = String::new();
            loop {
                self.skip_whitespace();
                match self.peek() {
                    Some(c) if !is_delimiter(c) => {
                        name.push(c.to_ascii_uppercase());
                        self.pos += 1;
                    }
                    _ => break,
                }
            }
            self.token = Token::Function(name);
        } else if ch.is_ascii_digit() || ch == '.' {
            let mut number = String::new();
            loop {
                self.skip_whitespace();
                match self.peek() {
                    Some(c) if c.is_ascii_digit() || c == '.' => {
                        number.push(c);
                        self.pos += 1;
                    }
                    _ => break,
                }
            }
            self.token = Token::Number(number);
        } else {
            // Unrecognized character. Leave it unconsumed; the top-level
            // trailing-input check reports it.
            self.token = Token::End;
        }
    }

    /// Evaluate one precedence level: the next tighter level supplies the
    /// left value, then operands are folded in while the current token is
    /// this level's operator.
    fn eval_level(&mut self, level: usize) -> Result<f64, MathError> {
        let mut value = self.eval_tighter(level)?;
        let op = &OPERATORS[level];
        while self.token == Token::Delimiter(op.sign) {
            self.next_token();
            let right = self.eval_tighter(level)?;
            value = (op.apply)(value, right);
        }
        Ok(value)
    }

    fn eval_tighter(&mut self, level: usize) -> Result<f64, MathError> {
        if level + 1 < OPERATORS.len() {
            self.eval_level(level + 1)
        } else {
            self.eval_primary()
        }
    }

    fn eval_primary(&mut self) -> Result<f64, MathError> {
        let negative = self.token == Token::Delimiter('-');
        if negative {
            self.next_token();
        }

        let mut pending: Option<fn(f64) -> f64> = None;
        if let Token::Function(name) = &self.token {
            pending = Some(lookup_function(name)?);
            self.next_token();
        }

        let result = if self.token == Token::Delimiter('(') {
            self.next_token();
            let mut inner = self.eval_level(0)?;
            if self.token != Token::Delimiter(')') {
                return Err(MathError::UnbalancedParentheses);
            }
            if let Some(func) = pending {
                inner = func(inner);
            }
            self.next_token();
            inner
        } else if let Token::Number(text) = &self.token {
            let parsed: f64 = text
                .parse()
                .map_err(|_| MathError::Syntax(text.clone()))?;
            self.next_token();
            parsed
        } else {
            return Err(MathError::Syntax(self.token_text()));
        };

        Ok(if negative { -result } else { result })
    }

    fn token_text(&self) -> String {
        match &self.token {
            Token::Delimiter(ch) => ch.to_string(),
            Token::Number(text) | Token::Function(text) => text.clone(),
            Token::End => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence() {
        assert_eq!(eval("2+3*4").unwrap(), 14.0);
        assert_eq!(eval("2*3+4").unwrap(), 10.0);
        assert_eq!(eval("(2+3)*4").unwrap(), 20.0);
    }

    #[test]
    fn left_associativity_within_level() {
        assert_eq!(eval("10-4-3").unwrap(), 3.0);
        assert_eq!(eval("100/10/5").unwrap(), 2.0);
        // `^` is left-associative here: (2^3)^2, not 2^(3^2).
        assert_eq!(eval("2^3^2").unwrap(), 64.0);
    }

    #[test]
    fn mixed_additive() {
        // `+` binds looser than `-`, but left-to-right folding keeps the
        // conventional result.
        assert_eq!(eval("2-3+4").unwrap(), 3.0);
    }

    #[test]
    fn remainder_is_fmod() {
        assert_eq!(eval("7%3").unwrap(), 1.0);
        assert_eq!(eval("7.5%2").unwrap(), 1.5);
    }

    #[test]
    fn division_yields_fractions() {
        assert_eq!(eval("10/4").unwrap(), 2.5);
    }

    #[test]
    fn unary_minus() {
        assert_eq!(eval("-5+2").unwrap(), -3.0);
        assert_eq!(eval("2*-3").unwrap(), -6.0);
        assert_eq!(eval("-(2+3)").unwrap(), -5.0);
    }

    #[test]
    fn functions() {
        assert_eq!(eval("SQRT(16)").unwrap(), 4.0);
        assert_eq!(eval("ABS(-5)").unwrap(), 5.0);
        assert_eq!(eval("sqr(3)").unwrap(), 9.0);
        assert_eq!(eval("floor(2.9)").unwrap(), 2.0);
        assert_eq!(eval("-sqrt(16)").unwrap(), -4.0);
    }

    #[test]
    fn function_with_space_before_paren() {
        assert_eq!(eval("SQRT (16)").unwrap(), 4.0);
    }

    #[test]
    fn nested_parentheses() {
        assert_eq!(eval("((1+2)*3)").unwrap(), 9.0);
        assert_eq!(eval("2*(3+(4-1))").unwrap(), 12.0);
    }

    #[test]
    fn unknown_function() {
        assert!(matches!(
            eval("FROB(2)"),
            Err(MathError::UnknownFunction(name)) if name == "FROB"
        ));
    }

    #[test]
    fn empty_expression() {
        assert_eq!(eval(""), Err(MathError::EmptyExpression));
        assert_eq!(eval("   "), Err(MathError::EmptyExpression));
    }

    #[test]
    fn unbalanced() {
        assert_eq!(eval("(1+2"), Err(MathError::UnbalancedParentheses));
        assert_eq!(eval("SQRT(16"), Err(MathError::UnbalancedParentheses));
    }

    #[test]
    fn syntax_error() {
        assert!(matches!(eval("2+*3"), Err(MathError::Syntax(_))));
        assert!(matches!(eval("2+"), Err(MathError::Syntax(_))));
    }

    #[test]
    fn trailing_input() {
        assert!(matches!(eval("1+2 = 3"), Err(MathError::TrailingInput(_))));
    }

    #[test]
    fn plain_number_is_not_math() {
        assert_eq!(eval("42"), Err(MathError::NotMath));
        assert_eq!(eval("3.14"), Err(MathError::NotMath));
    }

    #[test]
    fn parenthesized_number_counts_as_math() {
        // Parens are delimiter tokens, so "(5)" clears the NotMath guard.
        assert_eq!(eval("(5)").unwrap(), 5.0);
    }

    #[test]
    fn relational_text_is_rejected() {
        // `<` is not a known token; conditions never reach the evaluator as
        // a whole, they fail here and are kept as text.
        assert!(eval("0 < 3").is_err());
    }

    #[test]
    fn formatting() {
        assert_eq!(format_number(4.0), "4");
        assert_eq!(format_number(4.5), "4.5");
        assert_eq!(format_number(400.0), "400");
        assert_eq!(format_number(0.1 + 0.2), "0.3");
        assert_eq!(format_number(-2.25), "-2.25");
        assert_eq!(format_number(1.0 / 3.0), "0.333333");
    }
}
