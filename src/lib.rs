//! DustScript, a minimal line-oriented scripting language.
//!
//! Each line is a variable assignment (`$name = value`), a control-flow
//! directive (`if`, `while`, `include`), or an opaque command handed to a
//! host callback. Blocks are formed by indentation alone; there is no
//! syntax tree and no bytecode, just a streaming interpreter with a small
//! cursor and an arithmetic expression evaluator.

pub mod embed;
pub mod env;
pub mod error;
pub mod interp;
pub mod math;
pub mod parser;
