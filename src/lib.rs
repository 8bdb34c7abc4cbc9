//! Brainfuck compiler
//!
//! Compiles the eight-symbol tape-machine language to LLVM IR, either
//! emitted as text or JIT-compiled and run in process.

pub mod codegen;
pub mod config;
pub mod driver;
pub mod jit;
pub mod lexer;
pub mod parser;

pub use codegen::*;
pub use config::*;
pub use driver::*;
pub use jit::*;
pub use lexer::*;
pub use parser::*;
