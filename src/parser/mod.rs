pub mod ast;
pub mod commands;
pub mod errors;

pub use ast::*;
pub use commands::*;
pub use errors::*;
