pub mod errors;
pub mod generator;
pub mod passes;
pub mod types;

pub use errors::*;
pub use generator::*;
pub use passes::*;
pub use types::*;
