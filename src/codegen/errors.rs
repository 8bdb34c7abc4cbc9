use thiserror::Error;

/// Code generation error types
#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("LLVM error: {0}")]
    Builder(#[from] inkwell::builder::BuilderError),

    #[error("Invalid cell size {0}: expected 8, 16, 32 or 64 bits")]
    InvalidCellSize(u32),

    #[error("Invalid storage size {0}: expected between 1 and {max} cells", max = u32::MAX)]
    InvalidStorageSize(usize),

    #[error("Module already contains a 'main' function")]
    AlreadyGenerated,

    #[error("Call to '{0}' produced no value")]
    MissingReturnValue(&'static str),

    #[error("Generated module failed verification: {0}")]
    VerificationFailed(String),

    #[error("Target error: {0}")]
    Target(String),

    #[error("Optimization failed: {0}")]
    Optimization(String),

    #[error("Failed to emit IR: {0}")]
    Emit(String),
}
