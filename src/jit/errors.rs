use thiserror::Error;

/// JIT construction error types
#[derive(Error, Debug)]
pub enum JitError {
    #[error("Could not create execution engine: {0}")]
    EngineCreation(String),

    #[error("Could not find entry point: {0}")]
    EntryPointLookup(String),
}
