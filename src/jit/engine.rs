use inkwell::execution_engine::{ExecutionEngine, JitFunction};
use inkwell::module::Module;
use inkwell::targets::{InitializationConfig, Target};

use crate::codegen::{llvm_opt_level, ENTRY_POINT};
use crate::jit::JitError;

/// Signature of the generated `main`
pub type EntryPoint = unsafe extern "C" fn();

/// Machine code for one generated module, ready to run
pub struct JitEngine<'ctx> {
    // Owns the compiled code `entry` points into
    _engine: ExecutionEngine<'ctx>,
    entry: JitFunction<'ctx, EntryPoint>,
}

impl<'ctx> JitEngine<'ctx> {
    /// Compile `module` for the host and resolve its entry point.
    /// `getchar`/`putchar` are resolved against the running process.
    pub fn new(module: &Module<'ctx>, opt_level: u8) -> Result<Self, JitError> {
        Target::initialize_native(&InitializationConfig::default()).map_err(JitError::EngineCreation)?;

        let engine = module
            .create_jit_execution_engine(llvm_opt_level(opt_level))
            .map_err(|e| JitError::EngineCreation(e.to_string()))?;

        // SAFETY: the code generator always defines `main` as `void ()`,
        // which is exactly `EntryPoint`.
        let entry = unsafe { engine.get_function::<EntryPoint>(ENTRY_POINT) }
            .map_err(|e| JitError::EntryPointLookup(e.to_string()))?;

        Ok(Self {
            _engine: engine,
            entry,
        })
    }

    /// Run the generated program to completion on the calling thread.
    ///
    /// # Safety
    /// The tape is not bounds-checked. The program must keep its data pointer
    /// within the tape, otherwise it reads and writes arbitrary memory of
    /// this process.
    pub unsafe fn run(&self) {
        self.entry.call();
    }
}
