//! One-shot compilation pipeline: source → AST → LLVM module, then either
//! IR text (emit mode) or a JIT-compiled `main` that is called once
//! (execute mode).

use std::io::Write;
use std::path::Path;

use inkwell::context::Context;
use thiserror::Error;

use crate::codegen::{CodeGenerator, CodegenError};
use crate::config::CompileOptions;
use crate::jit::{JitEngine, JitError};
use crate::parser::{parse, ParserError, Program};

/// Module name used when the source has no file name
pub const DEFAULT_MODULE_NAME: &str = "brainfuck";

/// Compilation error types
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("syntax error: {0}")]
    Syntax(#[from] ParserError),

    #[error(transparent)]
    Codegen(#[from] CodegenError),

    #[error(transparent)]
    Jit(#[from] JitError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct Driver {
    options: CompileOptions,
}

impl Default for Driver {
    fn default() -> Self {
        Self::new(CompileOptions::default())
    }
}

impl Driver {
    #[must_use]
    pub fn new(options: CompileOptions) -> Self {
        Self { options }
    }

    pub fn parse(&self, source: &str) -> Result<Program, CompileError> {
        Ok(parse(source)?)
    }

    /// Lower and optionally optimize `program` into a fresh module
    fn build<'ctx>(
        &self,
        context: &'ctx Context,
        module_name: &str,
        program: &Program,
    ) -> Result<CodeGenerator<'ctx>, CompileError> {
        let mut codegen = CodeGenerator::new(context, module_name, &self.options);
        codegen.generate(program)?;
        codegen.optimize(self.options.opt_level)?;
        Ok(codegen)
    }

    /// Compile `source` to textual LLVM IR
    pub fn emit_ir(&self, source: &str, module_name: &str) -> Result<String, CompileError> {
        let program = self.parse(source)?;
        let context = Context::create();
        let codegen = self.build(&context, module_name, &program)?;
        Ok(codegen.print_to_string())
    }

    /// Compile `source` and write its IR text to `sink`
    pub fn emit<W: Write>(&self, source: &str, module_name: &str, sink: &mut W) -> Result<(), CompileError> {
        let ir = self.emit_ir(source, module_name)?;
        sink.write_all(ir.as_bytes())?;
        sink.flush()?;
        Ok(())
    }

    /// Compile `source` and write its IR text to the file at `path`
    pub fn emit_to_file(&self, source: &str, module_name: &str, path: &Path) -> Result<(), CompileError> {
        let program = self.parse(source)?;
        let context = Context::create();
        let codegen = self.build(&context, module_name, &program)?;
        codegen.write_to_file(path)?;
        Ok(())
    }

    /// Compile `source`, JIT it and run its `main` once.
    ///
    /// Nothing is executed unless parsing, code generation and JIT
    /// construction all succeed.
    ///
    /// # Safety
    /// See [`JitEngine::run`]: the program must not move its data pointer
    /// outside the tape.
    pub unsafe fn execute(&self, source: &str) -> Result<(), CompileError> {
        let program = self.parse(source)?;
        let context = Context::create();
        let codegen = self.build(&context, DEFAULT_MODULE_NAME, &program)?;
        let jit = JitEngine::new(codegen.module(), self.options.opt_level)?;
        jit.run();
        Ok(())
    }
}
