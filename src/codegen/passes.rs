use inkwell::module::Module;
use inkwell::passes::PassBuilderOptions;
use inkwell::targets::{CodeModel, InitializationConfig, RelocMode, Target, TargetMachine};
use inkwell::OptimizationLevel;

use crate::codegen::CodegenError;

/// Highest level with a distinct pipeline; larger levels are clamped to it
pub const MAX_OPT_LEVEL: u8 = 3;

/// Map a numeric level onto LLVM's code generation levels
#[must_use]
pub fn llvm_opt_level(level: u8) -> OptimizationLevel {
    match level {
        0 => OptimizationLevel::None,
        1 => OptimizationLevel::Less,
        2 => OptimizationLevel::Default,
        _ => OptimizationLevel::Aggressive,
    }
}

/// New pass manager pipeline description for `level`
#[must_use]
pub fn pipeline(level: u8) -> String {
    format!("default<O{}>", level.min(MAX_OPT_LEVEL))
}

fn native_target_machine(level: u8) -> Result<TargetMachine, CodegenError> {
    Target::initialize_native(&InitializationConfig::default()).map_err(CodegenError::Target)?;

    let triple = TargetMachine::get_default_triple();
    let target = Target::from_triple(&triple).map_err(|e| CodegenError::Target(e.to_string()))?;
    let cpu = TargetMachine::get_host_cpu_name().to_string();
    let features = TargetMachine::get_host_cpu_features().to_string();

    target
        .create_target_machine(
            &triple,
            &cpu,
            &features,
            llvm_opt_level(level),
            RelocMode::Default,
            CodeModel::Default,
        )
        .ok_or_else(|| CodegenError::Target(format!(
                "no target machine for '{}'",
                triple.as_str().to_string_lossy()
            )))
}

/// Optimize `module` in place. Level 0 leaves it untouched.
/// # Errors
/// Returns `CodegenError::Target` when the host target is unavailable and
/// `CodegenError::Optimization` when LLVM rejects the pipeline
pub fn optimize_module(module: &Module<'_>, level: u8) -> Result<(), CodegenError> {
    if level == 0 {
        return Ok(());
    }

    let machine = native_target_machine(level)?;
    module
        .run_passes(&pipeline(level), &machine, PassBuilderOptions::create())
        .map_err(|e| CodegenError::Optimization(e.to_string()))
}
