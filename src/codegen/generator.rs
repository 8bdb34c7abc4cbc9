use std::cmp::Ordering;
use std::path::Path;

use inkwell::builder::Builder;
use inkwell::context::Context;
use inkwell::module::{Linkage, Module};
use inkwell::types::IntType;
use inkwell::values::{FunctionValue, IntValue, PointerValue};
use inkwell::AddressSpace;
use inkwell::IntPredicate;

use crate::codegen::{optimize_module, CodegenError, TapeLayout};
use crate::config::CompileOptions;
use crate::parser::{Command, Loop, Primitive, Program};

/// Name of the generated entry point
pub const ENTRY_POINT: &str = "main";
/// Name of the tape storage global
pub const STORAGE_NAME: &str = "s";
/// Name of the data pointer global
pub const POINTER_NAME: &str = "sp";

const GETCHAR: &str = "getchar";
const PUTCHAR: &str = "putchar";

/// Handles to everything the lowered commands refer to
struct Runtime<'ctx> {
    layout: TapeLayout<'ctx>,
    storage: PointerValue<'ctx>,
    pointer: PointerValue<'ctx>,
    getchar: FunctionValue<'ctx>,
    putchar: FunctionValue<'ctx>,
    main: FunctionValue<'ctx>,
}

pub struct CodeGenerator<'ctx> {
    context: &'ctx Context,
    module: Module<'ctx>,
    builder: Builder<'ctx>,

    // Tape configuration, validated when generating
    cell_size: u32,
    storage_size: usize,
}

impl<'ctx> CodeGenerator<'ctx> {
    pub fn new(context: &'ctx Context, module_name: &str, options: &CompileOptions) -> Self {
        let module = context.create_module(module_name);
        let builder = context.create_builder();

        Self {
            context,
            module,
            builder,
            cell_size: options.cell_size,
            storage_size: options.storage_size,
        }
    }

    /// Lower a program into the module as `void main()`.
    ///
    /// The tape is a zero-initialised internal global array `s`, indexed by
    /// the internal global `sp`. Neither pointer movement nor cell access is
    /// bounds-checked.
    pub fn generate(&mut self, program: &Program) -> Result<(), CodegenError> {
        if self.module.get_function(ENTRY_POINT).is_some() {
            return Err(CodegenError::AlreadyGenerated);
        }

        let layout = TapeLayout::new(self.context, self.cell_size, self.storage_size)?;
        let runtime = self.declare_runtime(layout);

        let entry_block = self.context.append_basic_block(runtime.main, "entry");
        self.builder.position_at_end(entry_block);

        self.generate_commands(&runtime, &program.commands)?;
        self.builder.build_return(None)?;

        self.verify(runtime.main)
    }

    /// Declare the tape globals, the C character primitives and `main`
    fn declare_runtime(&self, layout: TapeLayout<'ctx>) -> Runtime<'ctx> {
        let storage = self.module.add_global(layout.storage_type, Some(AddressSpace::default()), STORAGE_NAME);
        storage.set_linkage(Linkage::Internal);
        storage.set_initializer(&layout.storage_type.const_zero());

        let pointer = self.module.add_global(layout.pointer_type, Some(AddressSpace::default()), POINTER_NAME);
        pointer.set_linkage(Linkage::Internal);
        pointer.set_initializer(&layout.pointer_type.const_zero());

        let char_type = layout.host_char_type;
        let getchar = self.module.add_function(GETCHAR, char_type.fn_type(&[], false), Some(Linkage::External));
        let putchar = self.module.add_function(
            PUTCHAR,
            char_type.fn_type(&[char_type.into()], false),
            Some(Linkage::External),
        );

        let main_type = self.context.void_type().fn_type(&[], false);
        let main = self.module.add_function(ENTRY_POINT, main_type, Some(Linkage::External));

        Runtime {
            layout,
            storage: storage.as_pointer_value(),
            pointer: pointer.as_pointer_value(),
            getchar,
            putchar,
            main,
        }
    }

    fn generate_commands(&self, runtime: &Runtime<'ctx>, commands: &[Command]) -> Result<(), CodegenError> {
        for command in commands {
            match command {
                Command::Primitive(primitive) => self.generate_primitive(runtime, primitive)?,
                Command::Loop(l) => self.generate_loop(runtime, l)?,
            }
        }
        Ok(())
    }

    fn generate_primitive(&self, runtime: &Runtime<'ctx>, primitive: &Primitive) -> Result<(), CodegenError> {
        match *primitive {
            Primitive::MoveLeft(count) => {
                // sp -= count
                let sp = self.load_pointer(runtime)?;
                let step = runtime.layout.pointer_type.const_int(count as u64, false);
                let moved = self.builder.build_int_sub(sp, step, "sp.left")?;
                self.builder.build_store(runtime.pointer, moved)?;
            }

            Primitive::MoveRight(count) => {
                // sp += count
                let sp = self.load_pointer(runtime)?;
                let step = runtime.layout.pointer_type.const_int(count as u64, false);
                let moved = self.builder.build_int_add(sp, step, "sp.right")?;
                self.builder.build_store(runtime.pointer, moved)?;
            }

            Primitive::Add(count) => {
                // s[sp] += count
                let cell = self.current_cell(runtime)?;
                let value = self.load_cell(runtime, cell)?;
                let delta = runtime.layout.cell_type.const_int(runtime.layout.wrap_cell_count(count), false);
                let sum = self.builder.build_int_add(value, delta, "cell.add")?;
                self.builder.build_store(cell, sum)?;
            }

            Primitive::Subtract(count) => {
                // s[sp] -= count
                let cell = self.current_cell(runtime)?;
                let value = self.load_cell(runtime, cell)?;
                let delta = runtime.layout.cell_type.const_int(runtime.layout.wrap_cell_count(count), false);
                let difference = self.builder.build_int_sub(value, delta, "cell.sub")?;
                self.builder.build_store(cell, difference)?;
            }

            Primitive::Input => {
                // s[sp] = getchar()
                let call = self.builder.build_call(runtime.getchar, &[], "input")?;
                let ch = call
                    .try_as_basic_value()
                    .left()
                    .ok_or(CodegenError::MissingReturnValue(GETCHAR))?
                    .into_int_value();
                // Sign-extend so EOF (-1) is all-ones in every cell width
                let value = self.resize_int(ch, runtime.layout.cell_type, true, "input.cell")?;
                let cell = self.current_cell(runtime)?;
                self.builder.build_store(cell, value)?;
            }

            Primitive::Output => {
                // putchar(s[sp])
                let cell = self.current_cell(runtime)?;
                let value = self.load_cell(runtime, cell)?;
                let ch = self.resize_int(value, runtime.layout.host_char_type, false, "output.char")?;
                self.builder.build_call(runtime.putchar, &[ch.into()], "output")?;
            }
        }
        Ok(())
    }

    /// Generate a pre-tested loop over the current cell
    fn generate_loop(&self, runtime: &Runtime<'ctx>, l: &Loop) -> Result<(), CodegenError> {
        let cond_bb = self.context.append_basic_block(runtime.main, "loop.cond");
        let body_bb = self.context.append_basic_block(runtime.main, "loop.body");
        let end_bb = self.context.append_basic_block(runtime.main, "loop.end");

        // Jump to condition
        self.builder.build_unconditional_branch(cond_bb)?;

        // s[sp] != 0
        self.builder.position_at_end(cond_bb);
        let cell = self.current_cell(runtime)?;
        let value = self.load_cell(runtime, cell)?;
        let zero = runtime.layout.cell_type.const_zero();
        let nonzero = self.builder.build_int_compare(IntPredicate::NE, value, zero, "loop.test")?;
        self.builder.build_conditional_branch(nonzero, body_bb, end_bb)?;

        // Generate body
        self.builder.position_at_end(body_bb);
        self.generate_commands(runtime, &l.body)?;
        self.builder.build_unconditional_branch(cond_bb)?;

        // Continue after loop
        self.builder.position_at_end(end_bb);

        Ok(())
    }

    fn load_pointer(&self, runtime: &Runtime<'ctx>) -> Result<IntValue<'ctx>, CodegenError> {
        Ok(self
            .builder
            .build_load(runtime.pointer, "sp")?
            .into_int_value())
    }

    fn load_cell(&self, runtime: &Runtime<'ctx>, cell: PointerValue<'ctx>) -> Result<IntValue<'ctx>, CodegenError> {
        Ok(self
            .builder
            .build_load(cell, "cell.val")?
            .into_int_value())
    }

    /// Address of `s[sp]`
    fn current_cell(&self, runtime: &Runtime<'ctx>) -> Result<PointerValue<'ctx>, CodegenError> {
        let sp = self.load_pointer(runtime)?;
        let zero = runtime.layout.pointer_type.const_zero();
        // Deliberately unchecked: `sp` may point outside the tape
        let cell = unsafe {
            self.builder
                .build_gep(runtime.storage, &[zero, sp], "cell")?
        };
        Ok(cell)
    }

    /// Truncate or extend an integer to `target`
    fn resize_int(
        &self,
        value: IntValue<'ctx>,
        target: IntType<'ctx>,
        signed: bool,
        name: &str,
    ) -> Result<IntValue<'ctx>, CodegenError> {
        let from = value.get_type().get_bit_width();
        let to = target.get_bit_width();

        Ok(match from.cmp(&to) {
            Ordering::Greater => self.builder.build_int_truncate(value, target, name)?,
            Ordering::Less if signed => self.builder.build_int_s_extend(value, target, name)?,
            Ordering::Less => self.builder.build_int_z_extend(value, target, name)?,
            Ordering::Equal => value,
        })
    }

    fn verify(&self, function: FunctionValue<'ctx>) -> Result<(), CodegenError> {
        if !function.verify(false) {
            return Err(CodegenError::VerificationFailed(format!(
                "function '{ENTRY_POINT}' is malformed"
            )));
        }
        self.module
            .verify()
            .map_err(|e| CodegenError::VerificationFailed(e.to_string()))
    }

    /// Run the optimization pipeline for `level` over the module
    pub fn optimize(&self, level: u8) -> Result<(), CodegenError> {
        optimize_module(&self.module, level)
    }

    /// Get the LLVM module
    pub fn module(&self) -> &Module<'ctx> {
        &self.module
    }

    /// Print the LLVM IR to a string
    pub fn print_to_string(&self) -> String {
        self.module.print_to_string().to_string()
    }

    /// Write LLVM IR to a file
    pub fn write_to_file(&self, path: &Path) -> Result<(), CodegenError> {
        self.module
            .print_to_file(path)
            .map_err(|e| CodegenError::Emit(e.to_string()))
    }
}
