use inkwell::context::Context;
use inkwell::types::{ArrayType, IntType};

use crate::codegen::CodegenError;

/// Width of the data pointer `sp`
pub const POINTER_BITS: u32 = 64;

/// Width of the C `getchar`/`putchar` character values
pub const HOST_CHAR_BITS: u32 = 32;

/// LLVM types describing the tape of one generated program
#[derive(Debug, Clone, Copy)]
pub struct TapeLayout<'ctx> {
    pub cell_type: IntType<'ctx>,
    pub pointer_type: IntType<'ctx>,
    pub storage_type: ArrayType<'ctx>,
    pub host_char_type: IntType<'ctx>,
}

impl<'ctx> TapeLayout<'ctx> {
    /// # Errors
    /// Returns `CodegenError::InvalidCellSize` or `CodegenError::InvalidStorageSize`
    /// when the configuration cannot be represented
    pub fn new(context: &'ctx Context, cell_size: u32, storage_size: usize) -> Result<Self, CodegenError> {
        let cell_type = get_int_type(context, cell_size)?;
        let cells = u32::try_from(storage_size)
            .ok()
            .filter(|&n| n > 0)
            .ok_or(CodegenError::InvalidStorageSize(storage_size))?;

        Ok(Self {
            cell_type,
            pointer_type: get_int_type(context, POINTER_BITS)?,
            storage_type: cell_type.array_type(cells),
            host_char_type: get_int_type(context, HOST_CHAR_BITS)?,
        })
    }

    /// Reduce a run length to the value it adds modulo 2^cell_size
    #[must_use]
    pub fn wrap_cell_count(&self, count: usize) -> u64 {
        let bits = self.cell_type.get_bit_width();
        let count = count as u64;
        if bits >= 64 {
            count
        } else {
            count & ((1u64 << bits) - 1)
        }
    }
}

/// Get LLVM integer type for a given bit width
/// # Errors
/// Returns `CodegenError::InvalidCellSize` if the bit width is invalid
pub fn get_int_type(context: &'_ Context, bits: u32) -> Result<IntType<'_>, CodegenError> {
    match bits {
        8 => Ok(context.i8_type()),
        16 => Ok(context.i16_type()),
        32 => Ok(context.i32_type()),
        64 => Ok(context.i64_type()),
        _ => Err(CodegenError::InvalidCellSize(bits)),
    }
}
