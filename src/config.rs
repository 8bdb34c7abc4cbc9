/// Default width of one tape cell, in bits
pub const DEFAULT_CELL_SIZE: u32 = 8;
/// Default number of tape cells
pub const DEFAULT_STORAGE_SIZE: usize = 30_000;

/// Settings for one compilation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Cell width in bits: 8, 16, 32 or 64
    pub cell_size: u32,
    /// Number of cells on the tape
    pub storage_size: usize,
    /// 0 disables optimization, 1-3 select increasingly aggressive pipelines
    pub opt_level: u8,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            storage_size: DEFAULT_STORAGE_SIZE,
            opt_level: 0,
        }
    }
}

impl CompileOptions {
    #[must_use]
    pub fn with_cell_size(mut self, cell_size: u32) -> Self {
        self.cell_size = cell_size;
        self
    }

    #[must_use]
    pub fn with_storage_size(mut self, storage_size: usize) -> Self {
        self.storage_size = storage_size;
        self
    }

    #[must_use]
    pub fn with_opt_level(mut self, opt_level: u8) -> Self {
        self.opt_level = opt_level;
        self
    }
}
