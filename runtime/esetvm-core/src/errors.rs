//!
//! Runtime error types for memory access and bit-stream decoding.
//!

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    #[error("Memory not allocated")]
    MemoryNotAllocated,

    #[error("Offset {offset} out of range: reading {width} bytes from memory of {size} bytes")]
    OffsetOutOfRange {
        offset: usize,
        width: usize,
        size: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BitStreamError {
    #[error("Invalid field width {0}, expected 1..=32 bits")]
    InvalidWidth(u32),

    #[error(transparent)]
    Memory(#[from] MemoryError),
}
