//!
//! esetvm-core - Memory and Bit-Stream Decoding
//!
//! The layer between a loaded executable and the instruction decoder:
//!
//! - `Memory` is the VM's flat byte buffer. VM setup allocates it and copies
//!   the Code and Data sections in through the raw slice accessors.
//! - `MemBitStream` borrows a `Memory` and hands out bit-packed instruction
//!   fields of 1..32 bits, MSB first, spanning byte boundaries.
//!
//! Both report failures as values (`MemoryError`, `BitStreamError`); reads
//! past the end of memory are never papered over with zeroes.
//!

pub mod bitstream;
pub mod errors;
pub mod memory;

pub use bitstream::{FieldWidth, MemBitStream, Width};
pub use errors::{BitStreamError, MemoryError};
pub use memory::{Memory, MemoryWord};
