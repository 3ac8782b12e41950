//!
//! Bit Stream - MSB-first field extraction over VM memory
//!
//! Instructions are bit-packed: an opcode may be 3 bits, a register index 4,
//! a constant 32, and nothing is byte aligned. `MemBitStream` hands those
//! fields out in order. Concatenating every returned field (MSB first) gives
//! back the exact bit content of memory from the starting offset, each byte
//! read MSB first.
//!
//! State:
//! - `acc`: up to 32 unconsumed bits, left-justified
//! - `valid`: how many of the top bits of `acc` are real
//! - `pending` / `pending_bits`: bits already fetched from memory that did
//!   not fit into `acc`, right-justified; they precede any byte not yet read
//! - `offset`: next byte of memory to fetch
//!
//! Construction primes `acc` with the 4 bytes at the starting offset. When a
//! request needs more bits than are valid, the top-up merges the pending
//! remainder first, then fetches one byte (deficit of 8 bits or less) or a
//! big-endian 16-bit unit (larger deficit) until enough bits are valid. The
//! top-up never fetches more bytes than the deficit needs, so a sequence of
//! fields covering memory exactly never reads past its end.
//!

use tracing::trace;

use crate::errors::{BitStreamError, MemoryError};
use crate::memory::Memory;

const ACC_BITS: u32 = u32::BITS;

/// Marker carrying a field width in bits as a const parameter.
pub struct Width<const N: u32>;

/// Maps a field width to the narrowest unsigned type holding it.
///
/// Only implemented for widths 1 through 32, so `extract::<0>()` or
/// `extract::<33>()` does not compile.
pub trait FieldWidth {
    type Output: Copy + Into<u32>;

    fn narrow(value: u32) -> Self::Output;
}

macro_rules! field_widths {
    ($out:ty => $($n:literal)*) => {
        $(
            impl FieldWidth for Width<$n> {
                type Output = $out;

                #[inline]
                fn narrow(value: u32) -> $out {
                    value as $out
                }
            }
        )*
    };
}

field_widths!(u8 => 1 2 3 4 5 6 7 8);
field_widths!(u16 => 9 10 11 12 13 14 15 16);
field_widths!(u32 => 17 18 19 20 21 22 23 24 25 26 27 28 29 30 31 32);

#[derive(Debug)]
pub struct MemBitStream<'m> {
    memory: &'m Memory,
    offset: usize,
    acc: u32,
    valid: u32,
    pending: u32,
    pending_bits: u32,
}

impl<'m> MemBitStream<'m> {
    /// Binds a stream to `memory` starting at byte `offset`. Fails if fewer
    /// than 4 bytes are available there.
    pub fn new(memory: &'m Memory, offset: usize) -> Result<Self, MemoryError> {
        let acc = memory.read::<u32>(offset)?.swap_bytes();
        trace!(offset, acc, "primed bit stream");

        Ok(Self {
            memory,
            offset: offset + 4,
            acc,
            valid: ACC_BITS,
            pending: 0,
            pending_bits: 0,
        })
    }

    /// Pulls the next `N` bits, returned in the narrowest type that fits.
    pub fn extract<const N: u32>(&mut self) -> Result<<Width<N> as FieldWidth>::Output, MemoryError>
    where
        Width<N>: FieldWidth,
    {
        let value = self.take(N)?;
        Ok(<Width<N> as FieldWidth>::narrow(value))
    }

    /// Like `extract`, with the width chosen at run time.
    pub fn extract_bits(&mut self, width: u32) -> Result<u32, BitStreamError> {
        if width == 0 || width > ACC_BITS {
            return Err(BitStreamError::InvalidWidth(width));
        }
        Ok(self.take(width)?)
    }

    /// Next byte that will be fetched from memory.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Absolute index, in bits from the start of memory, of the next bit the
    /// stream will return.
    pub fn bit_position(&self) -> usize {
        self.offset * 8 - self.buffered_bits() as usize
    }

    /// Bits fetched from memory but not yet returned.
    pub fn buffered_bits(&self) -> u32 {
        self.valid + self.pending_bits
    }

    fn take(&mut self, width: u32) -> Result<u32, MemoryError> {
        debug_assert!((1..=ACC_BITS).contains(&width));

        if self.valid < width {
            self.top_up(width)?;
        }

        let value = self.acc >> (ACC_BITS - width);
        self.acc = self.acc.checked_shl(width).unwrap_or(0);
        self.valid -= width;
        Ok(value)
    }

    fn top_up(&mut self, width: u32) -> Result<(), MemoryError> {
        while self.valid < width {
            if self.pending_bits == 0 {
                self.fetch(width - self.valid)?;
            }

            let room = ACC_BITS - self.valid;
            let merged = room.min(self.pending_bits);
            let rest = self.pending_bits - merged;

            self.acc |= (self.pending >> rest) << (room - merged);
            self.pending &= low_mask(rest);
            self.pending_bits = rest;
            self.valid += merged;
        }
        Ok(())
    }

    fn fetch(&mut self, deficit: u32) -> Result<(), MemoryError> {
        if deficit <= 8 {
            self.pending = u32::from(self.memory.read::<u8>(self.offset)?);
            self.pending_bits = 8;
            self.offset += 1;
        } else {
            self.pending = u32::from(self.memory.read::<u16>(self.offset)?.swap_bytes());
            self.pending_bits = 16;
            self.offset += 2;
        }
        trace!(
            deficit,
            fetched_bits = self.pending_bits,
            offset = self.offset,
            valid = self.valid,
            "topped up bit stream"
        );
        Ok(())
    }
}

fn low_mask(bits: u32) -> u32 {
    if bits == 0 { 0 } else { u32::MAX >> (ACC_BITS - bits) }
}
