//!
//! # Bit-stream properties
//!
//! Any sequence of field widths that covers memory exactly must give back
//! the memory's bits unchanged, whatever the mix of widths.
//!

use esetvm_core::{MemBitStream, Memory, MemoryError};
use proptest::prelude::*;

fn memory_with(bytes: &[u8]) -> Memory {
    let mut memory = Memory::new();
    memory.allocate(bytes.len());
    memory.as_mut_slice().copy_from_slice(bytes);
    memory
}

fn bits_of(bytes: &[u8]) -> Vec<bool> {
    bytes
        .iter()
        .flat_map(|&b| (0..8).rev().map(move |i| (b >> i) & 1 == 1))
        .collect()
}

fn bits_of_field(value: u32, width: u32) -> impl Iterator<Item = bool> {
    (0..width).rev().map(move |i| (value >> i) & 1 == 1)
}

/// Splits `total` bits into widths of 1..=32 driven by `seeds`, topping off
/// with whatever is left once the seeds run out.
fn partition(total: u32, seeds: &[u32]) -> Vec<u32> {
    let mut widths = Vec::new();
    let mut left = total;
    for &seed in seeds {
        if left == 0 {
            break;
        }
        let width = 1 + seed % left.min(32);
        widths.push(width);
        left -= width;
    }
    while left > 0 {
        let width = left.min(32);
        widths.push(width);
        left -= width;
    }
    widths
}

fn decode(memory: &Memory, start: usize, widths: &[u32]) -> Result<Vec<bool>, TestCaseError> {
    let mut stream = MemBitStream::new(memory, start)
        .map_err(|e| TestCaseError::fail(format!("priming failed: {e}")))?;
    let mut out = Vec::new();
    for &width in widths {
        let value = stream
            .extract_bits(width)
            .map_err(|e| TestCaseError::fail(format!("extract {width} failed: {e}")))?;
        prop_assert!(width == 32 || value < (1u32 << width));
        out.extend(bits_of_field(value, width));
    }
    prop_assert_eq!(stream.offset(), memory.len());
    prop_assert_eq!(stream.buffered_bits(), 0);
    Ok(out)
}

proptest! {
    #[test]
    fn test_round_trip_any_partition(
        bytes in prop::collection::vec(any::<u8>(), 4..48),
        seeds in prop::collection::vec(any::<u32>(), 0..64),
    ) {
        let memory = memory_with(&bytes);
        let widths = partition(bytes.len() as u32 * 8, &seeds);
        let decoded = decode(&memory, 0, &widths)?;
        prop_assert_eq!(decoded, bits_of(&bytes));
    }

    #[test]
    fn test_round_trip_from_offset(
        prefix in prop::collection::vec(any::<u8>(), 0..8),
        bytes in prop::collection::vec(any::<u8>(), 4..32),
        seeds in prop::collection::vec(any::<u32>(), 0..32),
    ) {
        let mut all = prefix.clone();
        all.extend_from_slice(&bytes);
        let memory = memory_with(&all);
        let widths = partition(bytes.len() as u32 * 8, &seeds);
        let decoded = decode(&memory, prefix.len(), &widths)?;
        prop_assert_eq!(decoded, bits_of(&bytes));
    }

    #[test]
    fn test_one_bit_past_the_end_fails(
        bytes in prop::collection::vec(any::<u8>(), 4..24),
        seeds in prop::collection::vec(any::<u32>(), 0..24),
    ) {
        let memory = memory_with(&bytes);
        let widths = partition(bytes.len() as u32 * 8, &seeds);
        let mut stream = MemBitStream::new(&memory, 0).unwrap();
        for width in widths {
            stream.extract_bits(width).unwrap();
        }
        let is_out_of_range = matches!(
            stream.extract::<1>(),
            Err(MemoryError::OffsetOutOfRange { .. })
        );
        prop_assert!(is_out_of_range);
    }
}

#[test]
fn test_instruction_like_fields() {
    // opcode:5 | reg:4 | reg:4 | imm:32 | flag:1 | pad:2 = 48 bits
    let memory = memory_with(&[0b10110_001, 0b1_1010_111, 0xAA, 0xBB, 0xCC, 0b1101_0100]);
    let mut stream = MemBitStream::new(&memory, 0).unwrap();

    assert_eq!(stream.extract::<5>().unwrap(), 0b10110);
    assert_eq!(stream.extract::<4>().unwrap(), 0b0011);
    assert_eq!(stream.extract::<4>().unwrap(), 0b1010);
    assert_eq!(stream.extract::<32>().unwrap(), 0b111_1010_1010_1011_1011_1100_1100_1101_0);
    assert_eq!(stream.extract::<1>().unwrap(), 1);
    assert_eq!(stream.extract::<2>().unwrap(), 0);
    assert_eq!(stream.bit_position(), 48);
}
