//!
//! Container Header
//!
//! The header is a packed 20-byte record at the start of every executable:
//!
//! | Offset | Size | Field             |
//! |--------|------|-------------------|
//! | 0      | 8    | magic `ESET-VM2`  |
//! | 8      | 4    | code size         |
//! | 12     | 4    | data size         |
//! | 16     | 4    | initial data size |
//!
//! All numbers are little-endian regardless of the host. The data size is
//! the capacity a VM should reserve for its data segment; it is carried
//! through untouched and never checked against the file.
//!

use serde::{Deserialize, Serialize};

use crate::errors::EvmFileError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Header {
    pub magic: [u8; 8],
    pub code_size: u32,
    pub data_size: u32,
    pub initial_data_size: u32,
}

impl Header {
    pub const SIZE: usize = 20;
    pub const MAGIC: [u8; 8] = *b"ESET-VM2";

    pub fn new(code_size: u32, data_size: u32, initial_data_size: u32) -> Self {
        Self {
            magic: Self::MAGIC,
            code_size,
            data_size,
            initial_data_size,
        }
    }

    /// Decodes a raw header, rejecting anything that does not carry the
    /// `ESET-VM2` signature. Sizes are not validated here since that needs the
    /// length of the whole source.
    pub fn parse(bytes: &[u8; Header::SIZE]) -> Result<Self, EvmFileError> {
        let mut magic = [0u8; 8];
        magic.copy_from_slice(&bytes[0..8]);
        check_signature(&magic)?;

        Ok(Self {
            magic,
            code_size: read_u32_le(bytes, 8),
            data_size: read_u32_le(bytes, 12),
            initial_data_size: read_u32_le(bytes, 16),
        })
    }

    pub fn to_bytes(&self) -> [u8; Header::SIZE] {
        let mut out = [0u8; Header::SIZE];
        out[0..8].copy_from_slice(&self.magic);
        out[8..12].copy_from_slice(&self.code_size.to_le_bytes());
        out[12..16].copy_from_slice(&self.data_size.to_le_bytes());
        out[16..20].copy_from_slice(&self.initial_data_size.to_le_bytes());
        out
    }

    /// Total length a source must have for this header to be valid.
    pub fn expected_file_size(&self) -> u64 {
        Self::SIZE as u64 + u64::from(self.code_size) + u64::from(self.initial_data_size)
    }

    pub fn has_data(&self) -> bool {
        self.initial_data_size != 0
    }

    pub(crate) fn code_offset(&self) -> u64 {
        Self::SIZE as u64
    }

    pub(crate) fn data_offset(&self) -> u64 {
        self.code_offset() + u64::from(self.code_size)
    }
}

/// Checks a (possibly short) prefix of a source against the signature.
pub(crate) fn check_signature(prefix: &[u8]) -> Result<(), EvmFileError> {
    if prefix == Header::MAGIC {
        return Ok(());
    }
    Err(EvmFileError::InvalidSignature {
        found: String::from_utf8_lossy(prefix).into_owned(),
    })
}

fn read_u32_le(bytes: &[u8; Header::SIZE], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}
