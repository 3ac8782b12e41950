//!
//! VM Memory
//!
//! A single contiguous byte buffer sized by `allocate`. Reads are bounds
//! checked and little-endian; writes go through the raw slice/iterator
//! accessors, since placing code and data is the VM setup's job.
//!
//! A memory that was never allocated is distinct from one allocated with
//! size 0: the former fails reads with `MemoryNotAllocated`, the latter with
//! `OffsetOutOfRange`.
//!

use crate::errors::MemoryError;

mod sealed {
    pub trait Sealed {}
}

/// Unsigned integer types that can be read out of memory.
///
/// Implemented for `u8`, `u16` and `u32` only.
pub trait MemoryWord: sealed::Sealed + Copy {
    const WIDTH: usize;

    fn from_le_slice(bytes: &[u8]) -> Self;
}

macro_rules! memory_word {
    ($($ty:ty),*) => {
        $(
            impl sealed::Sealed for $ty {}

            impl MemoryWord for $ty {
                const WIDTH: usize = std::mem::size_of::<$ty>();

                #[inline]
                fn from_le_slice(bytes: &[u8]) -> Self {
                    let mut buf = [0u8; std::mem::size_of::<$ty>()];
                    buf.copy_from_slice(bytes);
                    <$ty>::from_le_bytes(buf)
                }
            }
        )*
    };
}

memory_word!(u8, u16, u32);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Memory {
    data: Option<Vec<u8>>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resizes the buffer to `size` bytes. Existing bytes are kept and any
    /// new tail is zeroed.
    pub fn allocate(&mut self, size: usize) {
        self.data.get_or_insert_with(Vec::new).resize(size, 0);
    }

    pub fn read<T: MemoryWord>(&self, offset: usize) -> Result<T, MemoryError> {
        let data = self.data.as_deref().ok_or(MemoryError::MemoryNotAllocated)?;

        let bytes = offset
            .checked_add(T::WIDTH)
            .and_then(|end| data.get(offset..end))
            .ok_or(MemoryError::OffsetOutOfRange {
                offset,
                width: T::WIDTH,
                size: data.len(),
            })?;

        Ok(T::from_le_slice(bytes))
    }

    pub fn is_allocated(&self) -> bool {
        self.data.is_some()
    }

    pub fn len(&self) -> usize {
        self.data.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_slice(&self) -> &[u8] {
        self.data.as_deref().unwrap_or(&[])
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        self.data.as_deref_mut().unwrap_or(&mut [])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, u8> {
        self.as_slice().iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, u8> {
        self.as_mut_slice().iter_mut()
    }
}

impl<'a> IntoIterator for &'a Memory {
    type Item = &'a u8;
    type IntoIter = std::slice::Iter<'a, u8>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &'a mut Memory {
    type Item = &'a mut u8;
    type IntoIter = std::slice::IterMut<'a, u8>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
