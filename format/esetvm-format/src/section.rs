//!
//! Sections - tagged byte blocks materialized from a container
//!

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionKind {
    Code,
    Data,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    kind: SectionKind,
    data: Vec<u8>,
}

impl Section {
    pub fn new(kind: SectionKind, data: Vec<u8>) -> Self {
        Self { kind, data }
    }

    /// A zero-filled section of `size` bytes, ready to be read into.
    pub fn zeroed(kind: SectionKind, size: usize) -> Self {
        Self {
            kind,
            data: vec![0; size],
        }
    }

    pub fn kind(&self) -> SectionKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, u8> {
        self.data.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, u8> {
        self.data.iter_mut()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

impl<'a> IntoIterator for &'a Section {
    type Item = &'a u8;
    type IntoIter = std::slice::Iter<'a, u8>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
