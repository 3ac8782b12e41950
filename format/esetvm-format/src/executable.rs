//!
//! Executable Container Reader
//!
//! `EvmExecutable` validates a container as soon as it is constructed and
//! defers reading the payload until `load_sections` is called. A caller can
//! therefore look at the header (for instance to size VM memory) before the
//! code and data bytes are pulled in.
//!
//! Validation order follows the file layout:
//! 1. the source must open (`FileNotFound`)
//! 2. the first 8 bytes must be `ESET-VM2` (`InvalidSignature`)
//! 3. the source length must equal `20 + code size + initial data size`
//!    (`InvalidSize`)
//!
//! Any byte source that can report its length works: files, in-memory images,
//! or anything else implementing `Read + Seek`.
//!

use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use tracing::debug;

use crate::errors::EvmFileError;
use crate::header::{Header, check_signature};
use crate::section::{Section, SectionKind};

#[derive(Debug)]
pub struct EvmExecutable<S = File> {
    header: Header,
    source: S,
    file_size: u64,
    sections: Vec<Section>,
}

impl EvmExecutable<File> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, EvmFileError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| EvmFileError::FileNotFound {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "opened executable");
        Self::from_reader(file)
    }
}

impl EvmExecutable<Cursor<Vec<u8>>> {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, EvmFileError> {
        Self::from_reader(Cursor::new(bytes))
    }
}

impl<S: Read + Seek> EvmExecutable<S> {
    pub fn from_reader(mut source: S) -> Result<Self, EvmFileError> {
        let file_size = source.seek(SeekFrom::End(0))?;
        source.seek(SeekFrom::Start(0))?;

        let mut prefix = Vec::with_capacity(Header::SIZE);
        source
            .by_ref()
            .take(Header::SIZE as u64)
            .read_to_end(&mut prefix)?;

        check_signature(&prefix[..prefix.len().min(Header::MAGIC.len())])?;

        let raw: [u8; Header::SIZE] =
            prefix
                .as_slice()
                .try_into()
                .map_err(|_| EvmFileError::InvalidSize {
                    expected: Header::SIZE as u64,
                    actual: file_size,
                })?;
        let header = Header::parse(&raw)?;

        let expected = header.expected_file_size();
        if file_size != expected {
            return Err(EvmFileError::InvalidSize {
                expected,
                actual: file_size,
            });
        }

        debug!(
            code_size = header.code_size,
            data_size = header.data_size,
            initial_data_size = header.initial_data_size,
            "validated executable header"
        );

        Ok(Self {
            header,
            source,
            file_size,
            sections: Vec::new(),
        })
    }

    /// Reads the Code section and, when the header declares initial data, the
    /// Data section. Calling it again once sections are loaded does nothing.
    pub fn load_sections(&mut self) -> Result<(), EvmFileError> {
        if self.is_loaded() {
            return Ok(());
        }

        let mut sections = Vec::with_capacity(2);
        sections.push(self.read_section(
            SectionKind::Code,
            self.header.code_offset(),
            self.header.code_size,
        )?);

        if self.header.has_data() {
            sections.push(self.read_section(
                SectionKind::Data,
                self.header.data_offset(),
                self.header.initial_data_size,
            )?);
        }

        debug!(count = sections.len(), "loaded executable sections");
        self.sections = sections;
        Ok(())
    }

    fn read_section(
        &mut self,
        kind: SectionKind,
        offset: u64,
        size: u32,
    ) -> Result<Section, EvmFileError> {
        let mut section = Section::zeroed(kind, size as usize);
        self.source.seek(SeekFrom::Start(offset))?;
        self.source.read_exact(section.as_bytes_mut())?;
        Ok(section)
    }
}

impl<S> EvmExecutable<S> {
    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    pub fn is_loaded(&self) -> bool {
        !self.sections.is_empty()
    }

    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind() == kind)
    }

    pub fn section_mut(&mut self, kind: SectionKind) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.kind() == kind)
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    pub fn into_sections(self) -> Vec<Section> {
        self.sections
    }
}
