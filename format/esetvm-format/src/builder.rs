//!
//! Container Builder
//!
//! Assembles an executable image from code and initializer bytes. The header
//! is derived from the payload, so every image produced here passes the size
//! check in `EvmExecutable`.
//!

use std::io::Write;

use crate::header::Header;

#[derive(Debug, Clone, Default)]
pub struct ExecutableBuilder {
    code: Vec<u8>,
    data: Vec<u8>,
    data_size: Option<u32>,
}

impl ExecutableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn code(mut self, code: impl Into<Vec<u8>>) -> Self {
        self.code = code.into();
        self
    }

    /// Initializer bytes stored on disk after the code.
    pub fn data(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.data = data.into();
        self
    }

    /// Declared data segment capacity. Defaults to the initializer length.
    pub fn data_size(mut self, size: u32) -> Self {
        self.data_size = Some(size);
        self
    }

    pub fn header(&self) -> Header {
        let initial_data_size = self.data.len() as u32;
        Header::new(
            self.code.len() as u32,
            self.data_size.unwrap_or(initial_data_size),
            initial_data_size,
        )
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Header::SIZE + self.code.len() + self.data.len());
        out.extend_from_slice(&self.header().to_bytes());
        out.extend_from_slice(&self.code);
        out.extend_from_slice(&self.data);
        out
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        writer.write_all(&self.header().to_bytes())?;
        writer.write_all(&self.code)?;
        writer.write_all(&self.data)?;
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EvmExecutable, SectionKind};

    #[test]
    fn test_builder_header_defaults() {
        let builder = ExecutableBuilder::new().code(vec![1, 2, 3]).data(vec![4, 5]);
        let header = builder.header();
        assert_eq!(header.code_size, 3);
        assert_eq!(header.initial_data_size, 2);
        assert_eq!(header.data_size, 2);
    }

    #[test]
    fn test_builder_reserved_data_size() {
        let header = ExecutableBuilder::new().code(vec![0]).data_size(1024).header();
        assert_eq!(header.data_size, 1024);
        assert_eq!(header.initial_data_size, 0);
    }

    #[test]
    fn test_built_image_loads_back() {
        let builder = ExecutableBuilder::new()
            .code(vec![0xDE, 0xAD])
            .data(vec![0xBE, 0xEF, 0x00])
            .data_size(16);

        let mut written = Vec::new();
        builder.write_to(&mut written).unwrap();
        assert_eq!(written, builder.to_bytes());

        let mut exe = EvmExecutable::from_bytes(written).unwrap();
        assert_eq!(*exe.header(), builder.header());
        exe.load_sections().unwrap();
        assert_eq!(exe.section(SectionKind::Code).unwrap().as_bytes(), &[0xDE, 0xAD]);
        assert_eq!(
            exe.section(SectionKind::Data).unwrap().as_bytes(),
            &[0xBE, 0xEF, 0x00]
        );
    }
}
