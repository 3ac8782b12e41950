//!
//! # esetvm-format - ESET-VM2 executable container reader
//!
//! Reads the executable format consumed by the ESET-VM2 virtual machine:
//! a 20-byte header followed by the Code section and an optional Data
//! section holding initializer bytes.
//!
//! ## Library Usage
//!
//! ```rust,ignore
//! use esetvm_format::{EvmExecutable, SectionKind};
//!
//! let mut exe = EvmExecutable::open("program.evm")?;
//! let data_size = exe.header().data_size;
//! exe.load_sections()?;
//! let code = exe.section(SectionKind::Code).expect("code is always loaded");
//! ```
//!
//! Header validation happens on construction; section payloads are read
//! lazily by `load_sections`.
//!

pub mod builder;
pub mod errors;
pub mod executable;
pub mod header;
pub mod section;

pub use builder::ExecutableBuilder;
pub use errors::EvmFileError;
pub use executable::EvmExecutable;
pub use header::Header;
pub use section::{Section, SectionKind};
