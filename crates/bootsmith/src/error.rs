use std::path::PathBuf;

use bootsmith_asm::AsmError;
use bootsmith_img::ImageError;
use bootsmith_sector::{LayoutError, MessageError, SECTOR_SIZE, SectorError};

/// Errors that can occur while building a boot sector or disk image
///
/// Everything except [`BootError::Io`] is detected in memory, before any file is written.
#[derive(Debug, thiserror::Error)]
pub enum BootError {
    /// Code or message does not fit in its part of the sector
    #[error("layout overflow: {0}")]
    LayoutOverflow(#[from] LayoutError),

    /// The requested disk image cannot hold a boot sector
    #[error("invalid disk image size {target}b, expected at least {min}b", min = SECTOR_SIZE)]
    InvalidSize { target: u64 },

    #[error("invalid message: {0}")]
    Message(#[from] MessageError),

    /// The boot program itself could not be assembled
    #[error("failed to assemble boot code: {0}")]
    Assembly(AsmError),

    /// An input file is not a valid boot sector
    #[error("{} is not a boot sector: {source}", .path.display())]
    InvalidSector {
        path: PathBuf,
        #[source]
        source: SectorError,
    },

    /// Reading an input or writing an output failed, no partial output was kept
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<AsmError> for BootError {
    fn from(value: AsmError) -> Self {
        match value {
            AsmError::CodeOverflow {
                code_len,
                message_offset,
            } => Self::LayoutOverflow(LayoutError::CodeOverlapsMessage {
                code_len,
                message_offset,
            }),
            other => Self::Assembly(other),
        }
    }
}

impl BootError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }

    pub(crate) fn image(path: impl Into<PathBuf>) -> impl FnOnce(ImageError) -> Self {
        let path = path.into();
        move |err| match err {
            ImageError::InvalidSize { target } => Self::InvalidSize { target },
            ImageError::Io(source) => Self::Io { path, source },
        }
    }
}
