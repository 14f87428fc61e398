use std::path::Path;

use bootsmith_sector::{BOOT_SIGNATURE, SECTOR_SIZE, SIGNATURE_OFFSET, SectorError, SectorImage};

use crate::BootError;

/// What [`inspect`] found in a sector or disk image file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inspection {
    /// The size of the whole file
    pub len: u64,
    /// The last two bytes of the first sector
    pub signature: [u8; 2],
    /// Whether every byte after the first sector is zero
    pub blank_tail: bool,
    /// The zero-terminated message at the requested offset, including its terminator
    pub message: Option<Vec<u8>>,
}

impl Inspection {
    /// Whether the BIOS would boot from this image
    pub fn is_bootable(&self) -> bool {
        self.signature == BOOT_SIGNATURE
    }

    /// The signature as it is usually written, e.g. `0x55AA`
    pub fn signature_hex(&self) -> String {
        format!("0x{:02X}{:02X}", self.signature[0], self.signature[1])
    }
}

/// Reads the file at `path` and checks its first sector
///
/// A file without the boot signature is not an error, check [`Inspection::is_bootable`].
/// The message is only looked up in bootable images.
pub fn inspect<P: AsRef<Path>>(
    path: P,
    message_offset: Option<u16>,
) -> Result<Inspection, BootError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(BootError::io(path))?;
    if bytes.len() < SECTOR_SIZE {
        return Err(BootError::InvalidSector {
            path: path.to_path_buf(),
            source: SectorError::WrongLength(bytes.len()),
        });
    }

    let (first, tail) = bytes.split_at(SECTOR_SIZE);
    let signature = [first[SIGNATURE_OFFSET], first[SIGNATURE_OFFSET + 1]];
    let message = match (SectorImage::from_bytes(first), message_offset) {
        (Ok(sector), Some(offset)) => sector.message_at(offset as usize).map(<[u8]>::to_vec),
        _ => None,
    };

    Ok(Inspection {
        len: bytes.len() as u64,
        signature,
        blank_tail: tail.iter().all(|&b| b == 0),
        message,
    })
}
