use core::fmt::{self, Debug};

use crate::{
    BOOT_SIGNATURE, SECTOR_SIZE, SIGNATURE_OFFSET, SectorError, raw::RawSector,
};

/// A complete 512-byte boot sector
///
/// A `SectorImage` built by [`build`](crate::build) always carries the boot signature.
#[derive(Clone, PartialEq, Eq)]
pub struct SectorImage {
    raw: RawSector,
}

impl SectorImage {
    pub(crate) fn from_raw(raw: RawSector) -> Self {
        Self { raw }
    }

    /// Reads a sector, checking its length and signature
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SectorError> {
        let bytes: &[u8; SECTOR_SIZE] = bytes
            .try_into()
            .map_err(|_| SectorError::WrongLength(bytes.len()))?;
        let raw = RawSector::from_bytes(bytes);
        if raw.signature != BOOT_SIGNATURE {
            return Err(SectorError::MissingSignature(raw.signature));
        }
        Ok(Self { raw })
    }

    pub fn as_bytes(&self) -> &[u8; SECTOR_SIZE] {
        self.raw.as_bytes()
    }

    pub fn signature(&self) -> [u8; 2] {
        self.raw.signature
    }

    /// The zero-terminated message at `offset`, including its terminator
    ///
    /// Returns `None` if there is no terminator between `offset` and the signature.
    pub fn message_at(&self, offset: usize) -> Option<&[u8]> {
        let body = self.raw.body.get(offset..)?;
        let end = body.iter().position(|&b| b == 0)?;
        Some(&body[..=end])
    }
}

impl AsRef<[u8]> for SectorImage {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl Debug for SectorImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let used = self
            .raw
            .body
            .iter()
            .rposition(|&b| b != 0)
            .map_or(0, |last| last + 1);
        f.debug_struct("SectorImage")
            .field("used", &used)
            .field("free", &(SIGNATURE_OFFSET - used))
            .field("signature", &format_args!("{:02X?}", self.raw.signature))
            .finish()
    }
}
