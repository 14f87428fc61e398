//! Raw, byte compatible representation of the boot sector

use crate::{SECTOR_SIZE, SIGNATURE_OFFSET};

/// The on-disk layout of a boot sector
///
/// Code and message share the `body`, the split between them is decided by the builder.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RawSector {
    /// Code, message and padding
    pub body: [u8; SIGNATURE_OFFSET],
    /// 0x55, 0xAA on a bootable sector
    pub signature: [u8; 2],
}

impl RawSector {
    pub fn as_bytes(&self) -> &[u8; SECTOR_SIZE] {
        bytemuck::cast_ref(self)
    }

    pub fn from_bytes(bytes: &[u8; SECTOR_SIZE]) -> Self {
        bytemuck::cast(*bytes)
    }
}
