#![no_std]

//! A crate for laying out a BIOS boot sector.
//!
//! A boot sector is exactly [`SECTOR_SIZE`] bytes: code at offset 0, a zero-terminated
//! message at a chosen offset, zero padding, and the [`BOOT_SIGNATURE`] in the last two
//! bytes. See [`build`] for how a [`SectorImage`] is assembled from its parts.

extern crate alloc;

mod builder;
mod message;
pub mod raw;
mod sector;

pub use builder::*;
pub use message::*;
pub use sector::*;

/// The size of a boot sector
pub const SECTOR_SIZE: usize = 512;

/// The offset of the boot signature, which is also the end of the usable area
pub const SIGNATURE_OFFSET: usize = 510;

/// The signature the BIOS checks before jumping to the sector, as stored on disk
pub const BOOT_SIGNATURE: [u8; 2] = [0x55, 0xAA];

/// Errors from placing code and message in the sector
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// The code would run into the message
    #[error("code is {code_len}b long but the message starts at offset {message_offset:#x}")]
    CodeOverlapsMessage {
        code_len: usize,
        message_offset: usize,
    },

    /// The message would run into the boot signature
    #[error(
        "message of {message_len}b at offset {message_offset:#x} runs past the boot signature at {limit:#x}",
        limit = SIGNATURE_OFFSET
    )]
    MessageOverflow {
        message_offset: usize,
        message_len: usize,
    },
}

/// Errors from reading an existing sector
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SectorError {
    #[error("a boot sector is exactly {size}b, got {0}b", size = SECTOR_SIZE)]
    WrongLength(usize),

    #[error("missing boot signature, found {0:02X?}")]
    MissingSignature([u8; 2]),
}
