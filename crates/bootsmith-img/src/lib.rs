//! Disk images for booting a sector in an emulator or writing it to a floppy.
//!
//! A [`DiskImage`] is a boot sector followed by zeroes up to the size of the medium,
//! usually one of the [`MediaGeometry`] presets. Images are written with
//! [`write_atomic`], so a failed write never leaves a partial file behind.

mod geometry;
mod image;
mod output;

pub use geometry::*;
pub use image::*;
pub use output::*;

/// Errors that can occur when creating or writing a disk image
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    /// The image cannot hold the boot sector, or cannot be held in memory
    #[error(
        "invalid disk image size {target}b, expected at least {min}b",
        min = bootsmith_sector::SECTOR_SIZE
    )]
    InvalidSize { target: u64 },

    /// An IO error occurred
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
