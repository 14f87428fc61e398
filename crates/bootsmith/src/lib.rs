//! Bootsmith
//!
//! Builds a boot sector that prints a message through the BIOS and halts, and pads it into
//! a floppy image that emulators can boot directly:
//!
//! 1. [`asm`] assembles the boot program for the chosen message offset,
//! 2. [`sector`] lays out code, message and boot signature in 512 bytes,
//! 3. [`img`] pads the sector up to the size of a disk.
//!
//! Every step is validated in memory before anything is written, and files are written
//! atomically, so a failed build never leaves a truncated file behind.
//!
//! # Example
//! ```
//! use bootsmith::DisplayMessage;
//!
//! # let dir = tempfile::tempdir()?;
//! # let output = dir.path().join("boot.bin");
//! let message = DisplayMessage::from_lines(&["Hello from the boot sector"])?;
//! let sector = bootsmith::build(&output, &message, 0x40)?;
//! assert_eq!(&sector.as_bytes()[510..], &[0x55, 0xAA]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::path::Path;

pub use bootsmith_asm as asm;
pub use bootsmith_img as img;
pub use bootsmith_sector as sector;

pub use bootsmith_img::{DiskImage, MediaGeometry, StagedFile};
pub use bootsmith_sector::{DisplayMessage, MessagePolicy, SectorImage};

pub use error::*;
pub use inspect::*;
pub use options::*;

mod error;
mod inspect;
mod options;

use bootsmith_sector::SECTOR_SIZE;

/// Assembles and lays out the sector described by `options`, without touching the filesystem
pub fn assemble_sector(options: &BootOptions) -> Result<SectorImage, BootError> {
    options.check()?;
    let message_offset = options.message_offset();
    let message = options.message()?;

    let code = asm::boot::assemble_boot_code(message_offset)?;
    let sector = sector::build_with_policy(
        &code,
        &message,
        message_offset as usize,
        options.message_policy,
    )?;
    log::debug!(
        "Built boot sector: {}b of code, {}b of message at {message_offset:#x}",
        code.len(),
        message.len()
    );
    Ok(sector)
}

/// Builds a boot sector printing `message` and writes it to `output`
pub fn build<P: AsRef<Path>>(
    output: P,
    message: &DisplayMessage,
    message_offset: u16,
) -> Result<SectorImage, BootError> {
    let options = BootOptions::default()
        .with_message(message.clone())
        .with_message_offset(message_offset);
    let sector = assemble_sector(&options)?;
    let output = output.as_ref();
    img::write_atomic(output, sector.as_bytes()).map_err(BootError::io(output))?;
    Ok(sector)
}

/// Pads the boot sector stored at `sector_path` to `target_size` bytes and writes it to `output`
pub fn pad<P: AsRef<Path>, Q: AsRef<Path>>(
    sector_path: P,
    target_size: u64,
    output: Q,
) -> Result<DiskImage, BootError> {
    if target_size < SECTOR_SIZE as u64 {
        return Err(BootError::InvalidSize {
            target: target_size,
        });
    }

    let sector_path = sector_path.as_ref();
    let bytes = std::fs::read(sector_path).map_err(BootError::io(sector_path))?;
    let sector = SectorImage::from_bytes(&bytes).map_err(|source| BootError::InvalidSector {
        path: sector_path.to_path_buf(),
        source,
    })?;

    let output = output.as_ref();
    let image = DiskImage::pad(&sector, target_size).map_err(BootError::image(output))?;
    image.write_to_file(output).map_err(BootError::image(output))?;
    Ok(image)
}

/// The files produced by [`write_artifacts`]
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub sector: SectorImage,
    pub image: Option<DiskImage>,
}

/// Builds the sector, and the disk image if `image_path` is set, then writes both
///
/// Both are built in memory, then written and synced to temporary files next to their
/// destinations. Only when both are staged are they renamed into place, so a failed
/// build leaves existing files untouched.
///
/// The image size in `options` is only checked when an image is requested.
pub fn write_artifacts(
    options: &BootOptions,
    sector_path: Option<&Path>,
    image_path: Option<&Path>,
) -> Result<Artifacts, BootError> {
    if image_path.is_some() {
        options.check_image()?;
    }
    let sector = assemble_sector(options)?;
    let image = match image_path {
        Some(path) => Some(
            DiskImage::pad(&sector, options.image_size).map_err(BootError::image(path))?,
        ),
        None => None,
    };

    let mut staged = Vec::with_capacity(2);
    if let Some(path) = sector_path {
        staged.push(StagedFile::stage(path, sector.as_bytes()).map_err(BootError::io(path))?);
    }
    if let (Some(path), Some(image)) = (image_path, &image) {
        staged.push(StagedFile::stage(path, image.as_bytes()).map_err(BootError::io(path))?);
    }
    for file in staged {
        let path = file.path().to_path_buf();
        file.commit().map_err(BootError::io(path))?;
    }

    Ok(Artifacts { sector, image })
}

/// Suggests how to boot `image` in QEMU
pub fn emulator_command(image: &Path) -> String {
    format!(
        "qemu-system-i386 -fda {} -boot a -m 128M -no-fd-bootchk",
        image.display()
    )
}
