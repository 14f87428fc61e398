use std::path::Path;

use bootsmith_sector::{SECTOR_SIZE, SectorImage};

use crate::{ImageError, MediaGeometry, write_atomic};

/// A raw disk image: a boot sector followed by zeroes
#[derive(Clone, PartialEq, Eq)]
pub struct DiskImage {
    data: Vec<u8>,
}

impl DiskImage {
    /// Pads `sector` with zeroes up to `target_size` bytes
    ///
    /// # Errors
    /// Returns [`ImageError::InvalidSize`] if `target_size` is smaller than a sector.
    pub fn pad(sector: &SectorImage, target_size: u64) -> Result<Self, ImageError> {
        if target_size < SECTOR_SIZE as u64 {
            return Err(ImageError::InvalidSize {
                target: target_size,
            });
        }
        let len = usize::try_from(target_size).map_err(|_| ImageError::InvalidSize {
            target: target_size,
        })?;

        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| ImageError::InvalidSize {
                target: target_size,
            })?;
        data.extend_from_slice(sector.as_bytes());
        data.resize(len, 0);
        log::trace!(
            "Padded boot sector with {}b of zeroes",
            len - SECTOR_SIZE
        );
        Ok(Self { data })
    }

    /// Pads `sector` to the full size of a medium
    pub fn for_geometry(sector: &SectorImage, geometry: MediaGeometry) -> Result<Self, ImageError> {
        Self::pad(sector, geometry.size_bytes())
    }

    /// The boot sector at the start of the image
    pub fn boot_sector(&self) -> &[u8] {
        &self.data[..SECTOR_SIZE]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Writes the image to `path`, replacing any existing file only on success
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ImageError> {
        write_atomic(path.as_ref(), &self.data)?;
        Ok(())
    }
}

impl core::fmt::Debug for DiskImage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DiskImage")
            .field("len", &self.data.len())
            .field("boot_sector", &format_args!("{:02X?}", &self.data[510..512]))
            .finish()
    }
}
