use bootsmith_sector::SECTOR_SIZE;

/// The cylinder/head/sector geometry of a floppy disk
///
/// # Examples
/// ```
/// use bootsmith_img::MediaGeometry;
///
/// let floppy = MediaGeometry::from_name("1.44M").unwrap();
/// assert_eq!(floppy, MediaGeometry::FLOPPY_1440K);
/// assert_eq!(floppy.size_bytes(), 1_474_560);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaGeometry {
    pub cylinders: u16,
    pub heads: u8,
    pub sectors_per_track: u8,
}

impl MediaGeometry {
    /// 5.25" single sided, 8 sectors per track
    pub const FLOPPY_160K: Self = Self::new(40, 1, 8);
    /// 5.25" single sided, 9 sectors per track
    pub const FLOPPY_180K: Self = Self::new(40, 1, 9);
    /// 5.25" double sided, 8 sectors per track
    pub const FLOPPY_320K: Self = Self::new(40, 2, 8);
    /// 5.25" double sided, 9 sectors per track
    pub const FLOPPY_360K: Self = Self::new(40, 2, 9);
    /// 3.5" double density
    pub const FLOPPY_720K: Self = Self::new(80, 2, 9);
    /// 5.25" high density
    pub const FLOPPY_1200K: Self = Self::new(80, 2, 15);
    /// 3.5" high density, what most emulators expect for `-fda`
    pub const FLOPPY_1440K: Self = Self::new(80, 2, 18);
    /// 3.5" extended density
    pub const FLOPPY_2880K: Self = Self::new(80, 2, 36);

    /// Every preset, with the name accepted by [`Self::from_name`]
    pub const PRESETS: [(&'static str, Self); 8] = [
        ("160K", Self::FLOPPY_160K),
        ("180K", Self::FLOPPY_180K),
        ("320K", Self::FLOPPY_320K),
        ("360K", Self::FLOPPY_360K),
        ("720K", Self::FLOPPY_720K),
        ("1.2M", Self::FLOPPY_1200K),
        ("1.44M", Self::FLOPPY_1440K),
        ("2.88M", Self::FLOPPY_2880K),
    ];

    pub const fn new(cylinders: u16, heads: u8, sectors_per_track: u8) -> Self {
        Self {
            cylinders,
            heads,
            sectors_per_track,
        }
    }

    pub const fn total_sectors(&self) -> u32 {
        self.cylinders as u32 * self.heads as u32 * self.sectors_per_track as u32
    }

    pub const fn size_bytes(&self) -> u64 {
        self.total_sectors() as u64 * SECTOR_SIZE as u64
    }

    /// Looks up a preset by name, ignoring case
    ///
    /// Both the marketing name (`1.44M`) and the size in KiB (`1440K`) are accepted.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::PRESETS
            .iter()
            .find(|(preset, geometry)| {
                preset.eq_ignore_ascii_case(name)
                    || format!("{}K", geometry.size_bytes() / 1024).eq_ignore_ascii_case(name)
            })
            .map(|(_, geometry)| *geometry)
    }
}

impl Default for MediaGeometry {
    fn default() -> Self {
        Self::FLOPPY_1440K
    }
}
