use bootsmith_img::MediaGeometry;
use bootsmith_sector::{DisplayMessage, MessageError, MessagePolicy, SECTOR_SIZE, SIGNATURE_OFFSET};

use crate::BootError;

/// The two stock boot sectors
///
/// Both run the same program, they only differ in where the message is placed and
/// what it says.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixture {
    /// Message at 0x2A
    #[default]
    Minimal,
    /// Message at 0x30
    Working,
}

impl Fixture {
    pub const fn message_offset(self) -> u16 {
        match self {
            Self::Minimal => 0x2A,
            Self::Working => 0x30,
        }
    }

    pub const fn lines(self) -> &'static [&'static str] {
        match self {
            Self::Minimal => &["SAGE OS Bootloader Working!", "System Ready."],
            Self::Working => &["SAGE OS - Working!", "Press Ctrl+Alt+G then Cmd+Q to quit"],
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Working => "working",
        }
    }
}

/// The options for building a boot sector and its disk image
///
/// A message or offset that is not set falls back to the one from the fixture.
#[derive(Debug, Clone)]
pub struct BootOptions {
    pub fixture: Fixture,
    pub message: Option<DisplayMessage>,
    pub message_offset: Option<u16>,
    pub message_policy: MessagePolicy,
    /// The size of the disk image in bytes, unused when only the sector is written
    pub image_size: u64,
}

impl Default for BootOptions {
    fn default() -> Self {
        Self {
            fixture: Fixture::default(),
            message: None,
            message_offset: None,
            message_policy: MessagePolicy::default(),
            image_size: MediaGeometry::default().size_bytes(),
        }
    }
}

impl BootOptions {
    pub fn with_fixture(mut self, fixture: Fixture) -> Self {
        self.fixture = fixture;
        self
    }

    pub fn with_message(mut self, message: DisplayMessage) -> Self {
        self.message = Some(message);
        self
    }

    pub fn with_message_offset(mut self, offset: u16) -> Self {
        self.message_offset = Some(offset);
        self
    }

    pub fn with_message_policy(mut self, policy: MessagePolicy) -> Self {
        self.message_policy = policy;
        self
    }

    pub fn with_image_size(mut self, size: u64) -> Self {
        self.image_size = size;
        self
    }

    pub fn with_geometry(self, geometry: MediaGeometry) -> Self {
        self.with_image_size(geometry.size_bytes())
    }

    /// The message to print, either the one set or the fixture's
    pub fn message(&self) -> Result<DisplayMessage, MessageError> {
        match &self.message {
            Some(message) => Ok(message.clone()),
            None => DisplayMessage::from_lines(self.fixture.lines()),
        }
    }

    pub fn message_offset(&self) -> u16 {
        self.message_offset
            .unwrap_or_else(|| self.fixture.message_offset())
    }

    /// Validates the options that can be checked without building anything
    ///
    /// The image size is not checked here, as it only matters when an image is written.
    /// Use [`BootOptions::check_image`] for that.
    pub fn check(&self) -> Result<(), BootError> {
        let message = self.message()?;
        let offset = self.message_offset() as usize;
        if offset >= SIGNATURE_OFFSET {
            return Err(BootError::LayoutOverflow(
                bootsmith_sector::LayoutError::MessageOverflow {
                    message_offset: offset,
                    message_len: message.len(),
                },
            ));
        }
        Ok(())
    }

    /// Validates the options, including the size of the disk image
    pub fn check_image(&self) -> Result<(), BootError> {
        if self.image_size < SECTOR_SIZE as u64 {
            return Err(BootError::InvalidSize {
                target: self.image_size,
            });
        }
        self.check()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_defaults() {
        let options = BootOptions::default();
        assert_eq!(options.message_offset(), 0x2A);
        assert_eq!(
            options.message().unwrap().as_bytes_with_nul(),
            b"SAGE OS Bootloader Working!\r\nSystem Ready.\r\n\0"
        );
        assert_eq!(options.image_size, 1_474_560);
        assert_eq!(options.fixture.name(), "minimal");

        let options = options.with_fixture(Fixture::Working);
        assert_eq!(options.fixture.name(), "working");
        assert_eq!(options.message_offset(), 0x30);
        assert_eq!(
            options.message().unwrap().as_bytes_with_nul(),
            b"SAGE OS - Working!\r\nPress Ctrl+Alt+G then Cmd+Q to quit\r\n\0"
        );
    }

    #[test]
    fn test_overrides_win_over_fixture() {
        let message = DisplayMessage::from_text("custom").unwrap();
        let options = BootOptions::default()
            .with_fixture(Fixture::Working)
            .with_message(message.clone())
            .with_message_offset(0x80);
        assert_eq!(options.message_offset(), 0x80);
        assert_eq!(options.message().unwrap(), message);
    }

    #[test]
    fn test_check() {
        assert!(BootOptions::default().check().is_ok());
        assert!(BootOptions::default().check_image().is_ok());
        assert!(BootOptions::default().with_image_size(511).check().is_ok());
        assert!(matches!(
            BootOptions::default().with_image_size(511).check_image(),
            Err(BootError::InvalidSize { target: 511 })
        ));
        assert!(matches!(
            BootOptions::default().with_message_offset(510).check(),
            Err(BootError::LayoutOverflow(_))
        ));
        assert!(
            BootOptions::default()
                .with_geometry(MediaGeometry::FLOPPY_720K)
                .check()
                .is_ok()
        );
    }
}
