use alloc::vec::Vec;
use core::fmt::{self, Debug};

/// Errors from constructing a [`DisplayMessage`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MessageError {
    #[error("message is not terminated by a zero byte")]
    MissingTerminator,

    /// The print loop stops at the first zero byte, so anything after it would be lost
    #[error("message contains a zero byte at position {0} before its end")]
    InteriorNul(usize),
}

/// A message printed one byte at a time by the boot code
///
/// The stored bytes always end with exactly one zero byte, and contain no other zero bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct DisplayMessage {
    bytes: Vec<u8>,
}

impl DisplayMessage {
    /// Creates a message from text, appending the terminator
    pub fn from_text(text: &str) -> Result<Self, MessageError> {
        let mut bytes = Vec::with_capacity(text.len() + 1);
        bytes.extend_from_slice(text.as_bytes());
        bytes.push(0);
        Self::from_bytes_with_nul(&bytes)
    }

    /// Creates a message from lines, each followed by a carriage return and line feed
    ///
    /// BIOS teletype output treats `\n` as a plain line feed, so the cursor only returns to
    /// the first column on `\r`.
    ///
    /// # Example
    /// ```
    /// use bootsmith_sector::DisplayMessage;
    ///
    /// let message = DisplayMessage::from_lines(&["Hello", "World"])?;
    /// assert_eq!(message.as_bytes_with_nul(), b"Hello\r\nWorld\r\n\0");
    /// # Ok::<(), bootsmith_sector::MessageError>(())
    /// ```
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Result<Self, MessageError> {
        let mut bytes = Vec::new();
        for line in lines {
            bytes.extend_from_slice(line.as_ref().as_bytes());
            bytes.extend_from_slice(b"\r\n");
        }
        bytes.push(0);
        Self::from_bytes_with_nul(&bytes)
    }

    /// Creates a message from bytes that already end with the terminator
    pub fn from_bytes_with_nul(bytes: &[u8]) -> Result<Self, MessageError> {
        let Some((&0, text)) = bytes.split_last() else {
            return Err(MessageError::MissingTerminator);
        };
        if let Some(position) = text.iter().position(|&b| b == 0) {
            return Err(MessageError::InteriorNul(position));
        }
        Ok(Self {
            bytes: bytes.to_vec(),
        })
    }

    /// The message including its terminator, as placed in the sector
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.bytes
    }

    /// The message without its terminator
    pub fn text_bytes(&self) -> &[u8] {
        &self.bytes[..self.bytes.len() - 1]
    }

    /// The number of bytes the message occupies, including the terminator
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the message prints nothing, i.e. it is only the terminator
    pub fn is_empty(&self) -> bool {
        self.bytes.len() == 1
    }
}

impl Debug for DisplayMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DisplayMessage")
            .field(&format_args!("\"{}\"", self.text_bytes().escape_ascii()))
            .finish()
    }
}
