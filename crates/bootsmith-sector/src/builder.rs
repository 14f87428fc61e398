use crate::{BOOT_SIGNATURE, DisplayMessage, LayoutError, SIGNATURE_OFFSET, SectorImage, raw::RawSector};

/// What to do with a message that does not fit before the boot signature
#[repr(u8)]
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessagePolicy {
    /// Fail with [`LayoutError::MessageOverflow`]
    #[default]
    Reject,

    /// Cut the message so its terminator lands right before the signature
    ///
    /// The message must still start before the signature. A warning is logged whenever
    /// this actually truncates.
    Truncate,
}

/// Builds a boot sector, rejecting a message that does not fit
///
/// `code` is placed at offset 0, `message` (with its terminator) at `message_offset`,
/// and [`BOOT_SIGNATURE`] at [`SIGNATURE_OFFSET`]. Every other byte is zero.
///
/// # Example
/// ```
/// use bootsmith_sector::{build, DisplayMessage};
///
/// let message = DisplayMessage::from_text("Hi")?;
/// let sector = build(&[0xF4, 0xEB, 0xFD], &message, 0x10)?;
/// assert_eq!(&sector.as_bytes()[..3], &[0xF4, 0xEB, 0xFD]);
/// assert_eq!(&sector.as_bytes()[0x10..0x13], b"Hi\0");
/// assert_eq!(&sector.as_bytes()[510..], &[0x55, 0xAA]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn build(
    code: &[u8],
    message: &DisplayMessage,
    message_offset: usize,
) -> Result<SectorImage, LayoutError> {
    build_with_policy(code, message, message_offset, MessagePolicy::Reject)
}

/// Builds a boot sector, handling an oversized message according to `policy`
pub fn build_with_policy(
    code: &[u8],
    message: &DisplayMessage,
    message_offset: usize,
    policy: MessagePolicy,
) -> Result<SectorImage, LayoutError> {
    let message = message.as_bytes_with_nul();
    let overflow = LayoutError::MessageOverflow {
        message_offset,
        message_len: message.len(),
    };

    if code.len() > message_offset {
        return Err(LayoutError::CodeOverlapsMessage {
            code_len: code.len(),
            message_offset,
        });
    }
    if message_offset >= SIGNATURE_OFFSET {
        return Err(overflow);
    }

    let available = SIGNATURE_OFFSET - message_offset;
    let truncated = message.len() > available;
    if truncated && policy == MessagePolicy::Reject {
        return Err(overflow);
    }

    let mut raw: RawSector = bytemuck::Zeroable::zeroed();
    raw.body[..code.len()].copy_from_slice(code);
    log::trace!("Placed {}b of code at 0x000", code.len());

    if truncated {
        let kept = available - 1;
        log::warn!(
            "Message of {}b at {message_offset:#x} truncated to {available}b to fit before the boot signature",
            message.len()
        );
        raw.body[message_offset..message_offset + kept].copy_from_slice(&message[..kept]);
        // The terminator is already there, the body starts zeroed
    } else {
        raw.body[message_offset..message_offset + message.len()].copy_from_slice(message);
    }
    log::trace!(
        "Placed {}b of message at {message_offset:#05x}",
        message.len().min(available)
    );

    raw.signature = BOOT_SIGNATURE;
    Ok(SectorImage::from_raw(raw))
}
