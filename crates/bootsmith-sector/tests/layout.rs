use bootsmith_asm::boot::assemble_boot_code;
use bootsmith_sector::{
    DisplayMessage, LayoutError, SECTOR_SIZE, SIGNATURE_OFFSET, SectorImage, build,
};
use pretty_assertions::assert_eq;

const SAGE_MESSAGE: &[u8] = b"SAGE OS Bootloader Working!\r\nSystem Ready.\r\n\0";

fn sage_message() -> DisplayMessage {
    DisplayMessage::from_bytes_with_nul(SAGE_MESSAGE).unwrap()
}

fn assert_zero(sector: &SectorImage, start: usize, end: usize) {
    let region = &sector.as_bytes()[start..end];
    assert!(
        region.iter().all(|&b| b == 0),
        "expected zeroes in {start:#x}..{end:#x}, got {region:02X?}"
    );
}

#[test]
fn scenario_36_code_bytes_at_0x2a() {
    // Any 36 byte program, the builder does not look at the code
    let code: Vec<u8> = (1..=36).collect();
    let sector = build(&code, &sage_message(), 0x2A).unwrap();
    let bytes = sector.as_bytes();
    let message_end = 0x2A + SAGE_MESSAGE.len();

    assert_eq!(bytes.len(), SECTOR_SIZE);
    assert_eq!(&bytes[..36], &code[..]);
    assert_zero(&sector, 36, 0x2A);
    assert_eq!(&bytes[0x2A..message_end], SAGE_MESSAGE);
    assert_zero(&sector, message_end, SIGNATURE_OFFSET);
    assert_eq!(&bytes[510..], &[0x55, 0xAA]);
}

#[test]
fn scenario_message_in_signature_region() {
    let code = assemble_boot_code(0x2A).unwrap();
    assert_eq!(
        build(&code, &sage_message(), 0x1FC),
        Err(LayoutError::MessageOverflow {
            message_offset: 0x1FC,
            message_len: SAGE_MESSAGE.len(),
        })
    );
}

#[test]
fn assembled_boot_code_layout() {
    let code = assemble_boot_code(0x2A).unwrap();
    let sector = build(&code, &sage_message(), 0x2A).unwrap();
    let bytes = sector.as_bytes();

    assert_eq!(&bytes[..code.len()], code.as_bytes());
    assert_zero(&sector, code.len(), 0x2A);
    assert_eq!(sector.message_at(0x2A), Some(SAGE_MESSAGE));
    // mov si, 0x7c2a points at the message once loaded at 0x7c00
    let si = code
        .windows(3)
        .find(|w| w[0] == 0xBE)
        .map(|w| u16::from_le_bytes([w[1], w[2]]))
        .unwrap();
    assert_eq!(si as usize - 0x7C00, 0x2A);
    assert_eq!(SectorImage::from_bytes(bytes).as_ref(), Ok(&sector));
}

#[test]
fn signature_survives_every_valid_layout() {
    let message = DisplayMessage::from_text("boot").unwrap();
    for code_len in [0usize, 1, 38, 100, 505] {
        let code = vec![0xFFu8; code_len];
        for offset in code_len..=(SIGNATURE_OFFSET - message.len()) {
            let sector = build(&code, &message, offset).unwrap();
            let bytes = sector.as_bytes();
            assert_eq!(&bytes[510..], &[0x55, 0xAA]);
            assert_eq!(&bytes[offset..offset + message.len()], b"boot\0");
            assert_zero(&sector, code_len, offset);
            assert_zero(&sector, offset + message.len(), SIGNATURE_OFFSET);
        }
    }
}

#[test]
fn every_overlapping_layout_fails() {
    let message = DisplayMessage::from_text("boot").unwrap();
    for offset in 0..SECTOR_SIZE {
        let code = vec![0x90u8; offset + 1];
        assert!(matches!(
            build(&code, &message, offset),
            Err(LayoutError::CodeOverlapsMessage { .. })
        ));
    }
    for offset in (SIGNATURE_OFFSET - message.len() + 1)..SECTOR_SIZE {
        assert!(matches!(
            build(&[], &message, offset),
            Err(LayoutError::MessageOverflow { .. })
        ));
    }
}
