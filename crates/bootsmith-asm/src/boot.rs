//! The boot program: print a message through the BIOS, then halt forever.
//!
//! The BIOS loads the boot sector at `0000:7C00` and jumps to its first byte, so the
//! message is addressed as `0x7C00 + message_offset` once the data segment is zeroed.

use crate::{AsmError, Instruction, Label, MachineCode, Program, Reg8, Reg16, SegReg};

/// The address the BIOS loads the boot sector to
pub const LOAD_ADDRESS: u16 = 0x7C00;

/// INT 10h, the BIOS video service
pub const VIDEO_SERVICE: u8 = 0x10;
/// AH = 00h, set video mode
pub const SET_VIDEO_MODE: u8 = 0x00;
/// AL = 03h, 80x25 colour text
pub const TEXT_MODE_80X25: u8 = 0x03;
/// AH = 0Eh, teletype output of AL
pub const TELETYPE_OUTPUT: u8 = 0x0E;

const PRINT_LOOP: &str = "print";
const HANG: &str = "hang";

/// The real-mode address of a message placed at `message_offset` within the sector
///
/// The result wraps to 16 bits, like the `mov si, imm16` it ends up in.
pub const fn message_address(message_offset: u16) -> u16 {
    LOAD_ADDRESS.wrapping_add(message_offset)
}

/// Builds the boot program for a message stored at `message_offset`
pub fn teletype_program(message_offset: u16) -> Program {
    let mut program = Program::new();
    // Zero the segments with interrupts off, and put the stack right below the sector
    program
        .push(Instruction::Cli)
        .push(Instruction::Xor16 {
            dst: Reg16::Ax,
            src: Reg16::Ax,
        })
        .push(Instruction::MovSeg {
            dst: SegReg::Ds,
            src: Reg16::Ax,
        })
        .push(Instruction::MovSeg {
            dst: SegReg::Es,
            src: Reg16::Ax,
        })
        .push(Instruction::MovSeg {
            dst: SegReg::Ss,
            src: Reg16::Ax,
        })
        .push(Instruction::MovImm16 {
            dst: Reg16::Sp,
            imm: LOAD_ADDRESS,
        })
        .push(Instruction::Sti);

    // Setting the mode also clears the screen
    program
        .push(Instruction::MovImm8 {
            dst: Reg8::Ah,
            imm: SET_VIDEO_MODE,
        })
        .push(Instruction::MovImm8 {
            dst: Reg8::Al,
            imm: TEXT_MODE_80X25,
        })
        .push(Instruction::Int(VIDEO_SERVICE));

    program
        .push(Instruction::MovImm16 {
            dst: Reg16::Si,
            imm: message_address(message_offset),
        })
        .label(PRINT_LOOP)
        .push(Instruction::Lodsb)
        .push(Instruction::Test8 {
            lhs: Reg8::Al,
            rhs: Reg8::Al,
        })
        .push(Instruction::Jz(Label::new(HANG)))
        .push(Instruction::MovImm8 {
            dst: Reg8::Ah,
            imm: TELETYPE_OUTPUT,
        })
        // page 0
        .push(Instruction::MovImm8 {
            dst: Reg8::Bh,
            imm: 0x00,
        })
        .push(Instruction::Int(VIDEO_SERVICE))
        .push(Instruction::Jmp(Label::new(PRINT_LOOP)));

    // An interrupt wakes the CPU from hlt, so jump back to it
    program
        .label(HANG)
        .push(Instruction::Hlt)
        .push(Instruction::Jmp(Label::new(HANG)));

    program
}

/// Assembles the boot program, checking that it ends before `message_offset`
pub fn assemble_boot_code(message_offset: u16) -> Result<MachineCode, AsmError> {
    let code = teletype_program(message_offset).assemble()?;
    if code.len() > message_offset as usize {
        return Err(AsmError::CodeOverflow {
            code_len: code.len(),
            message_offset: message_offset as usize,
        });
    }
    log::debug!(
        "Assembled {}b of boot code, message at {:#06x}",
        code.len(),
        message_address(message_offset)
    );
    Ok(code)
}
