//! Bootsmith ASM
//!
//! A tiny assembler for the handful of 16-bit x86 instructions a boot sector needs.
//! Programs are written as a list of [`Instruction`] descriptors and [`Label`]s, and
//! [`Program::assemble`] resolves every branch from its label, so displacements always
//! agree with the instruction lengths.
//!
//! The [`boot`] module contains the program that prints a message through the BIOS and halts.

#![no_std]

extern crate alloc;

pub mod boot;
mod instruction;
mod program;
pub mod register;

pub use instruction::*;
pub use program::*;
pub use register::{Reg8, Reg16, SegReg};

use alloc::string::String;

/// Errors that can occur while assembling a program
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AsmError {
    /// A branch refers to a label that was never placed
    #[error("undefined label `{0}`")]
    UndefinedLabel(String),

    /// The same label was placed twice
    #[error("label `{0}` is defined more than once")]
    DuplicateLabel(String),

    /// A short branch can only reach -128..=127 bytes from the next instruction
    #[error("branch to `{label}` needs a displacement of {distance}, which does not fit in a short jump")]
    BranchOutOfRange { label: String, distance: isize },

    /// The assembled code would run into the message placed after it
    #[error("code is {code_len}b long but the message starts at offset {message_offset:#x}")]
    CodeOverflow {
        code_len: usize,
        message_offset: usize,
    },
}
