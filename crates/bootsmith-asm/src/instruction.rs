use alloc::{collections::BTreeMap, string::String, vec::Vec};
use core::fmt;

use crate::{
    AsmError,
    register::{Reg8, Reg16, SegReg, modrm_direct},
};

/// A named position in a program, used as a branch target
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Label(String);

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single 16-bit instruction, described by its mnemonic and operands
///
/// Only the forms needed by a boot sector are supported. Branches are always short
/// (rel8) jumps, and their target is resolved from a [`Label`] at assembly time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// `cli`: disable maskable interrupts
    Cli,
    /// `sti`: enable maskable interrupts
    Sti,
    /// `hlt`: halt until the next interrupt
    Hlt,
    /// `lodsb`: load `[ds:si]` into `al` and advance `si`
    Lodsb,
    /// `xor r16, r16`
    Xor16 { dst: Reg16, src: Reg16 },
    /// `mov sreg, r16`
    MovSeg { dst: SegReg, src: Reg16 },
    /// `mov r16, imm16`
    MovImm16 { dst: Reg16, imm: u16 },
    /// `mov r8, imm8`
    MovImm8 { dst: Reg8, imm: u8 },
    /// `int imm8`
    Int(u8),
    /// `test r8, r8`
    Test8 { lhs: Reg8, rhs: Reg8 },
    /// `jz rel8`
    Jz(Label),
    /// `jmp rel8`
    Jmp(Label),
}

impl Instruction {
    /// The number of bytes this instruction occupies once encoded
    pub const fn encoded_len(&self) -> usize {
        match self {
            Self::Cli | Self::Sti | Self::Hlt | Self::Lodsb => 1,
            Self::Xor16 { .. }
            | Self::MovSeg { .. }
            | Self::MovImm8 { .. }
            | Self::Int(_)
            | Self::Test8 { .. }
            | Self::Jz(_)
            | Self::Jmp(_) => 2,
            Self::MovImm16 { .. } => 3,
        }
    }

    /// Encodes the instruction, appending it to `out`
    ///
    /// `at` is the offset of the instruction within the program, which is needed to
    /// compute relative branch displacements.
    pub(crate) fn encode(
        &self,
        at: usize,
        labels: &BTreeMap<Label, usize>,
        out: &mut Vec<u8>,
    ) -> Result<(), AsmError> {
        match self {
            Self::Cli => out.push(0xFA),
            Self::Sti => out.push(0xFB),
            Self::Hlt => out.push(0xF4),
            Self::Lodsb => out.push(0xAC),
            // XOR r/m16, r16
            Self::Xor16 { dst, src } => {
                out.extend_from_slice(&[0x31, modrm_direct(src.code(), dst.code())])
            }
            // MOV Sreg, r/m16
            Self::MovSeg { dst, src } => {
                out.extend_from_slice(&[0x8E, modrm_direct(dst.code(), src.code())])
            }
            Self::MovImm16 { dst, imm } => {
                out.push(0xB8 + dst.code());
                out.extend_from_slice(&imm.to_le_bytes());
            }
            Self::MovImm8 { dst, imm } => out.extend_from_slice(&[0xB0 + dst.code(), *imm]),
            Self::Int(vector) => out.extend_from_slice(&[0xCD, *vector]),
            // TEST r/m8, r8
            Self::Test8 { lhs, rhs } => {
                out.extend_from_slice(&[0x84, modrm_direct(rhs.code(), lhs.code())])
            }
            Self::Jz(label) => {
                let rel = short_displacement(at + self.encoded_len(), label, labels)?;
                out.extend_from_slice(&[0x74, rel as u8]);
            }
            Self::Jmp(label) => {
                let rel = short_displacement(at + self.encoded_len(), label, labels)?;
                out.extend_from_slice(&[0xEB, rel as u8]);
            }
        }
        Ok(())
    }
}

/// Computes the rel8 displacement from the end of a branch to its target
fn short_displacement(
    next: usize,
    label: &Label,
    labels: &BTreeMap<Label, usize>,
) -> Result<i8, AsmError> {
    let target = *labels
        .get(label)
        .ok_or_else(|| AsmError::UndefinedLabel(label.name().into()))?;
    let distance = target as isize - next as isize;
    i8::try_from(distance).map_err(|_| AsmError::BranchOutOfRange {
        label: label.name().into(),
        distance,
    })
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cli => write!(f, "cli"),
            Self::Sti => write!(f, "sti"),
            Self::Hlt => write!(f, "hlt"),
            Self::Lodsb => write!(f, "lodsb"),
            Self::Xor16 { dst, src } => write!(f, "xor {dst}, {src}"),
            Self::MovSeg { dst, src } => write!(f, "mov {dst}, {src}"),
            Self::MovImm16 { dst, imm } => write!(f, "mov {dst}, {imm:#06x}"),
            Self::MovImm8 { dst, imm } => write!(f, "mov {dst}, {imm:#04x}"),
            Self::Int(vector) => write!(f, "int {vector:#04x}"),
            Self::Test8 { lhs, rhs } => write!(f, "test {lhs}, {rhs}"),
            Self::Jz(label) => write!(f, "jz {label}"),
            Self::Jmp(label) => write!(f, "jmp {label}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn encode(instruction: Instruction) -> Vec<u8> {
        let mut out = Vec::new();
        instruction.encode(0, &BTreeMap::new(), &mut out).unwrap();
        assert_eq!(out.len(), instruction.encoded_len());
        out
    }

    #[test]
    fn test_encode_fixed_forms() {
        assert_eq!(encode(Instruction::Cli), vec![0xFA]);
        assert_eq!(encode(Instruction::Sti), vec![0xFB]);
        assert_eq!(encode(Instruction::Hlt), vec![0xF4]);
        assert_eq!(encode(Instruction::Lodsb), vec![0xAC]);
        assert_eq!(
            encode(Instruction::Xor16 {
                dst: Reg16::Ax,
                src: Reg16::Ax
            }),
            vec![0x31, 0xC0]
        );
        assert_eq!(
            encode(Instruction::MovSeg {
                dst: SegReg::Ds,
                src: Reg16::Ax
            }),
            vec![0x8E, 0xD8]
        );
        assert_eq!(
            encode(Instruction::MovImm16 {
                dst: Reg16::Sp,
                imm: 0x7C00
            }),
            vec![0xBC, 0x00, 0x7C]
        );
        assert_eq!(
            encode(Instruction::MovImm8 {
                dst: Reg8::Bh,
                imm: 0x00
            }),
            vec![0xB7, 0x00]
        );
        assert_eq!(encode(Instruction::Int(0x10)), vec![0xCD, 0x10]);
        assert_eq!(
            encode(Instruction::Test8 {
                lhs: Reg8::Al,
                rhs: Reg8::Al
            }),
            vec![0x84, 0xC0]
        );
    }

    #[test]
    fn test_encode_branch_backwards() {
        let mut labels = BTreeMap::new();
        labels.insert(Label::new("self"), 4);
        let mut out = Vec::new();
        Instruction::Jmp(Label::new("self"))
            .encode(4, &labels, &mut out)
            .unwrap();
        // jmp $
        assert_eq!(out, vec![0xEB, 0xFE]);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            alloc::format!(
                "{}",
                Instruction::MovImm16 {
                    dst: Reg16::Si,
                    imm: 0x7C2A
                }
            ),
            "mov si, 0x7c2a"
        );
        assert_eq!(
            alloc::format!("{}", Instruction::Jz(Label::new("hang"))),
            "jz hang"
        );
    }
}
