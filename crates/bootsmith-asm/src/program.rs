use alloc::{collections::BTreeMap, vec::Vec};
use core::ops::Deref;

use crate::{AsmError, Instruction, Label};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
    Label(Label),
    Instruction(Instruction),
}

/// An ordered list of instructions and labels
///
/// # Example
/// ```
/// use bootsmith_asm::{Instruction, Label, Program};
///
/// let mut program = Program::new();
/// program
///     .label("hang")
///     .push(Instruction::Hlt)
///     .push(Instruction::Jmp(Label::new("hang")));
/// let code = program.assemble()?;
/// assert_eq!(code.as_bytes(), &[0xF4, 0xEB, 0xFD]);
/// # Ok::<(), bootsmith_asm::AsmError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    items: Vec<Item>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an instruction
    pub fn push(&mut self, instruction: Instruction) -> &mut Self {
        self.items.push(Item::Instruction(instruction));
        self
    }

    /// Places a label at the current position
    pub fn label(&mut self, name: &str) -> &mut Self {
        self.items.push(Item::Label(Label::new(name)));
        self
    }

    /// The size of the program once assembled
    pub fn encoded_len(&self) -> usize {
        self.instructions().map(Instruction::encoded_len).sum()
    }

    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.items.iter().filter_map(|item| match item {
            Item::Instruction(instruction) => Some(instruction),
            Item::Label(_) => None,
        })
    }

    /// Assembles the program into machine code
    ///
    /// The first pass records the offset of every label, and the second pass encodes the
    /// instructions with their branch displacements resolved.
    pub fn assemble(&self) -> Result<MachineCode, AsmError> {
        let mut labels = BTreeMap::new();
        let mut offset = 0;
        for item in &self.items {
            match item {
                Item::Label(label) => {
                    if labels.insert(label.clone(), offset).is_some() {
                        return Err(AsmError::DuplicateLabel(label.name().into()));
                    }
                }
                Item::Instruction(instruction) => offset += instruction.encoded_len(),
            }
        }

        let mut bytes = Vec::with_capacity(offset);
        for instruction in self.instructions() {
            let at = bytes.len();
            instruction.encode(at, &labels, &mut bytes)?;
            log::trace!("{at:#06x}: {:02X?} {instruction}", &bytes[at..]);
        }
        debug_assert_eq!(bytes.len(), offset);

        Ok(MachineCode { bytes })
    }
}

/// Assembled machine code, ready to be placed in a sector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineCode {
    bytes: Vec<u8>,
}

impl MachineCode {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Deref for MachineCode {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.bytes
    }
}

impl AsRef<[u8]> for MachineCode {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Reg8, Reg16};
    use alloc::string::ToString;

    #[test]
    fn test_forward_and_backward_branches() {
        let mut program = Program::new();
        program
            .label("top")
            .push(Instruction::Test8 {
                lhs: Reg8::Al,
                rhs: Reg8::Al,
            })
            .push(Instruction::Jz(Label::new("end")))
            .push(Instruction::Jmp(Label::new("top")))
            .label("end")
            .push(Instruction::Hlt);

        let code = program.assemble().unwrap();
        assert_eq!(
            code.as_bytes(),
            &[0x84, 0xC0, 0x74, 0x02, 0xEB, 0xFA, 0xF4]
        );
        assert_eq!(code.len(), program.encoded_len());
    }

    #[test]
    fn test_undefined_label() {
        let mut program = Program::new();
        program.push(Instruction::Jmp(Label::new("nowhere")));
        assert_eq!(
            program.assemble(),
            Err(AsmError::UndefinedLabel("nowhere".to_string()))
        );
    }

    #[test]
    fn test_duplicate_label() {
        let mut program = Program::new();
        program.label("a").push(Instruction::Hlt).label("a");
        assert_eq!(
            program.assemble(),
            Err(AsmError::DuplicateLabel("a".to_string()))
        );
    }

    #[test]
    fn test_branch_out_of_range() {
        let mut program = Program::new();
        program.push(Instruction::Jmp(Label::new("far")));
        for _ in 0..64 {
            program.push(Instruction::MovImm16 {
                dst: Reg16::Ax,
                imm: 0,
            });
        }
        program.label("far").push(Instruction::Hlt);

        match program.assemble() {
            Err(AsmError::BranchOutOfRange { label, distance }) => {
                assert_eq!(label, "far");
                assert_eq!(distance, 192);
            }
            other => panic!("expected an out of range branch, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_program() {
        let code = Program::new().assemble().unwrap();
        assert!(code.is_empty());
    }
}
