//! Real-mode register operands and their encodings

use core::fmt;

/// 8-bit general purpose registers, in encoding order
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reg8 {
    Al = 0,
    Cl = 1,
    Dl = 2,
    Bl = 3,
    Ah = 4,
    Ch = 5,
    Dh = 6,
    Bh = 7,
}

/// 16-bit general purpose registers, in encoding order
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reg16 {
    Ax = 0,
    Cx = 1,
    Dx = 2,
    Bx = 3,
    Sp = 4,
    Bp = 5,
    Si = 6,
    Di = 7,
}

/// Segment registers, in encoding order
///
/// `cs` is deliberately missing, since `mov cs, r16` is not a valid instruction.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegReg {
    Es = 0,
    Ss = 2,
    Ds = 3,
}

impl Reg8 {
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl Reg16 {
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl SegReg {
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Builds a register-direct ModR/M byte (mod = 0b11)
pub const fn modrm_direct(reg: u8, rm: u8) -> u8 {
    0xC0 | ((reg & 0b111) << 3) | (rm & 0b111)
}

impl fmt::Display for Reg8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Al => "al",
            Self::Cl => "cl",
            Self::Dl => "dl",
            Self::Bl => "bl",
            Self::Ah => "ah",
            Self::Ch => "ch",
            Self::Dh => "dh",
            Self::Bh => "bh",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Reg16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ax => "ax",
            Self::Cx => "cx",
            Self::Dx => "dx",
            Self::Bx => "bx",
            Self::Sp => "sp",
            Self::Bp => "bp",
            Self::Si => "si",
            Self::Di => "di",
        };
        f.write_str(name)
    }
}

impl fmt::Display for SegReg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Es => "es",
            Self::Ss => "ss",
            Self::Ds => "ds",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modrm_direct() {
        // xor ax, ax
        assert_eq!(modrm_direct(Reg16::Ax.code(), Reg16::Ax.code()), 0xC0);
        // mov ds, ax / mov es, ax / mov ss, ax
        assert_eq!(modrm_direct(SegReg::Ds.code(), Reg16::Ax.code()), 0xD8);
        assert_eq!(modrm_direct(SegReg::Es.code(), Reg16::Ax.code()), 0xC0);
        assert_eq!(modrm_direct(SegReg::Ss.code(), Reg16::Ax.code()), 0xD0);
        // test bl, dh
        assert_eq!(modrm_direct(Reg8::Dh.code(), Reg8::Bl.code()), 0xF3);
    }
}
