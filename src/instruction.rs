// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Operand size and direction fields of the instruction word.

use crate::error::Error;

/// Size of an operation.
///
/// The discriminants are the operand sizes in bytes, so the enum doubles as
/// the address-register stride of the post/preincrement addressing modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Size {
    Byte = 1,
    Word = 2,
    Long = 4,
}

impl Size {
    /// Creates a size from the primary 2-bits size field (0, 1, 2).
    pub fn from_bits(opcode: u16, d: u16) -> Result<Self, Error> {
        match d {
            0 => Ok(Self::Byte),
            1 => Ok(Self::Word),
            2 => Ok(Self::Long),
            _ => Err(Error::UnsupportedOpcodeVariant { opcode }),
        }
    }

    /// Creates a size from the MOVE and MOVEA size field.
    ///
    /// This field keeps the hardware encoding {1 = Byte, 3 = Word, 2 = Long};
    /// do not renumber it.
    pub fn from_move_bits(opcode: u16, d: u16) -> Result<Self, Error> {
        match d {
            1 => Ok(Self::Byte),
            3 => Ok(Self::Word),
            2 => Ok(Self::Long),
            _ => Err(Error::UnsupportedOpcodeVariant { opcode }),
        }
    }

    /// Creates a size from a single size bit (MOVEM, EXT): 0 = Word, 1 = Long.
    pub fn from_single_bit(d: u16) -> Self {
        if d & 1 != 0 {
            Self::Long
        } else {
            Self::Word
        }
    }

    /// Returns Word when self is Byte, self otherwise.
    ///
    /// Byte-sized post/preincrement on A7 adjusts by 2 to keep the stack
    /// word-aligned.
    #[inline(always)]
    pub fn as_word_long(self) -> Self {
        if self == Self::Byte {
            Self::Word
        } else {
            self
        }
    }

    #[inline(always)]
    pub fn is_byte(self) -> bool {
        self == Self::Byte
    }

    #[inline(always)]
    pub fn is_word(self) -> bool {
        self == Self::Word
    }

    #[inline(always)]
    pub fn is_long(self) -> bool {
        self == Self::Long
    }
}

/// Specify the direction of the operation.
///
/// `DstReg` and `DstEa` are used by ADD, AND, OR and SUB.
///
/// `Left` and `Right` are used by the shift and rotate instructions.
///
/// `RegisterToMemory` and `MemoryToRegister` are used by MOVEM and MOVEP.
///
/// `RegisterToRegister` and `MemoryToMemory` are used by ADDX and SUBX.
///
/// `RegisterToUsp` and `UspToRegister` are used by MOVE USP.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Destination is a register.
    DstReg,
    /// Destination is in memory.
    DstEa,
    /// Left shift or rotation.
    Left,
    /// Right shift or rotation.
    Right,
    /// Transfer from a register to memory.
    RegisterToMemory,
    /// Transfer from memory to a register.
    MemoryToRegister,
    /// Register to register operation.
    RegisterToRegister,
    /// Memory to memory operation.
    MemoryToMemory,
    /// For MOVE USP only.
    RegisterToUsp,
    /// For MOVE USP only.
    UspToRegister,
}
