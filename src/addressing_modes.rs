// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Addressing mode decoding and effective-address calculation.
//!
//! A decoded [AddressingMode] is a tagged operand handle: it names either a
//! register, an immediate, or the recipe for a memory address. Reads and
//! writes dispatch on the tag (see the accessors in [memory](crate::memory)),
//! so pre/postdecrement side effects happen exactly once, when the address
//! is first materialised.

use crate::M68k;
use crate::error::Error;
use crate::instruction::Size;
use crate::utils::{bit, bits};

/// Addressing modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressingMode {
    /// Data Register Direct.
    Drd(u8),
    /// Address Register Direct.
    Ard(u8),
    /// Address Register Indirect.
    Ari(u8),
    /// Address Register Indirect With Postincrement.
    Ariwpo(u8),
    /// Address Register Indirect With Predecrement.
    Ariwpr(u8),
    /// Address Register Indirect With Displacement (address reg, displacement).
    Ariwd(u8, i16),
    /// Address Register Indirect With Index 8 (address reg, brief extension word).
    Ariwi8(u8, BriefExtensionWord),
    /// Absolute Short.
    AbsShort(u16),
    /// Absolute Long.
    AbsLong(u32),
    /// Program Counter Indirect With Displacement (PC at extension word, displacement).
    Pciwd(u32, i16),
    /// Program Counter Indirect With Index 8 (PC at extension word, brief extension word).
    Pciwi8(u32, BriefExtensionWord),
    /// Immediate Data (cast this variant to the correct type when used).
    Immediate(u32),
}

impl AddressingMode {
    /// Return the register of the addressing mode, or None if the mode has no associated register.
    #[inline(always)]
    pub const fn register(self) -> Option<u8> {
        match self {
            AddressingMode::Drd(reg) => Some(reg),
            AddressingMode::Ard(reg) => Some(reg),
            AddressingMode::Ari(reg) => Some(reg),
            AddressingMode::Ariwpo(reg) => Some(reg),
            AddressingMode::Ariwpr(reg) => Some(reg),
            AddressingMode::Ariwd(reg, _) => Some(reg),
            AddressingMode::Ariwi8(reg, _) => Some(reg),
            _ => None,
        }
    }

    /// Returns true if `self` is `Drd`, false otherwise.
    #[inline(always)]
    pub const fn is_drd(self) -> bool {
        matches!(self, Self::Drd(_))
    }

    /// Returns true if `self` is `Ard`, false otherwise.
    #[inline(always)]
    pub const fn is_ard(self) -> bool {
        matches!(self, Self::Ard(_))
    }

    /// Returns true if `self` is `Ariwpo`, false otherwise.
    #[inline(always)]
    pub const fn is_ariwpo(self) -> bool {
        matches!(self, Self::Ariwpo(_))
    }

    /// Returns true if `self` is `Ariwpr`, false otherwise.
    #[inline(always)]
    pub const fn is_ariwpr(self) -> bool {
        matches!(self, Self::Ariwpr(_))
    }
}

/// Raw brief extension word of the indexed addressing modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BriefExtensionWord(pub u16);

impl BriefExtensionWord {
    /// Returns the displacement associated with the brief extension word.
    pub const fn disp(self) -> i8 {
        self.0 as i8
    }

    #[inline(always)]
    const fn is_address_reg(self) -> bool {
        bit(self.0, 15)
    }

    #[inline(always)]
    const fn reg(self) -> u8 {
        bits(self.0, 12, 14) as u8
    }

    #[inline(always)]
    const fn is_long(self) -> bool {
        bit(self.0, 11)
    }
}

/// An addressing mode bound to an operand size, with its memory address
/// memoised so the register side effects of post/predecrement apply once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct EffectiveAddress {
    /// The addressing mode.
    pub mode: AddressingMode,
    /// Where this effective address points to. `None` until calculated.
    pub address: Option<u32>,
    /// The size of the data.
    pub size: Option<Size>,
}

impl EffectiveAddress {
    pub fn new(mode: AddressingMode, size: Option<Size>) -> Self {
        Self {
            mode,
            address: None,
            size,
        }
    }
}

impl M68k {
    /// Decodes the mode and register fields of the current opcode into an
    /// [AddressingMode], fetching any extension words.
    ///
    /// `size` is only needed by the immediate mode, to know how many
    /// extension words carry the operand.
    pub(crate) fn fetch_mode(&mut self, mode: u16, reg: u8, size: Option<Size>) -> Result<AddressingMode, Error> {
        match mode {
            0 => Ok(AddressingMode::Drd(reg)),
            1 => Ok(AddressingMode::Ard(reg)),
            2 => Ok(AddressingMode::Ari(reg)),
            3 => Ok(AddressingMode::Ariwpo(reg)),
            4 => Ok(AddressingMode::Ariwpr(reg)),
            5 => Ok(AddressingMode::Ariwd(reg, self.next_word()? as i16)),
            6 => Ok(AddressingMode::Ariwi8(reg, BriefExtensionWord(self.next_word()?))),
            7 => match reg {
                0 => Ok(AddressingMode::AbsShort(self.next_word()?)),
                1 => Ok(AddressingMode::AbsLong(self.next_long()?)),
                2 => {
                    let pc = self.regs.pc;
                    Ok(AddressingMode::Pciwd(pc, self.next_word()? as i16))
                },
                3 => {
                    let pc = self.regs.pc;
                    Ok(AddressingMode::Pciwi8(pc, BriefExtensionWord(self.next_word()?)))
                },
                4 => {
                    if size == Some(Size::Long) {
                        Ok(AddressingMode::Immediate(self.next_long()?))
                    } else {
                        Ok(AddressingMode::Immediate(self.next_word()? as u32))
                    }
                },
                _ => Err(Error::UnsupportedOpcodeVariant { opcode: self.opcode }),
            },
            _ => Err(Error::UnsupportedOpcodeVariant { opcode: self.opcode }),
        }
    }

    /// Decodes the effective-address field in the low 6 bits of the current
    /// opcode (mode-register order, used by every instruction but MOVE's
    /// destination).
    pub(crate) fn fetch_ea(&mut self, size: Option<Size>) -> Result<AddressingMode, Error> {
        let mode = bits(self.opcode, 3, 5);
        let reg = bits(self.opcode, 0, 2) as u8;
        self.fetch_mode(mode, reg, size)
    }

    /// Calculates the memory address of the given effective address.
    ///
    /// If the address has already been calculated it is returned as is;
    /// otherwise it is computed once and memoised. Operands that do not live
    /// in memory have no address and yield [Error::InvalidAddressingMode].
    pub(crate) fn effective_address(&mut self, ea: &mut EffectiveAddress) -> Result<u32, Error> {
        if ea.address.is_none() {
            ea.address = match ea.mode {
                AddressingMode::Ari(reg) => Some(self.regs.a(reg)),
                AddressingMode::Ariwpo(reg) => {
                    let size = ea.size.ok_or(Error::UnsupportedOpcodeVariant { opcode: self.opcode })?;
                    Some(self.postincrement(reg, size))
                },
                AddressingMode::Ariwpr(reg) => {
                    let size = ea.size.ok_or(Error::UnsupportedOpcodeVariant { opcode: self.opcode })?;
                    Some(self.predecrement(reg, size))
                },
                AddressingMode::Ariwd(reg, disp) => Some(self.regs.a(reg).wrapping_add(disp as u32)),
                AddressingMode::Ariwi8(reg, bew) => {
                    Some(self.regs.a(reg).wrapping_add(bew.disp() as u32).wrapping_add(self.index_register(bew)))
                },
                AddressingMode::AbsShort(addr) => Some(addr as i16 as u32),
                AddressingMode::AbsLong(addr) => Some(addr),
                AddressingMode::Pciwd(pc, disp) => Some(pc.wrapping_add(disp as u32)),
                AddressingMode::Pciwi8(pc, bew) => {
                    Some(pc.wrapping_add(bew.disp() as u32).wrapping_add(self.index_register(bew)))
                },
                _ => None,
            };
        }

        ea.address.ok_or(Error::InvalidAddressingMode { mode: ea.mode })
    }

    /// Index register value of a brief extension word, sign-extended from a
    /// word when the size bit says so.
    const fn index_register(&self, bew: BriefExtensionWord) -> u32 {
        let reg = bew.reg();
        let long = bew.is_long();

        if bew.is_address_reg() {
            if long {
                self.regs.a(reg)
            } else {
                self.regs.a(reg) as i16 as u32
            }
        } else {
            if long {
                self.regs.d[reg as usize]
            } else {
                self.regs.d[reg as usize] as i16 as u32
            }
        }
    }

    /// Address register indirect with postincrement: returns the address,
    /// then bumps the register by the operand size.
    pub(crate) fn postincrement(&mut self, reg: u8, size: Size) -> u32 {
        let stride = if reg == 7 { size.as_word_long() } else { size };
        let areg = self.regs.a_mut(reg);
        let addr = *areg;
        *areg = areg.wrapping_add(stride as u32);
        addr
    }

    /// Address register indirect with predecrement: drops the register by
    /// the operand size, then returns the new address.
    pub(crate) fn predecrement(&mut self, reg: u8, size: Size) -> u32 {
        let stride = if reg == 7 { size.as_word_long() } else { size };
        let areg = self.regs.a_mut(reg);
        *areg = areg.wrapping_sub(stride as u32);
        *areg
    }
}
