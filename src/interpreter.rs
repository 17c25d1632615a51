// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Instruction execution.
//!
//! One handler per instruction family, parameterised by the size, direction
//! and register fields it extracts from the opcode word. Within a handler
//! the order is always: decode the effective address (applying its
//! pre/postincrement), read the operands, compute the result and the
//! condition codes, write the result.

use crate::M68k;
use crate::addressing_modes::{AddressingMode, EffectiveAddress};
use crate::decoder::Isa;
use crate::error::Error;
use crate::exception::Vector;
use crate::instruction::{Direction, Size};
use crate::status_register::CCR_MASK;
use crate::utils::{bit, bits, ExtendedOps, Integer};

pub(super) const SIGN_BIT_8: u8 = 0x80;
pub(super) const SIGN_BIT_16: u16 = 0x8000;
pub(super) const SIGN_BIT_32: u32 = 0x8000_0000;

/// A fault raised while executing one instruction.
///
/// `Vector` faults are processor-visible: the execution loop recovers them
/// by running exception processing, and they never reach the host. `Error`
/// faults are fatal and propagate out of [tick](M68k::tick).
#[derive(Debug)]
pub(crate) enum Fault {
    Vector(u8),
    Error(Error),
}

impl From<Error> for Fault {
    fn from(error: Error) -> Self {
        Self::Error(error)
    }
}

pub(crate) type ExecuteResult = Result<(), Fault>;

/// Maps each [Isa] value to its handler. Index it with `isa as usize`.
pub(crate) const EXECUTE: [fn(&mut M68k) -> ExecuteResult; Isa::_Size as usize] = [
    M68k::execute_illegal,
    M68k::execute_add,
    M68k::execute_adda,
    M68k::execute_addi,
    M68k::execute_addq,
    M68k::execute_addx,
    M68k::execute_and,
    M68k::execute_andi,
    M68k::execute_andiccr,
    M68k::execute_andisr,
    M68k::execute_asm,
    M68k::execute_asr,
    M68k::execute_bcc,
    M68k::execute_bchg,
    M68k::execute_bclr,
    M68k::execute_bra,
    M68k::execute_bset,
    M68k::execute_bsr,
    M68k::execute_btst,
    M68k::execute_chk,
    M68k::execute_clr,
    M68k::execute_cmp,
    M68k::execute_cmpa,
    M68k::execute_cmpi,
    M68k::execute_cmpm,
    M68k::execute_dbcc,
    M68k::execute_divs,
    M68k::execute_divu,
    M68k::execute_eor,
    M68k::execute_eori,
    M68k::execute_eoriccr,
    M68k::execute_eorisr,
    M68k::execute_exg,
    M68k::execute_ext,
    M68k::execute_jmp,
    M68k::execute_jsr,
    M68k::execute_lea,
    M68k::execute_link,
    M68k::execute_lsm,
    M68k::execute_lsr,
    M68k::execute_move,
    M68k::execute_movea,
    M68k::execute_moveccr,
    M68k::execute_movefsr,
    M68k::execute_movesr,
    M68k::execute_moveusp,
    M68k::execute_movem,
    M68k::execute_movep,
    M68k::execute_moveq,
    M68k::execute_muls,
    M68k::execute_mulu,
    M68k::execute_neg,
    M68k::execute_negx,
    M68k::execute_nop,
    M68k::execute_not,
    M68k::execute_or,
    M68k::execute_ori,
    M68k::execute_oriccr,
    M68k::execute_orisr,
    M68k::execute_pea,
    M68k::execute_reset,
    M68k::execute_rom,
    M68k::execute_ror,
    M68k::execute_roxm,
    M68k::execute_roxr,
    M68k::execute_rte,
    M68k::execute_rtr,
    M68k::execute_rts,
    M68k::execute_scc,
    M68k::execute_stop,
    M68k::execute_sub,
    M68k::execute_suba,
    M68k::execute_subi,
    M68k::execute_subq,
    M68k::execute_subx,
    M68k::execute_swap,
    M68k::execute_tas,
    M68k::execute_trap,
    M68k::execute_trapv,
    M68k::execute_tst,
    M68k::execute_unlk,
];

impl M68k {
    fn check_supervisor(&self) -> ExecuteResult {
        if self.regs.sr.s {
            Ok(())
        } else {
            Err(Fault::Vector(Vector::PrivilegeViolation as u8))
        }
    }

    pub(super) fn execute_illegal(&mut self) -> ExecuteResult {
        Err(Fault::Vector(Vector::IllegalInstruction as u8))
    }

    /// Performs `dst + src` and computes X N Z V C.
    ///
    /// With `extend` the X bit is the carry-in and Z is only cleared on a
    /// non-zero result, so multi-precision chains keep Z meaningful.
    fn add_with_flags<U, S>(&mut self, dst: U, src: U, extend: bool) -> U
    where
        U: ExtendedOps<S>,
        S: Integer,
    {
        let carry_in = extend && self.regs.sr.x;
        let (res, v) = dst.signed_extended_add(src, carry_in);
        let (ures, c) = dst.extended_add(src, carry_in);

        self.regs.sr.x = c;
        self.regs.sr.n = res < S::ZERO;
        if extend {
            if res != S::ZERO {
                self.regs.sr.z = false;
            }
        } else {
            self.regs.sr.z = res == S::ZERO;
        }
        self.regs.sr.v = v;
        self.regs.sr.c = c;

        ures
    }

    /// Performs `dst - src` and computes the flags.
    ///
    /// `extend` works as in [add_with_flags](Self::add_with_flags); with
    /// `cmp` the X bit is left untouched (CMP-family behaviour).
    fn sub_with_flags<U, S>(&mut self, dst: U, src: U, extend: bool, cmp: bool) -> U
    where
        U: ExtendedOps<S>,
        S: Integer,
    {
        let borrow_in = extend && self.regs.sr.x;
        let (res, v) = dst.signed_extended_sub(src, borrow_in);
        let (ures, c) = dst.extended_sub(src, borrow_in);

        if !cmp {
            self.regs.sr.x = c;
        }
        self.regs.sr.n = res < S::ZERO;
        if extend {
            if res != S::ZERO {
                self.regs.sr.z = false;
            }
        } else {
            self.regs.sr.z = res == S::ZERO;
        }
        self.regs.sr.v = v;
        self.regs.sr.c = c;

        ures
    }

    /// N and Z from the result, V and C cleared (MOVE and the logical family).
    fn logic_flags<U: Integer>(&mut self, res: U) {
        self.regs.sr.n = res & U::SIGN_BIT_MASK != U::ZERO;
        self.regs.sr.z = res == U::ZERO;
        self.regs.sr.v = false;
        self.regs.sr.c = false;
    }

    pub(super) fn execute_add(&mut self) -> ExecuteResult {
        let reg = bits(self.opcode, 9, 11) as usize;
        let dir = if bit(self.opcode, 8) { Direction::DstEa } else { Direction::DstReg };
        let size = Size::from_bits(self.opcode, bits(self.opcode, 6, 7))?;
        let am = self.fetch_ea(Some(size))?;
        let mut ea = EffectiveAddress::new(am, Some(size));

        match size {
            Size::Byte => {
                let (src, dst) = if dir == Direction::DstEa {
                    (self.regs.d[reg] as u8, self.get_byte(&mut ea)?)
                } else {
                    (self.get_byte(&mut ea)?, self.regs.d[reg] as u8)
                };

                let res = self.add_with_flags::<u8, i8>(dst, src, false);

                if dir == Direction::DstEa {
                    self.set_byte(&mut ea, res)?;
                } else {
                    self.regs.d_byte(reg as u8, res);
                }
            },
            Size::Word => {
                let (src, dst) = if dir == Direction::DstEa {
                    (self.regs.d[reg] as u16, self.get_word(&mut ea)?)
                } else {
                    (self.get_word(&mut ea)?, self.regs.d[reg] as u16)
                };

                let res = self.add_with_flags::<u16, i16>(dst, src, false);

                if dir == Direction::DstEa {
                    self.set_word(&mut ea, res)?;
                } else {
                    self.regs.d_word(reg as u8, res);
                }
            },
            Size::Long => {
                let (src, dst) = if dir == Direction::DstEa {
                    (self.regs.d[reg], self.get_long(&mut ea)?)
                } else {
                    (self.get_long(&mut ea)?, self.regs.d[reg])
                };

                let res = self.add_with_flags::<u32, i32>(dst, src, false);

                if dir == Direction::DstEa {
                    self.set_long(&mut ea, res)?;
                } else {
                    self.regs.d[reg] = res;
                }
            },
        }

        Ok(())
    }

    pub(super) fn execute_adda(&mut self) -> ExecuteResult {
        let reg = bits(self.opcode, 9, 11) as u8;
        let size = Size::from_single_bit(bits(self.opcode, 8, 8));
        let am = self.fetch_ea(Some(size))?;
        let mut ea = EffectiveAddress::new(am, Some(size));

        let src = if size.is_word() {
            self.get_word(&mut ea)? as i16 as u32
        } else {
            self.get_long(&mut ea)?
        };

        *self.regs.a_mut(reg) = self.regs.a(reg).wrapping_add(src);

        Ok(())
    }

    pub(super) fn execute_addi(&mut self) -> ExecuteResult {
        let size = Size::from_bits(self.opcode, bits(self.opcode, 6, 7))?;
        let imm = self.next_immediate(size)?;
        let am = self.fetch_ea(Some(size))?;
        let mut ea = EffectiveAddress::new(am, Some(size));

        match size {
            Size::Byte => {
                let data = self.get_byte(&mut ea)?;
                let res = self.add_with_flags::<u8, i8>(data, imm as u8, false);
                self.set_byte(&mut ea, res)?;
            },
            Size::Word => {
                let data = self.get_word(&mut ea)?;
                let res = self.add_with_flags::<u16, i16>(data, imm as u16, false);
                self.set_word(&mut ea, res)?;
            },
            Size::Long => {
                let data = self.get_long(&mut ea)?;
                let res = self.add_with_flags::<u32, i32>(data, imm, false);
                self.set_long(&mut ea, res)?;
            },
        }

        Ok(())
    }

    pub(super) fn execute_addq(&mut self) -> ExecuteResult {
        let imm = match bits(self.opcode, 9, 11) as u8 {
            0 => 8,
            d => d,
        };
        let size = Size::from_bits(self.opcode, bits(self.opcode, 6, 7))?;
        let am = self.fetch_ea(Some(size))?;

        // Towards an address register the whole register is affected and the
        // condition codes are untouched, whatever the size field says.
        if let AddressingMode::Ard(reg) = am {
            *self.regs.a_mut(reg) = self.regs.a(reg).wrapping_add(imm as u32);
            return Ok(());
        }

        let mut ea = EffectiveAddress::new(am, Some(size));

        match size {
            Size::Byte => {
                let data = self.get_byte(&mut ea)?;
                let res = self.add_with_flags::<u8, i8>(data, imm, false);
                self.set_byte(&mut ea, res)?;
            },
            Size::Word => {
                let data = self.get_word(&mut ea)?;
                let res = self.add_with_flags::<u16, i16>(data, imm as u16, false);
                self.set_word(&mut ea, res)?;
            },
            Size::Long => {
                let data = self.get_long(&mut ea)?;
                let res = self.add_with_flags::<u32, i32>(data, imm as u32, false);
                self.set_long(&mut ea, res)?;
            },
        }

        Ok(())
    }

    pub(super) fn execute_addx(&mut self) -> ExecuteResult {
        let rx = bits(self.opcode, 9, 11) as u8;
        let size = Size::from_bits(self.opcode, bits(self.opcode, 6, 7))?;
        let mode = if bit(self.opcode, 3) { Direction::MemoryToMemory } else { Direction::RegisterToRegister };
        let ry = bits(self.opcode, 0, 2) as u8;

        match size {
            Size::Byte => {
                let (src, dst) = if mode == Direction::MemoryToMemory {
                    let src_addr = self.predecrement(ry, size);
                    let dst_addr = self.predecrement(rx, size);
                    (self.ram.get_byte(src_addr)?, self.ram.get_byte(dst_addr)?)
                } else {
                    (self.regs.d[ry as usize] as u8, self.regs.d[rx as usize] as u8)
                };

                let res = self.add_with_flags::<u8, i8>(dst, src, true);

                if mode == Direction::MemoryToMemory {
                    self.ram.set_byte(self.regs.a(rx), res)?;
                } else {
                    self.regs.d_byte(rx, res);
                }
            },
            Size::Word => {
                let (src, dst) = if mode == Direction::MemoryToMemory {
                    let src_addr = self.predecrement(ry, size);
                    let dst_addr = self.predecrement(rx, size);
                    (self.ram.get_word(src_addr)?, self.ram.get_word(dst_addr)?)
                } else {
                    (self.regs.d[ry as usize] as u16, self.regs.d[rx as usize] as u16)
                };

                let res = self.add_with_flags::<u16, i16>(dst, src, true);

                if mode == Direction::MemoryToMemory {
                    self.ram.set_word(self.regs.a(rx), res)?;
                } else {
                    self.regs.d_word(rx, res);
                }
            },
            Size::Long => {
                let (src, dst) = if mode == Direction::MemoryToMemory {
                    let src_addr = self.predecrement(ry, size);
                    let dst_addr = self.predecrement(rx, size);
                    (self.ram.get_long(src_addr)?, self.ram.get_long(dst_addr)?)
                } else {
                    (self.regs.d[ry as usize], self.regs.d[rx as usize])
                };

                let res = self.add_with_flags::<u32, i32>(dst, src, true);

                if mode == Direction::MemoryToMemory {
                    self.ram.set_long(self.regs.a(rx), res)?;
                } else {
                    self.regs.d[rx as usize] = res;
                }
            },
        }

        Ok(())
    }

    pub(super) fn execute_and(&mut self) -> ExecuteResult {
        let reg = bits(self.opcode, 9, 11) as usize;
        let dir = if bit(self.opcode, 8) { Direction::DstEa } else { Direction::DstReg };
        let size = Size::from_bits(self.opcode, bits(self.opcode, 6, 7))?;
        let am = self.fetch_ea(Some(size))?;
        let mut ea = EffectiveAddress::new(am, Some(size));

        match size {
            Size::Byte => {
                let src = self.regs.d[reg] as u8;
                let dst = self.get_byte(&mut ea)?;
                let res = src & dst;
                self.logic_flags(res);

                if dir == Direction::DstEa {
                    self.set_byte(&mut ea, res)?;
                } else {
                    self.regs.d_byte(reg as u8, res);
                }
            },
            Size::Word => {
                let src = self.regs.d[reg] as u16;
                let dst = self.get_word(&mut ea)?;
                let res = src & dst;
                self.logic_flags(res);

                if dir == Direction::DstEa {
                    self.set_word(&mut ea, res)?;
                } else {
                    self.regs.d_word(reg as u8, res);
                }
            },
            Size::Long => {
                let src = self.regs.d[reg];
                let dst = self.get_long(&mut ea)?;
                let res = src & dst;
                self.logic_flags(res);

                if dir == Direction::DstEa {
                    self.set_long(&mut ea, res)?;
                } else {
                    self.regs.d[reg] = res;
                }
            },
        }

        Ok(())
    }

    pub(super) fn execute_andi(&mut self) -> ExecuteResult {
        let size = Size::from_bits(self.opcode, bits(self.opcode, 6, 7))?;
        let imm = self.next_immediate(size)?;
        let am = self.fetch_ea(Some(size))?;
        let mut ea = EffectiveAddress::new(am, Some(size));

        match size {
            Size::Byte => {
                let res = self.get_byte(&mut ea)? & imm as u8;
                self.logic_flags(res);
                self.set_byte(&mut ea, res)?;
            },
            Size::Word => {
                let res = self.get_word(&mut ea)? & imm as u16;
                self.logic_flags(res);
                self.set_word(&mut ea, res)?;
            },
            Size::Long => {
                let res = self.get_long(&mut ea)? & imm;
                self.logic_flags(res);
                self.set_long(&mut ea, res)?;
            },
        }

        Ok(())
    }

    pub(super) fn execute_andiccr(&mut self) -> ExecuteResult {
        let imm = self.next_word()?;
        self.regs.sr &= !CCR_MASK | imm;

        Ok(())
    }

    pub(super) fn execute_andisr(&mut self) -> ExecuteResult {
        self.check_supervisor()?;

        let imm = self.next_word()?;
        self.regs.sr &= imm;
        Ok(())
    }

    pub(super) fn execute_asm(&mut self) -> ExecuteResult {
        let dir = if bit(self.opcode, 8) { Direction::Left } else { Direction::Right };
        let am = self.fetch_ea(Some(Size::Word))?;
        let mut ea = EffectiveAddress::new(am, Some(Size::Word));

        let mut data = self.get_word(&mut ea)?;

        if dir == Direction::Left {
            let sign = data & SIGN_BIT_16;
            data <<= 1;
            self.regs.sr.x = sign != 0;
            self.regs.sr.c = sign != 0;
            self.regs.sr.v = sign != data & SIGN_BIT_16;
        } else {
            let sign = data & SIGN_BIT_16;
            let low = data & 1;
            data >>= 1;
            data |= sign;
            self.regs.sr.x = low != 0;
            self.regs.sr.c = low != 0;
            self.regs.sr.v = false;
        }

        self.regs.sr.n = data & SIGN_BIT_16 != 0;
        self.regs.sr.z = data == 0;

        self.set_word(&mut ea, data)?;

        Ok(())
    }

    pub(super) fn execute_asr(&mut self) -> ExecuteResult {
        self.regs.sr.v = false;
        self.regs.sr.c = false;

        let (count, size, reg) = self.shift_operands();

        let (mut data, mask) = match size {
            Size::Byte => (self.regs.d[reg] & 0x0000_00FF, SIGN_BIT_8 as u32),
            Size::Word => (self.regs.d[reg] & 0x0000_FFFF, SIGN_BIT_16 as u32),
            Size::Long => (self.regs.d[reg], SIGN_BIT_32),
        };

        if self.shift_direction() == Direction::Left {
            for _ in 0..count {
                let sign = data & mask;
                data <<= 1;
                self.regs.sr.x = sign != 0;
                self.regs.sr.c = sign != 0;
                if sign ^ data & mask != 0 {
                    self.regs.sr.v = true;
                }
            }
        } else {
            let sign = data & mask;
            for _ in 0..count {
                let low = data & 1;
                data >>= 1;
                data |= sign;
                self.regs.sr.x = low != 0;
                self.regs.sr.c = low != 0;
            }
        }

        self.store_shift_result(size, reg, data, mask);

        Ok(())
    }

    pub(super) fn execute_bcc(&mut self) -> ExecuteResult {
        let condition = bits(self.opcode, 8, 11) as u8;
        let pc = self.regs.pc;
        let disp = self.branch_displacement()?;

        if self.regs.sr.condition(condition) {
            self.regs.pc = pc.wrapping_add(disp as u32);
        }

        Ok(())
    }

    pub(super) fn execute_bchg(&mut self) -> ExecuteResult {
        let index = self.bit_index()?;
        let am = self.fetch_ea(Some(Size::Byte))?;

        if let AddressingMode::Drd(reg) = am {
            let index = index % 32;
            self.regs.sr.z = self.regs.d[reg as usize] & 1 << index == 0;
            self.regs.d[reg as usize] ^= 1 << index;
        } else {
            let mut ea = EffectiveAddress::new(am, Some(Size::Byte));
            let index = index % 8;
            let data = self.get_byte(&mut ea)?;
            self.regs.sr.z = data & 1 << index == 0;
            self.set_byte(&mut ea, data ^ 1 << index)?;
        }

        Ok(())
    }

    pub(super) fn execute_bclr(&mut self) -> ExecuteResult {
        let index = self.bit_index()?;
        let am = self.fetch_ea(Some(Size::Byte))?;

        if let AddressingMode::Drd(reg) = am {
            let index = index % 32;
            self.regs.sr.z = self.regs.d[reg as usize] & 1 << index == 0;
            self.regs.d[reg as usize] &= !(1 << index);
        } else {
            let mut ea = EffectiveAddress::new(am, Some(Size::Byte));
            let index = index % 8;
            let data = self.get_byte(&mut ea)?;
            self.regs.sr.z = data & 1 << index == 0;
            self.set_byte(&mut ea, data & !(1 << index))?;
        }

        Ok(())
    }

    pub(super) fn execute_bra(&mut self) -> ExecuteResult {
        let pc = self.regs.pc;
        let disp = self.branch_displacement()?;
        self.regs.pc = pc.wrapping_add(disp as u32);

        Ok(())
    }

    pub(super) fn execute_bset(&mut self) -> ExecuteResult {
        let index = self.bit_index()?;
        let am = self.fetch_ea(Some(Size::Byte))?;

        if let AddressingMode::Drd(reg) = am {
            let index = index % 32;
            self.regs.sr.z = self.regs.d[reg as usize] & 1 << index == 0;
            self.regs.d[reg as usize] |= 1 << index;
        } else {
            let mut ea = EffectiveAddress::new(am, Some(Size::Byte));
            let index = index % 8;
            let data = self.get_byte(&mut ea)?;
            self.regs.sr.z = data & 1 << index == 0;
            self.set_byte(&mut ea, data | 1 << index)?;
        }

        Ok(())
    }

    pub(super) fn execute_bsr(&mut self) -> ExecuteResult {
        let pc = self.regs.pc;
        let disp = self.branch_displacement()?;
        self.push_long(self.regs.pc)?;
        self.regs.pc = pc.wrapping_add(disp as u32);

        Ok(())
    }

    pub(super) fn execute_btst(&mut self) -> ExecuteResult {
        let index = self.bit_index()?;
        let am = self.fetch_ea(Some(Size::Byte))?;

        if let AddressingMode::Drd(reg) = am {
            let index = index % 32;
            self.regs.sr.z = self.regs.d[reg as usize] & 1 << index == 0;
        } else {
            let mut ea = EffectiveAddress::new(am, Some(Size::Byte));
            let index = index % 8;
            let data = self.get_byte(&mut ea)?;
            self.regs.sr.z = data & 1 << index == 0;
        }

        Ok(())
    }

    pub(super) fn execute_chk(&mut self) -> ExecuteResult {
        let reg = bits(self.opcode, 9, 11) as usize;
        let am = self.fetch_ea(Some(Size::Word))?;
        let mut ea = EffectiveAddress::new(am, Some(Size::Word));

        let bound = self.get_word(&mut ea)? as i16;
        let data = self.regs.d[reg] as i16;

        if data < 0 || data > bound {
            Err(Fault::Vector(Vector::ChkInstruction as u8))
        } else {
            Ok(())
        }
    }

    pub(super) fn execute_clr(&mut self) -> ExecuteResult {
        let size = Size::from_bits(self.opcode, bits(self.opcode, 6, 7))?;
        let am = self.fetch_ea(Some(size))?;
        let mut ea = EffectiveAddress::new(am, Some(size));

        self.regs.sr.n = false;
        self.regs.sr.z = true;
        self.regs.sr.v = false;
        self.regs.sr.c = false;

        match size {
            Size::Byte => self.set_byte(&mut ea, 0)?,
            Size::Word => self.set_word(&mut ea, 0)?,
            Size::Long => self.set_long(&mut ea, 0)?,
        }

        Ok(())
    }

    pub(super) fn execute_cmp(&mut self) -> ExecuteResult {
        let reg = bits(self.opcode, 9, 11) as usize;
        let size = Size::from_bits(self.opcode, bits(self.opcode, 6, 7))?;
        let am = self.fetch_ea(Some(size))?;
        let mut ea = EffectiveAddress::new(am, Some(size));

        match size {
            Size::Byte => {
                let src = self.get_byte(&mut ea)?;
                let dst = self.regs.d[reg] as u8;
                self.sub_with_flags::<u8, i8>(dst, src, false, true);
            },
            Size::Word => {
                let src = self.get_word(&mut ea)?;
                let dst = self.regs.d[reg] as u16;
                self.sub_with_flags::<u16, i16>(dst, src, false, true);
            },
            Size::Long => {
                let src = self.get_long(&mut ea)?;
                let dst = self.regs.d[reg];
                self.sub_with_flags::<u32, i32>(dst, src, false, true);
            },
        }

        Ok(())
    }

    pub(super) fn execute_cmpa(&mut self) -> ExecuteResult {
        let reg = bits(self.opcode, 9, 11) as u8;
        let size = Size::from_single_bit(bits(self.opcode, 8, 8));
        let am = self.fetch_ea(Some(size))?;
        let mut ea = EffectiveAddress::new(am, Some(size));

        let src = if size.is_word() {
            self.get_word(&mut ea)? as i16 as u32
        } else {
            self.get_long(&mut ea)?
        };

        self.sub_with_flags::<u32, i32>(self.regs.a(reg), src, false, true);

        Ok(())
    }

    pub(super) fn execute_cmpi(&mut self) -> ExecuteResult {
        let size = Size::from_bits(self.opcode, bits(self.opcode, 6, 7))?;
        let imm = self.next_immediate(size)?;
        let am = self.fetch_ea(Some(size))?;
        let mut ea = EffectiveAddress::new(am, Some(size));

        match size {
            Size::Byte => {
                let data = self.get_byte(&mut ea)?;
                self.sub_with_flags::<u8, i8>(data, imm as u8, false, true);
            },
            Size::Word => {
                let data = self.get_word(&mut ea)?;
                self.sub_with_flags::<u16, i16>(data, imm as u16, false, true);
            },
            Size::Long => {
                let data = self.get_long(&mut ea)?;
                self.sub_with_flags::<u32, i32>(data, imm, false, true);
            },
        }

        Ok(())
    }

    pub(super) fn execute_cmpm(&mut self) -> ExecuteResult {
        let ax = bits(self.opcode, 9, 11) as u8;
        let size = Size::from_bits(self.opcode, bits(self.opcode, 6, 7))?;
        let ay = bits(self.opcode, 0, 2) as u8;

        let addry = self.postincrement(ay, size);
        let addrx = self.postincrement(ax, size);

        match size {
            Size::Byte => {
                let src = self.ram.get_byte(addry)?;
                let dst = self.ram.get_byte(addrx)?;
                self.sub_with_flags::<u8, i8>(dst, src, false, true);
            },
            Size::Word => {
                let src = self.ram.get_word(addry)?;
                let dst = self.ram.get_word(addrx)?;
                self.sub_with_flags::<u16, i16>(dst, src, false, true);
            },
            Size::Long => {
                let src = self.ram.get_long(addry)?;
                let dst = self.ram.get_long(addrx)?;
                self.sub_with_flags::<u32, i32>(dst, src, false, true);
            },
        }

        Ok(())
    }

    pub(super) fn execute_dbcc(&mut self) -> ExecuteResult {
        let condition = bits(self.opcode, 8, 11) as u8;
        let reg = bits(self.opcode, 0, 2) as usize;
        let pc = self.regs.pc;
        let disp = self.next_word()? as i16;

        if !self.regs.sr.condition(condition) {
            let counter = (self.regs.d[reg] as i16).wrapping_sub(1);
            self.regs.d_word(reg as u8, counter as u16);

            if counter != -1 {
                self.regs.pc = pc.wrapping_add(disp as u32);
            }
        }

        Ok(())
    }

    pub(super) fn execute_divs(&mut self) -> ExecuteResult {
        let reg = bits(self.opcode, 9, 11) as usize;
        let am = self.fetch_ea(Some(Size::Word))?;
        let mut ea = EffectiveAddress::new(am, Some(Size::Word));

        let src = self.get_word(&mut ea)? as i16 as i32;
        let dst = self.regs.d[reg] as i32;

        if src == 0 {
            return Err(Fault::Vector(Vector::ZeroDivide as u8));
        }

        // checked_div also rejects i32::MIN / -1, whose quotient is not
        // representable in 16 bits either.
        match dst.checked_div(src) {
            Some(quot) if (i16::MIN as i32..=i16::MAX as i32).contains(&quot) => {
                let rem = dst % src;
                self.regs.d[reg] = (rem as u16 as u32) << 16 | quot as u16 as u32;

                self.regs.sr.n = quot < 0;
                self.regs.sr.z = quot == 0;
                self.regs.sr.v = false;
                self.regs.sr.c = false;
            },
            _ => {
                self.regs.sr.v = true;
                self.regs.sr.c = false;
            },
        }

        Ok(())
    }

    pub(super) fn execute_divu(&mut self) -> ExecuteResult {
        let reg = bits(self.opcode, 9, 11) as usize;
        let am = self.fetch_ea(Some(Size::Word))?;
        let mut ea = EffectiveAddress::new(am, Some(Size::Word));

        let src = self.get_word(&mut ea)? as u32;
        let dst = self.regs.d[reg];

        if src == 0 {
            return Err(Fault::Vector(Vector::ZeroDivide as u8));
        }

        let quot = dst / src;
        if quot > u16::MAX as u32 {
            self.regs.sr.v = true;
            self.regs.sr.c = false;
        } else {
            let rem = dst % src;
            self.regs.d[reg] = (rem as u16 as u32) << 16 | quot as u16 as u32;

            self.regs.sr.n = quot & SIGN_BIT_16 as u32 != 0;
            self.regs.sr.z = quot == 0;
            self.regs.sr.v = false;
            self.regs.sr.c = false;
        }

        Ok(())
    }

    pub(super) fn execute_eor(&mut self) -> ExecuteResult {
        let reg = bits(self.opcode, 9, 11) as usize;
        let size = Size::from_bits(self.opcode, bits(self.opcode, 6, 7))?;
        let am = self.fetch_ea(Some(size))?;
        let mut ea = EffectiveAddress::new(am, Some(size));

        match size {
            Size::Byte => {
                let res = self.get_byte(&mut ea)? ^ self.regs.d[reg] as u8;
                self.logic_flags(res);
                self.set_byte(&mut ea, res)?;
            },
            Size::Word => {
                let res = self.get_word(&mut ea)? ^ self.regs.d[reg] as u16;
                self.logic_flags(res);
                self.set_word(&mut ea, res)?;
            },
            Size::Long => {
                let res = self.get_long(&mut ea)? ^ self.regs.d[reg];
                self.logic_flags(res);
                self.set_long(&mut ea, res)?;
            },
        }

        Ok(())
    }

    pub(super) fn execute_eori(&mut self) -> ExecuteResult {
        let size = Size::from_bits(self.opcode, bits(self.opcode, 6, 7))?;
        let imm = self.next_immediate(size)?;
        let am = self.fetch_ea(Some(size))?;
        let mut ea = EffectiveAddress::new(am, Some(size));

        match size {
            Size::Byte => {
                let res = self.get_byte(&mut ea)? ^ imm as u8;
                self.logic_flags(res);
                self.set_byte(&mut ea, res)?;
            },
            Size::Word => {
                let res = self.get_word(&mut ea)? ^ imm as u16;
                self.logic_flags(res);
                self.set_word(&mut ea, res)?;
            },
            Size::Long => {
                let res = self.get_long(&mut ea)? ^ imm;
                self.logic_flags(res);
                self.set_long(&mut ea, res)?;
            },
        }

        Ok(())
    }

    pub(super) fn execute_eoriccr(&mut self) -> ExecuteResult {
        let imm = self.next_word()?;
        self.regs.sr ^= imm & CCR_MASK;

        Ok(())
    }

    pub(super) fn execute_eorisr(&mut self) -> ExecuteResult {
        self.check_supervisor()?;

        let imm = self.next_word()?;
        self.regs.sr ^= imm;
        Ok(())
    }

    pub(super) fn execute_exg(&mut self) -> ExecuteResult {
        let rx = bits(self.opcode, 9, 11) as u8;
        let ry = bits(self.opcode, 0, 2) as u8;

        match bits(self.opcode, 3, 7) {
            0b01000 => self.regs.d.swap(rx as usize, ry as usize),
            0b01001 => {
                let x = self.regs.a(rx);
                let y = self.regs.a(ry);
                *self.regs.a_mut(rx) = y;
                *self.regs.a_mut(ry) = x;
            },
            0b10001 => {
                let x = self.regs.d[rx as usize];
                let y = self.regs.a(ry);
                self.regs.d[rx as usize] = y;
                *self.regs.a_mut(ry) = x;
            },
            _ => return Err(Error::UnsupportedOpcodeVariant { opcode: self.opcode }.into()),
        }

        Ok(())
    }

    pub(super) fn execute_ext(&mut self) -> ExecuteResult {
        let reg = bits(self.opcode, 0, 2) as usize;

        if bit(self.opcode, 6) {
            let data = self.regs.d[reg] as i16 as u32;
            self.regs.d[reg] = data;
            self.regs.sr.n = data & SIGN_BIT_32 != 0;
            self.regs.sr.z = data == 0;
        } else {
            let data = self.regs.d[reg] as i8 as u16;
            self.regs.d_word(reg as u8, data);
            self.regs.sr.n = data & SIGN_BIT_16 != 0;
            self.regs.sr.z = data == 0;
        }

        self.regs.sr.v = false;
        self.regs.sr.c = false;

        Ok(())
    }

    pub(super) fn execute_jmp(&mut self) -> ExecuteResult {
        let am = self.fetch_ea(None)?;
        let mut ea = EffectiveAddress::new(am, None);

        self.regs.pc = self.effective_address(&mut ea)?;

        Ok(())
    }

    pub(super) fn execute_jsr(&mut self) -> ExecuteResult {
        let am = self.fetch_ea(None)?;
        let mut ea = EffectiveAddress::new(am, None);

        let addr = self.effective_address(&mut ea)?;
        self.push_long(self.regs.pc)?;
        self.regs.pc = addr;

        Ok(())
    }

    pub(super) fn execute_lea(&mut self) -> ExecuteResult {
        let reg = bits(self.opcode, 9, 11) as u8;
        let am = self.fetch_ea(None)?;
        let mut ea = EffectiveAddress::new(am, None);

        *self.regs.a_mut(reg) = self.effective_address(&mut ea)?;

        Ok(())
    }

    pub(super) fn execute_link(&mut self) -> ExecuteResult {
        let reg = bits(self.opcode, 0, 2) as u8;
        let disp = self.next_word()? as i16;

        self.push_long(self.regs.a(reg))?;
        *self.regs.a_mut(reg) = self.regs.sp();
        *self.regs.sp_mut() = self.regs.sp().wrapping_add(disp as u32);

        Ok(())
    }

    pub(super) fn execute_lsm(&mut self) -> ExecuteResult {
        let dir = if bit(self.opcode, 8) { Direction::Left } else { Direction::Right };
        let am = self.fetch_ea(Some(Size::Word))?;
        let mut ea = EffectiveAddress::new(am, Some(Size::Word));

        let mut data = self.get_word(&mut ea)?;

        if dir == Direction::Left {
            let sign = data & SIGN_BIT_16;
            data <<= 1;
            self.regs.sr.x = sign != 0;
            self.regs.sr.c = sign != 0;
        } else {
            let low = data & 1;
            data >>= 1;
            self.regs.sr.x = low != 0;
            self.regs.sr.c = low != 0;
        }

        self.regs.sr.n = data & SIGN_BIT_16 != 0;
        self.regs.sr.z = data == 0;
        self.regs.sr.v = false;

        self.set_word(&mut ea, data)?;

        Ok(())
    }

    pub(super) fn execute_lsr(&mut self) -> ExecuteResult {
        self.regs.sr.v = false;
        self.regs.sr.c = false;

        let (count, size, reg) = self.shift_operands();

        let (mut data, mask) = match size {
            Size::Byte => (self.regs.d[reg] & 0x0000_00FF, SIGN_BIT_8 as u32),
            Size::Word => (self.regs.d[reg] & 0x0000_FFFF, SIGN_BIT_16 as u32),
            Size::Long => (self.regs.d[reg], SIGN_BIT_32),
        };

        if self.shift_direction() == Direction::Left {
            for _ in 0..count {
                let sign = data & mask;
                data <<= 1;
                self.regs.sr.x = sign != 0;
                self.regs.sr.c = sign != 0;
            }
        } else {
            for _ in 0..count {
                let low = data & 1;
                data >>= 1;
                self.regs.sr.x = low != 0;
                self.regs.sr.c = low != 0;
            }
        }

        self.store_shift_result(size, reg, data, mask);

        Ok(())
    }

    pub(super) fn execute_move(&mut self) -> ExecuteResult {
        let size = Size::from_move_bits(self.opcode, bits(self.opcode, 12, 13))?;

        // The source extension words precede the destination's, and the
        // destination field has its mode and register swapped.
        let src_am = self.fetch_ea(Some(size))?;
        let dst_mode = bits(self.opcode, 6, 8);
        let dst_reg = bits(self.opcode, 9, 11) as u8;
        let dst_am = self.fetch_mode(dst_mode, dst_reg, Some(size))?;

        let mut src = EffectiveAddress::new(src_am, Some(size));
        let mut dst = EffectiveAddress::new(dst_am, Some(size));

        match size {
            Size::Byte => {
                let data = self.get_byte(&mut src)?;
                self.logic_flags(data);
                self.set_byte(&mut dst, data)?;
            },
            Size::Word => {
                let data = self.get_word(&mut src)?;
                self.logic_flags(data);
                self.set_word(&mut dst, data)?;
            },
            Size::Long => {
                let data = self.get_long(&mut src)?;
                self.logic_flags(data);
                self.set_long(&mut dst, data)?;
            },
        }

        Ok(())
    }

    pub(super) fn execute_movea(&mut self) -> ExecuteResult {
        let size = Size::from_move_bits(self.opcode, bits(self.opcode, 12, 13))?;
        let reg = bits(self.opcode, 9, 11) as u8;
        let am = self.fetch_ea(Some(size))?;
        let mut ea = EffectiveAddress::new(am, Some(size));

        *self.regs.a_mut(reg) = if size.is_word() {
            self.get_word(&mut ea)? as i16 as u32
        } else {
            self.get_long(&mut ea)?
        };

        Ok(())
    }

    pub(super) fn execute_moveccr(&mut self) -> ExecuteResult {
        let am = self.fetch_ea(Some(Size::Word))?;
        let mut ea = EffectiveAddress::new(am, Some(Size::Word));

        let ccr = self.get_word(&mut ea)?;
        self.regs.sr.set_ccr(ccr);

        Ok(())
    }

    pub(super) fn execute_movefsr(&mut self) -> ExecuteResult {
        let am = self.fetch_ea(Some(Size::Word))?;
        let mut ea = EffectiveAddress::new(am, Some(Size::Word));

        let sr = self.regs.sr.into();
        self.set_word(&mut ea, sr)?;

        Ok(())
    }

    pub(super) fn execute_movesr(&mut self) -> ExecuteResult {
        self.check_supervisor()?;

        let am = self.fetch_ea(Some(Size::Word))?;
        let mut ea = EffectiveAddress::new(am, Some(Size::Word));

        let sr = self.get_word(&mut ea)?;
        self.regs.sr = sr.into();
        Ok(())
    }

    pub(super) fn execute_moveusp(&mut self) -> ExecuteResult {
        self.check_supervisor()?;

        let reg = bits(self.opcode, 0, 2) as u8;
        let dir = if bit(self.opcode, 3) { Direction::UspToRegister } else { Direction::RegisterToUsp };

        if dir == Direction::UspToRegister {
            *self.regs.a_mut(reg) = self.regs.usp;
        } else {
            self.regs.usp = self.regs.a(reg);
        }
        Ok(())
    }

    pub(super) fn execute_movem(&mut self) -> ExecuteResult {
        let dir = if bit(self.opcode, 10) { Direction::MemoryToRegister } else { Direction::RegisterToMemory };
        let size = Size::from_single_bit(bits(self.opcode, 6, 6));
        let mut list = self.next_word()?;
        let am = self.fetch_ea(Some(size))?;
        let mut ea = EffectiveAddress::new(am, Some(size));

        let gap = size as u32;

        if let AddressingMode::Ariwpr(eareg) = am {
            // Predecrement stores walk A7..A0 then D7..D0, decrementing per
            // register; the register itself is updated once at the end.
            let mut addr = self.regs.a(eareg);

            for reg in (0..8).rev() {
                if list & 1 != 0 {
                    addr = addr.wrapping_sub(gap);
                    if size.is_word() {
                        self.ram.set_word(addr, self.regs.a(reg) as u16)?;
                    } else {
                        self.ram.set_long(addr, self.regs.a(reg))?;
                    }
                }

                list >>= 1;
            }

            for reg in (0..8usize).rev() {
                if list & 1 != 0 {
                    addr = addr.wrapping_sub(gap);
                    if size.is_word() {
                        self.ram.set_word(addr, self.regs.d[reg] as u16)?;
                    } else {
                        self.ram.set_long(addr, self.regs.d[reg])?;
                    }
                }

                list >>= 1;
            }

            *self.regs.a_mut(eareg) = addr;
        } else {
            let mut addr = if let AddressingMode::Ariwpo(eareg) = am {
                self.regs.a(eareg)
            } else {
                self.effective_address(&mut ea)?
            };

            for reg in 0..8usize {
                if list & 1 != 0 {
                    if dir == Direction::MemoryToRegister {
                        let value = if size.is_word() {
                            self.ram.get_word(addr)? as i16 as u32
                        } else {
                            self.ram.get_long(addr)?
                        };
                        self.regs.d[reg] = value;
                    } else if size.is_word() {
                        self.ram.set_word(addr, self.regs.d[reg] as u16)?;
                    } else {
                        self.ram.set_long(addr, self.regs.d[reg])?;
                    }

                    addr = addr.wrapping_add(gap);
                }

                list >>= 1;
            }

            for reg in 0..8u8 {
                if list & 1 != 0 {
                    if dir == Direction::MemoryToRegister {
                        let value = if size.is_word() {
                            self.ram.get_word(addr)? as i16 as u32
                        } else {
                            self.ram.get_long(addr)?
                        };
                        *self.regs.a_mut(reg) = value;
                    } else if size.is_word() {
                        self.ram.set_word(addr, self.regs.a(reg) as u16)?;
                    } else {
                        self.ram.set_long(addr, self.regs.a(reg))?;
                    }

                    addr = addr.wrapping_add(gap);
                }

                list >>= 1;
            }

            if let AddressingMode::Ariwpo(eareg) = am {
                *self.regs.a_mut(eareg) = addr;
            }
        }

        Ok(())
    }

    pub(super) fn execute_movep(&mut self) -> ExecuteResult {
        let data = bits(self.opcode, 9, 11) as usize;
        let dir = if bit(self.opcode, 7) { Direction::RegisterToMemory } else { Direction::MemoryToRegister };
        let size = Size::from_single_bit(bits(self.opcode, 6, 6));
        let areg = bits(self.opcode, 0, 2) as u8;
        let disp = self.next_word()? as i16;

        let mut shift: i32 = if size.is_word() { 8 } else { 24 };
        let mut addr = self.regs.a(areg).wrapping_add(disp as u32);

        if dir == Direction::RegisterToMemory {
            while shift >= 0 {
                let byte = (self.regs.d[data] >> shift) as u8;
                self.ram.set_byte(addr, byte)?;
                shift -= 8;
                addr = addr.wrapping_add(2);
            }
        } else {
            if size.is_word() {
                self.regs.d[data] &= 0xFFFF_0000;
            } else {
                self.regs.d[data] = 0;
            }

            while shift >= 0 {
                let byte = self.ram.get_byte(addr)? as u32;
                self.regs.d[data] |= byte << shift;
                shift -= 8;
                addr = addr.wrapping_add(2);
            }
        }

        Ok(())
    }

    pub(super) fn execute_moveq(&mut self) -> ExecuteResult {
        let reg = bits(self.opcode, 9, 11) as usize;
        let data = self.opcode as i8;

        self.regs.d[reg] = data as u32;

        self.regs.sr.n = data < 0;
        self.regs.sr.z = data == 0;
        self.regs.sr.v = false;
        self.regs.sr.c = false;

        Ok(())
    }

    pub(super) fn execute_muls(&mut self) -> ExecuteResult {
        let reg = bits(self.opcode, 9, 11) as usize;
        let am = self.fetch_ea(Some(Size::Word))?;
        let mut ea = EffectiveAddress::new(am, Some(Size::Word));

        let src = self.get_word(&mut ea)? as i16 as i32;
        let dst = self.regs.d[reg] as i16 as i32;

        let res = src.wrapping_mul(dst);
        self.regs.d[reg] = res as u32;

        self.regs.sr.n = res < 0;
        self.regs.sr.z = res == 0;
        self.regs.sr.v = false;
        self.regs.sr.c = false;

        Ok(())
    }

    pub(super) fn execute_mulu(&mut self) -> ExecuteResult {
        let reg = bits(self.opcode, 9, 11) as usize;
        let am = self.fetch_ea(Some(Size::Word))?;
        let mut ea = EffectiveAddress::new(am, Some(Size::Word));

        let src = self.get_word(&mut ea)? as u32;
        let dst = self.regs.d[reg] as u16 as u32;

        let res = src.wrapping_mul(dst);
        self.regs.d[reg] = res;

        self.regs.sr.n = res & SIGN_BIT_32 != 0;
        self.regs.sr.z = res == 0;
        self.regs.sr.v = false;
        self.regs.sr.c = false;

        Ok(())
    }

    pub(super) fn execute_neg(&mut self) -> ExecuteResult {
        let size = Size::from_bits(self.opcode, bits(self.opcode, 6, 7))?;
        let am = self.fetch_ea(Some(size))?;
        let mut ea = EffectiveAddress::new(am, Some(size));

        match size {
            Size::Byte => {
                let data = self.get_byte(&mut ea)?;
                let res = self.sub_with_flags::<u8, i8>(0, data, false, false);
                self.set_byte(&mut ea, res)?;
            },
            Size::Word => {
                let data = self.get_word(&mut ea)?;
                let res = self.sub_with_flags::<u16, i16>(0, data, false, false);
                self.set_word(&mut ea, res)?;
            },
            Size::Long => {
                let data = self.get_long(&mut ea)?;
                let res = self.sub_with_flags::<u32, i32>(0, data, false, false);
                self.set_long(&mut ea, res)?;
            },
        }

        Ok(())
    }

    pub(super) fn execute_negx(&mut self) -> ExecuteResult {
        let size = Size::from_bits(self.opcode, bits(self.opcode, 6, 7))?;
        let am = self.fetch_ea(Some(size))?;
        let mut ea = EffectiveAddress::new(am, Some(size));

        match size {
            Size::Byte => {
                let data = self.get_byte(&mut ea)?;
                let res = self.sub_with_flags::<u8, i8>(0, data, true, false);
                self.set_byte(&mut ea, res)?;
            },
            Size::Word => {
                let data = self.get_word(&mut ea)?;
                let res = self.sub_with_flags::<u16, i16>(0, data, true, false);
                self.set_word(&mut ea, res)?;
            },
            Size::Long => {
                let data = self.get_long(&mut ea)?;
                let res = self.sub_with_flags::<u32, i32>(0, data, true, false);
                self.set_long(&mut ea, res)?;
            },
        }

        Ok(())
    }

    pub(super) fn execute_nop(&mut self) -> ExecuteResult {
        Ok(())
    }

    pub(super) fn execute_not(&mut self) -> ExecuteResult {
        let size = Size::from_bits(self.opcode, bits(self.opcode, 6, 7))?;
        let am = self.fetch_ea(Some(size))?;
        let mut ea = EffectiveAddress::new(am, Some(size));

        match size {
            Size::Byte => {
                let data = !self.get_byte(&mut ea)?;
                self.logic_flags(data);
                self.set_byte(&mut ea, data)?;
            },
            Size::Word => {
                let data = !self.get_word(&mut ea)?;
                self.logic_flags(data);
                self.set_word(&mut ea, data)?;
            },
            Size::Long => {
                let data = !self.get_long(&mut ea)?;
                self.logic_flags(data);
                self.set_long(&mut ea, data)?;
            },
        }

        Ok(())
    }

    pub(super) fn execute_or(&mut self) -> ExecuteResult {
        let reg = bits(self.opcode, 9, 11) as usize;
        let dir = if bit(self.opcode, 8) { Direction::DstEa } else { Direction::DstReg };
        let size = Size::from_bits(self.opcode, bits(self.opcode, 6, 7))?;
        let am = self.fetch_ea(Some(size))?;
        let mut ea = EffectiveAddress::new(am, Some(size));

        match size {
            Size::Byte => {
                let src = self.regs.d[reg] as u8;
                let dst = self.get_byte(&mut ea)?;
                let res = src | dst;
                self.logic_flags(res);

                if dir == Direction::DstEa {
                    self.set_byte(&mut ea, res)?;
                } else {
                    self.regs.d_byte(reg as u8, res);
                }
            },
            Size::Word => {
                let src = self.regs.d[reg] as u16;
                let dst = self.get_word(&mut ea)?;
                let res = src | dst;
                self.logic_flags(res);

                if dir == Direction::DstEa {
                    self.set_word(&mut ea, res)?;
                } else {
                    self.regs.d_word(reg as u8, res);
                }
            },
            Size::Long => {
                let src = self.regs.d[reg];
                let dst = self.get_long(&mut ea)?;
                let res = src | dst;
                self.logic_flags(res);

                if dir == Direction::DstEa {
                    self.set_long(&mut ea, res)?;
                } else {
                    self.regs.d[reg] = res;
                }
            },
        }

        Ok(())
    }

    pub(super) fn execute_ori(&mut self) -> ExecuteResult {
        let size = Size::from_bits(self.opcode, bits(self.opcode, 6, 7))?;
        let imm = self.next_immediate(size)?;
        let am = self.fetch_ea(Some(size))?;
        let mut ea = EffectiveAddress::new(am, Some(size));

        match size {
            Size::Byte => {
                let res = self.get_byte(&mut ea)? | imm as u8;
                self.logic_flags(res);
                self.set_byte(&mut ea, res)?;
            },
            Size::Word => {
                let res = self.get_word(&mut ea)? | imm as u16;
                self.logic_flags(res);
                self.set_word(&mut ea, res)?;
            },
            Size::Long => {
                let res = self.get_long(&mut ea)? | imm;
                self.logic_flags(res);
                self.set_long(&mut ea, res)?;
            },
        }

        Ok(())
    }

    pub(super) fn execute_oriccr(&mut self) -> ExecuteResult {
        let imm = self.next_word()?;
        self.regs.sr |= imm & CCR_MASK;

        Ok(())
    }

    pub(super) fn execute_orisr(&mut self) -> ExecuteResult {
        self.check_supervisor()?;

        let imm = self.next_word()?;
        self.regs.sr |= imm;
        Ok(())
    }

    pub(super) fn execute_pea(&mut self) -> ExecuteResult {
        let am = self.fetch_ea(None)?;
        let mut ea = EffectiveAddress::new(am, None);

        let addr = self.effective_address(&mut ea)?;
        self.push_long(addr)?;

        Ok(())
    }

    pub(super) fn execute_reset(&mut self) -> ExecuteResult {
        self.check_supervisor()?;

        // No peripherals are modelled, so asserting the reset line is a
        // no-op towards the outside world.
        Ok(())
    }

    pub(super) fn execute_rom(&mut self) -> ExecuteResult {
        let dir = if bit(self.opcode, 8) { Direction::Left } else { Direction::Right };
        let am = self.fetch_ea(Some(Size::Word))?;
        let mut ea = EffectiveAddress::new(am, Some(Size::Word));

        let mut data = self.get_word(&mut ea)?;

        if dir == Direction::Left {
            let sign = data & SIGN_BIT_16;
            data <<= 1;
            data |= (sign != 0) as u16;
            self.regs.sr.c = sign != 0;
        } else {
            let low = data & 1;
            data >>= 1;
            if low != 0 {
                data |= SIGN_BIT_16;
            }
            self.regs.sr.c = low != 0;
        }

        self.regs.sr.n = data & SIGN_BIT_16 != 0;
        self.regs.sr.z = data == 0;
        self.regs.sr.v = false;

        self.set_word(&mut ea, data)?;

        Ok(())
    }

    pub(super) fn execute_ror(&mut self) -> ExecuteResult {
        self.regs.sr.v = false;
        self.regs.sr.c = false;

        let (count, size, reg) = self.shift_operands();

        let (mut data, mask) = match size {
            Size::Byte => (self.regs.d[reg] & 0x0000_00FF, SIGN_BIT_8 as u32),
            Size::Word => (self.regs.d[reg] & 0x0000_FFFF, SIGN_BIT_16 as u32),
            Size::Long => (self.regs.d[reg], SIGN_BIT_32),
        };

        if self.shift_direction() == Direction::Left {
            for _ in 0..count {
                let sign = data & mask;
                data <<= 1;
                if sign != 0 {
                    data |= 1;
                }
                self.regs.sr.c = sign != 0;
            }
        } else {
            for _ in 0..count {
                let low = data & 1;
                data >>= 1;
                if low != 0 {
                    data |= mask;
                }
                self.regs.sr.c = low != 0;
            }
        }

        self.store_shift_result(size, reg, data, mask);

        Ok(())
    }

    pub(super) fn execute_roxm(&mut self) -> ExecuteResult {
        let dir = if bit(self.opcode, 8) { Direction::Left } else { Direction::Right };
        let am = self.fetch_ea(Some(Size::Word))?;
        let mut ea = EffectiveAddress::new(am, Some(Size::Word));

        let mut data = self.get_word(&mut ea)?;

        if dir == Direction::Left {
            let sign = data & SIGN_BIT_16;
            data <<= 1;
            data |= self.regs.sr.x as u16;
            self.regs.sr.x = sign != 0;
            self.regs.sr.c = sign != 0;
        } else {
            let low = data & 1;
            data >>= 1;
            if self.regs.sr.x {
                data |= SIGN_BIT_16;
            }
            self.regs.sr.x = low != 0;
            self.regs.sr.c = low != 0;
        }

        self.regs.sr.n = data & SIGN_BIT_16 != 0;
        self.regs.sr.z = data == 0;
        self.regs.sr.v = false;

        self.set_word(&mut ea, data)?;

        Ok(())
    }

    pub(super) fn execute_roxr(&mut self) -> ExecuteResult {
        self.regs.sr.v = false;
        self.regs.sr.c = self.regs.sr.x;

        let (count, size, reg) = self.shift_operands();

        let (mut data, mask) = match size {
            Size::Byte => (self.regs.d[reg] & 0x0000_00FF, SIGN_BIT_8 as u32),
            Size::Word => (self.regs.d[reg] & 0x0000_FFFF, SIGN_BIT_16 as u32),
            Size::Long => (self.regs.d[reg], SIGN_BIT_32),
        };

        if self.shift_direction() == Direction::Left {
            for _ in 0..count {
                let sign = data & mask;
                data <<= 1;
                data |= self.regs.sr.x as u32;
                self.regs.sr.x = sign != 0;
                self.regs.sr.c = sign != 0;
            }
        } else {
            for _ in 0..count {
                let low = data & 1;
                data >>= 1;
                if self.regs.sr.x {
                    data |= mask;
                }
                self.regs.sr.x = low != 0;
                self.regs.sr.c = low != 0;
            }
        }

        self.store_shift_result(size, reg, data, mask);

        Ok(())
    }

    pub(super) fn execute_rte(&mut self) -> ExecuteResult {
        self.check_supervisor()?;

        let sr = self.pop_word()?;
        self.regs.pc = self.pop_long()?;
        self.regs.sr = sr.into();

        Ok(())
    }

    pub(super) fn execute_rtr(&mut self) -> ExecuteResult {
        let ccr = self.pop_word()?;
        self.regs.sr.set_ccr(ccr);
        self.regs.pc = self.pop_long()?;

        Ok(())
    }

    pub(super) fn execute_rts(&mut self) -> ExecuteResult {
        self.regs.pc = self.pop_long()?;

        Ok(())
    }

    pub(super) fn execute_scc(&mut self) -> ExecuteResult {
        let condition = bits(self.opcode, 8, 11) as u8;
        let am = self.fetch_ea(Some(Size::Byte))?;
        let mut ea = EffectiveAddress::new(am, Some(Size::Byte));

        if self.regs.sr.condition(condition) {
            self.set_byte(&mut ea, 0xFF)?;
        } else {
            self.set_byte(&mut ea, 0)?;
        }

        Ok(())
    }

    pub(super) fn execute_stop(&mut self) -> ExecuteResult {
        self.check_supervisor()?;

        let imm = self.next_word()?;
        self.regs.sr = imm.into();
        self.stopped = true;
        Ok(())
    }

    pub(super) fn execute_sub(&mut self) -> ExecuteResult {
        let reg = bits(self.opcode, 9, 11) as usize;
        let dir = if bit(self.opcode, 8) { Direction::DstEa } else { Direction::DstReg };
        let size = Size::from_bits(self.opcode, bits(self.opcode, 6, 7))?;
        let am = self.fetch_ea(Some(size))?;
        let mut ea = EffectiveAddress::new(am, Some(size));

        match size {
            Size::Byte => {
                let (src, dst) = if dir == Direction::DstEa {
                    (self.regs.d[reg] as u8, self.get_byte(&mut ea)?)
                } else {
                    (self.get_byte(&mut ea)?, self.regs.d[reg] as u8)
                };

                let res = self.sub_with_flags::<u8, i8>(dst, src, false, false);

                if dir == Direction::DstEa {
                    self.set_byte(&mut ea, res)?;
                } else {
                    self.regs.d_byte(reg as u8, res);
                }
            },
            Size::Word => {
                let (src, dst) = if dir == Direction::DstEa {
                    (self.regs.d[reg] as u16, self.get_word(&mut ea)?)
                } else {
                    (self.get_word(&mut ea)?, self.regs.d[reg] as u16)
                };

                let res = self.sub_with_flags::<u16, i16>(dst, src, false, false);

                if dir == Direction::DstEa {
                    self.set_word(&mut ea, res)?;
                } else {
                    self.regs.d_word(reg as u8, res);
                }
            },
            Size::Long => {
                let (src, dst) = if dir == Direction::DstEa {
                    (self.regs.d[reg], self.get_long(&mut ea)?)
                } else {
                    (self.get_long(&mut ea)?, self.regs.d[reg])
                };

                let res = self.sub_with_flags::<u32, i32>(dst, src, false, false);

                if dir == Direction::DstEa {
                    self.set_long(&mut ea, res)?;
                } else {
                    self.regs.d[reg] = res;
                }
            },
        }

        Ok(())
    }

    pub(super) fn execute_suba(&mut self) -> ExecuteResult {
        let reg = bits(self.opcode, 9, 11) as u8;
        let size = Size::from_single_bit(bits(self.opcode, 8, 8));
        let am = self.fetch_ea(Some(size))?;
        let mut ea = EffectiveAddress::new(am, Some(size));

        let src = if size.is_word() {
            self.get_word(&mut ea)? as i16 as u32
        } else {
            self.get_long(&mut ea)?
        };

        *self.regs.a_mut(reg) = self.regs.a(reg).wrapping_sub(src);

        Ok(())
    }

    pub(super) fn execute_subi(&mut self) -> ExecuteResult {
        let size = Size::from_bits(self.opcode, bits(self.opcode, 6, 7))?;
        let imm = self.next_immediate(size)?;
        let am = self.fetch_ea(Some(size))?;
        let mut ea = EffectiveAddress::new(am, Some(size));

        match size {
            Size::Byte => {
                let data = self.get_byte(&mut ea)?;
                let res = self.sub_with_flags::<u8, i8>(data, imm as u8, false, false);
                self.set_byte(&mut ea, res)?;
            },
            Size::Word => {
                let data = self.get_word(&mut ea)?;
                let res = self.sub_with_flags::<u16, i16>(data, imm as u16, false, false);
                self.set_word(&mut ea, res)?;
            },
            Size::Long => {
                let data = self.get_long(&mut ea)?;
                let res = self.sub_with_flags::<u32, i32>(data, imm, false, false);
                self.set_long(&mut ea, res)?;
            },
        }

        Ok(())
    }

    pub(super) fn execute_subq(&mut self) -> ExecuteResult {
        let imm = match bits(self.opcode, 9, 11) as u8 {
            0 => 8,
            d => d,
        };
        let size = Size::from_bits(self.opcode, bits(self.opcode, 6, 7))?;
        let am = self.fetch_ea(Some(size))?;

        if let AddressingMode::Ard(reg) = am {
            *self.regs.a_mut(reg) = self.regs.a(reg).wrapping_sub(imm as u32);
            return Ok(());
        }

        let mut ea = EffectiveAddress::new(am, Some(size));

        match size {
            Size::Byte => {
                let data = self.get_byte(&mut ea)?;
                let res = self.sub_with_flags::<u8, i8>(data, imm, false, false);
                self.set_byte(&mut ea, res)?;
            },
            Size::Word => {
                let data = self.get_word(&mut ea)?;
                let res = self.sub_with_flags::<u16, i16>(data, imm as u16, false, false);
                self.set_word(&mut ea, res)?;
            },
            Size::Long => {
                let data = self.get_long(&mut ea)?;
                let res = self.sub_with_flags::<u32, i32>(data, imm as u32, false, false);
                self.set_long(&mut ea, res)?;
            },
        }

        Ok(())
    }

    pub(super) fn execute_subx(&mut self) -> ExecuteResult {
        let rx = bits(self.opcode, 9, 11) as u8;
        let size = Size::from_bits(self.opcode, bits(self.opcode, 6, 7))?;
        let mode = if bit(self.opcode, 3) { Direction::MemoryToMemory } else { Direction::RegisterToRegister };
        let ry = bits(self.opcode, 0, 2) as u8;

        match size {
            Size::Byte => {
                let (src, dst) = if mode == Direction::MemoryToMemory {
                    let src_addr = self.predecrement(ry, size);
                    let dst_addr = self.predecrement(rx, size);
                    (self.ram.get_byte(src_addr)?, self.ram.get_byte(dst_addr)?)
                } else {
                    (self.regs.d[ry as usize] as u8, self.regs.d[rx as usize] as u8)
                };

                let res = self.sub_with_flags::<u8, i8>(dst, src, true, false);

                if mode == Direction::MemoryToMemory {
                    self.ram.set_byte(self.regs.a(rx), res)?;
                } else {
                    self.regs.d_byte(rx, res);
                }
            },
            Size::Word => {
                let (src, dst) = if mode == Direction::MemoryToMemory {
                    let src_addr = self.predecrement(ry, size);
                    let dst_addr = self.predecrement(rx, size);
                    (self.ram.get_word(src_addr)?, self.ram.get_word(dst_addr)?)
                } else {
                    (self.regs.d[ry as usize] as u16, self.regs.d[rx as usize] as u16)
                };

                let res = self.sub_with_flags::<u16, i16>(dst, src, true, false);

                if mode == Direction::MemoryToMemory {
                    self.ram.set_word(self.regs.a(rx), res)?;
                } else {
                    self.regs.d_word(rx, res);
                }
            },
            Size::Long => {
                let (src, dst) = if mode == Direction::MemoryToMemory {
                    let src_addr = self.predecrement(ry, size);
                    let dst_addr = self.predecrement(rx, size);
                    (self.ram.get_long(src_addr)?, self.ram.get_long(dst_addr)?)
                } else {
                    (self.regs.d[ry as usize], self.regs.d[rx as usize])
                };

                let res = self.sub_with_flags::<u32, i32>(dst, src, true, false);

                if mode == Direction::MemoryToMemory {
                    self.ram.set_long(self.regs.a(rx), res)?;
                } else {
                    self.regs.d[rx as usize] = res;
                }
            },
        }

        Ok(())
    }

    pub(super) fn execute_swap(&mut self) -> ExecuteResult {
        let reg = bits(self.opcode, 0, 2) as usize;

        self.regs.d[reg] = self.regs.d[reg].rotate_left(16);

        self.regs.sr.n = self.regs.d[reg] & SIGN_BIT_32 != 0;
        self.regs.sr.z = self.regs.d[reg] == 0;
        self.regs.sr.v = false;
        self.regs.sr.c = false;

        Ok(())
    }

    pub(super) fn execute_tas(&mut self) -> ExecuteResult {
        let am = self.fetch_ea(Some(Size::Byte))?;
        let mut ea = EffectiveAddress::new(am, Some(Size::Byte));

        let data = self.get_byte(&mut ea)?;

        self.regs.sr.n = data & SIGN_BIT_8 != 0;
        self.regs.sr.z = data == 0;
        self.regs.sr.v = false;
        self.regs.sr.c = false;

        self.set_byte(&mut ea, data | SIGN_BIT_8)?;

        Ok(())
    }

    pub(super) fn execute_trap(&mut self) -> ExecuteResult {
        let vector = bits(self.opcode, 0, 3) as u8;
        Err(Fault::Vector(Vector::Trap0Instruction as u8 + vector))
    }

    pub(super) fn execute_trapv(&mut self) -> ExecuteResult {
        if self.regs.sr.v {
            Err(Fault::Vector(Vector::TrapVInstruction as u8))
        } else {
            Ok(())
        }
    }

    pub(super) fn execute_tst(&mut self) -> ExecuteResult {
        let size = Size::from_bits(self.opcode, bits(self.opcode, 6, 7))?;
        let am = self.fetch_ea(Some(size))?;
        let mut ea = EffectiveAddress::new(am, Some(size));

        match size {
            Size::Byte => {
                let data = self.get_byte(&mut ea)?;
                self.logic_flags(data);
            },
            Size::Word => {
                let data = self.get_word(&mut ea)?;
                self.logic_flags(data);
            },
            Size::Long => {
                let data = self.get_long(&mut ea)?;
                self.logic_flags(data);
            },
        }

        Ok(())
    }

    pub(super) fn execute_unlk(&mut self) -> ExecuteResult {
        let reg = bits(self.opcode, 0, 2) as u8;

        *self.regs.sp_mut() = self.regs.a(reg);
        *self.regs.a_mut(reg) = self.pop_long()?;

        Ok(())
    }

    /// Fetches the immediate operand of the ADDI/ANDI/... family.
    ///
    /// Byte and word immediates occupy one extension word, byte values in
    /// its low byte; long immediates occupy two.
    fn next_immediate(&mut self, size: Size) -> Result<u32, Error> {
        if size.is_long() {
            self.next_long()
        } else {
            Ok(self.next_word()? as u32)
        }
    }

    /// Branch displacement: the low byte of the opcode sign-extended, or a
    /// following extension word when that byte is zero.
    ///
    /// The extension word is consumed even by a branch that is not taken.
    fn branch_displacement(&mut self) -> Result<i16, Error> {
        let disp = self.opcode as i8;
        if disp == 0 {
            Ok(self.next_word()? as i16)
        } else {
            Ok(disp as i16)
        }
    }

    /// Bit number of BTST/BSET/BCLR/BCHG, from an extension word (static
    /// form) or a data register (dynamic form).
    fn bit_index(&mut self) -> Result<u8, Error> {
        if bit(self.opcode, 8) {
            let reg = bits(self.opcode, 9, 11) as usize;
            Ok(self.regs.d[reg] as u8)
        } else {
            Ok(self.next_word()? as u8)
        }
    }

    /// Direction bit shared by every shift and rotate encoding.
    fn shift_direction(&self) -> Direction {
        if bit(self.opcode, 8) {
            Direction::Left
        } else {
            Direction::Right
        }
    }

    /// Count, size and register fields of the register shift/rotate forms.
    ///
    /// A count field of 0 means 8; a count taken from a data register is
    /// reduced modulo 64 and may be 0.
    fn shift_operands(&self) -> (u8, Size, usize) {
        let rot = bits(self.opcode, 9, 11) as u8;
        let reg = bits(self.opcode, 0, 2) as usize;

        let count = if bit(self.opcode, 5) {
            (self.regs.d[rot as usize] % 64) as u8
        } else if rot == 0 {
            8
        } else {
            rot
        };

        // The grammar keeps size bits 3 (the memory form) away from here.
        let size = match bits(self.opcode, 6, 7) {
            0 => Size::Byte,
            1 => Size::Word,
            _ => Size::Long,
        };

        (count, size, reg)
    }

    /// Writes back a shift/rotate result and sets N and Z for its width.
    fn store_shift_result(&mut self, size: Size, reg: usize, data: u32, mask: u32) {
        self.regs.sr.n = data & mask != 0;

        match size {
            Size::Byte => {
                self.regs.d_byte(reg as u8, data as u8);
                self.regs.sr.z = data & 0x0000_00FF == 0;
            },
            Size::Word => {
                self.regs.d_word(reg as u8, data as u16);
                self.regs.sr.z = data & 0x0000_FFFF == 0;
            },
            Size::Long => {
                self.regs.d[reg] = data;
                self.regs.sr.z = data == 0;
            },
        }
    }
}
