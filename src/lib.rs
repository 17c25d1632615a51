// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Motorola 68000 interpreter core.
//!
//! This library emulates the base integer ISA of the original MC68000: one
//! call to [M68k::tick] fetches, decodes and executes a single instruction
//! against a flat, big-endian 16 MiB memory owned by the core.
//!
//! Exceptions raised by the emulated program (TRAP, zero divide, privilege
//! violation, ...) are handled internally by vectoring through the exception
//! table at the bottom of memory; the host only ever sees the program
//! counter move. Genuine emulator failures (out-of-range accesses, stack
//! overflow, decode-table conflicts) surface as [Error].
//!
//! External events are the host's business: between two ticks it may inject
//! an interrupt or any other exception with [M68k::exception], which also
//! wakes a core halted by STOP.
//!
//! # Basic usage
//!
//! ```
//! use m68k_emu::M68k;
//!
//! let mut cpu = M68k::new().unwrap();
//!
//! // MOVEQ #42, D0
//! cpu.load_program(0x1000, &[0x70, 0x2A], 0x1000).unwrap();
//! cpu.tick().unwrap();
//!
//! assert_eq!(cpu.d(0), 42);
//! ```

pub mod addressing_modes;
pub mod decoder;
pub mod error;
pub mod exception;
pub mod instruction;
mod interpreter;
pub mod memory;
pub mod status_register;
pub mod utils;

use log::{trace, warn};

pub use error::Error;
pub use exception::Vector;
pub use memory::MEMORY_SIZE;

use decoder::DecodeTable;
use interpreter::{Fault, EXECUTE};
use memory::Ram;
use status_register::StatusRegister;

/// M68000 registers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Registers {
    /// Data registers.
    pub d: [u32; 8],
    /// Address registers. A7 is not here: it aliases one of the two stack
    /// pointers below, chosen by the supervisor bit.
    pub a: [u32; 7],
    /// User Stack Pointer.
    pub usp: u32,
    /// Supervisor Stack Pointer.
    pub ssp: u32,
    /// Status Register.
    pub sr: StatusRegister,
    /// Program Counter.
    pub pc: u32,
}

impl Registers {
    /// Sets the lower 8 bits of the given data register, leaving the upper
    /// 24 untouched.
    pub fn d_byte(&mut self, reg: u8, value: u8) {
        self.d[reg as usize] &= 0xFFFF_FF00;
        self.d[reg as usize] |= value as u32;
    }

    /// Sets the lower 16 bits of the given data register, leaving the upper
    /// 16 untouched.
    pub fn d_word(&mut self, reg: u8, value: u16) {
        self.d[reg as usize] &= 0xFFFF_0000;
        self.d[reg as usize] |= value as u32;
    }

    /// Returns an address register, A7 resolving to the active stack pointer.
    pub const fn a(&self, reg: u8) -> u32 {
        if reg < 7 {
            self.a[reg as usize]
        } else {
            self.sp()
        }
    }

    /// Returns a mutable reference to an address register, A7 resolving to
    /// the active stack pointer.
    pub fn a_mut(&mut self, reg: u8) -> &mut u32 {
        if reg < 7 {
            &mut self.a[reg as usize]
        } else {
            self.sp_mut()
        }
    }

    /// Returns the active stack pointer: SSP in supervisor mode, USP in user mode.
    pub const fn sp(&self) -> u32 {
        if self.sr.s {
            self.ssp
        } else {
            self.usp
        }
    }

    /// Returns a mutable reference to the active stack pointer.
    pub fn sp_mut(&mut self) -> &mut u32 {
        if self.sr.s {
            &mut self.ssp
        } else {
            &mut self.usp
        }
    }
}

/// A M68000 core with its registers, memory and decode table.
pub struct M68k {
    /// The registers of the CPU.
    pub regs: Registers,
    pub(crate) ram: Ram,
    decoder: DecodeTable,
    /// The opcode word of the instruction currently executing.
    pub(crate) opcode: u16,
    /// Set by STOP, cleared by the next injected exception.
    pub(crate) stopped: bool,
}

impl M68k {
    /// Creates a new core in supervisor mode with zeroed registers and
    /// memory, building the decode table.
    ///
    /// Fails with [Error::DecodeConflict] if two instructions of the opcode
    /// grammar claim the same decode-table slot.
    pub fn new() -> Result<Self, Error> {
        let decoder = DecodeTable::build()?;

        let mut regs = Registers::default();
        regs.sr.s = true;
        regs.sr.interrupt_mask = 7;

        Ok(Self {
            regs,
            ram: Ram::new(),
            decoder,
            opcode: 0,
            stopped: false,
        })
    }

    /// Deposits a program in memory and prepares the core to run it.
    ///
    /// Byte 0 of `bytes` lands at `memory_offset` (memory is byte-addressed;
    /// the big-endian contract lives in the typed accessors, not here). The
    /// registers are zeroed, PC is set to `initial_pc` and the core enters
    /// supervisor mode.
    pub fn load_program(&mut self, memory_offset: u32, bytes: &[u8], initial_pc: u32) -> Result<(), Error> {
        self.ram.load(memory_offset, bytes)?;

        self.regs = Registers::default();
        self.regs.sr.s = true;
        self.regs.sr.interrupt_mask = 7;
        self.regs.pc = initial_pc;
        self.stopped = false;

        Ok(())
    }

    /// Executes a single instruction.
    ///
    /// Does nothing if the core is stopped. Vectored exceptions raised by
    /// the instruction are processed here and are not an error; only
    /// emulator-internal failures propagate.
    pub fn tick(&mut self) -> Result<(), Error> {
        if self.stopped {
            return Ok(());
        }

        let pc = self.regs.pc;
        let opcode = self.next_word()?;
        self.opcode = opcode;

        let isa = self.decoder.isa(opcode);
        trace!("{pc:06X}: {opcode:04X} {isa:?}");

        match EXECUTE[isa as usize](self) {
            Ok(()) => Ok(()),
            Err(Fault::Vector(vector)) => self.process_exception(vector),
            Err(Fault::Error(error)) => {
                warn!("fatal fault at {pc:06X} ({opcode:04X}): {error}");
                Err(error)
            },
        }
    }

    /// True after a STOP instruction, until the host injects an exception.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Returns the given data register.
    pub fn d(&self, reg: u8) -> u32 {
        self.regs.d[reg as usize]
    }

    /// Returns the given address register, A7 resolving to the active stack
    /// pointer.
    pub fn a(&self, reg: u8) -> u32 {
        self.regs.a(reg)
    }

    /// Returns the program counter.
    pub fn pc(&self) -> u32 {
        self.regs.pc
    }

    /// Returns the raw status register.
    pub fn sr(&self) -> u16 {
        self.regs.sr.into()
    }

    /// Returns the user stack pointer.
    pub fn usp(&self) -> u32 {
        self.regs.usp
    }

    /// Returns the supervisor stack pointer.
    pub fn ssp(&self) -> u32 {
        self.regs.ssp
    }

    /// Returns the byte in memory at the given address.
    pub fn read_byte(&self, addr: u32) -> Result<u8, Error> {
        self.ram.get_byte(addr)
    }

    /// Returns the big-endian word in memory at the given address.
    pub fn read_word(&self, addr: u32) -> Result<u16, Error> {
        self.ram.get_word(addr)
    }

    /// Returns the big-endian long in memory at the given address.
    pub fn read_long(&self, addr: u32) -> Result<u32, Error> {
        self.ram.get_long(addr)
    }

    /// Stores a byte in memory at the given address.
    pub fn write_byte(&mut self, addr: u32, value: u8) -> Result<(), Error> {
        self.ram.set_byte(addr, value)
    }

    /// Stores a word in memory at the given address, big-endian.
    pub fn write_word(&mut self, addr: u32, value: u16) -> Result<(), Error> {
        self.ram.set_word(addr, value)
    }

    /// Stores a long in memory at the given address, big-endian.
    pub fn write_long(&mut self, addr: u32, value: u32) -> Result<(), Error> {
        self.ram.set_long(addr, value)
    }
}
