// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vectored exception processing.
//!
//! Exceptions are control flow of the emulated processor, not emulator
//! failures: the program only observes PC jumping to the handler recorded in
//! the vector table. Only the stack pushes and the vector-table read can
//! fail, and those failures are fatal to the emulator itself.

use log::debug;

use crate::M68k;
use crate::error::Error;

/// Exception vectors of the 68000.
///
/// Cast the enum to u8 to get the vector number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
#[repr(u8)]
pub enum Vector {
    /// Bus error. Sent when the accessed address is not in the memory range of the system.
    AccessError = 2,
    AddressError = 3,
    IllegalInstruction = 4,
    ZeroDivide = 5,
    ChkInstruction = 6,
    TrapVInstruction = 7,
    PrivilegeViolation = 8,
    Trace = 9,
    /// First of the 16 software trap vectors (TRAP #0 = 32 .. TRAP #15 = 47).
    Trap0Instruction = 32,
}

impl M68k {
    /// Requests the CPU to process the given exception.
    ///
    /// This is the host's injection point for external events between two
    /// calls to [tick](Self::tick); a stopped CPU resumes execution.
    pub fn exception(&mut self, vector: u8) -> Result<(), Error> {
        self.stopped = false;
        self.process_exception(vector)
    }

    /// Transfers control through the vector table.
    ///
    /// Saves a copy of SR, enters supervisor state (clearing trace), pushes
    /// the return PC then the saved SR on the supervisor stack, and loads PC
    /// from `memory[4 * vector]`.
    pub(crate) fn process_exception(&mut self, vector: u8) -> Result<(), Error> {
        let sr: u16 = self.regs.sr.into();
        self.regs.sr.t = false;
        self.regs.sr.s = true;

        self.push_long(self.regs.pc)?;
        self.push_word(sr)?;

        self.regs.pc = self.ram.get_long(vector as u32 * 4)?;
        debug!("exception vector {vector} -> handler {:#08X}", self.regs.pc);

        Ok(())
    }
}
