// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host-visible error taxonomy.
//!
//! These errors indicate a bug in the emulated program or in the emulator
//! itself and propagate out of [tick](crate::M68k::tick). Vectored exceptions
//! (zero divide, TRAP, privilege violation, ...) are ordinary control flow
//! for the emulated processor and are never reported through this type.

use thiserror::Error;

/// Fatal emulator errors.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// An access fell outside the 16 MiB memory range.
    #[error("invalid memory access at {address:#08X} ({size} bytes)")]
    InvalidMemoryAccess { address: u32, size: u32 },

    /// A push would have driven the active stack pointer below address 0.
    #[error("stack overflow: cannot push {size} bytes with SP = {sp:#08X}")]
    StackOverflow { sp: u32, size: u32 },

    /// An instruction asked for the address of an operand that does not
    /// live in memory (e.g. LEA on a data register).
    #[error("addressing mode {mode:?} has no memory address")]
    InvalidAddressingMode { mode: crate::addressing_modes::AddressingMode },

    /// Two different instructions claimed the same decode-table slot.
    #[error("decode conflict at opcode {opcode:#06X}: {existing} and {conflicting}")]
    DecodeConflict {
        opcode: u16,
        existing: &'static str,
        conflicting: &'static str,
    },

    /// An opcode field held a value the grammar should have made
    /// unreachable.
    #[error("unsupported variant of opcode {opcode:#06X}")]
    UnsupportedOpcodeVariant { opcode: u16 },
}
