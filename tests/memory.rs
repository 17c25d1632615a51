// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use m68k_emu::{Error, M68k, MEMORY_SIZE};

use quickcheck::{quickcheck, TestResult};

#[test]
fn big_endian_layout() {
    let mut cpu = M68k::new().unwrap();

    cpu.write_long(0x2000, 0x1234_5678).unwrap();
    assert_eq!(cpu.read_long(0x2000).unwrap(), 0x1234_5678);
    assert_eq!(cpu.read_word(0x2000).unwrap(), 0x1234);
    assert_eq!(cpu.read_word(0x2002).unwrap(), 0x5678);
    assert_eq!(cpu.read_byte(0x2000).unwrap(), 0x12);
    assert_eq!(cpu.read_byte(0x2001).unwrap(), 0x34);
    assert_eq!(cpu.read_byte(0x2002).unwrap(), 0x56);
    assert_eq!(cpu.read_byte(0x2003).unwrap(), 0x78);

    cpu.write_word(0x2000, 0xBEEF).unwrap();
    assert_eq!(cpu.read_byte(0x2000).unwrap(), 0xBE);
    assert_eq!(cpu.read_byte(0x2001).unwrap(), 0xEF);
}

#[test]
fn out_of_range_accesses_fail() {
    let mut cpu = M68k::new().unwrap();

    assert!(matches!(cpu.read_byte(MEMORY_SIZE), Err(Error::InvalidMemoryAccess { .. })));
    assert!(matches!(cpu.read_word(MEMORY_SIZE - 1), Err(Error::InvalidMemoryAccess { .. })));
    assert!(matches!(cpu.read_long(MEMORY_SIZE - 2), Err(Error::InvalidMemoryAccess { .. })));
    assert!(matches!(cpu.write_byte(MEMORY_SIZE, 0), Err(Error::InvalidMemoryAccess { .. })));
    assert!(matches!(cpu.write_long(MEMORY_SIZE - 3, 0), Err(Error::InvalidMemoryAccess { .. })));

    assert_eq!(cpu.read_byte(MEMORY_SIZE - 1).unwrap(), 0);
    assert_eq!(cpu.read_word(MEMORY_SIZE - 2).unwrap(), 0);
}

#[test]
fn loader_is_byte_exact() {
    let mut cpu = M68k::new().unwrap();

    cpu.load_program(0x1000, &[0xDE, 0xAD, 0xBE, 0xEF], 0x1000).unwrap();
    assert_eq!(cpu.read_byte(0x1000).unwrap(), 0xDE);
    assert_eq!(cpu.read_byte(0x1003).unwrap(), 0xEF);
    assert_eq!(cpu.read_long(0x1000).unwrap(), 0xDEAD_BEEF);
    assert_eq!(cpu.pc(), 0x1000);
    // Supervisor mode, interrupt mask 7.
    assert_eq!(cpu.sr(), 0x2700);
}

#[test]
fn loader_rejects_images_past_the_end_of_memory() {
    let mut cpu = M68k::new().unwrap();

    assert!(matches!(
        cpu.load_program(MEMORY_SIZE - 2, &[0; 4], 0),
        Err(Error::InvalidMemoryAccess { .. })
    ));
}

quickcheck! {
    /// `write(a, v); read(a) == v` for every value and address, and the
    /// four bytes are the big-endian representation of `v`.
    fn long_round_trip(addr: u32, value: u32) -> TestResult {
        let addr = addr % (MEMORY_SIZE - 4);
        let mut cpu = M68k::new().unwrap();

        cpu.write_long(addr, value).unwrap();
        if cpu.read_long(addr).unwrap() != value {
            return TestResult::failed();
        }

        let bytes = value.to_be_bytes();
        for (i, byte) in bytes.iter().enumerate() {
            if cpu.read_byte(addr + i as u32).unwrap() != *byte {
                return TestResult::failed();
            }
        }

        TestResult::passed()
    }
}
