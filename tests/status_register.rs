// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use m68k_emu::status_register::StatusRegister;

#[test]
fn status_register_round_trip() {
    for raw in 0..=u16::MAX {
        assert_eq!(u16::from(StatusRegister::from(raw)), raw & 0xA71F);

        let lsr = StatusRegister::from(raw);
        let mut rsr = lsr;
        rsr &= raw;
        assert_eq!(lsr, rsr);
        rsr &= 0;
        assert_eq!(0, u16::from(rsr));

        let lsr = StatusRegister::from(raw);
        let mut rsr = lsr;
        rsr ^= raw;
        assert_eq!(0, u16::from(rsr));
        rsr ^= 0xFFFF;
        assert_eq!(0xA71F, u16::from(rsr));

        let lsr = StatusRegister::from(raw);
        let mut rsr = lsr;
        rsr |= raw;
        assert_eq!(lsr, rsr);
        rsr |= 0xFFFF;
        assert_eq!(0xA71F, u16::from(rsr));
    }
}

#[test]
fn set_ccr_touches_the_user_byte_only() {
    let mut sr = StatusRegister::from(0xA700);
    sr.set_ccr(0x1F);
    assert_eq!(u16::from(sr), 0xA71F);
    sr.set_ccr(0);
    assert_eq!(u16::from(sr), 0xA700);
}

/// The sixteen conditions against every CCR value. The raw value's low bits
/// are C=0, V=1, Z=2, N=3.
#[test]
fn conditions() {
    for raw in 0..=u16::MAX {
        let sr = StatusRegister::from(raw);
        let c = raw & 0b0001 != 0;
        let v = raw & 0b0010 != 0;
        let z = raw & 0b0100 != 0;
        let n = raw & 0b1000 != 0;

        assert!(sr.condition(0), "T for {raw:#X}");
        assert!(!sr.condition(1), "F for {raw:#X}");
        assert_eq!(sr.condition(2), !c && !z, "HI for {raw:#X}");
        assert_eq!(sr.condition(3), c || z, "LS for {raw:#X}");
        assert_eq!(sr.condition(4), !c, "CC for {raw:#X}");
        assert_eq!(sr.condition(5), c, "CS for {raw:#X}");
        assert_eq!(sr.condition(6), !z, "NE for {raw:#X}");
        assert_eq!(sr.condition(7), z, "EQ for {raw:#X}");
        assert_eq!(sr.condition(8), !v, "VC for {raw:#X}");
        assert_eq!(sr.condition(9), v, "VS for {raw:#X}");
        assert_eq!(sr.condition(10), !n, "PL for {raw:#X}");
        assert_eq!(sr.condition(11), n, "MI for {raw:#X}");
        assert_eq!(sr.condition(12), n && v || !n && !v, "GE for {raw:#X}");
        assert_eq!(sr.condition(13), n && !v || !n && v, "LT for {raw:#X}");
        assert_eq!(sr.condition(14), !z && (n && v || !n && !v), "GT for {raw:#X}");
        assert_eq!(sr.condition(15), z || n && !v || !n && v, "LE for {raw:#X}");
    }
}
