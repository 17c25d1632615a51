// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Properties of the wider-precision arithmetic helpers that compute the
//! condition codes.

use m68k_emu::utils::ExtendedOps;

use quickcheck::quickcheck;

macro_rules! test_operator {
    ($operator:expr, $expected:expr) => {
        let res = $operator;
        assert_eq!(res, $expected, "{} -> {:?}, expected {:?}", stringify!($operator), res, $expected);
    }
}

#[test]
fn extended_add_byte() {
    test_operator!(255u8.extended_add(1, false), (0, true));
    test_operator!(255u8.extended_add(0, true), (0, true));
    test_operator!(255u8.extended_add(1, true), (1, true));
    test_operator!(0u8.extended_add(255, false), (255, false));
    test_operator!(0u8.extended_add(255, true), (0, true));

    test_operator!(127u8.signed_extended_add(1, false), (-128, true));
    test_operator!(127u8.signed_extended_add(0, true), (-128, true));
    test_operator!(127u8.signed_extended_add(1, true), (-127, true));
    test_operator!(127u8.signed_extended_add(255, false), (126, false));
    test_operator!(127u8.signed_extended_add(255, true), (127, false));
    test_operator!(128u8.signed_extended_add(255, false), (127, true));
    test_operator!(128u8.signed_extended_add(255, true), (-128, false));
}

#[test]
fn extended_sub_byte() {
    test_operator!(0u8.extended_sub(1, false), (255, true));
    test_operator!(0u8.extended_sub(0, true), (255, true));
    test_operator!(0u8.extended_sub(1, true), (254, true));
    test_operator!(255u8.extended_sub(255, false), (0, false));
    test_operator!(255u8.extended_sub(255, true), (255, true));

    test_operator!(128u8.signed_extended_sub(1, false), (127, true));
    test_operator!(128u8.signed_extended_sub(0, true), (127, true));
    test_operator!(128u8.signed_extended_sub(1, true), (126, true));
    test_operator!(128u8.signed_extended_sub(255, false), (-127, false));
    test_operator!(128u8.signed_extended_sub(255, true), (-128, false));
    test_operator!(127u8.signed_extended_sub(255, false), (-128, true));
    test_operator!(127u8.signed_extended_sub(255, true), (127, false));
}

quickcheck! {
    /// Sign extension from a byte behaves like the `as i8 as i32` cast chain.
    fn sign_extend_byte(b: u8) -> bool {
        (b as i8 as i32) == (b as i8 as i16 as i32)
    }

    /// Sign extension from a word behaves like the `as i16 as i32` cast chain.
    fn sign_extend_word(w: u16) -> bool {
        (w as i16 as i32) == i32::from(w as i16)
    }

    /// Without carry-in, the unsigned carry matches `overflowing_add`.
    fn carry_matches_overflowing_add(a: u8, b: u8) -> bool {
        a.extended_add(b, false) == a.overflowing_add(b)
    }

    /// Without borrow-in, the unsigned borrow matches `overflowing_sub`.
    fn borrow_matches_overflowing_sub(a: u16, b: u16) -> bool {
        a.extended_sub(b, false) == a.overflowing_sub(b)
    }

    /// The carry-out is bit `8 * size_of::<T>()` of the wider sum.
    fn carry_is_the_ninth_bit(a: u8, b: u8, x: bool) -> bool {
        let wide = a as u16 + b as u16 + x as u16;
        a.extended_add(b, x) == (wide as u8, wide >> 8 != 0)
    }

    /// Signed overflow on addition follows the sign rule: operands of equal
    /// sign, result of a different one.
    fn overflow_follows_the_sign_rule(a: u8, b: u8) -> bool {
        let (res, v) = a.signed_extended_add(b, false);
        let sa = (a as i8) < 0;
        let sb = (b as i8) < 0;
        v == (sa == sb && (res < 0) != sa)
    }

    /// Same rule at long width.
    fn overflow_follows_the_sign_rule_long(a: u32, b: u32) -> bool {
        let (res, v) = a.signed_extended_add(b, false);
        let sa = (a as i32) < 0;
        let sb = (b as i32) < 0;
        v == (sa == sb && (res < 0) != sa)
    }

    /// The result value never depends on the signedness of the helper.
    fn signed_and_unsigned_results_agree(a: u16, b: u16, x: bool) -> bool {
        let (ures, _) = a.extended_add(b, x);
        let (sres, _) = a.signed_extended_add(b, x);
        ures == sres as u16
    }
}
