// -*- mode: rust; -*-
//
// This file is part of quad25519.
// See LICENSE for licensing information.

//! 4-lane × 64-bit vector primitives.
//!
//! Both backends expose the same `u64x4` type: lane-independent wrapping
//! arithmetic, `mul32` multiplying only the low halves of each lane, and
//! constant-time behaviour for every operation.  The AVX2 backend is picked
//! up automatically when the crate is compiled with `target-feature=+avx2`;
//! everywhere else each lane is an ordinary `u64`, which satisfies the same
//! contract one lane at a time.

use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(all(target_arch = "x86_64", target_feature = "avx2"))] {
        mod packed_simd;
        pub(crate) use self::packed_simd::u64x4;
    } else {
        mod portable;
        pub(crate) use self::portable::u64x4;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn lanes_are_independent() {
        let a = u64x4::new(1, 2, 3, 4);
        let b = u64x4::new(10, 20, 30, 40);
        let s = a + b;
        assert_eq!(
            [
                s.extract::<0>(),
                s.extract::<1>(),
                s.extract::<2>(),
                s.extract::<3>()
            ],
            [11, 22, 33, 44]
        );
    }

    #[test]
    fn mul32_ignores_high_halves() {
        let a = u64x4::splat((0xdead << 32) | 7);
        let b = u64x4::splat((0xbeef << 32) | 9);
        assert_eq!(a.mul32(b).extract::<2>(), 63);
    }

    #[test]
    fn sub_wraps() {
        let z = u64x4::zero();
        let m = z - u64x4::splat(1);
        assert_eq!(m.extract::<0>(), u64::MAX);
    }

    #[test]
    fn abs_bytes_on_nibble_encodings() {
        // -3 as a masked signed nibble is 0xfd; its byte-abs is 3.
        let b = u64x4::splat(0xfd);
        assert_eq!(b.abs_bytes().extract::<1>(), 3);
        let b = u64x4::splat(0x06);
        assert_eq!(b.abs_bytes().extract::<1>(), 6);
    }

    #[test]
    fn spread_low32_fills_both_halves() {
        let v = u64x4::new(0xffff_ffff, 0, 1, 0xabcd);
        let s = v.spread_low32();
        assert_eq!(s.extract::<0>(), u64::MAX);
        assert_eq!(s.extract::<1>(), 0);
        assert_eq!(s.extract::<2>(), 0x0000_0001_0000_0001);
        assert_eq!(s.extract::<3>(), 0x0000_abcd_0000_abcd);
    }

    #[test]
    fn shifts() {
        let v = u64x4::splat(0b1011);
        assert_eq!(v.shl::<2>().extract::<0>(), 0b101100);
        assert_eq!(v.shr::<1>().extract::<0>(), 0b101);
        assert_eq!(v.shr_var(3).extract::<3>(), 0b1);
    }
}
