// -*- mode: rust; -*-
//
// This file is part of quad25519.
// See LICENSE for licensing information.

//! AVX2 implementation of the 4-lane vector type.
//!
//! One `__m256i` register holds all four users' copies of a limb.  Every
//! operation maps to a single data-independent instruction, so the lane
//! contract and the constant-time contract coincide.

#![allow(non_camel_case_types)]

use core::arch::x86_64::*;
use core::ops::{Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitXor, BitXorAssign, Sub};

#[derive(Copy, Clone, Debug)]
#[repr(transparent)]
pub struct u64x4(__m256i);

impl PartialEq for u64x4 {
    #[inline]
    fn eq(&self, rhs: &u64x4) -> bool {
        unsafe {
            let m = _mm256_cmpeq_epi8(self.0, rhs.0);
            _mm256_movemask_epi8(m) == -1
        }
    }
}

impl Eq for u64x4 {}

impl Add for u64x4 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: u64x4) -> Self {
        unsafe { u64x4(_mm256_add_epi64(self.0, rhs.0)) }
    }
}

impl AddAssign for u64x4 {
    #[inline]
    fn add_assign(&mut self, rhs: u64x4) {
        *self = *self + rhs
    }
}

impl Sub for u64x4 {
    type Output = Self;

    /// Lane-wise wrapping subtraction (`0 - 1` is all-ones, as the mask
    /// constructions rely on).
    #[inline]
    fn sub(self, rhs: u64x4) -> Self {
        unsafe { u64x4(_mm256_sub_epi64(self.0, rhs.0)) }
    }
}

impl BitAnd for u64x4 {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: u64x4) -> Self {
        unsafe { u64x4(_mm256_and_si256(self.0, rhs.0)) }
    }
}

impl BitAndAssign for u64x4 {
    #[inline]
    fn bitand_assign(&mut self, rhs: u64x4) {
        *self = *self & rhs;
    }
}

impl BitOr for u64x4 {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: u64x4) -> Self {
        unsafe { u64x4(_mm256_or_si256(self.0, rhs.0)) }
    }
}

impl BitXor for u64x4 {
    type Output = Self;

    #[inline]
    fn bitxor(self, rhs: u64x4) -> Self {
        unsafe { u64x4(_mm256_xor_si256(self.0, rhs.0)) }
    }
}

impl BitXorAssign for u64x4 {
    #[inline]
    fn bitxor_assign(&mut self, rhs: u64x4) {
        *self = *self ^ rhs;
    }
}

impl u64x4 {
    #[inline]
    pub fn new(x0: u64, x1: u64, x2: u64, x3: u64) -> Self {
        unsafe { u64x4(_mm256_set_epi64x(x3 as i64, x2 as i64, x1 as i64, x0 as i64)) }
    }

    #[inline]
    pub fn splat(x: u64) -> Self {
        unsafe { u64x4(_mm256_set1_epi64x(x as i64)) }
    }

    #[inline]
    pub fn zero() -> Self {
        unsafe { u64x4(_mm256_setzero_si256()) }
    }

    #[inline]
    pub fn extract<const LANE: i32>(self) -> u64 {
        unsafe { _mm256_extract_epi64::<LANE>(self.0) as u64 }
    }

    #[inline]
    pub fn shl<const N: i32>(self) -> Self {
        unsafe { u64x4(_mm256_slli_epi64::<N>(self.0)) }
    }

    #[inline]
    pub fn shr<const N: i32>(self) -> Self {
        unsafe { u64x4(_mm256_srli_epi64::<N>(self.0)) }
    }

    /// Lane-wise right shift by a run-time count.  The count is always a
    /// public value (a loop index), never secret data.
    #[inline]
    pub fn shr_var(self, n: u32) -> Self {
        unsafe { u64x4(_mm256_srl_epi64(self.0, _mm_cvtsi32_si128(n as i32))) }
    }

    /// Multiply the low 32 bits of each lane, zero-extending the product to
    /// the full 64-bit lane.  The high halves of the inputs are ignored.
    #[inline]
    pub fn mul32(self, rhs: u64x4) -> Self {
        unsafe { u64x4(_mm256_mul_epu32(self.0, rhs.0)) }
    }

    /// `self + x.mul32(y)`, the multiply-accumulate every inner loop is
    /// built from.
    #[inline]
    pub fn mac32(self, x: u64x4, y: u64x4) -> Self {
        self + x.mul32(y)
    }

    /// Per-byte absolute value, treating each byte as an i8.  Used to strip
    /// the sign off recoded scalar nibbles.
    #[inline]
    pub fn abs_bytes(self) -> Self {
        unsafe { u64x4(_mm256_abs_epi8(self.0)) }
    }

    /// Copy the low 32 bits of each lane into its high 32 bits, turning a
    /// 32-bit comparison mask into a full-lane mask.
    #[inline]
    pub fn spread_low32(self) -> Self {
        unsafe { u64x4(_mm256_shuffle_epi32::<0xA0>(self.0)) }
    }
}
