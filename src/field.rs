// -*- mode: rust; -*-
//
// This file is part of quad25519.
// See LICENSE for licensing information.

//! Field arithmetic modulo \\(p = 2^{255} - 19\\), four elements at a time.
//!
//! A [`FieldElement29x4`] holds four independent field elements in
//! radix-\\(2^{29}\\): nine limbs, where lane \\(j\\) of limb \\(i\\) is the
//! \\(i\\)-th limb of user \\(j\\)'s element.  Nine 29-bit limbs cover 261
//! bits, so the arithmetic actually runs modulo the auxiliary prime
//! multiple \\(p^* = 64 p = 2^{261} - 1216\\); the excess factor washes out
//! in the final reduction.  `CONST_C = 1216` is the wraparound constant:
//! \\(2^{261} \equiv 1216 \pmod{p^*}\\).
//!
//! Limb states, and who is allowed to consume them:
//!
//! * **reduced** — every limb \\(\le 2^{29}-1\\).  Required by `mul`,
//!   `square` and `mul_small`; produced by `sub_reduce`, `mul`, `square`
//!   and `mul_small`.
//! * **loose** — limbs up to a couple of bits wider, produced by `add` and
//!   `sub`.  One loose operand in a multiply keeps every 64-bit column
//!   accumulator below \\(9 \cdot 2^{59}\\); chaining additions further is
//!   the caller's responsibility.
//!
//! Every operation is lane-independent and constant-time.

use crate::backend::vector::u64x4;

/// Number of 29-bit limbs.
pub(crate) const NLIMBS: usize = 9;

/// Limb mask, \\(2^{29} - 1\\).
const MASK29: u64 = 0x1FFF_FFFF;

/// Wraparound constant: \\(2^{261} = 1216 \pmod{p^*}\\).
const CONST_C: u64 = 1216;

/// Least significant 29-bit limb of \\(p^* = 2^{261} - 1216\\).
const LSW_P: u64 = 0x1FFF_FB40;

/// Four field elements in 9×29-bit limbs, one per lane.
#[derive(Copy, Clone, Debug)]
pub(crate) struct FieldElement29x4(pub(crate) [u64x4; NLIMBS]);

impl FieldElement29x4 {
    pub(crate) fn zero() -> FieldElement29x4 {
        FieldElement29x4([u64x4::zero(); NLIMBS])
    }

    pub(crate) fn one() -> FieldElement29x4 {
        let mut limbs = [u64x4::zero(); NLIMBS];
        limbs[0] = u64x4::splat(1);
        FieldElement29x4(limbs)
    }

    /// Limb-wise sum.  No reduction: the output is loose.
    pub(crate) fn add(&self, rhs: &FieldElement29x4) -> FieldElement29x4 {
        let mut r = [u64x4::zero(); NLIMBS];
        for i in 0..NLIMBS {
            r[i] = self.0[i] + rhs.0[i];
        }
        FieldElement29x4(r)
    }

    /// \\(2p^* + a - b\\), limb-wise.  Adding \\(2p^*\\) keeps every lane
    /// non-negative; the output is loose.
    pub(crate) fn sub(&self, rhs: &FieldElement29x4) -> FieldElement29x4 {
        let two_lsw = u64x4::splat(2 * LSW_P);
        let two_msk = u64x4::splat(2 * MASK29);

        let mut r = [u64x4::zero(); NLIMBS];
        r[0] = two_lsw + (self.0[0] - rhs.0[0]);
        for i in 1..NLIMBS {
            r[i] = two_msk + (self.0[i] - rhs.0[i]);
        }
        FieldElement29x4(r)
    }

    /// \\(2p^* + a - b\\) followed by a carry sweep and a top-limb fold.
    /// The output is reduced, so it can feed a multiply directly.
    pub(crate) fn sub_reduce(&self, rhs: &FieldElement29x4) -> FieldElement29x4 {
        let mask = u64x4::splat(MASK29);
        let mut r = self.sub(rhs).0;

        for i in 0..NLIMBS - 1 {
            r[i + 1] = r[i + 1] + r[i].shr::<29>();
            r[i] = r[i] & mask;
        }
        let top = r[8].shr::<29>().mul32(u64x4::splat(CONST_C));
        r[0] = r[0] + top;
        r[8] = r[8] & mask;

        FieldElement29x4(r)
    }

    /// Schoolbook product scanning over the 9×9 limb products.
    ///
    /// Inputs must be reduced (one may be loose): each column sums at most
    /// nine products below \\(2^{59}\\) plus a carry, so the 64-bit lane
    /// accumulator cannot saturate.  The low nine columns are kept as
    /// \\(t_0..t_8\\); the high eight columns are folded back in via
    /// `CONST_C`, and a last fold of the outgoing carry lands in limb 0.
    /// The output is reduced.
    pub(crate) fn mul(&self, rhs: &FieldElement29x4) -> FieldElement29x4 {
        let a = &self.0;
        let b = &rhs.0;
        let mask = u64x4::splat(MASK29);
        let c = u64x4::splat(CONST_C);

        // Columns 0..8.
        let t0 = a[0].mul32(b[0]);
        let t1 = a[0].mul32(b[1]).mac32(a[1], b[0]);
        let t2 = a[0].mul32(b[2]).mac32(a[1], b[1]).mac32(a[2], b[0]);
        let t3 = a[0]
            .mul32(b[3])
            .mac32(a[1], b[2])
            .mac32(a[2], b[1])
            .mac32(a[3], b[0]);
        let t4 = a[0]
            .mul32(b[4])
            .mac32(a[1], b[3])
            .mac32(a[2], b[2])
            .mac32(a[3], b[1])
            .mac32(a[4], b[0]);
        let t5 = a[0]
            .mul32(b[5])
            .mac32(a[1], b[4])
            .mac32(a[2], b[3])
            .mac32(a[3], b[2])
            .mac32(a[4], b[1])
            .mac32(a[5], b[0]);
        let t6 = a[0]
            .mul32(b[6])
            .mac32(a[1], b[5])
            .mac32(a[2], b[4])
            .mac32(a[3], b[3])
            .mac32(a[4], b[2])
            .mac32(a[5], b[1])
            .mac32(a[6], b[0]);
        let t7 = a[0]
            .mul32(b[7])
            .mac32(a[1], b[6])
            .mac32(a[2], b[5])
            .mac32(a[3], b[4])
            .mac32(a[4], b[3])
            .mac32(a[5], b[2])
            .mac32(a[6], b[1])
            .mac32(a[7], b[0]);
        let t8 = a[0]
            .mul32(b[8])
            .mac32(a[1], b[7])
            .mac32(a[2], b[6])
            .mac32(a[3], b[5])
            .mac32(a[4], b[4])
            .mac32(a[5], b[3])
            .mac32(a[6], b[2])
            .mac32(a[7], b[1])
            .mac32(a[8], b[0]);

        let mut accu = t8.shr::<29>();
        let t8 = t8 & mask;

        // Columns 9..16, peeling a 29-bit limb off the accumulator as each
        // column completes.
        accu = accu
            .mac32(a[1], b[8])
            .mac32(a[2], b[7])
            .mac32(a[3], b[6])
            .mac32(a[4], b[5])
            .mac32(a[5], b[4])
            .mac32(a[6], b[3])
            .mac32(a[7], b[2])
            .mac32(a[8], b[1]);
        let r0 = accu & mask;
        accu = accu.shr::<29>();

        accu = accu
            .mac32(a[2], b[8])
            .mac32(a[3], b[7])
            .mac32(a[4], b[6])
            .mac32(a[5], b[5])
            .mac32(a[6], b[4])
            .mac32(a[7], b[3])
            .mac32(a[8], b[2]);
        let r1 = accu & mask;
        accu = accu.shr::<29>();

        accu = accu
            .mac32(a[3], b[8])
            .mac32(a[4], b[7])
            .mac32(a[5], b[6])
            .mac32(a[6], b[5])
            .mac32(a[7], b[4])
            .mac32(a[8], b[3]);
        let r2 = accu & mask;
        accu = accu.shr::<29>();

        accu = accu
            .mac32(a[4], b[8])
            .mac32(a[5], b[7])
            .mac32(a[6], b[6])
            .mac32(a[7], b[5])
            .mac32(a[8], b[4]);
        let r3 = accu & mask;
        accu = accu.shr::<29>();

        accu = accu
            .mac32(a[5], b[8])
            .mac32(a[6], b[7])
            .mac32(a[7], b[6])
            .mac32(a[8], b[5]);
        let r4 = accu & mask;
        accu = accu.shr::<29>();

        accu = accu.mac32(a[6], b[8]).mac32(a[7], b[7]).mac32(a[8], b[6]);
        let r5 = accu & mask;
        accu = accu.shr::<29>();

        accu = accu.mac32(a[7], b[8]).mac32(a[8], b[7]);
        let r6 = accu & mask;
        accu = accu.shr::<29>();

        accu = accu.mac32(a[8], b[8]);
        let r7 = accu & mask;
        let r8 = accu.shr::<29>();

        // Fold the high half into the low half: the high limbs are worth
        // 2^261 each step up, and 2^261 = CONST_C (mod p*).
        let high = [r0, r1, r2, r3, r4, r5, r6, r7, r8];
        let low = [t0, t1, t2, t3, t4, t5, t6, t7, t8];

        let mut r = [u64x4::zero(); NLIMBS];
        let mut accu = low[0].mac32(high[0], c);
        r[0] = accu & mask;
        for i in 1..NLIMBS {
            accu = (low[i] + accu.shr::<29>()).mac32(high[i], c);
            r[i] = accu & mask;
        }
        r[0] = r[0] + accu.shr::<29>().mul32(c);

        FieldElement29x4(r)
    }

    /// Squaring: the distinct cross products are computed once and doubled
    /// with a shift before the diagonal terms come in.  Same fold as `mul`;
    /// reduced input, reduced output.
    pub(crate) fn square(&self) -> FieldElement29x4 {
        let a = &self.0;
        let mask = u64x4::splat(MASK29);
        let c = u64x4::splat(CONST_C);

        let t0 = a[0].mul32(a[0]);
        let t1 = a[0].mul32(a[1]).shl::<1>();
        let t2 = a[0].mul32(a[2]).shl::<1>() + a[1].mul32(a[1]);
        let t3 = a[0].mul32(a[3]).mac32(a[1], a[2]).shl::<1>();
        let t4 = a[0].mul32(a[4]).mac32(a[1], a[3]).shl::<1>() + a[2].mul32(a[2]);
        let t5 = a[0]
            .mul32(a[5])
            .mac32(a[1], a[4])
            .mac32(a[2], a[3])
            .shl::<1>();
        let t6 = a[0]
            .mul32(a[6])
            .mac32(a[1], a[5])
            .mac32(a[2], a[4])
            .shl::<1>()
            + a[3].mul32(a[3]);
        let t7 = a[0]
            .mul32(a[7])
            .mac32(a[1], a[6])
            .mac32(a[2], a[5])
            .mac32(a[3], a[4])
            .shl::<1>();
        let t8 = a[0]
            .mul32(a[8])
            .mac32(a[1], a[7])
            .mac32(a[2], a[6])
            .mac32(a[3], a[5])
            .shl::<1>()
            + a[4].mul32(a[4]);

        let mut accu = t8.shr::<29>();
        let t8 = t8 & mask;

        accu = accu
            + a[1]
                .mul32(a[8])
                .mac32(a[2], a[7])
                .mac32(a[3], a[6])
                .mac32(a[4], a[5])
                .shl::<1>();
        let r0 = accu & mask;
        accu = accu.shr::<29>();

        accu = accu
            + a[2]
                .mul32(a[8])
                .mac32(a[3], a[7])
                .mac32(a[4], a[6])
                .shl::<1>();
        accu = accu.mac32(a[5], a[5]);
        let r1 = accu & mask;
        accu = accu.shr::<29>();

        accu = accu
            + a[3]
                .mul32(a[8])
                .mac32(a[4], a[7])
                .mac32(a[5], a[6])
                .shl::<1>();
        let r2 = accu & mask;
        accu = accu.shr::<29>();

        accu = accu + a[4].mul32(a[8]).mac32(a[5], a[7]).shl::<1>();
        accu = accu.mac32(a[6], a[6]);
        let r3 = accu & mask;
        accu = accu.shr::<29>();

        accu = accu + a[5].mul32(a[8]).mac32(a[6], a[7]).shl::<1>();
        let r4 = accu & mask;
        accu = accu.shr::<29>();

        accu = accu + a[6].mul32(a[8]).shl::<1>();
        accu = accu.mac32(a[7], a[7]);
        let r5 = accu & mask;
        accu = accu.shr::<29>();

        accu = accu + a[7].mul32(a[8]).shl::<1>();
        let r6 = accu & mask;
        accu = accu.shr::<29>();

        accu = accu.mac32(a[8], a[8]);
        let r7 = accu & mask;
        let r8 = accu.shr::<29>();

        let high = [r0, r1, r2, r3, r4, r5, r6, r7, r8];
        let low = [t0, t1, t2, t3, t4, t5, t6, t7, t8];

        let mut r = [u64x4::zero(); NLIMBS];
        let mut accu = low[0].mac32(high[0], c);
        r[0] = accu & mask;
        for i in 1..NLIMBS {
            accu = (low[i] + accu.shr::<29>()).mac32(high[i], c);
            r[i] = accu & mask;
        }
        r[0] = r[0] + accu.shr::<29>().mul32(c);

        FieldElement29x4(r)
    }

    /// Multiply by a 29-bit constant.  Reduced input, reduced output.
    pub(crate) fn mul_small(&self, b: u32) -> FieldElement29x4 {
        let a = &self.0;
        let vb = u64x4::splat(b as u64);
        let mask = u64x4::splat(MASK29);

        let mut r = [u64x4::zero(); NLIMBS];
        let mut accu = a[0].mul32(vb);
        r[0] = accu & mask;
        for i in 1..NLIMBS {
            accu = accu.shr::<29>().mac32(a[i], vb);
            r[i] = accu & mask;
        }

        let fold = u64x4::splat(CONST_C).mul32(accu.shr::<29>());
        r[0] = r[0] + (fold & mask);
        r[1] = r[1] + fold.shr::<29>();

        FieldElement29x4(r)
    }

    /// \\(a^{p-2} = a^{-1} \pmod p\\) by a fixed addition chain: 254
    /// squarings and 11 multiplies, doubling blocks of
    /// 1, 2, 5, 10, 20, 10, 50, 100, 50 and 5.  Constant-time.
    pub(crate) fn invert(&self) -> FieldElement29x4 {
        /// Square `x` `k` times.
        fn pow2k(x: &FieldElement29x4, k: u32) -> FieldElement29x4 {
            let mut y = x.square();
            for _ in 1..k {
                y = y.square();
            }
            y
        }

        let t0 = self.square(); // a^2
        let t1 = self.mul(&pow2k(&t0, 2)); // a^9
        let t0 = t0.mul(&t1); // a^11
        let t2 = t0.square(); // a^22
        let t1 = t1.mul(&t2); // a^31 = a^(2^5 - 1)
        let t2 = pow2k(&t1, 5); // a^(2^10 - 2^5)
        let t1 = t2.mul(&t1); // a^(2^10 - 1)
        let t2 = pow2k(&t1, 10); // a^(2^20 - 2^10)
        let t2 = t2.mul(&t1); // a^(2^20 - 1)
        let t3 = pow2k(&t2, 20); // a^(2^40 - 2^20)
        let t2 = t3.mul(&t2); // a^(2^40 - 1)
        let t2 = pow2k(&t2, 10); // a^(2^50 - 2^10)
        let t1 = t2.mul(&t1); // a^(2^50 - 1)
        let t2 = pow2k(&t1, 50); // a^(2^100 - 2^50)
        let t2 = t2.mul(&t1); // a^(2^100 - 1)
        let t3 = pow2k(&t2, 100); // a^(2^200 - 2^100)
        let t2 = t3.mul(&t2); // a^(2^200 - 1)
        let t2 = pow2k(&t2, 50); // a^(2^250 - 2^50)
        let t1 = t2.mul(&t1); // a^(2^250 - 1)
        let t1 = pow2k(&t1, 5); // a^(2^255 - 2^5)
        t1.mul(&t0) // a^(2^255 - 21)
    }

    /// Swap `a` and `b` lane-wise where `choice` is 1; `choice` lanes must
    /// be 0 or 1.  XOR-mask swap, constant-time, independent per lane.
    pub(crate) fn conditional_swap(a: &mut FieldElement29x4, b: &mut FieldElement29x4, choice: u64x4) {
        let mask = u64x4::zero() - choice;
        for i in 0..NLIMBS {
            let x = (a.0[i] ^ b.0[i]) & mask;
            a.0[i] = a.0[i] ^ x;
            b.0[i] = b.0[i] ^ x;
        }
    }

    /// Reduce to the canonical representative in \\([0, p)\\).
    ///
    /// Two fold passes first: peel the bits of limb 8 above position 23,
    /// multiply by 19 (\\(2^{255} \equiv 19 \pmod p\\)) and add them back
    /// at the bottom.  The first pass can push at most one more bit over
    /// position 23, so the second always lands in \\([0, 2^{255})\\).
    /// Then subtract \\(p\\) exactly when the value still reaches it,
    /// detected by whether \\(v + 19\\) carries into bit 255.  No early
    /// exit anywhere; the byte serialisation of the result is bit-exact
    /// RFC 7748 output.
    pub(crate) fn reduce_full(&self) -> FieldElement29x4 {
        let mask29 = u64x4::splat(MASK29);
        let mask23 = u64x4::splat(0x7F_FFFF);
        let nineteen = u64x4::splat(19);

        let mut a = self.0;
        for _ in 0..2 {
            let top = a[8].shr::<23>();
            a[8] = a[8] & mask23;
            a[0] = a[0].mac32(top, nineteen);
            for i in 0..NLIMBS - 1 {
                a[i + 1] = a[i + 1] + a[i].shr::<29>();
                a[i] = a[i] & mask29;
            }
        }

        // Conditional subtraction of p, as v - p = v + 19 - 2^255.
        let mut probe = a;
        probe[0] = probe[0] + nineteen;
        for i in 0..NLIMBS - 1 {
            probe[i + 1] = probe[i + 1] + probe[i].shr::<29>();
        }
        let q = probe[8].shr::<23>();

        a[0] = a[0].mac32(q, nineteen);
        for i in 0..NLIMBS - 1 {
            a[i + 1] = a[i + 1] + a[i].shr::<29>();
            a[i] = a[i] & mask29;
        }
        a[8] = a[8] & mask23;

        FieldElement29x4(a)
    }

    /// Vectorised conversion from four little-endian 64-bit chunks per lane
    /// into 29-bit limbs.  Used by the table query, whose coordinates are
    /// stored chunk-packed.
    pub(crate) fn from_packed_chunks(c: &[u64x4; 4]) -> FieldElement29x4 {
        let mask = u64x4::splat(MASK29);
        FieldElement29x4([
            c[0] & mask,
            c[0].shr::<29>() & mask,
            (c[0].shr::<58>() | c[1].shl::<6>()) & mask,
            c[1].shr::<23>() & mask,
            (c[1].shr::<52>() | c[2].shl::<12>()) & mask,
            c[2].shr::<17>() & mask,
            (c[2].shr::<46>() | c[3].shl::<18>()) & mask,
            c[3].shr::<11>() & mask,
            c[3].shr::<40>() & mask,
        ])
    }

    /// Load four 32-byte little-endian values, one per lane, reducing
    /// modulo \\(2^{255}\\) (the high bit of the last byte is ignored, per
    /// RFC 7748).
    pub(crate) fn from_bytes_x4(bytes: &[[u8; 32]; 4]) -> FieldElement29x4 {
        let mut limbs = [[0u64; 4]; NLIMBS];
        for (lane, b) in bytes.iter().enumerate() {
            let mut c = [0u64; 4];
            for (i, chunk) in c.iter_mut().enumerate() {
                *chunk = load8(&b[8 * i..]);
            }
            c[3] &= 0x7FFF_FFFF_FFFF_FFFF;
            for (i, l) in limbs_from_chunks(&c).into_iter().enumerate() {
                limbs[i][lane] = l;
            }
        }
        FieldElement29x4(core::array::from_fn(|i| {
            u64x4::new(limbs[i][0], limbs[i][1], limbs[i][2], limbs[i][3])
        }))
    }

    /// Serialise each lane as 32 little-endian bytes.  The value must have
    /// gone through [`reduce_full`](Self::reduce_full) first so that the
    /// limbs repack into 256 bits.
    pub(crate) fn to_bytes_x4(&self) -> [[u8; 32]; 4] {
        let mut out = [[0u8; 32]; 4];
        for (lane, bytes) in out.iter_mut().enumerate() {
            let l = lane_limbs(&self.0, lane);
            let c = chunks_from_limbs(&l);
            for (i, chunk) in c.iter().enumerate() {
                bytes[8 * i..8 * i + 8].copy_from_slice(&chunk.to_le_bytes());
            }
        }
        out
    }
}

fn load8(input: &[u8]) -> u64 {
    (input[0] as u64)
        | ((input[1] as u64) << 8)
        | ((input[2] as u64) << 16)
        | ((input[3] as u64) << 24)
        | ((input[4] as u64) << 32)
        | ((input[5] as u64) << 40)
        | ((input[6] as u64) << 48)
        | ((input[7] as u64) << 56)
}

/// Slice a 256-bit value, given as four little-endian 64-bit chunks, into
/// nine 29-bit limbs.
fn limbs_from_chunks(c: &[u64; 4]) -> [u64; NLIMBS] {
    [
        c[0] & MASK29,
        (c[0] >> 29) & MASK29,
        ((c[0] >> 58) | (c[1] << 6)) & MASK29,
        (c[1] >> 23) & MASK29,
        ((c[1] >> 52) | (c[2] << 12)) & MASK29,
        (c[2] >> 17) & MASK29,
        ((c[2] >> 46) | (c[3] << 18)) & MASK29,
        (c[3] >> 11) & MASK29,
        (c[3] >> 40) & MASK29,
    ]
}

/// Repack nine 29-bit limbs into four 64-bit chunks, truncating above bit
/// 255 (limb 8 carries at most 23 bits after a full reduction).
fn chunks_from_limbs(l: &[u64; NLIMBS]) -> [u64; 4] {
    [
        l[0] | (l[1] << 29) | (l[2] << 58),
        (l[2] >> 6) | (l[3] << 23) | (l[4] << 52),
        (l[4] >> 12) | (l[5] << 17) | (l[6] << 46),
        (l[6] >> 18) | (l[7] << 11) | (l[8] << 40),
    ]
}

/// Pull one lane's limbs out of the vector form.
pub(crate) fn lane_limbs(v: &[u64x4; NLIMBS], lane: usize) -> [u64; NLIMBS] {
    core::array::from_fn(|i| match lane {
        0 => v[i].extract::<0>(),
        1 => v[i].extract::<1>(),
        2 => v[i].extract::<2>(),
        _ => v[i].extract::<3>(),
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use hex_literal::hex;

    fn splat_bytes(b: [u8; 32]) -> FieldElement29x4 {
        FieldElement29x4::from_bytes_x4(&[b; 4])
    }

    // Random-looking test elements; B's top byte exercises the bit-255 mask.
    const A_BYTES: [u8; 32] =
        hex!("4701d1bbabfe2dd996d2a4f4e13f93e09a2f3b4b3e1cbd232cd3e2a8f0a5b917");
    const B_BYTES: [u8; 32] =
        hex!("c3387b43186ee6f44a5ba5b31a6f43d2bd7d4673e0eb7e9aa1a8cd6fcfbf9eda");

    #[test]
    fn add_is_loose_sub_reduce_is_reduced() {
        let a = splat_bytes(A_BYTES);
        let b = splat_bytes(B_BYTES);

        for limb in a.add(&b).0.iter() {
            assert!(limb.extract::<0>() <= 1 << 30);
        }
        for limb in a.sub(&b).0.iter() {
            // 2p* + a - b stays under three limbs' worth of headroom.
            assert!(limb.extract::<1>() < 3 << 29);
        }
        for fe in [a.sub_reduce(&b), a.mul(&b), a.square(), a.mul_small(121665)] {
            for limb in fe.0.iter() {
                assert!(limb.extract::<2>() <= MASK29);
            }
        }
    }

    #[test]
    fn square_matches_mul() {
        // Both walk the same columns, so the limbs agree exactly, not just
        // the values mod p.
        let a = splat_bytes(A_BYTES);
        let s = a.square();
        let m = a.mul(&a);
        for lane in 0..4 {
            assert_eq!(lane_limbs(&s.0, lane), lane_limbs(&m.0, lane));
        }
    }

    #[test]
    fn mul_by_inverse_is_one() {
        let a = splat_bytes(A_BYTES);
        let one = a.mul(&a.invert()).reduce_full().to_bytes_x4();
        assert_eq!(one, FieldElement29x4::one().reduce_full().to_bytes_x4());
    }

    #[test]
    fn reduce_full_is_canonical() {
        // 2p* folds all the way down to zero, and p itself to zero.
        let two_pstar = FieldElement29x4::zero().sub(&FieldElement29x4::zero());
        assert_eq!(two_pstar.reduce_full().to_bytes_x4(), [[0u8; 32]; 4]);

        let p_bytes =
            hex!("edffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff7f");
        let p_fe = splat_bytes(p_bytes);
        assert_eq!(p_fe.reduce_full().to_bytes_x4(), [[0u8; 32]; 4]);

        // p - 1 stays put.
        let pm1_bytes =
            hex!("ecffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff7f");
        let pm1 = splat_bytes(pm1_bytes);
        assert_eq!(pm1.reduce_full().to_bytes_x4(), [pm1_bytes; 4]);
    }

    #[test]
    fn invert_known_value() {
        // Inverse of A_BYTES, computed independently.
        let a = splat_bytes(A_BYTES);
        let expected =
            hex!("869de87f8cb1f3f2c11d5b8de8360fb501f2dd801852297ee6e92e18cf4fe51c");
        assert_eq!(a.invert().reduce_full().to_bytes_x4()[3], expected);
    }

    #[test]
    fn mul_known_value() {
        let a = splat_bytes(A_BYTES);
        let b = splat_bytes(B_BYTES);
        let expected =
            hex!("cffdd46f41f1cbd9067434c3b3721c538f1776175c6364fbc52395622b3e1103");
        assert_eq!(a.mul(&b).reduce_full().to_bytes_x4()[0], expected);
    }

    #[test]
    fn sub_then_add_round_trips() {
        let a = splat_bytes(A_BYTES);
        let b = splat_bytes(B_BYTES);
        // ((a - b) + b) * 1 reduces back to a.
        let d = a.sub_reduce(&b);
        let s = d.add(&b).sub_reduce(&FieldElement29x4::zero());
        assert_eq!(
            s.reduce_full().to_bytes_x4()[1],
            a.reduce_full().to_bytes_x4()[1]
        );
    }

    #[test]
    fn conditional_swap_per_lane() {
        let mut a = splat_bytes(A_BYTES);
        let mut b = splat_bytes(B_BYTES);
        let flags = u64x4::new(0, 1, 1, 0);

        FieldElement29x4::conditional_swap(&mut a, &mut b, flags);
        let a_bytes = a.reduce_full().to_bytes_x4();
        let b_bytes = b.reduce_full().to_bytes_x4();
        let a_masked = {
            let mut t = A_BYTES;
            t[31] &= 0x7f;
            t
        };
        let b_masked = {
            let mut t = B_BYTES;
            t[31] &= 0x7f;
            t
        };
        assert_eq!(a_bytes[0], a_masked);
        assert_eq!(a_bytes[1], b_masked);
        assert_eq!(a_bytes[2], b_masked);
        assert_eq!(b_bytes[1], a_masked);
        assert_eq!(b_bytes[3], b_masked);

        // Swapping twice with the same flags is the identity.
        let mut a2 = a;
        let mut b2 = b;
        let flags2 = u64x4::new(1, 1, 0, 1);
        FieldElement29x4::conditional_swap(&mut a2, &mut b2, flags2);
        FieldElement29x4::conditional_swap(&mut a2, &mut b2, flags2);
        assert_eq!(a2.to_bytes_x4(), a.to_bytes_x4());
        assert_eq!(b2.to_bytes_x4(), b.to_bytes_x4());
    }

    #[test]
    fn bytes_round_trip() {
        let a = splat_bytes(A_BYTES);
        assert_eq!(a.reduce_full().to_bytes_x4()[2], A_BYTES);

        // Distinct values per lane stay in their lanes.
        let mixed = FieldElement29x4::from_bytes_x4(&[
            A_BYTES,
            B_BYTES,
            [3u8; 32],
            [0u8; 32],
        ]);
        let out = mixed.reduce_full().to_bytes_x4();
        assert_eq!(out[0], A_BYTES);
        assert_eq!(out[2], [3u8; 32]);
        assert_eq!(out[3], [0u8; 32]);
    }

    #[test]
    fn from_bytes_masks_bit_255() {
        let mut high = [0u8; 32];
        high[31] = 0x80;
        let fe = splat_bytes(high);
        assert_eq!(fe.reduce_full().to_bytes_x4()[0], [0u8; 32]);
    }

    #[test]
    fn chunk_and_limb_layouts_agree() {
        let c = [
            0x0123_4567_89ab_cdef,
            0xfedc_ba98_7654_3210,
            0x0f1e_2d3c_4b5a_6978,
            0x1357_9bdf_0246_8ace,
        ];
        let l = limbs_from_chunks(&c);
        for limb in l.iter() {
            assert!(*limb <= MASK29);
        }
        // chunks -> limbs -> chunks is lossless below bit 255.
        let mut c2 = c;
        c2[3] &= 0x7FFF_FFFF_FFFF_FFFF;
        assert_eq!(chunks_from_limbs(&limbs_from_chunks(&c2)), c2);
    }
}
