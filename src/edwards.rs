// -*- mode: rust; -*-
//
// This file is part of quad25519.
// See LICENSE for licensing information.

//! Fixed-base scalar multiplication on the twisted Edwards form.
//!
//! The birational map between curve25519 and the \\(a = -1\\) twisted
//! Edwards curve \\(-x^2 + y^2 = 1 + dx^2y^2\\) lets the public-key
//! computation run where addition is cheapest: with a precomputed table,
//! 64 unified mixed additions and four doublings beat 255 ladder steps by
//! a wide margin.  Only the result's \\(y\\) and \\(z\\) survive the trip
//! back to the Montgomery \\(u\\)-line, so nothing here tracks sign.
//!
//! Points use extended coordinates with the auxiliary coordinate
//! \\(T = XY/Z\\) kept as two factors \\(E \cdot H = T\\); the factors
//! only ever appear as a product feeding another multiply, so splitting
//! them saves completing \\(T\\) in every operation.

#![allow(non_snake_case)]

use crate::constants::BASEPOINT_TABLE;
use crate::field::FieldElement29x4;
use crate::scalar::ScalarX4;
use crate::window::DuifPoint;

/// A point in extended coordinates \\((X, Y, Z, E, H)\\) with
/// \\(EH = XY/Z\\), four lanes wide.
pub(crate) struct ExtendedPoint {
    pub(crate) X: FieldElement29x4,
    pub(crate) Y: FieldElement29x4,
    pub(crate) Z: FieldElement29x4,
    pub(crate) E: FieldElement29x4,
    pub(crate) H: FieldElement29x4,
}

impl ExtendedPoint {
    /// The identity \\((0, 1, 1, 0, 1)\\) in all lanes.
    pub(crate) fn identity() -> ExtendedPoint {
        ExtendedPoint {
            X: FieldElement29x4::zero(),
            Y: FieldElement29x4::one(),
            Z: FieldElement29x4::one(),
            E: FieldElement29x4::zero(),
            H: FieldElement29x4::one(),
        }
    }

    /// Unified mixed addition with a table point in Duif form.
    ///
    /// The \\(a = -1\\) addition law is complete on this curve, so the
    /// doubling case needs no special handling.  7 multiplies; the usual
    /// multiplication by \\(2d\\) is prepaid by the halved table entries,
    /// and \\(T_1\\) is recovered from its factors on entry.
    pub(crate) fn add_duif(&self, q: &DuifPoint) -> ExtendedPoint {
        let t = self.E.mul(&self.H);
        let a = self.Y.sub(&self.X);
        let b = self.Y.add(&self.X);
        let a = a.mul(&q.y_minus_x);
        let b = b.mul(&q.y_plus_x);
        let E = b.sub(&a);
        let H = b.add(&a);
        let c = t.mul(&q.xy_d);
        let z_minus_c = self.Z.sub_reduce(&c);
        let z_plus_c = self.Z.add(&c);
        ExtendedPoint {
            X: E.mul(&z_minus_c),
            Y: z_plus_c.mul(&H),
            Z: z_minus_c.mul(&z_plus_c),
            E,
            H,
        }
    }

    /// Doubling, \\(a = -1\\): 4 squarings, 3 multiplies and one small
    /// multiply by 2.
    pub(crate) fn double(&self) -> ExtendedPoint {
        let xx = self.X.square();
        let yy = self.Y.square();
        let xx_minus_yy = xx.sub_reduce(&yy);
        let H = xx.add(&yy);
        let xpy = self.X.add(&self.Y);
        let xpy2 = xpy.square();
        let E = H.sub(&xpy2);
        let zz2 = self.Z.square().mul_small(2);
        let g = xx_minus_yy.add(&zz2);
        ExtendedPoint {
            X: E.mul(&g),
            Y: xx_minus_yy.mul(&H),
            Z: g.mul(&xx_minus_yy),
            E,
            H,
        }
    }

    /// Map to the Montgomery \\(u\\)-line: \\(u = (Z + Y)/(Z - Y)\\).
    pub(crate) fn to_montgomery_u(&self) -> FieldElement29x4 {
        let z_minus_y = self.Z.sub_reduce(&self.Y);
        let z_plus_y = self.Z.add(&self.Y);
        z_plus_y.mul(&z_minus_y.invert())
    }
}

/// Fixed-base scalar multiplication \\(kB\\) over the precomputed table.
///
/// The clamped scalar is recoded into 64 signed radix-16 digits
/// \\(k = \sum e_i 16^i\\); the odd-position digits are accumulated first,
/// multiplied by 16 with four doublings, then the even positions land on
/// top.  Both passes read column \\(i/2\\), so each of the 32 columns is
/// visited exactly twice and the access pattern depends only on the loop
/// counter.
pub(crate) fn mul_base(k: &ScalarX4) -> ExtendedPoint {
    let e = k.clamped().to_signed_nibbles();

    let mut h = ExtendedPoint::identity();
    for i in (0..64).filter(|i| i % 2 == 1) {
        h = h.add_duif(&BASEPOINT_TABLE.0[i / 2].select(e[i]));
    }

    h = h.double();
    h = h.double();
    h = h.double();
    h = h.double();

    for i in (0..64).filter(|i| i % 2 == 0) {
        h = h.add_duif(&BASEPOINT_TABLE.0[i / 2].select(e[i]));
    }

    h
}

/// Public-key scalar multiplication: \\(u(kB)\\) as a field element,
/// reduced but not yet canonical.
pub(crate) fn mul_fixbase(k: &ScalarX4) -> FieldElement29x4 {
    mul_base(k).to_montgomery_u()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::montgomery;
    use hex_literal::hex;

    // RFC 7748 6.1 key pairs.
    const ALICE_SK: [u8; 32] =
        hex!("77076d0a7318a57d3c16c17251b26645df4c2f87ebc0992ab177fba51db92c2a");
    const ALICE_PK: [u8; 32] =
        hex!("8520f0098930a754748b7ddcb43ef75a0dbf3a0d26381af4eba4a98eaa9b4e6a");
    const BOB_SK: [u8; 32] =
        hex!("5dab087e624a8a4b79e17f8b83800ee66f3bb1292618b6fd1c2f8b27ff88e0eb");
    const BOB_PK: [u8; 32] =
        hex!("de9edb7d7b7dc1b4d35b61c2ece435373f8343c85b78674dadfc7e146f882b4f");

    #[test]
    fn fixed_base_matches_rfc7748_keypairs() {
        let k = ScalarX4::from_bytes_x4(&[ALICE_SK, BOB_SK, BOB_SK, ALICE_SK]);
        let u = mul_fixbase(&k).reduce_full().to_bytes_x4();
        assert_eq!(u[0], ALICE_PK);
        assert_eq!(u[1], BOB_PK);
        assert_eq!(u[2], BOB_PK);
        assert_eq!(u[3], ALICE_PK);
    }

    #[test]
    fn fixed_base_agrees_with_ladder() {
        // k*B both ways: through the Edwards table and through the
        // Montgomery ladder from u = 9.
        let sk = [
            hex!("0101010101010101010101010101010101010101010101010101010101010101"),
            hex!("2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a"),
            hex!("9e9e9e9e9e9e9e9e9e9e9e9e9e9e9e9e9e9e9e9e9e9e9e9e9e9e9e9e9e9e9e9e"),
            hex!("f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0"),
        ];
        let mut nine = [0u8; 32];
        nine[0] = 9;

        let k = ScalarX4::from_bytes_x4(&sk);
        let fixed = mul_fixbase(&k).reduce_full().to_bytes_x4();
        let u = FieldElement29x4::from_bytes_x4(&[nine; 4]);
        let laddered = montgomery::mul_varbase(&k, &u).reduce_full().to_bytes_x4();
        assert_eq!(fixed, laddered);
    }
}
