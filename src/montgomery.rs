// -*- mode: rust; -*-
//
// This file is part of quad25519.
// See LICENSE for licensing information.

//! Variable-base scalar multiplication on the Montgomery \\(u\\)-line.
//!
//! To avoid notational confusion with the Edwards code we write
//! \\(u, v\\) for Montgomery coordinates.  The ladder works on
//! \\((U : W)\\) pairs and never needs \\(v\\): the peer's public key is
//! just a \\(u\\)-coordinate, which is what makes X25519's wire format so
//! small.  See Costello–Smith, _Montgomery curves and their arithmetic_,
//! for the differential arithmetic used here.

#![allow(non_snake_case)]

use crate::backend::vector::u64x4;
use crate::constants::APLUS2_OVER_FOUR;
use crate::field::FieldElement29x4;
use crate::scalar::ScalarX4;

/// A projective point \\((U : W)\\) on the \\(u\\)-line, four lanes wide.
pub(crate) struct ProjectivePoint {
    pub(crate) U: FieldElement29x4,
    pub(crate) W: FieldElement29x4,
}

impl ProjectivePoint {
    /// Swap \\(P\\) and \\(Q\\) lane-wise where `choice` is 1.
    fn conditional_swap(P: &mut ProjectivePoint, Q: &mut ProjectivePoint, choice: u64x4) {
        FieldElement29x4::conditional_swap(&mut P.U, &mut Q.U, choice);
        FieldElement29x4::conditional_swap(&mut P.W, &mut Q.W, choice);
    }
}

/// One ladder step: a combined differential addition and doubling.
///
/// With \\(P - Q\\) known by its affine \\(u\\)-coordinate `affine_PmQ`,
/// computes \\((2P, P + Q)\\) in place.  5 multiplies, 4 squarings and one
/// small multiply by \\((A-2)/4\\).  The subtractions whose results get
/// squared go through the reducing `sub_reduce`; the rest may stay loose
/// without saturating any product column.
fn differential_add_and_double(
    P: &mut ProjectivePoint,
    Q: &mut ProjectivePoint,
    affine_PmQ: &FieldElement29x4,
) {
    let t1 = P.U.add(&P.W); // A  = U_P + W_P
    P.U = P.U.sub_reduce(&P.W); // B  = U_P - W_P
    let t2 = Q.U.add(&Q.W); // C  = U_Q + W_Q
    Q.U = Q.U.sub(&Q.W); // D  = U_Q - W_Q
    P.W = t1.square(); // AA = A^2
    Q.W = t2.mul(&P.U); // CB = C * B
    let t2 = Q.U.mul(&t1); // DA = D * A
    let t1 = P.U.square(); // BB = B^2
    P.U = P.W.mul(&t1); // U_{2P} = AA * BB
    let t1 = P.W.sub(&t1); // E  = AA - BB
    Q.U = t1.mul_small(APLUS2_OVER_FOUR); // ((A-2)/4) * E
    Q.U = Q.U.add(&P.W); // AA + ((A-2)/4) * E
    P.W = Q.U.mul(&t1); // W_{2P} = E * (AA + ((A-2)/4) * E)
    let t1 = t2.add(&Q.W); // DA + CB
    Q.U = t1.square(); // U_{P+Q} = (DA + CB)^2
    let t1 = t2.sub_reduce(&Q.W); // DA - CB
    let t2 = t1.square(); // (DA - CB)^2
    Q.W = t2.mul(affine_PmQ); // W_{P+Q} = u(P-Q) * (DA - CB)^2
}

/// The X25519 ladder: \\(u(kP)\\) from a scalar and \\(u(P)\\).
///
/// The scalar is clamped here, so bit 254 is always set and bits 0–2 are
/// always clear.  A single flag per lane tracks whether the working pair
/// is currently swapped; xoring in each new key bit means one conditional
/// swap per step instead of two, and a final swap puts the pair straight.
/// All 255 iterations run regardless of the scalar.
pub(crate) fn mul_varbase(k: &ScalarX4, u: &FieldElement29x4) -> FieldElement29x4 {
    let k = k.clamped();

    let mut P = ProjectivePoint {
        U: FieldElement29x4::one(),
        W: FieldElement29x4::zero(),
    };
    let mut Q = ProjectivePoint {
        U: *u,
        W: FieldElement29x4::one(),
    };

    let mut swapped = u64x4::zero();
    for i in (0..255).rev() {
        let bit = k.bit(i);
        swapped = swapped ^ bit;
        ProjectivePoint::conditional_swap(&mut P, &mut Q, swapped);
        differential_add_and_double(&mut P, &mut Q, u);
        swapped = bit;
    }
    ProjectivePoint::conditional_swap(&mut P, &mut Q, swapped);

    // Projective to affine: u = U / W.
    P.W.invert().mul(&P.U)
}

#[cfg(test)]
mod test {
    use super::*;
    use hex_literal::hex;

    // RFC 7748 5.2 test vectors.
    const K1: [u8; 32] = hex!("a546e36bf0527c9d3b16154b82465edd62144c0ac1fc5a18506a2244ba449ac4");
    const U1: [u8; 32] = hex!("e6db6867583030db3594c1a424b15f7c726624ec26b3353b10a903a6d0ab1c4c");
    const R1: [u8; 32] = hex!("c3da55379de9c6908e94ea4df28d084f32eccf03491c71f754b4075577a28552");

    const K2: [u8; 32] = hex!("4b66e9d4d1b4673c5ad22691957d6af5c11b6421e0ea01d42ca4169e7918ba0d");
    const U2: [u8; 32] = hex!("e5210f12786811d3f4b7959d0538ae2c31dbe7106fc03c3efc4cd549c715a493");
    const R2: [u8; 32] = hex!("95cbde9476e8907d7aade45cb4b873f88b595a68799fa152e6f8f7647aac7957");

    #[test]
    fn rfc7748_ladder_vectors() {
        // Both vectors at once, in mixed lane order; U2 also exercises the
        // high-bit masking of the peer coordinate.
        let k = ScalarX4::from_bytes_x4(&[K1, K2, K2, K1]);
        let u = FieldElement29x4::from_bytes_x4(&[U1, U2, U2, U1]);
        let r = mul_varbase(&k, &u).reduce_full().to_bytes_x4();
        assert_eq!(r, [R1, R2, R2, R1]);
    }

    #[test]
    fn ladder_lanes_do_not_interfere() {
        let k = ScalarX4::from_bytes_x4(&[K1, K1, K2, K2]);
        let u = FieldElement29x4::from_bytes_x4(&[U1, U2, U1, U2]);
        let r = mul_varbase(&k, &u).reduce_full().to_bytes_x4();

        let k1 = ScalarX4::from_bytes_x4(&[K1; 4]);
        let u2 = FieldElement29x4::from_bytes_x4(&[U2; 4]);
        let lone = mul_varbase(&k1, &u2).reduce_full().to_bytes_x4();
        assert_eq!(r[0], R1);
        assert_eq!(r[1], lone[1]);
        assert_eq!(r[3], R2);
    }
}
