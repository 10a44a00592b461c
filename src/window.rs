// -*- mode: rust; -*-
//
// This file is part of quad25519.
// See LICENSE for licensing information.

//! Constant-time lookup tables of basepoint multiples.
//!
//! The precomputed points are stored in Duif form,
//! \\( ((Y+X)/2, (Y-X)/2, dXY) \\), which saves a multiply in the unified
//! mixed addition; the halving folds the usual factor of 2 into the table.
//! Coordinates are kept as four 64-bit little-endian chunks and only
//! unpacked into limb form after selection.

use crate::backend::vector::u64x4;
use crate::constants::ONE_HALF_CHUNKS;
use crate::field::FieldElement29x4;

/// One precomputed point in chunk-packed Duif form.
pub(crate) struct AffineDuif {
    pub(crate) y_plus_x: [u64; 4],
    pub(crate) y_minus_x: [u64; 4],
    pub(crate) xy_d: [u64; 4],
}

/// A selected table entry, unpacked to limb form, per lane.
///
/// The neutral element is \\((1/2, 1/2, 0)\\): the Edwards identity
/// \\((0, 1)\\) pushed through the Duif map.
pub(crate) struct DuifPoint {
    pub(crate) y_plus_x: FieldElement29x4,
    pub(crate) y_minus_x: FieldElement29x4,
    pub(crate) xy_d: FieldElement29x4,
}

/// Eight multiples \\(1P, 2P, \ldots, 8P\\) of one column's base point.
pub(crate) struct LookupTable(pub(crate) [AffineDuif; 8]);

impl LookupTable {
    /// Given a lane vector of signed nibbles \\(b \in [-8, 7]\\) (as masked
    /// i8 bytes), return \\(bP\\) per lane.
    ///
    /// Every lane reads all eight rows; selection is by mask, never by
    /// address.  Lanes wanting different magnitudes therefore cost nothing
    /// extra and leak nothing.
    pub(crate) fn select(&self, b: u64x4) -> DuifPoint {
        let one = u64x4::splat(1);

        // m = |b|, then nine masks: masks[j] is all-ones on lanes with
        // m == j.  (m ^ j) - 1 only borrows into bit 32 when m == j, so
        // shifting down 32 and spreading fills the lane.
        let babs = b.abs_bytes();
        let mut masks = [u64x4::zero(); 9];
        let mut index = u64x4::zero();
        for mask in masks.iter_mut() {
            *mask = ((babs ^ index) - one).shr::<32>().spread_low32();
            index = index + one;
        }

        // Accumulate the one matching row per lane, chunk by chunk.  Row 0
        // is the neutral (1/2, 1/2, 0).
        let mut xp = [u64x4::zero(); 4];
        let mut yp = [u64x4::zero(); 4];
        let mut zp = [u64x4::zero(); 4];
        for i in 0..4 {
            let half = masks[0] & u64x4::splat(ONE_HALF_CHUNKS[i]);
            xp[i] = half;
            yp[i] = half;
            for (j, row) in self.0.iter().enumerate() {
                xp[i] = xp[i] ^ (masks[j + 1] & u64x4::splat(row.y_plus_x[i]));
                yp[i] = yp[i] ^ (masks[j + 1] & u64x4::splat(row.y_minus_x[i]));
                zp[i] = zp[i] ^ (masks[j + 1] & u64x4::splat(row.xy_d[i]));
            }
        }

        // Sign fix: negating an Edwards point swaps (Y+X)/2 with (Y-X)/2
        // and negates dXY.  Both are masked on the nibble's sign bit.
        let bsign = b.shr::<7>() & one;
        let bmask = u64x4::zero() - bsign;
        for i in 0..4 {
            let t = (xp[i] ^ yp[i]) & bmask;
            xp[i] = xp[i] ^ t;
            yp[i] = yp[i] ^ t;
        }

        let y_plus_x = FieldElement29x4::from_packed_chunks(&xp);
        let y_minus_x = FieldElement29x4::from_packed_chunks(&yp);
        let mut xy_d = FieldElement29x4::from_packed_chunks(&zp);
        let mut neg_xy_d = FieldElement29x4::zero().sub(&xy_d);
        FieldElement29x4::conditional_swap(&mut xy_d, &mut neg_xy_d, bsign);

        DuifPoint {
            y_plus_x,
            y_minus_x,
            xy_d,
        }
    }
}

/// The full fixed-base table: column \\(j\\) holds the eight multiples of
/// \\(256^j B\\), so a radix-16 signed digit at position \\(i\\) selects
/// from column \\(i/2\\).
pub(crate) struct BasepointTable(pub(crate) [LookupTable; 32]);
