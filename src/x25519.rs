// -*- mode: rust; -*-
//
// This file is part of quad25519.
// See LICENSE for licensing information.

//! The batched X25519 Diffie-Hellman interface.
//!
//! Everything here works on *batches*: four independent 32-byte keys that
//! travel through the curve arithmetic together, one per SIMD lane.  A
//! batch position is just a user slot; nothing ever mixes lanes.

use rand_core::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::edwards;
use crate::field::FieldElement29x4;
use crate::montgomery;
use crate::scalar::ScalarX4;

/// The X25519 basepoint, `u = 9`, for use with the bare [`shared_secret`]
/// function.
pub const X25519_BASEPOINT_BYTES: [u8; 32] = [
    9, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0,
];

/// Compute the four public keys for four secret keys.
///
/// Each secret key is clamped internally, so any 32 random bytes are a
/// valid input.  The returned public keys are the RFC 7748 little-endian
/// `u`-coordinates of `k * B`.
pub fn keygen(sk: &[[u8; 32]; 4]) -> [[u8; 32]; 4] {
    let k = ScalarX4::from_bytes_x4(sk);
    edwards::mul_fixbase(&k).reduce_full().to_bytes_x4()
}

/// Compute four shared secrets from four secret keys and the four peer
/// public keys in the matching lanes.
///
/// The peer coordinates are interpreted modulo \\(2^{255}\\) (their high
/// bit is ignored), per RFC 7748.  No low-order-point filtering happens
/// here; callers who need contributory behaviour should check
/// [`SharedSecretBatch::was_contributory`].
pub fn shared_secret(sk: &[[u8; 32]; 4], pk: &[[u8; 32]; 4]) -> [[u8; 32]; 4] {
    let k = ScalarX4::from_bytes_x4(sk);
    let u = FieldElement29x4::from_bytes_x4(pk);
    montgomery::mul_varbase(&k, &u).reduce_full().to_bytes_x4()
}

/// Four X25519 secret keys, one per batch lane.
///
/// The bytes are wiped on drop.  Clamping happens at use, not at
/// construction, so the stored bytes round-trip through
/// [`to_bytes`](Self::to_bytes).
#[derive(Clone)]
pub struct StaticSecretBatch([[u8; 32]; 4]);

impl StaticSecretBatch {
    /// Generate four fresh secret keys from the supplied RNG.
    pub fn random_from_rng<R: RngCore + CryptoRng>(csprng: &mut R) -> Self {
        let mut bytes = [[0u8; 32]; 4];
        for lane in bytes.iter_mut() {
            csprng.fill_bytes(lane);
        }
        StaticSecretBatch(bytes)
    }

    /// Perform the four Diffie-Hellman key agreements between `self` and
    /// the peers' public keys.
    pub fn diffie_hellman(&self, their_public: &PublicKeyBatch) -> SharedSecretBatch {
        SharedSecretBatch(shared_secret(&self.0, &their_public.0))
    }

    /// Extract this batch as byte arrays.
    pub fn to_bytes(&self) -> [[u8; 32]; 4] {
        self.0
    }

    /// View this batch as byte arrays.
    pub fn as_bytes(&self) -> &[[u8; 32]; 4] {
        &self.0
    }
}

impl From<[[u8; 32]; 4]> for StaticSecretBatch {
    /// Load four secret keys from their byte representations.
    fn from(bytes: [[u8; 32]; 4]) -> StaticSecretBatch {
        StaticSecretBatch(bytes)
    }
}

impl Drop for StaticSecretBatch {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl ZeroizeOnDrop for StaticSecretBatch {}

/// Four X25519 public keys, one per batch lane.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug)]
pub struct PublicKeyBatch([[u8; 32]; 4]);

impl PublicKeyBatch {
    /// Extract this batch as byte arrays.
    pub fn to_bytes(&self) -> [[u8; 32]; 4] {
        self.0
    }

    /// View this batch as byte arrays.
    pub fn as_bytes(&self) -> &[[u8; 32]; 4] {
        &self.0
    }
}

impl From<[[u8; 32]; 4]> for PublicKeyBatch {
    /// Given four byte arrays, construct the corresponding public keys.
    fn from(bytes: [[u8; 32]; 4]) -> PublicKeyBatch {
        PublicKeyBatch(bytes)
    }
}

impl From<&StaticSecretBatch> for PublicKeyBatch {
    /// Compute the public keys corresponding to four secret keys.
    fn from(secret: &StaticSecretBatch) -> PublicKeyBatch {
        PublicKeyBatch(keygen(&secret.0))
    }
}

impl ConstantTimeEq for PublicKeyBatch {
    fn ct_eq(&self, other: &PublicKeyBatch) -> subtle::Choice {
        self.0[0].ct_eq(&other.0[0])
            & self.0[1].ct_eq(&other.0[1])
            & self.0[2].ct_eq(&other.0[2])
            & self.0[3].ct_eq(&other.0[3])
    }
}

impl PartialEq for PublicKeyBatch {
    fn eq(&self, other: &PublicKeyBatch) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for PublicKeyBatch {}

/// Four shared secrets, one per batch lane.  Wiped on drop.
pub struct SharedSecretBatch([[u8; 32]; 4]);

impl SharedSecretBatch {
    /// Extract this batch as byte arrays.
    pub fn to_bytes(&self) -> [[u8; 32]; 4] {
        self.0
    }

    /// View this batch as byte arrays.
    pub fn as_bytes(&self) -> &[[u8; 32]; 4] {
        &self.0
    }

    /// Per lane, whether the key exchange was contributory: `false` where
    /// the shared secret is all zero, i.e. the peer fed a low-order point
    /// into that lane.
    ///
    /// The exchange itself never rejects low-order points; protocols that
    /// require contributory behaviour must check this themselves.
    pub fn was_contributory(&self) -> [bool; 4] {
        let zero = [0u8; 32];
        core::array::from_fn(|i| !bool::from(self.0[i].ct_eq(&zero)))
    }
}

impl Drop for SharedSecretBatch {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl ZeroizeOnDrop for SharedSecretBatch {}
