// -*- mode: rust; -*-
//
// This file is part of quad25519.
// See LICENSE for licensing information.

#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]

//! # quad25519
//!
//! A 4-way batched implementation of the X25519 key-agreement function
//! from [RFC 7748](https://tools.ietf.org/html/rfc7748).
//!
//! Four independent Diffie-Hellman operations execute simultaneously:
//! every field element is spread across the four 64-bit lanes of a vector,
//! and every arithmetic step drives all four users' values in lock-step.
//! Front-end and pipeline costs amortise over the batch, so per-operation
//! throughput is far higher than a serial implementation's, while latency
//! stays within a small factor.
//!
//! On x86-64 with AVX2 enabled at compile time
//! (`RUSTFLAGS="-C target-feature=+avx2"`) the lanes map onto 256-bit
//! registers; elsewhere a portable backend runs the identical algorithms
//! over four scalar integers.
//!
//! ## Example
//!
//! ```
//! use quad25519::{PublicKeyBatch, StaticSecretBatch};
//!
//! let mut rng = rand::thread_rng();
//!
//! // Four clients' keys on one side, four on the other.
//! let client_secrets = StaticSecretBatch::random_from_rng(&mut rng);
//! let client_publics = PublicKeyBatch::from(&client_secrets);
//!
//! let server_secrets = StaticSecretBatch::random_from_rng(&mut rng);
//! let server_publics = PublicKeyBatch::from(&server_secrets);
//!
//! let c = client_secrets.diffie_hellman(&server_publics);
//! let s = server_secrets.diffie_hellman(&client_publics);
//! assert_eq!(c.to_bytes(), s.to_bytes());
//! ```
//!
//! ## Constant-time behaviour
//!
//! No branch and no memory address anywhere in the arithmetic depends on
//! secret data: swaps are XOR-masked, table lookups scan all rows under
//! masks, the ladder always runs 255 iterations, and inversion uses a
//! fixed addition chain.  Each lane's timing is independent of every
//! lane's secrets.

mod backend;
mod constants;
mod edwards;
mod field;
mod montgomery;
mod scalar;
mod window;
mod x25519;

pub use crate::x25519::{
    keygen, shared_secret, PublicKeyBatch, SharedSecretBatch, StaticSecretBatch,
    X25519_BASEPOINT_BYTES,
};
