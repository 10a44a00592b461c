// -*- mode: rust; -*-
//
// This file is part of quad25519.
// See LICENSE for licensing information.

//! Pluggable vector backends.
//!
//! Everything above this module is written against the 4-lane contract of
//! [`vector::u64x4`]; the concrete lanes may live in one AVX2 register or
//! in four ordinary integers.

pub(crate) mod vector;
