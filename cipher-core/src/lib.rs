// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Hyperpolymath
//
// Cipher Core - deterministic password derivation from a master secret
//
// Building blocks:
// - MD5 / SHA-1 / SHA-2: legacy and current Merkle-Damgard digests
// - SHA-3 / SHAKE / Keccak: 1600-bit sponge family
// - BLAKE2s / BLAKE2b: keyed RFC 7693 digests
// - HMAC: RFC 2104 over any registered digest
// - Derivation engine: legacy v1 and rule-parameterized v2 algorithms
// - Record model: JSON-interchangeable credential entries

pub mod codec;
pub mod engine;
pub mod error;
pub mod hash;
pub mod hmac;
pub mod json;
pub mod record;

pub use codec::*;
pub use engine::*;
pub use error::*;
pub use hash::{Algorithm, HashState};
pub use hmac::*;
pub use record::*;

/// Library version for compatibility checking
pub const CIPHER_VERSION: &str = "0.1.0";

/// Number of symbols in the v2 output table
pub const SYMBOL_TABLE_SIZE: usize = 61;

/// Default derived output length
pub const DEFAULT_LENGTH: usize = record::DEFAULT_OUTPUT_LENGTH;
