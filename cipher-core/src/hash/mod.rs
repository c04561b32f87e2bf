// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Hyperpolymath
//
// Message digest primitives and the name registry that selects them.

pub mod blake2b;
pub mod blake2s;
pub mod md5;
pub mod sha1;
pub mod sha256;
pub mod sha3;
pub mod sha512;

use crate::error::CipherResult;

pub use blake2b::Blake2b;
pub use blake2s::Blake2s;
pub use md5::Md5;
pub use sha1::Sha1;
pub use sha256::Sha256;
pub use sha3::Sha3;
pub use sha512::Sha512;

/// Descriptor for every supported digest. Carries no state; call
/// [`Algorithm::state`] to obtain a fresh running hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Sha512_224,
    Sha512_256,
    Sha3_224,
    Sha3_256,
    Sha3_384,
    Sha3_512,
    Shake128,
    Shake256,
    Keccak224,
    Keccak256,
    Keccak384,
    Keccak512,
    Blake2s128,
    Blake2s160,
    Blake2s224,
    Blake2s256,
    Blake2b160,
    Blake2b256,
    Blake2b384,
    Blake2b512,
}

impl Algorithm {
    /// Resolve a stored hash name to a descriptor. Matching is exact:
    /// only the all-lower and all-upper spellings of the historical
    /// names resolve, and any other input falls back to MD5 so that a
    /// record with a corrupt name still derives something rather than
    /// failing.
    pub fn lookup(name: &str) -> Self {
        match name {
            "md5" | "MD5" => Self::Md5,
            "sha1" | "SHA1" => Self::Sha1,
            "sha256" | "SHA256" => Self::Sha256,
            "sha224" | "SHA224" => Self::Sha224,
            "sha512" | "SHA512" => Self::Sha512,
            "sha384" | "SHA384" => Self::Sha384,
            "sha3" | "SHA3" => Self::Sha3_512,
            "blake2s" | "BLAKE2S" => Self::Blake2s256,
            "blake2b" | "BLAKE2B" => Self::Blake2b512,
            _ => Self::Md5,
        }
    }

    pub fn block_size(&self) -> usize {
        match self {
            Self::Md5 | Self::Sha1 | Self::Sha224 | Self::Sha256 => 64,
            Self::Sha384 | Self::Sha512 | Self::Sha512_224 | Self::Sha512_256 => 128,
            Self::Sha3_224 | Self::Keccak224 => 144,
            Self::Sha3_256 | Self::Keccak256 | Self::Shake256 => 136,
            Self::Sha3_384 | Self::Keccak384 => 104,
            Self::Sha3_512 | Self::Keccak512 => 72,
            Self::Shake128 => 168,
            Self::Blake2s128 | Self::Blake2s160 | Self::Blake2s224 | Self::Blake2s256 => 64,
            Self::Blake2b160 | Self::Blake2b256 | Self::Blake2b384 | Self::Blake2b512 => 128,
        }
    }

    pub fn digest_size(&self) -> usize {
        match self {
            Self::Md5 | Self::Blake2s128 | Self::Shake128 => 16,
            Self::Sha1 | Self::Blake2s160 | Self::Blake2b160 => 20,
            Self::Sha224 | Self::Sha512_224 | Self::Sha3_224 | Self::Keccak224
            | Self::Blake2s224 => 28,
            Self::Sha256 | Self::Sha512_256 | Self::Sha3_256 | Self::Keccak256
            | Self::Shake256 | Self::Blake2s256 | Self::Blake2b256 => 32,
            Self::Sha384 | Self::Sha3_384 | Self::Keccak384 | Self::Blake2b384 => 48,
            Self::Sha512 | Self::Sha3_512 | Self::Keccak512 | Self::Blake2b512 => 64,
        }
    }

    /// Fresh running state for this descriptor.
    pub fn state(&self) -> HashState {
        match self {
            Self::Md5 => HashState::Md5(Md5::new()),
            Self::Sha1 => HashState::Sha1(Sha1::new()),
            Self::Sha224 => HashState::Sha256(Sha256::sha224()),
            Self::Sha256 => HashState::Sha256(Sha256::sha256()),
            Self::Sha384 => HashState::Sha512(Sha512::sha384()),
            Self::Sha512 => HashState::Sha512(Sha512::sha512()),
            Self::Sha512_224 => HashState::Sha512(Sha512::sha512_224()),
            Self::Sha512_256 => HashState::Sha512(Sha512::sha512_256()),
            Self::Sha3_224 => HashState::Sha3(Sha3::sha3_224()),
            Self::Sha3_256 => HashState::Sha3(Sha3::sha3_256()),
            Self::Sha3_384 => HashState::Sha3(Sha3::sha3_384()),
            Self::Sha3_512 => HashState::Sha3(Sha3::sha3_512()),
            Self::Shake128 => HashState::Sha3(Sha3::shake128()),
            Self::Shake256 => HashState::Sha3(Sha3::shake256()),
            Self::Keccak224 => HashState::Sha3(Sha3::keccak224()),
            Self::Keccak256 => HashState::Sha3(Sha3::keccak256()),
            Self::Keccak384 => HashState::Sha3(Sha3::keccak384()),
            Self::Keccak512 => HashState::Sha3(Sha3::keccak512()),
            Self::Blake2s128 => HashState::Blake2s(Blake2s::blake2s_128()),
            Self::Blake2s160 => HashState::Blake2s(Blake2s::blake2s_160()),
            Self::Blake2s224 => HashState::Blake2s(Blake2s::blake2s_224()),
            Self::Blake2s256 => HashState::Blake2s(Blake2s::blake2s_256()),
            Self::Blake2b160 => HashState::Blake2b(Blake2b::blake2b_160()),
            Self::Blake2b256 => HashState::Blake2b(Blake2b::blake2b_256()),
            Self::Blake2b384 => HashState::Blake2b(Blake2b::blake2b_384()),
            Self::Blake2b512 => HashState::Blake2b(Blake2b::blake2b_512()),
        }
    }
}

/// Running digest state behind a uniform update/finalize surface.
#[derive(Clone)]
pub enum HashState {
    Md5(Md5),
    Sha1(Sha1),
    Sha256(Sha256),
    Sha512(Sha512),
    Sha3(Sha3),
    Blake2s(Blake2s),
    Blake2b(Blake2b),
}

impl HashState {
    pub fn update(&mut self, data: &[u8]) -> CipherResult<()> {
        match self {
            Self::Md5(h) => h.update(data),
            Self::Sha1(h) => h.update(data),
            Self::Sha256(h) => h.update(data),
            Self::Sha512(h) => h.update(data),
            Self::Sha3(h) => h.update(data),
            Self::Blake2s(h) => h.update(data),
            Self::Blake2b(h) => h.update(data),
        }
    }

    pub fn finalize(&mut self) -> CipherResult<Vec<u8>> {
        match self {
            Self::Md5(h) => h.finalize().map(|d| d.to_vec()),
            Self::Sha1(h) => h.finalize().map(|d| d.to_vec()),
            Self::Sha256(h) => h.finalize(),
            Self::Sha512(h) => h.finalize(),
            Self::Sha3(h) => h.finalize(),
            Self::Blake2s(h) => h.finalize(),
            Self::Blake2b(h) => h.finalize(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_names() {
        assert_eq!(Algorithm::lookup("md5"), Algorithm::Md5);
        assert_eq!(Algorithm::lookup("MD5"), Algorithm::Md5);
        assert_eq!(Algorithm::lookup("sha1"), Algorithm::Sha1);
        assert_eq!(Algorithm::lookup("SHA256"), Algorithm::Sha256);
        assert_eq!(Algorithm::lookup("sha224"), Algorithm::Sha224);
        assert_eq!(Algorithm::lookup("SHA512"), Algorithm::Sha512);
        assert_eq!(Algorithm::lookup("sha384"), Algorithm::Sha384);
        assert_eq!(Algorithm::lookup("sha3"), Algorithm::Sha3_512);
        assert_eq!(Algorithm::lookup("blake2s"), Algorithm::Blake2s256);
        assert_eq!(Algorithm::lookup("BLAKE2B"), Algorithm::Blake2b512);
    }

    #[test]
    fn test_lookup_falls_back_to_md5() {
        assert_eq!(Algorithm::lookup(""), Algorithm::Md5);
        assert_eq!(Algorithm::lookup("Sha256"), Algorithm::Md5);
        assert_eq!(Algorithm::lookup("sha-256"), Algorithm::Md5);
        assert_eq!(Algorithm::lookup("whirlpool"), Algorithm::Md5);
    }

    #[test]
    fn test_descriptor_sizes() {
        assert_eq!(Algorithm::Md5.block_size(), 64);
        assert_eq!(Algorithm::Md5.digest_size(), 16);
        assert_eq!(Algorithm::Sha512.block_size(), 128);
        assert_eq!(Algorithm::Sha3_512.block_size(), 72);
        assert_eq!(Algorithm::Shake128.block_size(), 168);
        assert_eq!(Algorithm::Blake2b512.digest_size(), 64);
    }

    #[test]
    fn test_state_dispatch_matches_direct_use() {
        let mut via_enum = Algorithm::Sha256.state();
        via_enum.update(b"abc").unwrap();
        let mut direct = Sha256::sha256();
        direct.update(b"abc").unwrap();
        assert_eq!(via_enum.finalize().unwrap(), direct.finalize().unwrap());
    }
}
