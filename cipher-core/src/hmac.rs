// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Hyperpolymath
//
// RFC 2104 HMAC over any registered digest.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CipherResult;
use crate::hash::{Algorithm, HashState};

const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5C;

/// Keyed-hash message authentication context. The padded key block is
/// wiped when the context drops.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Hmac {
    #[zeroize(skip)]
    algorithm: Algorithm,
    #[zeroize(skip)]
    inner: HashState,
    key_block: Vec<u8>,
}

impl Hmac {
    /// Build a context for `algorithm` keyed with `key`. Keys longer
    /// than the digest's block size are hashed down to digest size
    /// first; shorter keys, including the empty key, are zero-padded.
    pub fn new(algorithm: Algorithm, key: &[u8]) -> CipherResult<Self> {
        let block_size = algorithm.block_size();
        let mut key_block = vec![0u8; block_size];

        if key.len() > block_size {
            let mut h = algorithm.state();
            h.update(key)?;
            let digest = h.finalize()?;
            key_block[..digest.len()].copy_from_slice(&digest);
        } else {
            key_block[..key.len()].copy_from_slice(key);
        }

        let mut inner = algorithm.state();
        let mut pad: Vec<u8> = key_block.iter().map(|b| b ^ IPAD).collect();
        let seeded = inner.update(&pad);
        pad.zeroize();
        seeded?;

        Ok(Self {
            algorithm,
            inner,
            key_block,
        })
    }

    pub fn digest_size(&self) -> usize {
        self.algorithm.digest_size()
    }

    pub fn update(&mut self, data: &[u8]) -> CipherResult<()> {
        self.inner.update(data)
    }

    /// Produce the tag. Single use: the inner state rejects a second
    /// finalization.
    pub fn finalize(&mut self) -> CipherResult<Vec<u8>> {
        let inner_digest = self.inner.finalize()?;

        let mut outer = self.algorithm.state();
        let mut pad: Vec<u8> = self.key_block.iter().map(|b| b ^ OPAD).collect();
        let seeded = outer.update(&pad);
        pad.zeroize();
        seeded?;
        outer.update(&inner_digest)?;
        outer.finalize()
    }
}

/// One-shot HMAC of `data` under `key`.
pub fn hmac(algorithm: Algorithm, key: &[u8], data: &[u8]) -> CipherResult<Vec<u8>> {
    let mut ctx = Hmac::new(algorithm, key)?;
    ctx.update(data)?;
    ctx.finalize()
}
