// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Hyperpolymath
//
// RFC 7693 compliant BLAKE2s implementation with optional keying.

use crate::error::{CipherError, CipherResult};

pub const BLAKE2S_BLOCK_SIZE: usize = 64;
pub const BLAKE2S_MAX_DIGEST_SIZE: usize = 32;

const IV: [u32; 8] = [
    0x6A09_E667,
    0xBB67_AE85,
    0x3C6E_F372,
    0xA54F_F53A,
    0x510E_527F,
    0x9B05_688C,
    0x1F83_D9AB,
    0x5BE0_CD19,
];

#[rustfmt::skip]
const SIGMA: [[usize; 16]; 10] = [
    [0x0, 0x1, 0x2, 0x3, 0x4, 0x5, 0x6, 0x7, 0x8, 0x9, 0xA, 0xB, 0xC, 0xD, 0xE, 0xF],
    [0xE, 0xA, 0x4, 0x8, 0x9, 0xF, 0xD, 0x6, 0x1, 0xC, 0x0, 0x2, 0xB, 0x7, 0x5, 0x3],
    [0xB, 0x8, 0xC, 0x0, 0x5, 0x2, 0xF, 0xD, 0xA, 0xE, 0x3, 0x6, 0x7, 0x1, 0x9, 0x4],
    [0x7, 0x9, 0x3, 0x1, 0xD, 0xC, 0xB, 0xE, 0x2, 0x6, 0x5, 0xA, 0x4, 0x0, 0xF, 0x8],
    [0x9, 0x0, 0x5, 0x7, 0x2, 0x4, 0xA, 0xF, 0xE, 0x1, 0xB, 0xC, 0x6, 0x8, 0x3, 0xD],
    [0x2, 0xC, 0x6, 0xA, 0x0, 0xB, 0x8, 0x3, 0x4, 0xD, 0x7, 0x5, 0xF, 0xE, 0x1, 0x9],
    [0xC, 0x5, 0x1, 0xF, 0xE, 0xD, 0x4, 0xA, 0x0, 0x7, 0x6, 0x3, 0x9, 0x2, 0x8, 0xB],
    [0xD, 0xB, 0x7, 0xE, 0xC, 0x1, 0x3, 0x9, 0x5, 0x0, 0xF, 0x4, 0x8, 0x6, 0x2, 0xA],
    [0x6, 0xF, 0xE, 0x9, 0xB, 0x3, 0x0, 0x8, 0xC, 0x2, 0xD, 0x7, 0x1, 0x4, 0xA, 0x5],
    [0xA, 0x2, 0x8, 0x4, 0x7, 0x6, 0x1, 0x5, 0xF, 0xB, 0x9, 0xE, 0x3, 0xC, 0xD, 0x0],
];

/// BLAKE2s running state. Digest size is chosen at init time, up to 32
/// bytes, optionally keyed with up to one block of key material.
#[derive(Clone)]
pub struct Blake2s {
    state: [u32; 8],
    counter: [u32; 2],
    flags: [u32; 2],
    buffer: [u8; BLAKE2S_BLOCK_SIZE],
    cursiz: usize,
    digest_size: usize,
}

impl Blake2s {
    pub fn new(digest_size: usize, key: &[u8]) -> CipherResult<Self> {
        if digest_size == 0 || digest_size > BLAKE2S_MAX_DIGEST_SIZE {
            return Err(CipherError::InvalidDigestSize);
        }
        if key.len() > BLAKE2S_BLOCK_SIZE {
            return Err(CipherError::InvalidKeySize);
        }

        Ok(Self::with_params(digest_size, key))
    }

    fn with_params(digest_size: usize, key: &[u8]) -> Self {
        let mut param = [0u8; 32];
        param[0] = digest_size as u8;
        param[1] = key.len() as u8;
        param[2] = 1; // fanout
        param[3] = 1; // depth

        let mut state = IV;
        for (word, chunk) in state.iter_mut().zip(param.chunks_exact(4)) {
            *word ^= u32::from_le_bytes(chunk.try_into().unwrap());
        }

        let mut ctx = Self {
            state,
            counter: [0; 2],
            flags: [0; 2],
            buffer: [0u8; BLAKE2S_BLOCK_SIZE],
            cursiz: 0,
            digest_size,
        };

        if !key.is_empty() {
            // Keyed mode prepends the key as a zero-padded first block.
            ctx.buffer[..key.len()].copy_from_slice(key);
            ctx.cursiz = BLAKE2S_BLOCK_SIZE;
        }

        ctx
    }

    pub fn blake2s_128() -> Self {
        Self::with_params(16, &[])
    }

    pub fn blake2s_160() -> Self {
        Self::with_params(20, &[])
    }

    pub fn blake2s_224() -> Self {
        Self::with_params(28, &[])
    }

    pub fn blake2s_256() -> Self {
        Self::with_params(32, &[])
    }

    pub fn digest_size(&self) -> usize {
        self.digest_size
    }

    fn increment_counter(&mut self, inc: u32) {
        self.counter[0] = self.counter[0].wrapping_add(inc);
        if self.counter[0] < inc {
            self.counter[1] = self.counter[1].wrapping_add(1);
        }
    }

    fn compress(&mut self, block: &[u8]) {
        let mut m = [0u32; 16];
        for (i, word) in m.iter_mut().enumerate() {
            *word = u32::from_le_bytes(block[i * 4..i * 4 + 4].try_into().unwrap());
        }

        let mut v = [0u32; 16];
        v[..8].copy_from_slice(&self.state);
        v[8..12].copy_from_slice(&IV[..4]);
        v[12] = self.counter[0] ^ IV[4];
        v[13] = self.counter[1] ^ IV[5];
        v[14] = self.flags[0] ^ IV[6];
        v[15] = self.flags[1] ^ IV[7];

        macro_rules! g {
            ($r:expr, $i:expr, $a:expr, $b:expr, $c:expr, $d:expr) => {
                v[$a] = v[$a]
                    .wrapping_add(v[$b])
                    .wrapping_add(m[SIGMA[$r][2 * $i]]);
                v[$d] = (v[$d] ^ v[$a]).rotate_right(16);
                v[$c] = v[$c].wrapping_add(v[$d]);
                v[$b] = (v[$b] ^ v[$c]).rotate_right(12);
                v[$a] = v[$a]
                    .wrapping_add(v[$b])
                    .wrapping_add(m[SIGMA[$r][2 * $i + 1]]);
                v[$d] = (v[$d] ^ v[$a]).rotate_right(8);
                v[$c] = v[$c].wrapping_add(v[$d]);
                v[$b] = (v[$b] ^ v[$c]).rotate_right(7);
            };
        }

        for r in 0..10 {
            g!(r, 0, 0, 4, 8, 12);
            g!(r, 1, 1, 5, 9, 13);
            g!(r, 2, 2, 6, 10, 14);
            g!(r, 3, 3, 7, 11, 15);
            g!(r, 4, 0, 5, 10, 15);
            g!(r, 5, 1, 6, 11, 12);
            g!(r, 6, 2, 7, 8, 13);
            g!(r, 7, 3, 4, 9, 14);
        }

        for i in 0..8 {
            self.state[i] ^= v[i] ^ v[i + 8];
        }
    }

    /// Absorb data. The buffer is compressed only once it overflows, so
    /// a block-aligned tail entering through the overflow path is
    /// consumed eagerly while a tail that still fits stays buffered for
    /// the final block.
    pub fn update(&mut self, data: &[u8]) -> CipherResult<()> {
        if self.flags[0] != 0 {
            return Err(CipherError::HashStateReuse);
        }
        let mut p = data;
        let free = BLAKE2S_BLOCK_SIZE - self.cursiz;
        if p.len() > free {
            self.buffer[self.cursiz..].copy_from_slice(&p[..free]);
            self.increment_counter(BLAKE2S_BLOCK_SIZE as u32);
            let buffer = self.buffer;
            self.compress(&buffer);
            self.cursiz = 0;
            p = &p[free..];
            while p.len() > BLAKE2S_BLOCK_SIZE - 1 {
                self.increment_counter(BLAKE2S_BLOCK_SIZE as u32);
                let (block, rest) = p.split_at(BLAKE2S_BLOCK_SIZE);
                self.compress(block);
                p = rest;
            }
        }
        if !p.is_empty() {
            self.buffer[self.cursiz..self.cursiz + p.len()].copy_from_slice(p);
            self.cursiz += p.len();
        }
        Ok(())
    }

    pub fn finalize(&mut self) -> CipherResult<Vec<u8>> {
        if self.flags[0] != 0 {
            return Err(CipherError::HashStateReuse);
        }
        self.increment_counter(self.cursiz as u32);
        self.flags[0] = u32::MAX;

        self.buffer[self.cursiz..].fill(0);
        let buffer = self.buffer;
        self.compress(&buffer);

        let mut out = [0u8; BLAKE2S_MAX_DIGEST_SIZE];
        for (i, word) in self.state.iter().enumerate() {
            out[i * 4..i * 4 + 4].copy_from_slice(&word.to_le_bytes());
        }
        Ok(out[..self.digest_size].to_vec())
    }
}
