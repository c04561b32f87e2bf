// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Hyperpolymath
//
// FIPS 202 compliant SHA-3/SHAKE sponge, plus the pre-standard Keccak
// padding variant. One state type serves every capacity; variants differ
// in rate, digest size, and domain-separation suffix.

use crate::error::{CipherError, CipherResult};

const SPONGE_WORDS: usize = 25;
const SPONGE_BYTES: usize = SPONGE_WORDS * 8;

const SUFFIX_SHA3: u8 = 0x06;
const SUFFIX_KECCAK: u8 = 0x01;
const SUFFIX_SHAKE: u8 = 0x1F;

#[rustfmt::skip]
const ROUND_CONSTANTS: [u64; 24] = [
    0x0000000000000001, 0x0000000000008082, 0x800000000000808A, 0x8000000080008000,
    0x000000000000808B, 0x0000000080000001, 0x8000000080008081, 0x8000000000008009,
    0x000000000000008A, 0x0000000000000088, 0x0000000080008009, 0x000000008000000A,
    0x000000008000808B, 0x800000000000008B, 0x8000000000008089, 0x8000000000008003,
    0x8000000000008002, 0x8000000000000080, 0x000000000000800A, 0x800000008000000A,
    0x8000000080008081, 0x8000000000008080, 0x0000000080000001, 0x8000000080008008,
];

#[rustfmt::skip]
const PI_LANES: [usize; 24] = [
    10,  7, 11, 17, 18,  3,  5, 16,
     8, 21, 24,  4, 15, 23, 19, 13,
    12,  2, 20, 14, 22,  9,  6,  1,
];

#[rustfmt::skip]
const ROTATIONS: [u32; 24] = [
     1,  3,  6, 10, 15, 21, 28, 36,
    45, 55,  2, 14, 27, 41, 56,  8,
    25, 43, 62, 18, 39, 61, 20, 44,
];

fn keccakf(s: &mut [u64; SPONGE_WORDS]) {
    for &rc in &ROUND_CONSTANTS {
        // Theta
        let mut bc = [0u64; 5];
        for (i, col) in bc.iter_mut().enumerate() {
            *col = s[i] ^ s[i + 5] ^ s[i + 10] ^ s[i + 15] ^ s[i + 20];
        }
        for i in 0..5 {
            let t = bc[(i + 4) % 5] ^ bc[(i + 1) % 5].rotate_left(1);
            for j in (0..SPONGE_WORDS).step_by(5) {
                s[j + i] ^= t;
            }
        }
        // Rho Pi
        let mut t = s[1];
        for (&lane, &rot) in PI_LANES.iter().zip(&ROTATIONS) {
            let saved = s[lane];
            s[lane] = t.rotate_left(rot);
            t = saved;
        }
        // Chi
        for j in (0..SPONGE_WORDS).step_by(5) {
            let row: [u64; 5] = s[j..j + 5].try_into().unwrap();
            for i in 0..5 {
                s[j + i] ^= !row[(i + 1) % 5] & row[(i + 2) % 5];
            }
        }
        // Iota
        s[0] ^= rc;
    }
}

/// SHA-3 family sponge state. Fixed-output variants are single use;
/// SHAKE variants may be squeezed repeatedly once the absorb phase is
/// sealed by the first squeeze.
#[derive(Clone)]
pub struct Sha3 {
    lanes: [u64; SPONGE_WORDS],
    rate: usize,
    digest_size: usize,
    suffix: u8,
    buffer: [u8; SPONGE_BYTES],
    cursiz: usize,
    squeezed: [u8; SPONGE_BYTES],
    cursor: usize,
    xof_started: bool,
    finalized: bool,
}

impl Sha3 {
    // `bits` is the security strength; the capacity is twice that.
    fn with_params(bits: usize, digest_size: usize, suffix: u8) -> Self {
        Self {
            lanes: [0u64; SPONGE_WORDS],
            rate: SPONGE_BYTES - bits / 4,
            digest_size,
            suffix,
            buffer: [0u8; SPONGE_BYTES],
            cursiz: 0,
            squeezed: [0u8; SPONGE_BYTES],
            cursor: 0,
            xof_started: false,
            finalized: false,
        }
    }

    pub fn sha3_224() -> Self {
        Self::with_params(224, 28, SUFFIX_SHA3)
    }

    pub fn sha3_256() -> Self {
        Self::with_params(256, 32, SUFFIX_SHA3)
    }

    pub fn sha3_384() -> Self {
        Self::with_params(384, 48, SUFFIX_SHA3)
    }

    pub fn sha3_512() -> Self {
        Self::with_params(512, 64, SUFFIX_SHA3)
    }

    pub fn keccak224() -> Self {
        Self::with_params(224, 28, SUFFIX_KECCAK)
    }

    pub fn keccak256() -> Self {
        Self::with_params(256, 32, SUFFIX_KECCAK)
    }

    pub fn keccak384() -> Self {
        Self::with_params(384, 48, SUFFIX_KECCAK)
    }

    pub fn keccak512() -> Self {
        Self::with_params(512, 64, SUFFIX_KECCAK)
    }

    pub fn shake128() -> Self {
        Self::with_params(128, 16, SUFFIX_SHAKE)
    }

    pub fn shake256() -> Self {
        Self::with_params(256, 32, SUFFIX_SHAKE)
    }

    pub fn digest_size(&self) -> usize {
        self.digest_size
    }

    pub fn is_xof(&self) -> bool {
        self.suffix == SUFFIX_SHAKE
    }

    fn absorb_buffer(&mut self) {
        for i in 0..self.rate / 8 {
            let word = u64::from_le_bytes(self.buffer[i * 8..i * 8 + 8].try_into().unwrap());
            self.lanes[i] ^= word;
        }
        keccakf(&mut self.lanes);
        self.cursiz = 0;
    }

    fn serialize_state(&mut self) {
        for (i, lane) in self.lanes.iter().enumerate() {
            self.squeezed[i * 8..i * 8 + 8].copy_from_slice(&lane.to_le_bytes());
        }
    }

    fn seal(&mut self) {
        self.buffer[self.cursiz..self.rate].fill(0);
        self.buffer[self.cursiz] = self.suffix;
        self.buffer[self.rate - 1] |= 0x80;
        for i in 0..self.rate / 8 {
            let word = u64::from_le_bytes(self.buffer[i * 8..i * 8 + 8].try_into().unwrap());
            self.lanes[i] ^= word;
        }
        keccakf(&mut self.lanes);
        self.serialize_state();
    }

    pub fn update(&mut self, data: &[u8]) -> CipherResult<()> {
        if self.finalized || self.xof_started {
            return Err(CipherError::HashStateReuse);
        }
        for &b in data {
            self.buffer[self.cursiz] = b;
            self.cursiz += 1;
            if self.cursiz == self.rate {
                self.absorb_buffer();
            }
        }
        Ok(())
    }

    /// Fixed-output finalization (SHA-3 and Keccak variants).
    pub fn finalize(&mut self) -> CipherResult<Vec<u8>> {
        if self.is_xof() {
            let mut out = vec![0u8; self.digest_size];
            self.squeeze(&mut out)?;
            return Ok(out);
        }
        if self.finalized {
            return Err(CipherError::HashStateReuse);
        }
        self.finalized = true;
        self.seal();
        Ok(self.squeezed[..self.digest_size].to_vec())
    }

    /// Extendable-output read; may be called repeatedly on SHAKE states.
    /// The first call seals the absorb phase; later calls continue from
    /// the current sponge cursor.
    pub fn squeeze(&mut self, out: &mut [u8]) -> CipherResult<()> {
        if !self.is_xof() {
            return Err(CipherError::HashStateReuse);
        }
        if !self.xof_started {
            self.seal();
            self.cursor = 0;
            self.xof_started = true;
        }
        for byte in out.iter_mut() {
            if self.cursor == self.rate {
                keccakf(&mut self.lanes);
                self.serialize_state();
                self.cursor = 0;
            }
            *byte = self.squeezed[self.cursor];
            self.cursor += 1;
        }
        Ok(())
    }
}
