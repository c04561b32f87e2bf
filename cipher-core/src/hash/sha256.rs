// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Hyperpolymath
//
// FIPS 180-4 compliant SHA-224/SHA-256 implementation

use crate::error::{CipherError, CipherResult};

pub const SHA256_BLOCK_SIZE: usize = 64;
pub const SHA256_DIGEST_SIZE: usize = 32;
pub const SHA224_DIGEST_SIZE: usize = 28;

#[rustfmt::skip]
const K: [u32; 64] = [
    0x428A2F98, 0x71374491, 0xB5C0FBCF, 0xE9B5DBA5,
    0x3956C25B, 0x59F111F1, 0x923F82A4, 0xAB1C5ED5,
    0xD807AA98, 0x12835B01, 0x243185BE, 0x550C7DC3,
    0x72BE5D74, 0x80DEB1FE, 0x9BDC06A7, 0xC19BF174,
    0xE49B69C1, 0xEFBE4786, 0x0FC19DC6, 0x240CA1CC,
    0x2DE92C6F, 0x4A7484AA, 0x5CB0A9DC, 0x76F988DA,
    0x983E5152, 0xA831C66D, 0xB00327C8, 0xBF597FC7,
    0xC6E00BF3, 0xD5A79147, 0x06CA6351, 0x14292967,
    0x27B70A85, 0x2E1B2138, 0x4D2C6DFC, 0x53380D13,
    0x650A7354, 0x766A0ABB, 0x81C2C92E, 0x92722C85,
    0xA2BFE8A1, 0xA81A664B, 0xC24B8B70, 0xC76C51A3,
    0xD192E819, 0xD6990624, 0xF40E3585, 0x106AA070,
    0x19A4C116, 0x1E376C08, 0x2748774C, 0x34B0BCB5,
    0x391C0CB3, 0x4ED8AA4A, 0x5B9CCA4F, 0x682E6FF3,
    0x748F82EE, 0x78A5636F, 0x84C87814, 0x8CC70208,
    0x90BEFFFA, 0xA4506CEB, 0xBEF9A3F7, 0xC67178F2,
];

const SHA256_IV: [u32; 8] = [
    0x6A09_E667,
    0xBB67_AE85,
    0x3C6E_F372,
    0xA54F_F53A,
    0x510E_527F,
    0x9B05_688C,
    0x1F83_D9AB,
    0x5BE0_CD19,
];

const SHA224_IV: [u32; 8] = [
    0xC105_9ED8,
    0x367C_D507,
    0x3070_DD17,
    0xF70E_5939,
    0xFFC0_0B31,
    0x6858_1511,
    0x64F9_8FA7,
    0xBEFA_4FA4,
];

/// SHA-224/SHA-256 running state; the two variants differ only in the
/// initial state and how many digest bytes are emitted.
#[derive(Clone)]
pub struct Sha256 {
    state: [u32; 8],
    length: u64,
    buffer: [u8; SHA256_BLOCK_SIZE],
    cursiz: usize,
    digest_size: usize,
    finalized: bool,
}

impl Sha256 {
    pub fn sha256() -> Self {
        Self::with_iv(SHA256_IV, SHA256_DIGEST_SIZE)
    }

    pub fn sha224() -> Self {
        Self::with_iv(SHA224_IV, SHA224_DIGEST_SIZE)
    }

    fn with_iv(iv: [u32; 8], digest_size: usize) -> Self {
        Self {
            state: iv,
            length: 0,
            buffer: [0u8; SHA256_BLOCK_SIZE],
            cursiz: 0,
            digest_size,
            finalized: false,
        }
    }

    pub fn digest_size(&self) -> usize {
        self.digest_size
    }

    fn compress(&mut self, block: &[u8]) {
        let mut w = [0u32; 64];
        for (i, word) in w.iter_mut().take(16).enumerate() {
            *word = u32::from_be_bytes(block[i * 4..i * 4 + 4].try_into().unwrap());
        }
        for i in 16..64 {
            let s0 = w[i - 15].rotate_right(7) ^ w[i - 15].rotate_right(18) ^ (w[i - 15] >> 3);
            let s1 = w[i - 2].rotate_right(17) ^ w[i - 2].rotate_right(19) ^ (w[i - 2] >> 10);
            w[i] = w[i - 16]
                .wrapping_add(s0)
                .wrapping_add(w[i - 7])
                .wrapping_add(s1);
        }

        let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = self.state;

        for i in 0..64 {
            let s1 = e.rotate_right(6) ^ e.rotate_right(11) ^ e.rotate_right(25);
            let ch = (e & f) ^ (!e & g);
            let t1 = h
                .wrapping_add(s1)
                .wrapping_add(ch)
                .wrapping_add(K[i])
                .wrapping_add(w[i]);
            let s0 = a.rotate_right(2) ^ a.rotate_right(13) ^ a.rotate_right(22);
            let maj = (a & b) ^ (a & c) ^ (b & c);
            let t2 = s0.wrapping_add(maj);

            h = g;
            g = f;
            f = e;
            e = d.wrapping_add(t1);
            d = c;
            c = b;
            b = a;
            a = t1.wrapping_add(t2);
        }

        self.state[0] = self.state[0].wrapping_add(a);
        self.state[1] = self.state[1].wrapping_add(b);
        self.state[2] = self.state[2].wrapping_add(c);
        self.state[3] = self.state[3].wrapping_add(d);
        self.state[4] = self.state[4].wrapping_add(e);
        self.state[5] = self.state[5].wrapping_add(f);
        self.state[6] = self.state[6].wrapping_add(g);
        self.state[7] = self.state[7].wrapping_add(h);
    }

    pub fn update(&mut self, data: &[u8]) -> CipherResult<()> {
        let bits = (data.len() as u64)
            .checked_mul(8)
            .ok_or(CipherError::HashOverflow)?;
        self.length
            .checked_add(bits)
            .ok_or(CipherError::HashOverflow)?;

        let mut p = data;
        while !p.is_empty() {
            if self.cursiz == 0 && p.len() >= SHA256_BLOCK_SIZE {
                let (block, rest) = p.split_at(SHA256_BLOCK_SIZE);
                self.compress(block);
                self.length = self.length.wrapping_add((SHA256_BLOCK_SIZE as u64) * 8);
                p = rest;
            } else {
                let n = (SHA256_BLOCK_SIZE - self.cursiz).min(p.len());
                self.buffer[self.cursiz..self.cursiz + n].copy_from_slice(&p[..n]);
                self.cursiz += n;
                p = &p[n..];
                if self.cursiz == SHA256_BLOCK_SIZE {
                    let buffer = self.buffer;
                    self.compress(&buffer);
                    self.length = self.length.wrapping_add((SHA256_BLOCK_SIZE as u64) * 8);
                    self.cursiz = 0;
                }
            }
        }
        Ok(())
    }

    pub fn finalize(&mut self) -> CipherResult<Vec<u8>> {
        if self.finalized || self.cursiz > SHA256_BLOCK_SIZE {
            return Err(CipherError::HashStateReuse);
        }
        self.finalized = true;

        self.length = self.length.wrapping_add((self.cursiz as u64) * 8);
        self.buffer[self.cursiz] = 0x80;
        self.cursiz += 1;

        if self.cursiz > SHA256_BLOCK_SIZE - 8 {
            self.buffer[self.cursiz..].fill(0);
            let buffer = self.buffer;
            self.compress(&buffer);
            self.cursiz = 0;
        }
        self.buffer[self.cursiz..SHA256_BLOCK_SIZE - 8].fill(0);
        self.buffer[SHA256_BLOCK_SIZE - 8..].copy_from_slice(&self.length.to_be_bytes());
        let buffer = self.buffer;
        self.compress(&buffer);

        let mut out = [0u8; SHA256_DIGEST_SIZE];
        for (i, word) in self.state.iter().enumerate() {
            out[i * 4..i * 4 + 4].copy_from_slice(&word.to_be_bytes());
        }
        Ok(out[..self.digest_size].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::to_hex_lower;

    fn sha256_hex(data: &[u8]) -> String {
        let mut h = Sha256::sha256();
        h.update(data).unwrap();
        to_hex_lower(&h.finalize().unwrap())
    }

    #[test]
    fn test_sha256_vectors() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(
            sha256_hex(b"abcdbcdecdefdefgefghfghighijhijkijkljklmklmnlmnomnopnopq"),
            "248d6a61d20638b8e5c026930c3e6039a33ce45964ff2167f6ecedd419db06c1"
        );
    }

    #[test]
    fn test_sha224_vector() {
        let mut h = Sha256::sha224();
        h.update(b"abc").unwrap();
        assert_eq!(
            to_hex_lower(&h.finalize().unwrap()),
            "23097d223405d8228642a477bda255b32aadbce4bda0b3f7e36c9da7"
        );
    }

    #[test]
    fn test_sha256_block_boundary_updates() {
        // One 64-byte update must match byte-at-a-time updates.
        let data = [0x61u8; 64];
        let mut one = Sha256::sha256();
        one.update(&data).unwrap();
        let mut many = Sha256::sha256();
        for b in &data {
            many.update(std::slice::from_ref(b)).unwrap();
        }
        assert_eq!(one.finalize().unwrap(), many.finalize().unwrap());
    }
}
