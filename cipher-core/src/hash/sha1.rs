// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Hyperpolymath
//
// RFC 3174 compliant SHA-1 implementation

use crate::error::{CipherError, CipherResult};

pub const SHA1_BLOCK_SIZE: usize = 64;
pub const SHA1_DIGEST_SIZE: usize = 20;

/// SHA-1 running state. Single use: `finalize` invalidates it until re-init.
#[derive(Clone)]
pub struct Sha1 {
    state: [u32; 5],
    length: u64,
    buffer: [u8; SHA1_BLOCK_SIZE],
    cursiz: usize,
    finalized: bool,
}

impl Default for Sha1 {
    fn default() -> Self {
        Self::new()
    }
}

impl Sha1 {
    pub fn new() -> Self {
        Self {
            state: [
                0x6745_2301,
                0xEFCD_AB89,
                0x98BA_DCFE,
                0x1032_5476,
                0xC3D2_E1F0,
            ],
            length: 0,
            buffer: [0u8; SHA1_BLOCK_SIZE],
            cursiz: 0,
            finalized: false,
        }
    }

    fn compress(&mut self, block: &[u8]) {
        let mut w = [0u32; 80];
        for (i, word) in w.iter_mut().take(16).enumerate() {
            *word = u32::from_be_bytes(block[i * 4..i * 4 + 4].try_into().unwrap());
        }
        for i in 16..80 {
            w[i] = (w[i - 3] ^ w[i - 8] ^ w[i - 14] ^ w[i - 16]).rotate_left(1);
        }

        let mut a = self.state[0];
        let mut b = self.state[1];
        let mut c = self.state[2];
        let mut d = self.state[3];
        let mut e = self.state[4];

        for (i, &wi) in w.iter().enumerate() {
            let (f, k) = match i {
                0..=19 => ((b & c) | (!b & d), 0x5A82_7999),
                20..=39 => (b ^ c ^ d, 0x6ED9_EBA1),
                40..=59 => ((b & c) | (b & d) | (c & d), 0x8F1B_BCDC),
                _ => (b ^ c ^ d, 0xCA62_C1D6),
            };
            let tmp = a
                .rotate_left(5)
                .wrapping_add(f)
                .wrapping_add(e)
                .wrapping_add(k)
                .wrapping_add(wi);
            e = d;
            d = c;
            c = b.rotate_left(30);
            b = a;
            a = tmp;
        }

        self.state[0] = self.state[0].wrapping_add(a);
        self.state[1] = self.state[1].wrapping_add(b);
        self.state[2] = self.state[2].wrapping_add(c);
        self.state[3] = self.state[3].wrapping_add(d);
        self.state[4] = self.state[4].wrapping_add(e);
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
            if self.cursiz == 0 && p.len() >= SHA1_BLOCK_SIZE {
                let (block, rest) = p.split_at(SHA1_BLOCK_SIZE);
                self.compress(block);
                self.length = self.length.wrapping_add((SHA1_BLOCK_SIZE as u64) * 8);
                p = rest;
            } else {
                let n = (SHA1_BLOCK_SIZE - self.cursiz).min(p.len());
                self.buffer[self.cursiz..self.cursiz + n].copy_from_slice(&p[..n]);
                self.cursiz += n;
                p = &p[n..];
                if self.cursiz == SHA1_BLOCK_SIZE {
                    let buffer = self.buffer;
                    self.compress(&buffer);
                    self.length = self.length.wrapping_add((SHA1_BLOCK_SIZE as u64) * 8);
                    self.cursiz = 0;
                }
            }
        }
        Ok(())
    }

    pub fn finalize(&mut self) -> CipherResult<[u8; SHA1_DIGEST_SIZE]> {
        if self.finalized || self.cursiz > SHA1_BLOCK_SIZE {
            return Err(CipherError::HashStateReuse);
        }
        self.finalized = true;

        self.length = self.length.wrapping_add((self.cursiz as u64) * 8);
        self.buffer[self.cursiz] = 0x80;
        self.cursiz += 1;

        if self.cursiz > SHA1_BLOCK_SIZE - 8 {
            self.buffer[self.cursiz..].fill(0);
            let buffer = self.buffer;
            self.compress(&buffer);
            self.cursiz = 0;
        }
        self.buffer[self.cursiz..SHA1_BLOCK_SIZE - 8].fill(0);
        self.buffer[SHA1_BLOCK_SIZE - 8..].copy_from_slice(&self.length.to_be_bytes());
        let buffer = self.buffer;
        self.compress(&buffer);

        let mut out = [0u8; SHA1_DIGEST_SIZE];
        for (i, word) in self.state.iter().enumerate() {
            out[i * 4..i * 4 + 4].copy_from_slice(&word.to_be_bytes());
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::to_hex_lower;

    fn sha1_hex(data: &[u8]) -> String {
        let mut h = Sha1::new();
        h.update(data).unwrap();
        to_hex_lower(&h.finalize().unwrap())
    }

    #[test]
    fn test_sha1_vectors() {
        assert_eq!(sha1_hex(b""), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
        assert_eq!(sha1_hex(b"abc"), "a9993e364706816aba3e25717850c26c9cd0d89d");
        assert_eq!(
            sha1_hex(b"abcdbcdecdefdefgefghfghighijhijkijkljklmklmnlmnomnopnopq"),
            "84983e441c3bd26ebaae4aa1f95129e5e54670f1"
        );
    }

    #[test]
    fn test_sha1_finalize_twice_fails() {
        let mut h = Sha1::new();
        h.update(b"abc").unwrap();
        h.finalize().unwrap();
        assert_eq!(h.finalize(), Err(CipherError::HashStateReuse));
    }
}
