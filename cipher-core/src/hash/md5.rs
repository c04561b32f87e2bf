// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Hyperpolymath
//
// RFC 1321 compliant MD5 implementation

use crate::error::{CipherError, CipherResult};

pub const MD5_BLOCK_SIZE: usize = 64;
pub const MD5_DIGEST_SIZE: usize = 16;

/// Per-round left-rotate amounts
#[rustfmt::skip]
const S: [u32; 64] = [
    7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22,
    5,  9, 14, 20, 5,  9, 14, 20, 5,  9, 14, 20, 5,  9, 14, 20,
    4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23,
    6, 10, 15, 21, 6, 10, 15, 21, 6, 10, 15, 21, 6, 10, 15, 21,
];

/// Sine-derived additive constants, floor(2^32 * abs(sin(i + 1)))
#[rustfmt::skip]
const K: [u32; 64] = [
    0xD76AA478, 0xE8C7B756, 0x242070DB, 0xC1BDCEEE,
    0xF57C0FAF, 0x4787C62A, 0xA8304613, 0xFD469501,
    0x698098D8, 0x8B44F7AF, 0xFFFF5BB1, 0x895CD7BE,
    0x6B901122, 0xFD987193, 0xA679438E, 0x49B40821,
    0xF61E2562, 0xC040B340, 0x265E5A51, 0xE9B6C7AA,
    0xD62F105D, 0x02441453, 0xD8A1E681, 0xE7D3FBC8,
    0x21E1CDE6, 0xC33707D6, 0xF4D50D87, 0x455A14ED,
    0xA9E3E905, 0xFCEFA3F8, 0x676F02D9, 0x8D2A4C8A,
    0xFFFA3942, 0x8771F681, 0x6D9D6122, 0xFDE5380C,
    0xA4BEEA44, 0x4BDECFA9, 0xF6BB4B60, 0xBEBFBC70,
    0x289B7EC6, 0xEAA127FA, 0xD4EF3085, 0x04881D05,
    0xD9D4D039, 0xE6DB99E5, 0x1FA27CF8, 0xC4AC5665,
    0xF4292244, 0x432AFF97, 0xAB9423A7, 0xFC93A039,
    0x655B59C3, 0x8F0CCC92, 0xFFEFF47D, 0x85845DD1,
    0x6FA87E4F, 0xFE2CE6E0, 0xA3014314, 0x4E0811A1,
    0xF7537E82, 0xBD3AF235, 0x2AD7D2BB, 0xEB86D391,
];

/// MD5 running state. Single use: `finalize` invalidates it until re-init.
#[derive(Clone)]
pub struct Md5 {
    state: [u32; 4],
    length: u64,
    buffer: [u8; MD5_BLOCK_SIZE],
    cursiz: usize,
    finalized: bool,
}

impl Default for Md5 {
    fn default() -> Self {
        Self::new()
    }
}

impl Md5 {
    pub fn new() -> Self {
        Self {
            state: [0x6745_2301, 0xEFCD_AB89, 0x98BA_DCFE, 0x1032_5476],
            length: 0,
            buffer: [0u8; MD5_BLOCK_SIZE],
            cursiz: 0,
            finalized: false,
        }
    }

    fn compress(&mut self, block: &[u8]) {
        let mut m = [0u32; 16];
        for (i, word) in m.iter_mut().enumerate() {
            *word = u32::from_le_bytes(block[i * 4..i * 4 + 4].try_into().unwrap());
        }

        let mut a = self.state[0];
        let mut b = self.state[1];
        let mut c = self.state[2];
        let mut d = self.state[3];

        for i in 0..64 {
            let (f, g) = match i {
                0..=15 => ((b & c) | (!b & d), i),
                16..=31 => ((d & b) | (!d & c), (5 * i + 1) % 16),
                32..=47 => (b ^ c ^ d, (3 * i + 5) % 16),
                _ => (c ^ (b | !d), (7 * i) % 16),
            };
            let tmp = d;
            d = c;
            c = b;
            b = b.wrapping_add(
                a.wrapping_add(f)
                    .wrapping_add(K[i])
                    .wrapping_add(m[g])
                    .rotate_left(S[i]),
            );
            a = tmp;
        }

        self.state[0] = self.state[0].wrapping_add(a);
        self.state[1] = self.state[1].wrapping_add(b);
        self.state[2] = self.state[2].wrapping_add(c);
        self.state[3] = self.state[3].wrapping_add(d);
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
            if self.cursiz == 0 && p.len() >= MD5_BLOCK_SIZE {
                let (block, rest) = p.split_at(MD5_BLOCK_SIZE);
                self.compress_block(block);
                p = rest;
            } else {
                let n = (MD5_BLOCK_SIZE - self.cursiz).min(p.len());
                self.buffer[self.cursiz..self.cursiz + n].copy_from_slice(&p[..n]);
                self.cursiz += n;
                p = &p[n..];
                if self.cursiz == MD5_BLOCK_SIZE {
                    let buffer = self.buffer;
                    self.compress_block(&buffer);
                    self.cursiz = 0;
                }
            }
        }
        Ok(())
    }

    fn compress_block(&mut self, block: &[u8]) {
        self.compress(block);
        self.length = self.length.wrapping_add((MD5_BLOCK_SIZE as u64) * 8);
    }

    pub fn finalize(&mut self) -> CipherResult<[u8; MD5_DIGEST_SIZE]> {
        if self.finalized || self.cursiz > MD5_BLOCK_SIZE {
            return Err(CipherError::HashStateReuse);
        }
        self.finalized = true;

        self.length = self.length.wrapping_add((self.cursiz as u64) * 8);
        self.buffer[self.cursiz] = 0x80;
        self.cursiz += 1;

        if self.cursiz > MD5_BLOCK_SIZE - 8 {
            self.buffer[self.cursiz..].fill(0);
            let buffer = self.buffer;
            self.compress(&buffer);
            self.cursiz = 0;
        }
        self.buffer[self.cursiz..MD5_BLOCK_SIZE - 8].fill(0);
        self.buffer[MD5_BLOCK_SIZE - 8..].copy_from_slice(&self.length.to_le_bytes());
        let buffer = self.buffer;
        self.compress(&buffer);

        let mut out = [0u8; MD5_DIGEST_SIZE];
        for (i, word) in self.state.iter().enumerate() {
            out[i * 4..i * 4 + 4].copy_from_slice(&word.to_le_bytes());
        }
        Ok(out)
    }
}
