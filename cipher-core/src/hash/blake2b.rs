// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Hyperpolymath
//
// RFC 7693 compliant BLAKE2b implementation with optional keying.

use crate::error::{CipherError, CipherResult};

pub const BLAKE2B_BLOCK_SIZE: usize = 128;
pub const BLAKE2B_MAX_DIGEST_SIZE: usize = 64;

const IV: [u64; 8] = [
    0x6A09_E667_F3BC_C908,
    0xBB67_AE85_84CA_A73B,
    0x3C6E_F372_FE94_F82B,
    0xA54F_F53A_5F1D_36F1,
    0x510E_527F_ADE6_82D1,
    0x9B05_688C_2B3E_6C1F,
    0x1F83_D9AB_FB41_BD6B,
    0x5BE0_CD19_137E_2179,
];

#[rustfmt::skip]
const SIGMA: [[usize; 16]; 12] = [
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
    [0x0, 0x1, 0x2, 0x3, 0x4, 0x5, 0x6, 0x7, 0x8, 0x9, 0xA, 0xB, 0xC, 0xD, 0xE, 0xF],
    [0xE, 0xA, 0x4, 0x8, 0x9, 0xF, 0xD, 0x6, 0x1, 0xC, 0x0, 0x2, 0xB, 0x7, 0x5, 0x3],
];

/// BLAKE2b running state. Digest size is chosen at init time, up to 64
/// bytes, optionally keyed with up to one block of key material.
#[derive(Clone)]
pub struct Blake2b {
    state: [u64; 8],
    counter: [u64; 2],
    flags: [u64; 2],
    buffer: [u8; BLAKE2B_BLOCK_SIZE],
    cursiz: usize,
    digest_size: usize,
}

impl Blake2b {
    pub fn new(digest_size: usize, key: &[u8]) -> CipherResult<Self> {
        if digest_size == 0 || digest_size > BLAKE2B_MAX_DIGEST_SIZE {
            return Err(CipherError::InvalidDigestSize);
        }
        if key.len() > BLAKE2B_BLOCK_SIZE {
            return Err(CipherError::InvalidKeySize);
        }

        Ok(Self::with_params(digest_size, key))
    }

    fn with_params(digest_size: usize, key: &[u8]) -> Self {
        let mut param = [0u8; 64];
        param[0] = digest_size as u8;
        param[1] = key.len() as u8;
        param[2] = 1; // fanout
        param[3] = 1; // depth

        let mut state = IV;
        for (word, chunk) in state.iter_mut().zip(param.chunks_exact(8)) {
            *word ^= u64::from_le_bytes(chunk.try_into().unwrap());
        }

        let mut ctx = Self {
            state,
            counter: [0; 2],
            flags: [0; 2],
            buffer: [0u8; BLAKE2B_BLOCK_SIZE],
            cursiz: 0,
            digest_size,
        };

        if !key.is_empty() {
            // Keyed mode prepends the key as a zero-padded first block.
            ctx.buffer[..key.len()].copy_from_slice(key);
            ctx.cursiz = BLAKE2B_BLOCK_SIZE;
        }

        ctx
    }

    pub fn blake2b_160() -> Self {
        Self::with_params(20, &[])
    }

    pub fn blake2b_256() -> Self {
        Self::with_params(32, &[])
    }

    pub fn blake2b_384() -> Self {
        Self::with_params(48, &[])
    }

    pub fn blake2b_512() -> Self {
        Self::with_params(64, &[])
    }

    pub fn digest_size(&self) -> usize {
        self.digest_size
    }

    fn increment_counter(&mut self, inc: u64) {
        self.counter[0] = self.counter[0].wrapping_add(inc);
        if self.counter[0] < inc {
            self.counter[1] = self.counter[1].wrapping_add(1);
        }
    }

    fn compress(&mut self, block: &[u8]) {
        let mut m = [0u64; 16];
        for (i, word) in m.iter_mut().enumerate() {
            *word = u64::from_le_bytes(block[i * 8..i * 8 + 8].try_into().unwrap());
        }

        let mut v = [0u64; 16];
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
                v[$d] = (v[$d] ^ v[$a]).rotate_right(32);
                v[$c] = v[$c].wrapping_add(v[$d]);
                v[$b] = (v[$b] ^ v[$c]).rotate_right(24);
                v[$a] = v[$a]
                    .wrapping_add(v[$b])
                    .wrapping_add(m[SIGMA[$r][2 * $i + 1]]);
                v[$d] = (v[$d] ^ v[$a]).rotate_right(16);
                v[$c] = v[$c].wrapping_add(v[$d]);
                v[$b] = (v[$b] ^ v[$c]).rotate_right(63);
            };
        }

        for r in 0..12 {
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

    /// Absorb data with the same overflow-driven buffering as BLAKE2s.
    pub fn update(&mut self, data: &[u8]) -> CipherResult<()> {
        if self.flags[0] != 0 {
            return Err(CipherError::HashStateReuse);
        }
        let mut p = data;
        let free = BLAKE2B_BLOCK_SIZE - self.cursiz;
        if p.len() > free {
            self.buffer[self.cursiz..].copy_from_slice(&p[..free]);
            self.increment_counter(BLAKE2B_BLOCK_SIZE as u64);
            let buffer = self.buffer;
            self.compress(&buffer);
            self.cursiz = 0;
            p = &p[free..];
            while p.len() > BLAKE2B_BLOCK_SIZE - 1 {
                self.increment_counter(BLAKE2B_BLOCK_SIZE as u64);
                let (block, rest) = p.split_at(BLAKE2B_BLOCK_SIZE);
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
        self.increment_counter(self.cursiz as u64);
        self.flags[0] = u64::MAX;

        self.buffer[self.cursiz..].fill(0);
        let buffer = self.buffer;
        self.compress(&buffer);

        let mut out = [0u8; BLAKE2B_MAX_DIGEST_SIZE];
        for (i, word) in self.state.iter().enumerate() {
            out[i * 8..i * 8 + 8].copy_from_slice(&word.to_le_bytes());
        }
        Ok(out[..self.digest_size].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::to_hex_lower;

    fn blake2b_hex(data: &[u8]) -> String {
        let mut h = Blake2b::blake2b_512();
        h.update(data).unwrap();
        to_hex_lower(&h.finalize().unwrap())
    }

    #[test]
    fn test_blake2b_512_vectors() {
        assert_eq!(
            blake2b_hex(b""),
            "786a02f742015903c6c6fd852552d272912f4740e15847618a86e217f71f5419\
             d25e1031afee585313896444934eb04b903a685b1448b755d56f701afe9be2ce"
        );
        assert_eq!(
            blake2b_hex(b"abc"),
            "ba80a53f981c4d0d6a2797b69f12f6e94c212f14685ac4b74b12bb6fdbffa2d1\
             7d87c5392aab792dc252d5de4533cc9518d38aa8dbf1925ab92386edd4009923"
        );
    }

    #[test]
    fn test_blake2b_keyed_vector() {
        // blake2b-kat entry: key 00..3f, empty message.
        let key: Vec<u8> = (0u8..64).collect();
        let mut h = Blake2b::new(64, &key).unwrap();
        h.update(b"").unwrap();
        assert_eq!(
            to_hex_lower(&h.finalize().unwrap()),
            "10ebb67700b1868efb4417987acf4690ae9d972fb7a590c2f02871799aaa4786\
             b5e996e8f0f4eb981fc214b005f42d2ff4233499391653df7aefcbc13fc51568"
        );
    }

    #[test]
    fn test_blake2b_split_updates_agree() {
        let data = [0xA5u8; 400];
        let mut one = Blake2b::blake2b_512();
        one.update(&data).unwrap();
        let mut two = Blake2b::blake2b_512();
        two.update(&data[..129]).unwrap();
        two.update(&data[129..]).unwrap();
        assert_eq!(one.finalize().unwrap(), two.finalize().unwrap());
    }

    #[test]
    fn test_blake2b_init_bounds() {
        assert_eq!(
            Blake2b::new(0, &[]).err(),
            Some(CipherError::InvalidDigestSize)
        );
        assert_eq!(
            Blake2b::new(65, &[]).err(),
            Some(CipherError::InvalidDigestSize)
        );
        assert_eq!(
            Blake2b::new(64, &[0u8; 129]).err(),
            Some(CipherError::InvalidKeySize)
        );
    }
}
