// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Hyperpolymath
//
// FIPS 180-4 compliant SHA-384/SHA-512 implementation, including the
// SHA-512/224 and SHA-512/256 truncated variants.

use crate::error::{CipherError, CipherResult};

pub const SHA512_BLOCK_SIZE: usize = 128;
pub const SHA512_DIGEST_SIZE: usize = 64;
pub const SHA384_DIGEST_SIZE: usize = 48;
pub const SHA512_224_DIGEST_SIZE: usize = 28;
pub const SHA512_256_DIGEST_SIZE: usize = 32;

#[rustfmt::skip]
const K: [u64; 80] = [
    0x428A2F98D728AE22, 0x7137449123EF65CD, 0xB5C0FBCFEC4D3B2F, 0xE9B5DBA58189DBBC,
    0x3956C25BF348B538, 0x59F111F1B605D019, 0x923F82A4AF194F9B, 0xAB1C5ED5DA6D8118,
    0xD807AA98A3030242, 0x12835B0145706FBE, 0x243185BE4EE4B28C, 0x550C7DC3D5FFB4E2,
    0x72BE5D74F27B896F, 0x80DEB1FE3B1696B1, 0x9BDC06A725C71235, 0xC19BF174CF692694,
    0xE49B69C19EF14AD2, 0xEFBE4786384F25E3, 0x0FC19DC68B8CD5B5, 0x240CA1CC77AC9C65,
    0x2DE92C6F592B0275, 0x4A7484AA6EA6E483, 0x5CB0A9DCBD41FBD4, 0x76F988DA831153B5,
    0x983E5152EE66DFAB, 0xA831C66D2DB43210, 0xB00327C898FB213F, 0xBF597FC7BEEF0EE4,
    0xC6E00BF33DA88FC2, 0xD5A79147930AA725, 0x06CA6351E003826F, 0x142929670A0E6E70,
    0x27B70A8546D22FFC, 0x2E1B21385C26C926, 0x4D2C6DFC5AC42AED, 0x53380D139D95B3DF,
    0x650A73548BAF63DE, 0x766A0ABB3C77B2A8, 0x81C2C92E47EDAEE6, 0x92722C851482353B,
    0xA2BFE8A14CF10364, 0xA81A664BBC423001, 0xC24B8B70D0F89791, 0xC76C51A30654BE30,
    0xD192E819D6EF5218, 0xD69906245565A910, 0xF40E35855771202A, 0x106AA07032BBD1B8,
    0x19A4C116B8D2D0C8, 0x1E376C085141AB53, 0x2748774CDF8EEB99, 0x34B0BCB5E19B48A8,
    0x391C0CB3C5C95A63, 0x4ED8AA4AE3418ACB, 0x5B9CCA4F7763E373, 0x682E6FF3D6B2B8A3,
    0x748F82EE5DEFB2FC, 0x78A5636F43172F60, 0x84C87814A1F0AB72, 0x8CC702081A6439EC,
    0x90BEFFFA23631E28, 0xA4506CEBDE82BDE9, 0xBEF9A3F7B2C67915, 0xC67178F2E372532B,
    0xCA273ECEEA26619C, 0xD186B8C721C0C207, 0xEADA7DD6CDE0EB1E, 0xF57D4F7FEE6ED178,
    0x06F067AA72176FBA, 0x0A637DC5A2C898A6, 0x113F9804BEF90DAE, 0x1B710B35131C471B,
    0x28DB77F523047D84, 0x32CAAB7B40C72493, 0x3C9EBE0A15C9BEBC, 0x431D67C49C100D4C,
    0x4CC5D4BECB3E42B6, 0x597F299CFC657E2A, 0x5FCB6FAB3AD6FAEC, 0x6C44198C4A475817,
];

const SHA512_IV: [u64; 8] = [
    0x6A09E667F3BCC908,
    0xBB67AE8584CAA73B,
    0x3C6EF372FE94F82B,
    0xA54FF53A5F1D36F1,
    0x510E527FADE682D1,
    0x9B05688C2B3E6C1F,
    0x1F83D9ABFB41BD6B,
    0x5BE0CD19137E2179,
];

const SHA384_IV: [u64; 8] = [
    0xCBBB9D5DC1059ED8,
    0x629A292A367CD507,
    0x9159015A3070DD17,
    0x152FECD8F70E5939,
    0x67332667FFC00B31,
    0x8EB44A8768581511,
    0xDB0C2E0D64F98FA7,
    0x47B5481DBEFA4FA4,
];

const SHA512_224_IV: [u64; 8] = [
    0x8C3D37C819544DA2,
    0x73E1996689DCD4D6,
    0x1DFAB7AE32FF9C82,
    0x679DD514582F9FCF,
    0x0F6D2B697BD44DA8,
    0x77E36F7304C48942,
    0x3F9D85A86A1D36C8,
    0x1112E6AD91D692A1,
];

const SHA512_256_IV: [u64; 8] = [
    0x22312194FC2BF72C,
    0x9F555FA3C84C64C2,
    0x2393B86B6F53B151,
    0x963877195940EABD,
    0x96283EE2A88EFFE3,
    0xBE5E1E2553863992,
    0x2B0199FC2C85B8AA,
    0x0EB72DDC81C52CA2,
];

/// SHA-512 family running state; variants share the compression function
/// and differ in initial state and emitted digest length.
#[derive(Clone)]
pub struct Sha512 {
    state: [u64; 8],
    length: u64,
    buffer: [u8; SHA512_BLOCK_SIZE],
    cursiz: usize,
    digest_size: usize,
    finalized: bool,
}

impl Sha512 {
    pub fn sha512() -> Self {
        Self::with_iv(SHA512_IV, SHA512_DIGEST_SIZE)
    }

    pub fn sha384() -> Self {
        Self::with_iv(SHA384_IV, SHA384_DIGEST_SIZE)
    }

    pub fn sha512_224() -> Self {
        Self::with_iv(SHA512_224_IV, SHA512_224_DIGEST_SIZE)
    }

    pub fn sha512_256() -> Self {
        Self::with_iv(SHA512_256_IV, SHA512_256_DIGEST_SIZE)
    }

    fn with_iv(iv: [u64; 8], digest_size: usize) -> Self {
        Self {
            state: iv,
            length: 0,
            buffer: [0u8; SHA512_BLOCK_SIZE],
            cursiz: 0,
            digest_size,
            finalized: false,
        }
    }

    pub fn digest_size(&self) -> usize {
        self.digest_size
    }

    fn compress(&mut self, block: &[u8]) {
        let mut w = [0u64; 80];
        for (i, word) in w.iter_mut().take(16).enumerate() {
            *word = u64::from_be_bytes(block[i * 8..i * 8 + 8].try_into().unwrap());
        }
        for i in 16..80 {
            let s0 = w[i - 15].rotate_right(1) ^ w[i - 15].rotate_right(8) ^ (w[i - 15] >> 7);
            let s1 = w[i - 2].rotate_right(19) ^ w[i - 2].rotate_right(61) ^ (w[i - 2] >> 6);
            w[i] = w[i - 16]
                .wrapping_add(s0)
                .wrapping_add(w[i - 7])
                .wrapping_add(s1);
        }

        let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = self.state;

        for i in 0..80 {
            let s1 = e.rotate_right(14) ^ e.rotate_right(18) ^ e.rotate_right(41);
            let ch = (e & f) ^ (!e & g);
            let t1 = h
                .wrapping_add(s1)
                .wrapping_add(ch)
                .wrapping_add(K[i])
                .wrapping_add(w[i]);
            let s0 = a.rotate_right(28) ^ a.rotate_right(34) ^ a.rotate_right(39);
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
            if self.cursiz == 0 && p.len() >= SHA512_BLOCK_SIZE {
                let (block, rest) = p.split_at(SHA512_BLOCK_SIZE);
                self.compress(block);
                self.length = self.length.wrapping_add((SHA512_BLOCK_SIZE as u64) * 8);
                p = rest;
            } else {
                let n = (SHA512_BLOCK_SIZE - self.cursiz).min(p.len());
                self.buffer[self.cursiz..self.cursiz + n].copy_from_slice(&p[..n]);
                self.cursiz += n;
                p = &p[n..];
                if self.cursiz == SHA512_BLOCK_SIZE {
                    let buffer = self.buffer;
                    self.compress(&buffer);
                    self.length = self.length.wrapping_add((SHA512_BLOCK_SIZE as u64) * 8);
                    self.cursiz = 0;
                }
            }
        }
        Ok(())
    }

    pub fn finalize(&mut self) -> CipherResult<Vec<u8>> {
        if self.finalized || self.cursiz > SHA512_BLOCK_SIZE {
            return Err(CipherError::HashStateReuse);
        }
        self.finalized = true;

        self.length = self.length.wrapping_add((self.cursiz as u64) * 8);
        self.buffer[self.cursiz] = 0x80;
        self.cursiz += 1;

        // The 64-bit length lands in the last 8 bytes of the block; the
        // 8 bytes before it stay zero, matching the 128-bit FIPS field
        // for any message shorter than 2^64 bits.
        if self.cursiz > SHA512_BLOCK_SIZE - 16 {
            self.buffer[self.cursiz..].fill(0);
            let buffer = self.buffer;
            self.compress(&buffer);
            self.cursiz = 0;
        }
        self.buffer[self.cursiz..SHA512_BLOCK_SIZE - 8].fill(0);
        self.buffer[SHA512_BLOCK_SIZE - 8..].copy_from_slice(&self.length.to_be_bytes());
        let buffer = self.buffer;
        self.compress(&buffer);

        let mut out = [0u8; SHA512_DIGEST_SIZE];
        for (i, word) in self.state.iter().enumerate() {
            out[i * 8..i * 8 + 8].copy_from_slice(&word.to_be_bytes());
        }
        Ok(out[..self.digest_size].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::to_hex_lower;

    fn hex(mut h: Sha512, data: &[u8]) -> String {
        h.update(data).unwrap();
        to_hex_lower(&h.finalize().unwrap())
    }

    #[test]
    fn test_sha512_vectors() {
        assert_eq!(
            hex(Sha512::sha512(), b"abc"),
            "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
             2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
        );
        assert_eq!(
            hex(Sha512::sha512(), b""),
            "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce\
             47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3e"
        );
    }

    #[test]
    fn test_sha512_two_block_vector() {
        // NIST 896-bit message; exercises the full round-constant table.
        let data = b"abcdefghbcdefghicdefghijdefghijkefghijklfghijklmghijklmn\
hijklmnoijklmnopjklmnopqklmnopqrlmnopqrsmnopqrstnopqrstu";
        assert_eq!(
            hex(Sha512::sha512(), data),
            "8e959b75dae313da8cf4f72814fc143f8f7779c6eb9f7fa17299aeadb6889018\
             501d289e4900f7e4331b99dec4b5433ac7d329eeb6dd26545e96e55b874be909"
        );
    }

    #[test]
    fn test_sha384_vector() {
        assert_eq!(
            hex(Sha512::sha384(), b"abc"),
            "cb00753f45a35e8bb5a03d699ac65007272c32ab0eded1631a8b605a43ff5bed\
             8086072ba1e7cc2358baeca134c825a7"
        );
    }

    #[test]
    fn test_sha512_truncated_vectors() {
        assert_eq!(
            hex(Sha512::sha512_224(), b"abc"),
            "4634270f707b6a54daae7530460842e20e37ed265ceee9a43e8924aa"
        );
        assert_eq!(
            hex(Sha512::sha512_256(), b"abc"),
            "53048e2681941ef99b2e29b76b4c7dabe4c2d0c634fc6d46e0e2f13107e7af23"
        );
    }
}
