// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Hyperpolymath

use thiserror::Error;

/// Derivation core error types
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CipherError {
    #[error("no identifier text supplied")]
    MissingIdentifier,

    #[error("custom output kind requires a character set")]
    MissingCustomCharset,

    #[error("invalid derivation parameters")]
    InvalidParameters,

    #[error("hash length counter overflow")]
    HashOverflow,

    #[error("hash state finalized twice without re-init")]
    HashStateReuse,

    #[error("requested digest size out of range")]
    InvalidDigestSize,

    #[error("requested key size out of range")]
    InvalidKeySize,

    #[error("not a hexadecimal digit")]
    InvalidHexDigit,

    #[error("serialization failed: {0}")]
    Serialization(String),
}

pub type CipherResult<T> = Result<T, CipherError>;
