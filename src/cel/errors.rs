// Copyright 2024 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

#[derive(thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("Syntax error: {0}")]
    Syntax(String),
    #[error("Unknown register kind: {0}")]
    UnknownRegisterKind(String),
    #[error("Unknown hash algorithm: {0}")]
    UnknownHashAlg(String),
    #[error("Missing digest: {0}")]
    MissingDigest(String),
    #[error("Digest mismatch: {0}")]
    DigestMismatch(String),
    #[error("Replay mismatch: {0}")]
    ReplayMismatch(String),
    #[error("Hash calculation failed: {0}")]
    Hash(String),
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Syntax(e)
            | Error::UnknownRegisterKind(e)
            | Error::UnknownHashAlg(e)
            | Error::MissingDigest(e)
            | Error::DigestMismatch(e)
            | Error::ReplayMismatch(e)
            | Error::Hash(e) => {
                write!(f, "{}", e)
            }
        }
    }
}
