// Copyright 2024 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

#[derive(thiserror::Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Malformed JSON: {0}")]
    MalformedJson(String),
    #[error("Unexpected critical type: {0}")]
    UnexpectedCriticalType(String),
    #[error("Missing public key: {0}")]
    MissingPublicKey(String),
    #[error("Invalid base64: {0}")]
    InvalidBase64(String),
    #[error("Not PEM: {0}")]
    NotPem(String),
    #[error("Missing signing algorithm: {0}")]
    MissingAlgorithm(String),
    #[error("Unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("Unsupported PEM type: {0}")]
    UnsupportedPemType(String),
    #[error("Wrong key type: {0}")]
    WrongKeyType(String),
    #[error("Invalid key: {0}")]
    InvalidKey(String),
    #[error("Unsupported key parameters: {0}")]
    UnsupportedParameters(String),
    #[error("Nil signature: {0}")]
    NilSignature(String),
    #[error("Digest mismatch: {0}")]
    DigestMismatch(String),
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),
    #[error("Key ID error: {0}")]
    KeyId(String),
    #[error("Too many signatures: {0}")]
    TooManySignatures(String),
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::MalformedJson(e)
            | Error::UnexpectedCriticalType(e)
            | Error::MissingPublicKey(e)
            | Error::InvalidBase64(e)
            | Error::NotPem(e)
            | Error::MissingAlgorithm(e)
            | Error::UnsupportedAlgorithm(e)
            | Error::UnsupportedPemType(e)
            | Error::WrongKeyType(e)
            | Error::InvalidKey(e)
            | Error::UnsupportedParameters(e)
            | Error::NilSignature(e)
            | Error::DigestMismatch(e)
            | Error::InvalidSignature(e)
            | Error::KeyId(e)
            | Error::TooManySignatures(e) => {
                write!(f, "{}", e)
            }
        }
    }
}
