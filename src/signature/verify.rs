// Copyright 2024 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::base64::{self, Bytes};
use super::convert::VerifierKey;
use super::errors::Error;
use super::payload::Payload;
use log::{debug, info, warn};
use openssl::sha::sha256;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::thread;
use x509_parser::pem::parse_x509_pem;

/// Upper bound on the number of signatures accepted in one batch
pub const MAX_SIGNATURE_COUNT: usize = 300;

const KEY_ID_DELIMITER: &str = "=";

/// A cosign signature as attached to a container image
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSignature {
    pub payload: Bytes,
    pub signature: Bytes,
}

impl ImageSignature {
    pub fn new(payload: impl Into<Vec<u8>>, signature: impl Into<Vec<u8>>) -> Self {
        Self {
            payload: Bytes::from(payload.into()),
            signature: Bytes::from(signature.into()),
        }
    }

    /// A signature with neither payload nor signature bytes
    pub fn is_nil(&self) -> bool {
        self.payload.is_empty() && self.signature.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedSignature {
    /// Lowercase hex SHA-256 of the DER public key
    pub key_id: String,
    /// Padded standard base64
    pub signature: String,
    pub signature_algorithm: String,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct VerifyResult {
    pub verified: Vec<VerifiedSignature>,
    pub errors: Vec<Error>,
}

/// Verify each of `signatures` against the running workload's
/// `image_digest`.
///
/// Signatures are checked concurrently and independently.  The result holds
/// the signatures that verified and the errors for those that did not, both
/// in input order.  More than [`MAX_SIGNATURE_COUNT`] signatures is an error
/// and nothing is verified.
pub fn verify(image_digest: &str, signatures: &[ImageSignature]) -> Result<VerifyResult, Error> {
    let n = signatures.len();

    if n == 0 {
        return Ok(VerifyResult::default());
    }

    if n > MAX_SIGNATURE_COUNT {
        return Err(Error::TooManySignatures(format!(
            "got {n} signatures, should be at most {MAX_SIGNATURE_COUNT}"
        )));
    }

    let mut slots: Vec<Option<Result<VerifiedSignature, Error>>> = (0..n).map(|_| None).collect();

    thread::scope(|s| {
        for (slot, sig) in slots.iter_mut().zip(signatures) {
            s.spawn(move || *slot = Some(verify_signature(image_digest, sig)));
        }
    });

    let mut res = VerifyResult::default();

    for (i, r) in slots.into_iter().flatten().enumerate() {
        match r {
            Ok(v) => {
                debug!("signature {i} verified with key {}", v.key_id);
                res.verified.push(v)
            }
            Err(e) => {
                warn!("signature {i} rejected: {e}");
                res.errors.push(e)
            }
        }
    }

    info!(
        "verified {} of {n} container image signatures",
        res.verified.len()
    );

    Ok(res)
}

/// Verify a single signature against the running workload's `image_digest`
pub fn verify_signature(
    image_digest: &str,
    sig: &ImageSignature,
) -> Result<VerifiedSignature, Error> {
    if sig.is_nil() {
        return Err(Error::NilSignature(
            "container image signature is nil".to_string(),
        ));
    }

    let payload = Payload::parse(sig.payload.as_slice())?;
    let public_key = payload.public_key()?;
    let alg = payload.signing_algorithm()?;

    if payload.critical.image.docker_manifest_digest != image_digest {
        return Err(Error::DigestMismatch(format!(
            "payload docker manifest digest {} does not match the running workload image digest {image_digest}",
            payload.critical.image.docker_manifest_digest
        )));
    }

    VerifierKey::from_pem(&public_key, alg)?
        .verify(sig.signature.as_slice(), sig.payload.as_slice())?;

    Ok(VerifiedSignature {
        key_id: key_id(&public_key)?,
        signature: base64::encode(sig.signature.as_slice()),
        signature_algorithm: alg.to_string(),
    })
}

/// Fingerprint of a PEM public key: the lowercase hex SHA-256 of its DER
/// bytes, as in `openssl pkey -pubin -outform DER | openssl sha256`.
pub fn key_id(pem: &[u8]) -> Result<String, Error> {
    let (rest, block) = parse_x509_pem(pem)
        .map_err(|e| Error::KeyId(format!("could not decode public key bytes as PEM: {e:?}")))?;

    if !rest.iter().all(u8::is_ascii_whitespace) {
        return Err(Error::KeyId(format!(
            "{} bytes of unexpected trailing data after the PEM block",
            rest.len()
        )));
    }

    Ok(hex::encode(sha256(&block.contents)))
}

/// Intersect the key IDs of `verified` with `allowed_key_ids`.  A match is
/// returned as a single string holding the sorted IDs joined with `=`; no
/// match yields an empty list.
pub fn filter_by_key_ids(verified: &[VerifiedSignature], allowed_key_ids: &[String]) -> Vec<String> {
    let found: BTreeSet<&str> = verified.iter().map(|v| v.key_id.as_str()).collect();

    let matched: BTreeSet<&str> = allowed_key_ids
        .iter()
        .map(String::as_str)
        .filter(|k| found.contains(k))
        .collect();

    if matched.is_empty() {
        return vec![];
    }

    vec![matched.into_iter().collect::<Vec<_>>().join(KEY_ID_DELIMITER)]
}
