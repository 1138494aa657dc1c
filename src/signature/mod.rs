// Copyright 2024 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

//! The signature module verifies cosign container image signatures in the
//! simple signing format against the digest of the running workload image.
//!
//! # Example
//!
//! ```
//! use cosattest::signature::{verify, ImageSignature};
//!
//! const payload: &[u8] = include_bytes!("../../testdata/ecdsa-p256-sha256-payload.json");
//! const sig: &[u8] = include_bytes!("../../testdata/ecdsa-p256-sha256.sig");
//!
//! let digest = "sha256:9494e567c7c44e8b9f8808c1658a47c9b7979ef3cceef10f48754fc2706802ba";
//!
//! let res = verify(digest, &[ImageSignature::new(payload, sig)])
//!     .expect("signature batch accepted");
//!
//! assert_eq!(res.verified.len(), 1);
//! assert_eq!(res.verified[0].signature_algorithm, "ECDSA_P256_SHA256");
//! ```

pub use self::base64::Bytes;
pub use self::convert::{
    Curve, HashType, KeyEntry, KeyMaterial, KeyParams, KeyStatus, OutputPrefix, SaltLength,
    SignatureEncoding, VerifierKey,
};
pub use self::errors::Error;
pub use self::payload::{
    Critical, Identity, Image, Payload, SigningAlgorithm, CRITICAL_TYPE, PUBLIC_KEY_FIELD,
    SIGNING_ALGORITHM_FIELD,
};
pub use self::verify::{
    filter_by_key_ids, key_id, verify, verify_signature, ImageSignature, VerifiedSignature,
    VerifyResult, MAX_SIGNATURE_COUNT,
};

mod base64;
mod convert;
mod errors;
mod payload;
mod verify;
