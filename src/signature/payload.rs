// Copyright 2024 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::base64;
use super::errors::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use x509_parser::pem::parse_x509_pem;

/// Value of `critical.type` in a cosign simple signing payload
pub const CRITICAL_TYPE: &str = "cosign container image signature";
/// `optional` entry carrying the unpadded base64 PEM public key
pub const PUBLIC_KEY_FIELD: &str = "dev.cosignproject.cosign/pub";
/// `optional` entry carrying the signing algorithm name
pub const SIGNING_ALGORITHM_FIELD: &str = "dev.cosignproject.cosign/sigalg";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SigningAlgorithm {
    Unspecified = 0,
    RsassaPssSha256 = 1,
    RsassaPkcs1v15Sha256 = 2,
    EcdsaP256Sha256 = 3,
}

const SIGNING_ALGORITHMS: [(&str, SigningAlgorithm); 4] = [
    ("SIGNING_ALGORITHM_UNSPECIFIED", SigningAlgorithm::Unspecified),
    ("RSASSA_PSS_SHA256", SigningAlgorithm::RsassaPssSha256),
    ("RSASSA_PKCS1V15_SHA256", SigningAlgorithm::RsassaPkcs1v15Sha256),
    ("ECDSA_P256_SHA256", SigningAlgorithm::EcdsaP256Sha256),
];

impl SigningAlgorithm {
    pub fn from_name(name: &str) -> Option<SigningAlgorithm> {
        SIGNING_ALGORITHMS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, a)| *a)
    }

    pub fn name(&self) -> &'static str {
        match self {
            SigningAlgorithm::Unspecified => "SIGNING_ALGORITHM_UNSPECIFIED",
            SigningAlgorithm::RsassaPssSha256 => "RSASSA_PSS_SHA256",
            SigningAlgorithm::RsassaPkcs1v15Sha256 => "RSASSA_PKCS1V15_SHA256",
            SigningAlgorithm::EcdsaP256Sha256 => "ECDSA_P256_SHA256",
        }
    }
}

impl fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A payload in the simple signing format
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    #[serde(default)]
    pub critical: Critical,
    /// Free-form signer metadata, including the public key and algorithm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Critical {
    #[serde(default)]
    pub identity: Identity,
    #[serde(default)]
    pub image: Image,
    #[serde(rename = "type", default)]
    pub typ: String,
}

/// Claimed identity of the image.  Cosign ignores it as it carries neither a
/// tag nor a digest.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(rename = "docker-reference", default)]
    pub docker_reference: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    #[serde(rename = "docker-manifest-digest", default)]
    pub docker_manifest_digest: String,
}

impl Payload {
    /// Decode a JSON payload and check that it is a cosign container image
    /// signature
    pub fn parse(data: &[u8]) -> Result<Payload, Error> {
        let p: Payload =
            serde_json::from_slice(data).map_err(|e| Error::MalformedJson(e.to_string()))?;

        if p.critical.typ != CRITICAL_TYPE {
            return Err(Error::UnexpectedCriticalType(format!(
                "unknown critical type for cosign signature payload: [{}]",
                p.critical.typ
            )));
        }

        Ok(p)
    }

    fn optional_str(&self, field: &str) -> Option<&str> {
        self.optional.as_ref()?.get(field)?.as_str()
    }

    /// The PEM-encoded public key attached to the payload.  The key type is
    /// not checked.
    pub fn public_key(&self) -> Result<Vec<u8>, Error> {
        let encoded = self.optional_str(PUBLIC_KEY_FIELD).ok_or_else(|| {
            Error::MissingPublicKey(format!(
                "no string {PUBLIC_KEY_FIELD} in the optional field of the payload"
            ))
        })?;

        let pem = base64::decode_unpadded(encoded)?;

        parse_x509_pem(&pem)
            .map_err(|e| Error::NotPem(format!("could not decode public key bytes: {e:?}")))?;

        Ok(pem)
    }

    pub fn signing_algorithm(&self) -> Result<SigningAlgorithm, Error> {
        let name = self.optional_str(SIGNING_ALGORITHM_FIELD).ok_or_else(|| {
            Error::MissingAlgorithm(format!(
                "no string {SIGNING_ALGORITHM_FIELD} in the optional field of the payload"
            ))
        })?;

        match SigningAlgorithm::from_name(name) {
            None | Some(SigningAlgorithm::Unspecified) => {
                Err(Error::UnsupportedAlgorithm(format!("[{name}]")))
            }
            Some(alg) => Ok(alg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TEST_PEM: &str = include_str!("../../testdata/ecdsa-p256.pem");
    const TEST_DIGEST: &str =
        "sha256:9494e567c7c44e8b9f8808c1658a47c9b7979ef3cceef10f48754fc2706802ba";

    fn payload_with(optional: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "critical": {
                "identity": { "docker-reference": "docker.io/library/test" },
                "image": { "docker-manifest-digest": TEST_DIGEST },
                "type": CRITICAL_TYPE,
            },
            "optional": optional,
        }))
        .unwrap()
    }

    fn unpadded(v: &[u8]) -> String {
        use ::base64::{engine::general_purpose, Engine as _};
        general_purpose::STANDARD_NO_PAD.encode(v)
    }

    #[test]
    fn parse_fixture() {
        let p = Payload::parse(include_bytes!("../../testdata/ecdsa-p256-sha256-payload.json"))
            .unwrap();

        assert_eq!(p.critical.image.docker_manifest_digest, TEST_DIGEST);
        assert_eq!(
            p.critical.identity.docker_reference,
            "us-docker.pkg.dev/confidential-space-images-dev/cs-cosign-tests/base"
        );
        assert_eq!(
            p.signing_algorithm().unwrap(),
            SigningAlgorithm::EcdsaP256Sha256
        );
        assert_eq!(p.public_key().unwrap(), TEST_PEM.trim_end().as_bytes());
    }

    #[test]
    fn parse_malformed_json() {
        for data in [&b""[..], b"{", b"{\"critical\": 1}"] {
            assert!(matches!(
                Payload::parse(data),
                Err(Error::MalformedJson(_))
            ));
        }
    }

    #[test]
    fn parse_wrong_critical_type() {
        let data = json!({
            "critical": { "type": "something else" },
        });

        assert!(matches!(
            Payload::parse(&serde_json::to_vec(&data).unwrap()),
            Err(Error::UnexpectedCriticalType(_))
        ));
        assert!(matches!(
            Payload::parse(b"{}"),
            Err(Error::UnexpectedCriticalType(_))
        ));
    }

    #[test]
    fn public_key_errors() {
        let tvs = [
            (json!(null), "missing"),
            (json!({}), "missing"),
            (json!({ PUBLIC_KEY_FIELD: 42 }), "missing"),
            (json!({ PUBLIC_KEY_FIELD: "not base64!" }), "base64"),
            (json!({ PUBLIC_KEY_FIELD: "YWI=" }), "base64"),
            (json!({ PUBLIC_KEY_FIELD: unpadded(b"invalid pem key") }), "pem"),
        ];

        for (optional, want) in tvs.iter() {
            let p = Payload::parse(&payload_with(optional.clone())).unwrap();
            let e = p.public_key().unwrap_err();

            match *want {
                "missing" => assert!(matches!(e, Error::MissingPublicKey(_)), "{e}"),
                "base64" => assert!(matches!(e, Error::InvalidBase64(_)), "{e}"),
                _ => assert!(matches!(e, Error::NotPem(_)), "{e}"),
            }
        }
    }

    #[test]
    fn signing_algorithm_errors() {
        let p = Payload::parse(&payload_with(json!({}))).unwrap();
        assert!(matches!(
            p.signing_algorithm(),
            Err(Error::MissingAlgorithm(_))
        ));

        for name in ["SIGNING_ALGORITHM_UNSPECIFIED", "ED25519", "ecdsa_p256_sha256"] {
            let p = Payload::parse(&payload_with(json!({ SIGNING_ALGORITHM_FIELD: name }))).unwrap();

            assert!(matches!(
                p.signing_algorithm(),
                Err(Error::UnsupportedAlgorithm(_))
            ));
        }
    }

    #[test]
    fn signing_algorithm_names() {
        for (name, alg) in SIGNING_ALGORITHMS.iter() {
            assert_eq!(alg.to_string(), *name);
            assert_eq!(SigningAlgorithm::from_name(name), Some(*alg));
        }

        assert_eq!(SigningAlgorithm::RsassaPssSha256 as u8, 1);
        assert_eq!(SigningAlgorithm::EcdsaP256Sha256 as u8, 3);
    }
}
