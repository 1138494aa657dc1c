// Copyright 2024 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use super::payload::SigningAlgorithm;
use openssl::bn::BigNum;
use openssl::ecdsa::EcdsaSig;
use openssl::hash::MessageDigest;
use openssl::nid::Nid;
use openssl::pkey::{HasPublic, Id, PKey, PKeyRef, Private, Public};
use openssl::rsa::{Padding, Rsa};
use openssl::sign::{RsaPssSaltlen, Verifier};
use std::fmt;
use x509_parser::pem::parse_x509_pem;

/// RSA default public exponent (F4)
const F4: u64 = 65537;
const MIN_RSA_MODULUS_BITS: u32 = 2048;

const SPKI_PEM_LABEL: &str = "PUBLIC KEY";
const PKCS1_PEM_LABEL: &str = "RSA PUBLIC KEY";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HashType {
    Sha256,
    Sha384,
    Sha512,
}

impl HashType {
    fn message_digest(self) -> MessageDigest {
        match self {
            HashType::Sha256 => MessageDigest::sha256(),
            HashType::Sha384 => MessageDigest::sha384(),
            HashType::Sha512 => MessageDigest::sha512(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Curve {
    NistP256,
    NistP384,
    NistP521,
}

impl Curve {
    fn from_nid(nid: Nid) -> Option<Curve> {
        match nid {
            Nid::X9_62_PRIME256V1 => Some(Curve::NistP256),
            Nid::SECP384R1 => Some(Curve::NistP384),
            Nid::SECP521R1 => Some(Curve::NistP521),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignatureEncoding {
    /// ASN.1 DER `SEQUENCE { r, s }`
    Der,
    /// Fixed-width big-endian `r || s`
    IeeeP1363,
}

/// Bytes prepended to signatures made with a key, identifying the key
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputPrefix {
    None,
    Tink(u32),
    Legacy(u32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaltLength {
    /// Recovered from the signature on verification
    Auto,
    Bytes(u32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyParams {
    Ecdsa {
        curve: Curve,
        hash: HashType,
        encoding: SignatureEncoding,
    },
    RsaSsaPkcs1 {
        hash: HashType,
        modulus_bits: u32,
        public_exponent: u64,
    },
    RsaSsaPss {
        sig_hash: HashType,
        mgf1_hash: HashType,
        modulus_bits: u32,
        public_exponent: u64,
        salt_length: SaltLength,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyStatus {
    Enabled,
    Disabled,
}

#[derive(Clone)]
pub enum KeyMaterial {
    Public(PKey<Public>),
    Private(PKey<Private>),
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyMaterial::Public(k) => write!(f, "Public({:?})", k.id()),
            KeyMaterial::Private(k) => write!(f, "Private({:?})", k.id()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct KeyEntry {
    pub key: KeyMaterial,
    pub params: KeyParams,
    pub prefix: OutputPrefix,
    pub status: KeyStatus,
}

impl KeyEntry {
    fn verify(&self, signature: &[u8], data: &[u8]) -> Result<(), Error> {
        match &self.key {
            KeyMaterial::Public(k) => verify_with(k, &self.params, signature, data),
            KeyMaterial::Private(k) => verify_with(k, &self.params, signature, data),
        }
    }
}

/// An algorithm-pinned set of verification keys
#[derive(Clone, Debug)]
pub struct VerifierKey {
    entries: Vec<KeyEntry>,
}

impl VerifierKey {
    pub fn new(entries: Vec<KeyEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[KeyEntry] {
        &self.entries
    }

    /// Build a single-key verifier for `alg` from a PEM-encoded public key
    pub fn from_pem(pem: &[u8], alg: SigningAlgorithm) -> Result<VerifierKey, Error> {
        let key = public_key_from_pem(pem)?;

        let params = match alg {
            SigningAlgorithm::EcdsaP256Sha256 => ecdsa_p256_params(&key)?,
            SigningAlgorithm::RsassaPkcs1v15Sha256 => {
                let (modulus_bits, public_exponent) = rsa_params(&key)?;
                if public_exponent != F4 {
                    return Err(Error::UnsupportedParameters(format!(
                        "invalid public exponent: {public_exponent}, want {F4}"
                    )));
                }
                KeyParams::RsaSsaPkcs1 {
                    hash: HashType::Sha256,
                    modulus_bits,
                    public_exponent,
                }
            }
            SigningAlgorithm::RsassaPssSha256 => {
                let (modulus_bits, public_exponent) = rsa_params(&key)?;
                if public_exponent < F4 || public_exponent % 2 == 0 {
                    return Err(Error::UnsupportedParameters(format!(
                        "invalid public exponent: {public_exponent}, want an odd value >= {F4}"
                    )));
                }
                KeyParams::RsaSsaPss {
                    sig_hash: HashType::Sha256,
                    mgf1_hash: HashType::Sha256,
                    modulus_bits,
                    public_exponent,
                    salt_length: SaltLength::Auto,
                }
            }
            SigningAlgorithm::Unspecified => {
                return Err(Error::UnsupportedAlgorithm(alg.to_string()))
            }
        };

        Ok(VerifierKey::new(vec![KeyEntry {
            key: KeyMaterial::Public(key),
            params,
            prefix: OutputPrefix::None,
            status: KeyStatus::Enabled,
        }]))
    }

    /// Export the key as a PKIX PEM public key.  Only a single enabled
    /// ECDSA P-256/SHA-256/DER or RSASSA-PKCS1-v1_5/SHA-256/F4 public key
    /// without an output prefix can be exported.
    pub fn to_pem(&self) -> Result<Vec<u8>, Error> {
        let entry = match self.entries.as_slice() {
            [entry] => entry,
            entries => {
                return Err(Error::UnsupportedParameters(format!(
                    "unexpected number of keys: got {}, want 1",
                    entries.len()
                )))
            }
        };

        if entry.status != KeyStatus::Enabled {
            return Err(Error::UnsupportedParameters(format!(
                "unsupported key status: {:?}, want {:?}",
                entry.status,
                KeyStatus::Enabled
            )));
        }

        let key = match &entry.key {
            KeyMaterial::Public(k) => k,
            KeyMaterial::Private(_) => {
                return Err(Error::WrongKeyType(
                    "got a private key, want a public key".to_string(),
                ))
            }
        };

        if entry.prefix != OutputPrefix::None {
            return Err(Error::UnsupportedParameters(format!(
                "unsupported output prefix: {:?}, want {:?}",
                entry.prefix,
                OutputPrefix::None
            )));
        }

        match entry.params {
            KeyParams::Ecdsa {
                curve,
                hash,
                encoding,
            } => {
                expect_param("hash type", hash, HashType::Sha256)?;
                expect_param("curve type", curve, Curve::NistP256)?;
                expect_param("signature encoding", encoding, SignatureEncoding::Der)?;
            }
            KeyParams::RsaSsaPkcs1 {
                hash,
                public_exponent,
                ..
            } => {
                expect_param("hash type", hash, HashType::Sha256)?;
                expect_param("public exponent", public_exponent, F4)?;
            }
            KeyParams::RsaSsaPss { .. } => {
                return Err(Error::UnsupportedParameters(
                    "PEM export of RSASSA-PSS keys is not supported".to_string(),
                ))
            }
        }

        key.public_key_to_pem()
            .map_err(|e| Error::InvalidKey(e.to_string()))
    }

    /// Check `signature` over `data` against every enabled, unprefixed key
    pub fn verify(&self, signature: &[u8], data: &[u8]) -> Result<(), Error> {
        let mut last = Error::InvalidSignature("no usable key in the key set".to_string());

        for entry in self
            .entries
            .iter()
            .filter(|e| e.status == KeyStatus::Enabled && e.prefix == OutputPrefix::None)
        {
            match entry.verify(signature, data) {
                Ok(()) => return Ok(()),
                Err(e) => last = e,
            }
        }

        Err(last)
    }
}

fn expect_param<T: PartialEq + fmt::Debug>(what: &str, got: T, want: T) -> Result<(), Error> {
    if got != want {
        return Err(Error::UnsupportedParameters(format!(
            "unsupported {what}: {got:?}, want {want:?}"
        )));
    }
    Ok(())
}

fn public_key_from_pem(pem: &[u8]) -> Result<PKey<Public>, Error> {
    let (_, block) = parse_x509_pem(pem)
        .map_err(|e| Error::NotPem(format!("no PEM data found: {e:?}")))?;

    match block.label.as_str() {
        SPKI_PEM_LABEL => PKey::public_key_from_der(&block.contents)
            .map_err(|e| Error::InvalidKey(e.to_string())),
        PKCS1_PEM_LABEL => Rsa::public_key_from_der_pkcs1(&block.contents)
            .and_then(PKey::from_rsa)
            .map_err(|e| Error::InvalidKey(e.to_string())),
        other => Err(Error::UnsupportedPemType(format!("[{other}]"))),
    }
}

fn ecdsa_p256_params(key: &PKey<Public>) -> Result<KeyParams, Error> {
    let ec = key.ec_key().map_err(|_| {
        Error::WrongKeyType(format!(
            "public key is not an ECDSA public key: {:?}",
            key.id()
        ))
    })?;

    ec.check_key()
        .map_err(|e| Error::InvalidKey(e.to_string()))?;

    let curve = ec.group().curve_name().and_then(Curve::from_nid);
    if curve != Some(Curve::NistP256) {
        return Err(Error::UnsupportedParameters(format!(
            "unsupported curve type: {curve:?}, want {:?}",
            Curve::NistP256
        )));
    }

    Ok(KeyParams::Ecdsa {
        curve: Curve::NistP256,
        hash: HashType::Sha256,
        encoding: SignatureEncoding::Der,
    })
}

// (modulus bits, public exponent)
fn rsa_params(key: &PKey<Public>) -> Result<(u32, u64), Error> {
    if key.id() != Id::RSA {
        return Err(Error::WrongKeyType(format!(
            "public key is not a RSA public key: {:?}",
            key.id()
        )));
    }

    let rsa = key
        .rsa()
        .map_err(|e| Error::InvalidKey(e.to_string()))?;

    let modulus_bits = rsa.n().num_bits() as u32;
    if modulus_bits < MIN_RSA_MODULUS_BITS {
        return Err(Error::UnsupportedParameters(format!(
            "modulus size {modulus_bits} bits, want at least {MIN_RSA_MODULUS_BITS}"
        )));
    }

    let e = rsa.e().to_vec();
    if e.len() > 8 {
        return Err(Error::UnsupportedParameters(format!(
            "public exponent of {} bytes",
            e.len()
        )));
    }
    let public_exponent = e.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b));

    Ok((modulus_bits, public_exponent))
}

fn verify_with<T: HasPublic>(
    key: &PKeyRef<T>,
    params: &KeyParams,
    signature: &[u8],
    data: &[u8],
) -> Result<(), Error> {
    let crypto = |e: openssl::error::ErrorStack| Error::InvalidSignature(e.to_string());

    let ok = match *params {
        KeyParams::Ecdsa {
            hash, encoding, ..
        } => {
            let der = match encoding {
                SignatureEncoding::Der => signature.to_vec(),
                SignatureEncoding::IeeeP1363 => p1363_to_der(signature)?,
            };
            let mut v = Verifier::new(hash.message_digest(), key).map_err(crypto)?;
            v.verify_oneshot(&der, data).map_err(crypto)?
        }
        KeyParams::RsaSsaPkcs1 { hash, .. } => {
            let mut v = Verifier::new(hash.message_digest(), key).map_err(crypto)?;
            v.set_rsa_padding(Padding::PKCS1).map_err(crypto)?;
            v.verify_oneshot(signature, data).map_err(crypto)?
        }
        KeyParams::RsaSsaPss {
            sig_hash,
            mgf1_hash,
            salt_length,
            ..
        } => {
            let saltlen = match salt_length {
                // RSA_PSS_SALTLEN_AUTO
                SaltLength::Auto => RsaPssSaltlen::custom(-2),
                SaltLength::Bytes(n) => RsaPssSaltlen::custom(n as i32),
            };
            let mut v = Verifier::new(sig_hash.message_digest(), key).map_err(crypto)?;
            v.set_rsa_padding(Padding::PKCS1_PSS).map_err(crypto)?;
            v.set_rsa_mgf1_md(mgf1_hash.message_digest())
                .map_err(crypto)?;
            v.set_rsa_pss_saltlen(saltlen).map_err(crypto)?;
            v.verify_oneshot(signature, data).map_err(crypto)?
        }
    };

    if !ok {
        return Err(Error::InvalidSignature(
            "signature does not match the payload".to_string(),
        ));
    }

    Ok(())
}

fn p1363_to_der(signature: &[u8]) -> Result<Vec<u8>, Error> {
    if signature.is_empty() || signature.len() % 2 != 0 {
        return Err(Error::InvalidSignature(format!(
            "IEEE P1363 signature of {} bytes",
            signature.len()
        )));
    }

    let (r, s) = signature.split_at(signature.len() / 2);
    let crypto = |e: openssl::error::ErrorStack| Error::InvalidSignature(e.to_string());

    EcdsaSig::from_private_components(
        BigNum::from_slice(r).map_err(crypto)?,
        BigNum::from_slice(s).map_err(crypto)?,
    )
    .and_then(|sig| sig.to_der())
    .map_err(crypto)
}

#[cfg(test)]
mod tests {
    use super::*;
    use openssl::ec::{EcGroup, EcKey};
    use openssl::sign::Signer;

    const ECDSA_P256_PEM: &[u8] = include_bytes!("../../testdata/ecdsa-p256.pem");
    const ECDSA_P384_PEM: &[u8] = include_bytes!("../../testdata/ecdsa-p384.pem");
    const RSA_PEM: &[u8] = include_bytes!("../../testdata/rsa-2048.pem");
    const RSA_PKCS1_PEM: &[u8] = include_bytes!("../../testdata/rsa-2048-pkcs1.pem");
    const RSA_E3_PEM: &[u8] = include_bytes!("../../testdata/rsa-2048-e3.pem");

    const ECDSA_PAYLOAD: &[u8] = include_bytes!("../../testdata/ecdsa-p256-sha256-payload.json");
    const ECDSA_SIG: &[u8] = include_bytes!("../../testdata/ecdsa-p256-sha256.sig");
    const PKCS1_PAYLOAD: &[u8] =
        include_bytes!("../../testdata/rsassa-pkcs1v15-sha256-payload.json");
    const PKCS1_SIG: &[u8] = include_bytes!("../../testdata/rsassa-pkcs1v15-sha256.sig");
    const PSS_PAYLOAD: &[u8] = include_bytes!("../../testdata/rsassa-pss-sha256-payload.json");
    const PSS_SIG: &[u8] = include_bytes!("../../testdata/rsassa-pss-sha256.sig");

    fn p256_private_key() -> PKey<Private> {
        let group = EcGroup::from_curve_name(Nid::X9_62_PRIME256V1).unwrap();
        PKey::from_ec_key(EcKey::generate(&group).unwrap()).unwrap()
    }

    fn entry_for(pem: &[u8], alg: SigningAlgorithm) -> KeyEntry {
        VerifierKey::from_pem(pem, alg).unwrap().entries()[0].clone()
    }

    #[test]
    fn verify_fixtures() {
        let tvs = [
            (ECDSA_P256_PEM, SigningAlgorithm::EcdsaP256Sha256, ECDSA_PAYLOAD, ECDSA_SIG),
            (RSA_PEM, SigningAlgorithm::RsassaPkcs1v15Sha256, PKCS1_PAYLOAD, PKCS1_SIG),
            (RSA_PEM, SigningAlgorithm::RsassaPssSha256, PSS_PAYLOAD, PSS_SIG),
        ];

        for (pem, alg, payload, sig) in tvs.iter() {
            let key = VerifierKey::from_pem(pem, *alg).unwrap();

            key.verify(sig, payload)
                .unwrap_or_else(|e| panic!("{alg}: {e}"));

            let mut tampered = payload.to_vec();
            tampered.push(b' ');
            assert!(matches!(
                key.verify(sig, &tampered),
                Err(Error::InvalidSignature(_))
            ));
        }
    }

    #[test]
    fn pss_and_pkcs1_are_not_interchangeable() {
        let pss = VerifierKey::from_pem(RSA_PEM, SigningAlgorithm::RsassaPssSha256).unwrap();
        let pkcs1 = VerifierKey::from_pem(RSA_PEM, SigningAlgorithm::RsassaPkcs1v15Sha256).unwrap();

        assert!(pss.verify(PKCS1_SIG, PKCS1_PAYLOAD).is_err());
        assert!(pkcs1.verify(PSS_SIG, PSS_PAYLOAD).is_err());
    }

    #[test]
    fn pkcs1_pem_label() {
        let key =
            VerifierKey::from_pem(RSA_PKCS1_PEM, SigningAlgorithm::RsassaPkcs1v15Sha256).unwrap();

        key.verify(PKCS1_SIG, PKCS1_PAYLOAD).unwrap();
    }

    #[test]
    fn wrong_key_type() {
        let tvs = [
            (RSA_PEM, SigningAlgorithm::EcdsaP256Sha256),
            (ECDSA_P256_PEM, SigningAlgorithm::RsassaPkcs1v15Sha256),
            (ECDSA_P256_PEM, SigningAlgorithm::RsassaPssSha256),
        ];

        for (pem, alg) in tvs.iter() {
            let e = VerifierKey::from_pem(pem, *alg).unwrap_err();
            assert!(matches!(e, Error::WrongKeyType(_)), "{alg}: {e}");
        }

        let e = VerifierKey::from_pem(RSA_PEM, SigningAlgorithm::EcdsaP256Sha256).unwrap_err();
        assert!(e.to_string().contains("ECDSA"));
    }

    #[test]
    fn unsupported_parameters() {
        let tvs = [
            (ECDSA_P384_PEM, SigningAlgorithm::EcdsaP256Sha256),
            (RSA_E3_PEM, SigningAlgorithm::RsassaPkcs1v15Sha256),
            (RSA_E3_PEM, SigningAlgorithm::RsassaPssSha256),
        ];

        for (pem, alg) in tvs.iter() {
            let e = VerifierKey::from_pem(pem, *alg).unwrap_err();
            assert!(matches!(e, Error::UnsupportedParameters(_)), "{alg}: {e}");
        }
    }

    #[test]
    fn pem_errors() {
        assert!(matches!(
            VerifierKey::from_pem(b"invalid pem key", SigningAlgorithm::EcdsaP256Sha256),
            Err(Error::NotPem(_))
        ));

        let cert = b"-----BEGIN CERTIFICATE-----\nAAAA\n-----END CERTIFICATE-----\n";
        assert!(matches!(
            VerifierKey::from_pem(cert, SigningAlgorithm::EcdsaP256Sha256),
            Err(Error::UnsupportedPemType(_))
        ));

        let garbage = b"-----BEGIN PUBLIC KEY-----\nAAAA\n-----END PUBLIC KEY-----\n";
        assert!(matches!(
            VerifierKey::from_pem(garbage, SigningAlgorithm::EcdsaP256Sha256),
            Err(Error::InvalidKey(_))
        ));
    }

    #[test]
    fn unspecified_algorithm() {
        assert!(matches!(
            VerifierKey::from_pem(ECDSA_P256_PEM, SigningAlgorithm::Unspecified),
            Err(Error::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn to_pem_round_trip() {
        for (pem, alg) in [
            (ECDSA_P256_PEM, SigningAlgorithm::EcdsaP256Sha256),
            (RSA_PEM, SigningAlgorithm::RsassaPkcs1v15Sha256),
        ] {
            let exported = VerifierKey::from_pem(pem, alg).unwrap().to_pem().unwrap();

            assert_eq!(
                String::from_utf8(exported).unwrap().trim_end(),
                std::str::from_utf8(pem).unwrap().trim_end()
            );
        }
    }

    #[test]
    fn to_pem_pkcs1_label_becomes_pkix() {
        let exported = VerifierKey::from_pem(RSA_PKCS1_PEM, SigningAlgorithm::RsassaPkcs1v15Sha256)
            .unwrap()
            .to_pem()
            .unwrap();

        assert_eq!(
            String::from_utf8(exported).unwrap().trim_end(),
            std::str::from_utf8(RSA_PEM).unwrap().trim_end()
        );
    }

    #[test]
    fn to_pem_rejects_pss() {
        let key = VerifierKey::from_pem(RSA_PEM, SigningAlgorithm::RsassaPssSha256).unwrap();

        assert!(matches!(
            key.to_pem(),
            Err(Error::UnsupportedParameters(_))
        ));
    }

    #[test]
    fn to_pem_rejects_key_sets() {
        let entry = entry_for(ECDSA_P256_PEM, SigningAlgorithm::EcdsaP256Sha256);

        let two = VerifierKey::new(vec![entry.clone(), entry.clone()]);
        assert!(matches!(two.to_pem(), Err(Error::UnsupportedParameters(_))));

        let none = VerifierKey::new(vec![]);
        assert!(matches!(none.to_pem(), Err(Error::UnsupportedParameters(_))));

        let mut disabled = entry.clone();
        disabled.status = KeyStatus::Disabled;
        assert!(matches!(
            VerifierKey::new(vec![disabled]).to_pem(),
            Err(Error::UnsupportedParameters(_))
        ));

        let mut prefixed = entry.clone();
        prefixed.prefix = OutputPrefix::Tink(0x01020304);
        assert!(matches!(
            VerifierKey::new(vec![prefixed]).to_pem(),
            Err(Error::UnsupportedParameters(_))
        ));

        let private = KeyEntry {
            key: KeyMaterial::Private(p256_private_key()),
            ..entry
        };
        assert!(matches!(
            VerifierKey::new(vec![private]).to_pem(),
            Err(Error::WrongKeyType(_))
        ));
    }

    #[test]
    fn to_pem_rejects_parameter_mismatch() {
        let entry = entry_for(ECDSA_P256_PEM, SigningAlgorithm::EcdsaP256Sha256);

        let variants = [
            KeyParams::Ecdsa {
                curve: Curve::NistP256,
                hash: HashType::Sha512,
                encoding: SignatureEncoding::Der,
            },
            KeyParams::Ecdsa {
                curve: Curve::NistP384,
                hash: HashType::Sha256,
                encoding: SignatureEncoding::Der,
            },
            KeyParams::Ecdsa {
                curve: Curve::NistP256,
                hash: HashType::Sha256,
                encoding: SignatureEncoding::IeeeP1363,
            },
        ];

        for params in variants {
            let key = VerifierKey::new(vec![KeyEntry {
                params,
                ..entry.clone()
            }]);
            assert!(matches!(key.to_pem(), Err(Error::UnsupportedParameters(_))));
        }

        let rsa = entry_for(RSA_PEM, SigningAlgorithm::RsassaPkcs1v15Sha256);
        let key = VerifierKey::new(vec![KeyEntry {
            params: KeyParams::RsaSsaPkcs1 {
                hash: HashType::Sha256,
                modulus_bits: 2048,
                public_exponent: 3,
            },
            ..rsa
        }]);
        assert!(matches!(key.to_pem(), Err(Error::UnsupportedParameters(_))));
    }

    #[test]
    fn verify_skips_disabled_and_prefixed_entries() {
        let entry = entry_for(ECDSA_P256_PEM, SigningAlgorithm::EcdsaP256Sha256);

        let mut disabled = entry.clone();
        disabled.status = KeyStatus::Disabled;
        let mut prefixed = entry.clone();
        prefixed.prefix = OutputPrefix::Legacy(7);

        let key = VerifierKey::new(vec![disabled, prefixed]);
        assert!(matches!(
            key.verify(ECDSA_SIG, ECDSA_PAYLOAD),
            Err(Error::InvalidSignature(_))
        ));

        let other = entry_for(
            include_bytes!("../../testdata/ecdsa-p256-other.pem"),
            SigningAlgorithm::EcdsaP256Sha256,
        );
        let key = VerifierKey::new(vec![other, entry]);
        key.verify(ECDSA_SIG, ECDSA_PAYLOAD).unwrap();
    }

    #[test]
    fn verify_with_private_entry_and_p1363() {
        let private = p256_private_key();
        let data = b"simple signing payload";

        let mut signer = Signer::new(MessageDigest::sha256(), &private).unwrap();
        let der = signer.sign_oneshot_to_vec(data).unwrap();

        let sig = EcdsaSig::from_der(&der).unwrap();
        let mut p1363 = sig.r().to_vec_padded(32).unwrap();
        p1363.extend(sig.s().to_vec_padded(32).unwrap());

        let entry = |encoding| KeyEntry {
            key: KeyMaterial::Private(private.clone()),
            params: KeyParams::Ecdsa {
                curve: Curve::NistP256,
                hash: HashType::Sha256,
                encoding,
            },
            prefix: OutputPrefix::None,
            status: KeyStatus::Enabled,
        };

        VerifierKey::new(vec![entry(SignatureEncoding::Der)])
            .verify(&der, data)
            .unwrap();
        VerifierKey::new(vec![entry(SignatureEncoding::IeeeP1363)])
            .verify(&p1363, data)
            .unwrap();
        assert!(VerifierKey::new(vec![entry(SignatureEncoding::IeeeP1363)])
            .verify(&der, data)
            .is_err());
    }
}
