// Copyright 2024 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use super::tlv::Tlv;
use log::debug;
use openssl::hash::{hash, MessageDigest};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

const RECNUM_TYPE: u8 = 0;
const DIGESTS_TYPE: u8 = 3;

const RECNUM_LEN: usize = 8;
const INDEX_LEN: usize = 1;

/// The kind of measurement register a record was extended into.  The
/// discriminant is the TLV type used for the index field on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum RegisterKind {
    /// TPM Platform Configuration Register
    Pcr = 1,
    /// Confidential Computing Measurement Register (CCMR n extends RTMR n-1)
    Ccmr = 108,
}

impl TryFrom<u8> for RegisterKind {
    type Error = Error;

    fn try_from(v: u8) -> Result<Self, Error> {
        match v {
            1 => Ok(RegisterKind::Pcr),
            108 => Ok(RegisterKind::Ccmr),
            unknown => Err(Error::UnknownRegisterKind(format!(
                "index type {unknown} is neither PCR nor CCMR"
            ))),
        }
    }
}

impl fmt::Display for RegisterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegisterKind::Pcr => write!(f, "PCR"),
            RegisterKind::Ccmr => write!(f, "CCMR"),
        }
    }
}

impl FromStr for RegisterKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.to_ascii_lowercase().as_str() {
            "pcr" => Ok(RegisterKind::Pcr),
            "ccmr" => Ok(RegisterKind::Ccmr),
            _ => Err(Error::UnknownRegisterKind(s.to_string())),
        }
    }
}

/// Hash algorithms a record may carry digests for, keyed by their TPM
/// algorithm identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum HashAlg {
    Sha1 = 0x04,
    Sha256 = 0x0b,
    Sha384 = 0x0c,
    Sha512 = 0x0d,
}

impl HashAlg {
    fn message_digest(self) -> MessageDigest {
        match self {
            HashAlg::Sha1 => MessageDigest::sha1(),
            HashAlg::Sha256 => MessageDigest::sha256(),
            HashAlg::Sha384 => MessageDigest::sha384(),
            HashAlg::Sha512 => MessageDigest::sha512(),
        }
    }

    /// Size in bytes of a digest produced by this algorithm
    pub fn size(self) -> usize {
        self.message_digest().size()
    }

    pub fn digest(self, data: &[u8]) -> Result<Vec<u8>, Error> {
        hash(self.message_digest(), data)
            .map(|d| d.to_vec())
            .map_err(|e| Error::Hash(format!("{self}: {e:?}")))
    }
}

impl TryFrom<u8> for HashAlg {
    type Error = Error;

    fn try_from(v: u8) -> Result<Self, Error> {
        match v {
            0x04 => Ok(HashAlg::Sha1),
            0x0b => Ok(HashAlg::Sha256),
            0x0c => Ok(HashAlg::Sha384),
            0x0d => Ok(HashAlg::Sha512),
            unknown => Err(Error::UnknownHashAlg(format!(
                "TPM algorithm id {unknown:#06x}"
            ))),
        }
    }
}

impl fmt::Display for HashAlg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HashAlg::Sha1 => "sha1",
            HashAlg::Sha256 => "sha256",
            HashAlg::Sha384 => "sha384",
            HashAlg::Sha512 => "sha512",
        };
        f.write_str(s)
    }
}

impl FromStr for HashAlg {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.to_ascii_lowercase().replace('-', "").as_str() {
            "sha1" => Ok(HashAlg::Sha1),
            "sha256" => Ok(HashAlg::Sha256),
            "sha384" => Ok(HashAlg::Sha384),
            "sha512" => Ok(HashAlg::Sha512),
            _ => Err(Error::UnknownHashAlg(s.to_string())),
        }
    }
}

/// Anything that can be carried as the content of a log record.  The digest
/// committed to the log is always computed over the canonical TLV bytes.
pub trait Content {
    fn tlv(&self) -> Result<Tlv, Error>;

    fn digest(&self, alg: HashAlg) -> Result<Vec<u8>, Error> {
        alg.digest(&self.tlv()?.encode()?)
    }
}

impl Content for Tlv {
    fn tlv(&self) -> Result<Tlv, Error> {
        Ok(self.clone())
    }
}

/// Re-derive the digests of `content` and compare them with the ones
/// recorded in the log.  Every recorded digest must match, and every
/// algorithm in `required` must have been recorded.
pub fn verify_digests(
    content: &impl Content,
    digests: &BTreeMap<HashAlg, Vec<u8>>,
    required: &[HashAlg],
) -> Result<(), Error> {
    if digests.is_empty() {
        return Err(Error::MissingDigest(
            "record carries no digests".to_string(),
        ));
    }

    for alg in required {
        if !digests.contains_key(alg) {
            return Err(Error::MissingDigest(format!(
                "record carries no {alg} digest"
            )));
        }
    }

    for (alg, recorded) in digests.iter() {
        let computed = content.digest(*alg)?;

        if computed != *recorded {
            return Err(Error::DigestMismatch(format!(
                "{alg}: recorded {}, computed {}",
                hex::encode(recorded),
                hex::encode(&computed)
            )));
        }
    }

    Ok(())
}

/// A single canonical event log record
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    /// Position of the record in the log, starting from 0
    pub recnum: u64,
    pub register_kind: RegisterKind,
    /// Register index, interpreted according to `register_kind`
    pub index: u8,
    pub digests: BTreeMap<HashAlg, Vec<u8>>,
    pub content: Tlv,
}

impl Record {
    fn read(input: &mut &[u8]) -> Result<Record, Error> {
        let recnum = Tlv::read(input)?;
        if recnum.typ != RECNUM_TYPE {
            return Err(Error::Syntax(format!(
                "expecting record number field (type {RECNUM_TYPE}), got type {}",
                recnum.typ
            )));
        }
        let recnum: [u8; RECNUM_LEN] = recnum.value.as_slice().try_into().map_err(|_| {
            Error::Syntax(format!(
                "record number: expecting {RECNUM_LEN} bytes, got {}",
                recnum.value.len()
            ))
        })?;
        let recnum = u64::from_be_bytes(recnum);

        let index = Tlv::read(input)?;
        let register_kind = RegisterKind::try_from(index.typ)?;
        if index.value.len() != INDEX_LEN {
            return Err(Error::Syntax(format!(
                "record {recnum}: register index: expecting {INDEX_LEN} byte, got {}",
                index.value.len()
            )));
        }

        let digests = Tlv::read(input)?;
        if digests.typ != DIGESTS_TYPE {
            return Err(Error::Syntax(format!(
                "record {recnum}: expecting digests field (type {DIGESTS_TYPE}), got type {}",
                digests.typ
            )));
        }
        let digests = parse_digests(recnum, &digests.value)?;

        let content = Tlv::read(input)?;

        Ok(Record {
            recnum,
            register_kind,
            index: index.value[0],
            digests,
            content,
        })
    }

    fn encode(&self) -> Result<Vec<u8>, Error> {
        let mut digests = vec![];
        for (alg, d) in self.digests.iter() {
            digests.extend(Tlv::new(*alg as u8, d.clone()).encode()?);
        }

        let mut buf = Tlv::new(RECNUM_TYPE, self.recnum.to_be_bytes().to_vec()).encode()?;
        buf.extend(Tlv::new(self.register_kind as u8, vec![self.index]).encode()?);
        buf.extend(Tlv::new(DIGESTS_TYPE, digests).encode()?);
        buf.extend(self.content.encode()?);

        Ok(buf)
    }
}

fn parse_digests(recnum: u64, buf: &[u8]) -> Result<BTreeMap<HashAlg, Vec<u8>>, Error> {
    let mut digests = BTreeMap::new();
    let mut input = buf;

    while !input.is_empty() {
        let d = Tlv::read(&mut input)?;
        let alg = HashAlg::try_from(d.typ)?;

        if d.value.len() != alg.size() {
            return Err(Error::Syntax(format!(
                "record {recnum}: {alg} digest: expecting {} bytes, got {}",
                alg.size(),
                d.value.len()
            )));
        }

        if digests.insert(alg, d.value).is_some() {
            return Err(Error::Syntax(format!(
                "record {recnum}: duplicated {alg} digest"
            )));
        }
    }

    Ok(digests)
}

/// A canonical event log: an append-only sequence of records whose digests
/// have been extended, in order, into measurement registers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cel {
    pub records: Vec<Record>,
}

impl Cel {
    pub fn new() -> Self {
        Default::default()
    }

    /// Decode a binary event log.  Record numbers must start at 0 and
    /// increase by one with each record.
    pub fn decode(buf: &[u8]) -> Result<Cel, Error> {
        let mut input = buf;
        let mut cel = Cel::new();

        while !input.is_empty() {
            let r = Record::read(&mut input)?;
            let want = cel.records.len() as u64;

            if r.recnum != want {
                return Err(Error::Syntax(format!(
                    "unexpected record number: expecting {want}, got {}",
                    r.recnum
                )));
            }

            cel.records.push(r);
        }

        debug!("decoded event log with {} records", cel.records.len());

        Ok(cel)
    }

    pub fn encode(&self) -> Result<Vec<u8>, Error> {
        let mut buf = vec![];
        for r in self.records.iter() {
            buf.extend(r.encode()?);
        }
        Ok(buf)
    }

    /// Measure `content` with each of `hash_algs` and append the resulting
    /// record.  The digests are returned so that the caller can extend the
    /// corresponding register.
    pub fn append_event(
        &mut self,
        content: &impl Content,
        hash_algs: &[HashAlg],
        register_kind: RegisterKind,
        index: u8,
    ) -> Result<BTreeMap<HashAlg, Vec<u8>>, Error> {
        let mut digests = BTreeMap::new();
        for alg in hash_algs {
            digests.insert(*alg, content.digest(*alg)?);
        }

        self.records.push(Record {
            recnum: self.records.len() as u64,
            register_kind,
            index,
            digests: digests.clone(),
            content: content.tlv()?,
        });

        Ok(digests)
    }

    /// Compute the value a register should hold after every record addressed
    /// to it has been extended into it, starting from all zeros.
    pub fn replayed_register(
        &self,
        register_kind: RegisterKind,
        index: u8,
        alg: HashAlg,
    ) -> Result<Vec<u8>, Error> {
        let mut mr = vec![0u8; alg.size()];

        for r in self
            .records
            .iter()
            .filter(|r| r.register_kind == register_kind && r.index == index)
        {
            let d = r.digests.get(&alg).ok_or_else(|| {
                Error::MissingDigest(format!("record {}: no {alg} digest", r.recnum))
            })?;

            let mut buf = mr;
            buf.extend_from_slice(d);
            mr = alg.digest(&buf)?;
        }

        Ok(mr)
    }

    /// Check that replaying the log reproduces the quoted register value
    pub fn replay_register(
        &self,
        register_kind: RegisterKind,
        index: u8,
        alg: HashAlg,
        expected: &[u8],
    ) -> Result<(), Error> {
        let mr = self.replayed_register(register_kind, index, alg)?;

        if mr != expected {
            return Err(Error::ReplayMismatch(format!(
                "{register_kind}[{index}] ({alg}): expected {}, replayed {}",
                hex::encode(expected),
                hex::encode(&mr)
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    fn test_log() -> Cel {
        let mut cel = Cel::new();

        cel.append_event(
            &Tlv::new(80, b"first".to_vec()),
            &[HashAlg::Sha256, HashAlg::Sha384],
            RegisterKind::Ccmr,
            4,
        )
        .unwrap();
        cel.append_event(
            &Tlv::new(80, b"second".to_vec()),
            &[HashAlg::Sha256, HashAlg::Sha384],
            RegisterKind::Ccmr,
            4,
        )
        .unwrap();

        cel
    }

    #[test]
    fn content_digest_over_wire_form() {
        let t = Tlv::new(80, hex!("0800000000").to_vec());

        assert_eq!(
            t.digest(HashAlg::Sha256).unwrap(),
            hex!("f812201fe3998cb38ada4dc1fa44b8ae1767a6108eb02e363f4c1356360517f5").to_vec()
        );
    }

    #[test]
    fn encode_decode_log() {
        let cel = test_log();

        let buf = cel.encode().unwrap();
        let decoded = Cel::decode(&buf).unwrap();

        assert_eq!(decoded, cel);
        assert_eq!(decoded.records[1].recnum, 1);
        assert_eq!(decoded.records[1].content.value, b"second".to_vec());
    }

    #[test]
    fn decode_out_of_sequence_recnum() {
        let mut cel = test_log();
        cel.records[1].recnum = 5;

        let buf = cel.encode().unwrap();

        assert!(matches!(Cel::decode(&buf), Err(Error::Syntax(_))));
    }

    #[test]
    fn decode_unknown_register_kind() {
        // recnum 0, index type 2 (NV index), no digests, empty content
        let buf = hex!("0000000008000000000000000002000000010403000000005000000000");

        assert!(matches!(
            Cel::decode(&buf),
            Err(Error::UnknownRegisterKind(_))
        ));
    }

    #[test]
    fn decode_unknown_hash_alg() {
        let buf = hex!("000000000800000000000000000100000001040300000007010000000201025000000000");

        assert!(matches!(Cel::decode(&buf), Err(Error::UnknownHashAlg(_))));
    }

    #[test]
    fn decode_bad_digest_length() {
        // a sha256 digest that is only 2 bytes long
        let buf = hex!("0000000008000000000000000001000000010403000000070b0000000201025000000000");

        assert!(matches!(Cel::decode(&buf), Err(Error::Syntax(_))));
    }

    #[test]
    fn verify_digests_ok() {
        let cel = test_log();
        let r = &cel.records[0];

        assert!(verify_digests(&r.content, &r.digests, &[HashAlg::Sha384]).is_ok());
    }

    #[test]
    fn verify_digests_mismatch() {
        let cel = test_log();
        let r = &cel.records[0];
        let other = Tlv::new(80, b"firsT".to_vec());

        assert!(matches!(
            verify_digests(&other, &r.digests, &[]),
            Err(Error::DigestMismatch(_))
        ));
    }

    #[test]
    fn verify_digests_missing_required() {
        let cel = test_log();
        let r = &cel.records[0];

        assert!(matches!(
            verify_digests(&r.content, &r.digests, &[HashAlg::Sha512]),
            Err(Error::MissingDigest(_))
        ));
        assert!(matches!(
            verify_digests(&r.content, &BTreeMap::new(), &[]),
            Err(Error::MissingDigest(_))
        ));
    }

    #[test]
    fn replay_register_ok() {
        let cel = test_log();

        let mut mr = vec![0u8; 48];
        for r in cel.records.iter() {
            mr.extend_from_slice(&r.digests[&HashAlg::Sha384]);
            mr = HashAlg::Sha384.digest(&mr).unwrap();
        }

        cel.replay_register(RegisterKind::Ccmr, 4, HashAlg::Sha384, &mr)
            .unwrap();
    }

    #[test]
    fn replay_register_mismatch() {
        let cel = test_log();

        assert!(matches!(
            cel.replay_register(RegisterKind::Ccmr, 4, HashAlg::Sha256, &[0u8; 32]),
            Err(Error::ReplayMismatch(_))
        ));
    }

    #[test]
    fn replay_register_untouched() {
        let cel = test_log();

        // nothing was extended into PCR 13
        cel.replay_register(RegisterKind::Pcr, 13, HashAlg::Sha256, &[0u8; 32])
            .unwrap();
    }

    #[test]
    fn parse_names() {
        assert_eq!("CCMR".parse::<RegisterKind>().unwrap(), RegisterKind::Ccmr);
        assert_eq!("sha-384".parse::<HashAlg>().unwrap(), HashAlg::Sha384);
        assert!("md5".parse::<HashAlg>().is_err());
    }
}
