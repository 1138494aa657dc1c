// Copyright 2024 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use crate::cel::{self, Content, HashAlg, Tlv};
use std::fmt;

/// TLV type of a log record whose content is a COS event
pub const COS_EVENT_TYPE: u8 = 80;
/// PCR that COS events are extended into on TPM-based platforms
pub const COS_EVENT_PCR: u8 = 13;
/// RTMR that COS events are extended into on TDX platforms
pub const COS_EVENT_RTMR: u8 = 3;
/// CCMR index used in the event log for COS events.  CCMR 0 is MRTD and
/// CCMR n maps onto RTMR n-1, so this is RTMR 3.
pub const COS_CCMR_INDEX: u8 = COS_EVENT_RTMR + 1;

/// The kinds of content a COS event can carry.  The discriminants are part
/// of the wire format and must never be renumbered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ContentKind {
    ImageRef = 0,
    ImageDigest = 1,
    RestartPolicy = 2,
    ImageId = 3,
    Arg = 4,
    EnvVar = 5,
    OverrideArg = 6,
    OverrideEnv = 7,
    LaunchSeparator = 8,
    MemoryMonitor = 9,
}

impl TryFrom<u8> for ContentKind {
    type Error = Error;

    fn try_from(v: u8) -> Result<Self, Error> {
        let k = match v {
            0 => ContentKind::ImageRef,
            1 => ContentKind::ImageDigest,
            2 => ContentKind::RestartPolicy,
            3 => ContentKind::ImageId,
            4 => ContentKind::Arg,
            5 => ContentKind::EnvVar,
            6 => ContentKind::OverrideArg,
            7 => ContentKind::OverrideEnv,
            8 => ContentKind::LaunchSeparator,
            9 => ContentKind::MemoryMonitor,
            unknown => {
                return Err(Error::UnrecognizedContentKind(format!(
                    "COS content type {unknown}"
                )))
            }
        };
        Ok(k)
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A COS event: the nested TLV carried inside a log record's content.
///
/// The raw content type is kept as-is so that a kind this crate does not
/// know about survives decoding and can be rejected explicitly later.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CosTlv {
    pub event_type: u8,
    pub content: Vec<u8>,
}

impl CosTlv {
    pub fn new(kind: ContentKind, content: impl Into<Vec<u8>>) -> Self {
        Self {
            event_type: kind as u8,
            content: content.into(),
        }
    }

    pub fn kind(&self) -> Result<ContentKind, Error> {
        ContentKind::try_from(self.event_type)
    }

    /// Wrap the event into the outer log record TLV
    pub fn to_tlv(&self) -> Result<Tlv, Error> {
        let inner = Tlv::new(self.event_type, self.content.clone())
            .encode()
            .map_err(|e| Error::MalformedInnerTlv(e.to_string()))?;

        Ok(Tlv::new(COS_EVENT_TYPE, inner))
    }

    /// Unwrap a COS event from a log record's content
    pub fn from_tlv(t: &Tlv) -> Result<CosTlv, Error> {
        if t.typ != COS_EVENT_TYPE {
            return Err(Error::NotACosRecord(format!(
                "TLV type {} is not a COS event",
                t.typ
            )));
        }

        let inner = Tlv::decode(&t.value).map_err(|e| Error::MalformedInnerTlv(e.to_string()))?;

        Ok(CosTlv {
            event_type: inner.typ,
            content: inner.value,
        })
    }

    /// Digest of the full outer TLV, i.e., of what is committed to the log
    pub fn digest_of(&self, alg: HashAlg) -> Result<Vec<u8>, Error> {
        Ok(Content::digest(self, alg)?)
    }
}

impl Content for CosTlv {
    fn tlv(&self) -> Result<Tlv, cel::Error> {
        self.to_tlv()
            .map_err(|e| cel::Error::Syntax(e.to_string()))
    }
}
