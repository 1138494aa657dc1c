// Copyright 2024 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;

const TYPE_FIELD_LEN: usize = 1;
const LENGTH_FIELD_LEN: usize = 4;
const HEADER_LEN: usize = TYPE_FIELD_LEN + LENGTH_FIELD_LEN;

/// A Type-Length-Value record.  On the wire the type is a single byte and the
/// length a 32-bit big-endian unsigned integer counting the value bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tlv {
    pub typ: u8,
    pub value: Vec<u8>,
}

impl Tlv {
    pub fn new(typ: u8, value: Vec<u8>) -> Self {
        Self { typ, value }
    }

    /// Serialise to the canonical wire form
    pub fn encode(&self) -> Result<Vec<u8>, Error> {
        let len = u32::try_from(self.value.len()).map_err(|_| {
            Error::Syntax(format!(
                "TLV value of {} bytes exceeds the length field",
                self.value.len()
            ))
        })?;

        let mut buf = Vec::with_capacity(HEADER_LEN + self.value.len());
        buf.push(self.typ);
        buf.extend_from_slice(&len.to_be_bytes());
        buf.extend_from_slice(&self.value);

        Ok(buf)
    }

    /// Decode a buffer that holds exactly one TLV.  Trailing bytes are an
    /// error: the encoding is canonical and digests are computed over it.
    pub fn decode(buf: &[u8]) -> Result<Tlv, Error> {
        let mut rest = buf;
        let t = Tlv::read(&mut rest)?;

        if !rest.is_empty() {
            return Err(Error::Syntax(format!(
                "{} trailing bytes after TLV of type {}",
                rest.len(),
                t.typ
            )));
        }

        Ok(t)
    }

    /// Consume one TLV from the front of `input`, advancing it past the
    /// decoded record.
    pub fn read(input: &mut &[u8]) -> Result<Tlv, Error> {
        let buf = *input;

        if buf.len() < HEADER_LEN {
            return Err(Error::Syntax(format!(
                "truncated TLV header: expecting {HEADER_LEN} bytes, got {}",
                buf.len()
            )));
        }

        let typ = buf[0];
        let mut len_bytes = [0u8; LENGTH_FIELD_LEN];
        len_bytes.copy_from_slice(&buf[TYPE_FIELD_LEN..HEADER_LEN]);
        let len = u32::from_be_bytes(len_bytes) as usize;

        let body = &buf[HEADER_LEN..];
        if body.len() < len {
            return Err(Error::Syntax(format!(
                "truncated TLV value for type {typ}: expecting {len} bytes, got {}",
                body.len()
            )));
        }

        *input = &body[len..];

        Ok(Tlv {
            typ,
            value: body[..len].to_vec(),
        })
    }
}
