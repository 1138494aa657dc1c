// Copyright 2024 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

//! The cel module decodes and encodes canonical event logs (CEL): a flat
//! sequence of TLV-encoded records, each carrying the register it was
//! measured into, one digest per hash algorithm, and an opaque content TLV.
//!
//! It also provides the two integrity primitives the rest of the crate
//! builds on: [`verify_digests`], which re-derives a record's digests from
//! its content, and [`Cel::replay_register`], which re-derives a measurement
//! register from the log so that it can be compared with a quoted value.

pub use self::errors::Error;
pub use self::record::{verify_digests, Cel, Content, HashAlg, Record, RegisterKind};
pub use self::tlv::Tlv;

mod errors;
mod record;
mod tlv;
