// Copyright 2024 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

//! Confidential Space workload attestation.
//!
//! This crate provides the verification core for workloads launched by the
//! Container-Optimized OS (COS) launcher in a confidential VM:
//! * Decoding, measuring and replaying canonical event logs (CEL)
//! * Folding the COS events of a log into the attested container state
//! * Verifying cosign container image signatures against the running image
//!
//! Both engines fail closed.  Replay aborts on the first anomalous record and
//! never returns a partial state; signature verification reports every
//! signature that failed alongside the ones that verified.

pub mod cel;
pub mod cos;
pub mod signature;
