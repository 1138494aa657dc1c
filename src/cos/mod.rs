// Copyright 2024 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

//! The cos module interprets the Container-Optimized OS events found in a
//! canonical event log and folds them, in log order, into the
//! [`AttestedState`] of the launched workload.
//!
//! Replay fails closed: a record in the wrong register, with content that
//! does not match its digests, of a kind that is not understood, or that
//! follows the launch separator aborts the whole replay.

pub use self::content::{
    ContentKind, CosTlv, COS_CCMR_INDEX, COS_EVENT_PCR, COS_EVENT_RTMR, COS_EVENT_TYPE,
};
pub use self::envvar::{format_env_var, parse_env_var};
pub use self::errors::Error;
pub use self::state::{AttestedState, ContainerState, HealthMonitoringState, RestartPolicy};

mod content;
mod envvar;
mod errors;
mod state;
