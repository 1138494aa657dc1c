// Copyright 2024 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::content::{ContentKind, CosTlv, COS_CCMR_INDEX, COS_EVENT_PCR};
use super::envvar::parse_env_var;
use super::errors::Error;
use crate::cel::{verify_digests, Cel, HashAlg, Record, RegisterKind};
use bitmask::*;
use indexmap::IndexMap;
use log::{debug, warn};
use serde::Serialize;

bitmask! {
    #[derive(Debug)]
    mask SeenSet: u8 where flags Seen {
        ImageRef        = 0x01,
        ImageDigest     = 0x02,
        ImageId         = 0x04,
        LaunchSeparator = 0x08,
    }
}

/// Container restart policy, as launched by the guest
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum RestartPolicy {
    #[default]
    Unknown,
    Never,
    Always,
    OnFailure,
}

// The literals written by the guest launcher.  `Unknown` is never accepted
// from the log.
const RESTART_POLICIES: [(&str, RestartPolicy); 3] = [
    ("Never", RestartPolicy::Never),
    ("Always", RestartPolicy::Always),
    ("OnFailure", RestartPolicy::OnFailure),
];

impl RestartPolicy {
    pub fn from_literal(s: &str) -> Option<RestartPolicy> {
        RESTART_POLICIES
            .iter()
            .find(|(l, _)| *l == s)
            .map(|(_, p)| *p)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ContainerState {
    pub image_reference: Option<String>,
    pub image_digest: Option<String>,
    pub image_id: Option<String>,
    pub restart_policy: RestartPolicy,
    /// In log order
    pub env_vars: IndexMap<String, String>,
    pub overridden_env_vars: IndexMap<String, String>,
    pub args: Vec<String>,
    pub overridden_args: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct HealthMonitoringState {
    pub memory_enabled: Option<bool>,
}

/// The workload state attested by a COS event log
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AttestedState {
    pub container: ContainerState,
    pub health_monitoring: HealthMonitoringState,
}

impl AttestedState {
    /// Replay the COS events in `records` and fold them into an attested
    /// state.  Every record must sit in the COS register of kind
    /// `register_kind` and carry digests that match its content (including
    /// one for each of `hash_algs`).  Any anomaly aborts the replay: no
    /// partial state is ever returned.
    pub fn replay(
        records: &[Record],
        register_kind: RegisterKind,
        hash_algs: &[HashAlg],
    ) -> Result<AttestedState, Error> {
        let mut r = Replayer::new(register_kind, hash_algs);

        for (i, record) in records.iter().enumerate() {
            r.fold(record).map_err(|e| {
                let e = e.context(format!("record {i}"));
                warn!("COS event log replay failed: {e}");
                e
            })?;
        }

        debug!("replayed {} COS events", records.len());

        Ok(r.state)
    }

    pub fn from_cel(
        cel: &Cel,
        register_kind: RegisterKind,
        hash_algs: &[HashAlg],
    ) -> Result<AttestedState, Error> {
        AttestedState::replay(&cel.records, register_kind, hash_algs)
    }
}

struct Replayer<'a> {
    register_kind: RegisterKind,
    hash_algs: &'a [HashAlg],
    state: AttestedState,
    seen: SeenSet,
}

impl<'a> Replayer<'a> {
    fn new(register_kind: RegisterKind, hash_algs: &'a [HashAlg]) -> Self {
        Self {
            register_kind,
            hash_algs,
            state: Default::default(),
            seen: SeenSet::none(),
        }
    }

    fn check_register(&self, record: &Record) -> Result<(), Error> {
        if record.register_kind != self.register_kind {
            return Err(Error::RegisterKindMismatch(format!(
                "expecting {}, got {}",
                self.register_kind, record.register_kind
            )));
        }

        let want = match record.register_kind {
            RegisterKind::Pcr => COS_EVENT_PCR,
            RegisterKind::Ccmr => COS_CCMR_INDEX,
        };

        if record.index != want {
            return Err(Error::UnexpectedRegisterIndex(format!(
                "expecting {} {want}, got {}",
                record.register_kind, record.index
            )));
        }

        Ok(())
    }

    fn fold(&mut self, record: &Record) -> Result<(), Error> {
        self.check_register(record)?;

        let event = CosTlv::from_tlv(&record.content)
            .map_err(|e| Error::MalformedContent(e.to_string()))?;

        // nothing is interpreted before the digests check out
        verify_digests(&event, &record.digests, self.hash_algs)
            .map_err(|e| Error::DigestMismatch(e.to_string()))?;

        if self.seen.contains(Seen::LaunchSeparator) {
            return Err(Error::EventAfterSeparator(format!(
                "found COS content type {} after the launch separator",
                event.event_type
            )));
        }

        let kind = event.kind()?;

        debug!("folding {kind} event ({} bytes)", event.content.len());

        match kind {
            ContentKind::ImageRef => {
                self.set_once(Seen::ImageRef, kind, &event.content)?;
            }
            ContentKind::ImageDigest => {
                self.set_once(Seen::ImageDigest, kind, &event.content)?;
            }
            ContentKind::ImageId => {
                self.set_once(Seen::ImageId, kind, &event.content)?;
            }
            ContentKind::RestartPolicy => {
                let s = to_string(kind, &event.content)?;
                self.state.container.restart_policy = RestartPolicy::from_literal(&s)
                    .ok_or_else(|| Error::UnknownRestartPolicy(format!("[{s}]")))?;
            }
            ContentKind::EnvVar => {
                let (name, value) = parse_env_var(&event.content)?;
                self.state.container.env_vars.insert(name, value);
            }
            ContentKind::OverrideEnv => {
                let (name, value) = parse_env_var(&event.content)?;
                self.state.container.overridden_env_vars.insert(name, value);
            }
            ContentKind::Arg => {
                let arg = to_string(kind, &event.content)?;
                self.state.container.args.push(arg);
            }
            ContentKind::OverrideArg => {
                let arg = to_string(kind, &event.content)?;
                self.state.container.overridden_args.push(arg);
            }
            ContentKind::LaunchSeparator => {
                self.seen.set(Seen::LaunchSeparator);
            }
            ContentKind::MemoryMonitor => {
                let enabled = event.content.as_slice() == [1u8];
                self.state.health_monitoring.memory_enabled = Some(enabled);
            }
        }

        Ok(())
    }

    fn set_once(&mut self, flag: Seen, kind: ContentKind, content: &[u8]) -> Result<(), Error> {
        if self.seen.contains(flag) {
            return Err(Error::DuplicateField(format!(
                "found more than one {kind} event"
            )));
        }

        let v = Some(to_string(kind, content)?);
        let c = &mut self.state.container;

        match kind {
            ContentKind::ImageRef => c.image_reference = v,
            ContentKind::ImageDigest => c.image_digest = v,
            ContentKind::ImageId => c.image_id = v,
            other => {
                return Err(Error::UnrecognizedContentKind(format!(
                    "{other} is not a single-valued field"
                )))
            }
        }

        self.seen.set(flag);

        Ok(())
    }
}

fn to_string(kind: ContentKind, content: &[u8]) -> Result<String, Error> {
    String::from_utf8(content.to_vec())
        .map_err(|e| Error::InvalidUtf8(format!("{kind} payload: {e}")))
}
