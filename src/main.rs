// Copyright 2024 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use clap::Parser;
use cosattest::cel::{Cel, HashAlg, RegisterKind};
use cosattest::cos::{AttestedState, COS_CCMR_INDEX, COS_EVENT_PCR};
use cosattest::signature::{self, ImageSignature};
use serde_json::json;
use std::error::Error;
use std::fs;
use std::process;

#[derive(Parser)]
enum CosAttestCli {
    Replay(ReplayArgs),
    Verify(VerifyArgs),
    KeyId(KeyIdArgs),
}

#[derive(Debug, clap::Args)]
#[command(author, version, long_about = None,
    about = "Replay the COS events in the supplied canonical event log and \
    print the attested container state")]
struct ReplayArgs {
    #[arg(short, long, default_value = "eventlog.bin")]
    eventlog: String,

    #[arg(short, long, default_value = "ccmr")]
    register_kind: RegisterKind,

    /// Digests each record must carry
    #[arg(long = "hash", default_value = "sha384")]
    hash_algs: Vec<HashAlg>,

    /// Quoted value of the COS register, hex encoded
    #[arg(long)]
    expected_register: Option<String>,
}

#[derive(Debug, clap::Args)]
#[command(author, version, long_about = None,
    about = "Verify the supplied cosign container image signatures against \
    the digest of the running image")]
struct VerifyArgs {
    #[arg(short, long)]
    image_digest: String,

    /// JSON array of {"payload", "signature"} objects, base64 encoded
    #[arg(short, long, default_value = "signatures.json")]
    signatures: String,

    #[arg(short, long = "allowed-key-id")]
    allowed_key_ids: Vec<String>,
}

#[derive(Debug, clap::Args)]
#[command(author, version, long_about = None,
    about = "Print the key ID of the supplied PEM public key")]
struct KeyIdArgs {
    #[arg(short, long, default_value = "key.pem")]
    pem: String,
}

fn main() {
    env_logger::init();

    let res = match CosAttestCli::parse() {
        CosAttestCli::Replay(args) => replay(&args).map_err(|e| format!("replay failed: {e}")),
        CosAttestCli::Verify(args) => {
            verify(&args).map_err(|e| format!("verification failed: {e}"))
        }
        CosAttestCli::KeyId(args) => key_id(&args).map_err(|e| format!("key ID failed: {e}")),
    };

    match res {
        Ok(out) => println!("{out}"),
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    }
}

fn replay(args: &ReplayArgs) -> Result<String, Box<dyn Error>> {
    let c: Vec<u8> = fs::read(&args.eventlog)?;

    let cel = Cel::decode(&c)?;

    if let Some(expected) = &args.expected_register {
        let expected = hex::decode(expected)?;

        let alg = args
            .hash_algs
            .iter()
            .find(|a| a.size() == expected.len())
            .ok_or_else(|| {
                format!(
                    "no --hash algorithm produces {}-byte register values",
                    expected.len()
                )
            })?;

        let index = match args.register_kind {
            RegisterKind::Pcr => COS_EVENT_PCR,
            RegisterKind::Ccmr => COS_CCMR_INDEX,
        };

        cel.replay_register(args.register_kind, index, *alg, &expected)?;
    }

    let state = AttestedState::from_cel(&cel, args.register_kind, &args.hash_algs)?;

    Ok(serde_json::to_string_pretty(&state)?)
}

fn verify(args: &VerifyArgs) -> Result<String, Box<dyn Error>> {
    let j = fs::read_to_string(&args.signatures)?;

    let sigs: Vec<ImageSignature> = serde_json::from_str(&j)?;

    let res = signature::verify(&args.image_digest, &sigs)?;

    let errors: Vec<String> = res.errors.iter().map(|e| e.to_string()).collect();

    let mut out = json!({
        "verified": res.verified,
        "errors": errors,
    });

    if !args.allowed_key_ids.is_empty() {
        out["key_ids"] = json!(signature::filter_by_key_ids(
            &res.verified,
            &args.allowed_key_ids
        ));
    }

    Ok(serde_json::to_string_pretty(&out)?)
}

fn key_id(args: &KeyIdArgs) -> Result<String, Box<dyn Error>> {
    let pem = fs::read(&args.pem)?;

    Ok(signature::key_id(&pem)?)
}
