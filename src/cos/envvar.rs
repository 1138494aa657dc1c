// Copyright 2024 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;

const DELIMITER: u8 = b'=';

// ^[A-Za-z_][A-Za-z0-9_]*$
fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();

    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validate an environment variable name and value and join them as
/// `name=value`.
pub fn format_env_var(name: &[u8], value: &[u8]) -> Result<String, Error> {
    let name = std::str::from_utf8(name).map_err(|e| {
        Error::InvalidUtf8(format!("env name {}: {e}", String::from_utf8_lossy(name)))
    })?;
    let value = std::str::from_utf8(value).map_err(|e| {
        Error::InvalidUtf8(format!("env value {}: {e}", String::from_utf8_lossy(value)))
    })?;

    if !is_valid_name(name) {
        return Err(Error::InvalidName(format!(
            "env name [{name}] must start with an alpha character or '_', followed by alphanumeric characters or '_'"
        )));
    }

    Ok(format!("{name}={value}"))
}

/// Split `name=value` on the first `=`.  The value may itself contain `=`
/// and may be empty.
pub fn parse_env_var(envvar: &[u8]) -> Result<(String, String), Error> {
    let pos = envvar.iter().position(|b| *b == DELIMITER).ok_or_else(|| {
        Error::MissingDelimiter(format!(
            "env var [{}] does not contain '='",
            String::from_utf8_lossy(envvar)
        ))
    })?;

    let (name, value) = (&envvar[..pos], &envvar[pos + 1..]);

    format_env_var(name, value)?;

    // both halves were validated as UTF-8 above
    Ok((
        String::from_utf8_lossy(name).into_owned(),
        String::from_utf8_lossy(value).into_owned(),
    ))
}
