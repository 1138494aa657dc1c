// Copyright 2024 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

#[derive(thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("Not a COS record: {0}")]
    NotACosRecord(String),
    #[error("Malformed inner TLV: {0}")]
    MalformedInnerTlv(String),
    #[error("Invalid UTF-8: {0}")]
    InvalidUtf8(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("Missing delimiter: {0}")]
    MissingDelimiter(String),
    #[error("Register kind mismatch: {0}")]
    RegisterKindMismatch(String),
    #[error("Unexpected register index: {0}")]
    UnexpectedRegisterIndex(String),
    #[error("Malformed content: {0}")]
    MalformedContent(String),
    #[error("Digest mismatch: {0}")]
    DigestMismatch(String),
    #[error("Event after separator: {0}")]
    EventAfterSeparator(String),
    #[error("Unrecognized content kind: {0}")]
    UnrecognizedContentKind(String),
    #[error("Duplicate field: {0}")]
    DuplicateField(String),
    #[error("Unknown restart policy: {0}")]
    UnknownRestartPolicy(String),
    #[error("Event log error: {0}")]
    Cel(String),
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NotACosRecord(e)
            | Error::MalformedInnerTlv(e)
            | Error::InvalidUtf8(e)
            | Error::InvalidName(e)
            | Error::MissingDelimiter(e)
            | Error::RegisterKindMismatch(e)
            | Error::UnexpectedRegisterIndex(e)
            | Error::MalformedContent(e)
            | Error::DigestMismatch(e)
            | Error::EventAfterSeparator(e)
            | Error::UnrecognizedContentKind(e)
            | Error::DuplicateField(e)
            | Error::UnknownRestartPolicy(e)
            | Error::Cel(e) => {
                write!(f, "{}", e)
            }
        }
    }
}

impl Error {
    /// Prefix the error message with `ctx`, keeping the error kind
    pub(crate) fn context(self, ctx: impl std::fmt::Display) -> Self {
        match self {
            Error::NotACosRecord(e) => Error::NotACosRecord(format!("{ctx}: {e}")),
            Error::MalformedInnerTlv(e) => Error::MalformedInnerTlv(format!("{ctx}: {e}")),
            Error::InvalidUtf8(e) => Error::InvalidUtf8(format!("{ctx}: {e}")),
            Error::InvalidName(e) => Error::InvalidName(format!("{ctx}: {e}")),
            Error::MissingDelimiter(e) => Error::MissingDelimiter(format!("{ctx}: {e}")),
            Error::RegisterKindMismatch(e) => Error::RegisterKindMismatch(format!("{ctx}: {e}")),
            Error::UnexpectedRegisterIndex(e) => {
                Error::UnexpectedRegisterIndex(format!("{ctx}: {e}"))
            }
            Error::MalformedContent(e) => Error::MalformedContent(format!("{ctx}: {e}")),
            Error::DigestMismatch(e) => Error::DigestMismatch(format!("{ctx}: {e}")),
            Error::EventAfterSeparator(e) => Error::EventAfterSeparator(format!("{ctx}: {e}")),
            Error::UnrecognizedContentKind(e) => {
                Error::UnrecognizedContentKind(format!("{ctx}: {e}"))
            }
            Error::DuplicateField(e) => Error::DuplicateField(format!("{ctx}: {e}")),
            Error::UnknownRestartPolicy(e) => Error::UnknownRestartPolicy(format!("{ctx}: {e}")),
            Error::Cel(e) => Error::Cel(format!("{ctx}: {e}")),
        }
    }
}

impl From<crate::cel::Error> for Error {
    fn from(e: crate::cel::Error) -> Self {
        Error::Cel(e.to_string())
    }
}
