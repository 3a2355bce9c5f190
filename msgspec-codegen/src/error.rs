use std::{io, path::PathBuf};

use thiserror::Error;

use crate::compose::Stage;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read spec {}: {source}", .path.display())]
    SpecRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse spec {}: {source}", .path.display())]
    SpecParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("spec declares no message types")]
    NoMessageTypes,

    #[error("message type `{name}` has no valid id (found {})", .found.as_deref().unwrap_or("nothing"))]
    MissingId { name: String, found: Option<String> },

    #[error("message types `{first}` and `{second}` share id {id}")]
    DuplicateId { id: u8, first: String, second: String },

    #[error("message type `{name}` has id {id}, ids must fit in a byte")]
    IdOutOfRange { name: String, id: String },

    #[error("field `{field}` of message type `{name}` has unknown type code {code}")]
    UnknownTypeCode { name: String, field: String, code: String },

    #[error("message types `{first}` and `{second}` both map to `{ident}`")]
    DuplicateName { ident: String, first: String, second: String },

    #[error("message type `{name}` declares field `{field}` more than once")]
    DuplicateField { name: String, field: String },

    #[error("`{0}` is not a valid C identifier")]
    InvalidIdentifier(String),

    #[error("failed to write {}: {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// The pipeline stage that produced this error
    pub fn stage(&self) -> Stage {
        match self {
            Error::SpecRead { .. } | Error::SpecParse { .. } => Stage::Load,
            Error::OutputWrite { .. } => Stage::Write,
            _ => Stage::Validate,
        }
    }

    /// Process exit code for this error, distinct per failure class
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::SpecRead { .. } => 2,
            Error::SpecParse { .. } => 3,
            Error::OutputWrite { .. } => 5,
            _ => 4,
        }
    }
}
