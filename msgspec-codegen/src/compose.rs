//! Runs the full pipeline: load, validate, generate and commit the header

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

use crate::{
    codegen::{self, GeneratedCode},
    error::{Error, Result},
    repr::{self, MessageSpec},
    spec_def,
};

pub const DEFAULT_OUTPUT: &str = "generated/messagespec.h";

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Stage {
    Load,
    Validate,
    Enumeration,
    Layouts,
    SendStubs,
    Formats,
    RegistrationTable,
    RegistrationFunction,
    Finalize,
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Stage::Load => "load",
            Stage::Validate => "validate",
            Stage::Enumeration => "enumeration",
            Stage::Layouts => "layouts",
            Stage::SendStubs => "send stubs",
            Stage::Formats => "format descriptors",
            Stage::RegistrationTable => "registration table",
            Stage::RegistrationFunction => "registration function",
            Stage::Finalize => "finalize",
            Stage::Write => "write",
        })
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Mode {
    /// Replace the output file with the generated header
    Write,

    /// Compare the output file with the generated header without touching it
    Check,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    pub mode: Mode,
}

impl Config {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Config { input: input.into(), output: PathBuf::from(DEFAULT_OUTPUT), mode: Mode::Write }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Outcome {
    Written { message_types: usize, bytes: usize },
    UpToDate,
    Stale,
}

/// Loads and validates the spec at `path`
pub fn load_spec(path: &Path) -> Result<MessageSpec> {
    tracing::debug!(stage = %Stage::Load, path = %path.display(), "reading spec");
    let def = spec_def::load(path)?;

    tracing::debug!(stage = %Stage::Validate, message_types = def.len(), "validating spec");
    repr::parse_definitions(&def)
}

/// Renders the complete header for a validated spec
pub fn render(spec: &MessageSpec) -> String {
    let code: GeneratedCode = codegen::generate(spec);

    tracing::debug!(stage = %Stage::Finalize, "closing include guard");
    code.to_string()
}

pub fn compose(config: &Config) -> Result<Outcome> {
    let spec = load_spec(&config.input)?;
    let header = render(&spec);

    match config.mode {
        Mode::Write => {
            tracing::debug!(stage = %Stage::Write, path = %config.output.display(), "committing");
            write_atomic(&config.output, header.as_bytes())?;
            tracing::info!(
                path = %config.output.display(),
                message_types = spec.len(),
                "message spec composition done"
            );
            Ok(Outcome::Written { message_types: spec.len(), bytes: header.len() })
        }
        Mode::Check => match fs::read(&config.output) {
            Ok(existing) if existing == header.as_bytes() => Ok(Outcome::UpToDate),
            Ok(_) => Ok(Outcome::Stale),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %config.output.display(), "no existing output");
                Ok(Outcome::Stale)
            }
            Err(source) => Err(Error::OutputWrite { path: config.output.clone(), source }),
        },
    }
}

/// Writes `contents` to a temporary file next to `path` then renames it into place, so readers
/// see either the old file or the complete new one.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let write_err = |source| Error::OutputWrite { path: path.to_owned(), source };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let tmp = temp_path_next_to(path);
    if let Err(e) = fs::write(&tmp, contents).and_then(|_| fs::rename(&tmp, path)) {
        let _ = fs::remove_file(&tmp);
        return Err(write_err(e));
    }

    Ok(())
}

fn temp_path_next_to(path: &Path) -> PathBuf {
    let file_name = path.file_name().unwrap_or_default().to_string_lossy().to_string();
    path.with_file_name(format!(".{}.{}.tmp", file_name, std::process::id()))
}
