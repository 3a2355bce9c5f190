mod checksum;
mod codegen;
mod compose;
mod error;
mod repr;
mod spec_def;
mod types;


pub use crate::{
    checksum::{crc16, crc16_bytes},
    codegen::GeneratedCode,
    compose::{compose, load_spec, render, write_atomic, Config, Mode, Outcome, Stage, DEFAULT_OUTPUT},
    error::{Error, Result},
    repr::{Field, MessageSpec, MessageType},
    spec_def::{MessageDef, OrderedMap, SpecDef},
    types::{resolve, TypeCode},
};

pub fn load_definitions(data: &[u8]) -> Result<MessageSpec> {
    let def = spec_def::parse(data)
        .map_err(|source| Error::SpecParse { path: "<memory>".into(), source })?;
    repr::parse_definitions(&def)
}

pub fn generate_code(spec: &MessageSpec) -> GeneratedCode {
    codegen::generate(spec)
}
