//! Code for constructing a validated representation of a message spec, with every id checked and
//! every type code resolved, so that code generation can not fail

use std::{collections::HashMap, convert::TryFrom};

use serde_json::Number;

use crate::{
    checksum::{crc16, CRC16_INIT},
    error::{Error, Result},
    spec_def::{MessageDef, SpecDef},
    types::{self, TypeCode},
};

#[derive(Debug, Clone, PartialEq)]
pub struct MessageSpec {
    /// Message types in declaration order
    pub messages: Vec<MessageType>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessageType {
    /// The key of the message type in the spec, used verbatim in struct and function names
    pub name: String,

    /// The enum constant naming this message type
    pub ident: String,

    pub id: u8,

    /// Whether the type is delivered as part of a bundle
    pub bundle: bool,

    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: TypeCode,
}

impl MessageSpec {
    pub fn bundles(&self) -> impl Iterator<Item = &MessageType> {
        self.messages.iter().filter(|msg| msg.bundle)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// CRC16 over each message type's id followed by its format descriptor, in table order
    pub fn checksum(&self) -> u16 {
        self.messages.iter().fold(CRC16_INIT, |crc, msg| {
            msg.fields.iter().fold(crc16(crc, msg.id), |crc, field| crc16(crc, field.ty.code()))
        })
    }
}

impl MessageType {
    pub fn layout_name(&self) -> String {
        format!("msgspec_{}_t", self.name)
    }

    pub fn format_name(&self) -> String {
        format!("msgspec_binary_{}", self.name)
    }

    pub fn send_fn_name(&self) -> String {
        format!("tbi_send_{}", self.name)
    }

    /// The format descriptor: raw type codes in field order
    pub fn format(&self) -> Vec<u8> {
        self.fields.iter().map(|field| field.ty.code()).collect()
    }

    /// Number of bytes the fields occupy once serialized, without any padding
    pub fn wire_size(&self) -> usize {
        self.fields.iter().map(|field| field.ty.width()).sum()
    }
}

pub fn parse_definitions(def: &SpecDef) -> Result<MessageSpec> {
    // An empty enum is not valid C
    if def.is_empty() {
        return Err(Error::NoMessageTypes);
    }

    let mut messages = Vec::with_capacity(def.len());
    let mut ids: HashMap<u8, &str> = HashMap::new();
    let mut idents: HashMap<String, &str> = HashMap::new();

    for (name, msg_def) in def.iter() {
        let msg = parse_message(name, msg_def)?;

        if let Some(first) = ids.insert(msg.id, name) {
            return Err(Error::DuplicateId {
                id: msg.id,
                first: first.to_owned(),
                second: name.to_owned(),
            });
        }

        if let Some(first) = idents.insert(msg.ident.clone(), name) {
            return Err(Error::DuplicateName {
                ident: msg.ident,
                first: first.to_owned(),
                second: name.to_owned(),
            });
        }

        tracing::trace!(name, id = msg.id, fields = msg.fields.len(), "validated message type");
        messages.push(msg);
    }

    Ok(MessageSpec { messages })
}

fn parse_message(name: &str, def: &MessageDef) -> Result<MessageType> {
    check_ident(name)?;

    let id = message_id(name, def.id.as_ref())?;

    let mut fields: Vec<Field> = Vec::with_capacity(def.data_types.len());
    for (field_name, code) in def.data_types.iter() {
        check_ident(field_name)?;

        if fields.iter().any(|field| field.name == field_name) {
            return Err(Error::DuplicateField {
                name: name.to_owned(),
                field: field_name.to_owned(),
            });
        }

        let ty = types::resolve(code).ok_or_else(|| Error::UnknownTypeCode {
            name: name.to_owned(),
            field: field_name.to_owned(),
            code: code.to_string(),
        })?;

        fields.push(Field { name: field_name.to_owned(), ty });
    }

    // Keys are C identifiers already, uppercasing keeps them valid
    let ident = name.to_ascii_uppercase();

    Ok(MessageType {
        name: name.to_owned(),
        ident,
        id,
        bundle: def.bundle,
        fields,
    })
}

/// Classifies a raw id: integers above 255 are out of range, anything else that is not a
/// non-negative integer counts as missing
fn message_id(name: &str, id: Option<&Number>) -> Result<u8> {
    let id = match id {
        Some(id) => id,
        None => return Err(Error::MissingId { name: name.to_owned(), found: None }),
    };

    if let Some(value) = id.as_u64() {
        return u8::try_from(value)
            .map_err(|_| Error::IdOutOfRange { name: name.to_owned(), id: id.to_string() });
    }

    match id.as_f64() {
        // Integers past u64::MAX only survive parsing as floats
        Some(value) if value >= u64::MAX as f64 => {
            Err(Error::IdOutOfRange { name: name.to_owned(), id: id.to_string() })
        }
        _ => Err(Error::MissingId { name: name.to_owned(), found: Some(id.to_string()) }),
    }
}

fn check_ident(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {
            chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        }
        _ => false,
    };

    match valid {
        true => Ok(()),
        false => Err(Error::InvalidIdentifier(name.to_owned())),
    }
}
