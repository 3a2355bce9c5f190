//! Code for parsing message specs from a JSON document

use std::{fmt, marker::PhantomData, path::Path};

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde_json::{Number, Value};

use crate::error::{Error, Result};

/// A JSON object whose entries are kept in document order, including repeated keys.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V>(pub Vec<(String, V)>);

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        OrderedMap(vec![])
    }
}

impl<V> OrderedMap<V> {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

struct OrderedMapVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
    type Value = OrderedMap<V>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a JSON object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(entry) = access.next_entry::<String, V>()? {
            entries.push(entry);
        }
        Ok(OrderedMap(entries))
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

/// The top level of a spec document: message type name to definition.
pub type SpecDef = OrderedMap<MessageDef>;

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct MessageDef {
    /// Kept as a raw number so out-of-range ids are reported by validation rather than the parser
    pub id: Option<Number>,

    #[serde(default)]
    pub bundle: bool,

    /// Field name to raw type code. Codes stay as raw values until validation.
    #[serde(default)]
    pub data_types: OrderedMap<Value>,
}

pub fn parse(data: &[u8]) -> std::result::Result<SpecDef, serde_json::Error> {
    serde_json::from_slice(data)
}

pub fn load(path: &Path) -> Result<SpecDef> {
    let data = std::fs::read(path)
        .map_err(|source| Error::SpecRead { path: path.to_owned(), source })?;
    parse(&data).map_err(|source| Error::SpecParse { path: path.to_owned(), source })
}
