//! The closed set of wire types a message field can have

use serde_json::Value;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum TypeCode {
    /// Whole seconds
    TimediffS = 0,

    /// Seconds and milliseconds packed into 32 bits
    TimediffMs = 1,

    U8 = 2,
    I8 = 3,
    U16 = 4,
    I16 = 5,
    U32 = 6,
    I32 = 7,
}

impl TypeCode {
    pub const ALL: [TypeCode; 8] = [
        TypeCode::TimediffS,
        TypeCode::TimediffMs,
        TypeCode::U8,
        TypeCode::I8,
        TypeCode::U16,
        TypeCode::I16,
        TypeCode::U32,
        TypeCode::I32,
    ];

    #[rustfmt::skip]
    pub fn from_code(code: u8) -> Option<TypeCode> {
        use TypeCode::*;

        Some(match code {
            0 => TimediffS,
            1 => TimediffMs,
            2 => U8,
            3 => I8,
            4 => U16,
            5 => I16,
            6 => U32,
            7 => I32,
            _ => return None,
        })
    }

    /// The raw code written into format descriptors
    pub fn code(self) -> u8 {
        self as u8
    }

    /// The C type used for this field in the generated layout
    #[rustfmt::skip]
    pub fn c_type(self) -> &'static str {
        match self {
            TypeCode::TimediffS  => "timediff_s",
            TypeCode::TimediffMs => "timediff_ms",
            TypeCode::U8         => "uint8_t",
            TypeCode::I8         => "int8_t",
            TypeCode::U16        => "uint16_t",
            TypeCode::I16        => "int16_t",
            TypeCode::U32        => "uint32_t",
            TypeCode::I32        => "int32_t",
        }
    }

    /// Number of bytes the field occupies on the wire
    #[rustfmt::skip]
    pub fn width(self) -> usize {
        match self {
            TypeCode::U8  | TypeCode::I8  => 1,
            TypeCode::U16 | TypeCode::I16 => 2,
            TypeCode::TimediffS | TypeCode::TimediffMs | TypeCode::U32 | TypeCode::I32 => 4,
        }
    }
}

/// Resolves a type code as it appears in a spec document. Anything that is not an integer in the
/// closed set (including strings and floats) is unknown.
pub fn resolve(code: &Value) -> Option<TypeCode> {
    let code = code.as_u64()?;
    if code > u8::MAX as u64 {
        return None;
    }
    TypeCode::from_code(code as u8)
}
