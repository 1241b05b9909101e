//! Parameter values: parsing user input and encoding it for the program's globals.

use podtop_common::L3Endpoint;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use super::registry::ParamDef;
use super::type_hint::TypeHint;
use crate::domain::ParamError;

/// A validated value for one parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
    Bool(bool),
    Float32(f32),
    Float64(f64),
    Ip(IpAddr),
    /// Value plus the declared array length it is written into
    String { value: String, len: usize },
}

impl ParamValue {
    /// Validate `raw` against the parameter's type hint.
    ///
    /// # Errors
    /// Returns `UnsupportedType` for parameters classified as unknown and
    /// `InvalidValue` when `raw` does not fit the type
    pub fn parse(def: &ParamDef, raw: &str) -> Result<Self, ParamError> {
        let invalid = |reason: String| ParamError::InvalidValue {
            key: def.key.clone(),
            type_hint: def.type_hint.to_string(),
            value: raw.to_string(),
            reason,
        };
        let trimmed = raw.trim();

        let value = match def.type_hint {
            TypeHint::Int8 => ParamValue::Int8(parse_num(trimmed).map_err(invalid)?),
            TypeHint::Int16 => ParamValue::Int16(parse_num(trimmed).map_err(invalid)?),
            TypeHint::Int32 => ParamValue::Int32(parse_num(trimmed).map_err(invalid)?),
            TypeHint::Int64 => ParamValue::Int64(parse_num(trimmed).map_err(invalid)?),
            TypeHint::Uint8 => ParamValue::Uint8(parse_num(trimmed).map_err(invalid)?),
            TypeHint::Uint16 => ParamValue::Uint16(parse_num(trimmed).map_err(invalid)?),
            TypeHint::Uint32 => ParamValue::Uint32(parse_num(trimmed).map_err(invalid)?),
            TypeHint::Uint64 => ParamValue::Uint64(parse_num(trimmed).map_err(invalid)?),
            TypeHint::Float32 => ParamValue::Float32(parse_num(trimmed).map_err(invalid)?),
            TypeHint::Float64 => ParamValue::Float64(parse_num(trimmed).map_err(invalid)?),
            TypeHint::Bool => ParamValue::Bool(parse_bool(trimmed).map_err(invalid)?),
            TypeHint::Ip => ParamValue::Ip(parse_num(trimmed).map_err(invalid)?),
            TypeHint::String => {
                let len = def.string_len.unwrap_or(0);
                // One byte is reserved for the terminating NUL
                if raw.len() >= len {
                    return Err(invalid(format!("longer than {} bytes", len.saturating_sub(1))));
                }
                ParamValue::String { value: raw.to_string(), len }
            }
            TypeHint::Unknown => {
                return Err(ParamError::UnsupportedType { key: def.key.clone() });
            }
        };
        Ok(value)
    }

    /// Native-endian byte image of the value, sized like the global it targets.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            ParamValue::Int8(v) => v.to_ne_bytes().to_vec(),
            ParamValue::Int16(v) => v.to_ne_bytes().to_vec(),
            ParamValue::Int32(v) => v.to_ne_bytes().to_vec(),
            ParamValue::Int64(v) => v.to_ne_bytes().to_vec(),
            ParamValue::Uint8(v) => vec![*v],
            ParamValue::Uint16(v) => v.to_ne_bytes().to_vec(),
            ParamValue::Uint32(v) => v.to_ne_bytes().to_vec(),
            ParamValue::Uint64(v) => v.to_ne_bytes().to_vec(),
            ParamValue::Bool(v) => vec![u8::from(*v)],
            ParamValue::Float32(v) => v.to_ne_bytes().to_vec(),
            ParamValue::Float64(v) => v.to_ne_bytes().to_vec(),
            ParamValue::Ip(IpAddr::V4(addr)) => L3Endpoint::v4(addr.octets()).to_bytes().to_vec(),
            ParamValue::Ip(IpAddr::V6(addr)) => L3Endpoint::v6(addr.octets()).to_bytes().to_vec(),
            ParamValue::String { value, len } => {
                let mut bytes = value.as_bytes().to_vec();
                bytes.resize(*len, 0);
                bytes
            }
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int8(v) => write!(f, "{v}"),
            ParamValue::Int16(v) => write!(f, "{v}"),
            ParamValue::Int32(v) => write!(f, "{v}"),
            ParamValue::Int64(v) => write!(f, "{v}"),
            ParamValue::Uint8(v) => write!(f, "{v}"),
            ParamValue::Uint16(v) => write!(f, "{v}"),
            ParamValue::Uint32(v) => write!(f, "{v}"),
            ParamValue::Uint64(v) => write!(f, "{v}"),
            ParamValue::Bool(v) => write!(f, "{v}"),
            ParamValue::Float32(v) => write!(f, "{v}"),
            ParamValue::Float64(v) => write!(f, "{v}"),
            ParamValue::Ip(v) => write!(f, "{v}"),
            ParamValue::String { value, .. } => write!(f, "{value:?}"),
        }
    }
}

fn parse_num<T>(raw: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.parse::<T>().map_err(|e| e.to_string())
}

/// Accepts `1/t/T/true/TRUE/True` and their false counterparts.
fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err("expected true or false".to_string()),
    }
}
