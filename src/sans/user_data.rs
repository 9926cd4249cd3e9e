//! User data chunks and their typed properties.
//!
//! User data attaches to the record decoded just before it: the sprite itself
//! when it follows the first frame's color profile, a layer, a cel, a slice, a
//! tileset, or in turn each tag of a preceding tags chunk. Attaching it is left
//! to the caller.

use alloc::{string::String, vec::Vec};

use tartan_bitfield::bitfield;

use super::{
    Decode,
    codec::Rgba,
    cursor::{Cursor, Fixed},
    error::{DecodeError, Unsupported},
};

/// Deepest nesting of property maps and vectors accepted inside a user data
/// chunk. Top-level maps are at depth zero.
pub const MAX_PROPERTY_DEPTH: usize = 8;

/// Free-form data attached to another record.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UserData {
    pub text: Option<String>,
    pub color: Option<Rgba>,
    pub properties: Vec<PropertyMap>,
}

impl UserData {
    /// Properties set by the user rather than by an extension.
    pub fn user_properties(&self) -> Option<&PropertyMap> {
        self.properties.iter().find(|m| m.key == 0)
    }
}

/// Properties owned by the user or by one extension.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PropertyMap {
    /// Zero for user properties, otherwise the id of the owning extension's
    /// entry in an external files chunk.
    pub key: u32,
    pub properties: Vec<Property>,
}

impl PropertyMap {
    /// Look up a property by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        get(&self.properties, name)
    }
}

/// A named property value.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub value: Value,
}

/// A typed property value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    Fixed(Fixed),
    F32(f32),
    F64(f64),
    String(String),
    Point { x: i32, y: i32 },
    Size { width: i32, height: i32 },
    Rect {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
    /// Elements, each possibly of a different type.
    Vector(Vec<Value>),
    /// A nested property map.
    Map(Vec<Property>),
    Uuid([u8; 16]),
}

impl Value {
    /// Look up a property by name, if this is a nested map.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self {
            Self::Map(properties) => get(properties, name),
            _ => None,
        }
    }
}

fn get<'a>(properties: &'a [Property], name: &str) -> Option<&'a Value> {
    properties.iter().find(|p| p.name == name).map(|p| &p.value)
}

/// Decode a user data chunk body.
pub fn decode_user_data(c: &mut Cursor<'_>) -> Result<UserData, DecodeError> {
    bitfield! {
        struct RawFlags(u32) {
            [0] has_text,
            [1] has_color,
            [2] has_properties,
        }
    }

    let flags = RawFlags(c.read_u32()?);

    let text = match flags.has_text() {
        true => Some(c.read_string()?),
        false => None,
    };

    let color = match flags.has_color() {
        true => Some(Rgba::decode(c)?),
        false => None,
    };

    let properties = match flags.has_properties() {
        true => {
            // Length of the whole properties section, which is self-delimiting.
            let _size = c.read_u32()?;
            let count = c.read_u32()?;

            (0..count)
                .map(|_| {
                    let key = c.read_u32()?;
                    let properties = decode_properties(c, 0)?;
                    Ok(PropertyMap { key, properties })
                })
                .collect::<Result<Vec<_>, DecodeError>>()?
        }
        false => Vec::new(),
    };

    Ok(UserData {
        text,
        color,
        properties,
    })
}

fn decode_properties(c: &mut Cursor<'_>, depth: usize) -> Result<Vec<Property>, DecodeError> {
    let count = c.read_u32()?;

    (0..count)
        .map(|_| {
            let name = c.read_string()?;
            let kind = c.read_u16()?;
            let value = decode_value(c, kind, depth)?;
            Ok(Property { name, value })
        })
        .collect()
}

fn decode_value(c: &mut Cursor<'_>, kind: u16, depth: usize) -> Result<Value, DecodeError> {
    let value = match kind {
        0x0001 => Value::Bool(c.read_u8()? != 0),
        0x0002 => Value::I8(c.read_i8()?),
        0x0003 => Value::U8(c.read_u8()?),
        0x0004 => Value::I16(c.read_i16()?),
        0x0005 => Value::U16(c.read_u16()?),
        0x0006 => Value::I32(c.read_i32()?),
        0x0007 => Value::U32(c.read_u32()?),
        0x0008 => Value::I64(c.read_i64()?),
        0x0009 => Value::U64(c.read_u64()?),
        0x000A => Value::Fixed(c.read_fixed()?),
        0x000B => Value::F32(c.read_f32()?),
        0x000C => Value::F64(c.read_f64()?),
        0x000D => Value::String(c.read_string()?),
        0x000E => Value::Point {
            x: c.read_i32()?,
            y: c.read_i32()?,
        },
        0x000F => Value::Size {
            width: c.read_i32()?,
            height: c.read_i32()?,
        },
        0x0010 => Value::Rect {
            x: c.read_i32()?,
            y: c.read_i32()?,
            width: c.read_i32()?,
            height: c.read_i32()?,
        },
        0x0011 => {
            let depth = descend(depth)?;
            let count = c.read_u32()?;
            let element = c.read_u16()?;

            let values = (0..count)
                .map(|_| {
                    // Zero marks a vector whose elements each carry a type.
                    let kind = match element {
                        0 => c.read_u16()?,
                        kind => kind,
                    };
                    decode_value(c, kind, depth)
                })
                .collect::<Result<Vec<_>, _>>()?;

            Value::Vector(values)
        }
        0x0012 => Value::Map(decode_properties(c, descend(depth)?)?),
        0x0013 => Value::Uuid(c.array()?),
        _ => Err(Unsupported::PropertyType(kind))?,
    };

    Ok(value)
}

fn descend(depth: usize) -> Result<usize, DecodeError> {
    match depth < MAX_PROPERTY_DEPTH {
        true => Ok(depth + 1),
        false => Err(Unsupported::PropertyDepth {
            limit: MAX_PROPERTY_DEPTH,
        })?,
    }
}
