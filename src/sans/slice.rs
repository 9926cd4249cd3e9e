//! Slice chunks.

use alloc::{string::String, vec::Vec};

use tartan_bitfield::bitfield;

use super::{Decode, cursor::Cursor, error::DecodeError};

/// A named region of the canvas, keyed by frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slice {
    pub name: String,
    pub keys: Vec<SliceKey>,
}

/// The shape of a slice from a frame onward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceKey {
    /// First frame this key applies to.
    pub frame: u32,
    pub bounds: Rect,
    /// Nine-patch center, relative to `bounds`.
    pub center: Option<Rect>,
    /// Pivot point, relative to `bounds`.
    pub pivot: Option<(i32, i32)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Decode)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

#[derive(Decode)]
struct RawSlice {
    keys: u32,
    #[reserved(4)]
    flags: u32,
    name: String,
}

/// Decode a slice chunk body.
pub fn decode_slice(c: &mut Cursor<'_>) -> Result<Slice, DecodeError> {
    let RawSlice { keys, flags, name } = RawSlice::decode(c)?;

    bitfield! {
        struct RawFlags(u32) {
            [0] nine_patch,
            [1] pivot,
        }
    }

    let flags = RawFlags(flags);

    let keys = (0..keys)
        .map(|_| {
            let frame = c.read_u32()?;
            let bounds = Rect::decode(c)?;

            let center = match flags.nine_patch() {
                true => Some(Rect::decode(c)?),
                false => None,
            };

            let pivot = match flags.pivot() {
                true => Some((c.read_i32()?, c.read_i32()?)),
                false => None,
            };

            Ok(SliceKey {
                frame,
                bounds,
                center,
                pivot,
            })
        })
        .collect::<Result<Vec<_>, DecodeError>>()?;

    Ok(Slice { name, keys })
}
