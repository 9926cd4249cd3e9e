//! Tags chunks, naming ranges of frames.

use alloc::{string::String, vec::Vec};

use zerocopy::TryFromBytes;

use super::{
    Decode,
    codec::Rgb,
    cursor::Cursor,
    error::{DecodeError, Unsupported},
};

/// Playback order through a tagged frame range.
#[repr(u8)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, TryFromBytes)]
pub enum LoopDirection {
    #[default]
    Forward = 0,
    Reverse = 1,
    PingPong = 2,
    PingPongReverse = 3,
}

/// A named, inclusive range of frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub from: u16,
    pub to: u16,
    pub direction: LoopDirection,
    /// Times to play the range, where zero means forever.
    pub repeat: u16,
    /// Deprecated; newer files keep tag colors in user data.
    pub color: Rgb,
    pub name: String,
}

#[derive(Decode)]
struct RawTag {
    from: u16,
    to: u16,
    direction: u8,
    #[reserved(6)]
    repeat: u16,
    #[reserved(1)]
    color: Rgb,
    name: String,
}

/// Decode a tags chunk body.
pub fn decode_tags(c: &mut Cursor<'_>) -> Result<Vec<Tag>, DecodeError> {
    let count = c.read_u16()?;
    c.skip(8)?;

    (0..count)
        .map(|_| {
            let RawTag {
                from,
                to,
                direction,
                repeat,
                color,
                name,
            } = RawTag::decode(c)?;

            let raw = direction;
            let direction: Result<LoopDirection, _> = zerocopy::try_transmute!(raw);
            let direction = direction.map_err(|_| Unsupported::LoopDirection(raw))?;

            Ok(Tag {
                from,
                to,
                direction,
                repeat,
                color,
                name,
            })
        })
        .collect()
}
