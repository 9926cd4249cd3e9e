//! The fixed 16-byte frame header.

use super::{Decode, cursor::Cursor, error::DecodeError};

/// Magic number identifying a frame header.
pub const FRAME_MAGIC: u16 = 0xF1FA;

/// Size in bytes of a frame header.
pub const FRAME_HEADER_SIZE: usize = 16;

/// A decoded frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Declared length of the frame including this header.
    pub byte_len: u32,
    /// Frame duration in milliseconds.
    pub duration: u16,
    /// Number of chunks that follow.
    pub chunks: u32,
}

#[derive(Decode)]
struct RawFrameHeader {
    byte_len: u32,
    magic: u16,
    old_chunks: u16,
    #[reserved(2)]
    duration: u16,
    new_chunks: u32,
}

/// Decode a frame header from the tip of a cursor.
pub fn decode_frame_header(c: &mut Cursor<'_>) -> Result<FrameHeader, DecodeError> {
    let RawFrameHeader {
        byte_len,
        magic,
        old_chunks,
        duration,
        new_chunks,
    } = RawFrameHeader::decode(c)?;

    if magic != FRAME_MAGIC {
        Err(DecodeError::BadMagicNumber {
            expected: FRAME_MAGIC,
            found: magic,
        })?;
    }

    Ok(FrameHeader {
        byte_len,
        duration,
        chunks: resolve_chunk_count(old_chunks, new_chunks),
    })
}

/// Resolve a frame's chunk count from its legacy 16-bit and newer 32-bit
/// fields.
///
/// The 32-bit field wins whenever it is nonzero, whatever the 16-bit field
/// holds. Writers saturate the 16-bit field at `0xFFFF` once it overflows.
pub fn resolve_chunk_count(old: u16, new: u32) -> u32 {
    match new {
        0 => old as u32,
        n => n,
    }
}
