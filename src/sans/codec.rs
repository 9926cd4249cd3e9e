//! Inflating and reinterpreting pixel and tile payloads.

use alloc::vec::Vec;

use miniz_oxide::inflate::{
    TINFLStatus, decompress_to_vec_with_limit, decompress_to_vec_zlib_with_limit,
};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, byteorder::little_endian::U32};

use super::{
    Decode,
    cursor::Cursor,
    error::{Corruption, DecodeError},
    header::ColorDepth,
};

/// An opaque color, as stored in palettes.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// A color with straight alpha.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// A grayscale pixel with straight alpha.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct Grayscale {
    pub v: u8,
    pub a: u8,
}

impl Decode for Rgb {
    fn decode(c: &mut Cursor<'_>) -> Result<Self, DecodeError> {
        let [r, g, b] = c.array()?;
        Ok(Self { r, g, b })
    }
}

impl Decode for Rgba {
    fn decode(c: &mut Cursor<'_>) -> Result<Self, DecodeError> {
        let [r, g, b, a] = c.array()?;
        Ok(Self { r, g, b, a })
    }
}

/// Pixels of one image, in row-major order.
///
/// The variant is fixed for a whole document by its [`ColorDepth`]. Indexed
/// pixels are left unresolved against the palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pixels {
    Rgba(Vec<Rgba>),
    Grayscale(Vec<Grayscale>),
    Indexed(Vec<u8>),
}

impl Pixels {
    /// Number of pixels.
    pub fn len(&self) -> usize {
        match self {
            Self::Rgba(p) => p.len(),
            Self::Grayscale(p) => p.len(),
            Self::Indexed(p) => p.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The pixels as their raw little-endian bytes.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Rgba(p) => p.as_bytes(),
            Self::Grayscale(p) => p.as_bytes(),
            Self::Indexed(p) => p.as_slice(),
        }
    }

    /// Color depth these pixels were decoded with.
    pub fn color_depth(&self) -> ColorDepth {
        match self {
            Self::Rgba(_) => ColorDepth::Rgba,
            Self::Grayscale(_) => ColorDepth::Grayscale,
            Self::Indexed(_) => ColorDepth::Indexed,
        }
    }
}

/// Size in bytes of one tile word.
pub const TILE_SIZE: usize = 4;

/// Reinterpret uncompressed bytes as `count` pixels of the given depth.
///
/// Fails if the cursor holds fewer bytes than required. Trailing bytes are not
/// consumed.
pub fn read_pixels(
    c: &mut Cursor<'_>,
    depth: ColorDepth,
    count: usize,
) -> Result<Pixels, DecodeError> {
    let len = byte_len(count, depth.bytes_per_pixel())?;
    reinterpret_pixels(c.bytes(len)?, depth)
}

/// Inflate a compressed pixel stream holding exactly `count` pixels.
pub fn inflate_pixels(r: &[u8], depth: ColorDepth, count: usize) -> Result<Pixels, DecodeError> {
    let buf = inflate(r, byte_len(count, depth.bytes_per_pixel())?)?;
    reinterpret_pixels(&buf, depth)
}

/// Inflate a compressed tile stream holding exactly `count` 32-bit tile words.
pub fn inflate_tiles(r: &[u8], count: usize) -> Result<Vec<u32>, DecodeError> {
    let buf = inflate(r, byte_len(count, TILE_SIZE)?)?;

    let words = <[U32]>::ref_from_bytes(&buf).map_err(|_| cast_error(&buf, TILE_SIZE))?;

    Ok(words.iter().map(|w| w.get()).collect())
}

/// Inflate a stream, requiring exactly `expected` bytes of output.
///
/// Streams are normally zlib-wrapped; a bare DEFLATE stream is accepted when
/// the first two bytes are not a valid zlib header.
pub fn inflate(r: &[u8], expected: usize) -> Result<Vec<u8>, DecodeError> {
    let result = if has_zlib_header(r) {
        decompress_to_vec_zlib_with_limit(r, expected)
    } else {
        decompress_to_vec_with_limit(r, expected)
    };

    let buf = match result {
        Ok(buf) => buf,
        Err(err) if err.status == TINFLStatus::HasMoreOutput => {
            Err(DecodeError::CorruptPayload(Corruption::Overflow { expected }))?
        }
        Err(_) => Err(DecodeError::CorruptPayload(Corruption::Inflate))?,
    };

    if buf.len() != expected {
        Err(length_error(expected, buf.len()))?;
    }

    Ok(buf)
}

fn has_zlib_header(r: &[u8]) -> bool {
    match r {
        [cmf, flg, ..] => cmf & 0x0F == 8 && (u16::from(*cmf) << 8 | u16::from(*flg)) % 31 == 0,
        _ => false,
    }
}

fn reinterpret_pixels(buf: &[u8], depth: ColorDepth) -> Result<Pixels, DecodeError> {
    let pixels = match depth {
        ColorDepth::Rgba => Pixels::Rgba(
            <[Rgba]>::ref_from_bytes(buf)
                .map_err(|_| cast_error(buf, 4))?
                .to_vec(),
        ),
        ColorDepth::Grayscale => Pixels::Grayscale(
            <[Grayscale]>::ref_from_bytes(buf)
                .map_err(|_| cast_error(buf, 2))?
                .to_vec(),
        ),
        ColorDepth::Indexed => Pixels::Indexed(buf.to_vec()),
    };

    Ok(pixels)
}

fn byte_len(count: usize, size: usize) -> Result<usize, DecodeError> {
    count
        .checked_mul(size)
        .ok_or(DecodeError::CorruptPayload(Corruption::Overflow {
            expected: usize::MAX,
        }))
}

fn cast_error(buf: &[u8], size: usize) -> DecodeError {
    length_error(buf.len() - buf.len() % size, buf.len())
}

fn length_error(expected: usize, found: usize) -> DecodeError {
    DecodeError::CorruptPayload(Corruption::Length { expected, found })
}
