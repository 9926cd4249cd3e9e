//! Chunk headers and dispatch to record decoders.

use alloc::vec::Vec;

use either::Either::{self, Left, Right};
use log::{debug, warn};
use zerocopy::TryFromBytes;

use super::{
    Decode, DecodeContext,
    cel::{self, Cel, CelExtra},
    color_profile::{self, ColorProfile},
    cursor::Cursor,
    error::DecodeError,
    external::{self, ExternalFile},
    layer::{self, Layer},
    palette::{self, OldPalette, OldPaletteKind, Palette},
    slice::{self, Slice},
    tags::{self, Tag},
    tileset::{self, Tileset},
    user_data::{self, UserData},
};

/// Size in bytes of a chunk header.
pub const CHUNK_HEADER_SIZE: usize = 6;

/// A recognized chunk type tag.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromBytes)]
pub enum ChunkType {
    OldPalette256 = 0x0004,
    OldPalette64 = 0x0011,
    Layer = 0x2004,
    Cel = 0x2005,
    CelExtra = 0x2006,
    ColorProfile = 0x2007,
    ExternalFiles = 0x2008,
    /// Deprecated, never decoded.
    Mask = 0x2016,
    /// Never written, never decoded.
    Path = 0x2017,
    Tags = 0x2018,
    Palette = 0x2019,
    UserData = 0x2020,
    Slice = 0x2022,
    Tileset = 0x2023,
}

impl ChunkType {
    /// Look up a type tag, if recognized.
    pub fn from_tag(tag: u16) -> Option<Self> {
        let chunk_type: Result<Self, _> = zerocopy::try_transmute!(tag);
        chunk_type.ok()
    }

    /// The type tag as stored.
    pub fn tag(self) -> u16 {
        self as u16
    }
}

/// A decoded chunk.
#[derive(Debug, Clone, PartialEq)]
pub enum Chunk {
    OldPalette(OldPalette),
    Palette(Palette),
    Layer(Layer),
    Cel(Cel),
    CelExtra(CelExtra),
    ColorProfile(ColorProfile),
    ExternalFiles(Vec<ExternalFile>),
    Tags(Vec<Tag>),
    UserData(UserData),
    Slice(Slice),
    Tileset(Tileset),
}

impl Chunk {
    pub fn chunk_type(&self) -> ChunkType {
        match self {
            Self::OldPalette(p) => match p.kind {
                OldPaletteKind::Colors256 => ChunkType::OldPalette256,
                OldPaletteKind::Colors64 => ChunkType::OldPalette64,
            },
            Self::Palette(_) => ChunkType::Palette,
            Self::Layer(_) => ChunkType::Layer,
            Self::Cel(_) => ChunkType::Cel,
            Self::CelExtra(_) => ChunkType::CelExtra,
            Self::ColorProfile(_) => ChunkType::ColorProfile,
            Self::ExternalFiles(_) => ChunkType::ExternalFiles,
            Self::Tags(_) => ChunkType::Tags,
            Self::UserData(_) => ChunkType::UserData,
            Self::Slice(_) => ChunkType::Slice,
            Self::Tileset(_) => ChunkType::Tileset,
        }
    }
}

/// A decoded chunk header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Decode)]
pub struct ChunkHeader {
    /// Declared length of the chunk including this header.
    pub size: u32,
    pub tag: u16,
}

impl ChunkHeader {
    /// Length of the chunk body.
    pub fn body_len(&self) -> Result<usize, DecodeError> {
        (self.size as usize)
            .checked_sub(CHUNK_HEADER_SIZE)
            .ok_or(DecodeError::SizeMismatch {
                declared: self.size as usize,
                actual: CHUNK_HEADER_SIZE,
            })
    }
}

/// What to do when a chunk body fails to decode with a recoverable error.
///
/// See [`DecodeError::is_recoverable`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Policy {
    /// Fail the whole decode.
    Abort,
    /// Discard the chunk by its declared length and continue.
    #[default]
    Skip,
}

/// Why a chunk was not decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The type tag is not recognized.
    Unknown,
    /// The type is recognized but never decoded.
    Unsupported(ChunkType),
    /// The caller asked for this type to be ignored.
    Ignored(ChunkType),
    /// The body failed to decode and the policy is [`Policy::Skip`].
    Failed(DecodeError),
}

/// A chunk left undecoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub header: ChunkHeader,
    /// Absolute offset of the chunk header in the input.
    pub offset: usize,
    pub reason: SkipReason,
}

/// Decode a chunk from the tip of a cursor, advancing it past the chunk's
/// declared length whatever the outcome.
///
/// Returns the decoded chunk, or a description of why it was skipped.
pub fn decode_chunk(
    c: &mut Cursor<'_>,
    context: &DecodeContext,
    policy: Policy,
    ignored: &[ChunkType],
) -> Result<Either<Chunk, Skipped>, DecodeError> {
    let offset = c.offset();
    let header = ChunkHeader::decode(c)?;
    let mut body = c.scoped(header.body_len()?)?;

    let skip = |reason| Right(Skipped {
        header,
        offset,
        reason,
    });

    let Some(chunk_type) = ChunkType::from_tag(header.tag) else {
        debug!("Skipping unknown chunk {:#06X} at offset {offset}.", header.tag);
        return Ok(skip(SkipReason::Unknown));
    };

    if ignored.contains(&chunk_type) {
        debug!("Ignoring {chunk_type:?} chunk at offset {offset}.");
        return Ok(skip(SkipReason::Ignored(chunk_type)));
    }

    debug!("Decoding {chunk_type:?} chunk at offset {offset}.");

    match decode_body(&mut body, chunk_type, context) {
        Ok(Some(chunk)) => {
            if !body.is_empty() {
                warn!(
                    "{chunk_type:?} chunk at offset {offset} left {} bytes unread.",
                    body.remaining()
                );
            }
            Ok(Left(chunk))
        }
        Ok(None) => {
            debug!("Skipping unsupported {chunk_type:?} chunk at offset {offset}.");
            Ok(skip(SkipReason::Unsupported(chunk_type)))
        }
        Err(err) if policy == Policy::Skip && err.is_recoverable() => {
            warn!("Skipping {chunk_type:?} chunk at offset {offset}: {err}");
            Ok(skip(SkipReason::Failed(err)))
        }
        Err(err) => Err(err),
    }
}

/// Decode a chunk body of a known type, bounded to exactly the chunk.
///
/// Returns `None` for types that are recognized but never decoded.
pub fn decode_body(
    c: &mut Cursor<'_>,
    chunk_type: ChunkType,
    context: &DecodeContext,
) -> Result<Option<Chunk>, DecodeError> {
    let chunk = match chunk_type {
        ChunkType::OldPalette256 => Chunk::OldPalette(palette::decode_old_palette(
            c,
            OldPaletteKind::Colors256,
        )?),
        ChunkType::OldPalette64 => Chunk::OldPalette(palette::decode_old_palette(
            c,
            OldPaletteKind::Colors64,
        )?),
        ChunkType::Layer => Chunk::Layer(layer::decode_layer(c, context)?),
        ChunkType::Cel => Chunk::Cel(cel::decode_cel(c, context)?),
        ChunkType::CelExtra => Chunk::CelExtra(cel::decode_cel_extra(c)?),
        ChunkType::ColorProfile => Chunk::ColorProfile(color_profile::decode_color_profile(c)?),
        ChunkType::ExternalFiles => Chunk::ExternalFiles(external::decode_external_files(c)?),
        ChunkType::Tags => Chunk::Tags(tags::decode_tags(c)?),
        ChunkType::Palette => Chunk::Palette(palette::decode_palette(c)?),
        ChunkType::UserData => Chunk::UserData(user_data::decode_user_data(c)?),
        ChunkType::Slice => Chunk::Slice(slice::decode_slice(c)?),
        ChunkType::Tileset => Chunk::Tileset(tileset::decode_tileset(c, context)?),
        ChunkType::Mask | ChunkType::Path => return Ok(None),
    };

    Ok(Some(chunk))
}
