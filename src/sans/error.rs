//! Errors shared by every decoding stage.

use thiserror::Error;

/// An error decoding a document or one of its records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A file or frame header carries the wrong magic number.
    #[error("Incorrect magic number (expected {expected:#06X}, found {found:#06X}).")]
    BadMagicNumber { expected: u16, found: u16 },
    /// A declared length disagrees with the bytes actually available.
    #[error("Declared size ({declared}) does not match actual size ({actual}).")]
    SizeMismatch { declared: usize, actual: usize },
    /// A read ran past the end of the input or of a scoped record.
    #[error("Reading {need} bytes at offset {offset} exceeds the {remaining} remaining.")]
    OutOfBounds {
        offset: usize,
        need: usize,
        remaining: usize,
    },
    /// A record's contents are structurally invalid.
    #[error("Corrupt payload: {0}.")]
    CorruptPayload(#[from] Corruption),
    /// A valid but unimplemented construct was found.
    #[error("Unsupported feature: {0}.")]
    UnsupportedFeature(#[from] Unsupported),
}

impl DecodeError {
    /// Whether a chunk failing with this error may be skipped by its declared
    /// length without desynchronizing the rest of the document.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::CorruptPayload(_) | Self::UnsupportedFeature(_))
    }
}

/// Details of a [`DecodeError::CorruptPayload`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Corruption {
    /// The compressed stream could not be inflated.
    #[error("compressed stream is invalid")]
    Inflate,
    /// The inflated stream holds more bytes than expected.
    #[error("decompressed stream exceeds {expected} bytes")]
    Overflow { expected: usize },
    /// The inflated stream holds the wrong number of bytes.
    #[error("expected {expected} decompressed bytes, found {found}")]
    Length { expected: usize, found: usize },
    /// A string is not valid UTF-8.
    #[error("text at offset {offset} is not valid UTF-8")]
    InvalidText { offset: usize },
    /// A palette's last index precedes its first.
    #[error("palette range {first}..={last} is inverted")]
    PaletteRange { first: u32, last: u32 },
    /// A palette's declared size cannot hold its entries or exceeds the limit.
    #[error("palette size {size} does not fit entries up to {last}")]
    PaletteSize { size: u32, last: u32 },
}

/// Details of a [`DecodeError::UnsupportedFeature`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Unsupported {
    #[error("color depth {0}")]
    ColorDepth(u16),
    #[error("embedded ICC color profile")]
    IccProfile,
    #[error("color profile type {0}")]
    ColorProfileType(u16),
    #[error("layer type {0}")]
    LayerType(u16),
    #[error("blend mode {0}")]
    BlendMode(u16),
    #[error("cel type {0}")]
    CelType(u16),
    #[error("{0} bits per tile")]
    TileWidth(u16),
    #[error("loop direction {0}")]
    LoopDirection(u8),
    #[error("external file type {0}")]
    ExternalFileType(u8),
    #[error("property type {0:#06X}")]
    PropertyType(u16),
    #[error("property maps nested deeper than {limit}")]
    PropertyDepth { limit: usize },
}
