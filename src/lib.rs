#![no_std]

//! A decoder for Aseprite's chunked sprite and animation file format.
//!
//! A document is a fixed header followed by frames, each holding a sequence of
//! self-delimiting chunks: palettes, layers, cels of pixel or tile data, tags,
//! slices, user data and color profiles. Cassette decodes a fully buffered
//! document into an immutable tree of these records. Compositing and rendering
//! are left to the caller.
//!
//! Most users should begin with [`decode`] or the functions in the [`avec`]
//! module. If these prove insufficient, the record decoders in the [`sans`]
//! module can be driven directly.
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `std`: enable reader-based decoder (default).

extern crate alloc;
extern crate self as cassette;

pub mod avec;
pub mod sans;

pub use avec::{DecodeOptions, Document, Frame};
pub use sans::error::DecodeError;

/// Decode a fully buffered document with default options.
///
/// Chunks that fail with a recoverable error are skipped and listed in
/// [`Document::diagnostics`].
pub fn decode(r: &[u8]) -> Result<Document, DecodeError> {
    avec::decode_slice(r, &DecodeOptions::default())
}
