//! Record decoders operating on bounded cursors.
//!
//! This module is intended for applications that need finer control than
//! [`crate::avec`] provides, such as inspecting individual chunks or decoding a
//! document lazily. Nothing here assembles a [`crate::avec::Document`].
//!
//! # Architecture
//!
//! Decoding flows strictly downward:
//!
//! 1. [`header::decode_header`] reads the 128-byte file header and yields the
//!    [`DecodeContext`] consulted by later stages.
//! 2. [`frame::decode_frame_header`] reads each 16-byte frame header and
//!    resolves its chunk count.
//! 3. [`chunk::decode_chunk`] reads a chunk header, bounds a
//!    [`Cursor`](cursor::Cursor) to the chunk's declared size, and dispatches
//!    on its type tag to one of the record decoders.
//! 4. Cel and tileset decoders hand compressed payloads to the [`codec`].
//!
//! Fixed-layout records implement [`Decode`], usually by derive. Records with
//! conditional fields are decoded by hand.
//!
//! Some things are not checked here and are left to the caller:
//!
//! - Whether the header's declared file size matches the input length.
//!
//! - Whether a chunk body was fully consumed. [`chunk::decode_chunk`] discards
//! any trailing bytes in its own bound, so the outer cursor always lands on the
//! next chunk.

pub mod cel;
pub mod chunk;
pub mod codec;
pub mod color_profile;
pub mod cursor;
pub mod error;
pub mod external;
pub mod frame;
pub mod header;
pub mod layer;
pub mod palette;
pub mod slice;
pub mod tags;
pub mod tileset;
pub mod user_data;

use alloc::string::String;

use cursor::{Cursor, Fixed};
use error::DecodeError;

pub use header::DecodeContext;

/// Derive [`Decode`] for a fixed-layout record.
///
/// Fields are read in declaration order. Add `#[reserved(N)]` to a field to
/// discard `N` bytes following it.
///
/// # Example
///
/// ```
/// #[derive(Debug, Decode)]
/// struct CelExtra {
///     flags: u32,
///     x: Fixed,
///     y: Fixed,
///     width: Fixed,
///     #[reserved(16)]
///     height: Fixed,
/// }
/// ```
pub use cassette_derive::Decode;

/// Decode a value from the tip of a cursor.
///
/// See the [`Decode`](macro@Decode) derive macro for an implementation on
/// records of a fixed shape.
pub trait Decode: Sized {
    /// Read a value, advancing the cursor past it.
    fn decode(c: &mut Cursor<'_>) -> Result<Self, DecodeError>;
}

macro_rules! decode_primitive {
    ($($t:ty => $read:ident),* $(,)?) => {
        $(
            impl Decode for $t {
                fn decode(c: &mut Cursor<'_>) -> Result<Self, DecodeError> {
                    c.$read()
                }
            }
        )*
    };
}

decode_primitive! {
    u8 => read_u8,
    i8 => read_i8,
    u16 => read_u16,
    i16 => read_i16,
    u32 => read_u32,
    i32 => read_i32,
    u64 => read_u64,
    i64 => read_i64,
    f32 => read_f32,
    f64 => read_f64,
    Fixed => read_fixed,
    String => read_string,
}

impl<const N: usize> Decode for [u8; N] {
    fn decode(c: &mut Cursor<'_>) -> Result<Self, DecodeError> {
        c.array()
    }
}
