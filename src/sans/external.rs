//! External files chunks.

use alloc::{string::String, vec::Vec};

use super::{
    Decode,
    cursor::Cursor,
    error::{DecodeError, Unsupported},
};

/// What an external file entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExternalKind {
    Palette,
    Tileset,
    /// An extension owning properties in user data.
    PropertyExtension,
    /// An extension managing tiles.
    TileExtension,
}

/// A file or extension referenced by id elsewhere in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalFile {
    pub id: u32,
    pub kind: ExternalKind,
    /// File name, or extension id for extension entries.
    pub name: String,
}

#[derive(Decode)]
struct RawEntry {
    id: u32,
    #[reserved(7)]
    kind: u8,
    name: String,
}

/// Decode an external files chunk body.
pub fn decode_external_files(c: &mut Cursor<'_>) -> Result<Vec<ExternalFile>, DecodeError> {
    let count = c.read_u32()?;
    c.skip(8)?;

    (0..count)
        .map(|_| {
            let RawEntry { id, kind, name } = RawEntry::decode(c)?;

            let kind = match kind {
                0 => ExternalKind::Palette,
                1 => ExternalKind::Tileset,
                2 => ExternalKind::PropertyExtension,
                3 => ExternalKind::TileExtension,
                _ => Err(Unsupported::ExternalFileType(kind))?,
            };

            Ok(ExternalFile { id, kind, name })
        })
        .collect()
}
