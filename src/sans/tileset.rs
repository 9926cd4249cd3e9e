//! Tileset chunks.

use alloc::string::String;

use tartan_bitfield::bitfield;

use super::{
    Decode, DecodeContext,
    codec::{self, Pixels},
    cursor::Cursor,
    error::{Corruption, DecodeError},
};

/// A set of equally sized tiles used by tilemap layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tileset {
    pub id: u32,
    pub flags: TilesetFlags,
    pub tiles: u32,
    pub tile_width: u16,
    pub tile_height: u16,
    /// Number shown in the editor for the first tile.
    pub base_index: i16,
    pub name: String,
    /// Where the tiles live in another file, if linked.
    pub external: Option<ExternalTileset>,
    /// Tiles stacked vertically into one image `tile_width` pixels wide, if
    /// embedded.
    pub pixels: Option<Pixels>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TilesetFlags {
    /// Tile 0 is the empty tile.
    pub empty_tile_zero: bool,
    pub match_x_flip: bool,
    pub match_y_flip: bool,
    pub match_diagonal_flip: bool,
}

/// A reference to a tileset in an external file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExternalTileset {
    /// Id of an entry in an external files chunk.
    pub file: u32,
    /// Id of the tileset within that file.
    pub tileset: u32,
}

#[derive(Decode)]
struct RawTileset {
    id: u32,
    flags: u32,
    tiles: u32,
    tile_width: u16,
    tile_height: u16,
    #[reserved(14)]
    base_index: i16,
    name: String,
}

/// Decode a tileset chunk body.
pub fn decode_tileset(c: &mut Cursor<'_>, context: &DecodeContext) -> Result<Tileset, DecodeError> {
    let RawTileset {
        id,
        flags,
        tiles,
        tile_width,
        tile_height,
        base_index,
        name,
    } = RawTileset::decode(c)?;

    bitfield! {
        struct RawFlags(u32) {
            [0] external,
            [1] embedded,
            [2] empty_tile_zero,
            [3] match_x_flip,
            [4] match_y_flip,
            [5] match_diagonal_flip,
        }
    }

    let raw = RawFlags(flags);

    let external = match raw.external() {
        true => Some(ExternalTileset {
            file: c.read_u32()?,
            tileset: c.read_u32()?,
        }),
        false => None,
    };

    let pixels = match raw.embedded() {
        true => {
            let count = (tile_width as usize * tile_height as usize)
                .checked_mul(tiles as usize)
                .ok_or(Corruption::Overflow {
                    expected: usize::MAX,
                })?;

            let len = c.read_u32()? as usize;
            Some(codec::inflate_pixels(c.bytes(len)?, context.color_depth, count)?)
        }
        false => None,
    };

    Ok(Tileset {
        id,
        flags: TilesetFlags {
            empty_tile_zero: raw.empty_tile_zero(),
            match_x_flip: raw.match_x_flip(),
            match_y_flip: raw.match_y_flip(),
            match_diagonal_flip: raw.match_diagonal_flip(),
        },
        tiles,
        tile_width,
        tile_height,
        base_index,
        name,
        external,
        pixels,
    })
}
