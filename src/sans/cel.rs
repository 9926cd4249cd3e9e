//! Cel and cel extra chunks.

use alloc::vec::Vec;

use tartan_bitfield::bitfield;

use super::{
    Decode, DecodeContext,
    codec::{self, Pixels},
    cursor::{Cursor, Fixed},
    error::{DecodeError, Unsupported},
};

/// The content of one layer in one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cel {
    /// Index of the owning layer, in the order layers were declared.
    pub layer: u16,
    pub x: i16,
    pub y: i16,
    pub opacity: u8,
    /// Adjustment to this cel's position in the layer stack.
    pub z_index: i16,
    pub content: CelContent,
}

/// The payload of a cel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CelContent {
    /// An image, stored raw or compressed.
    Image(Image),
    /// The cel at the same layer in another frame.
    Linked { frame: u16 },
    /// A grid of tiles.
    Tilemap(Tilemap),
}

/// An image held by a cel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub width: u16,
    pub height: u16,
    pub pixels: Pixels,
}

/// A grid of tile words held by a cel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tilemap {
    /// Width in tiles.
    pub width: u16,
    /// Height in tiles.
    pub height: u16,
    pub id_mask: u32,
    pub x_flip_mask: u32,
    pub y_flip_mask: u32,
    pub diagonal_flip_mask: u32,
    /// Raw tile words in row-major order.
    pub tiles: Vec<u32>,
}

/// A tile word split by a tilemap's masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub id: u32,
    pub x_flip: bool,
    pub y_flip: bool,
    pub diagonal_flip: bool,
}

impl Tilemap {
    /// Split the tile word at `index`.
    pub fn tile(&self, index: usize) -> Option<Tile> {
        let word = *self.tiles.get(index)?;

        Some(Tile {
            id: (word & self.id_mask) >> self.id_mask.trailing_zeros().min(31),
            x_flip: word & self.x_flip_mask != 0,
            y_flip: word & self.y_flip_mask != 0,
            diagonal_flip: word & self.diagonal_flip_mask != 0,
        })
    }
}

#[derive(Decode)]
struct RawCel {
    layer: u16,
    x: i16,
    y: i16,
    opacity: u8,
    cel_type: u16,
    #[reserved(5)]
    z_index: i16,
}

#[derive(Decode)]
struct RawTilemap {
    width: u16,
    height: u16,
    bits_per_tile: u16,
    id_mask: u32,
    x_flip_mask: u32,
    y_flip_mask: u32,
    #[reserved(10)]
    diagonal_flip_mask: u32,
}

/// Decode a cel chunk body.
///
/// Compressed payloads run to the end of the cursor, which must be bounded to
/// the chunk.
pub fn decode_cel(c: &mut Cursor<'_>, context: &DecodeContext) -> Result<Cel, DecodeError> {
    let RawCel {
        layer,
        x,
        y,
        opacity,
        cel_type,
        z_index,
    } = RawCel::decode(c)?;

    let content = match cel_type {
        0 => {
            let (width, height) = (c.read_u16()?, c.read_u16()?);
            let count = width as usize * height as usize;
            let pixels = codec::read_pixels(c, context.color_depth, count)?;

            CelContent::Image(Image {
                width,
                height,
                pixels,
            })
        }
        1 => CelContent::Linked {
            frame: c.read_u16()?,
        },
        2 => {
            let (width, height) = (c.read_u16()?, c.read_u16()?);
            let count = width as usize * height as usize;
            let pixels = codec::inflate_pixels(c.rest(), context.color_depth, count)?;

            CelContent::Image(Image {
                width,
                height,
                pixels,
            })
        }
        3 => {
            let RawTilemap {
                width,
                height,
                bits_per_tile,
                id_mask,
                x_flip_mask,
                y_flip_mask,
                diagonal_flip_mask,
            } = RawTilemap::decode(c)?;

            if bits_per_tile != 32 {
                Err(Unsupported::TileWidth(bits_per_tile))?;
            }

            let count = width as usize * height as usize;
            let tiles = codec::inflate_tiles(c.rest(), count)?;

            CelContent::Tilemap(Tilemap {
                width,
                height,
                id_mask,
                x_flip_mask,
                y_flip_mask,
                diagonal_flip_mask,
                tiles,
            })
        }
        _ => Err(Unsupported::CelType(cel_type))?,
    };

    Ok(Cel {
        layer,
        x,
        y,
        opacity,
        z_index,
        content,
    })
}

/// Sub-pixel placement of the preceding cel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CelExtra {
    /// Precise bounds, if set.
    pub bounds: Option<PreciseBounds>,
}

/// Cel bounds in fractional pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreciseBounds {
    pub x: Fixed,
    pub y: Fixed,
    pub width: Fixed,
    pub height: Fixed,
}

#[derive(Decode)]
struct RawCelExtra {
    flags: u32,
    x: Fixed,
    y: Fixed,
    width: Fixed,
    #[reserved(16)]
    height: Fixed,
}

/// Decode a cel extra chunk body.
pub fn decode_cel_extra(c: &mut Cursor<'_>) -> Result<CelExtra, DecodeError> {
    let RawCelExtra {
        flags,
        x,
        y,
        width,
        height,
    } = RawCelExtra::decode(c)?;

    bitfield! {
        struct RawFlags(u32) {
            [0] precise_bounds,
        }
    }

    let bounds = RawFlags(flags).precise_bounds().then_some(PreciseBounds {
        x,
        y,
        width,
        height,
    });

    Ok(CelExtra { bounds })
}
