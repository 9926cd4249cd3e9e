//! Palette chunks, old and new.

use alloc::{string::String, vec::Vec};

use tartan_bitfield::bitfield;

use super::{
    Decode,
    codec::{Rgb, Rgba},
    cursor::Cursor,
    error::{Corruption, DecodeError},
};

/// Which legacy palette chunk a packet list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OldPaletteKind {
    /// Chunk `0x0004`, with 8-bit color components.
    Colors256,
    /// Chunk `0x0011`, with 6-bit color components.
    Colors64,
}

impl OldPaletteKind {
    /// Colors in a packet whose stored count is zero.
    pub fn full_count(self) -> usize {
        match self {
            Self::Colors256 => 256,
            Self::Colors64 => 64,
        }
    }
}

/// A run of colors replacing palette entries after skipping some.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Entries left untouched before this run.
    pub skip: u8,
    pub colors: Vec<Rgb>,
}

/// A legacy palette chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OldPalette {
    pub kind: OldPaletteKind,
    pub packets: Vec<Packet>,
}

impl OldPalette {
    /// Apply this chunk's packets over an existing palette, growing it as
    /// necessary up to [`MAX_PALETTE_SIZE`]. Six-bit components are scaled up
    /// to eight bits.
    pub fn apply(&self, palette: &mut Vec<Rgba>) {
        let scale = |v: u8| match self.kind {
            OldPaletteKind::Colors256 => v,
            OldPaletteKind::Colors64 => (u16::from(v.min(63)) * 255 / 63) as u8,
        };

        let mut index = 0;

        for packet in &self.packets {
            index += packet.skip as usize;

            for color in &packet.colors {
                if index >= MAX_PALETTE_SIZE as usize {
                    return;
                }

                if index >= palette.len() {
                    palette.resize(index + 1, Rgba::default());
                }

                let Rgb { r, g, b } = *color;
                palette[index] = Rgba {
                    r: scale(r),
                    g: scale(g),
                    b: scale(b),
                    a: 255,
                };
                index += 1;
            }
        }
    }
}

/// Decode a legacy palette chunk body.
pub fn decode_old_palette(
    c: &mut Cursor<'_>,
    kind: OldPaletteKind,
) -> Result<OldPalette, DecodeError> {
    let count = c.read_u16()?;

    let packets = (0..count)
        .map(|_| {
            let skip = c.read_u8()?;
            let colors = match c.read_u8()? {
                0 => kind.full_count(),
                n => n as usize,
            };

            let colors = (0..colors)
                .map(|_| Rgb::decode(c))
                .collect::<Result<Vec<_>, _>>()?;

            Ok(Packet { skip, colors })
        })
        .collect::<Result<Vec<_>, DecodeError>>()?;

    Ok(OldPalette { kind, packets })
}

/// Largest palette size accepted from a palette chunk.
pub const MAX_PALETTE_SIZE: u32 = 65536;

/// A palette entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteEntry {
    pub color: Rgba,
    pub name: Option<String>,
}

/// A palette chunk, redefining a contiguous range of entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    /// Total number of entries in the palette after this chunk applies.
    pub size: u32,
    /// Index of the first entry redefined.
    pub first: u32,
    /// Index of the last entry redefined, inclusive.
    pub last: u32,
    /// Redefined entries, from `first` to `last`.
    pub entries: Vec<PaletteEntry>,
}

impl Palette {
    /// Apply this chunk over an existing palette, resizing it to `size`.
    pub fn apply(&self, palette: &mut Vec<Rgba>) {
        palette.resize(self.size as usize, Rgba::default());

        let first = self.first as usize;
        for (index, entry) in (first..).zip(&self.entries) {
            if let Some(slot) = palette.get_mut(index) {
                *slot = entry.color;
            }
        }
    }
}

#[derive(Decode)]
struct RawPalette {
    size: u32,
    first: u32,
    #[reserved(8)]
    last: u32,
}

/// Decode a palette chunk body.
pub fn decode_palette(c: &mut Cursor<'_>) -> Result<Palette, DecodeError> {
    let RawPalette { size, first, last } = RawPalette::decode(c)?;

    // The inclusive range, not the palette size, sets how many entries follow.
    let Some(span) = last.checked_sub(first) else {
        Err(Corruption::PaletteRange { first, last })?
    };

    if size <= last || size > MAX_PALETTE_SIZE {
        Err(Corruption::PaletteSize { size, last })?;
    }

    bitfield! {
        struct EntryFlags(u16) {
            [0] has_name,
        }
    }

    let entries = (0..=span)
        .map(|_| {
            let flags = EntryFlags(c.read_u16()?);
            let color = Rgba::decode(c)?;
            let name = match flags.has_name() {
                true => Some(c.read_string()?),
                false => None,
            };

            Ok(PaletteEntry { color, name })
        })
        .collect::<Result<Vec<_>, DecodeError>>()?;

    Ok(Palette {
        size,
        first,
        last,
        entries,
    })
}
