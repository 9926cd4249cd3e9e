//! The fixed 128-byte file header.

use tartan_bitfield::bitfield;

use super::{
    Decode,
    cursor::Cursor,
    error::{DecodeError, Unsupported},
};

/// Magic number identifying a file header.
pub const HEADER_MAGIC: u16 = 0xA5E0;

/// Size in bytes of a file header.
pub const HEADER_SIZE: usize = 128;

/// Bits per pixel used by every image in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorDepth {
    /// One byte per pixel, an index into the palette.
    Indexed,
    /// Two bytes per pixel, value and alpha.
    Grayscale,
    /// Four bytes per pixel.
    Rgba,
}

impl ColorDepth {
    /// Bytes occupied by one pixel.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Indexed => 1,
            Self::Grayscale => 2,
            Self::Rgba => 4,
        }
    }

    /// Bits occupied by one pixel, as stored in the header.
    pub fn bits_per_pixel(self) -> u16 {
        self.bytes_per_pixel() as u16 * 8
    }
}

impl TryFrom<u16> for ColorDepth {
    type Error = Unsupported;

    fn try_from(bits: u16) -> Result<Self, Self::Error> {
        match bits {
            8 => Ok(Self::Indexed),
            16 => Ok(Self::Grayscale),
            32 => Ok(Self::Rgba),
            _ => Err(Unsupported::ColorDepth(bits)),
        }
    }
}

/// Document-wide flags.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HeaderFlags {
    /// Layer opacity values are meaningful.
    pub layer_opacity_valid: bool,
    /// Group layer blend mode and opacity are meaningful.
    pub group_opacity_valid: bool,
    /// Every layer chunk ends with a UUID.
    pub layers_have_uuid: bool,
}

/// Grid shown over the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub x: i16,
    pub y: i16,
    /// Zero if there is no grid.
    pub width: u16,
    /// Zero if there is no grid.
    pub height: u16,
}

/// A decoded file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Declared length of the whole file, in bytes.
    pub file_size: u32,
    pub frames: u16,
    pub width: u16,
    pub height: u16,
    pub color_depth: ColorDepth,
    pub flags: HeaderFlags,
    /// Deprecated frame duration, superseded by per-frame durations.
    pub speed: u16,
    /// Palette entry treated as transparent, for indexed documents only.
    pub transparent_index: u8,
    /// Palette size, where zero stands for 256 in older files.
    pub colors: u16,
    /// Pixel aspect ratio, where zero in either term means 1:1.
    pub pixel_ratio: (u8, u8),
    pub grid: Grid,
}

impl Header {
    /// Number of palette entries, resolving the legacy zero.
    pub fn palette_size(&self) -> usize {
        match self.colors {
            0 => 256,
            n => n as usize,
        }
    }

    /// Context consulted by record decoders in this document.
    pub fn context(&self) -> DecodeContext {
        DecodeContext {
            color_depth: self.color_depth,
            layers_have_uuid: self.flags.layers_have_uuid,
        }
    }
}

/// Read-only state derived from the file header that later decoders need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeContext {
    /// Pixel format of every image payload.
    pub color_depth: ColorDepth,
    /// Whether layer records carry a trailing UUID.
    pub layers_have_uuid: bool,
}

#[derive(Decode)]
struct RawHeader {
    frames: u16,
    width: u16,
    height: u16,
    color_depth: u16,
    flags: u32,
    #[reserved(8)]
    speed: u16,
    #[reserved(3)]
    transparent_index: u8,
    colors: u16,
    pixel_width: u8,
    pixel_height: u8,
    grid_x: i16,
    grid_y: i16,
    grid_width: u16,
    #[reserved(84)]
    grid_height: u16,
}

/// Decode a file header from the tip of a cursor.
///
/// The magic number is checked before the rest of the header is read. The
/// header's declared file size is not compared against the input; see
/// [`crate::avec`] for that check.
pub fn decode_header(c: &mut Cursor<'_>) -> Result<(Header, DecodeContext), DecodeError> {
    let file_size = c.read_u32()?;
    let magic = c.read_u16()?;

    if magic != HEADER_MAGIC {
        Err(DecodeError::BadMagicNumber {
            expected: HEADER_MAGIC,
            found: magic,
        })?;
    }

    let RawHeader {
        frames,
        width,
        height,
        color_depth,
        flags,
        speed,
        transparent_index,
        colors,
        pixel_width,
        pixel_height,
        grid_x,
        grid_y,
        grid_width,
        grid_height,
    } = RawHeader::decode(c)?;

    let color_depth = ColorDepth::try_from(color_depth)?;

    bitfield! {
        struct RawFlags(u32) {
            [0] layer_opacity_valid,
            [1] group_opacity_valid,
            [2] layers_have_uuid,
        }
    }

    let raw = RawFlags(flags);
    let flags = HeaderFlags {
        layer_opacity_valid: raw.layer_opacity_valid(),
        group_opacity_valid: raw.group_opacity_valid(),
        layers_have_uuid: raw.layers_have_uuid(),
    };

    let header = Header {
        file_size,
        frames,
        width,
        height,
        color_depth,
        flags,
        speed,
        transparent_index,
        colors,
        pixel_ratio: (pixel_width, pixel_height),
        grid: Grid {
            x: grid_x,
            y: grid_y,
            width: grid_width,
            height: grid_height,
        },
    };

    let context = header.context();

    Ok((header, context))
}
