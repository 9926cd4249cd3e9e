//! Layer chunks.

use alloc::string::String;

use tartan_bitfield::bitfield;
use zerocopy::TryFromBytes;

use super::{
    Decode, DecodeContext,
    cursor::Cursor,
    error::{DecodeError, Unsupported},
};

/// How a layer holds its content.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromBytes)]
pub enum LayerType {
    Normal = 0,
    Group = 1,
    Tilemap = 2,
}

/// How a layer composites over those beneath it.
#[repr(u16)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, TryFromBytes)]
pub enum BlendMode {
    #[default]
    Normal = 0,
    Multiply = 1,
    Screen = 2,
    Overlay = 3,
    Darken = 4,
    Lighten = 5,
    ColorDodge = 6,
    ColorBurn = 7,
    HardLight = 8,
    SoftLight = 9,
    Difference = 10,
    Exclusion = 11,
    Hue = 12,
    Saturation = 13,
    Color = 14,
    Luminosity = 15,
    Addition = 16,
    Subtract = 17,
    Divide = 18,
}

/// Layer state flags.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LayerFlags {
    pub visible: bool,
    pub editable: bool,
    pub locked: bool,
    pub background: bool,
    pub prefer_linked_cels: bool,
    /// The group is shown collapsed.
    pub collapsed: bool,
    /// A reference layer, excluded from export.
    pub reference: bool,
}

/// A layer chunk.
///
/// Layers appear in the first frame, ordered bottom to top. The position of a
/// layer in that order is the index cels use to refer to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    pub flags: LayerFlags,
    pub layer_type: LayerType,
    /// Nesting depth beneath group layers, where zero is the root.
    pub child_level: u16,
    pub blend_mode: BlendMode,
    pub opacity: u8,
    pub name: String,
    /// Tileset used by a tilemap layer.
    pub tileset: Option<u32>,
    /// Present only if the document's layers carry UUIDs.
    pub uuid: Option<[u8; 16]>,
}

#[derive(Decode)]
struct RawLayer {
    flags: u16,
    layer_type: u16,
    child_level: u16,
    _width: u16,
    _height: u16,
    blend_mode: u16,
    #[reserved(3)]
    opacity: u8,
    name: String,
}

/// Decode a layer chunk body.
pub fn decode_layer(c: &mut Cursor<'_>, context: &DecodeContext) -> Result<Layer, DecodeError> {
    let RawLayer {
        flags,
        layer_type,
        child_level,
        blend_mode,
        opacity,
        name,
        ..
    } = RawLayer::decode(c)?;

    bitfield! {
        struct RawFlags(u16) {
            [0] visible,
            [1] editable,
            [2] locked,
            [3] background,
            [4] prefer_linked_cels,
            [5] collapsed,
            [6] reference,
        }
    }

    let raw = RawFlags(flags);
    let flags = LayerFlags {
        visible: raw.visible(),
        editable: raw.editable(),
        locked: raw.locked(),
        background: raw.background(),
        prefer_linked_cels: raw.prefer_linked_cels(),
        collapsed: raw.collapsed(),
        reference: raw.reference(),
    };

    let raw = layer_type;
    let layer_type: Result<LayerType, _> = zerocopy::try_transmute!(raw);
    let layer_type = layer_type.map_err(|_| Unsupported::LayerType(raw))?;

    let raw = blend_mode;
    let blend_mode: Result<BlendMode, _> = zerocopy::try_transmute!(raw);
    let blend_mode = blend_mode.map_err(|_| Unsupported::BlendMode(raw))?;

    let tileset = match layer_type {
        LayerType::Tilemap => Some(c.read_u32()?),
        _ => None,
    };

    let uuid = match context.layers_have_uuid {
        true => Some(c.array()?),
        false => None,
    };

    Ok(Layer {
        flags,
        layer_type,
        child_level,
        blend_mode,
        opacity,
        name,
        tileset,
        uuid,
    })
}
