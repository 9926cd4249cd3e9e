//! Color profile chunks.

use tartan_bitfield::bitfield;

use super::{
    Decode,
    cursor::{Cursor, Fixed},
    error::{DecodeError, Unsupported},
};

/// The color space a document's colors are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorProfile {
    /// No profile; colors are used as-is.
    None {
        /// Fixed gamma overriding the default, if set.
        gamma: Option<Fixed>,
    },
    Srgb {
        /// Fixed gamma overriding the default, if set.
        gamma: Option<Fixed>,
    },
}

impl ColorProfile {
    pub fn gamma(&self) -> Option<Fixed> {
        match *self {
            Self::None { gamma } | Self::Srgb { gamma } => gamma,
        }
    }
}

#[derive(Decode)]
struct RawColorProfile {
    profile_type: u16,
    flags: u16,
    #[reserved(8)]
    gamma: Fixed,
}

/// Decode a color profile chunk body.
///
/// Embedded ICC profiles are not decoded and fail with
/// [`Unsupported::IccProfile`].
pub fn decode_color_profile(c: &mut Cursor<'_>) -> Result<ColorProfile, DecodeError> {
    let RawColorProfile {
        profile_type,
        flags,
        gamma,
    } = RawColorProfile::decode(c)?;

    bitfield! {
        struct RawFlags(u16) {
            [0] fixed_gamma,
        }
    }

    let gamma = RawFlags(flags).fixed_gamma().then_some(gamma);

    match profile_type {
        0 => Ok(ColorProfile::None { gamma }),
        1 => Ok(ColorProfile::Srgb { gamma }),
        2 => Err(Unsupported::IccProfile)?,
        _ => Err(Unsupported::ColorProfileType(profile_type))?,
    }
}
