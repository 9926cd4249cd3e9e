//! Slice-based document decoder.

use alloc::vec::Vec;

use either::Either::{Left, Right};
use log::debug;

use crate::sans::{
    DecodeContext,
    chunk::decode_chunk,
    cursor::Cursor,
    error::DecodeError,
    frame::{FRAME_HEADER_SIZE, decode_frame_header},
    header::decode_header,
};

use super::{DecodeOptions, Diagnostic, Document, Frame};

/// Decode a fully buffered document.
///
/// Fatal errors abort immediately and no partial document is returned.
///
/// This method is also re-exported as `cassette::avec::decode_slice`.
pub fn decode(r: &[u8], options: &DecodeOptions) -> Result<Document, DecodeError> {
    let c = &mut Cursor::new(r);

    let (header, context) = decode_header(c)?;

    if header.file_size as usize != r.len() {
        Err(DecodeError::SizeMismatch {
            declared: header.file_size as usize,
            actual: r.len(),
        })?;
    }

    debug!(
        "Decoding {}x{} document with {} frames at {:?} depth.",
        header.width, header.height, header.frames, header.color_depth
    );

    let mut diagnostics = Vec::new();

    let frames = (0..header.frames as usize)
        .map(|index| decode_frame(c, &context, options, index, &mut diagnostics))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Document::new(header, frames, diagnostics))
}

fn decode_frame(
    c: &mut Cursor<'_>,
    context: &DecodeContext,
    options: &DecodeOptions,
    index: usize,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Frame, DecodeError> {
    let start = c.position();
    let header = decode_frame_header(c)?;

    debug!("Decoding frame {index} with {} chunks.", header.chunks);

    let mut chunks = Vec::new();

    for _ in 0..header.chunks {
        match decode_chunk(c, context, options.policy, &options.ignored)? {
            Left(chunk) => chunks.push(chunk),
            Right(skipped) => diagnostics.push(Diagnostic {
                frame: index,
                skipped,
            }),
        }
    }

    let read = c.position() - start;
    if read != header.byte_len as usize && header.byte_len as usize >= FRAME_HEADER_SIZE {
        debug!(
            "Frame {index} declares {} bytes but its chunks span {read}.",
            header.byte_len
        );
    }

    Ok(Frame {
        duration: header.duration,
        chunks,
    })
}
