//! Convenience interfaces assembling a whole document.
//!
//! The functions in this module decode every frame and chunk of a fully
//! buffered document into a [`Document`], applying the caller's
//! [`DecodeOptions`].
//!
//! ```
//! use cassette::avec::DecodeOptions;
//!
//! let data = std::fs::read("walk.aseprite")?;
//! let document = cassette::avec::decode_slice(&data, &DecodeOptions::default())?;
//!
//! for frame in document.frames() {
//!     for cel in frame.cels() {
//!         // ...
//!     }
//! }
//! ```

#[cfg(feature = "std")]
pub mod reader;
pub mod slice;

use alloc::vec::Vec;

#[cfg(feature = "std")]
pub use reader::decode as decode_reader;
pub use slice::decode as decode_slice;

use crate::sans::{
    DecodeContext,
    cel::Cel,
    chunk::{Chunk, ChunkType, Policy, Skipped},
    codec::Rgba,
    header::Header,
    layer::Layer,
    tags::Tag,
};

/// Caller choices applied while assembling a document.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Handling of chunks whose bodies fail with a recoverable error.
    pub policy: Policy,
    /// Chunk types to skip without decoding.
    pub ignored: Vec<ChunkType>,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    /// Skip chunks of a type without decoding them.
    pub fn ignore(mut self, chunk_type: ChunkType) -> Self {
        if !self.ignored.contains(&chunk_type) {
            self.ignored.push(chunk_type);
        }
        self
    }
}

/// A chunk left undecoded, and the frame it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub frame: usize,
    pub skipped: Skipped,
}

/// A decoded document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    header: Header,
    frames: Vec<Frame>,
    diagnostics: Vec<Diagnostic>,
}

impl Document {
    pub(crate) fn new(header: Header, frames: Vec<Frame>, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            header,
            frames,
            diagnostics,
        }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn context(&self) -> DecodeContext {
        self.header.context()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Chunks that were skipped rather than decoded.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Layers in declaration order, which is the order cels index them by.
    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.chunks().filter_map(|c| match c {
            Chunk::Layer(l) => Some(l),
            _ => None,
        })
    }

    /// Tags across all tags chunks.
    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.chunks()
            .filter_map(|c| match c {
                Chunk::Tags(t) => Some(t.iter()),
                _ => None,
            })
            .flatten()
    }

    /// The palette defined by the first frame.
    ///
    /// Old palette chunks are only consulted when the frame holds no newer
    /// palette chunk. Returns `None` if neither kind is present.
    pub fn palette(&self) -> Option<Vec<Rgba>> {
        let chunks = &self.frames.first()?.chunks;
        let mut palette = Vec::new();

        let mut found = false;
        for chunk in chunks {
            if let Chunk::Palette(p) = chunk {
                p.apply(&mut palette);
                found = true;
            }
        }

        if !found {
            for chunk in chunks {
                if let Chunk::OldPalette(p) = chunk {
                    p.apply(&mut palette);
                    found = true;
                }
            }
        }

        found.then_some(palette)
    }

    fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.frames.iter().flat_map(|f| f.chunks.iter())
    }
}

/// A decoded frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Duration in milliseconds.
    pub duration: u16,
    pub chunks: Vec<Chunk>,
}

impl Frame {
    /// Cels in this frame, in the order they were stored.
    pub fn cels(&self) -> impl Iterator<Item = &Cel> {
        self.chunks.iter().filter_map(|c| match c {
            Chunk::Cel(c) => Some(c),
            _ => None,
        })
    }
}
