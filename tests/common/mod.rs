#![allow(dead_code)]

//! Builders for little-endian document fixtures.

use miniz_oxide::deflate::compress_to_vec_zlib;

pub const OLD_PALETTE_256: u16 = 0x0004;
pub const OLD_PALETTE_64: u16 = 0x0011;
pub const LAYER: u16 = 0x2004;
pub const CEL: u16 = 0x2005;
pub const CEL_EXTRA: u16 = 0x2006;
pub const COLOR_PROFILE: u16 = 0x2007;
pub const EXTERNAL_FILES: u16 = 0x2008;
pub const MASK: u16 = 0x2016;
pub const TAGS: u16 = 0x2018;
pub const PALETTE: u16 = 0x2019;
pub const USER_DATA: u16 = 0x2020;
pub const SLICE: u16 = 0x2022;
pub const TILESET: u16 = 0x2023;

/// Byte buffer with little-endian writers.
#[derive(Debug, Default, Clone)]
pub struct Writer(pub Vec<u8>);

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn u8(mut self, v: u8) -> Self {
        self.0.push(v);
        self
    }

    pub fn u16(mut self, v: u16) -> Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn i16(mut self, v: i16) -> Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn u32(mut self, v: u32) -> Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn i32(mut self, v: i32) -> Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn u64(mut self, v: u64) -> Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn bytes(mut self, v: &[u8]) -> Self {
        self.0.extend_from_slice(v);
        self
    }

    pub fn zeros(mut self, n: usize) -> Self {
        self.0.resize(self.0.len() + n, 0);
        self
    }

    pub fn string(self, s: &str) -> Self {
        self.u16(s.len() as u16).bytes(s.as_bytes())
    }

    pub fn finish(self) -> Vec<u8> {
        self.0
    }
}

pub fn zlib(data: &[u8]) -> Vec<u8> {
    compress_to_vec_zlib(data, 6)
}

/// A frame awaiting serialization.
#[derive(Debug, Clone)]
pub struct FrameFixture {
    pub duration: u16,
    pub chunks: Vec<(u16, Vec<u8>)>,
    /// Overrides the stored legacy and new chunk counts.
    pub counts: Option<(u16, u32)>,
    pub magic: u16,
}

impl FrameFixture {
    pub fn new(duration: u16) -> Self {
        Self {
            duration,
            chunks: Vec::new(),
            counts: None,
            magic: 0xF1FA,
        }
    }

    pub fn chunk(mut self, tag: u16, body: Vec<u8>) -> Self {
        self.chunks.push((tag, body));
        self
    }
}

/// A document awaiting serialization.
#[derive(Debug, Clone)]
pub struct Fixture {
    pub width: u16,
    pub height: u16,
    pub depth: u16,
    pub flags: u32,
    pub magic: u16,
    pub frames: Vec<FrameFixture>,
}

impl Fixture {
    pub fn new(width: u16, height: u16, depth: u16) -> Self {
        Self {
            width,
            height,
            depth,
            flags: 1,
            magic: 0xA5E0,
            frames: Vec::new(),
        }
    }

    pub fn frame(mut self, frame: FrameFixture) -> Self {
        self.frames.push(frame);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = Writer::new()
            .u32(0)
            .u16(self.magic)
            .u16(self.frames.len() as u16)
            .u16(self.width)
            .u16(self.height)
            .u16(self.depth)
            .u32(self.flags)
            .u16(100)
            .zeros(8)
            .u8(0)
            .zeros(3)
            .u16(0)
            .u8(1)
            .u8(1)
            .i16(0)
            .i16(0)
            .u16(16)
            .u16(16)
            .zeros(84)
            .finish();

        assert_eq!(out.len(), 128, "header length");

        for frame in &self.frames {
            let chunks: Vec<u8> = frame
                .chunks
                .iter()
                .flat_map(|(tag, body)| chunk(*tag, body))
                .collect();

            let n = frame.chunks.len();
            let (old, new) = frame
                .counts
                .unwrap_or((n.min(0xFFFF) as u16, n as u32));

            out.extend(
                Writer::new()
                    .u32(16 + chunks.len() as u32)
                    .u16(frame.magic)
                    .u16(old)
                    .u16(frame.duration)
                    .zeros(2)
                    .u32(new)
                    .bytes(&chunks)
                    .finish(),
            );
        }

        let size = out.len() as u32;
        out[..4].copy_from_slice(&size.to_le_bytes());
        out
    }
}

/// Serialize a chunk with its header.
pub fn chunk(tag: u16, body: &[u8]) -> Vec<u8> {
    Writer::new()
        .u32(6 + body.len() as u32)
        .u16(tag)
        .bytes(body)
        .finish()
}

pub fn layer_body(layer_type: u16, name: &str) -> Writer {
    Writer::new()
        .u16(0b11)
        .u16(layer_type)
        .u16(0)
        .u16(0)
        .u16(0)
        .u16(0)
        .u8(255)
        .zeros(3)
        .string(name)
}

pub fn cel_header(layer: u16, cel_type: u16) -> Writer {
    Writer::new()
        .u16(layer)
        .i16(1)
        .i16(-2)
        .u8(200)
        .u16(cel_type)
        .i16(0)
        .zeros(5)
}

pub fn compressed_cel(layer: u16, width: u16, height: u16, pixels: &[u8]) -> Vec<u8> {
    cel_header(layer, 2)
        .u16(width)
        .u16(height)
        .bytes(&zlib(pixels))
        .finish()
}

pub fn palette_body(colors: &[[u8; 4]]) -> Vec<u8> {
    let mut w = Writer::new()
        .u32(colors.len() as u32)
        .u32(0)
        .u32(colors.len() as u32 - 1)
        .zeros(8);

    for color in colors {
        w = w.u16(0).bytes(color);
    }

    w.finish()
}
