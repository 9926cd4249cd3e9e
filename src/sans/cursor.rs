//! Bounds-checked sequential reader over a byte slice.

use alloc::string::String;

use super::error::{Corruption, DecodeError};

/// A little-endian reader over a borrowed byte slice.
///
/// Every read checks the remaining length first, failing with
/// [`DecodeError::OutOfBounds`] rather than panicking. The offset reported in
/// errors is absolute within the original input, including for cursors created
/// by [`Cursor::scoped`].
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
    base: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor at the start of a slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            base: 0,
        }
    }

    /// Bytes consumed since this cursor was created.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left before the end of this cursor's bound.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Absolute offset of the next byte within the original input.
    pub fn offset(&self) -> usize {
        self.base + self.pos
    }

    /// Whether every byte in bound has been consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Split off a cursor bounded to exactly the next `len` bytes, advancing
    /// this cursor past them.
    ///
    /// Reads past the end of the returned cursor fail even if this cursor has
    /// more data.
    pub fn scoped(&mut self, len: usize) -> Result<Cursor<'a>, DecodeError> {
        let base = self.offset();
        let data = self.bytes(len)?;
        Ok(Cursor { data, pos: 0, base })
    }

    /// Discard `n` bytes.
    pub fn skip(&mut self, n: usize) -> Result<(), DecodeError> {
        self.bytes(n).map(drop)
    }

    /// Discard everything left in bound.
    pub fn skip_to_end(&mut self) {
        self.pos = self.data.len();
    }

    /// Borrow the next `n` bytes without copying.
    pub fn bytes(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        let remaining = self.remaining();
        if n > remaining {
            Err(DecodeError::OutOfBounds {
                offset: self.offset(),
                need: n,
                remaining,
            })?;
        }

        let s = self.pos;
        self.pos += n;

        Ok(&self.data[s..self.pos])
    }

    /// Borrow everything left in bound.
    pub fn rest(&mut self) -> &'a [u8] {
        let s = self.pos;
        self.pos = self.data.len();
        &self.data[s..]
    }

    /// Take an exact number of bytes as an array.
    pub fn array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut buf = [0; N];
        buf.copy_from_slice(self.bytes(N)?);
        Ok(buf)
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        self.array().map(u8::from_le_bytes)
    }

    pub fn read_i8(&mut self) -> Result<i8, DecodeError> {
        self.array().map(i8::from_le_bytes)
    }

    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        self.array().map(u16::from_le_bytes)
    }

    pub fn read_i16(&mut self) -> Result<i16, DecodeError> {
        self.array().map(i16::from_le_bytes)
    }

    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        self.array().map(u32::from_le_bytes)
    }

    pub fn read_i32(&mut self) -> Result<i32, DecodeError> {
        self.array().map(i32::from_le_bytes)
    }

    pub fn read_u64(&mut self) -> Result<u64, DecodeError> {
        self.array().map(u64::from_le_bytes)
    }

    pub fn read_i64(&mut self) -> Result<i64, DecodeError> {
        self.array().map(i64::from_le_bytes)
    }

    pub fn read_f32(&mut self) -> Result<f32, DecodeError> {
        self.array().map(f32::from_le_bytes)
    }

    pub fn read_f64(&mut self) -> Result<f64, DecodeError> {
        self.array().map(f64::from_le_bytes)
    }

    /// Read a 16.16 fixed-point value.
    pub fn read_fixed(&mut self) -> Result<Fixed, DecodeError> {
        self.read_i32().map(Fixed)
    }

    /// Read a string stored as a 16-bit byte length followed by UTF-8 text,
    /// without a terminator.
    pub fn read_string(&mut self) -> Result<String, DecodeError> {
        let offset = self.offset();
        let len = self.read_u16()? as usize;
        let bytes = self.bytes(len)?;

        match core::str::from_utf8(bytes) {
            Ok(s) => Ok(String::from(s)),
            Err(_) => Err(DecodeError::CorruptPayload(Corruption::InvalidText {
                offset,
            })),
        }
    }
}

/// A signed 16.16 fixed-point number.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fixed(pub i32);

impl Fixed {
    /// The raw 32-bit representation.
    pub fn bits(self) -> i32 {
        self.0
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / 65536.0
    }

    pub fn to_f32(self) -> f32 {
        self.to_f64() as f32
    }
}
