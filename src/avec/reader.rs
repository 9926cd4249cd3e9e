//! Reader-based document decoder.
//!
//! _Requires Cargo feature `std`._

use std::{io::Read, vec::Vec};

use thiserror::Error;

use crate::sans::error::DecodeError;

use super::{DecodeOptions, Document};

extern crate std;

/// Errors occurring while decoding from a reader.
#[derive(Debug, Error)]
pub enum Error {
    /// An error from the supplied reader.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// An error decoding the buffered document.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Buffer a reader to its end, then decode the document it held.
///
/// Decoding is not incremental; the whole document is held in memory first.
///
/// This method is also re-exported as `cassette::avec::decode_reader`.
///
/// _Requires Cargo feature `std`._
pub fn decode(r: &mut impl Read, options: &DecodeOptions) -> Result<Document, Error> {
    let mut buf = Vec::new();
    r.read_to_end(&mut buf)?;

    Ok(super::slice::decode(&buf, options)?)
}
