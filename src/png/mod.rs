//! Holds all the tools for decoding PNG data.
//!
//! * [Portable Network Graphics Specification (Second Edition)][png-spec]
//!
//! [png-spec]: https://www.w3.org/TR/2003/REC-PNG-20031110/
//!
//! ## Automatic Decoding
//!
//! Call [`decode_png`] and you get a [`DecodedPng`]: the header, plus the
//! pixel bytes in row-major order with the channels interleaved (`RGB` or
//! `RGBA`, one byte each). This needs the `alloc` and `miniz_oxide` features.
//! Use [`decode_png_with`] to set [`DecodeOptions`] or to bring your own zlib
//! decompressor.
//!
//! ## Decoding a PNG Yourself
//!
//! The format of a PNG is a signature followed by a series of "chunks". Each
//! chunk is a big-endian length, a four byte type tag, the data, and a CRC
//! (which this crate skips over). The steps are:
//!
//! 1) Make a [`PngChunkIter`] with [`PngChunkIter::from_png_bytes`]. This
//!    checks the signature.
//! 2) Pass a clone of the iterator to [`ImageHeader::from_chunk_iter`]. The
//!    header must be the first chunk, and describes the image's dimensions
//!    and pixel format. Unsupported images are rejected here.
//! 3) Call [`decompress_idat`] with the chunk iterator. All of the `IDAT`
//!    chunks together form one zlib stream, which is decompressed into a
//!    buffer of exactly [`ImageHeader::raw_buffer_len`] bytes. This gives you
//!    *filtered* data, not the final pixels.
//! 4) Call [`unfilter_in_place`] on that buffer. Each line starts with a byte
//!    saying which filter was used for it, and those get reversed in place.
//! 5) Optionally call [`compact_scanlines`] to drop the filter bytes so that
//!    the pixel rows are packed one after the other.
//!
//! ## What's Not Supported
//!
//! Indexed color, greyscale, bit depths other than 8, and interlacing are all
//! rejected with [`PngError::UnsupportedFeature`]. Chunk CRCs are not checked.

use core::fmt::{Debug, Write};

use log::{debug, trace};

use crate::{ByteCursor, PngError, PngResult, Unsupported};

mod chunk;
pub use chunk::*;

mod ihdr;
pub use ihdr::*;

mod unfilter;
pub use unfilter::*;

#[cfg(feature = "alloc")]
mod idat;
#[cfg(feature = "alloc")]
pub use idat::*;

#[cfg(feature = "alloc")]
mod decode;
#[cfg(feature = "alloc")]
pub use decode::*;

/// Gets the [`ImageHeader`] out of the PNG bytes.
///
/// This checks the signature and validates the header, but looks at nothing
/// after the first chunk.
pub fn png_get_header(bytes: &[u8]) -> PngResult<ImageHeader> {
  ImageHeader::from_chunk_iter(&mut PngChunkIter::from_png_bytes(bytes)?)
}
