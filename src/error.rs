use core::fmt::{self, Display, Formatter};

/// The reason a PNG was rejected as [`PngError::UnsupportedFeature`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unsupported {
  /// Indexed color (or any color type with the palette bit set).
  Palette,
  /// Greyscale, with or without alpha.
  Greyscale,
  /// A color type value that PNG doesn't define.
  ColorType(u8),
  /// Only 8 bits per channel is supported.
  BitDepth(u8),
  /// Only compression method 0 (zlib) exists.
  CompressionMethod(u8),
  /// Only filter method 0 (adaptive) exists.
  FilterMethod(u8),
  /// Only non-interlaced images are supported.
  InterlaceMethod(u8),
}
impl Display for Unsupported {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      Self::Palette => write!(f, "palette color"),
      Self::Greyscale => write!(f, "greyscale color"),
      Self::ColorType(c) => write!(f, "color type {c}"),
      Self::BitDepth(d) => write!(f, "bit depth {d}"),
      Self::CompressionMethod(m) => write!(f, "compression method {m}"),
      Self::FilterMethod(m) => write!(f, "filter method {m}"),
      Self::InterlaceMethod(m) => write!(f, "interlace method {m}"),
    }
  }
}

/// An error from decoding PNG data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PngError {
  /// The first 8 bytes are not the PNG signature.
  BadSignature,

  /// A read went past the end of the input.
  ///
  /// This is also what you get when a chunk declares a length larger than the
  /// bytes remaining.
  TruncatedInput,

  /// The first chunk is absent, isn't `IHDR`, or isn't 13 bytes.
  MissingHeader,

  /// The header describes an image this crate doesn't decode.
  UnsupportedFeature(Unsupported),

  /// Width or height is 0, or the image is larger than the decode limits
  /// allow.
  InvalidDimensions,

  /// The allocator couldn't give us enough space.
  OutOfMemory,

  /// The decompressed data isn't exactly the size the header requires.
  OutputBufferTooSmall,

  /// The compressed image data is malformed.
  CorruptData,

  /// A scanline has a filter type outside of `0..=4`.
  InvalidFilterType {
    /// The scanline, counted from the top of the image.
    row: u32,
    /// The filter byte found.
    filter: u8,
  },
}
impl Display for PngError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      Self::BadSignature => write!(f, "bad PNG signature, not a png"),
      Self::TruncatedInput => write!(f, "unexpected end of input"),
      Self::MissingHeader => write!(f, "first chunk is not a valid IHDR"),
      Self::UnsupportedFeature(what) => write!(f, "unsupported: {what}"),
      Self::InvalidDimensions => write!(f, "image dimensions are zero or too large"),
      Self::OutOfMemory => write!(f, "not enough memory"),
      Self::OutputBufferTooSmall => {
        write!(f, "decompressed data doesn't match the size the header requires")
      }
      Self::CorruptData => write!(f, "compressed image data is broken"),
      Self::InvalidFilterType { row, filter } => {
        write!(f, "invalid filter type {filter} on row {row}")
      }
    }
  }
}
#[cfg(feature = "std")]
impl std::error::Error for PngError {}
#[cfg(feature = "alloc")]
impl From<alloc::collections::TryReserveError> for PngError {
  #[inline]
  fn from(_: alloc::collections::TryReserveError) -> Self {
    Self::OutOfMemory
  }
}

/// Shorthand for results from this crate.
pub type PngResult<T> = Result<T, PngError>;
