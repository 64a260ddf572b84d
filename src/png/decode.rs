use super::*;

use alloc::vec::Vec;

/// Settings for [`decode_png_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecodeOptions {
  max_width: u32,
  max_height: u32,
  strict_idat_walk: bool,
}
impl Default for DecodeOptions {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}
impl DecodeOptions {
  /// No size limits, and a strict IDAT walk.
  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    Self {
      max_width: u32::MAX,
      max_height: u32::MAX,
      strict_idat_walk: true,
    }
  }

  #[inline]
  #[must_use]
  pub const fn max_width(&self) -> u32 {
    self.max_width
  }

  #[inline]
  #[must_use]
  pub const fn max_height(&self) -> u32 {
    self.max_height
  }

  #[inline]
  #[must_use]
  pub const fn strict_idat_walk(&self) -> bool {
    self.strict_idat_walk
  }

  /// Images wider than this are rejected with
  /// [`PngError::InvalidDimensions`] before anything is allocated.
  #[inline]
  #[must_use]
  pub const fn set_max_width(mut self, max_width: u32) -> Self {
    self.max_width = max_width;
    self
  }

  #[inline]
  #[must_use]
  pub const fn set_max_height(mut self, max_height: u32) -> Self {
    self.max_height = max_height;
    self
  }

  /// When `true` (the default), a truncated chunk anywhere in the file fails
  /// the decode. When `false`, the search for `IDAT` chunks just stops at the
  /// truncated chunk and decoding carries on with what was found.
  #[inline]
  #[must_use]
  pub const fn set_strict_idat_walk(mut self, strict: bool) -> Self {
    self.strict_idat_walk = strict;
    self
  }
}

/// A decoded image.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DecodedPng {
  pub header: ImageHeader,
  /// Row-major, channel-interleaved pixel bytes, with no padding between
  /// rows. This is [`ImageHeader::pixel_buffer_len`] bytes.
  pub pixels: Vec<u8>,
}
impl DecodedPng {
  #[inline]
  #[must_use]
  pub const fn width(&self) -> u32 {
    self.header.width
  }

  #[inline]
  #[must_use]
  pub const fn height(&self) -> u32 {
    self.header.height
  }

  /// 3 for RGB, 4 for RGBA.
  #[inline]
  #[must_use]
  pub const fn channels(&self) -> usize {
    self.header.pixel_channels()
  }

  /// The bytes of one row of pixels, or `None` if `y` is out of bounds.
  #[inline]
  #[must_use]
  pub fn row(&self, y: u32) -> Option<&[u8]> {
    let row_bytes = self.header.row_bytes().ok()?;
    let start = (y as usize).checked_mul(row_bytes)?;
    self.pixels.get(start..start.checked_add(row_bytes)?)
  }
}

/// Decodes PNG bytes using the default options and [`MinizInflate`].
#[cfg(feature = "miniz_oxide")]
#[cfg_attr(docs_rs, doc(cfg(feature = "miniz_oxide")))]
#[inline]
pub fn decode_png(bytes: &[u8]) -> PngResult<DecodedPng> {
  decode_png_with(bytes, &DecodeOptions::default(), &mut MinizInflate)
}

/// Decodes PNG bytes, with your choice of options and zlib decompressor.
///
/// ## Failure
/// Every error in [`PngError`] can come out of this. In all cases no partial
/// image is returned.
pub fn decode_png_with<Z: ZlibInflate + ?Sized>(
  bytes: &[u8], options: &DecodeOptions, inflater: &mut Z,
) -> PngResult<DecodedPng> {
  let chunks = PngChunkIter::from_png_bytes(bytes)?;
  // the IDAT pass gets its own iterator, and just skips over the header.
  let idat_pass = chunks.clone();
  let mut header_pass = chunks;
  let header = ImageHeader::from_chunk_iter(&mut header_pass)?;
  if header.width > options.max_width || header.height > options.max_height {
    debug!(
      "{}x{} is over the {}x{} limit",
      header.width, header.height, options.max_width, options.max_height
    );
    return Err(PngError::InvalidDimensions);
  }

  let mut raw = decompress_idat(idat_pass, &header, options.strict_idat_walk, inflater)?;
  unfilter_in_place(&mut raw, &header)?;
  let len = compact_scanlines(&mut raw, &header)?;
  raw.truncate(len);
  debug!("decoded {}x{} {:?}", header.width, header.height, header.color_type);
  Ok(DecodedPng { header, pixels: raw })
}
