use super::*;

/// The color type byte of a header.
///
/// It's a bit field: 1 is "palette", 2 is "color", 4 is "alpha".
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct PngColorType(pub u8);
impl PngColorType {
  pub const Y: Self = Self(0);
  pub const RGB: Self = Self(2);
  pub const INDEX: Self = Self(3);
  pub const YA: Self = Self(4);
  pub const RGBA: Self = Self(6);

  #[inline]
  #[must_use]
  pub const fn uses_palette(self) -> bool {
    (self.0 & 0b001) != 0
  }
  #[inline]
  #[must_use]
  pub const fn is_truecolor(self) -> bool {
    (self.0 & 0b010) != 0
  }
  #[inline]
  #[must_use]
  pub const fn has_alpha(self) -> bool {
    (self.0 & 0b100) != 0
  }
}
impl Debug for PngColorType {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    match *self {
      Self::Y => write!(f, "Y"),
      Self::RGB => write!(f, "RGB"),
      Self::INDEX => write!(f, "Index"),
      Self::YA => write!(f, "YA"),
      Self::RGBA => write!(f, "RGBA"),
      other => write!(f, "Illegal({})", other.0),
    }
  }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct PngCompressionMethod(pub u8);
impl PngCompressionMethod {
  pub const DEFLATE: Self = Self(0);
}
impl Debug for PngCompressionMethod {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    match *self {
      Self::DEFLATE => write!(f, "Deflate"),
      other => write!(f, "Illegal({})", other.0),
    }
  }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct PngFilterMethod(pub u8);
impl PngFilterMethod {
  pub const ADAPTIVE: Self = Self(0);
}
impl Debug for PngFilterMethod {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    match *self {
      Self::ADAPTIVE => write!(f, "Adaptive"),
      other => write!(f, "Illegal({})", other.0),
    }
  }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct PngInterlaceMethod(pub u8);
impl PngInterlaceMethod {
  pub const NO_INTERLACE: Self = Self(0);
  pub const ADAM7: Self = Self(1);
}
impl Debug for PngInterlaceMethod {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    match *self {
      Self::NO_INTERLACE => write!(f, "NoInterlace"),
      Self::ADAM7 => write!(f, "Adam7"),
      other => write!(f, "Illegal({})", other.0),
    }
  }
}

/// Image Header, from the `IHDR` chunk.
///
/// A value of this type has always passed validation: it's an 8-bit RGB or
/// RGBA image with a non-zero size, no interlacing, and the standard
/// compression and filter methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHeader {
  pub width: u32,
  pub height: u32,
  pub bit_depth: u8,
  pub color_type: PngColorType,
  pub compression_method: PngCompressionMethod,
  pub filter_method: PngFilterMethod,
  pub interlace_method: PngInterlaceMethod,
}
impl ImageHeader {
  /// Parses and validates the header from the first chunk of a PNG.
  pub fn from_chunk(chunk: PngChunk<'_>) -> PngResult<Self> {
    if chunk.chunk_type != ChunkType::IHDR || chunk.length != 13 {
      return Err(PngError::MissingHeader);
    }
    let mut c = ByteCursor::new(chunk.data);
    let header = Self {
      width: c.read_u32_be()?,
      height: c.read_u32_be()?,
      bit_depth: c.read_u8()?,
      color_type: PngColorType(c.read_u8()?),
      compression_method: PngCompressionMethod(c.read_u8()?),
      filter_method: PngFilterMethod(c.read_u8()?),
      interlace_method: PngInterlaceMethod(c.read_u8()?),
    };
    debug!(
      "IHDR: {}x{}, depth {}, color {:?}, compression {:?}, filter {:?}, interlace {:?}",
      header.width,
      header.height,
      header.bit_depth,
      header.color_type,
      header.compression_method,
      header.filter_method,
      header.interlace_method
    );
    header.check_supported()?;
    Ok(header)
  }

  /// Takes the first chunk out of the iterator and parses it as the header.
  pub fn from_chunk_iter(chunks: &mut PngChunkIter<'_>) -> PngResult<Self> {
    let chunk = chunks.next().ok_or(PngError::MissingHeader)??;
    Self::from_chunk(chunk)
  }

  fn check_supported(&self) -> PngResult<()> {
    use PngError::UnsupportedFeature as No;
    let ct = self.color_type;
    if ct.uses_palette() {
      return Err(No(Unsupported::Palette));
    }
    if !ct.is_truecolor() {
      return Err(No(Unsupported::Greyscale));
    }
    if ct != PngColorType::RGB && ct != PngColorType::RGBA {
      return Err(No(Unsupported::ColorType(ct.0)));
    }
    if self.bit_depth != 8 {
      return Err(No(Unsupported::BitDepth(self.bit_depth)));
    }
    if self.compression_method != PngCompressionMethod::DEFLATE {
      return Err(No(Unsupported::CompressionMethod(self.compression_method.0)));
    }
    if self.filter_method != PngFilterMethod::ADAPTIVE {
      return Err(No(Unsupported::FilterMethod(self.filter_method.0)));
    }
    if self.interlace_method != PngInterlaceMethod::NO_INTERLACE {
      return Err(No(Unsupported::InterlaceMethod(self.interlace_method.0)));
    }
    if self.width == 0 || self.height == 0 {
      return Err(PngError::InvalidDimensions);
    }
    Ok(())
  }

  #[inline]
  #[must_use]
  pub const fn is_truecolor(&self) -> bool {
    self.color_type.is_truecolor()
  }

  #[inline]
  #[must_use]
  pub const fn has_alpha(&self) -> bool {
    self.color_type.has_alpha()
  }

  /// 4 with alpha, otherwise 3.
  #[inline]
  #[must_use]
  pub const fn pixel_channels(&self) -> usize {
    if self.has_alpha() {
      4
    } else {
      3
    }
  }

  #[inline]
  #[must_use]
  pub const fn pixel_size_bytes(&self) -> usize {
    self.pixel_channels() * (self.bit_depth as usize / 8)
  }

  /// Bytes of pixel data within one row, not counting the filter byte.
  #[inline]
  pub fn row_bytes(&self) -> PngResult<usize> {
    (self.width as usize).checked_mul(self.pixel_size_bytes()).ok_or(PngError::InvalidDimensions)
  }

  /// Bytes per filtered scanline, including the leading filter type byte.
  #[inline]
  pub fn stride(&self) -> PngResult<usize> {
    self.row_bytes()?.checked_add(1).ok_or(PngError::InvalidDimensions)
  }

  /// Size of the decompressed (still filtered) image data.
  #[inline]
  pub fn raw_buffer_len(&self) -> PngResult<usize> {
    self.stride()?.checked_mul(self.height as usize).ok_or(PngError::InvalidDimensions)
  }

  /// Size of the final pixel data, once the filter bytes are removed.
  #[inline]
  pub fn pixel_buffer_len(&self) -> PngResult<usize> {
    self.row_bytes()?.checked_mul(self.height as usize).ok_or(PngError::InvalidDimensions)
  }
}

#[cfg(test)]
pub(crate) fn ihdr_bytes(width: u32, height: u32, bit_depth: u8, color_type: u8) -> [u8; 13] {
  let mut out = [0_u8; 13];
  out[0..4].copy_from_slice(&width.to_be_bytes());
  out[4..8].copy_from_slice(&height.to_be_bytes());
  out[8] = bit_depth;
  out[9] = color_type;
  out
}

#[cfg(test)]
fn ihdr_chunk(data: &[u8]) -> PngChunk<'_> {
  PngChunk { length: data.len() as u32, chunk_type: ChunkType::IHDR, data }
}

#[test]
fn test_header_fields_and_derived_sizes() {
  let data = ihdr_bytes(5, 3, 8, 2);
  let h = ImageHeader::from_chunk(ihdr_chunk(&data)).unwrap();
  assert_eq!((h.width, h.height), (5, 3));
  assert!(h.is_truecolor());
  assert!(!h.has_alpha());
  assert_eq!(h.pixel_size_bytes(), 3);
  assert_eq!(h.stride(), Ok(16));
  assert_eq!(h.raw_buffer_len(), Ok(48));
  assert_eq!(h.pixel_buffer_len(), Ok(45));

  let data = ihdr_bytes(2, 2, 8, 6);
  let h = ImageHeader::from_chunk(ihdr_chunk(&data)).unwrap();
  assert!(h.has_alpha());
  assert_eq!(h.pixel_channels(), 4);
  assert_eq!(h.stride(), Ok(9));
}

#[test]
fn test_missing_header() {
  let data = ihdr_bytes(1, 1, 8, 2);
  let wrong_type = PngChunk { length: 13, chunk_type: ChunkType::IDAT, data: &data };
  assert_eq!(ImageHeader::from_chunk(wrong_type), Err(PngError::MissingHeader));
  assert_eq!(ImageHeader::from_chunk(ihdr_chunk(&data[..12])), Err(PngError::MissingHeader));
  let mut empty = PngChunkIter::from_chunk_bytes(&[]);
  assert_eq!(ImageHeader::from_chunk_iter(&mut empty), Err(PngError::MissingHeader));
}

#[test]
fn test_unsupported_headers() {
  use PngError::UnsupportedFeature as No;
  let check = |data: [u8; 13]| ImageHeader::from_chunk(ihdr_chunk(&data));
  assert_eq!(check(ihdr_bytes(1, 1, 4, 2)), Err(No(Unsupported::BitDepth(4))));
  assert_eq!(check(ihdr_bytes(1, 1, 16, 6)), Err(No(Unsupported::BitDepth(16))));
  assert_eq!(check(ihdr_bytes(1, 1, 8, 3)), Err(No(Unsupported::Palette)));
  assert_eq!(check(ihdr_bytes(1, 1, 8, 0)), Err(No(Unsupported::Greyscale)));
  assert_eq!(check(ihdr_bytes(1, 1, 8, 4)), Err(No(Unsupported::Greyscale)));
  assert_eq!(check(ihdr_bytes(1, 1, 8, 10)), Err(No(Unsupported::ColorType(10))));
  let mut data = ihdr_bytes(1, 1, 8, 2);
  data[10] = 1;
  assert_eq!(check(data), Err(No(Unsupported::CompressionMethod(1))));
  let mut data = ihdr_bytes(1, 1, 8, 2);
  data[11] = 1;
  assert_eq!(check(data), Err(No(Unsupported::FilterMethod(1))));
  let mut data = ihdr_bytes(1, 1, 8, 2);
  data[12] = 1;
  assert_eq!(check(data), Err(No(Unsupported::InterlaceMethod(1))));
  assert_eq!(check(ihdr_bytes(0, 1, 8, 2)), Err(PngError::InvalidDimensions));
  assert_eq!(check(ihdr_bytes(1, 0, 8, 6)), Err(PngError::InvalidDimensions));
}
