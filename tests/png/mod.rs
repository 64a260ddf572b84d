use pngview::{png::*, PngError, Unsupported};

const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Builds PNG bytes. The CRC fields are all zero, which the decoder doesn't
/// check.
struct PngBuilder {
  bytes: Vec<u8>,
}
impl PngBuilder {
  fn new() -> Self {
    Self { bytes: SIGNATURE.to_vec() }
  }
  fn chunk(mut self, ty: &[u8; 4], data: &[u8]) -> Self {
    self.bytes.extend_from_slice(&(data.len() as u32).to_be_bytes());
    self.bytes.extend_from_slice(ty);
    self.bytes.extend_from_slice(data);
    self.bytes.extend_from_slice(&[0; 4]);
    self
  }
  fn ihdr(self, width: u32, height: u32, depth: u8, color: u8, interlace: u8) -> Self {
    let mut data = Vec::new();
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&[depth, color, 0, 0, interlace]);
    self.chunk(b"IHDR", &data)
  }
  /// Compresses `raw` and splits it over IDAT chunks of at most `piece` bytes.
  fn idat(mut self, raw: &[u8], piece: usize) -> Self {
    let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw, 6);
    for part in compressed.chunks(piece) {
      self = self.chunk(b"IDAT", part);
    }
    self
  }
  fn finish(self) -> Vec<u8> {
    self.chunk(b"IEND", &[]).bytes
  }
}

fn paeth(a: u8, b: u8, c: u8) -> u8 {
  let p = a as i32 + b as i32 - c as i32;
  let (pa, pb, pc) = ((p - a as i32).abs(), (p - b as i32).abs(), (p - c as i32).abs());
  if pa <= pb && pa <= pc {
    a
  } else if pb <= pc {
    b
  } else {
    c
  }
}

/// Filters `pixels` the way an encoder would, with row `y` using filter
/// `filters[y % filters.len()]`.
fn filter_image(pixels: &[u8], width: usize, bpp: usize, filters: &[u8]) -> Vec<u8> {
  let row_bytes = width * bpp;
  let mut out = Vec::new();
  let mut prev = vec![0_u8; row_bytes];
  for (y, row) in pixels.chunks_exact(row_bytes).enumerate() {
    let f = filters[y % filters.len()];
    out.push(f);
    for i in 0..row_bytes {
      let a = if i >= bpp { row[i - bpp] } else { 0 };
      let b = prev[i];
      let c = if i >= bpp { prev[i - bpp] } else { 0 };
      let predicted = match f {
        0 => 0,
        1 => a,
        2 => b,
        3 => ((a as u16 + b as u16) / 2) as u8,
        _ => paeth(a, b, c),
      };
      out.push(row[i].wrapping_sub(predicted));
    }
    prev.copy_from_slice(row);
  }
  out
}

fn random_image(width: u32, height: u32, bpp: usize) -> Vec<u8> {
  super::rand_bytes(width as usize * height as usize * bpp)
}

#[test]
fn test_decode_rgb_all_filters() {
  let (w, h) = (7, 10);
  let pixels = random_image(w, h, 3);
  let raw = filter_image(&pixels, w as usize, 3, &[0, 1, 2, 3, 4]);
  let png = PngBuilder::new().ihdr(w, h, 8, 2, 0).idat(&raw, usize::MAX).finish();
  let image = decode_png(&png).unwrap();
  assert_eq!(image.header.color_type, PngColorType::RGB);
  assert_eq!(image.channels(), 3);
  assert_eq!(image.pixels, pixels);
}

#[test]
fn test_decode_rgba_split_idat_with_ancillary_chunks() {
  let (w, h) = (5, 6);
  let pixels = random_image(w, h, 4);
  let raw = filter_image(&pixels, w as usize, 4, &[4, 3, 2, 1, 0]);
  let png = PngBuilder::new()
    .ihdr(w, h, 8, 6, 0)
    .chunk(b"gAMA", &[0, 0, 0xB1, 0x8F])
    .idat(&raw, 7)
    .chunk(b"tEXt", b"Comment\0between IDATs is fine here")
    .finish();
  let image = decode_png(&png).unwrap();
  assert_eq!((image.width(), image.height(), image.channels()), (5, 6, 4));
  assert_eq!(image.pixels, pixels);
  let bitmap = image.to_bitmap().unwrap();
  let px = bitmap.get(4, 5).unwrap();
  assert_eq!([px.r, px.g, px.b, px.a], pixels[pixels.len() - 4..]);
}

#[test]
fn test_single_pixel() {
  let png = PngBuilder::new().ihdr(1, 1, 8, 2, 0).idat(&[0, 9, 8, 7], 64).finish();
  let image = decode_png(&png).unwrap();
  assert_eq!(image.pixels, [9, 8, 7]);
  let bitmap = image.to_bitmap().unwrap();
  assert_eq!(bitmap.pixels[0].a, 0xFF);
}

#[test]
fn test_header_only_queries() {
  let png = PngBuilder::new().ihdr(300, 200, 8, 6, 0).finish();
  let header = png_get_header(&png).unwrap();
  assert_eq!((header.width, header.height), (300, 200));
  assert_eq!(header.stride(), Ok(1201));
  // no IDAT at all means no zlib stream
  assert_eq!(decode_png(&png), Err(PngError::CorruptData));
}

#[test]
fn test_decode_errors() {
  assert_eq!(decode_png(b"GIF89a.."), Err(PngError::BadSignature));
  assert_eq!(decode_png(&SIGNATURE[..5]), Err(PngError::BadSignature));
  assert_eq!(decode_png(&SIGNATURE), Err(PngError::MissingHeader));

  let first_not_ihdr = PngBuilder::new().chunk(b"gAMA", &[0; 4]).ihdr(1, 1, 8, 2, 0).finish();
  assert_eq!(decode_png(&first_not_ihdr), Err(PngError::MissingHeader));

  let interlaced = PngBuilder::new().ihdr(1, 1, 8, 2, 1).finish();
  assert_eq!(
    decode_png(&interlaced),
    Err(PngError::UnsupportedFeature(Unsupported::InterlaceMethod(1)))
  );
  let palette = PngBuilder::new().ihdr(1, 1, 8, 3, 0).finish();
  assert_eq!(decode_png(&palette), Err(PngError::UnsupportedFeature(Unsupported::Palette)));

  // 2x2 RGB wants 14 bytes, give it 10
  let short = PngBuilder::new().ihdr(2, 2, 8, 2, 0).idat(&[0; 10], 64).finish();
  assert_eq!(decode_png(&short), Err(PngError::OutputBufferTooSmall));
  // and 20 is too many
  let long = PngBuilder::new().ihdr(2, 2, 8, 2, 0).idat(&[0; 20], 64).finish();
  assert_eq!(decode_png(&long), Err(PngError::OutputBufferTooSmall));

  let bad_filter = PngBuilder::new().ihdr(1, 2, 8, 2, 0).idat(&[0, 1, 2, 3, 7, 1, 2, 3], 64).finish();
  assert_eq!(decode_png(&bad_filter), Err(PngError::InvalidFilterType { row: 1, filter: 7 }));

  let garbage = PngBuilder::new().ihdr(1, 1, 8, 2, 0).chunk(b"IDAT", b"definitely not zlib").finish();
  assert_eq!(decode_png(&garbage), Err(PngError::CorruptData));
}

#[test]
fn test_truncated_file() {
  let raw = [0, 1, 2, 3];
  let mut png = PngBuilder::new().ihdr(1, 1, 8, 2, 0).idat(&raw, 64).finish();
  // chop the IEND chunk in half
  png.truncate(png.len() - 6);
  assert_eq!(decode_png(&png), Err(PngError::TruncatedInput));
  let lenient = DecodeOptions::new().set_strict_idat_walk(false);
  let image = decode_png_with(&png, &lenient, &mut MinizInflate).unwrap();
  assert_eq!(image.pixels, [1, 2, 3]);
}

#[test]
fn test_chunk_iter_views() {
  let png = PngBuilder::new().ihdr(1, 1, 8, 2, 0).chunk(b"tEXt", b"hi").finish();
  let chunks: Vec<_> = PngChunkIter::from_png_bytes(&png).unwrap().map(Result::unwrap).collect();
  assert_eq!(chunks.len(), 3);
  assert_eq!(chunks[0].chunk_type, ChunkType::IHDR);
  assert!(chunks[0].chunk_type.is_critical());
  assert_eq!(chunks[1].data, b"hi");
  assert!(!chunks[1].chunk_type.is_critical());
  assert_eq!(chunks[2].chunk_type, ChunkType::IEND);
  assert_eq!(chunks[2].length, 0);
}

#[test]
fn test_decode_png_no_panics() {
  // even totally random data should never panic the decoder!
  for _ in 0..20 {
    let v = super::rand_bytes(1024);
    let _ = decode_png(&v);
    for _ in PngChunkIter::from_chunk_bytes(&v) {
      //
    }
  }
  // random bytes after a real header go all the way to the inflater
  for _ in 0..20 {
    let noise = super::rand_bytes(256);
    let png = PngBuilder::new().ihdr(4, 4, 8, 6, 0).chunk(b"IDAT", &noise).finish();
    assert!(decode_png(&png).is_err());
  }
  // and valid zlib of random filtered lines still has to decode or fail cleanly
  for _ in 0..20 {
    let raw = super::rand_bytes(4 * (1 + 4 * 3));
    let png = PngBuilder::new().ihdr(4, 4, 8, 2, 0).idat(&raw, 16).finish();
    let _ = decode_png(&png);
  }
}

#[test]
fn test_no_default_size_limit() {
  let width = 16385;
  let raw = vec![0_u8; 1 + width as usize * 3];
  let png = PngBuilder::new().ihdr(width, 1, 8, 2, 0).idat(&raw, 8192).finish();
  let image = decode_png(&png).unwrap();
  assert_eq!((image.width(), image.height()), (width, 1));
  assert_eq!(image.pixels.len(), width as usize * 3);
  let capped = DecodeOptions::new().set_max_width(16384);
  assert_eq!(decode_png_with(&png, &capped, &mut MinizInflate), Err(PngError::InvalidDimensions));
}
