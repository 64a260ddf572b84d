//! Writes images in the [Netpbm](https://en.wikipedia.org/wiki/Netpbm) PPM
//! format.
//!
//! PPM is an extremely simple format with absolutely no compression: a short
//! text header and then the RGB values, either as text (`P3`) or as bytes
//! (`P6`). There's no alpha channel, so the alpha of RGBA input is dropped.
//!
//! The colorspace of a PPM file is never given in the header. PNG data is
//! usually sRGB, and readers will usually assume that too.

use core::fmt::Write;

use alloc::{string::String, vec::Vec};

use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetpbmError {
  AllocError,
  /// The pixel data isn't `width * height * channels` bytes.
  SizeMismatch,
  /// Only 3 (RGB) or 4 (RGBA) channels can be written.
  ChannelCount,
}
impl From<alloc::collections::TryReserveError> for NetpbmError {
  #[inline]
  fn from(_: alloc::collections::TryReserveError) -> Self {
    NetpbmError::AllocError
  }
}
impl core::fmt::Display for NetpbmError {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    match self {
      Self::AllocError => write!(f, "allocation failed"),
      Self::SizeMismatch => write!(f, "pixel data doesn't match the image size"),
      Self::ChannelCount => write!(f, "only RGB or RGBA pixels can be written"),
    }
  }
}
#[cfg(feature = "std")]
impl std::error::Error for NetpbmError {}

/// Which PPM encoding to write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PpmFormat {
  /// Text. Each row of the image is one line of decimal values.
  #[default]
  P3,
  /// Binary. The RGB bytes follow the header directly.
  P6,
}

/// Encodes 8-bit pixels as a PPM file.
///
/// * `channels` is 3 for RGB or 4 for RGBA.
/// * `pixels` is row-major and channel-interleaved, with no row padding.
///
/// The header is `P3 {width} {height} 255` (or `P6`) on one line.
pub fn ppm_encode(
  width: u32, height: u32, channels: usize, pixels: &[u8], format: PpmFormat,
) -> Result<Vec<u8>, NetpbmError> {
  if channels != 3 && channels != 4 {
    return Err(NetpbmError::ChannelCount);
  }
  let row_bytes = (width as usize).checked_mul(channels).ok_or(NetpbmError::SizeMismatch)?;
  let expected = row_bytes.checked_mul(height as usize).ok_or(NetpbmError::SizeMismatch)?;
  if pixels.len() != expected {
    return Err(NetpbmError::SizeMismatch);
  }
  let pixel_count = width as usize * height as usize;
  debug!("writing {}x{} as {:?}", width, height, format);

  match format {
    PpmFormat::P3 => {
      let mut out = String::new();
      // at most "255 " per value, plus a newline per row.
      out.try_reserve(32 + pixel_count * 12 + height as usize)?;
      writeln!(out, "P3 {width} {height} 255").map_err(|_| NetpbmError::AllocError)?;
      if row_bytes > 0 {
        for row in pixels.chunks_exact(row_bytes) {
          for px in row.chunks_exact(channels) {
            for value in &px[..3] {
              write!(out, "{value} ").map_err(|_| NetpbmError::AllocError)?;
            }
          }
          out.push('\n');
        }
      }
      Ok(out.into_bytes())
    }
    PpmFormat::P6 => {
      let mut out: Vec<u8> = Vec::new();
      out.try_reserve(32 + pixel_count * 3)?;
      let mut header = String::new();
      writeln!(header, "P6 {width} {height} 255").map_err(|_| NetpbmError::AllocError)?;
      out.extend_from_slice(header.as_bytes());
      if channels == 3 {
        out.extend_from_slice(pixels);
      } else {
        let rgba: &[[u8; 4]] =
          bytemuck::try_cast_slice(pixels).map_err(|_| NetpbmError::SizeMismatch)?;
        out.extend(rgba.iter().flat_map(|&[r, g, b, _a]| [r, g, b]));
      }
      Ok(out)
    }
  }
}

#[test]
fn test_p3_layout() {
  let px = [255, 0, 0, 0, 255, 0, 0, 0, 255, 1, 2, 3];
  let out = ppm_encode(2, 2, 3, &px, PpmFormat::P3).unwrap();
  assert_eq!(out, b"P3 2 2 255\n255 0 0 0 255 0 \n0 0 255 1 2 3 \n");
}

#[test]
fn test_alpha_dropped() {
  let px = [10, 20, 30, 40, 50, 60, 70, 80];
  let out = ppm_encode(2, 1, 4, &px, PpmFormat::P3).unwrap();
  assert_eq!(out, b"P3 2 1 255\n10 20 30 50 60 70 \n");
  let out = ppm_encode(2, 1, 4, &px, PpmFormat::P6).unwrap();
  assert_eq!(out, b"P6 2 1 255\n\x0A\x14\x1E\x32\x3C\x46");
}

#[test]
fn test_ppm_errors() {
  assert_eq!(ppm_encode(1, 1, 2, &[0, 0], PpmFormat::P3), Err(NetpbmError::ChannelCount));
  assert_eq!(ppm_encode(2, 1, 3, &[0, 0, 0], PpmFormat::P6), Err(NetpbmError::SizeMismatch));
  assert_eq!(ppm_encode(u32::MAX, u32::MAX, 4, &[], PpmFormat::P3), Err(NetpbmError::SizeMismatch));
}
