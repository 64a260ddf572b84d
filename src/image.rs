//! Provides a heap-allocated image type.

use alloc::vec::Vec;

use pixel_formats::r8g8b8a8_Srgb;

/// Converts an `(x,y)` position within a given `width` 2D space into a linear
/// index.
///
/// This is how [`Bitmap`] turns coordinates into an index of its `pixels`.
/// Positions outside of the image give a meaningless index.
#[inline]
#[must_use]
pub const fn xy_width_to_index(x: u32, y: u32, width: u32) -> usize {
  (y as usize).wrapping_mul(width as usize).wrapping_add(x as usize)
}

/// A direct-color image, stored row-major starting at the top left.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub struct Bitmap<P = r8g8b8a8_Srgb> {
  pub width: u32,
  pub height: u32,
  pub pixels: Vec<P>,
}
impl<P> Bitmap<P> {
  /// Gets the pixel at the position, or `None` if the position is out of
  /// bounds.
  #[inline]
  #[must_use]
  pub fn get(&self, x: u32, y: u32) -> Option<&P> {
    if x < self.width && y < self.height {
      self.pixels.get(xy_width_to_index(x, y, self.width))
    } else {
      None
    }
  }

  /// As [`get`](Self::get), but mutable.
  #[inline]
  #[must_use]
  pub fn get_mut(&mut self, x: u32, y: u32) -> Option<&mut P> {
    if x < self.width && y < self.height {
      self.pixels.get_mut(xy_width_to_index(x, y, self.width))
    } else {
      None
    }
  }
}

#[cfg(feature = "png")]
impl crate::png::DecodedPng {
  /// Converts the pixel bytes into a [`Bitmap`].
  ///
  /// RGB images get an alpha of `0xFF` on every pixel.
  ///
  /// ## Failure
  /// * [`PngError::OutOfMemory`](crate::PngError::OutOfMemory)
  /// * [`PngError::OutputBufferTooSmall`](crate::PngError::OutputBufferTooSmall)
  ///   if `pixels` isn't the length the header calls for.
  pub fn to_bitmap(&self) -> crate::PngResult<Bitmap> {
    use crate::PngError;
    use bytemuck::try_cast_slice;

    let expected = self.header.pixel_buffer_len()?;
    if self.pixels.len() != expected {
      return Err(PngError::OutputBufferTooSmall);
    }
    let mut pixels: Vec<r8g8b8a8_Srgb> = Vec::new();
    pixels.try_reserve_exact(expected / self.channels())?;
    if self.header.has_alpha() {
      let rgba: &[[u8; 4]] =
        try_cast_slice(&self.pixels).map_err(|_| PngError::OutputBufferTooSmall)?;
      pixels.extend(rgba.iter().map(|&[r, g, b, a]| r8g8b8a8_Srgb { r, g, b, a }));
    } else {
      let rgb: &[[u8; 3]] =
        try_cast_slice(&self.pixels).map_err(|_| PngError::OutputBufferTooSmall)?;
      pixels.extend(rgb.iter().map(|&[r, g, b]| r8g8b8a8_Srgb { r, g, b, a: 0xFF }));
    }
    Ok(Bitmap { width: self.width(), height: self.height(), pixels })
  }
}

#[test]
fn test_bitmap_get() {
  let mut bitmap: Bitmap<u8> = Bitmap { width: 3, height: 2, pixels: (0..6).collect() };
  assert_eq!(bitmap.get(0, 0), Some(&0));
  assert_eq!(bitmap.get(2, 1), Some(&5));
  assert_eq!(bitmap.get(3, 0), None);
  assert_eq!(bitmap.get(0, 2), None);
  *bitmap.get_mut(1, 1).unwrap() = 40;
  assert_eq!(bitmap.pixels[4], 40);

  // a short buffer is just out of bounds, not a panic
  let short: Bitmap<u8> = Bitmap { width: 3, height: 2, pixels: (0..4).collect() };
  assert_eq!(short.get(2, 1), None);
}

#[cfg(feature = "png")]
#[test]
fn test_to_bitmap() {
  use crate::png::*;
  let mut header = ImageHeader {
    width: 2,
    height: 1,
    bit_depth: 8,
    color_type: PngColorType::RGB,
    compression_method: PngCompressionMethod::DEFLATE,
    filter_method: PngFilterMethod::ADAPTIVE,
    interlace_method: PngInterlaceMethod::NO_INTERLACE,
  };
  let rgb = DecodedPng { header, pixels: alloc::vec![1, 2, 3, 4, 5, 6] };
  let bitmap = rgb.to_bitmap().unwrap();
  assert_eq!(bitmap.pixels[1], r8g8b8a8_Srgb { r: 4, g: 5, b: 6, a: 0xFF });

  header.color_type = PngColorType::RGBA;
  let rgba = DecodedPng { header, pixels: alloc::vec![1, 2, 3, 4, 5, 6, 7, 8] };
  let bitmap = rgba.to_bitmap().unwrap();
  assert_eq!(bitmap.get(0, 0), Some(&r8g8b8a8_Srgb { r: 1, g: 2, b: 3, a: 4 }));
  assert_eq!(bitmap.get(1, 0), Some(&r8g8b8a8_Srgb { r: 5, g: 6, b: 7, a: 8 }));

  let wrong = DecodedPng { header, pixels: alloc::vec![1, 2, 3] };
  assert_eq!(wrong.to_bitmap(), Err(crate::PngError::OutputBufferTooSmall));
}
