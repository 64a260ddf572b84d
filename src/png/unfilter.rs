//! Reconstruction of filtered scanlines.
//!
//! From the PNG spec:
//!
//! > Filters are applied to **bytes**, not to pixels, regardless of the bit
//! > depth or color type of the image.
//!
//! Every byte is predicted from the corresponding byte of the pixel to the left
//! (`a`), the pixel above (`b`), and the pixel above and to the left (`c`).
//! Neighbors outside the image count as 0. Since the neighbors are the
//! *reconstructed* values, the rows must be processed top to bottom and each
//! row left to right.

use super::*;

use core::slice::ChunksExactMut;

/// The filter applied to a single scanline, from its leading byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FilterType {
  None = 0,
  Sub = 1,
  Up = 2,
  Average = 3,
  Paeth = 4,
}
impl FilterType {
  #[inline]
  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::None => "none",
      Self::Sub => "sub",
      Self::Up => "up",
      Self::Average => "average",
      Self::Paeth => "paeth",
    }
  }
}
impl TryFrom<u8> for FilterType {
  type Error = u8;
  #[inline]
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Ok(match value {
      0 => Self::None,
      1 => Self::Sub,
      2 => Self::Up,
      3 => Self::Average,
      4 => Self::Paeth,
      other => return Err(other),
    })
  }
}

/// Row by row unfiltering of a decompressed scanline buffer.
///
/// Each [`step`](Unfilter::step) reconstructs one row in place. While a row
/// is being rebuilt, the row before it (already rebuilt) is only read. After
/// the row is done its filter byte is set to 0, so running the whole buffer
/// through a second time changes nothing.
///
/// An invalid filter byte stops the process: that `step` gives the error and
/// all later steps give `None`.
#[derive(Debug)]
pub struct Unfilter<'a> {
  rows: ChunksExactMut<'a, u8>,
  previous: Option<&'a [u8]>,
  pixel_size: usize,
  row: u32,
  halted: bool,
}
impl<'a> Unfilter<'a> {
  /// The buffer must be exactly [`ImageHeader::raw_buffer_len`] bytes.
  pub fn new(raw: &'a mut [u8], header: &ImageHeader) -> PngResult<Self> {
    if raw.len() != header.raw_buffer_len()? {
      return Err(PngError::OutputBufferTooSmall);
    }
    Ok(Self {
      rows: raw.chunks_exact_mut(header.stride()?),
      previous: None,
      pixel_size: header.pixel_size_bytes(),
      row: 0,
      halted: false,
    })
  }

  /// The row that the next `step` will reconstruct.
  #[inline]
  #[must_use]
  pub const fn row(&self) -> u32 {
    self.row
  }

  /// Reconstructs the next row, giving the filter type it used.
  ///
  /// Returns `None` when all rows are done.
  pub fn step(&mut self) -> Option<PngResult<FilterType>> {
    if self.halted {
      return None;
    }
    let (filter_byte, line) = self.rows.next()?.split_first_mut()?;
    let filter = match FilterType::try_from(*filter_byte) {
      Ok(filter) => filter,
      Err(filter) => {
        self.halted = true;
        return Some(Err(PngError::InvalidFilterType { row: self.row, filter }));
      }
    };
    trace!("row {}: filter {}", self.row, filter.name());
    reconstruct_line(filter, line, self.previous, self.pixel_size);
    *filter_byte = FilterType::None as u8;
    let line: &'a [u8] = line;
    self.previous = Some(line);
    self.row += 1;
    Some(Ok(filter))
  }

  /// Runs all remaining steps.
  pub fn finish(mut self) -> PngResult<()> {
    while let Some(result) = self.step() {
      result?;
    }
    Ok(())
  }
}

/// Unfilters an entire decompressed scanline buffer in place.
///
/// The buffer keeps its layout: each row still starts with its filter byte
/// (now 0). Use [`compact_scanlines`] to squeeze those out.
///
/// ## Failure
/// * [`PngError::OutputBufferTooSmall`] if `raw` isn't exactly
///   [`raw_buffer_len`](ImageHeader::raw_buffer_len) bytes. Nothing is
///   changed in this case.
/// * [`PngError::InvalidFilterType`] for a filter byte above 4. Rows before
///   the bad one will have been reconstructed, and the others not.
pub fn unfilter_in_place(raw: &mut [u8], header: &ImageHeader) -> PngResult<()> {
  Unfilter::new(raw, header)?.finish()
}

/// Removes the filter bytes from an unfiltered scanline buffer, moving the
/// pixel data of each row down.
///
/// Returns the length of the pixel data now at the start of `raw`, which is
/// [`pixel_buffer_len`](ImageHeader::pixel_buffer_len) bytes.
pub fn compact_scanlines(raw: &mut [u8], header: &ImageHeader) -> PngResult<usize> {
  if raw.len() != header.raw_buffer_len()? {
    return Err(PngError::OutputBufferTooSmall);
  }
  let stride = header.stride()?;
  let row_bytes = stride - 1;
  for y in 0..(header.height as usize) {
    let start = y * stride + 1;
    raw.copy_within(start..(start + row_bytes), y * row_bytes);
  }
  header.pixel_buffer_len()
}

/// Reconstructs one line of bytes in place.
///
/// `previous` is the already reconstructed line above (`None` for the first
/// line) and `pixel_size` is the distance back to the `a` byte.
fn reconstruct_line(
  filter: FilterType, line: &mut [u8], previous: Option<&[u8]>, pixel_size: usize,
) {
  let a_at = |line: &[u8], i: usize| if i >= pixel_size { line[i - pixel_size] } else { 0 };
  let b_at = |i: usize| previous.map_or(0, |p| p[i]);
  let c_at = |i: usize| match previous {
    Some(p) if i >= pixel_size => p[i - pixel_size],
    _ => 0,
  };
  match filter {
    FilterType::None => (),
    FilterType::Sub => {
      for i in pixel_size..line.len() {
        line[i] = reconstruct_sub(line[i], line[i - pixel_size]);
      }
    }
    FilterType::Up => {
      if let Some(previous) = previous {
        line.iter_mut().zip(previous.iter()).for_each(|(x, b)| *x = reconstruct_up(*x, *b));
      }
    }
    FilterType::Average => {
      for i in 0..line.len() {
        line[i] = reconstruct_average(line[i], a_at(line, i), b_at(i));
      }
    }
    FilterType::Paeth => {
      for i in 0..line.len() {
        line[i] = reconstruct_paeth(line[i], a_at(line, i), b_at(i), c_at(i));
      }
    }
  }
}

/// Reconstruct Filter Type 1
///
/// * `fx` filtered X
/// * `ra` reconstructed `a`
const fn reconstruct_sub(fx: u8, ra: u8) -> u8 {
  fx.wrapping_add(ra)
}

/// Reconstruct Filter Type 2
///
/// * `fx` filtered X
/// * `rb` reconstructed `b`
const fn reconstruct_up(fx: u8, rb: u8) -> u8 {
  fx.wrapping_add(rb)
}

/// Reconstruct Filter Type 3
///
/// The average is of the full values, it must not wrap at 8 bits.
const fn reconstruct_average(fx: u8, ra: u8, rb: u8) -> u8 {
  fx.wrapping_add(((ra as u16 + rb as u16) / 2) as u8)
}

/// Reconstruct Filter Type 4
const fn reconstruct_paeth(fx: u8, ra: u8, rb: u8, rc: u8) -> u8 {
  fx.wrapping_add(paeth_predictor(ra, rb, rc))
}

/// The Paeth filter function computes a simple linear function of the three
/// neighboring pixels (left `a`, above `b`, upper left `c`).
///
/// The output is the "predictor" of the neighboring pixel closest to the
/// computed value.
#[must_use]
pub const fn paeth_predictor(a: u8, b: u8, c: u8) -> u8 {
  // i32 math, so nothing in here can overflow.
  let a_ = a as i32;
  let b_ = b as i32;
  let c_ = c as i32;
  let p = a_ + b_ - c_;
  let pa = (p - a_).abs();
  let pb = (p - b_).abs();
  let pc = (p - c_).abs();
  // Note(Lokathor): The PNG spec is extremely specific that you shall not,
  // under any circumstances, alter the order of evaluation of this
  // expression's tests.
  if pa <= pb && pa <= pc {
    a
  } else if pb <= pc {
    b
  } else {
    c
  }
}
