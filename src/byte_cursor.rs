//! A read cursor over borrowed bytes.

use crate::{PngError, PngResult};

/// Reads values off the front of a byte slice, tracking the position.
///
/// Every read either takes exactly the bytes it needs and advances, or fails
/// with [`PngError::TruncatedInput`] and leaves the position where it was.
/// Multi-byte integers are always big-endian.
///
/// The cursor is `Copy`: copying one gives a second cursor at the same
/// position that can be advanced independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteCursor<'b> {
  bytes: &'b [u8],
  position: usize,
}
impl<'b> ByteCursor<'b> {
  #[inline]
  #[must_use]
  pub const fn new(bytes: &'b [u8]) -> Self {
    Self { bytes, position: 0 }
  }

  /// Bytes consumed so far.
  #[inline]
  #[must_use]
  pub const fn position(&self) -> usize {
    self.position
  }

  #[inline]
  #[must_use]
  pub const fn remaining(&self) -> usize {
    self.bytes.len() - self.position
  }

  #[inline]
  #[must_use]
  pub const fn is_empty(&self) -> bool {
    self.remaining() == 0
  }

  /// Takes the next `n` bytes as a sub-slice of the original buffer.
  #[inline]
  pub fn read_bytes(&mut self, n: usize) -> PngResult<&'b [u8]> {
    let end = self.position.checked_add(n).ok_or(PngError::TruncatedInput)?;
    let out = self.bytes.get(self.position..end).ok_or(PngError::TruncatedInput)?;
    self.position = end;
    Ok(out)
  }

  #[inline]
  pub fn read_array<const N: usize>(&mut self) -> PngResult<[u8; N]> {
    let mut a = [0_u8; N];
    a.copy_from_slice(self.read_bytes(N)?);
    Ok(a)
  }

  #[inline]
  pub fn read_u8(&mut self) -> PngResult<u8> {
    self.read_array::<1>().map(|[b]| b)
  }

  #[inline]
  pub fn read_u16_be(&mut self) -> PngResult<u16> {
    self.read_array().map(u16::from_be_bytes)
  }

  #[inline]
  pub fn read_u32_be(&mut self) -> PngResult<u32> {
    self.read_array().map(u32::from_be_bytes)
  }

  /// Skips `n` bytes without looking at them.
  #[inline]
  pub fn skip(&mut self, n: usize) -> PngResult<()> {
    self.read_bytes(n).map(|_| ())
  }
}

#[test]
fn test_reads_are_big_endian() {
  let mut c = ByteCursor::new(&[0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE]);
  assert_eq!(c.read_u32_be(), Ok(0x1234_5678));
  assert_eq!(c.read_u16_be(), Ok(0x9ABC));
  assert_eq!(c.read_u8(), Ok(0xDE));
  assert!(c.is_empty());
  assert_eq!(c.position(), 7);
}

#[test]
fn test_failed_read_does_not_advance() {
  let mut c = ByteCursor::new(&[1, 2, 3]);
  assert_eq!(c.read_u8(), Ok(1));
  assert_eq!(c.read_u32_be(), Err(PngError::TruncatedInput));
  assert_eq!(c.position(), 1);
  assert_eq!(c.read_bytes(3), Err(PngError::TruncatedInput));
  assert_eq!(c.position(), 1);
  assert_eq!(c.read_bytes(usize::MAX), Err(PngError::TruncatedInput));
  assert_eq!(c.read_bytes(2), Ok(&[2_u8, 3][..]));
  assert_eq!(c.read_bytes(0), Ok(&[][..]));
  assert_eq!(c.read_u8(), Err(PngError::TruncatedInput));
}

#[test]
fn test_copies_are_independent() {
  let mut a = ByteCursor::new(b"abcd");
  a.skip(1).unwrap();
  let mut b = a;
  assert_eq!(b.read_bytes(2), Ok(&b"bc"[..]));
  assert_eq!(a.position(), 1);
  assert_eq!(a.remaining(), 3);
}
