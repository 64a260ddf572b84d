use super::*;

/// The 8 bytes every PNG data stream starts with.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Checks if the PNG's initial 8 bytes are correct.
#[inline]
#[must_use]
pub const fn is_png_signature_correct(bytes: &[u8]) -> bool {
  matches!(bytes, [137, 80, 78, 71, 13, 10, 26, 10, ..])
}

/// A four byte chunk type tag, such as `IHDR`.
///
/// Bit 5 of each byte of the tag is a property flag, see the methods.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ChunkType(pub [u8; 4]);
#[allow(nonstandard_style)]
impl ChunkType {
  pub const IHDR: Self = Self(*b"IHDR");
  pub const PLTE: Self = Self(*b"PLTE");
  pub const IDAT: Self = Self(*b"IDAT");
  pub const IEND: Self = Self(*b"IEND");

  /// Critical chunks must be understood to display the image.
  #[inline]
  #[must_use]
  pub const fn is_critical(self) -> bool {
    (self.0[0] & 32) == 0
  }
  #[inline]
  #[must_use]
  pub const fn is_public(self) -> bool {
    (self.0[1] & 32) == 0
  }
  /// The third byte must be uppercase in the current version of PNG.
  #[inline]
  #[must_use]
  pub const fn is_reserved_bit_valid(self) -> bool {
    (self.0[2] & 32) == 0
  }
  /// If an editor that doesn't know this chunk may copy it into a modified
  /// image.
  #[inline]
  #[must_use]
  pub const fn is_safe_to_copy(self) -> bool {
    (self.0[3] & 32) != 0
  }
}
impl Debug for ChunkType {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    for b in self.0 {
      f.write_char(b as char)?;
    }
    Ok(())
  }
}

/// A chunk from a PNG, borrowing its data from the PNG bytes.
///
/// The 4 byte CRC that follows each chunk's data is skipped, not checked.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PngChunk<'b> {
  pub length: u32,
  pub chunk_type: ChunkType,
  pub data: &'b [u8],
}
impl Debug for PngChunk<'_> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("PngChunk")
      .field("chunk_type", &self.chunk_type)
      .field("length", &self.length)
      .field("data", &&self.data[..self.data.len().min(12)])
      .finish()
  }
}

/// An iterator over the chunks of some PNG bytes.
///
/// * Yields `None` once the bytes are used up exactly.
/// * If a chunk is cut off (including a chunk whose declared length is more
///   than the bytes left) the iterator yields one
///   `Err(PngError::TruncatedInput)` and after that only `None`.
///
/// Cloning the iterator gives an independent pass over the same bytes.
#[derive(Debug, Clone)]
pub struct PngChunkIter<'b> {
  cursor: ByteCursor<'b>,
  done: bool,
}
impl<'b> PngChunkIter<'b> {
  /// Checks the PNG signature, then iterates the chunks after it.
  pub fn from_png_bytes(bytes: &'b [u8]) -> PngResult<Self> {
    let mut cursor = ByteCursor::new(bytes);
    match cursor.read_array::<8>() {
      Ok(PNG_SIGNATURE) => Ok(Self { cursor, done: false }),
      _ => Err(PngError::BadSignature),
    }
  }

  /// Iterates chunks starting from the front of `bytes`, which must **not**
  /// include the signature.
  #[inline]
  #[must_use]
  pub const fn from_chunk_bytes(bytes: &'b [u8]) -> Self {
    Self { cursor: ByteCursor::new(bytes), done: false }
  }

  /// Offset of the next chunk within the bytes given at construction.
  #[inline]
  #[must_use]
  pub const fn position(&self) -> usize {
    self.cursor.position()
  }

  fn next_chunk(&mut self) -> PngResult<PngChunk<'b>> {
    // work on a copy so a truncated chunk leaves our position alone.
    let mut c = self.cursor;
    let length = c.read_u32_be()?;
    let chunk_type = ChunkType(c.read_array()?);
    if (length as usize).saturating_add(4) > c.remaining() {
      return Err(PngError::TruncatedInput);
    }
    let data = c.read_bytes(length as usize)?;
    c.skip(4)?;
    self.cursor = c;
    Ok(PngChunk { length, chunk_type, data })
  }
}
impl<'b> Iterator for PngChunkIter<'b> {
  type Item = PngResult<PngChunk<'b>>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.done || self.cursor.is_empty() {
      return None;
    }
    let out = self.next_chunk();
    match &out {
      Ok(chunk) => trace!("chunk {:?}, {} bytes", chunk.chunk_type, chunk.length),
      Err(e) => {
        trace!("chunk at offset {}: {}", self.cursor.position(), e);
        self.done = true;
      }
    }
    Some(out)
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    if self.done {
      (0, Some(0))
    } else {
      // every chunk, even an empty one, is at least 12 bytes.
      (0, Some((self.cursor.remaining() + 11) / 12))
    }
  }
}
impl core::iter::FusedIterator for PngChunkIter<'_> {}

#[cfg(test)]
pub(crate) fn push_chunk(out: &mut std::vec::Vec<u8>, ty: &[u8; 4], data: &[u8]) {
  out.extend_from_slice(&(data.len() as u32).to_be_bytes());
  out.extend_from_slice(ty);
  out.extend_from_slice(data);
  // the CRC is never checked
  out.extend_from_slice(&[0; 4]);
}

#[test]
fn test_bad_signature_reads_no_chunks() {
  let mut bytes = std::vec::Vec::from(&b"NOTPNG\r\n"[..]);
  push_chunk(&mut bytes, b"IHDR", &[0; 13]);
  assert_eq!(PngChunkIter::from_png_bytes(&bytes).unwrap_err(), PngError::BadSignature);
  assert_eq!(PngChunkIter::from_png_bytes(&PNG_SIGNATURE[..7]).unwrap_err(), PngError::BadSignature);
  assert!(!is_png_signature_correct(&bytes));
}

#[test]
fn test_chunks_are_views_in_order() {
  let mut bytes = std::vec::Vec::from(&PNG_SIGNATURE[..]);
  push_chunk(&mut bytes, b"IHDR", &[7; 13]);
  push_chunk(&mut bytes, b"tEXt", b"hello");
  push_chunk(&mut bytes, b"IEND", &[]);
  let chunks: std::vec::Vec<_> =
    PngChunkIter::from_png_bytes(&bytes).unwrap().collect::<PngResult<_>>().unwrap();
  assert_eq!(chunks.len(), 3);
  assert_eq!(chunks[0].chunk_type, ChunkType::IHDR);
  assert_eq!(chunks[0].length, 13);
  assert_eq!(chunks[1].data, b"hello");
  assert_eq!(chunks[1].data.as_ptr(), bytes[8 + 25 + 8..].as_ptr());
  assert_eq!(chunks[2].chunk_type, ChunkType::IEND);
  assert!(chunks[2].data.is_empty());
}

#[test]
fn test_overlong_chunk_is_truncated_input() {
  let mut bytes = std::vec::Vec::from(&PNG_SIGNATURE[..]);
  push_chunk(&mut bytes, b"IHDR", &[0; 13]);
  let good_end = bytes.len();
  bytes.extend_from_slice(&100_u32.to_be_bytes());
  bytes.extend_from_slice(b"IDAT");
  bytes.extend_from_slice(&[1, 2, 3]);
  let mut it = PngChunkIter::from_png_bytes(&bytes).unwrap();
  assert!(it.next().unwrap().is_ok());
  assert_eq!(it.next(), Some(Err(PngError::TruncatedInput)));
  assert_eq!(it.position(), good_end);
  assert_eq!(it.next(), None);
  assert_eq!(it.next(), None);
}

#[test]
fn test_missing_crc_is_truncated_input() {
  let mut bytes = std::vec::Vec::from(&PNG_SIGNATURE[..]);
  push_chunk(&mut bytes, b"IDAT", b"ABCD");
  bytes.truncate(bytes.len() - 1);
  let mut it = PngChunkIter::from_png_bytes(&bytes).unwrap();
  assert_eq!(it.next(), Some(Err(PngError::TruncatedInput)));
  assert_eq!(it.next(), None);
}

#[test]
fn test_partial_chunk_header_is_truncated_input() {
  let mut it = PngChunkIter::from_chunk_bytes(&[0, 0, 0, 0, b'I']);
  assert_eq!(it.next(), Some(Err(PngError::TruncatedInput)));
  assert_eq!(it.next(), None);
  assert_eq!(PngChunkIter::from_chunk_bytes(&[]).next(), None);
}

#[test]
fn test_chunk_type_properties() {
  assert!(ChunkType::IHDR.is_critical());
  assert!(ChunkType::IDAT.is_public());
  assert!(!ChunkType(*b"tEXt").is_critical());
  assert!(ChunkType(*b"tEXt").is_safe_to_copy());
  assert!(!ChunkType(*b"IHDR").is_safe_to_copy());
  let private = ChunkType(*b"pRVt");
  assert!(!private.is_critical());
  assert!(private.is_public());
  assert!(private.is_reserved_bit_valid());
  assert!(!ChunkType(*b"prvt").is_public());
  assert!(!ChunkType(*b"prvt").is_reserved_bit_valid());
  assert_eq!(std::format!("{:?}", ChunkType::IDAT), "IDAT");
}
