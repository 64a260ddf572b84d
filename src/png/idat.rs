use super::*;

use alloc::vec::Vec;

/// A zlib decompressor.
///
/// The decoder hands over all of the image's compressed data at once, along
/// with an output buffer that's exactly the size the header says the
/// decompressed data must be. The implementation fills `out` and reports how
/// many bytes it wrote, or fails with one of:
/// * [`PngError::OutOfMemory`]
/// * [`PngError::OutputBufferTooSmall`] if the stream holds more data than
///   fits in `out`.
/// * [`PngError::CorruptData`] for any malformed stream.
///
/// Any `FnMut(&[u8], &mut [u8]) -> PngResult<usize>` closure is an inflater.
pub trait ZlibInflate {
  fn inflate(&mut self, compressed: &[u8], out: &mut [u8]) -> PngResult<usize>;
}
impl<F> ZlibInflate for F
where
  F: FnMut(&[u8], &mut [u8]) -> PngResult<usize>,
{
  #[inline]
  fn inflate(&mut self, compressed: &[u8], out: &mut [u8]) -> PngResult<usize> {
    self(compressed, out)
  }
}

/// Decompresses with [`miniz_oxide`], checking the Adler-32 of the stream.
#[cfg(feature = "miniz_oxide")]
#[cfg_attr(docs_rs, doc(cfg(feature = "miniz_oxide")))]
#[derive(Debug, Clone, Copy, Default)]
pub struct MinizInflate;
#[cfg(feature = "miniz_oxide")]
impl ZlibInflate for MinizInflate {
  fn inflate(&mut self, compressed: &[u8], out: &mut [u8]) -> PngResult<usize> {
    use miniz_oxide::inflate::{decompress_slice_iter_to_slice, TINFLStatus};
    match decompress_slice_iter_to_slice(out, core::iter::once(compressed), true, false) {
      Ok(count) => Ok(count),
      Err(TINFLStatus::HasMoreOutput) => Err(PngError::OutputBufferTooSmall),
      Err(status) => {
        debug!("inflate failed: {:?}", status);
        Err(PngError::CorruptData)
      }
    }
  }
}

/// Gathers the data of every `IDAT` chunk, in file order, into one buffer.
///
/// PNG allows the zlib stream to be split over any number of `IDAT` chunks,
/// and the pieces only make sense joined back together in the order they
/// appear. All other chunks are skipped.
///
/// When `strict` is set a truncated chunk is an error, otherwise the walk
/// just ends there.
pub fn assemble_idat(chunks: PngChunkIter<'_>, strict: bool) -> PngResult<Vec<u8>> {
  let mut compressed: Vec<u8> = Vec::new();
  for chunk in chunks {
    let chunk = match chunk {
      Ok(chunk) => chunk,
      Err(e) if strict => return Err(e),
      Err(e) => {
        debug!("stopping the IDAT walk early: {}", e);
        break;
      }
    };
    if chunk.chunk_type != ChunkType::IDAT {
      continue;
    }
    compressed.try_reserve(chunk.data.len())?;
    compressed.extend_from_slice(chunk.data);
    trace!("IDAT +{} bytes, {} total", chunk.data.len(), compressed.len());
  }
  Ok(compressed)
}

/// Gathers the image data and decompresses it, giving the filtered scanlines.
///
/// The output is exactly [`raw_buffer_len`](ImageHeader::raw_buffer_len)
/// bytes. Anything else from the inflater is an error.
pub fn decompress_idat<Z: ZlibInflate + ?Sized>(
  chunks: PngChunkIter<'_>, header: &ImageHeader, strict: bool, inflater: &mut Z,
) -> PngResult<Vec<u8>> {
  let compressed = assemble_idat(chunks, strict)?;
  let expected = header.raw_buffer_len()?;
  let mut raw: Vec<u8> = Vec::new();
  raw.try_reserve_exact(expected)?;
  raw.resize(expected, 0);
  let written = inflater.inflate(&compressed, &mut raw)?;
  debug!("inflated {} bytes into {} (expected {})", compressed.len(), written, expected);
  if written != expected {
    return Err(PngError::OutputBufferTooSmall);
  }
  Ok(raw)
}
