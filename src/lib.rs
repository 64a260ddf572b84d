#![no_std]
#![cfg_attr(docs_rs, feature(doc_cfg))]
#![forbid(unsafe_code)]

//! A crate for decoding truecolor PNG data.
//!
//! The decoder accepts 8-bit RGB and RGBA images that are not interlaced. Other
//! PNG configurations (palettes, grayscale, other bit depths, Adam7) are
//! rejected with a [`PngError::UnsupportedFeature`] rather than decoded
//! incorrectly.
//!
//! See the [`png`] module for the decoding pipeline, and [`netpbm`] for writing
//! the decoded pixels out as a PPM file.

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(any(feature = "std", test))]
extern crate std;

#[cfg(target_pointer_width = "16")]
compile_error!("this crate assumes 32-bit or bigger pointers!");

mod error;
pub use error::*;

mod byte_cursor;
pub use byte_cursor::*;

#[cfg(feature = "png")]
pub mod png;

#[cfg(all(feature = "netpbm", feature = "alloc"))]
pub mod netpbm;

#[cfg(feature = "alloc")]
pub mod image;

pub use pixel_formats::r8g8b8a8_Srgb;
