//! Converts a truecolor PNG into a PPM.
//!
//! `png2ppm [-v|-vv] [--binary] <input.png> [output.ppm]`

use std::{
  path::{Path, PathBuf},
  process::ExitCode,
};

use log::{info, Level};
use pngview::{
  netpbm::{ppm_encode, PpmFormat},
  png::{decode_png, PngChunkIter},
};

const USAGE: &str = "usage: png2ppm [-v|-vv] [--binary] <input.png> [output.ppm]";

struct Args {
  level: Level,
  format: PpmFormat,
  input: PathBuf,
  output: PathBuf,
}

fn parse_args(args: impl Iterator<Item = String>) -> Option<Args> {
  let mut level = Level::Warn;
  let mut format = PpmFormat::P3;
  let mut paths = Vec::new();
  for arg in args {
    match arg.as_str() {
      "-v" => level = Level::Info,
      "-vv" => level = Level::Trace,
      "--binary" => format = PpmFormat::P6,
      flag if flag.starts_with('-') => return None,
      _ => paths.push(PathBuf::from(arg)),
    }
  }
  let mut paths = paths.into_iter();
  let input = paths.next()?;
  let output = paths.next().unwrap_or_else(|| input.with_extension("ppm"));
  if paths.next().is_some() {
    return None;
  }
  Some(Args { level, format, input, output })
}

fn main() -> ExitCode {
  let Some(args) = parse_args(std::env::args().skip(1)) else {
    eprintln!("{USAGE}");
    return ExitCode::from(2);
  };
  if let Err(e) = simple_logger::init_with_level(args.level) {
    eprintln!("couldn't start the logger: {e}");
  }
  match convert(&args.input, &args.output, args.format) {
    Ok(()) => ExitCode::SUCCESS,
    Err(msg) => {
      eprintln!("{}: {}", args.input.display(), msg);
      ExitCode::from(1)
    }
  }
}

fn convert(input: &Path, output: &Path, format: PpmFormat) -> Result<(), String> {
  let bytes = std::fs::read(input).map_err(|e| e.to_string())?;

  for chunk in PngChunkIter::from_png_bytes(&bytes).map_err(|e| e.to_string())? {
    match chunk {
      Ok(chunk) => info!(
        "found {} chunk {:?} of size {} bytes",
        if chunk.chunk_type.is_critical() { "critical" } else { "ancillary" },
        chunk.chunk_type,
        chunk.length
      ),
      // the decode below reports it properly
      Err(_) => break,
    }
  }

  let image = decode_png(&bytes).map_err(|e| e.to_string())?;
  info!("decoded {}x{} with {} channels", image.width(), image.height(), image.channels());

  let ppm = ppm_encode(image.width(), image.height(), image.channels(), &image.pixels, format)
    .map_err(|e| e.to_string())?;
  std::fs::write(output, ppm).map_err(|e| format!("{}: {}", output.display(), e))?;
  info!("wrote {}", output.display());
  Ok(())
}
