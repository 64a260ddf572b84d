use pngview::{
  netpbm::{ppm_encode, PpmFormat},
  png::decode_png,
};

fn png_rgba_2x1() -> Vec<u8> {
  let mut png = vec![137, 80, 78, 71, 13, 10, 26, 10];
  let mut chunk = |ty: &[u8; 4], data: &[u8]| {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(ty);
    png.extend_from_slice(data);
    png.extend_from_slice(&[0; 4]);
  };
  chunk(b"IHDR", &[0, 0, 0, 2, 0, 0, 0, 1, 8, 6, 0, 0, 0]);
  let raw = [0, 255, 128, 0, 7, 1, 2, 3, 4];
  chunk(b"IDAT", &miniz_oxide::deflate::compress_to_vec_zlib(&raw, 6));
  chunk(b"IEND", &[]);
  png
}

#[test]
fn test_png_to_p3() {
  let image = decode_png(&png_rgba_2x1()).unwrap();
  let ppm =
    ppm_encode(image.width(), image.height(), image.channels(), &image.pixels, PpmFormat::P3)
      .unwrap();
  assert_eq!(String::from_utf8(ppm).unwrap(), "P3 2 1 255\n255 128 0 1 2 3 \n");
}

#[test]
fn test_png_to_p6() {
  let image = decode_png(&png_rgba_2x1()).unwrap();
  let ppm =
    ppm_encode(image.width(), image.height(), image.channels(), &image.pixels, PpmFormat::P6)
      .unwrap();
  assert_eq!(ppm, b"P6 2 1 255\n\xFF\x80\x00\x01\x02\x03");
}

#[test]
fn test_p3_row_per_line() {
  let pixels = super::rand_bytes(3 * 4 * 5);
  let ppm = ppm_encode(4, 5, 3, &pixels, PpmFormat::P3).unwrap();
  let text = String::from_utf8(ppm).unwrap();
  let mut lines = text.lines();
  assert_eq!(lines.next(), Some("P3 4 5 255"));
  let mut rows = 0;
  for (y, line) in lines.enumerate() {
    let values: Vec<u8> = line.split_whitespace().map(|v| v.parse().unwrap()).collect();
    assert_eq!(values, pixels[y * 12..(y + 1) * 12]);
    rows += 1;
  }
  assert_eq!(rows, 5);
}
