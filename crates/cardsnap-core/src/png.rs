use crate::{Error, PngOptions, PngStrip, Result, MAX_PNG_OPT_LEVEL};
use std::io::Cursor;

pub(crate) fn pixmap_to_png(pixmap: &tiny_skia::Pixmap, options: &PngOptions) -> Result<Vec<u8>> {
    let png = pixmap
        .encode_png()
        .map_err(|err| Error::Render(format!("png encode: {err}")))?;
    optimize_png(png, options)
}

pub(crate) fn pixmap_to_webp(pixmap: &tiny_skia::Pixmap, quality: f32) -> Result<Vec<u8>> {
    let width = pixmap.width();
    let height = pixmap.height();
    let rgba = unpremultiply_rgba(pixmap.data());
    let encoder = webp::Encoder::from_rgba(&rgba, width, height);
    let webp = encoder.encode(quality.clamp(0.0, 100.0));
    Ok(webp.to_vec())
}

pub(crate) fn unpremultiply_rgba(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    for chunk in data.chunks_exact(4) {
        let a = chunk[3] as u16;
        if a == 0 {
            out.extend_from_slice(&[0, 0, 0, 0]);
            continue;
        }
        let r = ((chunk[0] as u16 * 255 + a / 2) / a) as u8;
        let g = ((chunk[1] as u16 * 255 + a / 2) / a) as u8;
        let b = ((chunk[2] as u16 * 255 + a / 2) / a) as u8;
        out.extend_from_slice(&[r, g, b, chunk[3]]);
    }
    out
}

pub(crate) fn decode_png_rgba(png: &[u8]) -> Result<(Vec<u8>, u32, u32)> {
    let mut decoder = png::Decoder::new(Cursor::new(png));
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder
        .read_info()
        .map_err(|err| Error::Render(format!("png decode: {err}")))?;
    let buffer_size = reader
        .output_buffer_size()
        .ok_or_else(|| Error::Render("png decode: missing buffer size".to_string()))?;
    let mut buf = vec![0; buffer_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|err| Error::Render(format!("png decode: {err}")))?;
    let data = &buf[..info.buffer_size()];
    let rgba = match info.color_type {
        png::ColorType::Rgba => data.to_vec(),
        png::ColorType::Rgb => expand_channels(data, 3, |px| [px[0], px[1], px[2], 255]),
        png::ColorType::GrayscaleAlpha => expand_channels(data, 2, |px| [px[0], px[0], px[0], px[1]]),
        png::ColorType::Grayscale => expand_channels(data, 1, |px| [px[0], px[0], px[0], 255]),
        png::ColorType::Indexed => {
            return Err(Error::Render(
                "png decode: indexed color not expanded".to_string(),
            ));
        }
    };
    Ok((rgba, info.width, info.height))
}

fn expand_channels(data: &[u8], channels: usize, to_rgba: impl Fn(&[u8]) -> [u8; 4]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() / channels * 4);
    for px in data.chunks_exact(channels) {
        out.extend_from_slice(&to_rgba(px));
    }
    out
}

pub(crate) fn encode_rgba_png(rgba: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    if rgba.len() != width as usize * height as usize * 4 {
        return Err(Error::Render("png encode: invalid rgba buffer".to_string()));
    }
    let mut out = Vec::new();
    let mut encoder = png::Encoder::new(&mut out, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder
        .write_header()
        .map_err(|err| Error::Render(format!("png encode: {err}")))?;
    writer
        .write_image_data(rgba)
        .map_err(|err| Error::Render(format!("png encode: {err}")))?;
    drop(writer);
    Ok(out)
}

pub(crate) fn optimize_png(png: Vec<u8>, options: &PngOptions) -> Result<Vec<u8>> {
    if !options.optimize {
        return Ok(png);
    }
    let level = options.level.min(MAX_PNG_OPT_LEVEL);
    let mut opts = oxipng::Options::from_preset(level);
    opts.strip = match options.strip {
        PngStrip::None => oxipng::StripChunks::None,
        PngStrip::Safe => oxipng::StripChunks::Safe,
        PngStrip::All => oxipng::StripChunks::All,
    };
    oxipng::optimize_from_memory(&png, &opts)
        .map_err(|err| Error::Render(format!("png optimize: {err}")))
}
