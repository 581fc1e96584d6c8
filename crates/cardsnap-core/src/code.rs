use base64::Engine;

use crate::png::{decode_png_rgba, encode_rgba_png};
use crate::{Error, Result, MAX_CODE_SIDE};

/// A ready raster of the scannable code, produced outside the engine.
/// Held as PNG bytes, validated on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeImage {
    png: Vec<u8>,
    width: u32,
    height: u32,
}

impl CodeImage {
    pub fn from_png(bytes: Vec<u8>) -> Result<Self> {
        let (_, width, height) = decode_png_rgba(&bytes)
            .map_err(|err| Error::InvalidInput(format!("code image: {err}")))?;
        if width == 0 || height == 0 {
            return Err(Error::InvalidInput("code image is empty".to_string()));
        }
        Ok(Self {
            png: bytes,
            width,
            height,
        })
    }

    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidInput("code image is empty".to_string()));
        }
        let png = encode_rgba_png(rgba, width, height)
            .map_err(|err| Error::InvalidInput(format!("code image: {err}")))?;
        Ok(Self { png, width, height })
    }

    /// Black-on-white module grid, `scale` pixels per module.
    pub fn from_modules(modules: &[Vec<bool>], scale: u32) -> Result<Self> {
        let side = modules.len();
        if side == 0 || scale == 0 || modules.iter().any(|row| row.len() != side) {
            return Err(Error::InvalidInput(
                "code modules must form a non-empty square".to_string(),
            ));
        }
        let px = u32::try_from(side)
            .ok()
            .and_then(|side| side.checked_mul(scale))
            .filter(|px| *px <= MAX_CODE_SIDE)
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "code image of {side} modules at scale {scale} exceeds {MAX_CODE_SIDE}px"
                ))
            })?;
        let len = (px as usize)
            .checked_mul(px as usize)
            .and_then(|area| area.checked_mul(4))
            .ok_or_else(|| Error::InvalidInput(format!("code image {px}x{px} is too large")))?;
        let mut rgba = Vec::with_capacity(len);
        for y in 0..px {
            let row = &modules[(y / scale) as usize];
            for x in 0..px {
                let value = if row[(x / scale) as usize] { 0 } else { 255 };
                rgba.extend_from_slice(&[value, value, value, 255]);
            }
        }
        Self::from_rgba(px, px, &rgba)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    pub(crate) fn data_uri(&self) -> String {
        format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&self.png)
        )
    }
}
