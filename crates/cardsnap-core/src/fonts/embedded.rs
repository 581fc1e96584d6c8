//! DejaVu Sans, bundled so a card always has a face that draws glyphs.
//! License: Bitstream Vera, see `assets/fonts/LICENSE-DejaVu.txt`.

use std::sync::Arc;

use once_cell::sync::Lazy;

use super::metrics::{FontData, FontHandle};
use super::resolve::FontStyle;
use crate::{Error, Result};

const REGULAR_BYTES: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
const BOLD_BYTES: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");
const ITALIC_BYTES: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Oblique.ttf");

type Parsed = std::result::Result<Arc<FontData>, String>;

static REGULAR: Lazy<Parsed> = Lazy::new(|| parse(REGULAR_BYTES));
static BOLD: Lazy<Parsed> = Lazy::new(|| parse(BOLD_BYTES));
static ITALIC: Lazy<Parsed> = Lazy::new(|| parse(ITALIC_BYTES));

fn parse(bytes: &[u8]) -> Parsed {
    FontData::parse(bytes.to_vec(), 0)
        .map(|data| Arc::new(data.into_embedded()))
        .map_err(|err| err.to_string())
}

pub(crate) fn load(style: FontStyle) -> Result<FontHandle> {
    let parsed = match style {
        FontStyle::Regular => &*REGULAR,
        FontStyle::Bold => &*BOLD,
        FontStyle::Italic => &*ITALIC,
    };
    parsed
        .clone()
        .map(FontHandle::from_data)
        .map_err(|err| Error::Font(format!("embedded {style} face: {err}")))
}
