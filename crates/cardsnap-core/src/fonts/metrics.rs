use std::fmt;
use std::sync::Arc;

use unicode_width::UnicodeWidthChar;

use super::resolve::FontStyle;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMetrics {
    pub ascent: f32,
    pub descent: f32,
}

impl LineMetrics {
    pub fn height(&self) -> f32 {
        self.ascent + self.descent
    }
}

/// Font metrics at a given pixel size. Implementations must be pure.
pub trait TextMeasure {
    fn advance_width(&self, text: &str, size: f32) -> f32;
    fn line_metrics(&self, size: f32) -> LineMetrics;
}

pub(crate) struct FontData {
    pub(crate) bytes: Arc<Vec<u8>>,
    pub(crate) index: u32,
    pub(crate) family: String,
    pub(crate) weight: u16,
    pub(crate) italic: bool,
    embedded: bool,
    units_per_em: f32,
    ascender: f32,
    descender: f32,
    missing_advance: f32,
}

impl fmt::Debug for FontData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontData")
            .field("family", &self.family)
            .field("weight", &self.weight)
            .field("italic", &self.italic)
            .field("index", &self.index)
            .field("embedded", &self.embedded)
            .finish()
    }
}

impl FontData {
    pub(crate) fn parse(bytes: Vec<u8>, index: u32) -> Result<Self> {
        let (units_per_em, ascender, descender, missing_advance) = {
            let face = ttf_parser::Face::parse(&bytes, index)
                .map_err(|err| Error::Font(format!("parse face: {err}")))?;
            let units_per_em = f32::from(face.units_per_em());
            let missing = face
                .glyph_hor_advance(ttf_parser::GlyphId(0))
                .map(f32::from)
                .unwrap_or(units_per_em / 2.0);
            (
                units_per_em,
                f32::from(face.ascender()),
                f32::from(face.descender()).abs(),
                missing,
            )
        };
        if units_per_em <= 0.0 {
            return Err(Error::Font("face has zero units per em".to_string()));
        }

        let mut db = usvg::fontdb::Database::new();
        db.load_font_data(bytes.clone());
        let info = db
            .faces()
            .find(|face| face.index == index)
            .ok_or_else(|| Error::Font(format!("face {index} not found")))?;
        let family = info
            .families
            .first()
            .map(|(name, _)| name.clone())
            .ok_or_else(|| Error::Font("face has no family name".to_string()))?;
        let weight = info.weight.0;
        let italic = !matches!(info.style, usvg::fontdb::Style::Normal);

        Ok(Self {
            bytes: Arc::new(bytes),
            index,
            family,
            weight,
            italic,
            embedded: false,
            units_per_em,
            ascender,
            descender,
            missing_advance,
        })
    }

    pub(crate) fn into_embedded(self) -> Self {
        Self {
            embedded: true,
            ..self
        }
    }

    /// Sum of glyph advances in font units. A char without a glyph is drawn
    /// as `.notdef`, once per terminal column it would occupy.
    pub(crate) fn advance_units(&self, text: &str) -> f32 {
        let face = ttf_parser::Face::parse(&self.bytes, self.index).ok();
        text.chars()
            .map(|ch| {
                face.as_ref()
                    .and_then(|face| face.glyph_hor_advance(face.glyph_index(ch)?))
                    .map(f32::from)
                    .unwrap_or_else(|| {
                        let columns = ch.width().unwrap_or(1).max(1);
                        self.missing_advance * columns as f32
                    })
            })
            .sum()
    }
}

/// An opaque, validated font resource. Cheap to clone.
#[derive(Debug, Clone)]
pub struct FontHandle {
    data: Arc<FontData>,
}

impl FontHandle {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Ok(Self::from_data(Arc::new(FontData::parse(bytes, 0)?)))
    }

    /// The bundled DejaVu Sans face for `style`.
    pub fn embedded(style: FontStyle) -> Result<Self> {
        super::embedded::load(style)
    }

    pub(crate) fn from_data(data: Arc<FontData>) -> Self {
        Self { data }
    }

    pub fn family(&self) -> &str {
        &self.data.family
    }

    /// True for the faces bundled with the crate.
    pub fn is_embedded(&self) -> bool {
        self.data.embedded
    }

    pub(crate) fn data(&self) -> &Arc<FontData> {
        &self.data
    }

    pub(crate) fn weight(&self) -> u16 {
        self.data.weight
    }

    pub(crate) fn is_italic(&self) -> bool {
        self.data.italic
    }
}

impl TextMeasure for FontHandle {
    fn advance_width(&self, text: &str, size: f32) -> f32 {
        self.data.advance_units(text) * size / self.data.units_per_em
    }

    fn line_metrics(&self, size: f32) -> LineMetrics {
        LineMetrics {
            ascent: self.data.ascender * size / self.data.units_per_em,
            descent: self.data.descender * size / self.data.units_per_em,
        }
    }
}
