const DEFAULT_WEBP_QUALITY: f32 = 90.0;
const DEFAULT_PNG_OPT_LEVEL: u8 = 2;
const MAX_PNG_OPT_LEVEL: u8 = 6;
const ELLIPSIS: &str = "…";
const HYPHEN: &str = "-";
const MAX_CODE_SIDE: u32 = 4096;

mod code;
mod color;
mod config;
mod fit;
mod fonts;
mod layout;
mod png;
mod render;
mod svg;
mod text;
mod theme;
mod types;

pub use code::CodeImage;
pub use color::Rgb;
pub use config::{
    BodyOptions, CanvasSize, CardConfig, CodeOptions, FontConfig, FooterOptions, FunFactOptions,
    OutputOptions, PanelOptions, PngOptions, PngStrip, Shadow, TitleOptions,
};
pub use fit::{fit_title, FitOutcome, FitParams};
pub use fonts::{FontHandle, FontResolver, FontSet, FontStyle, LineMetrics, TextMeasure};
pub use layout::{layout_chips, plan, CardLayout, Chip, ChipMetrics, Rect};
pub use render::CardRenderer;
pub use text::{wrap, TextBlock, WrapOptions};
pub use theme::{select_theme, Theme, ThemeId};
pub use types::{Advisory, CardRequest, Error, OutputFormat, RenderResult, Result};

#[cfg(test)]
mod tests;
