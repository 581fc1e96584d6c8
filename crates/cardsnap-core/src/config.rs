use serde::{Deserialize, Serialize};

use crate::{OutputFormat, Rgb, DEFAULT_PNG_OPT_LEVEL, DEFAULT_WEBP_QUALITY};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    pub canvas: CanvasSize,
    pub outer_padding: f32,
    pub inner_padding: f32,
    pub zone_gap: f32,
    pub panel: PanelOptions,
    pub title: TitleOptions,
    pub body: BodyOptions,
    pub fun_fact: FunFactOptions,
    pub footer: FooterOptions,
    pub code: CodeOptions,
    pub fonts: FontConfig,
    pub output: OutputOptions,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasSize::Portrait,
            outer_padding: 48.0,
            inner_padding: 64.0,
            zone_gap: 32.0,
            panel: PanelOptions::default(),
            title: TitleOptions::default(),
            body: BodyOptions::default(),
            fun_fact: FunFactOptions::default(),
            footer: FooterOptions::default(),
            code: CodeOptions::default(),
            fonts: FontConfig::default(),
            output: OutputOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CanvasSize {
    #[default]
    Portrait,
    Square,
}

impl CanvasSize {
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            CanvasSize::Portrait => (1080, 1350),
            CanvasSize::Square => (1080, 1080),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelOptions {
    pub radius: f32,
    pub shadow: Shadow,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            radius: 36.0,
            shadow: Shadow::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Shadow {
    pub enabled: bool,
    pub blur: f32,
    pub x: f32,
    pub y: f32,
    pub opacity: f32,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            enabled: true,
            blur: 18.0,
            x: 0.0,
            y: 12.0,
            opacity: 0.28,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleOptions {
    pub size: f32,
    pub min_size: f32,
    pub step: f32,
    pub max_lines: usize,
    pub line_height: f32,
    pub zone_height: f32,
}

impl Default for TitleOptions {
    fn default() -> Self {
        Self {
            size: 76.0,
            min_size: 44.0,
            step: 4.0,
            max_lines: 3,
            line_height: 1.12,
            zone_height: 300.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyOptions {
    pub size: f32,
    pub line_height: f32,
}

impl Default for BodyOptions {
    fn default() -> Self {
        Self {
            size: 38.0,
            line_height: 1.4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FunFactOptions {
    pub size: f32,
    pub line_height: f32,
    pub label: String,
    pub zone_height: f32,
}

impl Default for FunFactOptions {
    fn default() -> Self {
        Self {
            size: 32.0,
            line_height: 1.35,
            label: "Fun fact:".to_string(),
            zone_height: 140.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FooterOptions {
    pub chips: Vec<String>,
    pub size: f32,
    pub padding_x: f32,
    pub padding_y: f32,
    pub gap: f32,
    pub height: f32,
    pub radius: f32,
}

impl Default for FooterOptions {
    fn default() -> Self {
        Self {
            chips: vec!["#funfact".to_string()],
            size: 24.0,
            padding_x: 20.0,
            padding_y: 12.0,
            gap: 12.0,
            height: 56.0,
            radius: 28.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeOptions {
    pub size: f32,
    pub frame_margin: f32,
    pub gap: f32,
    pub frame_color: Rgb,
    pub frame_radius: f32,
}

impl Default for CodeOptions {
    fn default() -> Self {
        Self {
            size: 200.0,
            frame_margin: 12.0,
            gap: 32.0,
            frame_color: Rgb::WHITE,
            frame_radius: 14.0,
        }
    }
}

/// Ordered font candidates per style. Entries are file paths, absolute or
/// relative to one of the font dirs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub regular: Vec<String>,
    pub bold: Vec<String>,
    pub italic: Vec<String>,
    pub dirs: Vec<String>,
    pub system_fallback: bool,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            regular: vec![
                "BeVietnamPro-Regular.ttf".to_string(),
                "NotoSans-Regular.ttf".to_string(),
            ],
            bold: vec![
                "BeVietnamPro-Bold.ttf".to_string(),
                "NotoSans-Bold.ttf".to_string(),
            ],
            italic: vec![
                "BeVietnamPro-Italic.ttf".to_string(),
                "NotoSans-Italic.ttf".to_string(),
            ],
            dirs: Vec::new(),
            system_fallback: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    pub format: OutputFormat,
    pub webp_quality: f32,
    pub png: PngOptions,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Png,
            webp_quality: DEFAULT_WEBP_QUALITY,
            png: PngOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PngStrip {
    None,
    #[default]
    Safe,
    All,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PngOptions {
    pub optimize: bool,
    pub level: u8,
    pub strip: PngStrip,
}

impl Default for PngOptions {
    fn default() -> Self {
        Self {
            optimize: true,
            level: DEFAULT_PNG_OPT_LEVEL,
            strip: PngStrip::Safe,
        }
    }
}
