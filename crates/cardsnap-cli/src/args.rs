use cardsnap_core::{CanvasSize, OutputFormat, PngStrip};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "cardsnap",
    about = "Render share cards with a title, body, fun fact and a scannable code.",
    version
)]
pub(crate) struct Args {
    /// Card title. Shrinks to fit, never truncated.
    #[arg(long, required_unless_present = "list_themes")]
    pub(crate) title: Option<String>,

    /// Body paragraph.
    #[arg(long, default_value = "")]
    pub(crate) body: String,

    /// Fun fact shown after the label.
    #[arg(long = "fun-fact", default_value = "")]
    pub(crate) fun_fact: String,

    /// Link shown as the first footer chip.
    #[arg(long, default_value = "")]
    pub(crate) link: String,

    /// PNG of the scannable code.
    #[arg(long, value_name = "PNG", required_unless_present = "list_themes")]
    pub(crate) code: Option<PathBuf>,

    /// Theme name. Defaults to a theme picked by date.
    #[arg(short = 't', long)]
    pub(crate) theme: Option<String>,

    /// Date used for theme selection (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub(crate) date: Option<String>,

    /// Canvas size.
    #[arg(long, value_enum)]
    pub(crate) canvas: Option<CanvasArg>,

    /// Output file path (.png/.webp/.svg).
    /// If omitted, writes to stdout (or cardsnap.<ext> when stdout is a TTY).
    #[arg(short, long)]
    pub(crate) output: Option<PathBuf>,

    /// Output format. Inferred from --output when omitted.
    #[arg(long, value_enum)]
    pub(crate) format: Option<FormatArg>,

    /// JSON config file path (default/base/square or custom file).
    #[arg(short, long)]
    pub(crate) config: Option<String>,

    /// Extra footer chips (comma-separated), shown after the link.
    #[arg(long, value_name = "LIST")]
    pub(crate) chips: Option<String>,

    /// Label drawn in italics before the fun fact.
    #[arg(long = "fun-fact.label")]
    pub(crate) fun_fact_label: Option<String>,

    /// Panel shadow.
    #[arg(
        long,
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub(crate) shadow: Option<bool>,

    /// Regular font files (comma-separated, in order of preference).
    #[arg(long = "font.regular", value_name = "LIST")]
    pub(crate) font_regular: Option<String>,

    /// Bold font files (comma-separated).
    #[arg(long = "font.bold", value_name = "LIST")]
    pub(crate) font_bold: Option<String>,

    /// Italic font files (comma-separated).
    #[arg(long = "font.italic", value_name = "LIST")]
    pub(crate) font_italic: Option<String>,

    /// Font directories (comma-separated). Defaults to ~/.cardsnap/fonts.
    #[arg(long = "font.dirs", value_name = "LIST")]
    pub(crate) font_dirs: Option<String>,

    /// Fall back to an installed system face when no candidate loads.
    #[arg(
        long = "font.system-fallback",
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub(crate) font_system_fallback: Option<bool>,

    /// WebP quality (0-100).
    #[arg(long = "webp.quality")]
    pub(crate) webp_quality: Option<f32>,

    /// Optimize PNG output.
    #[arg(
        long = "png.opt",
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub(crate) png_opt: Option<bool>,

    /// PNG optimization level (0-6).
    #[arg(long = "png.level")]
    pub(crate) png_level: Option<u8>,

    /// PNG metadata stripping.
    #[arg(long = "png.strip", value_enum)]
    pub(crate) png_strip: Option<PngStripArg>,

    /// Print the available themes and exit.
    #[arg(long)]
    pub(crate) list_themes: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum FormatArg {
    Png,
    Webp,
    Svg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum CanvasArg {
    Portrait,
    Square,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum PngStripArg {
    None,
    Safe,
    All,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Png => OutputFormat::Png,
            FormatArg::Webp => OutputFormat::Webp,
            FormatArg::Svg => OutputFormat::Svg,
        }
    }
}

impl From<CanvasArg> for CanvasSize {
    fn from(value: CanvasArg) -> Self {
        match value {
            CanvasArg::Portrait => CanvasSize::Portrait,
            CanvasArg::Square => CanvasSize::Square,
        }
    }
}

impl From<PngStripArg> for PngStrip {
    fn from(value: PngStripArg) -> Self {
        match value {
            PngStripArg::None => PngStrip::None,
            PngStripArg::Safe => PngStrip::Safe,
            PngStripArg::All => PngStrip::All,
        }
    }
}
