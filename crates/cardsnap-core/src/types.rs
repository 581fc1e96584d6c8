use serde::{Deserialize, Serialize};

use crate::{CardLayout, Chip, FontStyle, ThemeId};

#[derive(Debug, Clone, Default)]
pub struct CardRequest {
    pub title: String,
    pub body: String,
    pub fun_fact: String,
    pub link: String,
    /// Explicit theme id. `None` selects by calendar date.
    pub theme: Option<String>,
}

impl CardRequest {
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        fun_fact: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            fun_fact: fun_fact.into(),
            link: link.into(),
            theme: None,
        }
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Webp,
    Svg,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Webp => "webp",
            OutputFormat::Svg => "svg",
        }
    }
}

/// Recoverable degradations. The card is still rendered when one occurs.
#[derive(Debug, Clone, PartialEq)]
pub enum Advisory {
    FontFallback {
        style: FontStyle,
        requested: Vec<String>,
        substituted: String,
    },
    TitleOverflow {
        size: f32,
        lines: usize,
        max_lines: usize,
    },
}

#[derive(Debug, Clone)]
pub struct RenderResult {
    pub format: OutputFormat,
    pub bytes: Vec<u8>,
    pub theme: ThemeId,
    pub title_size: f32,
    /// Zones as drawn. The title height is the fitted block and the body
    /// starts one `zone_gap` below it.
    pub layout: CardLayout,
    pub chips: Vec<Chip>,
    pub advisories: Vec<Advisory>,
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("unknown theme: {0}")]
    UnknownTheme(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("font error: {0}")]
    Font(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("render error: {0}")]
    Render(String),
}

impl Error {
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::UnknownTheme(_) | Error::Config(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
