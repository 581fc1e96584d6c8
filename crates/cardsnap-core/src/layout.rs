use serde::Serialize;

use crate::{wrap, CardConfig, Error, FooterOptions, Result, TextMeasure, WrapOptions};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Positive-area overlap; touching edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CardLayout {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub panel: Rect,
    pub title: Rect,
    pub body: Rect,
    pub fun_fact: Rect,
    pub footer: Rect,
    /// Framed code-square, frame included.
    pub code: Rect,
    /// Where the code raster itself is pasted.
    pub code_image: Rect,
}

impl CardLayout {
    pub fn text_zones(&self) -> [(&'static str, Rect); 4] {
        [
            ("title", self.title),
            ("body", self.body),
            ("fun_fact", self.fun_fact),
            ("footer", self.footer),
        ]
    }

    pub fn content_width(&self) -> f32 {
        self.title.width
    }
}

/// Lays out the zones inside the panel. Text zones share one width that
/// leaves the code-square column free on the right, for every row.
pub fn plan(config: &CardConfig) -> Result<CardLayout> {
    let (canvas_width, canvas_height) = config.canvas.dimensions();
    let outer = config.outer_padding;
    let inner_pad = config.inner_padding;
    let gap = config.zone_gap;
    for (name, value) in [
        ("outer_padding", outer),
        ("inner_padding", inner_pad),
        ("zone_gap", gap),
        ("code.frame_margin", config.code.frame_margin),
        ("code.gap", config.code.gap),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(Error::Config(format!("{name} must be >= 0, got {value}")));
        }
    }
    for (name, value) in [
        ("code.size", config.code.size),
        ("footer.height", config.footer.height),
        ("title.zone_height", config.title.zone_height),
        ("fun_fact.zone_height", config.fun_fact.zone_height),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(Error::Config(format!("{name} must be > 0, got {value}")));
        }
    }

    let panel = Rect::new(
        outer,
        outer,
        canvas_width as f32 - 2.0 * outer,
        canvas_height as f32 - 2.0 * outer,
    );
    let inner = Rect::new(
        panel.x + inner_pad,
        panel.y + inner_pad,
        panel.width - 2.0 * inner_pad,
        panel.height - 2.0 * inner_pad,
    );
    if inner.width <= 0.0 || inner.height <= 0.0 {
        return Err(Error::Config(format!(
            "panel padding leaves no inner area ({:.0}x{:.0})",
            inner.width, inner.height
        )));
    }

    let framed = config.code.size + 2.0 * config.code.frame_margin;
    let gutter = framed + config.code.gap;
    let text_width = inner.width - gutter;
    if text_width <= 0.0 {
        return Err(Error::Config(format!(
            "inner content width is {text_width:.0}px after reserving {gutter:.0}px for the code-square"
        )));
    }
    if framed > inner.height {
        return Err(Error::Config(format!(
            "code-square ({framed:.0}px) is taller than the panel content area"
        )));
    }

    let code = Rect::new(
        inner.right() - framed,
        inner.bottom() - framed,
        framed,
        framed,
    );
    let code_image = Rect::new(
        code.x + config.code.frame_margin,
        code.y + config.code.frame_margin,
        config.code.size,
        config.code.size,
    );

    let footer = Rect::new(
        inner.x,
        inner.bottom() - config.footer.height,
        text_width,
        config.footer.height,
    );
    let fun_fact = Rect::new(
        inner.x,
        footer.y - gap - config.fun_fact.zone_height,
        text_width,
        config.fun_fact.zone_height,
    );
    let title = Rect::new(inner.x, inner.y, text_width, config.title.zone_height);
    let body_y = title.bottom() + gap;
    let body = Rect::new(inner.x, body_y, text_width, fun_fact.y - gap - body_y);
    if body.height <= 0.0 {
        return Err(Error::Config(format!(
            "no vertical room left for the body on a {canvas_width}x{canvas_height} canvas"
        )));
    }

    Ok(CardLayout {
        canvas_width,
        canvas_height,
        panel,
        title,
        body,
        fun_fact,
        footer,
        code,
        code_image,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chip {
    pub label: String,
    pub rect: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChipMetrics {
    pub size: f32,
    pub padding_x: f32,
    pub padding_y: f32,
    pub gap: f32,
}

impl From<&FooterOptions> for ChipMetrics {
    fn from(options: &FooterOptions) -> Self {
        Self {
            size: options.size,
            padding_x: options.padding_x,
            padding_y: options.padding_y,
            gap: options.gap,
        }
    }
}

/// Places chips left to right on one row. A first chip wider than the row is
/// ellipsized; any chip after that which does not fit ends the row.
pub fn layout_chips<M: TextMeasure + ?Sized>(
    labels: &[String],
    font: &M,
    metrics: ChipMetrics,
    footer: Rect,
) -> Vec<Chip> {
    let line = font.line_metrics(metrics.size).height();
    let height = (line + 2.0 * metrics.padding_y).min(footer.height);
    let y = footer.y + (footer.height - height) / 2.0;

    let mut chips = Vec::new();
    let mut cursor = footer.x;
    for label in labels {
        let label = label.trim();
        if label.is_empty() {
            continue;
        }
        let room = footer.right() - cursor - 2.0 * metrics.padding_x;
        if room <= 0.0 {
            break;
        }
        let mut text = label.to_string();
        let mut width = font.advance_width(&text, metrics.size);
        if width > room {
            if !chips.is_empty() {
                break;
            }
            let block = wrap(label, font, metrics.size, WrapOptions::new(room, 1.0).max_lines(1));
            let Some(first) = block.lines.into_iter().next() else {
                break;
            };
            width = font.advance_width(&first, metrics.size);
            if width > room {
                break;
            }
            text = first;
        }
        let rect = Rect::new(cursor, y, width + 2.0 * metrics.padding_x, height);
        cursor = rect.right() + metrics.gap;
        chips.push(Chip { label: text, rect });
    }
    chips
}
