use chrono::NaiveDate;
use std::sync::Arc;

use crate::png::{pixmap_to_png, pixmap_to_webp};
use crate::svg::{build_card_svg, xml_safe, CardScene, FunFactLabel, PlacedText};
use crate::{
    fit_title, layout_chips, plan, select_theme, wrap, Advisory, CardConfig, CardLayout,
    CardRequest, CodeImage, Error, FitParams, FontResolver, FontSet, FontStyle, OutputFormat,
    RenderResult, Result, TextMeasure, Theme, WrapOptions,
};

/// Renders share cards. Holds only immutable state, so one renderer can
/// serve concurrent calls from many threads.
#[derive(Debug)]
pub struct CardRenderer {
    config: CardConfig,
    fonts: FontSet,
    layout: CardLayout,
    fontdb: Arc<usvg::fontdb::Database>,
}

impl CardRenderer {
    pub fn new(config: CardConfig, fonts: FontSet) -> Result<Self> {
        let layout = plan(&config)?;
        title_fit_params(&config, &layout).validate()?;
        for (name, value) in [
            ("body.size", config.body.size),
            ("body.line_height", config.body.line_height),
            ("fun_fact.size", config.fun_fact.size),
            ("fun_fact.line_height", config.fun_fact.line_height),
            ("footer.size", config.footer.size),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::Config(format!("{name} must be > 0, got {value}")));
            }
        }
        let fontdb = Arc::new(fonts.build_fontdb());
        Ok(Self {
            config,
            fonts,
            layout,
            fontdb,
        })
    }

    /// Resolves the configured font candidates, then builds the renderer.
    pub fn from_config(config: CardConfig) -> Result<Self> {
        let resolver = FontResolver::from_config(&config.fonts)?;
        let fonts = resolver.resolve(&config.fonts)?;
        Self::new(config, fonts)
    }

    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    pub fn fonts(&self) -> &FontSet {
        &self.fonts
    }

    pub fn layout(&self) -> &CardLayout {
        &self.layout
    }

    pub fn render(&self, request: &CardRequest, code: &CodeImage) -> Result<RenderResult> {
        self.render_on(request, chrono::Local::now().date_naive(), code)
    }

    pub fn render_on(
        &self,
        request: &CardRequest,
        date: NaiveDate,
        code: &CodeImage,
    ) -> Result<RenderResult> {
        let theme = select_theme(request.theme.as_deref(), date)?;
        self.render_with_theme(request, &theme, code)
    }

    pub fn render_with_theme(
        &self,
        request: &CardRequest,
        theme: &Theme,
        code: &CodeImage,
    ) -> Result<RenderResult> {
        let config = &self.config;
        let layout = &self.layout;
        let regular = self.fonts.get(FontStyle::Regular);
        let mut advisories = self.fonts.advisories().to_vec();

        let title = xml_safe(&request.title);
        let params = title_fit_params(config, layout);
        let fit = fit_title(&title, self.fonts.get(FontStyle::Bold), params)?;
        tracing::debug!(size = fit.size, lines = fit.block.lines.len(), iterations = fit.iterations, "title fitted");
        if fit.overflowed {
            tracing::warn!(
                size = fit.size,
                lines = fit.block.lines.len(),
                max_lines = params.max_lines,
                "title exceeds its line budget at the minimum size"
            );
            advisories.push(Advisory::TitleOverflow {
                size: fit.size,
                lines: fit.block.lines.len(),
                max_lines: params.max_lines,
            });
        }

        let body_top = if fit.block.is_empty() {
            layout.title.y
        } else {
            layout.title.y + fit.block.total_height + config.zone_gap
        };
        let body_room = (layout.fun_fact.y - config.zone_gap - body_top).max(0.0);
        let body_options = WrapOptions::new(layout.body.width, config.body.line_height);
        let body_lines = lines_within(regular, config.body.size, &body_options, body_room);
        let body = wrap(
            &xml_safe(&request.body),
            regular,
            config.body.size,
            body_options.max_lines(body_lines),
        );

        let label = xml_safe(&config.fun_fact.label);
        let label_text = label.trim();
        let indent = if label_text.is_empty() {
            0.0
        } else {
            self.fonts
                .get(FontStyle::Italic)
                .advance_width(label_text, config.fun_fact.size)
                + regular.advance_width(" ", config.fun_fact.size)
        };
        let fun_fact_options = WrapOptions::new(layout.fun_fact.width, config.fun_fact.line_height)
            .first_line_indent(indent);
        let fun_fact_lines = lines_within(
            regular,
            config.fun_fact.size,
            &fun_fact_options,
            layout.fun_fact.height,
        )
        .max(1);
        let fun_fact = wrap(
            &xml_safe(&request.fun_fact),
            regular,
            config.fun_fact.size,
            fun_fact_options.max_lines(fun_fact_lines),
        );

        let mut labels = Vec::new();
        let link = display_link(&xml_safe(&request.link));
        if !link.is_empty() {
            labels.push(link);
        }
        labels.extend(
            config
                .footer
                .chips
                .iter()
                .map(|chip| xml_safe(chip).into_owned()),
        );
        let chips = layout_chips(&labels, regular, (&config.footer).into(), layout.footer);

        let scene = CardScene {
            config,
            fonts: &self.fonts,
            theme,
            layout,
            title: PlacedText {
                block: &fit.block,
                style: FontStyle::Bold,
                fill: theme.foreground,
                x: layout.title.x,
                y: layout.title.y,
            },
            body: PlacedText {
                block: &body,
                style: FontStyle::Regular,
                fill: theme.foreground,
                x: layout.body.x,
                y: body_top,
            },
            fun_fact: PlacedText {
                block: &fun_fact,
                style: FontStyle::Regular,
                fill: theme.muted,
                x: layout.fun_fact.x,
                y: layout.fun_fact.y,
            },
            fun_fact_label: (!label_text.is_empty()).then_some(FunFactLabel {
                text: label_text,
                indent,
            }),
            chips: &chips,
            code,
        };
        let svg = build_card_svg(&scene);

        let format = config.output.format;
        let bytes = match format {
            OutputFormat::Svg => svg.into_bytes(),
            OutputFormat::Png => pixmap_to_png(&self.rasterize(&svg)?, &config.output.png)?,
            OutputFormat::Webp => {
                pixmap_to_webp(&self.rasterize(&svg)?, config.output.webp_quality)?
            }
        };

        let mut drawn = *layout;
        drawn.title.height = fit.block.total_height;
        drawn.body.y = body_top;
        drawn.body.height = body_room;

        Ok(RenderResult {
            format,
            bytes,
            theme: theme.id,
            title_size: fit.size,
            layout: drawn,
            chips,
            advisories,
        })
    }

    fn rasterize(&self, svg: &str) -> Result<tiny_skia::Pixmap> {
        let mut opt = usvg::Options::default();
        opt.fontdb = Arc::clone(&self.fontdb);
        opt.font_family = self.fonts.regular.family().to_string();
        let tree = usvg::Tree::from_str(svg, &opt)
            .map_err(|err| Error::Render(format!("usvg parse: {err}")))?;

        let (width, height) = (self.layout.canvas_width, self.layout.canvas_height);
        let mut pixmap = tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| Error::Render(format!("invalid pixmap size {width}x{height}")))?;
        resvg::render(
            &tree,
            tiny_skia::Transform::identity(),
            &mut pixmap.as_mut(),
        );
        Ok(pixmap)
    }
}

fn title_fit_params(config: &CardConfig, layout: &CardLayout) -> FitParams {
    FitParams {
        start_size: config.title.size,
        min_size: config.title.min_size,
        step: config.title.step,
        max_width: layout.title.width,
        max_lines: config.title.max_lines,
        line_height: config.title.line_height,
    }
}

fn lines_within<M: TextMeasure + ?Sized>(
    font: &M,
    size: f32,
    options: &WrapOptions,
    room: f32,
) -> usize {
    let line_height = (font.line_metrics(size).height() * options.line_height).round();
    if line_height <= 0.0 {
        return 0;
    }
    (room / line_height).floor().max(0.0) as usize
}

pub(crate) fn display_link(link: &str) -> String {
    let mut out = link.trim();
    for prefix in ["https://", "http://"] {
        if let Some(rest) = out.strip_prefix(prefix) {
            out = rest;
            break;
        }
    }
    out = out.strip_prefix("www.").unwrap_or(out);
    out.trim_end_matches('/').to_string()
}
