use std::borrow::Cow;

use crate::{
    CardConfig, CardLayout, Chip, CodeImage, FontHandle, FontSet, FontStyle, Rgb, TextBlock,
    TextMeasure, Theme,
};

/// A text block anchored at the top-left of its first line.
pub(crate) struct PlacedText<'a> {
    pub(crate) block: &'a TextBlock,
    pub(crate) style: FontStyle,
    pub(crate) fill: Rgb,
    pub(crate) x: f32,
    pub(crate) y: f32,
}

pub(crate) struct FunFactLabel<'a> {
    pub(crate) text: &'a str,
    /// Horizontal offset of the first wrapped line.
    pub(crate) indent: f32,
}

pub(crate) struct CardScene<'a> {
    pub(crate) config: &'a CardConfig,
    pub(crate) fonts: &'a FontSet,
    pub(crate) theme: &'a Theme,
    pub(crate) layout: &'a CardLayout,
    pub(crate) title: PlacedText<'a>,
    pub(crate) body: PlacedText<'a>,
    pub(crate) fun_fact: PlacedText<'a>,
    pub(crate) fun_fact_label: Option<FunFactLabel<'a>>,
    pub(crate) chips: &'a [Chip],
    pub(crate) code: &'a CodeImage,
}

pub(crate) fn build_card_svg(scene: &CardScene<'_>) -> String {
    let layout = scene.layout;
    let theme = scene.theme;
    let config = scene.config;
    let width = layout.canvas_width as f32;
    let height = layout.canvas_height as f32;

    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{:.0}" height="{:.0}" viewBox="0 0 {:.0} {:.0}">"#,
        width, height, width, height
    ));

    svg.push_str(&format!(
        r#"<rect x="0" y="0" width="{:.0}" height="{:.0}" fill="{}"/>"#,
        width, height, theme.background
    ));

    let shadow = &config.panel.shadow;
    let mut panel_attrs = String::new();
    if shadow.enabled {
        svg.push_str(&format!(
            r#"<defs><filter id="shadow" filterUnits="userSpaceOnUse" x="0" y="0" width="{:.0}" height="{:.0}">"#,
            width, height
        ));
        svg.push_str(&format!(
            r#"<feGaussianBlur in="SourceAlpha" stdDeviation="{:.2}"/>"#,
            shadow.blur.max(0.0)
        ));
        svg.push_str(&format!(
            r#"<feOffset dx="{:.2}" dy="{:.2}" result="offsetblur"/>"#,
            shadow.x, shadow.y
        ));
        svg.push_str(&format!(
            r##"<feFlood flood-color="#000000" flood-opacity="{:.2}"/>"##,
            shadow.opacity.clamp(0.0, 1.0)
        ));
        svg.push_str(r#"<feComposite in2="offsetblur" operator="in"/>"#);
        svg.push_str(r#"<feMerge><feMergeNode/><feMergeNode in="SourceGraphic"/></feMerge>"#);
        svg.push_str("</filter></defs>");
        panel_attrs.push_str(r#" filter="url(#shadow)""#);
    }
    push_rounded_rect(
        &mut svg,
        layout.panel,
        config.panel.radius,
        theme.panel,
        &panel_attrs,
    );

    push_block(&mut svg, scene.fonts, &scene.title);
    push_block(&mut svg, scene.fonts, &scene.body);
    push_fun_fact(&mut svg, scene);
    push_chips(&mut svg, scene);

    push_rounded_rect(
        &mut svg,
        layout.code,
        config.code.frame_radius,
        config.code.frame_color,
        "",
    );
    let image = layout.code_image;
    svg.push_str(&format!(
        r#"<image x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" preserveAspectRatio="xMidYMid meet" image-rendering="optimizeSpeed" xlink:href="{}"/>"#,
        image.x,
        image.y,
        image.width,
        image.height,
        scene.code.data_uri()
    ));

    svg.push_str("</svg>");
    svg
}

fn push_rounded_rect(svg: &mut String, rect: crate::Rect, radius: f32, fill: Rgb, attrs: &str) {
    let radius = radius.clamp(0.0, rect.width.min(rect.height) / 2.0);
    svg.push_str(&format!(
        r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" rx="{:.2}" ry="{:.2}" fill="{}"{}/>"#,
        rect.x, rect.y, rect.width, rect.height, radius, radius, fill, attrs
    ));
}

fn push_block(svg: &mut String, fonts: &FontSet, placed: &PlacedText<'_>) {
    let font = fonts.get(placed.style);
    for (idx, line) in placed.block.lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        let baseline = baseline_y(font, placed.block, placed.y, idx);
        push_text(
            svg,
            font,
            placed.block.size,
            placed.fill,
            placed.x,
            baseline,
            "start",
            line,
        );
    }
}

fn push_fun_fact(svg: &mut String, scene: &CardScene<'_>) {
    let placed = &scene.fun_fact;
    if placed.block.is_empty() {
        return;
    }
    let Some(label) = &scene.fun_fact_label else {
        push_block(svg, scene.fonts, placed);
        return;
    };

    let font = scene.fonts.get(placed.style);
    let baseline = baseline_y(font, placed.block, placed.y, 0);
    push_text(
        svg,
        scene.fonts.get(FontStyle::Italic),
        placed.block.size,
        scene.theme.foreground,
        placed.x,
        baseline,
        "start",
        label.text,
    );
    for (idx, line) in placed.block.lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        let x = if idx == 0 {
            placed.x + label.indent
        } else {
            placed.x
        };
        let baseline = baseline_y(font, placed.block, placed.y, idx);
        push_text(
            svg,
            font,
            placed.block.size,
            placed.fill,
            x,
            baseline,
            "start",
            line,
        );
    }
}

fn push_chips(svg: &mut String, scene: &CardScene<'_>) {
    let footer = &scene.config.footer;
    let font = scene.fonts.get(FontStyle::Regular);
    let metrics = font.line_metrics(footer.size);
    for chip in scene.chips {
        let rect = chip.rect;
        push_rounded_rect(svg, rect, footer.radius, scene.theme.chip, "");
        let baseline = rect.y + (rect.height - metrics.height()) / 2.0 + metrics.ascent;
        push_text(
            svg,
            font,
            footer.size,
            scene.theme.foreground,
            rect.x + rect.width / 2.0,
            baseline,
            "middle",
            &chip.label,
        );
    }
}

fn baseline_y(font: &FontHandle, block: &TextBlock, top: f32, idx: usize) -> f32 {
    let metrics = font.line_metrics(block.size);
    let line_top = top + block.line_height * idx as f32;
    line_top + (block.line_height - metrics.height()) / 2.0 + metrics.ascent
}

#[allow(clippy::too_many_arguments)]
fn push_text(
    svg: &mut String,
    font: &FontHandle,
    size: f32,
    fill: Rgb,
    x: f32,
    y: f32,
    anchor: &str,
    text: &str,
) {
    svg.push_str(&format!(
        r#"<text x="{:.2}" y="{:.2}" fill="{}" font-size="{:.2}px" text-anchor="{}"{} xml:space="preserve">{}</text>"#,
        x,
        y,
        fill,
        size,
        anchor,
        font_attrs(font),
        escape_text(text)
    ));
}

fn font_attrs(font: &FontHandle) -> String {
    format!(
        r#" font-family="{}" font-weight="{}" font-style="{}""#,
        escape_attr(&quote_family(font.family())),
        font.weight(),
        if font.is_italic() { "italic" } else { "normal" }
    )
}

fn quote_family(family: &str) -> String {
    format!("'{}'", family.replace('\'', ""))
}

/// Drops chars XML 1.0 cannot carry, even as references.
pub(crate) fn xml_safe(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|&ch| is_xml_char(ch)).collect())
    }
}

fn is_xml_char(ch: char) -> bool {
    matches!(ch, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..)
}

pub(crate) fn escape_text(text: &str) -> String {
    xml_safe(text)
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub(crate) fn escape_attr(text: &str) -> String {
    escape_text(text).replace('"', "&quot;")
}
