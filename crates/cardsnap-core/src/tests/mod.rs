use super::*;
use crate::fonts::dirs::*;
use crate::png::decode_png_rgba;
use crate::render::display_link;
use chrono::NaiveDate;
use std::sync::{Arc, Mutex, OnceLock};

/// Every char advances half an em; ascent 0.8em, descent 0.2em.
struct FixedAdvance;

impl TextMeasure for FixedAdvance {
    fn advance_width(&self, text: &str, size: f32) -> f32 {
        text.chars().count() as f32 * size * 0.5
    }

    fn line_metrics(&self, size: f32) -> LineMetrics {
        LineMetrics {
            ascent: size * 0.8,
            descent: size * 0.2,
        }
    }
}

const VI_TITLE: &str = "Ngày Bánh Crepe Toàn Cầu 4/11";
const VI_BODY: &str = "Mỗi năm vào ngày 4 tháng 11, người yêu ẩm thực khắp thế giới cùng nhau thưởng thức bánh crepe. Hãy thử tự làm một chiếc tại nhà!";
const VI_FUN_FACT: &str = "Crepe có nguồn gốc từ vùng Bretagne, Pháp.";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn code_image() -> CodeImage {
    let modules: Vec<Vec<bool>> = (0..21)
        .map(|y| (0..21).map(|x| (x + y) % 2 == 0).collect())
        .collect();
    CodeImage::from_modules(&modules, 4).expect("code image")
}

fn embedded_fonts() -> FontSet {
    FontSet::embedded().expect("embedded fonts")
}

fn renderer_with(config: CardConfig) -> CardRenderer {
    CardRenderer::new(config, embedded_fonts()).expect("renderer")
}

fn vi_request() -> CardRequest {
    CardRequest::new(VI_TITLE, VI_BODY, VI_FUN_FACT, "https://www.example.com/crepe-day/")
}

fn pixel(rgba: &[u8], width: u32, x: u32, y: u32) -> Rgb {
    let idx = ((y * width + x) * 4) as usize;
    Rgb::new(rgba[idx], rgba[idx + 1], rgba[idx + 2])
}

/// Pixels inside `rect` whose colour differs from `ground`.
fn ink_in(rgba: &[u8], width: u32, rect: Rect, ground: Rgb) -> usize {
    let (x0, y0) = (rect.x.ceil() as u32, rect.y.ceil() as u32);
    let (x1, y1) = (rect.right().floor() as u32, rect.bottom().floor() as u32);
    (y0..y1)
        .flat_map(|y| (x0..x1).map(move |x| (x, y)))
        .filter(|&(x, y)| pixel(rgba, width, x, y) != ground)
        .count()
}

fn assert_lines_fit(block: &TextBlock, options: &WrapOptions, size: f32) {
    assert_lines_fit_with(&FixedAdvance, block, options, size);
}

fn assert_lines_fit_with<M: TextMeasure>(
    font: &M,
    block: &TextBlock,
    options: &WrapOptions,
    size: f32,
) {
    for (idx, line) in block.lines.iter().enumerate() {
        let width = font.advance_width(line, size);
        assert!(
            width <= options.limit(idx),
            "line {idx} {line:?} is {width}px, limit {}",
            options.limit(idx)
        );
    }
}

fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

#[test]
fn rgb_parses_hex_forms() {
    assert_eq!("#0F3D56".parse::<Rgb>().expect("rgb"), Rgb::new(0x0F, 0x3D, 0x56));
    assert_eq!("fff".parse::<Rgb>().expect("rgb"), Rgb::WHITE);
    assert_eq!(Rgb::from_u32(0x123456).to_hex(), "#123456");
    assert!("#12345".parse::<Rgb>().is_err());
    assert!("#+12345".parse::<Rgb>().is_err());
    assert!("zzzzzz".parse::<Rgb>().is_err());
}

#[test]
fn config_deserializes_partial_json() {
    let cfg: CardConfig = serde_json::from_str(
        r##"{"canvas":"square","code":{"frame_color":"#000"},"output":{"format":"webp"}}"##,
    )
    .expect("parse config");
    assert_eq!(cfg.canvas, CanvasSize::Square);
    assert_eq!(cfg.code.frame_color, Rgb::BLACK);
    assert_eq!(cfg.code.size, CodeOptions::default().size);
    assert_eq!(cfg.output.format, OutputFormat::Webp);
    assert_eq!(cfg.title.max_lines, 3);

    let bad = serde_json::from_str::<CardConfig>(r#"{"code":{"frame_color":"white"}}"#);
    assert!(bad.is_err());
}

#[test]
fn explicit_theme_is_returned() {
    let theme = select_theme(Some("Ocean"), date(2024, 11, 4)).expect("theme");
    assert_eq!(theme.id, ThemeId::Ocean);
    assert_eq!(theme, ThemeId::Ocean.theme());
}

#[test]
fn unknown_theme_is_configuration_error() {
    let err = select_theme(Some("neon"), date(2024, 11, 4)).expect_err("unknown");
    assert!(matches!(err, Error::UnknownTheme(ref name) if name == "neon"));
    assert!(err.is_configuration());
}

#[test]
fn date_theme_is_stable_within_a_day_and_rotates() {
    let day = date(2024, 11, 4);
    let first = select_theme(None, day).expect("theme");
    let second = select_theme(None, day).expect("theme");
    assert_eq!(first, second);

    let mut seen = std::collections::HashSet::new();
    for offset in 0..ThemeId::ALL.len() as u64 {
        let day = day + chrono::Days::new(offset);
        seen.insert(select_theme(None, day).expect("theme").id);
    }
    assert_eq!(seen.len(), ThemeId::ALL.len());
}

#[test]
fn wrap_greedy_words() {
    let options = WrapOptions::new(52.0, 1.0);
    let block = wrap(
        "one two three four five six seven eight nine ten",
        &FixedAdvance,
        10.0,
        options,
    );
    assert_eq!(
        block.lines,
        vec!["one two", "three four", "five six", "seven", "eight nine", "ten"]
    );
    assert_eq!(block.line_height, 10.0);
    assert_eq!(block.total_height, 60.0);
    assert!(!block.truncated);
    assert_lines_fit(&block, &options, 10.0);
}

#[test]
fn wrap_line_height_is_rounded() {
    let block = wrap("a", &FixedAdvance, 33.0, WrapOptions::new(100.0, 1.15));
    assert_eq!(block.line_height, (33.0f32 * 1.15).round());
    assert_eq!(block.total_height, block.line_height);
}

#[test]
fn wrap_newline_forces_break() {
    let block = wrap("ab\ncd ef\r\ngh", &FixedAdvance, 10.0, WrapOptions::new(500.0, 1.0));
    assert_eq!(block.lines, vec!["ab", "cd ef", "gh"]);
}

#[test]
fn wrap_empty_text_has_no_lines() {
    let block = wrap("  \n ", &FixedAdvance, 10.0, WrapOptions::new(100.0, 1.0).max_lines(2));
    assert!(block.is_empty());
    assert_eq!(block.total_height, 0.0);
    assert!(!block.truncated);
}

#[test]
fn wrap_hyphenates_long_word() {
    let word = "a".repeat(200);
    let options = WrapOptions::new(52.0, 1.0);
    let block = wrap(&word, &FixedAdvance, 10.0, options);
    assert_eq!(block.lines.len(), 23);
    let (last, pieces) = block.lines.split_last().expect("lines");
    assert!(pieces.iter().all(|line| line.ends_with('-')));
    assert!(!last.ends_with('-'));
    let joined: String = block.lines.iter().map(|line| line.trim_end_matches('-')).collect();
    assert_eq!(joined, word);
    assert_lines_fit(&block, &options, 10.0);
}

#[test]
fn wrap_never_overflows() {
    let inputs = [
        "短い文章と長い文章が混在するテキストを折り返すテスト".to_string(),
        "x".repeat(500),
        format!("start {} end", "é".repeat(90)),
        VI_BODY.to_string(),
        "a b c d e f g h i j k l m n o p".to_string(),
    ];
    for input in &inputs {
        for width in [7.0, 23.0, 52.0, 180.0, 600.0] {
            for indent in [0.0, 15.0] {
                let options = WrapOptions::new(width, 1.2).first_line_indent(indent);
                let block = wrap(input, &FixedAdvance, 10.0, options);
                assert!(!block.is_empty());
                assert_lines_fit(&block, &options, 10.0);
            }
        }
    }
}

#[test]
fn bounded_wrap_ellipsizes_last_line() {
    let block = wrap(
        "one two three four five six seven eight nine ten",
        &FixedAdvance,
        10.0,
        WrapOptions::new(52.0, 1.0).max_lines(3),
    );
    assert_eq!(block.lines, vec!["one two", "three four", "five six…"]);
    assert!(block.truncated);
}

#[test]
fn bounded_wrap_respects_line_count_for_any_input() {
    let inputs = ["z".repeat(200), VI_BODY.to_string(), "tiny".to_string()];
    for input in &inputs {
        for max_lines in 1..5 {
            let options = WrapOptions::new(52.0, 1.0).max_lines(max_lines);
            let block = wrap(input, &FixedAdvance, 10.0, options);
            assert!(block.lines.len() <= max_lines);
            let ends_with_ellipsis = block
                .lines
                .last()
                .map(|line| line.ends_with(ELLIPSIS))
                .unwrap_or(false);
            assert_eq!(ends_with_ellipsis, block.truncated, "{input:?} @ {max_lines}");
            assert_lines_fit(&block, &options, 10.0);
        }
    }
}

#[test]
fn bounded_wrap_single_long_word() {
    let block = wrap(
        &"a".repeat(200),
        &FixedAdvance,
        10.0,
        WrapOptions::new(52.0, 1.0).max_lines(1),
    );
    assert_eq!(block.lines, vec![format!("{}…", "a".repeat(9))]);
    assert!(block.truncated);
}

#[test]
fn bounded_wrap_zero_lines() {
    let block = wrap("hello", &FixedAdvance, 10.0, WrapOptions::new(52.0, 1.0).max_lines(0));
    assert!(block.is_empty());
    assert!(block.truncated);
}

#[test]
fn first_line_indent_narrows_first_line() {
    let options = WrapOptions::new(52.0, 1.0).first_line_indent(30.0);
    let block = wrap("abc defgh ij", &FixedAdvance, 10.0, options);
    assert_eq!(block.lines, vec!["abc", "defgh ij"]);

    let block = wrap("abcdefgh ij", &FixedAdvance, 10.0, options);
    assert_eq!(block.lines, vec!["", "abcdefgh", "ij"]);
}

fn fit_params(max_lines: usize) -> FitParams {
    FitParams {
        start_size: 40.0,
        min_size: 20.0,
        step: 4.0,
        max_width: 200.0,
        max_lines,
        line_height: 1.1,
    }
}

#[test]
fn fit_title_shrinks_until_it_fits() {
    let params = fit_params(2);
    let outcome = fit_title("alpha beta gamma delta epsilon zeta", &FixedAdvance, params)
        .expect("fit");
    assert_eq!(outcome.size, 20.0);
    assert_eq!(outcome.block.lines, vec!["alpha beta gamma", "delta epsilon zeta"]);
    assert!(!outcome.overflowed);
    assert_eq!(outcome.iterations, params.max_iterations());
}

#[test]
fn fit_title_keeps_start_size_when_short() {
    let outcome = fit_title("Hi", &FixedAdvance, fit_params(2)).expect("fit");
    assert_eq!(outcome.size, 40.0);
    assert_eq!(outcome.iterations, 1);
}

#[test]
fn fit_title_accepts_overflow_at_floor() {
    let outcome = fit_title("alpha beta gamma delta epsilon zeta", &FixedAdvance, fit_params(1))
        .expect("fit");
    assert_eq!(outcome.size, 20.0);
    assert!(outcome.overflowed);
    assert_eq!(outcome.block.lines.len(), 2);
    assert!(outcome.block.lines.iter().all(|line| !line.ends_with(ELLIPSIS)));
}

#[test]
fn fit_title_terminates_within_bound() {
    let text = "The quick brown fox jumps over the lazy dog again and again and again";
    for (start, min, step) in [(50.0, 21.0, 7.0), (76.0, 44.0, 4.0), (30.0, 30.0, 1.0), (90.0, 10.0, 0.5)] {
        let params = FitParams {
            start_size: start,
            min_size: min,
            step,
            max_width: 120.0,
            max_lines: 1,
            line_height: 1.0,
        };
        let outcome = fit_title(text, &FixedAdvance, params).expect("fit");
        assert!(outcome.iterations <= params.max_iterations());
        assert!(outcome.size >= min);
    }
}

#[test]
fn fit_title_rejects_bad_params() {
    let mut params = fit_params(2);
    params.step = 0.0;
    let err = fit_title("x", &FixedAdvance, params).expect_err("zero step");
    assert!(err.is_configuration());

    let mut params = fit_params(2);
    params.min_size = 50.0;
    assert!(fit_title("x", &FixedAdvance, params).is_err());
}

#[test]
fn plan_portrait_geometry() {
    let layout = plan(&CardConfig::default()).expect("plan");
    assert_eq!((layout.canvas_width, layout.canvas_height), (1080, 1350));
    assert_eq!(layout.panel, Rect::new(48.0, 48.0, 984.0, 1254.0));
    assert_eq!(layout.code.right(), 968.0);
    assert_eq!(layout.code.bottom(), 1238.0);
    assert_eq!(layout.code.width, 224.0);
    assert_eq!(layout.code_image, Rect::new(756.0, 1026.0, 200.0, 200.0));
    assert_eq!(layout.content_width(), 600.0);
    assert_eq!(layout.footer.bottom(), 1238.0);
}

#[test]
fn plan_zones_never_overlap_code_square() {
    for canvas in [CanvasSize::Portrait, CanvasSize::Square] {
        let config = CardConfig {
            canvas,
            ..CardConfig::default()
        };
        let layout = plan(&config).expect("plan");
        assert!(layout.panel.contains(&layout.code));
        assert!(layout.code.contains(&layout.code_image));
        for (name, zone) in layout.text_zones() {
            assert!(zone.width > 0.0 && zone.height > 0.0, "{name} empty");
            assert!(layout.panel.contains(&zone), "{name} outside panel");
            assert!(!zone.intersects(&layout.code), "{name} overlaps code on {canvas:?}");
        }
        let zones = layout.text_zones();
        for (idx, (a_name, a)) in zones.iter().enumerate() {
            for (b_name, b) in zones.iter().skip(idx + 1) {
                assert!(!a.intersects(b), "{a_name} overlaps {b_name}");
            }
        }
    }
}

#[test]
fn plan_rejects_code_square_wider_than_panel() {
    let mut config = CardConfig::default();
    config.code.size = 900.0;
    let err = plan(&config).expect_err("no room");
    assert!(err.is_configuration());
    assert!(err.to_string().contains("inner content width"));
}

#[test]
fn plan_rejects_missing_body_room() {
    let mut config = CardConfig {
        canvas: CanvasSize::Square,
        ..CardConfig::default()
    };
    config.title.zone_height = 600.0;
    assert!(matches!(plan(&config), Err(Error::Config(_))));
}

#[test]
fn chips_flow_left_to_right_without_wrapping() {
    let footer = Rect::new(0.0, 0.0, 100.0, 40.0);
    let metrics = ChipMetrics {
        size: 10.0,
        padding_x: 10.0,
        padding_y: 5.0,
        gap: 5.0,
    };
    let labels = vec!["abcd".to_string(), "efgh".to_string(), "ij".to_string()];
    let chips = layout_chips(&labels, &FixedAdvance, metrics, footer);
    assert_eq!(chips.len(), 2);
    assert_eq!(chips[0].rect, Rect::new(0.0, 10.0, 40.0, 20.0));
    assert_eq!(chips[1].rect, Rect::new(45.0, 10.0, 40.0, 20.0));
    assert!(chips.iter().all(|chip| chip.rect.right() <= footer.right()));
}

#[test]
fn chips_truncate_single_wide_label() {
    let footer = Rect::new(0.0, 0.0, 100.0, 40.0);
    let metrics = ChipMetrics {
        size: 10.0,
        padding_x: 10.0,
        padding_y: 5.0,
        gap: 5.0,
    };
    let labels = vec!["a very long label here".to_string()];
    let chips = layout_chips(&labels, &FixedAdvance, metrics, footer);
    assert_eq!(chips.len(), 1);
    assert_eq!(chips[0].label, "a very long…");
    assert!(chips[0].rect.right() <= footer.right());
}

#[test]
fn display_link_strips_scheme_and_www() {
    assert_eq!(display_link("https://www.example.com/crepe/"), "example.com/crepe");
    assert_eq!(display_link("http://t.me/bot"), "t.me/bot");
    assert_eq!(display_link("  "), "");
}

#[test]
fn code_image_rejects_non_png() {
    let err = CodeImage::from_png(b"not a png".to_vec()).expect_err("invalid");
    assert!(matches!(err, Error::InvalidInput(_)));
    assert!(CodeImage::from_modules(&[vec![true], vec![false]], 2).is_err());
}

#[test]
fn code_image_from_modules_rejects_oversized_grid() {
    let err = CodeImage::from_modules(&[vec![true]], u32::MAX).expect_err("overflow");
    assert!(matches!(err, Error::InvalidInput(_)));

    let modules = vec![vec![false; 3]; 3];
    let err = CodeImage::from_modules(&modules, u32::MAX / 2).expect_err("overflow");
    assert!(matches!(err, Error::InvalidInput(_)));
    assert!(CodeImage::from_modules(&modules, 2000).is_err());
    assert!(CodeImage::from_modules(&modules, 1000).is_ok());
}

#[test]
fn code_image_from_modules_roundtrips_dimensions() {
    let code = code_image();
    assert_eq!((code.width(), code.height()), (84, 84));
    let (rgba, width, _) = decode_png_rgba(code.png_bytes()).expect("decode");
    assert_eq!(pixel(&rgba, width, 0, 0), Rgb::BLACK);
    assert_eq!(pixel(&rgba, width, 4, 0), Rgb::WHITE);
}

#[test]
fn font_handle_rejects_garbage() {
    let err = FontHandle::from_bytes(vec![0, 1, 2, 3]).expect_err("garbage");
    assert!(matches!(err, Error::Font(_)));
}

#[test]
fn embedded_faces_report_family_and_style() {
    let fonts = embedded_fonts();
    for style in [FontStyle::Regular, FontStyle::Bold, FontStyle::Italic] {
        let handle = fonts.get(style);
        assert!(handle.is_embedded());
        assert_eq!(handle.family(), "DejaVu Sans");
    }
    assert_eq!(fonts.regular.weight(), 400);
    assert_eq!(fonts.bold.weight(), 700);
    assert!(fonts.italic.is_italic());
    assert!(!fonts.regular.is_italic());
}

#[test]
fn font_handle_measures_from_glyph_advances() {
    let bytes = std::fs::read(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/assets/fonts/DejaVuSans.ttf"
    ))
    .expect("read font");
    let handle = FontHandle::from_bytes(bytes).expect("parse");
    assert!(!handle.is_embedded());
    assert_eq!(handle.family(), "DejaVu Sans");

    assert_eq!(handle.advance_width("", 40.0), 0.0);
    let narrow = handle.advance_width("iiii", 40.0);
    let wide = handle.advance_width("WWWW", 40.0);
    assert!(narrow > 0.0 && narrow < wide);
    assert_eq!(handle.advance_width("ab", 40.0), handle.advance_width("ab", 20.0) * 2.0);
    let ab = handle.advance_width("a", 30.0) + handle.advance_width("b", 30.0);
    assert!((handle.advance_width("ab", 30.0) - ab).abs() < 1e-3);

    let metrics = handle.line_metrics(100.0);
    assert!(metrics.ascent > 80.0 && metrics.ascent < 100.0);
    assert!(metrics.descent > 10.0 && metrics.descent < 40.0);

    // no CJK glyphs in this face: each wide char measures as two notdef boxes
    let cjk = handle.advance_width("文", 40.0);
    assert!(cjk > 0.0);
    assert_eq!(handle.advance_width("文文", 40.0), cjk * 2.0);
}

#[test]
fn wrap_never_overflows_with_real_faces() {
    let fonts = embedded_fonts();
    let inputs = [
        VI_BODY.to_string(),
        VI_TITLE.to_string(),
        "短い文章と長い文章が混在するテキストを折り返すテスト".to_string(),
        "W".repeat(120),
        format!("start {} end", "ễ".repeat(90)),
        "Fish & <Chips> with tabs\tand\nnewlines".to_string(),
    ];
    for style in [FontStyle::Regular, FontStyle::Bold, FontStyle::Italic] {
        let font = fonts.get(style);
        for input in &inputs {
            for size in [24.0, 38.0, 76.0] {
                for width in [160.0, 333.0, 600.0] {
                    for indent in [0.0, 40.0] {
                        let options = WrapOptions::new(width, 1.3).first_line_indent(indent);
                        let block = wrap(input, font, size, options);
                        assert!(!block.is_empty());
                        assert_lines_fit_with(font, &block, &options, size);

                        let bounded = wrap(input, font, size, options.max_lines(2));
                        assert!(bounded.lines.len() <= 2);
                        assert_lines_fit_with(font, &bounded, &options, size);
                    }
                }
            }
        }
    }
}

#[test]
fn resolver_falls_back_and_reports() {
    let dir = std::env::temp_dir().join("cardsnap-missing-fonts");
    let resolver = FontResolver::new(vec![dir], false);
    let config = FontConfig {
        regular: vec!["Missing-Regular.ttf".to_string()],
        bold: Vec::new(),
        italic: vec!["/nonexistent/Missing-Italic.ttf".to_string()],
        dirs: Vec::new(),
        system_fallback: false,
    };
    let fonts = resolver.resolve(&config).expect("resolve");
    assert!(fonts.regular.is_embedded());
    assert!(fonts.bold.is_embedded());
    assert!(fonts.italic.is_embedded());
    assert!(fonts.italic.is_italic());
    assert_eq!(fonts.bold.weight(), 700);
    assert_eq!(fonts.advisories().len(), 2);
    assert!(matches!(
        &fonts.advisories()[0],
        Advisory::FontFallback { style: FontStyle::Regular, substituted, .. }
            if substituted == "DejaVu Sans (embedded)"
    ));
}

#[test]
fn fallback_fonts_still_draw_text() {
    let _lock = env_lock().lock().expect("lock");
    let mut config = CardConfig::default();
    config.panel.shadow.enabled = false;
    config.fonts = FontConfig {
        regular: vec!["/nonexistent/Missing-Regular.ttf".to_string()],
        bold: vec!["/nonexistent/Missing-Bold.ttf".to_string()],
        italic: Vec::new(),
        dirs: vec![std::env::temp_dir().display().to_string()],
        system_fallback: false,
    };
    let renderer = CardRenderer::from_config(config).expect("renderer");
    assert_eq!(renderer.fonts().advisories().len(), 2);
    let result = renderer
        .render_on(&vi_request().with_theme("ocean"), date(2024, 11, 4), &code_image())
        .expect("render");
    let (rgba, width, _) = decode_png_rgba(&result.bytes).expect("decode");
    let panel = ThemeId::Ocean.theme().panel;
    assert!(ink_in(&rgba, width, result.layout.title, panel) > 500);
}

#[test]
fn font_dirs_env_overrides_config() {
    let _lock = env_lock().lock().expect("lock");
    let prev = std::env::var("CARDSNAP_FONT_DIRS").ok();
    std::env::set_var("CARDSNAP_FONT_DIRS", "/a, ,/b");
    let config = FontConfig {
        dirs: vec!["/c".to_string()],
        ..FontConfig::default()
    };
    let dirs = resolve_font_dirs(&config).expect("dirs");
    match prev {
        Some(value) => std::env::set_var("CARDSNAP_FONT_DIRS", value),
        None => std::env::remove_var("CARDSNAP_FONT_DIRS"),
    }
    assert_eq!(
        dirs,
        vec![std::path::PathBuf::from("/a"), std::path::PathBuf::from("/b")]
    );
}

#[test]
fn default_font_dir_uses_cardsnap_home() {
    let _lock = env_lock().lock().expect("lock");
    let prev = std::env::var("CARDSNAP_HOME").ok();
    std::env::set_var("CARDSNAP_HOME", "/tmp/cardsnap-home");
    let dir = default_font_dir().expect("dir");
    match prev {
        Some(value) => std::env::set_var("CARDSNAP_HOME", value),
        None => std::env::remove_var("CARDSNAP_HOME"),
    }
    assert_eq!(dir, std::path::PathBuf::from("/tmp/cardsnap-home/fonts"));
}

#[test]
fn render_vietnamese_scenario() {
    let renderer = renderer_with(CardConfig::default());
    let result = renderer
        .render_on(&vi_request(), date(2024, 11, 4), &code_image())
        .expect("render");
    assert!(result.bytes.starts_with(b"\x89PNG"));
    assert!(result.title_size >= CardConfig::default().title.min_size);
    assert!(result.advisories.is_empty());

    let config = renderer.config();
    let fit = fit_title(
        VI_TITLE,
        &renderer.fonts().bold,
        FitParams {
            start_size: config.title.size,
            min_size: config.title.min_size,
            step: config.title.step,
            max_width: result.layout.title.width,
            max_lines: config.title.max_lines,
            line_height: config.title.line_height,
        },
    )
    .expect("fit");
    assert!(fit.block.lines.len() <= 3);
    assert_eq!(fit.size, result.title_size);

    let body = wrap(
        VI_BODY,
        &renderer.fonts().regular,
        config.body.size,
        WrapOptions::new(result.layout.body.width, config.body.line_height),
    );
    assert!(body.lines.len() > 1);
    for line in &body.lines {
        assert!(renderer.fonts().regular.advance_width(line, config.body.size) <= result.layout.body.width);
    }

    assert_eq!(result.layout.code.right(), result.layout.panel.right() - config.inner_padding);
    assert_eq!(result.chips[0].label, "example.com/crepe-day");
}

#[test]
fn render_draws_background_panel_and_code_frame() {
    let mut config = CardConfig::default();
    config.panel.shadow.enabled = false;
    let renderer = renderer_with(config);
    let request = vi_request().with_theme("ocean");
    let result = renderer
        .render_on(&request, date(2024, 11, 4), &code_image())
        .expect("render");
    let (rgba, width, height) = decode_png_rgba(&result.bytes).expect("decode");
    assert_eq!((width, height), (1080, 1350));

    let theme = ThemeId::Ocean.theme();
    assert_eq!(pixel(&rgba, width, 2, 2), theme.background);
    assert_eq!(pixel(&rgba, width, 60, 675), theme.panel);

    let code = result.layout.code;
    let frame_x = (code.x + 3.0) as u32;
    let frame_y = (code.y + code.height / 2.0) as u32;
    assert_eq!(pixel(&rgba, width, frame_x, frame_y), Rgb::WHITE);

    let chip = result.chips[0].rect;
    let chip_x = (chip.x + chip.width / 2.0) as u32;
    let chip_y = (chip.y + 3.0) as u32;
    assert_eq!(pixel(&rgba, width, chip_x, chip_y), theme.chip);
}

#[test]
fn render_square_canvas() {
    let renderer = renderer_with(CardConfig {
        canvas: CanvasSize::Square,
        ..CardConfig::default()
    });
    let result = renderer
        .render_on(&vi_request(), date(2024, 11, 4), &code_image())
        .expect("render");
    let (_, width, height) = decode_png_rgba(&result.bytes).expect("decode");
    assert_eq!((width, height), (1080, 1080));
}

#[test]
fn render_unknown_theme_fails_before_drawing() {
    let renderer = renderer_with(CardConfig::default());
    let err = renderer
        .render_on(&vi_request().with_theme("neon"), date(2024, 11, 4), &code_image())
        .expect_err("unknown theme");
    assert!(err.is_configuration());
}

#[test]
fn render_is_deterministic() {
    let request = vi_request();
    let day = date(2024, 11, 4);
    let first = renderer_with(CardConfig::default())
        .render_on(&request, day, &code_image())
        .expect("render");
    let second = renderer_with(CardConfig::default())
        .render_on(&request, day, &code_image())
        .expect("render");
    assert_eq!(first.theme, second.theme);
    assert_eq!(first.bytes, second.bytes);
}

#[test]
fn render_concurrently_from_shared_renderer() {
    let renderer = Arc::new(renderer_with(CardConfig::default()));
    let code = code_image();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let renderer = Arc::clone(&renderer);
            let code = code.clone();
            std::thread::spawn(move || {
                renderer
                    .render_on(&vi_request(), date(2025, 1, 1), &code)
                    .expect("render")
                    .bytes
            })
        })
        .collect();
    let outputs: Vec<Vec<u8>> = handles
        .into_iter()
        .map(|handle| handle.join().expect("join"))
        .collect();
    assert!(outputs.windows(2).all(|pair| pair[0] == pair[1]));
}

#[test]
fn render_long_fun_fact_word_does_not_overflow() {
    let renderer = renderer_with(CardConfig::default());
    let request = CardRequest::new(VI_TITLE, VI_BODY, "w".repeat(200), "https://example.com");
    let result = renderer
        .render_on(&request, date(2024, 11, 4), &code_image())
        .expect("render");
    assert!(result.bytes.starts_with(b"\x89PNG"));

    let config = renderer.config();
    let block = wrap(
        &request.fun_fact,
        &renderer.fonts().regular,
        config.fun_fact.size,
        WrapOptions::new(result.layout.fun_fact.width, config.fun_fact.line_height),
    );
    assert!(block.lines.len() > 1);
    assert!(block.lines[0].ends_with('-'));
}

#[test]
fn render_reports_title_overflow() {
    let renderer = renderer_with(CardConfig::default());
    let title = "word ".repeat(60);
    let request = CardRequest::new(title, "body", "fact", "https://example.com");
    let result = renderer
        .render_on(&request, date(2024, 11, 4), &code_image())
        .expect("render");
    assert_eq!(result.title_size, CardConfig::default().title.min_size);
    assert!(result
        .advisories
        .iter()
        .any(|advisory| matches!(advisory, Advisory::TitleOverflow { max_lines: 3, .. })));
}

#[test]
fn render_svg_contains_escaped_text_and_label() {
    let mut config = CardConfig::default();
    config.output.format = OutputFormat::Svg;
    let renderer = renderer_with(config);
    let request = CardRequest::new("Fish & <Chips>", "body", "fact", "https://example.com")
        .with_theme("plum");
    let result = renderer
        .render_on(&request, date(2024, 11, 4), &code_image())
        .expect("render");
    let svg = String::from_utf8(result.bytes).expect("utf8");
    assert!(svg.contains("Fish &amp;"));
    assert!(svg.contains("&lt;Chips&gt;"));
    assert!(svg.contains("font-family=\"'DejaVu Sans'\""));
    assert!(svg.contains(r#"font-style="italic""#));
    assert!(svg.contains("Fun fact:"));
    assert!(svg.contains("filter=\"url(#shadow)\""));
    assert!(svg.contains("data:image/png;base64,"));
    assert!(svg.contains(&ThemeId::Plum.theme().background.to_hex()));
}

#[test]
fn render_webp_output() {
    let mut config = CardConfig::default();
    config.output.format = OutputFormat::Webp;
    let renderer = renderer_with(config);
    let result = renderer
        .render_on(&vi_request(), date(2024, 11, 4), &code_image())
        .expect("render");
    assert_eq!(result.format, OutputFormat::Webp);
    assert_eq!(&result.bytes[0..4], b"RIFF");
    assert_eq!(&result.bytes[8..12], b"WEBP");
}

#[test]
fn renderer_rejects_bad_geometry() {
    let mut config = CardConfig::default();
    config.code.size = 2000.0;
    let err = CardRenderer::new(config, embedded_fonts()).expect_err("geometry");
    assert!(err.is_configuration());

    let mut config = CardConfig::default();
    config.body.size = 0.0;
    assert!(CardRenderer::new(config, embedded_fonts()).is_err());
}

#[test]
fn render_draws_text_in_each_zone_and_nothing_beside_code() {
    let mut config = CardConfig::default();
    config.panel.shadow.enabled = false;
    let renderer = renderer_with(config);
    let result = renderer
        .render_on(&vi_request().with_theme("ocean"), date(2024, 11, 4), &code_image())
        .expect("render");
    let (rgba, width, _) = decode_png_rgba(&result.bytes).expect("decode");
    let theme = ThemeId::Ocean.theme();
    let layout = result.layout;

    for (name, zone) in [
        ("title", layout.title),
        ("body", layout.body),
        ("fun_fact", layout.fun_fact),
    ] {
        let ink = ink_in(&rgba, width, zone, theme.panel);
        assert!(ink > 200, "{name} zone has {ink} inked pixels");
    }

    let radius = renderer.config().panel.radius;
    let beside_code = Rect::new(
        layout.code.x,
        layout.panel.y + radius,
        layout.panel.right() - layout.code.x,
        layout.code.y - layout.panel.y - radius,
    );
    assert_eq!(ink_in(&rgba, width, beside_code, theme.panel), 0);
}

#[test]
fn render_reports_zones_as_drawn() {
    let renderer = renderer_with(CardConfig::default());
    let config = renderer.config();
    let title = "Một hai ba bốn năm sáu bảy tám chín mười mười một mười hai";
    let request = CardRequest::new(title, VI_BODY, VI_FUN_FACT, "https://example.com");
    let result = renderer
        .render_on(&request, date(2024, 11, 4), &code_image())
        .expect("render");
    let layout = result.layout;

    let fit = fit_title(
        title,
        &renderer.fonts().bold,
        FitParams {
            start_size: config.title.size,
            min_size: config.title.min_size,
            step: config.title.step,
            max_width: layout.title.width,
            max_lines: config.title.max_lines,
            line_height: config.title.line_height,
        },
    )
    .expect("fit");
    assert!(fit.block.lines.len() > 1);
    assert_eq!(layout.title.y, renderer.layout().title.y);
    assert_eq!(layout.title.height, fit.block.total_height);
    assert_eq!(layout.body.y, layout.title.bottom() + config.zone_gap);
    assert_eq!(layout.body.bottom(), layout.fun_fact.y - config.zone_gap);
    assert!(!layout.title.intersects(&layout.body));
    assert!(!layout.body.intersects(&layout.fun_fact));
}

#[test]
fn escape_text_drops_non_xml_chars() {
    use crate::svg::{escape_attr, escape_text, xml_safe};
    assert_eq!(escape_text("a\u{1}<b\u{8}>\u{FFFE}"), "a&lt;b&gt;");
    assert_eq!(escape_attr("\"x\u{B}\""), "&quot;x&quot;");
    assert_eq!(xml_safe("tab\tline\nok ễ 文"), "tab\tline\nok ễ 文");
    assert!(matches!(xml_safe("plain"), std::borrow::Cow::Borrowed(_)));
}

#[test]
fn render_strips_chars_xml_cannot_carry() {
    let mut config = CardConfig::default();
    config.output.format = OutputFormat::Svg;
    config.footer.chips = vec!["#tag\u{B}".to_string()];
    let renderer = renderer_with(config);
    let request = CardRequest::new(
        "Hello\u{1}world",
        "tab\tstays\u{C}",
        "fact\u{FFFE}",
        "https://example.com",
    );
    let result = renderer
        .render_on(&request, date(2024, 11, 4), &code_image())
        .expect("render");
    let svg = String::from_utf8(result.bytes).expect("utf8");
    assert!(svg.contains(">Helloworld<"));
    assert!(svg.contains(">fact<"));
    assert!(svg.contains(">#tag<"));
    assert!(!svg.contains('\u{1}'));
    assert!(!svg.contains('\u{C}'));

    let png = renderer_with(CardConfig::default())
        .render_on(&request, date(2024, 11, 4), &code_image())
        .expect("render png");
    assert!(png.bytes.starts_with(b"\x89PNG"));
}
