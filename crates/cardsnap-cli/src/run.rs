use crate::args::Args;
use crate::config::load_config;
use crate::io::write_output_with_tty;
use crate::parse::{format_from_path, parse_date, parse_list};
use cardsnap_core::{CardConfig, CardRenderer, CardRequest, CodeImage, ThemeId};
use clap::Parser;
use std::error::Error;
use std::fs;

pub(crate) fn run() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    run_with(args, atty::is(atty::Stream::Stdout))
}

pub(crate) fn run_with(args: Args, stdout_is_tty: bool) -> Result<(), Box<dyn Error>> {
    if args.list_themes {
        for id in ThemeId::ALL {
            println!("{id}");
        }
        return Ok(());
    }

    let mut config = load_config(args.config.as_deref())?;
    apply_overrides(&mut config, &args)?;

    let title = args.title.clone().ok_or("missing --title")?;
    let code_path = args.code.as_ref().ok_or("missing --code")?;
    let code_bytes = fs::read(code_path)
        .map_err(|err| format!("unable to read code image {}: {err}", code_path.display()))?;
    let code = CodeImage::from_png(code_bytes)?;

    let mut request = CardRequest::new(title, &args.body, &args.fun_fact, &args.link);
    if let Some(theme) = &args.theme {
        request = request.with_theme(theme);
    }
    let date = match args.date.as_deref() {
        Some(value) => parse_date(value)?,
        None => chrono::Local::now().date_naive(),
    };

    let renderer = CardRenderer::from_config(config)?;
    let result = renderer.render_on(&request, date, &code)?;
    tracing::debug!(
        theme = %result.theme,
        format = ?result.format,
        bytes = result.bytes.len(),
        advisories = result.advisories.len(),
        "card rendered"
    );
    write_output_with_tty(&result, args.output.as_deref(), stdout_is_tty)
}

pub(crate) fn apply_overrides(config: &mut CardConfig, args: &Args) -> Result<(), Box<dyn Error>> {
    if let Some(canvas) = args.canvas {
        config.canvas = canvas.into();
    }
    if let Some(format) = args.format {
        config.output.format = format.into();
    } else if let Some(format) = args.output.as_deref().and_then(format_from_path) {
        config.output.format = format;
    }
    if let Some(chips) = &args.chips {
        config.footer.chips = parse_list(chips);
    }
    if let Some(label) = &args.fun_fact_label {
        config.fun_fact.label = label.clone();
    }
    if let Some(shadow) = args.shadow {
        config.panel.shadow.enabled = shadow;
    }
    if let Some(list) = &args.font_regular {
        config.fonts.regular = parse_list(list);
    }
    if let Some(list) = &args.font_bold {
        config.fonts.bold = parse_list(list);
    }
    if let Some(list) = &args.font_italic {
        config.fonts.italic = parse_list(list);
    }
    if let Some(list) = &args.font_dirs {
        config.fonts.dirs = parse_list(list);
    }
    if let Some(fallback) = args.font_system_fallback {
        config.fonts.system_fallback = fallback;
    }
    if let Some(quality) = args.webp_quality {
        if !(0.0..=100.0).contains(&quality) {
            return Err(format!("webp quality must be within 0-100, got {quality}").into());
        }
        config.output.webp_quality = quality;
    }
    if let Some(optimize) = args.png_opt {
        config.output.png.optimize = optimize;
    }
    if let Some(level) = args.png_level {
        config.output.png.level = level;
    }
    if let Some(strip) = args.png_strip {
        config.output.png.strip = strip.into();
    }
    Ok(())
}
