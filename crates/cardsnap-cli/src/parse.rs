use cardsnap_core::OutputFormat;
use chrono::NaiveDate;
use std::error::Error;
use std::path::Path;

pub(crate) fn parse_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

pub(crate) fn parse_date(input: &str) -> Result<NaiveDate, Box<dyn Error>> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|err| format!("invalid date {input:?}: {err}").into())
}

pub(crate) fn format_from_path(path: &Path) -> Option<OutputFormat> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some(OutputFormat::Png),
        "webp" => Some(OutputFormat::Webp),
        "svg" => Some(OutputFormat::Svg),
        _ => None,
    }
}
