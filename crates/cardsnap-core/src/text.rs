use crate::{TextMeasure, ELLIPSIS, HYPHEN};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WrapOptions {
    pub max_width: f32,
    /// Multiplier over ascent + descent.
    pub line_height: f32,
    /// Bounded mode: keep at most this many lines, ellipsizing the last.
    pub max_lines: Option<usize>,
    /// Width taken from the first line only, e.g. by an inline label.
    pub first_line_indent: f32,
}

impl WrapOptions {
    pub fn new(max_width: f32, line_height: f32) -> Self {
        Self {
            max_width,
            line_height,
            max_lines: None,
            first_line_indent: 0.0,
        }
    }

    pub fn max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = Some(max_lines);
        self
    }

    pub fn first_line_indent(mut self, indent: f32) -> Self {
        self.first_line_indent = indent.max(0.0);
        self
    }

    pub fn limit(&self, line_index: usize) -> f32 {
        if line_index == 0 {
            (self.max_width - self.first_line_indent).max(0.0)
        } else {
            self.max_width
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub size: f32,
    pub line_height: f32,
    pub total_height: f32,
    pub truncated: bool,
}

impl TextBlock {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Greedy word wrap measured with `font` at `size`.
///
/// Every returned line measures at most [`WrapOptions::limit`] for its index,
/// unless a single glyph is wider than the line itself. Words that do not fit
/// on an empty line are split with a trailing hyphen. Newlines always break.
pub fn wrap<M: TextMeasure + ?Sized>(
    text: &str,
    font: &M,
    size: f32,
    options: WrapOptions,
) -> TextBlock {
    let line_height = (font.line_metrics(size).height() * options.line_height).round();
    let mut lines = break_lines(text, font, size, &options);

    let mut truncated = false;
    if let Some(max_lines) = options.max_lines {
        if lines.len() > max_lines {
            truncated = true;
            lines.truncate(max_lines);
            if let Some(last) = lines.last_mut() {
                *last = ellipsize(last, font, size, options.limit(max_lines - 1));
            }
        }
    }

    TextBlock {
        total_height: line_height * lines.len() as f32,
        lines,
        size,
        line_height,
        truncated,
    }
}

fn break_lines<M: TextMeasure + ?Sized>(
    text: &str,
    font: &M,
    size: f32,
    options: &WrapOptions,
) -> Vec<String> {
    let mut lines = Vec::new();
    let text = text.trim();
    if text.is_empty() {
        return lines;
    }

    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if !current.is_empty() {
                let candidate = format!("{current} {word}");
                if font.advance_width(&candidate, size) <= options.limit(lines.len()) {
                    current = candidate;
                    continue;
                }
                lines.push(std::mem::take(&mut current));
            }

            let word_width = font.advance_width(word, size);
            if lines.is_empty() && word_width > options.limit(0) && options.first_line_indent > 0.0
            {
                // The indent alone occupies the first line.
                lines.push(String::new());
            }
            if word_width <= options.limit(lines.len()) {
                current.push_str(word);
            } else {
                current = hard_split(word, font, size, options, &mut lines);
            }
        }
        lines.push(current);
    }
    lines
}

/// Pushes hyphenated pieces of `word` and returns the tail that fits.
fn hard_split<M: TextMeasure + ?Sized>(
    word: &str,
    font: &M,
    size: f32,
    options: &WrapOptions,
    lines: &mut Vec<String>,
) -> String {
    let mut rest = word;
    loop {
        let limit = options.limit(lines.len());
        if font.advance_width(rest, size) <= limit {
            return rest.to_string();
        }
        let (cut, hyphen) = split_point(rest, font, size, limit);
        let mut piece = rest[..cut].to_string();
        if hyphen {
            piece.push_str(HYPHEN);
        }
        lines.push(piece);
        rest = &rest[cut..];
    }
}

/// Largest char boundary whose prefix plus a hyphen fits in `limit`.
/// Always advances by at least one char.
fn split_point<M: TextMeasure + ?Sized>(
    text: &str,
    font: &M,
    size: f32,
    limit: f32,
) -> (usize, bool) {
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(idx, _)| idx)
        .skip(1)
        .chain(std::iter::once(text.len()))
        .collect();
    let fits = |end: usize| font.advance_width(&format!("{}{HYPHEN}", &text[..end]), size) <= limit;

    // prefix width is monotonic, so binary search the last fitting bound
    let (mut lo, mut hi) = (0usize, bounds.len());
    while lo < hi {
        let mid = (lo + hi) / 2;
        if fits(bounds[mid]) {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    if lo > 0 {
        return (bounds[lo - 1], true);
    }
    (bounds[0], false)
}

fn ellipsize<M: TextMeasure + ?Sized>(line: &str, font: &M, size: f32, limit: f32) -> String {
    let mut kept = line
        .trim_end()
        .trim_end_matches(HYPHEN)
        .trim_end()
        .to_string();
    loop {
        let candidate = format!("{kept}{ELLIPSIS}");
        if kept.is_empty() || font.advance_width(&candidate, size) <= limit {
            return candidate;
        }
        kept.pop();
        kept.truncate(kept.trim_end().len());
    }
}
