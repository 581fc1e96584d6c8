use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::cache::load_font_file;
use super::dirs::resolve_font_dirs;
use super::metrics::{FontData, FontHandle};
use crate::{Advisory, FontConfig, Result};

const SYSTEM_DEFAULT_FAMILIES: &[&str] = &[
    "Noto Sans",
    "DejaVu Sans",
    "Liberation Sans",
    "Arial",
    "Helvetica",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontStyle {
    Regular,
    Bold,
    Italic,
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FontStyle::Regular => "regular",
            FontStyle::Bold => "bold",
            FontStyle::Italic => "italic",
        })
    }
}

/// One validated handle per style, resolved once before any render.
#[derive(Debug, Clone)]
pub struct FontSet {
    pub regular: FontHandle,
    pub bold: FontHandle,
    pub italic: FontHandle,
    advisories: Vec<Advisory>,
}

impl FontSet {
    pub fn new(regular: FontHandle, bold: FontHandle, italic: FontHandle) -> Self {
        Self {
            regular,
            bold,
            italic,
            advisories: Vec::new(),
        }
    }

    pub fn uniform(handle: FontHandle) -> Self {
        Self::new(handle.clone(), handle.clone(), handle)
    }

    /// The bundled DejaVu Sans family in all three styles.
    pub fn embedded() -> Result<Self> {
        Ok(Self::new(
            FontHandle::embedded(FontStyle::Regular)?,
            FontHandle::embedded(FontStyle::Bold)?,
            FontHandle::embedded(FontStyle::Italic)?,
        ))
    }

    pub fn get(&self, style: FontStyle) -> &FontHandle {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
            FontStyle::Italic => &self.italic,
        }
    }

    /// Substitutions made while resolving this set.
    pub fn advisories(&self) -> &[Advisory] {
        &self.advisories
    }

    pub(crate) fn build_fontdb(&self) -> usvg::fontdb::Database {
        let mut db = usvg::fontdb::Database::new();
        let mut loaded: Vec<&Arc<FontData>> = Vec::new();
        for handle in [&self.regular, &self.bold, &self.italic] {
            let data = handle.data();
            if loaded.iter().any(|seen| Arc::ptr_eq(seen, data)) {
                continue;
            }
            db.load_font_source(usvg::fontdb::Source::Binary(data.bytes.clone()));
            loaded.push(data);
        }
        db
    }
}

/// Turns ordered candidate lists into a [`FontSet`]. Failures degrade to a
/// system default face, then to the bundled DejaVu Sans, and are reported as
/// [`Advisory::FontFallback`].
#[derive(Debug, Clone)]
pub struct FontResolver {
    dirs: Vec<PathBuf>,
    system_fallback: bool,
}

impl FontResolver {
    pub fn new(dirs: Vec<PathBuf>, system_fallback: bool) -> Self {
        Self {
            dirs,
            system_fallback,
        }
    }

    pub fn from_config(config: &FontConfig) -> Result<Self> {
        Ok(Self::new(resolve_font_dirs(config)?, config.system_fallback))
    }

    pub fn resolve(&self, config: &FontConfig) -> Result<FontSet> {
        let mut system = SystemFonts::default();
        let mut advisories = Vec::new();

        let regular = self.resolve_style(
            FontStyle::Regular,
            &config.regular,
            None,
            &mut system,
            &mut advisories,
        )?;
        let bold = self.resolve_style(
            FontStyle::Bold,
            &config.bold,
            Some(&regular),
            &mut system,
            &mut advisories,
        )?;
        let italic = self.resolve_style(
            FontStyle::Italic,
            &config.italic,
            Some(&regular),
            &mut system,
            &mut advisories,
        )?;

        Ok(FontSet {
            regular,
            bold,
            italic,
            advisories,
        })
    }

    fn resolve_style(
        &self,
        style: FontStyle,
        candidates: &[String],
        regular: Option<&FontHandle>,
        system: &mut SystemFonts,
        advisories: &mut Vec<Advisory>,
    ) -> Result<FontHandle> {
        for candidate in candidates {
            for path in self.candidate_paths(candidate) {
                match load_font_file(&path) {
                    Ok(data) => {
                        tracing::debug!(%style, path = %path.display(), family = %data.family, "font loaded");
                        return Ok(FontHandle::from_data(data));
                    }
                    Err(err) => {
                        tracing::debug!(%style, path = %path.display(), error = %err, "font candidate failed");
                    }
                }
            }
        }

        let system_face = self
            .system_fallback
            .then(|| system.query(style))
            .flatten()
            .map(FontHandle::from_data)
            .or_else(|| regular.filter(|handle| !handle.is_embedded()).cloned());
        let substitute = match system_face {
            Some(handle) => handle,
            None => FontHandle::embedded(style)?,
        };

        if !candidates.is_empty() {
            let substituted = if substitute.is_embedded() {
                format!("{} (embedded)", substitute.family())
            } else {
                substitute.family().to_string()
            };
            tracing::warn!(
                %style,
                requested = ?candidates,
                %substituted,
                "font unavailable, using fallback"
            );
            advisories.push(Advisory::FontFallback {
                style,
                requested: candidates.to_vec(),
                substituted,
            });
        }
        Ok(substitute)
    }

    fn candidate_paths(&self, candidate: &str) -> Vec<PathBuf> {
        let path = Path::new(candidate);
        if path.is_absolute() {
            return vec![path.to_path_buf()];
        }
        let mut out: Vec<PathBuf> = self.dirs.iter().map(|dir| dir.join(path)).collect();
        out.push(path.to_path_buf());
        out.retain(|path| path.is_file());
        out
    }
}

#[derive(Default)]
struct SystemFonts {
    db: Option<usvg::fontdb::Database>,
}

impl SystemFonts {
    fn query(&mut self, style: FontStyle) -> Option<Arc<FontData>> {
        use usvg::fontdb::{Family, Query, Style, Weight};

        let db = self.db.get_or_insert_with(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            db
        });
        let mut families: Vec<Family<'_>> = SYSTEM_DEFAULT_FAMILIES
            .iter()
            .map(|name| Family::Name(*name))
            .collect();
        families.push(Family::SansSerif);
        let query = Query {
            families: &families,
            weight: if style == FontStyle::Bold {
                Weight::BOLD
            } else {
                Weight::NORMAL
            },
            style: if style == FontStyle::Italic {
                Style::Italic
            } else {
                Style::Normal
            },
            ..Query::default()
        };
        let id = db.query(&query)?;
        let parsed = db.with_face_data(id, |data, index| FontData::parse(data.to_vec(), index))?;
        match parsed {
            Ok(data) => Some(Arc::new(data)),
            Err(err) => {
                tracing::debug!(%style, error = %err, "system default font failed to parse");
                None
            }
        }
    }
}
