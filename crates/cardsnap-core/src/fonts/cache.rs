use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use super::metrics::FontData;
use crate::Result;

// Keyed by file path. Size is applied at measure time and a file holds one style.
static FONT_CACHE: Lazy<RwLock<HashMap<PathBuf, Arc<FontData>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

pub(crate) fn load_font_file(path: &Path) -> Result<Arc<FontData>> {
    let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    if let Some(hit) = cached_font(&key) {
        return Ok(hit);
    }

    // Concurrent misses may both parse; the first insert wins.
    let bytes = std::fs::read(&key)?;
    let data = Arc::new(FontData::parse(bytes, 0)?);
    if let Ok(mut cache) = FONT_CACHE.write() {
        return Ok(Arc::clone(cache.entry(key).or_insert(data)));
    }
    Ok(data)
}

fn cached_font(key: &Path) -> Option<Arc<FontData>> {
    FONT_CACHE.read().ok()?.get(key).cloned()
}

