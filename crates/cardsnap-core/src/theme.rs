use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result, Rgb};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeId {
    Sunrise,
    Ocean,
    Forest,
    Plum,
    Graphite,
}

impl ThemeId {
    pub const ALL: [ThemeId; 5] = [
        ThemeId::Sunrise,
        ThemeId::Ocean,
        ThemeId::Forest,
        ThemeId::Plum,
        ThemeId::Graphite,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ThemeId::Sunrise => "sunrise",
            ThemeId::Ocean => "ocean",
            ThemeId::Forest => "forest",
            ThemeId::Plum => "plum",
            ThemeId::Graphite => "graphite",
        }
    }

    pub fn theme(self) -> Theme {
        let [background, panel, foreground, muted, chip] = match self {
            ThemeId::Sunrise => [0xF6D5B8, 0xFFF8F0, 0x3A2418, 0x8A6A55, 0xF3E1CF],
            ThemeId::Ocean => [0x0F3D56, 0xF3F8FB, 0x0E2A3B, 0x557487, 0xDCEAF2],
            ThemeId::Forest => [0x1F3B2D, 0xF4F7F1, 0x1D2B22, 0x5E7264, 0xDDE8DA],
            ThemeId::Plum => [0x3B1F3F, 0xFBF5FC, 0x2E1731, 0x7A5E7E, 0xEEDDF0],
            ThemeId::Graphite => [0x17181C, 0x24262C, 0xF1F2F4, 0xA2A6AF, 0x34373F],
        };
        Theme {
            id: self,
            background: Rgb::from_u32(background),
            panel: Rgb::from_u32(panel),
            foreground: Rgb::from_u32(foreground),
            muted: Rgb::from_u32(muted),
            chip: Rgb::from_u32(chip),
        }
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ThemeId {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        let key = input.trim().to_ascii_lowercase();
        ThemeId::ALL
            .into_iter()
            .find(|id| id.name() == key)
            .ok_or_else(|| Error::UnknownTheme(input.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub id: ThemeId,
    pub background: Rgb,
    pub panel: Rgb,
    pub foreground: Rgb,
    pub muted: Rgb,
    pub chip: Rgb,
}

/// Explicit ids win; otherwise the theme rotates once per calendar day
/// (days since 0001-01-01, modulo the theme count).
pub fn select_theme(theme: Option<&str>, date: NaiveDate) -> Result<Theme> {
    if let Some(name) = theme {
        return Ok(name.parse::<ThemeId>()?.theme());
    }
    let ordinal = date.num_days_from_ce().rem_euclid(ThemeId::ALL.len() as i32);
    Ok(ThemeId::ALL[ordinal as usize].theme())
}
