//! Board configuration with environment overrides.
//!
//! Every knob has a default; `from_env` reads `CORKBOARD_*` variables and
//! keeps the default for anything missing or unparseable.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::str::FromStr;

use tracing::warn;

use crate::consts::{HISTORY_LIMIT, MAX_ZOOM, MIN_ZOOM, NOTE_SIZE_CLASSIC, NOTE_SIZE_LARGE, STORAGE_KEY, ZOOM_STEP};
use crate::doc::ColorMode;
use crate::persist::is_valid_storage_key;

/// Default note dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoteSize {
    /// 150×150.
    #[default]
    Classic,
    /// 200×200.
    Large,
}

impl NoteSize {
    /// Edge length of an unsized note.
    #[must_use]
    pub fn side(self) -> f64 {
        match self {
            Self::Classic => NOTE_SIZE_CLASSIC,
            Self::Large => NOTE_SIZE_LARGE,
        }
    }
}

impl FromStr for NoteSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" | "150" => Ok(Self::Classic),
            "large" | "200" => Ok(Self::Large),
            other => Err(format!("unknown note size: {other}")),
        }
    }
}

/// Tuning knobs for one board instance.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardConfig {
    /// Color vocabulary for every entity on the board.
    pub color_mode: ColorMode,
    /// Size given to notes that have none.
    pub note_size: NoteSize,
    /// Maximum undo entries.
    pub history_limit: usize,
    /// Scale multiplier per wheel notch.
    pub zoom_step: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Key the board is persisted under.
    pub storage_key: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            color_mode: ColorMode::Palette,
            note_size: NoteSize::Classic,
            history_limit: HISTORY_LIMIT,
            zoom_step: ZOOM_STEP,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            storage_key: STORAGE_KEY.to_owned(),
        }
    }
}

impl BoardConfig {
    /// Defaults overridden by `CORKBOARD_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(value) => Some(value),
            Err(_) => None,
        })
    }

    /// Defaults overridden by whatever `lookup` returns for each variable name.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let mut config = Self {
            color_mode: parse_or(&lookup, "CORKBOARD_COLOR_MODE", defaults.color_mode),
            note_size: parse_or(&lookup, "CORKBOARD_NOTE_SIZE", defaults.note_size),
            history_limit: parse_or(&lookup, "CORKBOARD_HISTORY_LIMIT", defaults.history_limit),
            zoom_step: parse_or(&lookup, "CORKBOARD_ZOOM_STEP", defaults.zoom_step),
            min_zoom: parse_or(&lookup, "CORKBOARD_MIN_ZOOM", defaults.min_zoom),
            max_zoom: parse_or(&lookup, "CORKBOARD_MAX_ZOOM", defaults.max_zoom),
            storage_key: defaults.storage_key,
        };

        if let Some(key) = lookup("CORKBOARD_STORAGE_KEY") {
            if is_valid_storage_key(&key) {
                config.storage_key = key;
            } else {
                warn!(key = %key, "storage key must be a bare name; using default");
            }
        }

        if config.zoom_step.is_nan() || config.zoom_step <= 1.0 {
            warn!(zoom_step = config.zoom_step, "zoom step must exceed 1; using default");
            config.zoom_step = ZOOM_STEP;
        }
        if config.min_zoom.is_nan() || config.max_zoom.is_nan() || config.min_zoom <= 0.0 || config.min_zoom > config.max_zoom {
            warn!(min_zoom = config.min_zoom, max_zoom = config.max_zoom, "invalid zoom range; using defaults");
            config.min_zoom = MIN_ZOOM;
            config.max_zoom = MAX_ZOOM;
        }
        config
    }

    /// Edge length of an unsized note.
    #[must_use]
    pub fn note_side(&self) -> f64 {
        self.note_size.side()
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            warn!(key, value = %raw, "unparseable config value; using default");
            default
        }
    }
}
