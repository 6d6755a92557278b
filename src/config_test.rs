use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_match_constants() {
    let config = BoardConfig::default();
    assert_eq!(config.color_mode, ColorMode::Palette);
    assert_eq!(config.note_size, NoteSize::Classic);
    assert_eq!(config.history_limit, 50);
    assert!((config.zoom_step - 1.1).abs() < f64::EPSILON);
    assert!((config.min_zoom - 0.1).abs() < f64::EPSILON);
    assert!((config.max_zoom - 3.0).abs() < f64::EPSILON);
    assert_eq!(config.storage_key, STORAGE_KEY);
    assert!((config.note_side() - 150.0).abs() < f64::EPSILON);
}

#[test]
fn empty_lookup_yields_defaults() {
    assert_eq!(BoardConfig::from_lookup(|_| None), BoardConfig::default());
}

#[test]
fn lookup_overrides_every_knob() {
    let config = BoardConfig::from_lookup(lookup_from(&[
        ("CORKBOARD_COLOR_MODE", "hex"),
        ("CORKBOARD_NOTE_SIZE", "large"),
        ("CORKBOARD_HISTORY_LIMIT", "10"),
        ("CORKBOARD_ZOOM_STEP", "1.25"),
        ("CORKBOARD_MIN_ZOOM", "0.5"),
        ("CORKBOARD_MAX_ZOOM", "2"),
        ("CORKBOARD_STORAGE_KEY", "my-board"),
    ]));
    assert_eq!(config.color_mode, ColorMode::Hex);
    assert_eq!(config.note_size, NoteSize::Large);
    assert_eq!(config.history_limit, 10);
    assert!((config.zoom_step - 1.25).abs() < f64::EPSILON);
    assert!((config.min_zoom - 0.5).abs() < f64::EPSILON);
    assert!((config.max_zoom - 2.0).abs() < f64::EPSILON);
    assert_eq!(config.storage_key, "my-board");
    assert!((config.note_side() - 200.0).abs() < f64::EPSILON);
}

#[test]
fn unparseable_values_keep_defaults() {
    let config = BoardConfig::from_lookup(lookup_from(&[
        ("CORKBOARD_COLOR_MODE", "rainbow"),
        ("CORKBOARD_NOTE_SIZE", "huge"),
        ("CORKBOARD_HISTORY_LIMIT", "-3"),
        ("CORKBOARD_STORAGE_KEY", "   "),
    ]));
    assert_eq!(config, BoardConfig::default());
}

#[test]
fn storage_key_with_path_components_is_replaced() {
    for key in ["../x", "boards/main", "..\\escape", "..", "a\\b"] {
        let config = BoardConfig::from_lookup(lookup_from(&[("CORKBOARD_STORAGE_KEY", key)]));
        assert_eq!(config.storage_key, STORAGE_KEY, "key {key:?} should fall back");
    }
}

#[test]
fn zoom_step_at_or_below_one_is_replaced() {
    let config = BoardConfig::from_lookup(lookup_from(&[("CORKBOARD_ZOOM_STEP", "1.0")]));
    assert!((config.zoom_step - ZOOM_STEP).abs() < f64::EPSILON);
    let config = BoardConfig::from_lookup(lookup_from(&[("CORKBOARD_ZOOM_STEP", "NaN")]));
    assert!((config.zoom_step - ZOOM_STEP).abs() < f64::EPSILON);
}

#[test]
fn inverted_zoom_range_is_replaced() {
    let config = BoardConfig::from_lookup(lookup_from(&[("CORKBOARD_MIN_ZOOM", "4"), ("CORKBOARD_MAX_ZOOM", "2")]));
    assert!((config.min_zoom - MIN_ZOOM).abs() < f64::EPSILON);
    assert!((config.max_zoom - MAX_ZOOM).abs() < f64::EPSILON);
}

#[test]
fn non_positive_min_zoom_is_replaced() {
    let config = BoardConfig::from_lookup(lookup_from(&[("CORKBOARD_MIN_ZOOM", "0")]));
    assert!((config.min_zoom - MIN_ZOOM).abs() < f64::EPSILON);
}

#[test]
fn note_size_parses_names_and_pixels() {
    assert_eq!("Classic".parse::<NoteSize>(), Ok(NoteSize::Classic));
    assert_eq!("150".parse::<NoteSize>(), Ok(NoteSize::Classic));
    assert_eq!(" LARGE ".parse::<NoteSize>(), Ok(NoteSize::Large));
    assert_eq!("200".parse::<NoteSize>(), Ok(NoteSize::Large));
    assert!("175".parse::<NoteSize>().is_err());
}
