//! Shared numeric constants for the board engine.

// ── Sizes ───────────────────────────────────────────────────────

/// Note edge length used when a note has no explicit size (classic mode).
pub const NOTE_SIZE_CLASSIC: f64 = 150.0;

/// Note edge length used when a note has no explicit size (large mode).
pub const NOTE_SIZE_LARGE: f64 = 200.0;

/// Smallest note a resize may produce.
pub const NOTE_MIN_WIDTH: f64 = 100.0;
pub const NOTE_MIN_HEIGHT: f64 = 100.0;

/// Largest note a resize may produce.
pub const NOTE_MAX_WIDTH: f64 = 500.0;
pub const NOTE_MAX_HEIGHT: f64 = 500.0;

/// Size given to a freshly added frame.
pub const FRAME_DEFAULT_WIDTH: f64 = 300.0;
pub const FRAME_DEFAULT_HEIGHT: f64 = 200.0;

/// Smallest frame a resize may produce.
pub const FRAME_MIN_WIDTH: f64 = 200.0;
pub const FRAME_MIN_HEIGHT: f64 = 150.0;

/// Largest frame a resize may produce.
pub const FRAME_MAX_WIDTH: f64 = 1000.0;
pub const FRAME_MAX_HEIGHT: f64 = 800.0;

// ── Containment ─────────────────────────────────────────────────

/// Fraction of a note's area that must overlap a frame for the note to count as inside it.
pub const CONTAINMENT_RATIO: f64 = 0.3;

// ── History ─────────────────────────────────────────────────────

/// Maximum number of snapshots kept in the undo stack.
pub const HISTORY_LIMIT: usize = 50;

// ── Viewport ────────────────────────────────────────────────────

/// Scale multiplier applied per wheel notch.
pub const ZOOM_STEP: f64 = 1.1;

/// Zoom limits.
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 3.0;

/// Background grid spacing at scale 1, in screen pixels.
pub const GRID_SIZE_PX: f64 = 20.0;

/// The grid never gets denser than this many screen pixels per cell.
pub const GRID_MIN_STEP_PX: f64 = 10.0;

/// Ceiling for grid line opacity.
pub const GRID_MAX_OPACITY: f64 = 0.4;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels for connection lines.
pub const CONNECTION_HIT_PX: f64 = 8.0;

// ── Persistence ─────────────────────────────────────────────────

/// Key the board snapshot is stored under.
pub const STORAGE_KEY: &str = "corkboard-state";

// ── Text ────────────────────────────────────────────────────────

pub const DEFAULT_NOTE_TEXT: &str = "Double click to edit";
pub const DEFAULT_FRAME_TITLE: &str = "New Frame";
