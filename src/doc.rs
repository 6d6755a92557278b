//! Document model: notes, frames, connections, and the board snapshot.
//!
//! This module defines what lives on the board (`Note`, `Frame`,
//! `Connection`), how entities are colored (`Color`), and the immutable unit
//! of history and persistence (`Snapshot`).
//!
//! Snapshots hold their entities behind `Arc`, so cloning a snapshot copies
//! pointers rather than entities. Mutation goes through `Arc::make_mut`,
//! which copies only the entity being changed and leaves every earlier
//! snapshot intact for undo.
//!
//! Frame membership is never stored. A note belongs to a frame exactly when
//! the geometry says so at the moment the question is asked; see
//! [`Snapshot::notes_in_frame`].

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{
    FRAME_MAX_HEIGHT, FRAME_MAX_WIDTH, FRAME_MIN_HEIGHT, FRAME_MIN_WIDTH, NOTE_MAX_HEIGHT, NOTE_MAX_WIDTH,
    NOTE_MIN_HEIGHT, NOTE_MIN_WIDTH,
};
use crate::geometry::{self, Point, Rect, Size};

/// Unique identifier for a board entity.
pub type EntityId = Uuid;

// =============================================================================
// COLOR
// =============================================================================

/// Which color vocabulary a board uses. A board never mixes the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Fixed named palette.
    #[default]
    Palette,
    /// Freeform `#rrggbb` strings.
    Hex,
}

impl FromStr for ColorMode {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "palette" | "named" => Ok(Self::Palette),
            "hex" => Ok(Self::Hex),
            _ => Err(ColorError::UnknownMode(s.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    #[error("invalid color: {0}")]
    Invalid(String),
    #[error("unknown color mode: {0}")]
    UnknownMode(String),
}

/// The fixed sticky-note palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamedColor {
    Yellow,
    Blue,
    Green,
    Pink,
}

impl NamedColor {
    pub const ALL: [NamedColor; 4] = [Self::Yellow, Self::Blue, Self::Green, Self::Pink];

    /// CSS fill for this palette entry.
    #[must_use]
    pub fn fill(self) -> &'static str {
        match self {
            Self::Yellow => "#fff9c4",
            Self::Blue => "#bbdefb",
            Self::Green => "#c8e6c9",
            Self::Pink => "#f8bbd0",
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Yellow => "yellow",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Pink => "pink",
        }
    }
}

/// A validated, lowercase `#rgb` or `#rrggbb` color string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for HexColor {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let Some(digits) = value.strip_prefix('#') else {
            return Err(ColorError::Invalid(value));
        };
        if !matches!(digits.len(), 3 | 6) || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::Invalid(value));
        }
        Ok(Self(value.to_ascii_lowercase()))
    }
}

impl From<HexColor> for String {
    fn from(value: HexColor) -> Self {
        value.0
    }
}

/// Display color of an entity.
///
/// Serialized as a bare string: a palette name (`"yellow"`) or a hex
/// string (`"#fff9c4"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    Named(NamedColor),
    Hex(HexColor),
}

impl Color {
    /// The vocabulary this color belongs to.
    #[must_use]
    pub fn mode(&self) -> ColorMode {
        match self {
            Self::Named(_) => ColorMode::Palette,
            Self::Hex(_) => ColorMode::Hex,
        }
    }

    /// CSS fill string.
    #[must_use]
    pub fn fill(&self) -> &str {
        match self {
            Self::Named(named) => named.fill(),
            Self::Hex(hex) => hex.as_str(),
        }
    }

    /// The default color for a board in `mode`.
    #[must_use]
    pub fn default_for(mode: ColorMode) -> Self {
        Self::from_named(NamedColor::Yellow, mode)
    }

    /// Express a palette entry in `mode`'s vocabulary.
    #[must_use]
    pub fn from_named(named: NamedColor, mode: ColorMode) -> Self {
        match mode {
            ColorMode::Palette => Self::Named(named),
            ColorMode::Hex => Self::Hex(HexColor(named.fill().to_owned())),
        }
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lower = trimmed.to_ascii_lowercase();
        if let Some(named) = NamedColor::ALL.into_iter().find(|c| c.name() == lower) {
            return Ok(Self::Named(named));
        }
        HexColor::try_from(trimmed.to_owned()).map(Self::Hex)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(named) => f.write_str(named.name()),
            Self::Hex(hex) => f.write_str(hex.as_str()),
        }
    }
}

// =============================================================================
// ENTITIES
// =============================================================================

/// The kind of a board entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Note,
    Frame,
    Connection,
}

impl EntityKind {
    /// Inclusive `(min, max)` size bounds, or `None` for kinds without a size.
    #[must_use]
    pub fn size_bounds(self) -> Option<(Size, Size)> {
        match self {
            Self::Note => Some((Size::new(NOTE_MIN_WIDTH, NOTE_MIN_HEIGHT), Size::new(NOTE_MAX_WIDTH, NOTE_MAX_HEIGHT))),
            Self::Frame => Some((
                Size::new(FRAME_MIN_WIDTH, FRAME_MIN_HEIGHT),
                Size::new(FRAME_MAX_WIDTH, FRAME_MAX_HEIGHT),
            )),
            Self::Connection => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Note => "note",
            Self::Frame => "frame",
            Self::Connection => "connection",
        })
    }
}

/// A sticky note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: EntityId,
    /// Top-left corner in canvas space.
    pub position: Point,
    /// Explicit size; `None` means the board's default note size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    pub text: String,
    pub color: Color,
}

impl Note {
    /// Create a note with a fresh id and the default size.
    #[must_use]
    pub fn new(position: Point, text: impl Into<String>, color: Color) -> Self {
        Self { id: Uuid::new_v4(), position, size: None, text: text.into(), color }
    }

    /// Effective size, falling back to a square of `default_side`.
    #[must_use]
    pub fn size_or(&self, default_side: f64) -> Size {
        self.size.unwrap_or(Size::square(default_side))
    }

    #[must_use]
    pub fn rect(&self, default_side: f64) -> Rect {
        Rect::new(self.position, self.size_or(default_side))
    }
}

/// A titled grouping region. Holds no references to the notes it contains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub id: EntityId,
    pub position: Point,
    pub size: Size,
    pub title: String,
    pub color: Color,
}

impl Frame {
    #[must_use]
    pub fn new(position: Point, size: Size, title: impl Into<String>, color: Color) -> Self {
        Self { id: Uuid::new_v4(), position, size, title: title.into(), color }
    }

    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.position, self.size)
    }
}

/// A line joining two notes.
///
/// `points` caches the endpoints' centers as `[x1, y1, x2, y2]`. It is
/// derived state: whoever moves an endpoint note recomputes it in the same
/// snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: EntityId,
    pub start_id: EntityId,
    pub end_id: EntityId,
    pub color: Color,
    pub points: [f64; 4],
}

impl Connection {
    /// Whether either endpoint is `id`.
    #[must_use]
    pub fn touches(&self, id: &EntityId) -> bool {
        self.start_id == *id || self.end_id == *id
    }
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Reasons a snapshot fails validation on load.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SnapshotError {
    #[error("entity {id} uses {found:?} colors on a {expected:?} board")]
    ColorMode { id: EntityId, expected: ColorMode, found: ColorMode },
    #[error("connection {id} references missing note {missing}")]
    DanglingConnection { id: EntityId, missing: EntityId },
    #[error("duplicate entity id {0}")]
    DuplicateId(EntityId),
    #[error("selection {0} does not exist")]
    MissingSelection(EntityId),
    #[error("entity {0} has a non-finite position or size")]
    NonFinite(EntityId),
    #[error("{kind} {id} is sized {width}x{height}, outside its bounds")]
    SizeOutOfRange { id: EntityId, kind: EntityKind, width: f64, height: f64 },
}

/// Full board state at one point in history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    pub notes: Vec<Arc<Note>>,
    pub frames: Vec<Arc<Frame>>,
    pub connections: Vec<Arc<Connection>>,
    pub selected_id: Option<EntityId>,
}

impl Snapshot {
    /// An empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Lookups ---

    #[must_use]
    pub fn note(&self, id: &EntityId) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == *id).map(AsRef::as_ref)
    }

    #[must_use]
    pub fn frame(&self, id: &EntityId) -> Option<&Frame> {
        self.frames.iter().find(|f| f.id == *id).map(AsRef::as_ref)
    }

    #[must_use]
    pub fn connection(&self, id: &EntityId) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == *id).map(AsRef::as_ref)
    }

    /// Which kind of entity `id` names, if it exists.
    #[must_use]
    pub fn kind_of(&self, id: &EntityId) -> Option<EntityKind> {
        if self.note(id).is_some() {
            Some(EntityKind::Note)
        } else if self.frame(id).is_some() {
            Some(EntityKind::Frame)
        } else if self.connection(id).is_some() {
            Some(EntityKind::Connection)
        } else {
            None
        }
    }

    /// Total number of entities on the board.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notes.len() + self.frames.len() + self.connections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids of the notes currently inside frame `frame_id`, in board order.
    ///
    /// Computed from geometry on every call; returns an empty list when the
    /// frame does not exist.
    #[must_use]
    pub fn notes_in_frame(&self, frame_id: &EntityId, note_side: f64) -> Vec<EntityId> {
        let Some(frame) = self.frame(frame_id) else {
            return Vec::new();
        };
        let frame_rect = frame.rect();
        self.notes
            .iter()
            .filter(|n| geometry::is_contained(&n.rect(note_side), &frame_rect))
            .map(|n| n.id)
            .collect()
    }

    /// Connections with `id` as either endpoint.
    pub fn connections_touching<'a>(&'a self, id: &'a EntityId) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections.iter().map(AsRef::as_ref).filter(move |c| c.touches(id))
    }

    // --- Copy-on-write mutation ---

    pub(crate) fn note_mut(&mut self, id: &EntityId) -> Option<&mut Note> {
        self.notes.iter_mut().find(|n| n.id == *id).map(Arc::make_mut)
    }

    pub(crate) fn frame_mut(&mut self, id: &EntityId) -> Option<&mut Frame> {
        self.frames.iter_mut().find(|f| f.id == *id).map(Arc::make_mut)
    }

    pub(crate) fn connection_mut(&mut self, id: &EntityId) -> Option<&mut Connection> {
        self.connections.iter_mut().find(|c| c.id == *id).map(Arc::make_mut)
    }

    /// Recompute `points` for every connection touching any of `moved`.
    ///
    /// Connections whose points are already current are left shared.
    pub(crate) fn refresh_connections(&mut self, moved: &[EntityId], note_side: f64) {
        for i in 0..self.connections.len() {
            let conn = &self.connections[i];
            if !moved.iter().any(|id| conn.touches(id)) {
                continue;
            }
            let (Some(start), Some(end)) = (self.note(&conn.start_id), self.note(&conn.end_id)) else {
                continue;
            };
            let points = geometry::connection_points(&start.rect(note_side), &end.rect(note_side));
            if conn.points != points {
                Arc::make_mut(&mut self.connections[i]).points = points;
            }
        }
    }

    /// Recompute `points` for every connection on the board.
    pub(crate) fn refresh_all_connections(&mut self, note_side: f64) {
        let ids: Vec<EntityId> = self.notes.iter().map(|n| n.id).collect();
        self.refresh_connections(&ids, note_side);
    }

    /// Remove entity `id`, cascading to every connection that references it.
    ///
    /// Clears the selection if it pointed at anything removed. Returns the
    /// kind removed, or `None` if `id` was not on the board.
    pub(crate) fn remove(&mut self, id: &EntityId) -> Option<EntityKind> {
        let kind = self.kind_of(id)?;
        match kind {
            EntityKind::Note => self.notes.retain(|n| n.id != *id),
            EntityKind::Frame => self.frames.retain(|f| f.id != *id),
            EntityKind::Connection => self.connections.retain(|c| c.id != *id),
        }
        if kind != EntityKind::Connection {
            self.connections.retain(|c| !c.touches(id));
        }
        if let Some(selected) = self.selected_id {
            if self.kind_of(&selected).is_none() {
                self.selected_id = None;
            }
        }
        Some(kind)
    }

    /// Check the board's structural invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violation found: non-finite or out-of-bounds
    /// geometry, a color outside `mode`, a connection endpoint that is not a
    /// note, a repeated id, or a selection naming a missing entity.
    pub fn validate(&self, mode: ColorMode) -> Result<(), SnapshotError> {
        let placed = self
            .notes
            .iter()
            .map(|n| (n.id, EntityKind::Note, n.position, n.size))
            .chain(self.frames.iter().map(|f| (f.id, EntityKind::Frame, f.position, Some(f.size))));
        for (id, kind, position, size) in placed {
            if !position.is_finite() || size.is_some_and(|s| !s.is_finite()) {
                return Err(SnapshotError::NonFinite(id));
            }
            let (Some(size), Some((min, max))) = (size, kind.size_bounds()) else {
                continue;
            };
            if !size.within(min, max) {
                return Err(SnapshotError::SizeOutOfRange { id, kind, width: size.width, height: size.height });
            }
        }

        let mut seen = std::collections::HashSet::with_capacity(self.len());
        let colored = self
            .notes
            .iter()
            .map(|n| (n.id, &n.color))
            .chain(self.frames.iter().map(|f| (f.id, &f.color)))
            .chain(self.connections.iter().map(|c| (c.id, &c.color)));
        for (id, color) in colored {
            if !seen.insert(id) {
                return Err(SnapshotError::DuplicateId(id));
            }
            if color.mode() != mode {
                return Err(SnapshotError::ColorMode { id, expected: mode, found: color.mode() });
            }
        }
        for conn in &self.connections {
            for endpoint in [conn.start_id, conn.end_id] {
                if self.note(&endpoint).is_none() {
                    return Err(SnapshotError::DanglingConnection { id: conn.id, missing: endpoint });
                }
            }
        }
        if let Some(selected) = self.selected_id {
            if !seen.contains(&selected) {
                return Err(SnapshotError::MissingSelection(selected));
            }
        }
        Ok(())
    }

    /// A starter board: three titled frames with one note each.
    #[must_use]
    pub fn starter(mode: ColorMode) -> Self {
        let sections = [
            ("Project Goals & Objectives", Point::new(100.0, 100.0), "Increase user engagement by 50%", NamedColor::Yellow),
            ("Team Assignments", Point::new(500.0, 100.0), "Frontend Development Team", NamedColor::Blue),
            ("Project Timeline", Point::new(100.0, 500.0), "Phase 1: Research & Planning", NamedColor::Green),
        ];
        let mut snapshot = Self::new();
        for (title, origin, text, color) in sections {
            let color = Color::from_named(color, mode);
            snapshot
                .frames
                .push(Arc::new(Frame::new(origin, Size::new(300.0, 400.0), title, color.clone())));
            snapshot
                .notes
                .push(Arc::new(Note::new(origin.offset(20.0, 60.0), text, color)));
        }
        snapshot
    }
}
