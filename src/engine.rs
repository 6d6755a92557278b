//! Board engine: every user intent, expressed as a snapshot transition.
//!
//! DESIGN
//! ======
//! The engine owns the history of snapshots plus the view and UI state that
//! is never undone (camera, tool, connect-mode, text-edit focus, clipboard).
//! Each intent clones the present snapshot (cheap: entities are shared),
//! edits the clone, and either commits it or rejects it. Committing saves
//! the new present through the configured store.
//!
//! Drags are the one place the present changes without a commit: every
//! pointer move previews, and the release commits once against the board as
//! it was at drag start.
//!
//! ERROR HANDLING
//! ==============
//! Intents never return `Err`. A refused intent returns
//! `Action::Rejected` with the reason and leaves the present untouched.
//! Persistence failures are logged and never undo the in-memory commit.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::camera::Camera;
use crate::clipboard::{Clipboard, ClipboardError};
use crate::config::BoardConfig;
use crate::consts::{DEFAULT_FRAME_TITLE, DEFAULT_NOTE_TEXT, FRAME_DEFAULT_HEIGHT, FRAME_DEFAULT_WIDTH};
use crate::doc::{Color, ColorMode, Connection, EntityId, EntityKind, Frame, Note, Snapshot};
use crate::geometry::{self, Point, Size};
use crate::history::History;
use crate::input::{ConnectMode, DragState, InputState, Tool, UiState};
use crate::persist::{self, MemoryStore, SnapshotStore};

/// Outcome of an intent, for the host to react to.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Nothing changed.
    None,
    /// A new snapshot was committed to history.
    Committed { label: &'static str },
    /// The present was updated without a history entry.
    Previewed,
    /// History moved back one entry.
    Undone,
    /// History moved forward one entry.
    Redone,
    SelectionChanged(Option<EntityId>),
    ConnectModeChanged(ConnectMode),
    /// The host should open a text editor for `id` seeded with `text`.
    EditTextRequested { id: EntityId, text: String },
    /// The text editor should close without saving.
    EditCancelled,
    /// Only the color for new entities changed.
    ActiveColorChanged(Color),
    /// The selected entity was copied.
    Copied(EntityKind),
    /// Camera pan or zoom changed.
    ViewChanged,
    /// The intent was refused; the board is unchanged.
    Rejected(EditError),
}

/// Why an intent was refused.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    #[error("entity not found: {0}")]
    NotFound(EntityId),
    #[error("cannot {op} a {kind}")]
    WrongKind { kind: EntityKind, op: &'static str },
    #[error("{width}x{height} is outside the {kind} size bounds")]
    SizeOutOfRange { kind: EntityKind, width: f64, height: f64 },
    #[error("color {color} does not belong to a {expected:?} board")]
    ColorMode { color: Color, expected: ColorMode },
    #[error("cannot connect a note to itself")]
    SelfConnection,
    #[error("connection endpoint {0} is not on the board")]
    DanglingEndpoint(EntityId),
    #[error("nothing selected")]
    NothingSelected,
    #[error("no text edit in progress")]
    NotEditing,
    #[error("a drag is in progress")]
    DragInProgress,
    #[error("no change")]
    Unchanged,
    #[error("coordinates must be finite numbers")]
    NonFinite,
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
}

/// The board engine.
pub struct Engine {
    history: History<Snapshot>,
    pub camera: Camera,
    pub ui: UiState,
    pub input: InputState,
    clipboard: Clipboard,
    config: BoardConfig,
    store: Box<dyn SnapshotStore>,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(BoardConfig::default())
    }
}

impl Engine {
    /// An empty board backed by an in-memory store.
    #[must_use]
    pub fn new(config: BoardConfig) -> Self {
        Self::with_snapshot(config, Box::new(MemoryStore::new()), Snapshot::new())
    }

    /// Load the board from `store`, falling back to an empty board.
    #[must_use]
    pub fn open(config: BoardConfig, store: Box<dyn SnapshotStore>) -> Self {
        let snapshot = persist::load_snapshot(store.as_ref(), &config.storage_key, config.color_mode, config.note_side());
        Self::with_snapshot(config, store, snapshot)
    }

    fn with_snapshot(config: BoardConfig, store: Box<dyn SnapshotStore>, snapshot: Snapshot) -> Self {
        Self {
            history: History::new(snapshot, config.history_limit),
            camera: Camera::default(),
            ui: UiState::new(Color::default_for(config.color_mode)),
            input: InputState::Idle,
            clipboard: Clipboard::new(),
            config,
            store,
            viewport_width: 0.0,
            viewport_height: 0.0,
        }
    }

    // --- Queries ---

    /// The present board.
    #[must_use]
    pub fn snapshot(&self) -> &Snapshot {
        self.history.present()
    }

    #[must_use]
    pub fn history(&self) -> &History<Snapshot> {
        &self.history
    }

    /// The currently selected entity, if any.
    #[must_use]
    pub fn selection(&self) -> Option<EntityId> {
        self.snapshot().selected_id
    }

    /// The current camera state.
    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    #[must_use]
    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    #[must_use]
    pub fn store(&self) -> &dyn SnapshotStore {
        self.store.as_ref()
    }

    #[must_use]
    pub fn connect_mode(&self) -> ConnectMode {
        self.ui.connect
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.input.is_dragging()
    }

    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.ui.editing.is_some()
    }

    /// Notes currently inside frame `id`.
    #[must_use]
    pub fn notes_in_frame(&self, id: &EntityId) -> Vec<EntityId> {
        self.snapshot().notes_in_frame(id, self.config.note_side())
    }

    // --- Commit plumbing ---

    /// Run `edit` on a copy of the present and commit the result under `label`.
    fn apply<F>(&mut self, label: &'static str, edit: F) -> Action
    where
        F: FnOnce(&mut Snapshot) -> Result<(), EditError>,
    {
        if self.input.is_dragging() {
            return reject(label, EditError::DragInProgress);
        }
        let mut next = self.history.present().clone();
        if let Err(e) = edit(&mut next) {
            return reject(label, e);
        }
        if next == *self.history.present() {
            return reject(label, EditError::Unchanged);
        }
        self.history.commit(next);
        self.save();
        debug!(label, past = self.history.past_len(), "committed");
        Action::Committed { label }
    }

    fn save(&mut self) {
        let key = self.config.storage_key.clone();
        if let Err(e) = persist::save_snapshot(self.store.as_mut(), &key, self.history.present()) {
            warn!(key = %key, error = %e, "snapshot save failed");
        }
    }

    fn check_color(&self, color: &Color) -> Result<(), EditError> {
        if color.mode() == self.config.color_mode {
            Ok(())
        } else {
            Err(EditError::ColorMode { color: color.clone(), expected: self.config.color_mode })
        }
    }

    // --- Creation ---

    /// Place a note with the default size at `position` and select it.
    pub fn add_note(&mut self, position: Point, color: Color) -> Action {
        if !position.is_finite() {
            return reject("add note", EditError::NonFinite);
        }
        if let Err(e) = self.check_color(&color) {
            return reject("add note", e);
        }
        self.apply("add note", |doc| {
            let note = Note::new(position, DEFAULT_NOTE_TEXT, color);
            doc.selected_id = Some(note.id);
            doc.notes.push(Arc::new(note));
            Ok(())
        })
    }

    /// Place a 300×200 frame at `position` and select it.
    pub fn add_frame(&mut self, position: Point, color: Color) -> Action {
        if !position.is_finite() {
            return reject("add frame", EditError::NonFinite);
        }
        if let Err(e) = self.check_color(&color) {
            return reject("add frame", e);
        }
        self.apply("add frame", |doc| {
            let size = Size::new(FRAME_DEFAULT_WIDTH, FRAME_DEFAULT_HEIGHT);
            let frame = Frame::new(position, size, DEFAULT_FRAME_TITLE, color);
            doc.selected_id = Some(frame.id);
            doc.frames.push(Arc::new(frame));
            Ok(())
        })
    }

    /// Connect two notes with a line in the active color.
    pub fn connect(&mut self, start: EntityId, end: EntityId) -> Action {
        if start == end {
            return reject("connect", EditError::SelfConnection);
        }
        let side = self.config.note_side();
        let color = self.ui.active_color.clone();
        self.apply("connect", |doc| {
            let a = doc.note(&start).ok_or(EditError::DanglingEndpoint(start))?;
            let b = doc.note(&end).ok_or(EditError::DanglingEndpoint(end))?;
            let points = geometry::connection_points(&a.rect(side), &b.rect(side));
            doc.connections.push(Arc::new(Connection {
                id: Uuid::new_v4(),
                start_id: start,
                end_id: end,
                color,
                points,
            }));
            Ok(())
        })
    }

    /// Append the starter frames and notes to the board.
    pub fn insert_template(&mut self) -> Action {
        let starter = Snapshot::starter(self.config.color_mode);
        self.apply("insert template", |doc| {
            doc.frames.extend(starter.frames);
            doc.notes.extend(starter.notes);
            Ok(())
        })
    }

    // --- Geometry edits ---

    /// Move a single note or frame. Connections touching a moved note follow it.
    pub fn move_entity(&mut self, id: EntityId, position: Point) -> Action {
        if !position.is_finite() {
            return reject("move", EditError::NonFinite);
        }
        let side = self.config.note_side();
        self.apply("move", |doc| {
            match doc.kind_of(&id) {
                Some(EntityKind::Note) => {
                    if let Some(note) = doc.note_mut(&id) {
                        note.position = position;
                    }
                    doc.refresh_connections(&[id], side);
                }
                Some(EntityKind::Frame) => {
                    if let Some(frame) = doc.frame_mut(&id) {
                        frame.position = position;
                    }
                }
                Some(kind) => return Err(EditError::WrongKind { kind, op: "move" }),
                None => return Err(EditError::NotFound(id)),
            }
            Ok(())
        })
    }

    /// Move a frame to `position`, carrying the notes inside it.
    ///
    /// Runs as a complete drag gesture: one commit.
    pub fn move_frame_with_contents(&mut self, id: EntityId, position: Point) -> Action {
        if !position.is_finite() {
            return reject("move frame", EditError::NonFinite);
        }
        let origin = match self.snapshot().frame(&id) {
            Some(frame) => frame.position,
            None => {
                let err = match self.snapshot().kind_of(&id) {
                    Some(kind) => EditError::WrongKind { kind, op: "group-move" },
                    None => EditError::NotFound(id),
                };
                return reject("move frame", err);
            }
        };
        if let Action::Rejected(e) = self.drag_start(id, origin) {
            return Action::Rejected(e);
        }
        self.drag_move(position);
        match self.drag_end() {
            Action::None => reject("move frame", EditError::Unchanged),
            other => other,
        }
    }

    /// Resize a note or frame. Sizes outside the kind's bounds are refused
    /// and the old size kept.
    pub fn resize_entity(&mut self, id: EntityId, size: Size) -> Action {
        if !size.is_finite() {
            return reject("resize", EditError::NonFinite);
        }
        let side = self.config.note_side();
        self.apply("resize", |doc| {
            let kind = doc.kind_of(&id).ok_or(EditError::NotFound(id))?;
            let (min, max) = kind.size_bounds().ok_or(EditError::WrongKind { kind, op: "resize" })?;
            if !size.within(min, max) {
                return Err(EditError::SizeOutOfRange { kind, width: size.width, height: size.height });
            }
            if let Some(note) = doc.note_mut(&id) {
                note.size = Some(size);
                doc.refresh_connections(&[id], side);
            } else if let Some(frame) = doc.frame_mut(&id) {
                frame.size = size;
            }
            Ok(())
        })
    }

    // --- Display edits ---

    /// Recolor any entity.
    pub fn change_color(&mut self, id: EntityId, color: Color) -> Action {
        if let Err(e) = self.check_color(&color) {
            return reject("change color", e);
        }
        self.apply("change color", |doc| {
            if let Some(note) = doc.note_mut(&id) {
                note.color = color;
            } else if let Some(frame) = doc.frame_mut(&id) {
                frame.color = color;
            } else if let Some(conn) = doc.connection_mut(&id) {
                conn.color = color;
            } else {
                return Err(EditError::NotFound(id));
            }
            Ok(())
        })
    }

    /// Set the color for new entities; also recolors the selection, if any.
    ///
    /// Returns `Committed` when the selection was recolored, and
    /// `ActiveColorChanged` when only the color for new entities changed.
    pub fn set_active_color(&mut self, color: Color) -> Action {
        if let Err(e) = self.check_color(&color) {
            return reject("set color", e);
        }
        let changed = self.ui.active_color != color;
        self.ui.active_color = color.clone();
        if let Some(id) = self.selection() {
            if let committed @ Action::Committed { .. } = self.change_color(id, color.clone()) {
                return committed;
            }
        }
        if changed { Action::ActiveColorChanged(color) } else { Action::None }
    }

    pub fn edit_note_text(&mut self, id: EntityId, text: String) -> Action {
        self.apply("edit text", |doc| {
            let kind = doc.kind_of(&id).ok_or(EditError::NotFound(id))?;
            let note = doc.note_mut(&id).ok_or(EditError::WrongKind { kind, op: "edit text of" })?;
            note.text = text;
            Ok(())
        })
    }

    pub fn rename_frame(&mut self, id: EntityId, title: String) -> Action {
        self.apply("rename frame", |doc| {
            let kind = doc.kind_of(&id).ok_or(EditError::NotFound(id))?;
            let frame = doc.frame_mut(&id).ok_or(EditError::WrongKind { kind, op: "rename" })?;
            frame.title = title;
            Ok(())
        })
    }

    // --- Text editing session ---

    /// Focus the text field of a note or frame.
    pub fn begin_text_edit(&mut self, id: EntityId) -> Action {
        let doc = self.snapshot();
        let text = if let Some(note) = doc.note(&id) {
            note.text.clone()
        } else if let Some(frame) = doc.frame(&id) {
            frame.title.clone()
        } else if doc.connection(&id).is_some() {
            return reject("edit text", EditError::WrongKind { kind: EntityKind::Connection, op: "edit text of" });
        } else {
            return reject("edit text", EditError::NotFound(id));
        };
        self.ui.editing = Some(id);
        Action::EditTextRequested { id, text }
    }

    /// Save the text field's contents (blur or Enter).
    pub fn commit_text_edit(&mut self, text: String) -> Action {
        let Some(id) = self.ui.editing.take() else {
            return reject("edit text", EditError::NotEditing);
        };
        match self.snapshot().kind_of(&id) {
            Some(EntityKind::Frame) => self.rename_frame(id, text),
            _ => self.edit_note_text(id, text),
        }
    }

    /// Close the text field without saving (Escape).
    pub fn cancel_text_edit(&mut self) -> Action {
        if self.ui.editing.take().is_none() {
            return Action::None;
        }
        Action::EditCancelled
    }

    // --- Deletion ---

    /// Remove `id` and every connection that references it.
    pub fn delete(&mut self, id: EntityId) -> Action {
        self.apply("delete", |doc| match doc.remove(&id) {
            Some(_) => Ok(()),
            None => Err(EditError::NotFound(id)),
        })
    }

    pub fn delete_selection(&mut self) -> Action {
        match self.selection() {
            Some(id) => self.delete(id),
            None => reject("delete", EditError::NothingSelected),
        }
    }

    // --- Clipboard ---

    /// Copy the selected entity into its kind's clipboard slot.
    pub fn copy_selection(&mut self) -> Action {
        let Some(id) = self.selection() else {
            return reject("copy", EditError::NothingSelected);
        };
        let doc = self.history.present();
        let copied = if let Some(note) = doc.note(&id) {
            self.clipboard.copy(EntityKind::Note, note).map(|()| EntityKind::Note)
        } else if let Some(frame) = doc.frame(&id) {
            self.clipboard.copy(EntityKind::Frame, frame).map(|()| EntityKind::Frame)
        } else if let Some(conn) = doc.connection(&id) {
            self.clipboard.copy(EntityKind::Connection, conn).map(|()| EntityKind::Connection)
        } else {
            return reject("copy", EditError::NotFound(id));
        };
        match copied {
            Ok(kind) => Action::Copied(kind),
            Err(e) => reject("copy", e.into()),
        }
    }

    /// Paste the most recently copied entity at `position`, under a new id,
    /// and select it. A connection keeps its endpoints and is refused when
    /// either of them is gone.
    pub fn paste(&mut self, position: Point) -> Action {
        if !position.is_finite() {
            return reject("paste", EditError::NonFinite);
        }
        let Some(kind) = self.clipboard.latest() else {
            return reject("paste", ClipboardError::Empty.into());
        };
        let side = self.config.note_side();
        match kind {
            EntityKind::Note => {
                let note = match self.clipboard.paste::<Note>(kind) {
                    Ok(note) => Note { position, ..note },
                    Err(e) => return reject("paste", e.into()),
                };
                if let Err(e) = self.check_color(&note.color) {
                    return reject("paste", e);
                }
                self.apply("paste", |doc| {
                    doc.selected_id = Some(note.id);
                    doc.notes.push(Arc::new(note));
                    Ok(())
                })
            }
            EntityKind::Frame => {
                let frame = match self.clipboard.paste::<Frame>(kind) {
                    Ok(frame) => Frame { position, ..frame },
                    Err(e) => return reject("paste", e.into()),
                };
                if let Err(e) = self.check_color(&frame.color) {
                    return reject("paste", e);
                }
                self.apply("paste", |doc| {
                    doc.selected_id = Some(frame.id);
                    doc.frames.push(Arc::new(frame));
                    Ok(())
                })
            }
            EntityKind::Connection => {
                let mut conn = match self.clipboard.paste::<Connection>(kind) {
                    Ok(conn) => conn,
                    Err(e) => return reject("paste", e.into()),
                };
                if let Err(e) = self.check_color(&conn.color) {
                    return reject("paste", e);
                }
                self.apply("paste", |doc| {
                    let a = doc.note(&conn.start_id).ok_or(EditError::DanglingEndpoint(conn.start_id))?;
                    let b = doc.note(&conn.end_id).ok_or(EditError::DanglingEndpoint(conn.end_id))?;
                    conn.points = geometry::connection_points(&a.rect(side), &b.rect(side));
                    doc.selected_id = Some(conn.id);
                    doc.connections.push(Arc::new(conn));
                    Ok(())
                })
            }
        }
    }

    // --- History ---

    pub fn undo(&mut self) -> Action {
        if self.input.is_dragging() {
            return reject("undo", EditError::DragInProgress);
        }
        if !self.history.undo() {
            debug!("nothing to undo");
            return Action::None;
        }
        self.save();
        Action::Undone
    }

    pub fn redo(&mut self) -> Action {
        if self.input.is_dragging() {
            return reject("redo", EditError::DragInProgress);
        }
        if !self.history.redo() {
            debug!("nothing to redo");
            return Action::None;
        }
        self.save();
        Action::Redone
    }

    // --- Selection and connect-mode ---

    /// Plain selection. Ignored while a drag is in progress, so the click
    /// that ends a drag never changes the selection.
    pub fn select(&mut self, id: Option<EntityId>) -> Action {
        if self.input.is_dragging() {
            return Action::None;
        }
        if let Some(target) = id {
            if self.snapshot().kind_of(&target).is_none() {
                return reject("select", EditError::NotFound(target));
            }
        }
        if self.selection() == id {
            return Action::None;
        }
        let mut next = self.history.present().clone();
        next.selected_id = id;
        self.history.preview(next);
        Action::SelectionChanged(id)
    }

    /// Arm connect-mode, or disarm it and drop any pending start.
    pub fn toggle_connect_mode(&mut self) -> Action {
        self.ui.connect = if self.ui.connect.is_armed() {
            ConnectMode::Idle
        } else {
            ConnectMode::AwaitingFirstEndpoint
        };
        Action::ConnectModeChanged(self.ui.connect)
    }

    /// Click on an entity: advances connect-mode when armed, selects otherwise.
    ///
    /// A completed connection leaves connect-mode armed for the next pair.
    pub fn pick(&mut self, id: EntityId) -> Action {
        match self.ui.connect {
            ConnectMode::Idle => self.select(Some(id)),
            ConnectMode::AwaitingFirstEndpoint => {
                if let Err(e) = self.require_note(id) {
                    return reject("connect", e);
                }
                self.ui.connect = ConnectMode::AwaitingSecondEndpoint { start: id };
                Action::ConnectModeChanged(self.ui.connect)
            }
            ConnectMode::AwaitingSecondEndpoint { start } => {
                if start == id {
                    self.ui.connect = ConnectMode::AwaitingFirstEndpoint;
                    return Action::ConnectModeChanged(self.ui.connect);
                }
                if let Err(e) = self.require_note(id) {
                    return reject("connect", e);
                }
                self.ui.connect = ConnectMode::AwaitingFirstEndpoint;
                self.connect(start, id)
            }
        }
    }

    fn require_note(&self, id: EntityId) -> Result<(), EditError> {
        match self.snapshot().kind_of(&id) {
            Some(EntityKind::Note) => Ok(()),
            Some(kind) => Err(EditError::WrongKind { kind, op: "connect" }),
            None => Err(EditError::NotFound(id)),
        }
    }

    /// Escape: cancel a text edit, else disarm connect-mode, else deselect.
    pub fn cancel(&mut self) -> Action {
        if self.ui.editing.is_some() {
            return self.cancel_text_edit();
        }
        if self.ui.connect.is_armed() {
            self.ui.connect = ConnectMode::Idle;
            return Action::ConnectModeChanged(ConnectMode::Idle);
        }
        self.select(None)
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.ui.tool = tool;
    }

    // --- Drag gesture ---

    /// Begin dragging a note or frame from canvas point `world_pt`.
    ///
    /// For a frame, the notes inside it right now are frozen as the group
    /// that moves with it for the whole gesture.
    pub fn drag_start(&mut self, id: EntityId, world_pt: Point) -> Action {
        if self.input.is_dragging() {
            return reject("drag", EditError::DragInProgress);
        }
        if !world_pt.is_finite() {
            return reject("drag", EditError::NonFinite);
        }
        let side = self.config.note_side();
        let doc = self.history.present();
        let (kind, origin, members) = if let Some(note) = doc.note(&id) {
            (EntityKind::Note, note.position, Vec::new())
        } else if let Some(frame) = doc.frame(&id) {
            let members = doc
                .notes_in_frame(&id, side)
                .into_iter()
                .filter_map(|nid| doc.note(&nid).map(|n| (nid, n.position)))
                .collect();
            (EntityKind::Frame, frame.position, members)
        } else if doc.connection(&id).is_some() {
            return reject("drag", EditError::WrongKind { kind: EntityKind::Connection, op: "drag" });
        } else {
            return reject("drag", EditError::NotFound(id));
        };
        debug!(id = %id, %kind, members = members.len(), "drag started");
        self.input = InputState::Dragging(Box::new(DragState {
            id,
            kind,
            start_world: world_pt,
            origin,
            members,
            base: doc.clone(),
            moved: false,
        }));
        Action::None
    }

    /// Preview the drag at canvas point `world_pt`. No history entry.
    ///
    /// A non-finite point is refused and the drag keeps its last preview.
    pub fn drag_move(&mut self, world_pt: Point) -> Action {
        if !world_pt.is_finite() {
            return reject("drag", EditError::NonFinite);
        }
        let InputState::Dragging(drag) = &mut self.input else {
            return Action::None;
        };
        let dx = world_pt.x - drag.start_world.x;
        let dy = world_pt.y - drag.start_world.y;
        let side = self.config.note_side();

        let mut next = self.history.present().clone();
        let mut moved_notes: Vec<EntityId> = Vec::with_capacity(drag.members.len() + 1);
        match drag.kind {
            EntityKind::Note => {
                if let Some(note) = next.note_mut(&drag.id) {
                    note.position = drag.origin.offset(dx, dy);
                    moved_notes.push(drag.id);
                }
            }
            EntityKind::Frame => {
                if let Some(frame) = next.frame_mut(&drag.id) {
                    frame.position = drag.origin.offset(dx, dy);
                }
                for (nid, start) in &drag.members {
                    if let Some(note) = next.note_mut(nid) {
                        note.position = start.offset(dx, dy);
                        moved_notes.push(*nid);
                    }
                }
            }
            EntityKind::Connection => return Action::None,
        }
        next.refresh_connections(&moved_notes, side);
        drag.moved = true;
        self.history.preview(next);
        Action::Previewed
    }

    /// Finish the drag: commit the last previewed board once. A release
    /// without a matching start, or without movement, changes nothing.
    pub fn drag_end(&mut self) -> Action {
        let InputState::Dragging(drag) = std::mem::take(&mut self.input) else {
            return Action::None;
        };
        let DragState { id, kind, base, moved, .. } = *drag;
        if !moved || base == *self.history.present() {
            return Action::None;
        }
        let label = match kind {
            EntityKind::Frame => "move frame",
            _ => "move",
        };
        self.history.commit_preview(base);
        self.save();
        debug!(id = %id, label, "drag committed");
        Action::Committed { label }
    }

    // --- Viewport ---

    /// Update viewport dimensions (CSS pixels).
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    /// Zoom by `factor` about screen point `pointer`, within the zoom limits.
    pub fn zoom_at(&mut self, pointer: Point, factor: f64) -> Action {
        if !pointer.is_finite() || !factor.is_finite() {
            return reject("zoom", EditError::NonFinite);
        }
        let before = self.camera;
        let target = self.camera.zoom * factor;
        self.camera.zoom_to(pointer, target, self.config.min_zoom, self.config.max_zoom);
        if self.camera == before {
            return Action::None;
        }
        Action::ViewChanged
    }

    /// One zoom step in, about the viewport center.
    pub fn zoom_in(&mut self) -> Action {
        self.zoom_at(self.viewport_center(), self.config.zoom_step)
    }

    /// One zoom step out, about the viewport center.
    pub fn zoom_out(&mut self) -> Action {
        self.zoom_at(self.viewport_center(), 1.0 / self.config.zoom_step)
    }

    /// Back to scale 1 with no pan.
    pub fn reset_view(&mut self) -> Action {
        if self.camera == Camera::default() {
            return Action::None;
        }
        self.camera = Camera::default();
        Action::ViewChanged
    }

    fn viewport_center(&self) -> Point {
        Point::new(self.viewport_width * 0.5, self.viewport_height * 0.5)
    }
}

fn reject(label: &'static str, err: EditError) -> Action {
    debug!(label, reason = %err, "intent rejected");
    Action::Rejected(err)
}
