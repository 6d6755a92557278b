//! Input model: tools, modifier keys, shortcuts, connect-mode, and the
//! gesture state machine.
//!
//! `Tool` and `Modifiers` capture the user's intent at the time of a pointer
//! event. `ConnectMode` tracks the two-click connection flow. `InputState`
//! is the gesture being tracked between pointer-down and pointer-up,
//! carrying what is needed to compute deltas during the gesture and to
//! commit the result once on release.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::doc::{Color, EntityId, EntityKind, Snapshot};
use crate::geometry::Point;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Pointer / selection tool (default).
    #[default]
    Select,
    /// Place a sticky note on the next empty-canvas click.
    Note,
    /// Place a frame on the next empty-canvas click.
    Frame,
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser (e.g. `"Delete"`, `"Escape"`, `"z"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// Board-level keyboard commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Delete,
    Copy,
    Paste,
    Undo,
    Redo,
    Escape,
}

impl Shortcut {
    /// Map a key press to a shortcut, if it is one.
    #[must_use]
    pub fn resolve(key: &Key, modifiers: Modifiers) -> Option<Self> {
        match key.0.as_str() {
            "Delete" | "Backspace" => Some(Self::Delete),
            "Escape" => Some(Self::Escape),
            letter if modifiers.command() => match letter.to_ascii_lowercase().as_str() {
                "c" => Some(Self::Copy),
                "v" => Some(Self::Paste),
                "z" if modifiers.shift => Some(Self::Redo),
                "z" => Some(Self::Undo),
                _ => None,
            },
            _ => None,
        }
    }

    /// Whether this shortcut still fires while a text field has focus.
    #[must_use]
    pub fn fires_while_editing(self) -> bool {
        matches!(self, Self::Escape)
    }
}

/// Connect-mode state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectMode {
    /// Clicks select.
    #[default]
    Idle,
    /// Armed; the next note picked becomes the start.
    AwaitingFirstEndpoint,
    /// The start is chosen; the next different note completes the connection.
    AwaitingSecondEndpoint { start: EntityId },
}

impl ConnectMode {
    #[must_use]
    pub fn is_armed(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// Persistent UI state visible to the host.
#[derive(Debug, Clone)]
pub struct UiState {
    /// Currently active placement tool.
    pub tool: Tool,
    /// Color given to the next new entity.
    pub active_color: Color,
    pub connect: ConnectMode,
    /// The entity whose text field has focus, if any.
    pub editing: Option<EntityId>,
    /// Last known pointer position in canvas space; paste target.
    pub pointer_world: Point,
}

impl UiState {
    #[must_use]
    pub fn new(active_color: Color) -> Self {
        Self {
            tool: Tool::Select,
            active_color,
            connect: ConnectMode::Idle,
            editing: None,
            pointer_world: Point::default(),
        }
    }
}

/// Context for an entity drag, frozen at drag start.
#[derive(Debug, Clone)]
pub struct DragState {
    /// Entity being dragged.
    pub id: EntityId,
    pub kind: EntityKind,
    /// Canvas-space pointer position at drag start.
    pub start_world: Point,
    /// Entity position at drag start.
    pub origin: Point,
    /// Notes carried along with a frame and their positions at drag start.
    /// Empty for note drags. Not recomputed while the drag runs.
    pub members: Vec<(EntityId, Point)>,
    /// Board as it was before the drag; becomes the undo entry on release.
    pub base: Snapshot,
    /// Whether any pointer movement has been applied.
    pub moved: bool,
}

/// Internal state for the gesture state machine.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is panning the canvas by dragging empty background.
    Panning {
        /// Screen-space position of the previous pointer event, used to compute pan delta.
        last_screen: Point,
        /// Whether the pointer has moved since pointer-down; a still release is a click.
        moved: bool,
    },
    /// The user is moving a note, or a frame and its contents.
    Dragging(Box<DragState>),
}

impl InputState {
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging(_))
    }
}
