//! Raw input events routed into engine intents.
//!
//! The host forwards pointer, wheel, and key events in screen space; this
//! layer converts to canvas space, hit-tests, drives the gesture state
//! machine, and returns the resulting actions.

#[cfg(test)]
#[path = "events_test.rs"]
mod events_test;

use crate::doc::EntityKind;
use crate::engine::{Action, Engine};
use crate::geometry::Point;
use crate::hit::hit_test;
use crate::input::{Button, InputState, Key, Modifiers, Shortcut, Tool, WheelDelta};

impl Engine {
    /// Non-finite screen points are dropped.
    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if !screen_pt.is_finite() {
            return Vec::new();
        }
        let world = self.camera.screen_to_world(screen_pt);
        self.ui.pointer_world = world;

        match button {
            Button::Primary => {}
            Button::Middle => {
                self.input = InputState::Panning { last_screen: screen_pt, moved: false };
                return Vec::new();
            }
            Button::Secondary => return Vec::new(),
        }

        let hit = hit_test(world, self.snapshot(), &self.camera, self.config().note_side());
        if let Some(hit) = hit {
            if self.ui.connect.is_armed() {
                return vec![self.pick(hit.id)];
            }
            let mut actions = vec![self.pick(hit.id)];
            if hit.kind != EntityKind::Connection {
                actions.push(self.drag_start(hit.id, world));
            }
            return actions;
        }

        match self.ui.tool {
            Tool::Note => {
                self.ui.tool = Tool::Select;
                let color = self.ui.active_color.clone();
                vec![self.add_note(world, color)]
            }
            Tool::Frame => {
                self.ui.tool = Tool::Select;
                let color = self.ui.active_color.clone();
                vec![self.add_frame(world, color)]
            }
            Tool::Select => {
                self.input = InputState::Panning { last_screen: screen_pt, moved: false };
                Vec::new()
            }
        }
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        if !screen_pt.is_finite() {
            return Vec::new();
        }
        let world = self.camera.screen_to_world(screen_pt);
        self.ui.pointer_world = world;

        if self.input.is_dragging() {
            return vec![self.drag_move(world)];
        }
        match &mut self.input {
            InputState::Idle | InputState::Dragging(_) => Vec::new(),
            InputState::Panning { last_screen, moved } => {
                let dx = screen_pt.x - last_screen.x;
                let dy = screen_pt.y - last_screen.y;
                *last_screen = screen_pt;
                if dx == 0.0 && dy == 0.0 {
                    return Vec::new();
                }
                *moved = true;
                self.camera.pan_by(dx, dy);
                vec![Action::ViewChanged]
            }
        }
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if screen_pt.is_finite() {
            self.ui.pointer_world = self.camera.screen_to_world(screen_pt);
        }

        match std::mem::take(&mut self.input) {
            InputState::Idle => Vec::new(),
            InputState::Panning { moved: true, .. } => Vec::new(),
            // A still click on empty background clears the selection.
            InputState::Panning { moved: false, .. } => vec![self.select(None)],
            dragging @ InputState::Dragging(_) => {
                self.input = dragging;
                vec![self.drag_end()]
            }
        }
    }

    /// The pointer was lost mid-gesture (focus change, capture lost).
    ///
    /// A drag keeps its last previewed position and commits it.
    pub fn on_pointer_cancel(&mut self) -> Vec<Action> {
        match std::mem::take(&mut self.input) {
            dragging @ InputState::Dragging(_) => {
                self.input = dragging;
                vec![self.drag_end()]
            }
            _ => Vec::new(),
        }
    }

    /// Zoom one step per event about the pointer; direction from the wheel sign.
    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, _modifiers: Modifiers) -> Vec<Action> {
        let step = self.config().zoom_step;
        let factor = if delta.dy > 0.0 {
            1.0 / step
        } else if delta.dy < 0.0 {
            step
        } else {
            return Vec::new();
        };
        vec![self.zoom_at(screen_pt, factor)]
    }

    /// Keyboard shortcuts. While a text field has focus only Escape fires.
    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        let Some(shortcut) = Shortcut::resolve(key, modifiers) else {
            return Vec::new();
        };
        if self.is_editing() && !shortcut.fires_while_editing() {
            return Vec::new();
        }
        let action = match shortcut {
            Shortcut::Delete => self.delete_selection(),
            Shortcut::Copy => self.copy_selection(),
            Shortcut::Paste => self.paste(self.ui.pointer_world),
            Shortcut::Undo => self.undo(),
            Shortcut::Redo => self.redo(),
            Shortcut::Escape => self.cancel(),
        };
        vec![action]
    }
}
