#![allow(clippy::float_cmp)]

use super::*;
use crate::config::BoardConfig;
use crate::doc::{Color, EntityId, NamedColor};
use crate::engine::EditError;
use crate::input::ConnectMode;

// =============================================================
// Helpers
// =============================================================

fn engine() -> Engine {
    let mut e = Engine::new(BoardConfig::default());
    e.set_viewport(800.0, 600.0);
    e
}

fn no_modifiers() -> Modifiers {
    Modifiers::default()
}

fn ctrl_modifier() -> Modifiers {
    Modifiers { ctrl: true, ..Modifiers::default() }
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn key(name: &str) -> Key {
    Key::new(name)
}

fn has_action<F>(actions: &[Action], pred: F) -> bool
where
    F: Fn(&Action) -> bool,
{
    actions.iter().any(pred)
}

fn has_commit(actions: &[Action]) -> bool {
    has_action(actions, |a| matches!(a, Action::Committed { .. }))
}

fn add_note(e: &mut Engine, x: f64, y: f64) -> EntityId {
    e.add_note(pt(x, y), Color::Named(NamedColor::Yellow));
    e.selection().unwrap()
}

fn click(e: &mut Engine, at: Point) -> Vec<Action> {
    let mut actions = e.on_pointer_down(at, Button::Primary, no_modifiers());
    actions.extend(e.on_pointer_up(at, Button::Primary, no_modifiers()));
    actions
}

// =============================================================
// Pointer: selection and placement
// =============================================================

#[test]
fn click_on_note_selects_it() {
    let mut e = engine();
    let a = add_note(&mut e, 0.0, 0.0);
    add_note(&mut e, 300.0, 0.0);
    let actions = click(&mut e, pt(50.0, 50.0));
    assert!(has_action(&actions, |x| *x == Action::SelectionChanged(Some(a))));
    assert_eq!(e.selection(), Some(a));
    assert!(!has_commit(&actions));
    assert!(!e.is_dragging());
}

#[test]
fn click_on_empty_canvas_deselects() {
    let mut e = engine();
    add_note(&mut e, 0.0, 0.0);
    let actions = click(&mut e, pt(500.0, 500.0));
    assert_eq!(actions, vec![Action::SelectionChanged(None)]);
    assert_eq!(e.selection(), None);
}

#[test]
fn note_tool_places_note_then_reverts_to_select() {
    let mut e = engine();
    e.set_tool(Tool::Note);
    let actions = e.on_pointer_down(pt(200.0, 100.0), Button::Primary, no_modifiers());
    assert_eq!(actions, vec![Action::Committed { label: "add note" }]);
    let id = e.selection().unwrap();
    assert_eq!(e.snapshot().note(&id).unwrap().position, pt(200.0, 100.0));
    assert_eq!(e.ui.tool, Tool::Select);
}

#[test]
fn frame_tool_places_frame_in_canvas_space() {
    let mut e = engine();
    e.camera.pan_by(100.0, 50.0);
    e.zoom_at(pt(100.0, 50.0), 2.0);
    e.set_tool(Tool::Frame);
    e.on_pointer_down(pt(300.0, 250.0), Button::Primary, no_modifiers());
    let id = e.selection().unwrap();
    assert_eq!(e.snapshot().frame(&id).unwrap().position, pt(100.0, 100.0));
}

#[test]
fn secondary_button_is_ignored() {
    let mut e = engine();
    add_note(&mut e, 0.0, 0.0);
    assert!(e.on_pointer_down(pt(10.0, 10.0), Button::Secondary, no_modifiers()).is_empty());
    assert!(!e.is_dragging());
}

// =============================================================
// Pointer: drag and pan
// =============================================================

#[test]
fn dragging_note_commits_once_on_release() {
    let mut e = engine();
    let a = add_note(&mut e, 0.0, 0.0);
    let past = e.history().past_len();

    e.on_pointer_down(pt(10.0, 10.0), Button::Primary, no_modifiers());
    assert!(e.is_dragging());
    for x in [20.0, 40.0, 60.0] {
        assert_eq!(e.on_pointer_move(pt(x, 10.0), no_modifiers()), vec![Action::Previewed]);
    }
    assert_eq!(e.history().past_len(), past);
    let actions = e.on_pointer_up(pt(60.0, 10.0), Button::Primary, no_modifiers());
    assert_eq!(actions, vec![Action::Committed { label: "move" }]);
    assert_eq!(e.history().past_len(), past + 1);
    assert_eq!(e.snapshot().note(&a).unwrap().position, pt(50.0, 0.0));
}

#[test]
fn pressing_a_note_selects_it_before_dragging() {
    let mut e = engine();
    let a = add_note(&mut e, 0.0, 0.0);
    let b = add_note(&mut e, 300.0, 0.0);
    assert_eq!(e.selection(), Some(b));
    e.on_pointer_down(pt(10.0, 10.0), Button::Primary, no_modifiers());
    e.on_pointer_move(pt(30.0, 30.0), no_modifiers());
    e.on_pointer_up(pt(30.0, 30.0), Button::Primary, no_modifiers());
    assert_eq!(e.selection(), Some(a));
    assert!(!e.is_dragging());
}

#[test]
fn dragging_frame_from_canvas_moves_contents() {
    let mut e = engine();
    e.add_frame(pt(0.0, 0.0), Color::Named(NamedColor::Blue));
    let f = e.selection().unwrap();
    let n = add_note(&mut e, 20.0, 20.0);
    e.on_pointer_down(pt(250.0, 180.0), Button::Primary, no_modifiers());
    e.on_pointer_move(pt(350.0, 230.0), no_modifiers());
    e.on_pointer_up(pt(350.0, 230.0), Button::Primary, no_modifiers());
    assert_eq!(e.snapshot().frame(&f).unwrap().position, pt(100.0, 50.0));
    assert_eq!(e.snapshot().note(&n).unwrap().position, pt(120.0, 70.0));
}

#[test]
fn pointer_cancel_commits_last_preview() {
    let mut e = engine();
    let a = add_note(&mut e, 0.0, 0.0);
    e.on_pointer_down(pt(10.0, 10.0), Button::Primary, no_modifiers());
    e.on_pointer_move(pt(110.0, 10.0), no_modifiers());
    assert_eq!(e.on_pointer_cancel(), vec![Action::Committed { label: "move" }]);
    assert_eq!(e.snapshot().note(&a).unwrap().position, pt(100.0, 0.0));
    assert!(e.on_pointer_cancel().is_empty());
}

#[test]
fn background_drag_pans_without_deselecting() {
    let mut e = engine();
    let a = add_note(&mut e, 0.0, 0.0);
    e.on_pointer_down(pt(500.0, 500.0), Button::Primary, no_modifiers());
    assert_eq!(e.on_pointer_move(pt(520.0, 490.0), no_modifiers()), vec![Action::ViewChanged]);
    assert!(e.on_pointer_up(pt(520.0, 490.0), Button::Primary, no_modifiers()).is_empty());
    assert_eq!((e.camera().pan_x, e.camera().pan_y), (20.0, -10.0));
    assert_eq!(e.selection(), Some(a));
}

#[test]
fn middle_button_pans_over_entities() {
    let mut e = engine();
    let a = add_note(&mut e, 0.0, 0.0);
    e.on_pointer_down(pt(10.0, 10.0), Button::Middle, no_modifiers());
    e.on_pointer_move(pt(40.0, 10.0), no_modifiers());
    e.on_pointer_up(pt(40.0, 10.0), Button::Middle, no_modifiers());
    assert_eq!(e.camera().pan_x, 30.0);
    assert_eq!(e.snapshot().note(&a).unwrap().position, pt(0.0, 0.0));
}

#[test]
fn pointer_move_tracks_paste_target() {
    let mut e = engine();
    e.camera.pan_by(-100.0, 0.0);
    e.on_pointer_move(pt(50.0, 60.0), no_modifiers());
    assert_eq!(e.ui.pointer_world, pt(150.0, 60.0));
}

// =============================================================
// Pointer: connect mode
// =============================================================

#[test]
fn connect_mode_clicks_link_notes_without_dragging() {
    let mut e = engine();
    let a = add_note(&mut e, 0.0, 0.0);
    let b = add_note(&mut e, 300.0, 0.0);
    e.toggle_connect_mode();

    let first = click(&mut e, pt(50.0, 50.0));
    assert_eq!(first[0], Action::ConnectModeChanged(ConnectMode::AwaitingSecondEndpoint { start: a }));
    assert!(!e.is_dragging());
    let second = click(&mut e, pt(350.0, 50.0));
    assert!(has_commit(&second));

    let conn = &e.snapshot().connections[0];
    assert_eq!((conn.start_id, conn.end_id), (a, b));
    assert_eq!(e.connect_mode(), ConnectMode::AwaitingFirstEndpoint);
}

#[test]
fn connect_mode_click_on_frame_is_rejected() {
    let mut e = engine();
    e.add_frame(pt(0.0, 0.0), Color::Named(NamedColor::Blue));
    e.toggle_connect_mode();
    let actions = click(&mut e, pt(280.0, 180.0));
    assert!(has_action(&actions, |a| matches!(a, Action::Rejected(EditError::WrongKind { .. }))));
    assert_eq!(e.connect_mode(), ConnectMode::AwaitingFirstEndpoint);
}

// =============================================================
// Wheel
// =============================================================

#[test]
fn wheel_zooms_about_pointer() {
    let mut e = engine();
    let pointer = pt(300.0, 200.0);
    let before = e.camera().screen_to_world(pointer);
    assert_eq!(e.on_wheel(pointer, WheelDelta { dx: 0.0, dy: -100.0 }, no_modifiers()), vec![Action::ViewChanged]);
    assert!((e.camera().zoom - 1.1).abs() < 1e-12);
    let after = e.camera().screen_to_world(pointer);
    assert!((before.x - after.x).abs() < 1e-9 && (before.y - after.y).abs() < 1e-9);

    e.on_wheel(pointer, WheelDelta { dx: 0.0, dy: 3.0 }, no_modifiers());
    assert!((e.camera().zoom - 1.0).abs() < 1e-12);
}

#[test]
fn horizontal_wheel_does_nothing() {
    let mut e = engine();
    assert!(e.on_wheel(pt(0.0, 0.0), WheelDelta { dx: 50.0, dy: 0.0 }, no_modifiers()).is_empty());
    assert_eq!(e.camera(), crate::camera::Camera::default());
}

#[test]
fn wheel_at_non_finite_pointer_keeps_camera() {
    let mut e = engine();
    let actions = e.on_wheel(pt(f64::NAN, 10.0), WheelDelta { dx: 0.0, dy: -100.0 }, no_modifiers());
    assert_eq!(actions, vec![Action::Rejected(EditError::NonFinite)]);
    assert!(e.on_wheel(pt(10.0, 10.0), WheelDelta { dx: 0.0, dy: f64::NAN }, no_modifiers()).is_empty());
    assert_eq!(e.camera(), crate::camera::Camera::default());
}

// =============================================================
// Pointer: non-finite coordinates
// =============================================================

#[test]
fn tool_click_at_non_finite_point_places_nothing() {
    let mut e = engine();
    e.set_tool(Tool::Note);
    assert!(e.on_pointer_down(pt(f64::NAN, 100.0), Button::Primary, no_modifiers()).is_empty());
    assert!(e.snapshot().is_empty());
    assert_eq!(e.ui.tool, Tool::Note);
}

#[test]
fn non_finite_pointer_move_keeps_drag_and_pan_intact() {
    let mut e = engine();
    let a = add_note(&mut e, 0.0, 0.0);
    e.on_pointer_down(pt(10.0, 10.0), Button::Primary, no_modifiers());
    e.on_pointer_move(pt(30.0, 10.0), no_modifiers());
    assert!(e.on_pointer_move(pt(f64::INFINITY, f64::NAN), no_modifiers()).is_empty());
    assert_eq!(e.on_pointer_up(pt(f64::NAN, 0.0), Button::Primary, no_modifiers()), vec![Action::Committed { label: "move" }]);
    assert_eq!(e.snapshot().note(&a).unwrap().position, pt(20.0, 0.0));
    assert!(e.ui.pointer_world.is_finite());

    e.on_pointer_down(pt(500.0, 500.0), Button::Primary, no_modifiers());
    assert!(e.on_pointer_move(pt(f64::NAN, 500.0), no_modifiers()).is_empty());
    e.on_pointer_up(pt(500.0, 500.0), Button::Primary, no_modifiers());
    assert_eq!(e.camera(), crate::camera::Camera::default());
}

// =============================================================
// Keyboard
// =============================================================

#[test]
fn delete_key_removes_selection() {
    let mut e = engine();
    let a = add_note(&mut e, 0.0, 0.0);
    assert_eq!(e.on_key_down(&key("Backspace"), no_modifiers()), vec![Action::Committed { label: "delete" }]);
    assert!(e.snapshot().note(&a).is_none());
}

#[test]
fn copy_paste_shortcuts_paste_at_pointer() {
    let mut e = engine();
    add_note(&mut e, 0.0, 0.0);
    assert_eq!(e.on_key_down(&key("c"), ctrl_modifier()), vec![Action::Copied(crate::doc::EntityKind::Note)]);
    e.on_pointer_move(pt(400.0, 300.0), no_modifiers());
    e.on_key_down(&key("v"), ctrl_modifier());
    let pasted = e.selection().unwrap();
    assert_eq!(e.snapshot().note(&pasted).unwrap().position, pt(400.0, 300.0));
}

#[test]
fn undo_redo_shortcuts() {
    let mut e = engine();
    add_note(&mut e, 0.0, 0.0);
    assert_eq!(e.on_key_down(&key("z"), ctrl_modifier()), vec![Action::Undone]);
    assert!(e.snapshot().is_empty());
    let redo = Modifiers { shift: true, ..ctrl_modifier() };
    assert_eq!(e.on_key_down(&key("Z"), redo), vec![Action::Redone]);
    assert_eq!(e.snapshot().notes.len(), 1);
}

#[test]
fn shortcuts_are_suppressed_while_editing() {
    let mut e = engine();
    let a = add_note(&mut e, 0.0, 0.0);
    e.begin_text_edit(a);
    assert!(e.on_key_down(&key("Delete"), no_modifiers()).is_empty());
    assert!(e.on_key_down(&key("z"), ctrl_modifier()).is_empty());
    assert!(e.snapshot().note(&a).is_some());
    assert_eq!(e.on_key_down(&key("Escape"), no_modifiers()), vec![Action::EditCancelled]);
    assert!(!e.is_editing());
}

#[test]
fn plain_letters_are_not_shortcuts() {
    let mut e = engine();
    add_note(&mut e, 0.0, 0.0);
    assert!(e.on_key_down(&key("z"), no_modifiers()).is_empty());
    assert!(e.on_key_down(&key("Enter"), no_modifiers()).is_empty());
}
