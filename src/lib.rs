//! Board state engine for an infinite-canvas whiteboard.
//!
//! Users place, move, resize, color, and connect sticky notes and frames on
//! a pannable, zoomable surface, with undo/redo and local persistence. This
//! crate owns everything except drawing: the entity model, snapshot
//! history, frame containment and connection geometry, screen/canvas
//! transforms, and the routing of raw input into board intents. The host is
//! responsible only for forwarding DOM-style events and redrawing from
//! [`engine::Engine::snapshot`] when an [`engine::Action`] says so.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | The [`engine::Engine`] and every board intent |
//! | [`events`] | Pointer, wheel, and keyboard routing into intents |
//! | [`doc`] | Notes, frames, connections, colors, and the [`doc::Snapshot`] |
//! | [`history`] | Bounded undo/redo over snapshots |
//! | [`geometry`] | Transforms, overlap ratio, containment, connection endpoints |
//! | [`camera`] | Pan/zoom camera and background grid |
//! | [`input`] | Tools, shortcuts, connect-mode, and the gesture state machine |
//! | [`hit`] | Hit-testing against board entities |
//! | [`clipboard`] | Per-kind copy/paste slots |
//! | [`persist`] | Snapshot storage backends and load/save |
//! | [`config`] | Board configuration and environment overrides |
//! | [`consts`] | Shared numeric constants (size bounds, zoom limits, etc.) |

pub mod camera;
pub mod clipboard;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod events;
pub mod geometry;
pub mod history;
pub mod hit;
pub mod input;
pub mod persist;
