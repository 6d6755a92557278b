#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::Camera;
use crate::consts::CONNECTION_HIT_PX;
use crate::doc::{EntityId, EntityKind, Snapshot};
use crate::geometry::{self, Point};

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub id: EntityId,
    pub kind: EntityKind,
}

/// Which entity (if any) is under `world_pt`.
///
/// Notes sit above connections, which sit above frames. Within a layer the
/// most recently added entity wins. Connection slop is a fixed screen
/// distance, so it shrinks in canvas units as the view zooms in.
#[must_use]
pub fn hit_test(world_pt: Point, doc: &Snapshot, camera: &Camera, note_side: f64) -> Option<Hit> {
    if let Some(note) = doc.notes.iter().rev().find(|n| n.rect(note_side).contains(world_pt)) {
        return Some(Hit { id: note.id, kind: EntityKind::Note });
    }

    let slop = camera.screen_dist_to_world(CONNECTION_HIT_PX);
    let near_line = doc.connections.iter().rev().find(|c| {
        let [x1, y1, x2, y2] = c.points;
        geometry::distance_to_segment(world_pt, Point::new(x1, y1), Point::new(x2, y2)) <= slop
    });
    if let Some(conn) = near_line {
        return Some(Hit { id: conn.id, kind: EntityKind::Connection });
    }

    doc.frames
        .iter()
        .rev()
        .find(|f| f.rect().contains(world_pt))
        .map(|f| Hit { id: f.id, kind: EntityKind::Frame })
}
