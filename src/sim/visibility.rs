//! Line-of-sight through rectangular obstacles
//!
//! Sight is a straight segment tested against each obstacle edge with the
//! parametric intersection `p1 + t(p2 - p1) = p3 + u(p4 - p3)`, `t, u ∈ [0, 1]`.
//! Parallel and coincident segments never intersect.
//!
//! Permeable obstacles are one-way cover: they block the seeker's sight into
//! and through them, but a hider looks out of (and across) them freely.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::circle_overlaps_rect;
use super::obstacle::Obstacle;

/// Who is looking. Decides how permeable obstacles are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Viewer {
    Seeker,
    Hider,
}

/// Whether segments `p1-p2` and `p3-p4` intersect
pub fn segments_intersect(p1: Vec2, p2: Vec2, p3: Vec2, p4: Vec2) -> bool {
    let d1 = p2 - p1;
    let d2 = p4 - p3;
    let denom = d2.y * d1.x - d2.x * d1.y;
    if denom == 0.0 {
        return false;
    }

    let offset = p1 - p3;
    let t = (d2.x * offset.y - d2.y * offset.x) / denom;
    let u = (d1.x * offset.y - d1.y * offset.x) / denom;

    (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)
}

/// Whether segment `a-b` crosses any edge of the obstacle
///
/// A segment lying entirely inside the rectangle crosses no edge.
pub fn segment_intersects_rect(a: Vec2, b: Vec2, obstacle: &Obstacle) -> bool {
    // Canonical endpoint order keeps the test exactly symmetric in a and b
    let (a, b) = if (a.x, a.y) <= (b.x, b.y) { (a, b) } else { (b, a) };
    obstacle
        .edges()
        .iter()
        .any(|&(p3, p4)| segments_intersect(a, b, p3, p4))
}

/// Whether a circle is hidden inside any permeable obstacle
pub fn is_concealed(center: Vec2, radius: f32, obstacles: &[Obstacle]) -> bool {
    obstacles
        .iter()
        .any(|o| o.permeable && circle_overlaps_rect(center, radius, o))
}

/// Line-of-sight from `from` to `to` within `view_radius`
///
/// A zero view radius sees nothing.
pub fn can_see(
    viewer: Viewer,
    from: Vec2,
    to: Vec2,
    view_radius: f32,
    obstacles: &[Obstacle],
) -> bool {
    if view_radius <= 0.0 || from.distance(to) > view_radius {
        return false;
    }

    !obstacles.iter().any(|o| {
        if o.permeable {
            viewer == Viewer::Seeker
                && (o.contains_point(to) || segment_intersects_rect(from, to, o))
        } else {
            segment_intersects_rect(from, to, o)
        }
    })
}
