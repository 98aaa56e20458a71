//! Stacking helpers shared by the directory reducer.

use crate::model::{PortalDirectory, PortalRect, PortalTarget};

/// Minimum committed portal width.
pub const MIN_PORTAL_WIDTH: i32 = 220;
/// Minimum committed portal height.
pub const MIN_PORTAL_HEIGHT: i32 = 140;

/// Moves the targeted portal to the front and restores it when minimized.
///
/// Returns `false` when no portal matches. Relative order of the other portals is preserved, and
/// a portal that is already front-most and visible is left where it is.
pub fn bring_to_front(directory: &mut PortalDirectory, target: &PortalTarget) -> bool {
    let Some(index) = directory.position_of(target) else {
        return false;
    };

    if index != 0 {
        let portal = directory.portals.remove(index);
        directory.portals.insert(0, portal);
    }
    if let Some(front) = directory.portals.first_mut() {
        front.minimized = false;
    }
    normalize_portal_stack(directory);
    true
}

/// Re-derives `z_index` from list order so the front portal carries the highest value.
pub fn normalize_portal_stack(directory: &mut PortalDirectory) {
    let len = directory.portals.len();
    for (idx, portal) in directory.portals.iter_mut().enumerate() {
        portal.z_index = (len - idx) as u32;
    }
}

/// Clamps a committed size to the minimum portal size.
pub fn clamp_rect(rect: PortalRect) -> PortalRect {
    PortalRect {
        w: rect.w.max(MIN_PORTAL_WIDTH),
        h: rect.h.max(MIN_PORTAL_HEIGHT),
        ..rect
    }
}

/// Applies a pointer delta to a resize that anchors the top-left corner.
pub fn resize_rect(start: PortalRect, dx: i32, dy: i32) -> PortalRect {
    clamp_rect(PortalRect {
        w: start.w + dx,
        h: start.h + dy,
        ..start
    })
}

/// Applies a pointer delta to a move.
pub fn move_rect(start: PortalRect, dx: i32, dy: i32) -> PortalRect {
    PortalRect {
        x: start.x + dx,
        y: start.y + dy,
        ..start
    }
}
