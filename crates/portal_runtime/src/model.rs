use portal_contract::{PortalId, PortalKind, PortalPosition, PortalSize, PortalView};
use serde::{Deserialize, Serialize};

/// First cascade offset for newly opened portals.
pub const CASCADE_ORIGIN: i32 = 100;
/// Per-portal cascade step.
pub const CASCADE_STEP: i32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalInstance {
    pub id: PortalId,
    #[serde(rename = "type")]
    pub kind: PortalKind,
    pub title: String,
    pub position: PortalPosition,
    pub size: PortalSize,
    pub z_index: u32,
    pub minimized: bool,
}

impl PortalInstance {
    pub fn rect(&self) -> PortalRect {
        PortalRect {
            x: self.position.x,
            y: self.position.y,
            w: self.size.width,
            h: self.size.height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl PortalRect {
    pub fn position(self) -> PortalPosition {
        PortalPosition {
            x: self.x,
            y: self.y,
        }
    }

    pub fn size(self) -> PortalSize {
        PortalSize {
            width: self.w,
            height: self.h,
        }
    }
}

/// Addresses a portal either by id or by kind.
///
/// Kind addressing is what the icon bar uses; at most one portal per kind is open, so it is
/// unambiguous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortalTarget {
    Id(PortalId),
    Kind(PortalKind),
}

impl PortalTarget {
    pub fn matches(&self, portal: &PortalInstance) -> bool {
        match self {
            Self::Id(id) => &portal.id == id,
            Self::Kind(kind) => portal.kind == *kind,
        }
    }
}

impl From<PortalId> for PortalTarget {
    fn from(id: PortalId) -> Self {
        Self::Id(id)
    }
}

impl From<&PortalId> for PortalTarget {
    fn from(id: &PortalId) -> Self {
        Self::Id(id.clone())
    }
}

impl From<PortalKind> for PortalTarget {
    fn from(kind: PortalKind) -> Self {
        Self::Kind(kind)
    }
}

/// In-memory portal directory.
///
/// `portals` doubles as the stacking order: index 0 is front-most. `z_index` is kept in step
/// with list order by [`crate::stack::normalize_portal_stack`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PortalDirectory {
    pub portals: Vec<PortalInstance>,
    #[serde(skip)]
    pub peeking: Option<PortalKind>,
    #[serde(skip)]
    pub hydrated: bool,
}

impl PortalDirectory {
    pub fn len(&self) -> usize {
        self.portals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.portals.is_empty()
    }

    pub fn position_of(&self, target: &PortalTarget) -> Option<usize> {
        self.portals.iter().position(|portal| target.matches(portal))
    }

    pub fn find(&self, target: &PortalTarget) -> Option<&PortalInstance> {
        self.portals.iter().find(|portal| target.matches(portal))
    }

    pub fn get(&self, id: &PortalId) -> Option<&PortalInstance> {
        self.portals.iter().find(|portal| &portal.id == id)
    }

    pub fn get_mut(&mut self, id: &PortalId) -> Option<&mut PortalInstance> {
        self.portals.iter_mut().find(|portal| &portal.id == id)
    }

    pub fn by_kind(&self, kind: PortalKind) -> Option<&PortalInstance> {
        self.portals.iter().find(|portal| portal.kind == kind)
    }

    pub fn is_open(&self, kind: PortalKind) -> bool {
        self.by_kind(kind).is_some()
    }

    /// Front-most portal, minimized or not.
    pub fn front(&self) -> Option<&PortalInstance> {
        self.portals.first()
    }

    /// Front-most portal that is actually on screen.
    pub fn front_visible(&self) -> Option<&PortalInstance> {
        self.portals.iter().find(|portal| !portal.minimized)
    }

    pub fn is_front(&self, id: &PortalId) -> bool {
        self.front_visible().is_some_and(|portal| &portal.id == id)
    }

    pub fn visible(&self) -> impl Iterator<Item = &PortalInstance> {
        self.portals.iter().filter(|portal| !portal.minimized)
    }

    pub fn minimized(&self) -> impl Iterator<Item = &PortalInstance> {
        self.portals.iter().filter(|portal| portal.minimized)
    }

    pub fn view_of(&self, id: &PortalId) -> Option<PortalView> {
        let portal = self.get(id)?;
        Some(PortalView {
            id: portal.id.clone(),
            kind: portal.kind,
            title: portal.title.clone(),
            minimized: portal.minimized,
            is_front: self.is_front(id),
        })
    }
}

/// Cascade position for the `index`-th portal.
pub fn cascade_position(index: usize) -> PortalPosition {
    let offset = CASCADE_ORIGIN + CASCADE_STEP * index as i32;
    PortalPosition {
        x: offset,
        y: offset,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}
