//! Pure layout and gesture-relay logic behind the portal shell components.
//!
//! Components render a [`RenderPlan`] and route pointer input through [`GestureTracker`] and
//! [`pointer_down_action`]; nothing here touches the DOM.

use portal_contract::{PortalCommand, PortalId, PortalKind};

use crate::{
    catalog,
    model::{PointerPosition, PortalDirectory, PortalRect, PortalTarget},
    reducer::PortalAction,
    stack::{move_rect, resize_rect},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// How visible portals are arranged.
pub enum ShellLayout {
    /// Absolutely positioned, draggable and resizable frames.
    #[default]
    FreeForm,
    /// Single column in stack order. Geometry is ignored.
    Stack,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalSlot {
    pub id: PortalId,
    pub kind: PortalKind,
    pub title: String,
    pub rect: PortalRect,
    pub z_index: u32,
    pub is_front: bool,
    pub peeking: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskbarEntry {
    pub id: PortalId,
    pub kind: PortalKind,
    pub title: String,
    pub glyph: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconBarEntry {
    pub kind: PortalKind,
    pub title: String,
    pub glyph: &'static str,
    pub open: bool,
    pub front: bool,
    pub minimized: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// What the shell should draw for one directory snapshot.
pub struct RenderPlan {
    /// Visible portals in paint order.
    pub slots: Vec<PortalSlot>,
    /// Minimized portals, front-most first.
    pub taskbar: Vec<TaskbarEntry>,
}

impl RenderPlan {
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty() && self.taskbar.is_empty()
    }
}

/// Builds the render plan for `directory`.
///
/// Free-form slots are painted back to front so DOM order agrees with `z_index`; stack slots
/// follow list order with the front-most portal first.
pub fn plan_render(directory: &PortalDirectory, layout: ShellLayout) -> RenderPlan {
    let front_id = directory.front_visible().map(|portal| portal.id.clone());
    let mut slots: Vec<PortalSlot> = directory
        .visible()
        .map(|portal| PortalSlot {
            id: portal.id.clone(),
            kind: portal.kind,
            title: portal.title.clone(),
            rect: portal.rect(),
            z_index: portal.z_index,
            is_front: front_id.as_ref() == Some(&portal.id),
            peeking: directory.peeking == Some(portal.kind),
        })
        .collect();
    if layout == ShellLayout::FreeForm {
        slots.reverse();
    }

    let taskbar = directory
        .minimized()
        .map(|portal| TaskbarEntry {
            id: portal.id.clone(),
            kind: portal.kind,
            title: portal.title.clone(),
            glyph: catalog::glyph(portal.kind),
        })
        .collect();

    RenderPlan { slots, taskbar }
}

/// Icon-bar buttons with their open/front state.
pub fn icon_bar_entries(directory: &PortalDirectory) -> Vec<IconBarEntry> {
    let front = directory.front_visible().map(|portal| portal.kind);
    catalog::icon_bar_kinds()
        .into_iter()
        .map(|kind| {
            let open = directory.by_kind(kind);
            IconBarEntry {
                kind,
                title: catalog::default_title(kind),
                glyph: catalog::glyph(kind),
                open: open.is_some(),
                front: front == Some(kind),
                minimized: open.is_some_and(|portal| portal.minimized),
            }
        })
        .collect()
}

/// Action for an icon-bar click: focus the open instance, otherwise open a new one.
pub fn icon_bar_action(directory: &PortalDirectory, kind: PortalKind, now_ms: u64) -> PortalAction {
    if directory.is_open(kind) {
        PortalAction::Focus {
            target: PortalTarget::Kind(kind),
        }
    } else {
        PortalAction::Open {
            kind,
            title: None,
            created_at_ms: now_ms,
        }
    }
}

/// Action for a taskbar click: restore and focus.
pub fn taskbar_action(id: &PortalId) -> PortalAction {
    PortalAction::Focus {
        target: PortalTarget::Id(id.clone()),
    }
}

/// Translates a widget's id-scoped command into a directory action.
pub fn command_action(id: &PortalId, command: PortalCommand) -> PortalAction {
    let id = id.clone();
    match command {
        PortalCommand::Close => PortalAction::Close {
            target: PortalTarget::Id(id),
        },
        PortalCommand::Focus => PortalAction::Focus {
            target: PortalTarget::Id(id),
        },
        PortalCommand::ToggleMinimize => PortalAction::ToggleMinimize { id },
        PortalCommand::UpdatePosition(position) => PortalAction::UpdatePosition { id, position },
        PortalCommand::UpdateSize(size) => PortalAction::UpdateSize { id, size },
    }
}

/// Focus-then-interact: a press on a portal that is not front-most focuses it first.
///
/// Returns `None` when the portal is already front-most or no longer exists.
pub fn pointer_down_action(directory: &PortalDirectory, id: &PortalId) -> Option<PortalAction> {
    directory.get(id)?;
    if directory.is_front(id) {
        return None;
    }
    Some(PortalAction::Focus {
        target: PortalTarget::Id(id.clone()),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Move,
    Resize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GestureSession {
    pub id: PortalId,
    pub kind: GestureKind,
    pub pointer_start: PointerPosition,
    pub rect_start: PortalRect,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Tracks one drag or resize at a time.
///
/// Intermediate pointer moves only update a preview rectangle. The directory sees a single
/// `UpdatePosition` or `UpdateSize` when the gesture ends.
pub struct GestureTracker {
    session: Option<GestureSession>,
    preview: Option<PortalRect>,
}

impl GestureTracker {
    /// Starts a gesture on `id`. Returns `false` when the portal is gone or minimized.
    pub fn begin(
        &mut self,
        directory: &PortalDirectory,
        id: &PortalId,
        kind: GestureKind,
        pointer: PointerPosition,
    ) -> bool {
        let Some(portal) = directory.get(id).filter(|portal| !portal.minimized) else {
            return false;
        };
        let rect = portal.rect();
        self.session = Some(GestureSession {
            id: id.clone(),
            kind,
            pointer_start: pointer,
            rect_start: rect,
        });
        self.preview = Some(rect);
        true
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    /// Updates the preview from the current pointer position.
    pub fn update(&mut self, pointer: PointerPosition) -> Option<PortalRect> {
        let session = self.session.as_ref()?;
        let dx = pointer.x - session.pointer_start.x;
        let dy = pointer.y - session.pointer_start.y;
        let rect = match session.kind {
            GestureKind::Move => move_rect(session.rect_start, dx, dy),
            GestureKind::Resize => resize_rect(session.rect_start, dx, dy),
        };
        self.preview = Some(rect);
        self.preview
    }

    /// Preview rectangle for `id` while it is being dragged or resized.
    pub fn preview_for(&self, id: &PortalId) -> Option<PortalRect> {
        let session = self.session.as_ref()?;
        if &session.id != id {
            return None;
        }
        self.preview
    }

    /// Ends the gesture and returns the commit action, if the geometry actually changed.
    pub fn end(&mut self) -> Option<PortalAction> {
        let session = self.session.take()?;
        let preview = self.preview.take()?;
        if preview == session.rect_start {
            return None;
        }
        Some(match session.kind {
            GestureKind::Move => PortalAction::UpdatePosition {
                id: session.id,
                position: preview.position(),
            },
            GestureKind::Resize => PortalAction::UpdateSize {
                id: session.id,
                size: preview.size(),
            },
        })
    }

    /// Drops the gesture without committing.
    pub fn cancel(&mut self) {
        self.session = None;
        self.preview = None;
    }
}

#[cfg(test)]
mod tests {
    use portal_contract::{PortalPosition, PortalSize};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::reducer::reduce_portals;

    fn directory_with(kinds: &[PortalKind]) -> PortalDirectory {
        let mut directory = PortalDirectory::default();
        for (idx, kind) in kinds.iter().enumerate() {
            reduce_portals(
                &mut directory,
                PortalAction::Open {
                    kind: *kind,
                    title: None,
                    created_at_ms: idx as u64,
                },
            )
            .expect("open");
        }
        directory
    }

    fn id_of(directory: &PortalDirectory, kind: PortalKind) -> PortalId {
        directory.by_kind(kind).expect("open").id.clone()
    }

    #[test]
    fn empty_directory_renders_nothing() {
        let plan = plan_render(&PortalDirectory::default(), ShellLayout::FreeForm);
        assert!(plan.is_empty());
    }

    #[test]
    fn minimized_portals_move_to_the_taskbar() {
        let mut directory = directory_with(&[PortalKind::Weather, PortalKind::Clock]);
        let clock = id_of(&directory, PortalKind::Clock);
        reduce_portals(
            &mut directory,
            PortalAction::ToggleMinimize { id: clock.clone() },
        )
        .expect("minimize");

        let plan = plan_render(&directory, ShellLayout::FreeForm);
        assert_eq!(plan.slots.len(), 1);
        assert_eq!(plan.slots[0].kind, PortalKind::Weather);
        assert!(plan.slots[0].is_front);
        assert_eq!(plan.taskbar.len(), 1);
        assert_eq!(plan.taskbar[0].id, clock);
        assert_eq!(taskbar_action(&clock), PortalAction::Focus {
            target: PortalTarget::Id(clock)
        });
    }

    #[test]
    fn free_form_paints_back_to_front_and_stack_lists_front_first() {
        let directory = directory_with(&[PortalKind::Weather, PortalKind::Clock, PortalKind::News]);

        let free: Vec<PortalKind> = plan_render(&directory, ShellLayout::FreeForm)
            .slots
            .iter()
            .map(|slot| slot.kind)
            .collect();
        assert_eq!(
            free,
            vec![PortalKind::Weather, PortalKind::Clock, PortalKind::News]
        );

        let stacked: Vec<PortalKind> = plan_render(&directory, ShellLayout::Stack)
            .slots
            .iter()
            .map(|slot| slot.kind)
            .collect();
        assert_eq!(
            stacked,
            vec![PortalKind::News, PortalKind::Clock, PortalKind::Weather]
        );
    }

    #[test]
    fn one_slot_per_open_portal() {
        let directory = directory_with(&[PortalKind::Weather, PortalKind::Weather, PortalKind::Clock]);
        assert_eq!(plan_render(&directory, ShellLayout::FreeForm).slots.len(), 2);
    }

    #[test]
    fn peeking_marks_the_matching_slot() {
        let mut directory = directory_with(&[PortalKind::Weather, PortalKind::Clock]);
        directory.peeking = Some(PortalKind::Weather);
        let plan = plan_render(&directory, ShellLayout::Stack);
        let peeking: Vec<PortalKind> = plan
            .slots
            .iter()
            .filter(|slot| slot.peeking)
            .map(|slot| slot.kind)
            .collect();
        assert_eq!(peeking, vec![PortalKind::Weather]);
    }

    #[test]
    fn icon_bar_reports_open_and_front_state() {
        let directory = directory_with(&[PortalKind::Weather, PortalKind::Clock]);
        let entries = icon_bar_entries(&directory);
        let weather = entries
            .iter()
            .find(|entry| entry.kind == PortalKind::Weather)
            .expect("weather button");
        let clock = entries
            .iter()
            .find(|entry| entry.kind == PortalKind::Clock)
            .expect("clock button");
        let news = entries
            .iter()
            .find(|entry| entry.kind == PortalKind::News)
            .expect("news button");

        assert!(weather.open && !weather.front);
        assert!(clock.open && clock.front);
        assert!(!news.open && !news.front);
    }

    #[test]
    fn icon_bar_click_opens_or_focuses() {
        let directory = directory_with(&[PortalKind::Weather]);
        assert_eq!(
            icon_bar_action(&directory, PortalKind::Weather, 9),
            PortalAction::Focus {
                target: PortalTarget::Kind(PortalKind::Weather)
            }
        );
        assert_eq!(
            icon_bar_action(&directory, PortalKind::Radio, 9),
            PortalAction::Open {
                kind: PortalKind::Radio,
                title: None,
                created_at_ms: 9
            }
        );
    }

    #[test]
    fn widget_commands_stay_scoped_to_their_portal() {
        let id = PortalId::from_raw("quicksave-3");
        assert_eq!(
            command_action(&id, PortalCommand::Close),
            PortalAction::Close {
                target: PortalTarget::Id(id.clone())
            }
        );
        assert_eq!(
            command_action(&id, PortalCommand::UpdatePosition(PortalPosition { x: 4, y: 2 })),
            PortalAction::UpdatePosition {
                id: id.clone(),
                position: PortalPosition { x: 4, y: 2 }
            }
        );
        assert_eq!(
            command_action(&id, PortalCommand::ToggleMinimize),
            PortalAction::ToggleMinimize { id }
        );
    }

    #[test]
    fn pressing_a_background_portal_focuses_it_first() {
        let directory = directory_with(&[PortalKind::Weather, PortalKind::Clock]);
        let weather = id_of(&directory, PortalKind::Weather);
        let clock = id_of(&directory, PortalKind::Clock);

        assert_eq!(
            pointer_down_action(&directory, &weather),
            Some(PortalAction::Focus {
                target: PortalTarget::Id(weather)
            })
        );
        assert_eq!(pointer_down_action(&directory, &clock), None);
        assert_eq!(
            pointer_down_action(&directory, &PortalId::from_raw("gone-1")),
            None
        );
    }

    #[test]
    fn drag_commits_a_single_position_on_end() {
        let directory = directory_with(&[PortalKind::Clock]);
        let clock = id_of(&directory, PortalKind::Clock);
        let mut tracker = GestureTracker::default();

        assert!(tracker.begin(
            &directory,
            &clock,
            GestureKind::Move,
            PointerPosition { x: 10, y: 10 }
        ));
        for step in 1..=5 {
            tracker.update(PointerPosition {
                x: 10 + step * 4,
                y: 10 + step,
            });
        }
        assert_eq!(
            tracker.preview_for(&clock).map(|rect| rect.position()),
            Some(PortalPosition { x: 120, y: 105 })
        );

        assert_eq!(
            tracker.end(),
            Some(PortalAction::UpdatePosition {
                id: clock.clone(),
                position: PortalPosition { x: 120, y: 105 }
            })
        );
        assert!(!tracker.is_active());
        assert_eq!(tracker.end(), None);
    }

    #[test]
    fn resize_commits_clamped_size() {
        let directory = directory_with(&[PortalKind::Clock]);
        let clock = id_of(&directory, PortalKind::Clock);
        let mut tracker = GestureTracker::default();
        tracker.begin(
            &directory,
            &clock,
            GestureKind::Resize,
            PointerPosition { x: 0, y: 0 },
        );
        tracker.update(PointerPosition { x: -200, y: 40 });

        assert_eq!(
            tracker.end(),
            Some(PortalAction::UpdateSize {
                id: clock,
                size: PortalSize {
                    width: crate::stack::MIN_PORTAL_WIDTH,
                    height: 240
                }
            })
        );
    }

    #[test]
    fn click_without_movement_commits_nothing() {
        let directory = directory_with(&[PortalKind::Clock]);
        let clock = id_of(&directory, PortalKind::Clock);
        let mut tracker = GestureTracker::default();
        tracker.begin(
            &directory,
            &clock,
            GestureKind::Move,
            PointerPosition { x: 3, y: 3 },
        );
        tracker.update(PointerPosition { x: 3, y: 3 });
        assert_eq!(tracker.end(), None);
    }

    #[test]
    fn gestures_on_missing_or_minimized_portals_do_not_start() {
        let mut directory = directory_with(&[PortalKind::Clock]);
        let clock = id_of(&directory, PortalKind::Clock);
        let mut tracker = GestureTracker::default();
        let origin = PointerPosition { x: 0, y: 0 };

        assert!(!tracker.begin(
            &directory,
            &PortalId::from_raw("news-1"),
            GestureKind::Move,
            origin
        ));
        reduce_portals(&mut directory, PortalAction::ToggleMinimize { id: clock.clone() })
            .expect("minimize");
        assert!(!tracker.begin(&directory, &clock, GestureKind::Move, origin));
        assert_eq!(tracker.update(origin), None);
    }

    #[test]
    fn cancel_drops_the_preview() {
        let directory = directory_with(&[PortalKind::Clock]);
        let clock = id_of(&directory, PortalKind::Clock);
        let mut tracker = GestureTracker::default();
        tracker.begin(
            &directory,
            &clock,
            GestureKind::Move,
            PointerPosition { x: 0, y: 0 },
        );
        tracker.update(PointerPosition { x: 50, y: 50 });
        tracker.cancel();
        assert_eq!(tracker.preview_for(&clock), None);
        assert_eq!(tracker.end(), None);
    }
}
