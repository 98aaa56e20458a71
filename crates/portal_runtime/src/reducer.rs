//! Reducer actions, side-effect intents, and transition logic for the portal directory.

use std::collections::BTreeSet;

use leptos::logging;
use portal_contract::{PortalId, PortalKind, PortalPosition, PortalSize};
use thiserror::Error;

use crate::{
    catalog,
    model::{cascade_position, PortalDirectory, PortalInstance, PortalRect, PortalTarget},
    persistence::{PersistedDocument, PortalIdentity},
    stack::{bring_to_front, clamp_rect, normalize_portal_stack},
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_portals`] to mutate [`PortalDirectory`].
pub enum PortalAction {
    /// Open a portal of `kind`, or focus the one already open.
    Open {
        /// Kind to open.
        kind: PortalKind,
        /// Display label. Falls back to the catalog title.
        title: Option<String>,
        /// Creation timestamp used to mint the id.
        created_at_ms: u64,
    },
    /// Remove a portal.
    Close {
        /// Portal to close.
        target: PortalTarget,
    },
    /// Bring a portal to the front, restoring it when minimized.
    Focus {
        /// Portal to focus.
        target: PortalTarget,
    },
    /// Flip a portal's minimized flag.
    ToggleMinimize {
        /// Portal to toggle.
        id: PortalId,
    },
    /// Commit a new position.
    UpdatePosition {
        /// Portal to move.
        id: PortalId,
        /// New top-left corner.
        position: PortalPosition,
    },
    /// Commit a new size.
    UpdateSize {
        /// Portal to resize.
        id: PortalId,
        /// New outer size.
        size: PortalSize,
    },
    /// Populate the directory from the persisted document. Only the first call has any effect.
    Hydrate {
        /// Document read at startup.
        document: PersistedDocument,
    },
    /// Mark a kind as peeked from the icon bar, or clear the peek.
    SetPeeking {
        /// Kind being peeked.
        kind: Option<PortalKind>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Side-effect intents emitted by [`reduce_portals`].
pub enum RuntimeEffect {
    /// Persist the open-portal list.
    PersistDirectory,
    /// Move keyboard focus into the newly opened portal.
    FocusPortalInput(PortalId),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for actions that reference a portal no longer in the directory.
pub enum ReducerError {
    /// The target portal was not found.
    #[error("portal not found")]
    PortalNotFound,
}

/// Applies a [`PortalAction`] to the directory and collects resulting side effects.
///
/// # Errors
///
/// Returns [`ReducerError::PortalNotFound`] when an action references a portal that is not
/// present. The directory is left untouched in that case.
///
/// Before [`PortalAction::Hydrate`] has been applied no [`RuntimeEffect::PersistDirectory`] is
/// emitted; the stored layout is still unread and a write would replace it.
pub fn reduce_portals(
    directory: &mut PortalDirectory,
    action: PortalAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let mut effects = apply_action(directory, action)?;
    if !directory.hydrated {
        effects.retain(|effect| *effect != RuntimeEffect::PersistDirectory);
    }
    Ok(effects)
}

fn apply_action(
    directory: &mut PortalDirectory,
    action: PortalAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let mut effects = Vec::new();
    match action {
        PortalAction::Open {
            kind,
            title,
            created_at_ms,
        } => {
            if directory.is_open(kind) {
                bring_to_front(directory, &PortalTarget::Kind(kind));
                effects.push(RuntimeEffect::PersistDirectory);
                return Ok(effects);
            }

            let id = mint_unique_id(directory, kind, created_at_ms);
            let instance = PortalInstance {
                id: id.clone(),
                kind,
                title: title.unwrap_or_else(|| catalog::default_title(kind)),
                position: cascade_position(directory.len()),
                size: catalog::default_size(kind),
                z_index: 0,
                minimized: false,
            };
            directory.portals.insert(0, instance);
            normalize_portal_stack(directory);
            effects.push(RuntimeEffect::PersistDirectory);
            effects.push(RuntimeEffect::FocusPortalInput(id));
        }
        PortalAction::Close { target } => {
            let before_len = directory.len();
            directory.portals.retain(|portal| !target.matches(portal));
            if directory.len() == before_len {
                return Err(ReducerError::PortalNotFound);
            }
            if directory
                .peeking
                .is_some_and(|kind| !directory.is_open(kind))
            {
                directory.peeking = None;
            }
            normalize_portal_stack(directory);
            effects.push(RuntimeEffect::PersistDirectory);
        }
        PortalAction::Focus { target } => {
            if !bring_to_front(directory, &target) {
                return Err(ReducerError::PortalNotFound);
            }
            effects.push(RuntimeEffect::PersistDirectory);
        }
        PortalAction::ToggleMinimize { id } => {
            let portal = directory
                .get_mut(&id)
                .ok_or(ReducerError::PortalNotFound)?;
            portal.minimized = !portal.minimized;
            effects.push(RuntimeEffect::PersistDirectory);
        }
        PortalAction::UpdatePosition { id, position } => {
            let portal = directory
                .get_mut(&id)
                .ok_or(ReducerError::PortalNotFound)?;
            portal.position = position;
            effects.push(RuntimeEffect::PersistDirectory);
        }
        PortalAction::UpdateSize { id, size } => {
            let portal = directory
                .get_mut(&id)
                .ok_or(ReducerError::PortalNotFound)?;
            let rect = clamp_rect(PortalRect {
                w: size.width,
                h: size.height,
                ..portal.rect()
            });
            portal.size = rect.size();
            effects.push(RuntimeEffect::PersistDirectory);
        }
        PortalAction::Hydrate { document } => {
            if directory.hydrated {
                return Ok(effects);
            }
            directory.hydrated = true;
            let opened_before_hydration = !directory.is_empty();
            let restored = restore_instances(directory, &document.portals.open);
            logging::log!("restored {restored} portal(s) from storage");
            normalize_portal_stack(directory);
            if opened_before_hydration {
                effects.push(RuntimeEffect::PersistDirectory);
            }
        }
        PortalAction::SetPeeking { kind } => {
            directory.peeking = kind;
        }
    }

    Ok(effects)
}

fn mint_unique_id(directory: &PortalDirectory, kind: PortalKind, created_at_ms: u64) -> PortalId {
    let mut stamp = created_at_ms;
    loop {
        let id = PortalId::mint(kind, stamp);
        if directory.get(&id).is_none() {
            return id;
        }
        stamp = stamp.saturating_add(1);
    }
}

/// Appends stored identities behind anything already open, skipping unknown kinds and
/// duplicates. Returns the number of portals restored.
fn restore_instances(directory: &mut PortalDirectory, stored: &[PortalIdentity]) -> usize {
    let mut seen_ids: BTreeSet<PortalId> = directory
        .portals
        .iter()
        .map(|portal| portal.id.clone())
        .collect();
    let mut restored = 0;

    for identity in stored {
        let kind = match identity.kind.parse::<PortalKind>() {
            Ok(kind) => kind,
            Err(err) => {
                logging::warn!("skipping stored portal `{}`: {err}", identity.id);
                continue;
            }
        };
        let id = PortalId::from_raw(identity.id.clone());
        if directory.is_open(kind) || !seen_ids.insert(id.clone()) {
            logging::warn!("skipping duplicate stored portal `{}`", identity.id);
            continue;
        }

        let title = if identity.title.is_empty() {
            catalog::default_title(kind)
        } else {
            identity.title.clone()
        };
        directory.portals.push(PortalInstance {
            id,
            kind,
            title,
            position: cascade_position(directory.len()),
            size: catalog::default_size(kind),
            z_index: 0,
            minimized: false,
        });
        restored += 1;
    }
    restored
}

/// Returns the identity list persisted for `directory`, front-most first.
pub fn directory_identities(directory: &PortalDirectory) -> Vec<PortalIdentity> {
    directory
        .portals
        .iter()
        .map(|portal| PortalIdentity {
            id: portal.id.to_string(),
            kind: portal.kind.slug().to_string(),
            title: portal.title.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn open(directory: &mut PortalDirectory, kind: PortalKind, at: u64) -> PortalId {
        reduce_portals(
            directory,
            PortalAction::Open {
                kind,
                title: None,
                created_at_ms: at,
            },
        )
        .expect("open portal");
        directory.by_kind(kind).expect("opened").id.clone()
    }

    fn stored(kind: &str, id: &str) -> PortalIdentity {
        PortalIdentity {
            id: id.to_string(),
            kind: kind.to_string(),
            title: String::new(),
        }
    }

    #[test]
    fn open_inserts_at_front_with_catalog_defaults() {
        let mut directory = PortalDirectory::default();
        open(&mut directory, PortalKind::Clock, 1);
        let weather = open(&mut directory, PortalKind::Weather, 2);

        let front = directory.front().expect("front");
        assert_eq!(front.id, weather);
        assert_eq!(front.title, "Weather");
        assert_eq!(
            front.size,
            PortalSize {
                width: 400,
                height: 500
            }
        );
        assert_eq!(front.position, PortalPosition { x: 130, y: 130 });
        assert_eq!(front.z_index, 2);
        assert_eq!(weather.as_str(), "weather-2");
    }

    fn hydrated_directory() -> PortalDirectory {
        PortalDirectory {
            hydrated: true,
            ..PortalDirectory::default()
        }
    }

    #[test]
    fn open_emits_persist_and_focus_effects() {
        let mut directory = hydrated_directory();
        let effects = reduce_portals(
            &mut directory,
            PortalAction::Open {
                kind: PortalKind::News,
                title: Some("Headlines".to_string()),
                created_at_ms: 5,
            },
        )
        .expect("open");
        let id = PortalId::from_raw("news-5");
        assert_eq!(
            effects,
            vec![
                RuntimeEffect::PersistDirectory,
                RuntimeEffect::FocusPortalInput(id.clone())
            ]
        );
        assert_eq!(directory.get(&id).expect("news").title, "Headlines");
    }

    #[test]
    fn nothing_is_persisted_until_hydrated() {
        let mut directory = PortalDirectory::default();
        let id = open(&mut directory, PortalKind::Clock, 3);
        let actions = [
            PortalAction::Open {
                kind: PortalKind::Clock,
                title: None,
                created_at_ms: 4,
            },
            PortalAction::Focus {
                target: PortalTarget::Id(id.clone()),
            },
            PortalAction::ToggleMinimize { id: id.clone() },
            PortalAction::UpdatePosition {
                id: id.clone(),
                position: PortalPosition { x: 5, y: 6 },
            },
            PortalAction::UpdateSize {
                id: id.clone(),
                size: PortalSize {
                    width: 500,
                    height: 300,
                },
            },
            PortalAction::Close {
                target: PortalTarget::Id(id),
            },
        ];
        for action in actions {
            let effects = reduce_portals(&mut directory, action).expect("applies");
            assert!(!effects.contains(&RuntimeEffect::PersistDirectory));
        }

        let effects = reduce_portals(
            &mut directory,
            PortalAction::Open {
                kind: PortalKind::News,
                title: None,
                created_at_ms: 7,
            },
        )
        .expect("open");
        assert_eq!(
            effects,
            vec![RuntimeEffect::FocusPortalInput(PortalId::from_raw("news-7"))]
        );
    }

    #[test]
    fn reopen_restores_minimized_instance_without_duplicating() {
        let mut directory = PortalDirectory::default();
        let clock = open(&mut directory, PortalKind::Clock, 1);
        open(&mut directory, PortalKind::News, 2);
        reduce_portals(
            &mut directory,
            PortalAction::ToggleMinimize { id: clock.clone() },
        )
        .expect("minimize");

        let again = open(&mut directory, PortalKind::Clock, 3);
        assert_eq!(again, clock);
        assert_eq!(directory.len(), 2);
        let front = directory.front().expect("front");
        assert_eq!(front.id, clock);
        assert!(!front.minimized);
    }

    #[test]
    fn id_collisions_are_bumped() {
        let mut directory = PortalDirectory::default();
        reduce_portals(
            &mut directory,
            PortalAction::Hydrate {
                document: PersistedDocument {
                    portals: crate::persistence::OpenPortals {
                        open: vec![stored("clock", "weather-7")],
                    },
                    ..PersistedDocument::default()
                },
            },
        )
        .expect("hydrate");
        let weather = open(&mut directory, PortalKind::Weather, 7);
        assert_eq!(weather.as_str(), "weather-8");
    }

    #[test]
    fn actions_on_missing_portals_leave_directory_untouched() {
        let mut directory = PortalDirectory::default();
        open(&mut directory, PortalKind::Clock, 1);
        let before = directory.clone();
        let ghost = PortalId::from_raw("radio-1");

        for action in [
            PortalAction::Close {
                target: PortalTarget::Id(ghost.clone()),
            },
            PortalAction::Focus {
                target: PortalTarget::Kind(PortalKind::Radio),
            },
            PortalAction::ToggleMinimize { id: ghost.clone() },
            PortalAction::UpdatePosition {
                id: ghost.clone(),
                position: PortalPosition { x: 1, y: 1 },
            },
            PortalAction::UpdateSize {
                id: ghost.clone(),
                size: PortalSize {
                    width: 500,
                    height: 500,
                },
            },
        ] {
            assert_eq!(
                reduce_portals(&mut directory, action),
                Err(ReducerError::PortalNotFound)
            );
            assert_eq!(directory, before);
        }
    }

    #[test]
    fn geometry_updates_do_not_reorder() {
        let mut directory = PortalDirectory::default();
        let clock = open(&mut directory, PortalKind::Clock, 1);
        open(&mut directory, PortalKind::News, 2);
        let order_before: Vec<PortalId> = directory.portals.iter().map(|p| p.id.clone()).collect();

        reduce_portals(
            &mut directory,
            PortalAction::UpdatePosition {
                id: clock.clone(),
                position: PortalPosition { x: -20, y: 45 },
            },
        )
        .expect("move");
        reduce_portals(
            &mut directory,
            PortalAction::UpdateSize {
                id: clock.clone(),
                size: PortalSize {
                    width: 10,
                    height: 600,
                },
            },
        )
        .expect("resize");

        let order_after: Vec<PortalId> = directory.portals.iter().map(|p| p.id.clone()).collect();
        assert_eq!(order_after, order_before);
        let portal = directory.get(&clock).expect("clock");
        assert_eq!(portal.position, PortalPosition { x: -20, y: 45 });
        assert_eq!(
            portal.size,
            PortalSize {
                width: crate::stack::MIN_PORTAL_WIDTH,
                height: 600
            }
        );
    }

    #[test]
    fn hydrate_restores_in_order_and_skips_unknown_and_duplicate_kinds() {
        let mut directory = PortalDirectory::default();
        let document = PersistedDocument {
            portals: crate::persistence::OpenPortals {
                open: vec![
                    stored("clock", "clock-1"),
                    stored("stocks", "stocks-2"),
                    stored("weather", "weather-3"),
                    stored("clock", "clock-4"),
                ],
            },
            ..PersistedDocument::default()
        };
        let effects = reduce_portals(&mut directory, PortalAction::Hydrate { document })
            .expect("hydrate");

        assert!(effects.is_empty());
        assert!(directory.hydrated);
        let ids: Vec<&str> = directory.portals.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["clock-1", "weather-3"]);
        assert_eq!(directory.portals[0].title, "World Clock");
        assert!(directory.portals.iter().all(|p| !p.minimized));
    }

    #[test]
    fn hydrate_runs_once() {
        let mut directory = PortalDirectory::default();
        let document = PersistedDocument {
            portals: crate::persistence::OpenPortals {
                open: vec![stored("clock", "clock-1")],
            },
            ..PersistedDocument::default()
        };
        reduce_portals(
            &mut directory,
            PortalAction::Hydrate {
                document: document.clone(),
            },
        )
        .expect("hydrate");
        reduce_portals(&mut directory, PortalAction::Close {
            target: PortalTarget::Kind(PortalKind::Clock),
        })
        .expect("close");
        reduce_portals(&mut directory, PortalAction::Hydrate { document }).expect("rehydrate");
        assert!(directory.is_empty());
    }

    #[test]
    fn hydrate_keeps_portals_opened_earlier_in_front() {
        let mut directory = PortalDirectory::default();
        open(&mut directory, PortalKind::Radio, 1);
        let document = PersistedDocument {
            portals: crate::persistence::OpenPortals {
                open: vec![stored("radio", "radio-0"), stored("news", "news-0")],
            },
            ..PersistedDocument::default()
        };
        let effects =
            reduce_portals(&mut directory, PortalAction::Hydrate { document }).expect("hydrate");

        assert_eq!(effects, vec![RuntimeEffect::PersistDirectory]);
        let ids: Vec<&str> = directory.portals.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["radio-1", "news-0"]);
    }

    #[test]
    fn peeking_is_transient_and_cleared_on_close() {
        let mut directory = PortalDirectory::default();
        open(&mut directory, PortalKind::Crypto, 1);
        let effects = reduce_portals(
            &mut directory,
            PortalAction::SetPeeking {
                kind: Some(PortalKind::Crypto),
            },
        )
        .expect("peek");
        assert!(effects.is_empty());
        assert_eq!(directory.peeking, Some(PortalKind::Crypto));

        reduce_portals(
            &mut directory,
            PortalAction::Close {
                target: PortalTarget::Kind(PortalKind::Crypto),
            },
        )
        .expect("close");
        assert_eq!(directory.peeking, None);
    }

    #[test]
    fn identities_follow_stack_order() {
        let mut directory = PortalDirectory::default();
        open(&mut directory, PortalKind::Clock, 1);
        open(&mut directory, PortalKind::AiFeed, 2);
        assert_eq!(
            directory_identities(&directory),
            vec![
                PortalIdentity {
                    id: "ai-2".to_string(),
                    kind: "ai".to_string(),
                    title: "AI Feed".to_string(),
                },
                PortalIdentity {
                    id: "clock-1".to_string(),
                    kind: "clock".to_string(),
                    title: "World Clock".to_string(),
                },
            ]
        );
    }
}
