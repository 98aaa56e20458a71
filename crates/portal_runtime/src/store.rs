//! Portal directory store: the reducer wired to persistence.
//!
//! The store is an explicitly constructed object. Its lifecycle is construct, [`PortalStore::hydrate`]
//! once, then operate. Every mutating call applies its in-memory transition synchronously, then
//! makes a best-effort write of the open-portal list. Callers read [`PortalStore::directory`]
//! afterwards for the new snapshot. A failed write never rolls back or blocks the transition; the
//! next mutation rewrites the full list anyway. Nothing is written before hydration, so an early
//! open cannot overwrite the stored layout.

use platform_host::next_monotonic_timestamp_ms;
use portal_contract::{PortalId, PortalKind, PortalPosition, PortalSize};

use crate::{
    model::{PortalDirectory, PortalTarget},
    persistence::{log_save_failure, PersistenceAdapter},
    reducer::{directory_identities, reduce_portals, PortalAction, ReducerError, RuntimeEffect},
};

/// Owns the in-memory portal directory for the page session.
pub struct PortalStore {
    directory: PortalDirectory,
    persistence: PersistenceAdapter,
}

impl PortalStore {
    /// Creates an empty, unhydrated store writing through `persistence`.
    pub fn new(persistence: PersistenceAdapter) -> Self {
        Self {
            directory: PortalDirectory::default(),
            persistence,
        }
    }

    /// Current directory.
    pub fn directory(&self) -> &PortalDirectory {
        &self.directory
    }

    /// The adapter this store persists through. Widgets share it for their sections.
    pub fn persistence(&self) -> &PersistenceAdapter {
        &self.persistence
    }

    /// Loads the persisted document into the directory. Later calls are no-ops.
    pub fn hydrate(&mut self) -> Vec<RuntimeEffect> {
        if self.directory.hydrated {
            return Vec::new();
        }
        let document = self.persistence.load();
        self.dispatch(PortalAction::Hydrate { document })
    }

    /// Opens `kind` with `title`, or focuses and restores the instance already open.
    ///
    /// Returns the id of the resulting front-most portal.
    pub fn open(&mut self, kind: PortalKind, title: impl Into<String>) -> Option<PortalId> {
        self.dispatch(PortalAction::Open {
            kind,
            title: Some(title.into()),
            created_at_ms: next_monotonic_timestamp_ms(),
        });
        self.directory.by_kind(kind).map(|portal| portal.id.clone())
    }

    /// Removes the targeted portal. Absent targets are ignored.
    pub fn close(&mut self, target: impl Into<PortalTarget>) {
        self.dispatch(PortalAction::Close {
            target: target.into(),
        });
    }

    /// Moves the targeted portal to the front, restoring it when minimized.
    pub fn focus(&mut self, target: impl Into<PortalTarget>) {
        self.dispatch(PortalAction::Focus {
            target: target.into(),
        });
    }

    /// Flips the minimized flag without touching stacking order.
    pub fn toggle_minimize(&mut self, id: &PortalId) {
        self.dispatch(PortalAction::ToggleMinimize { id: id.clone() });
    }

    /// Commits a new position.
    pub fn update_position(&mut self, id: &PortalId, position: PortalPosition) {
        self.dispatch(PortalAction::UpdatePosition {
            id: id.clone(),
            position,
        });
    }

    /// Commits a new size.
    pub fn update_size(&mut self, id: &PortalId, size: PortalSize) {
        self.dispatch(PortalAction::UpdateSize {
            id: id.clone(),
            size,
        });
    }

    /// Sets or clears the peeked kind.
    pub fn set_peeking(&mut self, kind: Option<PortalKind>) {
        self.dispatch(PortalAction::SetPeeking { kind });
    }

    /// Applies `action`, persists if needed, and returns the effects the UI host still has to
    /// run.
    pub fn dispatch(&mut self, action: PortalAction) -> Vec<RuntimeEffect> {
        let effects = match reduce_portals(&mut self.directory, action) {
            Ok(effects) => effects,
            Err(ReducerError::PortalNotFound) => return Vec::new(),
        };

        let mut host_effects = Vec::new();
        for effect in effects {
            match effect {
                RuntimeEffect::PersistDirectory => self.persist_directory(),
                other => host_effects.push(other),
            }
        }
        host_effects
    }

    fn persist_directory(&self) {
        let open = directory_identities(&self.directory);
        log_save_failure(self.persistence.save_open_portals(open));
    }
}
