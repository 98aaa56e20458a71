//! Host-side runtime helpers for executing reducer effects in the browser.

mod boot;
mod host_ui;

use std::rc::Rc;

use leptos::Callback;
use platform_host::LocalStorage;
use platform_host_web::{host_strategy_name, local_storage};
use portal_contract::SectionBackend;

use crate::{
    persistence::PersistenceAdapter,
    reducer::{PortalAction, RuntimeEffect},
};

#[derive(Clone)]
/// Host service bundle for the portal runtime.
pub struct PortalHostContext {
    storage: Rc<dyn LocalStorage>,
    persistence: PersistenceAdapter,
    host_strategy_name: &'static str,
}

impl Default for PortalHostContext {
    fn default() -> Self {
        Self::new(Rc::new(local_storage()))
    }
}

impl PortalHostContext {
    /// Creates a host context over an explicit storage capability.
    pub fn new(storage: Rc<dyn LocalStorage>) -> Self {
        Self {
            persistence: PersistenceAdapter::new(storage.clone()),
            storage,
            host_strategy_name: host_strategy_name(),
        }
    }

    /// Returns the document persistence adapter.
    pub fn persistence(&self) -> PersistenceAdapter {
        self.persistence.clone()
    }

    /// Returns the section backend handed to widgets.
    pub fn section_backend(&self) -> Rc<dyn SectionBackend> {
        Rc::new(self.persistence.clone())
    }

    /// Returns `true` when layout and widget data survive a reload.
    pub fn storage_available(&self) -> bool {
        self.storage.is_available()
    }

    /// Returns the selected host strategy name for diagnostics.
    pub fn host_strategy_name(&self) -> &'static str {
        self.host_strategy_name
    }

    /// Installs the one-shot hydration that runs once the provider is mounted.
    pub fn install_boot_hydration(&self, dispatch: Callback<PortalAction>) {
        boot::install_boot_hydration(self.clone(), dispatch);
    }

    /// Runs the effects the store handed back after a dispatch, in emission order.
    ///
    /// Returns how many reached the browser. Persistence never does: the store writes it.
    pub fn run_runtime_effects(&self, effects: Vec<RuntimeEffect>) -> usize {
        effects
            .into_iter()
            .filter_map(|effect| match effect {
                RuntimeEffect::FocusPortalInput(id) => Some(id),
                RuntimeEffect::PersistDirectory => None,
            })
            .inspect(host_ui::focus_portal_input)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use platform_host::MemoryLocalStorage;
    use portal_contract::PortalId;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn only_focus_effects_reach_the_browser() {
        let host = PortalHostContext::new(Rc::new(MemoryLocalStorage::default()));
        let ran = host.run_runtime_effects(vec![
            RuntimeEffect::PersistDirectory,
            RuntimeEffect::FocusPortalInput(PortalId::from_raw("clock-1")),
            RuntimeEffect::PersistDirectory,
            RuntimeEffect::FocusPortalInput(PortalId::from_raw("news-2")),
        ]);
        assert_eq!(ran, 2);
        assert_eq!(host.run_runtime_effects(Vec::new()), 0);
    }
}
