//! Runtime provider and context wiring for the portal shell.
//!
//! The provider owns the one [`PortalStore`] for the page session. Components never mutate the
//! directory signal directly: they dispatch a [`PortalAction`], the store applies it and persists,
//! and the provider publishes the resulting snapshot.
#![allow(clippy::clone_on_copy)]

use leptos::*;

use crate::{
    host::PortalHostContext,
    model::PortalDirectory,
    reducer::PortalAction,
    shell::{GestureTracker, ShellLayout},
    store::PortalStore,
};

#[derive(Clone, Copy)]
/// Leptos context for reading portal state and dispatching [`PortalAction`] values.
pub struct PortalRuntimeContext {
    /// Host services for effects and storage.
    pub host: StoredValue<PortalHostContext>,
    /// The session's directory store.
    pub store: StoredValue<PortalStore>,
    /// Snapshot of the directory after the last applied action.
    pub state: RwSignal<PortalDirectory>,
    /// In-flight drag/resize.
    pub gesture: RwSignal<GestureTracker>,
    /// Active layout mode.
    pub layout: RwSignal<ShellLayout>,
    /// Store dispatch callback.
    pub dispatch: Callback<PortalAction>,
}

impl PortalRuntimeContext {
    /// Dispatches an action through the runtime context callback.
    pub fn dispatch_action(&self, action: PortalAction) {
        self.dispatch.call(action);
    }
}

#[component]
/// Provides [`PortalRuntimeContext`] to descendant components and hydrates persisted portals.
pub fn PortalProvider(
    /// Host bundle. Defaults to the browser host selected at build time.
    #[prop(optional)]
    host: Option<PortalHostContext>,
    /// Initial layout mode.
    #[prop(optional)]
    layout: ShellLayout,
    children: Children,
) -> impl IntoView {
    let host = host.unwrap_or_default();
    let store = store_value(PortalStore::new(host.persistence()));
    let host = store_value(host);
    let state = create_rw_signal(PortalDirectory::default());
    let gesture = create_rw_signal(GestureTracker::default());
    let layout = create_rw_signal(layout);

    let dispatch = Callback::new(move |action: PortalAction| {
        let applied = store.try_update_value(|store| {
            let new_effects = store.dispatch(action);
            (store.directory().clone(), new_effects)
        });
        let Some((directory, new_effects)) = applied else {
            logging::warn!("portal store disposed; dropping action");
            return;
        };

        if directory != state.get_untracked() {
            state.set(directory);
        }
        // The store borrow is released here, so an effect may dispatch again.
        host.with_value(|host| host.run_runtime_effects(new_effects));
    });

    let runtime = PortalRuntimeContext {
        host,
        store,
        state,
        gesture,
        layout,
        dispatch,
    };

    provide_context(runtime.clone());

    runtime
        .host
        .with_value(|host| host.install_boot_hydration(runtime.dispatch));

    children().into_view()
}

/// Returns the current [`PortalRuntimeContext`].
///
/// # Panics
///
/// Panics if called outside [`PortalProvider`].
pub fn use_portal_runtime() -> PortalRuntimeContext {
    use_context::<PortalRuntimeContext>().expect("PortalRuntimeContext not provided")
}
