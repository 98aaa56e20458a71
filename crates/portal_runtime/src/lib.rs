//! Portal dashboard runtime: persistence, the portal directory store, and the Leptos shell.

pub mod catalog;
pub mod components;
pub mod host;
pub mod model;
pub mod persistence;
pub mod reducer;
pub mod runtime_context;
pub mod shell;
pub mod stack;
pub mod store;
pub mod widgets;

pub use components::{use_portal_runtime, PortalProvider, PortalRuntimeContext, PortalShell};
pub use host::PortalHostContext;
pub use model::*;
pub use persistence::{
    PersistedDocument, PersistenceAdapter, PersistenceError, PortalIdentity, PORTAL_DOCUMENT_KEY,
};
pub use reducer::{reduce_portals, PortalAction, ReducerError, RuntimeEffect};
pub use shell::{plan_render, GestureTracker, RenderPlan, ShellLayout};
pub use store::PortalStore;
