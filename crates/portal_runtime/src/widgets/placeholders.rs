//! Placeholder widgets for kinds whose data providers are not wired up yet.

use leptos::*;
use portal_contract::PortalMountContext;

use crate::{catalog, runtime_context::use_portal_runtime};

/// Mounts a titled placeholder body for any kind.
pub(super) fn mount_placeholder_portal(context: PortalMountContext) -> View {
    let kind = context.sections.kind();
    let portal = context.portal;
    view! {
        <div class="portal-placeholder" data-portal-kind=kind.slug()>
            <p class="portal-placeholder-glyph" aria-hidden="true">{catalog::glyph(kind)}</p>
            <p><strong>{move || portal.get().title}</strong></p>
            <p>"No data source is connected for this portal yet."</p>
        </div>
    }
    .into_view()
}

/// Mounts the settings portal: storage diagnostics and a reset.
pub(super) fn mount_settings_portal(context: PortalMountContext) -> View {
    view! { <SettingsPortal context=context /> }.into_view()
}

#[component]
fn SettingsPortal(context: PortalMountContext) -> impl IntoView {
    let runtime = use_portal_runtime();
    let host = runtime.host.get_value();
    let storage_available = host.storage_available();
    let strategy = host.host_strategy_name();
    let persistence = store_value(host.persistence());
    let size = create_rw_signal(persistence.with_value(|p| p.storage_size()));
    let handle = context.handle;

    let refresh = move |_| size.set(persistence.with_value(|p| p.storage_size()));
    let clear = move |_| {
        persistence.with_value(|p| p.clear());
        size.set(0);
        logging::log!("portal storage cleared; layout resets on next reload");
    };

    view! {
        <div class="portal-settings">
            <dl>
                <dt>"Host"</dt>
                <dd>{strategy}</dd>
                <dt>"Durable storage"</dt>
                <dd>{if storage_available { "available" } else { "unavailable" }}</dd>
                <dt>"Stored bytes"</dt>
                <dd>{move || size.get().to_string()}</dd>
            </dl>
            <div class="portal-settings-actions">
                <button type="button" on:click=refresh>"Refresh"</button>
                <button type="button" on:click=clear>"Clear saved data"</button>
                <button type="button" on:click=move |_| handle.close()>"Done"</button>
            </div>
        </div>
    }
}
