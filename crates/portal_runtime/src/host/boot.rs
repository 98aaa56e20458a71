use leptos::{create_effect, logging, Callable, Callback};

use crate::{host::PortalHostContext, reducer::PortalAction};

pub(super) fn install_boot_hydration(host: PortalHostContext, dispatch: Callback<PortalAction>) {
    create_effect(move |_| {
        if !host.storage_available() {
            logging::log!(
                "durable storage unavailable on `{}` host; portals will not persist",
                host.host_strategy_name()
            );
        }
        let document = host.persistence().load();
        dispatch.call(PortalAction::Hydrate { document });
    });
}
