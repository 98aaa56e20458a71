use portal_contract::PortalId;
#[cfg(target_arch = "wasm32")]
use portal_contract::portal_primary_input_dom_id;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast};

pub(super) fn focus_portal_input(portal_id: &PortalId) {
    #[cfg(target_arch = "wasm32")]
    {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };
        let dom_id = portal_primary_input_dom_id(portal_id);
        // Deferred so the freshly mounted widget is in the DOM.
        let callback = Closure::once_into_js(move || {
            let element = document
                .get_element_by_id(&dom_id)
                .and_then(|element| element.dyn_into::<web_sys::HtmlElement>().ok());
            if let Some(element) = element {
                let _ = element.focus();
            }
        });
        let _ = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), 0);
    }
    #[cfg(not(target_arch = "wasm32"))]
    let _ = portal_id;
}
