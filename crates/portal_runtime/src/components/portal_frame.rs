use portal_contract::{
    PortalCommand, PortalHandle, PortalId, PortalMountContext, PortalSections, PortalView,
};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;

use super::*;
use crate::{
    catalog,
    shell::{command_action, pointer_down_action, GestureKind},
    widgets,
};

#[cfg(target_arch = "wasm32")]
fn try_set_pointer_capture(ev: &web_sys::PointerEvent) {
    if let Some(target) = ev.current_target() {
        if let Ok(element) = target.dyn_into::<web_sys::Element>() {
            let _ = element.set_pointer_capture(ev.pointer_id());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn try_set_pointer_capture(_: &web_sys::PointerEvent) {}

fn is_primary_press(ev: &web_sys::PointerEvent) -> bool {
    if ev.pointer_type() == "mouse" {
        ev.button() == 0
    } else {
        ev.is_primary()
    }
}

#[component]
pub(super) fn PortalFrame(id: PortalId) -> impl IntoView {
    let runtime = use_portal_runtime();
    let Some(initial) = runtime.state.get_untracked().view_of(&id) else {
        return ().into_view();
    };
    let kind = initial.kind;

    let portal = {
        let id = id.clone();
        create_memo(move |_| runtime.state.get().get(&id).cloned())
    };
    let view_signal = {
        let id = id.clone();
        create_memo(move |previous: Option<&PortalView>| {
            runtime
                .state
                .get()
                .view_of(&id)
                .or_else(|| previous.cloned())
                .unwrap_or_else(|| initial.clone())
        })
    };

    let handle = {
        let id = id.clone();
        PortalHandle::new(Callback::new(move |command: PortalCommand| {
            runtime.dispatch_action(command_action(&id, command));
        }))
    };
    let sections = PortalSections::new(kind, runtime.host.with_value(|host| host.section_backend()));
    let contents = widgets::portal_module(kind).mount(PortalMountContext {
        portal: view_signal.into(),
        handle,
        sections,
    });

    let focus_first = {
        let id = id.clone();
        move |_: web_sys::PointerEvent| {
            let action = runtime
                .state
                .with_untracked(|directory| pointer_down_action(directory, &id));
            if let Some(action) = action {
                runtime.dispatch_action(action);
            }
        }
    };
    let begin_gesture = {
        let id = id.clone();
        move |ev: web_sys::PointerEvent, gesture_kind: GestureKind| {
            if runtime.layout.get_untracked() != ShellLayout::FreeForm || !is_primary_press(&ev) {
                return;
            }
            try_set_pointer_capture(&ev);
            ev.prevent_default();
            let directory = runtime.state.get_untracked();
            let pointer = pointer_from_pointer_event(&ev);
            runtime.gesture.update(|gesture| {
                gesture.begin(&directory, &id, gesture_kind, pointer);
            });
        }
    };
    let begin_move = {
        let begin_gesture = begin_gesture.clone();
        move |ev: web_sys::PointerEvent| begin_gesture(ev, GestureKind::Move)
    };
    let begin_resize = move |ev: web_sys::PointerEvent| begin_gesture(ev, GestureKind::Resize);

    let style = {
        let id = id.clone();
        move || {
            let Some(portal) = portal.get() else {
                return String::new();
            };
            if runtime.layout.get() != ShellLayout::FreeForm {
                return String::new();
            }
            let rect = runtime
                .gesture
                .with(|gesture| gesture.preview_for(&id))
                .unwrap_or_else(|| portal.rect());
            format!(
                "left:{}px;top:{}px;width:{}px;height:{}px;z-index:{};",
                rect.x, rect.y, rect.w, rect.h, portal.z_index
            )
        }
    };
    let class = move || {
        let view = view_signal.get();
        let front = if view.is_front { " front" } else { "" };
        let peeking = if runtime.state.with(|directory| directory.peeking == Some(view.kind)) {
            " peeking"
        } else {
            ""
        };
        format!("portal-frame portal-{}{}{}", view.kind.slug(), front, peeking)
    };

    view! {
        <section
            class=class
            style=style
            data-portal-id=id.to_string()
            role="dialog"
            aria-label=move || view_signal.get().title
            on:pointerdown=focus_first
        >
            <header class="portal-titlebar" on:pointerdown=begin_move>
                <span class="portal-glyph" aria-hidden="true">{catalog::glyph(kind)}</span>
                <span class="portal-title">{move || view_signal.get().title}</span>
                <div class="portal-controls">
                    <button
                        type="button"
                        aria-label="Minimize portal"
                        on:pointerdown=move |ev: web_sys::PointerEvent| stop_pointer_event(&ev)
                        on:click=move |_| handle.toggle_minimize()
                    >
                        "–"
                    </button>
                    <button
                        type="button"
                        aria-label="Close portal"
                        on:pointerdown=move |ev: web_sys::PointerEvent| stop_pointer_event(&ev)
                        on:click=move |_| handle.close()
                    >
                        "×"
                    </button>
                </div>
            </header>
            <div class="portal-body">{contents}</div>
            <Show
                when=move || runtime.layout.get() == ShellLayout::FreeForm
                fallback=|| ()
            >
                <div
                    class="portal-resize-handle"
                    aria-hidden="true"
                    on:pointerdown=begin_resize.clone()
                ></div>
            </Show>
        </section>
    }
    .into_view()
}
