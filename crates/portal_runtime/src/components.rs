//! Portal shell UI composition and pointer relay.

mod icon_bar;
mod portal_frame;
mod taskbar;

use leptos::*;

use self::{icon_bar::IconBar, portal_frame::PortalFrame, taskbar::Taskbar};

use crate::{
    model::PointerPosition,
    shell::{plan_render, ShellLayout},
};

pub use crate::runtime_context::{use_portal_runtime, PortalProvider, PortalRuntimeContext};

fn layout_css_id(layout: ShellLayout) -> &'static str {
    match layout {
        ShellLayout::FreeForm => "free-form",
        ShellLayout::Stack => "stack",
    }
}

fn pointer_from_pointer_event(ev: &web_sys::PointerEvent) -> PointerPosition {
    PointerPosition {
        x: ev.client_x(),
        y: ev.client_y(),
    }
}

fn stop_pointer_event(ev: &web_sys::PointerEvent) {
    ev.prevent_default();
    ev.stop_propagation();
}

#[component]
/// Renders the icon bar, the open portals, and the minimized-portal taskbar.
///
/// Drag and resize previews are tracked locally; the directory only receives the committed
/// geometry when the pointer is released.
pub fn PortalShell() -> impl IntoView {
    let runtime = use_portal_runtime();
    let plan = create_memo(move |_| plan_render(&runtime.state.get(), runtime.layout.get()));

    let on_pointer_move = move |ev: web_sys::PointerEvent| {
        if !runtime.gesture.with_untracked(|gesture| gesture.is_active()) {
            return;
        }
        let pointer = pointer_from_pointer_event(&ev);
        runtime.gesture.update(|gesture| {
            gesture.update(pointer);
        });
    };
    let on_pointer_up = move |_: web_sys::PointerEvent| {
        let commit = runtime.gesture.try_update(|gesture| gesture.end()).flatten();
        if let Some(action) = commit {
            runtime.dispatch_action(action);
        }
    };
    let on_pointer_cancel = move |_: web_sys::PointerEvent| {
        runtime.gesture.update(|gesture| gesture.cancel());
    };

    view! {
        <div
            id="portal-shell-root"
            class="portal-shell"
            data-layout=move || layout_css_id(runtime.layout.get())
            on:pointermove=on_pointer_move
            on:pointerup=on_pointer_up
            on:pointercancel=on_pointer_cancel
        >
            <IconBar />
            <Show when=move || !plan.with(|plan| plan.slots.is_empty()) fallback=|| ()>
                <div class="portal-layer">
                    <For
                        each=move || plan.get().slots
                        key=|slot| slot.id.clone()
                        let:slot
                    >
                        <PortalFrame id=slot.id />
                    </For>
                </div>
            </Show>
            <Taskbar plan=plan />
        </div>
    }
}
