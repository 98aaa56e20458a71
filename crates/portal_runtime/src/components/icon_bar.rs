use platform_host::next_monotonic_timestamp_ms;

use super::*;
use crate::{
    reducer::PortalAction,
    shell::{icon_bar_action, icon_bar_entries},
};

#[component]
pub(super) fn IconBar() -> impl IntoView {
    let runtime = use_portal_runtime();
    let entries = create_memo(move |_| icon_bar_entries(&runtime.state.get()));

    let toggle_layout = move |_| {
        runtime.layout.update(|layout| {
            *layout = match *layout {
                ShellLayout::FreeForm => ShellLayout::Stack,
                ShellLayout::Stack => ShellLayout::FreeForm,
            };
        });
        runtime.gesture.update(|gesture| gesture.cancel());
    };

    view! {
        <nav class="portal-icon-bar" aria-label="Portals">
            <For
                each=move || entries.get()
                key=|entry| (entry.kind, entry.open, entry.front, entry.minimized)
                let:entry
            >
                {{
                    let kind = entry.kind;
                    let class = format!(
                        "portal-icon{}{}{}",
                        if entry.open { " open" } else { "" },
                        if entry.front { " front" } else { "" },
                        if entry.minimized { " minimized" } else { "" },
                    );
                    view! {
                        <button
                            type="button"
                            class=class
                            title=entry.title.clone()
                            aria-pressed=entry.front.to_string()
                            on:click=move |_| {
                                let action = runtime.state.with_untracked(|directory| {
                                    icon_bar_action(directory, kind, next_monotonic_timestamp_ms())
                                });
                                runtime.dispatch_action(action);
                            }
                            on:mouseenter=move |_| {
                                if runtime.state.with_untracked(|directory| directory.is_open(kind)) {
                                    runtime.dispatch_action(PortalAction::SetPeeking {
                                        kind: Some(kind),
                                    });
                                }
                            }
                            on:mouseleave=move |_| {
                                runtime.dispatch_action(PortalAction::SetPeeking { kind: None });
                            }
                        >
                            <span aria-hidden="true">{entry.glyph}</span>
                        </button>
                    }
                }}
            </For>
            <button
                type="button"
                class="portal-layout-toggle"
                title="Switch layout"
                on:click=toggle_layout
            >
                {move || match runtime.layout.get() {
                    ShellLayout::FreeForm => "▤",
                    ShellLayout::Stack => "▦",
                }}
            </button>
        </nav>
    }
}
