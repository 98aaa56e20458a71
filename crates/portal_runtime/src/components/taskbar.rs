use super::*;
use crate::shell::{taskbar_action, RenderPlan};

#[component]
pub(super) fn Taskbar(plan: Memo<RenderPlan>) -> impl IntoView {
    let runtime = use_portal_runtime();

    view! {
        <Show when=move || !plan.with(|plan| plan.taskbar.is_empty()) fallback=|| ()>
            <nav class="portal-taskbar" aria-label="Minimized portals">
                <For
                    each=move || plan.get().taskbar
                    key=|entry| entry.id.clone()
                    let:entry
                >
                    {{
                        let id = entry.id.clone();
                        view! {
                            <button
                                type="button"
                                class="portal-taskbar-button"
                                title=entry.title.clone()
                                on:click=move |_| runtime.dispatch_action(taskbar_action(&id))
                            >
                                <span aria-hidden="true">{entry.glyph}</span>
                                <span>{entry.title.clone()}</span>
                            </button>
                        }
                    }}
                </For>
            </nav>
        </Show>
    }
}
