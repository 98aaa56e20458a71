//! Countdown portal: named targets with a live time-remaining readout.

mod model;

use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use leptos::*;
use platform_host::unix_time_ms_now;
use portal_contract::{portal_primary_input_dom_id, PortalMountContext};

pub use model::{
    Countdown, CountdownCategory, CountdownColor, CountdownDraft, CountdownInputError,
    CountdownSection, TimeRemaining,
};

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Mounts the countdown widget inside a portal.
pub fn mount_countdown_portal(context: PortalMountContext) -> View {
    view! { <CountdownPortal context=context /> }.into_view()
}

#[component]
/// Countdown list with an add/edit form, persisted to the `countdown` section.
pub fn CountdownPortal(
    /// Runtime-provided portal context.
    context: PortalMountContext,
) -> impl IntoView {
    let sections = context.sections.clone();
    let initial = sections.get::<CountdownSection>().unwrap_or_default();
    let section = create_rw_signal(initial.clone());
    let last_saved = create_rw_signal(Some(initial));
    let now = create_rw_signal(local_now());
    let draft = create_rw_signal(CountdownDraft::default());
    let editing = create_rw_signal(None::<String>);
    let form_error = create_rw_signal(None::<String>);
    let input_id = portal_primary_input_dom_id(&context.portal.get_untracked().id);

    if let Ok(interval) = set_interval_with_handle(move || now.set(local_now()), Duration::from_secs(1))
    {
        on_cleanup(move || interval.clear());
    }

    create_effect(move |_| {
        let current = section.get();
        if last_saved.get_untracked().as_ref() == Some(&current) {
            return;
        }
        sections.set(&current);
        last_saved.set(Some(current));
    });

    let reset_form = move || {
        draft.set(CountdownDraft::default());
        editing.set(None);
        form_error.set(None);
    };

    let submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let current = draft.get_untracked();
        let outcome = section
            .try_update(|section| match editing.get_untracked() {
                Some(id) => section.update(&id, &current).map(|_| ()),
                None => section.add(&current, unix_time_ms_now()).map(|_| ()),
            })
            .unwrap_or(Ok(()));
        match outcome {
            Ok(()) => reset_form(),
            Err(err) => form_error.set(Some(err.to_string())),
        }
    };

    let start_edit = move |id: String| {
        if let Some(countdown) = section.with_untracked(|section| section.get(&id).cloned()) {
            draft.set(CountdownDraft::from_countdown(&countdown));
            editing.set(Some(id));
            form_error.set(None);
        }
    };

    let delete = move |id: String| {
        section.update(|section| {
            section.delete(&id);
        });
        if editing.get_untracked().as_deref() == Some(id.as_str()) {
            reset_form();
        }
    };

    let rows = move || section.with(|section| section.sorted(now.get()));

    view! {
        <div class="countdown-portal">
            <form class="countdown-form" on:submit=submit>
                <input
                    id=input_id
                    type="text"
                    placeholder="What are you counting down to?"
                    prop:value=move || draft.get().title
                    on:input=move |ev| draft.update(|d| d.title = event_target_value(&ev))
                />
                <input
                    type="date"
                    prop:value=move || draft.get().target_date
                    on:input=move |ev| draft.update(|d| d.target_date = event_target_value(&ev))
                />
                <input
                    type="time"
                    prop:value=move || draft.get().target_time
                    on:input=move |ev| draft.update(|d| d.target_time = event_target_value(&ev))
                />
                <select
                    aria-label="Category"
                    on:change=move |ev| {
                        if let Some(category) = CountdownCategory::from_slug(&event_target_value(&ev)) {
                            draft.update(|d| d.category = category);
                        }
                    }
                >
                    {CountdownCategory::ALL
                        .into_iter()
                        .map(|category| {
                            view! {
                                <option
                                    value=category.slug()
                                    selected=move || draft.get().category == category
                                >
                                    {format!("{} {}", category.emoji(), category.label())}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
                <div class="countdown-colors" role="radiogroup" aria-label="Color">
                    {CountdownColor::ALL
                        .into_iter()
                        .map(|color| {
                            view! {
                                <button
                                    type="button"
                                    class=format!("countdown-swatch swatch-{}", color.css_name())
                                    role="radio"
                                    aria-label=color.css_name()
                                    aria-checked=move || if draft.get().color == color { "true" } else { "false" }
                                    on:click=move |_| draft.update(|d| d.color = color)
                                ></button>
                            }
                        })
                        .collect_view()}
                </div>
                <button type="submit">
                    {move || if editing.get().is_some() { "Save" } else { "Add" }}
                </button>
                <Show when=move || editing.get().is_some() fallback=|| ()>
                    <button type="button" on:click=move |_| reset_form()>"Cancel"</button>
                </Show>
                <Show when=move || form_error.get().is_some() fallback=|| ()>
                    <p class="countdown-error" role="alert">{move || form_error.get()}</p>
                </Show>
            </form>

            <Show
                when=move || section.with(|section| !section.countdowns.is_empty())
                fallback=|| view! { <p class="countdown-empty">"No countdowns yet."</p> }
            >
                <ul class="countdown-list">
                    <For each=rows key=|countdown| countdown.clone() let:countdown>
                        {
                            let edit_id = countdown.id.clone();
                            let delete_id = countdown.id.clone();
                            let remaining = countdown.clone();
                            let relative = countdown.clone();
                            view! {
                                <li class=format!("countdown-card swatch-{}", countdown.color.css_name())>
                                    <span class="countdown-category" aria-hidden="true">
                                        {countdown.category.emoji()}
                                    </span>
                                    <span class="countdown-title">{countdown.title.clone()}</span>
                                    <span class="countdown-remaining">
                                        {move || {
                                            remaining
                                                .time_remaining(now.get())
                                                .map(|left| left.compact())
                                                .unwrap_or_else(|| "Invalid date".to_string())
                                        }}
                                    </span>
                                    <span class="countdown-relative">
                                        {move || {
                                            relative
                                                .time_remaining(now.get())
                                                .map(|left| left.relative())
                                                .unwrap_or_default()
                                        }}
                                    </span>
                                    <button type="button" on:click=move |_| start_edit(edit_id.clone())>
                                        "Edit"
                                    </button>
                                    <button type="button" on:click=move |_| delete(delete_id.clone())>
                                        "Delete"
                                    </button>
                                </li>
                            }
                        }
                    </For>
                </ul>
            </Show>
        </div>
    }
}
