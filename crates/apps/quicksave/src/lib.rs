//! Quick Save portal: a categorized scratch list of things to come back to.

mod model;

use leptos::*;
use platform_host::unix_time_ms_now;
use portal_contract::{portal_primary_input_dom_id, PortalMountContext};

pub use model::{QuickSaveCategory, QuickSaveItem, QuickSaveSection};

/// Mounts the quick save widget inside a portal.
pub fn mount_quicksave_portal(context: PortalMountContext) -> View {
    view! { <QuickSavePortal context=context /> }.into_view()
}

#[component]
/// Item list with category filter and inline rename, persisted to the `quicksave` section.
pub fn QuickSavePortal(
    /// Runtime-provided portal context.
    context: PortalMountContext,
) -> impl IntoView {
    let sections = context.sections.clone();
    let initial = sections.get::<QuickSaveSection>().unwrap_or_default();
    let section = create_rw_signal(initial.clone());
    let last_saved = create_rw_signal(Some(initial));
    let new_title = create_rw_signal(String::new());
    let new_category = create_rw_signal(QuickSaveCategory::default());
    let filter = create_rw_signal(None::<QuickSaveCategory>);
    let renaming = create_rw_signal(None::<(String, String)>);
    let input_id = portal_primary_input_dom_id(&context.portal.get_untracked().id);

    create_effect(move |_| {
        let current = section.get();
        if last_saved.get_untracked().as_ref() == Some(&current) {
            return;
        }
        sections.set(&current);
        last_saved.set(Some(current));
    });

    let submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let title = new_title.get_untracked();
        let category = new_category.get_untracked();
        let added = section
            .try_update(|section| section.add(&title, category, unix_time_ms_now()))
            .flatten();
        if added.is_some() {
            new_title.set(String::new());
        }
    };

    let commit_rename = move || {
        if let Some((id, title)) = renaming.get_untracked() {
            section.update(|section| {
                section.update(&id, Some(&title), None);
            });
        }
        renaming.set(None);
    };

    let visible = move || section.with(|section| section.filtered(filter.get()));

    let filter_button = move |category: Option<QuickSaveCategory>| {
        let label = move || match category {
            Some(category) => format!(
                "{} {} ({})",
                category.emoji(),
                category.label(),
                section.with(|section| section.count(category))
            ),
            None => format!("All ({})", section.with(|section| section.items.len())),
        };
        view! {
            <button
                type="button"
                class="quicksave-filter"
                aria-pressed=move || if filter.get() == category { "true" } else { "false" }
                on:click=move |_| filter.set(category)
            >
                {label}
            </button>
        }
    };

    view! {
        <div class="quicksave-portal">
            <form class="quicksave-form" on:submit=submit>
                <input
                    id=input_id
                    type="text"
                    placeholder="Save a movie, book, link..."
                    prop:value=move || new_title.get()
                    on:input=move |ev| new_title.set(event_target_value(&ev))
                />
                <select
                    aria-label="Category"
                    on:change=move |ev| {
                        if let Some(category) = QuickSaveCategory::from_slug(&event_target_value(&ev)) {
                            new_category.set(category);
                        }
                    }
                >
                    {QuickSaveCategory::ALL
                        .into_iter()
                        .map(|category| {
                            view! {
                                <option
                                    value=category.slug()
                                    selected=move || new_category.get() == category
                                >
                                    {format!("{} {}", category.emoji(), category.label())}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
                <button type="submit">"Save"</button>
            </form>

            <div class="quicksave-filters" role="toolbar" aria-label="Filter by category">
                {filter_button(None)}
                {QuickSaveCategory::ALL
                    .into_iter()
                    .map(|category| filter_button(Some(category)))
                    .collect_view()}
            </div>

            <Show
                when=move || !visible().is_empty()
                fallback=|| view! { <p class="quicksave-empty">"Nothing saved here yet."</p> }
            >
                <ul class="quicksave-list">
                    <For each=visible key=|item| item.clone() let:item>
                        {
                            let id = item.id.clone();
                            let rename_id = item.id.clone();
                            let delete_id = item.id.clone();
                            let recategorize_id = item.id.clone();
                            let rename_title = item.title.clone();
                            let is_renaming = move || {
                                renaming.with(|renaming| {
                                    renaming.as_ref().is_some_and(|(current, _)| current == &id)
                                })
                            };
                            let label = match item.href() {
                                Some(href) => view! {
                                    <a href=href.to_string() target="_blank" rel="noopener noreferrer">
                                        {item.title.clone()}
                                    </a>
                                }
                                .into_view(),
                                None => view! { <span>{item.title.clone()}</span> }.into_view(),
                            };
                            view! {
                                <li class=format!("quicksave-item quicksave-{}", item.category.slug())>
                                    <span class="quicksave-category" aria-hidden="true">
                                        {item.category.emoji()}
                                    </span>
                                    <Show when=is_renaming fallback=move || label.clone()>
                                        <input
                                            type="text"
                                            aria-label="Rename item"
                                            prop:value=move || {
                                                renaming.get().map(|(_, title)| title).unwrap_or_default()
                                            }
                                            on:input=move |ev| {
                                                let value = event_target_value(&ev);
                                                renaming.update(|renaming| {
                                                    if let Some((_, title)) = renaming {
                                                        *title = value;
                                                    }
                                                });
                                            }
                                            on:keydown=move |ev: ev::KeyboardEvent| match ev.key().as_str() {
                                                "Enter" => commit_rename(),
                                                "Escape" => renaming.set(None),
                                                _ => {}
                                            }
                                            on:blur=move |_| commit_rename()
                                        />
                                    </Show>
                                    <span class="quicksave-date">{item.saved_on()}</span>
                                    <select
                                        aria-label="Move to category"
                                        on:change=move |ev| {
                                            if let Some(category) = QuickSaveCategory::from_slug(&event_target_value(&ev)) {
                                                section.update(|section| {
                                                    section.update(&recategorize_id, None, Some(category));
                                                });
                                            }
                                        }
                                    >
                                        {QuickSaveCategory::ALL
                                            .into_iter()
                                            .map(|category| {
                                                view! {
                                                    <option
                                                        value=category.slug()
                                                        selected=item.category == category
                                                    >
                                                        {category.label()}
                                                    </option>
                                                }
                                            })
                                            .collect_view()}
                                    </select>
                                    <button
                                        type="button"
                                        on:click=move |_| {
                                            renaming.set(Some((rename_id.clone(), rename_title.clone())))
                                        }
                                    >
                                        "Rename"
                                    </button>
                                    <button
                                        type="button"
                                        on:click=move |_| {
                                            section.update(|section| {
                                                section.delete(&delete_id);
                                            });
                                        }
                                    >
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
