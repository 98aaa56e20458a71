//! World clock portal: live time for saved locations plus date reminders.

mod model;

use std::time::Duration;

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use leptos::*;
use platform_host::unix_time_ms_now;
use portal_contract::{portal_primary_input_dom_id, PortalMountContext};

pub use model::{
    format_date, format_time, format_utc_offset, search_presets, ClockLocation, ClockSection,
    Reminder, ReminderInputError, ReminderTarget, TimezonePreset, LOCAL_LOCATION_ID,
    TIMEZONE_PRESETS,
};

const REMINDER_POLL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClockTab {
    Now,
    Locations,
    Reminders,
}

impl ClockTab {
    const ALL: [Self; 3] = [Self::Now, Self::Locations, Self::Reminders];

    fn label(self) -> &'static str {
        match self {
            Self::Now => "Now",
            Self::Locations => "Locations",
            Self::Reminders => "Reminders",
        }
    }
}

fn local_offset_minutes() -> i32 {
    Local::now().offset().local_minus_utc() / 60
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Mounts the world clock widget inside a portal.
pub fn mount_clock_portal(context: PortalMountContext) -> View {
    view! { <ClockPortal context=context /> }.into_view()
}

#[component]
/// Tabbed clock view persisted to the `clock` section.
pub fn ClockPortal(
    /// Runtime-provided portal context.
    context: PortalMountContext,
) -> impl IntoView {
    let sections = context.sections.clone();
    let initial = sections
        .get::<ClockSection>()
        .unwrap_or_else(|| ClockSection::with_local(local_offset_minutes()));
    let section = create_rw_signal(initial.clone());
    let last_saved = create_rw_signal(Some(initial));
    let now = create_rw_signal::<DateTime<Utc>>(Utc::now());
    let tab = create_rw_signal(ClockTab::Now);
    let fired = create_rw_signal(Vec::<Reminder>::new());
    let input_id = portal_primary_input_dom_id(&context.portal.get_untracked().id);

    if let Ok(interval) = set_interval_with_handle(move || now.set(Utc::now()), Duration::from_secs(1)) {
        on_cleanup(move || interval.clear());
    }
    let poll_reminders = move || {
        let due = section
            .try_update(|section| section.take_due_reminders(local_now()))
            .unwrap_or_default();
        if !due.is_empty() {
            logging::log!("clock: {} reminder(s) due", due.len());
            fired.update(|fired| fired.extend(due));
        }
    };
    poll_reminders();
    if let Ok(interval) = set_interval_with_handle(poll_reminders, REMINDER_POLL) {
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

    view! {
        <div class="clock-portal">
            <nav class="clock-tabs" role="tablist">
                {ClockTab::ALL
                    .into_iter()
                    .map(|entry| {
                        let id = (entry == ClockTab::Now).then(|| input_id.clone());
                        view! {
                            <button
                                id=id
                                type="button"
                                role="tab"
                                aria-selected=move || if tab.get() == entry { "true" } else { "false" }
                                on:click=move |_| tab.set(entry)
                            >
                                {entry.label()}
                            </button>
                        }
                    })
                    .collect_view()}
                <label class="clock-format">
                    <input
                        type="checkbox"
                        prop:checked=move || section.with(|section| section.use_24_hour)
                        on:change=move |ev| {
                            let checked = event_target_checked(&ev);
                            section.update(|section| section.use_24_hour = checked);
                        }
                    />
                    "24h"
                </label>
            </nav>

            <Show when=move || !fired.with(Vec::is_empty) fallback=|| ()>
                <div class="clock-due" role="alert">
                    <For each=move || fired.get() key=|reminder| reminder.id.clone() let:reminder>
                        <p>{format!("{}: {}", reminder.location_name, reminder.description)}</p>
                    </For>
                    <button type="button" on:click=move |_| fired.set(Vec::new())>"Dismiss"</button>
                </div>
            </Show>

            {move || match tab.get() {
                ClockTab::Now => view! { <NowTab section=section now=now /> }.into_view(),
                ClockTab::Locations => view! { <LocationsTab section=section now=now /> }.into_view(),
                ClockTab::Reminders => view! { <RemindersTab section=section /> }.into_view(),
            }}
        </div>
    }
}

#[component]
fn NowTab(section: RwSignal<ClockSection>, now: RwSignal<DateTime<Utc>>) -> impl IntoView {
    let active = move || section.with(|section| section.active_location().cloned());
    view! {
        <div class="clock-now">
            {move || match active() {
                Some(location) => {
                    let wall = location.wall_clock(now.get());
                    let use_24_hour = section.with(|section| section.use_24_hour);
                    view! {
                        <div class="clock-face">
                            <div class="clock-time">{format_time(wall.time(), use_24_hour)}</div>
                            <div class="clock-date">{format_date(wall.date())}</div>
                            <div class="clock-zone">
                                {format!("{} · {}", location.city, format_utc_offset(location.offset))}
                            </div>
                        </div>
                    }
                    .into_view()
                }
                None => view! { <p class="clock-empty">"Add a location to see its time."</p> }
                    .into_view(),
            }}
        </div>
    }
}

#[component]
fn LocationsTab(
    section: RwSignal<ClockSection>,
    now: RwSignal<DateTime<Utc>>,
) -> impl IntoView {
    let query = create_rw_signal(String::new());
    let matches = move || query.with(|query| search_presets(query));

    view! {
        <div class="clock-locations">
            <input
                type="search"
                placeholder="Search cities or countries"
                prop:value=move || query.get()
                on:input=move |ev| query.set(event_target_value(&ev))
            />
            <ul class="clock-search-results">
                {move || {
                    matches()
                        .into_iter()
                        .map(|preset| {
                            let already = section.with(|section| {
                                section.locations.iter().any(|l| l.timezone == preset.timezone)
                            });
                            view! {
                                <li>
                                    <button
                                        type="button"
                                        disabled=already
                                        on:click=move |_| {
                                            section.update(|section| {
                                                section.add_location(preset, unix_time_ms_now());
                                            });
                                            query.set(String::new());
                                        }
                                    >
                                        {format!("{}, {}", preset.city, preset.country)}
                                    </button>
                                </li>
                            }
                        })
                        .collect_view()
                }}
            </ul>
            <ul class="clock-location-list">
                <For
                    each=move || section.with(|section| section.locations.clone())
                    key=|location| location.id.clone()
                    let:location
                >
                    {
                        let select_id = location.id.clone();
                        let remove_id = location.id.clone();
                        let active_id = location.id.clone();
                        let is_active = move || {
                            section.with(|section| {
                                section.active_location().map(|l| l.id.as_str()) == Some(active_id.as_str())
                            })
                        };
                        let time_location = location.clone();
                        view! {
                            <li class="clock-location" class:active=is_active>
                                <button type="button" on:click=move |_| {
                                    section.update(|section| {
                                        section.set_active(&select_id);
                                    });
                                }>
                                    <span class="clock-city">{location.city.clone()}</span>
                                    <span class="clock-location-time">
                                        {move || {
                                            let use_24_hour = section.with(|section| section.use_24_hour);
                                            format_time(time_location.wall_clock(now.get()).time(), use_24_hour)
                                        }}
                                    </span>
                                </button>
                                <button
                                    type="button"
                                    aria-label="Remove location"
                                    on:click=move |_| {
                                        section.update(|section| {
                                            section.remove_location(&remove_id);
                                        });
                                    }
                                >
                                    "×"
                                </button>
                            </li>
                        }
                    }
                </For>
            </ul>
        </div>
    }
}

#[component]
fn RemindersTab(section: RwSignal<ClockSection>) -> impl IntoView {
    let date = create_rw_signal(String::new());
    let time = create_rw_signal(String::new());
    let description = create_rw_signal(String::new());
    let all_locations = create_rw_signal(false);
    let notify = create_rw_signal(true);
    let form_error = create_rw_signal(None::<String>);

    let submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let target = if all_locations.get_untracked() {
            ReminderTarget::AllLocations
        } else {
            match section.with_untracked(|section| section.active_location().map(|l| l.id.clone())) {
                Some(id) => ReminderTarget::Location(id),
                None => ReminderTarget::AllLocations,
            }
        };
        let outcome = section
            .try_update(|section| {
                section.add_reminder(
                    &target,
                    &date.get_untracked(),
                    &time.get_untracked(),
                    &description.get_untracked(),
                    notify.get_untracked(),
                    unix_time_ms_now(),
                )
            })
            .unwrap_or_else(|| Ok(Vec::new()));
        match outcome {
            Ok(_) => {
                description.set(String::new());
                form_error.set(None);
            }
            Err(err) => form_error.set(Some(err.to_string())),
        }
    };

    view! {
        <div class="clock-reminders">
            <form on:submit=submit>
                <input
                    type="date"
                    prop:value=move || date.get()
                    on:input=move |ev| date.set(event_target_value(&ev))
                />
                <input
                    type="time"
                    prop:value=move || time.get()
                    on:input=move |ev| time.set(event_target_value(&ev))
                />
                <input
                    type="text"
                    placeholder="Description"
                    prop:value=move || description.get()
                    on:input=move |ev| description.set(event_target_value(&ev))
                />
                <label>
                    <input
                        type="checkbox"
                        prop:checked=move || all_locations.get()
                        on:change=move |ev| all_locations.set(event_target_checked(&ev))
                    />
                    "All locations"
                </label>
                <label>
                    <input
                        type="checkbox"
                        prop:checked=move || notify.get()
                        on:change=move |ev| notify.set(event_target_checked(&ev))
                    />
                    "Alert me"
                </label>
                <button type="submit">"Add reminder"</button>
                <Show when=move || form_error.get().is_some() fallback=|| ()>
                    <p class="clock-error" role="alert">{move || form_error.get()}</p>
                </Show>
            </form>
            <ul class="clock-reminder-list">
                <For
                    each=move || section.with(ClockSection::reminders_by_due_time)
                    key=|reminder| reminder.clone()
                    let:reminder
                >
                    {
                        let remove_id = reminder.id.clone();
                        let past = reminder.is_past(local_now());
                        view! {
                            <li class="clock-reminder" class:past=past>
                                <span>{reminder.date_time.replace('T', " ")}</span>
                                <span>{reminder.location_name.clone()}</span>
                                <span>{reminder.description.clone()}</span>
                                <button
                                    type="button"
                                    aria-label="Delete reminder"
                                    on:click=move |_| {
                                        section.update(|section| {
                                            section.remove_reminder(&remove_id);
                                        });
                                    }
                                >
                                    "×"
                                </button>
                            </li>
                        }
                    }
                </For>
            </ul>
        </div>
    }
}
