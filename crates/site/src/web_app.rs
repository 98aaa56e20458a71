use leptos::*;
use leptos_meta::*;
use leptos_router::*;
use platform_host::next_monotonic_timestamp_ms;
use portal_contract::PortalKind;
use portal_runtime::{use_portal_runtime, PortalAction, PortalProvider, PortalShell, ShellLayout};

#[component]
pub fn SiteApp() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="Portals" />
        <Meta name="description" content="A dashboard of small floating widget portals." />

        <Router>
            <main class="site-root">
                <Routes>
                    <Route path="" view=PortalEntry />
                </Routes>
            </main>
        </Router>
    }
}

/// Shell entry. `?layout=stack` picks the stacked layout and `?open=clock,quicksave` opens
/// portals on load.
#[component]
pub fn PortalEntry() -> impl IntoView {
    let query = use_query_map();
    let (layout, open) = query.with_untracked(|query| {
        (
            query.get("layout").and_then(|raw| layout_from_query(raw)),
            query.get("open").map(|raw| kinds_from_query(raw)).unwrap_or_default(),
        )
    });

    view! {
        <PortalProvider layout=layout.unwrap_or_default()>
            <DeepLinkOpener kinds=open />
            <PortalShell />
        </PortalProvider>
    }
}

#[component]
fn DeepLinkOpener(kinds: Vec<PortalKind>) -> impl IntoView {
    let runtime = use_portal_runtime();
    for kind in kinds {
        runtime.dispatch_action(PortalAction::Open {
            kind,
            title: None,
            created_at_ms: next_monotonic_timestamp_ms(),
        });
    }
}

fn layout_from_query(raw: &str) -> Option<ShellLayout> {
    match raw.trim() {
        "free" | "free-form" => Some(ShellLayout::FreeForm),
        "stack" => Some(ShellLayout::Stack),
        other => {
            logging::warn!("ignoring unknown layout `{other}`");
            None
        }
    }
}

fn kinds_from_query(raw: &str) -> Vec<PortalKind> {
    let mut kinds = Vec::new();
    for slug in raw.split(',').map(str::trim).filter(|slug| !slug.is_empty()) {
        match slug.parse::<PortalKind>() {
            Ok(kind) if !kinds.contains(&kind) => kinds.push(kind),
            Ok(_) => {}
            Err(err) => logging::warn!("ignoring deep link: {err}"),
        }
    }
    kinds
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn open_query_keeps_known_kinds_once_in_order() {
        assert_eq!(
            kinds_from_query("clock, bogus,quicksave,clock,,"),
            vec![PortalKind::Clock, PortalKind::Quicksave]
        );
    }

    #[test]
    fn layout_query_accepts_known_names_only() {
        assert_eq!(layout_from_query("stack"), Some(ShellLayout::Stack));
        assert_eq!(layout_from_query("free-form"), Some(ShellLayout::FreeForm));
        assert_eq!(layout_from_query("grid"), None);
    }
}
