//! Per-kind portal defaults compiled from `portals.catalog.toml`.

use std::sync::OnceLock;

use portal_contract::{PortalKind, PortalSize};
use serde::Deserialize;

include!(concat!(env!("OUT_DIR"), "/portal_catalog_generated.rs"));

/// Size used for a kind missing from the catalog.
pub const FALLBACK_PORTAL_SIZE: PortalSize = PortalSize {
    width: 400,
    height: 400,
};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
/// Catalog entry describing one portal kind's defaults and icon-bar placement.
pub struct PortalCatalogEntry {
    /// Kind identifier, matching [`PortalKind::slug`].
    pub slug: String,
    /// Default title used when a portal is opened without one.
    pub title: String,
    /// Glyph shown on the icon bar.
    pub glyph: String,
    /// Default width in px.
    pub default_width: i32,
    /// Default height in px.
    pub default_height: i32,
    /// Whether the kind has an icon-bar button.
    pub show_in_icon_bar: bool,
    /// Position on the icon bar.
    pub icon_bar_order: u32,
}

impl PortalCatalogEntry {
    /// Resolves the entry's slug to a [`PortalKind`].
    pub fn kind(&self) -> Option<PortalKind> {
        self.slug.parse().ok()
    }

    /// Default size for newly opened portals of this kind.
    pub fn default_size(&self) -> PortalSize {
        PortalSize {
            width: self.default_width,
            height: self.default_height,
        }
    }
}

/// Returns every catalog entry in icon-bar order.
pub fn catalog_entries() -> &'static [PortalCatalogEntry] {
    static CATALOG: OnceLock<Vec<PortalCatalogEntry>> = OnceLock::new();
    CATALOG.get_or_init(|| {
        serde_json::from_str(PORTAL_CATALOG_JSON).expect("generated portal catalog should parse")
    })
}

/// Returns the catalog entry for `kind`.
pub fn catalog_entry(kind: PortalKind) -> Option<&'static PortalCatalogEntry> {
    catalog_entries()
        .iter()
        .find(|entry| entry.slug == kind.slug())
}

/// Default size for `kind`.
pub fn default_size(kind: PortalKind) -> PortalSize {
    catalog_entry(kind)
        .map(PortalCatalogEntry::default_size)
        .unwrap_or(FALLBACK_PORTAL_SIZE)
}

/// Default display title for `kind`.
pub fn default_title(kind: PortalKind) -> String {
    catalog_entry(kind)
        .map(|entry| entry.title.clone())
        .unwrap_or_else(|| kind.slug().to_string())
}

/// Icon glyph for `kind`.
pub fn glyph(kind: PortalKind) -> &'static str {
    catalog_entry(kind)
        .map(|entry| entry.glyph.as_str())
        .unwrap_or("▢")
}

/// Kinds shown on the icon bar, in order.
pub fn icon_bar_kinds() -> Vec<PortalKind> {
    catalog_entries()
        .iter()
        .filter(|entry| entry.show_in_icon_bar)
        .filter_map(PortalCatalogEntry::kind)
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn every_kind_has_a_catalog_entry() {
        for kind in PortalKind::ALL {
            assert!(catalog_entry(kind).is_some(), "missing catalog entry for {kind}");
        }
        assert_eq!(catalog_entries().len(), PortalKind::ALL.len());
    }

    #[test]
    fn catalog_sizes_match_dashboard_defaults() {
        assert_eq!(
            default_size(PortalKind::Weather),
            PortalSize {
                width: 400,
                height: 500
            }
        );
        assert_eq!(
            default_size(PortalKind::Clock),
            PortalSize {
                width: 300,
                height: 200
            }
        );
        assert_eq!(default_size(PortalKind::News), FALLBACK_PORTAL_SIZE);
    }

    #[test]
    fn icon_bar_is_ordered_and_excludes_hidden_kinds() {
        let kinds = icon_bar_kinds();
        assert_eq!(kinds.first(), Some(&PortalKind::Weather));
        assert!(!kinds.contains(&PortalKind::Settings));
        let orders: Vec<u32> = catalog_entries()
            .iter()
            .map(|entry| entry.icon_bar_order)
            .collect();
        let mut sorted = orders.clone();
        sorted.sort_unstable();
        assert_eq!(orders, sorted);
    }

    #[test]
    fn default_titles_come_from_the_catalog() {
        assert_eq!(default_title(PortalKind::Clock), "World Clock");
        assert_eq!(default_title(PortalKind::PasswordGenerator), "Password Generator");
    }
}
