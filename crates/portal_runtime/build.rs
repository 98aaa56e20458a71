use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const CATALOG_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Deserialize)]
struct PortalCatalogFile {
    schema_version: u32,
    portal: Vec<PortalCatalogEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PortalCatalogEntry {
    slug: String,
    title: String,
    glyph: String,
    default_width: i32,
    default_height: i32,
    show_in_icon_bar: bool,
    icon_bar_order: u32,
}

fn main() {
    let crate_root = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").expect("manifest dir"));
    let path = crate_root.join("portals.catalog.toml");
    println!("cargo:rerun-if-changed={}", path.display());

    let raw = fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("failed to read {}: {err}", path.display()));
    let catalog: PortalCatalogFile = toml::from_str(&raw)
        .unwrap_or_else(|err| panic!("failed to parse {}: {err}", path.display()));
    if catalog.schema_version != CATALOG_SCHEMA_VERSION {
        panic!(
            "catalog schema mismatch in {}: expected {CATALOG_SCHEMA_VERSION} found {}",
            path.display(),
            catalog.schema_version
        );
    }

    let mut seen = BTreeSet::new();
    for entry in &catalog.portal {
        if !seen.insert(entry.slug.clone()) {
            panic!("duplicate portal slug `{}` in {}", entry.slug, path.display());
        }
        if entry.default_width <= 0 || entry.default_height <= 0 {
            panic!(
                "portal `{}` in {} must have a positive default size",
                entry.slug,
                path.display()
            );
        }
    }

    let mut entries = catalog.portal;
    entries.sort_by_key(|entry| entry.icon_bar_order);
    let json = serde_json::to_string_pretty(&entries).expect("serialize portal catalog");
    let generated = format!(
        "/// Build-time generated portal catalog JSON.\n\
pub const PORTAL_CATALOG_JSON: &str = r##\"{}\"##;\n",
        json
    );

    let out_dir = PathBuf::from(std::env::var("OUT_DIR").expect("OUT_DIR"));
    let out_file = out_dir.join("portal_catalog_generated.rs");
    fs::write(&out_file, generated)
        .unwrap_or_else(|err| panic!("failed to write {}: {err}", out_file.display()));
}
