//! Serialization boundary between the portal directory and durable local storage.
//!
//! Everything lives in one JSON document under [`PORTAL_DOCUMENT_KEY`]:
//!
//! ```json
//! { "schema_version": 1, "portals": { "open": [{ "id": "...", "type": "...", "title": "..." }] },
//!   "clock": { ... }, "countdown": { ... } }
//! ```
//!
//! Reads are lenient. A missing, unreadable, or corrupt document reads as the empty default, and
//! a malformed portal entry is dropped without affecting its siblings or any widget section.
//! Writes always re-read the current document first, so updating the portal list never clobbers
//! a widget section and vice versa.

use std::rc::Rc;

use leptos::logging;
use platform_host::LocalStorage;
use portal_contract::SectionBackend;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Storage key holding the whole dashboard document.
pub const PORTAL_DOCUMENT_KEY: &str = "portal-wall";
/// Schema version written by this build. Documents without a version are version 0.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

const PORTALS_FIELD: &str = "portals";
const SCHEMA_VERSION_FIELD: &str = "schema_version";

#[derive(Debug, Error)]
/// Failures surfaced by [`PersistenceAdapter::try_save`].
pub enum PersistenceError {
    /// The host has no durable storage.
    #[error("durable storage is unavailable")]
    Unavailable,
    /// The document could not be encoded.
    #[error("failed to serialize portal document: {0}")]
    Serialize(#[from] serde_json::Error),
    /// The storage rejected the write.
    #[error("failed to write portal document: {0}")]
    Write(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Minimal identity needed to reopen a portal after reload.
pub struct PortalIdentity {
    /// Portal id as stored.
    pub id: String,
    /// Portal kind slug as stored. Unknown kinds survive here and are filtered at hydration.
    #[serde(rename = "type")]
    pub kind: String,
    /// Display label.
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
/// `portals` section of the document.
pub struct OpenPortals {
    /// Open portals, front-most first.
    #[serde(default)]
    pub open: Vec<PortalIdentity>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// The single persisted dashboard document.
pub struct PersistedDocument {
    /// Document schema version.
    pub schema_version: u32,
    /// Open portal identities.
    pub portals: OpenPortals,
    /// Widget-owned sections keyed by portal kind slug. Opaque to the runtime.
    #[serde(flatten)]
    pub sections: Map<String, Value>,
}

impl Default for PersistedDocument {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            portals: OpenPortals::default(),
            sections: Map::new(),
        }
    }
}

impl PersistedDocument {
    /// Builds a document from a decoded JSON object, dropping whatever does not fit.
    pub fn from_object(mut object: Map<String, Value>) -> Self {
        let schema_version = object
            .remove(SCHEMA_VERSION_FIELD)
            .and_then(|value| value.as_u64())
            .and_then(|value| u32::try_from(value).ok())
            .unwrap_or(0);
        let portals = object
            .remove(PORTALS_FIELD)
            .map(parse_open_portals)
            .unwrap_or_default();

        migrate(Self {
            schema_version,
            portals,
            sections: object,
        })
    }

    /// Returns the raw section stored under `name`.
    pub fn section(&self, name: &str) -> Option<&Value> {
        self.sections.get(name)
    }
}

fn parse_open_portals(raw: Value) -> OpenPortals {
    let Some(entries) = raw.get("open").and_then(Value::as_array) else {
        if !raw.is_null() {
            logging::warn!("portal document has a malformed `portals` section; ignoring it");
        }
        return OpenPortals::default();
    };

    let open = entries
        .iter()
        .filter_map(|entry| {
            serde_json::from_value::<PortalIdentity>(entry.clone())
                .map_err(|err| logging::warn!("dropping malformed portal entry {entry}: {err}"))
                .ok()
        })
        .collect();
    OpenPortals { open }
}

fn migrate(mut document: PersistedDocument) -> PersistedDocument {
    match document.schema_version {
        0 => document.schema_version = CURRENT_SCHEMA_VERSION,
        CURRENT_SCHEMA_VERSION => {}
        newer => logging::warn!(
            "portal document schema {newer} is newer than {CURRENT_SCHEMA_VERSION}; reading leniently"
        ),
    }
    document
}

fn is_reserved_section(name: &str) -> bool {
    name == PORTALS_FIELD || name == SCHEMA_VERSION_FIELD
}

#[derive(Clone)]
/// Reads and writes the dashboard document through a [`LocalStorage`] capability.
pub struct PersistenceAdapter {
    storage: Rc<dyn LocalStorage>,
    key: String,
}

impl PersistenceAdapter {
    /// Creates an adapter over `storage` using [`PORTAL_DOCUMENT_KEY`].
    pub fn new(storage: Rc<dyn LocalStorage>) -> Self {
        Self::with_key(storage, PORTAL_DOCUMENT_KEY)
    }

    /// Creates an adapter over `storage` using a custom document key.
    pub fn with_key(storage: Rc<dyn LocalStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Returns the storage key this adapter owns.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Loads the stored document, or the empty default when nothing usable is stored.
    pub fn load(&self) -> PersistedDocument {
        let raw = match self.storage.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return PersistedDocument::default(),
            Err(err) => {
                logging::warn!("portal document read failed: {err}");
                return PersistedDocument::default();
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(object)) => PersistedDocument::from_object(object),
            Ok(_) => {
                logging::warn!("portal document is not a JSON object; starting empty");
                PersistedDocument::default()
            }
            Err(err) => {
                logging::warn!("portal document is corrupt ({err}); starting empty");
                PersistedDocument::default()
            }
        }
    }

    /// Serializes and overwrites the whole document.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Unavailable`] when the host has no durable storage, and
    /// serialization or write errors otherwise.
    pub fn try_save(&self, document: &PersistedDocument) -> Result<(), PersistenceError> {
        if !self.storage.is_available() {
            return Err(PersistenceError::Unavailable);
        }
        let raw = serde_json::to_string(document)?;
        self.storage
            .set_item(&self.key, &raw)
            .map_err(PersistenceError::Write)
    }

    /// Saves the document, logging instead of returning failures.
    pub fn save(&self, document: &PersistedDocument) {
        log_save_failure(self.try_save(document));
    }

    /// Replaces the open-portal list, keeping every widget section as currently stored.
    ///
    /// # Errors
    ///
    /// See [`PersistenceAdapter::try_save`].
    pub fn save_open_portals(&self, open: Vec<PortalIdentity>) -> Result<(), PersistenceError> {
        let mut document = self.load();
        document.portals.open = open;
        self.try_save(&document)
    }

    /// Reads and decodes the section `name`.
    ///
    /// An absent section and one that does not decode as `T` both read as `None`.
    pub fn get_section<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        let raw = self.load().sections.remove(name)?;
        serde_json::from_value(raw)
            .map_err(|err| logging::warn!("section `{name}` did not decode: {err}"))
            .ok()
    }

    /// Encodes `value` and stores it as section `name` via read-modify-write.
    pub fn set_section<T: Serialize>(&self, name: &str, value: &T) {
        match serde_json::to_value(value) {
            Ok(raw) => self.set_section_value(name, raw),
            Err(err) => logging::warn!("section `{name}` failed to serialize: {err}"),
        }
    }

    fn set_section_value(&self, name: &str, value: Value) {
        if is_reserved_section(name) {
            logging::warn!("refusing to overwrite reserved section `{name}`");
            return;
        }
        let mut document = self.load();
        document.sections.insert(name.to_string(), value);
        self.save(&document);
    }

    /// Removes the whole document from storage.
    pub fn clear(&self) {
        if let Err(err) = self.storage.remove_item(&self.key) {
            logging::warn!("clearing portal document failed: {err}");
        }
    }

    /// Returns the stored document's size in bytes, or 0 when nothing is stored.
    pub fn storage_size(&self) -> usize {
        self.storage
            .get_item(&self.key)
            .ok()
            .flatten()
            .map(|raw| raw.len())
            .unwrap_or(0)
    }
}

impl SectionBackend for PersistenceAdapter {
    fn load_section(&self, name: &str) -> Option<Value> {
        self.load().sections.remove(name)
    }

    fn save_section(&self, name: &str, value: Value) {
        self.set_section_value(name, value);
    }
}

/// Logs a save outcome. A host without durable storage is expected and stays quiet.
pub fn log_save_failure(result: Result<(), PersistenceError>) {
    match result {
        Ok(()) | Err(PersistenceError::Unavailable) => {}
        Err(err) => logging::warn!("{err}"),
    }
}

#[cfg(test)]
mod tests {
    use platform_host::{FailingLocalStorage, MemoryLocalStorage, NoopLocalStorage};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn identity(id: &str, kind: &str, title: &str) -> PortalIdentity {
        PortalIdentity {
            id: id.to_string(),
            kind: kind.to_string(),
            title: title.to_string(),
        }
    }

    fn adapter_over(raw: &str) -> (MemoryLocalStorage, PersistenceAdapter) {
        let storage = MemoryLocalStorage::with_item(PORTAL_DOCUMENT_KEY, raw);
        let adapter = PersistenceAdapter::new(Rc::new(storage.clone()));
        (storage, adapter)
    }

    fn stored(storage: &MemoryLocalStorage) -> Option<String> {
        storage.get_item(PORTAL_DOCUMENT_KEY).expect("get")
    }

    #[test]
    fn empty_storage_loads_default_document() {
        let adapter = PersistenceAdapter::new(Rc::new(MemoryLocalStorage::default()));
        let document = adapter.load();
        assert_eq!(document, PersistedDocument::default());
        assert_eq!(
            serde_json::to_value(&document).expect("encode"),
            json!({ "schema_version": 1, "portals": { "open": [] } })
        );
    }

    #[test]
    fn corrupt_documents_load_as_default() {
        for raw in ["not json", "[1, 2, 3]", "\"portals\"", "{\"portals\": "] {
            let (_, adapter) = adapter_over(raw);
            assert_eq!(adapter.load(), PersistedDocument::default(), "input: {raw}");
        }
    }

    #[test]
    fn malformed_portals_section_keeps_widget_sections() {
        let (_, adapter) = adapter_over(r#"{"portals": 5, "crypto": {"watchlist": ["btc"]}}"#);
        let document = adapter.load();
        assert!(document.portals.open.is_empty());
        assert_eq!(
            document.section("crypto"),
            Some(&json!({ "watchlist": ["btc"] }))
        );
    }

    #[test]
    fn malformed_portal_entries_are_dropped_individually() {
        let (_, adapter) = adapter_over(
            r#"{"portals": {"open": [
                {"id": "weather-1", "type": "weather", "title": "Weather"},
                {"id": 7},
                "clock",
                {"id": "clock-2", "type": "clock"}
            ]}}"#,
        );
        assert_eq!(
            adapter.load().portals.open,
            vec![
                identity("weather-1", "weather", "Weather"),
                identity("clock-2", "clock", "")
            ]
        );
    }

    #[test]
    fn unversioned_document_migrates_to_current_schema() {
        let (_, adapter) = adapter_over(
            r#"{"portals": {"open": [{"id": "news-1", "type": "news", "title": "News"}]},
                "countdown": {"countdowns": []}}"#,
        );
        let document = adapter.load();
        assert_eq!(document.schema_version, CURRENT_SCHEMA_VERSION);
        assert_eq!(document.portals.open.len(), 1);
        assert_eq!(
            document.section("countdown"),
            Some(&json!({ "countdowns": [] }))
        );
    }

    #[test]
    fn save_then_load_reproduces_identity_list() {
        let storage = MemoryLocalStorage::default();
        let adapter = PersistenceAdapter::new(Rc::new(storage));
        let mut document = PersistedDocument::default();
        document.portals.open = vec![
            identity("clock-2", "clock", "Clock"),
            identity("weather-1", "weather", "Weather"),
        ];
        adapter.save(&document);
        assert_eq!(adapter.load().portals.open, document.portals.open);
    }

    #[test]
    fn saving_a_loaded_document_leaves_bytes_unchanged() {
        let storage = MemoryLocalStorage::default();
        let adapter = PersistenceAdapter::new(Rc::new(storage.clone()));
        let mut document = PersistedDocument::default();
        document.portals.open = vec![identity("radio-9", "radio", "Radio")];
        document
            .sections
            .insert("quicksave".to_string(), json!({ "items": [] }));
        adapter.save(&document);
        let first = stored(&storage);

        adapter.save(&adapter.load());
        assert_eq!(stored(&storage), first);
    }

    #[test]
    fn portal_list_writes_preserve_widget_sections() {
        let (storage, adapter) = adapter_over(r#"{"clock": {"format": "24h"}}"#);
        adapter
            .save_open_portals(vec![identity("clock-1", "clock", "Clock")])
            .expect("save portals");

        let document = adapter.load();
        assert_eq!(document.section("clock"), Some(&json!({ "format": "24h" })));
        assert_eq!(document.portals.open.len(), 1);
        assert!(stored(&storage).is_some());
    }

    #[test]
    fn section_writes_preserve_the_portal_list() {
        let (_, adapter) = adapter_over(
            r#"{"portals": {"open": [{"id": "clock-1", "type": "clock", "title": "Clock"}]}}"#,
        );
        adapter.set_section("countdown", &json!({ "countdowns": [1] }));
        assert_eq!(
            adapter.get_section::<Value>("countdown"),
            Some(json!({ "countdowns": [1] }))
        );
        assert_eq!(adapter.load().portals.open.len(), 1);
    }

    #[test]
    fn reserved_sections_cannot_be_overwritten() {
        let (_, adapter) = adapter_over(
            r#"{"portals": {"open": [{"id": "clock-1", "type": "clock", "title": "Clock"}]}}"#,
        );
        adapter.set_section("portals", &json!({ "open": [] }));
        assert_eq!(adapter.load().portals.open.len(), 1);
    }

    #[test]
    fn mismatched_section_reads_as_absent_without_affecting_others() {
        #[derive(Debug, PartialEq, Deserialize)]
        struct Items {
            items: Vec<String>,
        }

        let (_, adapter) = adapter_over(
            r#"{"quicksave": {"items": 3}, "news": {"items": ["a"]}}"#,
        );
        assert_eq!(adapter.get_section::<Items>("quicksave"), None);
        assert_eq!(
            adapter.get_section::<Items>("news"),
            Some(Items {
                items: vec!["a".to_string()]
            })
        );
    }

    #[test]
    fn write_failures_are_reported_by_try_save_and_swallowed_by_save() {
        let storage = FailingLocalStorage::rejecting_writes();
        let adapter = PersistenceAdapter::new(Rc::new(storage.clone()));
        let err = adapter
            .try_save(&PersistedDocument::default())
            .expect_err("write should fail");
        assert!(matches!(err, PersistenceError::Write(_)));

        adapter.save(&PersistedDocument::default());
        adapter.set_section("clock", &json!({}));
        assert!(storage.memory().is_empty());
    }

    #[test]
    fn unavailable_storage_reads_empty_and_refuses_writes() {
        let adapter = PersistenceAdapter::new(Rc::new(NoopLocalStorage));
        assert_eq!(adapter.load(), PersistedDocument::default());
        assert!(matches!(
            adapter.try_save(&PersistedDocument::default()),
            Err(PersistenceError::Unavailable)
        ));
    }

    #[test]
    fn clear_and_storage_size() {
        let raw = r#"{"schema_version":1,"portals":{"open":[]}}"#;
        let (storage, adapter) = adapter_over(raw);
        assert_eq!(adapter.storage_size(), raw.len());

        adapter.clear();
        assert_eq!(adapter.storage_size(), 0);
        assert!(storage.is_empty());
    }

    #[test]
    fn section_backend_round_trips_raw_values() {
        let adapter = PersistenceAdapter::new(Rc::new(MemoryLocalStorage::default()));
        let backend: &dyn SectionBackend = &adapter;
        backend.save_section("voice", json!({ "memos": [] }));
        assert_eq!(backend.load_section("voice"), Some(json!({ "memos": [] })));
        assert_eq!(backend.load_section("radio"), None);
    }
}
