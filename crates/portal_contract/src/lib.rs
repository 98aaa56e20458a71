//! Shared contract types between the portal directory runtime and the widgets it hosts.
//!
//! A widget never sees the whole directory. At mount time it receives a [`PortalMountContext`]
//! carrying a read-only view of its own portal, a [`PortalHandle`] whose actions are scoped to its
//! own id, and a [`PortalSections`] accessor limited to its own persisted section.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use std::{fmt, rc::Rc, str::FromStr};

use leptos::{logging, Callable, Callback, Signal, View};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Closed set of portal kinds the dashboard can host.
///
/// At most one portal of each kind is open at a time, so the kind doubles as a stable address
/// for focus/close requests coming from the icon bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PortalKind {
    /// Current conditions and forecasts for saved locations.
    #[serde(rename = "weather")]
    Weather,
    /// World clock and reminders.
    #[serde(rename = "clock")]
    Clock,
    /// Month view and events.
    #[serde(rename = "calendar")]
    Calendar,
    /// Countdowns to target dates.
    #[serde(rename = "countdown")]
    Countdown,
    /// Saved movies, books, and links.
    #[serde(rename = "quicksave")]
    Quicksave,
    /// Unit conversions with history.
    #[serde(rename = "unitconverter", alias = "unit-converter")]
    UnitConverter,
    /// Password generator.
    #[serde(rename = "passwordgen", alias = "password-generator")]
    PasswordGenerator,
    /// News feed reader.
    #[serde(rename = "news")]
    News,
    /// Internet radio player.
    #[serde(rename = "radio")]
    Radio,
    /// Cryptocurrency watchlist.
    #[serde(rename = "crypto")]
    Crypto,
    /// AI tech headlines.
    #[serde(rename = "ai", alias = "ai-feed")]
    AiFeed,
    /// Voice memo recorder.
    #[serde(rename = "voice", alias = "voice-memo")]
    VoiceMemo,
    /// Live cricket scores.
    #[serde(rename = "cricket")]
    Cricket,
    /// Dashboard settings.
    #[serde(rename = "settings")]
    Settings,
}

impl PortalKind {
    /// Every portal kind, in icon-bar order.
    pub const ALL: [PortalKind; 14] = [
        Self::Weather,
        Self::Clock,
        Self::Calendar,
        Self::Countdown,
        Self::Quicksave,
        Self::UnitConverter,
        Self::PasswordGenerator,
        Self::News,
        Self::Radio,
        Self::Crypto,
        Self::AiFeed,
        Self::VoiceMemo,
        Self::Cricket,
        Self::Settings,
    ];

    /// Returns the persisted slug for this kind.
    ///
    /// The slug is used as the `type` field of stored portals and as the name of the kind's
    /// private section in the persisted document.
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Weather => "weather",
            Self::Clock => "clock",
            Self::Calendar => "calendar",
            Self::Countdown => "countdown",
            Self::Quicksave => "quicksave",
            Self::UnitConverter => "unitconverter",
            Self::PasswordGenerator => "passwordgen",
            Self::News => "news",
            Self::Radio => "radio",
            Self::Crypto => "crypto",
            Self::AiFeed => "ai",
            Self::VoiceMemo => "voice",
            Self::Cricket => "cricket",
            Self::Settings => "settings",
        }
    }

    /// Returns the persisted section name owned by widgets of this kind.
    pub const fn section_name(self) -> &'static str {
        self.slug()
    }
}

impl fmt::Display for PortalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown portal kind `{0}`")]
/// Returned when a stored or requested portal type is not part of [`PortalKind`].
pub struct UnknownPortalKind(pub String);

impl FromStr for PortalKind {
    type Err = UnknownPortalKind;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim();
        let kind = match normalized {
            "unit-converter" => Self::UnitConverter,
            "password-generator" => Self::PasswordGenerator,
            "ai-feed" => Self::AiFeed,
            "voice-memo" => Self::VoiceMemo,
            other => Self::ALL
                .into_iter()
                .find(|kind| kind.slug() == other)
                .ok_or_else(|| UnknownPortalKind(raw.to_string()))?,
        };
        Ok(kind)
    }
}

/// Opaque portal identifier, unique and stable for the lifetime of the instance.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortalId(String);

impl PortalId {
    /// Mints an id from a kind and a creation timestamp, for example `weather-1718000000000`.
    ///
    /// Ids are only unique if no two opens share a timestamp, so callers pass
    /// `platform_host::next_monotonic_timestamp_ms` rather than the raw clock. Two clicks on the
    /// same icon within one millisecond then still get distinct ids.
    pub fn mint(kind: PortalKind, created_at_ms: u64) -> Self {
        Self(format!("{}-{}", kind.slug(), created_at_ms))
    }

    /// Wraps an id read back from storage.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the string form of the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PortalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// DOM id a widget puts on its primary input so the runtime can focus it after opening.
pub fn portal_primary_input_dom_id(id: &PortalId) -> String {
    format!("portal-input-{}", id.as_str())
}

/// Top-left corner of a free-placed portal, in CSS pixels relative to the portal layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PortalPosition {
    /// Horizontal offset.
    pub x: i32,
    /// Vertical offset.
    pub y: i32,
}

/// Outer size of a free-placed portal, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalSize {
    /// Width.
    pub width: i32,
    /// Height.
    pub height: i32,
}

/// Read-only portal metadata handed to a widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalView {
    /// Portal id.
    pub id: PortalId,
    /// Portal kind.
    pub kind: PortalKind,
    /// Display label chosen at open time.
    pub title: String,
    /// Whether the portal is hidden from the main layout.
    pub minimized: bool,
    /// Whether the portal is currently front-most.
    pub is_front: bool,
}

/// Directory actions a widget may request for its own portal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortalCommand {
    /// Close the portal.
    Close,
    /// Bring the portal to the front, restoring it when minimized.
    Focus,
    /// Flip the minimized flag.
    ToggleMinimize,
    /// Commit a new position.
    UpdatePosition(PortalPosition),
    /// Commit a new size.
    UpdateSize(PortalSize),
}

#[derive(Clone, Copy)]
/// Directory action handles bound to a single portal id.
pub struct PortalHandle {
    sender: Callback<PortalCommand>,
}

impl PortalHandle {
    /// Creates a handle from a runtime callback that already knows the target id.
    pub fn new(sender: Callback<PortalCommand>) -> Self {
        Self { sender }
    }

    /// Requests that this portal be closed.
    pub fn close(&self) {
        self.sender.call(PortalCommand::Close);
    }

    /// Requests that this portal be brought to the front.
    pub fn focus(&self) {
        self.sender.call(PortalCommand::Focus);
    }

    /// Requests that this portal's minimized flag be flipped.
    pub fn toggle_minimize(&self) {
        self.sender.call(PortalCommand::ToggleMinimize);
    }

    /// Commits a new position for this portal.
    pub fn update_position(&self, position: PortalPosition) {
        self.sender.call(PortalCommand::UpdatePosition(position));
    }

    /// Commits a new size for this portal.
    pub fn update_size(&self, size: PortalSize) {
        self.sender.call(PortalCommand::UpdateSize(size));
    }

    /// Low-level transport send.
    pub fn send(&self, command: PortalCommand) {
        self.sender.call(command);
    }
}

/// Raw section storage implemented by the runtime persistence adapter.
pub trait SectionBackend {
    /// Returns the raw JSON stored under `name`, or `None` when absent or unreadable.
    fn load_section(&self, name: &str) -> Option<Value>;

    /// Replaces the raw JSON stored under `name`. Failures are logged by the backend.
    fn save_section(&self, name: &str, value: Value);
}

#[derive(Clone)]
/// Section accessor scoped to a single portal kind.
pub struct PortalSections {
    kind: PortalKind,
    backend: Rc<dyn SectionBackend>,
}

impl PortalSections {
    /// Creates an accessor for `kind` over `backend`.
    pub fn new(kind: PortalKind, backend: Rc<dyn SectionBackend>) -> Self {
        Self { kind, backend }
    }

    /// Returns the kind this accessor is scoped to.
    pub fn kind(&self) -> PortalKind {
        self.kind
    }

    /// Loads and deserializes this kind's section.
    ///
    /// A section that does not match `T` is treated as absent, so one widget's corrupt data
    /// never affects another's.
    pub fn get<T: DeserializeOwned>(&self) -> Option<T> {
        let raw = self.backend.load_section(self.kind.section_name())?;
        match serde_json::from_value(raw) {
            Ok(value) => Some(value),
            Err(err) => {
                logging::warn!("section `{}` did not match its schema: {err}", self.kind);
                None
            }
        }
    }

    /// Serializes and stores this kind's section.
    pub fn set<T: Serialize>(&self, value: &T) {
        match serde_json::to_value(value) {
            Ok(raw) => self.backend.save_section(self.kind.section_name(), raw),
            Err(err) => logging::warn!("section `{}` failed to serialize: {err}", self.kind),
        }
    }
}

#[derive(Clone)]
/// Mount context injected by the runtime per portal instance.
pub struct PortalMountContext {
    /// Reactive read-only view of this portal.
    pub portal: Signal<PortalView>,
    /// Directory actions scoped to this portal.
    pub handle: PortalHandle,
    /// Persisted section owned by this portal's kind.
    pub sections: PortalSections,
}

/// Static widget mount function used by the runtime dispatch table.
pub type PortalMountFn = fn(PortalMountContext) -> View;

#[derive(Debug, Clone, Copy)]
/// Widget module descriptor used by the runtime dispatch table.
pub struct PortalModule {
    mount_fn: PortalMountFn,
}

impl PortalModule {
    /// Creates a module from a mount function.
    pub const fn new(mount_fn: PortalMountFn) -> Self {
        Self { mount_fn }
    }

    /// Mounts the widget view with a runtime-provided context.
    pub fn mount(self, context: PortalMountContext) -> View {
        (self.mount_fn)(context)
    }
}
