//! Static `PortalKind` to widget dispatch table.

mod placeholders;

use portal_contract::{PortalKind, PortalModule};

/// Returns the widget module mounted for `kind`.
pub fn portal_module(kind: PortalKind) -> PortalModule {
    match kind {
        PortalKind::Clock => PortalModule::new(portal_app_clock::mount_clock_portal),
        PortalKind::Countdown => PortalModule::new(portal_app_countdown::mount_countdown_portal),
        PortalKind::Quicksave => PortalModule::new(portal_app_quicksave::mount_quicksave_portal),
        PortalKind::Weather
        | PortalKind::Calendar
        | PortalKind::UnitConverter
        | PortalKind::PasswordGenerator
        | PortalKind::News
        | PortalKind::Radio
        | PortalKind::Crypto
        | PortalKind::AiFeed
        | PortalKind::VoiceMemo
        | PortalKind::Cricket => PortalModule::new(placeholders::mount_placeholder_portal),
        PortalKind::Settings => PortalModule::new(placeholders::mount_settings_portal),
    }
}
