//! Workspace façade crate.
//!
//! Re-exports the workspace crates behind feature flags so a host can depend
//! on `vlc-bridge-workspace` alone. `service` (default) exposes the
//! [`VlcPackage`](core_service::VlcPackage) bootstrap; `playback` and
//! `casting` expose the lower-level crates for hosts that wire them directly.

#[cfg(feature = "service")]
pub use core_service;

#[cfg(feature = "playback")]
pub use core_playback;

#[cfg(feature = "casting")]
pub use core_casting;
