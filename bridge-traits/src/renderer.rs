//! Renderer discovery bridge traits.
//!
//! A renderer is an external playback target (Chromecast and friends) found by
//! one of the engine's discovery services. Discovery backends are frequently
//! not ready when the process starts, so the core polls
//! [`RendererDiscoverer::start`] until it succeeds; see `core-casting`.

use std::sync::Arc;

/// External playback target reported by a discoverer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RendererItem {
    /// Stable engine-side name.
    pub name: String,
    /// Human-readable name shown to users and used for selection.
    pub display_name: String,
}

impl RendererItem {
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
        }
    }
}

/// Change reported by a discoverer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryEvent {
    ItemAdded(RendererItem),
    ItemDeleted(RendererItem),
}

impl DiscoveryEvent {
    pub fn item(&self) -> &RendererItem {
        match self {
            DiscoveryEvent::ItemAdded(item) | DiscoveryEvent::ItemDeleted(item) => item,
        }
    }
}

/// Callback installed on a discoverer. May be invoked from any thread.
pub type DiscoveryListener = Arc<dyn Fn(DiscoveryEvent) + Send + Sync>;

/// One discovery service (mDNS, UPnP, ...).
pub trait RendererDiscoverer: Send + Sync {
    /// Service name, for logging.
    fn name(&self) -> String;

    /// Try to start discovery. Returns `true` once the service is running.
    fn start(&self) -> bool;

    fn stop(&self);

    fn is_released(&self) -> bool;

    /// Install or clear the event listener.
    fn set_event_listener(&self, listener: Option<DiscoveryListener>);
}

/// Enumerates the discovery services the engine supports.
pub trait DiscoveryProvider: Send + Sync {
    fn discoverers(&self) -> Vec<Arc<dyn RendererDiscoverer>>;
}
