//! # Renderer Registry
//!
//! Tracks the external playback targets found by the engine's discovery
//! services and broadcasts changes to JavaScript through the casting module.
//!
//! ## Overview
//!
//! - On [`initialize`](RendererRegistry::initialize) every discoverer gets a
//!   listener and a start poller (see [`crate::discovery`]).
//! - `ItemAdded` / `ItemDeleted` update the target set and always emit
//!   `onRenderersChange` with the full list of display names.
//! - Deleting the selected target clears the shared [`SelectedRenderer`]
//!   slot. Any change of the slot emits `onSelectedRendererChange`.
//!
//! The discovery listener and the slot observer hold only weak references,
//! so dropping the last registry handle is enough to stop processing events.

use crate::discovery::spawn_start_poller;
use crate::error::{CastingError, Result};
use crate::observable::{SelectedRenderer, SubscriptionId};
use bridge_traits::{
    DeviceEventSink, DiscoveryEvent, DiscoveryListener, DiscoveryProvider, RendererDiscoverer,
    RendererItem,
};
use core_runtime::events::CastingEvent;
use core_runtime::DiscoverySettings;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Shared handle to the renderer registry. Cheap to clone.
#[derive(Clone)]
pub struct RendererRegistry {
    inner: Arc<RegistryInner>,
}

struct RegistryInner {
    discovery_provider: Option<Arc<dyn DiscoveryProvider>>,
    device_sink: Arc<dyn DeviceEventSink>,
    selected: Arc<SelectedRenderer>,
    settings: DiscoverySettings,
    state: Mutex<RegistryState>,
}

#[derive(Default)]
struct RegistryState {
    renderers: Vec<RendererItem>,
    discoverers: Vec<Arc<dyn RendererDiscoverer>>,
    pollers: Option<CancellationToken>,
    subscription: Option<SubscriptionId>,
}

impl RendererRegistry {
    /// Create a registry. Nothing is started until [`initialize`](Self::initialize).
    pub fn new(
        discovery_provider: Option<Arc<dyn DiscoveryProvider>>,
        device_sink: Arc<dyn DeviceEventSink>,
        selected: Arc<SelectedRenderer>,
        settings: DiscoverySettings,
    ) -> Result<Self> {
        settings.validate()?;

        Ok(Self {
            inner: Arc::new(RegistryInner {
                discovery_provider,
                device_sink,
                selected,
                settings,
                state: Mutex::new(RegistryState::default()),
            }),
        })
    }

    /// Subscribe to the selected slot and start every discovery service.
    ///
    /// Must be called from within a tokio runtime. Calling it again while
    /// initialized is a no-op.
    pub fn initialize(&self) -> Result<()> {
        let handle = Handle::try_current()
            .map_err(|err| CastingError::RuntimeUnavailable(err.to_string()))?;

        let root = {
            let mut state = self.inner.state.lock();
            if state.pollers.is_some() {
                debug!("Renderer registry already initialized");
                return Ok(());
            }
            let root = CancellationToken::new();
            state.pollers = Some(root.clone());
            root
        };

        let sink = Arc::clone(&self.inner.device_sink);
        let subscription = self.inner.selected.subscribe(Arc::new(
            move |renderer: &Option<RendererItem>| {
                let event = CastingEvent::SelectedRendererChange {
                    renderer: renderer.as_ref().map(|item| item.display_name.clone()),
                };
                sink.emit(&event.name(), event.payload());
            },
        ));

        let discoverers = match &self.inner.discovery_provider {
            Some(provider) => provider.discoverers(),
            None => {
                info!("No discovery provider configured; casting disabled");
                Vec::new()
            }
        };

        let weak = Arc::downgrade(&self.inner);
        let listener: DiscoveryListener = Arc::new(move |event| {
            if let Some(inner) = Weak::upgrade(&weak) {
                RendererRegistry { inner }.handle_discovery_event(event);
            }
        });

        for discoverer in &discoverers {
            discoverer.set_event_listener(Some(Arc::clone(&listener)));
            spawn_start_poller(
                Arc::clone(discoverer),
                self.inner.settings,
                root.child_token(),
                &handle,
            );
        }

        info!(discoverers = discoverers.len(), "Renderer registry initialized");

        let raced_shutdown = {
            let mut state = self.inner.state.lock();
            state.subscription = Some(subscription);
            state.discoverers = discoverers;
            root.is_cancelled()
        };
        if raced_shutdown {
            self.shutdown();
        }
        Ok(())
    }

    /// Apply a discovery event and broadcast the resulting target list.
    pub fn handle_discovery_event(&self, event: DiscoveryEvent) {
        let (names, cleared_selection) = {
            let mut state = self.inner.state.lock();
            let mut cleared_selection = false;

            match &event {
                DiscoveryEvent::ItemAdded(item) => {
                    if !state.renderers.contains(item) {
                        state.renderers.push(item.clone());
                    }
                }
                DiscoveryEvent::ItemDeleted(item) => {
                    state.renderers.retain(|existing| existing != item);
                    cleared_selection = self.inner.selected.get().as_ref() == Some(item);
                }
            }

            let names: Vec<String> = state
                .renderers
                .iter()
                .map(|item| item.display_name.clone())
                .collect();
            (names, cleared_selection)
        };

        debug!(
            renderer = %event.item().display_name,
            known = names.len(),
            "Renderer discovery event"
        );

        if cleared_selection {
            self.inner.selected.set(None);
        }

        let change = CastingEvent::RenderersChange { renderers: names };
        self.inner.device_sink.emit(&change.name(), change.payload());
    }

    /// Display names of every known target, in discovery order.
    pub fn renderers(&self) -> Vec<String> {
        self.inner
            .state
            .lock()
            .renderers
            .iter()
            .map(|item| item.display_name.clone())
            .collect()
    }

    pub fn selected_renderer(&self) -> Option<String> {
        self.inner
            .selected
            .get()
            .map(|item| item.display_name)
    }

    /// Select the first target with `display_name`, or local playback when
    /// no target matches.
    pub fn set_selected_renderer(&self, display_name: &str) {
        let found = self
            .inner
            .state
            .lock()
            .renderers
            .iter()
            .find(|item| item.display_name == display_name)
            .cloned();

        if found.is_none() {
            debug!(display_name, "Unknown renderer; selecting local playback");
        }
        self.inner.selected.set(found);
    }

    /// The slot shared with every playback controller.
    pub fn selected_slot(&self) -> Arc<SelectedRenderer> {
        Arc::clone(&self.inner.selected)
    }

    /// Cancel pollers, detach listeners, and stop every discoverer that is
    /// still alive. Safe to call before `initialize` and more than once.
    pub fn shutdown(&self) {
        let (pollers, subscription, discoverers) = {
            let mut state = self.inner.state.lock();
            state.renderers.clear();
            (
                state.pollers.take(),
                state.subscription.take(),
                std::mem::take(&mut state.discoverers),
            )
        };

        if let Some(pollers) = pollers {
            pollers.cancel();
        }
        if let Some(subscription) = subscription {
            self.inner.selected.unsubscribe(subscription);
        }
        for discoverer in &discoverers {
            discoverer.set_event_listener(None);
            if !discoverer.is_released() {
                discoverer.stop();
            }
        }

        if !discoverers.is_empty() {
            info!(discoverers = discoverers.len(), "Renderer registry shut down");
        }
    }
}

impl std::fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("RendererRegistry")
            .field("renderers", &state.renderers)
            .field("discoverers", &state.discoverers.len())
            .field("initialized", &state.pollers.is_some())
            .finish()
    }
}
