//! Package façade and bootstrap for the VLC playback bridge.
//!
//! [`VlcPackage`] is the one object a host creates per process. It owns the
//! shared pieces every view needs: a single [`CallbackDispatcher`], a single
//! selected-renderer slot, and a single [`RendererRegistry`]. It hands
//! references to them to every [`PlaybackController`] it creates, and routes
//! host calls (commands, props, engine events, key presses, intents,
//! lifecycle changes) to the right controller.
//!
//! Host-facing entry points never fail: malformed commands and props are
//! logged at `debug` and dropped, and calls addressed to unknown views are
//! ignored. Only construction, view creation and engine lookup return
//! [`Result`].
//!
//! ```ignore
//! use core_runtime::VlcConfig;
//! use core_service::VlcPackage;
//!
//! let config = VlcConfig::builder()
//!     .engine_provider(libvlc)
//!     .view_event_sink(rct_events)
//!     .device_event_sink(device_events)
//!     .discovery_provider(discovery)
//!     .build()?;
//!
//! let package = VlcPackage::new(config)?;
//! package.initialize()?;
//!
//! package.create_view(7)?;
//! package.set_prop(7, "media", &serde_json::json!({ "sourceUrl": url }));
//! ```

pub mod error;

pub use error::{CoreError, Result};

use bridge_traits::{EngineEvent, HostIntent, KeyEvent, LifecycleState, MediaEngine, ViewId};
use core_casting::{RendererRegistry, SelectedRenderer};
use core_playback::{
    CallbackDispatcher, ControllerDeps, PlaybackController, VideoCommand, VideoProp,
};
use core_runtime::events::{CastingEvent, VideoEventKind};
use core_runtime::VlcConfig;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Process-wide owner of the shared playback and casting state.
pub struct VlcPackage {
    config: VlcConfig,
    dispatcher: Arc<CallbackDispatcher>,
    registry: RendererRegistry,
    views: Mutex<HashMap<ViewId, Arc<PlaybackController>>>,
    shut_down: AtomicBool,
}

impl VlcPackage {
    /// Validate `config` and build the shared dispatcher, slot and registry.
    pub fn new(config: VlcConfig) -> Result<Self> {
        config.validate()?;

        let selected = Arc::new(SelectedRenderer::default());
        let registry = RendererRegistry::new(
            config.discovery_provider.clone(),
            Arc::clone(&config.device_event_sink),
            selected,
            config.discovery,
        )?;

        info!(
            engine_options = ?config.engine_options,
            casting = config.discovery_provider.is_some(),
            "VLC package created"
        );

        Ok(Self {
            config,
            dispatcher: Arc::new(CallbackDispatcher::new()),
            registry,
            views: Mutex::new(HashMap::new()),
            shut_down: AtomicBool::new(false),
        })
    }

    /// Start renderer discovery. Must run inside a tokio runtime.
    pub fn initialize(&self) -> Result<()> {
        if self.shut_down.load(Ordering::SeqCst) {
            return Err(CoreError::InitializationFailed(
                "package has been shut down".to_string(),
            ));
        }
        self.registry.initialize()?;
        Ok(())
    }

    /// Options the host should create the shared engine instance with.
    pub fn engine_options(&self) -> &[String] {
        &self.config.engine_options
    }

    pub fn dispatcher(&self) -> Arc<CallbackDispatcher> {
        Arc::clone(&self.dispatcher)
    }

    pub fn registry(&self) -> &RendererRegistry {
        &self.registry
    }

    // ========================================================================
    // Views
    // ========================================================================

    /// Create and attach the controller for a newly mounted view.
    ///
    /// A controller already registered under `view_id` is detached and
    /// replaced.
    pub fn create_view(&self, view_id: ViewId) -> Result<Arc<PlaybackController>> {
        if self.shut_down.load(Ordering::SeqCst) {
            return Err(CoreError::InitializationFailed(
                "package has been shut down".to_string(),
            ));
        }

        let engine = self.config.engine_provider.create_engine()?;
        let controller = PlaybackController::new(ControllerDeps {
            view_id,
            engine,
            view_sink: Arc::clone(&self.config.view_event_sink),
            dispatcher: Arc::clone(&self.dispatcher),
            selected_renderer: self.registry.selected_slot(),
            notification_sink: self.config.notification_sink.clone(),
            settings: self.config.playback.clone(),
        });
        controller.attach();

        let replaced = self
            .views
            .lock()
            .insert(view_id, Arc::clone(&controller));
        if let Some(previous) = replaced {
            debug!(view_id, "Replacing existing view");
            previous.detach();
        }

        Ok(controller)
    }

    /// Detach and forget the controller of an unmounted view.
    pub fn drop_view(&self, view_id: ViewId) {
        let removed = self.views.lock().remove(&view_id);
        match removed {
            Some(controller) => controller.detach(),
            None => debug!(view_id, "Drop for unknown view"),
        }
    }

    pub fn view(&self, view_id: ViewId) -> Option<Arc<PlaybackController>> {
        self.views.lock().get(&view_id).cloned()
    }

    /// The native player of a view, for surface attachment.
    pub fn engine(&self, view_id: ViewId) -> Result<Arc<dyn MediaEngine>> {
        let view = self.view(view_id).ok_or(CoreError::UnknownView(view_id))?;
        Ok(view.engine()?)
    }

    pub fn view_count(&self) -> usize {
        self.views.lock().len()
    }

    // ========================================================================
    // View Manager
    // ========================================================================

    /// Apply a command sent by numeric id.
    pub fn receive_command(&self, view_id: ViewId, command_id: i32, args: &Value) {
        match VideoCommand::from_id(command_id, args) {
            Ok(command) => self.with_view(view_id, |view| command.apply(view)),
            Err(err) => debug!(view_id, command_id, error = %err, "Dropping command"),
        }
    }

    /// Apply a command sent by name.
    pub fn receive_command_by_name(&self, view_id: ViewId, name: &str, args: &Value) {
        match VideoCommand::from_name(name, args) {
            Ok(command) => self.with_view(view_id, |view| command.apply(view)),
            Err(err) => debug!(view_id, command = name, error = %err, "Dropping command"),
        }
    }

    pub fn set_prop(&self, view_id: ViewId, name: &str, value: &Value) {
        match VideoProp::decode(name, value) {
            Ok(prop) => self.with_view(view_id, |view| prop.apply(view)),
            Err(err) => debug!(view_id, prop = name, error = %err, "Dropping prop"),
        }
    }

    /// Deliver a native player event to the view that owns the player.
    pub fn handle_engine_event(&self, view_id: ViewId, event: EngineEvent) {
        self.with_view(view_id, |view| view.handle_engine_event(event));
    }

    /// Event name constants exported to JavaScript (`ON_PLAYING` and friends).
    pub fn exported_constants() -> BTreeMap<&'static str, String> {
        let mut constants = VideoEventKind::exported_constants();
        constants.extend(CastingEvent::exported_constants());
        constants
    }

    pub fn command_map() -> BTreeMap<&'static str, i32> {
        VideoCommand::command_map()
    }

    // ========================================================================
    // Host Input
    // ========================================================================

    pub fn dispatch_key_down(&self, event: &KeyEvent) -> bool {
        self.dispatcher.dispatch_key_down(event)
    }

    pub fn dispatch_intent(&self, intent: &HostIntent) -> bool {
        self.dispatcher.dispatch_intent(intent)
    }

    /// Forward a host lifecycle change to every view.
    pub fn on_lifecycle(&self, state: LifecycleState) {
        debug!(?state, "Host lifecycle changed");
        for view in self.snapshot_views() {
            view.on_lifecycle(state);
        }
    }

    // ========================================================================
    // Casting
    // ========================================================================

    pub fn get_renderers(&self) -> Vec<String> {
        self.registry.renderers()
    }

    pub fn get_selected_renderer(&self) -> Option<String> {
        self.registry.selected_renderer()
    }

    pub fn set_selected_renderer(&self, display_name: &str) {
        self.registry.set_selected_renderer(display_name);
    }

    // ========================================================================
    // Shutdown
    // ========================================================================

    /// Detach every view and stop renderer discovery. Idempotent.
    pub fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::SeqCst) {
            return;
        }
        let views: Vec<_> = self.views.lock().drain().map(|(_, view)| view).collect();
        for view in &views {
            view.detach();
        }
        self.registry.shutdown();
        info!(views = views.len(), "VLC package shut down");
    }

    fn with_view(&self, view_id: ViewId, f: impl FnOnce(&PlaybackController)) {
        match self.view(view_id) {
            Some(view) => f(&view),
            None => debug!(view_id, "Call for unknown view"),
        }
    }

    fn snapshot_views(&self) -> Vec<Arc<PlaybackController>> {
        self.views.lock().values().cloned().collect()
    }
}

impl std::fmt::Debug for VlcPackage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VlcPackage")
            .field("config", &self.config)
            .field("views", &self.view_count())
            .field("registry", &self.registry)
            .finish()
    }
}
