//! # Playback Controller
//!
//! One controller per mounted playback view. It owns the view's native
//! player, turns host commands into engine calls, and maps engine events to
//! the outward event taxonomy.
//!
//! ## State Machine
//!
//! ```text
//! Empty ──load_media──▶ Loading ──Playing──▶ Playing ⇄ Paused
//!   ▲                                           │
//!   └──────────── EndReached | Error ───────────┘
//! ```
//!
//! Transitions are driven by engine events only. Calling `play()` does not
//! move the controller to `Playing`; the engine's Playing event does.
//!
//! ## Ordering Guarantees
//!
//! - After `load_media`: selected subtitle id, selected audio id, subtitle
//!   tracks, audio tracks, in that order.
//! - On the Playing event: duration, then the same four track events.
//! - `onSeekPerformed` follows the first `onTimeChanged` after a `seek`, in the
//!   same synchronous step.
//!
//! ## Threading
//!
//! Host commands and engine events may arrive on different threads. Mutable
//! state sits behind a mutex that is never held across a call into the
//! engine, a sink, or the dispatcher.

use crate::dispatcher::{CallbackDispatcher, IntentHandler, KeyHandler};
use crate::emitter::EventEmitter;
use crate::error::{PlaybackError, Result};
use crate::session::{MediaSession, MediaSource};
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::{
    EngineEvent, HostIntent, KeyAction, KeyCode, KeyEvent, LifecycleState, MediaEngine,
    NotificationAction, PlaybackNotification, PlaybackNotificationSink, RendererItem,
    ViewEventSink, ViewId, TRACK_ID_NONE,
};
use core_casting::{SelectedRenderer, SubscriptionId};
use core_runtime::logging::redact_url;
use core_runtime::PlaybackSettings;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tracing::{debug, info, warn};

/// Key presses are acted on every fourth repeat.
const KEY_REPEAT_STRIDE: u32 = 4;

/// Playback phase of the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    /// No media loaded.
    Empty,
    /// Media handed to the engine, no Playing event yet.
    Loading,
    Playing,
    Paused,
}

/// Collaborators a controller is built from.
pub struct ControllerDeps {
    pub view_id: ViewId,
    pub engine: Arc<dyn MediaEngine>,
    pub view_sink: Arc<dyn ViewEventSink>,
    pub dispatcher: Arc<CallbackDispatcher>,
    pub selected_renderer: Arc<SelectedRenderer>,
    pub notification_sink: Option<Arc<dyn PlaybackNotificationSink>>,
    pub settings: PlaybackSettings,
}

struct ControllerState {
    session: Option<MediaSession>,
    phase: PlaybackPhase,
    play_in_background: bool,
    key_control_enabled: bool,
    attached: bool,
    renderer_subscription: Option<SubscriptionId>,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            session: None,
            phase: PlaybackPhase::Empty,
            play_in_background: false,
            key_control_enabled: false,
            attached: false,
            renderer_subscription: None,
        }
    }
}

pub struct PlaybackController {
    engine: Arc<dyn MediaEngine>,
    emitter: EventEmitter,
    dispatcher: Arc<CallbackDispatcher>,
    selected_renderer: Arc<SelectedRenderer>,
    notification_sink: Option<Arc<dyn PlaybackNotificationSink>>,
    settings: PlaybackSettings,
    key_handler: KeyHandler,
    intent_handler: IntentHandler,
    state: Mutex<ControllerState>,
    weak_self: Weak<PlaybackController>,
}

impl PlaybackController {
    pub fn new(deps: ControllerDeps) -> Arc<Self> {
        Arc::new_cyclic(|weak: &Weak<PlaybackController>| {
            let key_weak = weak.clone();
            let key_handler: KeyHandler = Arc::new(move |event: &KeyEvent| {
                key_weak
                    .upgrade()
                    .map(|controller| controller.handle_key_down(event))
                    .unwrap_or(false)
            });

            let intent_weak = weak.clone();
            let intent_handler: IntentHandler = Arc::new(move |intent: &HostIntent| {
                intent_weak
                    .upgrade()
                    .map(|controller| controller.handle_intent(intent))
                    .unwrap_or(false)
            });

            PlaybackController {
                emitter: EventEmitter::new(deps.view_id, deps.view_sink),
                engine: deps.engine,
                dispatcher: deps.dispatcher,
                selected_renderer: deps.selected_renderer,
                notification_sink: deps.notification_sink,
                settings: deps.settings,
                key_handler,
                intent_handler,
                state: Mutex::new(ControllerState::default()),
                weak_self: weak.clone(),
            }
        })
    }

    pub fn view_id(&self) -> ViewId {
        self.emitter.view_id()
    }

    /// The native player, for surface attachment by the host.
    pub fn engine(&self) -> Result<Arc<dyn MediaEngine>> {
        self.live_engine()
            .cloned()
            .ok_or(PlaybackError::EngineReleased)
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Load `source`, replacing the current session.
    ///
    /// No-op when the URL is empty, the engine is released, or the URL equals
    /// the active session's URL.
    pub fn load_media(&self, source: MediaSource) {
        if source.source_url.is_empty() {
            debug!(view_id = self.view_id(), "Ignoring load with empty source URL");
            return;
        }
        let Some(engine) = self.live_engine() else {
            return;
        };

        let same_source = self
            .state
            .lock()
            .session
            .as_ref()
            .is_some_and(|session| session.source_url() == source.source_url);
        if same_source {
            debug!(view_id = self.view_id(), "Source unchanged; keeping session");
            return;
        }

        self.unload_media(engine);

        info!(
            view_id = self.view_id(),
            uri = %redact_url(&source.source_url),
            start_time_ms = source.start_time_ms,
            autoplay = source.autoplay,
            hw_decoder_mode = ?source.hw_decoder_mode,
            "Loading media"
        );

        let request = source.to_request();
        {
            let mut state = self.state.lock();
            state.session = Some(MediaSession::new(source));
            state.phase = PlaybackPhase::Loading;
        }

        let renderer = self.selected_renderer.get();
        self.log_failure("set_renderer", engine.set_renderer(renderer.as_ref()));
        if let Err(err) = engine.set_media(request) {
            warn!(view_id = self.view_id(), error = %err, "Engine rejected media");
            let mut state = self.state.lock();
            state.session = None;
            state.phase = PlaybackPhase::Empty;
            return;
        }
        self.log_failure("play", engine.play());

        self.emit_track_snapshot(engine);
        self.update_notification();
    }

    pub fn play(&self) {
        if let Some(engine) = self.live_engine() {
            self.log_failure("play", engine.play());
        }
    }

    pub fn pause(&self) {
        if let Some(engine) = self.live_engine() {
            self.log_failure("pause", engine.pause());
        }
    }

    /// Seek to `time_ms` and resume playback.
    ///
    /// `onSeekRequested` is emitted now; `onSeekPerformed` follows the next
    /// engine TimeChanged event.
    pub fn seek(&self, time_ms: i64) {
        let Some(engine) = self.live_engine() else {
            return;
        };

        if let Some(session) = self.state.lock().session.as_mut() {
            session.seek_requested = true;
        }
        self.emitter.emit_on_seek_requested(time_ms as f64);
        self.log_failure("set_time", engine.set_time(time_ms));
        self.log_failure("play", engine.play());
    }

    pub fn set_subtitle_track(&self, id: i32) {
        if let Some(engine) = self.live_engine() {
            self.log_failure("set_subtitle_track", engine.set_subtitle_track(id));
            self.emitter
                .emit_on_selected_subtitle_track_id_changed(engine.subtitle_track());
        }
    }

    pub fn set_audio_track(&self, id: i32) {
        if let Some(engine) = self.live_engine() {
            self.log_failure("set_audio_track", engine.set_audio_track(id));
            self.emitter
                .emit_on_selected_audio_track_id_changed(engine.audio_track());
        }
    }

    pub fn set_play_in_background(&self, enabled: bool) {
        self.state.lock().play_in_background = enabled;
    }

    pub fn set_key_control_enabled(&self, enabled: bool) {
        self.state.lock().key_control_enabled = enabled;
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Register with the dispatcher and follow the selected renderer.
    pub fn attach(&self) {
        {
            let mut state = self.state.lock();
            if state.attached {
                return;
            }
            state.attached = true;
        }

        self.dispatcher.add_key_handler(&self.key_handler);
        self.dispatcher.add_intent_handler(&self.intent_handler);

        let weak = self.weak_self.clone();
        let subscription = self.selected_renderer.subscribe(Arc::new(
            move |renderer: &Option<RendererItem>| {
                if let Some(controller) = weak.upgrade() {
                    controller.on_renderer_changed(renderer.as_ref());
                }
            },
        ));
        self.state.lock().renderer_subscription = Some(subscription);

        info!(view_id = self.view_id(), "Playback controller attached");
    }

    /// Unregister everywhere and release the native player.
    pub fn detach(&self) {
        let (was_attached, subscription) = {
            let mut state = self.state.lock();
            let was_attached = std::mem::replace(&mut state.attached, false);
            state.session = None;
            state.phase = PlaybackPhase::Empty;
            (was_attached, state.renderer_subscription.take())
        };
        if !was_attached && self.engine.is_released() {
            return;
        }

        self.clear_notification();
        self.dispatcher.remove_key_handler(&self.key_handler);
        self.dispatcher.remove_intent_handler(&self.intent_handler);
        if let Some(subscription) = subscription {
            self.selected_renderer.unsubscribe(subscription);
        }

        if !self.engine.is_released() {
            self.log_failure("stop", self.engine.stop());
            self.engine.release();
        }

        info!(view_id = self.view_id(), "Playback controller detached");
    }

    /// The host went to the background.
    pub fn on_host_pause(&self) {
        let play_in_background = self.state.lock().play_in_background;
        if play_in_background {
            return;
        }
        if let Some(engine) = self.live_engine() {
            debug!(view_id = self.view_id(), "Host paused; pausing playback");
            self.log_failure("pause", engine.pause());
        }
    }

    /// The host returned to the foreground. Surface reattachment is the
    /// host's job.
    pub fn on_host_resume(&self) {
        if self.live_engine().is_some() {
            debug!(view_id = self.view_id(), "Host resumed");
        }
    }

    pub fn on_host_destroy(&self) {
        self.detach();
    }

    pub fn on_lifecycle(&self, state: LifecycleState) {
        match state {
            LifecycleState::Foreground => self.on_host_resume(),
            LifecycleState::Background => self.on_host_pause(),
            LifecycleState::Destroyed => self.on_host_destroy(),
        }
    }

    // ========================================================================
    // Engine Events
    // ========================================================================

    /// Map one engine event to outward events.
    pub fn handle_engine_event(&self, event: EngineEvent) {
        let Some(engine) = self.live_engine() else {
            return;
        };

        match event {
            EngineEvent::Buffering(buffering) => {
                self.emitter.emit_on_buffering(buffering);
            }
            EngineEvent::Playing => {
                let first_playing = {
                    let mut state = self.state.lock();
                    let first = match state.session.as_mut() {
                        Some(session) if !session.playback_started => {
                            session.playback_started = true;
                            true
                        }
                        _ => false,
                    };
                    if state.session.is_some() {
                        state.phase = PlaybackPhase::Playing;
                    }
                    first
                };

                if first_playing {
                    self.log_failure(
                        "set_subtitle_track",
                        engine.set_subtitle_track(TRACK_ID_NONE),
                    );
                }

                self.emitter.emit_on_playing(engine.length() as f64);
                self.emit_track_snapshot(engine);
                self.update_notification();
            }
            EngineEvent::Paused => {
                {
                    let mut state = self.state.lock();
                    if state.session.is_some() {
                        state.phase = PlaybackPhase::Paused;
                    }
                }
                self.emitter.emit_on_paused();
                self.update_notification();
            }
            EngineEvent::TimeChanged(time) => {
                let seek_performed = self
                    .state
                    .lock()
                    .session
                    .as_mut()
                    .map(|session| std::mem::replace(&mut session.seek_requested, false))
                    .unwrap_or(false);

                self.emitter.emit_on_time_changed(time);
                if seek_performed {
                    self.emitter.emit_on_seek_performed();
                }
            }
            EngineEvent::EndReached => {
                info!(view_id = self.view_id(), "End of media reached");
                self.unload_media(engine);
                self.clear_notification();
                self.emitter.emit_on_end_reached();
            }
            EngineEvent::EncounteredError => {
                warn!(view_id = self.view_id(), "Engine reported a media error");
                self.unload_media(engine);
                self.clear_notification();
                self.emitter
                    .emit_on_error(&self.settings.media_error_message, true);
            }
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn is_playing(&self) -> bool {
        self.live_engine().is_some_and(|engine| engine.is_playing())
    }

    pub fn is_seekable(&self) -> bool {
        self.live_engine().is_some_and(|engine| engine.is_seekable())
    }

    /// Current position in milliseconds, `0` once released.
    pub fn time(&self) -> i64 {
        self.live_engine().map(|engine| engine.time()).unwrap_or(0)
    }

    /// Media length in milliseconds, `0` once released.
    pub fn duration(&self) -> i64 {
        self.live_engine().map(|engine| engine.length()).unwrap_or(0)
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.state.lock().phase
    }

    pub fn session(&self) -> Option<MediaSession> {
        self.state.lock().session.clone()
    }

    pub fn is_attached(&self) -> bool {
        self.state.lock().attached
    }

    pub fn key_control_enabled(&self) -> bool {
        self.state.lock().key_control_enabled
    }

    pub fn play_in_background(&self) -> bool {
        self.state.lock().play_in_background
    }

    // ========================================================================
    // Host Input
    // ========================================================================

    /// Key handler registered with the dispatcher.
    pub fn handle_key_down(&self, event: &KeyEvent) -> bool {
        let Some(engine) = self.live_engine() else {
            return false;
        };
        if !self.state.lock().key_control_enabled {
            return false;
        }
        if event.action != KeyAction::Down || event.repeat_count % KEY_REPEAT_STRIDE != 0 {
            return false;
        }

        match event.code {
            KeyCode::Space | KeyCode::MediaPlayPause => {
                if event.repeat_count > 0 {
                    return false;
                }
                if engine.is_playing() {
                    self.log_failure("pause", engine.pause());
                } else {
                    self.log_failure("play", engine.play());
                }
                true
            }
            KeyCode::MediaFastForward | KeyCode::MediaRewind => {
                if engine.is_seekable() {
                    let step = self.settings.key_seek_step.as_millis() as i64;
                    let delta = if event.code == KeyCode::MediaRewind {
                        -step
                    } else {
                        step
                    };
                    let guard = self.settings.seek_end_guard.as_millis() as i64;
                    let target = (engine.time() + delta).min(engine.length() - guard).max(0);
                    self.seek(target);
                }
                true
            }
            KeyCode::Other(_) => false,
        }
    }

    /// Intent handler registered with the dispatcher.
    pub fn handle_intent(&self, intent: &HostIntent) -> bool {
        let Some(engine) = self.live_engine() else {
            return false;
        };

        let action = intent.action();
        if action == self.settings.play_intent_action {
            self.log_failure("play", engine.play());
            true
        } else if action == self.settings.pause_intent_action {
            self.log_failure("pause", engine.pause());
            true
        } else {
            false
        }
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// The engine, unless it was released.
    fn live_engine(&self) -> Option<&Arc<dyn MediaEngine>> {
        if self.engine.is_released() {
            debug!(view_id = self.view_id(), "Engine released; ignoring call");
            None
        } else {
            Some(&self.engine)
        }
    }

    fn unload_media(&self, engine: &Arc<dyn MediaEngine>) {
        {
            let mut state = self.state.lock();
            state.session = None;
            state.phase = PlaybackPhase::Empty;
        }
        self.log_failure("stop", engine.stop());
        self.log_failure(
            "set_subtitle_track",
            engine.set_subtitle_track(TRACK_ID_NONE),
        );
        self.log_failure("set_audio_track", engine.set_audio_track(TRACK_ID_NONE));
    }

    fn emit_track_snapshot(&self, engine: &Arc<dyn MediaEngine>) {
        self.emitter
            .emit_on_selected_subtitle_track_id_changed(engine.subtitle_track());
        self.emitter
            .emit_on_selected_audio_track_id_changed(engine.audio_track());
        self.emitter
            .emit_on_subtitle_tracks_changed(engine.subtitle_tracks());
        self.emitter.emit_on_audio_tracks_changed(engine.audio_tracks());
    }

    fn on_renderer_changed(&self, renderer: Option<&RendererItem>) {
        if let Some(engine) = self.live_engine() {
            debug!(
                view_id = self.view_id(),
                renderer = ?renderer.map(|item| item.display_name.as_str()),
                "Switching renderer"
            );
            self.log_failure("set_renderer", engine.set_renderer(renderer));
        }
    }

    fn update_notification(&self) {
        let Some(sink) = &self.notification_sink else {
            return;
        };
        let title = self
            .state
            .lock()
            .session
            .as_ref()
            .map(|session| session.title().to_string())
            .unwrap_or_default();

        let notification = if self.engine.is_playing() {
            PlaybackNotification {
                title,
                action: NotificationAction::Pause,
                intent_action: self.settings.pause_intent_action.clone(),
            }
        } else {
            PlaybackNotification {
                title,
                action: NotificationAction::Play,
                intent_action: self.settings.play_intent_action.clone(),
            }
        };
        sink.update(notification);
    }

    fn clear_notification(&self) {
        if let Some(sink) = &self.notification_sink {
            sink.clear();
        }
    }

    fn log_failure(&self, operation: &str, result: BridgeResult<()>) {
        if let Err(err) = result {
            warn!(view_id = self.view_id(), operation, error = %err, "Engine call failed");
        }
    }
}

impl std::fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("PlaybackController")
            .field("view_id", &self.emitter.view_id())
            .field("phase", &state.phase)
            .field("session", &state.session)
            .field("attached", &state.attached)
            .finish()
    }
}
