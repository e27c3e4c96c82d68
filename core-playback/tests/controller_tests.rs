//! Playback controller tests
//!
//! This test suite verifies:
//! - Load-time option derivation and event ordering
//! - Engine event mapping and the seek handshake
//! - Key and intent handling through the shared dispatcher
//! - Renderer following, lifecycle and released-engine behavior

use bridge_traits::error::Result as BridgeResult;
use bridge_traits::{
    BridgeError, EngineEvent, HostIntent, HwDecoderSetting, KeyAction, KeyCode, KeyEvent,
    LifecycleState, MediaEngine, MediaRequest, NotificationAction, PlaybackNotification,
    PlaybackNotificationSink, RendererItem, TrackDescription, ViewEventSink, ViewId,
    TRACK_ID_NONE,
};
use core_casting::SelectedRenderer;
use core_playback::{
    CallbackDispatcher, ControllerDeps, HwDecoderMode, MediaSource, PlaybackController,
    PlaybackPhase, VideoCommand, VideoProp,
};
use core_runtime::PlaybackSettings;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// ============================================================================
// Fake Engine
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Call {
    SetMedia(MediaRequest),
    Play,
    Pause,
    Stop,
    Release,
    SetTime(i64),
    SetSubtitleTrack(i32),
    SetAudioTrack(i32),
    SetRenderer(Option<String>),
}

struct EngineState {
    media_uri: Option<String>,
    time: i64,
    length: i64,
    playing: bool,
    seekable: bool,
    subtitle_track: i32,
    audio_track: i32,
    subtitle_tracks: Vec<TrackDescription>,
    audio_tracks: Vec<TrackDescription>,
}

/// Records every call. On `set_media` it auto-selects the first real subtitle
/// track unless the request pins `:sub-track-id`, like the native player.
struct FakeEngine {
    calls: Mutex<Vec<Call>>,
    state: Mutex<EngineState>,
    released: AtomicBool,
    reject_media: AtomicBool,
}

impl FakeEngine {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            state: Mutex::new(EngineState {
                media_uri: None,
                time: 0,
                length: 120_000,
                playing: false,
                seekable: true,
                subtitle_track: TRACK_ID_NONE,
                audio_track: TRACK_ID_NONE,
                subtitle_tracks: vec![
                    TrackDescription::new(-1, "Disable"),
                    TrackDescription::new(3, "English"),
                ],
                audio_tracks: vec![
                    TrackDescription::new(-1, "Disable"),
                    TrackDescription::new(1, "Stereo"),
                ],
            }),
            released: AtomicBool::new(false),
            reject_media: AtomicBool::new(false),
        })
    }

    fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.lock())
    }

    fn set_position(&self, time: i64, length: i64) {
        let mut state = self.state.lock();
        state.time = time;
        state.length = length;
    }

    fn set_playing(&self, playing: bool) {
        self.state.lock().playing = playing;
    }

    fn set_seekable(&self, seekable: bool) {
        self.state.lock().seekable = seekable;
    }

    fn record(&self, call: Call) -> BridgeResult<()> {
        self.calls.lock().push(call);
        Ok(())
    }
}

impl MediaEngine for FakeEngine {
    fn set_media(&self, request: MediaRequest) -> BridgeResult<()> {
        if self.reject_media.load(Ordering::SeqCst) {
            return Err(BridgeError::Engine("unsupported scheme".to_string()));
        }
        {
            let mut state = self.state.lock();
            state.media_uri = Some(request.uri.clone());
            state.audio_track = 1;
            let pinned = request
                .options
                .iter()
                .any(|option| option.starts_with(":sub-track-id="));
            if !pinned {
                state.subtitle_track = 3;
            }
        }
        self.record(Call::SetMedia(request))
    }

    fn media_uri(&self) -> Option<String> {
        self.state.lock().media_uri.clone()
    }

    fn play(&self) -> BridgeResult<()> {
        self.state.lock().playing = true;
        self.record(Call::Play)
    }

    fn pause(&self) -> BridgeResult<()> {
        self.state.lock().playing = false;
        self.record(Call::Pause)
    }

    fn stop(&self) -> BridgeResult<()> {
        self.state.lock().playing = false;
        self.record(Call::Stop)
    }

    fn release(&self) {
        self.released.store(true, Ordering::SeqCst);
        self.calls.lock().push(Call::Release);
    }

    fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }

    fn set_time(&self, time_ms: i64) -> BridgeResult<()> {
        self.state.lock().time = time_ms;
        self.record(Call::SetTime(time_ms))
    }

    fn time(&self) -> i64 {
        self.state.lock().time
    }

    fn length(&self) -> i64 {
        self.state.lock().length
    }

    fn is_playing(&self) -> bool {
        self.state.lock().playing
    }

    fn is_seekable(&self) -> bool {
        self.state.lock().seekable
    }

    fn set_subtitle_track(&self, id: i32) -> BridgeResult<()> {
        self.state.lock().subtitle_track = id;
        self.record(Call::SetSubtitleTrack(id))
    }

    fn subtitle_track(&self) -> i32 {
        self.state.lock().subtitle_track
    }

    fn subtitle_tracks(&self) -> Vec<TrackDescription> {
        self.state.lock().subtitle_tracks.clone()
    }

    fn set_audio_track(&self, id: i32) -> BridgeResult<()> {
        self.state.lock().audio_track = id;
        self.record(Call::SetAudioTrack(id))
    }

    fn audio_track(&self) -> i32 {
        self.state.lock().audio_track
    }

    fn audio_tracks(&self) -> Vec<TrackDescription> {
        self.state.lock().audio_tracks.clone()
    }

    fn set_renderer(&self, renderer: Option<&RendererItem>) -> BridgeResult<()> {
        self.record(Call::SetRenderer(
            renderer.map(|item| item.display_name.clone()),
        ))
    }
}

// ============================================================================
// Recording Sinks
// ============================================================================

#[derive(Default)]
struct RecordingViewSink {
    events: Mutex<Vec<(ViewId, String, Value)>>,
}

impl RecordingViewSink {
    fn take(&self) -> Vec<(String, Value)> {
        std::mem::take(&mut *self.events.lock())
            .into_iter()
            .map(|(_, name, payload)| (name, payload))
            .collect()
    }

    fn take_names(&self) -> Vec<String> {
        self.take()
            .into_iter()
            .map(|(name, _)| name.trim_start_matches("VLCVideoView").to_string())
            .collect()
    }
}

impl ViewEventSink for RecordingViewSink {
    fn receive_event(&self, view_id: ViewId, event_name: &str, payload: Value) {
        self.events
            .lock()
            .push((view_id, event_name.to_string(), payload));
    }
}

#[derive(Debug, Clone, PartialEq)]
enum NotificationCall {
    Update(PlaybackNotification),
    Clear,
}

#[derive(Default)]
struct RecordingNotifications {
    calls: Mutex<Vec<NotificationCall>>,
}

impl RecordingNotifications {
    fn take(&self) -> Vec<NotificationCall> {
        std::mem::take(&mut *self.calls.lock())
    }
}

impl PlaybackNotificationSink for RecordingNotifications {
    fn update(&self, notification: PlaybackNotification) {
        self.calls.lock().push(NotificationCall::Update(notification));
    }

    fn clear(&self) {
        self.calls.lock().push(NotificationCall::Clear);
    }
}

// ============================================================================
// Fixture
// ============================================================================

const URL: &str = "https://cdn.example.com/movie.mkv";
const VIEW_ID: ViewId = 42;

struct Fixture {
    controller: Arc<PlaybackController>,
    engine: Arc<FakeEngine>,
    events: Arc<RecordingViewSink>,
    notifications: Arc<RecordingNotifications>,
    dispatcher: Arc<CallbackDispatcher>,
    selected: Arc<SelectedRenderer>,
}

impl Fixture {
    fn new() -> Self {
        Self::with_shared(
            Arc::new(CallbackDispatcher::new()),
            Arc::new(SelectedRenderer::default()),
        )
    }

    fn with_shared(dispatcher: Arc<CallbackDispatcher>, selected: Arc<SelectedRenderer>) -> Self {
        let engine = FakeEngine::new();
        let events = Arc::new(RecordingViewSink::default());
        let notifications = Arc::new(RecordingNotifications::default());

        let controller = PlaybackController::new(ControllerDeps {
            view_id: VIEW_ID,
            engine: engine.clone(),
            view_sink: events.clone(),
            dispatcher: Arc::clone(&dispatcher),
            selected_renderer: Arc::clone(&selected),
            notification_sink: Some(notifications.clone()),
            settings: PlaybackSettings::default(),
        });
        controller.attach();

        Self {
            controller,
            engine,
            events,
            notifications,
            dispatcher,
            selected,
        }
    }

    /// Load [`URL`] and drop everything recorded so far.
    fn loaded(self) -> Self {
        self.controller.load_media(MediaSource::new(URL).with_title("Movie"));
        self.reset();
        self
    }

    /// Load, deliver the first Playing event, and drop the recordings.
    fn playing(self) -> Self {
        let fixture = self.loaded();
        fixture.controller.handle_engine_event(EngineEvent::Playing);
        fixture.reset();
        fixture
    }

    fn reset(&self) {
        self.engine.take_calls();
        self.events.take();
        self.notifications.take();
    }
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_load_sequence() {
    let f = Fixture::new();
    f.controller
        .load_media(MediaSource::new(URL).with_title("Movie"));

    let calls = f.engine.take_calls();
    assert_eq!(
        calls,
        vec![
            Call::Stop,
            Call::SetSubtitleTrack(TRACK_ID_NONE),
            Call::SetAudioTrack(TRACK_ID_NONE),
            Call::SetRenderer(None),
            Call::SetMedia(
                MediaRequest::new(URL)
                    .with_hw_decoder(HwDecoderSetting::new(true, true))
                    .with_option(":no-mediacodec-dr")
                    .with_option(":no-omxil-dr")
            ),
            Call::Play,
        ]
    );

    assert_eq!(
        f.events.take(),
        vec![
            (
                "VLCVideoViewonSelectedSubtitleTrackIdChanged".to_string(),
                json!({ "id": 3 })
            ),
            (
                "VLCVideoViewonSelectedAudioTrackIdChanged".to_string(),
                json!({ "id": 1 })
            ),
            (
                "VLCVideoViewonSubtitleTracksChanged".to_string(),
                json!({ "subtitleTracks": [{ "id": 3, "name": "English" }] })
            ),
            (
                "VLCVideoViewonAudioTracksChanged".to_string(),
                json!({ "audioTracks": [{ "id": 1, "name": "Stereo" }] })
            ),
        ]
    );

    assert_eq!(f.controller.phase(), PlaybackPhase::Loading);
    assert_eq!(
        f.controller.session().map(|s| s.source.title),
        Some("Movie".to_string())
    );
    assert_eq!(
        f.notifications.take(),
        vec![NotificationCall::Update(PlaybackNotification {
            title: "Movie".to_string(),
            action: NotificationAction::Pause,
            intent_action: "VLCVideo:Pause".to_string(),
        })]
    );
}

#[test]
fn test_same_source_twice_is_noop() {
    let f = Fixture::new().loaded();

    f.controller.load_media(MediaSource::new(URL).with_start_time(5000));

    assert!(f.engine.take_calls().is_empty());
    assert!(f.events.take().is_empty());
    assert!(f.notifications.take().is_empty());
}

#[test]
fn test_different_source_reloads() {
    let f = Fixture::new().loaded();

    f.controller
        .load_media(MediaSource::new("https://cdn.example.com/other.mkv"));

    let calls = f.engine.take_calls();
    assert_eq!(calls[0], Call::Stop);
    assert!(calls
        .iter()
        .any(|call| matches!(call, Call::SetMedia(r) if r.uri.ends_with("other.mkv"))));
}

#[test]
fn test_empty_url_is_ignored() {
    let f = Fixture::new();
    f.controller.load_media(MediaSource::new(""));

    assert!(f.engine.take_calls().is_empty());
    assert!(f.events.take().is_empty());
    assert_eq!(f.controller.phase(), PlaybackPhase::Empty);
}

#[test]
fn test_resume_reports_no_subtitle_track() {
    let f = Fixture::new();
    f.controller
        .load_media(MediaSource::new(URL).with_start_time(60_000));

    let selected_subtitle = f
        .events
        .take()
        .into_iter()
        .find(|(name, _)| name == "VLCVideoViewonSelectedSubtitleTrackIdChanged")
        .map(|(_, payload)| payload);
    assert_eq!(selected_subtitle, Some(json!({ "id": -1 })));

    let request = f
        .engine
        .take_calls()
        .into_iter()
        .find_map(|call| match call {
            Call::SetMedia(request) => Some(request),
            _ => None,
        })
        .unwrap();
    assert!(request.has_option(":start-time=60"));
    assert!(request.has_option(":sub-track-id=2147483647"));
}

#[test]
fn test_no_autoplay_uses_start_paused() {
    let f = Fixture::new();
    f.controller.load_media(
        MediaSource::new(URL)
            .with_autoplay(false)
            .with_hw_decoder_mode(HwDecoderMode::Disabled),
    );

    let calls = f.engine.take_calls();
    let request = calls
        .iter()
        .find_map(|call| match call {
            Call::SetMedia(request) => Some(request.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(request.options, vec![":start-paused".to_string()]);
    assert_eq!(request.hw_decoder, Some(HwDecoderSetting::new(false, false)));
    assert_eq!(calls.last(), Some(&Call::Play));
}

#[test]
fn test_rejected_media_leaves_controller_empty() {
    let f = Fixture::new();
    f.engine.reject_media.store(true, Ordering::SeqCst);

    f.controller.load_media(MediaSource::new(URL));

    assert!(f.events.take().is_empty());
    assert_eq!(f.controller.phase(), PlaybackPhase::Empty);
    assert!(f.controller.session().is_none());
    assert!(!f.engine.take_calls().contains(&Call::Play));
}

#[test]
fn test_load_binds_selected_renderer() {
    let f = Fixture::new();
    f.selected
        .set(Some(RendererItem::new("chromecast-1", "Living Room TV")));
    f.engine.take_calls();

    f.controller.load_media(MediaSource::new(URL));

    assert!(f
        .engine
        .take_calls()
        .contains(&Call::SetRenderer(Some("Living Room TV".to_string()))));
}

// ============================================================================
// Engine Events
// ============================================================================

#[test]
fn test_first_playing_event_order() {
    let f = Fixture::new().loaded();
    f.engine.set_position(0, 5_400_000);

    f.controller.handle_engine_event(EngineEvent::Playing);

    assert_eq!(f.engine.take_calls(), vec![Call::SetSubtitleTrack(TRACK_ID_NONE)]);
    let events = f.events.take();
    assert_eq!(
        events.iter().map(|(name, _)| name.as_str()).collect::<Vec<_>>(),
        vec![
            "VLCVideoViewonPlaying",
            "VLCVideoViewonSelectedSubtitleTrackIdChanged",
            "VLCVideoViewonSelectedAudioTrackIdChanged",
            "VLCVideoViewonSubtitleTracksChanged",
            "VLCVideoViewonAudioTracksChanged",
        ]
    );
    assert_eq!(events[0].1, json!({ "duration": 5_400_000.0 }));
    assert_eq!(events[1].1, json!({ "id": -1 }));
    assert_eq!(f.controller.phase(), PlaybackPhase::Playing);
}

#[test]
fn test_subtitle_reset_happens_once_per_session() {
    let f = Fixture::new().playing();
    f.controller.set_subtitle_track(3);
    f.reset();

    f.controller.handle_engine_event(EngineEvent::Paused);
    assert_eq!(f.controller.phase(), PlaybackPhase::Paused);
    f.controller.handle_engine_event(EngineEvent::Playing);

    assert!(f.engine.take_calls().is_empty());
    let events = f.events.take();
    assert_eq!(events[0].0, "VLCVideoViewonPaused");
    assert_eq!(events[1].0, "VLCVideoViewonPlaying");
    assert_eq!(events[2].1, json!({ "id": 3 }));
}

#[test]
fn test_seek_handshake() {
    let f = Fixture::new().playing();

    f.controller.seek(30_000);
    assert_eq!(
        f.engine.take_calls(),
        vec![Call::SetTime(30_000), Call::Play]
    );

    f.controller.handle_engine_event(EngineEvent::TimeChanged(30_010.0));
    f.controller.handle_engine_event(EngineEvent::TimeChanged(30_260.0));

    assert_eq!(
        f.events.take(),
        vec![
            (
                "VLCVideoViewonSeekRequested".to_string(),
                json!({ "time": 30_000.0 })
            ),
            (
                "VLCVideoViewonTimeChanged".to_string(),
                json!({ "time": 30_010.0 })
            ),
            ("VLCVideoViewonSeekPerformed".to_string(), json!({})),
            (
                "VLCVideoViewonTimeChanged".to_string(),
                json!({ "time": 30_260.0 })
            ),
        ]
    );
}

#[test]
fn test_time_changed_without_seek() {
    let f = Fixture::new().playing();
    f.controller.handle_engine_event(EngineEvent::TimeChanged(1000.0));
    assert_eq!(f.events.take_names(), vec!["onTimeChanged"]);
}

#[test]
fn test_buffering_event() {
    let f = Fixture::new().loaded();
    f.controller.handle_engine_event(EngineEvent::Buffering(42.5));
    assert_eq!(
        f.events.take(),
        vec![(
            "VLCVideoViewonBuffering".to_string(),
            json!({ "buffering": 42.5 })
        )]
    );
}

#[test]
fn test_end_reached_unloads_session() {
    let f = Fixture::new().playing();

    f.controller.handle_engine_event(EngineEvent::EndReached);

    assert_eq!(
        f.engine.take_calls(),
        vec![
            Call::Stop,
            Call::SetSubtitleTrack(TRACK_ID_NONE),
            Call::SetAudioTrack(TRACK_ID_NONE),
        ]
    );
    assert_eq!(f.notifications.take(), vec![NotificationCall::Clear]);
    assert_eq!(
        f.events.take(),
        vec![("VLCVideoViewonEndReached".to_string(), json!({}))]
    );
    assert_eq!(f.controller.phase(), PlaybackPhase::Empty);
    assert!(f.controller.session().is_none());

    // The same source can be played again once the session ended
    f.controller.load_media(MediaSource::new(URL));
    assert!(f
        .engine
        .take_calls()
        .iter()
        .any(|call| matches!(call, Call::SetMedia(_))));
}

#[test]
fn test_error_uses_fixed_message() {
    let f = Fixture::new().playing();

    f.controller
        .handle_engine_event(EngineEvent::EncounteredError);

    assert_eq!(f.notifications.take(), vec![NotificationCall::Clear]);
    assert_eq!(
        f.events.take(),
        vec![(
            "VLCVideoViewonError".to_string(),
            json!({
                "message": "VLC encountered an error with this media.",
                "isCritical": true
            })
        )]
    );
    assert_eq!(f.controller.phase(), PlaybackPhase::Empty);
}

#[test]
fn test_pending_seek_cleared_by_unload() {
    let f = Fixture::new().playing();
    f.controller.seek(10_000);
    f.controller.handle_engine_event(EngineEvent::EndReached);
    f.controller
        .load_media(MediaSource::new("https://cdn.example.com/next.mkv"));
    f.reset();

    f.controller.handle_engine_event(EngineEvent::TimeChanged(0.0));

    assert_eq!(f.events.take_names(), vec!["onTimeChanged"]);
}

#[test]
fn test_paused_event_updates_notification() {
    let f = Fixture::new().playing();
    f.engine.set_playing(false);

    f.controller.handle_engine_event(EngineEvent::Paused);

    assert_eq!(
        f.notifications.take(),
        vec![NotificationCall::Update(PlaybackNotification {
            title: "Movie".to_string(),
            action: NotificationAction::Play,
            intent_action: "VLCVideo:Play".to_string(),
        })]
    );
}

// ============================================================================
// Track Selection
// ============================================================================

#[test]
fn test_track_selection_reports_engine_choice() {
    let f = Fixture::new().playing();

    f.controller.set_audio_track(1);
    f.controller.set_subtitle_track(TRACK_ID_NONE);

    assert_eq!(
        f.engine.take_calls(),
        vec![Call::SetAudioTrack(1), Call::SetSubtitleTrack(TRACK_ID_NONE)]
    );
    assert_eq!(
        f.events.take(),
        vec![
            (
                "VLCVideoViewonSelectedAudioTrackIdChanged".to_string(),
                json!({ "id": 1 })
            ),
            (
                "VLCVideoViewonSelectedSubtitleTrackIdChanged".to_string(),
                json!({ "id": -1 })
            ),
        ]
    );
}

// ============================================================================
// Keys and Intents
// ============================================================================

#[test]
fn test_keys_ignored_unless_enabled() {
    let f = Fixture::new().playing();

    assert!(!f
        .dispatcher
        .dispatch_key_down(&KeyEvent::down(KeyCode::Space)));
    assert!(f.engine.take_calls().is_empty());

    f.controller.set_key_control_enabled(true);
    assert!(f
        .dispatcher
        .dispatch_key_down(&KeyEvent::down(KeyCode::Space)));
    assert_eq!(f.engine.take_calls(), vec![Call::Pause]);

    assert!(f
        .dispatcher
        .dispatch_key_down(&KeyEvent::down(KeyCode::MediaPlayPause)));
    assert_eq!(f.engine.take_calls(), vec![Call::Play]);
}

#[test]
fn test_play_pause_ignores_repeats_and_other_actions() {
    let f = Fixture::new().playing();
    f.controller.set_key_control_enabled(true);

    let repeated = KeyEvent::new(KeyCode::Space, KeyAction::Down, 4);
    let up = KeyEvent::new(KeyCode::Space, KeyAction::Up, 0);
    let odd_repeat = KeyEvent::new(KeyCode::MediaFastForward, KeyAction::Down, 3);

    assert!(!f.dispatcher.dispatch_key_down(&repeated));
    assert!(!f.dispatcher.dispatch_key_down(&up));
    assert!(!f.dispatcher.dispatch_key_down(&odd_repeat));
    assert!(!f
        .dispatcher
        .dispatch_key_down(&KeyEvent::down(KeyCode::Other(66))));
    assert!(f.engine.take_calls().is_empty());
}

#[test]
fn test_fast_forward_and_rewind_are_clamped() {
    let f = Fixture::new().playing();
    f.controller.set_key_control_enabled(true);

    f.engine.set_position(100_000, 110_000);
    assert!(f
        .dispatcher
        .dispatch_key_down(&KeyEvent::down(KeyCode::MediaFastForward)));
    assert_eq!(f.engine.take_calls()[0], Call::SetTime(109_000));

    f.engine.set_position(5_000, 110_000);
    let held = KeyEvent::new(KeyCode::MediaRewind, KeyAction::Down, 8);
    assert!(f.dispatcher.dispatch_key_down(&held));
    assert_eq!(f.engine.take_calls()[0], Call::SetTime(0));

    f.engine.set_position(30_000, 110_000);
    f.controller.handle_key_down(&KeyEvent::down(KeyCode::MediaFastForward));
    assert_eq!(f.engine.take_calls()[0], Call::SetTime(45_000));

    let names = f.events.take_names();
    assert_eq!(names.iter().filter(|n| *n == "onSeekRequested").count(), 3);
}

#[test]
fn test_seek_keys_handled_even_when_not_seekable() {
    let f = Fixture::new().playing();
    f.controller.set_key_control_enabled(true);
    f.engine.set_seekable(false);

    assert!(f
        .dispatcher
        .dispatch_key_down(&KeyEvent::down(KeyCode::MediaRewind)));
    assert!(f.engine.take_calls().is_empty());
}

#[test]
fn test_notification_intents() {
    let f = Fixture::new().playing();

    assert!(f
        .dispatcher
        .dispatch_intent(&HostIntent::with_action("VLCVideo:Pause")));
    assert!(f
        .dispatcher
        .dispatch_intent(&HostIntent::with_action("VLCVideo:Play")));
    assert!(!f
        .dispatcher
        .dispatch_intent(&HostIntent::with_action("android.intent.action.VIEW")));
    assert!(!f.dispatcher.dispatch_intent(&HostIntent::default()));

    assert_eq!(f.engine.take_calls(), vec![Call::Pause, Call::Play]);
}

#[test]
fn test_dispatcher_reaches_every_view() {
    let dispatcher = Arc::new(CallbackDispatcher::new());
    let selected = Arc::new(SelectedRenderer::default());
    let first = Fixture::with_shared(Arc::clone(&dispatcher), Arc::clone(&selected)).playing();
    let second = Fixture::with_shared(Arc::clone(&dispatcher), Arc::clone(&selected)).playing();

    assert!(dispatcher.dispatch_intent(&HostIntent::with_action("VLCVideo:Pause")));
    assert_eq!(first.engine.take_calls(), vec![Call::Pause]);
    assert_eq!(second.engine.take_calls(), vec![Call::Pause]);

    // Only one view has key control; the press is still handled overall
    second.controller.set_key_control_enabled(true);
    assert!(dispatcher.dispatch_key_down(&KeyEvent::down(KeyCode::Space)));
    assert!(first.engine.take_calls().is_empty());
    assert_eq!(second.engine.take_calls(), vec![Call::Play]);
}

// ============================================================================
// Renderer, Lifecycle, Release
// ============================================================================

#[test]
fn test_follows_selected_renderer() {
    let f = Fixture::new().playing();

    f.selected
        .set(Some(RendererItem::new("chromecast-1", "Living Room TV")));
    f.selected.set(None);

    assert_eq!(
        f.engine.take_calls(),
        vec![
            Call::SetRenderer(Some("Living Room TV".to_string())),
            Call::SetRenderer(None),
        ]
    );
}

#[test]
fn test_host_pause_respects_play_in_background() {
    let f = Fixture::new().playing();

    f.controller.on_lifecycle(LifecycleState::Background);
    assert_eq!(f.engine.take_calls(), vec![Call::Pause]);

    f.controller.set_play_in_background(true);
    f.controller.on_host_pause();
    f.controller.on_lifecycle(LifecycleState::Foreground);
    assert!(f.engine.take_calls().is_empty());
}

#[test]
fn test_detach_releases_everything() {
    let f = Fixture::new().playing();
    assert_eq!(f.dispatcher.key_handler_count(), 1);
    assert_eq!(f.dispatcher.intent_handler_count(), 1);
    assert_eq!(f.selected.subscriber_count(), 1);

    f.controller.detach();

    assert_eq!(f.engine.take_calls(), vec![Call::Stop, Call::Release]);
    assert_eq!(f.notifications.take(), vec![NotificationCall::Clear]);
    assert_eq!(f.dispatcher.key_handler_count(), 0);
    assert_eq!(f.dispatcher.intent_handler_count(), 0);
    assert_eq!(f.selected.subscriber_count(), 0);
    assert!(!f.controller.is_attached());

    // Second detach is a no-op
    f.controller.detach();
    assert!(f.engine.take_calls().is_empty());
    assert!(f.notifications.take().is_empty());
}

#[test]
fn test_host_destroy_detaches() {
    let f = Fixture::new().loaded();
    f.controller.on_lifecycle(LifecycleState::Destroyed);
    assert!(f.engine.is_released());
    assert_eq!(f.dispatcher.key_handler_count(), 0);
}

#[test]
fn test_released_engine_ignores_everything() {
    let f = Fixture::new().playing();
    f.controller.detach();
    f.reset();

    f.controller.load_media(MediaSource::new("https://cdn.example.com/new.mkv"));
    for command in [
        VideoCommand::Play,
        VideoCommand::Pause,
        VideoCommand::Seek { time_ms: 1000 },
        VideoCommand::SetSubtitleTrack { id: 3 },
        VideoCommand::SetAudioTrack { id: 1 },
    ] {
        command.apply(&f.controller);
    }
    VideoProp::Media(MediaSource::new(URL)).apply(&f.controller);
    VideoProp::KeyControlEnabled(true).apply(&f.controller);
    f.controller.handle_engine_event(EngineEvent::Playing);
    f.controller.handle_engine_event(EngineEvent::EndReached);
    f.selected.set(Some(RendererItem::new("chromecast-1", "TV")));
    assert!(!f.controller.handle_key_down(&KeyEvent::down(KeyCode::Space)));
    assert!(!f
        .controller
        .handle_intent(&HostIntent::with_action("VLCVideo:Play")));

    assert!(f.engine.take_calls().is_empty());
    assert!(f.events.take().is_empty());
    assert!(f.notifications.take().is_empty());
    assert_eq!(f.controller.time(), 0);
    assert_eq!(f.controller.duration(), 0);
    assert!(!f.controller.is_playing());
}

#[test]
fn test_dropped_controller_leaves_no_live_handlers() {
    let f = Fixture::new().playing();
    let dispatcher = Arc::clone(&f.dispatcher);
    let selected = Arc::clone(&f.selected);
    let engine = Arc::clone(&f.engine);
    drop(f);

    assert!(!dispatcher.dispatch_key_down(&KeyEvent::down(KeyCode::Space)));
    assert_eq!(dispatcher.key_handler_count(), 0);

    // The slot still holds the observer, but it no longer reaches the engine
    selected.set(Some(RendererItem::new("chromecast-1", "TV")));
    assert!(engine.take_calls().is_empty());
}

#[test]
fn test_commands_and_props_apply() {
    let f = Fixture::new();

    VideoProp::decode("media", &json!({ "sourceUrl": URL, "title": "From props" }))
        .unwrap()
        .apply(&f.controller);
    VideoProp::decode("playInBackground", &json!(true))
        .unwrap()
        .apply(&f.controller);
    VideoProp::decode("keyControlEnabled", &json!(true))
        .unwrap()
        .apply(&f.controller);

    assert_eq!(
        f.controller.session().map(|s| s.source.title),
        Some("From props".to_string())
    );
    assert!(f.controller.play_in_background());
    assert!(f.controller.key_control_enabled());
    f.reset();

    VideoCommand::from_id(3, &json!([2500])).unwrap().apply(&f.controller);
    VideoCommand::from_name("pause", &json!([])).unwrap().apply(&f.controller);

    assert_eq!(
        f.engine.take_calls(),
        vec![Call::SetTime(2500), Call::Play, Call::Pause]
    );
}
