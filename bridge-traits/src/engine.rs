//! Decode engine bridge traits and supporting media types.
//!
//! The core never decodes or renders anything itself. Each playback view owns
//! one [`MediaEngine`] (a LibVLC `MediaPlayer` on Android) created through the
//! process-wide [`EngineProvider`]. Engine calls are expected to return
//! immediately; results surface later as [`EngineEvent`]s which the host
//! marshals back onto the UI thread and feeds into the playback controller.

use crate::error::Result;
use crate::renderer::RendererItem;

/// Subtitle track id the engine uses for "no subtitle".
pub const TRACK_ID_NONE: i32 = -1;

/// Hardware decoder override applied to a single media item.
///
/// Mirrors LibVLC's `Media.setHWDecoderEnabled(enabled, force)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HwDecoderSetting {
    /// Whether hardware decoding should be attempted at all.
    pub enabled: bool,
    /// Whether the hardware path is forced even when the engine would
    /// otherwise fall back to software.
    pub force: bool,
}

impl HwDecoderSetting {
    pub fn new(enabled: bool, force: bool) -> Self {
        Self { enabled, force }
    }
}

/// Fully derived instruction for the engine to load one media item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRequest {
    /// Source URI exactly as supplied by the host.
    pub uri: String,
    /// Per-media engine options (e.g. `:start-time=42`).
    pub options: Vec<String>,
    /// Hardware decoder override; `None` leaves the engine default in place.
    pub hw_decoder: Option<HwDecoderSetting>,
}

impl MediaRequest {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            options: Vec::new(),
            hw_decoder: None,
        }
    }

    /// Append a media option.
    pub fn with_option(mut self, option: impl Into<String>) -> Self {
        self.options.push(option.into());
        self
    }

    /// Attach a hardware decoder override.
    pub fn with_hw_decoder(mut self, setting: HwDecoderSetting) -> Self {
        self.hw_decoder = Some(setting);
        self
    }

    /// Returns `true` if the given option has been added.
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }
}

/// Subtitle or audio track as reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackDescription {
    pub id: i32,
    pub name: String,
}

impl TrackDescription {
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Native player events the core reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineEvent {
    /// Buffering progress in percent.
    Buffering(f64),
    /// Playback started or resumed.
    Playing,
    Paused,
    /// Current playback time in milliseconds.
    TimeChanged(f64),
    EndReached,
    EncounteredError,
}

impl EngineEvent {
    /// Returns `true` for events after which the session is torn down.
    pub fn is_terminal(&self) -> bool {
        matches!(self, EngineEvent::EndReached | EngineEvent::EncounteredError)
    }
}

/// A single native media player instance.
///
/// Mutating calls return `Result` so host adapters can surface JNI failures;
/// the core logs and swallows them. Getters are infallible snapshots of the
/// engine's current state.
///
/// Implementations must be safe to call after [`release`](MediaEngine::release)
/// but the core never does so: every entry point checks
/// [`is_released`](MediaEngine::is_released) first.
pub trait MediaEngine: Send + Sync {
    /// Replace the current media item. Does not start playback.
    fn set_media(&self, request: MediaRequest) -> Result<()>;

    /// URI of the media item currently set on the player, if any.
    fn media_uri(&self) -> Option<String>;

    fn play(&self) -> Result<()>;

    fn pause(&self) -> Result<()>;

    fn stop(&self) -> Result<()>;

    /// Free native resources. The player is unusable afterwards.
    fn release(&self);

    fn is_released(&self) -> bool;

    /// Jump to an absolute position in milliseconds.
    fn set_time(&self, time_ms: i64) -> Result<()>;

    /// Current position in milliseconds.
    fn time(&self) -> i64;

    /// Media length in milliseconds, `-1` if unknown.
    fn length(&self) -> i64;

    fn is_playing(&self) -> bool;

    fn is_seekable(&self) -> bool;

    /// Select a subtitle track. The engine may reject unknown ids.
    fn set_subtitle_track(&self, id: i32) -> Result<()>;

    /// Currently selected subtitle track id.
    fn subtitle_track(&self) -> i32;

    fn subtitle_tracks(&self) -> Vec<TrackDescription>;

    /// Select an audio track. The engine may reject unknown ids.
    fn set_audio_track(&self, id: i32) -> Result<()>;

    /// Currently selected audio track id.
    fn audio_track(&self) -> i32;

    fn audio_tracks(&self) -> Vec<TrackDescription>;

    /// Route output to an external renderer, or back to local output with `None`.
    fn set_renderer(&self, renderer: Option<&RendererItem>) -> Result<()>;
}

/// Factory for engine instances, backed by one shared LibVLC instance.
pub trait EngineProvider: Send + Sync {
    /// Create a fresh player for a newly mounted view.
    fn create_engine(&self) -> Result<std::sync::Arc<dyn MediaEngine>>;
}
