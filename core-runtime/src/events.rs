//! # Outward Event Taxonomy
//!
//! Typed definitions of every event the core sends across the bridge, plus
//! the fixed naming scheme and payload schema the JavaScript side relies on.
//!
//! ## Overview
//!
//! Two event families exist:
//! - [`VideoEvent`]: direct events addressed to one mounted playback view.
//!   Names are `"VLCVideoView"` + label, e.g. `VLCVideoViewonPlaying`.
//! - [`CastingEvent`]: module-wide broadcasts from the casting module.
//!   Names are `"VLCCastingModule"` + label.
//!
//! Each event renders to a JSON object containing exactly the documented
//! properties:
//!
//! | Event | Payload |
//! |---|---|
//! | onBuffering | `{buffering}` |
//! | onPlaying | `{duration}` |
//! | onPaused | `{}` |
//! | onEndReached | `{}` |
//! | onError | `{message, isCritical}` |
//! | onTimeChanged | `{time}` |
//! | onSeekRequested | `{time}` |
//! | onSeekPerformed | `{}` |
//! | onSubtitleTracksChanged | `{subtitleTracks: [{id, name}]}` |
//! | onAudioTracksChanged | `{audioTracks: [{id, name}]}` |
//! | onSelectedSubtitleTrackIdChanged | `{id}` |
//! | onSelectedAudioTrackIdChanged | `{id}` |
//! | onRenderersChange | `{renderers: [string]}` |
//! | onSelectedRendererChange | `{renderer: string \| null}` |
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::VideoEvent;
//!
//! let event = VideoEvent::Playing { duration: 5400000.0 };
//! assert_eq!(event.name(), "VLCVideoViewonPlaying");
//! assert_eq!(event.payload()["duration"], 5400000.0);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Prefix of every per-view event name.
pub const VIDEO_EVENT_PREFIX: &str = "VLCVideoView";

/// Prefix of every casting module event name.
pub const CASTING_EVENT_PREFIX: &str = "VLCCastingModule";

/// Property name used by both track list entries and selected-id events.
const TRACK_ID_PROP: &str = "id";
const TRACK_NAME_PROP: &str = "name";

// ============================================================================
// Tracks
// ============================================================================

/// Subtitle or audio track as surfaced to JavaScript.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackDescriptor {
    pub id: i32,
    pub name: String,
}

impl TrackDescriptor {
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Returns `true` for the engine's "Disable" pseudo-track.
    ///
    /// The "no track" choice is expressed as selecting id `-1`, so the
    /// pseudo-track is never surfaced as a selectable entry.
    pub fn is_disable_entry(&self) -> bool {
        self.name.to_lowercase().contains("disable")
    }

    fn to_json(&self) -> Value {
        json!({
            TRACK_ID_PROP: self.id,
            TRACK_NAME_PROP: self.name,
        })
    }
}

/// Drop "Disable" pseudo-tracks, keeping the engine's order.
pub fn selectable_tracks<I>(tracks: I) -> Vec<TrackDescriptor>
where
    I: IntoIterator<Item = TrackDescriptor>,
{
    tracks
        .into_iter()
        .filter(|track| !track.is_disable_entry())
        .collect()
}

// ============================================================================
// Severity
// ============================================================================

/// Event severity levels, used to pick a log level when an event is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    /// High-frequency events (time ticks, buffering)
    Trace,
    /// State changes worth tracing in development
    Debug,
    /// Session lifecycle milestones
    Info,
    /// Playback failures
    Error,
}

// ============================================================================
// Video Events
// ============================================================================

/// Discriminant of [`VideoEvent`], used for the exported constants table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VideoEventKind {
    Buffering,
    Playing,
    Paused,
    EndReached,
    Error,
    TimeChanged,
    SeekRequested,
    SeekPerformed,
    SubtitleTracksChanged,
    AudioTracksChanged,
    SelectedSubtitleTrackIdChanged,
    SelectedAudioTrackIdChanged,
}

impl VideoEventKind {
    pub const ALL: [VideoEventKind; 12] = [
        VideoEventKind::Buffering,
        VideoEventKind::Playing,
        VideoEventKind::Paused,
        VideoEventKind::EndReached,
        VideoEventKind::Error,
        VideoEventKind::TimeChanged,
        VideoEventKind::SeekRequested,
        VideoEventKind::SeekPerformed,
        VideoEventKind::SubtitleTracksChanged,
        VideoEventKind::AudioTracksChanged,
        VideoEventKind::SelectedSubtitleTrackIdChanged,
        VideoEventKind::SelectedAudioTrackIdChanged,
    ];

    /// Event label as seen by JavaScript, without prefix.
    pub fn label(&self) -> &'static str {
        match self {
            VideoEventKind::Buffering => "onBuffering",
            VideoEventKind::Playing => "onPlaying",
            VideoEventKind::Paused => "onPaused",
            VideoEventKind::EndReached => "onEndReached",
            VideoEventKind::Error => "onError",
            VideoEventKind::TimeChanged => "onTimeChanged",
            VideoEventKind::SeekRequested => "onSeekRequested",
            VideoEventKind::SeekPerformed => "onSeekPerformed",
            VideoEventKind::SubtitleTracksChanged => "onSubtitleTracksChanged",
            VideoEventKind::AudioTracksChanged => "onAudioTracksChanged",
            VideoEventKind::SelectedSubtitleTrackIdChanged => "onSelectedSubtitleTrackIdChanged",
            VideoEventKind::SelectedAudioTrackIdChanged => "onSelectedAudioTrackIdChanged",
        }
    }

    /// Key under which the full name is exported to JavaScript (`ON_PLAYING`).
    pub fn constant_key(&self) -> &'static str {
        match self {
            VideoEventKind::Buffering => "ON_BUFFERING",
            VideoEventKind::Playing => "ON_PLAYING",
            VideoEventKind::Paused => "ON_PAUSED",
            VideoEventKind::EndReached => "ON_END_REACHED",
            VideoEventKind::Error => "ON_ERROR",
            VideoEventKind::TimeChanged => "ON_TIME_CHANGED",
            VideoEventKind::SeekRequested => "ON_SEEK_REQUESTED",
            VideoEventKind::SeekPerformed => "ON_SEEK_PERFORMED",
            VideoEventKind::SubtitleTracksChanged => "ON_SUBTITLE_TRACKS_CHANGED",
            VideoEventKind::AudioTracksChanged => "ON_AUDIO_TRACKS_CHANGED",
            VideoEventKind::SelectedSubtitleTrackIdChanged => {
                "ON_SELECTED_SUBTITLE_TRACK_ID_CHANGED"
            }
            VideoEventKind::SelectedAudioTrackIdChanged => "ON_SELECTED_AUDIO_TRACK_ID_CHANGED",
        }
    }

    /// Full event name, prefix included.
    pub fn full_name(&self) -> String {
        format!("{}{}", VIDEO_EVENT_PREFIX, self.label())
    }

    /// Constant table exported through the view manager.
    pub fn exported_constants() -> BTreeMap<&'static str, String> {
        Self::ALL
            .iter()
            .map(|kind| (kind.constant_key(), kind.full_name()))
            .collect()
    }
}

/// Event addressed to a single playback view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event")]
pub enum VideoEvent {
    Buffering {
        /// Buffer fill in percent.
        buffering: f64,
    },
    Playing {
        /// Media length in milliseconds.
        duration: f64,
    },
    Paused,
    EndReached,
    Error {
        message: String,
        is_critical: bool,
    },
    TimeChanged {
        time: f64,
    },
    SeekRequested {
        time: f64,
    },
    SeekPerformed,
    SubtitleTracksChanged {
        subtitle_tracks: Vec<TrackDescriptor>,
    },
    AudioTracksChanged {
        audio_tracks: Vec<TrackDescriptor>,
    },
    SelectedSubtitleTrackIdChanged {
        id: i32,
    },
    SelectedAudioTrackIdChanged {
        id: i32,
    },
}

impl VideoEvent {
    pub fn kind(&self) -> VideoEventKind {
        match self {
            VideoEvent::Buffering { .. } => VideoEventKind::Buffering,
            VideoEvent::Playing { .. } => VideoEventKind::Playing,
            VideoEvent::Paused => VideoEventKind::Paused,
            VideoEvent::EndReached => VideoEventKind::EndReached,
            VideoEvent::Error { .. } => VideoEventKind::Error,
            VideoEvent::TimeChanged { .. } => VideoEventKind::TimeChanged,
            VideoEvent::SeekRequested { .. } => VideoEventKind::SeekRequested,
            VideoEvent::SeekPerformed => VideoEventKind::SeekPerformed,
            VideoEvent::SubtitleTracksChanged { .. } => VideoEventKind::SubtitleTracksChanged,
            VideoEvent::AudioTracksChanged { .. } => VideoEventKind::AudioTracksChanged,
            VideoEvent::SelectedSubtitleTrackIdChanged { .. } => {
                VideoEventKind::SelectedSubtitleTrackIdChanged
            }
            VideoEvent::SelectedAudioTrackIdChanged { .. } => {
                VideoEventKind::SelectedAudioTrackIdChanged
            }
        }
    }

    /// Full event name, prefix included.
    pub fn name(&self) -> String {
        self.kind().full_name()
    }

    /// JSON payload with exactly the documented properties.
    pub fn payload(&self) -> Value {
        match self {
            VideoEvent::Buffering { buffering } => json!({ "buffering": buffering }),
            VideoEvent::Playing { duration } => json!({ "duration": duration }),
            VideoEvent::Paused | VideoEvent::EndReached | VideoEvent::SeekPerformed => json!({}),
            VideoEvent::Error {
                message,
                is_critical,
            } => json!({ "message": message, "isCritical": is_critical }),
            VideoEvent::TimeChanged { time } | VideoEvent::SeekRequested { time } => {
                json!({ "time": time })
            }
            VideoEvent::SubtitleTracksChanged { subtitle_tracks } => json!({
                "subtitleTracks": subtitle_tracks.iter().map(TrackDescriptor::to_json).collect::<Vec<_>>(),
            }),
            VideoEvent::AudioTracksChanged { audio_tracks } => json!({
                "audioTracks": audio_tracks.iter().map(TrackDescriptor::to_json).collect::<Vec<_>>(),
            }),
            VideoEvent::SelectedSubtitleTrackIdChanged { id }
            | VideoEvent::SelectedAudioTrackIdChanged { id } => json!({ TRACK_ID_PROP: id }),
        }
    }

    pub fn severity(&self) -> EventSeverity {
        match self {
            VideoEvent::Error { .. } => EventSeverity::Error,
            VideoEvent::Playing { .. } | VideoEvent::EndReached => EventSeverity::Info,
            VideoEvent::Buffering { .. } | VideoEvent::TimeChanged { .. } => EventSeverity::Trace,
            _ => EventSeverity::Debug,
        }
    }
}

// ============================================================================
// Casting Events
// ============================================================================

/// Broadcast emitted by the casting module.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum CastingEvent {
    RenderersChange {
        /// Display names of every known renderer.
        renderers: Vec<String>,
    },
    SelectedRendererChange {
        /// Display name of the selected renderer, `None` for local playback.
        renderer: Option<String>,
    },
}

impl CastingEvent {
    pub fn label(&self) -> &'static str {
        match self {
            CastingEvent::RenderersChange { .. } => "onRenderersChange",
            CastingEvent::SelectedRendererChange { .. } => "onSelectedRendererChange",
        }
    }

    pub fn name(&self) -> String {
        format!("{}{}", CASTING_EVENT_PREFIX, self.label())
    }

    pub fn payload(&self) -> Value {
        match self {
            CastingEvent::RenderersChange { renderers } => json!({ "renderers": renderers }),
            CastingEvent::SelectedRendererChange { renderer } => json!({ "renderer": renderer }),
        }
    }

    /// Constant table exported through the casting module.
    pub fn exported_constants() -> BTreeMap<&'static str, String> {
        let mut constants = BTreeMap::new();
        constants.insert(
            "ON_RENDERERS_CHANGE",
            CastingEvent::RenderersChange {
                renderers: Vec::new(),
            }
            .name(),
        );
        constants.insert(
            "ON_SELECTED_RENDERER_CHANGE",
            CastingEvent::SelectedRendererChange { renderer: None }.name(),
        );
        constants
    }
}
