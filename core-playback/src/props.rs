//! # View Manager Glue
//!
//! Decodes the declarative props and imperative commands JavaScript sends to
//! a playback view, and applies them to a [`PlaybackController`].
//!
//! ## Props
//!
//! | Prop | Type | Default |
//! |---|---|---|
//! | `media.sourceUrl` | string | required |
//! | `media.startTime` | number (ms) | `0` |
//! | `media.autoplay` | bool | `true` |
//! | `media.hwDecoderMode` | number | `1` |
//! | `media.title` | string | `""` |
//! | `keyControlEnabled` | bool | `false` |
//! | `playInBackground` | bool | `false` |
//!
//! Wrong-typed optional values fall back to their defaults.
//!
//! ## Commands
//!
//! | Command | Id | Args |
//! |---|---|---|
//! | `play` | 1 | |
//! | `pause` | 2 | |
//! | `seek` | 3 | `[timeMs]` |
//! | `setSubtitleTrack` | 4 | `[trackId]` |
//! | `setAudioTrack` | 5 | `[trackId]` |
//!
//! Decoding failures are returned as [`PlaybackError`]; the host-facing
//! surface logs and drops them.

use crate::controller::PlaybackController;
use crate::error::{PlaybackError, Result};
use crate::session::{HwDecoderMode, MediaSource};
use serde_json::Value;
use std::collections::BTreeMap;

pub const MEDIA_PROP: &str = "media";
pub const MEDIA_SOURCE_URL_PROP: &str = "sourceUrl";
pub const MEDIA_START_TIME_PROP: &str = "startTime";
pub const MEDIA_AUTOPLAY_PROP: &str = "autoplay";
pub const MEDIA_HW_DECODER_MODE_PROP: &str = "hwDecoderMode";
pub const MEDIA_TITLE_PROP: &str = "title";
pub const KEY_CONTROL_ENABLED_PROP: &str = "keyControlEnabled";
pub const PLAY_IN_BACKGROUND_PROP: &str = "playInBackground";

const MEDIA_START_TIME_DEFAULT: i64 = 0;
const MEDIA_AUTOPLAY_DEFAULT: bool = true;
const MEDIA_HW_DECODER_MODE_DEFAULT: i64 = 1;
const KEY_CONTROL_ENABLED_DEFAULT: bool = false;
const PLAY_IN_BACKGROUND_DEFAULT: bool = false;

// ============================================================================
// Commands
// ============================================================================

/// Imperative command addressed to one view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VideoCommand {
    Play,
    Pause,
    Seek { time_ms: i64 },
    SetSubtitleTrack { id: i32 },
    SetAudioTrack { id: i32 },
}

impl VideoCommand {
    /// `(name, id)` of every command, as exported to JavaScript.
    pub const COMMANDS: [(&'static str, i32); 5] = [
        ("play", 1),
        ("pause", 2),
        ("seek", 3),
        ("setSubtitleTrack", 4),
        ("setAudioTrack", 5),
    ];

    /// Decode a command sent by numeric id.
    pub fn from_id(command_id: i32, args: &Value) -> Result<Self> {
        let name = Self::COMMANDS
            .iter()
            .find(|(_, id)| *id == command_id)
            .map(|(name, _)| *name)
            .ok_or_else(|| PlaybackError::UnknownCommand(command_id.to_string()))?;
        Self::from_name(name, args)
    }

    /// Decode a command sent by name.
    pub fn from_name(name: &str, args: &Value) -> Result<Self> {
        match name {
            "play" => Ok(VideoCommand::Play),
            "pause" => Ok(VideoCommand::Pause),
            "seek" => Ok(VideoCommand::Seek {
                time_ms: first_number(name, args)? as i64,
            }),
            "setSubtitleTrack" => Ok(VideoCommand::SetSubtitleTrack {
                id: first_number(name, args)? as i32,
            }),
            "setAudioTrack" => Ok(VideoCommand::SetAudioTrack {
                id: first_number(name, args)? as i32,
            }),
            other => Err(PlaybackError::UnknownCommand(other.to_string())),
        }
    }

    /// Command name to id map exported through the view manager.
    pub fn command_map() -> BTreeMap<&'static str, i32> {
        Self::COMMANDS.iter().copied().collect()
    }

    pub fn apply(self, controller: &PlaybackController) {
        match self {
            VideoCommand::Play => controller.play(),
            VideoCommand::Pause => controller.pause(),
            VideoCommand::Seek { time_ms } => controller.seek(time_ms),
            VideoCommand::SetSubtitleTrack { id } => controller.set_subtitle_track(id),
            VideoCommand::SetAudioTrack { id } => controller.set_audio_track(id),
        }
    }
}

fn first_number(command: &str, args: &Value) -> Result<f64> {
    args.get(0)
        .and_then(Value::as_f64)
        .ok_or_else(|| PlaybackError::InvalidCommandArgument {
            command: command.to_string(),
            reason: "expected a number at index 0".to_string(),
        })
}

// ============================================================================
// Props
// ============================================================================

/// Declarative prop update for one view.
#[derive(Debug, Clone, PartialEq)]
pub enum VideoProp {
    Media(MediaSource),
    KeyControlEnabled(bool),
    PlayInBackground(bool),
}

impl VideoProp {
    pub fn decode(name: &str, value: &Value) -> Result<Self> {
        match name {
            MEDIA_PROP => decode_media(value).map(VideoProp::Media),
            KEY_CONTROL_ENABLED_PROP => Ok(VideoProp::KeyControlEnabled(
                value.as_bool().unwrap_or(KEY_CONTROL_ENABLED_DEFAULT),
            )),
            PLAY_IN_BACKGROUND_PROP => Ok(VideoProp::PlayInBackground(
                value.as_bool().unwrap_or(PLAY_IN_BACKGROUND_DEFAULT),
            )),
            other => Err(PlaybackError::InvalidProp {
                prop: other.to_string(),
                reason: "unknown prop".to_string(),
            }),
        }
    }

    pub fn apply(self, controller: &PlaybackController) {
        match self {
            VideoProp::Media(source) => controller.load_media(source),
            VideoProp::KeyControlEnabled(enabled) => controller.set_key_control_enabled(enabled),
            VideoProp::PlayInBackground(enabled) => controller.set_play_in_background(enabled),
        }
    }
}

/// Decode the `media` prop object.
pub fn decode_media(value: &Value) -> Result<MediaSource> {
    let media = value.as_object().ok_or_else(|| PlaybackError::InvalidProp {
        prop: MEDIA_PROP.to_string(),
        reason: "expected an object".to_string(),
    })?;

    let source_url = media
        .get(MEDIA_SOURCE_URL_PROP)
        .and_then(Value::as_str)
        .ok_or_else(|| PlaybackError::InvalidProp {
            prop: format!("{}.{}", MEDIA_PROP, MEDIA_SOURCE_URL_PROP),
            reason: "expected a string".to_string(),
        })?;

    let start_time_ms = media
        .get(MEDIA_START_TIME_PROP)
        .and_then(Value::as_f64)
        .map(|ms| ms as i64)
        .unwrap_or(MEDIA_START_TIME_DEFAULT);

    let autoplay = media
        .get(MEDIA_AUTOPLAY_PROP)
        .and_then(Value::as_bool)
        .unwrap_or(MEDIA_AUTOPLAY_DEFAULT);

    let hw_decoder_mode = media
        .get(MEDIA_HW_DECODER_MODE_PROP)
        .and_then(Value::as_f64)
        .map(|code| code as i64)
        .unwrap_or(MEDIA_HW_DECODER_MODE_DEFAULT);

    let title = media
        .get(MEDIA_TITLE_PROP)
        .and_then(Value::as_str)
        .unwrap_or_default();

    Ok(MediaSource::new(source_url)
        .with_start_time(start_time_ms)
        .with_autoplay(autoplay)
        .with_hw_decoder_mode(HwDecoderMode::from_code(hw_decoder_mode))
        .with_title(title))
}
