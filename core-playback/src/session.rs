//! Media sessions and engine option derivation.

use bridge_traits::{HwDecoderSetting, MediaRequest};
use serde::{Deserialize, Serialize};

/// Subtitle track id that never exists, so resumed playback starts without
/// subtitles until the first Playing event resets the selection.
const UNSELECTABLE_SUBTITLE_TRACK: i32 = i32::MAX;

pub const OPTION_START_PAUSED: &str = ":start-paused";
pub const OPTION_NO_MEDIACODEC_DR: &str = ":no-mediacodec-dr";
pub const OPTION_NO_OMXIL_DR: &str = ":no-omxil-dr";

/// Hardware acceleration policy requested through the `hwDecoderMode` prop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HwDecoderMode {
    /// Let the engine decide.
    Automatic,
    Disabled,
    /// Hardware decoding without direct rendering.
    #[default]
    Decoding,
    Full,
}

impl HwDecoderMode {
    /// Map a host integer code. Unknown codes fall back to the default.
    pub fn from_code(code: i64) -> Self {
        match code {
            -1 => HwDecoderMode::Automatic,
            0 => HwDecoderMode::Disabled,
            2 => HwDecoderMode::Full,
            _ => HwDecoderMode::Decoding,
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            HwDecoderMode::Automatic => -1,
            HwDecoderMode::Disabled => 0,
            HwDecoderMode::Decoding => 1,
            HwDecoderMode::Full => 2,
        }
    }
}

/// What the host asked to play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSource {
    pub source_url: String,
    /// Resume position in milliseconds; `0` starts from the beginning.
    pub start_time_ms: i64,
    pub autoplay: bool,
    pub hw_decoder_mode: HwDecoderMode,
    /// Shown in the media notification.
    pub title: String,
}

impl MediaSource {
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            start_time_ms: 0,
            autoplay: true,
            hw_decoder_mode: HwDecoderMode::default(),
            title: String::new(),
        }
    }

    pub fn with_start_time(mut self, start_time_ms: i64) -> Self {
        self.start_time_ms = start_time_ms;
        self
    }

    pub fn with_autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }

    pub fn with_hw_decoder_mode(mut self, mode: HwDecoderMode) -> Self {
        self.hw_decoder_mode = mode;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Engine request for this source.
    pub fn to_request(&self) -> MediaRequest {
        let mut request = MediaRequest::new(self.source_url.clone());

        request = match self.hw_decoder_mode {
            HwDecoderMode::Automatic => request,
            HwDecoderMode::Disabled => request.with_hw_decoder(HwDecoderSetting::new(false, false)),
            HwDecoderMode::Full => request.with_hw_decoder(HwDecoderSetting::new(true, true)),
            HwDecoderMode::Decoding => request
                .with_hw_decoder(HwDecoderSetting::new(true, true))
                .with_option(OPTION_NO_MEDIACODEC_DR)
                .with_option(OPTION_NO_OMXIL_DR),
        };

        if self.start_time_ms > 0 {
            request = request
                .with_option(format!(":start-time={}", self.start_time_ms / 1000))
                .with_option(format!(":sub-track-id={}", UNSELECTABLE_SUBTITLE_TRACK));
        }

        if !self.autoplay {
            request = request.with_option(OPTION_START_PAUSED);
        }

        request
    }
}

/// The media currently bound to a controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSession {
    pub source: MediaSource,
    /// Set by the first engine Playing event of the session.
    pub playback_started: bool,
    /// Set by `seek`, cleared by the next TimeChanged.
    pub seek_requested: bool,
}

impl MediaSession {
    pub fn new(source: MediaSource) -> Self {
        Self {
            source,
            playback_started: false,
            seek_requested: false,
        }
    }

    pub fn source_url(&self) -> &str {
        &self.source.source_url
    }

    pub fn title(&self) -> &str {
        &self.source.title
    }
}
