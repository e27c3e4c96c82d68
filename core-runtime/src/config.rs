//! # Core Configuration Module
//!
//! Provides configuration management for the VLC playback bridge.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `VlcConfig`
//! instance that holds all host bridges and tunables the core needs. It
//! enforces fail-fast validation so a missing bridge is reported at package
//! construction instead of surfacing as silent playback failures later.
//!
//! ## Required Dependencies
//!
//! - `EngineProvider` - Creates one native player per mounted view
//! - `ViewEventSink` - Delivers per-view events to JavaScript
//! - `DeviceEventSink` - Delivers casting module broadcasts to JavaScript
//!
//! ## Optional Dependencies
//!
//! - `DiscoveryProvider` - Renderer discovery services (casting disabled without it)
//! - `PlaybackNotificationSink` - Media notification state
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::VlcConfig;
//! use std::sync::Arc;
//!
//! let config = VlcConfig::builder()
//!     .engine_provider(Arc::new(MyLibVlc::new()))
//!     .view_event_sink(Arc::new(MyRctEventEmitter))
//!     .device_event_sink(Arc::new(MyDeviceEmitter))
//!     .engine_options(vec!["-vvv".into(), "--http-reconnect".into()])
//!     .build()
//!     .expect("Failed to build config");
//! ```
//!
//! ## Error Handling
//!
//! The builder validates all required dependencies and provides actionable error
//! messages when capabilities are missing:
//!
//! ```should_panic
//! use core_runtime::config::VlcConfig;
//!
//! // This will panic with an actionable error message
//! let config = VlcConfig::builder()
//!     .build()
//!     .expect("Should fail - missing required bridges");
//! ```

use crate::error::{Error, Result};
use bridge_traits::{
    DeviceEventSink, DiscoveryProvider, EngineProvider, PlaybackNotificationSink, ViewEventSink,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Engine options used when the host does not supply its own.
pub const DEFAULT_ENGINE_OPTIONS: &[&str] = &["-vvv", "--http-reconnect"];

/// Core configuration for the VLC playback bridge.
///
/// Use [`VlcConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct VlcConfig {
    /// Native player factory (required)
    pub engine_provider: Arc<dyn EngineProvider>,

    /// Per-view event channel (required)
    pub view_event_sink: Arc<dyn ViewEventSink>,

    /// Module broadcast channel (required)
    pub device_event_sink: Arc<dyn DeviceEventSink>,

    /// Renderer discovery services (optional)
    pub discovery_provider: Option<Arc<dyn DiscoveryProvider>>,

    /// Media notification state consumer (optional)
    pub notification_sink: Option<Arc<dyn PlaybackNotificationSink>>,

    /// Options the shared engine instance was created with
    pub engine_options: Vec<String>,

    pub playback: PlaybackSettings,

    pub discovery: DiscoverySettings,
}

impl std::fmt::Debug for VlcConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VlcConfig")
            .field("engine_provider", &"EngineProvider { ... }")
            .field("view_event_sink", &"ViewEventSink { ... }")
            .field("device_event_sink", &"DeviceEventSink { ... }")
            .field(
                "discovery_provider",
                &self
                    .discovery_provider
                    .as_ref()
                    .map(|_| "DiscoveryProvider { ... }"),
            )
            .field(
                "notification_sink",
                &self
                    .notification_sink
                    .as_ref()
                    .map(|_| "PlaybackNotificationSink { ... }"),
            )
            .field("engine_options", &self.engine_options)
            .field("playback", &self.playback)
            .field("discovery", &self.discovery)
            .finish()
    }
}

impl VlcConfig {
    /// Creates a new builder for constructing a `VlcConfig`.
    pub fn builder() -> VlcConfigBuilder {
        VlcConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    pub fn validate(&self) -> Result<()> {
        self.playback.validate()?;
        self.discovery.validate()?;
        Ok(())
    }
}

// ============================================================================
// Playback Settings
// ============================================================================

/// Tunables for playback controllers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackSettings {
    /// How far a fast-forward/rewind key press jumps.
    ///
    /// Default: 15 seconds.
    #[serde(default = "default_key_seek_step")]
    pub key_seek_step: Duration,

    /// Key seeks never land closer than this to the end of the media.
    ///
    /// Default: 1 second.
    #[serde(default = "default_seek_end_guard")]
    pub seek_end_guard: Duration,

    /// Fixed user-facing message sent with `onError`. Engine error detail is
    /// not stable API and is never forwarded.
    #[serde(default = "default_media_error_message")]
    pub media_error_message: String,

    /// Intent action that resumes playback from the media notification.
    #[serde(default = "default_play_intent_action")]
    pub play_intent_action: String,

    /// Intent action that pauses playback from the media notification.
    #[serde(default = "default_pause_intent_action")]
    pub pause_intent_action: String,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            key_seek_step: default_key_seek_step(),
            seek_end_guard: default_seek_end_guard(),
            media_error_message: default_media_error_message(),
            play_intent_action: default_play_intent_action(),
            pause_intent_action: default_pause_intent_action(),
        }
    }
}

impl PlaybackSettings {
    pub fn validate(&self) -> Result<()> {
        if self.key_seek_step.is_zero() {
            return Err(Error::Config("key_seek_step must be > 0".to_string()));
        }

        if self.media_error_message.trim().is_empty() {
            return Err(Error::Config(
                "media_error_message cannot be empty".to_string(),
            ));
        }

        if self.play_intent_action.is_empty() || self.pause_intent_action.is_empty() {
            return Err(Error::Config(
                "Notification intent actions cannot be empty".to_string(),
            ));
        }

        if self.play_intent_action == self.pause_intent_action {
            return Err(Error::Config(
                "play_intent_action and pause_intent_action must differ".to_string(),
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Discovery Settings
// ============================================================================

/// Tunables for renderer discovery start polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoverySettings {
    /// Delay between start attempts. The first attempt happens immediately.
    ///
    /// Default: 1000 ms.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: Duration,

    /// Attempts before a discoverer is abandoned.
    ///
    /// Default: 5.
    #[serde(default = "default_max_start_attempts")]
    pub max_start_attempts: u32,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            poll_interval: default_poll_interval(),
            max_start_attempts: default_max_start_attempts(),
        }
    }
}

impl DiscoverySettings {
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval.is_zero() {
            return Err(Error::Config("poll_interval must be > 0".to_string()));
        }

        if self.max_start_attempts == 0 {
            return Err(Error::Config("max_start_attempts must be > 0".to_string()));
        }

        Ok(())
    }
}

// ============================================================================
// Default Functions (for serde)
// ============================================================================

fn default_key_seek_step() -> Duration {
    Duration::from_millis(15_000)
}

fn default_seek_end_guard() -> Duration {
    Duration::from_millis(1_000)
}

fn default_media_error_message() -> String {
    "VLC encountered an error with this media.".to_string()
}

fn default_play_intent_action() -> String {
    "VLCVideo:Play".to_string()
}

fn default_pause_intent_action() -> String {
    "VLCVideo:Pause".to_string()
}

fn default_poll_interval() -> Duration {
    Duration::from_millis(1_000)
}

fn default_max_start_attempts() -> u32 {
    5
}

// ============================================================================
// Builder
// ============================================================================

fn capability_missing(capability: &str, message: &str) -> Error {
    Error::CapabilityMissing {
        capability: capability.to_string(),
        message: message.to_string(),
    }
}

/// Builder for constructing [`VlcConfig`] instances.
///
/// Call [`build()`](VlcConfigBuilder::build) to validate and create the
/// final config.
#[derive(Default)]
pub struct VlcConfigBuilder {
    engine_provider: Option<Arc<dyn EngineProvider>>,
    view_event_sink: Option<Arc<dyn ViewEventSink>>,
    device_event_sink: Option<Arc<dyn DeviceEventSink>>,
    discovery_provider: Option<Arc<dyn DiscoveryProvider>>,
    notification_sink: Option<Arc<dyn PlaybackNotificationSink>>,
    engine_options: Option<Vec<String>>,
    playback: Option<PlaybackSettings>,
    discovery: Option<DiscoverySettings>,
}

impl VlcConfigBuilder {
    pub fn engine_provider(mut self, provider: Arc<dyn EngineProvider>) -> Self {
        self.engine_provider = Some(provider);
        self
    }

    pub fn view_event_sink(mut self, sink: Arc<dyn ViewEventSink>) -> Self {
        self.view_event_sink = Some(sink);
        self
    }

    pub fn device_event_sink(mut self, sink: Arc<dyn DeviceEventSink>) -> Self {
        self.device_event_sink = Some(sink);
        self
    }

    pub fn discovery_provider(mut self, provider: Arc<dyn DiscoveryProvider>) -> Self {
        self.discovery_provider = Some(provider);
        self
    }

    pub fn notification_sink(mut self, sink: Arc<dyn PlaybackNotificationSink>) -> Self {
        self.notification_sink = Some(sink);
        self
    }

    /// Options for the shared engine instance. Defaults to
    /// [`DEFAULT_ENGINE_OPTIONS`].
    pub fn engine_options(mut self, options: Vec<String>) -> Self {
        self.engine_options = Some(options);
        self
    }

    pub fn playback_settings(mut self, settings: PlaybackSettings) -> Self {
        self.playback = Some(settings);
        self
    }

    pub fn discovery_settings(mut self, settings: DiscoverySettings) -> Self {
        self.discovery = Some(settings);
        self
    }

    /// Builds the configuration, validating required bridges and settings.
    pub fn build(self) -> Result<VlcConfig> {
        let engine_provider = self.engine_provider.ok_or_else(|| {
            capability_missing(
                "EngineProvider",
                "An EngineProvider is required to create native players. \
                 Android: wrap the shared LibVLC instance. \
                 Tests: inject a fake engine provider.",
            )
        })?;

        let view_event_sink = self.view_event_sink.ok_or_else(|| {
            capability_missing(
                "ViewEventSink",
                "A ViewEventSink is required to deliver playback events. \
                 Android: forward to RCTEventEmitter.receiveEvent.",
            )
        })?;

        let device_event_sink = self.device_event_sink.ok_or_else(|| {
            capability_missing(
                "DeviceEventSink",
                "A DeviceEventSink is required to deliver casting events. \
                 Android: forward to RCTDeviceEventEmitter.emit.",
            )
        })?;

        let config = VlcConfig {
            engine_provider,
            view_event_sink,
            device_event_sink,
            discovery_provider: self.discovery_provider,
            notification_sink: self.notification_sink,
            engine_options: self.engine_options.unwrap_or_else(|| {
                DEFAULT_ENGINE_OPTIONS
                    .iter()
                    .map(|option| option.to_string())
                    .collect()
            }),
            playback: self.playback.unwrap_or_default(),
            discovery: self.discovery.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}
