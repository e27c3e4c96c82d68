//! Host UI bridge: event sinks, input events and lifecycle.
//!
//! These types model what the React Native host hands to the core (key
//! presses, activity intents, lifecycle transitions) and what the core hands
//! back (keyed events with JSON payloads).

use serde_json::Value;

/// React tag of a mounted playback view.
pub type ViewId = i32;

/// Direct per-view event channel (`RCTEventEmitter.receiveEvent`).
pub trait ViewEventSink: Send + Sync {
    /// Deliver one event to the JS component mounted as `view_id`.
    fn receive_event(&self, view_id: ViewId, event_name: &str, payload: Value);
}

/// Module-level broadcast channel (`DeviceEventManagerModule.RCTDeviceEventEmitter`).
pub trait DeviceEventSink: Send + Sync {
    fn emit(&self, event_name: &str, payload: Value);
}

/// Action offered by the playback notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationAction {
    Play,
    Pause,
}

/// Snapshot of what the host should show in its media notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackNotification {
    pub title: String,
    /// Action button to show; `Pause` while playing, `Play` otherwise.
    pub action: NotificationAction,
    /// Intent action the button fires back into the dispatcher.
    pub intent_action: String,
}

/// Builds and cancels the platform media notification.
///
/// Construction of the actual notification (channels, icons, pending
/// intents) is host territory.
pub trait PlaybackNotificationSink: Send + Sync {
    fn update(&self, notification: PlaybackNotification);

    fn clear(&self);
}

/// Key codes the playback views react to. Values follow `android.view.KeyEvent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Space,
    MediaPlayPause,
    MediaFastForward,
    MediaRewind,
    Other(i32),
}

impl KeyCode {
    pub const ANDROID_SPACE: i32 = 62;
    pub const ANDROID_MEDIA_PLAY_PAUSE: i32 = 85;
    pub const ANDROID_MEDIA_REWIND: i32 = 89;
    pub const ANDROID_MEDIA_FAST_FORWARD: i32 = 90;

    pub fn from_android(code: i32) -> Self {
        match code {
            Self::ANDROID_SPACE => KeyCode::Space,
            Self::ANDROID_MEDIA_PLAY_PAUSE => KeyCode::MediaPlayPause,
            Self::ANDROID_MEDIA_REWIND => KeyCode::MediaRewind,
            Self::ANDROID_MEDIA_FAST_FORWARD => KeyCode::MediaFastForward,
            other => KeyCode::Other(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Down,
    Up,
    Multiple,
}

/// Key press forwarded from the host activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub action: KeyAction,
    /// Auto-repeat count; `0` for the initial press.
    pub repeat_count: u32,
}

impl KeyEvent {
    pub fn new(code: KeyCode, action: KeyAction, repeat_count: u32) -> Self {
        Self {
            code,
            action,
            repeat_count,
        }
    }

    /// Initial key-down press.
    pub fn down(code: KeyCode) -> Self {
        Self::new(code, KeyAction::Down, 0)
    }
}

/// Activity intent forwarded from `onNewIntent`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostIntent {
    pub action: Option<String>,
}

impl HostIntent {
    pub fn with_action(action: impl Into<String>) -> Self {
        Self {
            action: Some(action.into()),
        }
    }

    /// Intent action or the empty string.
    pub fn action(&self) -> &str {
        self.action.as_deref().unwrap_or("")
    }
}

/// Host activity lifecycle transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// `onHostResume`
    Foreground,
    /// `onHostPause`
    Background,
    /// `onHostDestroy`
    Destroyed,
}
