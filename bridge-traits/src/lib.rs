//! # Host Bridge Traits
//!
//! Capabilities the playback core needs from the host but does not implement
//! itself.
//!
//! ## Overview
//!
//! The core coordinates playback state and events; the heavy lifting lives on
//! the other side of these traits:
//!
//! ### Media Engine
//! - [`MediaEngine`](engine::MediaEngine) - One native player per mounted view
//! - [`EngineProvider`](engine::EngineProvider) - Creates players from the shared engine instance
//!
//! ### Casting
//! - [`RendererDiscoverer`](renderer::RendererDiscoverer) - One renderer discovery service
//! - [`DiscoveryProvider`](renderer::DiscoveryProvider) - Lists the available discovery services
//!
//! ### Host UI
//! - [`ViewEventSink`](host::ViewEventSink) - Per-view direct events
//! - [`DeviceEventSink`](host::DeviceEventSink) - Module-level broadcast events
//! - [`PlaybackNotificationSink`](host::PlaybackNotificationSink) - Media notification state
//!
//! ### Utilities
//! - [`LoggerSink`](logging::LoggerSink) - Forward structured logs to the host logger
//!
//! ## Threading
//!
//! The reference host calls into the core from a single UI thread, but engine
//! and discovery callbacks originate on native worker threads. Every trait is
//! therefore `Send + Sync`, and implementations must tolerate calls from any
//! thread.
//!
//! ## Error Handling
//!
//! Fallible bridge calls return [`BridgeError`](error::BridgeError). The core
//! never forwards these to JavaScript; they are logged and the operation is
//! treated as a no-op.

pub mod engine;
pub mod error;
pub mod host;
pub mod logging;
pub mod renderer;

pub use error::BridgeError;

// Re-export commonly used types
pub use engine::{
    EngineEvent, EngineProvider, HwDecoderSetting, MediaEngine, MediaRequest, TrackDescription,
    TRACK_ID_NONE,
};
pub use host::{
    DeviceEventSink, HostIntent, KeyAction, KeyCode, KeyEvent, LifecycleState,
    NotificationAction, PlaybackNotification, PlaybackNotificationSink, ViewEventSink, ViewId,
};
pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use renderer::{
    DiscoveryEvent, DiscoveryListener, DiscoveryProvider, RendererDiscoverer, RendererItem,
};
