//! # Playback Module
//!
//! Per-view playback coordination for the VLC bridge.
//!
//! ## Overview
//!
//! This module handles:
//! - Loading media and deriving engine options from props ([`session`])
//! - Mapping engine events to the outward event taxonomy ([`controller`], [`emitter`])
//! - Sharing host key presses and intents across views ([`dispatcher`])
//! - Decoding view-manager props and commands ([`props`])

pub mod controller;
pub mod dispatcher;
pub mod emitter;
pub mod error;
pub mod props;
pub mod session;

pub use controller::{ControllerDeps, PlaybackController, PlaybackPhase};
pub use dispatcher::{CallbackDispatcher, IntentHandler, KeyHandler};
pub use emitter::EventEmitter;
pub use error::{PlaybackError, Result};
pub use props::{VideoCommand, VideoProp};
pub use session::{HwDecoderMode, MediaSession, MediaSource};
