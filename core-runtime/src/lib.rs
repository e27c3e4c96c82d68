//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the VLC playback bridge:
//! - Logging and tracing infrastructure
//! - Configuration management (host bridges and tunables)
//! - The outward event taxonomy shared by the view and casting modules
//!
//! ## Overview
//!
//! This crate contains the runtime utilities every other core crate depends
//! on. It fixes the event names JavaScript subscribes to, the logging
//! conventions, and the fail-fast configuration builder.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::{DiscoverySettings, PlaybackSettings, VlcConfig, VlcConfigBuilder};
pub use error::{Error, Result};
