//! # Casting Module
//!
//! Renderer discovery and selection for the VLC playback bridge.
//!
//! ## Overview
//!
//! - [`RendererRegistry`](registry::RendererRegistry) - Known targets, discovery
//!   lifecycle, and the `VLCCastingModule*` broadcasts
//! - [`Observable`](observable::Observable) - Change-notifying slot; the
//!   [`SelectedRenderer`](observable::SelectedRenderer) instance is shared with
//!   every playback controller
//! - [`spawn_start_poller`](discovery::spawn_start_poller) - Bounded start retry
//!   for discovery services
//!
//! ## Usage
//!
//! ```ignore
//! use core_casting::{RendererRegistry, SelectedRenderer};
//! use std::sync::Arc;
//!
//! let selected = Arc::new(SelectedRenderer::default());
//! let registry = RendererRegistry::new(
//!     Some(discovery_provider),
//!     device_sink,
//!     Arc::clone(&selected),
//!     config.discovery,
//! )?;
//! registry.initialize()?;
//!
//! registry.set_selected_renderer("Living Room TV");
//! ```

pub mod discovery;
pub mod error;
pub mod observable;
pub mod registry;

pub use discovery::{spawn_start_poller, PollOutcome};
pub use error::{CastingError, Result};
pub use observable::{Observable, Observer, SelectedRenderer, SubscriptionId};
pub use registry::RendererRegistry;
