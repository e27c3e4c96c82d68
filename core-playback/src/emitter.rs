//! Per-view event emission.
//!
//! The emitter is stateless: each call renders one [`VideoEvent`] and hands it
//! to the host synchronously, addressed to the owning view. Nothing is batched
//! or reordered, so the call order in the controller is the order JavaScript
//! observes.

use bridge_traits::{TrackDescription, ViewEventSink, ViewId};
use core_runtime::events::{selectable_tracks, EventSeverity, TrackDescriptor, VideoEvent};
use std::sync::Arc;
use tracing::{debug, error, info, trace};

#[derive(Clone)]
pub struct EventEmitter {
    view_id: ViewId,
    sink: Arc<dyn ViewEventSink>,
}

impl EventEmitter {
    pub fn new(view_id: ViewId, sink: Arc<dyn ViewEventSink>) -> Self {
        Self { view_id, sink }
    }

    pub fn view_id(&self) -> ViewId {
        self.view_id
    }

    pub fn emit_on_buffering(&self, buffering: f64) {
        self.emit(VideoEvent::Buffering { buffering });
    }

    pub fn emit_on_playing(&self, duration: f64) {
        self.emit(VideoEvent::Playing { duration });
    }

    pub fn emit_on_paused(&self) {
        self.emit(VideoEvent::Paused);
    }

    pub fn emit_on_end_reached(&self) {
        self.emit(VideoEvent::EndReached);
    }

    pub fn emit_on_error(&self, message: &str, is_critical: bool) {
        self.emit(VideoEvent::Error {
            message: message.to_string(),
            is_critical,
        });
    }

    pub fn emit_on_time_changed(&self, time: f64) {
        self.emit(VideoEvent::TimeChanged { time });
    }

    pub fn emit_on_seek_requested(&self, time: f64) {
        self.emit(VideoEvent::SeekRequested { time });
    }

    pub fn emit_on_seek_performed(&self) {
        self.emit(VideoEvent::SeekPerformed);
    }

    /// Emits the list with "Disable" pseudo-tracks removed.
    pub fn emit_on_subtitle_tracks_changed(&self, tracks: Vec<TrackDescription>) {
        self.emit(VideoEvent::SubtitleTracksChanged {
            subtitle_tracks: to_descriptors(tracks),
        });
    }

    /// Emits the list with "Disable" pseudo-tracks removed.
    pub fn emit_on_audio_tracks_changed(&self, tracks: Vec<TrackDescription>) {
        self.emit(VideoEvent::AudioTracksChanged {
            audio_tracks: to_descriptors(tracks),
        });
    }

    pub fn emit_on_selected_subtitle_track_id_changed(&self, id: i32) {
        self.emit(VideoEvent::SelectedSubtitleTrackIdChanged { id });
    }

    pub fn emit_on_selected_audio_track_id_changed(&self, id: i32) {
        self.emit(VideoEvent::SelectedAudioTrackIdChanged { id });
    }

    fn emit(&self, event: VideoEvent) {
        let name = event.name();
        match event.severity() {
            EventSeverity::Trace => trace!(view_id = self.view_id, event = %name, "Emitting"),
            EventSeverity::Debug => debug!(view_id = self.view_id, event = %name, "Emitting"),
            EventSeverity::Info => info!(view_id = self.view_id, event = %name, "Emitting"),
            EventSeverity::Error => error!(view_id = self.view_id, event = %name, "Emitting"),
        }
        self.sink.receive_event(self.view_id, &name, event.payload());
    }
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("view_id", &self.view_id)
            .finish()
    }
}

fn to_descriptors(tracks: Vec<TrackDescription>) -> Vec<TrackDescriptor> {
    selectable_tracks(
        tracks
            .into_iter()
            .map(|track| TrackDescriptor::new(track.id, track.name)),
    )
}
