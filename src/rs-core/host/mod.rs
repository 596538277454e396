//! Interfaces of everything the player core relies on but does not own: the media
//! element, the adaptive streaming engine, timers, network requests, the theme and so
//! on.
//!
//! In production, all of them are implemented by `bindings::JsHost` through imported
//! JavaScript functions.

use crate::{
    audio_tracks::AudioTrackSet,
    bindings::{EngineHandle, FrameId, RequestId, SocketId, TimerId, TimerReason},
    engine::{EngineConfig, EngineError},
    session::RenderState,
};

#[cfg(test)]
pub(crate) mod mock;

/// Actions performed on the media element.
pub(crate) trait MediaController {
    fn play(&mut self);
    fn pause(&mut self);
    fn set_muted(&mut self, muted: bool);
    fn seek(&mut self, position: f64);
    /// Set the URL directly loaded by the media element, `None` removing it.
    fn set_source(&mut self, url: Option<&str>);
    fn set_loop(&mut self, looping: bool);
    fn set_controls(&mut self, controls: &str);
}

/// Lifecycle of adaptive streaming engine instances.
pub(crate) trait EngineBackend {
    fn create_engine(&mut self, config: &EngineConfig) -> Result<EngineHandle, EngineError>;
    fn load_source(
        &mut self,
        engine: EngineHandle,
        url: &str,
        start_level: u32,
    ) -> Result<(), EngineError>;
    fn destroy_engine(&mut self, engine: EngineHandle) -> Result<(), EngineError>;
    fn set_audio_track(&mut self, engine: EngineHandle, native_id: u32);
}

pub(crate) trait Scheduler {
    fn start_timer(&mut self, duration_ms: f64, reason: TimerReason) -> TimerId;
    fn clear_timer(&mut self, id: TimerId);
    fn request_animation_frame(&mut self) -> FrameId;
    fn cancel_animation_frame(&mut self, id: FrameId);
}

pub(crate) trait MetadataSource {
    /// Start fetching the metadata of the given embed. Completion is signaled
    /// asynchronously with the returned `RequestId`.
    fn fetch_metadata(&mut self, embed_id: &str) -> RequestId;
}

/// Playback telemetry. Both methods are idempotent.
pub(crate) trait MetricsCollector {
    fn monitor(&mut self, source: &str);
    fn demonitor(&mut self);
}

pub(crate) trait ThemeBridge {
    fn load_theme(&mut self, name: &str);
    fn render(&mut self, state: &RenderState);
    /// `true` if the audio-track menu and its button both exist in the theme.
    fn is_audio_menu_mounted(&self) -> bool;
    fn update_audio_menu(&mut self, tracks: &AudioTrackSet, visible: bool);
    fn materialize_endscreen(&mut self);
}

/// Ordered collection of embeds, used for auto-advance.
pub(crate) trait CollectionSource {
    fn contains_item(&self, collection: &str, item: &str) -> bool;
    fn successor_of(&self, collection: &str, item: &str) -> Option<String>;
}

pub(crate) trait EventSink {
    fn emit(&mut self, event: PlayerEvent);
}

pub(crate) trait RealtimeTransport {
    fn open_socket(&mut self, token: &str) -> SocketId;
    fn close_socket(&mut self, socket: SocketId);
    fn join_topic(&mut self, socket: SocketId, topic: &str);
    fn leave_topic(&mut self, socket: SocketId, topic: &str);
}

/// Everything a `Session` needs from its environment.
pub(crate) trait Host:
    MediaController
    + EngineBackend
    + Scheduler
    + MetadataSource
    + MetricsCollector
    + ThemeBridge
    + CollectionSource
    + EventSink
    + RealtimeTransport
{
}

impl<T> Host for T where
    T: MediaController
        + EngineBackend
        + Scheduler
        + MetadataSource
        + MetricsCollector
        + ThemeBridge
        + CollectionSource
        + EventSink
        + RealtimeTransport
{
}

/// Events observable from outside the player.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum PlayerEvent {
    /// The media element is available.
    Ready,
    /// Passthrough of a native media event.
    Media { name: &'static str, current_time: f64 },
    /// The embed can now be played.
    Playable,
    /// An interaction, either from the user or automatic (e.g. auto-advance).
    Click {
        action: String,
        identifier: String,
        position: f64,
    },
}

impl PlayerEvent {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            PlayerEvent::Ready => "ready",
            PlayerEvent::Media { name, .. } => name,
            PlayerEvent::Playable => "playable",
            PlayerEvent::Click { .. } => "click",
        }
    }
}
