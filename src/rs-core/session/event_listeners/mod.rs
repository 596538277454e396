use crate::{
    audio_tracks::EngineAudioTrack,
    bindings::{EngineHandle, FrameId, MediaEvent, RequestId, TimerId, TimerReason},
    engine::EngineError,
    host::{Host, PlayerEvent},
    metadata::{EmbedMetadata, MetadataError},
    Logger,
};

use super::{PlaybackObservation, Session};

/// Methods reacting to events coming from the environment of the `Session`.
impl<H: Host> Session<H> {
    /// To call when a request started through `MetadataSource::fetch_metadata` succeeded.
    pub(crate) fn on_metadata_fetched(&mut self, request_id: RequestId, data: &str) {
        let metadata = EmbedMetadata::from_json(data);
        self.on_metadata_response(request_id, metadata);
    }

    /// To call when a request started through `MetadataSource::fetch_metadata` failed.
    pub(crate) fn on_metadata_fetch_failed(&mut self, request_id: RequestId, message: String) {
        self.on_metadata_response(request_id, Err(MetadataError::Request(message)));
    }

    /// To call once the media element exists.
    ///
    /// The source is applied first, then playback commands queued until now are
    /// executed in order.
    pub(crate) fn on_media_element_attached(&mut self) {
        if self.element_attached {
            return;
        }
        Logger::info("Session: Media element attached");
        self.element_attached = true;
        self.host.emit(PlayerEvent::Ready);
        self.host.set_loop(self.config.looping);
        self.host.set_muted(self.config.muted);
        self.host.set_controls(&self.config.controls);
        self.apply_source();
        for command in self.commands.flush() {
            self.execute_command(command);
        }
        self.after_source_update();
    }

    /// To call when the media element has been removed.
    pub(crate) fn on_media_element_detached(&mut self) {
        if !self.element_attached {
            return;
        }
        Logger::info("Session: Media element detached");
        self.element_attached = false;
        self.engine.detach(&mut self.host);
        self.audio_tracks.reset(&mut self.host);
        self.applied_source = None;
        self.engine_error = None;
        self.commands.reset();
        self.observation = PlaybackObservation::default();
        self.after_source_update();
    }

    /// To call on each event of the media element, with its state at that time.
    pub(crate) fn on_media_event(&mut self, event: MediaEvent, observation: PlaybackObservation) {
        if !self.element_attached {
            Logger::lazy_debug(&|| {
                format!("Session: Ignoring {} event, no media element", event.name())
            });
            return;
        }
        self.observation = observation;
        self.host.emit(PlayerEvent::Media {
            name: event.name(),
            current_time: observation.current_time,
        });
        match event {
            MediaEvent::Playing => self
                .endscreen
                .on_playback_started(&mut self.host, &mut self.config.controls),
            MediaEvent::Ended => self.on_playback_ended(),
            MediaEvent::TimeUpdate => self.check_near_end(),
            _ => {}
        }
        if event.affects_loading() {
            self.update_loading_state();
            self.sync_channel();
            self.try_autoplay();
            self.announce_playable();
        }
        self.refresh_render_state();
    }

    /// To call when the player starts or stops intersecting with the viewport.
    pub(crate) fn on_intersection_change(&mut self, intersecting: bool) {
        let inputs = self.autoplay_inputs();
        let action = self.autoplay.on_intersection_change(intersecting, inputs);
        self.run_autoplay_action(action);
    }

    /// To call when a timer started through `Scheduler::start_timer` elapsed.
    pub(crate) fn on_timer_ended(&mut self, id: TimerId, reason: TimerReason) {
        match reason {
            TimerReason::ProcessingRefresh => {
                if self.loading.on_refresh_timer(id) && !self.is_fetching() {
                    self.fetch_metadata(true);
                }
            }
        }
    }

    /// To call when an animation frame requested through the `Scheduler` is reached.
    pub(crate) fn on_animation_frame(&mut self, id: FrameId) {
        self.audio_tracks.on_animation_frame(&mut self.host, id);
        self.refresh_render_state();
    }

    /// To call once a theme finished rendering.
    pub(crate) fn on_theme_ready(&mut self) {
        Logger::debug("Session: Theme ready");
        // The new theme has rendered nothing yet
        self.render_state = None;
        self.host.set_controls(&self.config.controls);
        self.refresh_render_state();
        self.audio_tracks.on_theme_changed(&mut self.host);
    }

    /// To call when the render root of the theme changed.
    pub(crate) fn on_audio_menu_mutation(&mut self) {
        self.audio_tracks.on_menu_ready(&mut self.host);
    }

    /// To call when an engine reported its list of audio tracks.
    pub(crate) fn on_engine_audio_tracks(
        &mut self,
        engine: EngineHandle,
        tracks: Vec<EngineAudioTrack>,
        active: Option<u32>,
    ) {
        if !self.engine.is_current(engine) {
            Logger::lazy_debug(&|| format!("Session: Ignoring tracks of old engine {engine}"));
            return;
        }
        self.audio_tracks
            .on_track_list_changed(&mut self.host, tracks, active);
        self.refresh_render_state();
    }

    /// To call when an engine switched to another audio track.
    pub(crate) fn on_engine_audio_track_switched(&mut self, engine: EngineHandle, native_id: u32) {
        if !self.engine.is_current(engine) {
            return;
        }
        self.audio_tracks
            .on_active_track_changed(&mut self.host, native_id);
    }

    /// To call when an engine encountered an error it cannot recover from.
    ///
    /// The engine is destroyed and not rebuilt until the source changes.
    pub(crate) fn on_engine_fatal_error(&mut self, engine: EngineHandle, message: String) {
        if !self.engine.is_current(engine) {
            Logger::lazy_debug(&|| format!("Session: Ignoring error of old engine {engine}"));
            return;
        }
        let err = EngineError::Fatal(message);
        Logger::error(&format!("Session: {err}"));
        self.engine.detach(&mut self.host);
        self.audio_tracks.reset(&mut self.host);
        self.engine_error = Some(err);
        self.refresh_render_state();
    }

    /// To call when a status update is pushed on a joined realtime topic.
    ///
    /// The pushed status is only a hint: the metadata is fetched again right away.
    pub(crate) fn on_status_push(&mut self, topic: &str, status: &str) {
        let is_joined = self
            .joined_channel
            .as_ref()
            .map_or(false, |c| c.topic == topic);
        if !is_joined {
            Logger::lazy_debug(&|| format!("Session: Ignoring push on unknown topic {topic}"));
            return;
        }
        Logger::lazy_info(&|| format!("Session: Status pushed: {status}"));
        if !self.is_fetching() {
            self.fetch_metadata(true);
        }
    }
}
