use crate::{
    autoplay::{AutoplayAction, AutoplayInputs},
    bindings::RequestId,
    command_queue::PlaybackCommand,
    endscreen::SequencingContext,
    host::{Host, PlayerEvent},
    loading::LoadingPhase,
    metadata::{EmbedMetadata, EndscreenMode, MetadataError, RemoteAutoplay},
    source_resolver::{self, SourceDecision},
    Logger,
};

use super::{
    render::{self, RenderInputs},
    FetchState, JoinedChannel, PlaybackObservation, Session,
};

const CHANNEL_TOPIC_PREFIX: &str = "embed:";

/// Internal methods of the `Session`, not exposed outside of it.
impl<H: Host> Session<H> {
    /// Stop everything linked to the previous embed and start fetching metadata for
    /// `embed_id`.
    pub(super) fn start_session(&mut self, embed_id: String) {
        self.stop_current_session();
        Logger::lazy_info(&|| format!("Session: Starting session for {embed_id}"));
        self.embed_id = Some(embed_id);
        self.fetch_metadata(false);
        self.refresh_render_state();
    }

    /// Cancel all pending work and release every resource linked to the current embed.
    ///
    /// The media element itself is kept, as is the configuration.
    pub(super) fn stop_current_session(&mut self) {
        if self.embed_id.is_some() {
            Logger::debug("Session: Stopping current session");
        }
        self.loading.reset(&mut self.host);
        self.audio_tracks.reset(&mut self.host);
        self.engine.detach(&mut self.host);
        if matches!(
            self.applied_source,
            Some(SourceDecision::Direct { .. }) | Some(SourceDecision::NativeAdaptive { .. })
        ) {
            self.host.set_source(None);
        }
        self.applied_source = None;
        self.engine_error = None;
        self.endscreen.reset(&mut self.host, &mut self.config.controls);
        self.commands.clear();
        self.leave_channel();
        if self.monitoring {
            self.monitoring = false;
            self.host.demonitor();
        }
        self.autoplay.reset();
        self.metadata = None;
        self.fetch = FetchState::Idle;
        self.playable_announced = false;
        self.embed_id = None;
    }

    pub(super) fn fetch_metadata(&mut self, refresh: bool) {
        if let Some(embed_id) = self.embed_id.as_deref() {
            Logger::lazy_debug(&|| format!("Session: Fetching metadata of {embed_id}"));
            let request_id = self.host.fetch_metadata(embed_id);
            self.fetch = FetchState::Pending {
                request_id,
                refresh,
            };
        }
    }

    /// Returns `true` if a metadata request is pending.
    pub(super) fn is_fetching(&self) -> bool {
        matches!(self.fetch, FetchState::Pending { .. })
    }

    pub(super) fn on_metadata_response(
        &mut self,
        request_id: RequestId,
        response: Result<EmbedMetadata, MetadataError>,
    ) {
        let refresh = match self.fetch {
            FetchState::Pending {
                request_id: pending_id,
                refresh,
            } if pending_id == request_id => refresh,
            _ => {
                Logger::lazy_debug(&|| {
                    format!("Session: Ignoring response of outdated request {request_id}")
                });
                return;
            }
        };
        self.fetch = FetchState::Idle;
        match response {
            Ok(metadata) => {
                Logger::lazy_info(&|| {
                    format!("Session: Metadata received, status: {:?}", metadata.status)
                });
                if self.metadata.is_none() {
                    self.apply_embed_settings(&metadata);
                } else {
                    self.retry_failed_engine();
                }
                self.metadata = Some(metadata);
                self.reconcile();
            }
            Err(err) if refresh => {
                // The previous metadata stays valid, a new refresh is just scheduled
                Logger::lazy_warn(&|| format!("Session: Failed to refresh metadata: {err}"));
                self.update_loading_state();
                self.refresh_render_state();
            }
            Err(err) => {
                Logger::error(&format!("Session: Failed to fetch metadata: {err}"));
                self.fetch = FetchState::Failed(err.to_string());
                self.refresh_render_state();
            }
        }
    }

    /// Apply the settings coming from the embed itself, unless overriden by the
    /// configuration.
    fn apply_embed_settings(&mut self, metadata: &EmbedMetadata) {
        if self.config.theme.is_none() {
            if let Some(theme) = metadata.theme.as_deref() {
                self.host.load_theme(theme);
            }
        }
        if self.config.audio_track_mode.is_none() {
            let mode = metadata.audio_track_mode.unwrap_or_default();
            self.audio_tracks.set_mode(&mut self.host, mode);
        }
    }

    /// Bring everything in line with what is currently known.
    pub(super) fn reconcile(&mut self) {
        self.apply_source();
        self.after_source_update();
    }

    pub(super) fn after_source_update(&mut self) {
        self.update_loading_state();
        self.sync_channel();
        self.try_autoplay();
        self.announce_playable();
        self.refresh_render_state();
    }

    /// Resolve the source to play and apply it if it changed.
    pub(super) fn apply_source(&mut self) {
        if !self.element_attached {
            return;
        }
        let decision = match self.metadata.as_ref() {
            Some(metadata) => source_resolver::resolve(
                metadata,
                self.config.quality.as_deref(),
                &self.capabilities,
            ),
            None => return,
        };
        if self.applied_source.as_ref() == Some(&decision) {
            return;
        }
        Logger::lazy_info(&|| format!("Session: Applying source {decision:?}"));
        self.audio_tracks.reset(&mut self.host);
        self.engine_error = None;
        match &decision {
            SourceDecision::AdaptiveEngine {
                manifest_url,
                start_level,
            } => {
                if matches!(
                    self.applied_source,
                    Some(SourceDecision::Direct { .. }) | Some(SourceDecision::NativeAdaptive { .. })
                ) {
                    self.host.set_source(None);
                }
                if let Err(err) = self.engine.attach(&mut self.host, manifest_url, *start_level) {
                    Logger::error(&format!("Session: {err}"));
                    self.engine_error = Some(err);
                }
            }
            _ => {
                self.engine.detach(&mut self.host);
                self.host.set_source(decision.url());
            }
        }
        self.applied_source = Some(decision);
    }

    /// Force the source to be rebuilt on the next reconciliation if the engine failed.
    pub(super) fn retry_failed_engine(&mut self) {
        if self.engine_error.is_some() {
            self.applied_source = None;
        }
    }

    pub(super) fn update_loading_state(&mut self) {
        let (status, has_source) = match self.metadata.as_ref() {
            Some(metadata) => (Some(metadata.status), metadata.has_playable_source()),
            None => (None, false),
        };
        self.loading.update(
            &mut self.host,
            status,
            has_source,
            self.observation.readiness(),
        );
    }

    /// Join the realtime topic of the current embed while it is processing, leave it
    /// otherwise.
    pub(super) fn sync_channel(&mut self) {
        let wanted = match (
            self.loading.is_processing(),
            self.registry.is_some(),
            self.config.access_token.as_deref(),
            self.embed_id.as_deref(),
        ) {
            (true, true, Some(token), Some(embed_id)) => {
                Some((token.to_owned(), format!("{CHANNEL_TOPIC_PREFIX}{embed_id}")))
            }
            _ => None,
        };
        let unchanged = match (&self.joined_channel, &wanted) {
            (Some(joined), Some((token, topic))) => joined.token == *token && joined.topic == *topic,
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return;
        }
        self.leave_channel();
        if let (Some((token, topic)), Some(registry)) = (wanted, self.registry.as_ref()) {
            Logger::lazy_debug(&|| format!("Session: Joining topic {topic}"));
            let socket = registry.borrow_mut().acquire(&mut self.host, &token);
            self.host.join_topic(socket, &topic);
            self.joined_channel = Some(JoinedChannel {
                token,
                topic,
                socket,
            });
        }
    }

    pub(super) fn leave_channel(&mut self) {
        if let Some(channel) = self.joined_channel.take() {
            Logger::lazy_debug(&|| format!("Session: Leaving topic {}", channel.topic));
            self.host.leave_topic(channel.socket, &channel.topic);
            if let Some(registry) = self.registry.as_ref() {
                registry
                    .borrow_mut()
                    .release(&mut self.host, &channel.token);
            }
        }
    }

    /// Returns `true` if a source is applied and the video is ready to be played.
    pub(super) fn can_play(&self) -> bool {
        self.element_attached
            && self.engine_error.is_none()
            && self.loading.phase() == LoadingPhase::Ready
            && self
                .applied_source
                .as_ref()
                .map_or(false, |d| d.is_available())
    }

    pub(super) fn autoplay_inputs(&self) -> AutoplayInputs {
        AutoplayInputs {
            intersecting: self.autoplay.intersecting(),
            mode: self.config.autoplay,
            remote: self
                .metadata
                .as_ref()
                .map_or(RemoteAutoplay::Off, |m| m.autoplay),
            paused: self.observation.paused,
            ready_state: self.observation.ready_state,
            can_play: self.can_play(),
        }
    }

    pub(super) fn try_autoplay(&mut self) {
        let inputs = self.autoplay_inputs();
        let action = self.autoplay.evaluate(inputs);
        self.run_autoplay_action(action);
    }

    pub(super) fn run_autoplay_action(&mut self, action: AutoplayAction) {
        match action {
            AutoplayAction::Play => {
                Logger::info("Session: Autoplaying");
                self.start_monitoring();
                self.host.set_muted(true);
                self.host.play();
            }
            AutoplayAction::Pause => {
                Logger::info("Session: Pausing, player left the viewport");
                self.execute_command(PlaybackCommand::Pause);
            }
            AutoplayAction::None => {}
        }
    }

    /// Run `command` now if the media element exists, queue it otherwise.
    pub(super) fn request_command(&mut self, command: PlaybackCommand) {
        if let Some(command) = self.commands.enqueue_or_run(command) {
            self.execute_command(command);
        }
    }

    pub(super) fn execute_command(&mut self, command: PlaybackCommand) {
        match command {
            PlaybackCommand::Play => {
                self.start_monitoring();
                self.host.play();
            }
            PlaybackCommand::Pause => self.host.pause(),
            PlaybackCommand::SetMuted(muted) => self.host.set_muted(muted),
            PlaybackCommand::Seek(position) => self.host.seek(position),
        }
    }

    fn start_monitoring(&mut self) {
        let source = self
            .applied_source
            .as_ref()
            .and_then(|d| d.url())
            .or(self.embed_id.as_deref())
            .unwrap_or_default();
        self.host.monitor(source);
        self.monitoring = true;
    }

    pub(super) fn announce_playable(&mut self) {
        if !self.playable_announced
            && self.can_play()
            && !self.observation.readiness().is_awaiting_metadata()
        {
            self.playable_announced = true;
            Logger::info("Session: Embed is playable");
            self.host.emit(PlayerEvent::Playable);
        }
    }

    pub(super) fn endscreen_mode(&self) -> EndscreenMode {
        self.config.endscreen.unwrap_or_else(|| {
            self.metadata
                .as_ref()
                .map_or(EndscreenMode::None, |m| m.endscreen)
        })
    }

    pub(super) fn on_playback_ended(&mut self) {
        let ctx = SequencingContext {
            mode: self.endscreen_mode(),
            collection: self.config.collection.as_deref(),
            auto_advance: self.config.auto_advance,
            current_item: self.embed_id.as_deref(),
            position: self.observation.current_time,
        };
        self.endscreen
            .on_playback_ended(&mut self.host, &mut self.config.controls, &ctx);
    }

    pub(super) fn check_near_end(&mut self) {
        let PlaybackObservation {
            current_time,
            duration,
            ..
        } = self.observation;
        if !duration.is_finite() || duration <= 0. {
            return;
        }
        let ctx = SequencingContext {
            mode: self.endscreen_mode(),
            collection: self.config.collection.as_deref(),
            auto_advance: self.config.auto_advance,
            current_item: self.embed_id.as_deref(),
            position: current_time,
        };
        self.endscreen.on_near_end(
            &mut self.host,
            &mut self.config.controls,
            duration - current_time,
            &ctx,
        );
    }

    /// Re-derive the `RenderState` and give it to the theme if it changed.
    pub(super) fn refresh_render_state(&mut self) {
        let fetch_error = match &self.fetch {
            FetchState::Failed(message) => Some(message.as_str()),
            _ => None,
        };
        let state = render::derive_render_state(&RenderInputs {
            fetch_error,
            metadata: self.metadata.as_ref(),
            phase: self.loading.phase(),
            engine_failed: self.engine_error.is_some(),
            poster_override: self.config.poster.as_deref(),
            controls: &self.config.controls,
            start_screen: self.endscreen.is_start_screen_visible(),
            endscreen: self.endscreen.is_visible(),
            audio_menu: self.audio_tracks.is_menu_visible(),
            subtitles: &self.config.subtitles,
        });
        if self.render_state.as_ref() != Some(&state) {
            self.host.render(&state);
            self.render_state = Some(state);
        }
    }
}
