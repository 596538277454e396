use crate::{
    audio_tracks::AudioTrackMode,
    autoplay::AutoplayMode,
    command_queue::PlaybackCommand,
    host::{Host, PlayerEvent},
    metadata::EndscreenMode,
    Logger,
};

use super::{
    configuration::{SubtitleMode, DEFAULT_CONTROLS},
    Session,
};

/// Methods called by the outer player element, either because of its attributes or
/// because of calls on its public API.
impl<H: Host> Session<H> {
    /// Load the embed with the given identifier, `None` to unload the current one.
    ///
    /// Does nothing if that embed is already loaded.
    pub(crate) fn set_embed_id(&mut self, embed_id: Option<String>) {
        let embed_id = embed_id.filter(|id| !id.is_empty());
        if embed_id == self.embed_id {
            return;
        }
        match embed_id {
            Some(embed_id) => self.start_session(embed_id),
            None => {
                self.stop_current_session();
                self.refresh_render_state();
            }
        }
    }

    pub(crate) fn embed_id(&self) -> Option<&str> {
        self.embed_id.as_deref()
    }

    pub(crate) fn play(&mut self) {
        self.request_command(PlaybackCommand::Play);
    }

    pub(crate) fn pause(&mut self) {
        self.request_command(PlaybackCommand::Pause);
    }

    /// Play again from the beginning, hiding the endscreen if shown.
    pub(crate) fn restart(&mut self) {
        self.endscreen.close(&mut self.host, &mut self.config.controls);
        self.request_command(PlaybackCommand::Seek(0.));
        self.request_command(PlaybackCommand::Play);
        self.refresh_render_state();
    }

    pub(crate) fn seek(&mut self, position: f64) {
        self.request_command(PlaybackCommand::Seek(position));
    }

    pub(crate) fn set_muted(&mut self, muted: bool) {
        self.config.muted = muted;
        self.request_command(PlaybackCommand::SetMuted(muted));
    }

    pub(crate) fn current_time(&self) -> f64 {
        self.observation.current_time
    }

    /// Duration of the embed in seconds. Falls back to the one announced by the
    /// metadata until the media element knows it, `NaN` if neither does.
    pub(crate) fn duration(&self) -> f64 {
        if self.observation.duration.is_finite() {
            self.observation.duration
        } else {
            self.metadata
                .as_ref()
                .and_then(|m| m.duration)
                .unwrap_or(f64::NAN)
        }
    }

    pub(crate) fn paused(&self) -> bool {
        self.observation.paused
    }

    pub(crate) fn set_autoplay(&mut self, value: Option<&str>) {
        self.config.autoplay = AutoplayMode::from_attribute(value);
        self.try_autoplay();
    }

    pub(crate) fn set_loop(&mut self, looping: bool) {
        self.config.looping = looping;
        if self.element_attached {
            self.host.set_loop(looping);
        }
    }

    /// Update the list of controls, `None` to go back to the default one.
    pub(crate) fn set_controls(&mut self, controls: Option<String>) {
        let controls = controls.unwrap_or_else(|| DEFAULT_CONTROLS.to_owned());
        if self.endscreen.replace_saved_controls(controls.clone()) {
            Logger::debug("Session: Endscreen shown, controls applied once hidden");
            return;
        }
        if controls != self.config.controls {
            self.config.controls = controls;
            self.host.set_controls(&self.config.controls);
            self.refresh_render_state();
        }
    }

    /// Update the preferred quality tier, which means rebuilding the source.
    pub(crate) fn set_quality(&mut self, quality: Option<String>) {
        let quality = quality.filter(|q| !q.is_empty());
        if quality == self.config.quality {
            return;
        }
        self.config.quality = quality;
        self.retry_failed_engine();
        self.reconcile();
    }

    pub(crate) fn set_audio_track_mode(&mut self, value: Option<&str>) {
        self.config.audio_track_mode = value.and_then(AudioTrackMode::from_attribute);
        let mode = self
            .config
            .audio_track_mode
            .or_else(|| self.metadata.as_ref().and_then(|m| m.audio_track_mode))
            .unwrap_or_default();
        self.audio_tracks.set_mode(&mut self.host, mode);
        self.refresh_render_state();
    }

    pub(crate) fn set_poster(&mut self, poster: Option<String>) {
        self.config.poster = poster.filter(|p| !p.is_empty());
        self.refresh_render_state();
    }

    pub(crate) fn set_subtitles(&mut self, value: Option<&str>) {
        self.config.subtitles = SubtitleMode::from_attribute(value);
        self.refresh_render_state();
    }

    /// Load the given theme, `None` to go back to the embed's own.
    pub(crate) fn set_theme(&mut self, theme: Option<String>) {
        let theme = theme.filter(|t| !t.is_empty());
        if theme == self.config.theme {
            return;
        }
        self.config.theme = theme;
        let name = self
            .config
            .theme
            .as_deref()
            .or_else(|| self.metadata.as_ref().and_then(|m| m.theme.as_deref()));
        if let Some(name) = name {
            self.host.load_theme(name);
        }
    }

    pub(crate) fn set_access_token(&mut self, token: Option<String>) {
        let token = token.filter(|t| !t.is_empty());
        if token == self.config.access_token {
            return;
        }
        self.engine.set_access_token(token.clone());
        self.config.access_token = token;
        self.sync_channel();
    }

    pub(crate) fn set_collection(&mut self, collection: Option<String>) {
        self.config.collection = collection.filter(|c| !c.is_empty());
    }

    pub(crate) fn set_auto_advance(&mut self, auto_advance: bool) {
        self.config.auto_advance = auto_advance;
    }

    /// Override the embed's endscreen setting, `None` to follow it again.
    pub(crate) fn set_endscreen(&mut self, value: Option<&str>) {
        self.config.endscreen = value.and_then(EndscreenMode::from_attribute);
    }

    /// To call when the user picked an audio track in the menu.
    pub(crate) fn select_audio_track(&mut self, id: &str) {
        if let Some(native_id) = self.audio_tracks.on_user_selection(id) {
            Logger::lazy_info(&|| format!("Session: Switching to audio track {id}"));
            self.engine.switch_audio_track(&mut self.host, native_id);
        }
    }

    pub(crate) fn close_endscreen(&mut self) {
        self.endscreen.close(&mut self.host, &mut self.config.controls);
        self.refresh_render_state();
    }

    /// Report an interaction of the user on an element of the theme.
    pub(crate) fn on_interaction(&mut self, action: String, identifier: String) {
        let position = self.observation.current_time;
        self.host.emit(PlayerEvent::Click {
            action,
            identifier,
            position,
        });
    }

    /// Returns the URL a request from the engine should actually be performed on.
    pub(crate) fn request_url(&self, url: &str) -> String {
        self.engine.request_url(url)
    }

    /// Release everything linked to the current embed. The `Session` can still be
    /// reused afterwards.
    pub(crate) fn destroy(&mut self) {
        Logger::info("Session: Destroying");
        self.stop_current_session();
        self.render_state = None;
    }
}
