use std::{cell::RefCell, rc::Rc};

use crate::{
    channels::ChannelRegistry,
    session::Session,
    source_resolver::PlatformCapabilities,
    utils::logger::LoggerLevel,
    wasm_bindgen, Logger,
};

use super::JsHost;

/// The `Player` is the interface exported to the JavaScript-side, driven by the
/// embedding custom element: its attributes, its public API and the events of
/// everything it contains.
#[wasm_bindgen]
pub struct Player {
    pub(super) session: Session<JsHost>,
}

/// Realtime sockets shared by every `Player` created with it.
#[wasm_bindgen]
pub struct PlayerRegistry {
    inner: Rc<RefCell<ChannelRegistry>>,
}

#[wasm_bindgen]
impl PlayerRegistry {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(ChannelRegistry::new())),
        }
    }
}

impl Default for PlayerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Methods exposed to the JavaScript-side.
///
/// Note that these are not the only methods callable by JavaScript. There are also
/// "event_listeners", which should be called when particular events happen.
#[wasm_bindgen]
impl Player {
    /// Create a new `Player`, which should then be linked to a media element on the
    /// JavaScript-side.
    ///
    /// # Arguments
    ///
    /// * `engine_supported` - Adaptive streaming engines can be created here.
    ///
    /// * `native_hls` - The media element can play HLS natively.
    ///
    /// * `prefers_native_hls` - Native HLS playback should be preferred over the
    ///   engine when both are possible.
    #[wasm_bindgen(constructor)]
    pub fn new(engine_supported: bool, native_hls: bool, prefers_native_hls: bool) -> Self {
        Player {
            session: Session::new(
                JsHost,
                PlatformCapabilities {
                    engine_supported,
                    native_hls,
                    prefers_native_hls,
                },
            ),
        }
    }

    /// Same as the constructor, but realtime sockets are shared with every other
    /// `Player` created from the same `PlayerRegistry`.
    pub fn with_registry(
        registry: &PlayerRegistry,
        engine_supported: bool,
        native_hls: bool,
        prefers_native_hls: bool,
    ) -> Player {
        Player {
            session: Session::with_registry(
                JsHost,
                PlatformCapabilities {
                    engine_supported,
                    native_hls,
                    prefers_native_hls,
                },
                Rc::clone(&registry.inner),
            ),
        }
    }

    pub fn set_log_level(level: LoggerLevel) {
        Logger::set_logger_level(level);
    }

    /// Load the embed with the given identifier, stopping the previous one.
    pub fn set_embed_id(&mut self, embed_id: Option<String>) {
        self.session.set_embed_id(embed_id);
    }

    pub fn embed_id(&self) -> Option<String> {
        self.session.embed_id().map(str::to_owned)
    }

    pub fn play(&mut self) {
        self.session.play();
    }

    pub fn pause(&mut self) {
        self.session.pause();
    }

    pub fn restart(&mut self) {
        self.session.restart();
    }

    pub fn seek(&mut self, position: f64) {
        self.session.seek(position);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.session.set_muted(muted);
    }

    pub fn current_time(&self) -> f64 {
        self.session.current_time()
    }

    pub fn duration(&self) -> f64 {
        self.session.duration()
    }

    pub fn paused(&self) -> bool {
        self.session.paused()
    }

    pub fn set_autoplay(&mut self, value: Option<String>) {
        self.session.set_autoplay(value.as_deref());
    }

    pub fn set_loop(&mut self, looping: bool) {
        self.session.set_loop(looping);
    }

    pub fn set_controls(&mut self, controls: Option<String>) {
        self.session.set_controls(controls);
    }

    pub fn set_quality(&mut self, quality: Option<String>) {
        self.session.set_quality(quality);
    }

    pub fn set_audio_track_mode(&mut self, value: Option<String>) {
        self.session.set_audio_track_mode(value.as_deref());
    }

    pub fn set_poster(&mut self, poster: Option<String>) {
        self.session.set_poster(poster);
    }

    pub fn set_subtitles(&mut self, value: Option<String>) {
        self.session.set_subtitles(value.as_deref());
    }

    pub fn set_theme(&mut self, theme: Option<String>) {
        self.session.set_theme(theme);
    }

    pub fn set_access_token(&mut self, token: Option<String>) {
        self.session.set_access_token(token);
    }

    pub fn set_collection(&mut self, collection: Option<String>) {
        self.session.set_collection(collection);
    }

    pub fn set_auto_advance(&mut self, auto_advance: bool) {
        self.session.set_auto_advance(auto_advance);
    }

    pub fn set_endscreen(&mut self, value: Option<String>) {
        self.session.set_endscreen(value.as_deref());
    }

    pub fn select_audio_track(&mut self, id: &str) {
        self.session.select_audio_track(id);
    }

    pub fn close_endscreen(&mut self) {
        self.session.close_endscreen();
    }

    /// Returns the URL a request from an engine should actually be performed on.
    pub fn request_url(&self, url: &str) -> String {
        self.session.request_url(url)
    }

    /// Release every resource linked to the current embed.
    pub fn destroy(&mut self) {
        self.session.destroy();
    }
}
