use crate::{audio_tracks::EngineAudioTrack, session::PlaybackObservation, wasm_bindgen};

use super::{
    player::Player, EngineHandle, FrameId, RequestId, TimerId, TimerReason,
};

/// Methods triggered on JavaScript events by the JavaScript code.
///
/// Those should just be bindings converting to the right types, the actual logic
/// living in the `Session`.
#[wasm_bindgen]
impl Player {
    /// The JS code should call this method each time a request started with
    /// `jsFetchMetadata` finished with success.
    ///
    /// # Arguments
    ///
    /// * `request_id` - The identifier returned by `jsFetchMetadata` when the request
    ///   was started. Responses to outdated requests are ignored.
    ///
    /// * `data` - The raw JSON document received.
    pub fn on_metadata_fetched(&mut self, request_id: RequestId, data: &str) {
        self.session.on_metadata_fetched(request_id, data);
    }

    /// The JS code should call this method each time a request started with
    /// `jsFetchMetadata` failed.
    ///
    /// # Arguments
    ///
    /// * `request_id` - The identifier returned by `jsFetchMetadata` when the request
    ///   was started.
    ///
    /// * `message` - Description of the failure.
    pub fn on_metadata_fetch_failed(&mut self, request_id: RequestId, message: String) {
        self.session.on_metadata_fetch_failed(request_id, message);
    }

    /// The JS code should call this method once the media element has been created
    /// and attached to the player.
    pub fn on_media_element_attached(&mut self) {
        self.session.on_media_element_attached();
    }

    /// The JS code should call this method when the media element has been removed.
    pub fn on_media_element_detached(&mut self) {
        self.session.on_media_element_detached();
    }

    /// The JS code should call this method on each listened media element event.
    ///
    /// # Arguments
    ///
    /// * `event` - The event that was just received.
    ///
    /// * `observation` - State of the media element when that event was received.
    pub fn on_media_event(&mut self, event: MediaEvent, observation: MediaObservation) {
        self.session.on_media_event(event, observation.into());
    }

    /// The JS code should call this method each time the player starts or stops
    /// intersecting with the viewport.
    pub fn on_intersection_change(&mut self, intersecting: bool) {
        self.session.on_intersection_change(intersecting);
    }

    /// The JS code should call this method each time a timer started with the `jsTimer`
    /// function finished.
    ///
    /// # Arguments
    ///
    /// * `id` - The `TimerId` returned by `jsTimer` when the timer was started.
    ///
    /// * `reason` - The `TimerReason` given by the Rust code when that timer
    ///   was started.
    pub fn on_timer_ended(&mut self, id: TimerId, reason: TimerReason) {
        self.session.on_timer_ended(id, reason);
    }

    /// The JS code should call this method when an animation frame requested through
    /// `jsRequestAnimationFrame` is reached.
    pub fn on_animation_frame(&mut self, id: FrameId) {
        self.session.on_animation_frame(id);
    }

    /// The JS code should call this method once a theme loaded through `jsLoadTheme`
    /// has been rendered.
    pub fn on_theme_ready(&mut self) {
        self.session.on_theme_ready();
    }

    /// The JS code should call this method when elements were added to or removed
    /// from the theme's render root.
    pub fn on_audio_menu_mutation(&mut self) {
        self.session.on_audio_menu_mutation();
    }

    /// The JS code should call this method when an engine loaded or updated its list of
    /// audio tracks.
    ///
    /// # Arguments
    ///
    /// * `engine` - The `EngineHandle` of the engine reporting those tracks.
    ///
    /// * `tracks` - All of the engine's audio tracks, in order.
    ///
    /// * `active` - Native id of the track currently played, if known.
    pub fn on_engine_audio_tracks(
        &mut self,
        engine: EngineHandle,
        tracks: JsAudioTrackList,
        active: Option<u32>,
    ) {
        self.session
            .on_engine_audio_tracks(engine, tracks.tracks, active);
    }

    /// The JS code should call this method when an engine switched audio track.
    pub fn on_engine_audio_track_switched(&mut self, engine: EngineHandle, native_id: u32) {
        self.session
            .on_engine_audio_track_switched(engine, native_id);
    }

    /// The JS code should call this method when an engine encountered a fatal error.
    pub fn on_engine_fatal_error(&mut self, engine: EngineHandle, message: String) {
        self.session.on_engine_fatal_error(engine, message);
    }

    /// The JS code should call this method when a status is pushed on a topic joined
    /// through `jsJoinTopic`.
    pub fn on_status_push(&mut self, topic: &str, status: &str) {
        self.session.on_status_push(topic, status);
    }

    /// The JS code should call this method when the user interacted with an element of
    /// the theme (e.g. a click on an endscreen item).
    pub fn on_interaction(&mut self, action: String, identifier: String) {
        self.session.on_interaction(action, identifier);
    }
}

/// Events of the media element listened to by the JavaScript code.
#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaEvent {
    LoadStart,
    LoadedMetadata,
    DurationChange,
    LoadedData,
    CanPlay,
    CanPlayThrough,
    Play,
    Playing,
    Pause,
    Waiting,
    Stalled,
    Seeking,
    Seeked,
    TimeUpdate,
    Ended,
    Emptied,
    Error,
    VolumeChange,
    RateChange,
}

impl MediaEvent {
    /// Name of the corresponding DOM event.
    pub(crate) fn name(self) -> &'static str {
        match self {
            MediaEvent::LoadStart => "loadstart",
            MediaEvent::LoadedMetadata => "loadedmetadata",
            MediaEvent::DurationChange => "durationchange",
            MediaEvent::LoadedData => "loadeddata",
            MediaEvent::CanPlay => "canplay",
            MediaEvent::CanPlayThrough => "canplaythrough",
            MediaEvent::Play => "play",
            MediaEvent::Playing => "playing",
            MediaEvent::Pause => "pause",
            MediaEvent::Waiting => "waiting",
            MediaEvent::Stalled => "stalled",
            MediaEvent::Seeking => "seeking",
            MediaEvent::Seeked => "seeked",
            MediaEvent::TimeUpdate => "timeupdate",
            MediaEvent::Ended => "ended",
            MediaEvent::Emptied => "emptied",
            MediaEvent::Error => "error",
            MediaEvent::VolumeChange => "volumechange",
            MediaEvent::RateChange => "ratechange",
        }
    }

    /// Returns `true` if this event may change whether the video is still loading.
    pub(crate) fn affects_loading(self) -> bool {
        matches!(
            self,
            MediaEvent::LoadStart
                | MediaEvent::LoadedMetadata
                | MediaEvent::DurationChange
                | MediaEvent::LoadedData
                | MediaEvent::CanPlay
                | MediaEvent::Waiting
                | MediaEvent::Stalled
                | MediaEvent::Playing
                | MediaEvent::Emptied
                | MediaEvent::Error
        )
    }
}

/// State of the media element at the time an event was received.
#[wasm_bindgen]
#[derive(Clone, Copy, Debug)]
pub struct MediaObservation {
    current_time: f64,
    duration: f64,
    ready_state: u8,
    paused: bool,
}

#[wasm_bindgen]
impl MediaObservation {
    #[wasm_bindgen(constructor)]
    pub fn new(current_time: f64, duration: f64, ready_state: u8, paused: bool) -> Self {
        Self {
            current_time,
            duration,
            ready_state,
            paused,
        }
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn ready_state(&self) -> u8 {
        self.ready_state
    }

    pub fn paused(&self) -> bool {
        self.paused
    }
}

impl From<MediaObservation> for PlaybackObservation {
    fn from(observation: MediaObservation) -> Self {
        PlaybackObservation {
            current_time: observation.current_time,
            duration: observation.duration,
            ready_state: observation.ready_state,
            paused: observation.paused,
        }
    }
}

/// List of audio tracks built by the JavaScript code from an engine's tracks.
#[wasm_bindgen]
pub struct JsAudioTrackList {
    tracks: Vec<EngineAudioTrack>,
}

#[wasm_bindgen]
impl JsAudioTrackList {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self { tracks: vec![] }
    }

    pub fn add_track(
        &mut self,
        native_id: u32,
        name: Option<String>,
        language: Option<String>,
        is_default: bool,
    ) {
        self.tracks.push(EngineAudioTrack {
            native_id,
            name,
            language,
            is_default,
        });
    }
}

impl Default for JsAudioTrackList {
    fn default() -> Self {
        Self::new()
    }
}
