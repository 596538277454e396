use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    bindings::FrameId,
    host::{Scheduler, ThemeBridge},
    Logger,
};

/// When the audio-track menu should be shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum AudioTrackMode {
    /// Only when there is a choice to make, i.e. more than one track.
    #[default]
    Auto,
    On,
    Off,
}

impl AudioTrackMode {
    pub(crate) fn from_attribute(value: &str) -> Option<Self> {
        match value.trim() {
            "auto" => Some(AudioTrackMode::Auto),
            "on" | "true" => Some(AudioTrackMode::On),
            "off" | "false" => Some(AudioTrackMode::Off),
            _ => None,
        }
    }

    fn shows_menu(self, track_count: usize) -> bool {
        match self {
            AudioTrackMode::Auto => track_count > 1,
            AudioTrackMode::On => track_count > 0,
            AudioTrackMode::Off => false,
        }
    }
}

/// An audio track, as reported by the adaptive streaming engine.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct EngineAudioTrack {
    pub(crate) native_id: u32,
    pub(crate) name: Option<String>,
    pub(crate) language: Option<String>,
    pub(crate) is_default: bool,
}

/// An audio track, as presented in the menu.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct AudioTrack {
    pub(crate) id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) language: Option<String>,
    pub(crate) label: String,
    pub(crate) enabled: bool,
}

/// Ordered list of audio tracks in which exactly one track is enabled, unless empty.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub(crate) struct AudioTrackSet {
    tracks: Vec<AudioTrack>,
}

impl AudioTrackSet {
    /// Build the set presented outward from the engine's tracks.
    ///
    /// The enabled track is the one whose id is `active`, else the first one flagged
    /// as default, else the first one.
    pub(crate) fn from_engine(tracks: &[EngineAudioTrack], active: Option<u32>) -> Self {
        let enabled_idx = active
            .and_then(|id| tracks.iter().position(|t| t.native_id == id))
            .or_else(|| tracks.iter().position(|t| t.is_default))
            .unwrap_or(0);
        let tracks = tracks
            .iter()
            .enumerate()
            .map(|(idx, track)| AudioTrack {
                id: track.native_id.to_string(),
                language: track.language.clone(),
                label: track_label(track, idx),
                enabled: idx == enabled_idx,
            })
            .collect();
        Self { tracks }
    }

    pub(crate) fn len(&self) -> usize {
        self.tracks.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &AudioTrack> {
        self.tracks.iter()
    }

    pub(crate) fn enabled(&self) -> Option<&AudioTrack> {
        self.tracks.iter().find(|t| t.enabled)
    }
}

fn track_label(track: &EngineAudioTrack, idx: usize) -> String {
    match (&track.name, &track.language) {
        (Some(name), _) if !name.is_empty() => name.clone(),
        (_, Some(lang)) if !lang.is_empty() => lang.clone(),
        _ => format!("Track {}", idx + 1),
    }
}

/// Keeps the theme's audio-track menu in sync with the engine's audio tracks.
///
/// The menu may not be mounted yet when an update happens (the theme being still
/// loading). In that case, a single retry is scheduled on the next animation frame and,
/// if the menu is still missing then, the update waits for the theme to signal that the
/// menu appeared.
pub(crate) struct AudioTrackMenuBridge {
    /// Last track list reported by the engine.
    engine_tracks: Vec<EngineAudioTrack>,

    /// Native id of the track the engine reports as active, if known.
    active: Option<u32>,

    tracks: AudioTrackSet,

    /// Outward string id to the engine's id.
    native_ids: HashMap<String, u32>,

    mode: AudioTrackMode,

    /// `true` if the menu does not reflect `tracks` yet.
    dirty: bool,

    pending_frame: Option<FrameId>,
}

impl AudioTrackMenuBridge {
    pub(crate) fn new() -> Self {
        Self {
            engine_tracks: vec![],
            active: None,
            tracks: AudioTrackSet::default(),
            native_ids: HashMap::new(),
            mode: AudioTrackMode::Auto,
            dirty: false,
            pending_frame: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn tracks(&self) -> &AudioTrackSet {
        &self.tracks
    }

    pub(crate) fn is_menu_visible(&self) -> bool {
        self.mode.shows_menu(self.tracks.len())
    }

    pub(crate) fn set_mode<H: ThemeBridge + Scheduler>(&mut self, host: &mut H, mode: AudioTrackMode) {
        if self.mode != mode {
            self.mode = mode;
            self.dirty = true;
            self.sync(host);
        }
    }

    /// To call when the engine reported a new list of audio tracks.
    pub(crate) fn on_track_list_changed<H: ThemeBridge + Scheduler>(
        &mut self,
        host: &mut H,
        tracks: Vec<EngineAudioTrack>,
        active: Option<u32>,
    ) {
        self.native_ids = tracks
            .iter()
            .map(|t| (t.native_id.to_string(), t.native_id))
            .collect();
        self.engine_tracks = tracks;
        self.active = active;
        self.rebuild(host);
    }

    /// To call when the engine switched to another audio track.
    pub(crate) fn on_active_track_changed<H: ThemeBridge + Scheduler>(
        &mut self,
        host: &mut H,
        native_id: u32,
    ) {
        self.active = Some(native_id);
        self.rebuild(host);
    }

    /// To call when the user picked a track in the menu.
    ///
    /// Returns the native id of the track the engine should switch to, or `None` if
    /// nothing should be done (unknown track or track already active).
    pub(crate) fn on_user_selection(&self, id: &str) -> Option<u32> {
        let native_id = match self.native_ids.get(id) {
            Some(native_id) => *native_id,
            None => {
                Logger::lazy_warn(&|| format!("AudioTracks: Unknown track selected: {id}"));
                return None;
            }
        };
        let current = self.tracks.enabled().map(|t| t.id.as_str());
        if current == Some(id) {
            None
        } else {
            Some(native_id)
        }
    }

    /// To call once the theme finished rendering or its render root changed, which may
    /// mean the menu has just been mounted.
    pub(crate) fn on_menu_ready<H: ThemeBridge + Scheduler>(&mut self, host: &mut H) {
        if self.dirty && host.is_audio_menu_mounted() {
            if let Some(id) = self.pending_frame.take() {
                host.cancel_animation_frame(id);
            }
            self.push(host);
        }
    }

    /// To call once a newly loaded theme finished rendering. Its menu starts empty, so
    /// the current tracks are pushed again as soon as it is mounted.
    pub(crate) fn on_theme_changed<H: ThemeBridge + Scheduler>(&mut self, host: &mut H) {
        self.dirty = true;
        self.on_menu_ready(host);
    }

    /// To call when an animation frame requested through the `Scheduler` is reached.
    pub(crate) fn on_animation_frame<H: ThemeBridge + Scheduler>(&mut self, host: &mut H, id: FrameId) {
        if self.pending_frame != Some(id) {
            return;
        }
        self.pending_frame = None;
        if host.is_audio_menu_mounted() {
            self.push(host);
        } else {
            Logger::debug("AudioTracks: Menu still not mounted, awaiting theme");
        }
    }

    /// Forget every track and cancel pending work, e.g. when the engine is destroyed.
    ///
    /// A mounted menu still listing tracks is emptied.
    pub(crate) fn reset<H: ThemeBridge + Scheduler>(&mut self, host: &mut H) {
        if let Some(id) = self.pending_frame.take() {
            host.cancel_animation_frame(id);
        }
        let had_tracks = !self.tracks.is_empty();
        self.engine_tracks.clear();
        self.native_ids.clear();
        self.active = None;
        self.tracks = AudioTrackSet::default();
        self.dirty = had_tracks;
        if had_tracks && host.is_audio_menu_mounted() {
            self.push(host);
        }
    }

    fn rebuild<H: ThemeBridge + Scheduler>(&mut self, host: &mut H) {
        self.tracks = AudioTrackSet::from_engine(&self.engine_tracks, self.active);
        self.dirty = true;
        self.sync(host);
    }

    fn sync<H: ThemeBridge + Scheduler>(&mut self, host: &mut H) {
        if host.is_audio_menu_mounted() {
            self.push(host);
        } else if self.pending_frame.is_none() {
            self.pending_frame = Some(host.request_animation_frame());
        }
    }

    fn push(&mut self, theme: &mut impl ThemeBridge) {
        theme.update_audio_menu(&self.tracks, self.is_menu_visible());
        self.dirty = false;
    }
}
