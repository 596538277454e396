use crate::{audio_tracks::AudioTrackMode, autoplay::AutoplayMode, metadata::EndscreenMode};

/// Controls displayed by default by the theme.
pub(crate) const DEFAULT_CONTROLS: &str =
    "play,progress,current-time,mute,volume,captions,settings,pip,fullscreen";

/// Which subtitles should be displayed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum SubtitleMode {
    #[default]
    Off,
    /// Pick a track matching the user's language, if one.
    Auto,
    Language(String),
}

impl SubtitleMode {
    pub(crate) fn from_attribute(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") | Some("off") | Some("false") => SubtitleMode::Off,
            Some("auto") | Some("on") | Some("true") => SubtitleMode::Auto,
            Some(lang) => SubtitleMode::Language(lang.to_owned()),
        }
    }

    pub(crate) fn as_str(&self) -> &str {
        match self {
            SubtitleMode::Off => "off",
            SubtitleMode::Auto => "auto",
            SubtitleMode::Language(lang) => lang,
        }
    }
}

/// Configuration of a `Session`, updated through the `Player`'s setters.
pub(crate) struct PlayerConfiguration {
    pub(crate) autoplay: AutoplayMode,
    pub(crate) looping: bool,
    pub(crate) muted: bool,

    /// Controls currently applied. Swapped with `"none"` while the endscreen is shown.
    pub(crate) controls: String,

    /// Name of the preferred quality tier, if one.
    pub(crate) quality: Option<String>,

    /// `None` to follow the embed's own setting.
    pub(crate) audio_track_mode: Option<AudioTrackMode>,

    /// Poster overriding the embed's one.
    pub(crate) poster: Option<String>,

    pub(crate) subtitles: SubtitleMode,

    /// `None` to use the embed's own theme.
    pub(crate) theme: Option<String>,

    /// Token added to engine requests and used to authenticate realtime channels.
    pub(crate) access_token: Option<String>,

    /// Collection the embed is part of, for auto-advance.
    pub(crate) collection: Option<String>,

    pub(crate) auto_advance: bool,

    /// `None` to follow the embed's own setting.
    pub(crate) endscreen: Option<EndscreenMode>,
}

impl Default for PlayerConfiguration {
    fn default() -> Self {
        Self {
            autoplay: AutoplayMode::Off,
            looping: false,
            muted: false,
            controls: DEFAULT_CONTROLS.to_owned(),
            quality: None,
            audio_track_mode: None,
            poster: None,
            subtitles: SubtitleMode::Off,
            theme: None,
            access_token: None,
            collection: None,
            auto_advance: false,
            endscreen: None,
        }
    }
}
