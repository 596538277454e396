use serde::Serialize;

use super::configuration::SubtitleMode;
use crate::{
    loading::{LoadingPhase, ProcessingOverlay},
    metadata::EmbedMetadata,
};

const UNAVAILABLE_MESSAGE: &str = "This video cannot be played right now";

/// Everything the theme needs to render the player.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub(crate) enum RenderState {
    /// Metadata is being fetched for the first time.
    Pending,
    /// Metadata could not be fetched.
    Error { message: String },
    /// The video is not ready upstream yet.
    Processing { message: String, spinner: bool },
    /// The video is ready but the playback engine failed.
    Unavailable { message: String },
    Ready(ReadyView),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct ReadyView {
    pub(crate) poster: Option<String>,
    pub(crate) title: Option<String>,
    pub(crate) controls: String,
    pub(crate) start_screen: bool,
    pub(crate) endscreen: bool,
    pub(crate) audio_menu: bool,
    pub(crate) subtitles: String,
}

pub(crate) struct RenderInputs<'a> {
    pub(crate) fetch_error: Option<&'a str>,
    pub(crate) metadata: Option<&'a EmbedMetadata>,
    pub(crate) phase: LoadingPhase,
    pub(crate) engine_failed: bool,
    pub(crate) poster_override: Option<&'a str>,
    pub(crate) controls: &'a str,
    pub(crate) start_screen: bool,
    pub(crate) endscreen: bool,
    pub(crate) audio_menu: bool,
    pub(crate) subtitles: &'a SubtitleMode,
}

/// Derive what should be rendered from the current state of a session.
pub(crate) fn derive_render_state(inputs: &RenderInputs) -> RenderState {
    if let Some(message) = inputs.fetch_error {
        return RenderState::Error {
            message: message.to_owned(),
        };
    }
    let metadata = match inputs.metadata {
        Some(metadata) => metadata,
        None => return RenderState::Pending,
    };
    match inputs.phase {
        LoadingPhase::Unknown => RenderState::Pending,
        LoadingPhase::Processing => {
            let overlay = ProcessingOverlay::for_status(metadata.status);
            RenderState::Processing {
                message: overlay.message.to_owned(),
                spinner: overlay.spinner,
            }
        }
        LoadingPhase::Ready if inputs.engine_failed => RenderState::Unavailable {
            message: UNAVAILABLE_MESSAGE.to_owned(),
        },
        LoadingPhase::Ready => RenderState::Ready(ReadyView {
            poster: inputs
                .poster_override
                .map(str::to_owned)
                .or_else(|| metadata.poster_url.clone()),
            title: metadata.title.clone(),
            controls: inputs.controls.to_owned(),
            start_screen: inputs.start_screen,
            endscreen: inputs.endscreen,
            audio_menu: inputs.audio_menu,
            subtitles: inputs.subtitles.as_str().to_owned(),
        }),
    }
}
