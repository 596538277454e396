use wasm_bindgen::prelude::*;

mod audio_tracks;
mod autoplay;
mod bindings;
mod channels;
mod command_queue;
mod endscreen;
mod engine;
mod host;
mod loading;
mod metadata;
mod session;
mod source_resolver;
mod utils;

pub use bindings::{JsAudioTrackList, MediaEvent, MediaObservation, Player, PlayerRegistry};
pub use utils::logger::Logger;
