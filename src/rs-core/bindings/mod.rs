mod event_listeners;
pub(crate) mod formatters;
mod js_functions;
mod js_host;
mod player;

pub use event_listeners::{JsAudioTrackList, MediaEvent, MediaObservation};
pub use js_functions::*;
pub(crate) use js_host::JsHost;
pub use player::{Player, PlayerRegistry};
