use std::{cell::RefCell, rc::Rc};

use crate::{
    audio_tracks::AudioTrackMenuBridge,
    autoplay::AutoplayPolicyEngine,
    bindings::{RequestId, SocketId},
    channels::ChannelRegistry,
    command_queue::CommandQueue,
    endscreen::EndscreenController,
    engine::{EngineError, PlaybackEngineAdapter},
    host::Host,
    loading::{LoadingStateTracker, NativeReadiness},
    metadata::EmbedMetadata,
    source_resolver::{PlatformCapabilities, SourceDecision},
};

mod api;
mod configuration;
mod core;
mod event_listeners;
mod render;


pub(crate) use configuration::PlayerConfiguration;
pub(crate) use render::{ReadyView, RenderState};

/// The `Session` reconciles everything known about the current embed (its metadata,
/// the media element, the engine, the viewport, the configuration...) into actions on
/// its `Host` and a single `RenderState`.
///
/// A new session starts each time the embed identifier changes. Anything that was
/// scheduled for the previous one is cancelled at that point.
pub(crate) struct Session<H: Host> {
    host: H,

    /// What the current platform is able to play.
    capabilities: PlatformCapabilities,

    config: PlayerConfiguration,

    /// Identifier of the embed currently loaded, `None` if none is.
    embed_id: Option<String>,

    /// Last metadata fetched for `embed_id`.
    metadata: Option<EmbedMetadata>,

    fetch: FetchState,

    /// Set once a media element exists and can be acted upon.
    element_attached: bool,

    /// Source currently applied to the media element, `None` if none has been yet.
    applied_source: Option<SourceDecision>,

    engine: PlaybackEngineAdapter,

    /// Set when the engine could not be created or failed. It is then not retried
    /// until the source is rebuilt.
    engine_error: Option<EngineError>,

    loading: LoadingStateTracker,
    autoplay: AutoplayPolicyEngine,

    /// Playback commands awaiting the media element.
    commands: CommandQueue,

    audio_tracks: AudioTrackMenuBridge,
    endscreen: EndscreenController,

    /// Realtime channels shared between players, if any.
    registry: Option<Rc<RefCell<ChannelRegistry>>>,

    /// Topic currently joined to be notified of processing progress.
    joined_channel: Option<JoinedChannel>,

    /// Last known state of the media element.
    observation: PlaybackObservation,

    /// Last state given to the theme.
    render_state: Option<RenderState>,

    /// Set once the `Playable` event has been sent for the current session.
    playable_announced: bool,

    /// Set while the metrics collaborator is monitoring playback.
    monitoring: bool,
}

/// State of the metadata request for the current embed.
#[derive(Clone, Debug, PartialEq)]
enum FetchState {
    Idle,
    /// A request is pending. `refresh` is set if metadata was already known.
    Pending { request_id: RequestId, refresh: bool },
    /// The first request failed, with the given message.
    Failed(String),
}

#[derive(Clone, Debug, PartialEq)]
struct JoinedChannel {
    token: String,
    topic: String,
    socket: SocketId,
}

/// Snapshot of the media element's state, communicated alongside each media event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct PlaybackObservation {
    pub(crate) current_time: f64,
    /// `NaN` until known.
    pub(crate) duration: f64,
    pub(crate) ready_state: u8,
    pub(crate) paused: bool,
}

impl Default for PlaybackObservation {
    fn default() -> Self {
        Self {
            current_time: 0.,
            duration: f64::NAN,
            ready_state: 0,
            paused: true,
        }
    }
}

impl PlaybackObservation {
    pub(crate) fn readiness(&self) -> NativeReadiness {
        NativeReadiness {
            duration: self.duration,
            ready_state: self.ready_state,
        }
    }
}

impl<H: Host> Session<H> {
    pub(crate) fn new(host: H, capabilities: PlatformCapabilities) -> Self {
        Self {
            host,
            capabilities,
            config: PlayerConfiguration::default(),
            embed_id: None,
            metadata: None,
            fetch: FetchState::Idle,
            element_attached: false,
            applied_source: None,
            engine: PlaybackEngineAdapter::new(),
            engine_error: None,
            loading: LoadingStateTracker::new(),
            autoplay: AutoplayPolicyEngine::new(),
            commands: CommandQueue::new(),
            audio_tracks: AudioTrackMenuBridge::new(),
            endscreen: EndscreenController::new(),
            registry: None,
            joined_channel: None,
            observation: PlaybackObservation::default(),
            render_state: None,
            playable_announced: false,
            monitoring: false,
        }
    }

    /// Share realtime sockets with every other session linked to the same registry.
    pub(crate) fn with_registry(
        host: H,
        capabilities: PlatformCapabilities,
        registry: Rc<RefCell<ChannelRegistry>>,
    ) -> Self {
        let mut session = Self::new(host, capabilities);
        session.registry = Some(registry);
        session
    }
}

impl<H: Host> Drop for Session<H> {
    fn drop(&mut self) {
        self.stop_current_session();
    }
}
