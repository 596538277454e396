use std::{cell::RefCell, rc::Rc};

use super::{
    CollectionSource, EngineBackend, EventSink, MediaController, MetadataSource,
    MetricsCollector, PlayerEvent, RealtimeTransport, Scheduler, ThemeBridge,
};
use crate::{
    audio_tracks::AudioTrackSet,
    bindings::{EngineErrorCode, EngineHandle, FrameId, RequestId, SocketId, TimerId, TimerReason},
    engine::{EngineConfig, EngineError},
    session::RenderState,
};

/// Every call performed on a `MockHost`, in order.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum MockCall {
    Play,
    Pause,
    SetMuted(bool),
    Seek(f64),
    SetSource(Option<String>),
    SetLoop(bool),
    SetControls(String),
    CreateEngine(EngineHandle, EngineConfig),
    LoadSource(EngineHandle, String, u32),
    DestroyEngine(EngineHandle),
    SetAudioTrack(EngineHandle, u32),
    StartTimer(TimerId, f64, TimerReason),
    ClearTimer(TimerId),
    RequestFrame(FrameId),
    CancelFrame(FrameId),
    FetchMetadata(RequestId, String),
    Monitor(String),
    Demonitor,
    LoadTheme(String),
    Render(RenderState),
    UpdateAudioMenu(AudioTrackSet, bool),
    MaterializeEndscreen,
    Emit(PlayerEvent),
    OpenSocket(SocketId, String),
    CloseSocket(SocketId),
    JoinTopic(SocketId, String),
    LeaveTopic(SocketId, String),
}

#[derive(Default)]
struct MockState {
    calls: Vec<MockCall>,
    last_id: u32,
    menu_mounted: bool,
    fail_engine_creation: bool,
    fail_engine_loading: bool,
    fail_engine_destruction: bool,
    collections: Vec<(String, Vec<String>)>,
}

/// Recording implementation of every host interface.
///
/// Clones share the same state, which allows to keep inspecting calls after the host
/// has been moved into a `Session`.
#[derive(Clone, Default)]
pub(crate) struct MockHost {
    state: Rc<RefCell<MockState>>,
}

impl MockHost {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn calls(&self) -> Vec<MockCall> {
        self.state.borrow().calls.clone()
    }

    pub(crate) fn count(&self, pred: impl Fn(&MockCall) -> bool) -> usize {
        self.state.borrow().calls.iter().filter(|c| pred(c)).count()
    }

    /// Returns the last call matching `pred`, if one.
    pub(crate) fn last(&self, pred: impl Fn(&MockCall) -> bool) -> Option<MockCall> {
        self.state
            .borrow()
            .calls
            .iter()
            .rev()
            .find(|c| pred(c))
            .cloned()
    }

    pub(crate) fn last_render(&self) -> Option<RenderState> {
        match self.last(|c| matches!(c, MockCall::Render(_))) {
            Some(MockCall::Render(state)) => Some(state),
            _ => None,
        }
    }

    pub(crate) fn set_menu_mounted(&self, mounted: bool) {
        self.state.borrow_mut().menu_mounted = mounted;
    }

    pub(crate) fn set_fail_engine_creation(&self, fail: bool) {
        self.state.borrow_mut().fail_engine_creation = fail;
    }

    pub(crate) fn set_fail_engine_loading(&self, fail: bool) {
        self.state.borrow_mut().fail_engine_loading = fail;
    }

    pub(crate) fn set_fail_engine_destruction(&self, fail: bool) {
        self.state.borrow_mut().fail_engine_destruction = fail;
    }

    pub(crate) fn add_collection(&self, name: &str, items: &[&str]) {
        self.state.borrow_mut().collections.push((
            name.to_owned(),
            items.iter().map(|i| (*i).to_owned()).collect(),
        ));
    }

    fn record(&self, call: MockCall) {
        self.state.borrow_mut().calls.push(call);
    }

    fn next_id(&self) -> u32 {
        let mut state = self.state.borrow_mut();
        state.last_id += 1;
        state.last_id
    }

    fn collection_items(&self, name: &str) -> Option<Vec<String>> {
        self.state
            .borrow()
            .collections
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, items)| items.clone())
    }
}

impl MediaController for MockHost {
    fn play(&mut self) {
        self.record(MockCall::Play);
    }

    fn pause(&mut self) {
        self.record(MockCall::Pause);
    }

    fn set_muted(&mut self, muted: bool) {
        self.record(MockCall::SetMuted(muted));
    }

    fn seek(&mut self, position: f64) {
        self.record(MockCall::Seek(position));
    }

    fn set_source(&mut self, url: Option<&str>) {
        self.record(MockCall::SetSource(url.map(str::to_owned)));
    }

    fn set_loop(&mut self, looping: bool) {
        self.record(MockCall::SetLoop(looping));
    }

    fn set_controls(&mut self, controls: &str) {
        self.record(MockCall::SetControls(controls.to_owned()));
    }
}

impl EngineBackend for MockHost {
    fn create_engine(&mut self, config: &EngineConfig) -> Result<EngineHandle, EngineError> {
        if self.state.borrow().fail_engine_creation {
            return Err(EngineError::Creation {
                code: EngineErrorCode::NotSupported,
                message: "mock".to_owned(),
            });
        }
        let id = self.next_id();
        self.record(MockCall::CreateEngine(id, config.clone()));
        Ok(id)
    }

    fn load_source(
        &mut self,
        engine: EngineHandle,
        url: &str,
        start_level: u32,
    ) -> Result<(), EngineError> {
        self.record(MockCall::LoadSource(engine, url.to_owned(), start_level));
        if self.state.borrow().fail_engine_loading {
            Err(EngineError::Loading {
                code: EngineErrorCode::EngineError,
                message: "mock".to_owned(),
            })
        } else {
            Ok(())
        }
    }

    fn destroy_engine(&mut self, engine: EngineHandle) -> Result<(), EngineError> {
        self.record(MockCall::DestroyEngine(engine));
        if self.state.borrow().fail_engine_destruction {
            Err(EngineError::Destruction {
                code: EngineErrorCode::EngineNotFound,
                message: "mock".to_owned(),
            })
        } else {
            Ok(())
        }
    }

    fn set_audio_track(&mut self, engine: EngineHandle, native_id: u32) {
        self.record(MockCall::SetAudioTrack(engine, native_id));
    }
}

impl Scheduler for MockHost {
    fn start_timer(&mut self, duration_ms: f64, reason: TimerReason) -> TimerId {
        let id = self.next_id() as f64;
        self.record(MockCall::StartTimer(id, duration_ms, reason));
        id
    }

    fn clear_timer(&mut self, id: TimerId) {
        self.record(MockCall::ClearTimer(id));
    }

    fn request_animation_frame(&mut self) -> FrameId {
        let id = self.next_id() as f64;
        self.record(MockCall::RequestFrame(id));
        id
    }

    fn cancel_animation_frame(&mut self, id: FrameId) {
        self.record(MockCall::CancelFrame(id));
    }
}

impl MetadataSource for MockHost {
    fn fetch_metadata(&mut self, embed_id: &str) -> RequestId {
        let id = self.next_id();
        self.record(MockCall::FetchMetadata(id, embed_id.to_owned()));
        id
    }
}

impl MetricsCollector for MockHost {
    fn monitor(&mut self, source: &str) {
        self.record(MockCall::Monitor(source.to_owned()));
    }

    fn demonitor(&mut self) {
        self.record(MockCall::Demonitor);
    }
}

impl ThemeBridge for MockHost {
    fn load_theme(&mut self, name: &str) {
        self.record(MockCall::LoadTheme(name.to_owned()));
    }

    fn render(&mut self, state: &RenderState) {
        self.record(MockCall::Render(state.clone()));
    }

    fn is_audio_menu_mounted(&self) -> bool {
        self.state.borrow().menu_mounted
    }

    fn update_audio_menu(&mut self, tracks: &AudioTrackSet, visible: bool) {
        self.record(MockCall::UpdateAudioMenu(tracks.clone(), visible));
    }

    fn materialize_endscreen(&mut self) {
        self.record(MockCall::MaterializeEndscreen);
    }
}

impl CollectionSource for MockHost {
    fn contains_item(&self, collection: &str, item: &str) -> bool {
        self.collection_items(collection)
            .map(|items| items.iter().any(|i| i == item))
            .unwrap_or(false)
    }

    fn successor_of(&self, collection: &str, item: &str) -> Option<String> {
        let items = self.collection_items(collection)?;
        let idx = items.iter().position(|i| i == item)?;
        items.get(idx + 1).cloned()
    }
}

impl EventSink for MockHost {
    fn emit(&mut self, event: PlayerEvent) {
        self.record(MockCall::Emit(event));
    }
}

impl RealtimeTransport for MockHost {
    fn open_socket(&mut self, token: &str) -> SocketId {
        let id = self.next_id();
        self.record(MockCall::OpenSocket(id, token.to_owned()));
        id
    }

    fn close_socket(&mut self, socket: SocketId) {
        self.record(MockCall::CloseSocket(socket));
    }

    fn join_topic(&mut self, socket: SocketId, topic: &str) {
        self.record(MockCall::JoinTopic(socket, topic.to_owned()));
    }

    fn leave_topic(&mut self, socket: SocketId, topic: &str) {
        self.record(MockCall::LeaveTopic(socket, topic.to_owned()));
    }
}
