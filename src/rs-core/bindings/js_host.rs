use crate::{
    audio_tracks::AudioTrackSet,
    engine::{EngineConfig, EngineError},
    host::{
        CollectionSource, EngineBackend, EventSink, MediaController, MetadataSource,
        MetricsCollector, PlayerEvent, RealtimeTransport, Scheduler, ThemeBridge,
    },
    session::RenderState,
};

use super::{
    formatters::{
        format_audio_tracks_for_js, format_event_detail_for_js, format_render_state_for_js,
    },
    js_functions::*,
};

/// Implementation of every host interface through the imported JavaScript functions.
pub(crate) struct JsHost;

impl MediaController for JsHost {
    fn play(&mut self) {
        jsPlay();
    }

    fn pause(&mut self) {
        jsPause();
    }

    fn set_muted(&mut self, muted: bool) {
        jsSetMuted(muted);
    }

    fn seek(&mut self, position: f64) {
        jsSeek(position);
    }

    fn set_source(&mut self, url: Option<&str>) {
        jsSetSource(url.map(str::to_owned));
    }

    fn set_loop(&mut self, looping: bool) {
        jsSetLoop(looping);
    }

    fn set_controls(&mut self, controls: &str) {
        jsSetControls(controls);
    }
}

impl EngineBackend for JsHost {
    fn create_engine(&mut self, config: &EngineConfig) -> Result<EngineHandle, EngineError> {
        jsCreateEngine(
            config.max_buffer_length,
            config.max_max_buffer_length,
            config.max_buffer_size,
            config.back_buffer_length,
            config.start_level,
        )
        .result()
        .map_err(|(code, message)| EngineError::Creation {
            code,
            message: message.unwrap_or_else(|| "Unknown error.".to_owned()),
        })
    }

    fn load_source(
        &mut self,
        engine: EngineHandle,
        url: &str,
        start_level: u32,
    ) -> Result<(), EngineError> {
        jsLoadEngineSource(engine, url, start_level)
            .result()
            .map_err(|(code, message)| EngineError::Loading {
                code,
                message: message.unwrap_or_else(|| "Unknown error.".to_owned()),
            })
    }

    fn destroy_engine(&mut self, engine: EngineHandle) -> Result<(), EngineError> {
        jsDestroyEngine(engine)
            .result()
            .map_err(|(code, message)| EngineError::Destruction {
                code,
                message: message.unwrap_or_else(|| "Unknown error.".to_owned()),
            })
    }

    fn set_audio_track(&mut self, engine: EngineHandle, native_id: u32) {
        jsSetEngineAudioTrack(engine, native_id);
    }
}

impl Scheduler for JsHost {
    fn start_timer(&mut self, duration_ms: f64, reason: TimerReason) -> TimerId {
        jsTimer(duration_ms, reason)
    }

    fn clear_timer(&mut self, id: TimerId) {
        jsClearTimer(id);
    }

    fn request_animation_frame(&mut self) -> FrameId {
        jsRequestAnimationFrame()
    }

    fn cancel_animation_frame(&mut self, id: FrameId) {
        jsCancelAnimationFrame(id);
    }
}

impl MetadataSource for JsHost {
    fn fetch_metadata(&mut self, embed_id: &str) -> RequestId {
        jsFetchMetadata(embed_id)
    }
}

impl MetricsCollector for JsHost {
    fn monitor(&mut self, source: &str) {
        jsStartMonitoring(source);
    }

    fn demonitor(&mut self) {
        jsStopMonitoring();
    }
}

impl ThemeBridge for JsHost {
    fn load_theme(&mut self, name: &str) {
        jsLoadTheme(name);
    }

    fn render(&mut self, state: &RenderState) {
        if let Some(state) = format_render_state_for_js(state) {
            jsRender(&state);
        }
    }

    fn is_audio_menu_mounted(&self) -> bool {
        jsIsAudioMenuMounted()
    }

    fn update_audio_menu(&mut self, tracks: &AudioTrackSet, visible: bool) {
        if let Some(tracks) = format_audio_tracks_for_js(tracks) {
            jsUpdateAudioMenu(&tracks, visible);
        }
    }

    fn materialize_endscreen(&mut self) {
        jsMaterializeEndscreen();
    }
}

impl CollectionSource for JsHost {
    fn contains_item(&self, collection: &str, item: &str) -> bool {
        jsCollectionContains(collection, item)
    }

    fn successor_of(&self, collection: &str, item: &str) -> Option<String> {
        jsCollectionSuccessor(collection, item)
    }
}

impl EventSink for JsHost {
    fn emit(&mut self, event: PlayerEvent) {
        jsDispatchEvent(event.name(), &format_event_detail_for_js(&event));
    }
}

impl RealtimeTransport for JsHost {
    fn open_socket(&mut self, token: &str) -> SocketId {
        jsOpenSocket(token)
    }

    fn close_socket(&mut self, socket: SocketId) {
        jsCloseSocket(socket);
    }

    fn join_topic(&mut self, socket: SocketId, topic: &str) {
        jsJoinTopic(socket, topic);
    }

    fn leave_topic(&mut self, socket: SocketId, topic: &str) {
        jsLeaveTopic(socket, topic);
    }
}
