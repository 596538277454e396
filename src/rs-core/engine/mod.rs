use thiserror::Error;

use crate::{
    bindings::{EngineErrorCode, EngineHandle},
    host::EngineBackend,
    utils::url::Url,
    Logger,
};

/// Amount of buffer, ahead of the current position, the engine tries to build, in
/// seconds.
const MAX_BUFFER_LENGTH: f64 = 30.;

/// Hard limit on the buffer ahead of the current position, in seconds.
const MAX_MAX_BUFFER_LENGTH: f64 = 60.;

/// Hard limit on the size of the buffer ahead of the current position, in bytes.
const MAX_BUFFER_SIZE: u32 = 30 * 1000 * 1000;

/// Amount of already-played media kept in the buffer, in seconds.
const BACK_BUFFER_LENGTH: f64 = 30.;

/// Query parameter carrying the session's access token on engine requests.
const TOKEN_QUERY_PARAM: &str = "token";

/// Configuration given to each created engine instance.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct EngineConfig {
    pub(crate) max_buffer_length: f64,
    pub(crate) max_max_buffer_length: f64,
    pub(crate) max_buffer_size: u32,
    pub(crate) back_buffer_length: f64,
    pub(crate) start_level: u32,
}

impl EngineConfig {
    pub(crate) fn with_start_level(start_level: u32) -> Self {
        Self {
            max_buffer_length: MAX_BUFFER_LENGTH,
            max_max_buffer_length: MAX_MAX_BUFFER_LENGTH,
            max_buffer_size: MAX_BUFFER_SIZE,
            back_buffer_length: BACK_BUFFER_LENGTH,
            start_level,
        }
    }
}

/// Owns the lifecycle of the adaptive streaming engine of a session.
///
/// There is at most one engine alive at any time: attaching a new one always destroys
/// the previous one first. Other components never talk to the engine directly, they go
/// through this adapter.
pub(crate) struct PlaybackEngineAdapter {
    /// Handle of the engine currently attached, `None` if there's none.
    current: Option<EngineHandle>,

    /// Token added to each request performed by the engine, if set.
    access_token: Option<String>,
}

impl PlaybackEngineAdapter {
    pub(crate) fn new() -> Self {
        Self {
            current: None,
            access_token: None,
        }
    }

    /// Destroy the previous engine if one, then create a new one loading `manifest_url`.
    ///
    /// On failure, no engine is left alive and the error is returned as is: it is up to
    /// the caller to decide whether a new attempt should be made.
    pub(crate) fn attach(
        &mut self,
        backend: &mut impl EngineBackend,
        manifest_url: &str,
        start_level: u32,
    ) -> Result<EngineHandle, EngineError> {
        self.detach(backend);
        let config = EngineConfig::with_start_level(start_level);
        let engine = backend.create_engine(&config)?;
        Logger::lazy_info(&|| format!("Engine: Created engine {engine}, loading {manifest_url}"));
        if let Err(err) = backend.load_source(engine, manifest_url, start_level) {
            Self::destroy(backend, engine);
            return Err(err);
        }
        self.current = Some(engine);
        Ok(engine)
    }

    /// Destroy the current engine, if one.
    ///
    /// Errors encountered while doing so are logged and discarded.
    pub(crate) fn detach(&mut self, backend: &mut impl EngineBackend) {
        if let Some(engine) = self.current.take() {
            Self::destroy(backend, engine);
        }
    }

    /// Returns `true` if `engine` is the engine currently attached.
    ///
    /// Events coming from any other engine come from a superseded instance and should
    /// be ignored.
    pub(crate) fn is_current(&self, engine: EngineHandle) -> bool {
        self.current == Some(engine)
    }

    #[cfg(test)]
    pub(crate) fn current(&self) -> Option<EngineHandle> {
        self.current
    }

    /// Forward an audio track switch to the current engine. Does nothing if no engine is
    /// attached.
    pub(crate) fn switch_audio_track(&self, backend: &mut impl EngineBackend, native_id: u32) {
        match self.current {
            Some(engine) => backend.set_audio_track(engine, native_id),
            None => Logger::warn("Engine: Cannot switch audio track, no engine attached"),
        }
    }

    pub(crate) fn set_access_token(&mut self, token: Option<String>) {
        self.access_token = token.filter(|t| !t.is_empty());
    }

    /// Returns the URL a request from the engine should actually be performed on.
    pub(crate) fn request_url(&self, url: &str) -> String {
        let url = Url::new(url.to_owned());
        match self.access_token.as_deref() {
            Some(token) if url.query_param(TOKEN_QUERY_PARAM).is_none() => url
                .with_query_param(TOKEN_QUERY_PARAM, token)
                .take(),
            _ => url.take(),
        }
    }

    fn destroy(backend: &mut impl EngineBackend, engine: EngineHandle) {
        if let Err(err) = backend.destroy_engine(engine) {
            Logger::lazy_warn(&|| format!("Engine: Error while destroying engine {engine}: {err}"));
        } else {
            Logger::lazy_debug(&|| format!("Engine: Destroyed engine {engine}"));
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub(crate) enum EngineError {
    #[error("Could not create the streaming engine ({code}): {message}")]
    Creation {
        code: EngineErrorCode,
        message: String,
    },
    #[error("Could not load source in the streaming engine ({code}): {message}")]
    Loading {
        code: EngineErrorCode,
        message: String,
    },
    #[error("Could not destroy the streaming engine ({code}): {message}")]
    Destruction {
        code: EngineErrorCode,
        message: String,
    },
    #[error("The streaming engine encountered a fatal error: {0}")]
    Fatal(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::mock::{MockCall, MockHost};

    #[test]
    fn test_rebuilding_destroys_before_creating() {
        let mut host = MockHost::new();
        let mut adapter = PlaybackEngineAdapter::new();
        for _ in 0..3 {
            adapter.attach(&mut host, "https://cdn/master.m3u8", 2).unwrap();
        }
        let calls: Vec<MockCall> = host
            .calls()
            .into_iter()
            .filter(|c| matches!(c, MockCall::CreateEngine(..) | MockCall::DestroyEngine(_)))
            .collect();
        assert_eq!(
            calls,
            vec![
                MockCall::CreateEngine(1, EngineConfig::with_start_level(2)),
                MockCall::DestroyEngine(1),
                MockCall::CreateEngine(2, EngineConfig::with_start_level(2)),
                MockCall::DestroyEngine(2),
                MockCall::CreateEngine(3, EngineConfig::with_start_level(2)),
            ]
        );
        assert!(adapter.is_current(3));
        assert!(!adapter.is_current(2));
        adapter.detach(&mut host);
        assert_eq!(host.count(|c| matches!(c, MockCall::DestroyEngine(_))), 3);
        assert_eq!(adapter.current(), None);
    }

    #[test]
    fn test_destruction_errors_are_discarded() {
        let mut host = MockHost::new();
        host.set_fail_engine_destruction(true);
        let mut adapter = PlaybackEngineAdapter::new();
        adapter.attach(&mut host, "https://cdn/master.m3u8", 0).unwrap();
        adapter.attach(&mut host, "https://cdn/master.m3u8", 0).unwrap();
        assert!(adapter.is_current(2));
        adapter.detach(&mut host);
        adapter.detach(&mut host);
        assert_eq!(host.count(|c| matches!(c, MockCall::DestroyEngine(_))), 2);
    }

    #[test]
    fn test_failed_loading_leaves_no_engine() {
        let mut host = MockHost::new();
        host.set_fail_engine_loading(true);
        let mut adapter = PlaybackEngineAdapter::new();
        let res = adapter.attach(&mut host, "https://cdn/master.m3u8", 0);
        assert!(matches!(res, Err(EngineError::Loading { .. })));
        assert_eq!(adapter.current(), None);
        assert_eq!(host.count(|c| matches!(c, MockCall::DestroyEngine(1))), 1);
    }

    #[test]
    fn test_failed_creation() {
        let mut host = MockHost::new();
        host.set_fail_engine_creation(true);
        let mut adapter = PlaybackEngineAdapter::new();
        let res = adapter.attach(&mut host, "https://cdn/master.m3u8", 0);
        assert!(matches!(res, Err(EngineError::Creation { .. })));
        assert_eq!(adapter.current(), None);
        assert_eq!(host.count(|c| matches!(c, MockCall::DestroyEngine(_))), 0);
    }

    #[test]
    fn test_request_url() {
        let mut adapter = PlaybackEngineAdapter::new();
        assert_eq!(adapter.request_url("https://cdn/a.ts"), "https://cdn/a.ts");
        adapter.set_access_token(Some("secret".to_owned()));
        assert_eq!(
            adapter.request_url("https://cdn/a.ts"),
            "https://cdn/a.ts?token=secret"
        );
        assert_eq!(
            adapter.request_url("https://cdn/a.ts?token=other"),
            "https://cdn/a.ts?token=other"
        );
        assert_eq!(
            adapter.request_url("https://cdn/a.ts?tok%65n=other"),
            "https://cdn/a.ts?tok%65n=other"
        );
        adapter.set_access_token(Some("a b+c".to_owned()));
        assert_eq!(
            adapter.request_url("https://cdn/a.ts?x=1"),
            "https://cdn/a.ts?x=1&token=a%20b%2Bc"
        );
        adapter.set_access_token(Some(String::new()));
        assert_eq!(adapter.request_url("https://cdn/a.ts"), "https://cdn/a.ts");
    }
}
