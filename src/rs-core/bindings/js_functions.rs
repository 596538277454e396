use crate::wasm_bindgen;
use std::fmt;

/// # js_functions
///
/// This file lists all JavaScript functions that are callable from Rust as well as
/// struct and enumeration used by those functions.

#[wasm_bindgen]
extern "C" {
    // Log the given text in the JavaScript console, with the log level given.
    pub fn jsLog(log_level: LogLevel, log: &str);

    // Starts a timer for the number of milliseconds indicated by the `duration` argument.
    //
    // Once this timer has elapsed, and unless `jsClearTimer` has been called since with
    // the `TimerId` returned by this function, the `on_timer_ended` method of the
    // `Player` will be called with both the corresponding `TimerId` and `reason`.
    pub fn jsTimer(duration: f64, reason: TimerReason) -> TimerId;

    // Clear a timer started with `jsTimer`.
    pub fn jsClearTimer(id: TimerId);

    // Schedule a callback on the next animation frame.
    //
    // Once that frame is reached, and unless `jsCancelAnimationFrame` has been called
    // since with the returned `FrameId`, the `on_animation_frame` method of the `Player`
    // will be called with that same `FrameId`.
    pub fn jsRequestAnimationFrame() -> FrameId;

    // Cancel a callback scheduled through `jsRequestAnimationFrame`.
    pub fn jsCancelAnimationFrame(id: FrameId);

    // Fetch the embed metadata linked to the given identifier.
    //
    // The result is communicated asynchronously either through `on_metadata_fetched`
    // (with the raw JSON document) or `on_metadata_fetch_failed`, both carrying the
    // `RequestId` returned here.
    pub fn jsFetchMetadata(embed_id: &str) -> RequestId;

    // Call `HTMLMediaElement.prototype.play` on the media element.
    pub fn jsPlay();

    // Call `HTMLMediaElement.prototype.pause` on the media element.
    pub fn jsPause();

    // Update the `muted` attribute of the media element.
    pub fn jsSetMuted(muted: bool);

    // Update the `currentTime` attribute of the media element.
    pub fn jsSeek(position: f64);

    // Update the `loop` attribute of the media element.
    pub fn jsSetLoop(looping: bool);

    // Set the `src` attribute of the media element, or remove it (and call `load`) when
    // `None` is given.
    pub fn jsSetSource(url: Option<String>);

    // Communicate the controls list the theme should display.
    pub fn jsSetControls(controls: &str);

    // Create a new adaptive streaming engine instance with the given buffering limits.
    pub fn jsCreateEngine(
        max_buffer_length: f64,
        max_max_buffer_length: f64,
        max_buffer_size: u32,
        back_buffer_length: f64,
        start_level: u32,
    ) -> CreateEngineResult;

    // Attach the engine behind `engine` to the media element and load the manifest at
    // `url`.
    pub fn jsLoadEngineSource(engine: EngineHandle, url: &str, start_level: u32) -> EngineOperationResult;

    // Detach and destroy the engine behind `engine`, removing all of its listeners.
    pub fn jsDestroyEngine(engine: EngineHandle) -> EngineOperationResult;

    // Ask the engine behind `engine` to switch to the audio track with the given native id.
    pub fn jsSetEngineAudioTrack(engine: EngineHandle, native_id: u32);

    // Start (or keep) monitoring playback through the metrics collaborator.
    pub fn jsStartMonitoring(source: &str);

    // Stop monitoring playback through the metrics collaborator.
    pub fn jsStopMonitoring();

    // Load the theme with the given name. `on_theme_ready` is called once it is rendered.
    pub fn jsLoadTheme(name: &str);

    // Render the given state, serialized as JSON, through the current theme.
    pub fn jsRender(state: &str);

    // Returns `true` if both the audio-track menu and its button are currently present
    // in the theme's render root.
    pub fn jsIsAudioMenuMounted() -> bool;

    // Update the audio-track menu with the given tracks, serialized as JSON.
    pub fn jsUpdateAudioMenu(tracks: &str, visible: bool);

    // Turn the endscreen template of the current theme into a live element.
    pub fn jsMaterializeEndscreen();

    // Returns `true` if the collection with the given name contains the given item.
    pub fn jsCollectionContains(collection: &str, item: &str) -> bool;

    // Returns the item coming after the given one in the collection, if one.
    pub fn jsCollectionSuccessor(collection: &str, item: &str) -> Option<String>;

    // Dispatch a custom event on the custom element, with a JSON detail payload.
    pub fn jsDispatchEvent(name: &str, detail: &str);

    // Open a realtime socket authenticated with the given token.
    pub fn jsOpenSocket(token: &str) -> SocketId;

    // Close a socket opened with `jsOpenSocket`.
    pub fn jsCloseSocket(socket: SocketId);

    // Join the given topic on a socket. Status pushes are then communicated through
    // `on_status_push`.
    pub fn jsJoinTopic(socket: SocketId, topic: &str);

    // Leave a topic previously joined with `jsJoinTopic`.
    pub fn jsLeaveTopic(socket: SocketId, topic: &str);
}

/// Errors that can arise when creating or driving an adaptive streaming engine.
#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineErrorCode {
    /// The engine is not supported in the current environment.
    NotSupported,

    /// The engine behind the given `EngineHandle` was not found, it may already have
    /// been destroyed.
    EngineNotFound,

    /// The engine threw while performing the operation.
    EngineError,

    /// An unknown error happened.
    UnknownError,
}

/// Result of calling the `jsCreateEngine` JavaScript function.
///
/// Creation of a `CreateEngineResult` should only be performed by the JavaScript side
/// through the exposed static constructors.
#[wasm_bindgen]
pub struct CreateEngineResult {
    engine: EngineHandle,
    error: Option<(EngineErrorCode, Option<String>)>,
}

#[wasm_bindgen]
impl CreateEngineResult {
    /// Creates a `CreateEngineResult` indicating success, with the corresponding
    /// `EngineHandle`.
    ///
    /// This function should only be called by the JavaScript-side.
    pub fn success(engine: EngineHandle) -> Self {
        Self {
            engine,
            error: None,
        }
    }

    /// Creates a `CreateEngineResult` indicating failure, with the corresponding
    /// error.
    ///
    /// This function should only be called by the JavaScript-side.
    pub fn error(err: EngineErrorCode, desc: Option<String>) -> Self {
        Self {
            engine: 0,
            error: Some((err, desc)),
        }
    }
}

impl JsResult<EngineHandle, EngineErrorCode> for CreateEngineResult {
    fn result(self) -> Result<EngineHandle, (EngineErrorCode, Option<String>)> {
        if let Some(err) = self.error {
            Err(err)
        } else {
            Ok(self.engine)
        }
    }
}

/// Result of calling either the `jsLoadEngineSource` or the `jsDestroyEngine` JavaScript
/// functions.
#[wasm_bindgen]
pub struct EngineOperationResult {
    error: Option<(EngineErrorCode, Option<String>)>,
}

#[wasm_bindgen]
impl EngineOperationResult {
    /// Creates an `EngineOperationResult` indicating success.
    ///
    /// This function should only be called by the JavaScript-side.
    pub fn success() -> Self {
        Self { error: None }
    }

    /// Creates an `EngineOperationResult` indicating failure, with the corresponding
    /// error.
    ///
    /// This function should only be called by the JavaScript-side.
    pub fn error(err: EngineErrorCode, desc: Option<String>) -> Self {
        Self {
            error: Some((err, desc)),
        }
    }
}

impl JsResult<(), EngineErrorCode> for EngineOperationResult {
    fn result(self) -> Result<(), (EngineErrorCode, Option<String>)> {
        if let Some(err) = self.error {
            Err(err)
        } else {
            Ok(())
        }
    }
}

/// Trait allowing to convert "JavaScript Results" as exposed by the JavaScript functions into
/// `Result` structs more idiomatic to Rust.
pub(crate) trait JsResult<T, E> {
    fn result(self) -> Result<T, (E, Option<String>)>;
}

/// "Reason" associated to a timer started by the `Player`.
///
/// This can then help to identify what the timer was for once resolved.
#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerReason {
    /// The timer is linked to the re-check of the embed metadata while the video is
    /// still being processed upstream.
    ProcessingRefresh = 0,
}

/// Levels with which a log can be emitted.
#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd)]
pub enum LogLevel {
    /// Log level reserved for very important errors and highly unexpected events.
    Error = 0,

    /// Log level reserved for less important errors and unexpected events.
    Warn = 1,

    /// Log level reserved for important events
    Info = 2,

    /// Log level used when debugging. Small-ish yet impactful events should be logged with it.
    Debug = 3,
}

/// Identify a pending metadata request.
pub type RequestId = u32;

/// Identify a pending timer.
pub type TimerId = f64;

/// Identify a pending animation frame callback.
pub type FrameId = f64;

/// Identify an adaptive streaming engine instance living on the JavaScript-side.
pub type EngineHandle = u32;

/// Identify a realtime socket living on the JavaScript-side.
pub type SocketId = u32;

impl fmt::Display for EngineErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                EngineErrorCode::NotSupported => "not supported",
                EngineErrorCode::EngineNotFound => "engine not found",
                EngineErrorCode::EngineError => "engine error",
                EngineErrorCode::UnknownError => "unknown error",
            }
        )
    }
}
