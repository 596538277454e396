use crate::{
    bindings::{TimerId, TimerReason},
    host::Scheduler,
    metadata::RemoteStatus,
    Logger,
};

/// Delay after which the embed metadata is fetched again while the video is still
/// being processed, in milliseconds.
pub(crate) const PROCESSING_REFRESH_DELAY_MS: f64 = 5000.;

/// `HTMLMediaElement.HAVE_METADATA` ready state.
pub(crate) const HAVE_METADATA: u8 = 1;

/// `HTMLMediaElement.HAVE_CURRENT_DATA` ready state.
pub(crate) const HAVE_CURRENT_DATA: u8 = 2;

/// What the media element reports about the media it loaded.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct NativeReadiness {
    pub(crate) duration: f64,
    pub(crate) ready_state: u8,
}

impl Default for NativeReadiness {
    fn default() -> Self {
        Self {
            duration: f64::NAN,
            ready_state: 0,
        }
    }
}

impl NativeReadiness {
    /// `true` while the media element did not load the media's metadata yet.
    pub(crate) fn is_awaiting_metadata(&self) -> bool {
        !(self.duration.is_finite() && self.duration > 0.) || self.ready_state < HAVE_METADATA
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LoadingPhase {
    /// No metadata has been received yet.
    Unknown,
    /// The video is not ready to be played, the processing overlay should be shown.
    Processing,
    Ready,
}

/// Returns `true` if the processing overlay should be shown for the given inputs.
pub(crate) fn needs_processing(
    status: RemoteStatus,
    has_playable_source: bool,
    awaiting_native_metadata: bool,
) -> bool {
    if status.is_terminal() {
        !has_playable_source
    } else {
        !has_playable_source || awaiting_native_metadata
    }
}

/// Text and spinner shown on the processing overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ProcessingOverlay {
    pub(crate) message: &'static str,
    pub(crate) spinner: bool,
}

impl ProcessingOverlay {
    pub(crate) fn for_status(status: RemoteStatus) -> Self {
        match status {
            RemoteStatus::Waiting => ProcessingOverlay {
                message: "Waiting for video…",
                spinner: true,
            },
            RemoteStatus::Errored => ProcessingOverlay {
                message: "Video processing failed",
                spinner: false,
            },
            RemoteStatus::Uploading
            | RemoteStatus::Preparing
            | RemoteStatus::Playable
            | RemoteStatus::Ready => ProcessingOverlay {
                message: "Processing video…",
                spinner: true,
            },
        }
    }
}

/// Derives whether the current video is still "processing" and, while it is, keeps a
/// single refresh timer running.
pub(crate) struct LoadingStateTracker {
    phase: LoadingPhase,

    /// Pending refresh timer, if one. There's never more than one.
    refresh_timer: Option<TimerId>,
}

impl LoadingStateTracker {
    pub(crate) fn new() -> Self {
        Self {
            phase: LoadingPhase::Unknown,
            refresh_timer: None,
        }
    }

    #[inline(always)]
    pub(crate) fn phase(&self) -> LoadingPhase {
        self.phase
    }

    #[inline(always)]
    pub(crate) fn is_processing(&self) -> bool {
        self.phase == LoadingPhase::Processing
    }

    /// Re-evaluate the current phase from the given inputs, starting or clearing the
    /// refresh timer accordingly.
    ///
    /// `status` is `None` when no metadata is known yet.
    pub(crate) fn update(
        &mut self,
        scheduler: &mut impl Scheduler,
        status: Option<RemoteStatus>,
        has_playable_source: bool,
        native: NativeReadiness,
    ) -> LoadingPhase {
        let new_phase = match status {
            None => LoadingPhase::Unknown,
            Some(status) => {
                if needs_processing(status, has_playable_source, native.is_awaiting_metadata()) {
                    LoadingPhase::Processing
                } else {
                    LoadingPhase::Ready
                }
            }
        };
        if new_phase != self.phase {
            Logger::lazy_info(&|| {
                format!("Loading: Phase change {:?} -> {:?}", self.phase, new_phase)
            });
            self.phase = new_phase;
        }
        if new_phase == LoadingPhase::Processing {
            if self.refresh_timer.is_none() {
                self.refresh_timer = Some(
                    scheduler.start_timer(PROCESSING_REFRESH_DELAY_MS, TimerReason::ProcessingRefresh),
                );
            }
        } else {
            self.clear_refresh_timer(scheduler);
        }
        new_phase
    }

    /// To call once a `ProcessingRefresh` timer ended.
    ///
    /// Returns `true` if that timer is the pending one and the metadata should thus be
    /// fetched again.
    pub(crate) fn on_refresh_timer(&mut self, id: TimerId) -> bool {
        if self.refresh_timer != Some(id) {
            Logger::debug("Loading: Ignoring unknown refresh timer");
            return false;
        }
        self.refresh_timer = None;
        self.is_processing()
    }

    pub(crate) fn reset(&mut self, scheduler: &mut impl Scheduler) {
        self.clear_refresh_timer(scheduler);
        self.phase = LoadingPhase::Unknown;
    }

    fn clear_refresh_timer(&mut self, scheduler: &mut impl Scheduler) {
        if let Some(id) = self.refresh_timer.take() {
            scheduler.clear_timer(id);
        }
    }
}
