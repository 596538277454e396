use crate::{
    host::{CollectionSource, EventSink, MediaController, PlayerEvent, ThemeBridge},
    metadata::EndscreenMode,
    Logger,
};

/// Remaining playback time, in seconds, under which playback is considered "near its
/// end".
pub(crate) const NEAR_END_THRESHOLD: f64 = 5.;

/// Controls configuration forced while the endscreen is displayed.
const HIDDEN_CONTROLS: &str = "none";

/// Action carried by the click event emitted on auto-advance.
const AUTO_ADVANCE_ACTION: &str = "next";

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct EndscreenState {
    pub(crate) visible: bool,
    /// Controls configuration in place before the endscreen was shown.
    pub(crate) saved_controls: Option<String>,
}

/// What the controller needs to know about the current playback and configuration.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SequencingContext<'a> {
    pub(crate) mode: EndscreenMode,
    pub(crate) collection: Option<&'a str>,
    pub(crate) auto_advance: bool,
    pub(crate) current_item: Option<&'a str>,
    pub(crate) position: f64,
}

/// Drives the start screen, the endscreen overlay and auto-advance to the next item of a
/// collection.
///
/// `controls` arguments refer to the player's current controls configuration, which is
/// swapped with `"none"` while the endscreen is visible.
pub(crate) struct EndscreenController {
    state: EndscreenState,

    /// `true` once the endscreen template has been turned into a live element for the
    /// current activation.
    materialized: bool,

    /// `true` once auto-advance has been triggered for the current approach of the end.
    advance_triggered: bool,

    /// `true` once the endscreen has been closed by hand during the current approach of
    /// the end. It is not shown again before playback moves away from the end.
    dismissed: bool,

    start_screen_visible: bool,
}

impl EndscreenController {
    pub(crate) fn new() -> Self {
        Self {
            state: EndscreenState::default(),
            materialized: false,
            advance_triggered: false,
            dismissed: false,
            start_screen_visible: true,
        }
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> &EndscreenState {
        &self.state
    }

    #[inline(always)]
    pub(crate) fn is_visible(&self) -> bool {
        self.state.visible
    }

    #[inline(always)]
    pub(crate) fn is_start_screen_visible(&self) -> bool {
        self.start_screen_visible
    }

    /// To call when the native "ended" event is received.
    pub(crate) fn on_playback_ended<H: MediaController + ThemeBridge>(
        &mut self,
        host: &mut H,
        controls: &mut String,
        ctx: &SequencingContext,
    ) {
        if ctx.mode != EndscreenMode::None {
            self.show(host, controls);
        }
    }

    /// To call regularly during playback with the remaining time, in seconds.
    pub(crate) fn on_near_end<H>(&mut self, host: &mut H, controls: &mut String, remaining: f64, ctx: &SequencingContext)
    where
        H: MediaController + ThemeBridge + CollectionSource + EventSink,
    {
        if remaining >= NEAR_END_THRESHOLD {
            self.advance_triggered = false;
            self.dismissed = false;
            return;
        }
        if ctx.mode == EndscreenMode::NearEnd && !self.dismissed {
            self.show(host, controls);
        }
        if ctx.auto_advance && !self.advance_triggered {
            self.advance_triggered = true;
            self.advance(host, ctx);
        }
    }

    /// To call when playback (re)starts.
    pub(crate) fn on_playback_started<H: MediaController + ThemeBridge>(
        &mut self,
        host: &mut H,
        controls: &mut String,
    ) {
        self.start_screen_visible = false;
        self.hide(host, controls);
    }

    /// Hide the endscreen. Does nothing if it is not visible.
    pub(crate) fn close<H: MediaController + ThemeBridge>(&mut self, host: &mut H, controls: &mut String) {
        if self.state.visible {
            self.dismissed = true;
        }
        self.hide(host, controls);
    }

    /// Update the controls configuration the player should get back once the endscreen
    /// is hidden.
    ///
    /// Returns `false` if the endscreen is not visible, in which case the new
    /// configuration should be applied directly.
    pub(crate) fn replace_saved_controls(&mut self, controls: String) -> bool {
        if self.state.visible {
            self.state.saved_controls = Some(controls);
            true
        } else {
            false
        }
    }

    /// Hide everything and go back to the initial state, for a new session.
    pub(crate) fn reset<H: MediaController + ThemeBridge>(&mut self, host: &mut H, controls: &mut String) {
        self.hide(host, controls);
        self.advance_triggered = false;
        self.dismissed = false;
        self.start_screen_visible = true;
    }

    fn show<H: MediaController + ThemeBridge>(&mut self, host: &mut H, controls: &mut String) {
        if self.state.visible {
            return;
        }
        Logger::debug("Endscreen: Showing endscreen");
        self.state.visible = true;
        self.state.saved_controls = Some(std::mem::replace(controls, HIDDEN_CONTROLS.to_owned()));
        host.set_controls(HIDDEN_CONTROLS);
        if !self.materialized {
            self.materialized = true;
            host.materialize_endscreen();
        }
    }

    fn hide<H: MediaController + ThemeBridge>(&mut self, host: &mut H, controls: &mut String) {
        if !self.state.visible {
            return;
        }
        Logger::debug("Endscreen: Hiding endscreen");
        self.state.visible = false;
        self.materialized = false;
        if let Some(saved) = self.state.saved_controls.take() {
            *controls = saved;
        }
        host.set_controls(controls.as_str());
    }

    fn advance<H: CollectionSource + EventSink>(&self, host: &mut H, ctx: &SequencingContext) {
        let (collection, current) = match (ctx.collection, ctx.current_item) {
            (Some(collection), Some(current)) => (collection, current),
            _ => return,
        };
        if !host.contains_item(collection, current) {
            return;
        }
        match host.successor_of(collection, current) {
            Some(next) => {
                Logger::lazy_info(&|| format!("Endscreen: Auto-advancing to {next}"));
                host.emit(PlayerEvent::Click {
                    action: AUTO_ADVANCE_ACTION.to_owned(),
                    identifier: next,
                    position: ctx.position,
                });
            }
            None => Logger::debug("Endscreen: Last item of the collection, no auto-advance"),
        }
    }
}
