use crate::{loading::HAVE_CURRENT_DATA, metadata::RemoteAutoplay};

/// Autoplay behavior configured on the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum AutoplayMode {
    /// Nothing configured locally, the remote setting applies.
    #[default]
    Off,
    /// Play only while the player is visible in the viewport.
    Lazy,
    /// Play as soon as possible.
    Always,
}

impl AutoplayMode {
    /// Parse the `autoplay` attribute. The legacy boolean form (`true`, an empty
    /// attribute) behaves like `lazy`.
    pub(crate) fn from_attribute(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("always") => AutoplayMode::Always,
            Some("lazy") | Some("on") | Some("true") | Some("") => AutoplayMode::Lazy,
            _ => AutoplayMode::Off,
        }
    }

    /// Mode actually applied once the remote setting is taken into account.
    pub(crate) fn effective(self, remote: RemoteAutoplay) -> Self {
        match (self, remote) {
            (AutoplayMode::Off, RemoteAutoplay::Always) => AutoplayMode::Always,
            (AutoplayMode::Off, RemoteAutoplay::OnShow) => AutoplayMode::Lazy,
            (mode, _) => mode,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AutoplayAction {
    /// Play, muted.
    Play,
    Pause,
    None,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct AutoplayInputs {
    /// `None` until the viewport observer reported anything.
    pub(crate) intersecting: Option<bool>,
    pub(crate) mode: AutoplayMode,
    pub(crate) remote: RemoteAutoplay,
    pub(crate) paused: bool,
    pub(crate) ready_state: u8,
    /// A media element exists and a source has been applied to it.
    pub(crate) can_play: bool,
}

/// Stateless autoplay rule.
pub(crate) fn decide(inputs: &AutoplayInputs) -> AutoplayAction {
    if !inputs.can_play {
        return AutoplayAction::None;
    }
    match inputs.mode.effective(inputs.remote) {
        AutoplayMode::Off => AutoplayAction::None,
        AutoplayMode::Always => {
            if inputs.paused {
                AutoplayAction::Play
            } else {
                AutoplayAction::None
            }
        }
        AutoplayMode::Lazy => match inputs.intersecting {
            Some(true) if inputs.paused => AutoplayAction::Play,
            // Don't pause something which never started
            Some(false) if !inputs.paused && inputs.ready_state > HAVE_CURRENT_DATA => {
                AutoplayAction::Pause
            }
            _ => AutoplayAction::None,
        },
    }
}

/// Applies `decide` at most once per trigger, so that a user pausing a video is not
/// overridden by the next unrelated event.
///
/// Automatic play is re-armed each time the player enters the viewport and when a new
/// session begins.
pub(crate) struct AutoplayPolicyEngine {
    intersecting: Option<bool>,
    armed: bool,
}

impl AutoplayPolicyEngine {
    pub(crate) fn new() -> Self {
        Self {
            intersecting: None,
            armed: true,
        }
    }

    #[inline(always)]
    pub(crate) fn intersecting(&self) -> Option<bool> {
        self.intersecting
    }

    /// To call when the viewport intersection of the player changed.
    pub(crate) fn on_intersection_change(
        &mut self,
        intersecting: bool,
        inputs: AutoplayInputs,
    ) -> AutoplayAction {
        let was_intersecting = self.intersecting == Some(true);
        self.intersecting = Some(intersecting);
        if intersecting && !was_intersecting {
            self.armed = true;
        }
        let inputs = AutoplayInputs {
            intersecting: self.intersecting,
            ..inputs
        };
        match decide(&inputs) {
            AutoplayAction::Play if self.armed => {
                self.armed = false;
                AutoplayAction::Play
            }
            AutoplayAction::Play => AutoplayAction::None,
            other => other,
        }
    }

    /// To call when playback becomes possible (media element attached, source
    /// applied...). May only ever result in a play.
    pub(crate) fn evaluate(&mut self, inputs: AutoplayInputs) -> AutoplayAction {
        if !self.armed {
            return AutoplayAction::None;
        }
        let inputs = AutoplayInputs {
            intersecting: self.intersecting,
            ..inputs
        };
        match decide(&inputs) {
            AutoplayAction::Play => {
                self.armed = false;
                AutoplayAction::Play
            }
            _ => AutoplayAction::None,
        }
    }

    /// Re-arm automatic play for a new session. The last known intersection is kept as
    /// it does not depend on the session.
    pub(crate) fn reset(&mut self) {
        self.armed = true;
    }
}
