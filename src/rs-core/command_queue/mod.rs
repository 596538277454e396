use std::collections::VecDeque;

/// Playback operation which can be requested before the media element exists.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum PlaybackCommand {
    Play,
    Pause,
    SetMuted(bool),
    Seek(f64),
}

/// Buffers `PlaybackCommand`s until a media element is available.
///
/// Commands are kept in the order they were requested and flushed exactly once, when
/// the media element appears. While that element lives, commands are not queued
/// anymore and should be run immediately.
pub(crate) struct CommandQueue {
    pending: VecDeque<PlaybackCommand>,
    element_ready: bool,
}

impl CommandQueue {
    pub(crate) fn new() -> Self {
        Self {
            pending: VecDeque::new(),
            element_ready: false,
        }
    }

    #[cfg(test)]
    pub(crate) fn is_element_ready(&self) -> bool {
        self.element_ready
    }

    /// Returns the command back if it should be run right away, or queues it and
    /// returns `None` if the media element does not exist yet.
    #[must_use]
    pub(crate) fn enqueue_or_run(&mut self, command: PlaybackCommand) -> Option<PlaybackCommand> {
        if self.element_ready {
            Some(command)
        } else {
            self.pending.push_back(command);
            None
        }
    }

    /// To call when the media element becomes available. Returns the queued commands,
    /// in the order they should be run.
    ///
    /// Only the first call after the element appeared returns anything.
    pub(crate) fn flush(&mut self) -> Vec<PlaybackCommand> {
        if self.element_ready {
            return vec![];
        }
        self.element_ready = true;
        self.pending.drain(..).collect()
    }

    /// Drop pending commands without running them. The element's presence is not
    /// affected.
    pub(crate) fn clear(&mut self) {
        self.pending.clear();
    }

    /// To call when the media element went away.
    pub(crate) fn reset(&mut self) {
        self.pending.clear();
        self.element_ready = false;
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queued_until_flush() {
        let mut queue = CommandQueue::new();
        assert_eq!(queue.enqueue_or_run(PlaybackCommand::SetMuted(true)), None);
        assert_eq!(queue.enqueue_or_run(PlaybackCommand::Seek(12.)), None);
        assert_eq!(queue.enqueue_or_run(PlaybackCommand::Play), None);
        assert_eq!(queue.len(), 3);
        assert_eq!(
            queue.flush(),
            vec![
                PlaybackCommand::SetMuted(true),
                PlaybackCommand::Seek(12.),
                PlaybackCommand::Play
            ]
        );
        assert_eq!(queue.len(), 0);
        assert!(queue.flush().is_empty());
        assert_eq!(
            queue.enqueue_or_run(PlaybackCommand::Pause),
            Some(PlaybackCommand::Pause)
        );
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn test_reset() {
        let mut queue = CommandQueue::new();
        assert!(queue.flush().is_empty());
        assert!(queue.is_element_ready());
        queue.reset();
        assert!(!queue.is_element_ready());
        assert_eq!(queue.enqueue_or_run(PlaybackCommand::Play), None);
        queue.clear();
        assert!(queue.flush().is_empty());
    }
}
