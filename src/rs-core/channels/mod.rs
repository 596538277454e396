use std::collections::HashMap;

use crate::{bindings::SocketId, host::RealtimeTransport, Logger};

struct SocketEntry {
    socket: SocketId,
    consumers: usize,
}

/// Realtime sockets shared between players, keyed by access token.
///
/// A socket is opened lazily when the first consumer for a token acquires it and closed
/// when its last consumer releases it.
pub(crate) struct ChannelRegistry {
    sockets: HashMap<String, SocketEntry>,
}

impl ChannelRegistry {
    pub(crate) fn new() -> Self {
        Self {
            sockets: HashMap::new(),
        }
    }

    /// Returns the socket linked to `token`, opening it if needed, and registers one
    /// more consumer for it.
    pub(crate) fn acquire(&mut self, transport: &mut impl RealtimeTransport, token: &str) -> SocketId {
        if let Some(entry) = self.sockets.get_mut(token) {
            entry.consumers += 1;
            return entry.socket;
        }
        let socket = transport.open_socket(token);
        Logger::lazy_debug(&|| format!("Channels: Opened socket {socket}"));
        self.sockets.insert(
            token.to_owned(),
            SocketEntry {
                socket,
                consumers: 1,
            },
        );
        socket
    }

    /// Unregister a consumer of the socket linked to `token`, closing that socket if it
    /// was the last one.
    pub(crate) fn release(&mut self, transport: &mut impl RealtimeTransport, token: &str) {
        let is_last = match self.sockets.get_mut(token) {
            Some(entry) => {
                entry.consumers -= 1;
                entry.consumers == 0
            }
            None => {
                Logger::warn("Channels: Releasing a socket which was not acquired");
                return;
            }
        };
        if is_last {
            if let Some(entry) = self.sockets.remove(token) {
                Logger::lazy_debug(&|| format!("Channels: Closing socket {}", entry.socket));
                transport.close_socket(entry.socket);
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn consumers(&self, token: &str) -> usize {
        self.sockets.get(token).map(|e| e.consumers).unwrap_or(0)
    }
}
