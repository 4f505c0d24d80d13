use tokio::sync::broadcast;

use gather_types::session::SessionEvent;

/// Fan-out point for session changes — the in-process analogue of the
/// `authChanged` window event the views used to listen for. Only the
/// session monitor and explicit login/logout paths emit; everything else
/// subscribes.
#[derive(Clone)]
pub struct SessionHub {
    tx: broadcast::Sender<SessionEvent>,
}

impl SessionHub {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self { tx }
    }

    /// Subscribe to session changes. Returns a broadcast receiver.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }

    /// Emit to all subscribers. Having no subscribers is not an error.
    pub fn emit(&self, event: SessionEvent) {
        let _ = self.tx.send(event);
    }
}

impl Default for SessionHub {
    fn default() -> Self {
        Self::new()
    }
}
