use tokio::sync::broadcast;
use tracing::debug;

/// Fire-and-forget "craving data changed" signal, keyed by user id.
///
/// Delivery is best effort: with no subscriber, or a lagging one, messages
/// are dropped and the periodic refresh catches up.
#[derive(Clone)]
pub struct ChangeNotifier {
    sender: broadcast::Sender<String>,
}

impl ChangeNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.sender.subscribe()
    }

    pub fn notify(&self, user_id: &str) {
        if self.sender.send(user_id.to_string()).is_err() {
            debug!("no listeners for change on {user_id}");
        }
    }
}
