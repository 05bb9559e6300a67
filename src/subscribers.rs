use std::collections::HashMap;

use futures_channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use log::info;
use uuid::Uuid;

type Tx<T> = UnboundedSender<T>;

/// Observers of a collection, keyed by subscription id.
pub struct SubscriberMap<T: Clone> {
    peers: HashMap<String, Tx<T>>,
}

impl<T: Clone> Default for SubscriberMap<T> {
    fn default() -> Self {
        Self {
            peers: HashMap::new(),
        }
    }
}

impl<T: Clone> SubscriberMap<T> {
    pub fn attach(&mut self) -> (String, UnboundedReceiver<T>) {
        let id = Uuid::new_v4().to_string();
        let (tx, rx) = unbounded();
        self.peers.insert(id.clone(), tx);
        info!("Subscriber attached: {}", &id);
        (id, rx)
    }

    pub fn detach(&mut self, id: &str) -> bool {
        let removed = self.peers.remove(id).is_some();
        if removed {
            info!("Subscriber detached: {}", id);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Sends `update` to every observer; those whose receiver is gone are dropped.
    pub fn broadcast_all(&mut self, update: &T) {
        self.peers.retain(|id, tx| match tx.unbounded_send(update.clone()) {
            Ok(()) => true,
            Err(_) => {
                info!("Dropping closed subscriber: {}", id);
                false
            }
        });
    }
}
